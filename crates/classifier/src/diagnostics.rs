use crate::decision::Decision;
use crate::extractor::{CategoryScore, ModelOutputError};
use crate::labels::HERB_CLASSES;

/// Render every category with its confidence, two decimal places, fixed
/// category order.
///
/// On the detection path a category may appear several times; the line
/// shows the per-category maximum, 0.00 where nothing was reported.
pub fn score_line(scores: &[CategoryScore]) -> String {
    let mut per_category = [0.0f32; HERB_CLASSES.len()];
    for score in scores {
        if let Some(slot) = per_category.get_mut(score.class_id) {
            if score.confidence > *slot {
                *slot = score.confidence;
            }
        }
    }

    let rendered: Vec<String> = HERB_CLASSES
        .iter()
        .zip(per_category)
        .map(|(label, confidence)| format!("{}: {:.2}", label, confidence))
        .collect();

    rendered.join(" | ")
}

/// Record the full score vector and the chosen label.
///
/// Side effect only: infallible, off the response path, and never able to
/// alter the decision it observes.
pub fn record(scores: &[CategoryScore], decision: &Decision) {
    tracing::info!(
        scores = %score_line(scores),
        decision = decision.label(),
        "prediction result"
    );
}

/// Record an uninterpretable model response before it is recovered as
/// "no detections".
pub fn record_anomaly(error: &ModelOutputError) {
    tracing::warn!(
        error = %error,
        "uninterpretable model output, treating as no detections"
    );
}
