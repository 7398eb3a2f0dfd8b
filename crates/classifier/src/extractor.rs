use crate::backend::RawModelOutput;
use crate::diagnostics;
use crate::labels::HERB_CLASSES;
use ndarray::ArrayD;
use thiserror::Error;

/// One `(category, confidence)` pair in canonical form.
///
/// Confidences are treated as independent per-category values in [0, 1];
/// no assumption is made that they sum to 1 across categories.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryScore {
    pub class_id: usize,
    pub confidence: f32,
}

/// Ways a model response can fail to match its declared shape.
///
/// These never surface to the caller; they are recorded through the
/// diagnostics sink and recovered as an empty score list.
#[derive(Debug, Error)]
pub enum ModelOutputError {
    #[error("unexpected output shape {0:?}")]
    Shape(Vec<usize>),

    #[error("confidence {0} is not a value in [0, 1]")]
    Confidence(f32),

    #[error("class index {0} is outside the category table")]
    ClassIndex(f32),
}

/// Normalizes either classifier response shape into the canonical score
/// list the decision engine consumes.
pub struct ScoreExtractor {
    prefilter_threshold: f32,
}

impl ScoreExtractor {
    pub fn new(prefilter_threshold: f32) -> Self {
        Self {
            prefilter_threshold,
        }
    }

    /// Reduce a raw model response to `(category, confidence)` pairs.
    ///
    /// Fails closed: output that does not match the declared shape yields
    /// an empty list, indistinguishable downstream from "nothing
    /// detected". A broken model must never turn into a confident herb
    /// label.
    pub fn extract(&self, output: &RawModelOutput) -> Vec<CategoryScore> {
        match self.try_extract(output) {
            Ok(scores) => scores,
            Err(e) => {
                diagnostics::record_anomaly(&e);
                Vec::new()
            }
        }
    }

    fn try_extract(
        &self,
        output: &RawModelOutput,
    ) -> Result<Vec<CategoryScore>, ModelOutputError> {
        match output {
            RawModelOutput::Detections(tensor) => self.from_detections(tensor),
            RawModelOutput::Distribution(tensor) => Self::from_distribution(tensor),
        }
    }

    /// Detection shape: the per-row pairs are passed through unreduced.
    /// Rows are not mutually exclusive per category and their confidences
    /// do not sum to anything meaningful.
    fn from_detections(
        &self,
        tensor: &ArrayD<f32>,
    ) -> Result<Vec<CategoryScore>, ModelOutputError> {
        let shape = tensor.shape();
        if shape.len() != 3 || shape[0] != 1 || shape[2] != 6 {
            return Err(ModelOutputError::Shape(shape.to_vec()));
        }

        let mut scores = Vec::with_capacity(shape[1]);

        for row in 0..shape[1] {
            let confidence = tensor[[0, row, 4]];
            let class = tensor[[0, row, 5]];

            if !(0.0..=1.0).contains(&confidence) {
                return Err(ModelOutputError::Confidence(confidence));
            }
            if class.fract() != 0.0 || class < 0.0 || class >= HERB_CLASSES.len() as f32 {
                return Err(ModelOutputError::ClassIndex(class));
            }

            // The model's own reporting cutoff, replicated here because
            // the fused-NMS export leaves it to the consumer.
            if confidence < self.prefilter_threshold {
                continue;
            }

            scores.push(CategoryScore {
                class_id: class as usize,
                confidence,
            });
        }

        Ok(scores)
    }

    /// Classification shape: exactly one confidence per fixed category,
    /// in training order, passed through as-is.
    fn from_distribution(tensor: &ArrayD<f32>) -> Result<Vec<CategoryScore>, ModelOutputError> {
        let shape = tensor.shape();
        if shape.len() != 2 || shape[0] != 1 || shape[1] != HERB_CLASSES.len() {
            return Err(ModelOutputError::Shape(shape.to_vec()));
        }

        let mut scores = Vec::with_capacity(HERB_CLASSES.len());

        for class_id in 0..HERB_CLASSES.len() {
            let confidence = tensor[[0, class_id]];
            if !(0.0..=1.0).contains(&confidence) {
                return Err(ModelOutputError::Confidence(confidence));
            }
            scores.push(CategoryScore {
                class_id,
                confidence,
            });
        }

        Ok(scores)
    }
}
