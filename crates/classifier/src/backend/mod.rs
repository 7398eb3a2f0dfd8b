use crate::config::OutputLayout;
use ndarray::{Array, ArrayD, IxDyn};

#[cfg(feature = "ort-backend")]
pub mod ort;

/// Raw classifier response, tagged with the layout declared at
/// configuration time.
///
/// The tensors are passed through opaque; interpreting them is the score
/// extractor's job, so neither shape ever leaks into the threshold logic.
#[derive(Debug, Clone)]
pub enum RawModelOutput {
    /// `[1, N, 6]` rows of `(x1, y1, x2, y2, confidence, class)`.
    Detections(ArrayD<f32>),
    /// `[1, 6]` whole-image confidences, one per category in training order.
    Distribution(ArrayD<f32>),
}

/// An explicitly constructed handle to the loaded model weights.
///
/// Weights are loaded once at process start and are immutable afterwards;
/// handing the handle in at construction time (instead of a module-level
/// singleton) is what makes test doubles and read-only sharing possible.
pub trait InferenceBackend {
    fn load_model(path: &str, layout: OutputLayout) -> anyhow::Result<Self>
    where
        Self: Sized;

    /// Run the model once over a prepared `[1, 3, H, W]` input.
    fn infer(&mut self, input: &Array<f32, IxDyn>) -> anyhow::Result<RawModelOutput>;
}
