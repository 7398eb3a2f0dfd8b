use thiserror::Error;

/// Request-scoped failures that surface to the caller.
///
/// Model output anomalies are deliberately absent from this taxonomy: an
/// uninterpretable model response is recovered inside the score extractor
/// as "no detections" and never reaches the caller as an error.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("no image_url provided")]
    MissingImageUrl,

    #[error("failed to download image ({status})")]
    FetchStatus { status: u16 },

    #[error("failed to download image: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image preprocessing failed: {0}")]
    Preprocess(#[source] anyhow::Error),

    #[error("inference failed: {0}")]
    Inference(#[source] anyhow::Error),
}

impl ClassifyError {
    /// True when the caller supplied something unusable (400 semantics).
    /// Everything else is an internal fault (500 semantics).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ClassifyError::MissingImageUrl
                | ClassifyError::FetchStatus { .. }
                | ClassifyError::Fetch(_)
                | ClassifyError::Decode(_)
        )
    }
}
