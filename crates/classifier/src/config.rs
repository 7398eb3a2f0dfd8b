use std::env;

pub const DEFAULT_INPUT_SIZE: (u32, u32) = (640, 640);

/// Which response shape the deployed model produces.
///
/// Declared at configuration time: a deployment knows in advance whether
/// it runs a detector or a whole-image classifier, so nothing probes the
/// output tensor at request time to guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLayout {
    /// Detection head: `[1, N, 6]` rows of boxes with confidence and class.
    Detection,
    /// Classification head: `[1, 6]` confidences, one per category.
    Classification,
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub model_path: String,
    pub weights_url: Option<String>,
    pub output_layout: OutputLayout,
    pub input_size: (u32, u32),
    pub classification_threshold: f32,
    pub prefilter_threshold: f32,
    pub fetch_timeout_secs: u64,
}

impl ClassifierConfig {
    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> anyhow::Result<Self> {
        let model_path =
            env::var("MODEL_PATH").unwrap_or_else(|_| "models/best.onnx".to_string());

        let weights_url = env::var("WEIGHTS_URL").ok().filter(|s| !s.is_empty());

        let output_layout = match env::var("MODEL_OUTPUT")
            .unwrap_or_else(|_| "detection".to_string())
            .to_lowercase()
            .as_str()
        {
            "detection" => OutputLayout::Detection,
            "classification" => OutputLayout::Classification,
            other => anyhow::bail!(
                "{} is not a supported model output layout. Use either `detection` or `classification`.",
                other
            ),
        };

        let input_width = env::var("INPUT_WIDTH")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_INPUT_SIZE.0);

        let input_height = env::var("INPUT_HEIGHT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_INPUT_SIZE.1);

        let classification_threshold = env::var("CLASSIFICATION_THRESHOLD")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.8);

        let prefilter_threshold = env::var("PREFILTER_THRESHOLD")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.25);

        let fetch_timeout_secs = env::var("FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        Ok(Self {
            model_path,
            weights_url,
            output_layout,
            input_size: (input_width, input_height),
            classification_threshold,
            prefilter_threshold,
            fetch_timeout_secs,
        })
    }

    /// Create default configuration for testing
    #[cfg(test)]
    pub fn test_default() -> Self {
        Self {
            model_path: "models/best.onnx".to_string(),
            weights_url: None,
            output_layout: OutputLayout::Detection,
            input_size: (640, 640),
            classification_threshold: 0.8,
            prefilter_threshold: 0.25,
            fetch_timeout_secs: 10,
        }
    }
}
