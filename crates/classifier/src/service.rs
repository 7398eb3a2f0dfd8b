use crate::{
    backend::InferenceBackend,
    config::ClassifierConfig,
    decision::{Decision, DecisionEngine},
    diagnostics,
    error::ClassifyError,
    extractor::ScoreExtractor,
    fetch::ImageFetcher,
    preprocessing::PreProcessor,
};
use opentelemetry::{
    global,
    metrics::{Counter, Histogram},
};
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct ServiceMetrics {
    duration: Histogram<f64>,
    predictions: Counter<u64>,
    rejections: Counter<u64>,
}

fn init_metrics(meter_name: &'static str) -> ServiceMetrics {
    let meter = global::meter(meter_name);
    let latency_buckets = [
        0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.15, 0.2, 0.3, 0.5, 0.75, 1.0, 2.0, 5.0, 10.0,
    ];
    let duration: Histogram<f64> = meter
        .f64_histogram("prediction_duration_seconds")
        .with_description("Time to classify one image (preprocess + infer + decide)")
        .with_unit("s")
        .with_boundaries(latency_buckets.to_vec())
        .build();
    let predictions: Counter<u64> = meter
        .u64_counter("predictions_total")
        .with_description("Total classification decisions produced")
        .build();
    let rejections: Counter<u64> = meter
        .u64_counter("predictions_rejected_total")
        .with_description("Decisions that fell back to the rejection label")
        .build();

    ServiceMetrics {
        duration,
        predictions,
        rejections,
    }
}

/// One request in, one decision out.
///
/// The backend handle is process-wide, loaded once and immutable; the
/// mutex serializes access to the inference session only, so concurrent
/// requests stay independent everywhere else in the pipeline.
pub struct ClassifierService<B: InferenceBackend> {
    backend: Mutex<B>,
    fetcher: ImageFetcher,
    preprocessor: PreProcessor,
    extractor: ScoreExtractor,
    engine: DecisionEngine,
    metrics: ServiceMetrics,
}

impl<B: InferenceBackend> ClassifierService<B> {
    pub fn new(backend: B, config: &ClassifierConfig) -> Result<Self, ClassifyError> {
        Ok(Self {
            backend: Mutex::new(backend),
            fetcher: ImageFetcher::new(Duration::from_secs(config.fetch_timeout_secs))?,
            preprocessor: PreProcessor::new(config.input_size),
            extractor: ScoreExtractor::new(config.prefilter_threshold),
            engine: DecisionEngine::new(config.classification_threshold),
            metrics: init_metrics("classifier"),
        })
    }

    /// Full pipeline for one request: fetch, prepare, infer, decide.
    ///
    /// A failed fetch is terminal; the model is never invoked for it.
    pub async fn classify(&self, image_url: &str) -> Result<Decision, ClassifyError> {
        if image_url.trim().is_empty() {
            return Err(ClassifyError::MissingImageUrl);
        }

        let bytes = self.fetcher.fetch(image_url).await?;
        self.classify_bytes(&bytes)
    }

    /// Pipeline from raw image bytes onward.
    ///
    /// Byte-identical input against an unchanged model yields the
    /// identical decision on every call.
    pub fn classify_bytes(&self, bytes: &[u8]) -> Result<Decision, ClassifyError> {
        let start = Instant::now();

        let input = self.preprocessor.prepare(bytes)?;

        let output = {
            let _infer_span = tracing::info_span!("model_inference").entered();
            let mut backend = self
                .backend
                .lock()
                .map_err(|_| ClassifyError::Inference(anyhow::anyhow!("model session poisoned")))?;
            backend.infer(&input).map_err(ClassifyError::Inference)?
        };

        let scores = self.extractor.extract(&output);
        let decision = self.engine.decide(&scores);

        diagnostics::record(&scores, &decision);

        self.metrics
            .duration
            .record(start.elapsed().as_secs_f64(), &[]);
        self.metrics.predictions.add(1, &[]);
        if decision == Decision::NotAHerb {
            self.metrics.rejections.add(1, &[]);
        }

        Ok(decision)
    }
}
