use super::{InferenceBackend, RawModelOutput};
use crate::config::OutputLayout;
use ndarray::{Array, IxDyn};
use ort::{
    session::{Session, builder::GraphOptimizationLevel},
    value::TensorRef,
};

// Tensor names as produced by the ultralytics ONNX export.
const INPUT_NAME: &str = "images";
const OUTPUT_NAME: &str = "output0";

pub struct OrtBackend {
    session: Session,
    layout: OutputLayout,
}

impl InferenceBackend for OrtBackend {
    fn load_model(path: &str, layout: OutputLayout) -> anyhow::Result<Self> {
        // Initialize ORT environment (idempotent)
        let _ = ort::init().commit();

        tracing::info!("Initializing ONNX Runtime with CPU execution provider");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(4)?
            .commit_from_file(path)?;

        tracing::info!("Model loaded from {}", path);
        Ok(Self { session, layout })
    }

    fn infer(&mut self, input: &Array<f32, IxDyn>) -> anyhow::Result<RawModelOutput> {
        let outputs = self.session.run(ort::inputs![
            INPUT_NAME => TensorRef::from_array_view(input.view())?
        ])?;

        let tensor: ndarray::ArrayViewD<f32> = outputs[OUTPUT_NAME].try_extract_array()?;

        Ok(match self.layout {
            OutputLayout::Detection => RawModelOutput::Detections(tensor.into_owned()),
            OutputLayout::Classification => RawModelOutput::Distribution(tensor.into_owned()),
        })
    }
}
