use classifier::{ClassifierService, InferenceBackend};
use std::sync::Arc;

pub struct AppState<B: InferenceBackend> {
    pub service: Arc<ClassifierService<B>>,
}

// Manual impl: deriving Clone would needlessly require B: Clone.
impl<B: InferenceBackend> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}
