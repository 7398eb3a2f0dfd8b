use classifier::{ClassifierConfig, ClassifierService, InferenceBackend, weights};
use common::TelemetryGuard;
use gateway::{
    config::get_configuration, logging::setup_logging, routes::create_router, state::AppState,
};
use std::sync::Arc;

#[cfg(feature = "ort-backend")]
use classifier::backend::ort::OrtBackend as Backend;

#[cfg(not(feature = "ort-backend"))]
compile_error!("The 'ort-backend' feature must be enabled to serve predictions");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = get_configuration()?;

    let _telemetry = config
        .otel_endpoint
        .as_ref()
        .map(|endpoint| TelemetryGuard::init("gateway", endpoint))
        .transpose()?;

    setup_logging(&config);

    let classifier_config = ClassifierConfig::from_env()?;

    tracing::info!(
        config = ?classifier_config,
        "Loaded configuration"
    );

    if let Some(weights_url) = classifier_config.weights_url.clone() {
        weights::ensure_weights(&classifier_config.model_path, &weights_url).await?;
    }

    tracing::info!("Loading classifier model");
    let backend = Backend::load_model(
        &classifier_config.model_path,
        classifier_config.output_layout,
    )?;
    tracing::info!("Model loaded successfully");

    let service = ClassifierService::new(backend, &classifier_config)?;
    let state = AppState {
        service: Arc::new(service),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Gateway listening");

    axum::serve(listener, app).await?;

    Ok(())
}
