use anyhow::Context;
use std::path::Path;

/// Fetch the weight file from remote storage if it is not already on
/// disk.
///
/// Runs once at process start, before the backend loads the model; a
/// failure here fails startup, never an individual request.
pub async fn ensure_weights(model_path: &str, weights_url: &str) -> anyhow::Result<()> {
    if Path::new(model_path).exists() {
        tracing::debug!(model_path, "model weights already present");
        return Ok(());
    }

    tracing::info!(model_path, weights_url, "downloading model weights");

    let response = reqwest::get(weights_url).await?;
    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("failed to download weights ({})", status);
    }

    let bytes = response.bytes().await?;

    if let Some(parent) = Path::new(model_path).parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    tokio::fs::write(model_path, &bytes)
        .await
        .with_context(|| format!("writing {}", model_path))?;

    tracing::info!(bytes = bytes.len(), "weights download complete");
    Ok(())
}
