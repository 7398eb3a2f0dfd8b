use crate::error::ClassifyError;
use std::time::Duration;

/// Downloads raw image bytes from a caller-supplied URL.
///
/// One attempt per request, bounded by the client timeout. A failed fetch
/// is terminal for the request; retrying is the caller's business.
pub struct ImageFetcher {
    http: reqwest::Client,
}

impl ImageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ClassifyError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, ClassifyError> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifyError::FetchStatus {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        tracing::debug!(url, bytes = bytes.len(), "image downloaded");
        Ok(bytes.to_vec())
    }
}
