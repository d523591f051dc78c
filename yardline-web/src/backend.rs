//! Web-specific backend access.
//!
//! Polls the scoring backend over HTTP when one is reachable and falls
//! back to the embedded fleet log otherwise, so the demo works served as
//! plain static files. Failures are logged and degrade to the last-known
//! data; they never surface as hard errors.

use yardline_sim::{EmbeddedFleetProvider, Recommendation, StatusProvider, StatusRecord};

pub const STATUS_ENDPOINT: &str = "/api/current_status";
pub const RECOMMENDATION_ENDPOINT: &str = "/api/recommendation";

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Network(String),
    #[error("JSON parsing error: {0}")]
    Json(String),
}

/// Fetch both backend sequences from the embedded provider.
#[must_use]
pub fn embedded_feed() -> (Vec<StatusRecord>, Vec<Recommendation>) {
    let provider = EmbeddedFleetProvider::shared();
    let status = provider.fetch_status().unwrap_or_default();
    let recommendations = provider.fetch_recommendations().unwrap_or_default();
    (status, recommendations)
}

#[cfg(target_arch = "wasm32")]
async fn fetch_json<T>(url: &str) -> Result<T, BackendError>
where
    T: serde::de::DeserializeOwned,
{
    let response = gloo_net::http::Request::get(url)
        .send()
        .await
        .map_err(|err| BackendError::Network(err.to_string()))?;
    if !response.ok() {
        return Err(BackendError::Network(format!(
            "{url} returned {}",
            response.status()
        )));
    }
    response
        .json::<T>()
        .await
        .map_err(|err| BackendError::Json(err.to_string()))
}

/// Poll the live backend for both sequences.
///
/// # Errors
///
/// Returns an error if either endpoint is unreachable or malformed; the
/// caller keeps its last-known data in that case.
#[cfg(target_arch = "wasm32")]
pub async fn fetch_live_feed() -> Result<(Vec<StatusRecord>, Vec<Recommendation>), BackendError> {
    let status = fetch_json::<Vec<StatusRecord>>(STATUS_ENDPOINT).await?;
    let recommendations = fetch_json::<Vec<Recommendation>>(RECOMMENDATION_ENDPOINT).await?;
    Ok((status, recommendations))
}
