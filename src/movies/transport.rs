//! HTTP transport shared by every request to the movie service.
//!
//! One reqwest client configured with the base URL and a fixed timeout.
//! All failures are normalized into [`TransportError`] so callers can
//! render them from state instead of handling reqwest's error surface.

use color_eyre::{eyre::eyre, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Normalized failure from a single request. No retries happen at this
/// layer; whatever policy callers want is theirs to build.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
  /// Timeout or unreachable host.
  #[error("network failure: {0}")]
  NetworkFailure(String),
  /// The service answered with a 4xx/5xx status.
  #[error("service returned HTTP {status}")]
  HttpError { status: u16, body: Option<String> },
  /// 2xx response whose body did not parse as the expected JSON.
  #[error("malformed response body: {0}")]
  DecodeFailure(String),
}

impl TransportError {
  fn from_reqwest(err: reqwest::Error) -> Self {
    if err.is_decode() {
      TransportError::DecodeFailure(err.to_string())
    } else {
      // Timeouts, connect errors, and request build failures all read
      // the same from the caller's side: the service was not reached.
      TransportError::NetworkFailure(err.to_string())
    }
  }
}

/// HTTP client bound to the movie service's base URL.
#[derive(Debug, Clone)]
pub struct Transport {
  http: reqwest::Client,
  base_url: Url,
}

impl Transport {
  /// Build a transport for the given base URL with a per-request timeout.
  pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
    let base_url =
      Url::parse(base_url).map_err(|e| eyre!("Invalid base URL {}: {}", base_url, e))?;

    let http = reqwest::Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

    Ok(Self { http, base_url })
  }

  fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
    self
      .base_url
      .join(path.trim_start_matches('/'))
      .map_err(|e| TransportError::NetworkFailure(format!("invalid request path {}: {}", path, e)))
  }

  /// GET `path` with query parameters and decode the JSON body.
  pub async fn get_json<T: DeserializeOwned>(
    &self,
    path: &str,
    params: &[(&str, String)],
  ) -> Result<T, TransportError> {
    let mut url = self.endpoint(path)?;
    for (name, value) in params {
      url.query_pairs_mut().append_pair(name, value);
    }

    let started = std::time::Instant::now();
    let response = self
      .http
      .get(url)
      .send()
      .await
      .map_err(TransportError::from_reqwest)?;
    debug!(path, status = %response.status(), elapsed_ms = started.elapsed().as_millis() as u64, "GET");

    Self::decode(response).await
  }

  /// POST a JSON body to `path` and decode the JSON response.
  pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
    &self,
    path: &str,
    body: &B,
  ) -> Result<T, TransportError> {
    let url = self.endpoint(path)?;

    let started = std::time::Instant::now();
    let response = self
      .http
      .post(url)
      .json(body)
      .send()
      .await
      .map_err(TransportError::from_reqwest)?;
    debug!(path, status = %response.status(), elapsed_ms = started.elapsed().as_millis() as u64, "POST");

    Self::decode(response).await
  }

  async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, TransportError> {
    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
      // Capture the body when we can; error pages are useful in logs.
      let body = response.text().await.ok().filter(|b| !b.is_empty());
      return Err(TransportError::HttpError {
        status: status.as_u16(),
        body,
      });
    }

    let bytes = response
      .bytes()
      .await
      .map_err(TransportError::from_reqwest)?;
    serde_json::from_slice(&bytes).map_err(|e| TransportError::DecodeFailure(e.to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_new_rejects_invalid_base_url() {
    assert!(Transport::new("not a url", Duration::from_secs(12)).is_err());
  }

  #[test]
  fn test_endpoint_joins_relative_paths() {
    let transport = Transport::new("http://localhost:8000", Duration::from_secs(12)).unwrap();
    let url = transport.endpoint("/api/movies/trending").unwrap();
    assert_eq!(url.as_str(), "http://localhost:8000/api/movies/trending");
  }

  #[test]
  fn test_error_display() {
    let err = TransportError::HttpError {
      status: 502,
      body: None,
    };
    assert_eq!(err.to_string(), "service returned HTTP 502");

    let err = TransportError::NetworkFailure("timed out".to_string());
    assert!(err.to_string().contains("timed out"));
  }

  #[tokio::test]
  async fn test_unreachable_host_is_network_failure() {
    // Reserved TEST-NET-1 address; nothing listens there.
    let transport = Transport::new("http://192.0.2.1:9", Duration::from_millis(200)).unwrap();
    let result: Result<serde_json::Value, _> = transport.get_json("/api/ping", &[]).await;
    assert!(matches!(result, Err(TransportError::NetworkFailure(_))));
  }
}
