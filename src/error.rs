use reqwest::StatusCode;
use thiserror::Error;

/// Failures raised by the transport talking to the subjects endpoint.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("server responded with {status}: {body}")]
  Status { status: StatusCode, body: String },
  #[error("unable to decode response: {0}")]
  Decode(#[from] serde_json::Error),
  #[error("invalid url: {0}")]
  InvalidUrl(#[from] url::ParseError),
}

/// Failures of the catalog operations, one per remote call.
#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("failed to fetch disciplines: {0}")]
  FetchFailed(#[source] ApiError),
  #[error("failed to create discipline: {0}")]
  CreateFailed(#[source] ApiError),
  #[error("failed to delete discipline: {0}")]
  DeleteFailed(#[source] ApiError),
}
