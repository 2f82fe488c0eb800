use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("a round trip is already in flight")]
    RequestInFlight,
    #[error("backend request failed: {0:#}")]
    Backend(anyhow::Error),
    #[error("malformed processing result: {0}")]
    MalformedResult(&'static str),
}
