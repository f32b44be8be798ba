//! Failure classification for the resume upload collaborator.
//!
//! The upload view lives outside the session core, but it needs to tell a
//! plan limit apart from an ordinary failure so it can offer an upgrade
//! instead of a retry.

#[cfg(test)]
#[path = "upload_test.rs"]
mod upload_test;

use super::transport::{ApiResponse, TransportError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("plan limit reached: {0}")]
    PlanLimitReached(String),
    #[error("upload failed: {0}")]
    Failed(String),
}

impl UploadError {
    /// Classify a non-2xx upload response. `403`, or any message mentioning
    /// a limit, is a plan limit.
    #[must_use]
    pub fn classify(status: u16, message: &str) -> Self {
        if status == 403 || message.to_ascii_lowercase().contains("limit") {
            Self::PlanLimitReached(message.to_owned())
        } else {
            Self::Failed(format!("status {status}: {message}"))
        }
    }

    /// Classify a completed upload exchange. `Ok` for 2xx.
    ///
    /// # Errors
    ///
    /// Returns the classified failure for transport errors and non-2xx
    /// responses.
    pub fn check(outcome: Result<&ApiResponse, &TransportError>) -> Result<(), Self> {
        match outcome {
            Ok(resp) if resp.is_success() => Ok(()),
            Ok(resp) => Err(Self::classify(resp.status, &resp.error_message())),
            Err(err) => Err(Self::Failed(err.to_string())),
        }
    }

    #[must_use]
    pub fn is_plan_limit(&self) -> bool {
        matches!(self, Self::PlanLimitReached(_))
    }
}
