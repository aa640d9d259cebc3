//! The crate's error type.
//!
//! Only the handful of failures §7 allows to surface as `Result::Err` live here
//! (`invalid-argument` at device-creation boundaries and transpile failure). Everything else in
//! §7's policy table — `state-violation`, `backend-substitute`, `transient-swapchain` — is *not*
//! an error value: it is logged via [`log`] and either no-ops or returns `None`/`null`, exactly
//! as the policy table prescribes.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RefreshError {
    #[error("no backend driver succeeded its prepare() check")]
    NoBackendAvailable,

    #[error("REFRESH_HINT_BACKEND names an unavailable backend: {0}")]
    BackendHintUnavailable(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("shader transpile failed: {0}")]
    TranspileFailed(String),

    #[error("device lost")]
    DeviceLost,

    #[error("backend error: {0}")]
    Backend(String),
}

pub use RefreshError as Error;

pub type Result<T> = std::result::Result<T, Error>;
