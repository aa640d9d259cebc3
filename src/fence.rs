//! Fences: one-shot completion signals, pooled by the device (§3, §4.1, §5).
//!
//! A fence returned by `submit_and_acquire_fence` must be released exactly once by the caller
//! (§3 invariant 5); leaking one is a programmer error the core can't detect, only the backend's
//! pool exhaustion eventually surfaces it (§5).

use crate::backend::{BackendFenceId, SubmissionId};
use crate::handle::FenceHandle;

/// What the device's fence table stores per live [`FenceHandle`].
pub struct FenceEntry {
    pub backend_fence: BackendFenceId,
    /// The submission this fence is watching; used to drive the disposal queue even if the
    /// caller queries the fence directly instead of going through `wait`.
    pub submission: SubmissionId,
}
