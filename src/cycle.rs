//! Resource cycling and deferred destruction: the central concurrency contract (§4.5, §9).
//!
//! Every mutable resource handle names a *ring of backings*. A write with `cycle = true` against
//! a bound resource advances the ring pointer instead of touching the backing currently in flight;
//! `cycle = false` always writes the current backing regardless of who else references it. This
//! module is frontend-owned state (§5: the device keeps no lock of its own per resource, but the
//! cycling ring and the disposal queue below are exactly the bookkeeping that *is* frontend-owned,
//! so they're `parking_lot`-guarded here).

use parking_lot::Mutex;
use smallvec::SmallVec;

use crate::backend::{BackingId, SubmissionId};

/// A single handle's rotating set of physical backings. Most resources never contend and stay at
/// one backing for their whole lifetime; `SmallVec` keeps that common case allocation-free.
#[derive(Debug)]
pub struct Ring {
    backings: SmallVec<[BackingId; 2]>,
    current: usize,
    /// Submission indices that have referenced the *current* backing and not yet completed.
    /// Non-empty iff the resource is "bound" per §4.5's definition.
    bound_since: SmallVec<[SubmissionId; 2]>,
}

impl Ring {
    pub fn new(initial: BackingId) -> Ring {
        Ring {
            backings: SmallVec::from_elem(initial, 1),
            current: 0,
            bound_since: SmallVec::new(),
        }
    }

    pub fn current(&self) -> BackingId {
        self.backings[self.current]
    }

    pub fn is_bound(&self) -> bool {
        !self.bound_since.is_empty()
    }

    /// Records that `submission` now references the current backing.
    pub fn mark_bound(&mut self, submission: SubmissionId) {
        if !self.bound_since.contains(&submission) {
            self.bound_since.push(submission);
        }
    }

    /// Drops completed-submission markers given the backend's last-completed index. A backing
    /// becomes unbound once every submission that touched it has completed.
    pub fn retire_completed(&mut self, last_completed: SubmissionId) {
        self.bound_since.retain(|s| *s > last_completed);
    }

    /// Resolves a write with the given `cycle` flag against the current binding state, per §4.5's
    /// three cases. Returns the backing the write should target, and optionally a retired backing
    /// that is now free to satisfy a *future* rebind without allocating (reused in place of
    /// pushing a fresh backing onto the ring, mirroring §8's "cycling a never-bound resource
    /// reuses the current backing").
    pub fn resolve_write(&mut self, cycle: bool, fresh: impl FnOnce() -> BackingId) -> BackingId {
        if !cycle || !self.is_bound() {
            return self.current();
        }
        // Bound and cycling: allocate a fresh backing and advance the ring pointer to it.
        // Retired backings are reclaimed by `drain_retired`, not reused here.
        let new_backing = fresh();
        self.backings.push(new_backing);
        self.current = self.backings.len() - 1;
        self.bound_since.clear();
        self.current()
    }

    /// Reclaims every backing except the current one; called once the deferred-destruction queue
    /// has determined they're no longer referenced by any in-flight work, via `destroy`.
    pub fn drain_retired(&mut self, mut destroy: impl FnMut(BackingId)) {
        if self.backings.len() <= 1 {
            return;
        }
        let current = self.backings[self.current];
        for (i, backing) in self.backings.drain(..).enumerate() {
            if i != self.current && backing != current {
                destroy(backing);
            }
        }
        self.backings.push(current);
        self.current = 0;
    }
}

/// An entry in the deferred-destruction queue (§9 "Manual atomic reference counts on resources").
struct PendingDestruction {
    backing: BackingId,
    recorded_at: SubmissionId,
}

/// Backing-agnostic deferred destruction: `release_<kind>` records the current submission
/// generation; the destroy callback is invoked once the backend's last-completed submission has
/// reached or passed it.
#[derive(Default)]
pub struct DisposalQueue {
    pending: Mutex<Vec<PendingDestruction>>,
}

impl DisposalQueue {
    pub fn new() -> DisposalQueue {
        DisposalQueue::default()
    }

    pub fn enqueue(&self, backing: BackingId, recorded_at: SubmissionId) {
        self.pending.lock().push(PendingDestruction {
            backing,
            recorded_at,
        });
    }

    /// Destroys every entry whose recorded generation has completed, via `destroy`.
    pub fn reclaim(&self, last_completed: SubmissionId, mut destroy: impl FnMut(BackingId)) {
        let mut pending = self.pending.lock();
        pending.retain(|entry| {
            if entry.recorded_at <= last_completed {
                destroy(entry.backing);
                false
            } else {
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbound_cycle_reuses_current_backing() {
        let mut ring = Ring::new(BackingId(1));
        let result = ring.resolve_write(true, || BackingId(2));
        assert_eq!(result, BackingId(1));
    }

    #[test]
    fn non_cycled_write_always_targets_current() {
        let mut ring = Ring::new(BackingId(1));
        ring.mark_bound(SubmissionId(1));
        let result = ring.resolve_write(false, || BackingId(2));
        assert_eq!(result, BackingId(1));
    }

    #[test]
    fn bound_cycle_rotates_to_a_fresh_backing() {
        let mut ring = Ring::new(BackingId(1));
        ring.mark_bound(SubmissionId(1));
        let result = ring.resolve_write(true, || BackingId(2));
        assert_eq!(result, BackingId(2));
        assert!(!ring.is_bound());
    }

    #[test]
    fn disposal_queue_waits_for_completion() {
        let queue = DisposalQueue::new();
        queue.enqueue(BackingId(7), SubmissionId(5));
        let mut destroyed = Vec::new();
        queue.reclaim(SubmissionId(4), |id| destroyed.push(id));
        assert!(destroyed.is_empty());
        queue.reclaim(SubmissionId(5), |id| destroyed.push(id));
        assert_eq!(destroyed, vec![BackingId(7)]);
    }
}
