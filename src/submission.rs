use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Single "request in flight" flag for one submit control.
#[derive(Debug, Clone, Default)]
pub struct SubmissionGate(Arc<AtomicBool>);

impl SubmissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the gate. `None` while another submission holds it.
    pub fn try_begin(&self) -> Option<SubmissionGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmissionGuard(Arc::clone(&self.0)))
    }

    pub fn is_in_flight(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Releases the gate on drop.
#[derive(Debug)]
pub struct SubmissionGuard(Arc<AtomicBool>);

impl Drop for SubmissionGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
