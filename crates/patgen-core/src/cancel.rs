// Cooperative cancellation shared between a caller and a long-running phase.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::PatternError;

/// Cloneable cancellation handle.
///
/// All clones observe the same flag. The pipeline polls it at loop
/// boundaries only, so a cancelled operation never leaves a half-swapped
/// index array behind; the owning instance must still be discarded.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    flag: Arc<AtomicBool>,
}

impl CancelFlag {
    /// Create a flag that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Safe to call from any thread.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Return `Err(PatternError::Cancelled)` once cancellation was requested.
    #[inline]
    pub fn check(&self) -> Result<(), PatternError> {
        if self.is_cancelled() {
            Err(PatternError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_flag_passes() {
        let flag = CancelFlag::new();
        assert!(!flag.is_cancelled());
        assert!(flag.check().is_ok());
    }

    #[test]
    fn clones_share_state() {
        let flag = CancelFlag::new();
        let other = flag.clone();
        other.cancel();
        assert!(flag.is_cancelled());
        assert_eq!(flag.check(), Err(PatternError::Cancelled));
    }

    #[test]
    fn cancel_from_another_thread() {
        let flag = CancelFlag::new();
        let remote = flag.clone();
        std::thread::spawn(move || remote.cancel())
            .join()
            .unwrap();
        assert!(flag.is_cancelled());
    }
}
