//! Run-wide cancellation.
//!
//! Cancellation is advisory: nothing interrupts a running operation, but
//! executors refuse to start new commands and the runner refuses to start
//! new cases once the scope is cancelled.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use poolcheck_common::error::{PoolcheckError, Result};

/// Shared cancellation flag threaded through a whole test run.
///
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationScope {
    cancelled: Arc<AtomicBool>,
}

impl CancellationScope {
    /// Creates a scope that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the scope, and every clone of it, as cancelled.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns whether [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fails with [`PoolcheckError::Cancelled`] if the scope is cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error once the scope has been cancelled.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(PoolcheckError::Cancelled)
        } else {
            Ok(())
        }
    }
}
