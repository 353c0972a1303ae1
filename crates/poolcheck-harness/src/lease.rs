//! Scoped ownership of a case's pool.

use poolcheck_common::error::Result;
use poolcheck_core::cancel::CancellationScope;
use poolcheck_core::provision::ResourceHandle;

/// Holds the pool of the running case until the runner decides its fate.
///
/// Exactly one of [`release`](Self::release) or [`keep`](Self::keep) is
/// expected. If neither happens (the runner itself unwinds), the pool is
/// destroyed on drop.
///
/// Teardown runs under its own scope: cancelling the run stops new work,
/// never the cleanup of a pool that already exists.
pub(crate) struct Lease<H: ResourceHandle> {
    handle: Option<H>,
    teardown: CancellationScope,
}

impl<H: ResourceHandle> Lease<H> {
    pub(crate) fn new(handle: H) -> Self {
        Self {
            handle: Some(handle),
            teardown: CancellationScope::new(),
        }
    }

    pub(crate) fn name(&self) -> &str {
        self.handle.as_ref().map_or("", ResourceHandle::name)
    }

    /// Destroys the pool.
    pub(crate) fn release(mut self) -> Result<()> {
        match self.handle.take() {
            Some(handle) => handle.destroy(&self.teardown),
            None => Ok(()),
        }
    }

    /// Abandons the pool without destroying it and returns its name.
    pub(crate) fn keep(mut self) -> String {
        self.handle
            .take()
            .map(|handle| handle.name().to_string())
            .unwrap_or_default()
    }
}

impl<H: ResourceHandle> Drop for Lease<H> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let pool = handle.name().to_string();
            tracing::warn!(pool = %pool, "pool lease dropped without a decision; destroying");
            if let Err(e) = handle.destroy(&self.teardown) {
                tracing::error!(pool = %pool, error = %e, "error destroying test pool");
            }
        }
    }
}
