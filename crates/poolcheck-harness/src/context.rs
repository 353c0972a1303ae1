//! Per-case execution context.

use std::rc::Rc;

use poolcheck_common::constants::ROOT_DATASET;
use poolcheck_common::types::PoolName;
use poolcheck_core::cancel::CancellationScope;
use poolcheck_core::exec::Execer;

/// Everything a case body gets to work with. Lives for one case invocation.
pub struct TestContext {
    scope: CancellationScope,
    span: tracing::Span,
    root_dataset: String,
    execer: Rc<dyn Execer>,
}

impl TestContext {
    /// Builds the context for a case running against `pool`.
    ///
    /// The working dataset is `<pool>/rootds`; the case creates it itself.
    #[must_use]
    pub fn new(
        scope: CancellationScope,
        span: tracing::Span,
        pool: &str,
        execer: Rc<dyn Execer>,
    ) -> Self {
        Self {
            scope,
            span,
            root_dataset: PoolName::new(pool).dataset(ROOT_DATASET),
            execer,
        }
    }

    /// Dataset the case works under.
    #[must_use]
    pub fn root_dataset(&self) -> &str {
        &self.root_dataset
    }

    /// The run's cancellation scope.
    #[must_use]
    pub const fn scope(&self) -> &CancellationScope {
        &self.scope
    }

    /// Tracing span of the running case; case logs are parented to it.
    #[must_use]
    pub const fn span(&self) -> &tracing::Span {
        &self.span
    }

    /// Executor for `zfs`/`zpool` commands issued by the case.
    #[must_use]
    pub fn executor(&self) -> &dyn Execer {
        &*self.execer
    }
}

impl std::fmt::Debug for TestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestContext")
            .field("scope", &self.scope)
            .field("span", &self.span)
            .field("root_dataset", &self.root_dataset)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use poolcheck_core::exec::Executor;

    use super::*;

    fn ctx(scope: CancellationScope) -> TestContext {
        TestContext::new(scope, tracing::Span::none(), "tank", Rc::new(Executor::new()))
    }

    #[test]
    fn root_dataset_is_below_the_pool() {
        assert_eq!(ctx(CancellationScope::new()).root_dataset(), "tank/rootds");
    }

    #[test]
    fn context_shares_the_run_scope() {
        let scope = CancellationScope::new();
        let ctx = ctx(scope.clone());
        scope.cancel();
        assert!(ctx.scope().is_cancelled());
    }
}
