//! The human-readable progress stream of a run.

use poolcheck_common::error::PoolcheckError;

use crate::case::TestCase;

/// Receives progress events from the [`Runner`](crate::runner::Runner).
///
/// This is the operator-facing stream (banners, failure text). Diagnostic
/// logging goes through `tracing` independently.
pub trait Reporter {
    /// A case is about to be provisioned and run.
    fn case_started(&mut self, case: &TestCase);

    /// The case succeeded.
    fn case_succeeded(&mut self, case: &TestCase);

    /// The case failed; `error` carries the full cause chain.
    fn case_failed(&mut self, case: &TestCase, error: &anyhow::Error);

    /// Destroying the case's pool failed. Does not change the case outcome.
    fn teardown_failed(&mut self, case: &TestCase, error: &PoolcheckError);

    /// The run stopped at `case` and its pool was kept for inspection.
    fn run_stopped(&mut self, case: &TestCase);

    /// The run stopped before `next` because the run was cancelled.
    fn run_cancelled(&mut self, next: &TestCase) {
        let _ = next;
    }

    /// The runner moves on to the next case.
    fn case_finished(&mut self) {}
}
