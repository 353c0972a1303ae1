//! The test runner: one fresh pool per case, failures contained per case.

use std::rc::Rc;

use poolcheck_common::config::ProvisionConfig;
use poolcheck_common::error::Result;
use poolcheck_core::cancel::CancellationScope;
use poolcheck_core::exec::{Execer, Executor};
use poolcheck_core::provision::ResourceProvisioner;

use crate::case::TestCase;
use crate::context::TestContext;
use crate::fault;
use crate::lease::Lease;
use crate::outcome::{CaseReport, Outcome, RunSummary};
use crate::report::Reporter;

/// What to do when a case fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Destroy the failed case's pool and run the next case.
    #[default]
    Continue,
    /// Keep the failed case's pool as it is and stop the run.
    StopAndKeepPool,
}

impl FailurePolicy {
    /// Maps the `failure.stop-and-keep-pool` flag to a policy.
    #[must_use]
    pub const fn from_stop_and_keep(stop_and_keep: bool) -> Self {
        if stop_and_keep {
            Self::StopAndKeepPool
        } else {
            Self::Continue
        }
    }

    const fn stops_on_failure(self) -> bool {
        matches!(self, Self::StopAndKeepPool)
    }
}

/// Runs test cases strictly one after another.
///
/// Per case: provision a pool, run the body against it with panics
/// contained, then destroy the pool unless the case failed under
/// [`FailurePolicy::StopAndKeepPool`]. At most one pool is live at a time.
pub struct Runner<P, R> {
    provisioner: P,
    reporter: R,
    config: ProvisionConfig,
    policy: FailurePolicy,
    scope: CancellationScope,
    execer: Rc<dyn Execer>,
}

impl<P: ResourceProvisioner, R: Reporter> Runner<P, R> {
    /// Creates a runner.
    ///
    /// # Errors
    ///
    /// Returns [`PoolcheckError::Config`](poolcheck_common::error::PoolcheckError::Config)
    /// if `config` is invalid. This is the only error a runner ever returns.
    pub fn new(
        provisioner: P,
        reporter: R,
        config: ProvisionConfig,
        scope: CancellationScope,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            provisioner,
            reporter,
            config,
            policy: FailurePolicy::default(),
            scope,
            execer: Rc::new(Executor::new()),
        })
    }

    /// Sets the failure policy.
    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the executor case bodies run their commands through.
    ///
    /// Defaults to an [`Executor`] spawning real processes.
    #[must_use]
    pub fn with_execer(mut self, execer: Rc<dyn Execer>) -> Self {
        self.execer = execer;
        self
    }

    /// Returns the reporter.
    pub const fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Consumes the runner, returning the reporter.
    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// Runs `cases` in order.
    ///
    /// Never fails: every case failure, including panics, ends up as an
    /// [`Outcome`] in the returned summary.
    pub fn run(&mut self, cases: &[TestCase]) -> RunSummary {
        let mut summary = RunSummary::default();

        // Each case is taken by value; a parallel runner would need the same.
        for case in cases.iter().copied() {
            if self.scope.is_cancelled() {
                tracing::warn!(next = case.name, "run cancelled");
                self.reporter.run_cancelled(&case);
                summary.cancelled = true;
                break;
            }

            let outcome = self.run_case(case);
            match outcome.error() {
                None => self.reporter.case_succeeded(&case),
                Some(err) => self.reporter.case_failed(&case, err),
            }

            let stop = outcome.is_failure() && self.policy.stops_on_failure();
            summary.reports.push(CaseReport {
                name: case.name,
                outcome,
            });
            if stop {
                self.reporter.run_stopped(&case);
                summary.stopped_early = true;
                break;
            }
            self.reporter.case_finished();
        }

        tracing::info!(
            passed = summary.passed(),
            failed = summary.failed(),
            stopped_early = summary.stopped_early,
            cancelled = summary.cancelled,
            "run finished"
        );
        summary
    }

    fn run_case(&mut self, case: TestCase) -> Outcome {
        let span = tracing::info_span!("case", case = case.name);
        let _entered = span.enter();
        self.reporter.case_started(&case);

        let handle = match self.provisioner.provision(&self.scope, &self.config) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(error = %e, "provisioning failed");
                return Outcome::Failed(anyhow::Error::new(e).context("create test pool"));
            }
        };

        let lease = Lease::new(handle);
        let ctx = TestContext::new(
            self.scope.clone(),
            span.clone(),
            lease.name(),
            Rc::clone(&self.execer),
        );
        let outcome = fault::invoke(&case, &ctx);
        drop(ctx);

        if outcome.is_failure() && self.policy.stops_on_failure() {
            let pool = lease.keep();
            tracing::warn!(pool = %pool, "keeping pool of failed test case");
        } else if let Err(e) = lease.release() {
            tracing::warn!(error = %e, "error destroying test pool");
            self.reporter.teardown_failed(&case, &e);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_and_keep_flag_selects_policy() {
        assert_eq!(
            FailurePolicy::from_stop_and_keep(true),
            FailurePolicy::StopAndKeepPool
        );
        assert_eq!(FailurePolicy::from_stop_and_keep(false), FailurePolicy::Continue);
        assert_eq!(FailurePolicy::default(), FailurePolicy::Continue);
    }
}
