//! Per-case outcomes and the run summary.

/// Result of running one test case.
#[derive(Debug)]
pub enum Outcome {
    /// The case body returned `Ok`.
    Success,
    /// Provisioning failed or the case body returned an error.
    Failed(anyhow::Error),
    /// The case body panicked; the panic was contained.
    FailedContainingFault(anyhow::Error),
}

impl Outcome {
    /// Returns whether the case failed in any way.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        !matches!(self, Self::Success)
    }

    /// The failure, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Success => None,
            Self::Failed(err) | Self::FailedContainingFault(err) => Some(err),
        }
    }
}

/// Outcome of one case, as recorded by the runner.
#[derive(Debug)]
pub struct CaseReport {
    /// Name of the case.
    pub name: &'static str,
    /// What happened.
    pub outcome: Outcome,
}

/// Everything a run produced. Only kept for display.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// One entry per case that started, in run order.
    pub reports: Vec<CaseReport>,
    /// The run stopped at a failing case per the stop-and-keep policy.
    pub stopped_early: bool,
    /// The run stopped because the cancellation scope was cancelled.
    pub cancelled: bool,
}

impl RunSummary {
    /// Number of successful cases.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.reports.iter().filter(|r| !r.outcome.is_failure()).count()
    }

    /// Number of failed cases.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.reports.len() - self.passed()
    }

    /// Returns whether every case that ran succeeded.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_outcomes() {
        let summary = RunSummary {
            reports: vec![
                CaseReport {
                    name: "a",
                    outcome: Outcome::Success,
                },
                CaseReport {
                    name: "b",
                    outcome: Outcome::Failed(anyhow::anyhow!("nope")),
                },
                CaseReport {
                    name: "c",
                    outcome: Outcome::FailedContainingFault(anyhow::anyhow!("boom")),
                },
            ],
            ..RunSummary::default()
        };
        assert_eq!(summary.passed(), 1);
        assert_eq!(summary.failed(), 2);
        assert!(!summary.all_passed());
    }

    #[test]
    fn success_has_no_error() {
        assert!(Outcome::Success.error().is_none());
        assert!(!Outcome::Success.is_failure());
    }
}
