//! The provisioning contract consumed by the test runner.

use poolcheck_common::config::ProvisionConfig;
use poolcheck_common::constants::{ZFS_BIN, ZPOOL_BIN};
use poolcheck_common::error::Result;

use crate::cancel::CancellationScope;

/// A live, provisioned test resource.
///
/// Dropping a handle abandons the resource without destroying it; only
/// [`destroy`](Self::destroy) tears it down.
pub trait ResourceHandle {
    /// Name the resource was provisioned under.
    fn name(&self) -> &str;

    /// Tears the resource down, releasing its backing storage.
    ///
    /// # Errors
    ///
    /// Returns an error if any teardown step fails. Callers treat this as
    /// non-fatal.
    fn destroy(self, scope: &CancellationScope) -> Result<()>;
}

/// Creates fresh test resources.
///
/// Implementors handle the backend-specific details of allocation,
/// mounting, and naming.
pub trait ResourceProvisioner {
    /// Handle type returned for each provisioned resource.
    type Handle: ResourceHandle;

    /// Creates the resource described by `config`, replacing any existing
    /// resource of the same name.
    ///
    /// `config` must already be validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to create or replace the resource.
    fn provision(&self, scope: &CancellationScope, config: &ProvisionConfig)
    -> Result<Self::Handle>;
}

/// Information about the host's readiness to run pool tests.
#[derive(Debug, Clone)]
pub struct PlatformInfo {
    /// Host operating system name.
    pub os: String,
    /// Whether `zpool` is on `PATH`.
    pub zpool_available: bool,
    /// Whether `zfs` is on `PATH`.
    pub zfs_available: bool,
    /// Whether the process runs with effective UID 0.
    pub is_root: bool,
}

impl PlatformInfo {
    /// Returns human-readable reasons the host may be unable to run tests.
    #[must_use]
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if !self.zpool_available {
            problems.push(format!("`{ZPOOL_BIN}` not found on PATH"));
        }
        if !self.zfs_available {
            problems.push(format!("`{ZFS_BIN}` not found on PATH"));
        }
        if !self.is_root {
            problems.push("not running as root; pool creation will likely fail".to_string());
        }
        problems
    }
}

/// Probes the current host for the tooling and privileges pool tests need.
#[must_use]
pub fn platform_info() -> PlatformInfo {
    PlatformInfo {
        os: std::env::consts::OS.to_string(),
        zpool_available: which::which(ZPOOL_BIN).is_ok(),
        zfs_available: which::which(ZFS_BIN).is_ok(),
        is_root: nix::unistd::geteuid().is_root(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_info_os_not_empty() {
        assert!(!platform_info().os.is_empty());
    }

    #[test]
    fn ready_host_reports_no_problems() {
        let info = PlatformInfo {
            os: "linux".into(),
            zpool_available: true,
            zfs_available: true,
            is_root: true,
        };
        assert!(info.problems().is_empty());
    }

    #[test]
    fn missing_tooling_is_reported() {
        let info = PlatformInfo {
            os: "linux".into(),
            zpool_available: false,
            zfs_available: true,
            is_root: false,
        };
        let problems = info.problems();
        assert_eq!(problems.len(), 2);
        assert!(problems[0].contains("zpool"));
    }
}
