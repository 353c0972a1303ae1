//! Domain primitive types used across the poolcheck workspace.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::PoolcheckError;

/// Name of a ZFS pool provisioned for testing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PoolName(String);

impl PoolName {
    /// Creates a pool name from a string value.
    ///
    /// The name is not checked here; see
    /// [`ProvisionConfig::validate`](crate::config::ProvisionConfig::validate).
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Joins a dataset path below this pool, e.g. `tank/rootds`.
    #[must_use]
    pub fn dataset(&self, sub: &str) -> String {
        format!("{}/{}", self.0, sub)
    }
}

impl fmt::Display for PoolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether and where the pool's datasets get mounted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MountPolicy {
    /// Mounting is suppressed (`mountpoint=none`).
    #[default]
    None,
    /// Mount the pool's root dataset at this absolute directory.
    At(PathBuf),
}

impl MountPolicy {
    /// Returns the mount directory, if the policy mounts at all.
    #[must_use]
    pub fn dir(&self) -> Option<&Path> {
        match self {
            Self::None => None,
            Self::At(dir) => Some(dir),
        }
    }

    /// Value for the `mountpoint` property passed to `zpool create`.
    #[must_use]
    pub fn property_value(&self) -> String {
        match self {
            Self::None => crate::constants::MOUNT_NONE.to_string(),
            Self::At(dir) => dir.display().to_string(),
        }
    }
}

impl FromStr for MountPolicy {
    type Err = PoolcheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == crate::constants::MOUNT_NONE {
            return Ok(Self::None);
        }
        let path = Path::new(s);
        if path.is_absolute() {
            Ok(Self::At(path.to_path_buf()))
        } else {
            Err(PoolcheckError::config(format!(
                "mountpoint must be \"none\" or an absolute path, got {s:?}"
            )))
        }
    }
}

impl fmt::Display for MountPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.property_value())
    }
}
