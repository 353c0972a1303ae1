//! Provisioning configuration for test pools.

use std::path::PathBuf;

use crate::constants::{DEFAULT_IMAGE_SIZE, MIN_IMAGE_SIZE};
use crate::error::{PoolcheckError, Result};
use crate::types::{MountPolicy, PoolName};

/// Parameters used to create (or replace) the pool for every test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionConfig {
    /// Name of the pool.
    pub name: PoolName,
    /// File backing the pool's single vdev.
    pub image_path: PathBuf,
    /// Size of the backing file in bytes.
    pub image_size: u64,
    /// Mount behavior of the pool's datasets.
    pub mount_policy: MountPolicy,
}

impl ProvisionConfig {
    /// Creates a configuration with the default image size and no mounting.
    #[must_use]
    pub fn new(name: impl Into<String>, image_path: impl Into<PathBuf>) -> Self {
        Self {
            name: PoolName::new(name),
            image_path: image_path.into(),
            image_size: DEFAULT_IMAGE_SIZE,
            mount_policy: MountPolicy::None,
        }
    }

    /// Checks the configuration before any pool is touched.
    ///
    /// # Errors
    ///
    /// Returns [`PoolcheckError::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        let name = self.name.as_str();
        if name.is_empty() {
            return Err(PoolcheckError::config("pool name must not be empty"));
        }
        if name
            .chars()
            .any(|c| matches!(c, '/' | '@' | '#') || c.is_whitespace())
        {
            return Err(PoolcheckError::config(format!(
                "pool name must not contain '/', '@', '#' or whitespace, got {name:?}"
            )));
        }
        if !self.image_path.is_absolute() {
            return Err(PoolcheckError::config(format!(
                "image path must be absolute, got {:?}",
                self.image_path
            )));
        }
        if self.image_size < MIN_IMAGE_SIZE {
            return Err(PoolcheckError::config(format!(
                "image size must be at least {MIN_IMAGE_SIZE} bytes, got {}",
                self.image_size
            )));
        }
        if let MountPolicy::At(dir) = &self.mount_policy {
            if !dir.is_absolute() {
                return Err(PoolcheckError::config(format!(
                    "mountpoint must be an absolute path, got {dir:?}"
                )));
            }
        }
        Ok(())
    }
}
