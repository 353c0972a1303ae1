//! Command-line flags.

use std::path::PathBuf;

use clap::Parser;
use poolcheck_common::config::ProvisionConfig;
use poolcheck_common::constants::{DEFAULT_IMAGE_SIZE, MOUNT_NONE};
use poolcheck_common::error::Result;
use poolcheck_common::types::{MountPolicy, PoolName};

/// poolcheck — run ZFS test cases against throwaway file-backed pools.
#[derive(Parser, Debug)]
#[command(name = "poolcheck", version, about, long_about = None)]
pub struct Cli {
    /// Name of the test pool, recreated for every case.
    #[arg(long, default_value = "")]
    pub poolname: String,

    /// Absolute path of the file backing the test pool.
    #[arg(long)]
    pub imagepath: Option<PathBuf>,

    /// Size of the backing file in bytes.
    #[arg(long, default_value_t = DEFAULT_IMAGE_SIZE)]
    pub imagesize: u64,

    /// "none", or an absolute directory to mount the pool at.
    #[arg(long, default_value = MOUNT_NONE)]
    pub mountpoint: String,

    /// If a test case fails, stop test execution and keep the pool as it
    /// was when the test failed.
    #[arg(long = "failure.stop-and-keep-pool")]
    pub stop_and_keep_pool: bool,

    /// Only run cases whose name contains this string.
    #[arg(long, value_name = "SUBSTRING")]
    pub run: Option<String>,

    /// List the selected cases and exit.
    #[arg(long)]
    pub list: bool,
}

impl Cli {
    /// Builds the (not yet validated) provisioning configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the mountpoint cannot be parsed.
    pub fn provision_config(&self) -> Result<ProvisionConfig> {
        Ok(ProvisionConfig {
            name: PoolName::new(self.poolname.clone()),
            image_path: self.imagepath.clone().unwrap_or_default(),
            image_size: self.imagesize,
            mount_policy: self.mountpoint.parse::<MountPolicy>()?,
        })
    }
}
