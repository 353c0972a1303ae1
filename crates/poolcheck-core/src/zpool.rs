//! File-backed ZFS pools for test cases.
//!
//! Each pool consists of a single file vdev at the configured image path.
//! Provisioning is create-or-replace, so a rerun after an aborted session
//! starts from a clean pool.

use std::fs::{DirBuilder, OpenOptions};
use std::io::ErrorKind;
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt};
use std::path::Path;

use poolcheck_common::config::ProvisionConfig;
use poolcheck_common::constants::ZPOOL_BIN;
use poolcheck_common::error::{PoolcheckError, Result};
use poolcheck_common::types::PoolName;

use crate::cancel::CancellationScope;
use crate::exec::Execer;
use crate::provision::{ResourceHandle, ResourceProvisioner};

/// Provisions test pools through the `zpool` command.
#[derive(Debug, Clone, Default)]
pub struct ZpoolProvisioner<E> {
    execer: E,
}

impl<E: Execer + Clone> ZpoolProvisioner<E> {
    /// Creates a provisioner that runs `zpool` through `execer`.
    pub const fn new(execer: E) -> Self {
        Self { execer }
    }

    /// Returns whether a pool named `pool` is currently imported.
    ///
    /// # Errors
    ///
    /// Returns an error if `zpool list` cannot be run at all.
    pub fn exists(&self, scope: &CancellationScope, pool: &PoolName) -> Result<bool> {
        let out = self
            .execer
            .run(scope, ZPOOL_BIN, &["list", "-H", "-o", "name", pool.as_str()])?;
        Ok(out.success() && out.lines().any(|l| l == pool.as_str()))
    }
}

impl<E: Execer + Clone> ResourceProvisioner for ZpoolProvisioner<E> {
    type Handle = Zpool<E>;

    fn provision(&self, scope: &CancellationScope, config: &ProvisionConfig) -> Result<Zpool<E>> {
        let pool = config.name.as_str();
        let wrap = |step: &'static str| {
            move |e: PoolcheckError| PoolcheckError::Provision {
                pool: pool.to_string(),
                step,
                source: Box::new(e),
            }
        };

        if self
            .exists(scope, &config.name)
            .map_err(wrap("check for existing pool"))?
        {
            tracing::info!(pool, "replacing existing test pool");
            self.execer
                .run_expect_success_no_output(scope, ZPOOL_BIN, &["destroy", "-f", pool])
                .map_err(wrap("destroy existing pool"))?;
        }

        if let Some(dir) = config.mount_policy.dir() {
            recreate_mount_dir(dir).map_err(wrap("prepare mountpoint"))?;
        }

        create_image(&config.image_path, config.image_size).map_err(wrap("create image file"))?;

        let mountpoint = format!("mountpoint={}", config.mount_policy.property_value());
        let image = config.image_path.to_string_lossy().into_owned();
        self.execer
            .run_expect_success_no_output(
                scope,
                ZPOOL_BIN,
                &["create", "-f", "-O", mountpoint.as_str(), pool, image.as_str()],
            )
            .map_err(wrap("zpool create"))?;

        tracing::info!(pool, image = %image, mountpoint = %config.mount_policy, "test pool created");
        Ok(Zpool {
            config: config.clone(),
            execer: self.execer.clone(),
        })
    }
}

/// A live test pool.
#[derive(Debug)]
pub struct Zpool<E> {
    config: ProvisionConfig,
    execer: E,
}

impl<E: Execer> ResourceHandle for Zpool<E> {
    fn name(&self) -> &str {
        self.config.name.as_str()
    }

    fn destroy(self, scope: &CancellationScope) -> Result<()> {
        let pool = self.config.name.as_str();
        let wrap = |step: &'static str| {
            move |e: PoolcheckError| PoolcheckError::Teardown {
                pool: pool.to_string(),
                step,
                source: Box::new(e),
            }
        };

        self.execer
            .run_expect_success_no_output(scope, ZPOOL_BIN, &["destroy", pool])
            .map_err(wrap("zpool destroy"))?;

        std::fs::remove_file(&self.config.image_path)
            .map_err(|e| PoolcheckError::Io {
                path: self.config.image_path.clone(),
                source: e,
            })
            .map_err(wrap("remove image file"))?;

        if let Some(dir) = self.config.mount_policy.dir() {
            remove_dir_if_present(dir).map_err(wrap("remove mountpoint"))?;
        }

        tracing::info!(pool, "test pool destroyed");
        Ok(())
    }
}

fn remove_dir_if_present(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(PoolcheckError::Io {
            path: dir.to_path_buf(),
            source: e,
        }),
        _ => Ok(()),
    }
}

/// Empties the mountpoint so stale files from earlier runs cannot shadow
/// the new pool's datasets.
fn recreate_mount_dir(dir: &Path) -> Result<()> {
    remove_dir_if_present(dir)?;
    DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(dir)
        .map_err(|e| PoolcheckError::Io {
            path: dir.to_path_buf(),
            source: e,
        })
}

fn create_image(path: &Path, size: u64) -> Result<()> {
    let io_err = |e| PoolcheckError::Io {
        path: path.to_path_buf(),
        source: e,
    };
    let image = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
        .map_err(io_err)?;
    image.set_len(size).map_err(io_err)?;
    image.sync_all().map_err(io_err)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    use poolcheck_common::types::MountPolicy;

    use super::*;
    use crate::exec::{ExecOutput, command_line};

    #[derive(Debug, Default)]
    struct FakeState {
        pools: HashSet<String>,
        calls: Vec<String>,
        fail_create: bool,
    }

    /// Simulates just enough of `zpool` to track which pools are imported.
    #[derive(Debug, Clone, Default)]
    struct FakeZpool(Rc<RefCell<FakeState>>);

    impl FakeZpool {
        fn calls(&self) -> Vec<String> {
            self.0.borrow().calls.clone()
        }

        fn pools(&self) -> HashSet<String> {
            self.0.borrow().pools.clone()
        }
    }

    fn exit(code: i32, stderr: &str) -> ExecOutput {
        ExecOutput {
            exit_code: code,
            stderr: stderr.into(),
            ..ExecOutput::default()
        }
    }

    impl Execer for FakeZpool {
        fn run(
            &self,
            scope: &CancellationScope,
            program: &str,
            args: &[&str],
        ) -> Result<ExecOutput> {
            scope.check()?;
            let mut state = self.0.borrow_mut();
            state.calls.push(command_line(program, args));
            let out = match args {
                ["list", "-H", "-o", "name", pool] => {
                    if state.pools.contains(*pool) {
                        ExecOutput {
                            stdout: format!("{pool}\n"),
                            ..ExecOutput::default()
                        }
                    } else {
                        exit(1, "cannot open pool: no such pool")
                    }
                }
                ["create", .., _, _] if state.fail_create => exit(1, "no space left on device"),
                ["create", .., pool, _image] => {
                    if state.pools.insert((*pool).to_string()) {
                        ExecOutput::default()
                    } else {
                        exit(1, "pool already exists")
                    }
                }
                ["destroy", .., pool] => {
                    if state.pools.remove(*pool) {
                        ExecOutput::default()
                    } else {
                        exit(1, "no such pool")
                    }
                }
                other => panic!("unexpected zpool invocation: {other:?}"),
            };
            Ok(out)
        }
    }

    fn config(dir: &Path) -> ProvisionConfig {
        ProvisionConfig::new("pctest", dir.join("pool.img"))
    }

    #[test]
    fn provision_creates_sized_image_and_pool() {
        let dir = tempfile::tempdir().expect("tempdir");
        let fake = FakeZpool::default();
        let provisioner = ZpoolProvisioner::new(fake.clone());
        let cfg = config(dir.path());

        let pool = provisioner
            .provision(&CancellationScope::new(), &cfg)
            .expect("provision");

        assert_eq!(pool.name(), "pctest");
        let meta = std::fs::metadata(&cfg.image_path).expect("image exists");
        assert_eq!(meta.len(), cfg.image_size);
        assert!(fake.pools().contains("pctest"));
        let create = format!(
            "zpool create -f -O mountpoint=none pctest {}",
            cfg.image_path.display()
        );
        assert_eq!(fake.calls().last(), Some(&create));
    }

    #[test]
    fn provisioning_twice_replaces_the_pool() {
        let dir = tempfile::tempdir().expect("tempdir");
        let fake = FakeZpool::default();
        let provisioner = ZpoolProvisioner::new(fake.clone());
        let scope = CancellationScope::new();
        let cfg = config(dir.path());

        let _first = provisioner.provision(&scope, &cfg).expect("first");
        let _second = provisioner.provision(&scope, &cfg).expect("second");

        assert_eq!(fake.pools().len(), 1);
        assert!(fake.calls().contains(&"zpool destroy -f pctest".to_string()));
    }

    #[test]
    fn destroy_removes_pool_and_image() {
        let dir = tempfile::tempdir().expect("tempdir");
        let fake = FakeZpool::default();
        let provisioner = ZpoolProvisioner::new(fake.clone());
        let scope = CancellationScope::new();
        let cfg = config(dir.path());

        let pool = provisioner.provision(&scope, &cfg).expect("provision");
        pool.destroy(&scope).expect("destroy");

        assert!(fake.pools().is_empty());
        assert!(!cfg.image_path.exists());
    }

    #[test]
    fn mount_dir_is_recreated_empty_and_removed_on_destroy() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mnt = dir.path().join("mnt");
        std::fs::create_dir_all(&mnt).expect("mkdir");
        std::fs::write(mnt.join("stale"), b"old run").expect("write");

        let fake = FakeZpool::default();
        let provisioner = ZpoolProvisioner::new(fake.clone());
        let scope = CancellationScope::new();
        let mut cfg = config(dir.path());
        cfg.mount_policy = MountPolicy::At(mnt.clone());

        let pool = provisioner.provision(&scope, &cfg).expect("provision");
        assert!(mnt.is_dir());
        assert!(!mnt.join("stale").exists());
        assert!(
            fake.calls()
                .last()
                .is_some_and(|c| c.contains(&format!("mountpoint={}", mnt.display())))
        );

        pool.destroy(&scope).expect("destroy");
        assert!(!mnt.exists());
    }

    #[test]
    fn create_failure_names_the_step() {
        let dir = tempfile::tempdir().expect("tempdir");
        let fake = FakeZpool::default();
        fake.0.borrow_mut().fail_create = true;
        let provisioner = ZpoolProvisioner::new(fake.clone());

        let err = provisioner
            .provision(&CancellationScope::new(), &config(dir.path()))
            .unwrap_err();

        assert_eq!(err.to_string(), "zpool create for pool pctest");
        assert!(fake.pools().is_empty());
    }

    #[test]
    fn destroy_of_vanished_pool_is_a_teardown_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let fake = FakeZpool::default();
        let provisioner = ZpoolProvisioner::new(fake.clone());
        let scope = CancellationScope::new();

        let pool = provisioner
            .provision(&scope, &config(dir.path()))
            .expect("provision");
        fake.0.borrow_mut().pools.clear();

        let err = pool.destroy(&scope).unwrap_err();
        assert!(matches!(err, PoolcheckError::Teardown { step: "zpool destroy", .. }));
    }

    #[test]
    fn cancelled_scope_stops_provisioning() {
        let dir = tempfile::tempdir().expect("tempdir");
        let scope = CancellationScope::new();
        scope.cancel();

        let err = ZpoolProvisioner::new(FakeZpool::default())
            .provision(&scope, &config(dir.path()))
            .unwrap_err();
        assert!(matches!(
            err,
            PoolcheckError::Provision { ref source, .. } if matches!(**source, PoolcheckError::Cancelled)
        ));
    }
}
