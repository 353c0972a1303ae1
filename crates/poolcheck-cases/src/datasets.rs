//! Filesystem dataset cases.

use anyhow::ensure;
use poolcheck_harness::context::TestContext;

use crate::zfs;

pub fn root_dataset_lifecycle(ctx: &TestContext) -> anyhow::Result<()> {
    let root = ctx.root_dataset();
    ensure!(!zfs::exists(ctx, root)?, "{root} exists on a fresh pool");

    zfs::create_root(ctx)?;
    ensure!(zfs::exists(ctx, root)?, "{root} missing after create");

    zfs::destroy(ctx, root)?;
    ensure!(!zfs::exists(ctx, root)?, "{root} still present after destroy");
    Ok(())
}

pub fn nested_datasets_are_listed(ctx: &TestContext) -> anyhow::Result<()> {
    zfs::create_root(ctx)?;
    let root = ctx.root_dataset();
    let children = [format!("{root}/a"), format!("{root}/b"), format!("{root}/b/deep")];
    for child in &children {
        zfs::create_dataset(ctx, child)?;
    }

    let listed = zfs::list(ctx, "filesystem", root)?;
    tracing::debug!(parent: ctx.span(), ?listed, "filesystems below root");
    // -d 1 includes the root itself plus direct children only
    ensure!(
        listed == [root.to_string(), children[0].clone(), children[1].clone()],
        "unexpected listing {listed:?}"
    );
    Ok(())
}
