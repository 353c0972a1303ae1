//! Snapshot cases.

use anyhow::ensure;
use poolcheck_harness::context::TestContext;

use crate::zfs;

pub fn snapshot_create_and_list(ctx: &TestContext) -> anyhow::Result<()> {
    zfs::create_root(ctx)?;
    let root = ctx.root_dataset();
    let first = zfs::snapshot(ctx, root, "1")?;
    let second = zfs::snapshot(ctx, root, "2")?;

    let snaps = zfs::list(ctx, "snapshot", root)?;
    ensure!(snaps == [first, second], "unexpected snapshots {snaps:?}");
    Ok(())
}

pub fn snapshot_destroy(ctx: &TestContext) -> anyhow::Result<()> {
    zfs::create_root(ctx)?;
    let root = ctx.root_dataset();
    let snap = zfs::snapshot(ctx, root, "gone")?;

    zfs::destroy(ctx, &snap)?;
    ensure!(!zfs::exists(ctx, &snap)?, "{snap} survived destroy");
    ensure!(zfs::exists(ctx, root)?, "destroying {snap} took {root} with it");
    Ok(())
}

pub fn rollback_discards_newer_snapshots(ctx: &TestContext) -> anyhow::Result<()> {
    zfs::create_root(ctx)?;
    let root = ctx.root_dataset();
    let base = zfs::snapshot(ctx, root, "base")?;
    let _newer = zfs::snapshot(ctx, root, "newer")?;
    let _newest = zfs::snapshot(ctx, root, "newest")?;

    zfs::rollback(ctx, &base)?;

    let snaps = zfs::list(ctx, "snapshot", root)?;
    ensure!(snaps == [base], "rollback left {snaps:?}");
    Ok(())
}

pub fn hold_blocks_snapshot_destroy(ctx: &TestContext) -> anyhow::Result<()> {
    const TAG: &str = "poolcheck";

    zfs::create_root(ctx)?;
    let snap = zfs::snapshot(ctx, ctx.root_dataset(), "held")?;
    zfs::hold(ctx, TAG, &snap)?;

    ensure!(
        zfs::destroy(ctx, &snap).is_err(),
        "destroying held snapshot {snap} succeeded"
    );
    ensure!(zfs::exists(ctx, &snap)?, "held snapshot {snap} vanished");

    zfs::release(ctx, TAG, &snap)?;
    zfs::destroy(ctx, &snap)?;
    ensure!(!zfs::exists(ctx, &snap)?, "{snap} survived destroy after release");
    Ok(())
}
