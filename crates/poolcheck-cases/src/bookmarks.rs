//! Bookmark cases.

use anyhow::ensure;
use poolcheck_harness::context::TestContext;

use crate::zfs;

pub fn bookmark_survives_snapshot_destroy(ctx: &TestContext) -> anyhow::Result<()> {
    zfs::create_root(ctx)?;
    let root = ctx.root_dataset();
    let snap = zfs::snapshot(ctx, root, "1")?;
    let mark = zfs::bookmark(ctx, &snap, "1")?;

    zfs::destroy(ctx, &snap)?;

    ensure!(!zfs::exists(ctx, &snap)?, "{snap} survived destroy");
    let marks = zfs::list(ctx, "bookmark", root)?;
    ensure!(marks == [mark], "unexpected bookmarks {marks:?}");
    Ok(())
}

pub fn bookmark_requires_existing_snapshot(ctx: &TestContext) -> anyhow::Result<()> {
    zfs::create_root(ctx)?;
    let root = ctx.root_dataset();
    let missing = zfs::snapshot_name(root, "never-taken");

    ensure!(
        zfs::bookmark(ctx, &missing, "orphan").is_err(),
        "bookmarking nonexistent {missing} succeeded"
    );
    ensure!(
        zfs::list(ctx, "bookmark", root)?.is_empty(),
        "orphan bookmark was created"
    );
    Ok(())
}
