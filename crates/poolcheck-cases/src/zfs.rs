//! Thin `zfs` helpers for case bodies.
//!
//! Errors carry the failing command line and its stderr, so a failed case
//! report shows exactly which step broke.

use anyhow::Context;
use poolcheck_common::constants::ZFS_BIN;
use poolcheck_core::exec::ExecOutput;
use poolcheck_harness::context::TestContext;

fn zfs(ctx: &TestContext, args: &[&str]) -> anyhow::Result<ExecOutput> {
    Ok(ctx
        .executor()
        .run_expect_success(ctx.scope(), ZFS_BIN, args)?)
}

/// Full name of snapshot `snap` of `dataset`.
#[must_use]
pub fn snapshot_name(dataset: &str, snap: &str) -> String {
    format!("{dataset}@{snap}")
}

/// Full name of bookmark `mark` of `dataset`.
#[must_use]
pub fn bookmark_name(dataset: &str, mark: &str) -> String {
    format!("{dataset}#{mark}")
}

/// Creates the case's root dataset.
///
/// # Errors
///
/// Returns an error if `zfs create` fails.
pub fn create_root(ctx: &TestContext) -> anyhow::Result<()> {
    create_dataset(ctx, ctx.root_dataset())
}

/// Creates `dataset` and any missing parents.
///
/// # Errors
///
/// Returns an error if `zfs create` fails.
pub fn create_dataset(ctx: &TestContext, dataset: &str) -> anyhow::Result<()> {
    let _ = zfs(ctx, &["create", "-p", dataset]).with_context(|| format!("create {dataset}"))?;
    Ok(())
}

/// Snapshots `dataset` and returns the snapshot's full name.
///
/// # Errors
///
/// Returns an error if `zfs snapshot` fails.
pub fn snapshot(ctx: &TestContext, dataset: &str, snap: &str) -> anyhow::Result<String> {
    let name = snapshot_name(dataset, snap);
    let _ = zfs(ctx, &["snapshot", name.as_str()]).with_context(|| format!("snapshot {name}"))?;
    Ok(name)
}

/// Bookmarks `snapshot` as `mark` and returns the bookmark's full name.
///
/// # Errors
///
/// Returns an error if `zfs bookmark` fails.
pub fn bookmark(ctx: &TestContext, snapshot: &str, mark: &str) -> anyhow::Result<String> {
    let dataset = snapshot
        .split_once('@')
        .map(|(ds, _)| ds)
        .with_context(|| format!("{snapshot} is not a snapshot name"))?;
    let name = bookmark_name(dataset, mark);
    let _ = zfs(ctx, &["bookmark", snapshot, name.as_str()]).with_context(|| format!("bookmark {name}"))?;
    Ok(name)
}

/// Places hold `tag` on `snapshot`.
///
/// # Errors
///
/// Returns an error if `zfs hold` fails.
pub fn hold(ctx: &TestContext, tag: &str, snapshot: &str) -> anyhow::Result<()> {
    let _ = zfs(ctx, &["hold", tag, snapshot])?;
    Ok(())
}

/// Releases hold `tag` from `snapshot`.
///
/// # Errors
///
/// Returns an error if `zfs release` fails.
pub fn release(ctx: &TestContext, tag: &str, snapshot: &str) -> anyhow::Result<()> {
    let _ = zfs(ctx, &["release", tag, snapshot])?;
    Ok(())
}

/// Destroys a dataset, snapshot, or bookmark.
///
/// # Errors
///
/// Returns an error if `zfs destroy` fails.
pub fn destroy(ctx: &TestContext, name: &str) -> anyhow::Result<()> {
    let _ = zfs(ctx, &["destroy", name]).with_context(|| format!("destroy {name}"))?;
    Ok(())
}

/// Rolls `snapshot`'s dataset back to it, destroying newer snapshots.
///
/// # Errors
///
/// Returns an error if `zfs rollback` fails.
pub fn rollback(ctx: &TestContext, snapshot: &str) -> anyhow::Result<()> {
    let _ = zfs(ctx, &["rollback", "-r", snapshot])
        .with_context(|| format!("rollback to {snapshot}"))?;
    Ok(())
}

/// Returns whether a dataset, snapshot, or bookmark named `name` exists.
///
/// # Errors
///
/// Returns an error only if `zfs` cannot be run at all.
pub fn exists(ctx: &TestContext, name: &str) -> anyhow::Result<bool> {
    let out = ctx.executor().run(
        ctx.scope(),
        ZFS_BIN,
        &["list", "-H", "-o", "name", "-t", "all", name],
    )?;
    Ok(out.success() && out.lines().any(|l| l == name))
}

/// Lists names of type `kind` (`filesystem`, `snapshot`, `bookmark`)
/// directly below `dataset`, sorted by creation.
///
/// # Errors
///
/// Returns an error if `zfs list` fails.
pub fn list(ctx: &TestContext, kind: &str, dataset: &str) -> anyhow::Result<Vec<String>> {
    let out = zfs(
        ctx,
        &["list", "-H", "-o", "name", "-s", "createtxg", "-t", kind, "-d", "1", dataset],
    )?;
    Ok(out.lines().map(str::to_string).collect())
}
