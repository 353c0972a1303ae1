//! # poolcheck-core
//!
//! Provisioning primitives for the poolcheck harness.
//!
//! This crate provides:
//! - **Cancellation**: a run-wide [`cancel::CancellationScope`].
//! - **Execution**: the [`exec::Execer`] seam over `zpool`/`zfs` invocations.
//! - **Provisioning**: the [`provision::ResourceProvisioner`] and
//!   [`provision::ResourceHandle`] contract.
//! - **Zpool backend**: [`zpool::ZpoolProvisioner`], which backs each test
//!   pool with a single file vdev.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod cancel;
pub mod exec;
pub mod provision;
pub mod zpool;
