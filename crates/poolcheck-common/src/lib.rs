//! # poolcheck-common
//!
//! Shared types, error definitions, provisioning configuration, and
//! constants used across the poolcheck workspace.
//!
//! This crate is the leaf of the dependency graph: it depends on no other
//! internal crate.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
