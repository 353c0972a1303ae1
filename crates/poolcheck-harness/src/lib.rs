//! Sequential test runner for the poolcheck harness.
//!
//! For every registered [`case::TestCase`] the [`runner::Runner`] creates a
//! fresh pool, runs the case body with panics contained, tears the pool down
//! (or keeps it, per [`runner::FailurePolicy`]), and reports the
//! [`outcome::Outcome`] through an injected [`report::Reporter`].

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod case;
pub mod context;
mod fault;
mod lease;
pub mod outcome;
pub mod report;
pub mod runner;
