//! # poolcheck
//!
//! Runs the registered ZFS test cases one after another, each against a
//! freshly created file-backed pool.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

mod args;
mod output;

use std::rc::Rc;

use anyhow::Context;
use clap::Parser;
use poolcheck_core::cancel::CancellationScope;
use poolcheck_core::exec::Executor;
use poolcheck_core::provision::platform_info;
use poolcheck_core::zpool::ZpoolProvisioner;
use poolcheck_harness::runner::{FailurePolicy, Runner};
use tracing_subscriber::EnvFilter;

use crate::args::Cli;
use crate::output::ConsoleReporter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    execute(cli)
}

fn execute(cli: Cli) -> anyhow::Result<()> {
    let cases = poolcheck_cases::select(cli.run.as_deref());
    if cli.list {
        output::print_catalog(&cases);
        return Ok(());
    }

    let config = cli.provision_config()?;
    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "invalid provisioning configuration");
        return Err(e).context("invalid provisioning configuration");
    }

    for problem in platform_info().problems() {
        tracing::warn!(%problem, "host may not be able to run pool tests");
    }

    let scope = CancellationScope::new();
    let on_interrupt = scope.clone();
    ctrlc::set_handler(move || on_interrupt.cancel())
        .context("failed to set Ctrl+C handler")?;

    let policy = FailurePolicy::from_stop_and_keep(cli.stop_and_keep_pool);
    let reporter = ConsoleReporter::new();
    reporter.print_header(&config, policy, cases.len());

    let executor = Executor::new();
    let mut runner = Runner::new(ZpoolProvisioner::new(executor), reporter, config, scope)?
        .with_failure_policy(policy)
        .with_execer(Rc::new(executor));
    let summary = runner.run(&cases);

    output::print_summary(&summary);
    Ok(())
}
