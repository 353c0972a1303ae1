//! Command execution against the storage tooling.
//!
//! Every `zpool`/`zfs` invocation goes through an [`Execer`], so the
//! provisioner and the test cases can be driven by a fake in tests.

use std::process::Command;

use poolcheck_common::error::{PoolcheckError, Result};

use crate::cancel::CancellationScope;

/// Output from an executed command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    /// Standard output from the command.
    pub stdout: String,
    /// Standard error from the command.
    pub stderr: String,
    /// Exit code returned by the command (-1 if killed by a signal).
    pub exit_code: i32,
}

impl ExecOutput {
    /// Returns whether the command exited with status zero.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Non-empty, trimmed lines of standard output.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.stdout.lines().map(str::trim).filter(|l| !l.is_empty())
    }
}

/// Runs external commands on behalf of the harness.
pub trait Execer {
    /// Runs `program` with `args` and captures its output.
    ///
    /// A non-zero exit status is not an error at this level.
    ///
    /// # Errors
    ///
    /// Returns an error if the scope is cancelled or the process cannot
    /// be spawned.
    fn run(&self, scope: &CancellationScope, program: &str, args: &[&str]) -> Result<ExecOutput>;

    /// Runs a command and requires a zero exit status.
    ///
    /// # Errors
    ///
    /// Returns [`PoolcheckError::Command`] on a non-zero exit status, or
    /// any error from [`run`](Self::run).
    fn run_expect_success(
        &self,
        scope: &CancellationScope,
        program: &str,
        args: &[&str],
    ) -> Result<ExecOutput> {
        let output = self.run(scope, program, args)?;
        if output.success() {
            Ok(output)
        } else {
            Err(PoolcheckError::Command {
                command: command_line(program, args),
                exit_code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            })
        }
    }

    /// Runs a command that must succeed without writing to stdout.
    ///
    /// # Errors
    ///
    /// Returns [`PoolcheckError::Command`] if the command fails or prints
    /// anything on standard output.
    fn run_expect_success_no_output(
        &self,
        scope: &CancellationScope,
        program: &str,
        args: &[&str],
    ) -> Result<()> {
        let output = self.run_expect_success(scope, program, args)?;
        if output.stdout.trim().is_empty() {
            Ok(())
        } else {
            Err(PoolcheckError::Command {
                command: command_line(program, args),
                exit_code: output.exit_code,
                stderr: format!("unexpected output: {}", output.stdout.trim()),
            })
        }
    }
}

/// Formats a command line for logs and error messages.
#[must_use]
pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// [`Execer`] that spawns real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Executor;

impl Executor {
    /// Creates a new executor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Execer for Executor {
    fn run(&self, scope: &CancellationScope, program: &str, args: &[&str]) -> Result<ExecOutput> {
        scope.check()?;
        tracing::debug!(cmd = %command_line(program, args), "exec");

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| PoolcheckError::Io {
                path: program.into(),
                source: e,
            })?;

        let out = ExecOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        };
        if !out.success() {
            tracing::debug!(program, exit_code = out.exit_code, stderr = %out.stderr.trim(), "command exited non-zero");
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_joins_program_and_args() {
        assert_eq!(
            command_line("zpool", &["list", "-H", "tank"]),
            "zpool list -H tank"
        );
    }

    #[test]
    fn lines_skips_blank_output() {
        let out = ExecOutput {
            stdout: "tank/a\n\n  tank/b  \n".into(),
            ..ExecOutput::default()
        };
        assert_eq!(out.lines().collect::<Vec<_>>(), vec!["tank/a", "tank/b"]);
    }

    #[cfg(unix)]
    #[test]
    fn executor_captures_stdout() {
        let out = Executor::new()
            .run_expect_success(&CancellationScope::new(), "echo", &["hello"])
            .expect("echo runs");
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn executor_reports_non_zero_exit() {
        let err = Executor::new()
            .run_expect_success(&CancellationScope::new(), "false", &[])
            .unwrap_err();
        assert!(matches!(err, PoolcheckError::Command { exit_code: 1, .. }));
    }

    #[cfg(unix)]
    #[test]
    fn no_output_variant_rejects_stdout() {
        let err = Executor::new()
            .run_expect_success_no_output(&CancellationScope::new(), "echo", &["noise"])
            .unwrap_err();
        assert!(err.to_string().contains("unexpected output: noise"));
    }

    #[test]
    fn executor_refuses_when_cancelled() {
        let scope = CancellationScope::new();
        scope.cancel();
        let err = Executor::new().run(&scope, "echo", &["x"]).unwrap_err();
        assert!(matches!(err, PoolcheckError::Cancelled));
    }

    #[test]
    fn missing_program_is_an_io_error() {
        let err = Executor::new()
            .run(&CancellationScope::new(), "poolcheck-no-such-binary", &[])
            .unwrap_err();
        assert!(matches!(err, PoolcheckError::Io { .. }));
    }
}
