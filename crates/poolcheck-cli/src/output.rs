//! Console output: banners, failure details, and the run tally.
//!
//! This is the operator-facing stream on stdout; `tracing` logs go to
//! stderr.

#![allow(clippy::print_stdout)]

use std::error::Error;
use std::io::IsTerminal;

use poolcheck_common::config::ProvisionConfig;
use poolcheck_common::error::PoolcheckError;
use poolcheck_harness::case::TestCase;
use poolcheck_harness::outcome::RunSummary;
use poolcheck_harness::report::Reporter;
use poolcheck_harness::runner::FailurePolicy;

const BOLD: &str = "\x1b[1m";
const BOLD_RED: &str = "\x1b[1;91m";
const BOLD_GREEN: &str = "\x1b[1;92m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Wraps `text` in an ANSI style when `color` is set.
fn paint(color: bool, style: &str, text: &str) -> String {
    if color {
        format!("{style}{text}{RESET}")
    } else {
        text.to_string()
    }
}

/// Prints progress banners to stdout, colored when stdout is a terminal.
#[derive(Debug)]
pub struct ConsoleReporter {
    color: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::with_color(std::io::stdout().is_terminal())
    }

    const fn with_color(color: bool) -> Self {
        Self { color }
    }

    /// Prints the run parameters before the first case.
    pub fn print_header(&self, config: &ProvisionConfig, policy: FailurePolicy, case_count: usize) {
        println!("{}", self.header(config, policy, case_count));
    }

    fn header(&self, config: &ProvisionConfig, policy: FailurePolicy, case_count: usize) -> String {
        let on_failure = match policy {
            FailurePolicy::Continue => "destroy pool and continue",
            FailurePolicy::StopAndKeepPool => "stop and keep pool",
        };
        let lines = [
            String::new(),
            format!(
                "  {} {}",
                paint(self.color, BOLD, "poolcheck"),
                paint(self.color, DIM, concat!("v", env!("CARGO_PKG_VERSION")))
            ),
            format!("  pool:       {}", config.name),
            format!("  image:      {}", config.image_path.display()),
            format!("  image size: {}", format_bytes(config.image_size)),
            format!("  mountpoint: {}", config.mount_policy),
            format!("  on failure: {on_failure}"),
            format!("  cases:      {case_count}"),
        ];
        format!("{}\n", lines.join("\n"))
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn case_started(&mut self, case: &TestCase) {
        println!("{}", paint(self.color, BOLD, &format!("BEGIN TEST CASE {case}")));
    }

    fn case_succeeded(&mut self, case: &TestCase) {
        println!(
            "{}",
            paint(self.color, BOLD_GREEN, &format!("DONE  TEST CASE {case}"))
        );
    }

    fn case_failed(&mut self, _case: &TestCase, error: &anyhow::Error) {
        println!("{}", paint(self.color, BOLD_RED, "TEST CASE FAILED WITH ERROR:"));
        // Debug formatting prints the cause chain (and a backtrace if captured).
        println!("{error:?}");
    }

    fn teardown_failed(&mut self, _case: &TestCase, error: &PoolcheckError) {
        println!("error destroying test pool: {}", error_chain(error));
    }

    fn run_stopped(&mut self, _case: &TestCase) {
        println!(
            "{}",
            paint(
                self.color,
                BOLD,
                "STOPPING TEST RUN AT FAILING TEST PER USER REQUEST"
            )
        );
    }

    fn run_cancelled(&mut self, next: &TestCase) {
        println!(
            "{}",
            paint(
                self.color,
                BOLD,
                &format!("RUN CANCELLED BEFORE TEST CASE {next}")
            )
        );
    }

    fn case_finished(&mut self) {
        println!();
    }
}

/// Joins an error and its sources with `": "`.
fn error_chain(error: &dyn Error) -> String {
    let mut out = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

/// Formats a byte count into a human-readable string (e.g., "100.0 MiB").
#[allow(clippy::cast_precision_loss)]
fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

    let mut value = bytes as f64;
    let mut unit = None;
    for next in UNITS {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = Some(next);
    }
    unit.map_or_else(|| format!("{bytes} B"), |u| format!("{value:.1} {u}"))
}

/// Prints the pass/fail tally after the run.
pub fn print_summary(summary: &RunSummary) {
    let note = if summary.stopped_early {
        " (stopped at first failure)"
    } else if summary.cancelled {
        " (cancelled)"
    } else {
        ""
    };
    println!(
        "{} passed, {} failed{note}",
        summary.passed(),
        summary.failed()
    );
}

/// Prints case names, one per line.
pub fn print_catalog(cases: &[TestCase]) {
    for case in cases {
        println!("{case}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_bytes_displays_bytes() {
        assert_eq!(format_bytes(512), "512 B");
    }

    #[test]
    fn format_bytes_displays_mib() {
        assert_eq!(format_bytes(100 * (1 << 20)), "100.0 MiB");
    }

    #[test]
    fn format_bytes_displays_gib() {
        assert_eq!(format_bytes(2_147_483_648), "2.0 GiB");
    }

    #[test]
    fn paint_is_plain_without_color() {
        assert_eq!(paint(false, BOLD, "x"), "x");
        assert_eq!(paint(true, BOLD, "x"), "\x1b[1mx\x1b[0m");
    }

    #[test]
    fn header_has_no_escapes_without_color() {
        let config = ProvisionConfig::new("pctest", "/tmp/pctest.img");
        let header = ConsoleReporter::with_color(false).header(&config, FailurePolicy::Continue, 3);
        assert!(!header.contains('\x1b'));
        assert!(header.contains("  pool:       pctest"));
        assert!(header.contains("  image size: 100.0 MiB"));
        assert!(header.contains("  cases:      3"));
    }

    #[test]
    fn header_is_styled_with_color() {
        let config = ProvisionConfig::new("pctest", "/tmp/pctest.img");
        let header = ConsoleReporter::with_color(true).header(&config, FailurePolicy::StopAndKeepPool, 1);
        assert!(header.contains("\x1b[1mpoolcheck\x1b[0m"));
        assert!(header.contains("stop and keep pool"));
    }

    #[test]
    fn error_chain_includes_sources() {
        let err = PoolcheckError::Teardown {
            pool: "pctest".into(),
            step: "zpool destroy",
            source: Box::new(PoolcheckError::config("busy")),
        };
        assert_eq!(
            error_chain(&err),
            "zpool destroy for pool pctest: invalid configuration: busy"
        );
    }
}
