//! Fault containment at the case-invocation boundary.
//!
//! A panicking case body is reported once, as the case's failure. The
//! default panic hook output (`thread 'main' panicked at ...`) is replaced
//! by a `tracing` event while a case body runs; panics anywhere else still
//! reach the previously installed hook.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use crate::case::TestCase;
use crate::context::TestContext;
use crate::outcome::Outcome;

thread_local! {
    static CONTAINING: Cell<bool> = const { Cell::new(false) };
}

static HOOK: Once = Once::new();

fn install_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CONTAINING.with(Cell::get) {
                let location = info.location().map(ToString::to_string).unwrap_or_default();
                tracing::debug!(%location, "contained panic in test case body");
            } else {
                previous(info);
            }
        }));
    });
}

/// Invokes the case body, turning a panic into a failed outcome.
///
/// This is the only place the harness catches unwinding panics.
pub(crate) fn invoke(case: &TestCase, ctx: &TestContext) -> Outcome {
    install_hook();
    CONTAINING.with(|c| c.set(true));
    let result = panic::catch_unwind(AssertUnwindSafe(|| (case.body)(ctx)));
    CONTAINING.with(|c| c.set(false));

    match result {
        Ok(Ok(())) => Outcome::Success,
        Ok(Err(err)) => Outcome::Failed(err),
        Err(payload) => {
            let message = panic_message(&*payload);
            tracing::error!(panic = %message, "test case panicked");
            Outcome::FailedContainingFault(anyhow::anyhow!(
                "panic while running test: {message}"
            ))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
