//! Diagnostic logging for the sweep
//!
//! The sweep reports what it is doing through a [`DiagnosticLog`]. Recording a
//! message has no return value and can never fail the caller.

use std::fmt;

/// Target used when forwarding to the `log` crate
pub const LOG_TARGET: &str = "rust_voronoi_plane::sweep";

/// Receiver for tracing messages emitted during a sweep
pub trait DiagnosticLog {
    /// Record one message
    fn record(&self, message: fmt::Arguments<'_>);
}

/// Discards every message
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLog;

impl DiagnosticLog for NoopLog {
    #[inline]
    fn record(&self, _message: fmt::Arguments<'_>) {}
}

/// Forwards messages to the `log` facade at trace level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFacade;

impl DiagnosticLog for LogFacade {
    fn record(&self, message: fmt::Arguments<'_>) {
        log::trace!(target: LOG_TARGET, "{}", message);
    }
}

impl<F> DiagnosticLog for F
where
    F: Fn(fmt::Arguments<'_>),
{
    fn record(&self, message: fmt::Arguments<'_>) {
        self(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_closure_log_receives_messages() {
        let lines = RefCell::new(Vec::new());
        let log = |message: fmt::Arguments<'_>| lines.borrow_mut().push(message.to_string());

        log.record(format_args!("site {} at ({}, {})", 3, 1.5, 2.0));
        (&log).record(format_args!("done"));

        assert_eq!(*lines.borrow(), vec!["site 3 at (1.5, 2)", "done"]);
    }

    #[test]
    fn test_noop_and_facade_never_fail() {
        NoopLog.record(format_args!("ignored"));
        LogFacade.record(format_args!("forwarded without a logger installed"));
    }
}
