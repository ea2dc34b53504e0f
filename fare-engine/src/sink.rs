//! Error reporting seam.
//!
//! Soft errors (a fallback tier failed but a later tier can still answer,
//! or a non-critical lookup degraded) are reported here and never affect
//! control flow. Fatal errors abort the current batch at the call site;
//! the sink only records them.

use std::fmt::Display;

/// Destination for non-propagated errors.
pub trait ErrorSink: Send + Sync {
    /// Report a non-fatal error. Processing continues with a degraded
    /// default after this call.
    fn report_soft(&self, context: &str, error: &dyn Display);

    /// Report an error that aborts the current batch.
    fn report_fatal(&self, context: &str, error: &dyn Display);
}

/// Default sink: structured logging via `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn report_soft(&self, context: &str, error: &dyn Display) {
        tracing::warn!(context, %error, "soft error");
    }

    fn report_fatal(&self, context: &str, error: &dyn Display) {
        tracing::error!(context, %error, "fatal error");
    }
}

/// Test sink that records every report for assertions.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSink {
    soft: std::sync::Mutex<Vec<String>>,
    fatal: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn soft_reports(&self) -> Vec<String> {
        self.soft.lock().unwrap().clone()
    }

    pub fn fatal_reports(&self) -> Vec<String> {
        self.fatal.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl ErrorSink for RecordingSink {
    fn report_soft(&self, context: &str, error: &dyn Display) {
        self.soft.lock().unwrap().push(format!("{context}: {error}"));
    }

    fn report_fatal(&self, context: &str, error: &dyn Display) {
        self.fatal.lock().unwrap().push(format!("{context}: {error}"));
    }
}
