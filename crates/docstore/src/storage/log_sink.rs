//! Pluggable destination for the engine's lifecycle messages.
//!
//! The engine never relies on log output; sinks only observe.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Fatal,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, args: fmt::Arguments<'_>);
}

/// Forwards to the `tracing` macros under the `docstore` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        match level {
            LogLevel::Fatal => tracing::error!(target: "docstore", fatal = true, "{}", args),
            LogLevel::Error => tracing::error!(target: "docstore", "{}", args),
            LogLevel::Warn => tracing::warn!(target: "docstore", "{}", args),
            LogLevel::Info => tracing::info!(target: "docstore", "{}", args),
            LogLevel::Debug => tracing::debug!(target: "docstore", "{}", args),
            LogLevel::Trace => tracing::trace!(target: "docstore", "{}", args),
        }
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn log(&self, _level: LogLevel, _args: fmt::Arguments<'_>) {}
}
