//! Logging capability used by the retry executor
//!
//! The executor only ever needs `info`. The default implementation forwards
//! to `tracing`; `MemoryLogger` keeps lines around for inspection.

use std::sync::{Arc, Mutex};

/// Sink for per-attempt diagnostics
pub trait OperationLogger: Send + Sync {
    /// Record one informational line
    fn info(&self, message: &str);
}

/// Forwards every line to `tracing::info!`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl OperationLogger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!(target: "spike::service", "{}", message);
    }
}

/// Keeps every line in memory; clones share the same buffer
#[derive(Debug, Clone, Default)]
pub struct MemoryLogger {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded lines
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// Number of recorded lines containing `needle`
    pub fn count_containing(&self, needle: &str) -> usize {
        self.lines().iter().filter(|l| l.contains(needle)).count()
    }
}

impl OperationLogger for MemoryLogger {
    fn info(&self, message: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(message.to_string());
        }
    }
}
