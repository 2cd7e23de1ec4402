//! Per-unit diagnostic queue.
//!
//! Features:
//! - Error limit so one broken unit cannot flood the output
//! - Deduplication of identical errors on the same line
//! - Stable position ordering on flush

use std::hash::{Hash, Hasher};

use crate::{Diagnostic, Reporter};

/// Number of characters to use for message prefix deduplication.
const MESSAGE_PREFIX_LEN: usize = 30;

#[inline]
fn message_prefix_hash(msg: &str) -> u64 {
    let byte_end = msg
        .char_indices()
        .nth(MESSAGE_PREFIX_LEN)
        .map_or(msg.len(), |(idx, _)| idx);
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    msg[..byte_end].hash(&mut hasher);
    hasher.finish()
}

/// Configuration for diagnostic collection.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct QueueConfig {
    /// Maximum number of errors kept (0 = unlimited).
    pub error_limit: usize,
    /// Drop an error whose line and message prefix match the previous error.
    pub deduplicate: bool,
}

impl Default for QueueConfig {
    fn default() -> Self {
        QueueConfig {
            error_limit: 50,
            deduplicate: true,
        }
    }
}

impl QueueConfig {
    /// No limits and no deduplication (for testing).
    pub fn unlimited() -> Self {
        QueueConfig {
            error_limit: 0,
            deduplicate: false,
        }
    }
}

/// Collects the diagnostics of one compilation unit.
///
/// Implements [`Reporter`], so it can be handed straight to a pass.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    /// Count of errors (not warnings/notes).
    error_count: usize,
    /// Errors dropped by the limit or by deduplication.
    suppressed: usize,
    /// Last (line, `message_prefix_hash`) for error dedup.
    last_error: Option<(u32, u64)>,
    config: QueueConfig,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    pub fn with_config(config: QueueConfig) -> Self {
        DiagnosticQueue {
            diagnostics: Vec::new(),
            error_count: 0,
            suppressed: 0,
            last_error: None,
            config,
        }
    }

    /// Add a diagnostic.
    ///
    /// Returns `true` if the diagnostic was kept, `false` if it was filtered.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        let is_error = diag.is_error();

        if is_error {
            if self.limit_reached() {
                self.suppressed += 1;
                return false;
            }
            let line = diag.line.unwrap_or(0);
            let key = (line, message_prefix_hash(&diag.message));
            if self.config.deduplicate && self.last_error == Some(key) {
                self.suppressed += 1;
                return false;
            }
            self.last_error = Some(key);
            self.error_count += 1;
        }

        self.diagnostics.push(diag);
        true
    }

    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Number of errors dropped by the limit or by deduplication.
    pub fn suppressed(&self) -> usize {
        self.suppressed
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Sort diagnostics by position and return them, clearing the queue.
    ///
    /// Diagnostics without a position sort first. The sort is stable, so
    /// diagnostics on the same position keep report order.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let already_sorted = self
            .diagnostics
            .windows(2)
            .all(|w| position(&w[0]) <= position(&w[1]));

        if !already_sorted {
            self.diagnostics.sort_by_key(position);
        }

        self.error_count = 0;
        self.suppressed = 0;
        self.last_error = None;
        std::mem::take(&mut self.diagnostics)
    }
}

fn position(diag: &Diagnostic) -> (u32, u32) {
    (diag.line.unwrap_or(0), diag.column.unwrap_or(0))
}

impl Reporter for DiagnosticQueue {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.add(diagnostic);
    }
}
