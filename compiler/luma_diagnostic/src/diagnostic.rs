//! Core diagnostic types.
//!
//! A [`Diagnostic`] is a severity, an optional compiler [`Phase`], an
//! optional source position, a message, an optional rendered cause and a
//! set of [`FailureTag`]s classifying it.

use std::fmt;

use crate::FailureTag;

/// Severity level for diagnostics, ordered from least to most severe.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Severity {
    Help,
    Note,
    Warning,
    Error,
}

impl Severity {
    /// Whether a diagnostic of this severity prevents code generation.
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
            Severity::Help => write!(f, "help"),
        }
    }
}

/// Compiler phase that produced a diagnostic.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Phase {
    Parsing,
    Flattening,
    Optimization,
    Verification,
    Codegen,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Parsing => "parsing",
            Phase::Flattening => "flattening",
            Phase::Optimization => "optimization",
            Phase::Verification => "verification",
            Phase::Codegen => "codegen",
        };
        f.write_str(name)
    }
}

/// A single compiler message.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub phase: Option<Phase>,
    /// 1-based source line, when known.
    pub line: Option<u32>,
    /// 0-based column within `line`, when known.
    pub column: Option<u32>,
    pub message: String,
    /// Rendered underlying cause.
    pub cause: Option<String>,
    pub tags: Vec<FailureTag>,
}

impl Diagnostic {
    /// Create a diagnostic with no position, phase, cause or tags.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            severity,
            phase: None,
            line: None,
            column: None,
            message: message.into(),
            cause: None,
            tags: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn note(message: impl Into<String>) -> Self {
        Self::new(Severity::Note, message)
    }

    /// Attach a source position. A line of 0 means "unknown" and is dropped.
    #[must_use]
    pub fn at(mut self, line: u32, column: u32) -> Self {
        if line > 0 {
            self.line = Some(line);
            self.column = Some(column);
        }
        self
    }

    #[must_use]
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    #[must_use]
    pub fn with_cause(mut self, cause: &dyn std::error::Error) -> Self {
        self.cause = Some(cause.to_string());
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: FailureTag) -> Self {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity.is_error()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(phase) = self.phase {
            write!(f, "[{phase}]")?;
        }
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(f, " {line}:{column}")?,
            (Some(line), None) => write!(f, " {line}")?,
            _ => {}
        }
        write!(f, ": {}", self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, " (caused by: {cause})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for concise assertions")]
mod tests;
