//! Reporter seam.
//!
//! Passes receive a `&mut dyn Reporter` and never decide where messages go.

use crate::{Diagnostic, Phase, Severity};

/// Sink for compiler diagnostics.
pub trait Reporter {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

/// Discards everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}

/// Forwards diagnostics to `tracing` at a level matching their severity.
#[derive(Copy, Clone, Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => tracing::error!(%diagnostic),
            Severity::Warning => tracing::warn!(%diagnostic),
            Severity::Note => tracing::info!(%diagnostic),
            Severity::Help => tracing::debug!(%diagnostic),
        }
    }
}

/// Stamps a phase onto diagnostics that do not carry one yet.
pub struct PhaseReporter<'a> {
    inner: &'a mut dyn Reporter,
    phase: Phase,
}

impl<'a> PhaseReporter<'a> {
    pub fn new(inner: &'a mut dyn Reporter, phase: Phase) -> Self {
        PhaseReporter { inner, phase }
    }
}

impl Reporter for PhaseReporter<'_> {
    fn report(&mut self, mut diagnostic: Diagnostic) {
        if diagnostic.phase.is_none() {
            diagnostic.phase = Some(self.phase);
        }
        self.inner.report(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DiagnosticQueue;
    use pretty_assertions::assert_eq;

    #[test]
    fn phase_reporter_fills_missing_phase_only() {
        let mut queue = DiagnosticQueue::new();
        {
            let mut reporter = PhaseReporter::new(&mut queue, Phase::Optimization);
            reporter.report(Diagnostic::warning("a").at(1, 0));
            reporter.report(
                Diagnostic::error("b")
                    .at(2, 0)
                    .with_phase(Phase::Verification),
            );
        }
        let phases: Vec<_> = queue.flush().into_iter().map(|d| d.phase).collect();
        assert_eq!(
            phases,
            vec![Some(Phase::Optimization), Some(Phase::Verification)]
        );
    }

    #[test]
    fn null_reporter_accepts_anything() {
        let mut reporter = NullReporter;
        reporter.report(Diagnostic::error("ignored"));
    }

    #[test]
    fn tracing_reporter_without_subscriber() {
        let mut reporter = TracingReporter;
        reporter.report(Diagnostic::warning("unused").at(3, 1));
        reporter.report(Diagnostic::error("logged").at(4, 0));
    }
}
