//! Running units through the passes.

use luma_diagnostic::{
    CompilationFailure, Diagnostic, DiagnosticQueue, Phase, PhaseReporter, Reporter,
    TracingReporter,
};
use luma_flatten::{flatten_chunk, FlatChunk};
use luma_ir::SyntaxNode;
use luma_opt::{fold_chunk, verify_single_assignment};
use rayon::prelude::*;

use crate::PipelineConfig;

/// One independent compilation unit, as handed over by the parser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceUnit {
    pub name: String,
    pub tree: SyntaxNode,
}

impl SourceUnit {
    pub fn new(name: impl Into<String>, tree: SyntaxNode) -> Self {
        SourceUnit {
            name: name.into(),
            tree,
        }
    }
}

/// What came out of one unit.
#[derive(Debug)]
pub struct UnitReport {
    pub name: String,
    pub outcome: Result<FlatChunk, CompilationFailure>,
    /// Sorted by position.
    pub diagnostics: Vec<Diagnostic>,
}

impl UnitReport {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Run one unit through every enabled pass.
///
/// # Errors
///
/// Returns the failure of the first pass that rejects the unit, after it
/// has reported its diagnostics.
///
/// Diagnostics reaching `reporter` without a phase get the phase of the
/// pass that raised them.
pub fn compile_unit(
    tree: &SyntaxNode,
    config: &PipelineConfig,
    reporter: &mut dyn Reporter,
) -> Result<FlatChunk, CompilationFailure> {
    let FlatChunk { block, vars } = flatten_chunk(
        tree,
        &config.flatten,
        &mut PhaseReporter::new(&mut *reporter, Phase::Flattening),
    )?;
    let block = match &config.fold {
        Some(options) => fold_chunk(
            block,
            &vars,
            options,
            &mut PhaseReporter::new(&mut *reporter, Phase::Optimization),
        ),
        None => block,
    };
    if config.verify {
        verify_single_assignment(
            &block,
            &mut PhaseReporter::new(&mut *reporter, Phase::Verification),
        )?;
    }
    Ok(FlatChunk { block, vars })
}

/// Compile independent units, in parallel when configured.
///
/// Reports come back in the order of `units`.
#[tracing::instrument(level = "debug", skip_all, fields(units = units.len()))]
pub fn compile_units(units: &[SourceUnit], config: &PipelineConfig) -> Vec<UnitReport> {
    let reports: Vec<UnitReport> = if config.parallel {
        units.par_iter().map(|unit| run_unit(unit, config)).collect()
    } else {
        units.iter().map(|unit| run_unit(unit, config)).collect()
    };
    let failed = reports.iter().filter(|report| !report.is_ok()).count();
    tracing::debug!(failed, "compiled units");
    reports
}

/// Compile one unit against its own queue, mirroring its diagnostics to
/// `tracing`.
fn run_unit(unit: &SourceUnit, config: &PipelineConfig) -> UnitReport {
    let span = tracing::debug_span!("unit", name = %unit.name);
    let _guard = span.enter();

    let mut queue = DiagnosticQueue::with_config(config.diagnostics.clone());
    let outcome = compile_unit(&unit.tree, config, &mut queue);
    if let Err(failure) = &outcome {
        tracing::debug!(%failure, errors = queue.error_count(), "unit failed");
    }
    let diagnostics = queue.flush();
    for diagnostic in &diagnostics {
        TracingReporter.report(diagnostic.clone());
    }
    UnitReport {
        name: unit.name.clone(),
        outcome,
        diagnostics,
    }
}
