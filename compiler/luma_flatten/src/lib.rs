//! Syntax tree → IR lowering ("flattening").
//!
//! Every statement becomes a sequence of [`VoidNode`]s. Nested expressions
//! with side effects are pulled out into single-assignment registers so the
//! resulting blocks evaluate everything in source order, exactly once.
//!
//! Name resolution happens here as well: each identifier ends up as a local,
//! an upvalue (a local captured by a nested function) or a global, and every
//! write site is recorded in the unit's [`VariableArena`].
//!
//! Lowering is fail-fast. The first malformed or unsupported construct is
//! reported once through the [`Reporter`] and the whole unit is abandoned
//! with a [`CompilationFailure`]; no partial IR is returned.
//!
//! [`VoidNode`]: luma_ir::VoidNode

mod lower;

use luma_diagnostic::{CompilationFailure, Reporter};
use luma_ir::{AsmBlock, SyntaxNode, VariableArena};

/// Knobs for lowering.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FlattenOptions {
    /// Let nested functions read an enclosing function's `...`.
    pub allow_upvalue_varargs: bool,
    /// Emit a `LineNumber` marker before every statement with a known line.
    pub emit_line_numbers: bool,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        FlattenOptions {
            allow_upvalue_varargs: false,
            emit_line_numbers: true,
        }
    }
}

/// A lowered compilation unit.
#[derive(Clone, Debug, PartialEq)]
pub struct FlatChunk {
    pub block: AsmBlock,
    /// Every variable the block refers to. Read-only from here on.
    pub vars: VariableArena,
}

/// Lower a `Chunk` syntax tree.
///
/// # Errors
///
/// Returns a [`CompilationFailure`] after reporting a diagnostic when the
/// tree contains a construct that cannot be lowered.
#[tracing::instrument(level = "debug", skip_all)]
pub fn flatten_chunk(
    tree: &SyntaxNode,
    options: &FlattenOptions,
    reporter: &mut dyn Reporter,
) -> Result<FlatChunk, CompilationFailure> {
    let mut flattener = lower::Flattener::new(options, reporter);
    let block = flattener.flatten_chunk(tree)?;
    let vars = flattener.finish();
    tracing::debug!(
        statements = block.steps.len(),
        variables = vars.len(),
        "flattened chunk"
    );
    Ok(FlatChunk { block, vars })
}
