//! The lowering engine.
//!
//! [`Flattener`] owns the unit's variable arena and a stack of lexical
//! scopes. The per-construct code lives in submodules:
//! - `scope`: scope stack, declarations, name resolution
//! - `stmt`: statements and control flow
//! - `expr`: operators, constants, short-circuit logic
//! - `access`: `a.b[c](d):e(f)` chains and assignment targets
//! - `assign`: multiple assignment
//! - `table`: table constructors
//! - `function`: function literals and parameter lists
//!
//! Expression lowering appends preparatory statements to a caller-supplied
//! `Vec<VoidNode>` and returns the node producing the value.

mod access;
mod assign;
mod expr;
mod function;
mod scope;
mod stmt;
mod table;

use luma_diagnostic::{CompilationFailure, Diagnostic, FailureTag, Phase, Reporter};
use luma_ir::{ExprNode, ListNode, Register, SyntaxKind, SyntaxNode, VariableArena, VoidNode};

use crate::FlattenOptions;
use scope::{Scope, ScopeKind};

pub(crate) struct Flattener<'a> {
    options: &'a FlattenOptions,
    reporter: &'a mut dyn Reporter,
    vars: VariableArena,
    scopes: Vec<Scope>,
}

impl<'a> Flattener<'a> {
    pub(crate) fn new(options: &'a FlattenOptions, reporter: &'a mut dyn Reporter) -> Self {
        Flattener {
            options,
            reporter,
            vars: VariableArena::new(),
            scopes: Vec::new(),
        }
    }

    pub(crate) fn finish(self) -> VariableArena {
        debug_assert!(self.scopes.is_empty(), "unbalanced scope stack");
        self.vars
    }

    /// Lower the main chunk. It behaves like the body of a vararg function.
    pub(crate) fn flatten_chunk(
        &mut self,
        tree: &SyntaxNode,
    ) -> Result<luma_ir::AsmBlock, CompilationFailure> {
        if !tree.is(SyntaxKind::Chunk) {
            return Err(self.bad_input(tree, format!("expected a chunk, found {}", tree.kind)));
        }
        self.flatten_block(tree, ScopeKind::Function { varargs: true })
    }

    // Diagnostics

    /// Report malformed or unsupported input and produce the failure to
    /// return.
    #[cold]
    fn bad_input(&mut self, node: &SyntaxNode, message: impl Into<String>) -> CompilationFailure {
        self.fail(node, Diagnostic::error(message), &[FailureTag::BadInput])
    }

    #[cold]
    fn unsupported(&mut self, node: &SyntaxNode, message: impl Into<String>) -> CompilationFailure {
        self.fail(
            node,
            Diagnostic::error(message),
            &[FailureTag::BadInput, FailureTag::UnsupportedFeature],
        )
    }

    #[cold]
    fn fail(
        &mut self,
        node: &SyntaxNode,
        diagnostic: Diagnostic,
        tags: &[FailureTag],
    ) -> CompilationFailure {
        let mut diagnostic = diagnostic
            .at(node.line, node.column)
            .with_phase(Phase::Flattening);
        for &tag in tags {
            diagnostic = diagnostic.with_tag(tag);
        }
        tracing::debug!(%diagnostic, "lowering failed");
        self.reporter.report(diagnostic);
        CompilationFailure::with_tags(tags.iter().copied())
    }

    /// Child `index` of `node`, or a bad-input failure naming what was
    /// expected there.
    fn child<'n>(
        &mut self,
        node: &'n SyntaxNode,
        index: usize,
        what: &str,
    ) -> Result<&'n SyntaxNode, CompilationFailure> {
        match node.child(index) {
            Some(child) => Ok(child),
            None => Err(self.bad_input(node, format!("malformed {}: missing {what}", node.kind))),
        }
    }

    fn expect_kind(
        &mut self,
        node: &SyntaxNode,
        kind: SyntaxKind,
    ) -> Result<(), CompilationFailure> {
        if node.is(kind) {
            Ok(())
        } else {
            Err(self.bad_input(node, format!("expected {kind}, found {}", node.kind)))
        }
    }

    // Registers

    /// Evaluate `value` into a fresh register unless it already is one or
    /// is a constant.
    fn materialize(&mut self, value: ExprNode, steps: &mut Vec<VoidNode>) -> ExprNode {
        if value.is_constant() || matches!(value, ExprNode::Register(_)) {
            return value;
        }
        let register = Register::for_value(&value, &self.vars);
        steps.push(VoidNode::assign(register.clone(), value, &self.vars));
        ExprNode::Register(register)
    }

    /// Truncate a list to one value held in a register.
    fn materialize_first(&mut self, list: ListNode, steps: &mut Vec<VoidNode>) -> ExprNode {
        let first = ExprNode::first_only(list);
        self.materialize(first, steps)
    }

    /// Run `later` after every value in `earlier` has been pinned down, so
    /// side effects of `later` cannot change what the earlier values were.
    fn sequence(
        &mut self,
        earlier: &mut [ExprNode],
        steps: &mut Vec<VoidNode>,
        later: Vec<VoidNode>,
    ) {
        if later.is_empty() {
            return;
        }
        for value in earlier.iter_mut() {
            if !is_stable(value) {
                let unpinned = std::mem::replace(value, ExprNode::Nil);
                *value = self.materialize(unpinned, steps);
            }
        }
        steps.extend(later);
    }
}

/// Whether no statement can change the value of `node` or observe its
/// evaluation.
fn is_stable(node: &ExprNode) -> bool {
    match node {
        ExprNode::Number(_)
        | ExprNode::String(_)
        | ExprNode::Bool(_)
        | ExprNode::Nil
        | ExprNode::Register(_)
        | ExprNode::Function(_) => true,
        ExprNode::Name(_) | ExprNode::Invocation(_) => false,
        ExprNode::Table(table) => table
            .entries
            .iter()
            .all(|(key, value)| is_stable(key) && value.as_expr().is_some_and(is_stable)),
        ExprNode::Not(operand) => is_stable(operand),
        ExprNode::Logical(logical) => is_stable(&logical.first) && is_stable(&logical.second),
        ExprNode::Select(select) => {
            matches!(&*select.source, ListNode::Varargs | ListNode::ArrayRegister(_))
        }
    }
}
