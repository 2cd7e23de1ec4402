//! Constant folding and local simplification.
//!
//! A bottom-up rewrite over a lowered unit. Children are folded first, then
//! the node itself is checked against a small set of rules:
//!
//! - `not x` with `x` provably truthy or falsy becomes a boolean literal
//! - `a and b` / `a or b` with a provably truthy or falsy `a` keeps only the
//!   operand that decides the result
//! - `select n [e0, e1, ..., tail]` picks the element directly
//!
//! A rule never removes a side effect. Only pure operands are ever dropped,
//! and truthiness is only ever taken from the first operand of a logical
//! operator.
//!
//! If/elseif arms whose condition is provably false are kept, but reported
//! as a warning.

use std::num::NonZeroU32;

use luma_diagnostic::{Diagnostic, Phase, Reporter};
use luma_ir::fold::{walk_block, walk_expr, walk_void, Folder};
use luma_ir::{
    AsmBlock, ExprList, ExprNode, IfClause, ListNode, Logical, LogicalOp, Select, VariableArena,
    VoidNode,
};

/// Knobs for the folder.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FoldOptions {
    /// Warn about if/elseif conditions that can never hold.
    pub warn_constant_conditions: bool,
}

impl Default for FoldOptions {
    fn default() -> Self {
        FoldOptions {
            warn_constant_conditions: true,
        }
    }
}

/// Fold a whole unit.
#[tracing::instrument(level = "debug", skip_all)]
pub fn fold_chunk(
    block: AsmBlock,
    vars: &VariableArena,
    options: &FoldOptions,
    reporter: &mut dyn Reporter,
) -> AsmBlock {
    let mut folder = ConstantFolder::new(vars, options, reporter);
    let block = folder.fold_block(block);
    tracing::debug!(simplified = folder.simplified(), "folded chunk");
    block
}

pub struct ConstantFolder<'a> {
    vars: &'a VariableArena,
    options: &'a FoldOptions,
    reporter: &'a mut dyn Reporter,
    /// Line of the most recent `LineNumber` marker.
    line: Option<NonZeroU32>,
    simplified: usize,
}

impl<'a> ConstantFolder<'a> {
    pub fn new(
        vars: &'a VariableArena,
        options: &'a FoldOptions,
        reporter: &'a mut dyn Reporter,
    ) -> Self {
        ConstantFolder {
            vars,
            options,
            reporter,
            line: None,
            simplified: 0,
        }
    }

    /// Number of rewrites applied so far.
    pub fn simplified(&self) -> usize {
        self.simplified
    }

    fn simplify(&self, node: ExprNode) -> Rewrite {
        match node {
            ExprNode::Not(operand) => self.simplify_not(*operand),
            ExprNode::Logical(logical) => self.simplify_logical(logical),
            ExprNode::Select(select) => self.simplify_select(select),
            other => Rewrite::Unchanged(other),
        }
    }

    fn simplify_not(&self, operand: ExprNode) -> Rewrite {
        if operand.is_pure(self.vars) {
            if operand.always_true(self.vars) {
                return Rewrite::Simplified(ExprNode::Bool(false), "not-truthy");
            }
            if operand.always_false() {
                return Rewrite::Simplified(ExprNode::Bool(true), "not-falsy");
            }
        }
        Rewrite::Unchanged(ExprNode::Not(Box::new(operand)))
    }

    fn simplify_logical(&self, logical: Logical) -> Rewrite {
        let first = &logical.first;
        if !first.is_pure(self.vars) {
            return Rewrite::Unchanged(ExprNode::Logical(logical));
        }
        let truthy = first.always_true(self.vars);
        let falsy = first.always_false();
        let Logical { op, first, second } = logical;
        match (op, truthy, falsy) {
            (LogicalOp::And, true, _) | (LogicalOp::Or, _, true) => {
                Rewrite::Simplified(*second, "short-circuit-second")
            }
            (LogicalOp::And, _, true) | (LogicalOp::Or, true, _) => {
                Rewrite::Simplified(*first, "short-circuit-first")
            }
            _ => Rewrite::Unchanged(ExprNode::Logical(Logical { op, first, second })),
        }
    }

    fn simplify_select(&self, select: Select) -> Rewrite {
        let Select { source, n } = select;
        let ListNode::ExprList(list) = *source else {
            return Rewrite::Unchanged(ExprNode::Select(Select { source, n }));
        };
        let (mut leading, trailing) = list.into_parts();

        let others_pure = leading
            .iter()
            .enumerate()
            .all(|(i, element)| i == n || element.is_pure(self.vars));
        if others_pure {
            if n < leading.len() {
                let tail_pure = trailing.as_ref().map_or(true, |tail| tail.is_pure(self.vars));
                if tail_pure {
                    return Rewrite::Simplified(leading.swap_remove(n), "select-element");
                }
            } else {
                let offset = n - leading.len();
                return match trailing {
                    None => Rewrite::Simplified(ExprNode::Nil, "select-past-end"),
                    Some(tail) => {
                        let inner = ExprNode::select(tail, offset);
                        match self.simplify(inner) {
                            Rewrite::Simplified(node, rule) => Rewrite::Simplified(node, rule),
                            Rewrite::Unchanged(node) => {
                                Rewrite::Simplified(node, "select-tail")
                            }
                        }
                    }
                };
            }
        }

        Rewrite::Unchanged(ExprNode::select(
            ListNode::ExprList(ExprList::new(leading, trailing)),
            n,
        ))
    }

    fn check_conditions(&mut self, clauses: &[IfClause], line: Option<NonZeroU32>) {
        if !self.options.warn_constant_conditions {
            return;
        }
        for clause in clauses {
            if clause.condition.value.always_false() {
                let mut diagnostic = Diagnostic::warning(format!(
                    "condition `{}` is always false; this branch never runs",
                    clause.condition.value
                ))
                .with_phase(Phase::Optimization);
                diagnostic.line = line.map(NonZeroU32::get);
                self.reporter.report(diagnostic);
            }
        }
    }
}

/// Outcome of applying the rules to one node.
enum Rewrite {
    Simplified(ExprNode, &'static str),
    Unchanged(ExprNode),
}

impl Folder for ConstantFolder<'_> {
    fn fold_block(&mut self, block: AsmBlock) -> AsmBlock {
        luma_stack::ensure_sufficient_stack(|| walk_block(self, block))
    }

    fn fold_void(&mut self, node: VoidNode) -> VoidNode {
        match node {
            VoidNode::LineNumber(line) => {
                self.line = Some(line);
                node
            }
            VoidNode::IfElseChain(_) => {
                let line = self.line;
                let folded = walk_void(self, node);
                if let VoidNode::IfElseChain(clauses) = &folded {
                    self.check_conditions(clauses, line);
                }
                folded
            }
            other => walk_void(self, other),
        }
    }

    fn fold_expr(&mut self, node: ExprNode) -> ExprNode {
        let node = luma_stack::ensure_sufficient_stack(|| walk_expr(self, node));
        let before = tracing::enabled!(tracing::Level::TRACE).then(|| node.to_string());
        match self.simplify(node) {
            Rewrite::Simplified(after, rule) => {
                self.simplified += 1;
                if let Some(before) = before {
                    tracing::trace!(rule, "\"{before}\" simplified to \"{after}\"");
                }
                after
            }
            Rewrite::Unchanged(node) => node,
        }
    }
}

#[cfg(test)]
mod tests;
