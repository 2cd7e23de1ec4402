//! Single and multiple assignment.
//!
//! `a, b, c = x, f()` evaluates every target component and every value
//! before any write happens. Values beyond the targets are still evaluated
//! for their side effects; targets beyond the values pull from the last
//! value when it is multi-valued and get `nil` otherwise.

use luma_diagnostic::CompilationFailure;
use luma_ir::{
    ExprList, ExprNode, InvocationMethod, LValue, ListNode, Register, SyntaxKind, SyntaxNode,
    TypeSource, VarId, VoidNode,
};
use smallvec::SmallVec;

use super::{is_stable, Flattener};

type Targets = SmallVec<[LValue; 4]>;

impl Flattener<'_> {
    /// `targets = values`
    pub(super) fn flatten_assignment(
        &mut self,
        statement: &SyntaxNode,
        steps: &mut Vec<VoidNode>,
    ) -> Result<(), CompilationFailure> {
        let var_list = self.child(statement, 0, "targets")?;
        let expr_list = self.child(statement, 1, "values")?;
        self.expect_kind(var_list, SyntaxKind::VarList)?;
        self.expect_kind(expr_list, SyntaxKind::ExprList)?;
        if var_list.children.is_empty() || expr_list.children.is_empty() {
            return Err(self.bad_input(statement, "malformed Assignment: empty side"));
        }

        let mut targets = Targets::new();
        for var in &var_list.children {
            let mut later = Vec::new();
            let target = self.flatten_target(var, &mut later)?;
            if !later.is_empty() {
                self.pin_targets(&mut targets, steps);
                steps.extend(later);
            }
            targets.push(target);
        }

        let mut values = Vec::with_capacity(expr_list.children.len());
        let mut tail = None;
        let count = expr_list.children.len();
        for (i, node) in expr_list.children.iter().enumerate() {
            let mut later = Vec::new();
            let value = self.flatten_expr(node, &mut later)?;
            if !later.is_empty() {
                self.pin_targets(&mut targets, steps);
                self.sequence(&mut values, steps, later);
            }
            if i + 1 == count && value.is_vararg() {
                tail = Some(value);
            } else {
                values.push(ExprNode::first_only(value));
            }
        }

        let elements = values.len() + usize::from(tail.is_some());
        let stabilize = targets.len() > 1 || elements > 1;
        self.emit_assignment(targets, values, tail, stabilize, steps);
        Ok(())
    }

    /// `local names = values`. The names come into scope after the values
    /// are evaluated.
    pub(super) fn flatten_local_assignment(
        &mut self,
        statement: &SyntaxNode,
        steps: &mut Vec<VoidNode>,
    ) -> Result<(), CompilationFailure> {
        let names = self.child(statement, 0, "names")?;
        self.expect_kind(names, SyntaxKind::NameList)?;
        for name in &names.children {
            self.expect_kind(name, SyntaxKind::Name)?;
        }
        if names.children.is_empty() {
            return Err(self.bad_input(names, "malformed LocalAssignment: no names"));
        }

        let (values, tail) = match statement.child(1) {
            Some(exprs) => {
                self.expect_kind(exprs, SyntaxKind::ExprList)?;
                self.flatten_operands(Vec::new(), &exprs.children, true, steps)?
            }
            None => (Vec::new(), None),
        };

        let targets: Targets = names
            .children
            .iter()
            .map(|name| {
                let id = self.declare(name.text());
                steps.push(VoidNode::Declare(id));
                LValue::Name(id)
            })
            .collect();
        // Fresh locals cannot be observed by the values, so no pinning.
        self.emit_assignment(targets, values, tail, false, steps);
        Ok(())
    }

    /// Write `values` (and `tail`) to `targets`.
    ///
    /// With `stabilize` set every target component and value is pinned
    /// and all side effects happen before the first write.
    fn emit_assignment(
        &mut self,
        mut targets: Targets,
        mut values: Vec<ExprNode>,
        tail: Option<ListNode>,
        stabilize: bool,
        steps: &mut Vec<VoidNode>,
    ) {
        let written = targets.len().min(values.len());
        let pulls = if tail.is_some() {
            targets.len() - written
        } else {
            0
        };
        let extras = values.split_off(written);

        if stabilize {
            self.pin_targets(&mut targets, steps);
            self.pin_all(&mut values, steps);
        }
        let mut deferred = Vec::new();
        for extra in extras {
            if !extra.is_pure(&self.vars) {
                let discard = VoidNode::Discard(ListNode::Expr(extra));
                if stabilize {
                    steps.push(discard);
                } else {
                    deferred.push(discard);
                }
            }
        }

        let mut source = TailSource::Unused;
        if let Some(tail) = tail {
            source = match pulls {
                0 => {
                    if !tail.is_pure(&self.vars) {
                        let discard = VoidNode::Discard(tail);
                        if stabilize {
                            steps.push(discard);
                        } else {
                            deferred.push(discard);
                        }
                    }
                    TailSource::Unused
                }
                1 if stabilize => TailSource::Single(self.materialize_first(tail, steps)),
                1 => TailSource::Single(ExprNode::select(tail, 0)),
                _ if stabilize => TailSource::Array(self.spill(tail, steps)),
                _ => TailSource::Pending(tail),
            };
        }

        let mut values = values.into_iter();
        for (i, target) in targets.into_iter().enumerate() {
            let value = match values.next() {
                Some(value) => value,
                None => source.pull(i - written, steps),
            };
            self.write_target(target, value, steps);
        }
        steps.extend(deferred);
    }

    /// Pin every component of table field targets.
    fn pin_targets(&mut self, targets: &mut [LValue], steps: &mut Vec<VoidNode>) {
        for target in targets {
            if let LValue::TableField { table, key } = target {
                self.pin(table, steps);
                self.pin(key, steps);
            }
        }
    }

    fn pin_all(&mut self, values: &mut [ExprNode], steps: &mut Vec<VoidNode>) {
        for value in values {
            self.pin(value, steps);
        }
    }

    fn pin(&mut self, value: &mut ExprNode, steps: &mut Vec<VoidNode>) {
        if !is_stable(value) {
            let unpinned = std::mem::replace(value, ExprNode::Nil);
            *value = self.materialize(unpinned, steps);
        }
    }

    /// Evaluate a multi-valued node once into a vararg register.
    fn spill(&mut self, tail: ListNode, steps: &mut Vec<VoidNode>) -> Register {
        let register = Register::vararg();
        steps.push(VoidNode::assign_array(register.clone(), tail));
        register
    }

    fn write_target(&mut self, target: LValue, value: ExprNode, steps: &mut Vec<VoidNode>) {
        match target {
            LValue::Name(id) => self.write_variable(id, value, steps),
            LValue::TableField { table, key } => {
                steps.push(VoidNode::Discard(ListNode::invocation(
                    table,
                    InvocationMethod::SetIndex,
                    ExprList::of(vec![key, value]),
                )));
            }
        }
    }

    /// Write `value` to a variable, recording the write site and its type.
    pub(super) fn write_variable(&mut self, id: VarId, value: ExprNode, steps: &mut Vec<VoidNode>) {
        let source = TypeSource::for_value(&value, &self.vars);
        self.vars.record_write(id, source);
        steps.push(VoidNode::Write { target: id, value });
    }
}

/// Where targets past the explicit values get theirs from.
enum TailSource {
    Unused,
    Single(ExprNode),
    /// Spilled into a vararg register on first use.
    Pending(ListNode),
    Array(Register),
}

impl TailSource {
    fn pull(&mut self, offset: usize, steps: &mut Vec<VoidNode>) -> ExprNode {
        match std::mem::replace(self, TailSource::Unused) {
            TailSource::Unused => ExprNode::Nil,
            TailSource::Single(value) if offset == 0 => value,
            TailSource::Single(_) => ExprNode::Nil,
            TailSource::Pending(tail) => {
                let register = Register::vararg();
                steps.push(VoidNode::assign_array(register.clone(), tail));
                *self = TailSource::Array(register);
                self.pull(offset, steps)
            }
            TailSource::Array(register) => {
                let value = ExprNode::select(ListNode::array_register(register.clone()), offset);
                *self = TailSource::Array(register);
                value
            }
        }
    }
}
