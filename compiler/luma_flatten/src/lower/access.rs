//! Suffix chains (`a.b[c](d):e(f)`) and assignment targets.

use luma_diagnostic::CompilationFailure;
use luma_ir::{ExprList, ExprNode, InvocationMethod, LValue, ListNode, SyntaxKind, SyntaxNode, VoidNode};

use super::Flattener;

impl Flattener<'_> {
    /// Lower a `Var` node. Ends in a multi-valued node when the last
    /// suffix is a call.
    pub(super) fn flatten_access(
        &mut self,
        node: &SyntaxNode,
        steps: &mut Vec<VoidNode>,
    ) -> Result<ListNode, CompilationFailure> {
        let Some((base, suffixes)) = node.children.split_first() else {
            return Err(self.bad_input(node, "malformed Var: missing base"));
        };
        self.flatten_chain(base, suffixes, steps)
    }

    fn flatten_chain(
        &mut self,
        base: &SyntaxNode,
        suffixes: &[SyntaxNode],
        steps: &mut Vec<VoidNode>,
    ) -> Result<ListNode, CompilationFailure> {
        let mut value = ListNode::Expr(self.flatten_scalar(base, steps)?);
        for suffix in suffixes {
            // A call result feeding another suffix is truncated first.
            let object = match value {
                ListNode::Expr(expr) => expr,
                multi => self.materialize_first(multi, steps),
            };
            value = match suffix.kind {
                SyntaxKind::Index => ListNode::Expr(self.flatten_index(object, suffix, steps)?),
                SyntaxKind::Call => self.flatten_call(object, Vec::new(), &suffix.children, steps)?,
                SyntaxKind::ColCall => self.flatten_method_call(object, suffix, steps)?,
                other => {
                    return Err(self.bad_input(suffix, format!("unexpected {other} in access chain")))
                }
            };
        }
        Ok(value)
    }

    /// `object[key]`, held in a fresh register.
    fn flatten_index(
        &mut self,
        object: ExprNode,
        suffix: &SyntaxNode,
        steps: &mut Vec<VoidNode>,
    ) -> Result<ExprNode, CompilationFailure> {
        let (object, key) = self.flatten_key(object, suffix, steps)?;
        Ok(self.materialize(ExprNode::index(object, key), steps))
    }

    /// Lower the key of an `Index` suffix, keeping `object` evaluated
    /// before it.
    fn flatten_key(
        &mut self,
        object: ExprNode,
        suffix: &SyntaxNode,
        steps: &mut Vec<VoidNode>,
    ) -> Result<(ExprNode, ExprNode), CompilationFailure> {
        let key_node = self.child(suffix, 0, "key")?;
        let mut later = Vec::new();
        let key = self.flatten_scalar(key_node, &mut later)?;
        let mut earlier = [object];
        self.sequence(&mut earlier, steps, later);
        let [object] = earlier;
        Ok((object, key))
    }

    /// `callee(args...)` where `leading` holds already lowered arguments.
    fn flatten_call(
        &mut self,
        callee: ExprNode,
        leading: Vec<ExprNode>,
        arguments: &[SyntaxNode],
        steps: &mut Vec<VoidNode>,
    ) -> Result<ListNode, CompilationFailure> {
        let mut earlier = Vec::with_capacity(leading.len() + arguments.len() + 1);
        earlier.push(callee);
        earlier.extend(leading);
        let (mut values, tail) = self.flatten_operands(earlier, arguments, true, steps)?;
        let callee = values.remove(0);
        Ok(ListNode::invocation(
            callee,
            InvocationMethod::Call,
            ExprList::new(values, tail),
        ))
    }

    /// `receiver:name(args...)` is `receiver.name(receiver, args...)` with
    /// the receiver evaluated once.
    fn flatten_method_call(
        &mut self,
        receiver: ExprNode,
        suffix: &SyntaxNode,
        steps: &mut Vec<VoidNode>,
    ) -> Result<ListNode, CompilationFailure> {
        let name = self.child(suffix, 0, "method name")?;
        self.expect_kind(name, SyntaxKind::Name)?;

        // Only constants and registers may appear twice; a table or function
        // literal builds a fresh value on each evaluation.
        let receiver = self.materialize(receiver, steps);
        let method = ExprNode::index(receiver.clone(), ExprNode::string(name.text()));
        let method = self.materialize(method, steps);
        self.flatten_call(method, vec![receiver], &suffix.children[1..], steps)
    }

    /// Lower one assignment target. Only the table and key of a field are
    /// evaluated here; the write happens later.
    pub(super) fn flatten_target(
        &mut self,
        node: &SyntaxNode,
        steps: &mut Vec<VoidNode>,
    ) -> Result<LValue, CompilationFailure> {
        match node.kind {
            SyntaxKind::Name => Ok(LValue::Name(self.resolve(node.text()))),
            SyntaxKind::AssignmentVar => {
                let Some((base, rest)) = node.children.split_first() else {
                    return Err(self.bad_input(node, "malformed AssignmentVar: missing base"));
                };
                let Some((last, suffixes)) = rest.split_last() else {
                    return Err(self.bad_input(node, "cannot assign to this expression"));
                };
                if !last.is(SyntaxKind::Index) {
                    return Err(self.bad_input(last, "cannot assign to a call result"));
                }
                let table = self.flatten_chain(base, suffixes, steps)?;
                let table = match table {
                    ListNode::Expr(expr) => expr,
                    multi => self.materialize_first(multi, steps),
                };
                let (table, key) = self.flatten_key(table, last, steps)?;
                Ok(LValue::TableField { table, key })
            }
            other => Err(self.bad_input(node, format!("cannot assign to {other}"))),
        }
    }
}
