//! Operators, constants and short-circuit logic.

use luma_diagnostic::{CompilationFailure, Diagnostic, FailureTag};
use luma_ir::names::next_name;
use luma_ir::{
    AsmBlock, ExprList, ExprNode, FlatExpr, IfClause, InvocationMethod, ListNode, LogicalOp,
    SyntaxKind, SyntaxNode, VoidNode,
};

use super::scope::ScopeKind;
use super::{is_stable, Flattener};

/// How a binary operator maps onto invocations.
#[derive(Copy, Clone, Debug)]
enum BinaryLowering {
    Direct(InvocationMethod),
    /// `a > b` is `b < a`, `a >= b` is `b <= a`.
    Swapped(InvocationMethod),
    /// `a ~= b` is `not (a == b)`.
    NotEqual,
}

fn binary_lowering(kind: SyntaxKind) -> Option<BinaryLowering> {
    use BinaryLowering::{Direct, NotEqual, Swapped};
    use InvocationMethod as M;
    Some(match kind {
        SyntaxKind::Add => Direct(M::Add),
        SyntaxKind::Sub => Direct(M::Sub),
        SyntaxKind::Mul => Direct(M::Mul),
        SyntaxKind::Div => Direct(M::Div),
        SyntaxKind::IDiv => Direct(M::IDiv),
        SyntaxKind::Pow => Direct(M::Pow),
        SyntaxKind::Mod => Direct(M::Mod),
        SyntaxKind::Concat => Direct(M::Concat),
        SyntaxKind::Eq => Direct(M::Eq),
        SyntaxKind::Lt => Direct(M::Lt),
        SyntaxKind::LtEq => Direct(M::Le),
        SyntaxKind::BitAnd => Direct(M::BAnd),
        SyntaxKind::BitOr => Direct(M::BOr),
        SyntaxKind::BitXor => Direct(M::BXor),
        SyntaxKind::Shl => Direct(M::Shl),
        SyntaxKind::Shr => Direct(M::Shr),
        SyntaxKind::Gt => Swapped(M::Lt),
        SyntaxKind::GtEq => Swapped(M::Le),
        SyntaxKind::NotEq => NotEqual,
        _ => return None,
    })
}

impl Flattener<'_> {
    /// Lower an expression. The result is multi-valued only for calls and
    /// `...`.
    pub(super) fn flatten_expr(
        &mut self,
        node: &SyntaxNode,
        steps: &mut Vec<VoidNode>,
    ) -> Result<ListNode, CompilationFailure> {
        luma_stack::ensure_sufficient_stack(|| self.flatten_expr_inner(node, steps))
    }

    /// Lower an expression truncated to its first value.
    pub(super) fn flatten_scalar(
        &mut self,
        node: &SyntaxNode,
        steps: &mut Vec<VoidNode>,
    ) -> Result<ExprNode, CompilationFailure> {
        Ok(ExprNode::first_only(self.flatten_expr(node, steps)?))
    }

    fn flatten_expr_inner(
        &mut self,
        node: &SyntaxNode,
        steps: &mut Vec<VoidNode>,
    ) -> Result<ListNode, CompilationFailure> {
        let value = match node.kind {
            SyntaxKind::Number => self.number(node)?,
            SyntaxKind::String => ExprNode::string(node.text()),
            SyntaxKind::Nil => ExprNode::Nil,
            SyntaxKind::True => ExprNode::Bool(true),
            SyntaxKind::False => ExprNode::Bool(false),
            SyntaxKind::DotDotDot => {
                if !self.varargs_in_scope() {
                    return Err(self.bad_input(node, "cannot use `...` outside a vararg function"));
                }
                return Ok(ListNode::varargs());
            }
            SyntaxKind::Name => ExprNode::name(self.resolve(node.text())),
            SyntaxKind::Var => return self.flatten_access(node, steps),
            SyntaxKind::Function => self.flatten_function(node, false)?,
            SyntaxKind::Table => self.flatten_table(node, steps)?,
            SyntaxKind::Paren => {
                let inner = self.child(node, 0, "expression")?;
                self.flatten_scalar(inner, steps)?
            }
            SyntaxKind::Not => self.flatten_not(node, steps)?,
            SyntaxKind::And => self.flatten_logical(node, LogicalOp::And, steps)?,
            SyntaxKind::Or => self.flatten_logical(node, LogicalOp::Or, steps)?,
            SyntaxKind::Neg => self.flatten_unary(node, InvocationMethod::Unm, steps)?,
            SyntaxKind::Len => self.flatten_unary(node, InvocationMethod::Len, steps)?,
            SyntaxKind::BitNot => self.flatten_unary(node, InvocationMethod::BNot, steps)?,
            kind => match binary_lowering(kind) {
                Some(lowering) => self.flatten_binary(node, lowering, steps)?,
                None => return Err(self.bad_input(node, format!("unknown expression: {kind}"))),
            },
        };
        Ok(ListNode::Expr(value))
    }

    // Operand lists

    /// Lower `nodes` left to right after the already lowered `earlier`
    /// values. Every node but the last is truncated to one value; the last
    /// one stays multi-valued when `keep_tail` is set.
    pub(super) fn flatten_operands(
        &mut self,
        earlier: Vec<ExprNode>,
        nodes: &[SyntaxNode],
        keep_tail: bool,
        steps: &mut Vec<VoidNode>,
    ) -> Result<(Vec<ExprNode>, Option<ListNode>), CompilationFailure> {
        let mut values = earlier;
        values.reserve(nodes.len());
        let mut tail = None;
        for (i, node) in nodes.iter().enumerate() {
            let mut later = Vec::new();
            let value = self.flatten_expr(node, &mut later)?;
            self.sequence(&mut values, steps, later);
            if keep_tail && i + 1 == nodes.len() && value.is_vararg() {
                tail = Some(value);
            } else {
                values.push(ExprNode::first_only(value));
            }
        }
        Ok((values, tail))
    }

    pub(super) fn flatten_scalars(
        &mut self,
        nodes: &[SyntaxNode],
        steps: &mut Vec<VoidNode>,
    ) -> Result<Vec<ExprNode>, CompilationFailure> {
        self.flatten_operands(Vec::new(), nodes, false, steps)
            .map(|(values, _)| values)
    }

    pub(super) fn flatten_expr_list(
        &mut self,
        nodes: &[SyntaxNode],
        steps: &mut Vec<VoidNode>,
    ) -> Result<ExprList, CompilationFailure> {
        let (values, tail) = self.flatten_operands(Vec::new(), nodes, true, steps)?;
        Ok(ExprList::new(values, tail))
    }

    // Constants

    /// Decimal or hexadecimal numeral. Hexadecimal integers wrap around
    /// modulo 2^64.
    #[expect(
        clippy::cast_possible_wrap,
        clippy::cast_precision_loss,
        reason = "hex integer literals wrap like the runtime's integers"
    )]
    fn number(&mut self, node: &SyntaxNode) -> Result<ExprNode, CompilationFailure> {
        let text = node.text().trim();
        let hex = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"));
        if let Some(digits) = hex {
            return match u64::from_str_radix(digits, 16) {
                Ok(value) => Ok(ExprNode::number(value as i64 as f64)),
                Err(err) => Err(self.malformed_number(node, &err)),
            };
        }
        if !text.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
            return Err(self.bad_input(node, format!("malformed number `{text}`")));
        }
        match text.parse::<f64>() {
            Ok(value) => Ok(ExprNode::number(value)),
            Err(err) => Err(self.malformed_number(node, &err)),
        }
    }

    #[cold]
    fn malformed_number(
        &mut self,
        node: &SyntaxNode,
        cause: &dyn std::error::Error,
    ) -> CompilationFailure {
        let diagnostic =
            Diagnostic::error(format!("malformed number `{}`", node.text())).with_cause(cause);
        self.fail(node, diagnostic, &[FailureTag::BadInput])
    }

    // Operators

    fn flatten_unary(
        &mut self,
        node: &SyntaxNode,
        method: InvocationMethod,
        steps: &mut Vec<VoidNode>,
    ) -> Result<ExprNode, CompilationFailure> {
        let operand_node = self.child(node, 0, "operand")?;
        let operand = self.flatten_scalar(operand_node, steps)?;
        if let (InvocationMethod::Unm, ExprNode::Number(value)) = (method, &operand) {
            return Ok(ExprNode::number(-value));
        }
        Ok(ExprNode::invocation(operand, method, ExprList::empty()))
    }

    fn flatten_binary(
        &mut self,
        node: &SyntaxNode,
        lowering: BinaryLowering,
        steps: &mut Vec<VoidNode>,
    ) -> Result<ExprNode, CompilationFailure> {
        if node.children.len() != 2 {
            return Err(self.bad_input(node, format!("malformed {}: expected 2 operands", node.kind)));
        }
        let mut operands = self.flatten_scalars(&node.children, steps)?.into_iter();
        let (Some(lhs), Some(rhs)) = (operands.next(), operands.next()) else {
            return Err(self.bad_input(node, format!("malformed {}: missing operand", node.kind)));
        };

        Ok(match lowering {
            BinaryLowering::Direct(method) => {
                ExprNode::invocation(lhs, method, ExprList::of(vec![rhs]))
            }
            BinaryLowering::Swapped(method) => {
                // The right operand becomes the receiver; keep the left one
                // evaluated first.
                let lhs = if is_stable(&lhs) || rhs.is_pure(&self.vars) {
                    lhs
                } else {
                    self.materialize(lhs, steps)
                };
                ExprNode::invocation(rhs, method, ExprList::of(vec![lhs]))
            }
            BinaryLowering::NotEqual => {
                let equal = ExprNode::invocation(lhs, InvocationMethod::Eq, ExprList::of(vec![rhs]));
                let equal = self.materialize(equal, steps);
                ExprNode::not(equal, &self.vars)
            }
        })
    }

    fn flatten_not(
        &mut self,
        node: &SyntaxNode,
        steps: &mut Vec<VoidNode>,
    ) -> Result<ExprNode, CompilationFailure> {
        let operand_node = self.child(node, 0, "operand")?;
        let operand = self.flatten_scalar(operand_node, steps)?;
        let operand = self.pure_or_materialized(operand, steps);
        Ok(ExprNode::not(operand, &self.vars))
    }

    /// `a and b`, `a or b`.
    ///
    /// When `b` needs preparatory statements of its own they may only run
    /// if `a` does not decide the result, so the operator becomes a
    /// conditional write to a temporary local.
    fn flatten_logical(
        &mut self,
        node: &SyntaxNode,
        op: LogicalOp,
        steps: &mut Vec<VoidNode>,
    ) -> Result<ExprNode, CompilationFailure> {
        let first_node = self.child(node, 0, "left operand")?;
        let second_node = self.child(node, 1, "right operand")?;

        let first = self.flatten_scalar(first_node, steps)?;
        let first = self.pure_or_materialized(first, steps);

        self.push_scope(ScopeKind::Block);
        let mut branch = Vec::new();
        let second = self.flatten_scalar(second_node, &mut branch);
        let branch_locals = self.pop_scope();
        let second = second?;

        if branch.is_empty() {
            return Ok(ExprNode::logical(op, first, second, &self.vars));
        }

        // `first` is both written and tested below.
        let first = match first {
            ExprNode::Name(_) => first,
            other => self.materialize(other, steps),
        };
        let temp = self.declare(&format!("({})", next_name()));
        steps.push(VoidNode::Declare(temp));
        self.write_variable(temp, first.clone(), steps);
        self.write_variable(temp, second, &mut branch);
        let condition = match op {
            LogicalOp::And => first,
            LogicalOp::Or => ExprNode::not(first, &self.vars),
        };
        steps.push(VoidNode::IfElseChain(vec![IfClause {
            condition: FlatExpr::bare(condition),
            body: AsmBlock::new(branch, branch_locals),
        }]));
        Ok(ExprNode::name(temp))
    }

    fn pure_or_materialized(&mut self, value: ExprNode, steps: &mut Vec<VoidNode>) -> ExprNode {
        if value.is_pure(&self.vars) {
            value
        } else {
            self.materialize(value, steps)
        }
    }
}
