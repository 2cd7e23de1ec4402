//! Table constructors.

use luma_diagnostic::CompilationFailure;
use luma_ir::{ExprNode, ListNode, SyntaxKind, SyntaxNode, VoidNode};

use super::Flattener;

impl Flattener<'_> {
    /// `{a, b, [k] = v, name = v, f()}`
    ///
    /// Positional fields get consecutive integer keys from 1. Only the
    /// syntactically last field keeps all values of a call or `...`.
    pub(super) fn flatten_table(
        &mut self,
        node: &SyntaxNode,
        steps: &mut Vec<VoidNode>,
    ) -> Result<ExprNode, CompilationFailure> {
        // Keys and values interleaved, so all of them can be pinned at once.
        let mut flat = Vec::with_capacity(node.children.len() * 2);
        let mut spread = None;
        let mut next_index = 1.0_f64;
        let count = node.children.len();

        for (i, field) in node.children.iter().enumerate() {
            self.expect_kind(field, SyntaxKind::Field)?;
            match field.children.as_slice() {
                [value_node] => {
                    let key = ExprNode::number(next_index);
                    next_index += 1.0;
                    let mut later = Vec::new();
                    let value = self.flatten_expr(value_node, &mut later)?;
                    self.sequence(&mut flat, steps, later);
                    flat.push(key);
                    if i + 1 == count && value.is_vararg() {
                        spread = Some(value);
                    } else {
                        flat.push(ExprNode::first_only(value));
                    }
                }
                [key_node, value_node] => {
                    for part in [key_node, value_node] {
                        let mut later = Vec::new();
                        let value = self.flatten_scalar(part, &mut later)?;
                        self.sequence(&mut flat, steps, later);
                        flat.push(value);
                    }
                }
                _ => return Err(self.bad_input(field, "malformed Field: expected 1 or 2 children")),
            }
        }

        let spread_key = if spread.is_some() { flat.pop() } else { None };
        let mut entries = Vec::with_capacity(flat.len() / 2 + 1);
        let mut flat = flat.into_iter();
        while let (Some(key), Some(value)) = (flat.next(), flat.next()) {
            entries.push((key, ListNode::Expr(value)));
        }
        if let (Some(key), Some(value)) = (spread_key, spread) {
            entries.push((key, value));
        }
        Ok(ExprNode::table(entries))
    }
}
