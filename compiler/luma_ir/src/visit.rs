//! Read-only IR traversal.
//!
//! Default methods call the matching `walk_*` function, which visits every
//! child, function bodies included. Override a `visit_*` method to act on a
//! node and call `walk_*` from it to keep descending.
//!
//! ```text
//! struct CountWrites(usize);
//!
//! impl<'ir> Visitor<'ir> for CountWrites {
//!     fn visit_void(&mut self, node: &'ir VoidNode) {
//!         if let VoidNode::Write { .. } = node {
//!             self.0 += 1;
//!         }
//!         walk_void(self, node);
//!     }
//! }
//! ```

use crate::{AsmBlock, ExprList, ExprNode, FlatExpr, ListNode, VoidNode};

pub trait Visitor<'ir> {
    fn visit_block(&mut self, block: &'ir AsmBlock) {
        walk_block(self, block);
    }

    fn visit_void(&mut self, node: &'ir VoidNode) {
        walk_void(self, node);
    }

    fn visit_expr(&mut self, node: &'ir ExprNode) {
        walk_expr(self, node);
    }

    fn visit_list(&mut self, node: &'ir ListNode) {
        walk_list(self, node);
    }
}

pub fn walk_block<'ir, V: Visitor<'ir> + ?Sized>(visitor: &mut V, block: &'ir AsmBlock) {
    for step in &block.steps {
        visitor.visit_void(step);
    }
}

fn walk_flat_expr<'ir, V: Visitor<'ir> + ?Sized>(visitor: &mut V, flat: &'ir FlatExpr) {
    for step in &flat.steps {
        visitor.visit_void(step);
    }
    visitor.visit_expr(&flat.value);
}

pub fn walk_void<'ir, V: Visitor<'ir> + ?Sized>(visitor: &mut V, node: &'ir VoidNode) {
    match node {
        VoidNode::Assign { value, .. }
        | VoidNode::Write { value, .. }
        | VoidNode::BreakIf {
            condition: value, ..
        } => visitor.visit_expr(value),
        VoidNode::AssignArray { value, .. } | VoidNode::Discard(value) | VoidNode::Return(value) => {
            visitor.visit_list(value);
        }
        VoidNode::Block(block) | VoidNode::Loop(block) => visitor.visit_block(block),
        VoidNode::IfElseChain(clauses) => {
            for clause in clauses {
                walk_flat_expr(visitor, &clause.condition);
                visitor.visit_block(&clause.body);
            }
        }
        VoidNode::ForEachLoop { iterator, body, .. } => {
            visitor.visit_list(iterator);
            visitor.visit_block(body);
        }
        VoidNode::ForRangeLoop {
            from,
            to,
            step,
            body,
            ..
        } => {
            visitor.visit_expr(from);
            visitor.visit_expr(to);
            visitor.visit_expr(step);
            visitor.visit_block(body);
        }
        VoidNode::Declare(_) | VoidNode::LineNumber(_) => {}
    }
}

pub fn walk_expr<'ir, V: Visitor<'ir> + ?Sized>(visitor: &mut V, node: &'ir ExprNode) {
    match node {
        ExprNode::Number(_)
        | ExprNode::String(_)
        | ExprNode::Bool(_)
        | ExprNode::Nil
        | ExprNode::Name(_)
        | ExprNode::Register(_) => {}
        ExprNode::Table(table) => {
            for (key, value) in &table.entries {
                visitor.visit_expr(key);
                visitor.visit_list(value);
            }
        }
        ExprNode::Function(function) => visitor.visit_block(&function.body),
        ExprNode::Invocation(invocation) => {
            visitor.visit_expr(&invocation.object);
            walk_expr_list(visitor, &invocation.arguments);
        }
        ExprNode::Not(operand) => visitor.visit_expr(operand),
        ExprNode::Logical(logical) => {
            visitor.visit_expr(&logical.first);
            visitor.visit_expr(&logical.second);
        }
        ExprNode::Select(select) => visitor.visit_list(&select.source),
    }
}

pub fn walk_list<'ir, V: Visitor<'ir> + ?Sized>(visitor: &mut V, node: &'ir ListNode) {
    match node {
        ListNode::Expr(expr) => visitor.visit_expr(expr),
        ListNode::Varargs | ListNode::ArrayRegister(_) => {}
        ListNode::ExprList(list) => walk_expr_list(visitor, list),
        ListNode::Invocation(invocation) => {
            visitor.visit_expr(&invocation.object);
            walk_expr_list(visitor, &invocation.arguments);
        }
    }
}

pub fn walk_expr_list<'ir, V: Visitor<'ir> + ?Sized>(visitor: &mut V, list: &'ir ExprList) {
    for expr in list.leading() {
        visitor.visit_expr(expr);
    }
    if let Some(tail) = list.trailing() {
        visitor.visit_list(tail);
    }
}

#[cfg(test)]
mod tests;
