//! Rebuilding IR traversal.
//!
//! A [`Folder`] consumes a tree and returns a new one. The `walk_*`
//! functions fold every child bottom-up and reassemble the node unchanged
//! otherwise, so an implementation only overrides the node kinds it
//! rewrites.

use crate::{
    AsmBlock, ExprList, ExprNode, FlatExpr, FunctionLiteral, IfClause, Invocation, ListNode,
    Logical, Select, TableLiteral, VoidNode,
};

pub trait Folder {
    fn fold_block(&mut self, block: AsmBlock) -> AsmBlock {
        walk_block(self, block)
    }

    fn fold_void(&mut self, node: VoidNode) -> VoidNode {
        walk_void(self, node)
    }

    fn fold_expr(&mut self, node: ExprNode) -> ExprNode {
        walk_expr(self, node)
    }

    fn fold_list(&mut self, node: ListNode) -> ListNode {
        walk_list(self, node)
    }

    fn fold_expr_list(&mut self, list: ExprList) -> ExprList {
        walk_expr_list(self, list)
    }
}

pub fn walk_block<F: Folder + ?Sized>(folder: &mut F, block: AsmBlock) -> AsmBlock {
    let AsmBlock { steps, locals } = block;
    let steps = steps.into_iter().map(|step| folder.fold_void(step)).collect();
    AsmBlock { steps, locals }
}

pub fn walk_flat_expr<F: Folder + ?Sized>(folder: &mut F, flat: FlatExpr) -> FlatExpr {
    let steps = flat
        .steps
        .into_iter()
        .map(|step| folder.fold_void(step))
        .collect();
    FlatExpr {
        steps,
        value: folder.fold_expr(flat.value),
    }
}

pub fn walk_void<F: Folder + ?Sized>(folder: &mut F, node: VoidNode) -> VoidNode {
    match node {
        VoidNode::Assign { target, value } => VoidNode::Assign {
            target,
            value: folder.fold_expr(value),
        },
        VoidNode::AssignArray { target, value } => VoidNode::AssignArray {
            target,
            value: folder.fold_list(value),
        },
        VoidNode::Block(block) => VoidNode::Block(folder.fold_block(block)),
        VoidNode::BreakIf { condition, is_true } => VoidNode::BreakIf {
            condition: folder.fold_expr(condition),
            is_true,
        },
        VoidNode::Write { target, value } => VoidNode::Write {
            target,
            value: folder.fold_expr(value),
        },
        VoidNode::Discard(list) => VoidNode::Discard(folder.fold_list(list)),
        VoidNode::IfElseChain(clauses) => VoidNode::IfElseChain(
            clauses
                .into_iter()
                .map(|clause| IfClause {
                    condition: walk_flat_expr(folder, clause.condition),
                    body: folder.fold_block(clause.body),
                })
                .collect(),
        ),
        VoidNode::Loop(body) => VoidNode::Loop(folder.fold_block(body)),
        VoidNode::ForEachLoop {
            variables,
            iterator,
            body,
        } => VoidNode::ForEachLoop {
            variables,
            iterator: folder.fold_list(iterator),
            body: folder.fold_block(body),
        },
        VoidNode::ForRangeLoop {
            counter,
            from,
            to,
            step,
            body,
        } => VoidNode::ForRangeLoop {
            counter,
            from: folder.fold_expr(from),
            to: folder.fold_expr(to),
            step: folder.fold_expr(step),
            body: folder.fold_block(body),
        },
        VoidNode::Return(list) => VoidNode::Return(folder.fold_list(list)),
        node @ (VoidNode::Declare(_) | VoidNode::LineNumber(_)) => node,
    }
}

fn walk_invocation<F: Folder + ?Sized>(folder: &mut F, invocation: Invocation) -> Invocation {
    Invocation {
        object: Box::new(folder.fold_expr(*invocation.object)),
        method: invocation.method,
        arguments: folder.fold_expr_list(invocation.arguments),
    }
}

pub fn walk_expr<F: Folder + ?Sized>(folder: &mut F, node: ExprNode) -> ExprNode {
    match node {
        ExprNode::Table(table) => ExprNode::Table(TableLiteral {
            entries: table
                .entries
                .into_iter()
                .map(|(key, value)| (folder.fold_expr(key), folder.fold_list(value)))
                .collect(),
        }),
        ExprNode::Function(function) => ExprNode::Function(FunctionLiteral {
            params: function.params,
            body: folder.fold_block(function.body),
        }),
        ExprNode::Invocation(invocation) => {
            ExprNode::Invocation(walk_invocation(folder, invocation))
        }
        ExprNode::Not(operand) => ExprNode::Not(Box::new(folder.fold_expr(*operand))),
        ExprNode::Logical(logical) => ExprNode::Logical(Logical {
            op: logical.op,
            first: Box::new(folder.fold_expr(*logical.first)),
            second: Box::new(folder.fold_expr(*logical.second)),
        }),
        ExprNode::Select(select) => ExprNode::Select(Select {
            source: Box::new(folder.fold_list(*select.source)),
            n: select.n,
        }),
        leaf @ (ExprNode::Number(_)
        | ExprNode::String(_)
        | ExprNode::Bool(_)
        | ExprNode::Nil
        | ExprNode::Name(_)
        | ExprNode::Register(_)) => leaf,
    }
}

pub fn walk_list<F: Folder + ?Sized>(folder: &mut F, node: ListNode) -> ListNode {
    match node {
        ListNode::Expr(expr) => ListNode::Expr(folder.fold_expr(expr)),
        ListNode::ExprList(list) => ListNode::ExprList(folder.fold_expr_list(list)),
        ListNode::Invocation(invocation) => {
            ListNode::Invocation(walk_invocation(folder, invocation))
        }
        leaf @ (ListNode::Varargs | ListNode::ArrayRegister(_)) => leaf,
    }
}

pub fn walk_expr_list<F: Folder + ?Sized>(folder: &mut F, list: ExprList) -> ExprList {
    let (leading, trailing) = list.into_parts();
    let leading = leading
        .into_iter()
        .map(|expr| folder.fold_expr(expr))
        .collect();
    let trailing = trailing.map(|tail| folder.fold_list(tail));
    ExprList::new(leading, trailing)
}
