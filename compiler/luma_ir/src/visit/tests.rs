use super::*;
use crate::{IfClause, InvocationMethod, ParameterList, VarId};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct Counter {
    numbers: usize,
    statements: usize,
}

impl<'ir> Visitor<'ir> for Counter {
    fn visit_void(&mut self, node: &'ir VoidNode) {
        self.statements += 1;
        walk_void(self, node);
    }

    fn visit_expr(&mut self, node: &'ir ExprNode) {
        if let ExprNode::Number(_) = node {
            self.numbers += 1;
        }
        walk_expr(self, node);
    }
}

#[test]
fn reaches_function_bodies_and_conditions() {
    let inner = AsmBlock::of(vec![VoidNode::Return(ExprNode::number(1.0).into())]);
    let function = ExprNode::function(ParameterList::default(), inner);
    let call = ListNode::invocation(
        function,
        InvocationMethod::Call,
        ExprList::new(vec![ExprNode::number(2.0)], Some(ListNode::Varargs)),
    );
    let block = AsmBlock::of(vec![
        VoidNode::Declare(VarId::new(1)),
        VoidNode::Discard(call),
        VoidNode::IfElseChain(vec![IfClause {
            condition: FlatExpr::new(
                vec![VoidNode::Write {
                    target: VarId::new(1),
                    value: ExprNode::number(3.0),
                }],
                ExprNode::name(VarId::new(1)),
            ),
            body: AsmBlock::of(vec![VoidNode::line_number(4)]),
        }]),
    ]);

    let mut counter = Counter::default();
    counter.visit_block(&block);
    assert_eq!(counter.numbers, 3);
    // declare, discard, return, if, write, line
    assert_eq!(counter.statements, 6);
}
