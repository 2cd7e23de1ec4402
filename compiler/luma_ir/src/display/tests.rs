use super::*;
use crate::{FlatExpr, IfClause, InvocationMethod, ParameterList, Register, StaticType, VarId};
use pretty_assertions::assert_eq;

#[test]
fn expressions() {
    let x = VarId::new(1);
    let add = ExprNode::invocation(
        ExprNode::name(x),
        InvocationMethod::Add,
        ExprList::of(vec![ExprNode::number(1.0)]),
    );
    assert_eq!(add.to_string(), "add($1, 1)");
    assert_eq!(ExprNode::number(0.5).to_string(), "0.5");
    assert_eq!(ExprNode::string("a\"b").to_string(), r#""a\"b""#);
    assert_eq!(
        ExprNode::Not(Box::new(ExprNode::name(x))).to_string(),
        "not $1"
    );
    let select = ExprNode::select(
        ListNode::invocation(
            ExprNode::name(x),
            InvocationMethod::Call,
            ExprList::of(vec![ExprNode::nil()]),
        ),
        2,
    );
    assert_eq!(select.to_string(), "select 2 call($1, nil)");
    let table = ExprNode::table(vec![
        (ExprNode::number(1.0), ExprNode::number(10.0).into()),
        (ExprNode::number(2.0), ListNode::Varargs),
    ]);
    assert_eq!(table.to_string(), "{[1] = 10, [2] = ...}");
}

#[test]
fn statements_and_nesting() {
    let x = VarId::new(1);
    let vars = crate::VariableArena::new();
    let reg = Register::scalar(StaticType::Integer);
    let block = AsmBlock::of(vec![
        VoidNode::Declare(x),
        VoidNode::Write {
            target: x,
            value: ExprNode::number(10.0),
        },
        VoidNode::assign(reg.clone(), ExprNode::number(2.0), &vars),
        VoidNode::IfElseChain(vec![
            IfClause {
                condition: FlatExpr::bare(ExprNode::name(x)),
                body: AsmBlock::of(vec![VoidNode::break_always()]),
            },
            IfClause {
                condition: FlatExpr::bare(ExprNode::bool(true)),
                body: AsmBlock::of(vec![VoidNode::Return(ExprList::empty().into())]),
            },
        ]),
    ]);
    let expected = format!(
        "local $1\n$1 := 10\n{reg} = 2\nif $1 then\n  break\nelseif true then\n  return []\nend"
    );
    assert_eq!(block.to_string(), expected);
}

#[test]
fn function_literal_body_is_indented() {
    let f = ExprNode::function(
        ParameterList::new(vec![VarId::new(2)], true),
        AsmBlock::of(vec![VoidNode::Return(ListNode::Varargs)]),
    );
    assert_eq!(f.to_string(), "function($2, ...)\n  return ...\nend");
}
