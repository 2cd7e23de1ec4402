use super::*;
use crate::TypeSource;
use pretty_assertions::assert_eq;

fn call(f: ExprNode) -> ListNode {
    ListNode::invocation(f, InvocationMethod::Call, ExprList::empty())
}

#[test]
fn constant_types() {
    let vars = VariableArena::new();
    assert_eq!(ExprNode::number(3.0).type_info(&vars), StaticType::Integer);
    assert_eq!(ExprNode::number(3.5).type_info(&vars), StaticType::Number);
    assert_eq!(ExprNode::string("s").type_info(&vars), StaticType::String);
    assert_eq!(ExprNode::bool(false).type_info(&vars), StaticType::Boolean);
    assert_eq!(ExprNode::nil().type_info(&vars), StaticType::Object);
    assert_eq!(ExprNode::table(vec![]).type_info(&vars), StaticType::Table);
    assert_eq!(
        ExprNode::function(ParameterList::default(), AsmBlock::default()).type_info(&vars),
        StaticType::Function
    );
}

#[test]
fn name_types_come_from_the_arena() {
    let mut vars = VariableArena::new();
    let x = vars.declare_local("x");
    vars.record_write(x, StaticType::Integer);
    let g = vars.global("g");
    assert_eq!(ExprNode::name(x).type_info(&vars), StaticType::Integer);
    assert_eq!(ExprNode::name(g).type_info(&vars), StaticType::Object);
}

#[test]
fn purity() {
    let mut vars = VariableArena::new();
    let x = vars.declare_local("x");
    vars.record_write(x, StaticType::Integer);
    let g = vars.global("g");

    assert!(ExprNode::name(x).is_pure(&vars));
    assert!(!ExprNode::name(g).is_pure(&vars));
    assert!(!ExprNode::index(ExprNode::name(x), ExprNode::number(1.0)).is_pure(&vars));
    assert!(ExprNode::Register(Register::scalar(StaticType::Object)).is_pure(&vars));

    let pure_table = ExprNode::table(vec![(
        ExprNode::number(1.0),
        ListNode::Expr(ExprNode::string("a")),
    )]);
    assert!(pure_table.is_pure(&vars));
    let impure_table = ExprNode::table(vec![(ExprNode::number(1.0), call(ExprNode::name(x)))]);
    assert!(!impure_table.is_pure(&vars));

    let and = ExprNode::logical(
        LogicalOp::And,
        ExprNode::name(x),
        ExprNode::index(ExprNode::name(x), ExprNode::number(1.0)),
        &vars,
    );
    assert!(!and.is_pure(&vars));
    let or = ExprNode::logical(LogicalOp::Or, ExprNode::name(x), ExprNode::nil(), &vars);
    assert!(or.is_pure(&vars));

    assert!(!ExprNode::select(call(ExprNode::name(x)), 0).is_pure(&vars));
    assert!(ExprNode::select(ListNode::Varargs, 2).is_pure(&vars));
}

#[test]
#[should_panic(expected = "impure first operand")]
fn logical_requires_pure_first_operand() {
    let vars = VariableArena::new();
    let first = ExprNode::first_only(call(ExprNode::string("f")));
    ExprNode::logical(LogicalOp::And, first, ExprNode::nil(), &vars);
}

#[test]
#[should_panic(expected = "impure operand of `not`")]
fn not_requires_pure_operand() {
    let vars = VariableArena::new();
    ExprNode::not(ExprNode::index(ExprNode::nil(), ExprNode::nil()), &vars);
}

#[test]
#[should_panic(expected = "used as a scalar")]
fn vararg_register_is_not_an_expression() {
    ExprNode::register(Register::vararg());
}

#[test]
#[should_panic(expected = "select from non-vararg node")]
fn select_requires_vararg_source() {
    ExprNode::select(ListNode::Expr(ExprNode::nil()), 1);
}

#[test]
#[should_panic(expected = "does not yield a single value")]
fn scalar_invocation_requires_single_result() {
    ExprNode::invocation(ExprNode::nil(), InvocationMethod::Call, ExprList::empty());
}

#[test]
fn first_only_truncates_multi_valued_nodes() {
    let scalar = ExprNode::number(1.0);
    assert_eq!(ExprNode::first_only(ListNode::Expr(scalar.clone())), scalar);
    assert_eq!(
        ExprNode::first_only(ListNode::Varargs),
        ExprNode::Select(Select {
            source: Box::new(ListNode::Varargs),
            n: 0
        })
    );
}

#[test]
fn select_type_from_known_list() {
    let vars = VariableArena::new();
    let list = ListNode::ExprList(ExprList::new(
        vec![ExprNode::number(1.0), ExprNode::string("s")],
        Some(ListNode::Varargs),
    ));
    assert_eq!(
        ExprNode::select(list.clone(), 1).type_info(&vars),
        StaticType::String
    );
    assert_eq!(
        ExprNode::select(list, 2).type_info(&vars),
        StaticType::Object
    );
}

#[test]
fn truthiness() {
    let mut vars = VariableArena::new();
    let x = vars.declare_local("x");
    vars.record_write(x, StaticType::Number);
    assert!(ExprNode::bool(true).always_true(&vars));
    assert!(ExprNode::name(x).always_true(&vars));
    assert!(ExprNode::string("").always_true(&vars));
    assert!(!ExprNode::nil().always_true(&vars));
    assert!(!ExprNode::bool(false).always_true(&vars));
    assert!(ExprNode::nil().always_false());
    assert!(ExprNode::bool(false).always_false());
    assert!(!ExprNode::name(x).always_false());
}

#[test]
fn numeric_coercion_skips_numbers() {
    let vars = VariableArena::new();
    let n = ExprNode::number(2.0);
    assert_eq!(ExprNode::to_number(n.clone(), &vars), n);
    let coerced = ExprNode::to_number(ExprNode::string("2"), &vars);
    assert_eq!(coerced.type_info(&vars), StaticType::Number);
}

#[test]
fn variable_dependence() {
    let mut vars = VariableArena::new();
    let x = vars.declare_local("x");
    vars.record_write(x, StaticType::Integer);
    assert!(ExprNode::name(x).depends_on_variables());
    assert!(!ExprNode::number(1.0).depends_on_variables());
    let sum = ExprNode::invocation(
        ExprNode::number(1.0),
        InvocationMethod::Add,
        ExprList::of(vec![ExprNode::name(x)]),
    );
    assert!(sum.depends_on_variables());
    let deferred = Register::scalar(TypeSource::Variable(x));
    assert!(ExprNode::Register(deferred).depends_on_variables());
    let fixed = Register::scalar(StaticType::Integer);
    assert!(!ExprNode::Register(fixed).depends_on_variables());
}
