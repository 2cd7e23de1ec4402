use super::*;
use luma_diagnostic::{DiagnosticQueue, NullReporter, Severity};
use luma_ir::{FlatExpr, FunctionLiteral, InvocationMethod, ParameterList, StaticType, VarId};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn fold_with(vars: &VariableArena, node: ExprNode) -> ExprNode {
    let options = FoldOptions::default();
    let mut reporter = NullReporter;
    ConstantFolder::new(vars, &options, &mut reporter).fold_expr(node)
}

fn fold(node: ExprNode) -> ExprNode {
    fold_with(&VariableArena::new(), node)
}

fn not(node: ExprNode) -> ExprNode {
    ExprNode::Not(Box::new(node))
}

fn logical(op: LogicalOp, first: ExprNode, second: ExprNode) -> ExprNode {
    ExprNode::Logical(Logical {
        op,
        first: Box::new(first),
        second: Box::new(second),
    })
}

/// An expression with a side effect.
fn effect(key: f64) -> ExprNode {
    ExprNode::index(ExprNode::string("t"), ExprNode::number(key))
}

fn list(leading: Vec<ExprNode>, tail: Option<ListNode>) -> ListNode {
    ListNode::ExprList(ExprList::new(leading, tail))
}

/// Arena with an untyped local `$1` and a boolean local `$2`.
fn typed_vars() -> (VariableArena, VarId, VarId) {
    let mut vars = VariableArena::new();
    let unknown = vars.declare_local("o");
    vars.record_write(unknown, StaticType::Object);
    let flag = vars.declare_local("b");
    vars.record_write(flag, StaticType::Boolean);
    (vars, unknown, flag)
}

// not

#[test]
fn not_of_constants() {
    assert_eq!(fold(not(ExprNode::Bool(true))), ExprNode::Bool(false));
    assert_eq!(fold(not(ExprNode::Bool(false))), ExprNode::Bool(true));
    assert_eq!(fold(not(ExprNode::Nil)), ExprNode::Bool(true));
    assert_eq!(fold(not(ExprNode::number(0.0))), ExprNode::Bool(false));
    assert_eq!(fold(not(ExprNode::string(""))), ExprNode::Bool(false));
}

#[test]
fn not_folds_bottom_up() {
    assert_eq!(fold(not(not(ExprNode::Nil))), ExprNode::Bool(false));
}

#[test]
fn not_of_unknown_truthiness_stays() {
    let (vars, unknown, flag) = typed_vars();
    let node = not(ExprNode::name(unknown));
    assert_eq!(fold_with(&vars, node.clone()), node);
    let node = not(ExprNode::name(flag));
    assert_eq!(fold_with(&vars, node.clone()), node);
}

#[test]
fn not_of_typed_local() {
    let mut vars = VariableArena::new();
    let table = vars.declare_local("t");
    vars.record_write(table, StaticType::Table);
    assert_eq!(
        fold_with(&vars, not(ExprNode::name(table))),
        ExprNode::Bool(false)
    );
}

// and / or

#[test]
fn truthy_first_operand() {
    assert_eq!(
        fold(logical(LogicalOp::And, ExprNode::number(1.0), effect(1.0))),
        effect(1.0)
    );
    assert_eq!(
        fold(logical(LogicalOp::Or, ExprNode::number(1.0), effect(1.0))),
        ExprNode::number(1.0)
    );
}

#[test]
fn falsy_first_operand() {
    assert_eq!(
        fold(logical(LogicalOp::And, ExprNode::Nil, effect(1.0))),
        ExprNode::Nil
    );
    assert_eq!(
        fold(logical(LogicalOp::Or, ExprNode::Bool(false), effect(1.0))),
        effect(1.0)
    );
}

#[test]
fn unknown_first_operand_keeps_second() {
    let (vars, unknown, _) = typed_vars();
    let node = logical(LogicalOp::And, ExprNode::name(unknown), effect(2.0));
    assert_eq!(fold_with(&vars, node.clone()), node);
}

#[test]
fn impure_first_operand_is_never_dropped() {
    // Truthiness of an invocation's result is unknown anyway, but a pure
    // second operand must not make the pair collapse either.
    let node = logical(LogicalOp::Or, effect(1.0), ExprNode::Bool(true));
    assert_eq!(fold(node.clone()), node);
}

#[test]
fn second_operand_is_folded_in_place() {
    let (vars, unknown, _) = typed_vars();
    let node = logical(LogicalOp::And, ExprNode::name(unknown), not(ExprNode::Nil));
    assert_eq!(
        fold_with(&vars, node),
        logical(LogicalOp::And, ExprNode::name(unknown), ExprNode::Bool(true))
    );
}

// select

#[test]
fn select_leading_element() {
    let source = list(
        vec![ExprNode::number(1.0), ExprNode::number(2.0), ExprNode::number(3.0)],
        None,
    );
    assert_eq!(fold(ExprNode::select(source, 1)), ExprNode::number(2.0));
}

#[test]
fn selected_element_may_be_impure() {
    let source = list(vec![effect(1.0), ExprNode::number(2.0)], Some(ListNode::Varargs));
    assert_eq!(fold(ExprNode::select(source, 0)), effect(1.0));
}

#[test]
fn dropping_impure_elements_is_refused() {
    let node = ExprNode::select(list(vec![ExprNode::number(1.0), effect(2.0)], None), 0);
    assert_eq!(fold(node.clone()), node);

    let call = ListNode::invocation(
        ExprNode::string("f"),
        InvocationMethod::Call,
        ExprList::empty(),
    );
    let node = ExprNode::select(list(vec![ExprNode::number(1.0)], Some(call)), 0);
    assert_eq!(fold(node.clone()), node);
}

#[test]
fn select_past_the_end() {
    let source = list(vec![ExprNode::number(1.0), ExprNode::number(2.0)], None);
    assert_eq!(fold(ExprNode::select(source, 5)), ExprNode::Nil);
}

#[test]
fn select_into_tail() {
    let source = list(
        vec![ExprNode::number(1.0), ExprNode::number(2.0)],
        Some(ListNode::Varargs),
    );
    assert_eq!(
        fold(ExprNode::select(source, 3)),
        ExprNode::select(ListNode::Varargs, 1)
    );
}

// Statements

fn if_chain(conditions: Vec<ExprNode>) -> VoidNode {
    VoidNode::IfElseChain(
        conditions
            .into_iter()
            .map(|condition| IfClause {
                condition: FlatExpr::bare(condition),
                body: AsmBlock::of(vec![VoidNode::break_always()]),
            })
            .collect(),
    )
}

#[test]
fn always_false_condition_warns() {
    let block = AsmBlock::of(vec![
        VoidNode::line_number(7),
        if_chain(vec![ExprNode::Nil, not(ExprNode::number(1.0))]),
    ]);
    let vars = VariableArena::new();
    let mut queue = DiagnosticQueue::new();
    let folded = fold_chunk(block, &vars, &FoldOptions::default(), &mut queue);

    // The dead arms stay.
    let VoidNode::IfElseChain(clauses) = &folded.steps[1] else {
        panic!("expected an if chain, got {}", folded.steps[1]);
    };
    assert_eq!(clauses.len(), 2);
    assert_eq!(clauses[1].condition.value, ExprNode::Bool(false));

    let diagnostics = queue.flush();
    assert_eq!(diagnostics.len(), 2);
    for diagnostic in &diagnostics {
        assert_eq!(diagnostic.severity, Severity::Warning);
        assert_eq!(diagnostic.line, Some(7));
        assert_eq!(diagnostic.phase, Some(Phase::Optimization));
    }
}

#[test]
fn warnings_can_be_disabled() {
    let block = AsmBlock::of(vec![if_chain(vec![ExprNode::Bool(false)])]);
    let options = FoldOptions {
        warn_constant_conditions: false,
    };
    let mut queue = DiagnosticQueue::new();
    fold_chunk(block, &VariableArena::new(), &options, &mut queue);
    assert!(queue.is_empty());
}

#[test]
fn folds_inside_function_bodies() {
    let body = AsmBlock::of(vec![VoidNode::Return(not(ExprNode::Bool(true)).into())]);
    let block = AsmBlock::of(vec![VoidNode::Discard(
        ExprNode::function(ParameterList::new(vec![], false), body).into(),
    )]);
    let folded = fold_chunk(
        block,
        &VariableArena::new(),
        &FoldOptions::default(),
        &mut NullReporter,
    );
    let VoidNode::Discard(ListNode::Expr(ExprNode::Function(FunctionLiteral { body, .. }))) =
        &folded.steps[0]
    else {
        panic!("expected a discarded function, got {}", folded.steps[0]);
    };
    assert_eq!(body.steps, vec![VoidNode::Return(ExprNode::Bool(false).into())]);
}

#[test]
fn counts_rewrites() {
    let vars = VariableArena::new();
    let options = FoldOptions::default();
    let mut reporter = NullReporter;
    let mut folder = ConstantFolder::new(&vars, &options, &mut reporter);
    folder.fold_expr(not(not(ExprNode::Bool(true))));
    assert_eq!(folder.simplified(), 2);
    folder.fold_expr(effect(1.0));
    assert_eq!(folder.simplified(), 2);
}

// Properties

fn arb_expr() -> impl Strategy<Value = ExprNode> {
    let leaf = prop_oneof![
        Just(ExprNode::Nil),
        any::<bool>().prop_map(ExprNode::Bool),
        (-4i32..4).prop_map(|n| ExprNode::number(f64::from(n))),
        "[a-c]{0,2}".prop_map(ExprNode::string),
        (0i32..3).prop_map(|n| effect(f64::from(n))),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(not),
            (inner.clone(), inner.clone(), any::<bool>()).prop_map(|(a, b, and)| {
                let op = if and { LogicalOp::And } else { LogicalOp::Or };
                logical(op, a, b)
            }),
            (
                prop::collection::vec(inner, 0..4),
                any::<bool>(),
                0usize..5
            )
                .prop_map(|(leading, varargs, n)| {
                    let tail = varargs.then_some(ListNode::Varargs);
                    ExprNode::select(list(leading, tail), n)
                }),
        ]
    })
}

proptest! {
    #[test]
    fn folding_is_idempotent(node in arb_expr()) {
        let once = fold(node);
        let twice = fold(once.clone());
        prop_assert_eq!(once, twice);
    }
}
