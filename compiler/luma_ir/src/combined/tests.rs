use super::*;
use crate::{ExprList, InvocationMethod};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use StaticType::{Integer, Number, Object, String, Table};

fn fixed(types: &[StaticType]) -> CombinedType {
    let mut combined = CombinedType::new();
    for ty in types {
        combined.add(*ty);
    }
    combined
}

#[test]
fn empty_tracker_is_object() {
    let vars = VariableArena::new();
    assert_eq!(CombinedType::new().get(&vars), Object);
}

#[test]
fn single_source() {
    let vars = VariableArena::new();
    assert_eq!(fixed(&[Integer]).get(&vars), Integer);
    assert_eq!(fixed(&[Table]).get(&vars), Table);
}

#[test]
fn joins_left_to_right() {
    let vars = VariableArena::new();
    assert_eq!(fixed(&[Integer, Integer]).get(&vars), Integer);
    assert_eq!(fixed(&[Integer, Number]).get(&vars), Number);
    assert_eq!(fixed(&[String, Integer]).get(&vars), Object);
}

#[test]
fn object_in_any_position_wins() {
    let vars = VariableArena::new();
    let orders = [
        [Number, Object, Integer],
        [Number, Integer, Object],
        [Object, Number, Integer],
        [Object, Integer, Number],
        [Integer, Number, Object],
        [Integer, Object, Number],
    ];
    for order in orders {
        assert_eq!(fixed(&order).get(&vars), Object, "{order:?}");
    }
}

#[test]
fn direct_self_reference_is_object() {
    let mut vars = VariableArena::new();
    let x = vars.declare_local("x");
    vars.record_write(x, Integer);
    // x = x + 1
    let next = ExprNode::invocation(
        ExprNode::name(x),
        InvocationMethod::Add,
        ExprList::of(vec![ExprNode::number(1.0)]),
    );
    let source = TypeSource::for_value(&next, &vars);
    assert!(matches!(source, TypeSource::Expr(_)));
    vars.record_write(x, source);
    assert_eq!(vars.type_of(x), Object);
}

fn cycle(len: usize) -> (VariableArena, Vec<VarId>) {
    let mut vars = VariableArena::new();
    let ids: Vec<_> = (0..len)
        .map(|i| vars.declare_local(format!("x{i}")))
        .collect();
    for (i, &id) in ids.iter().enumerate() {
        vars.record_write(id, Integer);
        vars.record_write(id, TypeSource::Variable(ids[(i + 1) % len]));
    }
    (vars, ids)
}

#[test]
fn two_node_cycle_terminates() {
    let (vars, ids) = cycle(2);
    for id in ids {
        assert_eq!(vars.type_of(id), Object);
    }
}

#[test]
fn three_node_cycle_terminates() {
    let (vars, ids) = cycle(3);
    for id in ids {
        assert_eq!(vars.type_of(id), Object);
    }
}

#[test]
fn long_cycle_terminates() {
    let (vars, ids) = cycle(200);
    assert_eq!(vars.type_of(ids[0]), Object);
    assert_eq!(vars.type_of(ids[199]), Object);
}

#[test]
fn acyclic_chain_keeps_precise_type() {
    let mut vars = VariableArena::new();
    let a = vars.declare_local("a");
    let b = vars.declare_local("b");
    let c = vars.declare_local("c");
    vars.record_write(a, Integer);
    vars.record_write(b, TypeSource::Variable(a));
    vars.record_write(c, TypeSource::Variable(b));
    vars.record_write(c, Number);
    assert_eq!(vars.type_of(c), Number);
    assert_eq!(vars.type_of(b), Integer);
}

#[test]
fn guard_resets_between_queries() {
    let (vars, ids) = cycle(2);
    let first = vars.type_of(ids[0]);
    let second = vars.type_of(ids[0]);
    assert_eq!(first, second);
}

#[test]
fn arena_is_shareable() {
    fn assert_shareable<T: Send + Sync>() {}
    assert_shareable::<CombinedType>();
    assert_shareable::<VariableArena>();
}

#[test]
fn concurrent_queries_do_not_see_each_other() {
    let mut vars = VariableArena::new();
    let a = vars.declare_local("a");
    let b = vars.declare_local("b");
    vars.record_write(a, Integer);
    vars.record_write(b, TypeSource::Variable(a));
    let (cyclic, ids) = cycle(3);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    (0..200)
                        .map(|_| (vars.type_of(b), cyclic.type_of(ids[1])))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for handle in handles {
            for answers in handle.join().unwrap() {
                assert_eq!(answers, (Integer, Object));
            }
        }
    });
}

fn any_type() -> impl Strategy<Value = StaticType> {
    prop::sample::select(StaticType::ALL.to_vec())
}

proptest! {
    #[test]
    fn order_independent(
        (types, shuffled) in prop::collection::vec(any_type(), 1..8)
            .prop_flat_map(|types| (Just(types.clone()), Just(types).prop_shuffle()))
    ) {
        let vars = VariableArena::new();
        let expected = types.iter().copied().reduce(StaticType::and).unwrap();
        prop_assert_eq!(fixed(&types).get(&vars), expected);
        prop_assert_eq!(fixed(&shuffled).get(&vars), expected);
    }
}
