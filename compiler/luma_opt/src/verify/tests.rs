use super::*;
use luma_diagnostic::DiagnosticQueue;
use luma_ir::{ExprNode, ListNode, ParameterList, StaticType, VariableArena};
use pretty_assertions::assert_eq;

fn assign(register: &Register, value: f64) -> VoidNode {
    VoidNode::assign(register.clone(), ExprNode::number(value), &VariableArena::new())
}

#[test]
fn distinct_registers_pass() {
    let a = Register::scalar(StaticType::Integer);
    let b = Register::scalar(StaticType::Integer);
    let block = AsmBlock::of(vec![assign(&a, 1.0), assign(&b, 2.0)]);
    let mut queue = DiagnosticQueue::new();
    assert_eq!(verify_single_assignment(&block, &mut queue), Ok(()));
    assert!(queue.is_empty());
}

#[test]
fn reassignment_is_a_bug() {
    let a = Register::scalar(StaticType::Integer);
    let block = AsmBlock::of(vec![assign(&a, 1.0), assign(&a, 2.0), assign(&a, 3.0)]);
    let mut queue = DiagnosticQueue::new();
    let failure = verify_single_assignment(&block, &mut queue).unwrap_err();
    assert!(failure.has_tag(FailureTag::Bug));

    let diagnostics = queue.flush();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].phase, Some(Phase::Verification));
    assert!(diagnostics[0].message.contains(a.name()));
}

#[test]
fn nested_bodies_are_checked() {
    let a = Register::scalar(StaticType::Integer);
    let inner = AsmBlock::of(vec![assign(&a, 2.0)]);
    let function = ExprNode::function(ParameterList::new(vec![], false), inner);
    let block = AsmBlock::of(vec![
        assign(&a, 1.0),
        VoidNode::Loop(AsmBlock::of(vec![VoidNode::Discard(function.into())])),
    ]);
    assert!(verify_single_assignment(&block, &mut luma_diagnostic::NullReporter).is_err());
}

#[test]
fn vararg_registers_count_too() {
    let spill = Register::vararg();
    let block = AsmBlock::of(vec![
        VoidNode::assign_array(spill.clone(), ListNode::Varargs),
        VoidNode::assign_array(spill, ListNode::Varargs),
    ]);
    assert!(verify_single_assignment(&block, &mut luma_diagnostic::NullReporter).is_err());
}

#[test]
fn unused_sentinel_is_exempt() {
    let block = AsmBlock::of(vec![
        VoidNode::assign_array(Register::unused(), ListNode::Varargs),
        VoidNode::assign_array(Register::unused(), ListNode::Varargs),
    ]);
    assert_eq!(
        verify_single_assignment(&block, &mut luma_diagnostic::NullReporter),
        Ok(())
    );
}
