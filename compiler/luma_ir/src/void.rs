//! Statements, blocks and parameter lists.

use std::num::NonZeroU32;

use rustc_hash::FxHashMap;

use crate::{ExprNode, ListNode, Register, VarId, VariableArena};

#[derive(Clone, Debug, PartialEq)]
pub enum VoidNode {
    /// Scalar register := expression.
    Assign { target: Register, value: ExprNode },
    /// Vararg register := list.
    AssignArray { target: Register, value: ListNode },
    Block(AsmBlock),
    /// Leave the innermost loop when the condition's truthiness equals
    /// `is_true`.
    BreakIf { condition: ExprNode, is_true: bool },
    /// Introduce a local. Its first value follows as a `Write`.
    Declare(VarId),
    Write { target: VarId, value: ExprNode },
    /// Evaluate for side effects only.
    Discard(ListNode),
    /// First clause whose condition is truthy runs. An `else` arm is a
    /// clause with a `true` condition.
    IfElseChain(Vec<IfClause>),
    /// Repeats until a `BreakIf` fires.
    Loop(AsmBlock),
    ForEachLoop {
        variables: Vec<VarId>,
        iterator: ListNode,
        body: AsmBlock,
    },
    ForRangeLoop {
        counter: VarId,
        from: ExprNode,
        to: ExprNode,
        step: ExprNode,
        body: AsmBlock,
    },
    Return(ListNode),
    LineNumber(NonZeroU32),
}

impl VoidNode {
    /// # Panics
    /// If `target` is a vararg register. In debug builds also if the value
    /// is not a subtype of the register's type.
    pub fn assign(target: Register, value: ExprNode, vars: &VariableArena) -> Self {
        assert!(
            !target.is_vararg(),
            "internal compiler error: scalar assignment to vararg register {target}"
        );
        debug_assert!(
            value.type_info(vars).subtype_of(target.type_info(vars)),
            "internal compiler error: {value} does not fit register {target}"
        );
        VoidNode::Assign { target, value }
    }

    /// # Panics
    /// If `target` is scalar.
    pub fn assign_array(target: Register, value: ListNode) -> Self {
        assert!(
            target.is_vararg(),
            "internal compiler error: list assignment to scalar register {target}"
        );
        VoidNode::AssignArray { target, value }
    }

    /// # Panics
    /// If `line` is zero.
    pub fn line_number(line: u32) -> Self {
        match NonZeroU32::new(line) {
            Some(line) => VoidNode::LineNumber(line),
            None => panic!("internal compiler error: line numbers start at 1"),
        }
    }

    pub fn break_if(condition: ExprNode, is_true: bool) -> Self {
        VoidNode::BreakIf { condition, is_true }
    }

    /// Unconditional loop exit.
    pub fn break_always() -> Self {
        Self::break_if(ExprNode::Bool(true), true)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfClause {
    pub condition: FlatExpr,
    pub body: AsmBlock,
}

/// Statements to run, then a value to use.
#[derive(Clone, Debug, PartialEq)]
pub struct FlatExpr {
    pub steps: Vec<VoidNode>,
    pub value: ExprNode,
}

impl FlatExpr {
    pub fn new(steps: Vec<VoidNode>, value: ExprNode) -> Self {
        FlatExpr { steps, value }
    }

    /// A value that needs no statements.
    pub fn bare(value: ExprNode) -> Self {
        Self::new(Vec::new(), value)
    }
}

/// One lexical block.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AsmBlock {
    pub steps: Vec<VoidNode>,
    /// Locals declared in this block by source name. A redeclared name maps
    /// to the latest declaration.
    pub locals: FxHashMap<String, VarId>,
}

impl AsmBlock {
    pub fn new(steps: Vec<VoidNode>, locals: FxHashMap<String, VarId>) -> Self {
        AsmBlock { steps, locals }
    }

    pub fn of(steps: Vec<VoidNode>) -> Self {
        Self::new(steps, FxHashMap::default())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParameterList {
    pub params: Vec<VarId>,
    /// Whether the function declares its own `...`.
    pub varargs: bool,
}

impl ParameterList {
    pub fn new(params: Vec<VarId>, varargs: bool) -> Self {
        ParameterList { params, varargs }
    }
}

/// Assignment target.
#[derive(Clone, Debug, PartialEq)]
pub enum LValue {
    Name(VarId),
    TableField { table: ExprNode, key: ExprNode },
}
