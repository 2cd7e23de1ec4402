//! Scalar expression nodes.
//!
//! An [`ExprNode`] yields exactly one value. Nodes are immutable trees;
//! rewriting passes build new nodes instead of editing old ones.

use crate::{
    AsmBlock, ExprList, InvocationMethod, ListNode, ParameterList, Register, ReturnCount,
    StaticType, VarId, VariableArena,
};

#[derive(Clone, Debug, PartialEq)]
pub enum ExprNode {
    Number(f64),
    String(String),
    Bool(bool),
    Nil,
    Table(TableLiteral),
    Function(FunctionLiteral),
    /// Read of a local, upvalue or global.
    Name(VarId),
    /// Read of a scalar register.
    Register(Register),
    /// Single-valued invocation.
    Invocation(Invocation),
    Not(Box<ExprNode>),
    Logical(Logical),
    /// The `n`th (0-based) value of a multi-valued node.
    Select(Select),
}

/// Table constructor entries in source order.
///
/// A vararg value spreads all its values starting at its key, which is
/// only ever the case for the syntactically last positional field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableLiteral {
    pub entries: Vec<(ExprNode, ListNode)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionLiteral {
    pub params: ParameterList,
    pub body: AsmBlock,
}

/// `object:method(arguments...)` in the broad sense: calls, indexing and
/// operators all share this shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Invocation {
    pub object: Box<ExprNode>,
    pub method: InvocationMethod,
    pub arguments: ExprList,
}

impl Invocation {
    pub fn new(object: ExprNode, method: InvocationMethod, arguments: ExprList) -> Self {
        Invocation {
            object: Box::new(object),
            method,
            arguments,
        }
    }

    pub fn result_type(&self, vars: &VariableArena) -> StaticType {
        let object = self.object.type_info(vars);
        let argument = self.arguments.leading().first().map(|arg| arg.type_info(vars));
        self.method.result_type(object, argument)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LogicalOp {
    And,
    Or,
}

/// Short-circuiting `and`/`or`. The first operand is always pure.
#[derive(Clone, Debug, PartialEq)]
pub struct Logical {
    pub op: LogicalOp,
    pub first: Box<ExprNode>,
    pub second: Box<ExprNode>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Select {
    pub source: Box<ListNode>,
    pub n: usize,
}

// Construction

impl ExprNode {
    pub fn number(value: f64) -> Self {
        ExprNode::Number(value)
    }

    pub fn string(value: impl Into<String>) -> Self {
        ExprNode::String(value.into())
    }

    pub fn bool(value: bool) -> Self {
        ExprNode::Bool(value)
    }

    pub fn nil() -> Self {
        ExprNode::Nil
    }

    pub fn table(entries: Vec<(ExprNode, ListNode)>) -> Self {
        ExprNode::Table(TableLiteral { entries })
    }

    pub fn function(params: ParameterList, body: AsmBlock) -> Self {
        ExprNode::Function(FunctionLiteral { params, body })
    }

    pub fn name(id: VarId) -> Self {
        ExprNode::Name(id)
    }

    /// # Panics
    /// If `register` is a vararg register.
    pub fn register(register: Register) -> Self {
        assert!(
            !register.is_vararg(),
            "internal compiler error: vararg register {register} used as a scalar"
        );
        ExprNode::Register(register)
    }

    /// # Panics
    /// If `method` does not yield exactly one value.
    pub fn invocation(object: ExprNode, method: InvocationMethod, arguments: ExprList) -> Self {
        assert!(
            method.return_count() == ReturnCount::One,
            "internal compiler error: {method} does not yield a single value"
        );
        ExprNode::Invocation(Invocation::new(object, method, arguments))
    }

    pub fn index(table: ExprNode, key: ExprNode) -> Self {
        Self::invocation(table, InvocationMethod::Index, ExprList::of(vec![key]))
    }

    /// # Panics
    /// If `operand` is impure.
    pub fn not(operand: ExprNode, vars: &VariableArena) -> Self {
        assert!(
            operand.is_pure(vars),
            "internal compiler error: impure operand of `not`: {operand}"
        );
        ExprNode::Not(Box::new(operand))
    }

    /// # Panics
    /// If `first` is impure.
    pub fn logical(op: LogicalOp, first: ExprNode, second: ExprNode, vars: &VariableArena) -> Self {
        assert!(
            first.is_pure(vars),
            "internal compiler error: impure first operand of logical operator: {first}"
        );
        ExprNode::Logical(Logical {
            op,
            first: Box::new(first),
            second: Box::new(second),
        })
    }

    /// # Panics
    /// If `source` is single-valued.
    pub fn select(source: ListNode, n: usize) -> Self {
        assert!(
            source.is_vararg(),
            "internal compiler error: select from non-vararg node {source}"
        );
        ExprNode::Select(Select {
            source: Box::new(source),
            n,
        })
    }

    /// Truncate a list to its first value.
    pub fn first_only(list: ListNode) -> Self {
        match list {
            ListNode::Expr(expr) => expr,
            other => Self::select(other, 0),
        }
    }

    /// Coerce to a number unless the type already is numeric.
    pub fn to_number(value: ExprNode, vars: &VariableArena) -> Self {
        if value.type_info(vars).is_numeric() {
            return value;
        }
        Self::invocation(value, InvocationMethod::ToNumber, ExprList::empty())
    }
}

// Queries

impl ExprNode {
    /// Most specific statically provable type.
    pub fn type_info(&self, vars: &VariableArena) -> StaticType {
        match self {
            ExprNode::Number(value) => StaticType::of_number(*value),
            ExprNode::String(_) => StaticType::String,
            ExprNode::Bool(_) | ExprNode::Not(_) => StaticType::Boolean,
            ExprNode::Nil => StaticType::Object,
            ExprNode::Table(_) => StaticType::Table,
            ExprNode::Function(_) => StaticType::Function,
            ExprNode::Name(id) => vars.type_of(*id),
            ExprNode::Register(register) => register.type_info(vars),
            ExprNode::Invocation(invocation) => invocation.result_type(vars),
            ExprNode::Logical(logical) => logical
                .first
                .type_info(vars)
                .and(logical.second.type_info(vars)),
            ExprNode::Select(select) => match &*select.source {
                ListNode::ExprList(list) => list
                    .leading()
                    .get(select.n)
                    .map_or(StaticType::Object, |element| element.type_info(vars)),
                _ => StaticType::Object,
            },
        }
    }

    /// Whether evaluating the node can be skipped or repeated without an
    /// observable difference.
    pub fn is_pure(&self, vars: &VariableArena) -> bool {
        match self {
            ExprNode::Number(_)
            | ExprNode::String(_)
            | ExprNode::Bool(_)
            | ExprNode::Nil
            | ExprNode::Function(_)
            | ExprNode::Register(_) => true,
            ExprNode::Name(id) => !vars.get(*id).is_global(),
            ExprNode::Table(table) => table
                .entries
                .iter()
                .all(|(key, value)| key.is_pure(vars) && value.is_pure(vars)),
            ExprNode::Invocation(_) => false,
            ExprNode::Not(operand) => operand.is_pure(vars),
            ExprNode::Logical(logical) => logical.first.is_pure(vars) && logical.second.is_pure(vars),
            ExprNode::Select(select) => select.source.is_pure(vars),
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(
            self,
            ExprNode::Number(_) | ExprNode::String(_) | ExprNode::Bool(_) | ExprNode::Nil
        )
    }

    /// Whether the node's type can still change as variables gain write
    /// sites. Function bodies are not inspected.
    pub fn depends_on_variables(&self) -> bool {
        match self {
            ExprNode::Name(_) => true,
            ExprNode::Register(register) => !register.type_source().is_fixed(),
            ExprNode::Number(_)
            | ExprNode::String(_)
            | ExprNode::Bool(_)
            | ExprNode::Nil
            | ExprNode::Table(_)
            | ExprNode::Function(_)
            | ExprNode::Not(_) => false,
            ExprNode::Invocation(invocation) => {
                invocation.object.depends_on_variables()
                    || invocation.arguments.depends_on_variables()
            }
            ExprNode::Logical(logical) => {
                logical.first.depends_on_variables() || logical.second.depends_on_variables()
            }
            ExprNode::Select(select) => select.source.depends_on_variables(),
        }
    }

    /// Provably truthy: the literal `true`, or a type that excludes
    /// `nil` and `false`.
    pub fn always_true(&self, vars: &VariableArena) -> bool {
        matches!(self, ExprNode::Bool(true)) || self.type_info(vars).never_falsy()
    }

    /// Provably falsy: the literal `false` or `nil`.
    pub fn always_false(&self) -> bool {
        matches!(self, ExprNode::Bool(false) | ExprNode::Nil)
    }
}

impl From<Register> for ExprNode {
    fn from(register: Register) -> Self {
        ExprNode::register(register)
    }
}

#[cfg(test)]
mod tests;
