//! Invocation methods: calls, indexing and every operator.

use std::fmt;

use crate::StaticType;

/// How many values an invocation yields.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ReturnCount {
    Zero,
    One,
    Any,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum InvocationMethod {
    Add,
    BAnd,
    BNot,
    BOr,
    BXor,
    Call,
    Concat,
    Div,
    Eq,
    IDiv,
    Index,
    Le,
    Len,
    Lt,
    Mod,
    Mul,
    Pow,
    SetIndex,
    Shl,
    Shr,
    Sub,
    ToBoolean,
    ToNumber,
    Unm,
}

impl InvocationMethod {
    pub fn return_count(self) -> ReturnCount {
        match self {
            InvocationMethod::Call => ReturnCount::Any,
            InvocationMethod::SetIndex => ReturnCount::Zero,
            _ => ReturnCount::One,
        }
    }

    /// Result type given the object type and the first argument's type.
    ///
    /// Arithmetic on two numeric operands keeps their join, except `/` and
    /// `^` which always produce a float. Bitwise operators on numbers
    /// produce integers. Anything that may hit a metamethod is `Object`.
    pub fn result_type(self, object: StaticType, argument: Option<StaticType>) -> StaticType {
        let both_numeric = object.is_numeric() && argument.is_some_and(StaticType::is_numeric);
        match self {
            InvocationMethod::Add
            | InvocationMethod::Sub
            | InvocationMethod::Mul
            | InvocationMethod::IDiv
            | InvocationMethod::Mod => match argument {
                Some(arg) if both_numeric => object.and(arg),
                _ => StaticType::Object,
            },
            InvocationMethod::Div | InvocationMethod::Pow if both_numeric => StaticType::Number,
            InvocationMethod::BAnd
            | InvocationMethod::BOr
            | InvocationMethod::BXor
            | InvocationMethod::Shl
            | InvocationMethod::Shr
                if both_numeric =>
            {
                StaticType::Integer
            }
            InvocationMethod::BNot if object.is_numeric() => StaticType::Integer,
            InvocationMethod::Unm if object.is_numeric() => object,
            InvocationMethod::Eq
            | InvocationMethod::Lt
            | InvocationMethod::Le
            | InvocationMethod::ToBoolean => StaticType::Boolean,
            InvocationMethod::ToNumber => StaticType::Number,
            _ => StaticType::Object,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InvocationMethod::Add => "add",
            InvocationMethod::BAnd => "band",
            InvocationMethod::BNot => "bnot",
            InvocationMethod::BOr => "bor",
            InvocationMethod::BXor => "bxor",
            InvocationMethod::Call => "call",
            InvocationMethod::Concat => "concat",
            InvocationMethod::Div => "div",
            InvocationMethod::Eq => "eq",
            InvocationMethod::IDiv => "idiv",
            InvocationMethod::Index => "index",
            InvocationMethod::Le => "le",
            InvocationMethod::Len => "len",
            InvocationMethod::Lt => "lt",
            InvocationMethod::Mod => "mod",
            InvocationMethod::Mul => "mul",
            InvocationMethod::Pow => "pow",
            InvocationMethod::SetIndex => "set_index",
            InvocationMethod::Shl => "shl",
            InvocationMethod::Shr => "shr",
            InvocationMethod::Sub => "sub",
            InvocationMethod::ToBoolean => "to_boolean",
            InvocationMethod::ToNumber => "to_number",
            InvocationMethod::Unm => "unm",
        }
    }
}

impl fmt::Display for InvocationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
