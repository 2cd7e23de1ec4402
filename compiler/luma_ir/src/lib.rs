//! Luma IR: the register-based intermediate representation.
//!
//! This crate contains the data shared by every pass after parsing:
//! - Unique register names ([`names`])
//! - The static type lattice ([`StaticType`]) and the lazily joined
//!   [`CombinedType`]
//! - Variable records owned by a per-unit [`VariableArena`]
//! - Expression, list and statement nodes
//! - The parser's syntax tree ([`syntax`])
//! - Read-only ([`visit`]) and rebuilding ([`fold`]) traversals
//!
//! # Design
//!
//! - Node kinds are closed enums matched exhaustively.
//! - Nodes hold [`VarId`] handles, never references to variable records.
//! - Types that depend on variables are resolved on demand through the
//!   arena, so a write discovered later still reaches earlier readers.

mod combined;
mod display;
mod expr;
pub mod fold;
mod invocation;
mod list;
pub mod names;
mod register;
pub mod syntax;
mod types;
mod variable;
pub mod visit;
mod void;

pub use combined::{CombinedType, TypeSource};
pub use expr::{ExprNode, FunctionLiteral, Invocation, Logical, LogicalOp, Select, TableLiteral};
pub use invocation::{InvocationMethod, ReturnCount};
pub use list::{ExprList, ListNode};
pub use register::Register;
pub use syntax::{SyntaxKind, SyntaxNode};
pub use types::{is_integer, StaticType};
pub use variable::{
    VarId, VariableArena, VariableError, VariableInfo, VariableMode, WriteState, ENV_NAME,
};
pub use void::{AsmBlock, FlatExpr, IfClause, LValue, ParameterList, VoidNode};
