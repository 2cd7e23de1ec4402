//! Syntax tree handed over by the parser.
//!
//! The tree is deliberately loose: a kind, ordered children, a position and
//! an optional text payload for leaves. Lowering validates shapes as it
//! goes and reports malformed trees as bad input.

use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SyntaxKind {
    // Blocks and statements
    Chunk,
    Do,
    Assignment,
    LocalAssignment,
    VarList,
    NameList,
    ExprList,
    AssignmentVar,
    LocalFunction,
    FunctionDecl,
    FuncName,
    MethodName,
    If,
    Condition,
    While,
    Repeat,
    For,
    ForIn,
    Return,
    Break,
    Goto,
    Label,

    // Access chains
    Var,
    Index,
    Call,
    ColCall,

    // Atoms
    Name,
    Number,
    String,
    Nil,
    True,
    False,
    DotDotDot,
    Function,
    ParamList,
    Table,
    Field,
    Paren,

    // Logical
    Not,
    And,
    Or,

    // Binary operators
    Add,
    Sub,
    Mul,
    Div,
    IDiv,
    Pow,
    Mod,
    Concat,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,

    // Unary operators
    Neg,
    Len,
    BitNot,
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: SyntaxKind,
    pub children: Vec<SyntaxNode>,
    /// 1-based, 0 when unknown.
    pub line: u32,
    pub column: u32,
    pub text: Option<Box<str>>,
}

impl SyntaxNode {
    pub fn leaf(kind: SyntaxKind, text: impl Into<Box<str>>) -> Self {
        SyntaxNode {
            kind,
            children: Vec::new(),
            line: 0,
            column: 0,
            text: Some(text.into()),
        }
    }

    pub fn node(kind: SyntaxKind, children: Vec<SyntaxNode>) -> Self {
        SyntaxNode {
            kind,
            children,
            line: 0,
            column: 0,
            text: None,
        }
    }

    /// A childless node without text (`nil`, `break`, `...`).
    pub fn token(kind: SyntaxKind) -> Self {
        Self::node(kind, Vec::new())
    }

    #[must_use]
    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    pub fn child(&self, index: usize) -> Option<&SyntaxNode> {
        self.children.get(index)
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn is(&self, kind: SyntaxKind) -> bool {
        self.kind == kind
    }
}

#[cfg(test)]
mod tests;
