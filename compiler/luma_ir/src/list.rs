//! Possibly multi-valued nodes.

use crate::{ExprNode, Invocation, InvocationMethod, Register, ReturnCount, StaticType, VariableArena};

#[derive(Clone, Debug, PartialEq)]
pub enum ListNode {
    Expr(ExprNode),
    /// The enclosing function's `...`.
    Varargs,
    /// Read of a vararg register.
    ArrayRegister(Register),
    ExprList(ExprList),
    /// Invocation yielding zero or any number of values.
    Invocation(Invocation),
}

impl ListNode {
    pub fn varargs() -> Self {
        ListNode::Varargs
    }

    /// # Panics
    /// If `register` is scalar.
    pub fn array_register(register: Register) -> Self {
        assert!(
            register.is_vararg(),
            "internal compiler error: scalar register {register} used as vararg"
        );
        ListNode::ArrayRegister(register)
    }

    /// Build an invocation, as a scalar node when it yields one value.
    pub fn invocation(object: ExprNode, method: InvocationMethod, arguments: ExprList) -> Self {
        if method.return_count() == ReturnCount::One {
            ListNode::Expr(ExprNode::invocation(object, method, arguments))
        } else {
            ListNode::Invocation(Invocation::new(object, method, arguments))
        }
    }

    pub fn is_vararg(&self) -> bool {
        !matches!(self, ListNode::Expr(_))
    }

    pub fn is_pure(&self, vars: &VariableArena) -> bool {
        match self {
            ListNode::Expr(expr) => expr.is_pure(vars),
            ListNode::Varargs | ListNode::ArrayRegister(_) => true,
            ListNode::ExprList(list) => list.is_pure(vars),
            ListNode::Invocation(_) => false,
        }
    }

    /// Type of the first value.
    pub fn type_info(&self, vars: &VariableArena) -> StaticType {
        match self {
            ListNode::Expr(expr) => expr.type_info(vars),
            _ => StaticType::Object,
        }
    }

    pub fn depends_on_variables(&self) -> bool {
        match self {
            ListNode::Expr(expr) => expr.depends_on_variables(),
            ListNode::Varargs | ListNode::ArrayRegister(_) => false,
            ListNode::ExprList(list) => list.depends_on_variables(),
            ListNode::Invocation(invocation) => {
                invocation.object.depends_on_variables()
                    || invocation.arguments.depends_on_variables()
            }
        }
    }

    pub fn as_expr(&self) -> Option<&ExprNode> {
        match self {
            ListNode::Expr(expr) => Some(expr),
            _ => None,
        }
    }
}

impl From<ExprNode> for ListNode {
    fn from(expr: ExprNode) -> Self {
        ListNode::Expr(expr)
    }
}

impl From<ExprList> for ListNode {
    fn from(list: ExprList) -> Self {
        ListNode::ExprList(list)
    }
}

/// Leading scalar expressions plus an optional multi-valued tail.
///
/// Every element but the last is truncated to one value, the tail keeps
/// all of its values. The list as a whole is always treated as vararg.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExprList {
    leading: Vec<ExprNode>,
    trailing: Option<Box<ListNode>>,
}

impl ExprList {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of(leading: Vec<ExprNode>) -> Self {
        ExprList {
            leading,
            trailing: None,
        }
    }

    /// Build a list, normalizing the tail: a scalar tail joins the leading
    /// elements and a nested list is spliced in.
    pub fn new(mut leading: Vec<ExprNode>, trailing: Option<ListNode>) -> Self {
        match trailing {
            None => Self::of(leading),
            Some(ListNode::Expr(expr)) => {
                leading.push(expr);
                Self::of(leading)
            }
            Some(ListNode::ExprList(inner)) => {
                leading.extend(inner.leading);
                ExprList {
                    leading,
                    trailing: inner.trailing,
                }
            }
            Some(tail) => ExprList {
                leading,
                trailing: Some(Box::new(tail)),
            },
        }
    }

    pub fn leading(&self) -> &[ExprNode] {
        &self.leading
    }

    pub fn trailing(&self) -> Option<&ListNode> {
        self.trailing.as_deref()
    }

    pub fn into_parts(self) -> (Vec<ExprNode>, Option<ListNode>) {
        (self.leading, self.trailing.map(|tail| *tail))
    }

    /// The simplest node with the same values: a lone scalar or a lone
    /// tail stands for itself.
    pub fn into_node(self) -> ListNode {
        match (self.leading.len(), self.trailing) {
            (0, Some(tail)) => *tail,
            (1, None) => {
                let mut leading = self.leading;
                match leading.pop() {
                    Some(expr) => ListNode::Expr(expr),
                    None => ListNode::ExprList(ExprList::empty()),
                }
            }
            (_, trailing) => ListNode::ExprList(ExprList {
                leading: self.leading,
                trailing,
            }),
        }
    }

    /// Whether the list has neither leading elements nor a tail.
    pub fn is_empty(&self) -> bool {
        self.leading.is_empty() && self.trailing.is_none()
    }

    pub fn is_pure(&self, vars: &VariableArena) -> bool {
        self.leading.iter().all(|expr| expr.is_pure(vars))
            && self.trailing.as_ref().map_or(true, |tail| tail.is_pure(vars))
    }

    pub fn depends_on_variables(&self) -> bool {
        self.leading.iter().any(ExprNode::depends_on_variables)
            || self
                .trailing
                .as_ref()
                .is_some_and(|tail| tail.depends_on_variables())
    }
}
