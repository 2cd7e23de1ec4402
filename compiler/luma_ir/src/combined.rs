//! Lazily joined type information from many write sites.
//!
//! A [`CombinedType`] collects [`TypeSource`]s while a unit is being
//! lowered and joins them only when queried. Sources may refer back to
//! variables, so a tracker can end up (directly or through other trackers)
//! asking for its own type. Re-entry is detected per thread, keyed by
//! tracker address, and answered with `Object`, which is always a sound
//! answer. Trackers hold no interior state, so a finished arena can be read
//! from many threads at once.

use std::cell::RefCell;

use rustc_hash::FxHashSet;

use crate::{ExprNode, StaticType, VarId, VariableArena};

thread_local! {
    /// Addresses of the trackers whose `get` is running on this thread.
    static EVALUATING: RefCell<FxHashSet<usize>> = RefCell::new(FxHashSet::default());
}

/// One contribution to a combined type.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeSource {
    /// Known up front.
    Fixed(StaticType),
    /// Whatever the variable's type turns out to be.
    Variable(VarId),
    /// The static type of an expression, evaluated on demand.
    Expr(ExprNode),
}

impl TypeSource {
    /// Choose the cheapest source describing `value`.
    ///
    /// Expressions whose type cannot change any more are evaluated right
    /// away; anything that reads a variable is deferred.
    pub fn for_value(value: &ExprNode, vars: &VariableArena) -> TypeSource {
        match value {
            ExprNode::Name(id) => TypeSource::Variable(*id),
            _ if value.depends_on_variables() => TypeSource::Expr(value.clone()),
            _ => TypeSource::Fixed(value.type_info(vars)),
        }
    }

    pub fn evaluate(&self, vars: &VariableArena) -> StaticType {
        match self {
            TypeSource::Fixed(ty) => *ty,
            TypeSource::Variable(id) => vars.type_of(*id),
            TypeSource::Expr(expr) => expr.type_info(vars),
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, TypeSource::Fixed(_))
    }
}

impl From<StaticType> for TypeSource {
    fn from(ty: StaticType) -> Self {
        TypeSource::Fixed(ty)
    }
}

/// Accumulator joining all registered sources.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CombinedType {
    sources: Vec<TypeSource>,
}

impl CombinedType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, source: impl Into<TypeSource>) {
        self.sources.push(source.into());
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Join of every source, `Object` when there are none.
    ///
    /// Stops as soon as the running join reaches `Object`. A nested call on
    /// the same tracker made while it is being evaluated returns `Object`.
    pub fn get(&self, vars: &VariableArena) -> StaticType {
        let Some((first, rest)) = self.sources.split_first() else {
            return StaticType::Object;
        };
        let Some(_guard) = EvaluationGuard::enter(self) else {
            return StaticType::Object;
        };

        let mut joined = first.evaluate(vars);
        for source in rest {
            if joined == StaticType::Object {
                break;
            }
            joined = joined.and(source.evaluate(vars));
        }
        joined
    }
}

/// Marks a tracker as under evaluation on this thread until dropped,
/// unwinding included.
struct EvaluationGuard {
    key: usize,
}

impl EvaluationGuard {
    /// `None` when the tracker is already being evaluated on this thread.
    fn enter(tracker: &CombinedType) -> Option<Self> {
        let key = std::ptr::from_ref(tracker) as usize;
        EVALUATING
            .with_borrow_mut(|active| active.insert(key))
            .then_some(EvaluationGuard { key })
    }
}

impl Drop for EvaluationGuard {
    fn drop(&mut self) {
        EVALUATING.with_borrow_mut(|active| {
            active.remove(&self.key);
        });
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for concise assertions")]
mod tests;
