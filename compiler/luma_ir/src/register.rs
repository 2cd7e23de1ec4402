//! SSA registers.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::names::next_name;
use crate::{ExprNode, StaticType, TypeSource, VariableArena};

const UNUSED_NAME: &str = "_";

/// A single static binding point.
///
/// Scalar registers hold exactly one value. Vararg registers hold a
/// runtime-sized list of values. Identity is the name, which is unique for
/// the process lifetime.
#[derive(Clone, Debug)]
pub struct Register {
    name: Arc<str>,
    vararg: bool,
    ty: Arc<TypeSource>,
}

impl Register {
    /// A fresh scalar register of the given type.
    pub fn scalar(ty: impl Into<TypeSource>) -> Self {
        Register {
            name: next_name().into(),
            vararg: false,
            ty: Arc::new(ty.into()),
        }
    }

    /// A fresh scalar register that will hold `value`.
    pub fn for_value(value: &ExprNode, vars: &VariableArena) -> Self {
        Self::scalar(TypeSource::for_value(value, vars))
    }

    /// A fresh vararg register.
    pub fn vararg() -> Self {
        Register {
            name: next_name().into(),
            vararg: true,
            ty: Arc::new(TypeSource::Fixed(StaticType::Object)),
        }
    }

    /// Sentinel for a discarded result.
    pub fn unused() -> Self {
        Register {
            name: UNUSED_NAME.into(),
            vararg: true,
            ty: Arc::new(TypeSource::Fixed(StaticType::Object)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_vararg(&self) -> bool {
        self.vararg
    }

    pub fn is_unused(&self) -> bool {
        &*self.name == UNUSED_NAME
    }

    pub fn type_source(&self) -> &TypeSource {
        &self.ty
    }

    pub fn type_info(&self, vars: &VariableArena) -> StaticType {
        self.ty.evaluate(vars)
    }
}

impl PartialEq for Register {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Register {}

impl Hash for Register {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.vararg {
            f.write_str("@")?;
        }
        Ok(())
    }
}
