//! Static type lattice.
//!
//! ```text
//!            Object
//!    ┌──────┬──┴────┬───────┬─────────┐
//! Number  Boolean  String  Table  Function
//!    │
//! Integer
//! ```
//!
//! A [`StaticType`] is the most specific type provable for a value.
//! `Object` is the top element and means "nothing is known".

use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum StaticType {
    Object,
    Number,
    Integer,
    Boolean,
    String,
    Table,
    Function,
}

impl StaticType {
    pub const ALL: [StaticType; 7] = [
        StaticType::Object,
        StaticType::Number,
        StaticType::Integer,
        StaticType::Boolean,
        StaticType::String,
        StaticType::Table,
        StaticType::Function,
    ];

    /// Direct supertype, `None` for `Object`.
    pub const fn parent(self) -> Option<StaticType> {
        match self {
            StaticType::Object => None,
            StaticType::Integer => Some(StaticType::Number),
            StaticType::Number
            | StaticType::Boolean
            | StaticType::String
            | StaticType::Table
            | StaticType::Function => Some(StaticType::Object),
        }
    }

    /// Reflexive-transitive subtype check.
    pub fn subtype_of(self, other: StaticType) -> bool {
        let mut current = Some(self);
        while let Some(ty) = current {
            if ty == other {
                return true;
            }
            current = ty.parent();
        }
        false
    }

    /// Least common supertype.
    #[must_use]
    pub fn and(self, other: StaticType) -> StaticType {
        let mut candidate = self;
        while !other.subtype_of(candidate) {
            match candidate.parent() {
                Some(parent) => candidate = parent,
                None => return StaticType::Object,
            }
        }
        candidate
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, StaticType::Number | StaticType::Integer)
    }

    /// Whether no value of this type can be `nil` or `false`.
    pub fn never_falsy(self) -> bool {
        !matches!(self, StaticType::Object | StaticType::Boolean)
    }

    /// Type of a numeric constant.
    pub fn of_number(value: f64) -> StaticType {
        if is_integer(value) {
            StaticType::Integer
        } else {
            StaticType::Number
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StaticType::Object => "object",
            StaticType::Number => "number",
            StaticType::Integer => "integer",
            StaticType::Boolean => "boolean",
            StaticType::String => "string",
            StaticType::Table => "table",
            StaticType::Function => "function",
        }
    }
}

impl fmt::Display for StaticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `value` is finite, has no fractional part and fits in an `i64`.
#[expect(
    clippy::cast_precision_loss,
    reason = "bounds are exact powers of two"
)]
pub fn is_integer(value: f64) -> bool {
    value.is_finite()
        && value.fract() == 0.0
        && value >= i64::MIN as f64
        && value < -(i64::MIN as f64)
}
