//! Passes over lowered IR.
//!
//! - [`fold_chunk`]: local simplification of constant and provably
//!   truthy/falsy sub-expressions.
//! - [`verify`]: the single-assignment check every lowered unit must pass
//!   before code generation.

mod const_fold;
pub mod verify;

pub use const_fold::{fold_chunk, ConstantFolder, FoldOptions};
pub use verify::verify_single_assignment;
