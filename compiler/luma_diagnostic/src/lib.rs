//! Diagnostic reporting for the Luma compiler passes.
//!
//! Passes never print. They hand [`Diagnostic`] values to an injected
//! [`Reporter`] and, when a unit cannot be compiled, return a
//! [`CompilationFailure`] so the caller can move on to the next unit.
//!
//! ```text
//! let mut queue = DiagnosticQueue::new();
//! match flatten_chunk(&tree, &options, &mut queue) {
//!     Ok(chunk) => { /* hand to the next pass */ }
//!     Err(failure) => { /* queue holds at least one error */ }
//! }
//! ```

mod diagnostic;
mod failure;
pub mod queue;
mod reporter;

pub use diagnostic::{Diagnostic, Phase, Severity};
pub use failure::{CompilationFailure, FailureTag};
pub use queue::{DiagnosticQueue, QueueConfig};
pub use reporter::{NullReporter, PhaseReporter, Reporter, TracingReporter};
