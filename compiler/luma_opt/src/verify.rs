//! Single-assignment check.
//!
//! Every register, scalar or vararg, is bound by exactly one `Assign` or
//! `AssignArray` across the whole unit, function bodies included. A second
//! binding means the lowering produced broken IR, so a violation is
//! reported as a compiler bug rather than a user error.

use luma_diagnostic::{CompilationFailure, Diagnostic, FailureTag, Phase, Reporter};
use luma_ir::visit::{walk_void, Visitor};
use luma_ir::{AsmBlock, Register, VoidNode};
use rustc_hash::FxHashSet;

/// Check that no register is assigned twice in `block`.
///
/// # Errors
///
/// Reports one diagnostic per offending register and fails with
/// [`FailureTag::Bug`].
#[tracing::instrument(level = "debug", skip_all)]
pub fn verify_single_assignment(
    block: &AsmBlock,
    reporter: &mut dyn Reporter,
) -> Result<(), CompilationFailure> {
    let mut checker = AssignmentChecker::default();
    checker.visit_block(block);
    tracing::debug!(registers = checker.seen.len(), "verified chunk");

    if checker.duplicates.is_empty() {
        return Ok(());
    }
    for register in &checker.duplicates {
        reporter.report(
            Diagnostic::error(format!("register {register} is assigned more than once"))
                .with_phase(Phase::Verification)
                .with_tag(FailureTag::Bug),
        );
    }
    Err(CompilationFailure::new(FailureTag::Bug))
}

#[derive(Default)]
struct AssignmentChecker<'ir> {
    seen: FxHashSet<&'ir str>,
    /// Each offending register once, in order of its second binding.
    duplicates: Vec<&'ir Register>,
}

impl<'ir> AssignmentChecker<'ir> {
    fn bind(&mut self, register: &'ir Register) {
        if register.is_unused() {
            return;
        }
        if !self.seen.insert(register.name())
            && !self.duplicates.iter().any(|seen| *seen == register)
        {
            self.duplicates.push(register);
        }
    }
}

impl<'ir> Visitor<'ir> for AssignmentChecker<'ir> {
    fn visit_void(&mut self, node: &'ir VoidNode) {
        if let VoidNode::Assign { target, .. } | VoidNode::AssignArray { target, .. } = node {
            self.bind(target);
        }
        walk_void(self, node);
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for concise assertions")]
mod tests;
