//! Stack growth guard for recursive tree passes.
//!
//! Flattening and constant folding both recurse once per level of syntax
//! or IR nesting. Scripts with pathological nesting (long `a.b.c...`
//! chains, deeply nested table constructors, generated code) would
//! overflow the native stack, so every recursive entry point wraps its
//! body in [`ensure_sufficient_stack`].
//!
//! # Platform Support
//!
//! - **Native targets**: grows the stack on demand through `stacker`.
//! - **WASM targets**: calls the closure directly.

/// Remaining stack below which a new segment is allocated (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (2MB).
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than [`RED_ZONE`] bytes remain.
///
/// ```text
/// fn lower(&mut self, node: &SyntaxNode) -> Result<ListNode, CompilationFailure> {
///     ensure_sufficient_stack(|| self.lower_inner(node))
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM manages its own stack; run `f` directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Depth of a right-leaning `a .. (b .. (c .. ...))` chain.
    fn nesting_depth(n: u32) -> u32 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { nesting_depth(n - 1) + 1 })
    }

    #[test]
    fn shallow_nesting() {
        assert_eq!(nesting_depth(16), 16);
    }

    #[test]
    fn deep_nesting_does_not_overflow() {
        assert_eq!(nesting_depth(200_000), 200_000);
    }

    #[test]
    fn passes_through_results() {
        let result: Result<u8, &str> = ensure_sufficient_stack(|| Err("bad input"));
        assert_eq!(result, Err("bad input"));
    }
}
