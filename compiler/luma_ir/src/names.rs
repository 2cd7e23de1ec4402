//! Process-wide unique names for synthesized registers.
//!
//! The counter is atomic so independent units may be lowered on separate
//! threads without ever handing out the same name twice.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_NAME: AtomicU64 = AtomicU64::new(0);

/// Return a name never returned before in this process.
///
/// Names are `v` followed by the counter in upper-case hex (`v0`, `v1`, ...,
/// `vA`). Source identifiers never collide with them because registers and
/// variables live in separate namespaces.
pub fn next_name() -> String {
    let n = NEXT_NAME.fetch_add(1, Ordering::Relaxed);
    format!("v{n:X}")
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for concise assertions")]
mod tests;
