//! Compilation-unit pipeline: flatten, fold, verify.
//!
//! Units are independent. [`compile_units`] runs them on the rayon pool,
//! each with its own [`DiagnosticQueue`], and one unit failing leaves the
//! others untouched.
//!
//! [`DiagnosticQueue`]: luma_diagnostic::DiagnosticQueue

mod config;
mod pipeline;

use std::sync::Once;

pub use config::PipelineConfig;
pub use pipeline::{compile_unit, compile_units, SourceUnit, UnitReport};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once. Does nothing unless `RUST_LOG` is set,
/// e.g. `RUST_LOG=luma_flatten=debug,luma_opt=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // Another subscriber may already be installed by the host.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}
