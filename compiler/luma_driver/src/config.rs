//! Pipeline configuration.

use luma_diagnostic::QueueConfig;
use luma_flatten::FlattenOptions;
use luma_opt::FoldOptions;

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct PipelineConfig {
    pub flatten: FlattenOptions,
    /// `None` skips constant folding.
    pub fold: Option<FoldOptions>,
    /// Run the single-assignment verifier on every unit.
    pub verify: bool,
    /// Process independent units on the rayon thread pool.
    pub parallel: bool,
    /// Per-unit diagnostic collection.
    pub diagnostics: QueueConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            flatten: FlattenOptions::default(),
            fold: Some(FoldOptions::default()),
            verify: true,
            parallel: true,
            diagnostics: QueueConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Lowering only: no folding, no verification, one unit at a time.
    pub fn lowering_only() -> Self {
        PipelineConfig {
            fold: None,
            verify: false,
            parallel: false,
            ..Self::default()
        }
    }
}
