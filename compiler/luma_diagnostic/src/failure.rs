//! Compilation failure values.
//!
//! A [`CompilationFailure`] aborts one unit. It is returned only after the
//! matching diagnostic has gone to the reporter, so holding one means the
//! user has been told why.

use std::fmt;

/// Classification of a failure or diagnostic.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FailureTag {
    /// Valid input using a language feature the compiler does not handle.
    UnsupportedFeature,
    /// The problem is in the program being compiled.
    UserCode,
    IoError,
    /// Internal inconsistency in the compiler.
    Bug,
    /// Malformed input tree or semantically invalid program.
    BadInput,
    Parser,
}

impl FailureTag {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureTag::UnsupportedFeature => "unsupported-feature",
            FailureTag::UserCode => "user-code",
            FailureTag::IoError => "io-error",
            FailureTag::Bug => "bug",
            FailureTag::BadInput => "bad-input",
            FailureTag::Parser => "parser",
        }
    }
}

impl fmt::Display for FailureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit could not be compiled.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[error("compilation failure [{}]", render_tags(.tags))]
pub struct CompilationFailure {
    tags: Vec<FailureTag>,
}

fn render_tags(tags: &[FailureTag]) -> String {
    if tags.is_empty() {
        return "untagged".to_owned();
    }
    tags.iter()
        .map(|tag| tag.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl CompilationFailure {
    pub fn new(tag: FailureTag) -> Self {
        CompilationFailure { tags: vec![tag] }
    }

    pub fn with_tags(tags: impl IntoIterator<Item = FailureTag>) -> Self {
        let mut failure = CompilationFailure { tags: Vec::new() };
        for tag in tags {
            failure = failure.and_tag(tag);
        }
        failure
    }

    #[must_use]
    pub fn and_tag(mut self, tag: FailureTag) -> Self {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    pub fn tags(&self) -> &[FailureTag] {
        &self.tags
    }

    pub fn has_tag(&self, tag: FailureTag) -> bool {
        self.tags.contains(&tag)
    }
}
