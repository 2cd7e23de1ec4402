use super::*;
use pretty_assertions::assert_eq;

#[test]
fn severity_ordering() {
    assert!(Severity::Error > Severity::Warning);
    assert!(Severity::Warning > Severity::Note);
    assert!(Severity::Note > Severity::Help);
    assert!(Severity::Error.is_error());
    assert!(!Severity::Warning.is_error());
}

#[test]
fn display_with_position_and_phase() {
    let diag = Diagnostic::error("unknown statement: Goto")
        .at(12, 4)
        .with_phase(Phase::Flattening);
    assert_eq!(diag.to_string(), "error[flattening] 12:4: unknown statement: Goto");
}

#[test]
fn display_without_position() {
    let diag = Diagnostic::warning("condition is always false");
    assert_eq!(diag.to_string(), "warning: condition is always false");
}

#[test]
fn zero_line_is_unknown() {
    let diag = Diagnostic::note("synthesized").at(0, 3);
    assert_eq!(diag.line, None);
    assert_eq!(diag.column, None);
}

#[test]
fn cause_is_rendered() {
    let err = "1e".parse::<f64>().unwrap_err();
    let diag = Diagnostic::error("malformed number").with_cause(&err);
    assert_eq!(diag.cause.as_deref(), Some("invalid float literal"));
    assert!(diag.to_string().ends_with("(caused by: invalid float literal)"));
}

#[test]
fn tags_are_deduplicated() {
    let diag = Diagnostic::error("x")
        .with_tag(FailureTag::BadInput)
        .with_tag(FailureTag::BadInput)
        .with_tag(FailureTag::UnsupportedFeature);
    assert_eq!(
        diag.tags,
        vec![FailureTag::BadInput, FailureTag::UnsupportedFeature]
    );
}
