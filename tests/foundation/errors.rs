//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use reticle_foundation::{Error, ErrorContext, ErrorKind};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_duplicate_production() {
    let err = Error::duplicate_production("test1");
    assert!(matches!(err.kind, ErrorKind::DuplicateProductionName(_)));
    assert!(err.to_string().contains("test1"));
}

#[test]
fn error_unknown_production() {
    let err = Error::unknown_production("missing");
    assert!(matches!(err.kind, ErrorKind::UnknownProductionName(_)));
    assert!(err.to_string().contains("missing"));
}

#[test]
fn error_malformed_pattern() {
    let err = Error::malformed_pattern("literal in subject position");
    assert!(matches!(err.kind, ErrorKind::MalformedPattern { .. }));
    assert!(err.to_string().contains("literal in subject position"));
}

#[test]
fn error_malformed_fact() {
    let err = Error::malformed_fact("empty term");
    assert!(matches!(err.kind, ErrorKind::MalformedFact { .. }));
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn error_context_records_production_and_condition() {
    let err = Error::malformed_pattern("bad").with_context(
        ErrorContext::new()
            .with_production("test1")
            .with_condition(2),
    );
    assert_eq!(err.production(), Some("test1"));
    let context = err.context.as_ref().unwrap();
    assert_eq!(context.condition, Some(2));
    assert_eq!(context.to_string(), "in production test1 at condition 2");
}

#[test]
fn error_without_context_has_no_production() {
    assert!(Error::malformed_fact("x").production().is_none());
}

#[test]
fn error_kinds_compare() {
    assert_eq!(
        Error::duplicate_production("a").kind,
        ErrorKind::DuplicateProductionName("a".to_string())
    );
}
