//! Integration tests for terms, variables, and slots
//!
//! Tests the textual convention and the tagged values it produces.

use reticle_foundation::{ErrorKind, Field, Slot, Term, Variable};

// =============================================================================
// Terms
// =============================================================================

#[test]
fn prefixed_name_is_iri() {
    let term = Term::parse("texai:Buster").unwrap();
    assert!(term.is_iri());
    assert_eq!(term.as_str(), "texai:Buster");
}

#[test]
fn quoted_text_is_literal() {
    let term = Term::parse("\"external\"").unwrap();
    assert!(term.is_literal());
    assert_eq!(term.as_str(), "external");
    assert_eq!(term.to_string(), "\"external\"");
}

#[test]
fn literal_and_iri_with_same_text_differ() {
    assert_ne!(Term::literal("x"), Term::iri("x"));
}

#[test]
fn variable_is_not_a_term() {
    let err = Term::parse("?x").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedFact { .. }));
}

#[test]
fn empty_and_unterminated_are_rejected() {
    assert!(Term::parse("").is_err());
    assert!(Term::parse("   ").is_err());
    assert!(Term::parse("\"open").is_err());
}

// =============================================================================
// Variables
// =============================================================================

#[test]
fn variable_name_ignores_question_mark() {
    assert_eq!(Variable::new("?Agent1"), Variable::new("Agent1"));
    assert_eq!(Variable::new("?Agent1").name(), "Agent1");
    assert_eq!(Variable::new("Agent1").to_string(), "?Agent1");
}

// =============================================================================
// Slots
// =============================================================================

#[test]
fn slot_parse_follows_convention() {
    assert_eq!(
        Slot::parse("?Thing").unwrap(),
        Slot::Variable(Variable::new("Thing"))
    );
    assert_eq!(
        Slot::parse("cyc:DomesticCat").unwrap(),
        Slot::Constant(Term::iri("cyc:DomesticCat"))
    );
    assert_eq!(
        Slot::parse("\"external\"").unwrap(),
        Slot::Constant(Term::literal("external"))
    );
}

#[test]
fn bare_question_mark_is_malformed_pattern() {
    let err = Slot::parse("?").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedPattern { .. }));
}

#[test]
fn empty_slot_is_malformed_pattern() {
    let err = Slot::parse("").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedPattern { .. }));
}

#[test]
fn slot_accessors() {
    let var = Slot::parse("?x").unwrap();
    assert!(var.is_variable());
    assert!(var.as_constant().is_none());
    let constant = Slot::from(Term::iri("a"));
    assert_eq!(constant.as_constant(), Some(&Term::iri("a")));
    assert_eq!(constant.to_string(), "a");
}

#[test]
fn fields_in_triple_order() {
    assert_eq!(
        Field::ALL,
        [Field::Subject, Field::Predicate, Field::Object]
    );
    assert_eq!(Field::Object.to_string(), "object");
}
