//! Integration tests for production filters
//!
//! Filters run only on complete matches; rejected matches are held back.

use reticle_engine::{Fact, Filter, Production, ReteEngine};

fn fact(s: &str, p: &str, o: &str) -> Fact {
    Fact::parse(s, p, o).unwrap()
}

fn typed_engine(filter: Filter) -> ReteEngine {
    let mut engine = ReteEngine::new();
    engine
        .add_production(
            Production::new("typed")
                .when("?x", "rdf:type", "?Thing")
                .unwrap()
                .filter(filter),
        )
        .unwrap();
    engine
}

#[test]
fn not_equal_rejects_matching_constant() {
    let mut engine = typed_engine(Filter::not_equal("?Thing", "texai:FCGClauseSubject").unwrap());
    engine.add_fact(fact("texai:Buster", "rdf:type", "texai:FCGClauseSubject"));
    assert!(!engine.is_satisfied("typed"));
    assert_eq!(engine.stats().rejected, 1);

    engine.add_fact(fact("texai:Buster", "rdf:type", "cyc:DomesticCat"));
    let bindings = engine.get_bindings("typed").unwrap();
    assert_eq!(bindings.get("?Thing").unwrap().as_str(), "cyc:DomesticCat");
}

#[test]
fn equal_keeps_only_matching_constant() {
    let mut engine = typed_engine(Filter::equal("?Thing", "cyc:DomesticCat").unwrap());
    engine.add_fact(fact("a", "rdf:type", "cyc:Dog"));
    engine.add_fact(fact("b", "rdf:type", "cyc:DomesticCat"));
    let all = engine.get_all_bindings("typed");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].get("?x").unwrap().as_str(), "b");
}

#[test]
fn filter_between_two_variables() {
    let mut engine = ReteEngine::new();
    engine
        .add_production(
            Production::new("siblings")
                .when("?p", "parentOf", "?a")
                .unwrap()
                .when("?p", "parentOf", "?b")
                .unwrap()
                .filter(Filter::not_equal("?a", "?b").unwrap()),
        )
        .unwrap();
    engine.add_fact(fact("alfred", "parentOf", "betty"));
    assert!(!engine.is_satisfied("siblings"));
    engine.add_fact(fact("alfred", "parentOf", "bob"));
    assert_eq!(engine.get_all_bindings("siblings").len(), 2);
}

#[test]
fn retracting_rejected_match_clears_it() {
    let mut engine = typed_engine(Filter::not_equal("?Thing", "cyc:Dog").unwrap());
    let dog = fact("rex", "rdf:type", "cyc:Dog");
    engine.add_fact(dog.clone());
    assert_eq!(engine.stats().rejected, 1);
    engine.remove_fact(&dog);
    assert_eq!(engine.stats().rejected, 0);
}

#[test]
fn literal_filter_on_object_variable() {
    let mut engine = ReteEngine::new();
    engine
        .add_production(
            Production::new("role")
                .when("?x", "texai:fcgDiscourseRole", "?role")
                .unwrap()
                .filter(Filter::equal("?role", "\"external\"").unwrap()),
        )
        .unwrap();
    engine.add_fact(fact("texai:Buster", "texai:fcgDiscourseRole", "external"));
    assert!(!engine.is_satisfied("role"));
    engine.add_fact(fact("texai:Buster", "texai:fcgDiscourseRole", "\"external\""));
    assert!(engine.is_satisfied("role"));
}
