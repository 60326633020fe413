//! Integration tests for fact retraction and reset

use reticle_engine::{Fact, Production, ReteEngine};

fn fact(s: &str, p: &str, o: &str) -> Fact {
    Fact::parse(s, p, o).unwrap()
}

fn ancestry_engine() -> ReteEngine {
    let mut engine = ReteEngine::new();
    engine
        .add_production(
            Production::new("ancestry")
                .when("?Agent1", "parentOf", "?Agent2")
                .unwrap()
                .when("?Agent2", "parentOf", "?Agent3")
                .unwrap()
                .when("?Agent3", "parentOf", "?Agent4")
                .unwrap(),
        )
        .unwrap();
    engine
}

fn family() -> Vec<Fact> {
    vec![
        fact("Alfred", "parentOf", "Betty"),
        fact("Betty", "parentOf", "Cathy"),
        fact("Cathy", "parentOf", "David"),
    ]
}

#[test]
fn removing_any_link_unsatisfies() {
    for missing in family() {
        let mut engine = ancestry_engine();
        engine.evaluate_batch(family());
        assert!(engine.is_satisfied("ancestry"));
        assert!(engine.remove_fact(&missing));
        assert!(!engine.is_satisfied("ancestry"), "still satisfied without {missing}");
    }
}

#[test]
fn removing_first_link_drops_every_downstream_token() {
    let mut engine = ancestry_engine();
    engine.evaluate_batch(family());
    assert_eq!(engine.stats().tokens, 3 + 2 + 1);

    engine.remove_fact(&fact("Alfred", "parentOf", "Betty"));
    // (Betty Cathy) and (Cathy David) still start chains; (Betty Cathy David) still joins.
    assert_eq!(engine.stats().tokens, 2 + 1);
}

#[test]
fn removing_absent_fact_is_a_noop() {
    let mut engine = ancestry_engine();
    engine.evaluate_batch(family());
    let before = engine.stats();
    assert!(!engine.remove_fact(&fact("Zed", "parentOf", "Yan")));
    assert_eq!(engine.stats(), before);
}

#[test]
fn retract_then_readd_restores_the_match() {
    let mut engine = ancestry_engine();
    engine.evaluate_batch(family());
    let before = engine.get_bindings("ancestry").unwrap();

    let middle = fact("Betty", "parentOf", "Cathy");
    engine.remove_fact(&middle);
    engine.add_fact(middle);
    assert_eq!(engine.get_bindings("ancestry").unwrap(), before);
}

#[test]
fn duplicate_add_creates_no_extra_tokens() {
    let mut engine = ancestry_engine();
    engine.evaluate_batch(family());
    let before = engine.stats();
    for f in family() {
        assert!(!engine.add_fact(f));
    }
    assert_eq!(engine.stats(), before);
    assert_eq!(engine.get_all_bindings("ancestry").len(), 1);
}

#[test]
fn reset_clears_matches_and_keeps_productions() {
    let mut engine = ancestry_engine();
    engine.evaluate_batch(family());
    engine.reset();

    assert!(engine.satisfied_production_names().is_empty());
    assert_eq!(engine.fact_count(), 0);
    assert_eq!(engine.stats().tokens, 0);
    assert!(engine.contains_production("ancestry"));

    engine.evaluate_batch(family());
    assert!(engine.is_satisfied("ancestry"));
}

#[test]
fn self_join_fact_retracts_cleanly() {
    let mut engine = ReteEngine::new();
    engine
        .add_production(
            Production::new("loop")
                .when("?a", "parentOf", "?b")
                .unwrap()
                .when("?b", "parentOf", "?a")
                .unwrap(),
        )
        .unwrap();
    let own = fact("ouro", "parentOf", "ouro");
    engine.add_fact(own.clone());
    assert_eq!(engine.get_all_bindings("loop").len(), 1);
    engine.remove_fact(&own);
    assert!(!engine.is_satisfied("loop"));
    assert_eq!(engine.stats().tokens, 0);
}

#[test]
fn facts_iterates_working_memory() {
    let mut engine = ancestry_engine();
    engine.evaluate_batch(family());
    let mut facts: Vec<Fact> = engine.facts().cloned().collect();
    facts.sort();
    let mut expected = family();
    expected.sort();
    assert_eq!(facts, expected);
}

fn fan_out_engine(children: usize) -> ReteEngine {
    let mut engine = ReteEngine::new();
    engine
        .add_production(
            Production::new("reach")
                .when("?x", "linksTo", "?y")
                .unwrap()
                .when("?y", "owns", "?z")
                .unwrap(),
        )
        .unwrap();
    engine.evaluate_batch((0..children).map(|i| fact("mid", "owns", &format!("z{i}"))));
    engine
}

#[test]
fn removing_a_wide_hub_clears_its_subtree() {
    let mut engine = fan_out_engine(10_000);
    let hub = fact("hub", "linksTo", "mid");
    engine.add_fact(hub.clone());
    assert_eq!(engine.get_all_bindings("reach").len(), 10_000);
    assert_eq!(engine.stats().tokens, 10_001);

    assert!(engine.remove_fact(&hub));
    assert_eq!(engine.stats().tokens, 0);
    assert!(!engine.is_satisfied("reach"));
    assert_eq!(engine.fact_count(), 10_000);

    engine.add_fact(hub);
    assert_eq!(engine.stats().tokens, 10_001);
}

#[test]
fn removing_one_child_of_a_wide_hub_keeps_siblings() {
    let mut engine = fan_out_engine(10_000);
    engine.add_fact(fact("hub", "linksTo", "mid"));
    assert!(engine.remove_fact(&fact("mid", "owns", "z42")));
    assert_eq!(engine.stats().tokens, 10_000);
    assert_eq!(engine.get_all_bindings("reach").len(), 9_999);
    assert!(
        engine
            .get_all_bindings("reach")
            .iter()
            .all(|b| b.get("?z").map(|t| t.as_str()) != Some("z42"))
    );
}
