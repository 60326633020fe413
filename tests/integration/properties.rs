//! Property tests: the observable state depends only on the current fact set.

use proptest::prelude::*;

use reticle::engine::{Fact, Filter, Production, ReteEngine, Term, Variable};

use crate::scenarios::{discourse_facts, discourse_production};

type Observation = Vec<(String, Vec<Vec<(Variable, Term)>>)>;

/// Every satisfied production with all of its matches, in a canonical order.
fn observe(engine: &ReteEngine) -> Observation {
    let mut names: Vec<String> = engine
        .satisfied_production_names()
        .into_iter()
        .map(str::to_string)
        .collect();
    names.sort();
    names
        .into_iter()
        .map(|name| {
            let mut matches: Vec<_> = engine
                .get_all_bindings(&name)
                .iter()
                .map(reticle::engine::Bindings::to_vec)
                .collect();
            matches.sort();
            (name, matches)
        })
        .collect()
}

fn productions() -> Vec<Production> {
    vec![
        Production::new("grandparent")
            .when("?a", "parentOf", "?b")
            .unwrap()
            .when("?b", "parentOf", "?c")
            .unwrap(),
        Production::new("siblings")
            .when("?p", "parentOf", "?a")
            .unwrap()
            .when("?p", "parentOf", "?b")
            .unwrap()
            .filter(Filter::not_equal("?a", "?b").unwrap()),
        Production::new("fond_parent")
            .when("?p", "parentOf", "?c")
            .unwrap()
            .when("?p", "likes", "?c")
            .unwrap(),
        Production::new("self_regard")
            .when("?x", "?rel", "?x")
            .unwrap(),
    ]
}

fn engine_with(facts: &[Fact]) -> ReteEngine {
    let mut engine = ReteEngine::new();
    for production in productions() {
        engine.add_production(production).unwrap();
    }
    for fact in facts {
        engine.add_fact(fact.clone());
    }
    engine
}

fn arb_fact() -> impl Strategy<Value = Fact> {
    let people = prop::sample::select(vec!["ann", "bob", "cat", "dan"]);
    let relations = prop::sample::select(vec!["parentOf", "likes"]);
    (people.clone(), relations, people).prop_map(|(s, p, o)| Fact::parse(s, p, o).unwrap())
}

fn arb_facts() -> impl Strategy<Value = Vec<Fact>> {
    prop::collection::hash_set(arb_fact(), 0..16).prop_map(|set| set.into_iter().collect())
}

proptest! {
    #[test]
    fn discourse_is_order_independent(
        facts in Just(discourse_facts()).prop_shuffle()
    ) {
        let mut engine = ReteEngine::new();
        engine.add_production(discourse_production()).unwrap();
        for fact in facts {
            engine.add_fact(fact);
        }
        prop_assert_eq!(engine.satisfied_production_names(), vec!["test1"]);
        let bindings = engine.get_bindings("test1").unwrap();
        prop_assert_eq!(bindings.get("?Individual").map(Term::as_str), Some("texai:Buster"));
        prop_assert_eq!(bindings.get("?Thing").map(Term::as_str), Some("cyc:DomesticCat"));
    }

    #[test]
    fn any_insertion_order_gives_same_matches(
        (facts, shuffled) in arb_facts().prop_flat_map(|facts| {
            (Just(facts.clone()), Just(facts).prop_shuffle())
        })
    ) {
        let a = engine_with(&facts);
        let b = engine_with(&shuffled);
        prop_assert_eq!(observe(&a), observe(&b));
        prop_assert_eq!(a.stats(), b.stats());
    }

    #[test]
    fn retract_then_readd_is_identity(
        (facts, index) in arb_facts()
            .prop_filter("need a fact", |f| !f.is_empty())
            .prop_flat_map(|facts| {
                let len = facts.len();
                (Just(facts), 0..len)
            })
    ) {
        let reference = engine_with(&facts);
        let mut engine = engine_with(&facts);
        let fact = facts[index].clone();
        prop_assert!(engine.remove_fact(&fact));
        prop_assert!(engine.add_fact(fact));
        prop_assert_eq!(observe(&engine), observe(&reference));
        prop_assert_eq!(engine.stats(), reference.stats());
    }

    #[test]
    fn duplicate_add_is_identity(facts in arb_facts()) {
        let reference = engine_with(&facts);
        let mut engine = engine_with(&facts);
        for fact in &facts {
            prop_assert!(!engine.add_fact(fact.clone()));
        }
        prop_assert_eq!(observe(&engine), observe(&reference));
        prop_assert_eq!(engine.stats(), reference.stats());
    }

    #[test]
    fn removal_matches_never_having_added(
        facts in arb_facts(),
        removed in arb_facts()
    ) {
        let mut engine = engine_with(&facts);
        for fact in &removed {
            engine.remove_fact(fact);
        }
        let remaining: Vec<Fact> = facts
            .iter()
            .filter(|f| !removed.contains(f))
            .cloned()
            .collect();
        let reference = engine_with(&remaining);
        prop_assert_eq!(observe(&engine), observe(&reference));
        prop_assert_eq!(engine.stats(), reference.stats());
    }

    #[test]
    fn reset_unsatisfies_everything(facts in arb_facts()) {
        let mut engine = engine_with(&facts);
        engine.reset();
        prop_assert!(engine.satisfied_production_names().is_empty());
        prop_assert_eq!(engine.stats().tokens, 0);
        prop_assert_eq!(engine.fact_count(), 0);
        prop_assert_eq!(engine.stats().alpha_memories, engine_with(&[]).stats().alpha_memories);
    }

    #[test]
    fn late_registration_matches_early_registration(facts in arb_facts()) {
        let early = engine_with(&facts);
        let mut late = ReteEngine::new();
        for fact in &facts {
            late.add_fact(fact.clone());
        }
        for production in productions() {
            late.add_production(production).unwrap();
        }
        prop_assert_eq!(observe(&early), observe(&late));
    }

    #[test]
    fn removing_a_production_leaves_others_untouched(facts in arb_facts()) {
        let mut engine = engine_with(&facts);
        engine.remove_production("siblings").unwrap();

        let mut reference = ReteEngine::new();
        for production in productions().into_iter().filter(|p| p.name != "siblings") {
            reference.add_production(production).unwrap();
        }
        for fact in &facts {
            reference.add_fact(fact.clone());
        }
        prop_assert_eq!(observe(&engine), observe(&reference));
        prop_assert_eq!(engine.stats(), reference.stats());
    }
}
