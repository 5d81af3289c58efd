// Property-based contract tests
//
// Random builder call sequences and random chains, checked against the
// invariants the rest of the crate relies on.

use proptest::prelude::*;
use sbolq_core::query::{vocab, Presence};
use sbolq_core::{compile, pretty, reconstruct, Edge, Query};

/// One builder call
#[derive(Debug, Clone)]
enum Step {
    Attribute(String),
    OptionalAttribute(String),
    Linked(String),
    Name,
    Description,
    Sequence,
    TypeLabel(String),
    Category(String),
    Keyword(String),
    Limit(usize),
    Distinct(bool),
}

fn arb_field() -> impl Strategy<Value = String> {
    "[a-z][A-Za-z0-9_]{0,8}"
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        arb_field().prop_map(Step::Attribute),
        arb_field().prop_map(Step::OptionalAttribute),
        arb_field().prop_map(Step::Linked),
        Just(Step::Name),
        Just(Step::Description),
        Just(Step::Sequence),
        "[ -~]{0,12}".prop_map(Step::TypeLabel),
        "[a-z]{1,10}".prop_map(Step::Category),
        "[ -~]{0,12}".prop_map(Step::Keyword),
        (0usize..500).prop_map(Step::Limit),
        any::<bool>().prop_map(Step::Distinct),
    ]
}

fn apply(query: &mut Query, step: &Step) {
    // Rejected duplicates leave the query unchanged; that is part of the property.
    let _ = match step {
        Step::Attribute(f) => query.add_attribute(vocab::sbol::name(), f).map(|_| ()),
        Step::OptionalAttribute(f) => query.add_optional_attribute(vocab::sbol::description(), f).map(|_| ()),
        Step::Linked(f) => query
            .add_linked_attribute(vocab::sbol::dna_sequence(), vocab::sbol::nucleotides(), f, Presence::Optional)
            .map(|_| ()),
        Step::Name => query.add_name().map(|_| ()),
        Step::Description => query.add_description().map(|_| ()),
        Step::Sequence => query.add_sequence().map(|_| ()),
        Step::TypeLabel(label) => {
            query.add_type_by_label(label);
            Ok(())
        }
        Step::Category(c) => query.add_registry_type(c),
        Step::Keyword(k) => {
            query.add_keyword_filter(k);
            Ok(())
        }
        Step::Limit(n) => {
            query.set_limit(Some(*n));
            Ok(())
        }
        Step::Distinct(d) => {
            query.set_distinct(*d);
            Ok(())
        }
    };
}

/// A random chain of distinct part names, in chain order
fn arb_chain() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[A-Z][0-9]{1,4}", 2..12).prop_flat_map(|set| {
        let parts: Vec<String> = set.into_iter().collect();
        Just(parts).prop_shuffle()
    })
}

/// A chain plus its adjacency edges in arbitrary order
fn arb_shuffled_edges() -> impl Strategy<Value = (Vec<String>, Vec<Edge>)> {
    arb_chain().prop_flat_map(|chain| {
        let edges: Vec<Edge> = chain
            .windows(2)
            .map(|w| Edge::new(w[0].clone(), w[1].clone()))
            .collect();
        (Just(chain), Just(edges).prop_shuffle())
    })
}

proptest! {
    #[test]
    fn prop_projections_are_bound(steps in prop::collection::vec(arb_step(), 0..20)) {
        let mut query = Query::new_query();
        for step in &steps {
            apply(&mut query, step);
        }
        prop_assert!(query.unbound_variables().is_empty(), "unbound: {:?}", query.unbound_variables());

        let mut names: Vec<&str> = query.projections().iter().map(|v| v.name()).collect();
        let total = names.len();
        names.sort();
        names.dedup();
        prop_assert_eq!(names.len(), total, "duplicate projection");
    }

    #[test]
    fn prop_compile_is_deterministic(steps in prop::collection::vec(arb_step(), 0..20)) {
        let mut query = Query::new_query();
        for step in &steps {
            apply(&mut query, step);
        }
        let first = compile(&query);
        prop_assert_eq!(&first, &compile(&query));
        prop_assert_eq!(&first, &query.clone().compile());

        let once = pretty(&first);
        prop_assert_eq!(pretty(&once), once);
    }

    #[test]
    fn prop_reconstruct_any_order((chain, edges) in arb_shuffled_edges()) {
        prop_assert_eq!(reconstruct(&edges).unwrap(), chain);
    }

    #[test]
    fn prop_two_chains_are_malformed(chain in arb_chain(), split in 1usize..10) {
        prop_assume!(chain.len() >= 4);
        let split = 1 + split % (chain.len() - 2);
        let edges: Vec<Edge> = chain[..split]
            .windows(2)
            .chain(chain[split..].windows(2))
            .map(|w| Edge::new(w[0].clone(), w[1].clone()))
            .chain(std::iter::once(Edge::new(chain[0].clone(), chain[0].clone() + "x")))
            .collect();

        prop_assert!(reconstruct(&edges).is_err());
    }
}
