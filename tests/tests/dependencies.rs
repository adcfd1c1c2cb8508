//! Dependency ordering, cycles and missing parents.

use oam_tests::prelude::*;

mod ordering {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("parent_before_child")
            .archetype(Archetype::new("B").specialising("A"))
            .archetype(Archetype::new("A"))
            .template(bare_template("T.v1"))
            .expect(|e| e.success().clean().components(&["A", "B"]).root("B"))
    }

    #[test]
    fn test_parent_is_ordered_before_child() {
        scenario().run().unwrap();
    }

    #[test]
    fn test_siblings_break_ties_lexicographically() {
        Scenario::new("siblings")
            .archetypes([
                Archetype::new("base.v1"),
                Archetype::new("z.v1").specialising("base.v1"),
                Archetype::new("m.v1").specialising("base.v1"),
                Archetype::new("a.v1"),
            ])
            .template(bare_template("T.v1"))
            .expect(|e| {
                e.success()
                    .components(&["a.v1", "base.v1", "m.v1", "z.v1"])
                    .root("z.v1")
            })
            .run()
            .unwrap();
    }

    #[test]
    fn test_empty_repository_compiles_to_empty_template() {
        Scenario::new("empty")
            .template(bare_template("T.v1"))
            .expect(|e| e.success().clean().components(&[]).no_root())
            .run()
            .unwrap();
    }
}

mod cycles {
    use super::*;

    #[test]
    fn test_two_node_cycle_is_reported_once() {
        Scenario::new("two_cycle")
            .archetype(Archetype::new("A").specialising("B"))
            .archetype(Archetype::new("B").specialising("A"))
            .template(bare_template("T.v1"))
            .expect(|e| {
                e.failure()
                    .codes(&["OPT705"])
                    .message("OPT705", "A -> B -> A")
            })
            .run()
            .unwrap();
    }

    #[test]
    fn test_cycle_reached_from_outside_is_reported_once() {
        Scenario::new("tail_into_cycle")
            .archetypes([
                Archetype::new("a").specialising("b"),
                Archetype::new("b").specialising("c"),
                Archetype::new("c").specialising("b"),
                Archetype::new("d").specialising("c"),
            ])
            .template(bare_template("T.v1"))
            .expect(|e| e.failure().codes(&["OPT705"]).message("OPT705", "b -> c -> b"))
            .run()
            .unwrap();
    }

    #[test]
    fn test_self_specialisation_is_a_cycle() {
        Scenario::new("self_cycle")
            .archetype(Archetype::new("A").specialising("A"))
            .template(bare_template("T.v1"))
            .expect(|e| e.failure().codes(&["OPT705"]).message("OPT705", "A -> A"))
            .run()
            .unwrap();
    }
}

mod missing_parents {
    use super::*;

    #[test]
    fn test_missing_parent_aborts() {
        Scenario::new("missing_parent")
            .archetype(Archetype::new("child.v1").specialising("missing.v1"))
            .archetype(Archetype::new("other.v1").specialising("gone.v1"))
            .template(bare_template("T.v1"))
            .expect(|e| {
                e.failure()
                    .codes(&["OPT700", "OPT700"])
                    .message("OPT700", "missing parent 'missing.v1' referenced by 'child.v1'")
                    .message("OPT700", "missing parent 'gone.v1' referenced by 'other.v1'")
            })
            .run()
            .unwrap();
    }

    #[test]
    fn test_missing_parent_outside_scope_is_ignored() {
        Scenario::new("out_of_scope")
            .archetype(Archetype::new("wanted.v1"))
            .archetype(Archetype::new("broken.v1").specialising("missing.v1"))
            .template(slot_template(
                "T.v1",
                [observation_slot("at0001", [SlotPattern::exact("wanted.v1")])],
            ))
            .expect(|e| e.success().clean().components(&["wanted.v1"]))
            .run()
            .unwrap();
    }

    #[test]
    fn test_duplicate_ids_abort_as_load_errors() {
        Scenario::new("duplicates")
            .archetype(Archetype::new("A.v1"))
            .archetype(Archetype::new("A.v1").specialising("B.v1"))
            .template(bare_template("T.v1"))
            .expect(|e| e.failure().codes(&["AOM242"]))
            .run()
            .unwrap();
    }
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    /// Forests where archetype `i` may only specialise an earlier archetype.
    fn forest() -> impl Strategy<Value = Vec<Archetype>> {
        prop::collection::vec(any::<prop::sample::Index>(), 1..16).prop_map(|picks| {
            picks
                .iter()
                .enumerate()
                .map(|(i, pick)| {
                    let archetype = Archetype::new(format!("arch.{:02}", i));
                    if i == 0 || pick.index(2) == 0 {
                        archetype
                    } else {
                        archetype.specialising(format!("arch.{:02}", pick.index(i)))
                    }
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_components_do_not_depend_on_load_order(
            (archetypes, shuffled) in forest().prop_flat_map(|a| (Just(a.clone()), Just(a).prop_shuffle()))
        ) {
            let first = Scenario::new("ordered")
                .archetypes(archetypes)
                .template(bare_template("T.v1"))
                .expect(|e| e.success())
                .run()
                .unwrap();
            let second = Scenario::new("shuffled")
                .archetypes(shuffled)
                .template(bare_template("T.v1"))
                .expect(|e| e.success())
                .run()
                .unwrap();

            prop_assert_eq!(first.opt, second.opt);
        }
    }
}
