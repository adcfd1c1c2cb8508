//! Archetype slot resolution.

use oam_tests::prelude::*;

mod unmatched {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("exact_slot_without_match")
            .archetype(Archetype::new("Y.v1"))
            .template(slot_template(
                "T.v1",
                [observation_slot("at0001", [SlotPattern::exact("X.v1")])],
            ))
            .expect(|e| {
                e.failure()
                    .codes(&["OPT720"])
                    .issue_at("OPT720", "/content[at0001]")
                    .message("OPT720", "\"X.v1\"")
            })
    }

    #[test]
    fn test_unmatched_exact_slot_reports_opt720() {
        scenario().run().unwrap();
    }

    #[test]
    fn test_every_unmatched_slot_is_reported() {
        Scenario::new("two_unmatched")
            .archetype(Archetype::new("Y.v1"))
            .template(slot_template(
                "T.v1",
                [
                    observation_slot("at0001", [SlotPattern::exact("X.v1")]),
                    observation_slot("at0002", [SlotPattern::regex(r"Z\..*")]),
                ],
            ))
            .expect(|e| {
                e.failure()
                    .codes(&["OPT720", "OPT720"])
                    .issue_at("OPT720", "/content[at0001]")
                    .issue_at("OPT720", "/content[at0002]")
            })
            .run()
            .unwrap();
    }
}

mod regex_patterns {
    use super::*;

    #[test]
    fn test_partial_match_never_selects() {
        Scenario::new("partial_match")
            .archetype(Archetype::new("openEHR-EHR-OBSERVATION.blood_pressure.v1"))
            .template(slot_template(
                "T.v1",
                [observation_slot("at0001", [SlotPattern::regex("blood_pressure")])],
            ))
            .expect(|e| e.failure().codes(&["OPT720"]))
            .run()
            .unwrap();
    }

    #[test]
    fn test_full_match_selects() {
        Scenario::new("full_match")
            .archetype(Archetype::new("openEHR-EHR-OBSERVATION.blood_pressure.v1"))
            .template(slot_template(
                "T.v1",
                [observation_slot(
                    "at0001",
                    [SlotPattern::regex(r"openEHR-EHR-OBSERVATION\.blood_pressure\.v[0-9]+")],
                )],
            ))
            .expect(|e| {
                e.success()
                    .clean()
                    .components(&["openEHR-EHR-OBSERVATION.blood_pressure.v1"])
            })
            .run()
            .unwrap();
    }

    #[test]
    fn test_malformed_regex_matches_nothing() {
        Scenario::new("malformed")
            .archetype(Archetype::new("A.v1"))
            .template(slot_template(
                "T.v1",
                [observation_slot(
                    "at0001",
                    [SlotPattern::regex("(A.v1"), SlotPattern::regex("X)|(?:.*")],
                )],
            ))
            .expect(|e| {
                e.failure()
                    .codes(&["OPT720"])
                    .message("OPT720", "/(A.v1/")
                    .message("OPT720", "/X)|(?:.*/")
            })
            .run()
            .unwrap();
    }
}

mod selection {
    use super::*;

    #[test]
    fn test_smallest_candidate_is_selected() {
        Scenario::new("smallest")
            .archetypes([
                Archetype::new("obs.c.v1"),
                Archetype::new("obs.a.v1"),
                Archetype::new("obs.b.v1"),
            ])
            .template(slot_template(
                "T.v1",
                [observation_slot("at0001", [SlotPattern::regex(r"obs\..*")])],
            ))
            .expect(|e| e.success().components(&["obs.a.v1"]).root("obs.a.v1"))
            .run()
            .unwrap();
    }

    #[test]
    fn test_excluded_candidates_are_skipped() {
        let slot = observation_slot("at0001", [SlotPattern::regex(r"obs\..*")])
            .exclude(SlotPattern::exact("obs.a.v1"));
        Scenario::new("exclusion")
            .archetypes([Archetype::new("obs.a.v1"), Archetype::new("obs.b.v1")])
            .template(slot_template("T.v1", [slot]))
            .expect(|e| e.success().components(&["obs.b.v1"]))
            .run()
            .unwrap();
    }

    #[test]
    fn test_selection_pulls_in_parent_chain() {
        Scenario::new("parent_chain")
            .archetypes([
                Archetype::new("obs.base.v1"),
                Archetype::new("obs.mid.v1").specialising("obs.base.v1"),
                Archetype::new("obs.leaf.v1").specialising("obs.mid.v1"),
                Archetype::new("unrelated.v1"),
            ])
            .template(slot_template(
                "T.v1",
                [observation_slot("at0001", [SlotPattern::exact("obs.leaf.v1")])],
            ))
            .expect(|e| {
                e.success()
                    .components(&["obs.base.v1", "obs.mid.v1", "obs.leaf.v1"])
                    .root("obs.leaf.v1")
            })
            .run()
            .unwrap();
    }

    #[test]
    fn test_strict_config_compiles_nothing_without_selection() {
        Scenario::new("strict")
            .archetype(Archetype::new("A.v1"))
            .template(bare_template("T.v1"))
            .config(CompilerConfig::strict())
            .expect(|e| e.success().components(&[]).no_root())
            .run()
            .unwrap();
    }
}
