// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use serde_yaml::{Mapping, Value};

use crate::backends::stub::{journal, Behavior, Journal, StubFactory};
use crate::config::SuiteConfig;
use crate::engine::{FactoryMap, Performer, Pipeline, Stage, UnitPath};
use crate::errors::{ResolveError, RunError};
use crate::model::{Finding, Severity};

/// Integration tests for performers and the pipeline using stub units
#[cfg(test)]
mod tests {
    use super::*;

    fn suite(yaml: &str) -> SuiteConfig {
        SuiteConfig::from_yaml("test", yaml).unwrap()
    }

    fn options(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn factories(entries: Vec<(Stage, &str, StubFactory)>) -> Arc<FactoryMap> {
        let mut map = FactoryMap::new();
        for (stage, path, factory) in entries {
            map.register(stage, path, factory);
        }
        Arc::new(map)
    }

    fn entries(journal: &Journal) -> Vec<String> {
        journal.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_scheduled_unit_runs_exactly_once_in_same_pass() {
        let journal = journal();
        let map = factories(vec![
            (
                Stage::Reporting,
                "r",
                StubFactory::new("r")
                    .journal(&journal)
                    .behavior(Behavior::Schedule(vec![(UnitPath::flat("s"), Mapping::new())])),
            ),
            (Stage::Reporting, "s", StubFactory::new("s").journal(&journal)),
        ]);
        let mut performer = Performer::new(Stage::Reporting, &suite("reporters:\n  r: {}\n"), map);
        performer.prepare().unwrap();
        assert_eq!(performer.order(), vec!["r"]);

        let summary = performer.perform().await.unwrap();

        assert_eq!(performer.order(), vec!["r", "s"]);
        assert_eq!(entries(&journal), vec!["r", "s"]);
        assert_eq!(summary.executed, vec!["r", "s"]);
        assert_eq!(summary.scheduled, vec!["s"]);
        assert!(performer.config().contains(&UnitPath::flat("s")));
    }

    #[tokio::test]
    async fn test_scheduling_an_existing_key_is_a_noop() {
        let journal = journal();
        let map = factories(vec![
            (
                Stage::Reporting,
                "r",
                StubFactory::new("r").journal(&journal).behavior(Behavior::Schedule(vec![
                    (UnitPath::flat("s"), Mapping::new()),
                    (UnitPath::flat("s"), Mapping::new()),
                    (UnitPath::flat("r"), Mapping::new()),
                ])),
            ),
            (Stage::Reporting, "s", StubFactory::new("s").journal(&journal)),
        ]);
        let mut performer = Performer::new(
            Stage::Reporting,
            &suite("reporters:\n  s: {}\n  r: {}\n"),
            map,
        );
        performer.prepare().unwrap();

        let summary = performer.perform().await.unwrap();

        assert_eq!(entries(&journal), vec!["s", "r"]);
        assert!(summary.scheduled.is_empty());
        assert_eq!(performer.registry().len(), 2);
        assert!(!performer
            .schedule_unit(&UnitPath::flat("s"), Mapping::new())
            .unwrap());
    }

    #[tokio::test]
    async fn test_scheduled_unit_runs_after_its_dependencies() {
        // `late` requires `tail`, which is configured after the scheduler.
        let journal = journal();
        let map = factories(vec![
            (
                Stage::Processing,
                "head",
                StubFactory::new("head")
                    .journal(&journal)
                    .behavior(Behavior::Schedule(vec![(UnitPath::flat("late"), Mapping::new())])),
            ),
            (Stage::Processing, "tail", StubFactory::new("tail").journal(&journal)),
            (
                Stage::Processing,
                "late",
                StubFactory::new("late").journal(&journal).depends_on(&["tail"]),
            ),
            (
                Stage::Processing,
                "last",
                StubFactory::new("last").journal(&journal).run_after(&["late"]),
            ),
        ]);
        let mut performer = Performer::new(
            Stage::Processing,
            &suite("processing:\n  head: {}\n  last: {}\n  tail: {}\n"),
            map,
        );
        performer.prepare().unwrap();
        assert_eq!(performer.order(), vec!["head", "last", "tail"]);

        performer.perform().await.unwrap();

        // `last` is re-ordered behind `late` because it had not run yet.
        assert_eq!(entries(&journal), vec!["head", "tail", "late", "last"]);
        assert_eq!(performer.order(), vec!["head", "tail", "late", "last"]);
    }

    #[tokio::test]
    async fn test_already_performed_units_are_never_rerun() {
        let journal = journal();
        let map = factories(vec![
            // `a` must follow `c`, but `a` has already run when `c` arrives
            (
                Stage::Processing,
                "a",
                StubFactory::new("a").journal(&journal).run_after(&["c"]),
            ),
            (
                Stage::Processing,
                "b",
                StubFactory::new("b")
                    .journal(&journal)
                    .behavior(Behavior::Schedule(vec![(UnitPath::flat("c"), Mapping::new())])),
            ),
            (Stage::Processing, "c", StubFactory::new("c").journal(&journal)),
        ]);
        let mut performer = Performer::new(
            Stage::Processing,
            &suite("processing:\n  a: {}\n  b: {}\n"),
            map,
        );
        performer.prepare().unwrap();

        performer.perform().await.unwrap();

        assert_eq!(entries(&journal), vec!["a", "b", "c"]);
        assert_eq!(performer.order(), vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_failing_unit_does_not_block_later_units() {
        let journal = journal();
        let map = factories(vec![
            (
                Stage::Processing,
                "broken",
                StubFactory::new("broken").journal(&journal).behavior(Behavior::Fail),
            ),
            (
                Stage::Processing,
                "after",
                StubFactory::new("after").journal(&journal).run_after(&["broken"]),
            ),
        ]);
        let mut performer = Performer::new(
            Stage::Processing,
            &suite("processing:\n  after: {}\n  broken: {}\n"),
            map,
        );
        performer.prepare().unwrap();

        let summary = performer.perform().await.unwrap();

        assert_eq!(entries(&journal), vec!["broken", "after"]);
        assert_eq!(summary.failed, vec!["broken"]);
        let errors = performer.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors["broken"][0].message.contains("failed on purpose"));
    }

    #[test]
    fn test_missing_required_dependency_is_fatal() {
        let map = factories(vec![(
            Stage::Processing,
            "x",
            StubFactory::new("x").depends_on(&["y"]),
        )]);
        let mut performer = Performer::new(Stage::Processing, &suite("processing:\n  x: {}\n"), map);

        let error = performer.prepare().unwrap_err();
        assert_eq!(error.to_string(), "missing dependency y required by x");
        assert_eq!(performer.order(), vec!["x"]);
    }

    #[test]
    fn test_cycle_is_fatal() {
        let map = factories(vec![
            (Stage::Reporting, "p", StubFactory::new("p").depends_on(&["q"])),
            (Stage::Reporting, "q", StubFactory::new("q").depends_on(&["p"])),
        ]);
        let mut performer = Performer::new(
            Stage::Reporting,
            &suite("reporters:\n  p: {}\n  q: {}\n"),
            map,
        );

        match performer.prepare() {
            Err(ResolveError::CircularDependency { cycle, .. }) => {
                assert!(cycle.contains(&"p".to_string()));
                assert!(cycle.contains(&"q".to_string()));
            }
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unresolvable_schedule_is_rolled_back() {
        let journal = journal();
        let map = factories(vec![
            (
                Stage::Processing,
                "a",
                StubFactory::new("a")
                    .journal(&journal)
                    .behavior(Behavior::Schedule(vec![(UnitPath::flat("needy"), Mapping::new())])),
            ),
            (Stage::Processing, "b", StubFactory::new("b").journal(&journal)),
            (
                Stage::Processing,
                "needy",
                StubFactory::new("needy").depends_on(&["absent"]),
            ),
        ]);
        let mut performer = Performer::new(
            Stage::Processing,
            &suite("processing:\n  a: {}\n  b: {}\n"),
            map,
        );
        performer.prepare().unwrap();

        let result = performer.perform().await;

        assert!(matches!(result, Err(ResolveError::MissingDependency { .. })));
        assert_eq!(performer.order(), vec!["a", "b"]);
        assert!(!performer.config().contains(&UnitPath::flat("needy")));
        assert_eq!(entries(&journal), vec!["a"]);
    }

    #[tokio::test]
    async fn test_schedule_creating_a_cycle_is_rolled_back() {
        let journal = journal();
        let map = factories(vec![
            (
                Stage::Processing,
                "a",
                StubFactory::new("a")
                    .journal(&journal)
                    .behavior(Behavior::Schedule(vec![(UnitPath::flat("loop"), Mapping::new())])),
            ),
            (
                Stage::Processing,
                "b",
                StubFactory::new("b").journal(&journal).run_after(&["loop"]),
            ),
            (
                Stage::Processing,
                "loop",
                StubFactory::new("loop").journal(&journal).depends_on(&["b"]),
            ),
        ]);
        let mut performer = Performer::new(
            Stage::Processing,
            &suite("processing:\n  a: {}\n  b: {}\n"),
            map,
        );
        performer.prepare().unwrap();

        let result = performer.perform().await;

        match result {
            Err(ResolveError::CircularDependency { cycle, .. }) => {
                assert!(cycle.contains(&"b".to_string()));
                assert!(cycle.contains(&"loop".to_string()));
            }
            other => panic!("expected cycle, got {:?}", other),
        }
        assert_eq!(performer.order(), vec!["a", "b"]);
        assert!(!performer.config().contains(&UnitPath::flat("loop")));
        assert!(!performer.is_performed("b"));
        assert_eq!(entries(&journal), vec!["a"]);
    }

    #[tokio::test]
    async fn test_rescheduled_unit_drops_its_prepare_error() {
        let journal = journal();
        let map = factories(vec![
            (
                Stage::Reporting,
                "r",
                StubFactory::new("r").journal(&journal).behavior(Behavior::Schedule(vec![(
                    UnitPath::flat("s"),
                    options("file: s.json"),
                )])),
            ),
            (
                Stage::Reporting,
                "s",
                StubFactory::new("s").journal(&journal).require_option("file"),
            ),
        ]);
        let mut performer = Performer::new(
            Stage::Reporting,
            &suite("reporters:\n  r: {}\n  s: {}\n"),
            map,
        );
        performer.prepare().unwrap();
        assert!(performer.errors()["s"][0].message.contains("configuration rejected"));

        let summary = performer.perform().await.unwrap();

        assert_eq!(summary.executed, vec!["r", "s"]);
        assert!(summary.failed.is_empty());
        assert!(performer.errors().is_empty());
        assert_eq!(entries(&journal), vec!["r", "s"]);
    }

    #[tokio::test]
    async fn test_scheduled_unit_gets_merged_config() {
        let map = factories(vec![
            (
                Stage::Reporting,
                "r",
                StubFactory::new("r").behavior(Behavior::Schedule(vec![(
                    UnitPath::flat("s"),
                    options("severity: high\nfile: s.json"),
                )])),
            ),
            (Stage::Reporting, "s", StubFactory::new("s").require_option("file")),
        ]);
        let mut performer = Performer::new(
            Stage::Reporting,
            &suite("general:\n  reporters:\n    severity: low\n    team: blue\nreporters:\n  r: {}\n"),
            map,
        );
        performer.prepare().unwrap();
        performer.perform().await.unwrap();

        let merged = performer.unit_meta(&UnitPath::flat("s"), "options", Value::Null);
        assert_eq!(merged["severity"], Value::from("high"));
        assert_eq!(merged["team"], Value::from("blue"));
        assert_eq!(merged["file"], Value::from("s.json"));
    }

    #[tokio::test]
    async fn test_build_failure_is_isolated() {
        let journal = journal();
        let map = factories(vec![
            (
                Stage::Scanning,
                "dast.zap",
                StubFactory::new("zap").journal(&journal).fail_build(),
            ),
            (Stage::Scanning, "dast.nikto", StubFactory::new("nikto").journal(&journal)),
        ]);
        let mut performer = Performer::new(
            Stage::Scanning,
            &suite("scanners:\n  dast:\n    zap:\n    nikto: {}\n"),
            map,
        );
        performer.prepare().unwrap();
        performer.perform().await.unwrap();

        assert_eq!(entries(&journal), vec!["nikto"]);
        assert!(performer.errors()["dast.zap"][0].message.contains("cannot be built"));
    }

    #[tokio::test]
    async fn test_collect_aggregates_results_and_errors() {
        let mut emitted = Finding::new("XSS", Severity::High, "zap");
        emitted.endpoints = vec!["/".to_string()];
        let map = factories(vec![
            (
                Stage::Scanning,
                "dast.zap",
                StubFactory::new("zap").behavior(Behavior::Emit(vec![emitted.clone()])),
            ),
            (
                Stage::Scanning,
                "sast.semgrep",
                StubFactory::new("semgrep").behavior(Behavior::Fail),
            ),
            (Stage::Processing, "counter", StubFactory::new("counter")),
        ]);
        let config = suite(
            "scanners:\n  dast:\n    zap: {}\n  sast:\n    semgrep: {}\nprocessing:\n  counter: {}\n",
        );

        let mut scanning = Performer::new(Stage::Scanning, &config, map.clone());
        scanning.prepare().unwrap();
        scanning.perform().await.unwrap();

        let mut processing = Performer::new(Stage::Processing, &config, map);
        processing.prepare().unwrap();
        processing.collect(&scanning);
        processing.perform().await.unwrap();

        assert_eq!(processing.results(), vec![emitted]);
        assert_eq!(
            processing.unit_meta(&UnitPath::flat("counter"), "seen", Value::Null),
            Value::from(1u64)
        );
        assert!(processing.errors().contains_key("sast.semgrep"));
    }

    #[tokio::test]
    async fn test_pipeline_notifies_reporters_of_scanning() {
        let journal = journal();
        let map = factories(vec![
            (Stage::Scanning, "dast.zap", StubFactory::new("zap").journal(&journal)),
            (Stage::Reporting, "console", StubFactory::new("console").journal(&journal)),
        ]);
        let config = suite("scanners:\n  dast:\n    zap: {}\nreporters:\n  console: {}\n");

        let mut pipeline = Pipeline::new(&config, map).unwrap();
        let report = pipeline.run().await.unwrap();

        assert_eq!(
            entries(&journal),
            vec![
                "console:on_start",
                "console:on_unit_start(dast.zap)",
                "zap",
                "console:on_unit_finish(dast.zap)",
                "console:on_finish",
                "console",
            ]
        );
        assert_eq!(report.summaries.len(), 3);
        assert!(report.summary(Stage::Processing).unwrap().executed.is_empty());
    }

    #[tokio::test]
    async fn test_failing_reporter_hooks_are_isolated() {
        let journal = journal();
        let map = factories(vec![
            (Stage::Scanning, "dast.zap", StubFactory::new("zap").journal(&journal)),
            (
                Stage::Reporting,
                "noisy",
                StubFactory::new("noisy").journal(&journal).fail_hooks(),
            ),
            (Stage::Reporting, "quiet", StubFactory::new("quiet").journal(&journal)),
        ]);
        let config = suite("scanners:\n  dast:\n    zap: {}\nreporters:\n  noisy: {}\n  quiet: {}\n");

        let mut pipeline = Pipeline::new(&config, map).unwrap();
        let report = pipeline.run().await.unwrap();

        let log = entries(&journal);
        assert!(log.contains(&"quiet:on_finish".to_string()));
        assert!(log.contains(&"zap".to_string()));
        assert_eq!(report.errors["noisy"].len(), 4);
    }

    #[tokio::test]
    async fn test_pipeline_aborts_on_fatal_stage_error() {
        let journal = journal();
        let map = factories(vec![
            (Stage::Scanning, "dast.zap", StubFactory::new("zap").journal(&journal)),
            (
                Stage::Processing,
                "needy",
                StubFactory::new("needy").depends_on(&["absent"]),
            ),
            (Stage::Reporting, "console", StubFactory::new("console").journal(&journal)),
        ]);
        let config = suite(
            "scanners:\n  dast:\n    zap: {}\nprocessing:\n  needy: {}\nreporters:\n  console: {}\n",
        );

        let mut pipeline = Pipeline::new(&config, map).unwrap();
        let result = pipeline.run().await;

        assert!(matches!(
            result,
            Err(RunError::Stage {
                stage: Stage::Processing,
                ..
            })
        ));
        // Resolution happens during prepare, before any unit runs
        assert!(entries(&journal).is_empty());
    }
}
