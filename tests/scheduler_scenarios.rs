// tests/scheduler_scenarios.rs

mod common;
use crate::common::fixtures::{add_one, constant, failing};
use crate::common::{CallLog, init_tracing};

use serde_json::json;

use taskwave::config::{RawSettings, RunSection, Settings};
use taskwave::engine::SchedulerOptions;
use taskwave::{RerunPolicy, Scheduler, TaskError, TaskSpec, TaskwaveError};

/// t1 -> {t2, t3} -> t4, where t3 fails.
fn diamond_with_failure(log: &CallLog) -> Vec<TaskSpec> {
    vec![
        constant(log, "t1", json!(1)).result_path("t1").build().unwrap(),
        add_one(log, "t2", "t1").result_path("t2").build().unwrap(),
        failing(log, "t3", "t3 exploded").after("t1").build().unwrap(),
        constant(log, "t4", json!(4))
            .after_all(["t2", "t3"])
            .result_path("t4")
            .build()
            .unwrap(),
    ]
}

#[test]
fn failure_is_isolated_and_blocks_only_dependents() {
    init_tracing();
    let log = CallLog::new();
    let mut scheduler = Scheduler::new();

    let output = scheduler.run(diamond_with_failure(&log)).unwrap();

    let store = scheduler.store();
    assert_eq!(store.value("t1"), Some(&json!(1)));
    assert_eq!(store.value("t2"), Some(&json!(2)));
    assert_eq!(store.success_count(), 2);

    match store.error("t3") {
        Some(TaskError::Failed(err)) => assert!(err.to_string().contains("t3 exploded")),
        other => panic!("expected t3 failure, got {other:?}"),
    }

    assert!(!store.has_succeeded("t4") && !store.has_failed("t4"));
    assert_eq!(log.count("t4"), 0);
    assert_eq!(output, json!({"t1": 1, "t2": 2}));

    let failed: Vec<_> = scheduler.failed_tasks().iter().map(|s| s.name().to_string()).collect();
    assert_eq!(failed, ["t3"]);
    let blocked: Vec<_> = scheduler.blocked_tasks().iter().map(|s| s.name().to_string()).collect();
    assert_eq!(blocked, ["t4"]);
}

#[test]
fn resubmitting_a_fixed_task_reuses_upstream_results() {
    init_tracing();
    let log = CallLog::new();
    let mut scheduler = Scheduler::new();
    scheduler.run(diamond_with_failure(&log)).unwrap();

    let failed = scheduler.failed_tasks();
    assert_eq!(failed.len(), 1);

    // Same name and dependencies, but now it succeeds.
    let fixed = constant(&log, "t3", json!(3))
        .after(failed[0].dependencies()[0].clone())
        .result_path("t3")
        .build()
        .unwrap();
    let output = scheduler.run(vec![fixed]).unwrap();

    assert_eq!(scheduler.store().value("t3"), Some(&json!(3)));
    assert!(scheduler.failed_tasks().is_empty());
    assert_eq!(log.count("t1"), 1, "t1 must not be re-invoked");
    assert_eq!(output, json!({"t1": 1, "t2": 2, "t3": 3}));

    // t4 was not part of the resubmission and still has not run.
    assert_eq!(log.count("t4"), 0);
}

#[test]
fn cycle_fails_before_anything_runs() {
    let log = CallLog::new();
    let mut scheduler = Scheduler::new();

    let tasks = vec![
        constant(&log, "a", json!(1)).after("b").build().unwrap(),
        constant(&log, "b", json!(2)).after("a").build().unwrap(),
    ];

    let err = scheduler.run(tasks).unwrap_err();
    assert!(matches!(err, TaskwaveError::Cycle(_)));
    assert!(err.is_structural());
    assert!(scheduler.store().is_empty());
    assert!(log.calls().is_empty());
    assert_eq!(scheduler.run_count(), 0);
}

#[test]
fn duplicate_names_fail_before_anything_runs() {
    let log = CallLog::new();
    let mut scheduler = Scheduler::new();

    let tasks = vec![
        constant(&log, "same", json!(1)).build().unwrap(),
        constant(&log, "same", json!(2)).build().unwrap(),
    ];

    match scheduler.run(tasks) {
        Err(TaskwaveError::DuplicateName(name)) => assert_eq!(name, "same"),
        other => panic!("expected DuplicateName, got {other:?}"),
    }
    assert!(log.calls().is_empty());
    assert!(scheduler.store().is_empty());
}

#[test]
fn unknown_dependency_fails_before_anything_runs() {
    let log = CallLog::new();
    let mut scheduler = Scheduler::new();

    let tasks = vec![
        constant(&log, "a", json!(1)).build().unwrap(),
        add_one(&log, "b", "missing").build().unwrap(),
    ];

    match scheduler.run(tasks) {
        Err(TaskwaveError::UnknownDependency { task, dependency }) => {
            assert_eq!(task, "b");
            assert_eq!(dependency, "missing");
        }
        other => panic!("expected UnknownDependency, got {other:?}"),
    }
    assert!(log.calls().is_empty());
}

#[test]
fn rerunning_with_default_policy_reinvokes_every_task() {
    let log = CallLog::new();
    let mut scheduler = Scheduler::new();
    let tasks = || {
        vec![
            constant(&log, "t1", json!(1)).result_path("a.t1").build().unwrap(),
            add_one(&log, "t2", "t1").result_path("a.t2").build().unwrap(),
        ]
    };

    let first = scheduler.run(tasks()).unwrap();
    let second = scheduler.run(tasks()).unwrap();

    assert_eq!(first, json!({"a": {"t1": 1, "t2": 2}}));
    assert_eq!(first, second);
    assert_eq!(log.count("t1"), 2);
    assert_eq!(log.count("t2"), 2);
}

fn skip_succeeded_scheduler() -> Scheduler {
    let settings = Settings::try_from(RawSettings {
        run: RunSection {
            rerun_policy: RerunPolicy::SkipSucceeded,
        },
        ..RawSettings::default()
    })
    .unwrap();
    Scheduler::with_options(SchedulerOptions::from_settings(settings))
}

#[test]
fn skip_succeeded_policy_reuses_recorded_results() {
    let log = CallLog::new();
    let mut scheduler = skip_succeeded_scheduler();
    let tasks = || {
        vec![
            constant(&log, "t1", json!(1)).result_path("a.t1").build().unwrap(),
            add_one(&log, "t2", "t1").result_path("a.t2").build().unwrap(),
        ]
    };

    let first = scheduler.run(tasks()).unwrap();
    let second = scheduler.run(tasks()).unwrap();

    assert_eq!(first, second);
    assert_eq!(log.count("t1"), 1);
    assert_eq!(log.count("t2"), 1);
}

#[test]
fn skipped_task_is_placed_at_its_resubmitted_path() {
    let log = CallLog::new();
    let mut scheduler = skip_succeeded_scheduler();

    let first = scheduler
        .run(vec![constant(&log, "a", json!(1)).result_path("old").build().unwrap()])
        .unwrap();
    assert_eq!(first, json!({"old": 1}));

    let second = scheduler
        .run(vec![constant(&log, "a", json!(1)).result_path("new").build().unwrap()])
        .unwrap();

    assert_eq!(second, json!({"new": 1}));
    assert_eq!(log.count("a"), 1);
}

#[test]
fn blocked_task_drops_result_computed_from_a_failed_upstream() {
    let log = CallLog::new();
    let mut scheduler = Scheduler::new();

    let first = scheduler
        .run(vec![
            constant(&log, "t1", json!(1)).result_path("t1").build().unwrap(),
            add_one(&log, "t2", "t1").result_path("t2").build().unwrap(),
        ])
        .unwrap();
    assert_eq!(first, json!({"t1": 1, "t2": 2}));

    let second = scheduler
        .run(vec![
            failing(&log, "t1", "upstream broke").result_path("t1").build().unwrap(),
            add_one(&log, "t2", "t1").result_path("t2").build().unwrap(),
        ])
        .unwrap();

    assert_eq!(second, json!({}));
    assert!(scheduler.store().has_failed("t1"));
    assert!(!scheduler.store().has_succeeded("t2"));
    assert!(!scheduler.store().has_failed("t2"));
    assert_eq!(log.count("t2"), 1);

    let blocked: Vec<_> = scheduler.blocked_tasks().iter().map(|s| s.name().to_string()).collect();
    assert_eq!(blocked, ["t2"]);
}

#[test]
fn reset_forgets_results_and_allows_a_fresh_run() {
    let log = CallLog::new();
    let mut scheduler = Scheduler::new();
    scheduler.run(diamond_with_failure(&log)).unwrap();
    assert!(!scheduler.store().is_empty());

    scheduler.reset();
    assert!(scheduler.store().is_empty());
    assert!(scheduler.failed_tasks().is_empty());
    assert!(scheduler.blocked_tasks().is_empty());

    // t1's earlier success is gone, so depending on it is an error again.
    let retry = add_one(&log, "t2", "t1").build().unwrap();
    assert!(matches!(
        scheduler.run(vec![retry]),
        Err(TaskwaveError::UnknownDependency { .. })
    ));

    // The worker pool is acquired again on the next run.
    let output = scheduler
        .run(vec![constant(&log, "t1", json!(1)).result_path("t1").build().unwrap()])
        .unwrap();
    assert_eq!(output, json!({"t1": 1}));
}

#[test]
fn dependency_results_are_bound_as_named_arguments() {
    let mut scheduler = Scheduler::new();

    let tasks = vec![
        TaskSpec::blocking(|_inv| Ok("docs"))
            .name("load")
            .build()
            .unwrap(),
        TaskSpec::blocking(|inv| {
            let load: String = inv.get_as("load")?;
            let prefix: String = inv.get_as("prefix")?;
            let suffix: String = inv.arg_as(0)?;
            Ok(format!("{prefix}{load}{suffix}"))
        })
        .name("shape")
        .after("load")
        .arg("!")
        .kwarg("prefix", "> ")
        .result_path("out")
        .build()
        .unwrap(),
        TaskSpec::blocking(|inv| Ok(inv.get_as::<String>("load")?.len()))
            .name("pinned")
            .after("load")
            .override_kwarg("load", "overridden")
            .result_path("len")
            .build()
            .unwrap(),
    ];

    let output = scheduler.run(tasks).unwrap();
    assert_eq!(output, json!({"out": "> docs!", "len": 10}));
}

#[test]
fn plan_reports_waves_without_running() {
    let log = CallLog::new();
    let scheduler = Scheduler::new();

    let waves = scheduler.plan(diamond_with_failure(&log)).unwrap();
    assert_eq!(
        waves,
        vec![
            vec!["t1".to_string()],
            vec!["t2".to_string(), "t3".to_string()],
            vec!["t4".to_string()],
        ]
    );
    assert!(log.calls().is_empty());
}

#[tokio::test]
async fn blocking_entry_point_refuses_to_nest_in_a_runtime() {
    let mut scheduler = Scheduler::new();
    assert!(matches!(
        scheduler.run(Vec::new()),
        Err(TaskwaveError::NestedRuntime)
    ));

    let output = scheduler.run_async(Vec::new()).await.unwrap();
    assert_eq!(output, json!({}));
}
