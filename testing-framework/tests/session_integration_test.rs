// File: testing-framework/tests/session_integration_test.rs
//
// Session Integration Tests
//
// Fixtures, stages and exposed-value assertions driven through the public
// session API.

use parking_lot::Mutex;
use seeded_testing_framework::prelude::*;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn quiet_session(seed: u64) -> TestSession {
    TestSession::with_observer(SessionConfig::with_seed(seed), Arc::new(SilentObserver))
}

#[test]
fn test_matching_exposure_passes() {
    let mut session = quiet_session(42);
    session.expose("x", "n");

    assert!(session.assert_exposed("n", "x", 1));
    assert!(session.failed_assertions().is_empty());
}

#[test]
fn test_mismatching_exposure_records_one_failure() {
    let mut session = quiet_session(42);
    session.expose("x", "n");

    assert!(!session.assert_exposed("n", "y", 1));

    let failures = session.failed_assertions();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].actual, Value::from("x"));
    assert_eq!(failures[0].expected, Value::from("y"));
    assert_eq!(failures[0].seed, 42);
}

#[test]
fn test_never_exposed_is_undefined() {
    let mut session = quiet_session(1);
    assert!(session.assert_exposed("ghost", Value::Undefined, 1));
    assert!(!session.assert_exposed("ghost", Value::Null, 1));
}

#[test]
fn test_run_once_stage_runs_once() {
    let mut session = quiet_session(42);
    let counter = Arc::new(AtomicUsize::new(0));
    let c = counter.clone();
    session
        .set_staging(
            Stage::single("seed database", move |_| {
                c.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
            false,
        )
        .unwrap();

    session.run_stage("seed database").unwrap();
    session.run_stage("seed database").unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    // the assertion loop does not re-run it either
    session.expose(true, "ready");
    assert!(session.assert_exposed("ready", true, 5));
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert!(session.stage("seed database").unwrap().has_run());
}

#[test]
fn test_stage_registration_errors() {
    let mut session = quiet_session(42);
    assert_eq!(
        session.run_stage("missing"),
        Err(StagingError::StageNotFound("missing".to_string()))
    );

    let calls = Arc::new(Mutex::new(Vec::new()));
    let first = calls.clone();
    session
        .set_staging(
            Stage::new("setup", move |_| {
                first.lock().push("original");
                Ok(())
            }),
            false,
        )
        .unwrap();

    let second = calls.clone();
    let replacement = move || {
        let second = second.clone();
        Stage::new("setup", move |_| {
            second.lock().push("replacement");
            Ok(())
        })
    };

    assert_eq!(
        session.set_staging(replacement(), false),
        Err(StagingError::StageExists("setup".to_string()))
    );
    session.set_staging(replacement(), true).unwrap();
    session.run_staging();
    assert_eq!(*calls.lock(), vec!["replacement"]);

    session.remove_stage("setup").unwrap();
    assert!(session.remove_stage("setup").is_err());
}

#[test]
fn test_stage_failure_does_not_stop_pipeline() {
    let mut session = quiet_session(5);
    let exposures = session.exposures();
    session
        .set_staging(Stage::new("flaky", |_| anyhow::bail!("connection refused")), false)
        .unwrap();
    session
        .set_staging(
            Stage::new("respond", move |_| {
                exposures.expose(200i64, "status");
                Ok(())
            })
            .with_order(1),
            false,
        )
        .unwrap();

    // the comparison itself passes, the stage failure still fails the call
    assert!(!session.assert_exposed("status", 200i64, 2));
    let failures = session.failed_assertions();
    assert_eq!(failures.len(), 2);
    assert!(failures.iter().all(|f| f.message.contains("connection refused")));
    assert!(failures.iter().all(|f| f.iteration.is_none()));
    assert_eq!(session.exposed("status"), Value::Int(200));
}

#[test]
fn test_early_mismatch_fails_whole_call() {
    let mut session = quiet_session(6);
    let exposures = session.exposures();
    let mut runs = 0;
    session
        .set_staging(
            Stage::new("warm up", move |_| {
                let body = if runs == 0 { "cold" } else { "warm" };
                runs += 1;
                exposures.expose(body, "cache");
                Ok(())
            }),
            false,
        )
        .unwrap();

    assert!(!session.assert_exposed("cache", "warm", 4));
    let failures = session.failed_assertions();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].iteration, Some(0));
    assert_eq!(failures[0].actual, Value::from("cold"));
}

#[test]
fn test_widest_float_range_resolves() {
    let mut session = quiet_session(42);
    session.set_property("x", RangeGenerator::new(-f64::MAX, f64::MAX).unwrap());
    for _ in 0..50 {
        let value = session.get_inner_actual("x", true).unwrap();
        assert!(value.as_f64().is_some_and(f64::is_finite));
    }
    assert!(RangeGenerator::new(f64::NEG_INFINITY, 0.0).is_err());
}

#[test]
fn test_inferred_fixtures_keep_sample_order() {
    let mut session = quiet_session(12);
    let sample = json!({"zeta": "z", "alpha": 1, "mid": "m"});
    assert!(session.infer_and_create_inner(&sample, None));

    let names: Vec<&str> = session.fixtures().names().collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);

    let objects = session.generate_objects(1).unwrap();
    match &objects[0] {
        Value::Map(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        }
        other => panic!("expected map, got {:?}", other),
    }
}

#[test]
fn test_single_point_range_with_seed_42() {
    let mut session = quiet_session(42);
    session.set_property("one", RangeGenerator::new(1.0, 1.0).unwrap());
    session.set_property("one_int", RangeGenerator::integer(1, 1).unwrap());

    for regenerate in [false, true, false, true] {
        assert_eq!(session.get_inner_actual("one", regenerate).unwrap(), Value::Float(1.0));
        assert_eq!(session.get_inner_actual("one_int", regenerate).unwrap(), Value::Int(1));
    }
}

#[test]
fn test_inverted_range_rejected() {
    assert!(matches!(
        RangeGenerator::new(5.0, 1.0),
        Err(GeneratorError::Construction { .. })
    ));
}

#[test]
fn test_same_seed_reproduces_fixtures() {
    let sample = json!({"error": "timeout", "status": 504, "retry": false});
    let run = |seed| {
        let mut session = quiet_session(seed);
        assert!(session.infer_and_create_inner(&sample, Some("response")));
        session.set_property("flag", BooleanGenerator::new().allow_nullable(true));
        // Debug output keeps NaN sentinels comparable
        format!("{:?}", session.generate_objects(20).unwrap())
    };

    assert_eq!(run(2024), run(2024));
    assert_ne!(run(2024), run(2025));
}

#[test]
fn test_nested_fixture_paths() {
    let mut session = quiet_session(8);
    let mut user = NestedFixture::new();
    user.insert(
        "name".to_string(),
        StringGenerator::new([CharClass::Lower, CharClass::NotEmpty], 6).into(),
    );
    user.insert("age".to_string(), RangeGenerator::integer(18, 99).unwrap().into());
    session.set_nested_property("user", user);

    assert!(session.has_property("user.name"));
    let name = session.get_inner_actual("user.name", false).unwrap();
    assert_eq!(name.as_str().map(str::len), Some(6));
    assert_eq!(
        session.get_inner_actual("user.name.first", false),
        Err(SessionError::NestingTooDeep("user.name.first".to_string()))
    );
    assert!(matches!(
        session.get_inner_actual("account.id", false),
        Err(SessionError::Key(_))
    ));

    assert!(session.remove_property("user").is_some());
    assert!(!session.has_property("user"));
}

#[test]
fn test_include_value_policy() {
    let mut session = quiet_session(3);
    session.set_validation_rules(MatchPolicy::IncludeValue);

    session.expose("request failed: timeout", "log");
    assert!(session.assert_exposed("log", "timeout", 1));

    session.expose(Value::from(json!({"id": 7, "tags": ["a"]})), "body");
    assert!(session.assert_exposed("body", Value::from(json!({"id": 7})), 1));
    assert!(session.assert_exposed("body", "tags", 1));

    session.expose(Value::from(json!([1, 2, 3])), "ids");
    assert!(session.assert_exposed("ids", 2i64, 1));
    assert!(!session.assert_exposed("ids", 4i64, 1));
    assert_eq!(session.failed_assertions().len(), 1);
}

#[test]
fn test_prepared_expectation_with_fixture_deps() {
    let mut session = quiet_session(11);
    session.set_property("price", RangeGenerator::integer(1, 100).unwrap());
    session.set_property("quantity", RangeGenerator::integer(1, 10).unwrap());

    let exposures = session.exposures();
    session
        .set_staging(
            Stage::new("checkout", move |args| {
                let total = args[0].as_i64().unwrap_or(0) * args[1].as_i64().unwrap_or(0);
                exposures.expose(total, "total");
                Ok(())
            })
            .with_dependencies(["price", "quantity"]),
            false,
        )
        .unwrap();

    // any product of the two ranges is within bounds
    let in_bounds = PreparedFunction::new(|args| {
        Ok(Value::Bool(matches!(args[0], Value::Int(1..=1000))))
    });
    session.set_validation_rules(MatchPolicy::EvaluateFunction);
    assert!(session.assert_exposed("total", in_bounds, 50));
}

#[test]
fn test_param_to_test_selects_policy() {
    let mut session = quiet_session(4);
    session.set_property("greeting", StringGenerator::from_pool(["hello world"]));
    session.param_to_test("greeting").unwrap().expect_to_include();

    session.expose("hello world, again", "out");
    assert!(session.assert_exposed("out", Expectation::from_parts("greeting", true), 1));
}

#[test]
fn test_boolean_branch_failures_only_for_failing_branch() {
    let mut session = quiet_session(21);
    let cache_hit = Arc::new(Mutex::new(true));

    let flag = cache_hit.clone();
    session.set_assertion_variable(AssertionVariable::new(
        "cache hit",
        PreparedFunction::new(move |_| Ok(Value::Bool(*flag.lock()))),
    ));
    session
        .set_descriptor_for_variable(
            "cache hit",
            BooleanBranchDescriptor::new(|| true, || false),
        )
        .unwrap();

    assert_eq!(session.assert_automated_variable("cache hit"), Ok(true));
    assert!(!session.has_failures());

    *cache_hit.lock() = false;
    assert_eq!(session.assert_automated_variable("cache hit"), Ok(false));
    let failures = session.failed_assertions();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].message.contains("false branch"));
    assert_eq!(failures[0].seed, 21);
}

#[test]
fn test_report_lists_seed_and_failures() {
    let mut session = quiet_session(0xfeed);
    session.expose(1i64, "n");
    session.assert_exposed("n", 2i64, 3);

    let report = session.report("test_report_lists_seed_and_failures");
    assert_eq!(report.seed, 0xfeed);
    assert_eq!(report.failures.len(), 3);
    assert_eq!(
        report.replay,
        "FIXTURE_TEST_SEED=0x000000000000feed cargo test test_report_lists_seed_and_failures"
    );
}
