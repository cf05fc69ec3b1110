mod common;

use std::collections::BTreeSet;

use serde_json::Value;
use sync_patch::json_patch::apply_patch;

use common::fixtures::{load_cases, FixtureCase};

fn replay(case: &FixtureCase) -> Result<(), String> {
    let mut doc = case.original_doc.clone();
    let outcome = apply_patch(&mut doc, &case.operations);

    match (&case.expected_doc, &case.expected_error, outcome) {
        (Some(expected), None, Ok(())) => {
            if &doc == expected {
                Ok(())
            } else {
                Err(format!(
                    "document mismatch\n  got:      {}\n  expected: {}",
                    Value::Object(doc),
                    Value::Object(expected.clone())
                ))
            }
        }
        (None, Some(fragment), Err(err)) => {
            let message = err.to_string();
            if message.contains(fragment.as_str()) {
                Ok(())
            } else {
                Err(format!("error {message:?} does not contain {fragment:?}"))
            }
        }
        (Some(_), None, Err(err)) => Err(format!("unexpected error: {err}")),
        (None, Some(fragment), Ok(())) => Err(format!("expected error containing {fragment:?}, got success")),
        _ => Err("fixture must set exactly one of expectedDoc / expectedError".to_string()),
    }
}

#[test]
fn compat_fixtures_replay() {
    let cases = load_cases("compat_cases.json");
    assert!(!cases.is_empty(), "no fixtures loaded");

    let mut seen = BTreeSet::new();
    let mut failures = Vec::new();
    for case in &cases {
        assert!(seen.insert(case.test_id.clone()), "duplicate testId {}", case.test_id);
        if let Err(reason) = replay(case) {
            failures.push(format!("{}: {reason}", case.test_id));
        }
    }

    assert!(
        failures.is_empty(),
        "{} of {} fixtures failed:\n{}",
        failures.len(),
        cases.len(),
        failures.join("\n")
    );
}

#[test]
fn compat_fixtures_cover_success_and_failure() {
    let cases = load_cases("compat_cases.json");
    let errors = cases.iter().filter(|c| c.expected_error.is_some()).count();
    assert!(errors > 0);
    assert!(errors < cases.len());
}
