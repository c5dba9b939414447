//! Coverage runner: per-case probe execution and reduction to the report
//! shape.
//!
//! The percentage denominator is executable statement lines; the per-line
//! display covers every textual line of the source. The two granularities
//! are intentionally different and must stay that way.

use std::collections::BTreeSet;

use crate::report::{CaseOutcome, CoverageLine, CoverageResults, TestCaseResults};
use crate::sandbox::{ProbeSandbox, ScratchSandbox};
use crate::source::SourceUnit;
use crate::testcases::TestCase;

/// Stage `unit` in a scratch sandbox and run every candidate case.
/// A module-load failure degrades to an all-uncovered report instead of
/// aborting the analysis.
pub fn run(unit: &SourceUnit, cases: &[TestCase]) -> (CoverageResults, TestCaseResults) {
    match ScratchSandbox::create(unit) {
        Ok(mut sandbox) => run_in(unit, cases, &mut sandbox),
        Err(err) => {
            eprintln!("warning: {err}; reporting zero coverage");
            degraded(unit, cases, &err.plain_message())
        }
    }
}

/// Run the cases against any sandbox. Per-call failures are recorded and
/// the loop continues; hit sets are unioned across calls.
pub fn run_in(
    unit: &SourceUnit,
    cases: &[TestCase],
    sandbox: &mut dyn ProbeSandbox,
) -> (CoverageResults, TestCaseResults) {
    let mut hits: BTreeSet<u32> = BTreeSet::new();
    let mut outcomes = Vec::with_capacity(cases.len());
    let mut passed = 0u32;

    for (i, case) in cases.iter().enumerate() {
        let outcome = sandbox.call(&case.args);
        hits.extend(outcome.hits.iter().copied());
        let row = match outcome.result {
            Ok(rendered) => {
                passed += 1;
                CaseOutcome {
                    input: case.call_text(&unit.name),
                    expected: rendered.clone(),
                    actual: rendered,
                    passed: true,
                    description: format!("Probe call {}", i + 1),
                }
            }
            Err(message) => CaseOutcome {
                input: case.call_text(&unit.name),
                expected: String::new(),
                actual: format!("Error: {message}"),
                passed: false,
                description: format!("Probe call {}", i + 1),
            },
        };
        outcomes.push(row);
    }

    let executable = sandbox.executable_lines();
    let covered: BTreeSet<u32> = hits.intersection(executable).copied().collect();
    let percentage = if executable.is_empty() {
        0
    } else {
        (100.0 * covered.len() as f64 / executable.len() as f64).round() as u8
    };
    let lines = unit
        .lines
        .iter()
        .enumerate()
        .map(|(idx, text)| CoverageLine {
            text: text.clone(),
            covered: covered.contains(&(idx as u32 + 1)),
        })
        .collect();

    (
        CoverageResults { percentage, lines },
        TestCaseResults {
            total: cases.len() as u32,
            passed,
            tuples: cases.iter().map(TestCase::to_string).collect(),
            cases: outcomes,
        },
    )
}

fn degraded(
    unit: &SourceUnit,
    cases: &[TestCase],
    reason: &str,
) -> (CoverageResults, TestCaseResults) {
    let lines = unit
        .lines
        .iter()
        .map(|text| CoverageLine { text: text.clone(), covered: false })
        .collect();
    let outcomes = cases
        .iter()
        .enumerate()
        .map(|(i, case)| CaseOutcome {
            input: case.call_text(&unit.name),
            expected: String::new(),
            actual: format!("Error: {reason}"),
            passed: false,
            description: format!("Probe call {}", i + 1),
        })
        .collect();
    (
        CoverageResults { percentage: 0, lines },
        TestCaseResults {
            total: cases.len() as u32,
            passed: 0,
            tuples: cases.iter().map(TestCase::to_string).collect(),
            cases: outcomes,
        },
    )
}
