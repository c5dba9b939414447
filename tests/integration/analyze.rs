//! End-to-end analysis scenarios through the public pipeline entry.

mod common;

use common::{Canned, Offline};

#[test]
fn branch_pair_with_fallback_cases_reaches_full_coverage() {
    let source = "def f(x):\n    if x > 0:\n        return 1\n    return -1\n";
    let result = funcov::analyze_with(source, Box::new(Offline));

    assert_eq!(result.function_name, "f");

    let tags: Vec<&str> = result.branches_found.iter().map(|b| b.branch_type.as_str()).collect();
    assert_eq!(tags, ["if", "else"]);
    assert_eq!(result.branches_found[0].condition, "x > 0");
    assert_eq!(result.branches_found[0].line, 2);
    assert_eq!(result.branches_found[1].condition, "not (x > 0)");
    assert_eq!(result.branches_found[1].line, 2);

    assert!(!result.dead_code.found);
    assert!(result.dead_code.instances.is_empty());

    assert_eq!(result.test_cases.tuples, ["(0,)", "(10,)", "(-10,)"]);
    assert_eq!(result.test_cases.total, 3);
    assert_eq!(result.test_cases.passed, 3);
    assert_eq!(result.coverage.percentage, 100);
}

#[test]
fn statement_after_return_is_reported_unreachable() {
    let source = "def f():\n    return 1\n    print(\"never\")\n";
    let result = funcov::analyze_with(source, Box::new(Offline));

    assert!(result.dead_code.found);
    assert_eq!(result.dead_code.instances.len(), 1);
    let instance = &result.dead_code.instances[0];
    assert_eq!(instance.line, 3);
    assert_eq!(instance.code, "print(\"never\")");
    assert_eq!(instance.reason, "Unreachable code after return statement");
}

#[test]
fn marker_comment_reports_dead_code_on_a_reachable_line() {
    let source = "def f(x):\n    x = x + 1  # dead code\n    return x\n";
    let result = funcov::analyze_with(source, Box::new(Canned("[(1,)]")));

    assert!(result.dead_code.found);
    assert_eq!(result.dead_code.instances.len(), 1);
    let instance = &result.dead_code.instances[0];
    assert_eq!(instance.line, 2);
    assert_eq!(instance.code, "x = x + 1  # dead code");
    assert_eq!(instance.reason, "Code marked as dead code");

    // The marked line still executes and counts toward coverage.
    assert_eq!(result.coverage.percentage, 100);
    assert!(result.coverage.lines[1].covered);
}

#[test]
fn useless_reply_falls_back_per_parameter_count() {
    let source = "def add(a, b):\n    return a + b\n";
    let result = funcov::analyze_with(source, Box::new(Canned("I cannot produce tuples.")));

    assert_eq!(result.test_cases.tuples, ["(1, 1)", "(-1, -1)", "(1, -1)", "(-1, 1)"]);
    assert_eq!(result.test_cases.passed, 4);
    assert_eq!(result.coverage.percentage, 100);
}

#[test]
fn raised_and_handled_exception_counts_as_a_pass() {
    let source = "def parse_sign(n):\n    try:\n        if n < 0:\n            raise ValueError(\"negative\")\n        return 1\n    except ValueError:\n        return -1\n";
    let result = funcov::analyze_with(source, Box::new(Canned("[(5,), (-5,)]")));

    let tags: Vec<&str> = result.branches_found.iter().map(|b| b.branch_type.as_str()).collect();
    assert_eq!(tags, ["try", "if", "else", "except"]);
    assert_eq!(result.branches_found[3].condition, "ValueError");

    assert_eq!(result.test_cases.passed, 2);
    assert_eq!(result.test_cases.cases[0].actual, "1");
    assert_eq!(result.test_cases.cases[1].actual, "-1");
    assert_eq!(result.coverage.percentage, 100);
}

#[test]
fn loops_appear_in_the_branch_inventory() {
    let source = "def total(n):\n    acc = 0\n    while n > 0:\n        acc = acc + n\n        n = n - 1\n    for i in range(2):\n        acc = acc + i\n    return acc\n";
    let result = funcov::analyze_with(source, Box::new(Canned("[(3,)]")));

    let tags: Vec<&str> = result.branches_found.iter().map(|b| b.branch_type.as_str()).collect();
    assert_eq!(tags, ["loop", "loop"]);
    assert_eq!(result.branches_found[0].condition, "n > 0");
    assert_eq!(result.branches_found[1].condition, "range(2)");

    assert_eq!(result.test_cases.cases[0].actual, "7");
    assert_eq!(result.coverage.percentage, 100);
}

#[test]
fn failing_probe_call_does_not_abort_the_run() {
    let source = "def invert(n):\n    return 10 // n\n";
    let result = funcov::analyze_with(source, Box::new(Canned("[(0,), (5,)]")));

    assert_eq!(result.test_cases.total, 2);
    assert_eq!(result.test_cases.passed, 1);

    let failed = &result.test_cases.cases[0];
    assert!(!failed.passed);
    assert_eq!(failed.input, "invert(0)");
    assert_eq!(failed.expected, "");
    assert_eq!(failed.actual, "Error: division by zero");

    let ok = &result.test_cases.cases[1];
    assert!(ok.passed);
    assert_eq!(ok.actual, "2");

    // The failing call still reached the return line before dying.
    assert_eq!(result.coverage.percentage, 100);
}

#[test]
fn unparseable_argument_fails_only_its_own_call() {
    let source = "def double(n):\n    return n * 2\n";
    let result = funcov::analyze_with(source, Box::new(Canned("try (unknown_var) and (4)")));

    assert_eq!(result.test_cases.total, 2);
    assert_eq!(result.test_cases.passed, 1);
    assert!(!result.test_cases.cases[0].passed);
    assert!(result.test_cases.cases[0].actual.starts_with("Error: "));
    assert_eq!(result.test_cases.cases[1].actual, "8");
}

#[test]
fn unparseable_source_degrades_but_still_reports() {
    // comprehensions are outside the parsed subset, so this source drops
    // to the line-scan tier and the probe module cannot load
    let source =
        "def weird(x):\n    if x > 0:\n        return [v for v in range(x)]\n    return []\n";
    let result = funcov::analyze_with(source, Box::new(Offline));

    assert_eq!(result.function_name, "weird");

    let tags: Vec<&str> = result.branches_found.iter().map(|b| b.branch_type.as_str()).collect();
    assert_eq!(tags, ["if", "else"]);

    assert_eq!(result.test_cases.tuples, ["(0,)", "(10,)", "(-10,)"]);
    assert_eq!(result.test_cases.passed, 0);
    assert_eq!(result.coverage.percentage, 0);
    assert!(result.coverage.lines.iter().all(|l| !l.covered));
    assert!(result.test_cases.cases.iter().all(|c| c.actual.starts_with("Error: ")));
}

#[test]
fn zero_parameter_probes_fail_on_arity_but_pipeline_survives() {
    let source = "def f():\n    return 1\n    print(\"never\")\n";
    let result = funcov::analyze_with(source, Box::new(Offline));

    // The zero-parameter fallback still probes with one argument each,
    // so every call dies on arity before executing the body.
    assert_eq!(result.test_cases.tuples, ["(0,)", "(1,)", "(-1,)"]);
    assert_eq!(result.test_cases.passed, 0);
    assert_eq!(result.coverage.percentage, 0);
}
