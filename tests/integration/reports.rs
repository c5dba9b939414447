//! Snapshot tests for the rendered report and the suggestion prompt.
//!
//! Uses insta inline snapshots. Run `cargo insta review` after intended
//! changes to the output shape.

mod common;

use common::{Canned, Offline};
use insta::assert_snapshot;

use funcov::branches;
use funcov::source::SourceUnit;
use funcov::testcases;

#[test]
fn full_report_for_a_covered_function() {
    let source = "def clamp(x):\n    if x > 10:\n        return 10\n    return x\n";
    let result = funcov::analyze_with(source, Box::new(Canned("[(5,), (99,)]")));

    assert_snapshot!(result.to_json().unwrap(), @r#"
{
  "functionName": "clamp",
  "testCases": {
    "total": 2,
    "passed": 2,
    "tuples": [
      "(5,)",
      "(99,)"
    ],
    "cases": [
      {
        "input": "clamp(5)",
        "expected": "5",
        "actual": "5",
        "passed": true,
        "description": "Probe call 1"
      },
      {
        "input": "clamp(99)",
        "expected": "10",
        "actual": "10",
        "passed": true,
        "description": "Probe call 2"
      }
    ]
  },
  "coverage": {
    "percentage": 100,
    "lines": [
      {
        "text": "def clamp(x):",
        "covered": false
      },
      {
        "text": "    if x > 10:",
        "covered": true
      },
      {
        "text": "        return 10",
        "covered": true
      },
      {
        "text": "    return x",
        "covered": true
      },
      {
        "text": "",
        "covered": false
      }
    ]
  },
  "deadCode": {
    "found": false,
    "instances": []
  },
  "branchesFound": [
    {
      "type": "if",
      "condition": "x > 10",
      "description": "Branch when x > 10 is true",
      "line": 2
    },
    {
      "type": "else",
      "condition": "not (x > 10)",
      "description": "Branch when x > 10 is false",
      "line": 2
    }
  ]
}
"#);
}

#[test]
fn full_report_when_every_probe_fails() {
    let source = "def f():\n    return 1\n    print(\"never\")\n";
    let result = funcov::analyze_with(source, Box::new(Offline));

    assert_snapshot!(result.to_json().unwrap(), @r#"
{
  "functionName": "f",
  "testCases": {
    "total": 3,
    "passed": 0,
    "tuples": [
      "(0,)",
      "(1,)",
      "(-1,)"
    ],
    "cases": [
      {
        "input": "f(0)",
        "expected": "",
        "actual": "Error: f() takes 0 positional arguments but 1 were given",
        "passed": false,
        "description": "Probe call 1"
      },
      {
        "input": "f(1)",
        "expected": "",
        "actual": "Error: f() takes 0 positional arguments but 1 were given",
        "passed": false,
        "description": "Probe call 2"
      },
      {
        "input": "f(-1)",
        "expected": "",
        "actual": "Error: f() takes 0 positional arguments but 1 were given",
        "passed": false,
        "description": "Probe call 3"
      }
    ]
  },
  "coverage": {
    "percentage": 0,
    "lines": [
      {
        "text": "def f():",
        "covered": false
      },
      {
        "text": "    return 1",
        "covered": false
      },
      {
        "text": "    print(\"never\")",
        "covered": false
      },
      {
        "text": "",
        "covered": false
      }
    ]
  },
  "deadCode": {
    "found": true,
    "instances": [
      {
        "line": 3,
        "code": "print(\"never\")",
        "reason": "Unreachable code after return statement"
      }
    ]
  },
  "branchesFound": []
}
"#);
}

#[test]
fn prompt_lists_source_signature_and_branches() {
    let unit = SourceUnit::from_source("def clamp(x):\n    if x > 10:\n        return 10\n    return x\n");
    let found = branches::extract_branches(&unit);
    let prompt = testcases::build_prompt(&unit, &found);

    assert_snapshot!(prompt, @r#"
Generate test inputs for this Python function:

def clamp(x):
    if x > 10:
        return 10
    return x

The function `clamp` takes parameters: x.
Branches to cover:
- line 2: Branch when x > 10 is true
- line 2: Branch when x > 10 is false

Reply with one Python list of argument tuples, one tuple per call, like [(0,), (10,)]. Reply with the list only.
"#);
}

#[test]
fn tuple_line_renders_like_a_python_list() {
    let source = "def f(x):\n    return x\n";
    let result = funcov::analyze_with(source, Box::new(Offline));
    assert_snapshot!(format!("[{}]", result.test_cases.tuples.join(", ")), @"[(0,), (10,), (-10,)]");
}
