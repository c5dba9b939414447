//! CLI behavior: argument handling, credential handling, output shape.

mod common;

use common::funcov;

#[test]
fn missing_argument_prints_usage() {
    let output = funcov().output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "expected usage text, got: {stderr}");
}

#[test]
fn missing_credential_fails_before_any_analysis() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("f.py");
    std::fs::write(&path, "def f(x):\n    return x\n").unwrap();

    let output = funcov()
        .arg(&path)
        .env_remove("OPENAI_API_KEY")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("OPENAI_API_KEY is not set"),
        "expected credential error, got: {stderr}"
    );
    assert!(output.stdout.is_empty());
}

#[test]
fn unreadable_file_is_fatal() {
    let output = funcov()
        .arg("no/such/file.py")
        .env("OPENAI_API_KEY", "sk-test")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error [no/such/file.py]"), "got: {stderr}");
}

#[test]
fn unreachable_endpoint_degrades_to_fallback_cases() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("f.py");
    std::fs::write(&path, "def f(x):\n    if x > 0:\n        return 1\n    return -1\n").unwrap();

    let output = funcov()
        .arg(&path)
        .env("OPENAI_API_KEY", "sk-test")
        .env("FUNCOV_ENDPOINT", "http://127.0.0.1:9/v1")
        .env("FUNCOV_TIMEOUT", "2")
        .output()
        .unwrap();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "stderr: {stderr}");
    assert!(stderr.contains("warning: suggestion request failed"), "got: {stderr}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("[(0,), (10,), (-10,)]"));
    assert!(stdout.contains("\"functionName\": \"f\""));
    assert!(stdout.contains("\"percentage\": 100"));
}
