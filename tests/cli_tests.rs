//! CLI integration tests.
//!
//! Tests the json-canon commands by invoking the binary as a subprocess.

use std::io::Write;
use std::process::{Command, Stdio};

use json_canon::json::parse;

fn binary_path() -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_BIN_EXE_json-canon"))
}

fn run_command(args: &[&str], input: &str) -> (i32, String, String) {
    let binary = binary_path();
    let mut child = Command::new(&binary)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap_or_else(|e| panic!("Failed to spawn json-canon at {:?}: {}", binary, e));

    {
        let stdin = child.stdin.as_mut().unwrap();
        stdin.write_all(input.as_bytes()).unwrap();
    }

    let output = child.wait_with_output().unwrap();
    let code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (code, stdout, stderr)
}

// ============================================================================
// canon
// ============================================================================

#[test]
fn cli_canon_from_stdin() {
    let (code, stdout, _stderr) = run_command(&["canon"], "{ \"b\" : 1.50 ,\n \"a\" : [ true ] }");
    assert_eq!(code, 0, "Expected success exit code");
    assert_eq!(stdout.trim_end(), r#"{"b":1.50,"a":[true]}"#);
}

#[test]
fn cli_canon_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(br#"{"url": "http://example.com/x"}"#).unwrap();

    let path = file.path().to_str().unwrap();
    let (code, stdout, _stderr) = run_command(&["canon", path], "");
    assert_eq!(code, 0);
    assert_eq!(stdout.trim_end(), r#"{"url":"http:\/\/example.com\/x"}"#);
}

#[test]
fn cli_canon_reports_parse_error() {
    let (code, stdout, _stderr) = run_command(&["canon"], "[1,\n 2 3]");
    assert_eq!(code, 1, "Expected failure exit code");

    let report = parse(stdout.trim_end()).expect("error report must be JSON");
    let err = report.get("err").expect("report must have 'err'");
    assert_eq!(err.get("code").and_then(|v| v.as_i64()), Some(103));
    assert_eq!(err.get("name").and_then(|v| v.as_str()), Some("ExpectedDelimiter"));
    assert_eq!(err.get("offset").and_then(|v| v.as_i64()), Some(7));
    assert_eq!(err.get("line").and_then(|v| v.as_i64()), Some(2));
    assert_eq!(err.get("column").and_then(|v| v.as_i64()), Some(4));
    assert!(err.get("message").and_then(|v| v.as_str()).is_some());
}

#[test]
fn cli_canon_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    let (code, stdout, _stderr) = run_command(&["canon", missing.to_str().unwrap()], "");
    assert_eq!(code, 1);
    let report = parse(stdout.trim_end()).unwrap();
    assert_eq!(report.get("err").unwrap().get("code").and_then(|v| v.as_i64()), Some(114));
}

#[test]
fn cli_max_depth_flag() {
    let (code, _stdout, _stderr) = run_command(&["canon", "--max-depth", "2"], "[[1]]");
    assert_eq!(code, 0);

    let (code, stdout, _stderr) = run_command(&["canon", "--max-depth", "2"], "[[[1]]]");
    assert_eq!(code, 1);
    let report = parse(stdout.trim_end()).unwrap();
    assert_eq!(report.get("err").unwrap().get("code").and_then(|v| v.as_i64()), Some(111));
}

#[test]
fn cli_strict_flag() {
    let deep = format!("{}{}", "[".repeat(40), "]".repeat(40));
    let (code, _stdout, _stderr) = run_command(&["canon"], &deep);
    assert_eq!(code, 0);
    let (code, _stdout, _stderr) = run_command(&["--strict", "canon"], &deep);
    assert_eq!(code, 1);
}

// ============================================================================
// check
// ============================================================================

#[test]
fn cli_check_valid() {
    let (code, stdout, _stderr) = run_command(&["check"], r#"{"a": null}"#);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim_end(), r#"{"ok":true}"#);
}

#[test]
fn cli_check_invalid() {
    let (code, stdout, _stderr) = run_command(&["check"], "tru");
    assert_eq!(code, 1);
    assert!(stdout.contains("\"err\""));
    assert!(stdout.contains("\"code\":104"));
}

#[test]
fn cli_check_empty_input() {
    let (code, stdout, _stderr) = run_command(&["check"], "   ");
    assert_eq!(code, 1);
    assert!(stdout.contains("UnexpectedEndOfInput"));
}

// ============================================================================
// escape / unescape
// ============================================================================

#[test]
fn cli_escape() {
    let (code, stdout, _stderr) = run_command(&["escape", "a/b\"c"], "");
    assert_eq!(code, 0);
    assert_eq!(stdout.trim_end(), r#"a\/b\"c"#);
}

#[test]
fn cli_unescape() {
    let (code, stdout, _stderr) = run_command(&["unescape", r#"𝄞\/"#], "");
    assert_eq!(code, 0);
    assert_eq!(stdout.trim_end(), "\u{1D11E}/");
}

#[test]
fn cli_unescape_error() {
    let (code, stdout, _stderr) = run_command(&["unescape", r#"ab\q"#], "");
    assert_eq!(code, 1);
    let report = parse(stdout.trim_end()).unwrap();
    let err = report.get("err").unwrap();
    assert_eq!(err.get("code").and_then(|v| v.as_i64()), Some(107));
    assert_eq!(err.get("offset").and_then(|v| v.as_i64()), Some(2));
}

// ============================================================================
// corpus / version
// ============================================================================

#[test]
fn cli_corpus() {
    let corpus = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/corpus.json");
    let (code, stdout, _stderr) = run_command(&["corpus", corpus], "");
    assert_eq!(code, 0, "corpus run failed:\n{stdout}");
    assert!(stdout.contains("0 failed"));
}

#[test]
fn cli_corpus_with_failure() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(
        br#"{"manifest":{"format_version":"1"},"vectors":[
            {"id":"wrong","op":"parse","input":"1.0","expected":{"ok":"1"}}
        ]}"#,
    )
    .unwrap();

    let (code, stdout, _stderr) = run_command(&["corpus", file.path().to_str().unwrap()], "");
    assert_eq!(code, 1);
    assert!(stdout.contains("FAIL wrong"));
}

#[test]
fn cli_version() {
    let (code, stdout, _stderr) = run_command(&["version"], "");
    assert_eq!(code, 0);
    assert!(stdout.starts_with("json-canon v"));
}
