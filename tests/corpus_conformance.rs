//! Corpus-based conformance tests.
//!
//! Runs every vector in `tests/fixtures/corpus.json` against the parser,
//! serializer and escape codec.

use std::path::{Path, PathBuf};

use json_canon::conformance::{CorpusRunner, CorpusResults, TestResult};

/// Path to the corpus file relative to the project root.
const CORPUS_PATH: &str = "tests/fixtures/corpus.json";

fn corpus_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(CORPUS_PATH)
}

fn run_corpus() -> CorpusResults {
    let _ = env_logger::builder().is_test(true).try_init();
    let runner = CorpusRunner::load(corpus_path()).expect("Failed to load corpus");
    runner.run_all()
}

fn assert_group_passes(results: &CorpusResults, prefix: &str) {
    let group: Vec<_> = results
        .details
        .iter()
        .filter(|(id, _)| id.starts_with(prefix))
        .collect();

    assert!(!group.is_empty(), "no vectors with prefix {prefix}");

    for (id, result) in &group {
        if let TestResult::Fail { expected, actual } = result {
            panic!("{} failed: expected={}, actual={}", id, expected, actual);
        }
        assert!(result.is_pass(), "{id}: {result:?}");
    }
}

/// Load and run the full corpus.
#[test]
fn test_full_corpus() {
    let results = run_corpus();

    println!("\n=== Corpus Conformance Results ===");
    println!("{}", results.summary());

    if !results.failures().is_empty() {
        println!("\nFailures:");
        for (id, result) in results.failures() {
            if let TestResult::Fail { expected, actual } = result {
                println!("  {} - expected: {}, actual: {}", id, expected, actual);
            }
        }
    }

    assert!(
        results.all_passed(),
        "Corpus conformance failed: {}",
        results.summary()
    );
    assert_eq!(results.skipped, 0);
}

/// Test that we can load the corpus manifest.
#[test]
fn test_corpus_manifest() {
    let runner = CorpusRunner::load(corpus_path()).expect("Failed to load corpus");
    let manifest = runner.manifest();

    assert_eq!(manifest.format_version, "1");
    assert!(manifest.description.is_some());
    assert!(runner.vector_count() >= 40);
}

#[test]
fn test_corpus_parse_vectors() {
    let results = run_corpus();
    assert_group_passes(&results, "parse-");
    assert_group_passes(&results, "number-");
    assert_group_passes(&results, "string-");
}

#[test]
fn test_corpus_negative_cases() {
    assert_group_passes(&run_corpus(), "reject-");
}

#[test]
fn test_corpus_codec_vectors() {
    let results = run_corpus();
    assert_group_passes(&results, "escape-");
    assert_group_passes(&results, "unescape-");
}

#[test]
fn test_missing_corpus_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(CorpusRunner::load(dir.path().join("none.json")).is_err());
}
