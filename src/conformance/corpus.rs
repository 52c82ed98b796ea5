//! Corpus-based conformance testing.
//!
//! A corpus is a JSON file of test vectors run against the parser, the
//! serializer and the escape codec:
//!
//! ```json
//! {
//!   "manifest": {"format_version": "1", "description": "..."},
//!   "vectors": [
//!     {"id": "obj-order", "op": "parse", "input": "{\"b\":1,\"a\":2}",
//!      "expected": {"ok": "{\"b\":1,\"a\":2}"}},
//!     {"id": "tru", "op": "parse", "input": "tru",
//!      "expected": {"err": {"code": 104}}}
//!   ]
//! }
//! ```
//!
//! Operations:
//!
//! - `parse` - parse `input`; `ok` is the canonical serialization, which must
//!   also reparse and reserialize to itself
//! - `escape` - escape `input`; `ok` is the escaped text
//! - `unescape` - unescape `input`; `ok` is the decoded text
//!
//! The corpus file is read with this crate's own parser and mapped onto the
//! types below with [`from_value`].

use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

use super::{ConformanceError, ConformanceResult};
use crate::error::ParseErrorKind;
use crate::json::{escape, from_value, parse, to_string, unescape, JsonValue};

/// Corpus manifest with metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CorpusManifest {
    /// Format version of the corpus file.
    pub format_version: String,
    /// Free-form description.
    pub description: Option<String>,
}

/// A corpus containing test vectors.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Corpus {
    /// Corpus metadata.
    pub manifest: CorpusManifest,
    /// List of test vectors.
    pub vectors: Vec<TestVector>,
}

/// Expected outcome of a vector: `{"ok": "..."}` or `{"err": {"code": N}}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expected {
    /// The operation succeeds with this output.
    Ok(String),
    /// The operation fails with this error code.
    Err {
        /// Numeric error code.
        code: u32,
    },
}

/// A single test vector.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TestVector {
    /// Unique identifier for the test.
    pub id: String,
    /// Operation to test (`parse`, `escape` or `unescape`).
    pub op: String,
    /// Input text for the operation.
    pub input: String,
    /// Expected result (success or error).
    pub expected: Expected,
}

/// Result of running a single test vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestResult {
    /// Test passed.
    Pass,
    /// Test failed with mismatch.
    Fail {
        /// Expected result from the corpus.
        expected: String,
        /// Actual result from the implementation.
        actual: String,
    },
    /// Test was skipped (operation not known).
    Skip {
        /// Reason for skipping.
        reason: String,
    },
    /// Test errored during execution.
    Error {
        /// Error message.
        message: String,
    },
}

impl TestResult {
    /// Returns true if this is a passing result.
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Results from running the corpus.
#[derive(Debug, Default)]
pub struct CorpusResults {
    /// Number of tests that passed.
    pub passed: usize,
    /// Number of tests that failed.
    pub failed: usize,
    /// Number of tests that were skipped.
    pub skipped: usize,
    /// Number of tests that errored.
    pub errors: usize,
    /// Detailed results for each test.
    pub details: Vec<(String, TestResult)>,
}

impl CorpusResults {
    /// Create a new empty results container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a test result.
    pub fn record(&mut self, id: &str, result: TestResult) {
        match &result {
            TestResult::Pass => self.passed += 1,
            TestResult::Fail { .. } => self.failed += 1,
            TestResult::Skip { .. } => self.skipped += 1,
            TestResult::Error { .. } => self.errors += 1,
        }
        self.details.push((id.to_string(), result));
    }

    /// Get total number of tests run.
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped + self.errors
    }

    /// Returns true if all tests passed (no failures or errors).
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }

    /// Get a summary string of the results.
    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} failed, {} skipped, {} errors (total: {})",
            self.passed,
            self.failed,
            self.skipped,
            self.errors,
            self.total()
        )
    }

    /// Get failures only.
    pub fn failures(&self) -> Vec<&(String, TestResult)> {
        self.details
            .iter()
            .filter(|(_, r)| matches!(r, TestResult::Fail { .. }))
            .collect()
    }

    /// Get errors only.
    pub fn error_details(&self) -> Vec<&(String, TestResult)> {
        self.details
            .iter()
            .filter(|(_, r)| matches!(r, TestResult::Error { .. }))
            .collect()
    }
}

/// Corpus runner that executes test vectors.
pub struct CorpusRunner {
    corpus: Corpus,
}

impl CorpusRunner {
    /// Load corpus from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> ConformanceResult<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConformanceError::Io(format!("{}: {e}", path.as_ref().display())))?;
        let runner = Self::from_text(&content)?;
        info!(
            "loaded {} vectors from {}",
            runner.vector_count(),
            path.as_ref().display()
        );
        Ok(runner)
    }

    /// Load corpus from its JSON text.
    pub fn from_text(content: &str) -> ConformanceResult<Self> {
        Ok(Self {
            corpus: from_value(parse(content)?)?,
        })
    }

    /// Get the corpus manifest.
    pub fn manifest(&self) -> &CorpusManifest {
        &self.corpus.manifest
    }

    /// Get the number of test vectors.
    pub fn vector_count(&self) -> usize {
        self.corpus.vectors.len()
    }

    /// Run all test vectors and return results.
    pub fn run_all(&self) -> CorpusResults {
        let mut results = CorpusResults::new();

        for vector in &self.corpus.vectors {
            let result = run_vector(vector);
            if !result.is_pass() {
                warn!("vector {} ({}): {:?}", vector.id, vector.op, result);
            }
            results.record(&vector.id, result);
        }

        info!("corpus run: {}", results.summary());
        results
    }
}

/// Run a single test vector.
///
/// A `parse` vector whose canonical text does not reparse and reserialize
/// to itself is an [`TestResult::Error`], whatever the vector expects.
pub fn run_vector(vector: &TestVector) -> TestResult {
    let actual = match vector.op.as_str() {
        "parse" => match parse(&vector.input) {
            Ok(value) => {
                let canonical = to_string(&value);
                if let Some(message) = fixed_point_violation(&value, &canonical) {
                    return TestResult::Error { message };
                }
                Ok(canonical)
            }
            Err(err) => Err(err.code()),
        },
        "escape" => Ok(escape(&vector.input)),
        "unescape" => unescape(&vector.input).map_err(|e| ParseErrorKind::from(e.kind).code()),
        other => {
            return TestResult::Skip {
                reason: format!("Unknown operation: {other}"),
            }
        }
    };
    compare(&vector.expected, actual)
}

/// Why `canonical` is not a fixed point for `value`, if it is not one.
fn fixed_point_violation(value: &JsonValue, canonical: &str) -> Option<String> {
    let again = match parse(canonical) {
        Ok(again) => again,
        Err(err) => return Some(format!("canonical text {canonical} does not reparse: {err}")),
    };
    if again != *value {
        return Some(format!("canonical text {canonical} reparses to a different value"));
    }
    let text = to_string(&again);
    if text != canonical {
        return Some(format!("canonical text {canonical} reserializes as {text}"));
    }
    None
}

fn describe(outcome: &Result<String, u32>) -> String {
    match outcome {
        Ok(text) => format!("ok: {text}"),
        Err(code) => format!("err: {code}"),
    }
}

fn compare(expected: &Expected, actual: Result<String, u32>) -> TestResult {
    match (expected, &actual) {
        (Expected::Ok(want), Ok(got)) if want == got => TestResult::Pass,
        (Expected::Err { code }, Err(got)) if code == got => TestResult::Pass,
        (Expected::Ok(want), Ok(got)) => TestResult::Fail {
            expected: want.clone(),
            actual: got.clone(),
        },
        (Expected::Ok(want), Err(_)) => TestResult::Fail {
            expected: describe(&Ok(want.clone())),
            actual: describe(&actual),
        },
        (Expected::Err { code }, _) => TestResult::Fail {
            expected: describe(&Err(*code)),
            actual: describe(&actual),
        },
    }
}
