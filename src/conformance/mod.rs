//! Conformance corpus runner.
//!
//! Loads a JSON file of test vectors and checks the parser, serializer and
//! escape codec against the expected outputs and error codes.

pub mod corpus;

pub use corpus::{
    run_vector, Corpus, CorpusManifest, CorpusResults, CorpusRunner, Expected, TestResult,
    TestVector,
};

use thiserror::Error;

use crate::error::{ParseError, TypeError};

/// Result type for conformance operations.
pub type ConformanceResult<T> = Result<T, ConformanceError>;

/// Errors that can occur while loading a corpus.
#[derive(Debug, Error)]
pub enum ConformanceError {
    /// The corpus file could not be read
    #[error("I/O error: {0}")]
    Io(String),
    /// The corpus file is not valid JSON
    #[error("corpus is not valid JSON: {0}")]
    Parse(#[from] ParseError),
    /// The corpus is valid JSON but not a valid corpus
    #[error("malformed corpus: {0}")]
    Format(#[from] TypeError),
}
