//! Error types for parsing, value construction and the escape codec.
//!
//! The crate has two independent fallible surfaces that are never mixed:
//!
//! - [`ParseError`] - syntax and lexical failures while reading JSON text.
//!   Every kind carries a stable numeric code (100-series) and a name, and
//!   every error carries the character offset, line and column where it was
//!   detected.
//! - [`TypeError`] - a value of a shape JSON cannot represent was offered to
//!   an object or to the serializer, or a value did not fit the type it was
//!   deserialized into.
//!
//! Lookups on an object add [`KeyError`] for absent keys, combined with
//! [`TypeError`] in [`AccessError`].

use thiserror::Error;

/// Result type for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for value construction and serialization of caller data.
pub type TypeResult<T> = Result<T, TypeError>;

/// What went wrong while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum ParseErrorKind {
    /// A character that cannot start or continue the current production (code 100)
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),

    /// An object member key was not a string (code 101)
    #[error("property name expected")]
    PropertyNameExpected,

    /// An object member key was the empty string (code 102)
    #[error("property name must not be empty")]
    EmptyPropertyName,

    /// A required `:`, `}` or `]` was missing (code 103)
    #[error("'{0}' expected")]
    ExpectedDelimiter(char),

    /// A run of literal letters that is not `true`, `false` or `null` (code 104)
    #[error("unknown literal {0:?}")]
    UnknownLiteral(String),

    /// A run of number characters that is not a valid decimal (code 105)
    #[error("malformed number {0:?}")]
    InvalidNumber(String),

    /// End of text before the closing quote of a string (code 106)
    #[error("unterminated string")]
    UnterminatedString,

    /// Unknown escape, malformed `\u` escape or lone backslash (code 107)
    #[error("invalid escape: {0}")]
    InvalidEscape(String),

    /// A `\u` surrogate escape without its partner (code 108)
    #[error("unpaired surrogate \\u{0:04X}")]
    UnpairedSurrogate(u16),

    /// End of text where a value or delimiter was required (code 109)
    #[error("unexpected end of text")]
    UnexpectedEndOfInput,

    /// Non-whitespace after the root value (code 110)
    #[error("trailing data {0:?} after the root value")]
    TrailingData(char),

    /// Containers nested deeper than the configured limit (code 111)
    #[error("nesting depth {0} exceeds limit {1}")]
    NestingTooDeep(u64, u64),

    /// More characters than the configured limit (code 112)
    #[error("input exceeds {0} characters")]
    InputTooLarge(u64),

    /// A string literal longer than the configured limit (code 113)
    #[error("string of {0} characters exceeds limit {1}")]
    StringTooLong(u64, u64),

    /// The reader failed or produced invalid UTF-8 (code 114)
    #[error("read failed: {0}")]
    Io(String),
}

impl ParseErrorKind {
    /// Numeric error code.
    pub fn code(&self) -> u32 {
        match self {
            ParseErrorKind::UnexpectedCharacter(_) => 100,
            ParseErrorKind::PropertyNameExpected => 101,
            ParseErrorKind::EmptyPropertyName => 102,
            ParseErrorKind::ExpectedDelimiter(_) => 103,
            ParseErrorKind::UnknownLiteral(_) => 104,
            ParseErrorKind::InvalidNumber(_) => 105,
            ParseErrorKind::UnterminatedString => 106,
            ParseErrorKind::InvalidEscape(_) => 107,
            ParseErrorKind::UnpairedSurrogate(_) => 108,
            ParseErrorKind::UnexpectedEndOfInput => 109,
            ParseErrorKind::TrailingData(_) => 110,
            ParseErrorKind::NestingTooDeep(_, _) => 111,
            ParseErrorKind::InputTooLarge(_) => 112,
            ParseErrorKind::StringTooLong(_, _) => 113,
            ParseErrorKind::Io(_) => 114,
        }
    }

    /// Error name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            ParseErrorKind::UnexpectedCharacter(_) => "UnexpectedCharacter",
            ParseErrorKind::PropertyNameExpected => "PropertyNameExpected",
            ParseErrorKind::EmptyPropertyName => "EmptyPropertyName",
            ParseErrorKind::ExpectedDelimiter(_) => "ExpectedDelimiter",
            ParseErrorKind::UnknownLiteral(_) => "UnknownLiteral",
            ParseErrorKind::InvalidNumber(_) => "InvalidNumber",
            ParseErrorKind::UnterminatedString => "UnterminatedString",
            ParseErrorKind::InvalidEscape(_) => "InvalidEscape",
            ParseErrorKind::UnpairedSurrogate(_) => "UnpairedSurrogate",
            ParseErrorKind::UnexpectedEndOfInput => "UnexpectedEndOfInput",
            ParseErrorKind::TrailingData(_) => "TrailingData",
            ParseErrorKind::NestingTooDeep(_, _) => "NestingTooDeep",
            ParseErrorKind::InputTooLarge(_) => "InputTooLarge",
            ParseErrorKind::StringTooLong(_, _) => "StringTooLong",
            ParseErrorKind::Io(_) => "Io",
        }
    }
}

/// A parse failure with its position in the input.
///
/// `offset` counts characters (not bytes) from the start of the text;
/// `line` and `column` are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at line {line}, column {column}")]
pub struct ParseError {
    /// What went wrong
    pub kind: ParseErrorKind,
    /// Character offset of the offending position
    pub offset: u64,
    /// 1-based line
    pub line: u64,
    /// 1-based column
    pub column: u64,
}

impl ParseError {
    /// Numeric error code of the underlying kind.
    pub fn code(&self) -> u32 {
        self.kind.code()
    }

    /// Error name of the underlying kind.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// A value that JSON cannot represent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypeError {
    /// Object keys must be non-empty strings
    #[error("property name must be a non-empty string")]
    EmptyKey,

    /// A map key that is not a string
    #[error("object keys must be strings, found {0}")]
    NonStringKey(&'static str),

    /// NaN or an infinity
    #[error("non-finite number {0} has no JSON representation")]
    NonFiniteNumber(f64),

    /// A Rust shape with no JSON counterpart (e.g. a byte blob)
    #[error("{0} cannot be represented as a JSON value")]
    UnsupportedType(&'static str),

    /// Decimal text handed over by a number token was malformed
    #[error(transparent)]
    InvalidNumber(#[from] NumberFormatError),

    /// Raised by a caller's `Serialize` or `Deserialize` implementation
    #[error("{0}")]
    Custom(String),
}

impl serde::ser::Error for TypeError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        TypeError::Custom(msg.to_string())
    }
}

impl serde::de::Error for TypeError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        TypeError::Custom(msg.to_string())
    }
}

/// Text that is not a valid decimal number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("malformed number {0:?}")]
pub struct NumberFormatError(pub String);

/// Lookup of a key that is not present.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("no such property {0:?}")]
pub struct KeyError(pub String);

/// Failure of [`JsonObject::get`](crate::json::JsonObject::get).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AccessError {
    /// The key itself was malformed
    #[error(transparent)]
    Type(#[from] TypeError),
    /// The key is well-formed but absent
    #[error(transparent)]
    Key(#[from] KeyError),
}

/// What went wrong while unescaping a string literal body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum EscapeErrorKind {
    /// A backslash followed by a character that is not an escape
    #[error("unknown escape '\\{0}'")]
    UnknownEscape(char),
    /// `\u` not followed by four hex digits
    #[error("malformed unicode escape '\\u{0}'")]
    MalformedUnicode(String),
    /// A high surrogate not followed by a low one, or a lone low surrogate
    #[error("unpaired surrogate \\u{0:04X}")]
    UnpairedSurrogate(u16),
    /// A backslash as the last character
    #[error("lone backslash at end of string")]
    DanglingBackslash,
}

/// An unescape failure with the character index of the offending backslash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("{kind} at index {index}")]
pub struct EscapeError {
    /// What went wrong
    pub kind: EscapeErrorKind,
    /// Character index of the backslash that starts the bad escape
    pub index: usize,
}

impl From<EscapeErrorKind> for ParseErrorKind {
    fn from(kind: EscapeErrorKind) -> Self {
        match kind {
            EscapeErrorKind::UnpairedSurrogate(unit) => ParseErrorKind::UnpairedSurrogate(unit),
            other => ParseErrorKind::InvalidEscape(other.to_string()),
        }
    }
}
