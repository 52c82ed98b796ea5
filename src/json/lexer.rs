//! Character scanner.
//!
//! Pulls characters one at a time from any `Iterator<Item = char>` and keeps
//! a single character of lookahead. The parser decides every production from
//! the class of that lookahead alone; there is no backtracking.
//!
//! A fresh scanner holds a synthetic `' '` as its lookahead, so the first
//! whitespace skip reads the first real character through the same path as
//! every later one.

use super::escape::unescape;
use super::limits::Limits;
use crate::error::{ParseError, ParseErrorKind, ParseResult};

/// Returns true for the four JSON whitespace characters.
pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\n' | '\r' | '\t')
}

/// Returns true for characters that may appear in a number token.
pub fn is_number_char(c: char) -> bool {
    matches!(c, '0'..='9' | '+' | '-' | '.' | 'e' | 'E')
}

/// Returns true for the first letters of `true`, `false` and `null`.
pub fn is_literal_lead(c: char) -> bool {
    matches!(c, 't' | 'f' | 'n')
}

/// Returns true for letters drawn from `true`, `false` and `null`.
pub fn is_literal_char(c: char) -> bool {
    matches!(c, 't' | 'r' | 'u' | 'e' | 'f' | 'a' | 'l' | 's' | 'n')
}

/// A location in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// 0-based character offset
    pub offset: u64,
    /// 1-based line
    pub line: u64,
    /// 1-based column
    pub column: u64,
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl Position {
    const START: Position = Position {
        offset: 0,
        line: 1,
        column: 1,
    };

    fn step(&mut self, c: char) {
        self.offset += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    /// Attach this position to an error kind.
    pub fn error(self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            kind,
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }
}

/// Single-lookahead character scanner.
pub struct Scanner<I> {
    source: I,
    last: Option<char>,
    /// Position of `last`
    pos: Position,
    primed: bool,
    limits: Limits,
}

impl<I: Iterator<Item = char>> Scanner<I> {
    /// Create a scanner primed with a whitespace lookahead.
    pub fn new(source: I, limits: Limits) -> Self {
        Self {
            source,
            last: Some(' '),
            pos: Position::START,
            primed: true,
            limits,
        }
    }

    /// The current lookahead, `None` at end of text.
    pub fn peek(&self) -> Option<char> {
        self.last
    }

    /// Limits this scanner enforces.
    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Position of the current lookahead.
    pub fn position(&self) -> Position {
        self.pos
    }

    /// Build an error at the current lookahead.
    pub fn error(&self, kind: ParseErrorKind) -> ParseError {
        self.pos.error(kind)
    }

    /// Advance to the next character.
    ///
    /// Fails if the lookahead is already at end of text.
    pub fn bump(&mut self) -> ParseResult<()> {
        let Some(prev) = self.last else {
            return Err(self.error(ParseErrorKind::UnexpectedEndOfInput));
        };
        if self.primed {
            self.primed = false;
        } else {
            self.pos.step(prev);
        }
        self.last = self.source.next();
        if self.last.is_some() && self.pos.offset >= self.limits.max_input_length {
            return Err(self.error(ParseErrorKind::InputTooLarge(
                self.limits.max_input_length,
            )));
        }
        Ok(())
    }

    /// Skip whitespace so the lookahead sits on the next token.
    pub fn skip_whitespace(&mut self) -> ParseResult<()> {
        while self.last.is_some_and(is_whitespace) {
            self.bump()?;
        }
        Ok(())
    }

    /// Consume `expected` and the whitespace after it.
    pub fn expect(&mut self, expected: char) -> ParseResult<()> {
        match self.last {
            Some(c) if c == expected => {
                self.bump()?;
                self.skip_whitespace()
            }
            Some(_) => Err(self.error(ParseErrorKind::ExpectedDelimiter(expected))),
            None => Err(self.error(ParseErrorKind::UnexpectedEndOfInput)),
        }
    }

    /// Collect the maximal run of characters accepted by `class`.
    pub fn take_run(&mut self, class: fn(char) -> bool) -> ParseResult<String> {
        let mut run = String::new();
        while let Some(c) = self.last.filter(|&c| class(c)) {
            run.push(c);
            self.bump()?;
        }
        Ok(run)
    }

    /// Scan a string literal starting at the opening quote and return its
    /// unescaped contents.
    ///
    /// The raw body is copied verbatim (a backslash takes the following
    /// character with it) and unescaped once the closing quote is found.
    pub fn scan_string(&mut self) -> ParseResult<String> {
        self.bump()?; // opening quote
        let body_start = self.pos;
        let mut raw = String::new();
        let mut length: u64 = 0;

        loop {
            let c = match self.last {
                Some('"') => break,
                Some(c) => c,
                None => return Err(self.error(ParseErrorKind::UnterminatedString)),
            };
            raw.push(c);
            length += 1;
            self.bump()?;
            if c == '\\' {
                match self.last {
                    Some(escaped) => {
                        raw.push(escaped);
                        length += 1;
                        self.bump()?;
                    }
                    None => return Err(self.error(ParseErrorKind::UnterminatedString)),
                }
            }
            if length > self.limits.max_string_length {
                return Err(body_start.error(ParseErrorKind::StringTooLong(
                    length,
                    self.limits.max_string_length,
                )));
            }
        }
        self.bump()?; // closing quote

        let value = unescape(&raw).map_err(|err| {
            let mut at = body_start;
            raw.chars().take(err.index).for_each(|c| at.step(c));
            at.error(err.kind.into())
        })?;
        self.skip_whitespace()?;
        Ok(value)
    }
}
