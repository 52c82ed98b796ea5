//! Recursive descent JSON parser.
//!
//! Grammar:
//!
//! ```text
//! value   := object | array | string | number | literal
//! object  := '{' ws (pair (',' ws pair)*)? '}' ws
//! pair    := string ws ':' ws value
//! array   := '[' ws (value (',' ws value)*)? ']' ws
//! string  := '"' (char | escape)* '"' ws
//! number  := ('+'|'-')? digit+ ('.' digit+)? (('e'|'E') ('+'|'-')? digit+)? ws
//! literal := ('true' | 'false' | 'null') ws
//! ```
//!
//! Every production consumes the whitespace after it, so the lookahead
//! always sits on the first character of the next token. Object keys go
//! through the general `value` production and are then required to be
//! strings. Duplicate keys are allowed; the last value wins and the key keeps
//! its first position.
//!
//! Nesting depth, input length and string length are bounded by [`Limits`].

use std::io::Read;

use log::{debug, trace};

use super::lexer::{is_literal_char, is_literal_lead, is_number_char, Position, Scanner};
use super::limits::Limits;
use super::number::Number;
use super::types::{JsonObject, JsonValue};
use crate::error::{NumberFormatError, ParseErrorKind, ParseResult};

/// A single-use parser over a character source.
pub struct Parser<I> {
    scanner: Scanner<I>,
    depth: u64,
}

impl<I: Iterator<Item = char>> Parser<I> {
    /// Create a parser for the given characters.
    pub fn new(chars: I, limits: Limits) -> Self {
        Self {
            scanner: Scanner::new(chars, limits),
            depth: 0,
        }
    }

    /// Parse exactly one value and require the input to end after it.
    pub fn parse(mut self) -> ParseResult<JsonValue> {
        self.scanner.skip_whitespace()?;
        let value = self.parse_value()?;

        if let Some(c) = self.scanner.peek() {
            return Err(self.scanner.error(ParseErrorKind::TrailingData(c)));
        }

        Ok(value)
    }

    fn parse_value(&mut self) -> ParseResult<JsonValue> {
        match self.scanner.peek() {
            Some('{') => self.parse_object(),
            Some('[') => self.parse_array(),
            Some('"') => self.scanner.scan_string().map(JsonValue::String),
            Some(c) if is_literal_lead(c) => self.parse_literal(),
            Some(c) if is_number_char(c) => self.parse_number(),
            Some(c) => Err(self.scanner.error(ParseErrorKind::UnexpectedCharacter(c))),
            None => Err(self.scanner.error(ParseErrorKind::UnexpectedEndOfInput)),
        }
    }

    fn parse_literal(&mut self) -> ParseResult<JsonValue> {
        let start = self.scanner.position();
        let word = self.scanner.take_run(is_literal_char)?;
        let value = match word.as_str() {
            "true" => JsonValue::Bool(true),
            "false" => JsonValue::Bool(false),
            "null" => JsonValue::Null,
            _ => return Err(start.error(ParseErrorKind::UnknownLiteral(word))),
        };
        self.scanner.skip_whitespace()?;
        Ok(value)
    }

    fn parse_number(&mut self) -> ParseResult<JsonValue> {
        let start = self.scanner.position();
        let text = self.scanner.take_run(is_number_char)?;
        let number = text
            .parse::<Number>()
            .map_err(|NumberFormatError(text)| start.error(ParseErrorKind::InvalidNumber(text)))?;
        self.scanner.skip_whitespace()?;
        Ok(JsonValue::Number(number))
    }

    /// Enter a container opened at `at`.
    fn descend(&mut self, at: Position) -> ParseResult<()> {
        self.depth += 1;
        let max = self.scanner.limits().max_nesting_depth;
        if self.depth > max {
            return Err(at.error(ParseErrorKind::NestingTooDeep(self.depth, max)));
        }
        trace!("entering container at offset {} (depth {})", at.offset, self.depth);
        Ok(())
    }

    fn parse_object(&mut self) -> ParseResult<JsonValue> {
        self.descend(self.scanner.position())?;
        self.scanner.bump()?;
        self.scanner.skip_whitespace()?;

        let mut object = JsonObject::new();

        // Empty object
        if self.scanner.peek() == Some('}') {
            self.scanner.bump()?;
            self.scanner.skip_whitespace()?;
            self.depth -= 1;
            return Ok(JsonValue::Object(object));
        }

        loop {
            let key_at = self.scanner.position();
            let key = match self.parse_value()? {
                JsonValue::String(key) => key,
                _ => return Err(key_at.error(ParseErrorKind::PropertyNameExpected)),
            };
            self.scanner.expect(':')?;
            let value = self.parse_value()?;
            if object.set(key, value).is_err() {
                return Err(key_at.error(ParseErrorKind::EmptyPropertyName));
            }

            if self.scanner.peek() == Some(',') {
                self.scanner.bump()?;
                self.scanner.skip_whitespace()?;
            } else {
                self.scanner.expect('}')?;
                break;
            }
        }

        self.depth -= 1;
        Ok(JsonValue::Object(object))
    }

    fn parse_array(&mut self) -> ParseResult<JsonValue> {
        self.descend(self.scanner.position())?;
        self.scanner.bump()?;
        self.scanner.skip_whitespace()?;

        let mut arr = Vec::new();

        // Empty array
        if self.scanner.peek() == Some(']') {
            self.scanner.bump()?;
            self.scanner.skip_whitespace()?;
            self.depth -= 1;
            return Ok(JsonValue::Array(arr));
        }

        loop {
            arr.push(self.parse_value()?);

            if self.scanner.peek() == Some(',') {
                self.scanner.bump()?;
                self.scanner.skip_whitespace()?;
            } else {
                self.scanner.expect(']')?;
                break;
            }
        }

        self.depth -= 1;
        Ok(JsonValue::Array(arr))
    }
}

fn logged(result: ParseResult<JsonValue>) -> ParseResult<JsonValue> {
    if let Err(err) = &result {
        debug!("parse failed: {} (code {})", err, err.code());
    }
    result
}

/// Parse JSON text with the default limits.
pub fn parse(input: &str) -> ParseResult<JsonValue> {
    parse_with_limits(input, Limits::default())
}

/// Parse JSON text with custom limits.
pub fn parse_with_limits(input: &str, limits: Limits) -> ParseResult<JsonValue> {
    parse_chars(input.chars(), limits)
}

/// Parse JSON from any character source.
pub fn parse_chars<I>(chars: I, limits: Limits) -> ParseResult<JsonValue>
where
    I: IntoIterator<Item = char>,
{
    debug!("parsing with {:?}", limits);
    logged(Parser::new(chars.into_iter(), limits).parse())
}

/// Read all of `reader` as UTF-8 and parse it.
pub fn from_reader<R: Read>(mut reader: R, limits: Limits) -> ParseResult<JsonValue> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|err| Position::default().error(ParseErrorKind::Io(err.to_string())))?;
    parse_with_limits(&text, limits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(input: &str) -> ParseErrorKind {
        parse(input).unwrap_err().kind
    }

    fn num(text: &str) -> JsonValue {
        JsonValue::Number(text.parse().unwrap())
    }

    #[test]
    fn test_parse_null() {
        let result = parse("null").unwrap();
        assert_eq!(result, JsonValue::Null);
    }

    #[test]
    fn test_parse_booleans() {
        assert_eq!(parse("true").unwrap(), JsonValue::Bool(true));
        assert_eq!(parse("false").unwrap(), JsonValue::Bool(false));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse("42").unwrap(), num("42"));
        assert_eq!(parse("-123").unwrap(), num("-123"));
        assert_eq!(parse("0").unwrap(), num("0"));
        assert_eq!(parse("1.50").unwrap(), num("1.50"));
        assert_eq!(parse("+7").unwrap(), num("7"));
    }

    #[test]
    fn test_precision_is_kept() {
        let value = parse("3.141592653589793238462643383279").unwrap();
        assert_eq!(
            value.as_number().unwrap().to_string(),
            "3.141592653589793238462643383279"
        );
    }

    #[test]
    fn test_parse_string() {
        assert_eq!(
            parse(r#""hello""#).unwrap(),
            JsonValue::String("hello".to_string())
        );
        assert_eq!(
            parse(r#""𝄞""#).unwrap(),
            JsonValue::String("\u{1D11E}".to_string())
        );
    }

    #[test]
    fn test_parse_array() {
        let result = parse("[1, 2, 3]").unwrap();
        assert_eq!(result, JsonValue::Array(vec![num("1"), num("2"), num("3")]));
    }

    #[test]
    fn test_parse_object_keeps_order() {
        let result = parse(r#"{"b": 1, "a": 2}"#).unwrap();
        let obj = result.as_object().unwrap();
        assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let result = parse(r#"{"a": 1, "b": 2, "a": 3}"#).unwrap();
        let obj = result.as_object().unwrap();
        assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(obj.get("a").unwrap(), &num("3"));
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(parse("{}").unwrap(), JsonValue::Object(JsonObject::new()));
        assert_eq!(parse("[ ]").unwrap(), JsonValue::Array(vec![]));
    }

    #[test]
    fn test_whitespace_everywhere() {
        let result = parse(" \t\n{ \"a\" : [ true , null ] } \r\n").unwrap();
        assert_eq!(
            result.get("a").unwrap(),
            &JsonValue::Array(vec![JsonValue::Bool(true), JsonValue::Null])
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(kind_of(""), ParseErrorKind::UnexpectedEndOfInput);
        assert_eq!(kind_of(" \n\t "), ParseErrorKind::UnexpectedEndOfInput);
    }

    #[test]
    fn test_trailing_content_rejected() {
        let err = parse("1 2").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::TrailingData('2'));
        assert_eq!(err.offset, 2);
        assert_eq!(kind_of("null extra"), ParseErrorKind::TrailingData('e'));
        assert_eq!(kind_of("{}}"), ParseErrorKind::TrailingData('}'));
    }

    #[test]
    fn test_trailing_comma_rejected() {
        assert_eq!(kind_of("[1, 2,]"), ParseErrorKind::UnexpectedCharacter(']'));
        assert_eq!(kind_of(r#"{"a":1,}"#), ParseErrorKind::UnexpectedCharacter('}'));
    }

    #[test]
    fn test_missing_comma_rejected() {
        assert_eq!(kind_of("[1 2]"), ParseErrorKind::ExpectedDelimiter(']'));
        assert_eq!(kind_of(r#"{"a":1 "b":2}"#), ParseErrorKind::ExpectedDelimiter('}'));
        assert_eq!(kind_of(r#"{"a" 1}"#), ParseErrorKind::ExpectedDelimiter(':'));
    }

    #[test]
    fn test_non_string_key_rejected() {
        let err = parse("{1:2}").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::PropertyNameExpected);
        assert_eq!(err.offset, 1);
        assert_eq!(kind_of("{null:2}"), ParseErrorKind::PropertyNameExpected);
        assert_eq!(kind_of("{[]:2}"), ParseErrorKind::PropertyNameExpected);
    }

    #[test]
    fn test_empty_key_rejected() {
        let err = parse(r#"{"ok":1, "":2}"#).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EmptyPropertyName);
        assert_eq!(err.offset, 9);
    }

    #[test]
    fn test_unknown_literals() {
        assert_eq!(kind_of("tru"), ParseErrorKind::UnknownLiteral("tru".to_string()));
        assert_eq!(kind_of("nulll"), ParseErrorKind::UnknownLiteral("nulll".to_string()));
        assert_eq!(kind_of("[fals]"), ParseErrorKind::UnknownLiteral("fals".to_string()));
    }

    #[test]
    fn test_malformed_numbers() {
        assert_eq!(kind_of("--1"), ParseErrorKind::InvalidNumber("--1".to_string()));
        assert_eq!(kind_of("-"), ParseErrorKind::InvalidNumber("-".to_string()));
        assert_eq!(kind_of("[1.]"), ParseErrorKind::InvalidNumber("1.".to_string()));
        assert_eq!(kind_of("1e5e5"), ParseErrorKind::InvalidNumber("1e5e5".to_string()));
    }

    #[test]
    fn test_unexpected_characters() {
        assert_eq!(kind_of("@"), ParseErrorKind::UnexpectedCharacter('@'));
        assert_eq!(kind_of("[1, }"), ParseErrorKind::UnexpectedCharacter('}'));
        assert_eq!(kind_of("'a'"), ParseErrorKind::UnexpectedCharacter('\''));
    }

    #[test]
    fn test_unexpected_end() {
        assert_eq!(kind_of("["), ParseErrorKind::UnexpectedEndOfInput);
        assert_eq!(kind_of("[1,"), ParseErrorKind::UnexpectedEndOfInput);
        assert_eq!(kind_of(r#"{"a":1"#), ParseErrorKind::UnexpectedEndOfInput);
        assert_eq!(kind_of(r#"{"a""#), ParseErrorKind::UnexpectedEndOfInput);
        assert_eq!(kind_of(r#""abc"#), ParseErrorKind::UnterminatedString);
    }

    #[test]
    fn test_escape_errors() {
        assert_eq!(kind_of(r#""\uD800""#), ParseErrorKind::UnpairedSurrogate(0xD800));
        assert_eq!(parse(r#""\x""#).unwrap_err().code(), 107);
    }

    #[test]
    fn test_error_position_on_later_line() {
        let err = parse("{\n  \"a\": tru\n}").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnknownLiteral("tru".to_string()));
        assert_eq!((err.line, err.column), (2, 8));
    }

    #[test]
    fn test_nesting_depth_limit() {
        let limits = Limits::default().with_max_nesting_depth(2);

        // Depth 2 is allowed
        let result = parse_with_limits("[[1]]", limits);
        assert!(result.is_ok());

        // Depth 3 exceeds limit
        let err = parse_with_limits("[[[1]]]", limits).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NestingTooDeep(3, 2));
        assert_eq!(err.offset, 2);

        // Siblings do not accumulate depth
        assert!(parse_with_limits("[[1],[2],[3]]", limits).is_ok());
        assert!(parse_with_limits(r#"[[1],{"a":[2]}]"#, limits).is_err());
    }

    #[test]
    fn test_deep_nesting_fails_cleanly() {
        let deep = "[".repeat(100_000);
        assert_eq!(
            parse(&deep).unwrap_err().kind,
            ParseErrorKind::NestingTooDeep(129, 128)
        );
    }

    #[test]
    fn test_parse_chars_from_iterator() {
        let chars = vec!['[', '1', ',', ' ', '"', 'x', '"', ']'];
        let value = parse_chars(chars, Limits::default()).unwrap();
        assert_eq!(value, JsonValue::Array(vec![num("1"), "x".into()]));
    }

    #[test]
    fn test_from_reader() {
        let value = from_reader(&b"{\"k\": [1]}"[..], Limits::default()).unwrap();
        assert_eq!(value.get("k").unwrap().get_index(0), Some(&num("1")));

        let err = from_reader(&[0xFFu8, 0xFE][..], Limits::default()).unwrap_err();
        assert_eq!(err.code(), 114);
    }

    #[test]
    fn test_from_str() {
        let value: JsonValue = "[true]".parse().unwrap();
        assert_eq!(value, JsonValue::Array(vec![JsonValue::Bool(true)]));
    }

    #[test]
    fn test_raw_control_characters_accepted() {
        assert_eq!(
            parse("\"a\tb\"").unwrap(),
            JsonValue::String("a\tb".to_string())
        );
    }
}
