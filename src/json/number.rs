//! Arbitrary-precision decimal numbers.
//!
//! A [`Number`] keeps the sign, the unscaled decimal digits and a decimal
//! scale of the text it was parsed from, so no digit is ever lost to binary
//! floating point. `3.141592653589793238462643383279` stays exactly that.
//!
//! Canonical text uses plain notation while the scale is non-negative and the
//! adjusted exponent is at least -6, and scientific notation (`1E+10`,
//! `1.23E-7`) otherwise. Integral values never gain a `.0` suffix.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{NumberFormatError, TypeError};

/// Name of the newtype through which numbers travel losslessly into
/// [`to_value`](crate::json::to_value).
pub(crate) const NUMBER_TOKEN: &str = "$json_canon::private::Number";

/// Integers wider than this many digits are not converted by `as_i64`/`as_u64`.
const MAX_INTEGER_DIGITS: i64 = 40;

/// A decimal number: `(-1)^negative * digits * 10^-scale`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Number {
    negative: bool,
    /// ASCII digits without leading zeros; "0" for zero
    digits: String,
    scale: i64,
}

impl Number {
    /// Returns true if the number is below zero. Zero is never negative.
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Returns true if the number equals zero at any scale.
    pub fn is_zero(&self) -> bool {
        self.digits == "0"
    }

    /// Unscaled decimal digits, without sign.
    pub fn unscaled_digits(&self) -> &str {
        &self.digits
    }

    /// Number of digits to the right of the decimal point (negative for
    /// trailing zeros folded into the exponent).
    pub fn scale(&self) -> i64 {
        self.scale
    }

    /// Returns true if the fractional part is zero.
    pub fn is_integer(&self) -> bool {
        if self.scale <= 0 {
            return true;
        }
        let len = self.digits.len() as i64;
        let frac_len = self.scale.min(len) as usize;
        self.digits[self.digits.len() - frac_len..]
            .bytes()
            .all(|b| b == b'0')
    }

    /// Decimal text of the integral value, or `None` for fractions and
    /// magnitudes too wide for any primitive integer.
    fn integer_text(&self) -> Option<String> {
        if !self.is_integer() {
            return None;
        }
        if self.is_zero() {
            return Some("0".to_string());
        }
        let len = self.digits.len() as i64;
        let width = len.checked_sub(self.scale)?;
        if width > MAX_INTEGER_DIGITS {
            return None;
        }
        let mut text = String::with_capacity(width.max(1) as usize + 1);
        if self.negative {
            text.push('-');
        }
        if self.scale <= 0 {
            text.push_str(&self.digits);
            text.extend(std::iter::repeat('0').take((-self.scale) as usize));
        } else if width > 0 {
            text.push_str(&self.digits[..width as usize]);
        } else {
            text.push('0');
        }
        Some(text)
    }

    /// The value as an `i64`, if it is integral and in range.
    pub fn as_i64(&self) -> Option<i64> {
        self.integer_text()?.parse().ok()
    }

    /// The value as a `u64`, if it is integral, non-negative and in range.
    pub fn as_u64(&self) -> Option<u64> {
        self.integer_text()?.parse().ok()
    }

    /// The nearest `f64`, or `None` if the magnitude overflows.
    pub fn as_f64(&self) -> Option<f64> {
        self.to_string().parse::<f64>().ok().filter(|v| v.is_finite())
    }

    fn from_float_text(text: &str) -> Result<Self, TypeError> {
        Ok(text.parse::<Number>()?)
    }
}

impl FromStr for Number {
    type Err = NumberFormatError;

    /// Parses `('+'|'-')? digit+ ('.' digit+)? (('e'|'E') ('+'|'-')? digit+)?`.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let malformed = || NumberFormatError(text.to_string());
        let bytes = text.as_bytes();
        let is_digit_at = |pos: usize| bytes.get(pos).is_some_and(u8::is_ascii_digit);

        let mut pos = 0;
        let mut negative = false;
        match bytes.first() {
            Some(b'-') => {
                negative = true;
                pos = 1;
            }
            Some(b'+') => pos = 1,
            _ => {}
        }

        // Integer part
        let int_start = pos;
        while is_digit_at(pos) {
            pos += 1;
        }
        if pos == int_start {
            return Err(malformed());
        }
        let mut coefficient = text[int_start..pos].to_string();
        let mut scale: i64 = 0;

        // Fraction
        if bytes.get(pos) == Some(&b'.') {
            pos += 1;
            let frac_start = pos;
            while is_digit_at(pos) {
                pos += 1;
            }
            if pos == frac_start {
                return Err(malformed());
            }
            coefficient.push_str(&text[frac_start..pos]);
            scale = i64::try_from(pos - frac_start).map_err(|_| malformed())?;
        }

        // Exponent
        if matches!(bytes.get(pos), Some(b'e' | b'E')) {
            pos += 1;
            let exp_start = pos;
            if matches!(bytes.get(pos), Some(b'+' | b'-')) {
                pos += 1;
            }
            let exp_digits = pos;
            while is_digit_at(pos) {
                pos += 1;
            }
            if pos == exp_digits {
                return Err(malformed());
            }
            let exponent: i64 = text[exp_start..pos].parse().map_err(|_| malformed())?;
            scale = scale.checked_sub(exponent).ok_or_else(malformed)?;
        }

        if pos != bytes.len() {
            return Err(malformed());
        }

        let trimmed = coefficient.trim_start_matches('0');
        let digits = if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        };
        let negative = negative && digits != "0";

        // The canonical text writes the adjusted exponent, which must parse back
        i64::try_from(digits.len() - 1)
            .ok()
            .and_then(|lead| lead.checked_sub(scale))
            .ok_or_else(malformed)?;

        Ok(Number {
            negative,
            digits,
            scale,
        })
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        let len = self.digits.len();
        let adjusted = (len as i128 - 1) - i128::from(self.scale);

        if self.scale >= 0 && adjusted >= -6 {
            // Plain notation; scale is bounded by len + 5 here
            let scale = self.scale as usize;
            if scale == 0 {
                f.write_str(&self.digits)
            } else if len > scale {
                let (int_part, frac_part) = self.digits.split_at(len - scale);
                write!(f, "{int_part}.{frac_part}")
            } else {
                f.write_str("0.")?;
                for _ in len..scale {
                    f.write_str("0")?;
                }
                f.write_str(&self.digits)
            }
        } else {
            let (lead, rest) = self.digits.split_at(1);
            f.write_str(lead)?;
            if !rest.is_empty() {
                write!(f, ".{rest}")?;
            }
            if adjusted >= 0 {
                write!(f, "E+{adjusted}")
            } else {
                write!(f, "E{adjusted}")
            }
        }
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(value: $ty) -> Self {
                    let text = value.to_string();
                    let (negative, digits) = match text.strip_prefix('-') {
                        Some(magnitude) => (true, magnitude.to_string()),
                        None => (false, text),
                    };
                    Number { negative, digits, scale: 0 }
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl TryFrom<f64> for Number {
    type Error = TypeError;

    /// Converts through the shortest decimal text that round-trips.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(TypeError::NonFiniteNumber(value));
        }
        Number::from_float_text(&value.to_string())
    }
}

impl TryFrom<f32> for Number {
    type Error = TypeError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(TypeError::NonFiniteNumber(f64::from(value)));
        }
        Number::from_float_text(&value.to_string())
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.scale == 0 {
            if let Some(value) = self.as_i64() {
                return serializer.serialize_i64(value);
            }
            if let Some(value) = self.as_u64() {
                return serializer.serialize_u64(value);
            }
        }
        serializer.serialize_newtype_struct(NUMBER_TOKEN, &self.to_string())
    }
}
