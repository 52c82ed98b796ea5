//! Resource limits for parsing.
//!
//! The parser is recursive, so nesting depth is what bounds stack usage.
//! Input and string length caps bound memory for untrusted text.

/// Parser limits.
///
/// Lengths are counted in characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum total input length
    pub max_input_length: u64,
    /// Maximum nesting depth of arrays and objects
    pub max_nesting_depth: u64,
    /// Maximum length of a single string literal body
    pub max_string_length: u64,
}

impl Limits {
    /// Tight limits for untrusted input.
    pub const fn strict() -> Self {
        Self {
            max_input_length: 1024 * 1024,  // 1 Mi chars
            max_nesting_depth: 32,          // 32 levels
            max_string_length: 64 * 1024,   // 64 Ki chars
        }
    }

    /// Generous limits for ordinary documents.
    pub const fn lenient() -> Self {
        Self {
            max_input_length: 64 * 1024 * 1024, // 64 Mi chars
            max_nesting_depth: 128,             // 128 levels
            max_string_length: 16 * 1024 * 1024, // 16 Mi chars
        }
    }

    /// Override the nesting depth.
    pub const fn with_max_nesting_depth(mut self, depth: u64) -> Self {
        self.max_nesting_depth = depth;
        self
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::lenient()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_limits() {
        let limits = Limits::strict();
        assert_eq!(limits.max_input_length, 1024 * 1024);
        assert_eq!(limits.max_nesting_depth, 32);
        assert_eq!(limits.max_string_length, 64 * 1024);
    }

    #[test]
    fn test_lenient_is_default() {
        let limits = Limits::default();
        assert_eq!(limits, Limits::lenient());
        assert!(limits.max_input_length > Limits::strict().max_input_length);
        assert!(limits.max_nesting_depth > Limits::strict().max_nesting_depth);
    }

    #[test]
    fn test_depth_override() {
        assert_eq!(Limits::strict().with_max_nesting_depth(4).max_nesting_depth, 4);
    }
}
