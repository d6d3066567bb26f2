//! Error code definitions for parser diagnostics
//!
//! Error codes follow a naming convention: E{category}{number}
//! - E01xx: Lexical errors (invalid tokens)
//! - E02xx: Line structure errors
//! - E03xx: Block errors (MACRO/REPT/FOR/IF)
//! - E04xx: Expression and operand errors
//! - E05xx: Directive errors
//! - E09xx: Generic/fallback errors

use std::fmt;

/// Error codes for parser diagnostics
///
/// Each error code represents a specific category of parse error,
/// enabling filtering, documentation, and IDE integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // E01xx: Lexical errors (invalid tokens)
    // =========================================================================
    /// Invalid or unexpected character in source
    E0101,
    /// Unterminated string literal
    E0102,
    /// Unterminated block comment
    E0103,

    // =========================================================================
    // E02xx: Line structure errors
    // =========================================================================
    /// Token that cannot start a statement
    E0201,
    /// Extra tokens after a complete statement
    E0202,
    /// Input ended in the middle of a statement
    E0203,

    // =========================================================================
    // E03xx: Block errors
    // =========================================================================
    /// Block directive without its terminator
    E0301,
    /// `ENDC`, `ENDR`, `ENDM`, `ELSE` or `ELIF` outside a block
    E0302,
    /// Malformed block header
    E0303,

    // =========================================================================
    // E04xx: Expression and operand errors
    // =========================================================================
    /// Invalid expression
    E0401,
    /// Missing operand
    E0402,
    /// Unclosed parenthesis `(`
    E0403,
    /// Unclosed bracket `[`
    E0404,
    /// Invalid instruction operand
    E0405,

    // =========================================================================
    // E05xx: Directive errors
    // =========================================================================
    /// Invalid directive arguments
    E0501,
    /// Invalid section declaration
    E0502,
    /// Invalid symbol definition
    E0503,

    // =========================================================================
    // E09xx: Generic/fallback errors
    // =========================================================================
    /// Unexpected token in current context
    E0901,
    /// Internal parser error
    E0999,
}

impl ErrorCode {
    /// Get the string representation of the error code (e.g., "E0201")
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexical
            Self::E0101 => "E0101",
            Self::E0102 => "E0102",
            Self::E0103 => "E0103",
            // Line structure
            Self::E0201 => "E0201",
            Self::E0202 => "E0202",
            Self::E0203 => "E0203",
            // Blocks
            Self::E0301 => "E0301",
            Self::E0302 => "E0302",
            Self::E0303 => "E0303",
            // Expression
            Self::E0401 => "E0401",
            Self::E0402 => "E0402",
            Self::E0403 => "E0403",
            Self::E0404 => "E0404",
            Self::E0405 => "E0405",
            // Directive
            Self::E0501 => "E0501",
            Self::E0502 => "E0502",
            Self::E0503 => "E0503",
            // Generic
            Self::E0901 => "E0901",
            Self::E0999 => "E0999",
        }
    }

    /// Get a short description of the error category
    pub fn category_description(&self) -> &'static str {
        match self {
            Self::E0101 | Self::E0102 | Self::E0103 => "lexical error",
            Self::E0201 | Self::E0202 | Self::E0203 => "line structure error",
            Self::E0301 | Self::E0302 | Self::E0303 => "block error",
            Self::E0401 | Self::E0402 | Self::E0403 | Self::E0404 | Self::E0405 => "expression error",
            Self::E0501 | Self::E0502 | Self::E0503 => "directive error",
            Self::E0901 | Self::E0999 => "syntax error",
        }
    }

    /// Get the default message template for this error code
    pub fn default_message(&self) -> &'static str {
        match self {
            // Lexical
            Self::E0101 => "invalid character",
            Self::E0102 => "unterminated string literal",
            Self::E0103 => "unterminated block comment",
            // Line structure
            Self::E0201 => "invalid statement",
            Self::E0202 => "expected end of line",
            Self::E0203 => "unexpected end of file",
            // Blocks
            Self::E0301 => "unterminated block",
            Self::E0302 => "block terminator without matching directive",
            Self::E0303 => "invalid block header",
            // Expression
            Self::E0401 => "invalid expression",
            Self::E0402 => "missing operand",
            Self::E0403 => "unclosed parenthesis",
            Self::E0404 => "unclosed bracket",
            Self::E0405 => "invalid operand",
            // Directive
            Self::E0501 => "invalid directive arguments",
            Self::E0502 => "invalid section declaration",
            Self::E0503 => "invalid symbol definition",
            // Generic
            Self::E0901 => "unexpected token",
            Self::E0999 => "internal parser error",
        }
    }

    /// Check if this is a lexical error (reported by the lexer)
    pub fn is_lexical(&self) -> bool {
        matches!(self, Self::E0101 | Self::E0102 | Self::E0103)
    }

    /// Check if this is a structural error (delimiter or block related)
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::E0301 | Self::E0302 | Self::E0303 | Self::E0403 | Self::E0404
        )
    }

    /// Check if this is a recoverable error (parsing can continue)
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::E0999)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
