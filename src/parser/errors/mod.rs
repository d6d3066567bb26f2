//! Parser error handling module
//!
//! This module provides error handling for the RGBASM parser:
//! - Categorized error codes for filtering and documentation
//! - Context-aware error messages
//! - Suggestions/hints listing what the parser expected
//! - Related span tracking (e.g., "opened here" for unterminated blocks)

mod codes;
mod context;
mod error;

pub use codes::ErrorCode;
pub use context::{ParseContext, block_terminator, is_block_terminator};
pub use error::{RelatedInfo, Severity, SyntaxError, SyntaxErrorBuilder, unexpected_token};
