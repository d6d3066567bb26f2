//! Incremental, error-tolerant RGBASM parser
//!
//! The parser is table driven and builds a lossless rowan CST:
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with SyntaxKind
//!     ↓
//! Engine (LALR(1) table from the grammar DSL) → shift/reduce with recovery
//!     ↓
//! Tree builder → GreenNode tree (immutable, shared between versions)
//!     ↓
//! SyntaxTree → red SyntaxNodes, TreeCursor, typed AST layer
//! ```
//!
//! ## Incremental Reparsing
//!
//! When text changes, we:
//! 1. Resume the engine at the last line boundary before the change
//! 2. Reuse old green nodes that are identical at the same position
//! 3. Reattach the old tree's tail once the parse is back in step with it

#[allow(clippy::module_inception)]
mod parser;

pub mod ast;
mod engine;
pub mod errors;
pub mod grammar;
pub(crate) mod incremental;
mod language;
mod lexer;
mod options;
mod syntax_kind;
pub mod table;
mod tree_builder;

pub use ast::*;
pub use errors::{ErrorCode, ParseContext, RelatedInfo, Severity, SyntaxError};
pub use incremental::{Checkpoint, EditError, InputEdit};
pub use language::{GrammarLoadError, Language};
pub use lexer::{Lexer, Token, tokenize};
pub use options::ParseOptions;
pub use parser::{ParseError, Parser, parse, parse_bytes, reparse};
pub use syntax_kind::{RgbasmLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

/// Re-export rowan types for convenience
pub use rowan::{GreenNode, TextRange, TextSize};
