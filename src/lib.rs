//! # rgbasm-syntax
//!
//! Incremental, error-tolerant parsing of RGBASM (Game Boy assembly) into a
//! lossless concrete syntax tree.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! syntax    → SyntaxTree, TreeCursor, Span/Position
//!   ↓
//! parser    → Logos lexer, grammar DSL, LALR(1) tables, parse engine, typed AST
//!   ↓
//! base      → Primitives (TextRange, LineIndex)
//! ```
//!
//! ## Example
//!
//! ```
//! use rgbasm::{InputEdit, SyntaxKind, TextSize};
//!
//! let text = "Main:\n  ld a, b\n";
//! let tree = rgbasm::parse(text).unwrap();
//! assert!(!tree.has_errors());
//! assert_eq!(tree.syntax().first_child().unwrap().kind(), SyntaxKind::LABEL);
//!
//! let edit = InputEdit::insert(text, TextSize::new(16), "  halt\n");
//! let tree = rgbasm::reparse(&tree, "Main:\n  ld a, b\n  halt\n", &edit).unwrap();
//! assert_eq!(tree.text(), "Main:\n  ld a, b\n  halt\n");
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → syntax)
// ============================================================================

/// Foundation types: TextRange, line/column conversion
pub mod base;

/// Parser: Logos lexer, grammar compiler, parse engine, typed AST
pub mod parser;

/// Syntax: parse results, cursors, Span/Position
pub mod syntax;

// Re-export the main parsing API
pub use parser::{
    Checkpoint, EditError, ErrorCode, GrammarLoadError, InputEdit, Language, ParseError,
    ParseOptions, Parser, RgbasmLanguage, Severity, SyntaxElement, SyntaxError, SyntaxKind,
    SyntaxNode, SyntaxToken, parse, parse_bytes, reparse, tokenize,
};
pub use syntax::{SyntaxTree, TreeCursor};

// Re-export foundation types
pub use base::{LineCol, LineIndex, Position, Span, TextRange, TextSize};
