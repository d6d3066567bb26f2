//! Syntax tree tests
//!
//! Cursor navigation, positions and the typed AST over whole programs.

mod tests_ast;
mod tests_cursor;
