//! Syntax trees produced by the parser and the cursor used to walk them

mod cursor;
mod tree;

pub use cursor::{Preorder, TreeCursor};
pub use tree::SyntaxTree;

pub use crate::base::{Position, Span};
