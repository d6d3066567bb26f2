//! The result of a parse

use rowan::{GreenNode, TextRange, TextSize};

use super::cursor::TreeCursor;
use crate::base::{LineCol, LineIndex, Span};
use crate::parser::incremental::Checkpoint;
use crate::parser::{SyntaxError, SyntaxKind, SyntaxNode};

/// An immutable concrete syntax tree together with its diagnostics
///
/// The tree is lossless: the text of the root is the parsed input, byte for
/// byte. Regions the parser could not make sense of are `ERROR` nodes. Old
/// trees stay valid after a reparse and share every unchanged subtree with
/// the new one.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub(crate) green: GreenNode,
    pub(crate) errors: Vec<SyntaxError>,
    pub(crate) checkpoints: Vec<Checkpoint>,
    line_index: LineIndex,
    pub(crate) grammar_version: u32,
    /// Recovery horizon the tree was parsed with
    pub(crate) recovery_limit: usize,
}

impl SyntaxTree {
    pub(crate) fn new(
        text: &str,
        green: GreenNode,
        errors: Vec<SyntaxError>,
        checkpoints: Vec<Checkpoint>,
        grammar_version: u32,
        recovery_limit: usize,
    ) -> Self {
        Self {
            green,
            errors,
            checkpoints,
            line_index: LineIndex::new(text),
            grammar_version,
            recovery_limit,
        }
    }

    /// Red root node. Cheap; create one per thread as needed.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    /// Cursor positioned on the root
    pub fn walk(&self) -> TreeCursor {
        TreeCursor::new(self.syntax())
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    /// Check if the parse produced diagnostics or `ERROR` nodes
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty() || self.error_nodes().next().is_some()
    }

    /// All `ERROR` nodes, outermost first
    pub fn error_nodes(&self) -> impl Iterator<Item = SyntaxNode> {
        self.syntax()
            .descendants()
            .filter(|node| node.kind() == SyntaxKind::ERROR)
    }

    pub fn text(&self) -> String {
        self.syntax().text().to_string()
    }

    pub fn text_len(&self) -> TextSize {
        self.green.text_len()
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    pub fn line_col(&self, offset: TextSize) -> LineCol {
        self.line_index.line_col(offset)
    }

    pub fn span(&self, range: TextRange) -> Span {
        self.line_index.span(range)
    }

    pub fn grammar_version(&self) -> u32 {
        self.grammar_version
    }

    /// Line boundaries a later reparse may resume from
    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    /// Indented dump of every node and token with its range
    pub fn debug_dump(&self) -> String {
        format!("{:#?}", self.syntax())
    }
}

impl Drop for SyntaxTree {
    /// rowan frees green nodes recursively, so a long operator chain would
    /// overflow the stack. Release parents one at a time instead, keeping
    /// their child nodes alive on an explicit stack.
    fn drop(&mut self) {
        let root = std::mem::replace(
            &mut self.green,
            GreenNode::new(SyntaxKind::SOURCE_FILE.into(), std::iter::empty()),
        );
        let mut pending = vec![root];
        while let Some(node) = pending.pop() {
            pending.extend(
                node.children()
                    .filter_map(|child| child.into_node())
                    .filter(|child| child.children().len() > 0)
                    .map(|child| child.to_owned()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;

    #[test]
    fn test_tree_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<super::SyntaxTree>();
    }

    #[test]
    fn test_text_is_lossless() {
        let text = "Main:\n  ld a, [hl+] ; load\n\tjr nz, .loop\n";
        let tree = parse(text).unwrap();
        assert_eq!(tree.text(), text);
        assert_eq!(u32::from(tree.text_len()) as usize, text.len());
    }

    #[test]
    fn test_debug_dump() {
        let tree = parse("nop").unwrap();
        let dump = tree.debug_dump();
        assert!(dump.starts_with("SOURCE_FILE@0..3"), "{dump}");
        assert!(dump.contains("INSTRUCTION@0..3"), "{dump}");
        assert!(dump.contains("MNEMONIC@0..3 \"nop\""), "{dump}");
    }

    #[test]
    fn test_line_positions() {
        let tree = parse("nop\n  halt\n").unwrap();
        let halt = tree.syntax().children().nth(1).unwrap();
        let span = tree.span(halt.text_range());
        assert_eq!((span.start.line, span.start.column), (1, 2));
        assert_eq!(tree.line_col(halt.text_range().end()).col, 6);
    }

    #[test]
    fn test_drop_deep_operator_chain() {
        let mut text = String::from("DEF X = 1");
        text.push_str(&" + 1".repeat(100_000));
        std::thread::Builder::new()
            .stack_size(2 << 20)
            .spawn(move || {
                let tree = parse(&text).unwrap();
                assert_eq!(usize::from(tree.text_len()), text.len());
                assert!(!tree.has_errors());
            })
            .unwrap()
            .join()
            .unwrap();
    }

    #[test]
    fn test_error_nodes() {
        let tree = parse("nop\n) )\nhalt\n").unwrap();
        assert!(tree.has_errors());
        assert_eq!(tree.error_nodes().count(), 1);
        assert!(!parse("nop\n").unwrap().has_errors());
    }
}
