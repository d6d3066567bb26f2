//! Stateful navigation over a syntax tree
//!
//! A [`TreeCursor`] visits nodes and tokens alike, trivia included, and
//! never leaves the subtree it was created on.

use rowan::{NodeOrToken, TextRange, TextSize};

use crate::parser::{SyntaxElement, SyntaxKind, SyntaxNode};

#[derive(Debug, Clone)]
pub struct TreeCursor {
    root: SyntaxNode,
    current: SyntaxElement,
    depth: usize,
}

impl TreeCursor {
    pub fn new(root: SyntaxNode) -> Self {
        Self {
            current: NodeOrToken::Node(root.clone()),
            root,
            depth: 0,
        }
    }

    pub fn current(&self) -> &SyntaxElement {
        &self.current
    }

    pub fn kind(&self) -> SyntaxKind {
        self.current.kind()
    }

    pub fn range(&self) -> TextRange {
        self.current.text_range()
    }

    /// Check if the cursor is on a region the parser could not recognize
    pub fn is_error(&self) -> bool {
        self.kind() == SyntaxKind::ERROR
    }

    pub fn is_token(&self) -> bool {
        self.current.as_token().is_some()
    }

    /// Distance from the node the cursor was created on
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn text(&self) -> String {
        match &self.current {
            NodeOrToken::Node(node) => node.text().to_string(),
            NodeOrToken::Token(token) => token.text().to_string(),
        }
    }

    pub fn goto_first_child(&mut self) -> bool {
        let child = self
            .current
            .as_node()
            .and_then(|node| node.first_child_or_token());
        self.descend(child)
    }

    pub fn goto_last_child(&mut self) -> bool {
        let child = self
            .current
            .as_node()
            .and_then(|node| node.last_child_or_token());
        self.descend(child)
    }

    /// Move to the first child that ends after `offset`
    pub fn goto_first_child_for_offset(&mut self, offset: TextSize) -> bool {
        let child = self.current.as_node().and_then(|node| {
            node.children_with_tokens()
                .find(|child| child.text_range().end() > offset)
        });
        self.descend(child)
    }

    pub fn goto_next_sibling(&mut self) -> bool {
        if self.depth == 0 {
            return false;
        }
        match self.current.next_sibling_or_token() {
            Some(sibling) => {
                self.current = sibling;
                true
            }
            None => false,
        }
    }

    pub fn goto_previous_sibling(&mut self) -> bool {
        if self.depth == 0 {
            return false;
        }
        match self.current.prev_sibling_or_token() {
            Some(sibling) => {
                self.current = sibling;
                true
            }
            None => false,
        }
    }

    pub fn goto_parent(&mut self) -> bool {
        if self.depth == 0 {
            return false;
        }
        match self.current.parent() {
            Some(parent) => {
                self.current = NodeOrToken::Node(parent);
                self.depth -= 1;
                true
            }
            None => false,
        }
    }

    /// Go back to the node the cursor was created on
    pub fn reset(&mut self) {
        self.current = NodeOrToken::Node(self.root.clone());
        self.depth = 0;
    }

    /// Depth-first traversal of every element below and including the
    /// current one
    pub fn preorder(&self) -> Preorder {
        let root = match &self.current {
            NodeOrToken::Node(node) => TreeCursor::new(node.clone()),
            NodeOrToken::Token(_) => self.clone(),
        };
        Preorder {
            single: root.is_token().then(|| root.current.clone()),
            cursor: Some(root),
        }
    }

    fn descend(&mut self, child: Option<SyntaxElement>) -> bool {
        match child {
            Some(child) => {
                self.current = child;
                self.depth += 1;
                true
            }
            None => false,
        }
    }
}

/// Iterator returned by [`TreeCursor::preorder`]
#[derive(Debug)]
pub struct Preorder {
    cursor: Option<TreeCursor>,
    /// Set when traversal starts on a token
    single: Option<SyntaxElement>,
}

impl Iterator for Preorder {
    type Item = SyntaxElement;

    fn next(&mut self) -> Option<SyntaxElement> {
        if let Some(token) = self.single.take() {
            self.cursor = None;
            return Some(token);
        }
        let cursor = self.cursor.as_mut()?;
        let item = cursor.current.clone();

        if !cursor.goto_first_child() {
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    self.cursor = None;
                    break;
                }
            }
        }
        Some(item)
    }
}
