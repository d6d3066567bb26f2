//! Green tree construction for the LR engine
//!
//! The engine keeps the elements of every stack entry in a [`Children`]
//! list. Hidden rules concatenate lists, visible rules flatten them into a
//! `GreenNode`. With a [`ReusePool`] seeded from an old tree, a freshly
//! built node or token that is identical to an old one at the same offset
//! is replaced by the old `Arc`, so unchanged subtrees are shared.

use std::ptr;
use std::sync::Arc;

use rowan::{GreenNode, GreenNodeData, GreenToken, NodeOrToken, TextSize};
use rustc_hash::FxHashMap;

use super::SyntaxKind;

/// An owned child of a green node
pub(crate) type GreenElement = NodeOrToken<GreenNode, GreenToken>;

pub(crate) fn element_len(element: &GreenElement) -> TextSize {
    match element {
        NodeOrToken::Node(node) => node.text_len(),
        NodeOrToken::Token(token) => token.text_len(),
    }
}

/// Children of `node` as owned elements
pub(crate) fn owned_children(node: &GreenNodeData) -> impl Iterator<Item = GreenElement> + '_ {
    node.children().map(|child| match child {
        NodeOrToken::Node(node) => NodeOrToken::Node(node.to_owned()),
        NodeOrToken::Token(token) => NodeOrToken::Token(token.to_owned()),
    })
}

/// Persistent list of green elements
///
/// Chunks are linked back to front, so appending never copies what is
/// already in the list and snapshots share their prefix.
#[derive(Debug, Clone, Default)]
pub(crate) struct Children {
    tail: Option<Arc<Chunk>>,
    len: usize,
}

#[derive(Debug)]
struct Chunk {
    /// Never empty
    elements: Vec<GreenElement>,
    prev: Option<Arc<Chunk>>,
}

impl Drop for Chunk {
    fn drop(&mut self) {
        // Unlink iteratively; a file with many lines has a long chain
        let mut prev = self.prev.take();
        while let Some(chunk) = prev {
            match Arc::try_unwrap(chunk) {
                Ok(mut chunk) => prev = chunk.prev.take(),
                Err(_) => break,
            }
        }
    }
}

impl Children {
    pub(crate) fn from_vec(elements: Vec<GreenElement>) -> Self {
        Self::default().append(elements)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn last(&self) -> Option<&GreenElement> {
        self.tail.as_ref().and_then(|chunk| chunk.elements.last())
    }

    /// Add `elements` after the current contents
    pub(crate) fn append(&self, elements: Vec<GreenElement>) -> Self {
        if elements.is_empty() {
            return self.clone();
        }
        Self {
            len: self.len + elements.len(),
            tail: Some(Arc::new(Chunk {
                elements,
                prev: self.tail.clone(),
            })),
        }
    }

    /// Concatenate lists in order; the first non-empty list is shared
    pub(crate) fn concat<'c>(lists: impl IntoIterator<Item = &'c Children>) -> Self {
        let mut lists = lists.into_iter().filter(|list| !list.is_empty());
        let Some(first) = lists.next() else {
            return Self::default();
        };
        let mut rest = Vec::new();
        for list in lists {
            list.extend_into(&mut rest);
        }
        first.append(rest)
    }

    pub(crate) fn to_vec(&self) -> Vec<GreenElement> {
        let mut out = Vec::with_capacity(self.len);
        self.extend_into(&mut out);
        out
    }

    pub(crate) fn extend_into(&self, out: &mut Vec<GreenElement>) {
        let mut chunks = Vec::new();
        let mut cursor = self.tail.as_deref();
        while let Some(chunk) = cursor {
            chunks.push(chunk);
            cursor = chunk.prev.as_deref();
        }
        for chunk in chunks.into_iter().rev() {
            out.extend(chunk.elements.iter().cloned());
        }
    }
}

/// Old green elements indexed by their offset in the new text
#[derive(Debug, Default)]
pub(crate) struct ReusePool {
    nodes: FxHashMap<(TextSize, SyntaxKind), Vec<GreenNode>>,
    tokens: FxHashMap<(TextSize, SyntaxKind), GreenToken>,
}

impl ReusePool {
    pub(crate) fn insert_node(&mut self, offset: TextSize, node: GreenNode) {
        self.nodes
            .entry((offset, node.kind().into()))
            .or_default()
            .push(node);
    }

    pub(crate) fn insert_token(&mut self, offset: TextSize, token: GreenToken) {
        self.tokens.insert((offset, token.kind().into()), token);
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.values().map(Vec::len).sum::<usize>() + self.tokens.len()
    }

}

/// Builds green nodes and tokens, sharing pooled ones where possible
#[derive(Debug, Default)]
pub(crate) struct TreeBuilder {
    pool: ReusePool,
    reused: usize,
}

impl TreeBuilder {
    pub(crate) fn new(pool: ReusePool) -> Self {
        Self { pool, reused: 0 }
    }

    /// Number of nodes and tokens taken from the pool so far
    pub(crate) fn reused(&self) -> usize {
        self.reused
    }

    pub(crate) fn token(&mut self, kind: SyntaxKind, text: &str, offset: TextSize) -> GreenElement {
        if let Some(old) = self.pool.tokens.get(&(offset, kind)) {
            if old.text() == text {
                self.reused += 1;
                return NodeOrToken::Token(old.clone());
            }
        }
        NodeOrToken::Token(GreenToken::new(kind.into(), text))
    }

    pub(crate) fn node(
        &mut self,
        kind: SyntaxKind,
        children: Vec<GreenElement>,
        offset: TextSize,
    ) -> GreenNode {
        if let Some(candidates) = self.pool.nodes.get(&(offset, kind)) {
            if let Some(old) = candidates.iter().find(|old| same_children(old, &children)) {
                tracing::trace!(?kind, ?offset, "reused node");
                self.reused += 1;
                return old.clone();
            }
        }
        GreenNode::new(kind.into(), children)
    }
}

/// Child lists match when nodes are the same allocation and tokens are equal
fn same_children(old: &GreenNodeData, new: &[GreenElement]) -> bool {
    old.children().len() == new.len()
        && old.children().zip(new).all(|pair| match pair {
            (NodeOrToken::Node(old), NodeOrToken::Node(new)) => ptr::eq(old, &**new),
            (NodeOrToken::Token(old), NodeOrToken::Token(new)) => {
                old.kind() == new.kind() && old.text() == new.text()
            }
            _ => false,
        })
}
