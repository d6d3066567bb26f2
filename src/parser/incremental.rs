//! Incremental reparsing
//!
//! A parse records a [`Checkpoint`] at every top-level line boundary. At a
//! checkpoint the parse stack holds nothing but the lines before it, and no
//! later error recovery can reach back across it, so the text before a
//! checkpoint always parses the same way whatever follows.
//!
//! Reparsing after an edit therefore:
//! 1. resumes from the last checkpoint at or before the edit, taking the
//!    tree prefix, diagnostics and checkpoints of the old tree as they are;
//! 2. seeds a reuse pool with the old elements between that checkpoint and
//!    the next one after the edit, keyed by their offset in the new text;
//! 3. stops at the first new checkpoint past the edit that lines up with an
//!    old one and reattaches the old tree's remaining lines.

use rowan::{GreenNodeData, NodeOrToken, TextRange, TextSize};
use thiserror::Error;

use super::errors::SyntaxError;
use super::options::ParseOptions;
use super::table::ParseTable;
use super::tree_builder::{GreenElement, ReusePool, element_len, owned_children};
use crate::base::LineCol;
use crate::syntax::SyntaxTree;

/// Describes one text replacement
///
/// Offsets and points of `start` and `old_end` refer to the old text,
/// `new_end` to the new text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputEdit {
    pub start: TextSize,
    pub old_end: TextSize,
    pub new_end: TextSize,
    pub start_point: LineCol,
    pub old_end_point: LineCol,
    pub new_end_point: LineCol,
}

impl InputEdit {
    /// Edit replacing `range` of `old_text` with `replacement`
    pub fn replace(old_text: &str, range: TextRange, replacement: &str) -> Self {
        let prefix = old_text.get(..usize::from(range.start())).unwrap_or("");
        let removed = old_text.get(std::ops::Range::<usize>::from(range)).unwrap_or("");
        let start_point = LineCol::default().advance(prefix);
        Self {
            start: range.start(),
            old_end: range.end(),
            new_end: range.start() + TextSize::of(replacement),
            start_point,
            old_end_point: start_point.advance(removed),
            new_end_point: start_point.advance(replacement),
        }
    }

    pub fn insert(old_text: &str, offset: TextSize, text: &str) -> Self {
        Self::replace(old_text, TextRange::empty(offset), text)
    }

    pub fn delete(old_text: &str, range: TextRange) -> Self {
        Self::replace(old_text, range, "")
    }

    /// Change in text length
    pub fn delta(&self) -> i64 {
        i64::from(u32::from(self.new_end)) - i64::from(u32::from(self.old_end))
    }
}

/// Why an old tree cannot be reused for an edit
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("tree was built with grammar version {tree}, the parser uses version {parser}")]
    GrammarVersion { tree: u32, parser: u32 },
    #[error("edit range {start:?}..{old_end:?} is not inside the old text of length {len:?}")]
    OutOfBounds {
        start: TextSize,
        old_end: TextSize,
        len: TextSize,
    },
    #[error("edit ends at {new_end:?} before it starts at {start:?}")]
    Inverted { start: TextSize, new_end: TextSize },
    #[error("text has length {found:?}, the edit implies {expected:?}")]
    LengthMismatch { found: TextSize, expected: TextSize },
    #[error("tree was built with a recovery limit of {tree} tokens, the parser uses {parser}")]
    RecoveryLimit { tree: usize, parser: usize },
}

/// A resumable position in a finished parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pub(crate) offset: TextSize,
    pub(crate) line_col: LineCol,
    /// Diagnostics reported before this point
    pub(crate) errors_len: usize,
}

impl Checkpoint {
    /// Start of the first line after the checkpoint
    pub fn offset(&self) -> TextSize {
        self.offset
    }

    pub fn line_col(&self) -> LineCol {
        self.line_col
    }
}

/// Where and with what the engine starts a reparse
#[derive(Debug, Default)]
pub(crate) struct Resume<'t> {
    pub(crate) pool: ReusePool,
    pub(crate) splice: Option<Splice<'t>>,
    pub(crate) point: Option<ResumePoint>,
}

/// State of the old parse at a checkpoint
#[derive(Debug)]
pub(crate) struct ResumePoint {
    pub(crate) offset: TextSize,
    pub(crate) line_col: LineCol,
    pub(crate) children: Vec<GreenElement>,
    pub(crate) errors: Vec<SyntaxError>,
    pub(crate) checkpoints: Vec<Checkpoint>,
}

/// The part of an old tree that can be reattached unchanged
#[derive(Debug)]
pub(crate) struct Splice<'t> {
    old: &'t SyntaxTree,
    delta: i64,
    /// New checkpoints before this offset still see edited text
    min_offset: TextSize,
}

/// Old lines after a checkpoint, moved to new coordinates
#[derive(Debug)]
pub(crate) struct Tail {
    pub(crate) elements: Vec<GreenElement>,
    pub(crate) errors: Vec<SyntaxError>,
    pub(crate) checkpoints: Vec<Checkpoint>,
}

impl Splice<'_> {
    /// The old lines following `checkpoint`, if the old parse passed the
    /// same point of the unchanged text
    pub(crate) fn tail(&self, checkpoint: &Checkpoint) -> Option<Tail> {
        if checkpoint.offset < self.min_offset {
            return None;
        }
        let old_offset = shift(checkpoint.offset, -self.delta);
        let index = self
            .old
            .checkpoints
            .binary_search_by_key(&old_offset, |cp| cp.offset)
            .ok()?;
        let matched = self.old.checkpoints[index];

        let mut offset = TextSize::new(0);
        let mut elements = Vec::new();
        for child in owned_children(&self.old.green) {
            if offset >= old_offset {
                elements.push(child.clone());
            }
            offset += element_len(&child);
        }

        let errors = self.old.errors[matched.errors_len.min(self.old.errors.len())..]
            .iter()
            .cloned()
            .map(|error| error.shifted(self.delta))
            .collect();

        let line_delta = i64::from(checkpoint.line_col.line) - i64::from(matched.line_col.line);
        let checkpoints = self.old.checkpoints[index + 1..]
            .iter()
            .map(|cp| Checkpoint {
                offset: shift(cp.offset, self.delta),
                line_col: LineCol {
                    line: (i64::from(cp.line_col.line) + line_delta).max(0) as u32,
                    col: cp.line_col.col,
                },
                errors_len: cp.errors_len - matched.errors_len + checkpoint.errors_len,
            })
            .collect();

        Some(Tail {
            elements,
            errors,
            checkpoints,
        })
    }
}

/// Check that `old` describes the text before `edit` and fits the parser
pub(crate) fn validate(
    old: &SyntaxTree,
    text: &str,
    edit: &InputEdit,
    table: &ParseTable,
    options: &ParseOptions,
) -> Result<(), EditError> {
    if old.grammar_version != table.grammar_version() {
        return Err(EditError::GrammarVersion {
            tree: old.grammar_version,
            parser: table.grammar_version(),
        });
    }
    if old.recovery_limit != options.max_recovery_tokens {
        return Err(EditError::RecoveryLimit {
            tree: old.recovery_limit,
            parser: options.max_recovery_tokens,
        });
    }
    let old_len = old.text_len();
    if edit.start > edit.old_end || edit.old_end > old_len {
        return Err(EditError::OutOfBounds {
            start: edit.start,
            old_end: edit.old_end,
            len: old_len,
        });
    }
    if edit.start > edit.new_end {
        return Err(EditError::Inverted {
            start: edit.start,
            new_end: edit.new_end,
        });
    }
    let found = TextSize::of(text);
    let expected = shift(old_len, edit.delta());
    if found != expected {
        return Err(EditError::LengthMismatch { found, expected });
    }
    Ok(())
}

/// Work out where to resume and what can be shared
pub(crate) fn plan<'t>(old: &'t SyntaxTree, edit: &InputEdit, options: &ParseOptions) -> Resume<'t> {
    let delta = edit.delta();
    let checkpoints = if options.record_checkpoints {
        old.checkpoints.as_slice()
    } else {
        &[]
    };

    let resume_at = checkpoints.iter().rposition(|cp| cp.offset <= edit.start);
    let point = resume_at.map(|index| {
        let cp = checkpoints[index];
        let mut children = Vec::new();
        let mut offset = TextSize::new(0);
        for child in owned_children(&old.green) {
            if offset >= cp.offset {
                break;
            }
            offset += element_len(&child);
            children.push(child);
        }
        ResumePoint {
            offset: cp.offset,
            line_col: cp.line_col,
            children,
            errors: old.errors[..cp.errors_len.min(old.errors.len())].to_vec(),
            checkpoints: checkpoints[..=index].to_vec(),
        }
    });

    let window_start = point.as_ref().map_or(TextSize::new(0), |point| point.offset);
    let window_end = checkpoints
        .iter()
        .find(|cp| cp.offset >= edit.old_end)
        .map_or(old.text_len(), |cp| cp.offset);
    let mut pool = ReusePool::default();
    seed(
        &mut pool,
        &old.green,
        TextRange::new(window_start, window_end.max(window_start)),
        edit,
    );
    tracing::trace!(
        resume = ?point.as_ref().map(|point| point.offset),
        pooled = pool.len(),
        "planned reparse"
    );

    Resume {
        pool,
        splice: options.record_checkpoints.then_some(Splice {
            old,
            delta,
            min_offset: edit.new_end,
        }),
        point,
    }
}

/// Pool every old element in `window` that lies entirely before or entirely
/// after the edited range
fn seed(pool: &mut ReusePool, root: &GreenNodeData, window: TextRange, edit: &InputEdit) {
    let delta = edit.delta();
    let mut stack: Vec<(&GreenNodeData, TextSize)> = Vec::new();

    let mut offset = TextSize::new(0);
    for child in root.children() {
        let start = offset;
        offset += child_len(&child);
        if offset <= window.start() || start >= window.end() {
            continue;
        }
        visit(pool, child, start, edit, delta, &mut stack);
    }

    while let Some((node, start)) = stack.pop() {
        let mut offset = start;
        for child in node.children() {
            let child_start = offset;
            offset += child_len(&child);
            visit(pool, child, child_start, edit, delta, &mut stack);
        }
    }
}

fn visit<'n>(
    pool: &mut ReusePool,
    child: NodeOrToken<&'n GreenNodeData, &'n rowan::GreenTokenData>,
    start: TextSize,
    edit: &InputEdit,
    delta: i64,
    stack: &mut Vec<(&'n GreenNodeData, TextSize)>,
) {
    let end = start + child_len(&child);
    let new_offset = if end <= edit.start {
        Some(start)
    } else if start >= edit.old_end {
        Some(shift(start, delta))
    } else {
        None
    };
    match child {
        NodeOrToken::Node(node) => {
            if let Some(offset) = new_offset {
                pool.insert_node(offset, node.to_owned());
            }
            stack.push((node, start));
        }
        NodeOrToken::Token(token) => {
            if let Some(offset) = new_offset {
                pool.insert_token(offset, token.to_owned());
            }
        }
    }
}

fn child_len(child: &NodeOrToken<&GreenNodeData, &rowan::GreenTokenData>) -> TextSize {
    match child {
        NodeOrToken::Node(node) => node.text_len(),
        NodeOrToken::Token(token) => token.text_len(),
    }
}

fn shift(offset: TextSize, delta: i64) -> TextSize {
    TextSize::new((i64::from(u32::from(offset)) + delta).max(0) as u32)
}
