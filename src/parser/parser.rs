//! Parser front end
//!
//! [`Parser`] ties a [`Language`] to a set of [`ParseOptions`] and turns
//! text into a [`SyntaxTree`]. Given the previous tree and the edit that
//! produced the new text, it reparses incrementally; the result is the
//! same tree a parse from scratch would build.

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::engine::{Engine, Interrupt};
use super::incremental::{self, InputEdit};
use super::language::{GrammarLoadError, Language};
use super::options::ParseOptions;
use crate::syntax::SyntaxTree;

/// Failure of a parse call. Malformed input is never one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("parse was cancelled")]
    Cancelled,
}

/// Parses RGBASM text with one compiled grammar
///
/// Cheap to clone. A parser holds no per-parse state, so one instance can
/// serve any number of threads.
#[derive(Debug, Clone)]
pub struct Parser {
    language: Language,
    options: ParseOptions,
}

impl Parser {
    pub fn new(language: Language) -> Self {
        Self::with_options(language, ParseOptions::default())
    }

    pub fn with_options(language: Language, options: ParseOptions) -> Self {
        Self { language, options }
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse `text`. With `old`, `text` must be the old tree's text with
    /// the edit applied; an old tree that does not fit is ignored.
    ///
    /// # Panics
    ///
    /// Offsets are [`TextSize`](rowan::TextSize), a `u32`: `text` must be
    /// shorter than 4 GiB.
    pub fn parse(&self, text: &str, old: Option<(&SyntaxTree, &InputEdit)>) -> SyntaxTree {
        match self.run(text, old, ()) {
            Ok(tree) => tree,
            Err(never) => match never {},
        }
    }

    /// Like [`Parser::parse`], giving up once `cancel` is triggered.
    ///
    /// The token is checked before every token is lexed.
    pub fn parse_with_cancellation(
        &self,
        text: &str,
        old: Option<(&SyntaxTree, &InputEdit)>,
        cancel: &CancellationToken,
    ) -> Result<SyntaxTree, ParseError> {
        self.run(text, old, cancel)
    }

    fn run<I: Interrupt>(
        &self,
        text: &str,
        old: Option<(&SyntaxTree, &InputEdit)>,
        interrupt: I,
    ) -> Result<SyntaxTree, I::Error> {
        let table = self.language.table();
        let _span = tracing::debug_span!("parse", len = text.len(), edit = old.is_some()).entered();

        let resume = match old {
            Some((tree, edit)) if self.options.incremental => {
                match incremental::validate(tree, text, edit, table, &self.options) {
                    Ok(()) => Some(incremental::plan(tree, edit, &self.options)),
                    Err(error) => {
                        tracing::warn!(%error, "old tree does not match the edit, parsing from scratch");
                        None
                    }
                }
            }
            _ => None,
        };

        let engine = match resume {
            Some(resume) => Engine::resume(table, &self.options, text, interrupt, resume),
            None => Engine::new(table, &self.options, text, interrupt),
        };
        let output = engine.run()?;
        tracing::debug!(
            errors = output.errors.len(),
            checkpoints = output.checkpoints.len(),
            reused = output.reused,
            "parsed"
        );

        Ok(SyntaxTree::new(
            text,
            output.green,
            output.errors,
            output.checkpoints,
            table.grammar_version(),
            self.options.max_recovery_tokens,
        ))
    }
}

/// Parse RGBASM source with the shipped grammar
///
/// `text` must be shorter than 4 GiB; see [`Parser::parse`].
pub fn parse(text: &str) -> Result<SyntaxTree, GrammarLoadError> {
    Ok(Parser::new(Language::rgbasm()?).parse(text, None))
}

/// Reparse `text`, the text of `old` with `edit` applied
pub fn reparse(old: &SyntaxTree, text: &str, edit: &InputEdit) -> Result<SyntaxTree, GrammarLoadError> {
    Ok(Parser::new(Language::rgbasm()?).parse(text, Some((old, edit))))
}

/// Parse raw bytes; invalid UTF-8 sequences become U+FFFD first
///
/// The decoded text must be shorter than 4 GiB. Each invalid byte may grow
/// to three bytes of U+FFFD.
pub fn parse_bytes(bytes: &[u8]) -> Result<SyntaxTree, GrammarLoadError> {
    parse(&String::from_utf8_lossy(bytes))
}
