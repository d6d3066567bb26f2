//! Handle to a compiled RGBASM grammar
//!
//! The shipped grammar is compiled once per process on first use and shared
//! by every [`Language`] handle; cloning a handle is an `Arc` clone.

use std::sync::{Arc, LazyLock};

use thiserror::Error;

use super::grammar::{self, Grammar, GrammarError};
use super::table::{self, ParseTable};

/// Failure to obtain a usable parse table
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GrammarLoadError {
    #[error("table blob has schema version {found}, this build reads version {expected}")]
    SchemaMismatch { found: u16, expected: u16 },
    #[error("table was built for grammar version {found}, this build expects version {expected}")]
    GrammarVersionMismatch { found: u32, expected: u32 },
    #[error("malformed table blob: {0}")]
    Malformed(String),
    #[error("failed to encode table: {0}")]
    Encode(String),
    #[error("grammar construction failed: {0}")]
    Construction(#[from] GrammarError),
}

static RGBASM: LazyLock<Result<Language, GrammarLoadError>> = LazyLock::new(|| {
    let _span = tracing::debug_span!("compile_grammar").entered();
    let language = Language::from_grammar(&grammar::rgbasm()?)?;
    tracing::debug!(
        states = language.table.state_count(),
        productions = language.table.production_count(),
        "compiled RGBASM parse table"
    );
    Ok(language)
});

/// A compiled grammar, cheap to clone and safe to share between threads
#[derive(Debug, Clone)]
pub struct Language {
    table: Arc<ParseTable>,
}

impl Language {
    /// The RGBASM grammar shipped with this crate
    pub fn rgbasm() -> Result<Language, GrammarLoadError> {
        RGBASM.clone()
    }

    /// Compile an arbitrary grammar
    pub fn from_grammar(grammar: &Grammar) -> Result<Language, GrammarLoadError> {
        let table = table::build(grammar)?;
        Ok(Self::from_table(table))
    }

    /// Load a table persisted with [`Language::to_bytes`]
    #[cfg(feature = "persist")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Language, GrammarLoadError> {
        table::persist::from_bytes(bytes).map(Self::from_table)
    }

    /// Persist the compiled table as a versioned binary blob
    #[cfg(feature = "persist")]
    pub fn to_bytes(&self) -> Result<Vec<u8>, GrammarLoadError> {
        table::persist::to_bytes(&self.table)
    }

    pub fn grammar_version(&self) -> u32 {
        self.table.grammar_version()
    }

    pub fn table(&self) -> &ParseTable {
        &self.table
    }

    fn from_table(table: ParseTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.table, &other.table) || self.table == other.table
    }
}

impl Eq for Language {}
