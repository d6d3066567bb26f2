//! Parser options

/// Options controlling a [`Parser`](super::Parser)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// How many tokens error recovery may scan while looking for a token
    /// that lets the parse continue. Recovery never scans past the end of
    /// the current line.
    pub max_recovery_tokens: usize,
    /// Keep resumable snapshots at top-level line boundaries in the tree.
    /// Without them an incremental reparse starts from the beginning of the
    /// file, although unchanged subtrees are still shared.
    pub record_checkpoints: bool,
    /// Use the old tree when one is supplied (false = always parse from scratch)
    pub incremental: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_recovery_tokens: 1024,
            record_checkpoints: true,
            incremental: true,
        }
    }
}

impl ParseOptions {
    /// Options for one-shot parses that are never edited afterwards
    pub fn batch() -> Self {
        Self {
            record_checkpoints: false,
            incremental: false,
            ..Self::default()
        }
    }
}
