//! Compiled LALR(1) parse tables
//!
//! A [`ParseTable`] is built once from a [`Grammar`](super::grammar::Grammar)
//! and is immutable afterwards, so it can be shared between any number of
//! concurrent parses. With the `persist` feature it can be stored as a
//! versioned binary blob and loaded back without re-running construction.

mod lalr;
#[cfg(feature = "persist")]
pub(crate) mod persist;

pub use lalr::build;

use crate::parser::SyntaxKind;

/// A packed table entry
///
/// `0` is an error, `1` accepts, shifts and reductions keep their target in
/// the upper bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "persist", derive(serde::Serialize, serde::Deserialize))]
pub struct Action(u32);

/// Decoded form of [`Action`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Error,
    Accept,
    Shift(u32),
    Reduce(u32),
}

impl Action {
    pub const ERROR: Action = Action(0);
    pub const ACCEPT: Action = Action(1);

    pub fn shift(state: u32) -> Self {
        Action((state << 2) | 2)
    }

    pub fn reduce(production: u32) -> Self {
        Action((production << 2) | 3)
    }

    pub fn kind(self) -> ActionKind {
        match self.0 {
            0 => ActionKind::Error,
            1 => ActionKind::Accept,
            raw if raw & 3 == 2 => ActionKind::Shift(raw >> 2),
            raw => ActionKind::Reduce(raw >> 2),
        }
    }

    pub fn is_error(self) -> bool {
        self.0 == 0
    }
}

/// What a reduction builds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "persist", derive(serde::Serialize, serde::Deserialize))]
pub struct ProductionInfo {
    /// Nonterminal on the left-hand side
    pub lhs: u16,
    /// Number of stack entries popped
    pub len: u16,
    /// Node kind materialized, `None` for hidden rules
    pub kind: Option<SyntaxKind>,
}

/// Immutable LALR(1) tables for one grammar
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "persist", derive(serde::Serialize, serde::Deserialize))]
pub struct ParseTable {
    pub(crate) grammar_version: u32,
    pub(crate) n_terminals: u32,
    pub(crate) n_nonterminals: u32,
    /// `n_states * n_terminals` entries
    pub(crate) actions: Vec<Action>,
    /// `n_states * n_nonterminals` entries, target state plus one
    pub(crate) gotos: Vec<u32>,
    /// Production plus one, for states that reduce regardless of lookahead
    pub(crate) default_reductions: Vec<u32>,
    pub(crate) productions: Vec<ProductionInfo>,
    /// Innermost visible construct of each state, for diagnostics
    pub(crate) contexts: Vec<Option<SyntaxKind>>,
    /// State reached after a complete top-level line
    pub(crate) resume_state: Option<u32>,
    /// Tokens that may appear anywhere and are attached by the tree builder
    pub(crate) extras: Vec<SyntaxKind>,
}

/// Number of terminal columns: every token kind up to `EOF`
pub(crate) const N_TERMINALS: u32 = SyntaxKind::EOF as u32 + 1;

impl ParseTable {
    pub const START_STATE: u32 = 0;

    pub fn grammar_version(&self) -> u32 {
        self.grammar_version
    }

    pub fn state_count(&self) -> usize {
        self.default_reductions.len()
    }

    pub fn production_count(&self) -> usize {
        self.productions.len()
    }

    /// Action for `terminal` in `state`, honouring default reductions
    pub fn action(&self, state: u32, terminal: SyntaxKind) -> Action {
        if let Some(production) = self.default_reduction(state) {
            return Action::reduce(production);
        }
        self.explicit_action(state, terminal)
    }

    /// Action stored in the table cell, ignoring default reductions
    pub fn explicit_action(&self, state: u32, terminal: SyntaxKind) -> Action {
        let column = terminal as u32;
        if column >= self.n_terminals {
            return Action::ERROR;
        }
        self.actions[(state * self.n_terminals + column) as usize]
    }

    pub fn goto(&self, state: u32, nonterminal: u16) -> Option<u32> {
        let raw = self.gotos[(state * self.n_nonterminals + nonterminal as u32) as usize];
        raw.checked_sub(1)
    }

    pub fn default_reduction(&self, state: u32) -> Option<u32> {
        self.default_reductions[state as usize].checked_sub(1)
    }

    pub fn production(&self, production: u32) -> &ProductionInfo {
        &self.productions[production as usize]
    }

    pub fn context(&self, state: u32) -> Option<SyntaxKind> {
        self.contexts[state as usize]
    }

    pub fn resume_state(&self) -> Option<u32> {
        self.resume_state
    }

    /// Check if `kind` is an extra (trivia) rather than a grammar terminal
    pub fn is_extra(&self, kind: SyntaxKind) -> bool {
        self.extras.contains(&kind)
    }

    /// Terminals with a non-error entry in `state`
    pub fn expected(&self, state: u32) -> Vec<SyntaxKind> {
        SyntaxKind::ALL[..self.n_terminals as usize]
            .iter()
            .copied()
            .filter(|&kind| kind != SyntaxKind::ERROR)
            .filter(|&kind| !self.explicit_action(state, kind).is_error())
            .collect()
    }

    /// Check internal consistency so that lookups never index out of bounds.
    pub(crate) fn validate(&self) -> Result<(), String> {
        let n_states = self.state_count() as u32;
        if self.n_terminals != N_TERMINALS {
            return Err(format!(
                "table has {} terminal columns, expected {N_TERMINALS}",
                self.n_terminals
            ));
        }
        if self.actions.len() as u64 != n_states as u64 * self.n_terminals as u64 {
            return Err("action table has the wrong size".into());
        }
        if self.gotos.len() as u64 != n_states as u64 * self.n_nonterminals as u64 {
            return Err("goto table has the wrong size".into());
        }
        if self.contexts.len() != n_states as usize {
            return Err("state context table has the wrong size".into());
        }
        if n_states == 0 {
            return Err("table has no states".into());
        }
        for action in &self.actions {
            match action.kind() {
                ActionKind::Shift(s) if s >= n_states => {
                    return Err(format!("shift to unknown state {s}"));
                }
                ActionKind::Reduce(p) if p as usize >= self.productions.len() => {
                    return Err(format!("reduction by unknown production {p}"));
                }
                _ => {}
            }
        }
        if let Some(&bad) = self.gotos.iter().find(|&&g| g > n_states) {
            return Err(format!("goto to unknown state {}", bad - 1));
        }
        if let Some(&bad) = self
            .default_reductions
            .iter()
            .find(|&&p| p as usize > self.productions.len())
        {
            return Err(format!("default reduction by unknown production {}", bad - 1));
        }
        for production in &self.productions {
            if production.lhs as u32 >= self.n_nonterminals {
                return Err(format!("production for unknown nonterminal {}", production.lhs));
            }
            if production.kind.is_some_and(|k| !k.is_node()) {
                return Err(format!("production builds non-node kind {:?}", production.kind));
            }
        }
        if self.resume_state.is_some_and(|s| s >= n_states) {
            return Err("resume state out of range".into());
        }
        if let Some(bad) = self
            .extras
            .iter()
            .find(|k| !k.is_token() || matches!(k, SyntaxKind::NEWLINE | SyntaxKind::EOF | SyntaxKind::ERROR))
        {
            return Err(format!("{bad:?} cannot be an extra"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_packing() {
        assert_eq!(Action::ERROR.kind(), ActionKind::Error);
        assert_eq!(Action::ACCEPT.kind(), ActionKind::Accept);
        assert_eq!(Action::shift(0).kind(), ActionKind::Shift(0));
        assert_eq!(Action::shift(964).kind(), ActionKind::Shift(964));
        assert_eq!(Action::reduce(0).kind(), ActionKind::Reduce(0));
        assert_eq!(Action::reduce(662).kind(), ActionKind::Reduce(662));
        assert!(Action::default().is_error());
    }
}
