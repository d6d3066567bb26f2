//! LALR(1) table construction
//!
//! 1. Build the canonical LR(0) item sets.
//! 2. Compute kernel lookaheads by spontaneous generation and propagation.
//! 3. Fill the tables, resolving shift/reduce conflicts with yacc-style
//!    precedence. A shift on `ERROR` always wins; anything left unresolved
//!    fails the build.

use super::{Action, ActionKind, N_TERMINALS, ParseTable, ProductionInfo};
use crate::parser::SyntaxKind;
use crate::parser::grammar::{Assoc, GRAMMAR_VERSION, Grammar, GrammarError, Symbol};
use indexmap::IndexSet;
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct Item {
    production: u32,
    dot: u32,
}

impl Item {
    fn advance(self) -> Item {
        Item {
            production: self.production,
            dot: self.dot + 1,
        }
    }
}

/// Bit index marking "inherit the lookaheads of the seed item"
const PROPAGATE: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct TermSet([u64; 4]);

impl TermSet {
    fn insert(&mut self, t: usize) -> bool {
        let (word, bit) = (t / 64, 1u64 << (t % 64));
        let fresh = self.0[word] & bit == 0;
        self.0[word] |= bit;
        fresh
    }

    fn union(&mut self, other: &TermSet) -> bool {
        let mut changed = false;
        for (mine, theirs) in self.0.iter_mut().zip(other.0) {
            let merged = *mine | theirs;
            changed |= merged != *mine;
            *mine = merged;
        }
        changed
    }

    fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..256).filter(|&t| self.0[t / 64] & (1u64 << (t % 64)) != 0)
    }
}

struct Lr0 {
    kernels: Vec<Vec<Item>>,
    transitions: Vec<BTreeMap<Symbol, u32>>,
}

enum Resolution {
    Shift,
    Reduce,
    Error,
    Conflict,
}

/// The grammar plus an augmented start production `S' → start`
struct Augmented<'g> {
    grammar: &'g Grammar,
    productions: Vec<(u16, Vec<Symbol>)>,
    by_lhs: Vec<Vec<u32>>,
    accept: u32,
    nullable: Vec<bool>,
    first: Vec<TermSet>,
}

/// Compile `grammar` into LALR(1) tables
pub fn build(grammar: &Grammar) -> Result<ParseTable, GrammarError> {
    debug_assert!((N_TERMINALS as usize) < PROPAGATE);
    let augmented = Augmented::new(grammar);
    let lr0 = augmented.lr0();
    let lookaheads = augmented.lookaheads(&lr0);
    augmented.tables(&lr0, &lookaheads)
}

impl<'g> Augmented<'g> {
    fn new(grammar: &'g Grammar) -> Self {
        let aug = grammar.nonterminals.len() as u16;
        let mut productions: Vec<(u16, Vec<Symbol>)> = grammar
            .productions
            .iter()
            .map(|p| (p.lhs, p.rhs.clone()))
            .collect();
        productions.push((aug, vec![Symbol::NonTerminal(grammar.start)]));
        let accept = productions.len() as u32 - 1;

        let mut by_lhs = vec![Vec::new(); aug as usize + 1];
        for (i, (lhs, _)) in productions.iter().enumerate() {
            by_lhs[*lhs as usize].push(i as u32);
        }

        let mut this = Self {
            grammar,
            productions,
            by_lhs,
            accept,
            nullable: vec![false; aug as usize + 1],
            first: vec![TermSet::default(); aug as usize + 1],
        };
        this.compute_first();
        this
    }

    fn compute_first(&mut self) {
        let mut changed = true;
        while changed {
            changed = false;
            for (lhs, rhs) in &self.productions {
                let lhs = *lhs as usize;
                let (first, nullable) = self.first_of(rhs);
                changed |= self.first[lhs].union(&first);
                if nullable && !self.nullable[lhs] {
                    self.nullable[lhs] = true;
                    changed = true;
                }
            }
        }
    }

    /// FIRST set of a symbol string and whether it derives ε
    fn first_of(&self, symbols: &[Symbol]) -> (TermSet, bool) {
        let mut out = TermSet::default();
        for symbol in symbols {
            match *symbol {
                Symbol::Terminal(kind) => {
                    out.insert(kind as usize);
                    return (out, false);
                }
                Symbol::NonTerminal(nt) => {
                    out.union(&self.first[nt as usize]);
                    if !self.nullable[nt as usize] {
                        return (out, false);
                    }
                }
            }
        }
        (out, true)
    }

    fn next_symbol(&self, item: Item) -> Option<Symbol> {
        self.productions[item.production as usize]
            .1
            .get(item.dot as usize)
            .copied()
    }

    fn closure0(&self, kernel: &[Item]) -> Vec<Item> {
        let mut seen: FxHashSet<Item> = kernel.iter().copied().collect();
        let mut items = kernel.to_vec();
        let mut i = 0;
        while i < items.len() {
            if let Some(Symbol::NonTerminal(nt)) = self.next_symbol(items[i]) {
                for &production in &self.by_lhs[nt as usize] {
                    let item = Item { production, dot: 0 };
                    if seen.insert(item) {
                        items.push(item);
                    }
                }
            }
            i += 1;
        }
        items
    }

    fn closure1(&self, seeds: impl IntoIterator<Item = (Item, TermSet)>) -> Vec<(Item, TermSet)> {
        let mut index: FxHashMap<Item, usize> = FxHashMap::default();
        let mut items: Vec<(Item, TermSet)> = Vec::new();
        let mut work = Vec::new();
        for (item, lookahead) in seeds {
            index.insert(item, items.len());
            work.push(items.len());
            items.push((item, lookahead));
        }

        while let Some(i) = work.pop() {
            let (item, lookahead) = items[i];
            let rhs = &self.productions[item.production as usize].1;
            let Some(&Symbol::NonTerminal(nt)) = rhs.get(item.dot as usize) else {
                continue;
            };
            let (mut follow, nullable) = self.first_of(&rhs[item.dot as usize + 1..]);
            if nullable {
                follow.union(&lookahead);
            }
            for &production in &self.by_lhs[nt as usize] {
                let child = Item { production, dot: 0 };
                match index.get(&child) {
                    Some(&j) => {
                        if items[j].1.union(&follow) {
                            work.push(j);
                        }
                    }
                    None => {
                        index.insert(child, items.len());
                        work.push(items.len());
                        items.push((child, follow));
                    }
                }
            }
        }
        items
    }

    fn lr0(&self) -> Lr0 {
        let mut states: IndexSet<Vec<Item>> = IndexSet::new();
        states.insert(vec![Item {
            production: self.accept,
            dot: 0,
        }]);
        let mut transitions = Vec::new();

        let mut i = 0;
        while let Some(kernel) = states.get_index(i).cloned() {
            let mut groups: BTreeMap<Symbol, Vec<Item>> = BTreeMap::new();
            for item in self.closure0(&kernel) {
                if let Some(symbol) = self.next_symbol(item) {
                    groups.entry(symbol).or_default().push(item.advance());
                }
            }
            let mut row = BTreeMap::new();
            for (symbol, mut items) in groups {
                items.sort_unstable();
                items.dedup();
                let (target, _) = states.insert_full(items);
                row.insert(symbol, target as u32);
            }
            transitions.push(row);
            i += 1;
        }

        Lr0 {
            kernels: states.into_iter().collect(),
            transitions,
        }
    }

    fn lookaheads(&self, lr0: &Lr0) -> Vec<Vec<TermSet>> {
        let mut lookaheads: Vec<Vec<TermSet>> = lr0
            .kernels
            .iter()
            .map(|kernel| vec![TermSet::default(); kernel.len()])
            .collect();
        lookaheads[0][0].insert(SyntaxKind::EOF as usize);

        let mut links = Vec::new();
        for (state, kernel) in lr0.kernels.iter().enumerate() {
            for (k, &item) in kernel.iter().enumerate() {
                let mut seed = TermSet::default();
                seed.insert(PROPAGATE);
                for (closed, lookahead) in self.closure1([(item, seed)]) {
                    let Some(symbol) = self.next_symbol(closed) else {
                        continue;
                    };
                    let target = lr0.transitions[state][&symbol] as usize;
                    // The goto kernel was built from exactly these advanced items
                    let Ok(slot) = lr0.kernels[target].binary_search(&closed.advance()) else {
                        continue;
                    };
                    for t in lookahead.iter() {
                        if t == PROPAGATE {
                            links.push(((state, k), (target, slot)));
                        } else {
                            lookaheads[target][slot].insert(t);
                        }
                    }
                }
            }
        }

        let mut changed = true;
        while changed {
            changed = false;
            for &((from_state, from), (to_state, to)) in &links {
                let source = lookaheads[from_state][from];
                changed |= lookaheads[to_state][to].union(&source);
            }
        }
        lookaheads
    }

    fn resolve(&self, terminal: SyntaxKind, production: u32) -> Resolution {
        if terminal == SyntaxKind::ERROR {
            return Resolution::Shift;
        }
        let production_prec = if production == self.accept {
            None
        } else {
            self.grammar.production_precedence(production as usize)
        };
        let (Some(rule), Some(&(token, assoc))) =
            (production_prec, self.grammar.token_precedence.get(&terminal))
        else {
            return Resolution::Conflict;
        };
        match token.cmp(&rule) {
            Ordering::Greater => Resolution::Shift,
            Ordering::Less => Resolution::Reduce,
            Ordering::Equal => match assoc {
                Assoc::Left => Resolution::Reduce,
                Assoc::Right => Resolution::Shift,
                Assoc::NonAssoc => Resolution::Error,
            },
        }
    }

    fn describe(&self, production: u32) -> String {
        if production == self.accept {
            "S' → start".to_string()
        } else {
            self.grammar.describe(production as usize)
        }
    }

    fn tables(&self, lr0: &Lr0, lookaheads: &[Vec<TermSet>]) -> Result<ParseTable, GrammarError> {
        let n_states = lr0.kernels.len();
        let n_terminals = N_TERMINALS as usize;
        let n_nonterminals = self.by_lhs.len();

        let mut actions = vec![Action::ERROR; n_states * n_terminals];
        let mut gotos = vec![0u32; n_states * n_nonterminals];
        let mut default_reductions = vec![0u32; n_states];
        let mut contexts = Vec::with_capacity(n_states);
        let mut conflicts = Vec::new();
        let mut resolved = 0usize;

        for state in 0..n_states {
            let row = &mut actions[state * n_terminals..(state + 1) * n_terminals];
            for (&symbol, &target) in &lr0.transitions[state] {
                match symbol {
                    Symbol::Terminal(kind) => row[kind as usize] = Action::shift(target),
                    Symbol::NonTerminal(nt) => {
                        gotos[state * n_nonterminals + nt as usize] = target + 1;
                    }
                }
            }

            let kernel = &lr0.kernels[state];
            let seeds = kernel.iter().copied().zip(lookaheads[state].iter().copied());
            let mut completed: Vec<(Item, TermSet)> = self
                .closure1(seeds)
                .into_iter()
                .filter(|(item, _)| self.next_symbol(*item).is_none())
                .collect();
            completed.sort_unstable_by_key(|(item, _)| item.production);

            let mut nonassoc = TermSet::default();
            for (item, lookahead) in completed {
                let production = item.production;
                let reduce = if production == self.accept {
                    Action::ACCEPT
                } else {
                    Action::reduce(production)
                };
                for t in lookahead.iter() {
                    let terminal = SyntaxKind::ALL[t];
                    if nonassoc.0[t / 64] & (1u64 << (t % 64)) != 0 {
                        continue;
                    }
                    match row[t].kind() {
                        ActionKind::Error => row[t] = reduce,
                        ActionKind::Shift(_) => match self.resolve(terminal, production) {
                            Resolution::Shift => resolved += 1,
                            Resolution::Reduce => {
                                row[t] = reduce;
                                resolved += 1;
                            }
                            Resolution::Error => {
                                row[t] = Action::ERROR;
                                nonassoc.insert(t);
                                resolved += 1;
                            }
                            Resolution::Conflict => conflicts.push(format!(
                                "state {state}: shift/reduce on {terminal:?} against `{}`",
                                self.describe(production)
                            )),
                        },
                        ActionKind::Reduce(other) if other == production => {}
                        ActionKind::Reduce(other) => conflicts.push(format!(
                            "state {state}: reduce/reduce on {terminal:?} between `{}` and `{}`",
                            self.describe(other),
                            self.describe(production)
                        )),
                        ActionKind::Accept => conflicts.push(format!(
                            "state {state}: accept/reduce on {terminal:?} against `{}`",
                            self.describe(production)
                        )),
                    }
                }
            }

            // States whose only move is one reduction skip the lookahead
            let mut moves = row.iter().filter(|a| !a.is_error());
            if let Some(&first) = moves.next() {
                if let ActionKind::Reduce(production) = first.kind() {
                    if moves.all(|&a| a == first) {
                        default_reductions[state] = production + 1;
                    }
                }
            }

            contexts.push(kernel.iter().find_map(|item| {
                let (lhs, _) = &self.productions[item.production as usize];
                let kind = self.grammar.nonterminals.get(*lhs as usize)?.kind;
                (item.dot > 0).then_some(kind).flatten()
            }));
        }

        if !conflicts.is_empty() {
            tracing::error!(count = conflicts.len(), grammar = %self.grammar.name, "grammar conflicts");
            return Err(GrammarError::Conflicts(conflicts));
        }

        let productions = self
            .productions
            .iter()
            .map(|(lhs, rhs)| ProductionInfo {
                lhs: *lhs,
                len: rhs.len() as u16,
                kind: self
                    .grammar
                    .nonterminals
                    .get(*lhs as usize)
                    .and_then(|nt| nt.kind),
            })
            .collect();

        let resume_state = self
            .grammar
            .resume_point
            .and_then(|nt| lr0.transitions[0].get(&Symbol::NonTerminal(nt)).copied());

        tracing::debug!(
            grammar = %self.grammar.name,
            states = n_states,
            resolved,
            default_reductions = default_reductions.iter().filter(|&&d| d != 0).count(),
            "built LALR(1) table"
        );

        Ok(ParseTable {
            grammar_version: GRAMMAR_VERSION,
            n_terminals: N_TERMINALS,
            n_nonterminals: n_nonterminals as u32,
            actions,
            gotos,
            default_reductions,
            productions,
            contexts,
            resume_state,
            extras: self.grammar.extras.clone(),
        })
    }
}
