//! Declarative grammar description
//!
//! Grammars are written with a small tree-sitter-like DSL ([`Rule`]) and
//! desugared into flat [`Production`]s that the LALR table builder consumes.
//!
//! Named rules come in two flavours:
//! - **visible** rules are keyed by a [`SyntaxKind`] and materialize a node
//!   of that kind in the CST;
//! - **hidden** rules (names starting with `_`) splice their children into
//!   the parent node.
//!
//! Extras (trivia) never appear in productions; the tree builder attaches
//! them to the next significant token.

mod expressions;
mod rgbasm;

pub use rgbasm::rgbasm;

use crate::parser::SyntaxKind;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use thiserror::Error;

/// Bump whenever the grammar or the lexer policy changes shape.
///
/// Persisted tables and trees carry this tag; mismatches are rejected.
pub const GRAMMAR_VERSION: u32 = 1;

/// Associativity of a precedence level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "persist", derive(serde::Serialize, serde::Deserialize))]
pub enum Assoc {
    Left,
    Right,
    NonAssoc,
}

/// Grammar rule variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Epsilon (empty match).
    Blank,
    /// A terminal token kind.
    Token(SyntaxKind),
    /// Reference to a visible rule.
    Node(SyntaxKind),
    /// Reference to a hidden rule.
    Symbol(SmolStr),
    /// Sequence of rules (must match in order).
    Seq(Vec<Rule>),
    /// Alternation.
    Choice(Vec<Rule>),
    /// Zero or one occurrence.
    Optional(Box<Rule>),
    /// Zero or more repetitions.
    Repeat(Box<Rule>),
    /// One or more repetitions.
    Repeat1(Box<Rule>),
    /// Explicit precedence level for every production of `content`.
    Prec { level: u8, content: Box<Rule> },
}

pub fn blank() -> Rule {
    Rule::Blank
}

pub fn tok(kind: SyntaxKind) -> Rule {
    Rule::Token(kind)
}

pub fn node(kind: SyntaxKind) -> Rule {
    Rule::Node(kind)
}

pub fn sym(name: &str) -> Rule {
    Rule::Symbol(SmolStr::new(name))
}

pub fn seq(rules: impl IntoIterator<Item = Rule>) -> Rule {
    Rule::Seq(rules.into_iter().collect())
}

pub fn choice(rules: impl IntoIterator<Item = Rule>) -> Rule {
    Rule::Choice(rules.into_iter().collect())
}

/// Choice over plain tokens
pub fn one_of(kinds: &[SyntaxKind]) -> Rule {
    choice(kinds.iter().copied().map(tok))
}

pub fn opt(rule: Rule) -> Rule {
    Rule::Optional(Box::new(rule))
}

pub fn repeat(rule: Rule) -> Rule {
    Rule::Repeat(Box::new(rule))
}

pub fn repeat1(rule: Rule) -> Rule {
    Rule::Repeat1(Box::new(rule))
}

pub fn prec(level: u8, rule: Rule) -> Rule {
    Rule::Prec {
        level,
        content: Box::new(rule),
    }
}

/// A grammar symbol after desugaring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Terminal(SyntaxKind),
    NonTerminal(u16),
}

/// A flat production `lhs → rhs`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub lhs: u16,
    pub rhs: Vec<Symbol>,
    /// Explicit precedence; otherwise the last terminal with one decides
    pub prec: Option<u8>,
}

/// A named nonterminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonTerminal {
    pub name: SmolStr,
    /// Node kind for visible rules, `None` for hidden ones
    pub kind: Option<SyntaxKind>,
}

/// Desugared grammar, ready for table construction
#[derive(Debug, Clone)]
pub struct Grammar {
    pub name: SmolStr,
    pub nonterminals: Vec<NonTerminal>,
    pub productions: Vec<Production>,
    pub start: u16,
    /// Nonterminal after which the parse may be checkpointed
    pub resume_point: Option<u16>,
    pub extras: Vec<SyntaxKind>,
    pub token_precedence: FxHashMap<SyntaxKind, (u8, Assoc)>,
    pub level_assoc: Vec<Assoc>,
}

impl Grammar {
    /// Display name of a symbol, used in conflict reports
    pub fn symbol_name(&self, symbol: Symbol) -> String {
        match symbol {
            Symbol::Terminal(kind) => format!("{kind:?}"),
            Symbol::NonTerminal(id) => self.nonterminals[id as usize].name.to_string(),
        }
    }

    /// Render a production as `lhs → a b c`
    pub fn describe(&self, production: usize) -> String {
        let p = &self.productions[production];
        let mut out = format!("{} →", self.nonterminals[p.lhs as usize].name);
        if p.rhs.is_empty() {
            out.push_str(" ε");
        }
        for symbol in &p.rhs {
            out.push(' ');
            out.push_str(&self.symbol_name(*symbol));
        }
        out
    }

    /// Effective precedence of a production (yacc rules)
    pub fn production_precedence(&self, production: usize) -> Option<u8> {
        let p = &self.productions[production];
        p.prec.or_else(|| {
            p.rhs.iter().rev().find_map(|symbol| match symbol {
                Symbol::Terminal(kind) => self.token_precedence.get(kind).map(|&(level, _)| level),
                Symbol::NonTerminal(_) => None,
            })
        })
    }

    pub fn nonterminal_by_name(&self, name: &str) -> Option<u16> {
        self.nonterminals
            .iter()
            .position(|nt| nt.name == name)
            .map(|i| i as u16)
    }
}

/// Errors raised while desugaring or compiling a grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("rule `{0}` is referenced but never defined")]
    UndefinedRule(SmolStr),
    #[error("rule `{0}` is defined twice")]
    DuplicateRule(SmolStr),
    #[error("grammar has no start rule")]
    NoStart,
    #[error("token {0:?} cannot be used as a terminal")]
    InvalidTerminal(SyntaxKind),
    #[error("grammar has {} unresolved conflicts:\n{}", .0.len(), .0.join("\n"))]
    Conflicts(Vec<String>),
}

/// Collects named rules and precedence declarations
#[derive(Debug, Clone)]
pub struct GrammarBuilder {
    name: SmolStr,
    rules: IndexMap<SmolStr, (Option<SyntaxKind>, Rule)>,
    start: Option<SmolStr>,
    resume_point: Option<SmolStr>,
    extras: Vec<SyntaxKind>,
    precedences: Vec<(Assoc, Vec<SyntaxKind>)>,
}

impl GrammarBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: SmolStr::new(name),
            rules: IndexMap::new(),
            start: None,
            resume_point: None,
            extras: Vec::new(),
            precedences: Vec::new(),
        }
    }

    /// Declare the next (higher) precedence level and return it.
    ///
    /// Levels declared later bind tighter, as in yacc.
    pub fn precedence(&mut self, assoc: Assoc, tokens: &[SyntaxKind]) -> u8 {
        self.precedences.push((assoc, tokens.to_vec()));
        self.precedences.len() as u8
    }

    pub fn extras(&mut self, kinds: &[SyntaxKind]) {
        self.extras.extend_from_slice(kinds);
    }

    pub fn start(&mut self, name: &str) {
        self.start = Some(SmolStr::new(name));
    }

    pub fn resume_point(&mut self, name: &str) {
        self.resume_point = Some(SmolStr::new(name));
    }

    /// Define a visible rule materializing nodes of `kind`
    pub fn node(&mut self, kind: SyntaxKind, rule: Rule) -> &mut Self {
        self.define(SmolStr::new(format!("{kind:?}")), Some(kind), rule)
    }

    /// Define a hidden rule whose children are spliced into the parent
    pub fn hidden(&mut self, name: &str, rule: Rule) -> &mut Self {
        debug_assert!(name.starts_with('_'), "hidden rules start with '_'");
        self.define(SmolStr::new(name), None, rule)
    }

    fn define(&mut self, name: SmolStr, kind: Option<SyntaxKind>, rule: Rule) -> &mut Self {
        if self.rules.contains_key(&name) {
            // Reported by `build`
            self.rules.insert(SmolStr::new(format!("{name}\0dup")), (kind, rule));
        } else {
            self.rules.insert(name, (kind, rule));
        }
        self
    }

    /// Desugar every rule into flat productions
    pub fn build(self) -> Result<Grammar, GrammarError> {
        if let Some(dup) = self.rules.keys().find_map(|k| k.strip_suffix("\0dup")) {
            return Err(GrammarError::DuplicateRule(SmolStr::new(dup)));
        }

        let mut token_precedence = FxHashMap::default();
        let mut level_assoc = vec![Assoc::NonAssoc];
        for (i, (assoc, tokens)) in self.precedences.iter().enumerate() {
            level_assoc.push(*assoc);
            for &kind in tokens {
                token_precedence.insert(kind, (i as u8 + 1, *assoc));
            }
        }

        let mut desugar = Desugar {
            nonterminals: self
                .rules
                .iter()
                .map(|(name, (kind, _))| NonTerminal {
                    name: name.clone(),
                    kind: *kind,
                })
                .collect(),
            ids: self
                .rules
                .keys()
                .enumerate()
                .map(|(i, name)| (name.clone(), i as u16))
                .collect(),
            productions: Vec::new(),
        };

        for (i, (_, rule)) in self.rules.values().enumerate() {
            let alternatives = desugar.expand(i as u16, rule)?;
            for alt in alternatives {
                desugar.productions.push(Production {
                    lhs: i as u16,
                    rhs: alt.symbols,
                    prec: alt.prec,
                });
            }
        }

        let start_name = self.start.ok_or(GrammarError::NoStart)?;
        let start = desugar.lookup(&start_name)?;
        let resume_point = self
            .resume_point
            .map(|name| desugar.lookup(&name))
            .transpose()?;

        tracing::debug!(
            grammar = %self.name,
            nonterminals = desugar.nonterminals.len(),
            productions = desugar.productions.len(),
            "desugared grammar"
        );

        Ok(Grammar {
            name: self.name,
            nonterminals: desugar.nonterminals,
            productions: desugar.productions,
            start,
            resume_point,
            extras: self.extras,
            token_precedence,
            level_assoc,
        })
    }
}

/// One flattened alternative of a rule
#[derive(Debug, Clone, Default)]
struct Alternative {
    symbols: Vec<Symbol>,
    prec: Option<u8>,
}

struct Desugar {
    nonterminals: Vec<NonTerminal>,
    ids: FxHashMap<SmolStr, u16>,
    productions: Vec<Production>,
}

impl Desugar {
    fn lookup(&self, name: &str) -> Result<u16, GrammarError> {
        self.ids
            .get(name)
            .copied()
            .ok_or_else(|| GrammarError::UndefinedRule(SmolStr::new(name)))
    }

    fn expand(&mut self, owner: u16, rule: &Rule) -> Result<Vec<Alternative>, GrammarError> {
        Ok(match rule {
            Rule::Blank => vec![Alternative::default()],
            Rule::Token(kind) => {
                if !kind.is_token() || kind.is_trivia() {
                    return Err(GrammarError::InvalidTerminal(*kind));
                }
                vec![Alternative {
                    symbols: vec![Symbol::Terminal(*kind)],
                    prec: None,
                }]
            }
            Rule::Node(kind) => vec![Alternative {
                symbols: vec![Symbol::NonTerminal(self.lookup(&format!("{kind:?}"))?)],
                prec: None,
            }],
            Rule::Symbol(name) => vec![Alternative {
                symbols: vec![Symbol::NonTerminal(self.lookup(name)?)],
                prec: None,
            }],
            Rule::Seq(parts) => {
                let mut acc = vec![Alternative::default()];
                for part in parts {
                    let expanded = self.expand(owner, part)?;
                    let mut next = Vec::with_capacity(acc.len() * expanded.len());
                    for prefix in &acc {
                        for suffix in &expanded {
                            let mut symbols = prefix.symbols.clone();
                            symbols.extend_from_slice(&suffix.symbols);
                            next.push(Alternative {
                                symbols,
                                prec: suffix.prec.or(prefix.prec),
                            });
                        }
                    }
                    acc = next;
                }
                acc
            }
            Rule::Choice(options) => {
                let mut acc = Vec::new();
                for option in options {
                    acc.extend(self.expand(owner, option)?);
                }
                acc
            }
            Rule::Optional(inner) => {
                let mut acc = self.expand(owner, inner)?;
                acc.push(Alternative::default());
                acc
            }
            Rule::Repeat(inner) => {
                let mut acc = self.expand_repeat1(owner, inner)?;
                acc.push(Alternative::default());
                acc
            }
            Rule::Repeat1(inner) => self.expand_repeat1(owner, inner)?,
            Rule::Prec { level, content } => {
                let mut acc = self.expand(owner, content)?;
                for alt in &mut acc {
                    alt.prec = Some(*level);
                }
                acc
            }
        })
    }

    /// `x+` becomes a fresh hidden, left-recursive nonterminal
    fn expand_repeat1(&mut self, owner: u16, inner: &Rule) -> Result<Vec<Alternative>, GrammarError> {
        let id = self.nonterminals.len() as u16;
        let name = SmolStr::new(format!(
            "{}_repeat{}",
            self.nonterminals[owner as usize].name.trim_start_matches('_'),
            id
        ));
        self.nonterminals.push(NonTerminal {
            name: SmolStr::new(format!("_{name}")),
            kind: None,
        });

        for alt in self.expand(owner, inner)? {
            self.productions.push(Production {
                lhs: id,
                rhs: alt.symbols.clone(),
                prec: alt.prec,
            });
            let mut symbols = vec![Symbol::NonTerminal(id)];
            symbols.extend(alt.symbols);
            self.productions.push(Production {
                lhs: id,
                rhs: symbols,
                prec: alt.prec,
            });
        }

        Ok(vec![Alternative {
            symbols: vec![Symbol::NonTerminal(id)],
            prec: None,
        }])
    }
}
