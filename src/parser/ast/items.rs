//! Lines, labels, instructions, macro invocations and block constructs

use super::*;

/// Items of a block body: every child node after the header line
fn body_items(node: &SyntaxNode) -> impl Iterator<Item = Item> + use<> {
    node.children_with_tokens()
        .skip_while(|e| e.kind() != SyntaxKind::NEWLINE)
        .filter_map(|e| e.into_node())
        .filter_map(Item::cast)
}

/// Generates `items()` for nodes that own a body of lines
macro_rules! body_method {
    () => {
        /// Labels, statements and error regions of the body, in order.
        pub fn items(&self) -> impl Iterator<Item = Item> + use<> {
            body_items(&self.0)
        }
    };
}

// ============================================================================
// Source file
// ============================================================================

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    /// Top-level labels, statements and error regions, in order.
    pub fn items(&self) -> impl Iterator<Item = Item> + '_ {
        self.0.children().filter_map(Item::cast)
    }

    children_method!(labels, Label);
    descendants_method!(
        instructions,
        Instruction,
        "Get every instruction in the file, including those inside blocks."
    );
    descendants_method!(
        macro_defs,
        MacroDef,
        "Get every macro definition in the file."
    );
}

/// One element of a line sequence
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Item {
    Label(Label),
    Statement(Statement),
    Error(ErrorNode),
}

impl AstNode for Item {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(kind, SyntaxKind::LABEL | SyntaxKind::ERROR) || Statement::can_cast(kind)
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::LABEL => Some(Self::Label(Label(node))),
            SyntaxKind::ERROR => Some(Self::Error(ErrorNode(node))),
            _ => Statement::cast(node).map(Self::Statement),
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Label(it) => it.syntax(),
            Self::Statement(it) => it.syntax(),
            Self::Error(it) => it.syntax(),
        }
    }
}

/// Anything that can follow a label on a line
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Statement {
    Instruction(Instruction),
    MacroCall(MacroCall),
    Block(Block),
    Directive(Directive),
}

impl AstNode for Statement {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(kind, SyntaxKind::INSTRUCTION | SyntaxKind::MACRO_CALL)
            || Block::can_cast(kind)
            || Directive::can_cast(kind)
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::INSTRUCTION => Some(Self::Instruction(Instruction(node))),
            SyntaxKind::MACRO_CALL => Some(Self::MacroCall(MacroCall(node))),
            kind if Block::can_cast(kind) => Block::cast(node).map(Self::Block),
            _ => Directive::cast(node).map(Self::Directive),
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Instruction(it) => it.syntax(),
            Self::MacroCall(it) => it.syntax(),
            Self::Block(it) => it.syntax(),
            Self::Directive(it) => it.syntax(),
        }
    }
}

ast_node!(ErrorNode, ERROR);

impl ErrorNode {
    pub fn text(&self) -> String {
        self.0.text().to_string()
    }
}

// ============================================================================
// Labels
// ============================================================================

ast_node!(Label, LABEL);

impl Label {
    find_token_method!(name, [IDENT, LOCAL_IDENT], "The label name, absent for an anonymous label.");
    has_token_method!(is_exported, COLON_COLON, "Main::");
    has_token_method!(is_local, LOCAL_IDENT, ".loop");

    /// Check if this is an anonymous label (a lone `:`).
    pub fn is_anonymous(&self) -> bool {
        self.name().is_none()
    }
}

// ============================================================================
// Instructions
// ============================================================================

ast_node!(Instruction, INSTRUCTION);

impl Instruction {
    find_token_method!(mnemonic, [MNEMONIC, RL_KW], "The mnemonic token as written.");

    /// The mnemonic, lowercased. Mnemonics are case-insensitive.
    pub fn mnemonic_name(&self) -> Option<String> {
        self.mnemonic().map(|t| t.text().to_ascii_lowercase())
    }

    /// Operands in order. Commas separate operands; a missing operand
    /// between two commas is skipped.
    pub fn operands(&self) -> Vec<Operand> {
        let mut operands = Vec::new();
        let mut segment = Vec::new();
        let elements = self
            .0
            .children_with_tokens()
            .filter(|e| !e.kind().is_trivia())
            .skip(1);
        for element in elements {
            if element.kind() == SyntaxKind::COMMA {
                operands.extend(Operand::from_segment(&segment));
                segment.clear();
            } else {
                segment.push(element);
            }
        }
        operands.extend(Operand::from_segment(&segment));
        operands
    }
}

/// One instruction operand
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    /// `a`, `hl`, `hli`, ...
    Register(SyntaxToken),
    /// `z`, `nz`, `nc`. A bare `c` lexes as a register.
    Condition(SyntaxToken),
    /// `sp`, optionally with a signed offset as in `ld hl, sp + 4`
    StackPointer {
        offset: Option<Expr>,
        negative: bool,
    },
    Memory(MemOperand),
    Expr(Expr),
    Error(ErrorNode),
}

impl Operand {
    fn from_segment(segment: &[SyntaxElement]) -> Option<Self> {
        let first = segment.first()?;
        match first {
            rowan::NodeOrToken::Token(token) => match token.kind() {
                SyntaxKind::REGISTER => Some(Self::Register(token.clone())),
                SyntaxKind::CONDITION => Some(Self::Condition(token.clone())),
                SyntaxKind::SP_KW => Some(Self::StackPointer {
                    offset: segment
                        .iter()
                        .filter_map(|e| e.as_node())
                        .find_map(|n| Expr::cast(n.clone())),
                    negative: segment.iter().any(|e| e.kind() == SyntaxKind::MINUS),
                }),
                _ => None,
            },
            rowan::NodeOrToken::Node(node) => match node.kind() {
                SyntaxKind::MEM_OPERAND => Some(Self::Memory(MemOperand(node.clone()))),
                SyntaxKind::ERROR => Some(Self::Error(ErrorNode(node.clone()))),
                _ => Expr::cast(node.clone()).map(Self::Expr),
            },
        }
    }
}

ast_node!(MemOperand, MEM_OPERAND);

impl MemOperand {
    find_token_method!(register, [REGISTER], "The register, as in `[hl]` or `[$ff00 + c]`.");
    first_child_method!(address, Expr);

    /// Check if this is a register form like `[hl+]` rather than `[$ff00 + c]`.
    pub fn is_indirect_register(&self) -> bool {
        self.0
            .children_with_tokens()
            .filter(|e| !e.kind().is_trivia())
            .nth(1)
            .is_some_and(|e| e.kind() == SyntaxKind::REGISTER)
    }

    /// `[hl+]`
    pub fn is_post_increment(&self) -> bool {
        self.is_indirect_register() && has_token(&self.0, SyntaxKind::PLUS)
    }

    /// `[hl-]`
    pub fn is_post_decrement(&self) -> bool {
        self.is_indirect_register() && has_token(&self.0, SyntaxKind::MINUS)
    }
}

// ============================================================================
// Macro invocations
// ============================================================================

ast_node!(MacroCall, MACRO_CALL);

impl MacroCall {
    find_token_method!(name, [IDENT], "The invoked macro name.");
    children_method!(args, RawArg);
}

ast_node!(RawArg, RAW_ARG);

impl RawArg {
    /// The argument exactly as written, inner whitespace included
    pub fn text(&self) -> String {
        self.0.text().to_string()
    }
}

// ============================================================================
// Blocks
// ============================================================================

ast_enum!(
    /// A construct that owns the lines up to its terminator
    Block {
        MacroDef(MACRO_DEF),
        ReptBlock(REPT_BLOCK),
        ForBlock(FOR_BLOCK),
        IfBlock(IF_BLOCK),
    }
);

impl Block {
    /// The opening keyword token (`MACRO`, `REPT`, `FOR`, `IF`)
    pub fn keyword(&self) -> Option<SyntaxToken> {
        self.syntax().first_token()
    }

    pub fn items(&self) -> impl Iterator<Item = Item> + use<> {
        body_items(self.syntax())
    }
}

ast_node!(MacroDef, MACRO_DEF);

impl MacroDef {
    find_token_method!(name, [IDENT], "The macro name following `MACRO`.");
    find_token_method!(end_keyword, [ENDM_KW], "The closing `ENDM`.");
    body_method!();
}

ast_node!(ReptBlock, REPT_BLOCK);

impl ReptBlock {
    first_child_method!(count, Expr);
    find_token_method!(end_keyword, [ENDR_KW], "The closing `ENDR`.");
    body_method!();
}

ast_node!(ForBlock, FOR_BLOCK);

impl ForBlock {
    find_token_method!(variable, [IDENT], "The loop variable.");
    find_token_method!(end_keyword, [ENDR_KW], "The closing `ENDR`.");
    body_method!();

    /// Range arguments as written: `stop`, `start, stop` or
    /// `start, stop, step`.
    pub fn args(&self) -> Vec<Expr> {
        self.0.children().filter_map(Expr::cast).collect()
    }

    /// The first value of the loop variable, when given explicitly
    pub fn start(&self) -> Option<Expr> {
        let args = self.args();
        if args.len() >= 2 { args.into_iter().next() } else { None }
    }

    pub fn stop(&self) -> Option<Expr> {
        let mut args = self.args();
        match args.len() {
            1 => args.pop(),
            n if n >= 2 => args.into_iter().nth(1),
            _ => None,
        }
    }

    pub fn step(&self) -> Option<Expr> {
        self.args().into_iter().nth(2)
    }
}

ast_node!(IfBlock, IF_BLOCK);

impl IfBlock {
    first_child_method!(condition, Expr);
    children_method!(elif_clauses, ElifClause);
    first_child_method!(else_clause, ElseClause);
    find_token_method!(end_keyword, [ENDC_KW], "The closing `ENDC`.");
    body_method!();
}

ast_node!(ElifClause, ELIF_CLAUSE);

impl ElifClause {
    first_child_method!(condition, Expr);
    body_method!();
}

ast_node!(ElseClause, ELSE_CLAUSE);

impl ElseClause {
    body_method!();
}
