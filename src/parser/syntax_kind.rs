//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in the syntax tree.
//! It follows the RGBASM grammar structure: tokens first, then the node
//! kinds produced by visible grammar rules.

/// All syntax kinds (tokens and nodes) in RGBASM
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation).
/// Nodes are composite (labels, instructions, directives, expressions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "persist", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    COMMENT,            // ; to end of line
    BLOCK_COMMENT,      // /* ... */
    LINE_CONT,          // \ followed by newline

    /// End of a logical line; significant, unlike other whitespace
    NEWLINE,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,              // Label, #raw
    LOCAL_IDENT,        // .loop, Label.loop
    DEC_NUMBER,         // 42, 1_000
    HEX_NUMBER,         // $FF, 0xFF
    BIN_NUMBER,         // %1010, 0b1010
    OCT_NUMBER,         // &17, 0o17
    GFX_NUMBER,         // `0123
    FIXED_NUMBER,       // 1.5, 1.5q8
    STRING,             // "text", """text""", #"raw"
    CHAR,               // 'A'
    MACRO_ARG,          // \1, \@, \#, \<name>
    ANON_LABEL_REF,     // :+, :--

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    COMMA,              // ,
    COLON,              // :
    COLON_COLON,        // ::
    L_PAREN,            // (
    R_PAREN,            // )
    L_BRACKET,          // [
    R_BRACKET,          // ]
    AT,                 // @

    // =========================================================================
    // OPERATORS
    // =========================================================================
    PLUS,               // +
    MINUS,              // -
    STAR,               // *
    SLASH,              // /
    PERCENT,            // %
    STAR_STAR,          // **
    SHL,                // <<
    SHR,                // >>
    USHR,               // >>>
    AMP,                // &
    PIPE,               // |
    CARET,              // ^
    TILDE,              // ~
    BANG,               // !
    AMP_AMP,            // &&
    PIPE_PIPE,          // ||
    EQ_EQ,              // ==
    BANG_EQ,            // !=
    LT,                 // <
    GT,                 // >
    LT_EQ,              // <=
    GT_EQ,              // >=
    PLUS_PLUS,          // ++
    EQ,                 // =
    PLUS_EQ,            // +=
    MINUS_EQ,           // -=
    STAR_EQ,            // *=
    SLASH_EQ,           // /=
    PERCENT_EQ,         // %=
    AMP_EQ,             // &=
    PIPE_EQ,            // |=
    CARET_EQ,           // ^=
    SHL_EQ,             // <<=
    SHR_EQ,             // >>=

    // =========================================================================
    // KEYWORD CLASSES - CPU
    // =========================================================================
    MNEMONIC,           // nop, ld, jp, ...
    REGISTER,           // a, b, hl, hli, ...
    SP_KW,              // sp
    CONDITION,          // nz, z, nc
    SECTION_TYPE,       // ROM0, ROMX, WRAM0, ...

    // =========================================================================
    // KEYWORDS - directives
    // =========================================================================
    MACRO_KW,
    ENDM_KW,
    REPT_KW,
    FOR_KW,
    ENDR_KW,
    BREAK_KW,
    INCLUDE_KW,
    IF_KW,
    ELIF_KW,
    ELSE_KW,
    ENDC_KW,
    DEF_KW,
    REDEF_KW,
    EQU_KW,
    EQUS_KW,
    RB_KW,
    RW_KW,
    /// `rl` is both the rotate mnemonic and the long-word RS directive
    RL_KW,
    PRINT_KW,
    PRINTLN_KW,
    EXPORT_KW,
    DB_KW,
    DW_KW,
    DL_KW,
    DS_KW,
    SECTION_KW,
    PUSHS_KW,
    POPS_KW,
    ENDSECTION_KW,
    LOAD_KW,
    ENDL_KW,
    FRAGMENT_KW,
    UNION_KW,
    NEXTU_KW,
    ENDU_KW,
    RSRESET_KW,
    RSSET_KW,
    INCBIN_KW,
    CHARMAP_KW,
    NEWCHARMAP_KW,
    SETCHARMAP_KW,
    PUSHC_KW,
    POPC_KW,
    SHIFT_KW,
    FAIL_KW,
    WARN_KW,
    FATAL_KW,
    ASSERT_KW,
    STATIC_ASSERT_KW,
    PURGE_KW,
    OPT_KW,
    PUSHO_KW,
    POPO_KW,
    ALIGN_KW,
    BANK_KW,

    // =========================================================================
    // SPECIAL
    // =========================================================================
    /// Unrecognized input; never a hard failure
    UNKNOWN,
    /// Recovered region. Also the `error` terminal of the grammar.
    ERROR,
    /// End of input (zero width, never stored in the tree)
    EOF,

    // =========================================================================
    // NODES - structure
    // =========================================================================
    SOURCE_FILE,
    LABEL,
    INSTRUCTION,
    MEM_OPERAND,
    MACRO_CALL,
    RAW_ARG,

    // Blocks
    MACRO_DEF,
    REPT_BLOCK,
    FOR_BLOCK,
    IF_BLOCK,
    ELIF_CLAUSE,
    ELSE_CLAUSE,

    // Directives
    INCLUDE_DIRECTIVE,
    SYMBOL_DEF,
    PRINT_DIRECTIVE,
    EXPORT_DIRECTIVE,
    DATA_DIRECTIVE,
    DS_DIRECTIVE,
    SECTION_DIRECTIVE,
    BANK_SPEC,
    ALIGN_SPEC,
    RSSET_DIRECTIVE,
    INCBIN_DIRECTIVE,
    CHARMAP_DIRECTIVE,
    NEWCHARMAP_DIRECTIVE,
    SETCHARMAP_DIRECTIVE,
    SHIFT_DIRECTIVE,
    FAIL_DIRECTIVE,
    WARN_DIRECTIVE,
    ASSERT_DIRECTIVE,
    PURGE_DIRECTIVE,
    OPT_DIRECTIVE,
    ALIGN_DIRECTIVE,
    SIMPLE_DIRECTIVE,

    // Expressions
    BINARY_EXPR,
    UNARY_EXPR,
    PAREN_EXPR,
    CALL_EXPR,
    LITERAL,
    NAME_REF,
    MACRO_ARG_REF,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Every kind in declaration order
    pub const ALL: &'static [SyntaxKind] = &{
        let mut all = [SyntaxKind::WHITESPACE; SyntaxKind::__LAST as usize];
        let mut i = 0;
        while i < all.len() {
            // Safety: `i` is below `__LAST` and the enum is a dense `repr(u16)`
            all[i] = unsafe { std::mem::transmute::<u16, SyntaxKind>(i as u16) };
            i += 1;
        }
        all
    };

    /// Look up a kind by its raw discriminant
    pub fn from_raw(raw: u16) -> Option<SyntaxKind> {
        Self::ALL.get(raw as usize).copied()
    }

    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE | Self::COMMENT | Self::BLOCK_COMMENT | Self::LINE_CONT
        )
    }

    /// Check if this is a keyword (mnemonics, registers and directives)
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::MNEMONIC as u16) && (self as u16) <= (Self::BANK_KW as u16)
    }

    /// Check if this is a punctuation or operator token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::COMMA as u16) && (self as u16) <= (Self::SHR_EQ as u16)
    }

    /// Check if this is a literal
    pub fn is_literal(self) -> bool {
        (self as u16) >= (Self::DEC_NUMBER as u16) && (self as u16) <= (Self::CHAR as u16)
    }

    /// Check if this is a numeric literal
    pub fn is_number(self) -> bool {
        (self as u16) >= (Self::DEC_NUMBER as u16) && (self as u16) <= (Self::FIXED_NUMBER as u16)
    }

    /// Check if this kind can appear as a leaf token
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::EOF as u16)
    }

    /// Check if this kind is a composite node
    pub fn is_node(self) -> bool {
        (self as u16) >= (Self::SOURCE_FILE as u16) && self != Self::__LAST
    }

    /// Check if this kind is a block directive that owns nested lines
    pub fn is_block(self) -> bool {
        matches!(
            self,
            Self::MACRO_DEF
                | Self::REPT_BLOCK
                | Self::FOR_BLOCK
                | Self::IF_BLOCK
                | Self::ELIF_CLAUSE
                | Self::ELSE_CLAUSE
        )
    }

    /// Check if this kind is an expression node
    pub fn is_expr(self) -> bool {
        (self as u16) >= (Self::BINARY_EXPR as u16) && (self as u16) <= (Self::MACRO_ARG_REF as u16)
    }

    /// Human-readable name used in diagnostics
    pub fn display_name(self) -> &'static str {
        match self {
            Self::NEWLINE => "end of line",
            Self::EOF => "end of file",
            Self::IDENT => "identifier",
            Self::LOCAL_IDENT => "local label",
            Self::DEC_NUMBER
            | Self::HEX_NUMBER
            | Self::BIN_NUMBER
            | Self::OCT_NUMBER
            | Self::GFX_NUMBER
            | Self::FIXED_NUMBER => "number",
            Self::STRING => "string",
            Self::CHAR => "character literal",
            Self::MACRO_ARG => "macro argument",
            Self::ANON_LABEL_REF => "anonymous label reference",
            Self::COMMA => "','",
            Self::COLON => "':'",
            Self::COLON_COLON => "'::'",
            Self::L_PAREN => "'('",
            Self::R_PAREN => "')'",
            Self::L_BRACKET => "'['",
            Self::R_BRACKET => "']'",
            Self::AT => "'@'",
            Self::MNEMONIC | Self::RL_KW => "instruction",
            Self::REGISTER => "register",
            Self::SP_KW => "'sp'",
            Self::CONDITION => "condition",
            Self::SECTION_TYPE => "section type",
            Self::UNKNOWN => "unknown character",
            Self::ERROR => "error",
            k if k.is_punct() => "operator",
            k if k.is_keyword() => "keyword",
            k if k.is_trivia() => "trivia",
            _ => "syntax",
        }
    }
}

impl SyntaxKind {
    /// Name for diagnostics; directive keywords are spelled out
    pub fn describe(self) -> String {
        if (self as u16) >= (Self::MACRO_KW as u16) && (self as u16) <= (Self::BANK_KW as u16) {
            let name = format!("{self:?}");
            format!("'{}'", name.trim_end_matches("_KW"))
        } else {
            self.display_name().to_string()
        }
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RgbasmLanguage {}

impl rowan::Language for RgbasmLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<RgbasmLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<RgbasmLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<RgbasmLanguage>;
