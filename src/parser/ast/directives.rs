//! Assembler directives

use super::*;

ast_enum!(
    /// Any single-line directive
    Directive {
        IncludeDirective(INCLUDE_DIRECTIVE),
        SymbolDef(SYMBOL_DEF),
        PrintDirective(PRINT_DIRECTIVE),
        ExportDirective(EXPORT_DIRECTIVE),
        DataDirective(DATA_DIRECTIVE),
        DsDirective(DS_DIRECTIVE),
        SectionDirective(SECTION_DIRECTIVE),
        RssetDirective(RSSET_DIRECTIVE),
        IncbinDirective(INCBIN_DIRECTIVE),
        CharmapDirective(CHARMAP_DIRECTIVE),
        NewcharmapDirective(NEWCHARMAP_DIRECTIVE),
        SetcharmapDirective(SETCHARMAP_DIRECTIVE),
        ShiftDirective(SHIFT_DIRECTIVE),
        FailDirective(FAIL_DIRECTIVE),
        WarnDirective(WARN_DIRECTIVE),
        AssertDirective(ASSERT_DIRECTIVE),
        PurgeDirective(PURGE_DIRECTIVE),
        OptDirective(OPT_DIRECTIVE),
        AlignDirective(ALIGN_DIRECTIVE),
        SimpleDirective(SIMPLE_DIRECTIVE),
    }
);

impl Directive {
    /// The first keyword of the directive, `EXPORT` included
    pub fn keyword(&self) -> Option<SyntaxToken> {
        self.syntax()
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind().is_keyword())
    }
}

/// Symbol names listed directly under `node`
fn name_tokens(node: &SyntaxNode) -> Vec<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| matches!(t.kind(), SyntaxKind::IDENT | SyntaxKind::LOCAL_IDENT))
        .collect()
}

fn exprs(node: &SyntaxNode) -> Vec<Expr> {
    node.children().filter_map(Expr::cast).collect()
}

ast_node!(IncludeDirective, INCLUDE_DIRECTIVE);

impl IncludeDirective {
    first_child_method!(path_expr, Expr);

    /// The included path, when written as a string literal
    pub fn path(&self) -> Option<String> {
        match self.path_expr()? {
            Expr::Literal(lit) => lit.string_value(),
            _ => None,
        }
    }
}

// ============================================================================
// Symbols
// ============================================================================

ast_node!(SymbolDef, SYMBOL_DEF);

/// What a `DEF` line binds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// `DEF X EQU 1`
    Constant,
    /// `DEF X = 1`, `DEF X += 1`, ...
    Variable,
    /// `DEF S EQUS "text"`
    String,
    /// `DEF F RB 2`
    RsOffset,
}

impl SymbolDef {
    has_token_method!(is_exported, EXPORT_KW, "EXPORT DEF X EQU 1");
    has_token_method!(is_redef, REDEF_KW, "REDEF X = 2");
    find_token_method!(name, [IDENT, MACRO_ARG], "The defined symbol name.");
    find_token_method!(
        operator,
        [
            EQU_KW, EQUS_KW, EQ, PLUS_EQ, MINUS_EQ, STAR_EQ, SLASH_EQ, PERCENT_EQ, AMP_EQ,
            PIPE_EQ, CARET_EQ, SHL_EQ, SHR_EQ, RB_KW, RW_KW, RL_KW,
        ],
        "The binding operator or keyword."
    );
    first_child_method!(value, Expr);

    pub fn symbol_kind(&self) -> Option<SymbolKind> {
        let kind = match self.operator()?.kind() {
            SyntaxKind::EQU_KW => SymbolKind::Constant,
            SyntaxKind::EQUS_KW => SymbolKind::String,
            SyntaxKind::RB_KW | SyntaxKind::RW_KW | SyntaxKind::RL_KW => SymbolKind::RsOffset,
            _ => SymbolKind::Variable,
        };
        Some(kind)
    }
}

ast_node!(ExportDirective, EXPORT_DIRECTIVE);

impl ExportDirective {
    pub fn names(&self) -> Vec<SyntaxToken> {
        name_tokens(&self.0)
    }
}

ast_node!(PurgeDirective, PURGE_DIRECTIVE);

impl PurgeDirective {
    pub fn names(&self) -> Vec<SyntaxToken> {
        name_tokens(&self.0)
    }
}

ast_node!(RssetDirective, RSSET_DIRECTIVE);

impl RssetDirective {
    first_child_method!(value, Expr);
}

// ============================================================================
// Output
// ============================================================================

ast_node!(PrintDirective, PRINT_DIRECTIVE);

impl PrintDirective {
    has_token_method!(is_println, PRINTLN_KW);
    children_method!(args, Expr);
}

/// Unit size of a data directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataWidth {
    Byte,
    Word,
    Long,
}

impl DataWidth {
    /// Size of one value in bytes
    pub fn size(self) -> usize {
        match self {
            Self::Byte => 1,
            Self::Word => 2,
            Self::Long => 4,
        }
    }
}

ast_node!(DataDirective, DATA_DIRECTIVE);

impl DataDirective {
    token_to_enum_method!(width, DataWidth, [
        DB_KW => Byte,
        DW_KW => Word,
        DL_KW => Long,
    ]);
    children_method!(values, Expr);
}

ast_node!(DsDirective, DS_DIRECTIVE);

impl DsDirective {
    first_child_method!(align, AlignSpec);

    /// The byte count, absent for the `ds align[...]` form
    pub fn length(&self) -> Option<Expr> {
        if self.align().is_some() {
            return None;
        }
        self.0.children().find_map(Expr::cast)
    }

    /// Fill values following the length or alignment
    pub fn fill(&self) -> Vec<Expr> {
        let skip = usize::from(self.align().is_none());
        exprs(&self.0).into_iter().skip(skip).collect()
    }
}

ast_node!(IncbinDirective, INCBIN_DIRECTIVE);

impl IncbinDirective {
    pub fn path_expr(&self) -> Option<Expr> {
        exprs(&self.0).into_iter().next()
    }

    pub fn offset(&self) -> Option<Expr> {
        exprs(&self.0).into_iter().nth(1)
    }

    pub fn length(&self) -> Option<Expr> {
        exprs(&self.0).into_iter().nth(2)
    }
}

// ============================================================================
// Sections
// ============================================================================

/// `SECTION UNION` or `SECTION FRAGMENT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionModifier {
    Union,
    Fragment,
}

ast_node!(SectionDirective, SECTION_DIRECTIVE);

impl SectionDirective {
    has_token_method!(is_load, LOAD_KW, "LOAD \"ram\", WRAM0");
    has_token_method!(is_push, PUSHS_KW, "PUSHS \"x\", ROM0");
    token_to_enum_method!(modifier, SectionModifier, [
        UNION_KW => Union,
        FRAGMENT_KW => Fragment,
    ]);
    find_token_method!(section_type, [SECTION_TYPE], "The memory region, e.g. `ROM0`.");
    first_child_method!(bank, BankSpec);
    first_child_method!(align, AlignSpec);

    pub fn name_expr(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    /// The section name, when written as a string literal
    pub fn name(&self) -> Option<String> {
        match self.name_expr()? {
            Expr::Literal(lit) => lit.string_value(),
            _ => None,
        }
    }

    /// Fixed address from `ROM0[$100]`
    pub fn address(&self) -> Option<Expr> {
        exprs(&self.0).into_iter().nth(1)
    }
}

ast_node!(BankSpec, BANK_SPEC);

impl BankSpec {
    first_child_method!(value, Expr);
}

ast_node!(AlignSpec, ALIGN_SPEC);

impl AlignSpec {
    first_child_method!(alignment, Expr);

    pub fn offset(&self) -> Option<Expr> {
        exprs(&self.0).into_iter().nth(1)
    }
}

ast_node!(AlignDirective, ALIGN_DIRECTIVE);

impl AlignDirective {
    first_child_method!(alignment, Expr);

    pub fn offset(&self) -> Option<Expr> {
        exprs(&self.0).into_iter().nth(1)
    }
}

// ============================================================================
// Charmaps
// ============================================================================

ast_node!(CharmapDirective, CHARMAP_DIRECTIVE);

impl CharmapDirective {
    first_child_method!(mapping, Expr);

    /// Values the mapping expands to
    pub fn values(&self) -> Vec<Expr> {
        exprs(&self.0).into_iter().skip(1).collect()
    }
}

ast_node!(NewcharmapDirective, NEWCHARMAP_DIRECTIVE);

impl NewcharmapDirective {
    pub fn name(&self) -> Option<SyntaxToken> {
        name_tokens(&self.0).into_iter().next()
    }

    /// The charmap copied from, as in `NEWCHARMAP map2, main`
    pub fn base(&self) -> Option<SyntaxToken> {
        name_tokens(&self.0).into_iter().nth(1)
    }
}

ast_node!(SetcharmapDirective, SETCHARMAP_DIRECTIVE);

impl SetcharmapDirective {
    has_token_method!(is_push, PUSHC_KW);
    find_token_method!(name, [IDENT], "The charmap name.");
}

// ============================================================================
// Control and diagnostics
// ============================================================================

ast_node!(ShiftDirective, SHIFT_DIRECTIVE);

impl ShiftDirective {
    first_child_method!(amount, Expr);
}

ast_node!(FailDirective, FAIL_DIRECTIVE);

impl FailDirective {
    first_child_method!(message, Expr);
}

ast_node!(WarnDirective, WARN_DIRECTIVE);

impl WarnDirective {
    first_child_method!(message, Expr);
}

/// How a failed assertion is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AssertSeverity {
    Warn,
    #[default]
    Fail,
    Fatal,
}

ast_node!(AssertDirective, ASSERT_DIRECTIVE);

impl AssertDirective {
    has_token_method!(is_static, STATIC_ASSERT_KW);
    token_to_enum_method!(explicit_severity, AssertSeverity, [
        WARN_KW => Warn,
        FAIL_KW => Fail,
        FATAL_KW => Fatal,
    ]);
    first_child_method!(condition, Expr);

    /// Severity, `FAIL` unless given
    pub fn severity(&self) -> AssertSeverity {
        self.explicit_severity().unwrap_or_default()
    }

    pub fn message(&self) -> Option<Expr> {
        exprs(&self.0).into_iter().nth(1)
    }
}

ast_node!(OptDirective, OPT_DIRECTIVE);

impl OptDirective {
    has_token_method!(is_push, PUSHO_KW);
    children_method!(args, RawArg);
}

ast_node!(SimpleDirective, SIMPLE_DIRECTIVE);

impl SimpleDirective {
    pub fn keyword(&self) -> Option<SyntaxToken> {
        self.0.first_token()
    }
}
