use super::*;

// Expression
// ============================================================================

ast_enum!(
    /// Any expression node
    Expr {
        BinaryExpr(BINARY_EXPR),
        UnaryExpr(UNARY_EXPR),
        ParenExpr(PAREN_EXPR),
        CallExpr(CALL_EXPR),
        Literal(LITERAL),
        NameRef(NAME_REF),
        MacroArgRef(MACRO_ARG_REF),
    }
);

impl Expr {
    /// Every symbol referenced in this expression, in source order
    pub fn name_refs(&self) -> impl Iterator<Item = NameRef> + use<> {
        self.syntax().descendants().filter_map(NameRef::cast)
    }

    /// Check if this expression or any part of it failed to parse
    pub fn has_errors(&self) -> bool {
        self.syntax()
            .descendants()
            .any(|n| n.kind() == SyntaxKind::ERROR)
    }

    /// Strip any number of enclosing parentheses
    pub fn unparenthesized(self) -> Option<Expr> {
        let mut expr = self;
        while let Expr::ParenExpr(paren) = expr {
            expr = paren.inner()?;
        }
        Some(expr)
    }
}

// ============================================================================
// Operators
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    LogicalOr,
    LogicalAnd,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Add,
    Sub,
    /// `++` string concatenation
    Concat,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    /// `>>>`
    UShr,
    Mul,
    Div,
    Mod,
    Pow,
}

impl BinaryOp {
    pub fn from_kind(kind: SyntaxKind) -> Option<Self> {
        use SyntaxKind::*;
        let op = match kind {
            PIPE_PIPE => Self::LogicalOr,
            AMP_AMP => Self::LogicalAnd,
            EQ_EQ => Self::Eq,
            BANG_EQ => Self::Ne,
            LT => Self::Lt,
            GT => Self::Gt,
            LT_EQ => Self::Le,
            GT_EQ => Self::Ge,
            PLUS => Self::Add,
            MINUS => Self::Sub,
            PLUS_PLUS => Self::Concat,
            AMP => Self::BitAnd,
            PIPE => Self::BitOr,
            CARET => Self::BitXor,
            SHL => Self::Shl,
            SHR => Self::Shr,
            USHR => Self::UShr,
            STAR => Self::Mul,
            SLASH => Self::Div,
            PERCENT => Self::Mod,
            STAR_STAR => Self::Pow,
            _ => return None,
        };
        Some(op)
    }

    /// Binding strength; higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            Self::LogicalOr => 1,
            Self::LogicalAnd => 2,
            Self::Eq | Self::Ne | Self::Lt | Self::Gt | Self::Le | Self::Ge => 3,
            Self::Add | Self::Sub | Self::Concat => 4,
            Self::BitAnd | Self::BitOr | Self::BitXor => 5,
            Self::Shl | Self::Shr | Self::UShr => 6,
            Self::Mul | Self::Div | Self::Mod => 7,
            Self::Pow => 9,
        }
    }

    pub fn is_right_assoc(self) -> bool {
        self == Self::Pow
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Plus,
    Neg,
    /// `~`
    BitNot,
    /// `!`
    Not,
}

// ============================================================================
// Expression nodes
// ============================================================================

ast_node!(BinaryExpr, BINARY_EXPR);

impl BinaryExpr {
    first_child_method!(lhs, Expr);

    pub fn rhs(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).nth(1)
    }

    pub fn op_token(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| BinaryOp::from_kind(t.kind()).is_some())
    }

    pub fn op(&self) -> Option<BinaryOp> {
        self.op_token().and_then(|t| BinaryOp::from_kind(t.kind()))
    }
}

ast_node!(UnaryExpr, UNARY_EXPR);

impl UnaryExpr {
    token_to_enum_method!(op, UnaryOp, [
        PLUS => Plus,
        MINUS => Neg,
        TILDE => BitNot,
        BANG => Not,
    ]);
    first_child_method!(operand, Expr);
}

ast_node!(ParenExpr, PAREN_EXPR);

impl ParenExpr {
    first_child_method!(inner, Expr);
}

ast_node!(CallExpr, CALL_EXPR);

impl CallExpr {
    find_token_method!(
        callee,
        [IDENT, DEF_KW, BANK_KW, SECTION_KW],
        "The called function, built-ins like `HIGH` or `BANK` included."
    );
    children_method!(args, Expr);

    /// The callee, uppercased. Built-in function names are case-insensitive.
    pub fn name(&self) -> Option<String> {
        self.callee().map(|t| t.text().to_ascii_uppercase())
    }
}

ast_node!(NameRef, NAME_REF);

impl NameRef {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.0.first_token()
    }

    pub fn text(&self) -> Option<String> {
        self.token().map(|t| t.text().to_string())
    }

    has_token_method!(is_pc, AT, "@");
    has_token_method!(is_anonymous, ANON_LABEL_REF, ":++");
}

ast_node!(MacroArgRef, MACRO_ARG_REF);

impl MacroArgRef {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.0.first_token()
    }
}

// ============================================================================
// Literals
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Decimal,
    Hex,
    Binary,
    Octal,
    Gfx,
    Fixed,
    String,
    Char,
}

ast_node!(Literal, LITERAL);

impl Literal {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.0.first_token()
    }

    token_to_enum_method!(kind, LiteralKind, [
        DEC_NUMBER => Decimal,
        HEX_NUMBER => Hex,
        BIN_NUMBER => Binary,
        OCT_NUMBER => Octal,
        GFX_NUMBER => Gfx,
        FIXED_NUMBER => Fixed,
        STRING => String,
        CHAR => Char,
    ]);

    /// Value of an integer literal. `None` for other literals and for
    /// values that do not fit in 32 bits.
    pub fn int_value(&self) -> Option<u32> {
        let token = self.token()?;
        let digits = token.text().replace('_', "");
        match self.kind()? {
            LiteralKind::Decimal => digits.parse().ok(),
            LiteralKind::Hex => radix(&digits, &["$", "0x", "0X"], 16),
            LiteralKind::Binary => radix(&digits, &["%", "0b", "0B"], 2),
            LiteralKind::Octal => radix(&digits, &["&", "0o", "0O"], 8),
            LiteralKind::Gfx => gfx_value(digits.strip_prefix('`')?),
            _ => None,
        }
    }

    /// Value of a fixed-point literal such as `1.5` or `1.5q8`
    pub fn fixed_value(&self) -> Option<f64> {
        if self.kind()? != LiteralKind::Fixed {
            return None;
        }
        let token = self.token()?;
        let text = token.text();
        let number = text.split(['q', 'Q']).next()?;
        number.parse().ok()
    }

    /// Contents of a string literal with escapes resolved. Raw strings are
    /// returned verbatim. `None` for an unterminated string.
    pub fn string_value(&self) -> Option<String> {
        if self.kind()? != LiteralKind::String {
            return None;
        }
        let token = self.token()?;
        let text = token.text();
        let (raw, quoted) = match text.strip_prefix('#') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let body = if quoted.len() >= 6 && quoted.starts_with("\"\"\"") && quoted.ends_with("\"\"\"") {
            &quoted[3..quoted.len() - 3]
        } else if quoted.len() >= 2 && quoted.starts_with('"') && quoted.ends_with('"') {
            &quoted[1..quoted.len() - 1]
        } else {
            return None;
        };
        if raw {
            Some(body.to_string())
        } else {
            Some(unescape(body))
        }
    }
}

fn radix(text: &str, prefixes: &[&str], radix: u32) -> Option<u32> {
    let digits = prefixes.iter().find_map(|p| text.strip_prefix(p))?;
    u32::from_str_radix(digits, radix).ok()
}

/// Game Boy 2bpp pixel row: digit bit 0 goes to the low byte, bit 1 to the
/// high byte
fn gfx_value(digits: &str) -> Option<u32> {
    if digits.is_empty() || digits.len() > 8 {
        return None;
    }
    let (mut low, mut high) = (0u32, 0u32);
    for digit in digits.chars() {
        let d = digit.to_digit(4)?;
        low = (low << 1) | (d & 1);
        high = (high << 1) | (d >> 1);
    }
    Some((high << 8) | low)
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some(other @ ('\\' | '"' | '\'' | '{' | '}' | ',' | '(' | ')')) => out.push(other),
            // Macro arguments and unknown escapes are left for expansion
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
