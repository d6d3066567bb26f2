//! Logos-based lexer for RGBASM
//!
//! Fast tokenization using the logos crate. The lexer is total: input that
//! matches no token becomes [`SyntaxKind::UNKNOWN`], unterminated strings
//! and block comments included. It is restartable at any token boundary
//! through [`Lexer::new_at`], which is what the incremental driver relies on.
//!
//! Keyword policy: mnemonics, registers and directives are ASCII
//! case-insensitive and reserved.

use super::syntax_kind::SyntaxKind;
use crate::base::LineCol;
use logos::Logos;
use rowan::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
    pub line_col: LineCol,
}

impl Token<'_> {
    /// Byte range of the token
    pub fn range(&self) -> rowan::TextRange {
        rowan::TextRange::at(self.offset, TextSize::of(self.text))
    }
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    /// Absolute offset of `inner`'s slice start
    base: u32,
    line_col: LineCol,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::new_at(input, TextSize::new(0), LineCol::default())
    }

    /// Resume lexing `input` at a token boundary `offset`.
    ///
    /// `line_col` is the position of `offset`; the caller already knows it
    /// from the token that ended there.
    pub fn new_at(input: &'a str, offset: TextSize, line_col: LineCol) -> Self {
        let start = u32::from(offset).min(input.len() as u32) as usize;
        Self {
            inner: LogosToken::lexer(&input[start..]),
            base: start as u32,
            line_col,
            finished: false,
        }
    }

    /// Pull the next token, producing `EOF` once at the end of input
    pub fn next_token(&mut self) -> Token<'a> {
        self.next().unwrap_or(Token {
            kind: SyntaxKind::EOF,
            text: "",
            offset: TextSize::new(self.base + self.inner.source().len() as u32),
            line_col: self.line_col,
        })
    }

    /// Position of the next unread byte
    pub fn line_col(&self) -> LineCol {
        self.line_col
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let Some(logos_token) = self.inner.next() else {
            self.finished = true;
            return None;
        };

        let kind = match logos_token {
            Ok(t) if std::mem::take(&mut self.inner.extras.unterminated) => {
                tracing::trace!(?t, "unterminated literal");
                SyntaxKind::UNKNOWN
            }
            Ok(t) => t.into(),
            Err(()) => {
                // Keep error spans on char boundaries so slices stay valid
                let source = self.inner.source();
                let mut end = self.inner.span().end;
                while !source.is_char_boundary(end) {
                    end += 1;
                }
                let extra = end - self.inner.span().end;
                if extra > 0 {
                    self.inner.bump(extra);
                }
                SyntaxKind::UNKNOWN
            }
        };

        let text = self.inner.slice();
        let offset = TextSize::new(self.base + self.inner.span().start as u32);
        let line_col = self.line_col;
        self.line_col = self.line_col.advance(text);

        Some(Token {
            kind,
            text,
            offset,
            line_col,
        })
    }
}

/// Tokenize an entire string into a Vec (without the trailing `EOF`)
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Per-token flags set by callbacks
#[derive(Debug, Default)]
pub struct LexExtras {
    unterminated: bool,
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(extras = LexExtras)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r]+")]
    Whitespace,

    #[regex(r";[^\n]*")]
    Comment,

    #[token("/*", block_comment)]
    BlockComment,

    #[regex(r"\\[ \t]*(;[^\n]*)?\r?\n")]
    LineCont,

    #[token("\n")]
    Newline,

    // =========================================================================
    // IDENTIFIERS
    // =========================================================================
    #[regex(r"#?[A-Za-z_][A-Za-z0-9_$@#]*")]
    Ident,

    #[regex(r"\.[A-Za-z0-9_$@#]*")]
    #[regex(r"[A-Za-z_][A-Za-z0-9_$@#]*\.[A-Za-z0-9_$@#]*")]
    LocalIdent,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[0-9]+(_[0-9]+)*")]
    DecNumber,

    #[regex(r"\$[0-9A-Fa-f]+(_[0-9A-Fa-f]+)*")]
    #[regex(r"0[xX][0-9A-Fa-f]+(_[0-9A-Fa-f]+)*")]
    HexNumber,

    #[regex(r"%[01]+(_[01]+)*")]
    #[regex(r"0[bB][01]+(_[01]+)*")]
    BinNumber,

    #[regex(r"&[0-7]+(_[0-7]+)*")]
    #[regex(r"0[oO][0-7]+(_[0-7]+)*")]
    OctNumber,

    #[regex(r"`[0-3]+(_[0-3]+)*")]
    GfxNumber,

    #[regex(r"[0-9]+\.[0-9]+([qQ][0-9]+)?")]
    FixedNumber,

    #[token("\"", plain_string)]
    #[token("#\"", raw_string)]
    String,

    #[regex(r"'([^'\\\n]|\\[^\n])*'")]
    Char,

    #[regex(r"\\[1-9#@]")]
    #[regex(r"\\<[0-9A-Za-z_][0-9A-Za-z_.@#$]*>")]
    MacroArg,

    #[regex(r":[+]+")]
    #[regex(r":[-]+")]
    AnonLabelRef,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("::")]
    ColonColon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("@")]
    At,

    // =========================================================================
    // OPERATORS
    // =========================================================================
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("**")]
    StarStar,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token(">>>")]
    Ushr,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("!")]
    Bang,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("++")]
    PlusPlus,
    #[token("=")]
    Eq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("<<=")]
    ShlEq,
    #[token(">>=")]
    ShrEq,

    // =========================================================================
    // KEYWORDS - CPU
    // =========================================================================
    #[token("adc", priority = 10, ignore(ascii_case))]
    #[token("add", priority = 10, ignore(ascii_case))]
    #[token("and", priority = 10, ignore(ascii_case))]
    #[token("bit", priority = 10, ignore(ascii_case))]
    #[token("call", priority = 10, ignore(ascii_case))]
    #[token("ccf", priority = 10, ignore(ascii_case))]
    #[token("cp", priority = 10, ignore(ascii_case))]
    #[token("cpl", priority = 10, ignore(ascii_case))]
    #[token("daa", priority = 10, ignore(ascii_case))]
    #[token("dec", priority = 10, ignore(ascii_case))]
    #[token("di", priority = 10, ignore(ascii_case))]
    #[token("ei", priority = 10, ignore(ascii_case))]
    #[token("halt", priority = 10, ignore(ascii_case))]
    #[token("inc", priority = 10, ignore(ascii_case))]
    #[token("jp", priority = 10, ignore(ascii_case))]
    #[token("jr", priority = 10, ignore(ascii_case))]
    #[token("ld", priority = 10, ignore(ascii_case))]
    #[token("ldh", priority = 10, ignore(ascii_case))]
    #[token("ldi", priority = 10, ignore(ascii_case))]
    #[token("ldd", priority = 10, ignore(ascii_case))]
    #[token("nop", priority = 10, ignore(ascii_case))]
    #[token("or", priority = 10, ignore(ascii_case))]
    #[token("pop", priority = 10, ignore(ascii_case))]
    #[token("push", priority = 10, ignore(ascii_case))]
    #[token("res", priority = 10, ignore(ascii_case))]
    #[token("ret", priority = 10, ignore(ascii_case))]
    #[token("reti", priority = 10, ignore(ascii_case))]
    #[token("rla", priority = 10, ignore(ascii_case))]
    #[token("rlc", priority = 10, ignore(ascii_case))]
    #[token("rlca", priority = 10, ignore(ascii_case))]
    #[token("rr", priority = 10, ignore(ascii_case))]
    #[token("rra", priority = 10, ignore(ascii_case))]
    #[token("rrc", priority = 10, ignore(ascii_case))]
    #[token("rrca", priority = 10, ignore(ascii_case))]
    #[token("rst", priority = 10, ignore(ascii_case))]
    #[token("sbc", priority = 10, ignore(ascii_case))]
    #[token("scf", priority = 10, ignore(ascii_case))]
    #[token("set", priority = 10, ignore(ascii_case))]
    #[token("sla", priority = 10, ignore(ascii_case))]
    #[token("sra", priority = 10, ignore(ascii_case))]
    #[token("srl", priority = 10, ignore(ascii_case))]
    #[token("stop", priority = 10, ignore(ascii_case))]
    #[token("sub", priority = 10, ignore(ascii_case))]
    #[token("swap", priority = 10, ignore(ascii_case))]
    #[token("xor", priority = 10, ignore(ascii_case))]
    Mnemonic,

    #[token("a", priority = 10, ignore(ascii_case))]
    #[token("b", priority = 10, ignore(ascii_case))]
    #[token("c", priority = 10, ignore(ascii_case))]
    #[token("d", priority = 10, ignore(ascii_case))]
    #[token("e", priority = 10, ignore(ascii_case))]
    #[token("h", priority = 10, ignore(ascii_case))]
    #[token("l", priority = 10, ignore(ascii_case))]
    #[token("af", priority = 10, ignore(ascii_case))]
    #[token("bc", priority = 10, ignore(ascii_case))]
    #[token("de", priority = 10, ignore(ascii_case))]
    #[token("hl", priority = 10, ignore(ascii_case))]
    #[token("hli", priority = 10, ignore(ascii_case))]
    #[token("hld", priority = 10, ignore(ascii_case))]
    Register,

    #[token("sp", priority = 10, ignore(ascii_case))]
    SpKw,

    #[token("nz", priority = 10, ignore(ascii_case))]
    #[token("z", priority = 10, ignore(ascii_case))]
    #[token("nc", priority = 10, ignore(ascii_case))]
    Condition,

    #[token("rom0", priority = 10, ignore(ascii_case))]
    #[token("romx", priority = 10, ignore(ascii_case))]
    #[token("vram", priority = 10, ignore(ascii_case))]
    #[token("sram", priority = 10, ignore(ascii_case))]
    #[token("wram0", priority = 10, ignore(ascii_case))]
    #[token("wramx", priority = 10, ignore(ascii_case))]
    #[token("oam", priority = 10, ignore(ascii_case))]
    #[token("hram", priority = 10, ignore(ascii_case))]
    SectionType,

    // =========================================================================
    // KEYWORDS - directives
    // =========================================================================
    #[token("macro", priority = 10, ignore(ascii_case))]
    MacroKw,
    #[token("endm", priority = 10, ignore(ascii_case))]
    EndmKw,
    #[token("rept", priority = 10, ignore(ascii_case))]
    ReptKw,
    #[token("for", priority = 10, ignore(ascii_case))]
    ForKw,
    #[token("endr", priority = 10, ignore(ascii_case))]
    EndrKw,
    #[token("break", priority = 10, ignore(ascii_case))]
    BreakKw,
    #[token("include", priority = 10, ignore(ascii_case))]
    IncludeKw,
    #[token("if", priority = 10, ignore(ascii_case))]
    IfKw,
    #[token("elif", priority = 10, ignore(ascii_case))]
    ElifKw,
    #[token("else", priority = 10, ignore(ascii_case))]
    ElseKw,
    #[token("endc", priority = 10, ignore(ascii_case))]
    EndcKw,
    #[token("def", priority = 10, ignore(ascii_case))]
    DefKw,
    #[token("redef", priority = 10, ignore(ascii_case))]
    RedefKw,
    #[token("equ", priority = 10, ignore(ascii_case))]
    EquKw,
    #[token("equs", priority = 10, ignore(ascii_case))]
    EqusKw,
    #[token("rb", priority = 10, ignore(ascii_case))]
    RbKw,
    #[token("rw", priority = 10, ignore(ascii_case))]
    RwKw,
    #[token("rl", priority = 10, ignore(ascii_case))]
    RlKw,
    #[token("print", priority = 10, ignore(ascii_case))]
    PrintKw,
    #[token("println", priority = 10, ignore(ascii_case))]
    PrintlnKw,
    #[token("export", priority = 10, ignore(ascii_case))]
    ExportKw,
    #[token("db", priority = 10, ignore(ascii_case))]
    DbKw,
    #[token("dw", priority = 10, ignore(ascii_case))]
    DwKw,
    #[token("dl", priority = 10, ignore(ascii_case))]
    DlKw,
    #[token("ds", priority = 10, ignore(ascii_case))]
    DsKw,
    #[token("section", priority = 10, ignore(ascii_case))]
    SectionKw,
    #[token("pushs", priority = 10, ignore(ascii_case))]
    PushsKw,
    #[token("pops", priority = 10, ignore(ascii_case))]
    PopsKw,
    #[token("endsection", priority = 10, ignore(ascii_case))]
    EndsectionKw,
    #[token("load", priority = 10, ignore(ascii_case))]
    LoadKw,
    #[token("endl", priority = 10, ignore(ascii_case))]
    EndlKw,
    #[token("fragment", priority = 10, ignore(ascii_case))]
    FragmentKw,
    #[token("union", priority = 10, ignore(ascii_case))]
    UnionKw,
    #[token("nextu", priority = 10, ignore(ascii_case))]
    NextuKw,
    #[token("endu", priority = 10, ignore(ascii_case))]
    EnduKw,
    #[token("rsreset", priority = 10, ignore(ascii_case))]
    RsresetKw,
    #[token("rsset", priority = 10, ignore(ascii_case))]
    RssetKw,
    #[token("incbin", priority = 10, ignore(ascii_case))]
    IncbinKw,
    #[token("charmap", priority = 10, ignore(ascii_case))]
    CharmapKw,
    #[token("newcharmap", priority = 10, ignore(ascii_case))]
    NewcharmapKw,
    #[token("setcharmap", priority = 10, ignore(ascii_case))]
    SetcharmapKw,
    #[token("pushc", priority = 10, ignore(ascii_case))]
    PushcKw,
    #[token("popc", priority = 10, ignore(ascii_case))]
    PopcKw,
    #[token("shift", priority = 10, ignore(ascii_case))]
    ShiftKw,
    #[token("fail", priority = 10, ignore(ascii_case))]
    FailKw,
    #[token("warn", priority = 10, ignore(ascii_case))]
    WarnKw,
    #[token("fatal", priority = 10, ignore(ascii_case))]
    FatalKw,
    #[token("assert", priority = 10, ignore(ascii_case))]
    AssertKw,
    #[token("static_assert", priority = 10, ignore(ascii_case))]
    StaticAssertKw,
    #[token("purge", priority = 10, ignore(ascii_case))]
    PurgeKw,
    #[token("opt", priority = 10, ignore(ascii_case))]
    OptKw,
    #[token("pusho", priority = 10, ignore(ascii_case))]
    PushoKw,
    #[token("popo", priority = 10, ignore(ascii_case))]
    PopoKw,
    #[token("align", priority = 10, ignore(ascii_case))]
    AlignKw,
    #[token("bank", priority = 10, ignore(ascii_case))]
    BankKw,
}

/// Consume a block comment body up to and including `*/`
fn block_comment(lex: &mut logos::Lexer<LogosToken>) {
    match lex.remainder().find("*/") {
        Some(end) => lex.bump(end + 2),
        None => {
            lex.bump(lex.remainder().len());
            lex.extras.unterminated = true;
        }
    }
}

/// Consume a `"…"` or `"""…"""` string after its first quote
fn plain_string(lex: &mut logos::Lexer<LogosToken>) {
    let rest = lex.remainder();
    if let Some(body) = rest.strip_prefix("\"\"") {
        match body.find("\"\"\"") {
            Some(end) => lex.bump(2 + end + 3),
            None => {
                lex.bump(rest.len());
                lex.extras.unterminated = true;
            }
        }
        return;
    }

    let mut chars = rest.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                lex.bump(i + 1);
                return;
            }
            '\\' => {
                // An escaped newline is a line continuation inside the string
                chars.next();
            }
            '\n' => {
                lex.bump(i);
                lex.extras.unterminated = true;
                return;
            }
            _ => {}
        }
    }
    lex.bump(rest.len());
    lex.extras.unterminated = true;
}

/// Consume a raw `#"…"` or `#"""…"""` string; backslashes are literal
fn raw_string(lex: &mut logos::Lexer<LogosToken>) {
    let rest = lex.remainder();
    let (skip, close, multi_line) = match rest.strip_prefix("\"\"") {
        Some(_) => (2, "\"\"\"", true),
        None => (0, "\"", false),
    };
    let body = &rest[skip..];
    let stop = if multi_line {
        body.find(close)
    } else {
        body.find(['"', '\n'])
            .filter(|&i| body.as_bytes()[i] == b'"')
    };
    match stop {
        Some(end) => lex.bump(skip + end + close.len()),
        None => {
            let line_end = if multi_line {
                body.len()
            } else {
                body.find('\n').unwrap_or(body.len())
            };
            lex.bump(skip + line_end);
            lex.extras.unterminated = true;
        }
    }
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            // Trivia
            Whitespace => SyntaxKind::WHITESPACE,
            Comment => SyntaxKind::COMMENT,
            BlockComment => SyntaxKind::BLOCK_COMMENT,
            LineCont => SyntaxKind::LINE_CONT,
            Newline => SyntaxKind::NEWLINE,

            // Identifiers and literals
            Ident => SyntaxKind::IDENT,
            LocalIdent => SyntaxKind::LOCAL_IDENT,
            DecNumber => SyntaxKind::DEC_NUMBER,
            HexNumber => SyntaxKind::HEX_NUMBER,
            BinNumber => SyntaxKind::BIN_NUMBER,
            OctNumber => SyntaxKind::OCT_NUMBER,
            GfxNumber => SyntaxKind::GFX_NUMBER,
            FixedNumber => SyntaxKind::FIXED_NUMBER,
            String => SyntaxKind::STRING,
            Char => SyntaxKind::CHAR,
            MacroArg => SyntaxKind::MACRO_ARG,
            AnonLabelRef => SyntaxKind::ANON_LABEL_REF,

            // Punctuation
            Comma => SyntaxKind::COMMA,
            Colon => SyntaxKind::COLON,
            ColonColon => SyntaxKind::COLON_COLON,
            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
            LBracket => SyntaxKind::L_BRACKET,
            RBracket => SyntaxKind::R_BRACKET,
            At => SyntaxKind::AT,

            // Operators
            Plus => SyntaxKind::PLUS,
            Minus => SyntaxKind::MINUS,
            Star => SyntaxKind::STAR,
            Slash => SyntaxKind::SLASH,
            Percent => SyntaxKind::PERCENT,
            StarStar => SyntaxKind::STAR_STAR,
            Shl => SyntaxKind::SHL,
            Shr => SyntaxKind::SHR,
            Ushr => SyntaxKind::USHR,
            Amp => SyntaxKind::AMP,
            Pipe => SyntaxKind::PIPE,
            Caret => SyntaxKind::CARET,
            Tilde => SyntaxKind::TILDE,
            Bang => SyntaxKind::BANG,
            AmpAmp => SyntaxKind::AMP_AMP,
            PipePipe => SyntaxKind::PIPE_PIPE,
            EqEq => SyntaxKind::EQ_EQ,
            BangEq => SyntaxKind::BANG_EQ,
            Lt => SyntaxKind::LT,
            Gt => SyntaxKind::GT,
            LtEq => SyntaxKind::LT_EQ,
            GtEq => SyntaxKind::GT_EQ,
            PlusPlus => SyntaxKind::PLUS_PLUS,
            Eq => SyntaxKind::EQ,
            PlusEq => SyntaxKind::PLUS_EQ,
            MinusEq => SyntaxKind::MINUS_EQ,
            StarEq => SyntaxKind::STAR_EQ,
            SlashEq => SyntaxKind::SLASH_EQ,
            PercentEq => SyntaxKind::PERCENT_EQ,
            AmpEq => SyntaxKind::AMP_EQ,
            PipeEq => SyntaxKind::PIPE_EQ,
            CaretEq => SyntaxKind::CARET_EQ,
            ShlEq => SyntaxKind::SHL_EQ,
            ShrEq => SyntaxKind::SHR_EQ,

            // CPU keywords
            Mnemonic => SyntaxKind::MNEMONIC,
            Register => SyntaxKind::REGISTER,
            SpKw => SyntaxKind::SP_KW,
            Condition => SyntaxKind::CONDITION,
            SectionType => SyntaxKind::SECTION_TYPE,

            // Directives
            MacroKw => SyntaxKind::MACRO_KW,
            EndmKw => SyntaxKind::ENDM_KW,
            ReptKw => SyntaxKind::REPT_KW,
            ForKw => SyntaxKind::FOR_KW,
            EndrKw => SyntaxKind::ENDR_KW,
            BreakKw => SyntaxKind::BREAK_KW,
            IncludeKw => SyntaxKind::INCLUDE_KW,
            IfKw => SyntaxKind::IF_KW,
            ElifKw => SyntaxKind::ELIF_KW,
            ElseKw => SyntaxKind::ELSE_KW,
            EndcKw => SyntaxKind::ENDC_KW,
            DefKw => SyntaxKind::DEF_KW,
            RedefKw => SyntaxKind::REDEF_KW,
            EquKw => SyntaxKind::EQU_KW,
            EqusKw => SyntaxKind::EQUS_KW,
            RbKw => SyntaxKind::RB_KW,
            RwKw => SyntaxKind::RW_KW,
            RlKw => SyntaxKind::RL_KW,
            PrintKw => SyntaxKind::PRINT_KW,
            PrintlnKw => SyntaxKind::PRINTLN_KW,
            ExportKw => SyntaxKind::EXPORT_KW,
            DbKw => SyntaxKind::DB_KW,
            DwKw => SyntaxKind::DW_KW,
            DlKw => SyntaxKind::DL_KW,
            DsKw => SyntaxKind::DS_KW,
            SectionKw => SyntaxKind::SECTION_KW,
            PushsKw => SyntaxKind::PUSHS_KW,
            PopsKw => SyntaxKind::POPS_KW,
            EndsectionKw => SyntaxKind::ENDSECTION_KW,
            LoadKw => SyntaxKind::LOAD_KW,
            EndlKw => SyntaxKind::ENDL_KW,
            FragmentKw => SyntaxKind::FRAGMENT_KW,
            UnionKw => SyntaxKind::UNION_KW,
            NextuKw => SyntaxKind::NEXTU_KW,
            EnduKw => SyntaxKind::ENDU_KW,
            RsresetKw => SyntaxKind::RSRESET_KW,
            RssetKw => SyntaxKind::RSSET_KW,
            IncbinKw => SyntaxKind::INCBIN_KW,
            CharmapKw => SyntaxKind::CHARMAP_KW,
            NewcharmapKw => SyntaxKind::NEWCHARMAP_KW,
            SetcharmapKw => SyntaxKind::SETCHARMAP_KW,
            PushcKw => SyntaxKind::PUSHC_KW,
            PopcKw => SyntaxKind::POPC_KW,
            ShiftKw => SyntaxKind::SHIFT_KW,
            FailKw => SyntaxKind::FAIL_KW,
            WarnKw => SyntaxKind::WARN_KW,
            FatalKw => SyntaxKind::FATAL_KW,
            AssertKw => SyntaxKind::ASSERT_KW,
            StaticAssertKw => SyntaxKind::STATIC_ASSERT_KW,
            PurgeKw => SyntaxKind::PURGE_KW,
            OptKw => SyntaxKind::OPT_KW,
            PushoKw => SyntaxKind::PUSHO_KW,
            PopoKw => SyntaxKind::POPO_KW,
            AlignKw => SyntaxKind::ALIGN_KW,
            BankKw => SyntaxKind::BANK_KW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        Lexer::new(input).map(|t| t.kind).collect()
    }

    #[test]
    fn test_lex_label_and_instruction() {
        let tokens: Vec<_> = Lexer::new("LABEL: nop").collect();
        assert_eq!(tokens.len(), 4); // LABEL, :, whitespace, nop
        assert_eq!(tokens[0].kind, SyntaxKind::IDENT);
        assert_eq!(tokens[1].kind, SyntaxKind::COLON);
        assert_eq!(tokens[2].kind, SyntaxKind::WHITESPACE);
        assert_eq!(tokens[3].kind, SyntaxKind::MNEMONIC);
        assert_eq!(tokens[3].offset, TextSize::new(7));
    }

    #[test]
    fn test_lex_keywords_ignore_case() {
        assert_eq!(
            kinds("LD Ld ld"),
            vec![
                SyntaxKind::MNEMONIC,
                SyntaxKind::WHITESPACE,
                SyntaxKind::MNEMONIC,
                SyntaxKind::WHITESPACE,
                SyntaxKind::MNEMONIC,
            ]
        );
        assert_eq!(kinds("SECTION"), vec![SyntaxKind::SECTION_KW]);
        assert_eq!(kinds("wRaM0"), vec![SyntaxKind::SECTION_TYPE]);
    }

    #[test]
    fn test_lex_keyword_prefix_is_ident() {
        assert_eq!(kinds("ldx"), vec![SyntaxKind::IDENT]);
        assert_eq!(kinds("a1"), vec![SyntaxKind::IDENT]);
        assert_eq!(kinds("#def"), vec![SyntaxKind::IDENT]);
    }

    #[test]
    fn test_lex_mixed_case_keywords_beat_identifiers() {
        assert_eq!(kinds("AdC"), vec![SyntaxKind::MNEMONIC]);
        assert_eq!(kinds("EnDr"), vec![SyntaxKind::ENDR_KW]);
        assert_eq!(kinds("rom0"), vec![SyntaxKind::SECTION_TYPE]);
    }

    #[test]
    fn test_lex_comment_runs_to_end_of_line() {
        let tokens: Vec<_> = Lexer::new("nop ; a ; b
halt").collect();
        assert_eq!(tokens[2].kind, SyntaxKind::COMMENT);
        assert_eq!(tokens[2].text, "; a ; b");
        assert_eq!(tokens[3].kind, SyntaxKind::NEWLINE);
    }

    #[test]
    fn test_lex_local_labels() {
        assert_eq!(kinds(".loop"), vec![SyntaxKind::LOCAL_IDENT]);
        assert_eq!(kinds("Main.loop"), vec![SyntaxKind::LOCAL_IDENT]);
    }

    #[test]
    fn test_lex_number_bases() {
        assert_eq!(kinds("42"), vec![SyntaxKind::DEC_NUMBER]);
        assert_eq!(kinds("1_000"), vec![SyntaxKind::DEC_NUMBER]);
        assert_eq!(kinds("$FF"), vec![SyntaxKind::HEX_NUMBER]);
        assert_eq!(kinds("0x1f"), vec![SyntaxKind::HEX_NUMBER]);
        assert_eq!(kinds("%1010"), vec![SyntaxKind::BIN_NUMBER]);
        assert_eq!(kinds("0b11"), vec![SyntaxKind::BIN_NUMBER]);
        assert_eq!(kinds("&17"), vec![SyntaxKind::OCT_NUMBER]);
        assert_eq!(kinds("`0123"), vec![SyntaxKind::GFX_NUMBER]);
        assert_eq!(kinds("1.5"), vec![SyntaxKind::FIXED_NUMBER]);
        assert_eq!(kinds("1.5q8"), vec![SyntaxKind::FIXED_NUMBER]);
    }

    #[test]
    fn test_lex_percent_and_amp_operators() {
        assert_eq!(
            kinds("5 % 3"),
            vec![
                SyntaxKind::DEC_NUMBER,
                SyntaxKind::WHITESPACE,
                SyntaxKind::PERCENT,
                SyntaxKind::WHITESPACE,
                SyntaxKind::DEC_NUMBER,
            ]
        );
        assert_eq!(kinds("&&"), vec![SyntaxKind::AMP_AMP]);
        assert_eq!(kinds("x&y"), vec![SyntaxKind::IDENT, SyntaxKind::AMP, SyntaxKind::IDENT]);
    }

    #[test]
    fn test_lex_operators_longest_match() {
        assert_eq!(kinds(">>>"), vec![SyntaxKind::USHR]);
        assert_eq!(kinds("<<="), vec![SyntaxKind::SHL_EQ]);
        assert_eq!(kinds("++"), vec![SyntaxKind::PLUS_PLUS]);
        assert_eq!(kinds("**"), vec![SyntaxKind::STAR_STAR]);
        assert_eq!(kinds("::"), vec![SyntaxKind::COLON_COLON]);
        assert_eq!(kinds(":++"), vec![SyntaxKind::ANON_LABEL_REF]);
    }

    #[test]
    fn test_lex_strings() {
        assert_eq!(kinds(r#""hello""#), vec![SyntaxKind::STRING]);
        assert_eq!(kinds(r#""a\"b""#), vec![SyntaxKind::STRING]);
        assert_eq!(kinds("\"\"\"multi\nline\"\"\""), vec![SyntaxKind::STRING]);
        assert_eq!(kinds(r#"#"raw\""#), vec![SyntaxKind::STRING]);
        assert_eq!(kinds("'A'"), vec![SyntaxKind::CHAR]);
    }

    #[test]
    fn test_lex_unterminated_string_is_unknown() {
        let tokens: Vec<_> = Lexer::new("\"oops\nnop").collect();
        assert_eq!(tokens[0].kind, SyntaxKind::UNKNOWN);
        assert_eq!(tokens[0].text, "\"oops");
        assert_eq!(tokens[1].kind, SyntaxKind::NEWLINE);
        assert_eq!(tokens[2].kind, SyntaxKind::MNEMONIC);
    }

    #[test]
    fn test_lex_comments() {
        assert_eq!(
            kinds("; note\nnop /* x\ny */"),
            vec![
                SyntaxKind::COMMENT,
                SyntaxKind::NEWLINE,
                SyntaxKind::MNEMONIC,
                SyntaxKind::WHITESPACE,
                SyntaxKind::BLOCK_COMMENT,
            ]
        );
        assert_eq!(kinds("/* open"), vec![SyntaxKind::UNKNOWN]);
    }

    #[test]
    fn test_lex_line_continuation() {
        assert_eq!(
            kinds("db 1, \\ ; more\n 2"),
            vec![
                SyntaxKind::DB_KW,
                SyntaxKind::WHITESPACE,
                SyntaxKind::DEC_NUMBER,
                SyntaxKind::COMMA,
                SyntaxKind::WHITESPACE,
                SyntaxKind::LINE_CONT,
                SyntaxKind::WHITESPACE,
                SyntaxKind::DEC_NUMBER,
            ]
        );
    }

    #[test]
    fn test_lex_macro_args() {
        assert_eq!(kinds("\\1"), vec![SyntaxKind::MACRO_ARG]);
        assert_eq!(kinds("\\@"), vec![SyntaxKind::MACRO_ARG]);
        assert_eq!(kinds("\\<count>"), vec![SyntaxKind::MACRO_ARG]);
    }

    #[test]
    fn test_lex_unknown_is_total() {
        let input = "nop ? é";
        let tokens: Vec<_> = Lexer::new(input).collect();
        let text: String = tokens.iter().map(|t| t.text).collect();
        assert_eq!(text, input);
        assert!(tokens.iter().any(|t| t.kind == SyntaxKind::UNKNOWN && t.text == "é"));
    }

    #[test]
    fn test_lex_restart_at_offset() {
        let input = "nop\nhalt";
        let mut lexer = Lexer::new_at(input, TextSize::new(4), LineCol { line: 1, col: 0 });
        let token = lexer.next_token();
        assert_eq!(token.kind, SyntaxKind::MNEMONIC);
        assert_eq!(token.offset, TextSize::new(4));
        assert_eq!(token.line_col, LineCol { line: 1, col: 0 });
        assert_eq!(lexer.next_token().kind, SyntaxKind::EOF);
        assert_eq!(lexer.next_token().offset, TextSize::new(8));
    }

    #[test]
    fn test_lex_line_col_tracking() {
        let tokens: Vec<_> = Lexer::new("a:\n  ld").collect();
        let ld = tokens.last().unwrap();
        assert_eq!(ld.line_col, LineCol { line: 1, col: 2 });
    }
}
