//! RGBASM line and statement rules
//!
//! A source file is a sequence of lines terminated by `NEWLINE`. A line holds
//! an optional label and an optional statement. Block directives (`MACRO`,
//! `REPT`, `FOR`, `IF`) own the lines up to their terminator and end on the
//! line of that terminator.

use super::{
    Grammar, GrammarBuilder, GrammarError, Rule, blank, choice, expressions, node, one_of, opt,
    seq, sym, tok,
};
use crate::parser::SyntaxKind::{self, *};

/// Directive keywords that take no arguments
const SIMPLE_DIRECTIVES: &[SyntaxKind] = &[
    BREAK_KW,
    RSRESET_KW,
    UNION_KW,
    NEXTU_KW,
    ENDU_KW,
    PUSHC_KW,
    POPC_KW,
    ENDL_KW,
    PUSHS_KW,
    POPS_KW,
    ENDSECTION_KW,
    PUSHO_KW,
    POPO_KW,
];

const ASSIGN_OPS: &[SyntaxKind] = &[
    EQU_KW, EQ, PLUS_EQ, MINUS_EQ, STAR_EQ, SLASH_EQ, PERCENT_EQ, AMP_EQ, PIPE_EQ, CARET_EQ,
    SHL_EQ, SHR_EQ,
];

/// Tokens that end a raw macro argument
const RAW_ARG_STOP: &[SyntaxKind] = &[COMMA, NEWLINE, EOF, ERROR, UNKNOWN];

/// Build the complete RGBASM grammar
pub fn rgbasm() -> Result<Grammar, GrammarError> {
    let mut g = GrammarBuilder::new("rgbasm");
    g.extras(&[WHITESPACE, COMMENT, BLOCK_COMMENT, LINE_CONT]);
    g.start("_source");
    g.resume_point("_lines");

    expressions::define(&mut g);
    define_lines(&mut g);
    define_instructions(&mut g);
    define_macro_calls(&mut g);
    define_blocks(&mut g);
    define_directives(&mut g);

    g.build()
}

/// `_lines` is left recursive so every top-level line is reduced as soon
/// as its `NEWLINE` is shifted.
fn define_lines(g: &mut GrammarBuilder) {
    g.hidden("_source", seq([opt(sym("_lines")), opt(sym("_line"))]));
    g.hidden(
        "_lines",
        choice([
            seq([sym("_lines"), opt(sym("_line")), tok(NEWLINE)]),
            seq([opt(sym("_line")), tok(NEWLINE)]),
        ]),
    );
    g.hidden(
        "_line",
        choice([
            node(LABEL),
            seq([node(LABEL), sym("_statement")]),
            sym("_statement"),
            tok(ERROR),
            seq([node(LABEL), tok(ERROR)]),
        ]),
    );
    g.node(
        LABEL,
        choice([
            seq([tok(IDENT), one_of(&[COLON, COLON_COLON])]),
            seq([tok(LOCAL_IDENT), opt(one_of(&[COLON, COLON_COLON]))]),
            tok(COLON),
        ]),
    );

    g.hidden(
        "_statement",
        choice([
            node(INSTRUCTION),
            node(MACRO_CALL),
            node(MACRO_DEF),
            node(REPT_BLOCK),
            node(FOR_BLOCK),
            node(IF_BLOCK),
            node(INCLUDE_DIRECTIVE),
            node(SYMBOL_DEF),
            node(PRINT_DIRECTIVE),
            node(EXPORT_DIRECTIVE),
            node(DATA_DIRECTIVE),
            node(DS_DIRECTIVE),
            node(SECTION_DIRECTIVE),
            node(RSSET_DIRECTIVE),
            node(INCBIN_DIRECTIVE),
            node(CHARMAP_DIRECTIVE),
            node(NEWCHARMAP_DIRECTIVE),
            node(SETCHARMAP_DIRECTIVE),
            node(SHIFT_DIRECTIVE),
            node(FAIL_DIRECTIVE),
            node(WARN_DIRECTIVE),
            node(ASSERT_DIRECTIVE),
            node(PURGE_DIRECTIVE),
            node(OPT_DIRECTIVE),
            node(ALIGN_DIRECTIVE),
            node(SIMPLE_DIRECTIVE),
        ]),
    );
}

fn define_instructions(g: &mut GrammarBuilder) {
    g.node(
        INSTRUCTION,
        seq([
            one_of(&[MNEMONIC, RL_KW]),
            opt(seq([
                sym("_operand"),
                opt(seq([tok(COMMA), sym("_operand")])),
            ])),
        ]),
    );
    g.hidden(
        "_operand",
        choice([
            sym("_arg"),
            node(MEM_OPERAND),
            tok(REGISTER),
            tok(CONDITION),
            seq([tok(SP_KW), opt(seq([one_of(&[PLUS, MINUS]), sym("_expr")]))]),
        ]),
    );
    g.node(
        MEM_OPERAND,
        seq([
            tok(L_BRACKET),
            choice([
                sym("_expr"),
                tok(ERROR),
                seq([tok(REGISTER), opt(one_of(&[PLUS, MINUS]))]),
                seq([sym("_expr"), tok(PLUS), tok(REGISTER)]),
            ]),
            tok(R_BRACKET),
        ]),
    );
}

/// Macro invocations keep their arguments as raw token runs
fn define_macro_calls(g: &mut GrammarBuilder) {
    g.node(MACRO_CALL, seq([tok(IDENT), opt(sym("_raw_args"))]));
    g.hidden(
        "_raw_args",
        choice([
            node(RAW_ARG),
            tok(COMMA),
            seq([sym("_raw_args"), tok(COMMA)]),
            seq([sym("_raw_args"), tok(COMMA), node(RAW_ARG)]),
        ]),
    );
    g.node(RAW_ARG, seq([sym("_raw_first"), opt(sym("_raw_rest"))]));
    g.hidden(
        "_raw_rest",
        choice([sym("_raw_token"), seq([sym("_raw_rest"), sym("_raw_token")])]),
    );
    g.hidden("_raw_first", raw_tokens(&[COLON, COLON_COLON]));
    g.hidden("_raw_token", raw_tokens(&[]));
}

fn raw_tokens(also_excluded: &[SyntaxKind]) -> Rule {
    one_of(
        &SyntaxKind::ALL
            .iter()
            .copied()
            .filter(|k| k.is_token() && !k.is_trivia())
            .filter(|k| !RAW_ARG_STOP.contains(k) && !also_excluded.contains(k))
            .collect::<Vec<_>>(),
    )
}

fn define_blocks(g: &mut GrammarBuilder) {
    let body = || opt(sym("_lines"));

    g.node(
        MACRO_DEF,
        seq([
            tok(MACRO_KW),
            choice([blank(), tok(IDENT), tok(ERROR)]),
            tok(NEWLINE),
            body(),
            tok(ENDM_KW),
        ]),
    );
    g.node(
        REPT_BLOCK,
        seq([tok(REPT_KW), sym("_arg"), tok(NEWLINE), body(), tok(ENDR_KW)]),
    );
    g.node(
        FOR_BLOCK,
        seq([tok(FOR_KW), sym("_for_args"), tok(NEWLINE), body(), tok(ENDR_KW)]),
    );
    g.hidden(
        "_for_args",
        choice([
            seq([
                tok(IDENT),
                tok(COMMA),
                sym("_arg"),
                opt(seq([
                    tok(COMMA),
                    sym("_arg"),
                    opt(seq([tok(COMMA), sym("_arg")])),
                ])),
            ]),
            tok(ERROR),
        ]),
    );
    g.node(
        IF_BLOCK,
        seq([
            tok(IF_KW),
            sym("_arg"),
            tok(NEWLINE),
            body(),
            opt(sym("_elif_clauses")),
            opt(node(ELSE_CLAUSE)),
            tok(ENDC_KW),
        ]),
    );
    g.hidden(
        "_elif_clauses",
        choice([
            node(ELIF_CLAUSE),
            seq([sym("_elif_clauses"), node(ELIF_CLAUSE)]),
        ]),
    );
    g.node(
        ELIF_CLAUSE,
        seq([tok(ELIF_KW), sym("_arg"), tok(NEWLINE), body()]),
    );
    g.node(ELSE_CLAUSE, seq([tok(ELSE_KW), tok(NEWLINE), body()]));
}

fn define_directives(g: &mut GrammarBuilder) {
    let list = || seq([sym("_expr_list"), opt(tok(COMMA))]);
    let names = || seq([sym("_name_list"), opt(tok(COMMA))]);

    g.hidden(
        "_name_list",
        choice([
            one_of(&[IDENT, LOCAL_IDENT]),
            seq([sym("_name_list"), tok(COMMA), one_of(&[IDENT, LOCAL_IDENT])]),
        ]),
    );

    g.node(INCLUDE_DIRECTIVE, seq([tok(INCLUDE_KW), sym("_arg")]));

    g.node(
        SYMBOL_DEF,
        seq([
            opt(tok(EXPORT_KW)),
            one_of(&[DEF_KW, REDEF_KW]),
            one_of(&[IDENT, MACRO_ARG]),
            choice([
                seq([one_of(ASSIGN_OPS), sym("_arg")]),
                seq([tok(EQUS_KW), sym("_arg")]),
                seq([one_of(&[RB_KW, RW_KW, RL_KW]), opt(sym("_arg"))]),
            ]),
        ]),
    );

    g.node(
        PRINT_DIRECTIVE,
        seq([one_of(&[PRINT_KW, PRINTLN_KW]), opt(list())]),
    );
    g.node(EXPORT_DIRECTIVE, seq([tok(EXPORT_KW), names()]));
    g.node(
        DATA_DIRECTIVE,
        seq([one_of(&[DB_KW, DW_KW, DL_KW]), opt(list())]),
    );
    g.node(
        DS_DIRECTIVE,
        seq([
            tok(DS_KW),
            choice([
                blank(),
                list(),
                seq([node(ALIGN_SPEC), opt(seq([tok(COMMA), list()]))]),
            ]),
        ]),
    );
    g.node(
        ALIGN_SPEC,
        seq([
            tok(ALIGN_KW),
            tok(L_BRACKET),
            sym("_expr"),
            opt(seq([tok(COMMA), sym("_expr")])),
            tok(R_BRACKET),
        ]),
    );
    g.node(
        BANK_SPEC,
        seq([tok(BANK_KW), tok(L_BRACKET), sym("_expr"), tok(R_BRACKET)]),
    );

    g.node(
        SECTION_DIRECTIVE,
        seq([
            one_of(&[SECTION_KW, PUSHS_KW, LOAD_KW]),
            opt(one_of(&[UNION_KW, FRAGMENT_KW])),
            sym("_arg"),
            tok(COMMA),
            tok(SECTION_TYPE),
            opt(seq([tok(L_BRACKET), sym("_expr"), tok(R_BRACKET)])),
            opt(sym("_section_options")),
        ]),
    );
    g.hidden(
        "_section_options",
        choice([
            seq([tok(COMMA), sym("_section_option")]),
            seq([sym("_section_options"), tok(COMMA), sym("_section_option")]),
        ]),
    );
    g.hidden(
        "_section_option",
        choice([node(BANK_SPEC), node(ALIGN_SPEC)]),
    );

    g.node(RSSET_DIRECTIVE, seq([tok(RSSET_KW), sym("_arg")]));
    g.node(
        INCBIN_DIRECTIVE,
        seq([
            tok(INCBIN_KW),
            sym("_arg"),
            opt(seq([
                tok(COMMA),
                sym("_arg"),
                opt(seq([tok(COMMA), sym("_arg")])),
            ])),
        ]),
    );
    g.node(
        CHARMAP_DIRECTIVE,
        seq([
            tok(CHARMAP_KW),
            sym("_arg"),
            opt(seq([tok(COMMA), sym("_expr_list")])),
        ]),
    );
    g.node(
        NEWCHARMAP_DIRECTIVE,
        seq([
            tok(NEWCHARMAP_KW),
            tok(IDENT),
            opt(seq([tok(COMMA), tok(IDENT)])),
        ]),
    );
    g.node(
        SETCHARMAP_DIRECTIVE,
        seq([one_of(&[SETCHARMAP_KW, PUSHC_KW]), tok(IDENT)]),
    );
    g.node(SHIFT_DIRECTIVE, seq([tok(SHIFT_KW), opt(sym("_arg"))]));
    g.node(FAIL_DIRECTIVE, seq([tok(FAIL_KW), sym("_arg")]));
    g.node(WARN_DIRECTIVE, seq([tok(WARN_KW), sym("_arg")]));
    g.node(
        ASSERT_DIRECTIVE,
        seq([
            one_of(&[ASSERT_KW, STATIC_ASSERT_KW]),
            opt(seq([one_of(&[WARN_KW, FAIL_KW, FATAL_KW]), tok(COMMA)])),
            sym("_arg"),
            opt(seq([tok(COMMA), sym("_arg")])),
        ]),
    );
    g.node(PURGE_DIRECTIVE, seq([tok(PURGE_KW), names()]));
    g.node(
        OPT_DIRECTIVE,
        choice([
            seq([one_of(&[OPT_KW, PUSHO_KW]), sym("_raw_args")]),
            tok(OPT_KW),
        ]),
    );
    g.node(
        ALIGN_DIRECTIVE,
        seq([tok(ALIGN_KW), sym("_arg"), opt(seq([tok(COMMA), sym("_arg")]))]),
    );
    g.node(SIMPLE_DIRECTIVE, one_of(SIMPLE_DIRECTIVES));
}
