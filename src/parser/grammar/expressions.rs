//! Expression rules
//!
//! Binary operators are listed from loosest to tightest binding:
//!
//! | level | operators                     | assoc |
//! |-------|-------------------------------|-------|
//! | 1     | `\|\|`                        | left  |
//! | 2     | `&&`                          | left  |
//! | 3     | `== != < > <= >=`             | left  |
//! | 4     | `+ - ++`                      | left  |
//! | 5     | `& \| ^`                      | left  |
//! | 6     | `<< >> >>>`                   | left  |
//! | 7     | `* / %`                       | left  |
//! | 8     | unary `+ - ~ !`               | right |
//! | 9     | `**`                          | right |

use super::{Assoc, GrammarBuilder, choice, node, one_of, opt, prec, seq, sym, tok};
use crate::parser::SyntaxKind::{self, *};

const LOGICAL_OR: &[SyntaxKind] = &[PIPE_PIPE];
const LOGICAL_AND: &[SyntaxKind] = &[AMP_AMP];
const COMPARISON: &[SyntaxKind] = &[EQ_EQ, BANG_EQ, LT, GT, LT_EQ, GT_EQ];
const ADDITIVE: &[SyntaxKind] = &[PLUS, MINUS, PLUS_PLUS];
const BITWISE: &[SyntaxKind] = &[AMP, PIPE, CARET];
const SHIFT: &[SyntaxKind] = &[SHL, SHR, USHR];
const MULTIPLICATIVE: &[SyntaxKind] = &[STAR, SLASH, PERCENT];
const POWER: &[SyntaxKind] = &[STAR_STAR];

pub(super) const LITERALS: &[SyntaxKind] = &[
    DEC_NUMBER,
    HEX_NUMBER,
    BIN_NUMBER,
    OCT_NUMBER,
    GFX_NUMBER,
    FIXED_NUMBER,
    STRING,
    CHAR,
];

/// Declare operator precedence and the expression rules.
///
/// Defines `_expr`, `_arg` (an expression or an error slot) and
/// `_expr_list` (comma separated `_arg`s).
pub(super) fn define(g: &mut GrammarBuilder) {
    g.precedence(Assoc::Left, LOGICAL_OR);
    g.precedence(Assoc::Left, LOGICAL_AND);
    g.precedence(Assoc::Left, COMPARISON);
    g.precedence(Assoc::Left, ADDITIVE);
    g.precedence(Assoc::Left, BITWISE);
    g.precedence(Assoc::Left, SHIFT);
    g.precedence(Assoc::Left, MULTIPLICATIVE);
    let unary = g.precedence(Assoc::Right, &[]);
    g.precedence(Assoc::Right, POWER);

    g.hidden(
        "_expr",
        choice([
            node(BINARY_EXPR),
            node(UNARY_EXPR),
            node(PAREN_EXPR),
            node(CALL_EXPR),
            node(LITERAL),
            node(NAME_REF),
            node(MACRO_ARG_REF),
        ]),
    );

    let binary_ops: Vec<SyntaxKind> = [
        LOGICAL_OR,
        LOGICAL_AND,
        COMPARISON,
        ADDITIVE,
        BITWISE,
        SHIFT,
        MULTIPLICATIVE,
        POWER,
    ]
    .concat();
    g.node(BINARY_EXPR, seq([sym("_expr"), one_of(&binary_ops), sym("_expr")]));

    g.node(
        UNARY_EXPR,
        prec(unary, seq([one_of(&[PLUS, MINUS, TILDE, BANG]), sym("_expr")])),
    );

    g.node(
        PAREN_EXPR,
        seq([tok(L_PAREN), choice([sym("_expr"), tok(ERROR)]), tok(R_PAREN)]),
    );

    // Built-in functions share the syntax of user callees
    g.node(
        CALL_EXPR,
        seq([
            one_of(&[IDENT, DEF_KW, BANK_KW, SECTION_KW]),
            tok(L_PAREN),
            opt(seq([sym("_expr_list"), opt(tok(COMMA))])),
            tok(R_PAREN),
        ]),
    );

    g.node(LITERAL, one_of(LITERALS));
    g.node(NAME_REF, one_of(&[IDENT, LOCAL_IDENT, AT, ANON_LABEL_REF]));
    g.node(MACRO_ARG_REF, tok(MACRO_ARG));

    g.hidden("_arg", choice([sym("_expr"), tok(ERROR)]));
    g.hidden(
        "_expr_list",
        choice([sym("_arg"), seq([sym("_expr_list"), tok(COMMA), sym("_arg")])]),
    );
}
