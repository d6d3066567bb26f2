//! Every statement form parses to its node kind

use rgbasm::{SyntaxKind, parse};
use rstest::rstest;

use crate::helpers::tree_assertions::top_level_kinds;

#[rstest]
#[case("nop", SyntaxKind::INSTRUCTION)]
#[case("ld a, [hl+]", SyntaxKind::INSTRUCTION)]
#[case("ldh [$ff00 + c], a", SyntaxKind::INSTRUCTION)]
#[case("add sp, -2", SyntaxKind::INSTRUCTION)]
#[case("rl a", SyntaxKind::INSTRUCTION)]
#[case("LD A, B", SyntaxKind::INSTRUCTION)]
#[case("my_macro 1, \"two\", [hl]", SyntaxKind::MACRO_CALL)]
#[case("INCLUDE \"hardware.inc\"", SyntaxKind::INCLUDE_DIRECTIVE)]
#[case("DEF X EQU 1", SyntaxKind::SYMBOL_DEF)]
#[case("def x equs \"nop\"", SyntaxKind::SYMBOL_DEF)]
#[case("DEF F RB 2", SyntaxKind::SYMBOL_DEF)]
#[case("PRINTLN \"hi\", 1", SyntaxKind::PRINT_DIRECTIVE)]
#[case("EXPORT Foo, .bar", SyntaxKind::EXPORT_DIRECTIVE)]
#[case("db 1, 2, 3", SyntaxKind::DATA_DIRECTIVE)]
#[case("ds 4, $ff", SyntaxKind::DS_DIRECTIVE)]
#[case("SECTION \"a\", WRAM0", SyntaxKind::SECTION_DIRECTIVE)]
#[case("SECTION UNION \"u\", HRAM[$ff80]", SyntaxKind::SECTION_DIRECTIVE)]
#[case("LOAD \"ram code\", WRAM0", SyntaxKind::SECTION_DIRECTIVE)]
#[case("RSSET 0", SyntaxKind::RSSET_DIRECTIVE)]
#[case("INCBIN \"gfx.2bpp\", 0, 16", SyntaxKind::INCBIN_DIRECTIVE)]
#[case("CHARMAP \"A\", 1", SyntaxKind::CHARMAP_DIRECTIVE)]
#[case("NEWCHARMAP main", SyntaxKind::NEWCHARMAP_DIRECTIVE)]
#[case("SETCHARMAP main", SyntaxKind::SETCHARMAP_DIRECTIVE)]
#[case("SHIFT 2", SyntaxKind::SHIFT_DIRECTIVE)]
#[case("FAIL \"bad\"", SyntaxKind::FAIL_DIRECTIVE)]
#[case("WARN \"hmm\"", SyntaxKind::WARN_DIRECTIVE)]
#[case("ASSERT FATAL, @ < $8000", SyntaxKind::ASSERT_DIRECTIVE)]
#[case("STATIC_ASSERT 1", SyntaxKind::ASSERT_DIRECTIVE)]
#[case("PURGE X, Y", SyntaxKind::PURGE_DIRECTIVE)]
#[case("OPT Wall", SyntaxKind::OPT_DIRECTIVE)]
#[case("ALIGN 8, 2", SyntaxKind::ALIGN_DIRECTIVE)]
#[case("ENDSECTION", SyntaxKind::SIMPLE_DIRECTIVE)]
#[case("PUSHS", SyntaxKind::SIMPLE_DIRECTIVE)]
#[case("RSRESET", SyntaxKind::SIMPLE_DIRECTIVE)]
#[case("MACRO m\n  nop\nENDM", SyntaxKind::MACRO_DEF)]
#[case("REPT 4\n  nop\nENDR", SyntaxKind::REPT_BLOCK)]
#[case("FOR i, 3\n  db i\nENDR", SyntaxKind::FOR_BLOCK)]
#[case("IF 1\nELSE\nENDC", SyntaxKind::IF_BLOCK)]
fn test_statement_kind(#[case] line: &str, #[case] expected: SyntaxKind) {
    let text = format!("{line}\n");
    let tree = parse(&text).unwrap();
    assert!(!tree.has_errors(), "{:?}\n{}", tree.errors(), tree.debug_dump());
    assert_eq!(top_level_kinds(&tree), [expected]);
}

#[rstest]
#[case("1 + 2 * 3", "(1 + (2 * 3))")]
#[case("1 * 2 + 3", "((1 * 2) + 3)")]
#[case("1 - 2 - 3", "((1 - 2) - 3)")]
#[case("2 ** 3 ** 2", "(2 ** (3 ** 2))")]
#[case("-2 ** 2", "(-(2 ** 2))")]
#[case("1 || 2 && 3", "(1 || (2 && 3))")]
#[case("1 << 2 + 3", "((1 << 2) + 3)")]
#[case("1 == 2 | 3", "(1 == (2 | 3))")]
fn test_operator_precedence(#[case] expr: &str, #[case] expected: &str) {
    let tree = parse(&format!("db {expr}\n")).unwrap();
    assert!(!tree.has_errors(), "{}", tree.debug_dump());
    let data = tree.syntax().first_child().unwrap();
    let value = data.children().next().unwrap();
    assert_eq!(group(&value), expected);
}

/// Render an expression with explicit grouping
fn group(node: &rgbasm::SyntaxNode) -> String {
    let tokens = || {
        node.children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| !t.kind().is_trivia())
    };
    match node.kind() {
        SyntaxKind::BINARY_EXPR => {
            let mut operands = node.children().map(|n| group(&n));
            let lhs = operands.next().unwrap_or_default();
            let rhs = operands.next().unwrap_or_default();
            let op = tokens().next().map(|t| t.text().to_string()).unwrap_or_default();
            format!("({lhs} {op} {rhs})")
        }
        SyntaxKind::UNARY_EXPR => {
            let op = tokens().next().map(|t| t.text().to_string()).unwrap_or_default();
            let operand = node.children().next().map(|n| group(&n)).unwrap_or_default();
            format!("({op}{operand})")
        }
        _ => node.text().to_string(),
    }
}
