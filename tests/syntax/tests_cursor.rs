//! Cursor navigation and positions over whole programs

use rgbasm::{Position, Span, SyntaxKind, TextSize, parse};

use crate::helpers::source_fixtures::{HELLO_WORLD, MACROS_AND_BLOCKS};

#[test]
fn test_preorder_visits_every_element() {
    let tree = parse(MACROS_AND_BLOCKS).unwrap();
    let visited = tree.walk().preorder().count();
    let expected = tree.syntax().descendants_with_tokens().count();
    assert_eq!(visited, expected);
}

#[test]
fn test_walk_top_level_with_cursor() {
    let tree = parse(HELLO_WORLD).unwrap();
    assert!(!tree.has_errors(), "{:?}", tree.errors());

    let mut cursor = tree.walk();
    assert!(cursor.goto_first_child());
    let mut labels = Vec::new();
    loop {
        if cursor.kind() == SyntaxKind::LABEL {
            labels.push(cursor.text());
        }
        if !cursor.goto_next_sibling() {
            break;
        }
    }
    assert_eq!(labels, ["EntryPoint:", ".waitVBlank"]);
}

#[test]
fn test_descend_to_offset() {
    let tree = parse(HELLO_WORLD).unwrap();
    let offset = TextSize::try_from(HELLO_WORLD.find("rNR52").unwrap()).unwrap();

    let mut cursor = tree.walk();
    while cursor.goto_first_child_for_offset(offset) {}
    assert!(cursor.is_token());
    assert_eq!(cursor.kind(), SyntaxKind::IDENT);
    assert_eq!(cursor.text(), "rNR52");

    let mut kinds = Vec::new();
    while cursor.goto_parent() {
        kinds.push(cursor.kind());
    }
    assert_eq!(
        kinds,
        [
            SyntaxKind::NAME_REF,
            SyntaxKind::MEM_OPERAND,
            SyntaxKind::INSTRUCTION,
            SyntaxKind::SOURCE_FILE,
        ]
    );
}

#[test]
fn test_spans_use_lines_and_columns() {
    let tree = parse(HELLO_WORLD).unwrap();
    let entry = tree
        .syntax()
        .children()
        .find(|n| n.kind() == SyntaxKind::LABEL)
        .unwrap();
    assert_eq!(
        tree.span(entry.text_range()),
        Span::new(Position::new(9, 0), Position::new(9, 11))
    );
}

#[test]
fn test_cursor_flags_errors() {
    let tree = parse("nop\nld a, )\n").unwrap();
    let errors: Vec<_> = tree
        .walk()
        .preorder()
        .filter(|e| e.kind() == SyntaxKind::ERROR)
        .map(|e| e.text_range())
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0], tree.error_nodes().next().unwrap().text_range());
}
