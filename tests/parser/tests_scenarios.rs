//! Worked examples

use rgbasm::{ErrorCode, InputEdit, SyntaxKind, TextRange, TextSize, parse, reparse};
use rstest::rstest;

use crate::helpers::source_fixtures::{DANGLING_OPERATOR, LABEL_NOP};
use crate::helpers::tree_assertions::{assert_same_tree, top_level_kinds};

fn range(start: u32, end: u32) -> TextRange {
    TextRange::new(start.into(), end.into())
}

#[test]
fn test_label_then_instruction_spans() {
    let tree = parse(LABEL_NOP).unwrap();
    assert!(!tree.has_errors());
    assert_eq!(tree.text_len(), TextSize::of(LABEL_NOP));

    let children: Vec<_> = tree
        .syntax()
        .children()
        .map(|n| (n.kind(), n.text_range()))
        .collect();
    assert_eq!(
        children,
        [
            (SyntaxKind::LABEL, range(0, 6)),
            (SyntaxKind::INSTRUCTION, range(7, 10)),
        ]
    );
}

#[test]
fn test_dangling_operator_is_recovered() {
    let tree = parse(DANGLING_OPERATOR).unwrap();
    assert_eq!(tree.text(), DANGLING_OPERATOR);
    assert_eq!(tree.text_len(), TextSize::of(DANGLING_OPERATOR));

    let def = tree.syntax().first_child().unwrap();
    assert_eq!(def.kind(), SyntaxKind::SYMBOL_DEF);
    assert_eq!(def.text_range().start(), TextSize::new(0));

    let error = tree.error_nodes().next().expect("an ERROR node");
    assert_eq!(error.parent().unwrap().kind(), SyntaxKind::SYMBOL_DEF);
    assert!(error.text().to_string().starts_with('1'));

    assert_eq!(tree.errors().len(), 1);
    assert_eq!(tree.errors()[0].code, ErrorCode::E0402);
}

#[rstest]
#[case::new_line("\nhalt", "LABEL: nop\nhalt", &[SyntaxKind::LABEL, SyntaxKind::INSTRUCTION, SyntaxKind::INSTRUCTION])]
#[case::same_line("halt", "LABEL: nophalt", &[SyntaxKind::LABEL, SyntaxKind::MACRO_CALL])]
fn test_insert_after_label_reuses_label(
    #[case] inserted: &str,
    #[case] new_text: &str,
    #[case] expected: &[SyntaxKind],
) {
    let old = parse(LABEL_NOP).unwrap();
    let edit = InputEdit::insert(LABEL_NOP, TextSize::new(10), inserted);
    let new = reparse(&old, new_text, &edit).unwrap();

    assert_eq!(top_level_kinds(&new), expected);
    let old_label = old.syntax().first_child().unwrap();
    let new_label = new.syntax().first_child().unwrap();
    assert!(std::ptr::eq(&*old_label.green(), &*new_label.green()));

    assert_same_tree(&new, &parse(new_text).unwrap());
}

#[test]
fn test_empty_input() {
    let tree = parse("").unwrap();
    assert_eq!(tree.syntax().kind(), SyntaxKind::SOURCE_FILE);
    assert_eq!(tree.text_len(), TextSize::new(0));
    assert!(!tree.has_errors());
}
