//! Incremental reparsing

use rgbasm::{
    InputEdit, Language, ParseOptions, Parser, SyntaxKind, SyntaxNode, SyntaxTree, TextRange,
    TextSize, parse,
};
use rstest::rstest;

use crate::helpers::source_fixtures::{HELLO_WORLD, MACROS_AND_BLOCKS};
use crate::helpers::tree_assertions::assert_same_tree;

fn parser() -> Parser {
    Parser::new(Language::rgbasm().unwrap())
}

/// Apply `replacement` over the first occurrence of `needle`
fn edit(text: &str, needle: &str, replacement: &str) -> (String, InputEdit) {
    let start = text.find(needle).expect("needle present");
    let range = TextRange::at(TextSize::try_from(start).unwrap(), TextSize::of(needle));
    let mut new_text = text.to_string();
    new_text.replace_range(start..start + needle.len(), replacement);
    (new_text, InputEdit::replace(text, range, replacement))
}

fn same_green(a: &SyntaxNode, b: &SyntaxNode) -> bool {
    std::ptr::eq(&*a.green(), &*b.green())
}

fn reparse_matches_scratch(old: &SyntaxTree, new_text: &str, edit: &InputEdit) -> SyntaxTree {
    let parser = parser();
    let incremental = parser.parse(new_text, Some((old, edit)));
    assert_same_tree(&incremental, &parser.parse(new_text, None));
    incremental
}

#[test]
fn test_edit_shares_unchanged_lines() {
    let old = parse(HELLO_WORLD).unwrap();
    let (text, edit) = edit(HELLO_WORLD, "cp 144", "cp 143");
    let new = reparse_matches_scratch(&old, &text, &edit);

    let old_children: Vec<_> = old.syntax().children().collect();
    let new_children: Vec<_> = new.syntax().children().collect();
    assert_eq!(old_children.len(), new_children.len());

    // Everything but the edited instruction is the same green node
    let changed: Vec<_> = old_children
        .iter()
        .zip(&new_children)
        .filter(|(a, b)| !same_green(a, b))
        .map(|(_, b)| b.text().to_string())
        .collect();
    assert_eq!(changed, ["cp 143"]);
}

#[test]
fn test_length_changing_edit_shifts_tail() {
    let old = parse(HELLO_WORLD).unwrap();
    let (text, edit) = edit(HELLO_WORLD, "ld a, 0", "ld a, LOW($1234)");
    let new = reparse_matches_scratch(&old, &text, &edit);

    let old_ret = old.syntax().last_child().unwrap();
    let new_ret = new.syntax().last_child().unwrap();
    assert_eq!(new_ret.text(), "ret");
    assert!(same_green(&old_ret, &new_ret));
    assert_eq!(
        u32::from(new_ret.text_range().start()) as i64,
        u32::from(old_ret.text_range().start()) as i64 + edit.delta()
    );
}

#[rstest]
#[case::open_block("jp EntryPoint", "IF 1\n\tjp EntryPoint")]
#[case::close_block("ret", "ret\nENDC")]
#[case::break_line("ld [rNR52], a", "ld [rNR52, a")]
#[case::fix_nothing("\tcp 144\n", "")]
#[case::join_lines("ROM0[$100]\n", "ROM0[$100] ")]
#[case::open_string("\"Entry point\"", "\"Entry point")]
#[case::open_comment("; Turn", "/* Turn")]
#[case::line_continuation("ld a, 0\n", "ld a, \\\n")]
fn test_structural_edits_match_scratch(#[case] needle: &str, #[case] replacement: &str) {
    let old = parse(HELLO_WORLD).unwrap();
    let (text, edit) = edit(HELLO_WORLD, needle, replacement);
    reparse_matches_scratch(&old, &text, &edit);
}

#[rstest]
#[case::macro_body("inc de", "inc e")]
#[case::drop_endr("\tENDR\nENDM", "ENDM")]
#[case::drop_endm("ENDM\n", "")]
#[case::nested_if("ELSE\n", "")]
#[case::rename("copy_bytes TILE_SIZE", "copy_bytes 16")]
fn test_block_edits_match_scratch(#[case] needle: &str, #[case] replacement: &str) {
    let old = parse(MACROS_AND_BLOCKS).unwrap();
    let (text, edit) = edit(MACROS_AND_BLOCKS, needle, replacement);
    reparse_matches_scratch(&old, &text, &edit);
}

#[test]
fn test_sequential_edits() {
    let mut text = String::from("nop\n");
    let mut tree = parse(&text).unwrap();
    for line in ["Main:", "  ld a, b", "  IF X", "    halt", "  ENDC", "  ret"] {
        let at = TextSize::of(text.as_str());
        let inserted = format!("{line}\n");
        let edit = InputEdit::insert(&text, at, &inserted);
        text.push_str(&inserted);
        tree = reparse_matches_scratch(&tree, &text, &edit);
    }
    assert!(!tree.has_errors());
    assert!(
        tree.syntax()
            .children()
            .any(|n| n.kind() == SyntaxKind::IF_BLOCK)
    );
}

#[test]
fn test_inconsistent_edit_falls_back() {
    let old = parse("nop\nhalt\n").unwrap();
    // Claims to delete past the end of the old text
    let bogus = InputEdit {
        old_end: TextSize::new(400),
        ..InputEdit::insert("nop\nhalt\n", TextSize::new(4), "")
    };
    let tree = parser().parse("nop\nstop\n", Some((&old, &bogus)));
    assert_same_tree(&tree, &parse("nop\nstop\n").unwrap());
}

#[test]
fn test_batch_options_ignore_old_tree() {
    let batch = Parser::with_options(Language::rgbasm().unwrap(), ParseOptions::batch());
    let old = batch.parse(HELLO_WORLD, None);
    assert!(old.checkpoints().is_empty());
    let (text, edit) = edit(HELLO_WORLD, "cp 144", "cp 143");
    let tree = batch.parse(&text, Some((&old, &edit)));
    assert_same_tree(&tree, &parse(&text).unwrap());
}

#[test]
fn test_checkpoints_follow_top_level_lines() {
    let tree = parse("a:\nIF 1\nnop\nENDC\nhalt\n").unwrap();
    let offsets: Vec<u32> = tree.checkpoints().iter().map(|cp| cp.offset().into()).collect();
    assert_eq!(offsets, [3, 17, 22]);
    assert_eq!(tree.checkpoints()[1].line_col().line, 4);
}
