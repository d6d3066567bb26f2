//! Deeply nested input parses and is released without exhausting the stack

use rgbasm::{InputEdit, SyntaxKind, TextSize, parse, reparse};

/// Run `f` on a thread with a small stack, as editor worker threads have
fn on_small_stack(f: impl FnOnce() + Send + 'static) {
    std::thread::Builder::new()
        .stack_size(2 << 20)
        .spawn(f)
        .unwrap()
        .join()
        .unwrap();
}

#[test]
fn test_long_operator_chain() {
    on_small_stack(|| {
        let text = format!("DEF X = 1{}\nnop\n", " + 1".repeat(50_000));
        let tree = parse(&text).unwrap();
        assert!(!tree.has_errors(), "{:?}", tree.errors());
        assert_eq!(usize::from(tree.text_len()), text.len());
        let kinds: Vec<_> = tree.syntax().children().map(|n| n.kind()).collect();
        assert_eq!(kinds, [SyntaxKind::SYMBOL_DEF, SyntaxKind::INSTRUCTION]);
    });
}

#[test]
fn test_deep_parentheses() {
    on_small_stack(|| {
        let depth = 10_000;
        let text = format!("db {}1{}\n", "(".repeat(depth), ")".repeat(depth));
        let tree = parse(&text).unwrap();
        assert!(!tree.has_errors(), "{:?}", tree.errors());
        let parens = tree
            .syntax()
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::PAREN_EXPR)
            .count();
        assert_eq!(parens, depth);
    });
}

#[test]
fn test_reparse_of_long_chain_releases_both_trees() {
    on_small_stack(|| {
        let old_text = format!("DEF X = 1{}\nhalt\n", " * 2".repeat(50_000));
        let old = parse(&old_text).unwrap();

        let at = TextSize::try_from(old_text.len() - "halt\n".len()).unwrap();
        let edit = InputEdit::insert(&old_text, at, "nop\n");
        let mut text = old_text.clone();
        text.insert_str(usize::from(at), "nop\n");

        let new = reparse(&old, &text, &edit).unwrap();
        assert_eq!(new.text_len(), old.text_len() + TextSize::new(4));
        assert!(!new.has_errors());
        drop(old);
        drop(new);
    });
}
