//! Structural comparison of syntax trees

use rgbasm::{ErrorCode, SyntaxKind, SyntaxTree, TextRange};
use rowan::WalkEvent;

/// Every node and token in preorder with its range
pub fn shape(tree: &SyntaxTree) -> Vec<(SyntaxKind, TextRange)> {
    tree.syntax()
        .preorder_with_tokens()
        .filter_map(|event| match event {
            WalkEvent::Enter(element) => Some((element.kind(), element.text_range())),
            WalkEvent::Leave(_) => None,
        })
        .collect()
}

/// Diagnostic codes and ranges
pub fn diagnostics(tree: &SyntaxTree) -> Vec<(ErrorCode, TextRange)> {
    tree.errors().iter().map(|e| (e.code, e.range)).collect()
}

/// Kinds of the root's child nodes
pub fn top_level_kinds(tree: &SyntaxTree) -> Vec<SyntaxKind> {
    tree.syntax().children().map(|n| n.kind()).collect()
}

/// Concatenated text of all tokens in document order
pub fn token_text(tree: &SyntaxTree) -> String {
    tree.syntax()
        .descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .map(|t| t.text().to_string())
        .collect()
}

#[track_caller]
pub fn assert_same_tree(actual: &SyntaxTree, expected: &SyntaxTree) {
    assert_eq!(actual.text(), expected.text());
    assert_eq!(
        shape(actual),
        shape(expected),
        "\nactual:\n{}\nexpected:\n{}",
        actual.debug_dump(),
        expected.debug_dump()
    );
    assert_eq!(diagnostics(actual), diagnostics(expected));
}
