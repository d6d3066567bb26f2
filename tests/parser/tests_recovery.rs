//! Error recovery and diagnostics

use rgbasm::{
    ErrorCode, Language, ParseError, ParseOptions, Parser, Severity, SyntaxKind, TextRange,
    TextSize, parse, parse_bytes,
};
use rstest::rstest;
use tokio_util::sync::CancellationToken;

use crate::helpers::source_fixtures::{BROKEN_LINES, HELLO_WORLD};
use crate::helpers::tree_assertions::{shape, token_text, top_level_kinds};

#[rstest]
#[case("ld a, )")]
#[case("DEF = 4")]
#[case("db 1 +")]
#[case(") )")]
#[case("SECTION ,")]
#[case("ld [hl, a")]
fn test_broken_line_stays_local(#[case] broken: &str) {
    let text = format!("nop\n{broken}\nhalt\n");
    let tree = parse(&text).unwrap();
    assert_eq!(tree.text(), text);
    assert!(tree.has_errors());
    assert!(!tree.errors().is_empty());

    let line = TextRange::at(TextSize::new(4), TextSize::of(broken));
    for error in tree.error_nodes() {
        assert!(
            line.contains_range(error.text_range()),
            "{error:?} escapes {line:?}\n{}",
            tree.debug_dump()
        );
    }

    let kinds = top_level_kinds(&tree);
    assert_eq!(kinds.first(), Some(&SyntaxKind::INSTRUCTION));
    assert_eq!(kinds.last(), Some(&SyntaxKind::INSTRUCTION));
    let last = tree.syntax().last_child().unwrap();
    assert_eq!(last.text(), "halt");
    assert_eq!(last.text_range().start(), line.end() + TextSize::new(1));
}

#[test]
fn test_broken_lines_are_independent() {
    let text: String = BROKEN_LINES.iter().map(|l| format!("{l}\nnop\n")).collect();
    let tree = parse(&text).unwrap();
    let nops = tree
        .syntax()
        .children()
        .filter(|n| n.text() == "nop")
        .count();
    assert_eq!(nops, BROKEN_LINES.len());
}

#[test]
fn test_unterminated_block_points_at_opener() {
    let text = "Main:\n  REPT 3\n    nop\n";
    let tree = parse(text).unwrap();
    let error = tree
        .errors()
        .iter()
        .find(|e| e.code == ErrorCode::E0301)
        .expect("unterminated block diagnostic");
    assert_eq!(error.severity, Severity::Error);
    assert!(error.message.contains("'REPT'"), "{}", error.message);
    assert!(error.hint.as_deref().unwrap_or_default().contains("'ENDR'"));
    assert_eq!(error.related.len(), 1);
    assert_eq!(error.related[0].range, TextRange::at(TextSize::new(8), TextSize::new(4)));
    assert_eq!(tree.text(), text);
}

#[test]
fn test_stray_terminator() {
    let tree = parse("nop\nENDC\nhalt\n").unwrap();
    assert!(tree.has_errors());
    assert_eq!(
        top_level_kinds(&tree),
        [SyntaxKind::INSTRUCTION, SyntaxKind::ERROR, SyntaxKind::INSTRUCTION]
    );
}

#[test]
fn test_unknown_characters_become_tokens() {
    let tree = parse("nop é\nhalt\n").unwrap();
    assert_eq!(tree.text(), "nop é\nhalt\n");
    assert!(tree.errors().iter().any(|e| e.code == ErrorCode::E0101));
    assert!(
        tree.syntax()
            .descendants_with_tokens()
            .any(|e| e.kind() == SyntaxKind::UNKNOWN)
    );
}

#[test]
fn test_unterminated_string_is_reported() {
    let tree = parse("db \"oops\nnop\n").unwrap();
    assert_eq!(tree.text(), "db \"oops\nnop\n");
    assert!(tree.has_errors());
    assert_eq!(tree.syntax().last_child().unwrap().text(), "nop");
}

#[rstest]
#[case(b"".as_slice())]
#[case(b"\xff\xfe\x00\x01".as_slice())]
#[case(b"ld a, \xe2\x82".as_slice())]
#[case(b"\n\n\n)))(((\n".as_slice())]
fn test_garbage_is_total(#[case] bytes: &[u8]) {
    let tree = parse_bytes(bytes).unwrap();
    let text = String::from_utf8_lossy(bytes);
    assert_eq!(tree.text(), text);
    assert_eq!(token_text(&tree), text);
}

#[test]
fn test_recovery_limit_is_respected() {
    let options = ParseOptions {
        max_recovery_tokens: 2,
        ..ParseOptions::default()
    };
    let parser = Parser::with_options(Language::rgbasm().unwrap(), options);
    let text = "ld a, ) 1 2 3 4 5 6\nnop\n";
    let tree = parser.parse(text, None);
    assert_eq!(tree.text(), text);
    assert_eq!(tree.syntax().last_child().unwrap().text(), "nop");
}

#[test]
fn test_cancelled_parse_fails() {
    let parser = Parser::new(Language::rgbasm().unwrap());
    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = parser.parse_with_cancellation(HELLO_WORLD, None, &cancel);
    assert_eq!(result.unwrap_err(), ParseError::Cancelled);
}

#[test]
fn test_parser_is_shared_across_threads() {
    let parser = Parser::new(Language::rgbasm().unwrap());
    let expected = shape(&parser.parse(HELLO_WORLD, None));
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| shape(&parser.parse(HELLO_WORLD, None))))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
