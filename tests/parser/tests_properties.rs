//! Property tests over generated files and edits

use proptest::prelude::*;
use rgbasm::{InputEdit, Language, Parser, TextRange, TextSize, parse, parse_bytes};

use crate::helpers::source_fixtures::{BROKEN_LINES, EDIT_SNIPPETS, VALID_LINES};
use crate::helpers::tree_assertions::{assert_same_tree, shape, token_text};

fn line() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => proptest::sample::select(VALID_LINES).prop_map(str::to_string),
        1 => proptest::sample::select(BROKEN_LINES).prop_map(str::to_string),
        1 => proptest::sample::select(EDIT_SNIPPETS).prop_map(|s| s.trim_end().to_string()),
    ]
}

fn file() -> impl Strategy<Value = String> {
    proptest::collection::vec(line(), 0..12).prop_map(|lines| {
        let mut text = lines.join("\n");
        text.push('\n');
        text
    })
}

/// An edit anywhere in `text` with a snippet or short ASCII run
fn edit_of(text: String) -> impl Strategy<Value = (String, InputEdit, String)> {
    let len = text.len();
    let replacement = prop_oneof![
        proptest::sample::select(EDIT_SNIPPETS).prop_map(str::to_string),
        "[ -~\n]{0,8}",
    ];
    (0..=len, 0..=len, replacement).prop_map(move |(a, b, replacement)| {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        let range = TextRange::new(
            TextSize::try_from(start).unwrap(),
            TextSize::try_from(end).unwrap(),
        );
        let edit = InputEdit::replace(&text, range, &replacement);
        let mut new_text = text.clone();
        new_text.replace_range(start..end, &replacement);
        (text.clone(), edit, new_text)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_any_bytes_parse_totally(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let tree = parse_bytes(&bytes).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        prop_assert_eq!(tree.text(), text.as_ref());
        prop_assert_eq!(usize::from(tree.text_len()), text.len());
    }

    #[test]
    fn prop_tokens_cover_input(text in file()) {
        let tree = parse(&text).unwrap();
        prop_assert_eq!(token_text(&tree), text);
    }

    #[test]
    fn prop_ascii_noise_covers_input(text in "[ -~\t\n]{0,200}") {
        let tree = parse(&text).unwrap();
        prop_assert_eq!(token_text(&tree), text);
    }

    #[test]
    fn prop_parse_is_idempotent(text in file()) {
        let first = parse(&text).unwrap();
        let second = parse(&text).unwrap();
        prop_assert_eq!(shape(&first), shape(&second));
        prop_assert_eq!(first.errors(), second.errors());
    }

    #[test]
    fn prop_reparse_equals_scratch((old_text, edit, new_text) in file().prop_flat_map(edit_of)) {
        let parser = Parser::new(Language::rgbasm().unwrap());
        let old = parser.parse(&old_text, None);
        let incremental = parser.parse(&new_text, Some((&old, &edit)));
        assert_same_tree(&incremental, &parser.parse(&new_text, None));
    }

    #[test]
    fn prop_broken_line_leaves_neighbours_alone(
        before in proptest::collection::vec(proptest::sample::select(VALID_LINES), 0..6),
        broken in proptest::sample::select(BROKEN_LINES),
        after in proptest::collection::vec(proptest::sample::select(VALID_LINES), 0..6),
    ) {
        let head: String = before.iter().map(|l| format!("{l}\n")).collect();
        let tail: String = after.iter().map(|l| format!("{l}\n")).collect();
        let text = format!("{head}{broken}\n{tail}");
        let tree = parse(&text).unwrap();

        let start = TextSize::of(head.as_str());
        let line = TextRange::at(start, TextSize::of(broken));
        for error in tree.error_nodes() {
            prop_assert!(line.contains_range(error.text_range()));
        }

        // Lines before and after parse exactly as they do on their own
        let clean = parse(&format!("{head}{tail}")).unwrap();
        let shift = TextSize::of(broken) + TextSize::new(1);
        let outside: Vec<_> = tree
            .syntax()
            .children()
            .filter(|n| !line.contains_range(n.text_range()))
            .map(|n| {
                let range = n.text_range();
                let range = if range.start() > line.start() { range - shift } else { range };
                (n.kind(), range, n.text().to_string())
            })
            .collect();
        let expected: Vec<_> = clean
            .syntax()
            .children()
            .map(|n| (n.kind(), n.text_range(), n.text().to_string()))
            .collect();
        prop_assert_eq!(outside, expected);
    }
}
