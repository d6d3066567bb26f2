//! Compiled grammar handles and persisted table blobs

use rgbasm::Language;

#[test]
fn test_shipped_language_is_shared() {
    let a = Language::rgbasm().unwrap();
    let b = Language::rgbasm().unwrap();
    assert_eq!(a.grammar_version(), b.grammar_version());
    assert!(std::ptr::eq(a.table(), b.table()));
}

#[cfg(feature = "persist")]
mod persist {
    use super::*;
    use rgbasm::{GrammarLoadError, Parser};

    use crate::helpers::source_fixtures::{HELLO_WORLD, MACROS_AND_BLOCKS};
    use crate::helpers::tree_assertions::assert_same_tree;

    fn blob() -> Vec<u8> {
        Language::rgbasm().unwrap().to_bytes().unwrap()
    }

    #[test]
    fn test_loaded_table_parses_identically() {
        let loaded = Language::from_bytes(&blob()).unwrap();
        assert_eq!(loaded.grammar_version(), Language::rgbasm().unwrap().grammar_version());
        let shipped = Parser::new(Language::rgbasm().unwrap());
        let loaded = Parser::new(loaded);
        for text in [HELLO_WORLD, MACROS_AND_BLOCKS, "db 1 +\n) )\n"] {
            assert_same_tree(&loaded.parse(text, None), &shipped.parse(text, None));
        }
    }

    #[test]
    fn test_newer_schema_is_rejected() {
        let mut bytes = blob();
        bytes[4..6].copy_from_slice(&99u16.to_le_bytes());
        assert!(matches!(
            Language::from_bytes(&bytes),
            Err(GrammarLoadError::SchemaMismatch { found: 99, .. })
        ));
    }

    #[test]
    fn test_truncated_blob_is_rejected() {
        let bytes = blob();
        assert!(matches!(
            Language::from_bytes(&bytes[..bytes.len() / 2]),
            Err(GrammarLoadError::Malformed(_))
        ));
        assert!(matches!(
            Language::from_bytes(&bytes[..3]),
            Err(GrammarLoadError::Malformed(_))
        ));
    }

    #[test]
    fn test_foreign_blob_is_rejected() {
        assert!(matches!(
            Language::from_bytes(b"PK\x03\x04 not a table"),
            Err(GrammarLoadError::Malformed(_))
        ));
    }
}
