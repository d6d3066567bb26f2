//! Binary blobs of compiled parse tables
//!
//! Layout: the 4-byte magic `RGBT`, a little-endian `u16` schema version,
//! then the postcard encoding of [`ParseTable`]. The schema version covers
//! the blob layout; the grammar version inside the table covers the
//! language (keywords, literal forms, rules).

use super::ParseTable;
use crate::parser::grammar::GRAMMAR_VERSION;
use crate::parser::language::GrammarLoadError;

pub const TABLE_MAGIC: [u8; 4] = *b"RGBT";
pub const SCHEMA_VERSION: u16 = 1;

const HEADER_SIZE: usize = 6;

pub fn to_bytes(table: &ParseTable) -> Result<Vec<u8>, GrammarLoadError> {
    let mut out = Vec::new();
    out.extend_from_slice(&TABLE_MAGIC);
    out.extend_from_slice(&SCHEMA_VERSION.to_le_bytes());
    let out = postcard::to_extend(table, out).map_err(|e| GrammarLoadError::Encode(e.to_string()))?;
    Ok(out)
}

pub fn from_bytes(bytes: &[u8]) -> Result<ParseTable, GrammarLoadError> {
    if bytes.len() < HEADER_SIZE {
        return Err(GrammarLoadError::Malformed("blob shorter than its header".into()));
    }
    if bytes[0..4] != TABLE_MAGIC {
        return Err(GrammarLoadError::Malformed(format!(
            "bad magic {:02x?}",
            &bytes[0..4]
        )));
    }
    let schema = u16::from_le_bytes([bytes[4], bytes[5]]);
    if schema != SCHEMA_VERSION {
        return Err(GrammarLoadError::SchemaMismatch {
            found: schema,
            expected: SCHEMA_VERSION,
        });
    }

    let table: ParseTable = postcard::from_bytes(&bytes[HEADER_SIZE..])
        .map_err(|e| GrammarLoadError::Malformed(e.to_string()))?;
    if table.grammar_version != GRAMMAR_VERSION {
        return Err(GrammarLoadError::GrammarVersionMismatch {
            found: table.grammar_version,
            expected: GRAMMAR_VERSION,
        });
    }
    table.validate().map_err(GrammarLoadError::Malformed)?;
    Ok(table)
}
