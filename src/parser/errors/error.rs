//! Diagnostics attached to a syntax tree
//!
//! Every recovered region, invalid character and unterminated block gets a
//! [`SyntaxError`] with an [`ErrorCode`], the offending range, an optional
//! hint and, for blocks, the range of the opener.

use rowan::{TextRange, TextSize};

use super::codes::ErrorCode;
use super::context::ParseContext;
use crate::parser::SyntaxKind;

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }
}

/// A second location an error points at, such as the `IF` that never
/// reached its `ENDC`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub message: String,
    pub range: TextRange,
}

impl RelatedInfo {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// A syntax or lexical diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
    pub code: ErrorCode,
    pub severity: Severity,
    /// Suggestion such as "add 'ENDR' to close the block"
    pub hint: Option<String>,
    pub related: Vec<RelatedInfo>,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            range,
            code,
            severity: Severity::Error,
            hint: None,
            related: vec![],
        }
    }

    /// Zero-width error at `offset`
    pub fn at_offset(message: impl Into<String>, offset: TextSize, code: ErrorCode) -> Self {
        Self::new(message, TextRange::empty(offset), code)
    }

    pub fn builder(code: ErrorCode) -> SyntaxErrorBuilder {
        SyntaxErrorBuilder::new(code)
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Move the error by `delta` bytes
    pub(crate) fn shifted(mut self, delta: i64) -> Self {
        let shift = |range: TextRange| {
            let moved = |offset: TextSize| {
                TextSize::new((i64::from(u32::from(offset)) + delta).max(0) as u32)
            };
            TextRange::new(moved(range.start()), moved(range.end()))
        };
        self.range = shift(self.range);
        for info in &mut self.related {
            info.range = shift(info.range);
        }
        self
    }
}

/// Builder for diagnostics that carry a hint or related locations
pub struct SyntaxErrorBuilder {
    code: ErrorCode,
    message: Option<String>,
    range: TextRange,
    hint: Option<String>,
    related: Vec<RelatedInfo>,
}

impl SyntaxErrorBuilder {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            message: None,
            range: TextRange::empty(TextSize::new(0)),
            hint: None,
            related: vec![],
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn range(mut self, range: TextRange) -> Self {
        self.range = range;
        self
    }

    pub fn at_offset(self, offset: TextSize) -> Self {
        self.range(TextRange::empty(offset))
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn related(mut self, message: impl Into<String>, range: TextRange) -> Self {
        self.related.push(RelatedInfo::new(message, range));
        self
    }

    /// Without a message the code's default message is used
    pub fn build(self) -> SyntaxError {
        SyntaxError {
            message: self
                .message
                .unwrap_or_else(|| self.code.default_message().to_string()),
            range: self.range,
            code: self.code,
            severity: Severity::Error,
            hint: self.hint,
            related: self.related,
        }
    }
}

/// Build the diagnostic for an unexpected token
///
/// `expected` lists the tokens the parser could have used; an empty or
/// overly long list falls back to the context's generic description.
pub fn unexpected_token(
    found: SyntaxKind,
    context: ParseContext,
    expected: &[SyntaxKind],
    range: TextRange,
) -> SyntaxError {
    let message = format!("unexpected {} {}", found.describe(), context.description());
    SyntaxError::builder(context.error_code(found))
        .message(message)
        .range(range)
        .hint(format!("expected {}", expected_list(expected, context)))
        .build()
}

fn expected_list(expected: &[SyntaxKind], context: ParseContext) -> String {
    const MAX_LISTED: usize = 6;

    let mut names: Vec<String> = Vec::new();
    for kind in expected {
        let name = kind.describe();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    if names.len() > MAX_LISTED {
        return context.expected_description().to_string();
    }
    match names.split_last() {
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
        None => context.expected_description().to_string(),
    }
}
