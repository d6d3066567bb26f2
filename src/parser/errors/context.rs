//! Parse context tracking for context-aware error messages
//!
//! When the parser hits a token it cannot use, it derives a context from
//! the construct under construction so messages can say where in the
//! source structure the error occurred.

use super::codes::ErrorCode;
use crate::parser::SyntaxKind;

/// Represents the current parsing context
///
/// Used to generate context-aware error messages and pick error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParseContext {
    /// At the start of a top-level line
    #[default]
    TopLevel,
    /// At the start of a line inside a block body
    BlockBody,

    /// After a label
    Label,
    /// Parsing an instruction's operands
    Instruction,
    /// Inside a memory operand `[...]`
    MemOperand,
    /// Parsing macro invocation arguments
    MacroCall,

    /// Parsing a `MACRO`, `REPT`, `FOR`, `IF` or `ELIF` header
    BlockHeader,
    /// Parsing a `DEF`/`REDEF` symbol definition
    SymbolDefinition,
    /// Parsing a `SECTION`, `PUSHS` or `LOAD` declaration
    SectionDeclaration,
    /// Parsing `DB`, `DW`, `DL` or `DS`
    DataDirective,
    /// Parsing any other directive
    Directive,

    /// Parsing an expression
    Expression,
    /// Inside parentheses
    Parenthesized,
    /// Inside a function call's argument list
    CallArguments,
}

impl ParseContext {
    /// Map the node kind being built to a context
    pub fn from_node_kind(kind: SyntaxKind) -> Self {
        use SyntaxKind::*;
        match kind {
            LABEL => Self::Label,
            INSTRUCTION => Self::Instruction,
            MEM_OPERAND => Self::MemOperand,
            MACRO_CALL | RAW_ARG => Self::MacroCall,
            MACRO_DEF | REPT_BLOCK | FOR_BLOCK | IF_BLOCK | ELIF_CLAUSE | ELSE_CLAUSE => {
                Self::BlockHeader
            }
            SYMBOL_DEF => Self::SymbolDefinition,
            SECTION_DIRECTIVE | BANK_SPEC => Self::SectionDeclaration,
            DATA_DIRECTIVE | DS_DIRECTIVE | ALIGN_SPEC => Self::DataDirective,
            PAREN_EXPR => Self::Parenthesized,
            CALL_EXPR => Self::CallArguments,
            k if k.is_expr() => Self::Expression,
            SOURCE_FILE => Self::TopLevel,
            _ => Self::Directive,
        }
    }

    /// Get a human-readable description of this context for error messages
    pub fn description(&self) -> &'static str {
        match self {
            Self::TopLevel => "at start of line",
            Self::BlockBody => "in block body",
            Self::Label => "after label",
            Self::Instruction => "in instruction",
            Self::MemOperand => "in memory operand",
            Self::MacroCall => "in macro arguments",
            Self::BlockHeader => "in block header",
            Self::SymbolDefinition => "in symbol definition",
            Self::SectionDeclaration => "in section declaration",
            Self::DataDirective => "in data directive",
            Self::Directive => "in directive",
            Self::Expression => "in expression",
            Self::Parenthesized => "in parentheses",
            Self::CallArguments => "in function arguments",
        }
    }

    /// Get a description of what tokens are expected in this context
    pub fn expected_description(&self) -> &'static str {
        match self {
            Self::TopLevel | Self::BlockBody => "a label, instruction, directive or macro call",
            Self::Label => "an instruction, directive or end of line",
            Self::Instruction => "an operand (register, condition or expression)",
            Self::MemOperand => "an address or register followed by ']'",
            Self::MacroCall => "comma separated arguments",
            Self::BlockHeader => "a condition or count followed by end of line",
            Self::SymbolDefinition => "a name, an assignment operator and a value",
            Self::SectionDeclaration => "a name, a section type and options",
            Self::DataDirective => "comma separated expressions",
            Self::Directive => "directive arguments",
            Self::Expression => "an expression (number, symbol or operator)",
            Self::Parenthesized => "an expression followed by ')'",
            Self::CallArguments => "comma separated arguments followed by ')'",
        }
    }

    /// Pick the error code for an unexpected `found` token
    pub fn error_code(&self, found: SyntaxKind) -> ErrorCode {
        let at_end = matches!(found, SyntaxKind::NEWLINE | SyntaxKind::EOF);
        match self {
            Self::TopLevel | Self::BlockBody | Self::Label | Self::MacroCall
                if found == SyntaxKind::EOF =>
            {
                ErrorCode::E0203
            }
            Self::TopLevel | Self::BlockBody if is_block_terminator(found) => ErrorCode::E0302,
            Self::TopLevel | Self::BlockBody => ErrorCode::E0201,
            Self::Label => ErrorCode::E0202,
            Self::Instruction if at_end => ErrorCode::E0402,
            Self::Instruction => ErrorCode::E0405,
            Self::MemOperand if at_end => ErrorCode::E0404,
            Self::MemOperand => ErrorCode::E0405,
            Self::MacroCall => ErrorCode::E0901,
            Self::BlockHeader => ErrorCode::E0303,
            Self::SymbolDefinition => ErrorCode::E0503,
            Self::SectionDeclaration => ErrorCode::E0502,
            Self::DataDirective | Self::Directive => ErrorCode::E0501,
            Self::Expression if at_end => ErrorCode::E0402,
            Self::Parenthesized | Self::CallArguments if at_end => ErrorCode::E0403,
            Self::Expression | Self::Parenthesized | Self::CallArguments => ErrorCode::E0401,
        }
    }

    /// Check if this context is at the start of a line
    pub fn is_line_start(&self) -> bool {
        matches!(self, Self::TopLevel | Self::BlockBody)
    }

    /// Check if this context is inside an expression
    pub fn is_in_expression(&self) -> bool {
        matches!(
            self,
            Self::Expression | Self::Parenthesized | Self::CallArguments
        )
    }
}

/// Keywords that close or continue a block
pub fn is_block_terminator(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::ENDM_KW
            | SyntaxKind::ENDR_KW
            | SyntaxKind::ENDC_KW
            | SyntaxKind::ELSE_KW
            | SyntaxKind::ELIF_KW
    )
}

/// Terminator expected by a block opener keyword
pub fn block_terminator(opener: SyntaxKind) -> Option<SyntaxKind> {
    match opener {
        SyntaxKind::MACRO_KW => Some(SyntaxKind::ENDM_KW),
        SyntaxKind::REPT_KW | SyntaxKind::FOR_KW => Some(SyntaxKind::ENDR_KW),
        SyntaxKind::IF_KW => Some(SyntaxKind::ENDC_KW),
        _ => None,
    }
}
