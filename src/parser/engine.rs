//! Table-driven LR engine
//!
//! Builds the green tree while it parses: every stack frame carries the
//! elements of the symbol it stands for. Frames are reference counted and
//! linked to their parent, so the stack is persistent.
//!
//! ## Recovery
//!
//! On an empty table cell the engine reports one diagnostic, then walks
//! the stack from the top. The first frame that can shift the `ERROR`
//! terminal and finds, on the rest of the current line, a token the
//! automaton accepts after `ERROR` wins: everything above that frame and
//! every token skipped on the way is wrapped into one `ERROR` node.

use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::Arc;

use rowan::{GreenNode, NodeOrToken, TextRange, TextSize};
use tokio_util::sync::CancellationToken;

use super::SyntaxKind;
use super::errors::{ErrorCode, ParseContext, SyntaxError, block_terminator, unexpected_token};
use super::incremental::{Checkpoint, Resume, Splice};
use super::lexer::{Lexer, Token};
use super::options::ParseOptions;
use super::parser::ParseError;
use super::table::{ActionKind, ParseTable};
use super::tree_builder::{Children, GreenElement, TreeBuilder, element_len};

/// Source of interruption checks, consulted before every token is lexed
pub(crate) trait Interrupt {
    type Error;

    fn check(&self) -> Result<(), Self::Error>;
}

/// A parse nobody can interrupt
impl Interrupt for () {
    type Error = Infallible;

    fn check(&self) -> Result<(), Infallible> {
        Ok(())
    }
}

impl Interrupt for &CancellationToken {
    type Error = ParseError;

    fn check(&self) -> Result<(), ParseError> {
        if self.is_cancelled() {
            Err(ParseError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// One entry of the parse stack
#[derive(Debug)]
struct Frame {
    state: u32,
    children: Children,
    /// Offset just past the last element of the frame
    end: TextSize,
    /// Number of frames from the bottom, this one included
    depth: u32,
    parent: Option<Arc<Frame>>,
}

impl Drop for Frame {
    fn drop(&mut self) {
        let mut parent = self.parent.take();
        while let Some(frame) = parent {
            match Arc::try_unwrap(frame) {
                Ok(mut frame) => parent = frame.parent.take(),
                Err(_) => break,
            }
        }
    }
}

/// A significant token together with the trivia in front of it
#[derive(Debug)]
struct Lookahead<'a> {
    trivia: Vec<Token<'a>>,
    token: Token<'a>,
}

/// Everything a finished parse produces besides the text
#[derive(Debug)]
pub(crate) struct Output {
    pub(crate) green: GreenNode,
    pub(crate) errors: Vec<SyntaxError>,
    pub(crate) checkpoints: Vec<Checkpoint>,
    pub(crate) reused: usize,
}

pub(crate) struct Engine<'t, 'a, I: Interrupt> {
    table: &'t ParseTable,
    options: &'t ParseOptions,
    interrupt: I,
    lexer: Lexer<'a>,
    lookahead: VecDeque<Lookahead<'a>>,
    top: Arc<Frame>,
    builder: TreeBuilder,
    errors: Vec<SyntaxError>,
    checkpoints: Vec<Checkpoint>,
    /// Last significant token moved into the tree, shifted or skipped
    last_consumed: Option<SyntaxKind>,
    splice: Option<Splice<'t>>,
}

impl<'t, 'a, I: Interrupt> Engine<'t, 'a, I> {
    pub(crate) fn new(
        table: &'t ParseTable,
        options: &'t ParseOptions,
        text: &'a str,
        interrupt: I,
    ) -> Self {
        Self {
            table,
            options,
            interrupt,
            lexer: Lexer::new(text),
            lookahead: VecDeque::new(),
            top: Arc::new(Frame {
                state: ParseTable::START_STATE,
                children: Children::default(),
                end: TextSize::new(0),
                depth: 1,
                parent: None,
            }),
            builder: TreeBuilder::default(),
            errors: Vec::new(),
            checkpoints: Vec::new(),
            last_consumed: None,
            splice: None,
        }
    }

    /// Continue from a checkpoint of an earlier parse
    pub(crate) fn resume(
        table: &'t ParseTable,
        options: &'t ParseOptions,
        text: &'a str,
        interrupt: I,
        resume: Resume<'t>,
    ) -> Self {
        let mut engine = Self::new(table, options, text, interrupt);
        engine.builder = TreeBuilder::new(resume.pool);
        engine.splice = resume.splice;

        if let (Some(point), Some(state)) = (resume.point, table.resume_state()) {
            tracing::debug!(offset = ?point.offset, "resuming at checkpoint");
            engine.lexer = Lexer::new_at(text, point.offset, point.line_col);
            engine.push(state, Children::from_vec(point.children), point.offset);
            engine.errors = point.errors;
            engine.checkpoints = point.checkpoints;
            engine.last_consumed = Some(SyntaxKind::NEWLINE);
        }
        engine
    }

    pub(crate) fn run(mut self) -> Result<Output, I::Error> {
        loop {
            let state = self.top.state;
            let action = match self.table.default_reduction(state) {
                Some(production) => ActionKind::Reduce(production),
                None => {
                    let kind = self.peek(0)?.token.kind;
                    self.table.explicit_action(state, kind).kind()
                }
            };

            match action {
                ActionKind::Shift(next) => self.shift(next),
                ActionKind::Reduce(production) => {
                    if !self.reduce(production) {
                        tracing::error!(state, production, "parse table has no goto entry");
                        let offset = self.top.end;
                        self.errors.push(SyntaxError::at_offset(
                            ErrorCode::E0999.default_message(),
                            offset,
                            ErrorCode::E0999,
                        ));
                        return self.abandon();
                    }
                }
                ActionKind::Accept => return Ok(self.accept()),
                ActionKind::Error => {
                    if !self.recover()? {
                        return self.abandon();
                    }
                }
            }

            if let Some(output) = self.at_line_boundary() {
                return Ok(output);
            }
        }
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    fn peek(&mut self, n: usize) -> Result<&Lookahead<'a>, I::Error> {
        while self.lookahead.len() <= n {
            let mut trivia = Vec::new();
            let token = loop {
                self.interrupt.check()?;
                let token = self.lexer.next_token();
                if self.table.is_extra(token.kind) {
                    trivia.push(token);
                } else {
                    break token;
                }
            };
            self.lookahead.push_back(Lookahead { trivia, token });
        }
        Ok(&self.lookahead[n])
    }

    /// Move a buffered token and its trivia into `out`
    fn consume(&mut self, lookahead: Lookahead<'a>, out: &mut Vec<GreenElement>) {
        for trivia in lookahead.trivia {
            out.push(self.builder.token(trivia.kind, trivia.text, trivia.offset));
        }
        let token = lookahead.token;
        if token.kind == SyntaxKind::UNKNOWN {
            self.errors.push(lexical_error(&token));
        }
        out.push(self.builder.token(token.kind, token.text, token.offset));
        self.last_consumed = Some(token.kind);
    }

    // =========================================================================
    // Stack
    // =========================================================================

    fn push(&mut self, state: u32, children: Children, end: TextSize) {
        let parent = self.top.clone();
        self.top = Arc::new(Frame {
            state,
            children,
            end,
            depth: parent.depth + 1,
            parent: Some(parent),
        });
    }

    fn shift(&mut self, state: u32) {
        let Some(lookahead) = self.lookahead.pop_front() else {
            return;
        };
        let end = lookahead.token.range().end();
        let mut elements = Vec::with_capacity(lookahead.trivia.len() + 1);
        self.consume(lookahead, &mut elements);
        self.push(state, Children::from_vec(elements), end);
    }

    /// Returns false when the table has no goto for the reduced symbol
    fn reduce(&mut self, production: u32) -> bool {
        let info = *self.table.production(production);
        let mut popped = Vec::with_capacity(info.len as usize);
        let mut below = self.top.clone();
        for _ in 0..info.len {
            let Some(parent) = below.parent.clone() else {
                return false;
            };
            popped.push(std::mem::replace(&mut below, parent));
        }
        let Some(state) = self.table.goto(below.state, info.lhs) else {
            return false;
        };
        popped.reverse();

        let end = popped.last().map_or(below.end, |frame| frame.end);
        let children = match info.kind {
            None => Children::concat(popped.iter().map(|frame| &frame.children)),
            Some(kind) => {
                let mut elements = Vec::new();
                for frame in &popped {
                    frame.children.extend_into(&mut elements);
                }
                Children::from_vec(self.wrap(kind, elements, below.end))
            }
        };
        drop(popped);

        self.top = Arc::new(Frame {
            state,
            children,
            end,
            depth: below.depth + 1,
            parent: Some(below),
        });
        true
    }

    /// Build a `kind` node over `elements` starting at `start`.
    ///
    /// Leading trivia stays outside so the node starts at its first
    /// significant token.
    fn wrap(&mut self, kind: SyntaxKind, mut elements: Vec<GreenElement>, start: TextSize) -> Vec<GreenElement> {
        let leading = elements
            .iter()
            .take_while(|element| self.is_extra(element))
            .count();
        let rest = elements.split_off(leading);
        let offset = start + elements.iter().map(element_len).sum::<TextSize>();
        let node = self.builder.node(kind, rest, offset);
        elements.push(NodeOrToken::Node(node));
        elements
    }

    fn is_extra(&self, element: &GreenElement) -> bool {
        matches!(element, NodeOrToken::Token(token) if self.table.is_extra(token.kind().into()))
    }

    /// Elements of every frame above `stop` (all frames for `None`), in order
    fn elements_above(&self, stop: Option<&Arc<Frame>>) -> Vec<GreenElement> {
        let mut frames = Vec::new();
        let mut cursor = Some(&self.top);
        while let Some(frame) = cursor {
            if stop.is_some_and(|stop| Arc::ptr_eq(stop, frame)) {
                break;
            }
            frames.push(frame);
            cursor = frame.parent.as_ref();
        }
        let mut out = Vec::new();
        for frame in frames.into_iter().rev() {
            frame.children.extend_into(&mut out);
        }
        out
    }

    // =========================================================================
    // Completion
    // =========================================================================

    fn accept(&mut self) -> Output {
        let mut elements = self.elements_above(None);
        if let Some(eof) = self.lookahead.pop_front() {
            for trivia in eof.trivia {
                elements.push(self.builder.token(trivia.kind, trivia.text, trivia.offset));
            }
        }
        self.finish(elements)
    }

    fn finish(&mut self, elements: Vec<GreenElement>) -> Output {
        Output {
            green: GreenNode::new(SyntaxKind::SOURCE_FILE.into(), elements),
            errors: std::mem::take(&mut self.errors),
            checkpoints: std::mem::take(&mut self.checkpoints),
            reused: self.builder.reused(),
        }
    }

    /// Record a checkpoint after a complete top-level line, and stop early
    /// when the rest of the old tree can be reattached.
    fn at_line_boundary(&mut self) -> Option<Output> {
        if !self.options.record_checkpoints
            || self.last_consumed != Some(SyntaxKind::NEWLINE)
            || self.top.depth != 2
            || !self.lookahead.is_empty()
            || self.table.resume_state() != Some(self.top.state)
        {
            return None;
        }
        let offset = self.top.end;
        if self.checkpoints.last().is_some_and(|cp| cp.offset >= offset) {
            return None;
        }
        let checkpoint = Checkpoint {
            offset,
            line_col: self.lexer.line_col(),
            errors_len: self.errors.len(),
        };
        self.checkpoints.push(checkpoint);

        let tail = self.splice.as_ref()?.tail(&checkpoint)?;
        tracing::debug!(offset = ?offset, reattached = tail.elements.len(), "reattached unchanged tail");
        let mut elements = self.elements_above(None);
        elements.extend(tail.elements);
        self.errors.extend(tail.errors);
        self.checkpoints.extend(tail.checkpoints);
        Some(self.finish(elements))
    }

    // =========================================================================
    // Error recovery
    // =========================================================================

    /// Returns false when no frame can resynchronize
    fn recover(&mut self) -> Result<bool, I::Error> {
        let found = self.peek(0)?.token.clone();
        self.report_unexpected(&found);

        let limit = self.options.max_recovery_tokens.max(1);
        let mut fallback = None;
        let mut frame = Some(self.top.clone());
        while let Some(current) = frame {
            // The bottom frame only resynchronizes when nothing above can
            if current.parent.is_none() && matches!(fallback, Some((_, _, n)) if n > 0) {
                break;
            }
            if let ActionKind::Shift(error_state) =
                self.table.explicit_action(current.state, SyntaxKind::ERROR).kind()
            {
                let mut skippable = 0;
                for i in 0..limit {
                    let kind = self.peek(i)?.token.kind;
                    if self.viable(&current, error_state, kind) {
                        self.resynchronize(current, error_state, i);
                        return Ok(true);
                    }
                    if matches!(kind, SyntaxKind::NEWLINE | SyntaxKind::EOF) {
                        break;
                    }
                    skippable = i + 1;
                }
                fallback = Some((current.clone(), error_state, skippable));
            }
            frame = current.parent.clone();
        }

        // No sync token within reach: skip what was scanned at the
        // outermost frame above the bottom that takes `ERROR`
        match fallback {
            Some((frame, error_state, skippable)) if skippable > 0 => {
                self.resynchronize(frame, error_state, skippable);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Check if `kind` would be shifted after pushing `error_state` on `base`
    fn viable(&self, base: &Frame, error_state: u32, kind: SyntaxKind) -> bool {
        let mut pushed = vec![error_state];
        let mut base = Some(base);
        loop {
            let Some(state) = pushed.last().copied().or(base.map(|frame| frame.state)) else {
                return false;
            };
            match self.table.action(state, kind).kind() {
                ActionKind::Shift(_) | ActionKind::Accept => return true,
                ActionKind::Error => return false,
                ActionKind::Reduce(production) => {
                    let info = self.table.production(production);
                    for _ in 0..info.len {
                        if pushed.pop().is_none() {
                            base = base.and_then(|frame| frame.parent.as_deref());
                        }
                    }
                    let Some(top) = pushed.last().copied().or(base.map(|frame| frame.state)) else {
                        return false;
                    };
                    match self.table.goto(top, info.lhs) {
                        Some(next) => pushed.push(next),
                        None => return false,
                    }
                }
            }
        }
    }

    /// Wrap the frames above `frame` and `skip` tokens into an `ERROR` node
    /// and shift it as the `ERROR` terminal.
    fn resynchronize(&mut self, frame: Arc<Frame>, error_state: u32, skip: usize) {
        let mut elements = self.elements_above(Some(&frame));
        for _ in 0..skip {
            let Some(lookahead) = self.lookahead.pop_front() else {
                break;
            };
            self.consume(lookahead, &mut elements);
        }

        let start = frame.end;
        let end = start + elements.iter().map(element_len).sum::<TextSize>();
        let children = Children::from_vec(self.wrap(SyntaxKind::ERROR, elements, start));
        self.checkpoints.retain(|cp| cp.offset <= start);
        tracing::trace!(state = frame.state, skipped = skip, "resynchronized");

        self.top = Arc::new(Frame {
            state: error_state,
            children,
            end,
            depth: frame.depth + 1,
            parent: Some(frame),
        });
    }

    /// Wrap everything above the bottom frame and the rest of the input
    /// into one `ERROR` node. Only reached with tables that leave no frame
    /// able to take `ERROR`.
    fn abandon(&mut self) -> Result<Output, I::Error> {
        let mut bottom = self.top.clone();
        while let Some(parent) = bottom.parent.clone() {
            bottom = parent;
        }

        let mut elements = self.elements_above(Some(&bottom));
        let trailing = loop {
            self.peek(0)?;
            let Some(lookahead) = self.lookahead.pop_front() else {
                break Vec::new();
            };
            if lookahead.token.kind == SyntaxKind::EOF {
                break lookahead.trivia;
            }
            self.consume(lookahead, &mut elements);
        };

        let start = bottom.end;
        tracing::debug!(offset = ?start, "no recovery point, wrapping the rest of the input");
        let mut root = bottom.children.to_vec();
        root.extend(self.wrap(SyntaxKind::ERROR, elements, start));
        for trivia in trailing {
            root.push(self.builder.token(trivia.kind, trivia.text, trivia.offset));
        }
        self.checkpoints.retain(|cp| cp.offset <= start);
        Ok(self.finish(root))
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    fn report_unexpected(&mut self, found: &Token<'a>) {
        // Reported as a lexical error once the token is skipped
        if found.kind == SyntaxKind::UNKNOWN {
            return;
        }
        if found.kind == SyntaxKind::EOF {
            if let Some((opener, range)) = self.open_block() {
                self.errors.push(unterminated_block(opener, range, found.offset));
                return;
            }
        }
        let expected = self.table.expected(self.top.state);
        let error = unexpected_token(found.kind, self.context(), &expected, found.range());
        tracing::trace!(code = %error.code, message = %error.message, "syntax error");
        self.errors.push(error);
    }

    /// Innermost block whose opener is still on the stack
    fn open_block(&self) -> Option<(SyntaxKind, TextRange)> {
        let mut cursor = Some(&*self.top);
        while let Some(frame) = cursor {
            if let Some(NodeOrToken::Token(token)) = frame.children.last() {
                let kind = SyntaxKind::from(token.kind());
                if block_terminator(kind).is_some()
                    && self.table.context(frame.state).is_some_and(SyntaxKind::is_block)
                {
                    let start = frame.end - token.text_len();
                    return Some((kind, TextRange::new(start, frame.end)));
                }
            }
            cursor = frame.parent.as_deref();
        }
        None
    }

    fn context(&self) -> ParseContext {
        if matches!(self.last_consumed, None | Some(SyntaxKind::NEWLINE)) {
            return if self.open_block().is_some() {
                ParseContext::BlockBody
            } else {
                ParseContext::TopLevel
            };
        }
        let mut cursor = Some(&*self.top);
        let mut innermost = true;
        while let Some(frame) = cursor {
            if let Some(kind) = self.table.context(frame.state) {
                let operand = matches!(
                    kind,
                    SyntaxKind::BINARY_EXPR
                        | SyntaxKind::UNARY_EXPR
                        | SyntaxKind::LITERAL
                        | SyntaxKind::NAME_REF
                        | SyntaxKind::MACRO_ARG_REF
                );
                if !operand {
                    return ParseContext::from_node_kind(kind);
                }
                if innermost
                    && !self
                        .table
                        .explicit_action(frame.state, SyntaxKind::DEC_NUMBER)
                        .is_error()
                {
                    return ParseContext::Expression;
                }
            }
            innermost = false;
            cursor = frame.parent.as_deref();
        }

        // Past a complete label or statement
        match self.top.children.last() {
            Some(NodeOrToken::Node(node)) => ParseContext::from_node_kind(node.kind().into()),
            _ => ParseContext::TopLevel,
        }
    }
}

fn lexical_error(token: &Token<'_>) -> SyntaxError {
    let range = token.range();
    if token.text.starts_with("/*") {
        SyntaxError::new(ErrorCode::E0103.default_message(), range, ErrorCode::E0103)
            .with_hint("close the comment with '*/'")
    } else if token.text.starts_with('"') || token.text.starts_with("#\"") {
        SyntaxError::new(ErrorCode::E0102.default_message(), range, ErrorCode::E0102)
            .with_hint("close the string with a matching quote")
    } else {
        SyntaxError::new(
            format!("invalid character '{}'", token.text.escape_debug()),
            range,
            ErrorCode::E0101,
        )
    }
}

fn unterminated_block(opener: SyntaxKind, range: TextRange, eof: TextSize) -> SyntaxError {
    let mut builder = SyntaxError::builder(ErrorCode::E0301)
        .message(format!("unterminated {} block", opener.describe()))
        .at_offset(eof)
        .related(format!("{} opened here", opener.describe()), range);
    if let Some(terminator) = block_terminator(opener) {
        builder = builder.hint(format!("add {} to close the block", terminator.describe()));
    }
    builder.build()
}
