use crate::arena::{Arena, Handle};
use crate::error::{AnalyzerError, LexError, OnError, ParseError};
use crate::token::Token;

/// Host-supplied callback object for the lexer stage.
pub trait LexReactor<'src> {
    /// Mandatory: report a lexical diagnostic and receive the control-flow
    /// answer.
    fn report(&mut self, error: LexError<'src>) -> OnError;

    /// Optional: called once per consumed line, text excludes the
    /// terminating newline. Default is a no-op.
    #[allow(unused_variables)]
    fn cache(&mut self, line_no: u32, line_text: &'src [u8]) {}

    /// Optional: called for every emitted token. Default is a no-op.
    #[allow(unused_variables)]
    fn trace(&mut self, token: &Token<'src>) {}
}

/// Host-supplied callback object shared by the parser and syntactic
/// analyzer: diagnostics plus arena-style node allocation.
pub trait Reactor<'arena, 'src> {
    fn report(&mut self, error: ParseError<'src>) -> OnError;

    /// Arena-style allocation. A `None` return means exhaustion; the caller
    /// reports `reactor_out_of_memory` and treats the node as a previously-
    /// reported-error null child.
    fn alloc<T>(&self, val: T) -> Option<Handle<'arena, T>>;

    fn arena(&self) -> &'arena Arena;

    /// Reports a syntactic-analysis diagnostic. Free-form, unlike the
    /// closed wire-level kind tables of the lexer/parser stages, so it's a
    /// separate method rather than an overload of `report`. Defaulted to
    /// `Resume` so existing lexer/parser-only reactors don't need updating.
    #[allow(unused_variables)]
    fn report_analysis(&mut self, error: AnalyzerError) -> OnError {
        OnError::Resume
    }
}

/// A minimal reactor that collects every diagnostic, never aborts, and
/// allocates from a single owned arena. Suited for tests and the default
/// CLI behavior (maximal feedback per run).
pub struct CollectingReactor<'arena> {
    arena: &'arena Arena,
}

impl<'arena> CollectingReactor<'arena> {
    pub fn new(arena: &'arena Arena) -> Self {
        Self { arena }
    }
}

impl<'arena, 'src> Reactor<'arena, 'src> for CollectingReactor<'arena> {
    fn report(&mut self, _error: ParseError<'src>) -> OnError {
        OnError::Resume
    }

    fn alloc<T>(&self, val: T) -> Option<Handle<'arena, T>> {
        self.arena.try_alloc(val)
    }

    fn arena(&self) -> &'arena Arena {
        self.arena
    }
}
