//! `AnalysisSink`: the allocation/diagnostic surface the analyzer needs from
//! whatever is driving it. Implemented for `rattle_parser::Parser` so the
//! analyzer allocates AST nodes into the exact same arena the parse tree
//! lives in, and reports through the exact same reactor the parser already
//! used, without the analyzer taking ownership of either.

use rattle_common::arena::{Arena, Handle};
use rattle_common::{AnalyzerError, OnError, Reactor};

pub trait AnalysisSink<'arena, 'src> {
    fn alloc<T>(&self, val: T) -> Option<Handle<'arena, T>>;
    fn report_analysis(&mut self, error: AnalyzerError) -> OnError;
    fn arena(&self) -> &'arena Arena;
}

impl<'arena, 'src, S, Rz> AnalysisSink<'arena, 'src> for rattle_parser::Parser<'arena, 'src, S, Rz>
where
    S: rattle_common::TokenSource<'src>,
    Rz: Reactor<'arena, 'src>,
{
    fn alloc<T>(&self, val: T) -> Option<Handle<'arena, T>> {
        rattle_parser::Parser::arena(self).try_alloc(val)
    }

    fn report_analysis(&mut self, error: AnalyzerError) -> OnError {
        self.reactor_mut().report_analysis(error)
    }

    fn arena(&self) -> &'arena Arena {
        rattle_parser::Parser::arena(self)
    }
}
