//! Golden snapshots over representative programs, covering header/body
//! pairing, ternaries, and the two-token `is not`/`not in` forms.

use rattle_common::arena::Arena;
use rattle_common::error::LexError;
use rattle_common::reactor::CollectingReactor;
use rattle_common::OnError;
use rattle_lexer::Lexer;
use rattle_parser::{Parser, StmtHandle};

struct QuietLexReactor;

impl<'src> rattle_common::reactor::LexReactor<'src> for QuietLexReactor {
    fn report(&mut self, _error: LexError<'src>) -> OnError {
        OnError::Resume
    }
}

fn parse<'arena, 'src>(src: &'src str, arena: &'arena Arena) -> Vec<StmtHandle<'arena, 'src>> {
    let mut lex_reactor = QuietLexReactor;
    let lexer = Lexer::new(src, &mut lex_reactor);
    let reactor = CollectingReactor::new(arena);
    let mut parser = Parser::new(lexer, reactor);
    let mut out = Vec::new();
    while let Some(stmt) = parser.next_stmt() {
        out.push(stmt);
    }
    out
}

#[test]
fn for_loop_header_and_body() {
    let arena = Arena::new();
    let stmts = parse("for x in xs {\n  f(x)\n}\n", &arena);
    let rendered: Vec<_> = stmts.iter().map(|s| format!("{:?}", s.as_ref())).collect();
    insta::assert_debug_snapshot!(rendered);
}

#[test]
fn def_with_empty_body() {
    let arena = Arena::new();
    let stmts = parse("def f() {\n}\n", &arena);
    let rendered: Vec<_> = stmts.iter().map(|s| format!("{:?}", s.as_ref())).collect();
    insta::assert_debug_snapshot!(rendered);
}

#[test]
fn ternary_expression_shape() {
    let arena = Arena::new();
    let stmts = parse("x = a if cond else b\n", &arena);
    let rendered: Vec<_> = stmts.iter().map(|s| format!("{:?}", s.as_ref())).collect();
    insta::assert_debug_snapshot!(rendered);
}

#[test]
fn is_not_and_not_in_forms() {
    let arena = Arena::new();
    let stmts = parse("a is not b\nc not in d\n", &arena);
    let rendered: Vec<_> = stmts.iter().map(|s| format!("{:?}", s.as_ref())).collect();
    insta::assert_debug_snapshot!(rendered);
}

#[test]
fn list_and_subscript() {
    let arena = Arena::new();
    let stmts = parse("xs = [1, 2, 3]\ny = xs[0]\n", &arena);
    let rendered: Vec<_> = stmts.iter().map(|s| format!("{:?}", s.as_ref())).collect();
    insta::assert_debug_snapshot!(rendered);
}
