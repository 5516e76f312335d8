//! Golden snapshots over the concrete end-to-end scenarios: assignment,
//! `for`/`in`, `def` with a spread parameter, ternary, and `is not`.

use rattle_analyzer::{Stmt, StatementAnalyzer};
use rattle_common::arena::Arena;
use rattle_common::error::LexError;
use rattle_common::reactor::CollectingReactor;
use rattle_common::OnError;
use rattle_lexer::Lexer;
use rattle_parser::Parser;

struct QuietLexReactor;

impl<'src> rattle_common::reactor::LexReactor<'src> for QuietLexReactor {
    fn report(&mut self, _error: LexError<'src>) -> OnError {
        OnError::Resume
    }
}

fn analyze<'arena, 'src>(
    src: &'src str,
    arena: &'arena Arena,
) -> Vec<rattle_analyzer::ast::StmtHandle<'arena, 'src>> {
    let mut lex_reactor = QuietLexReactor;
    let lexer = Lexer::new(src, &mut lex_reactor);
    let reactor = CollectingReactor::new(arena);
    let mut parser = Parser::new(lexer, reactor);
    StatementAnalyzer::new(&mut parser).analyze_program()
}

fn render<'arena, 'src>(stmts: &[rattle_analyzer::ast::StmtHandle<'arena, 'src>]) -> Vec<String> {
    stmts.iter().map(|s| format!("{:?}", s.as_ref())).collect()
}

#[test]
fn assignment_of_a_sum() {
    let arena = Arena::new();
    let stmts = analyze("x = 1 + 2\n", &arena);
    insta::assert_debug_snapshot!(render(&stmts));
}

#[test]
fn for_loop_over_a_call_body() {
    let arena = Arena::new();
    let stmts = analyze("for i in xs {\nprint(i)\n}\n", &arena);
    insta::assert_debug_snapshot!(render(&stmts));
}

#[test]
fn def_with_spread_parameter() {
    let arena = Arena::new();
    let stmts = analyze("def f(a, *rest) {\nreturn a\n}\n", &arena);
    insta::assert_debug_snapshot!(render(&stmts));
}

#[test]
fn ternary_expression() {
    let arena = Arena::new();
    let stmts = analyze("a if b else c\n", &arena);
    insta::assert_debug_snapshot!(render(&stmts));
}

#[test]
fn is_not_comparison() {
    let arena = Arena::new();
    let stmts = analyze("x is not None\n", &arena);
    insta::assert_debug_snapshot!(render(&stmts));
}

#[test]
fn nested_brackets_become_a_single_list_expression() {
    let arena = Arena::new();
    let stmts = analyze("[\n1,\n2\n]\n", &arena);
    assert_eq!(stmts.len(), 1);
    assert!(matches!(
        stmts[0].as_ref(),
        Stmt::ExprStmt { expr: Some(_) }
    ));
    match stmts[0].as_ref() {
        Stmt::ExprStmt { expr: Some(e) } => {
            assert!(matches!(e.as_ref(), rattle_analyzer::Expr::UnaryExpr { .. }));
        }
        _ => unreachable!(),
    }
}
