//! Parse-tree construction: turns a filtered token stream into the flat
//! statement/event stream `tree` describes, via LL(1) statement dispatch and
//! Pratt expression parsing.

pub mod filter;
pub mod parser;
pub mod precedence;
pub mod tree;

pub use parser::Parser;
pub use precedence::Prec;
pub use tree::{Expr, ExprHandle, Stmt, StmtHandle};

#[cfg(test)]
mod tests {
    use rattle_common::arena::Arena;
    use rattle_common::reactor::CollectingReactor;
    use rattle_lexer::Lexer;

    use super::*;
    use crate::tree::EventKind;

    struct LexErrorSink;
    impl<'src> rattle_common::reactor::LexReactor<'src> for LexErrorSink {
        fn report(&mut self, _error: rattle_common::error::LexError<'src>) -> rattle_common::OnError {
            rattle_common::OnError::Resume
        }
    }

    fn parse_all<'arena, 'src>(
        src: &'src str,
        arena: &'arena Arena,
    ) -> Vec<StmtHandle<'arena, 'src>> {
        let mut lexer_reactor = LexErrorSink;
        let lexer = Lexer::new(src, &mut lexer_reactor);
        let reactor = CollectingReactor::new(arena);
        let mut parser = Parser::new(lexer, reactor);
        let mut out = Vec::new();
        while let Some(stmt) = parser.next_stmt() {
            out.push(stmt);
        }
        out
    }

    #[test]
    fn simple_assignment_statement() {
        let arena = Arena::new();
        let stmts = parse_all("x = 1\n", &arena);
        assert_eq!(stmts.len(), 1);
        match stmts[0].as_ref() {
            Stmt::Assignment { slot, value, .. } => {
                assert!(slot.is_some());
                assert!(value.is_some());
            }
            other => panic!("expected Assignment, got {other:?}"),
        }
    }

    #[test]
    fn binary_expression_precedence() {
        let arena = Arena::new();
        let stmts = parse_all("1 + 2 * 3\n", &arena);
        assert_eq!(stmts.len(), 1);
        let Stmt::ExprStmt { expr: Some(top) } = stmts[0].as_ref() else {
            panic!("expected an expression statement");
        };
        match top.as_ref() {
            Expr::BinaryExpr { op, right, .. } => {
                assert_eq!(op.flags, rattle_common::token::flags::operator::PLUS);
                match right.as_ref().unwrap().as_ref() {
                    Expr::BinaryExpr { op, .. } => {
                        assert_eq!(op.flags, rattle_common::token::flags::operator::STAR)
                    }
                    other => panic!("expected the multiplication to bind tighter, got {other:?}"),
                }
            }
            other => panic!("expected a binary expression, got {other:?}"),
        }
    }

    #[test]
    fn if_block_produces_scope_events() {
        let arena = Arena::new();
        let stmts = parse_all("if x {\ny\n}\n", &arena);
        // TkExprStmt(if, body: Some(ScopeBegin)), ExprStmt(y), Event(ScopeEnd).
        // The ScopeBegin event lives only on the header's `body` field --
        // it's never separately pulled from the stream.
        assert_eq!(stmts.len(), 3);
        match stmts[0].as_ref() {
            Stmt::TkExprStmt { body: Some(begin), .. } => {
                assert!(matches!(
                    begin.as_ref(),
                    Stmt::Event {
                        kind: EventKind::ScopeBegin,
                        ..
                    }
                ));
            }
            other => panic!("expected a TkExprStmt with a block body, got {other:?}"),
        }
        assert!(matches!(
            stmts[2].as_ref(),
            Stmt::Event {
                kind: EventKind::ScopeEnd,
                ..
            }
        ));
    }

    #[test]
    fn call_expression_shape() {
        let arena = Arena::new();
        let stmts = parse_all("f(1, 2)\n", &arena);
        let Stmt::ExprStmt { expr: Some(top) } = stmts[0].as_ref() else {
            panic!("expected an expression statement");
        };
        match top.as_ref() {
            Expr::BiExprBiTk {
                tk1,
                expr1,
                expr2,
                ..
            } => {
                assert_eq!(tk1.flags, rattle_common::token::flags::marker::OPEN_PAREN);
                assert!(expr1.is_some());
                assert!(expr2.is_some());
            }
            other => panic!("expected a call node, got {other:?}"),
        }
    }

    #[test]
    fn dangling_close_brace_is_reported_and_recovered() {
        let arena = Arena::new();
        let stmts = parse_all("}\nx\n", &arena);
        assert_eq!(stmts.len(), 1);
        assert!(matches!(stmts[0].as_ref(), Stmt::ExprStmt { .. }));
    }

    #[test]
    fn unterminated_brace_is_reported_at_eot() {
        let arena = Arena::new();
        let stmts = parse_all("while x {\ny\n", &arena);
        // header (carrying the ScopeBegin on its `body` field), body stmt --
        // the missing `}` never yields a ScopeEnd event.
        assert_eq!(stmts.len(), 2);
    }

    #[test]
    fn else_if_chains_the_nested_if_as_the_elses_body() {
        let arena = Arena::new();
        let stmts = parse_all("if a {\nx\n} else if b {\ny\n}\n", &arena);
        // If(a), x, ScopeEnd, Else(body: ScopeBegin), If(b), y, ScopeEnd,
        // ScopeEnd -- the else's one-statement body is the chained `if`,
        // wrapped in its own synthetic scope.
        assert_eq!(stmts.len(), 8);
        assert!(matches!(stmts[0].as_ref(), Stmt::TkExprStmt { .. }));
        assert!(matches!(
            stmts[2].as_ref(),
            Stmt::Event {
                kind: EventKind::ScopeEnd,
                ..
            }
        ));
        match stmts[3].as_ref() {
            Stmt::TkExprStmt {
                tk,
                expr: None,
                body: Some(begin),
            } => {
                assert_eq!(tk.flags, rattle_common::token::flags::identifier::ELSE);
                assert!(matches!(
                    begin.as_ref(),
                    Stmt::Event {
                        kind: EventKind::ScopeBegin,
                        ..
                    }
                ));
            }
            other => panic!("expected the else header, got {other:?}"),
        }
        match stmts[4].as_ref() {
            Stmt::TkExprStmt { tk, body: Some(_), .. } => {
                assert_eq!(tk.flags, rattle_common::token::flags::identifier::IF);
            }
            other => panic!("expected the chained if header, got {other:?}"),
        }
        assert!(matches!(
            stmts[6].as_ref(),
            Stmt::Event {
                kind: EventKind::ScopeEnd,
                ..
            }
        ));
        assert!(matches!(
            stmts[7].as_ref(),
            Stmt::Event {
                kind: EventKind::ScopeEnd,
                ..
            }
        ));
    }

    #[test]
    fn else_if_else_chain_leaves_the_final_else_as_a_sibling() {
        let arena = Arena::new();
        let stmts = parse_all("if a {\nx\n} else if b {\ny\n} else {\nz\n}\n", &arena);
        // The chain's synthetic scope closes right before the final `else`
        // header arrives as its own top-level statement, so two distinct
        // `else` headers show up in the flat stream.
        let else_headers = stmts
            .iter()
            .filter(|s| {
                matches!(
                    s.as_ref(),
                    Stmt::TkExprStmt { tk, expr: None, .. }
                        if tk.flags == rattle_common::token::flags::identifier::ELSE
                )
            })
            .count();
        assert_eq!(else_headers, 2);
    }

    struct CollectingKindsReactor<'arena> {
        arena: &'arena Arena,
        kinds: Vec<rattle_common::error::ParseErrorKind>,
    }

    impl<'arena> CollectingKindsReactor<'arena> {
        fn new(arena: &'arena Arena) -> Self {
            Self {
                arena,
                kinds: Vec::new(),
            }
        }
    }

    impl<'arena, 'src> rattle_common::Reactor<'arena, 'src> for CollectingKindsReactor<'arena> {
        fn report(&mut self, error: rattle_common::ParseError<'src>) -> rattle_common::OnError {
            self.kinds.push(error.kind);
            rattle_common::OnError::Resume
        }

        fn alloc<T>(&self, val: T) -> Option<rattle_common::arena::Handle<'arena, T>> {
            self.arena.try_alloc(val)
        }

        fn arena(&self) -> &'arena Arena {
            self.arena
        }
    }

    #[test]
    fn stray_close_paren_is_reported_as_dangling_paren() {
        let arena = Arena::new();
        let mut lexer_reactor = LexErrorSink;
        let lexer = Lexer::new(")\n", &mut lexer_reactor);
        let reactor = CollectingKindsReactor::new(&arena);
        let mut parser = Parser::new(lexer, reactor);
        parser.drain();
        let reactor = parser.into_reactor();
        assert_eq!(
            reactor.kinds,
            vec![rattle_common::error::ParseErrorKind::DanglingParen]
        );
    }

    #[test]
    fn stray_close_bracket_is_reported_as_dangling_bracket() {
        let arena = Arena::new();
        let mut lexer_reactor = LexErrorSink;
        let lexer = Lexer::new("]\n", &mut lexer_reactor);
        let reactor = CollectingKindsReactor::new(&arena);
        let mut parser = Parser::new(lexer, reactor);
        parser.drain();
        let reactor = parser.into_reactor();
        assert_eq!(
            reactor.kinds,
            vec![rattle_common::error::ParseErrorKind::DanglingBracket]
        );
    }
}
