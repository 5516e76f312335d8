//! Syntactic analysis: turns the parser's flat parse tree into a typed AST
//! (`ast`), guided by the ascending/descending `flags::Flags` bitset that
//! `expr`'s `ExpressionAnalyzer` and `stmt`'s `StatementAnalyzer` pass
//! between recursive calls.

pub mod ast;
pub mod expr;
pub mod flags;
pub mod sink;
pub mod stmt;

pub use ast::{Expr, Stmt};
pub use expr::ExpressionAnalyzer;
pub use flags::Flags;
pub use sink::AnalysisSink;
pub use stmt::{ParseStmtSource, StatementAnalyzer};

#[cfg(test)]
mod tests {
    use rattle_common::arena::Arena;
    use rattle_common::reactor::CollectingReactor;
    use rattle_lexer::Lexer;
    use rattle_parser::Parser;

    use super::*;

    struct LexErrorSink;
    impl<'src> rattle_common::reactor::LexReactor<'src> for LexErrorSink {
        fn report(&mut self, _error: rattle_common::error::LexError<'src>) -> rattle_common::OnError {
            rattle_common::OnError::Resume
        }
    }

    fn analyze_all<'arena, 'src>(
        src: &'src str,
        arena: &'arena Arena,
    ) -> Vec<ast::StmtHandle<'arena, 'src>> {
        let mut lexer_reactor = LexErrorSink;
        let lexer = Lexer::new(src, &mut lexer_reactor);
        let reactor = CollectingReactor::new(arena);
        let mut parser = Parser::new(lexer, reactor);
        StatementAnalyzer::new(&mut parser).analyze_program()
    }

    #[test]
    fn assignment_statement_becomes_ast_assignment() {
        let arena = Arena::new();
        let stmts = analyze_all("x = 1\n", &arena);
        assert_eq!(stmts.len(), 1);
        assert!(matches!(stmts[0].as_ref(), Stmt::Assignment { .. }));
    }

    #[test]
    fn if_else_nests_bodies_under_their_headers() {
        let arena = Arena::new();
        let stmts = analyze_all("if x {\ny\n} else {\nz\n}\n", &arena);
        assert_eq!(stmts.len(), 2);
        match stmts[0].as_ref() {
            Stmt::If { ontrue, .. } => assert_eq!(ontrue.len(), 1),
            other => panic!("expected If, got {other:?}"),
        }
        match stmts[1].as_ref() {
            Stmt::Else { onfalse } => assert_eq!(onfalse.len(), 1),
            other => panic!("expected Else, got {other:?}"),
        }
    }

    #[test]
    fn for_loop_splits_binding_and_iterable_from_in_expression() {
        let arena = Arena::new();
        let stmts = analyze_all("for x in xs {\ny\n}\n", &arena);
        assert_eq!(stmts.len(), 1);
        match stmts[0].as_ref() {
            Stmt::For {
                binding,
                iterable,
                body,
            } => {
                assert!(binding.is_some());
                assert!(iterable.is_some());
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected For, got {other:?}"),
        }
    }

    #[test]
    fn def_header_splits_name_and_parameters() {
        let arena = Arena::new();
        let stmts = analyze_all("def f(a, b) {\nreturn a\n}\n", &arena);
        assert_eq!(stmts.len(), 1);
        match stmts[0].as_ref() {
            Stmt::Def { name, parameters, body, .. } => {
                assert!(name.is_some());
                assert_eq!(parameters.len(), 2);
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected Def, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_parameter_names_are_reported() {
        let arena = Arena::new();
        let stmts = analyze_all("def f(a, a) {\nreturn a\n}\n", &arena);
        // Analysis still produces a Def node; the duplicate is a reported
        // diagnostic, not a parse failure.
        assert_eq!(stmts.len(), 1);
        assert!(matches!(stmts[0].as_ref(), Stmt::Def { .. }));
    }

    #[test]
    fn nonlocal_requires_identifier_list() {
        let arena = Arena::new();
        let stmts = analyze_all("nonlocal x, y\n", &arena);
        assert_eq!(stmts.len(), 1);
        match stmts[0].as_ref() {
            Stmt::Command { kind, .. } => assert!(matches!(kind, crate::ast::CommandKind::Nonlocal)),
            other => panic!("expected Command, got {other:?}"),
        }
    }

    #[test]
    fn class_body_collects_nested_defs() {
        let arena = Arena::new();
        let stmts = analyze_all("class C {\ndef f() {\nreturn 1\n}\n}\n", &arena);
        assert_eq!(stmts.len(), 1);
        match stmts[0].as_ref() {
            Stmt::Class { name, body } => {
                assert!(name.is_some());
                assert_eq!(body.len(), 1);
                assert!(matches!(body[0].as_ref(), Stmt::Def { .. }));
            }
            other => panic!("expected Class, got {other:?}"),
        }
    }
}
