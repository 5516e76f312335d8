//! `StatementAnalyzer`: turns the parser's flat statement/event stream into
//! nested AST statements. Block bodies are reconstructed here -- the parser
//! never builds a `Vec<Stmt>` itself, so whenever a header statement carries
//! a block (`body: Some(scope_begin)`), this module keeps pulling from the
//! same stream until the matching `Event::ScopeEnd` closes it. `ScopeBegin`
//! itself is never pulled as its own item -- it lives only on the header's
//! `body` field and is discarded once it's told us a block follows.

use rustc_hash::FxHashSet;

use rattle_common::token::{flags, Token};
use rattle_common::AnalyzerError;
use rattle_parser::tree::{EventKind as PEventKind, Stmt as PStmt};
use rattle_parser::StmtHandle as PStmtHandle;

use crate::ast::{
    AssignKind, BinaryKind, CommandKind, DefKind, EventKind, Expr, LiteralKind, Stmt, StmtHandle,
};
use crate::expr::ExpressionAnalyzer;
use crate::flags::Flags;
use crate::sink::AnalysisSink;

/// Anything that can hand back the parser's next flat statement/event item.
/// Implemented for `rattle_parser::Parser` so the analyzer can drive it
/// directly, without rattle-parser needing to know the analyzer exists.
pub trait ParseStmtSource<'arena, 'src> {
    fn next_parse_stmt(&mut self) -> Option<PStmtHandle<'arena, 'src>>;
}

impl<'arena, 'src, S, Rz> ParseStmtSource<'arena, 'src> for rattle_parser::Parser<'arena, 'src, S, Rz>
where
    S: rattle_common::TokenSource<'src>,
    Rz: rattle_common::Reactor<'arena, 'src>,
{
    fn next_parse_stmt(&mut self) -> Option<PStmtHandle<'arena, 'src>> {
        self.next_stmt()
    }
}

/// Walks the statement stream from a single `&mut P`: `P` is both where the
/// next parse-tree item comes from and where AST nodes get allocated and
/// diagnostics get reported, so pulling more input and reporting an error
/// about what was just pulled never need two live borrows at once.
pub struct StatementAnalyzer<'a, P> {
    source: &'a mut P,
}

impl<'arena, 'src, 'a, P> StatementAnalyzer<'a, P>
where
    P: ParseStmtSource<'arena, 'src> + AnalysisSink<'arena, 'src>,
{
    pub fn new(source: &'a mut P) -> Self {
        Self { source }
    }

    fn error(&mut self, description: impl Into<String>, at: Token<'src>) {
        self.source.report_analysis(AnalyzerError {
            description: description.into(),
            start: at.start,
            end: at.end,
        });
    }

    fn alloc(&mut self, stmt: Stmt<'arena, 'src>, at: Token<'src>) -> Option<StmtHandle<'arena, 'src>> {
        match self.source.alloc(stmt) {
            Some(h) => Some(h),
            None => {
                self.error("out of memory allocating an AST statement node", at);
                None
            }
        }
    }

    /// Pulls every top-level statement until the stream is exhausted.
    pub fn analyze_program(&mut self) -> Vec<StmtHandle<'arena, 'src>> {
        self.collect_block()
    }

    /// Pulls statements until a matching `ScopeEnd` closes the block (or the
    /// stream is exhausted, for the top-level call -- there's no enclosing
    /// `{` to find a match for, so it naturally runs to end of input).
    fn collect_block(&mut self) -> Vec<StmtHandle<'arena, 'src>> {
        let mut out = Vec::new();
        while let Some(pstmt) = self.source.next_parse_stmt() {
            if let PStmt::Event {
                kind: PEventKind::ScopeEnd,
                ..
            } = pstmt.as_ref()
            {
                break;
            }
            if let Some(ast) = self.analyze_statement(pstmt) {
                out.push(ast);
            }
        }
        out
    }

    fn analyze_body(
        &mut self,
        header_tk: Token<'src>,
        body: Option<PStmtHandle<'arena, 'src>>,
    ) -> Vec<StmtHandle<'arena, 'src>> {
        if body.is_none() {
            self.error("missing block body", header_tk);
            return Vec::new();
        }
        self.collect_block()
    }

    fn analyze_statement(&mut self, pstmt: PStmtHandle<'arena, 'src>) -> Option<StmtHandle<'arena, 'src>> {
        // `release()` trades the owning handle for a `&mut` into the arena so
        // the `Option<Handle>` children can be moved out with `mem::take`;
        // they're move-only and can't be copied out from behind a shared
        // reference.
        match pstmt.release() {
            PStmt::ExprStmt { expr } => {
                let expr = std::mem::take(expr);
                let at = expr_anchor(&expr);
                let (ast_expr, _) = ExpressionAnalyzer::new(self.source).analyze(expr, Flags::NONE);
                self.alloc(Stmt::ExprStmt { expr: ast_expr }, at)
            }
            PStmt::Assignment { op, slot, value } => {
                self.analyze_assignment(*op, std::mem::take(slot), std::mem::take(value))
            }
            PStmt::TkExpr { tk, expr } => self.analyze_tk_expr(*tk, std::mem::take(expr)),
            PStmt::TkExprStmt { tk, expr, body } => {
                self.analyze_tk_expr_stmt(*tk, std::mem::take(expr), std::mem::take(body))
            }
            PStmt::Event { kind, at } => {
                let kind = match kind {
                    PEventKind::Continue => EventKind::Continue,
                    PEventKind::Break => EventKind::Break,
                    PEventKind::ScopeBegin => EventKind::ScopeBegin,
                    PEventKind::ScopeEnd => EventKind::ScopeEnd,
                };
                self.alloc(Stmt::Event { kind }, *at)
            }
        }
    }

    fn analyze_assignment(
        &mut self,
        op: Token<'src>,
        slot: Option<rattle_parser::ExprHandle<'arena, 'src>>,
        value: Option<rattle_parser::ExprHandle<'arena, 'src>>,
    ) -> Option<StmtHandle<'arena, 'src>> {
        let (slot_ast, slot_flags) =
            ExpressionAnalyzer::new(self.source).analyze(slot, Flags::LIST_COMPONENTS_ASSIGNABLE);
        if !slot_flags.contains(Flags::ASSIGNABLE) {
            self.error(
                "left-hand side of assignment is not assignable",
                slot_ast.as_ref().map(|h| h.anchor()).unwrap_or(op),
            );
        }
        let (value_ast, _) = ExpressionAnalyzer::new(self.source).analyze(value, Flags::NONE);
        let kind = match op.flags {
            f if f == flags::assignment::EQUAL => AssignKind::Equal,
            f if f == flags::assignment::PLUS_EQUAL => AssignKind::PlusEqual,
            f if f == flags::assignment::MINUS_EQUAL => AssignKind::MinusEqual,
            f if f == flags::assignment::STAR_EQUAL => AssignKind::StarEqual,
            f if f == flags::assignment::SLASH_EQUAL => AssignKind::SlashEqual,
            _ => AssignKind::Equal,
        };
        self.alloc(
            Stmt::Assignment {
                kind,
                slot: slot_ast,
                value: value_ast,
            },
            op,
        )
    }

    fn analyze_tk_expr(
        &mut self,
        tk: Token<'src>,
        expr: Option<rattle_parser::ExprHandle<'arena, 'src>>,
    ) -> Option<StmtHandle<'arena, 'src>> {
        match tk.flags {
            f if f == flags::identifier::RETURN => {
                let (ast_expr, _) = ExpressionAnalyzer::new(self.source).analyze(expr, Flags::NONE);
                self.alloc(
                    Stmt::Command {
                        kind: CommandKind::Return,
                        expr: ast_expr,
                    },
                    tk,
                )
            }
            f if f == flags::identifier::NONLOCAL || f == flags::identifier::GLOBAL => {
                let (ast_expr, ef) =
                    ExpressionAnalyzer::new(self.source).analyze(expr, Flags::LIST_OF_IDS_ONLY);
                if !ef.contains(Flags::ONLY_IDS) {
                    self.error(
                        "expected a comma-separated list of identifiers",
                        ast_expr.as_ref().map(|h| h.anchor()).unwrap_or(tk),
                    );
                }
                let kind = if f == flags::identifier::NONLOCAL {
                    CommandKind::Nonlocal
                } else {
                    CommandKind::Global
                };
                self.alloc(Stmt::Command { kind, expr: ast_expr }, tk)
            }
            _ => {
                self.error("unrecognized keyword statement", tk);
                None
            }
        }
    }

    fn analyze_tk_expr_stmt(
        &mut self,
        tk: Token<'src>,
        expr: Option<rattle_parser::ExprHandle<'arena, 'src>>,
        body: Option<PStmtHandle<'arena, 'src>>,
    ) -> Option<StmtHandle<'arena, 'src>> {
        match tk.flags {
            f if f == flags::identifier::FOR => {
                let at = expr_anchor(&expr);
                let (ast_expr, ef) =
                    ExpressionAnalyzer::new(self.source).analyze(expr, Flags::LEFT_BINDABLE_1ST_IN);
                if !ef.contains(Flags::IN) {
                    self.error("expected `in` in `for` header", at);
                }
                let (binding, iterable) = match ast_expr {
                    Some(h) => match h.release() {
                        Expr::BinaryExpr {
                            kind: BinaryKind::In,
                            left,
                            right,
                            ..
                        } => (std::mem::take(left), std::mem::take(right)),
                        _ => (None, None),
                    },
                    None => (None, None),
                };
                let stmts = self.analyze_body(tk, body);
                self.alloc(
                    Stmt::For {
                        binding,
                        iterable,
                        body: stmts,
                    },
                    tk,
                )
            }
            f if f == flags::identifier::WHILE => {
                let (cond, _) = ExpressionAnalyzer::new(self.source).analyze(expr, Flags::NONE);
                let stmts = self.analyze_body(tk, body);
                self.alloc(Stmt::While { cond, body: stmts }, tk)
            }
            f if f == flags::identifier::IF => {
                let (cond, _) = ExpressionAnalyzer::new(self.source).analyze(expr, Flags::NONE);
                let stmts = self.analyze_body(tk, body);
                self.alloc(Stmt::If { cond, ontrue: stmts }, tk)
            }
            f if f == flags::identifier::ELSE => {
                let stmts = self.analyze_body(tk, body);
                self.alloc(Stmt::Else { onfalse: stmts }, tk)
            }
            f if f == flags::identifier::CLASS => {
                let at = expr_anchor(&expr);
                let (ast_expr, ef) = ExpressionAnalyzer::new(self.source).analyze(expr, Flags::NONE);
                if !ef.contains(Flags::LITERAL_ID) {
                    self.error("`class` name must be an identifier", at);
                }
                let name = match ast_expr.as_ref().map(|h| h.as_ref()) {
                    Some(Expr::Literal {
                        kind: LiteralKind::Identifier,
                        value,
                    }) => Some(*value),
                    _ => None,
                };
                let stmts = self.analyze_body(tk, body);
                self.alloc(Stmt::Class { name, body: stmts }, tk)
            }
            f if f == flags::identifier::DEF => {
                let at = expr_anchor(&expr);
                let (ast_expr, ef) =
                    ExpressionAnalyzer::new(self.source).analyze(expr, Flags::PREFER_BINDING);
                if !ef.contains(Flags::SIGNATURE) {
                    self.error(
                        "`def` header must be a call-shaped signature, e.g. `f(a, *rest)`",
                        at,
                    );
                }
                let (name, parameters) = match ast_expr {
                    Some(h) => match h.release() {
                        Expr::BinaryExpr {
                            kind: BinaryKind::Call,
                            left,
                            right,
                            ..
                        } => {
                            let left = std::mem::take(left);
                            let right = std::mem::take(right);
                            let name = match left.as_ref().map(|h| h.as_ref()) {
                                Some(Expr::Literal {
                                    kind: LiteralKind::Identifier,
                                    value,
                                }) => Some(*value),
                                _ => None,
                            };
                            (name, flatten_comma(right))
                        }
                        _ => (None, Vec::new()),
                    },
                    None => (None, Vec::new()),
                };
                self.check_duplicate_parameters(&parameters);
                let stmts = self.analyze_body(tk, body);
                self.alloc(
                    Stmt::Def {
                        kind: DefKind::Function,
                        name,
                        parameters,
                        body: stmts,
                    },
                    tk,
                )
            }
            _ => {
                self.error("unrecognized block-header keyword", tk);
                None
            }
        }
    }

    fn check_duplicate_parameters(&mut self, parameters: &[crate::ast::ExprHandle<'arena, 'src>]) {
        let mut seen = FxHashSet::default();
        for param in parameters {
            let name = match param.as_ref() {
                Expr::Binding { name, .. } => Some(*name),
                _ => None,
            };
            if let Some(name) = name {
                if !seen.insert(name.lexeme) {
                    self.error(format!("duplicate parameter name `{}`", name.lexeme_str()), name);
                }
            }
        }
    }
}

fn expr_anchor<'arena, 'src>(expr: &Option<rattle_parser::ExprHandle<'arena, 'src>>) -> Token<'src> {
    expr.as_ref()
        .map(|h| h.anchor())
        .unwrap_or_else(Token::synthetic_eot)
}

/// Flattens a left-associated `Comma` `BinaryExpr` chain (as produced by
/// `ExpressionAnalyzer::analyze_comma`) into source order, left to right.
/// Consumes the chain: the `Comma` wrapper nodes themselves carry no
/// independent meaning once split apart, only their leaves do.
fn flatten_comma<'arena, 'src>(
    expr: Option<crate::ast::ExprHandle<'arena, 'src>>,
) -> Vec<crate::ast::ExprHandle<'arena, 'src>> {
    let mut out = Vec::new();
    if let Some(expr) = expr {
        collect_comma(expr, &mut out);
    }
    out
}

fn collect_comma<'arena, 'src>(
    expr: crate::ast::ExprHandle<'arena, 'src>,
    out: &mut Vec<crate::ast::ExprHandle<'arena, 'src>>,
) {
    let is_comma = matches!(
        expr.as_ref(),
        Expr::BinaryExpr {
            kind: BinaryKind::Comma,
            ..
        }
    );
    if !is_comma {
        out.push(expr);
        return;
    }
    if let Expr::BinaryExpr { left, right, .. } = expr.release() {
        if let Some(l) = std::mem::take(left) {
            collect_comma(l, out);
        }
        if let Some(r) = std::mem::take(right) {
            collect_comma(r, out);
        }
    }
}
