//! The LL(1)/Pratt parser: turns a token stream into the flat parse-tree
//! statement/event stream described in `tree`. Block bodies are delimited by
//! `{`/`}` rather than indentation; a block's presence is recorded on its
//! header statement as a handle to the `ScopeBegin` event, and the actual
//! nested statements arrive afterward as ordinary pulls from this same
//! stream -- the parser never builds a `Vec<Stmt>` itself.

use std::collections::VecDeque;
use std::marker::PhantomData;

use rattle_common::error::ParseErrorKind;
use rattle_common::token::{flags, Token, TokenKind};
use rattle_common::{OnError, ParseError, Reactor, TokenSource};

use crate::filter::{self, Filter};
use crate::precedence::Prec;
use crate::tree::{EventKind, Expr, ExprHandle, Stmt, StmtHandle};

pub struct Parser<'arena, 'src, S, Rz> {
    source: S,
    reactor: Rz,
    mask: Filter,
    buf: VecDeque<Token<'src>>,
    /// Open brace tokens currently nested around the cursor, for
    /// unterminated/dangling detection.
    braces: Vec<Token<'src>>,
    /// Already-built items awaiting return from `next_stmt`, oldest first.
    /// Used only to splice the recursively-parsed chained `if` of an
    /// `else if` into the stream ahead of its synthetic closing scope.
    pending: VecDeque<StmtHandle<'arena, 'src>>,
    /// Brace-stack depths at which a synthetic `ScopeEnd` is owed to close
    /// an `else if`'s one-statement body, once the chained `if`'s own body
    /// (if it has one) finishes closing back down to that depth.
    else_chain_close_depths: Vec<usize>,
    done: bool,
    _arena: PhantomData<&'arena ()>,
}

impl<'arena, 'src, S, Rz> Parser<'arena, 'src, S, Rz>
where
    S: TokenSource<'src>,
    Rz: Reactor<'arena, 'src>,
{
    pub fn new(source: S, reactor: Rz) -> Self {
        Self {
            source,
            reactor,
            mask: filter::BASE_MASK,
            buf: VecDeque::new(),
            braces: Vec::new(),
            pending: VecDeque::new(),
            else_chain_close_depths: Vec::new(),
            done: false,
            _arena: PhantomData,
        }
    }

    pub fn into_reactor(self) -> Rz {
        self.reactor
    }

    /// Shared access to the reactor's arena, for a syntactic analyzer that
    /// allocates its own AST nodes alongside the parse tree without taking
    /// ownership of the parser.
    pub fn arena(&self) -> &'arena rattle_common::arena::Arena {
        self.reactor.arena()
    }

    /// Exclusive access to the reactor, for reporting diagnostics from a
    /// stage built on top of the parser (e.g. syntactic analysis) while
    /// still driving `next_stmt` through the same `&mut Parser`.
    pub fn reactor_mut(&mut self) -> &mut Rz {
        &mut self.reactor
    }

    /// True once the statement stream is permanently exhausted.
    pub fn empty(&self) -> bool {
        self.done
    }

    /// Pulls the next flat statement/event item, or `None` at end of input.
    pub fn next_stmt(&mut self) -> Option<StmtHandle<'arena, 'src>> {
        if let Some(stmt) = self.pending.pop_front() {
            return Some(stmt);
        }
        if self.done {
            return None;
        }
        self.skip_separators();
        let tok = self.peek(0);
        if tok.kind == TokenKind::Eot {
            self.done = true;
            if let Some(open) = self.braces.pop() {
                self.report(ParseErrorKind::UnterminatedBrace, open);
            }
            return None;
        }
        if tok.kind == TokenKind::Marker && tok.flags == flags::marker::CLOSE_BRACE {
            self.advance();
            return if self.braces.pop().is_some() {
                let closed = self.event_node(EventKind::ScopeEnd, tok);
                // An `else if`'s chained statement just finished closing its
                // own body back down to the depth the chain started at --
                // the `else`'s one-statement body is done too.
                if self.else_chain_close_depths.last() == Some(&self.braces.len()) {
                    self.else_chain_close_depths.pop();
                    if let Some(synthetic) = self.event_node(EventKind::ScopeEnd, tok) {
                        self.pending.push_back(synthetic);
                    }
                }
                closed
            } else {
                self.report(ParseErrorKind::DanglingBrace, tok);
                self.next_stmt()
            };
        }
        match self.parse_statement() {
            Some(stmt) => Some(stmt),
            // Allocation failed for this item only; the stream itself isn't
            // over, so keep pulling rather than signalling end-of-input.
            None => self.next_stmt(),
        }
    }

    /// Pulls every remaining item and discards it; idempotent like the
    /// lexer's `drain`.
    pub fn drain(&mut self) {
        while self.next_stmt().is_some() {}
    }

    // ---- statement dispatch -------------------------------------------

    fn parse_statement(&mut self) -> Option<StmtHandle<'arena, 'src>> {
        let tok = self.peek(0);
        if tok.kind == TokenKind::Identifier {
            match tok.flags {
                flags::identifier::RETURN => return self.parse_tk_expr_optional(tok),
                flags::identifier::NONLOCAL | flags::identifier::GLOBAL => {
                    return self.parse_tk_expr_required(tok)
                }
                flags::identifier::BREAK => return self.parse_event_stmt(EventKind::Break, tok),
                flags::identifier::CONTINUE => {
                    return self.parse_event_stmt(EventKind::Continue, tok)
                }
                flags::identifier::DEF
                | flags::identifier::CLASS
                | flags::identifier::IF
                | flags::identifier::ELSE
                | flags::identifier::WHILE
                | flags::identifier::FOR => return self.parse_tk_expr_stmt(tok),
                _ => {}
            }
        }
        self.parse_expr_or_assignment_statement()
    }

    fn parse_event_stmt(
        &mut self,
        kind: EventKind,
        tok: Token<'src>,
    ) -> Option<StmtHandle<'arena, 'src>> {
        self.advance();
        self.consume_terminator();
        self.stmt_node(Stmt::Event { kind, at: tok })
    }

    fn parse_tk_expr_optional(&mut self, tok: Token<'src>) -> Option<StmtHandle<'arena, 'src>> {
        self.advance();
        let expr = if self.at_statement_end() {
            None
        } else {
            self.parse_expression(Prec::Lowest)
        };
        self.consume_terminator();
        self.stmt_node(Stmt::TkExpr { tk: tok, expr })
    }

    fn parse_tk_expr_required(&mut self, tok: Token<'src>) -> Option<StmtHandle<'arena, 'src>> {
        self.advance();
        let expr = self.parse_expression(Prec::Lowest);
        self.consume_terminator();
        self.stmt_node(Stmt::TkExpr { tk: tok, expr })
    }

    fn parse_tk_expr_stmt(&mut self, tok: Token<'src>) -> Option<StmtHandle<'arena, 'src>> {
        if tok.flags == flags::identifier::ELSE && self.peek_is_identifier(1, flags::identifier::IF)
        {
            return self.parse_else_if_chain(tok);
        }
        self.advance();
        let expr = if self.at_statement_end() || self.peek_is_marker(0, flags::marker::OPEN_BRACE)
        {
            None
        } else {
            self.parse_expression(Prec::Lowest)
        };
        let body = if self.peek_is_marker(0, flags::marker::OPEN_BRACE) {
            let brace = self.advance();
            self.braces.push(brace);
            self.event_node(EventKind::ScopeBegin, brace)
        } else {
            self.consume_terminator();
            None
        };
        self.stmt_node(Stmt::TkExprStmt {
            tk: tok,
            expr,
            body,
        })
    }

    /// `else if ...`: the `else`'s body is the single chained `if`
    /// statement, parsed recursively right here rather than through the
    /// generic expression/brace path (which would treat the `if` keyword as
    /// a bare identifier literal). The `else` still reports a block body of
    /// exactly one statement, so it's wrapped in a synthetic scope: the
    /// chained `if` is queued to come back on the next pull, followed by a
    /// synthetic `ScopeEnd` once that `if`'s own body (if any) has finished
    /// closing -- see the `else_chain_close_depths` bookkeeping in
    /// `next_stmt`.
    fn parse_else_if_chain(&mut self, else_tok: Token<'src>) -> Option<StmtHandle<'arena, 'src>> {
        self.advance();
        let if_tok = self.peek(0);
        let depth_before = self.braces.len();
        let nested = self.parse_tk_expr_stmt(if_tok);
        if let Some(nested) = nested {
            self.pending.push_back(nested);
        }
        if self.braces.len() > depth_before {
            self.else_chain_close_depths.push(depth_before);
        } else if let Some(synthetic) = self.event_node(EventKind::ScopeEnd, else_tok) {
            self.pending.push_back(synthetic);
        }
        let body = self.event_node(EventKind::ScopeBegin, else_tok);
        self.stmt_node(Stmt::TkExprStmt {
            tk: else_tok,
            expr: None,
            body,
        })
    }

    fn parse_expr_or_assignment_statement(&mut self) -> Option<StmtHandle<'arena, 'src>> {
        let expr = self.parse_expression(Prec::Lowest);
        let stmt = if self.peek(0).kind == TokenKind::Assignment {
            let op = self.advance();
            let value = self.parse_expression(Prec::Lowest);
            Stmt::Assignment {
                op,
                slot: expr,
                value,
            }
        } else {
            Stmt::ExprStmt { expr }
        };
        self.consume_terminator();
        self.stmt_node(stmt)
    }

    fn at_statement_end(&mut self) -> bool {
        let tok = self.peek(0);
        tok.kind == TokenKind::Eot
            || (tok.kind == TokenKind::Marker
                && matches!(
                    tok.flags,
                    f if f == flags::marker::NEWLINE
                        || f == flags::marker::SEMICOLON
                        || f == flags::marker::CLOSE_BRACE
                ))
    }

    fn consume_terminator(&mut self) {
        let tok = self.peek(0);
        if tok.kind == TokenKind::Eot {
            return;
        }
        if tok.kind == TokenKind::Marker && tok.flags == flags::marker::CLOSE_BRACE {
            return;
        }
        if tok.kind == TokenKind::Marker
            && (tok.flags == flags::marker::NEWLINE || tok.flags == flags::marker::SEMICOLON)
        {
            self.advance();
            return;
        }
        self.report(ParseErrorKind::UnterminatedStatement, tok);
    }

    fn skip_separators(&mut self) {
        while {
            let tok = self.peek(0);
            tok.kind == TokenKind::Marker
                && (tok.flags == flags::marker::NEWLINE || tok.flags == flags::marker::SEMICOLON)
        } {
            self.advance();
        }
    }

    // ---- expressions ----------------------------------------------------

    fn parse_expression(&mut self, min_prec: Prec) -> Option<ExprHandle<'arena, 'src>> {
        let mut left = self.parse_prefix()?;
        loop {
            let tok = self.peek(0);
            let Some(prec) = self.infix_prec(tok) else {
                break;
            };
            if prec < min_prec {
                break;
            }
            left = self.parse_infix(left, prec)?;
        }
        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<ExprHandle<'arena, 'src>> {
        let tok = self.peek(0);
        match tok.kind {
            TokenKind::Number | TokenKind::String => {
                self.advance();
                self.alloc_expr(Expr::Literal { token: tok }, tok)
            }
            TokenKind::Identifier => {
                if tok.flags == flags::identifier::NOT {
                    self.advance();
                    let operand = self.parse_expression(Prec::LogicNot.next())?;
                    self.alloc_expr(
                        Expr::UnaryExpr {
                            op: tok,
                            operand: Some(operand),
                        },
                        tok,
                    )
                } else {
                    self.advance();
                    self.alloc_expr(Expr::Literal { token: tok }, tok)
                }
            }
            TokenKind::Operator
                if matches!(
                    tok.flags,
                    f if f == flags::operator::PLUS
                        || f == flags::operator::MINUS
                        || f == flags::operator::STAR
                ) =>
            {
                self.advance();
                let operand = self.parse_expression(Prec::UnaryHigh.next())?;
                self.alloc_expr(
                    Expr::UnaryExpr {
                        op: tok,
                        operand: Some(operand),
                    },
                    tok,
                )
            }
            TokenKind::Marker if tok.flags == flags::marker::OPEN_PAREN => self.parse_group(tok),
            TokenKind::Marker if tok.flags == flags::marker::OPEN_BRACKET => self.parse_list(tok),
            TokenKind::Marker if tok.flags == flags::marker::CLOSE_PAREN => {
                self.report(ParseErrorKind::DanglingParen, tok);
                self.advance();
                None
            }
            TokenKind::Marker if tok.flags == flags::marker::CLOSE_BRACKET => {
                self.report(ParseErrorKind::DanglingBracket, tok);
                self.advance();
                None
            }
            _ => {
                self.report(ParseErrorKind::UnexpectedToken, tok);
                self.advance();
                None
            }
        }
    }

    fn infix_prec(&self, tok: Token<'src>) -> Option<Prec> {
        match tok.kind {
            TokenKind::Operator => match tok.flags {
                f if f == flags::operator::PLUS || f == flags::operator::MINUS => {
                    Some(Prec::AddSub)
                }
                f if f == flags::operator::STAR || f == flags::operator::SLASH => {
                    Some(Prec::MulDiv)
                }
                f if f == flags::operator::EQUAL_EQUAL || f == flags::operator::NOT_EQUAL => {
                    Some(Prec::CompareEq)
                }
                f if f == flags::operator::LESS_THAN
                    || f == flags::operator::LESS_EQUAL
                    || f == flags::operator::GREATER_THAN
                    || f == flags::operator::GREATER_EQUAL =>
                {
                    Some(Prec::Compare)
                }
                f if f == flags::operator::DOT => Some(Prec::DotCallSubscript),
                f if f == flags::operator::COMMA => Some(Prec::Comma),
                _ => None,
            },
            TokenKind::Marker
                if tok.flags == flags::marker::OPEN_PAREN
                    || tok.flags == flags::marker::OPEN_BRACKET =>
            {
                Some(Prec::DotCallSubscript)
            }
            TokenKind::Identifier => match tok.flags {
                f if f == flags::identifier::AND => Some(Prec::LogicAnd),
                f if f == flags::identifier::OR => Some(Prec::LogicOr),
                f if f == flags::identifier::IN || f == flags::identifier::NOT => {
                    Some(Prec::MemberIn)
                }
                f if f == flags::identifier::IS => Some(Prec::IdentityIs),
                f if f == flags::identifier::IF => Some(Prec::IfElse),
                _ => None,
            },
            _ => None,
        }
    }

    fn parse_infix(
        &mut self,
        left: ExprHandle<'arena, 'src>,
        prec: Prec,
    ) -> Option<ExprHandle<'arena, 'src>> {
        let tok = self.peek(0);
        match tok.kind {
            TokenKind::Marker if tok.flags == flags::marker::OPEN_PAREN => {
                self.parse_call(left, tok)
            }
            TokenKind::Marker if tok.flags == flags::marker::OPEN_BRACKET => {
                self.parse_subscript(left, tok)
            }
            TokenKind::Identifier if tok.flags == flags::identifier::IS => self.parse_is(left, tok),
            TokenKind::Identifier if tok.flags == flags::identifier::NOT => {
                self.parse_not_in(left, tok)
            }
            TokenKind::Identifier if tok.flags == flags::identifier::IF => {
                self.parse_ternary(left, tok)
            }
            _ => {
                self.advance();
                let rhs = self.parse_expression(prec.next())?;
                self.alloc_expr(
                    Expr::BinaryExpr {
                        op: tok,
                        left: Some(left),
                        right: Some(rhs),
                    },
                    tok,
                )
            }
        }
    }

    fn parse_is(
        &mut self,
        left: ExprHandle<'arena, 'src>,
        is_tok: Token<'src>,
    ) -> Option<ExprHandle<'arena, 'src>> {
        self.advance();
        if self.peek_is_identifier(0, flags::identifier::NOT) {
            let not_tok = self.advance();
            let rhs = self.parse_expression(Prec::IdentityIs.next())?;
            self.alloc_expr(
                Expr::BiExprBiTk {
                    tk1: is_tok,
                    tk2: not_tok,
                    expr1: Some(left),
                    expr2: Some(rhs),
                },
                is_tok,
            )
        } else {
            let rhs = self.parse_expression(Prec::IdentityIs.next())?;
            self.alloc_expr(
                Expr::BinaryExpr {
                    op: is_tok,
                    left: Some(left),
                    right: Some(rhs),
                },
                is_tok,
            )
        }
    }

    fn parse_not_in(
        &mut self,
        left: ExprHandle<'arena, 'src>,
        not_tok: Token<'src>,
    ) -> Option<ExprHandle<'arena, 'src>> {
        self.advance();
        if self.peek_is_identifier(0, flags::identifier::IN) {
            let in_tok = self.advance();
            let rhs = self.parse_expression(Prec::MemberIn.next())?;
            self.alloc_expr(
                Expr::BiExprBiTk {
                    tk1: not_tok,
                    tk2: in_tok,
                    expr1: Some(left),
                    expr2: Some(rhs),
                },
                not_tok,
            )
        } else {
            self.report(ParseErrorKind::PatialNotinOperator, not_tok);
            None
        }
    }

    /// `X if cond else Y`, right-associative. The first two operands are
    /// carried by a synthetic `BinaryExpr(if, X, cond)`, then wrapped
    /// together with `Y` in a `BiExprBiTk` keyed by the `if`/`else` tokens --
    /// the two-token shape the analyzer destructures into `TernaryExpr`.
    fn parse_ternary(
        &mut self,
        left: ExprHandle<'arena, 'src>,
        if_tok: Token<'src>,
    ) -> Option<ExprHandle<'arena, 'src>> {
        self.advance();
        let cond = self.parse_expression(Prec::IfElse.next())?;
        let inner = self.alloc_expr(
            Expr::BinaryExpr {
                op: if_tok,
                left: Some(left),
                right: Some(cond),
            },
            if_tok,
        )?;
        if !self.peek_is_identifier(0, flags::identifier::ELSE) {
            self.report(ParseErrorKind::PatialIfelseOperator, if_tok);
            return Some(inner);
        }
        let else_tok = self.advance();
        let rhs = self.parse_expression(Prec::IfElse)?;
        self.alloc_expr(
            Expr::BiExprBiTk {
                tk1: if_tok,
                tk2: else_tok,
                expr1: Some(inner),
                expr2: Some(rhs),
            },
            if_tok,
        )
    }

    fn parse_call(
        &mut self,
        callee: ExprHandle<'arena, 'src>,
        open: Token<'src>,
    ) -> Option<ExprHandle<'arena, 'src>> {
        self.advance();
        let (args, close) = self.with_widened_mask(|p| {
            let args = if p.peek_is_marker(0, flags::marker::CLOSE_PAREN) {
                None
            } else {
                p.parse_comma_list()
            };
            let close =
                p.expect_closer(flags::marker::CLOSE_PAREN, open, ParseErrorKind::UnterminatedParen);
            (args, close)
        });
        self.alloc_expr(
            Expr::BiExprBiTk {
                tk1: open,
                tk2: close,
                expr1: Some(callee),
                expr2: args,
            },
            open,
        )
    }

    fn parse_subscript(
        &mut self,
        target: ExprHandle<'arena, 'src>,
        open: Token<'src>,
    ) -> Option<ExprHandle<'arena, 'src>> {
        self.advance();
        let (index, close) = self.with_widened_mask(|p| {
            let index = p.parse_expression(Prec::Lowest);
            let close = p.expect_closer(
                flags::marker::CLOSE_BRACKET,
                open,
                ParseErrorKind::UnterminatedBracket,
            );
            (index, close)
        });
        self.alloc_expr(
            Expr::BiExprBiTk {
                tk1: open,
                tk2: close,
                expr1: Some(target),
                expr2: index,
            },
            open,
        )
    }

    /// A parenthesized group or tuple: always a two-token `BiExprBiTk` with
    /// `expr1: None`, mirroring `parse_list`'s shape for `[`. The analyzer
    /// tells a tuple from a plain grouping by whether `expr2` carries the
    /// `Comma` property, and an empty `()` has `expr2: None`.
    fn parse_group(&mut self, open: Token<'src>) -> Option<ExprHandle<'arena, 'src>> {
        self.advance();
        let (inner, close) = self.with_widened_mask(|p| {
            let inner = if p.peek_is_marker(0, flags::marker::CLOSE_PAREN) {
                None
            } else {
                p.parse_comma_list()
            };
            let close =
                p.expect_closer(flags::marker::CLOSE_PAREN, open, ParseErrorKind::UnterminatedParen);
            (inner, close)
        });
        self.alloc_expr(
            Expr::BiExprBiTk {
                tk1: open,
                tk2: close,
                expr1: None,
                expr2: inner,
            },
            open,
        )
    }

    fn parse_list(&mut self, open: Token<'src>) -> Option<ExprHandle<'arena, 'src>> {
        self.advance();
        let (elements, close) = self.with_widened_mask(|p| {
            let elements = if p.peek_is_marker(0, flags::marker::CLOSE_BRACKET) {
                None
            } else {
                p.parse_comma_list()
            };
            let close = p.expect_closer(
                flags::marker::CLOSE_BRACKET,
                open,
                ParseErrorKind::UnterminatedBracket,
            );
            (elements, close)
        });
        self.alloc_expr(
            Expr::BiExprBiTk {
                tk1: open,
                tk2: close,
                expr1: None,
                expr2: elements,
            },
            open,
        )
    }

    /// Widens the filter mask for the duration of `f`, restoring it
    /// afterward regardless of which path through `f` returns -- the
    /// bracketed-expression equivalent of `FilterGuard`, expressed as a
    /// scope function rather than a drop guard since `f` needs further
    /// `&mut self` access that a live borrow from a guard would block.
    fn with_widened_mask<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let previous = self.mask;
        self.mask = filter::ALL_MASK;
        let result = f(self);
        self.mask = previous;
        result
    }

    /// Parses one or more `Prec::IfElse`-and-above expressions joined by
    /// `,`, left-associating them into a chain of comma `BinaryExpr`s. A
    /// trailing comma before the closer is tolerated.
    fn parse_comma_list(&mut self) -> Option<ExprHandle<'arena, 'src>> {
        let mut acc = self.parse_expression(Prec::IfElse)?;
        while self.peek(0).kind == TokenKind::Operator
            && self.peek(0).flags == flags::operator::COMMA
        {
            let comma = self.advance();
            if self.peek_is_closer(0) {
                break;
            }
            let next = self.parse_expression(Prec::IfElse)?;
            acc = self.alloc_expr(
                Expr::BinaryExpr {
                    op: comma,
                    left: Some(acc),
                    right: Some(next),
                },
                comma,
            )?;
        }
        Some(acc)
    }

    fn peek_is_closer(&mut self, n: usize) -> bool {
        let tok = self.peek(n);
        tok.kind == TokenKind::Marker
            && matches!(
                tok.flags,
                f if f == flags::marker::CLOSE_PAREN
                    || f == flags::marker::CLOSE_BRACKET
                    || f == flags::marker::CLOSE_BRACE
            )
    }

    fn expect_closer(
        &mut self,
        flag: i32,
        open: Token<'src>,
        kind: ParseErrorKind,
    ) -> Token<'src> {
        if self.peek_is_marker(0, flag) {
            self.advance()
        } else {
            self.report(kind, open);
            Token::synthetic_eot()
        }
    }

    // ---- token buffer -----------------------------------------------------

    fn fill(&mut self, upto: usize) {
        while self.buf.len() <= upto {
            let tok = loop {
                let t = self.source.next_token();
                if t.kind == TokenKind::Eot || !filter::is_hidden(&t, self.mask) {
                    break t;
                }
            };
            self.buf.push_back(tok);
        }
    }

    fn peek(&mut self, n: usize) -> Token<'src> {
        self.fill(n);
        self.buf[n]
    }

    fn peek_is_marker(&mut self, n: usize, flag: i32) -> bool {
        let tok = self.peek(n);
        tok.kind == TokenKind::Marker && tok.flags == flag
    }

    fn peek_is_identifier(&mut self, n: usize, flag: i32) -> bool {
        let tok = self.peek(n);
        tok.kind == TokenKind::Identifier && tok.flags == flag
    }

    fn advance(&mut self) -> Token<'src> {
        self.fill(0);
        self.buf.pop_front().expect("fill(0) guarantees an entry")
    }

    // ---- node construction and diagnostics --------------------------------

    fn alloc_expr(
        &mut self,
        expr: Expr<'arena, 'src>,
        at: Token<'src>,
    ) -> Option<ExprHandle<'arena, 'src>> {
        match self.reactor.alloc(expr) {
            Some(h) => Some(h),
            None => {
                self.report(ParseErrorKind::ReactorOutOfMemory, at);
                None
            }
        }
    }

    fn stmt_node(&mut self, stmt: Stmt<'arena, 'src>) -> Option<StmtHandle<'arena, 'src>> {
        match self.reactor.alloc(stmt) {
            Some(h) => Some(h),
            None => {
                self.report(ParseErrorKind::ReactorOutOfMemory, Token::synthetic_eot());
                None
            }
        }
    }

    fn event_node(&mut self, kind: EventKind, at: Token<'src>) -> Option<StmtHandle<'arena, 'src>> {
        self.stmt_node(Stmt::Event { kind, at })
    }

    fn report(&mut self, kind: ParseErrorKind, offending_token: Token<'src>) {
        let err = ParseError {
            kind,
            offending_token,
        };
        if self.reactor.report(err) == OnError::Abort {
            self.source.drain();
            self.done = true;
        }
    }
}
