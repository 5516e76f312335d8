//! `ExpressionAnalyzer`: walks a parse-tree expression and returns the AST
//! node it denotes together with its `Flags` -- ascending properties the
//! caller inspects, descending constraints the caller passed in.

use rattle_common::token::{flags, Token, TokenKind};
use rattle_common::AnalyzerError;
use rattle_parser::tree::Expr as PExpr;
use rattle_parser::ExprHandle as PExprHandle;

use crate::ast::{BinaryKind, BindingKind, Expr, ExprHandle, LiteralKind, UnaryKind};
use crate::flags::Flags;
use crate::sink::AnalysisSink;

pub struct ExpressionAnalyzer<'a, Sink> {
    reactor: &'a mut Sink,
}

impl<'arena, 'src, 'a, Sink> ExpressionAnalyzer<'a, Sink>
where
    Sink: AnalysisSink<'arena, 'src>,
{
    pub fn new(reactor: &'a mut Sink) -> Self {
        Self { reactor }
    }

    fn error(&mut self, description: impl Into<String>, at: Token<'src>) {
        self.reactor.report_analysis(AnalyzerError {
            description: description.into(),
            start: at.start,
            end: at.end,
        });
    }

    fn alloc(&mut self, expr: Expr<'arena, 'src>, at: Token<'src>) -> Option<ExprHandle<'arena, 'src>> {
        match self.reactor.alloc(expr) {
            Some(h) => Some(h),
            None => {
                self.error("out of memory allocating an AST expression node", at);
                None
            }
        }
    }

    /// Analyzes `expr` under `constraints`, returning `(None, Flags::NONE)`
    /// for a missing child -- the "null child, already reported" case the
    /// parser's own `None`s propagate into.
    pub fn analyze(
        &mut self,
        expr: Option<PExprHandle<'arena, 'src>>,
        constraints: Flags,
    ) -> (Option<ExprHandle<'arena, 'src>>, Flags) {
        let Some(expr) = expr else {
            return (None, Flags::NONE);
        };
        // `release()` trades the owning handle for a `&mut` into the arena so
        // the `Option<Handle>` children can be moved out with `mem::take` --
        // they can't be copied out from behind a shared reference, since a
        // `Handle` is move-only.
        match expr.release() {
            PExpr::Literal { token } => self.analyze_literal(*token, constraints),
            PExpr::UnaryExpr { op, operand } => {
                self.analyze_unary(*op, std::mem::take(operand), constraints)
            }
            PExpr::BinaryExpr { op, left, right } => self.analyze_binary(
                *op,
                std::mem::take(left),
                std::mem::take(right),
                constraints,
            ),
            PExpr::BiExprBiTk {
                tk1,
                tk2,
                expr1,
                expr2,
            } => self.analyze_bi_tk(
                *tk1,
                *tk2,
                std::mem::take(expr1),
                std::mem::take(expr2),
                constraints,
            ),
        }
    }

    fn analyze_literal(
        &mut self,
        token: Token<'src>,
        constraints: Flags,
    ) -> (Option<ExprHandle<'arena, 'src>>, Flags) {
        if token.kind == TokenKind::Identifier && token.flags == flags::identifier::VARIABLE {
            if constraints.contains(Flags::PREFER_BINDING) {
                let node = self.alloc(
                    Expr::Binding {
                        kind: BindingKind::Name,
                        name: token,
                    },
                    token,
                );
                let f = Flags::ASSIGNABLE | Flags::LITERAL_ID | Flags::ONLY_IDS | Flags::BINDING;
                return (node, f);
            }
            let node = self.alloc(
                Expr::Literal {
                    kind: LiteralKind::Identifier,
                    value: token,
                },
                token,
            );
            return (node, Flags::ASSIGNABLE | Flags::LITERAL_ID | Flags::ONLY_IDS);
        }
        let kind = match token.kind {
            TokenKind::Number => LiteralKind::Number,
            TokenKind::String => LiteralKind::String,
            TokenKind::Identifier if token.flags == flags::identifier::TRUE => LiteralKind::True,
            TokenKind::Identifier if token.flags == flags::identifier::FALSE => LiteralKind::False,
            TokenKind::Identifier if token.flags == flags::identifier::NONE => LiteralKind::None,
            _ => LiteralKind::Identifier,
        };
        let node = self.alloc(Expr::Literal { kind, value: token }, token);
        (node, Flags::NONE)
    }

    fn analyze_unary(
        &mut self,
        op: Token<'src>,
        operand: Option<PExprHandle<'arena, 'src>>,
        constraints: Flags,
    ) -> (Option<ExprHandle<'arena, 'src>>, Flags) {
        if op.kind == TokenKind::Operator && op.flags == flags::operator::STAR {
            let operand_is_literal_id = matches!(
                operand.as_ref().map(|h| h.as_ref()),
                Some(PExpr::Literal { token }) if token.kind == TokenKind::Identifier
                    && token.flags == flags::identifier::VARIABLE
            );
            if constraints.contains(Flags::PREFER_BINDING) && operand_is_literal_id {
                let name = match operand.unwrap().as_ref() {
                    PExpr::Literal { token } => *token,
                    _ => unreachable!(),
                };
                let node = self.alloc(
                    Expr::Binding {
                        kind: BindingKind::Capture,
                        name,
                    },
                    op,
                );
                return (node, Flags::ASSIGNABLE | Flags::BINDING);
            }
            let (inner, _) = self.analyze(operand, Flags::NONE);
            let node = self.alloc(
                Expr::UnaryExpr {
                    kind: UnaryKind::Spread,
                    operand: inner,
                    at: op,
                },
                op,
            );
            return (node, Flags::NONE);
        }
        let kind = match op.kind {
            TokenKind::Operator if op.flags == flags::operator::PLUS => UnaryKind::Posify,
            TokenKind::Operator if op.flags == flags::operator::MINUS => UnaryKind::Negate,
            TokenKind::Identifier if op.flags == flags::identifier::NOT => UnaryKind::LogicNot,
            _ => UnaryKind::Posify,
        };
        let (inner, _) = self.analyze(operand, Flags::NONE);
        let node = self.alloc(
            Expr::UnaryExpr {
                kind,
                operand: inner,
                at: op,
            },
            op,
        );
        (node, Flags::NONE)
    }

    fn analyze_binary(
        &mut self,
        op: Token<'src>,
        left: Option<PExprHandle<'arena, 'src>>,
        right: Option<PExprHandle<'arena, 'src>>,
        constraints: Flags,
    ) -> (Option<ExprHandle<'arena, 'src>>, Flags) {
        if op.kind == TokenKind::Operator && op.flags == flags::operator::COMMA {
            return self.analyze_comma(op, left, right, constraints);
        }
        if op.kind == TokenKind::Operator && op.flags == flags::operator::DOT {
            return self.analyze_dot(op, left, right);
        }
        if op.kind == TokenKind::Identifier && op.flags == flags::identifier::IN {
            return self.analyze_in(op, left, right, constraints);
        }
        if op.kind == TokenKind::Identifier && op.flags == flags::identifier::IF {
            // The first half of a ternary: `BinaryExpr(if, a, cond)`, always
            // consumed from inside the enclosing `BiExprBiTk(if, else, ..)`.
            // Reached directly only on `patial_ifelse_operator` recovery,
            // where the parser already reported the missing `else` -- build
            // the same `TernaryExpr` shape with `right: None`.
            let (a_ast, _) = self.analyze(left, Flags::NONE);
            let (cond_ast, _) = self.analyze(right, Flags::NONE);
            let node = self.alloc(
                Expr::TernaryExpr {
                    kind: crate::ast::TernaryKind::IfElse,
                    left: a_ast,
                    middle: cond_ast,
                    right: None,
                    at: op,
                },
                op,
            );
            return (node, Flags::IF);
        }

        let kind = binary_kind_for(op);
        let (l, _) = self.analyze(left, Flags::NONE);
        let (r, _) = self.analyze(right, Flags::NONE);
        let node = self.alloc(
            Expr::BinaryExpr {
                kind,
                left: l,
                right: r,
                at: op,
            },
            op,
        );
        (node, Flags::NONE)
    }

    fn analyze_comma(
        &mut self,
        op: Token<'src>,
        left: Option<PExprHandle<'arena, 'src>>,
        right: Option<PExprHandle<'arena, 'src>>,
        constraints: Flags,
    ) -> (Option<ExprHandle<'arena, 'src>>, Flags) {
        let propagate = constraints.intersection(
            Flags::LIST_COMPONENTS_ASSIGNABLE | Flags::PREFER_BINDING | Flags::LIST_OF_IDS_ONLY,
        );
        let (l, lf) = self.analyze(left, propagate);
        let (r, rf) = self.analyze(right, propagate);

        if constraints.contains(Flags::LIST_COMPONENTS_ASSIGNABLE) {
            if !lf.contains(Flags::ASSIGNABLE) {
                self.error(
                    "each component of this list must be assignable",
                    l.as_ref().map(|h| h.anchor()).unwrap_or(op),
                );
            }
            if !rf.contains(Flags::ASSIGNABLE) {
                self.error(
                    "each component of this list must be assignable",
                    r.as_ref().map(|h| h.anchor()).unwrap_or(op),
                );
            }
        }
        if constraints.contains(Flags::LIST_OF_IDS_ONLY) {
            if !lf.contains(Flags::ONLY_IDS) {
                self.error(
                    "expected only identifiers in this list",
                    l.as_ref().map(|h| h.anchor()).unwrap_or(op),
                );
            }
            if !rf.contains(Flags::ONLY_IDS) {
                self.error(
                    "expected only identifiers in this list",
                    r.as_ref().map(|h| h.anchor()).unwrap_or(op),
                );
            }
        }

        let node = self.alloc(
            Expr::BinaryExpr {
                kind: BinaryKind::Comma,
                left: l,
                right: r,
                at: op,
            },
            op,
        );
        let ascending = lf.intersection(rf).properties().intersection(
            Flags::ASSIGNABLE | Flags::ONLY_IDS | Flags::BINDING,
        ) | Flags::COMMA;
        (node, ascending)
    }

    fn analyze_dot(
        &mut self,
        op: Token<'src>,
        left: Option<PExprHandle<'arena, 'src>>,
        right: Option<PExprHandle<'arena, 'src>>,
    ) -> (Option<ExprHandle<'arena, 'src>>, Flags) {
        let (l, _) = self.analyze(left, Flags::NONE);
        let (r, rf) = self.analyze(right, Flags::NONE);
        if !rf.contains(Flags::LITERAL_ID) {
            self.error(
                "right-hand side of `.` must be an identifier",
                r.as_ref().map(|h| h.anchor()).unwrap_or(op),
            );
        }
        let node = self.alloc(
            Expr::BinaryExpr {
                kind: BinaryKind::Dot,
                left: l,
                right: r,
                at: op,
            },
            op,
        );
        (node, Flags::ASSIGNABLE)
    }

    fn analyze_in(
        &mut self,
        op: Token<'src>,
        left: Option<PExprHandle<'arena, 'src>>,
        right: Option<PExprHandle<'arena, 'src>>,
        constraints: Flags,
    ) -> (Option<ExprHandle<'arena, 'src>>, Flags) {
        let left_constraint = if constraints.contains(Flags::LEFT_BINDABLE_1ST_IN) {
            Flags::PREFER_BINDING
        } else {
            Flags::NONE
        };
        let (l, lf) = self.analyze(left, left_constraint);
        let (r, _) = self.analyze(right, Flags::NONE);
        if constraints.contains(Flags::LEFT_BINDABLE_1ST_IN) && !lf.contains(Flags::BINDING) {
            self.error(
                "left-hand side of `in` must be an identifier or `*capture`",
                l.as_ref().map(|h| h.anchor()).unwrap_or(op),
            );
        }
        let node = self.alloc(
            Expr::BinaryExpr {
                kind: BinaryKind::In,
                left: l,
                right: r,
                at: op,
            },
            op,
        );
        (node, Flags::IN)
    }

    fn analyze_bi_tk(
        &mut self,
        tk1: Token<'src>,
        tk2: Token<'src>,
        expr1: Option<PExprHandle<'arena, 'src>>,
        expr2: Option<PExprHandle<'arena, 'src>>,
        constraints: Flags,
    ) -> (Option<ExprHandle<'arena, 'src>>, Flags) {
        match (tk1.kind, tk1.flags, tk2.kind, tk2.flags) {
            (TokenKind::Marker, f, _, _) if f == flags::marker::OPEN_PAREN => {
                self.analyze_paren(tk1, expr1, expr2, constraints)
            }
            (TokenKind::Marker, f, _, _) if f == flags::marker::OPEN_BRACKET => {
                self.analyze_bracket(tk1, expr1, expr2)
            }
            (TokenKind::Identifier, f, TokenKind::Identifier, _) if f == flags::identifier::IS => {
                let (l, _) = self.analyze(expr1, Flags::NONE);
                let (r, _) = self.analyze(expr2, Flags::NONE);
                let node = self.alloc(
                    Expr::BinaryExpr {
                        kind: BinaryKind::IsNot,
                        left: l,
                        right: r,
                        at: tk1,
                    },
                    tk1,
                );
                (node, Flags::NONE)
            }
            (TokenKind::Identifier, f, TokenKind::Identifier, _) if f == flags::identifier::NOT => {
                let (l, _) = self.analyze(expr1, Flags::NONE);
                let (r, _) = self.analyze(expr2, Flags::NONE);
                let node = self.alloc(
                    Expr::BinaryExpr {
                        kind: BinaryKind::NotIn,
                        left: l,
                        right: r,
                        at: tk1,
                    },
                    tk1,
                );
                (node, Flags::NONE)
            }
            (TokenKind::Identifier, f, TokenKind::Identifier, _) if f == flags::identifier::IF => {
                self.analyze_ternary(tk1, tk2, expr1, expr2)
            }
            _ => {
                self.error("unrecognized two-token expression shape", tk1);
                (None, Flags::NONE)
            }
        }
    }

    fn analyze_paren(
        &mut self,
        open: Token<'src>,
        left: Option<PExprHandle<'arena, 'src>>,
        inner: Option<PExprHandle<'arena, 'src>>,
        constraints: Flags,
    ) -> (Option<ExprHandle<'arena, 'src>>, Flags) {
        if let Some(callee) = left {
            let (callee_ast, callee_flags) = self.analyze(Some(callee), Flags::NONE);
            let inner_constraint = constraints.intersection(Flags::PREFER_BINDING);
            let (args_ast, args_flags) = self.analyze(inner, inner_constraint);
            let is_signature = callee_flags.contains(Flags::LITERAL_ID)
                && (inner.is_none() || args_flags.contains(Flags::BINDING));
            let node = self.alloc(
                Expr::BinaryExpr {
                    kind: BinaryKind::Call,
                    left: callee_ast,
                    right: args_ast,
                    at: open,
                },
                open,
            );
            let ascending = if is_signature { Flags::SIGNATURE } else { Flags::NONE };
            return (node, ascending);
        }

        let Some(inner) = inner else {
            let node = self.alloc(
                Expr::UnaryExpr {
                    kind: UnaryKind::Tuple,
                    operand: None,
                    at: open,
                },
                open,
            );
            return (node, Flags::NONE);
        };
        let (inner_ast, inner_flags) = self.analyze(Some(inner), constraints);
        let kind = if inner_flags.contains(Flags::COMMA) {
            UnaryKind::Tuple
        } else {
            UnaryKind::Group
        };
        let node = self.alloc(
            Expr::UnaryExpr {
                kind,
                operand: inner_ast,
                at: open,
            },
            open,
        );
        (node, inner_flags.properties())
    }

    fn analyze_bracket(
        &mut self,
        open: Token<'src>,
        left: Option<PExprHandle<'arena, 'src>>,
        inner: Option<PExprHandle<'arena, 'src>>,
    ) -> (Option<ExprHandle<'arena, 'src>>, Flags) {
        if let Some(target) = left {
            let (target_ast, _) = self.analyze(Some(target), Flags::NONE);
            let (index_ast, _) = self.analyze(inner, Flags::NONE);
            let node = self.alloc(
                Expr::BinaryExpr {
                    kind: BinaryKind::Subscript,
                    left: target_ast,
                    right: index_ast,
                    at: open,
                },
                open,
            );
            return (node, Flags::ASSIGNABLE);
        }
        let (elements_ast, _) = self.analyze(inner, Flags::NONE);
        let node = self.alloc(
            Expr::UnaryExpr {
                kind: UnaryKind::List,
                operand: elements_ast,
                at: open,
            },
            open,
        );
        (node, Flags::NONE)
    }

    fn analyze_ternary(
        &mut self,
        if_tok: Token<'src>,
        else_tok: Token<'src>,
        left_binary: Option<PExprHandle<'arena, 'src>>,
        right: Option<PExprHandle<'arena, 'src>>,
    ) -> (Option<ExprHandle<'arena, 'src>>, Flags) {
        let (a, b) = match left_binary {
            Some(inner) => match inner.release() {
                PExpr::BinaryExpr { left, right, .. } => {
                    (std::mem::take(left), std::mem::take(right))
                }
                _ => {
                    self.error("malformed ternary expression", if_tok);
                    (None, None)
                }
            },
            None => {
                self.error("malformed ternary expression", if_tok);
                (None, None)
            }
        };
        let (a_ast, _) = self.analyze(a, Flags::NONE);
        let (b_ast, _) = self.analyze(b, Flags::NONE);
        let (c_ast, _) = self.analyze(right, Flags::NONE);
        let node = self.alloc(
            Expr::TernaryExpr {
                kind: crate::ast::TernaryKind::IfElse,
                left: a_ast,
                middle: b_ast,
                right: c_ast,
                at: if_tok,
            },
            if_tok,
        );
        let _ = else_tok;
        (node, Flags::NONE)
    }
}

fn binary_kind_for(op: Token<'_>) -> BinaryKind {
    match op.kind {
        TokenKind::Operator => match op.flags {
            f if f == flags::operator::PLUS => BinaryKind::Add,
            f if f == flags::operator::MINUS => BinaryKind::Subtract,
            f if f == flags::operator::STAR => BinaryKind::Multiply,
            f if f == flags::operator::SLASH => BinaryKind::Divide,
            f if f == flags::operator::EQUAL_EQUAL => BinaryKind::CmpEq,
            f if f == flags::operator::NOT_EQUAL => BinaryKind::CmpNe,
            f if f == flags::operator::LESS_THAN => BinaryKind::CmpLt,
            f if f == flags::operator::LESS_EQUAL => BinaryKind::CmpLe,
            f if f == flags::operator::GREATER_THAN => BinaryKind::CmpGt,
            f if f == flags::operator::GREATER_EQUAL => BinaryKind::CmpGe,
            _ => BinaryKind::Add,
        },
        TokenKind::Identifier => match op.flags {
            f if f == flags::identifier::AND => BinaryKind::LogicAnd,
            f if f == flags::identifier::OR => BinaryKind::LogicOr,
            f if f == flags::identifier::IS => BinaryKind::Is,
            _ => BinaryKind::Add,
        },
        _ => BinaryKind::Add,
    }
}
