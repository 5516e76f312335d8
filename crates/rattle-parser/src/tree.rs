//! Parse-tree node shapes: the raw syntactic union the parser builds,
//! before the syntactic analyzer turns it into a typed AST. Every child is
//! an owning `Handle` into the shared arena; a `None` child means a
//! previously-reported error that downstream consumers must not re-report.

use rattle_common::arena::Handle;
use rattle_common::token::Token;

pub type ExprHandle<'arena, 'src> = Handle<'arena, Expr<'arena, 'src>>;
pub type StmtHandle<'arena, 'src> = Handle<'arena, Stmt<'arena, 'src>>;

#[derive(Debug)]
pub enum Expr<'arena, 'src> {
    UnaryExpr {
        op: Token<'src>,
        operand: Option<ExprHandle<'arena, 'src>>,
    },
    BinaryExpr {
        op: Token<'src>,
        left: Option<ExprHandle<'arena, 'src>>,
        right: Option<ExprHandle<'arena, 'src>>,
    },
    Literal { token: Token<'src> },
    /// Any shape bracketed by two tokens with two subexpressions: call
    /// `f(args)`, subscript `a[b]`, lambda `|p| body`, `is not x`,
    /// `not in x`, the `if`/`else` ternary.
    BiExprBiTk {
        tk1: Token<'src>,
        tk2: Token<'src>,
        expr1: Option<ExprHandle<'arena, 'src>>,
        expr2: Option<ExprHandle<'arena, 'src>>,
    },
}

impl<'src> Expr<'_, 'src> {
    /// The token that best represents this expression's source position,
    /// used when a consumer needs a location for a diagnostic.
    pub fn anchor(&self) -> Token<'src> {
        match self {
            Expr::UnaryExpr { op, .. } => *op,
            Expr::BinaryExpr { op, .. } => *op,
            Expr::Literal { token } => *token,
            Expr::BiExprBiTk { tk1, .. } => *tk1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    ScopeBegin,
    ScopeEnd,
    Continue,
    Break,
}

#[derive(Debug)]
pub enum Stmt<'arena, 'src> {
    ExprStmt {
        expr: Option<ExprHandle<'arena, 'src>>,
    },
    Assignment {
        op: Token<'src>,
        slot: Option<ExprHandle<'arena, 'src>>,
        value: Option<ExprHandle<'arena, 'src>>,
    },
    /// `return e?`, `nonlocal ids`, `global ids`.
    TkExpr {
        tk: Token<'src>,
        expr: Option<ExprHandle<'arena, 'src>>,
    },
    /// `def`/`class`/`while`/`for`/`if`/`else` with an optional block body.
    TkExprStmt {
        tk: Token<'src>,
        expr: Option<ExprHandle<'arena, 'src>>,
        body: Option<StmtHandle<'arena, 'src>>,
    },
    /// Scope delimiters and loop-control keywords are transmitted as
    /// first-class pipeline items rather than nested containers, so the
    /// pipeline carries uniformly-sized statement objects.
    Event { kind: EventKind, at: Token<'src> },
}
