//! The typed AST: what `ExpressionAnalyzer`/`StatementAnalyzer` build from a
//! parse tree. Every node carries `at`, the anchor token of the parse-tree
//! node it was built from, for diagnostics -- a plain `Copy` token rather
//! than a borrowed back-reference into the parse tree, since a token already
//! carries the full span a diagnostic needs and avoids stacking a second
//! arena-lifetime reference alongside each owning child handle.

use rattle_common::arena::Handle;
use rattle_common::token::Token;

pub type ExprHandle<'arena, 'src> = Handle<'arena, Expr<'arena, 'src>>;
pub type StmtHandle<'arena, 'src> = Handle<'arena, Stmt<'arena, 'src>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiteralKind {
    Identifier,
    Number,
    String,
    True,
    False,
    None,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryKind {
    Posify,
    Negate,
    Spread,
    LogicNot,
    Tuple,
    Group,
    List,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryKind {
    Add,
    Subtract,
    Multiply,
    Divide,
    LogicAnd,
    LogicOr,
    CmpEq,
    CmpNe,
    CmpLt,
    CmpLe,
    CmpGt,
    CmpGe,
    In,
    Is,
    IsNot,
    NotIn,
    Call,
    Subscript,
    Dot,
    Comma,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TernaryKind {
    IfElse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingKind {
    Name,
    Capture,
}

#[derive(Debug)]
pub enum Expr<'arena, 'src> {
    Literal {
        kind: LiteralKind,
        value: Token<'src>,
    },
    UnaryExpr {
        kind: UnaryKind,
        operand: Option<ExprHandle<'arena, 'src>>,
        at: Token<'src>,
    },
    BinaryExpr {
        kind: BinaryKind,
        left: Option<ExprHandle<'arena, 'src>>,
        right: Option<ExprHandle<'arena, 'src>>,
        at: Token<'src>,
    },
    TernaryExpr {
        kind: TernaryKind,
        left: Option<ExprHandle<'arena, 'src>>,
        middle: Option<ExprHandle<'arena, 'src>>,
        right: Option<ExprHandle<'arena, 'src>>,
        at: Token<'src>,
    },
    Binding {
        kind: BindingKind,
        name: Token<'src>,
    },
    /// No parse-tree shape currently constructs this: the lexer has no
    /// lambda syntax (see DESIGN.md). Kept so the AST union matches the
    /// data model in full and a future lexical surface has somewhere to
    /// land.
    Lambda {
        parameters: Option<ExprHandle<'arena, 'src>>,
        body: Option<StmtHandle<'arena, 'src>>,
        at: Token<'src>,
    },
}

impl<'src> Expr<'_, 'src> {
    pub fn anchor(&self) -> Token<'src> {
        match self {
            Expr::Literal { value, .. } => *value,
            Expr::UnaryExpr { at, .. } => *at,
            Expr::BinaryExpr { at, .. } => *at,
            Expr::TernaryExpr { at, .. } => *at,
            Expr::Binding { name, .. } => *name,
            Expr::Lambda { at, .. } => *at,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignKind {
    Equal,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefKind {
    Function,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandKind {
    Return,
    Nonlocal,
    Global,
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
        kind: AssignKind,
        slot: Option<ExprHandle<'arena, 'src>>,
        value: Option<ExprHandle<'arena, 'src>>,
    },
    For {
        binding: Option<ExprHandle<'arena, 'src>>,
        iterable: Option<ExprHandle<'arena, 'src>>,
        body: Vec<StmtHandle<'arena, 'src>>,
    },
    While {
        cond: Option<ExprHandle<'arena, 'src>>,
        body: Vec<StmtHandle<'arena, 'src>>,
    },
    If {
        cond: Option<ExprHandle<'arena, 'src>>,
        ontrue: Vec<StmtHandle<'arena, 'src>>,
    },
    Else {
        onfalse: Vec<StmtHandle<'arena, 'src>>,
    },
    Class {
        name: Option<Token<'src>>,
        body: Vec<StmtHandle<'arena, 'src>>,
    },
    Def {
        kind: DefKind,
        name: Option<Token<'src>>,
        parameters: Vec<ExprHandle<'arena, 'src>>,
        body: Vec<StmtHandle<'arena, 'src>>,
    },
    Command {
        kind: CommandKind,
        expr: Option<ExprHandle<'arena, 'src>>,
    },
    Event {
        kind: EventKind,
    },
}
