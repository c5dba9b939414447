use crate::span::Spanned;

/// Top-level statements of the analyzed source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub body: Vec<Spanned<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Spanned<String>,
}

/// An `except` clause. `kind` is the handled exception class name,
/// `None` for a bare `except:`.
#[derive(Debug, Clone, PartialEq)]
pub struct Handler {
    pub kind: Option<Spanned<String>>,
    pub bind: Option<Spanned<String>>,
    pub body: Vec<Spanned<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    FuncDef {
        name: Spanned<String>,
        params: Vec<Param>,
        body: Vec<Spanned<Stmt>>,
    },
    /// `elif` chains desugar to a nested `If` as the sole statement of
    /// `else_body`, so every arm carries its own condition and span.
    If {
        cond: Spanned<Expr>,
        then_body: Vec<Spanned<Stmt>>,
        else_body: Vec<Spanned<Stmt>>,
    },
    While {
        cond: Spanned<Expr>,
        body: Vec<Spanned<Stmt>>,
    },
    For {
        target: Spanned<String>,
        iter: Spanned<Expr>,
        body: Vec<Spanned<Stmt>>,
    },
    Try {
        body: Vec<Spanned<Stmt>>,
        handlers: Vec<Spanned<Handler>>,
        final_body: Vec<Spanned<Stmt>>,
    },
    Return(Option<Spanned<Expr>>),
    Raise(Option<Spanned<Expr>>),
    Assign {
        target: Spanned<Expr>,
        value: Spanned<Expr>,
    },
    AugAssign {
        target: Spanned<Expr>,
        op: BinOp,
        value: Spanned<Expr>,
    },
    ExprStmt(Spanned<Expr>),
    Pass,
    Break,
    Continue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    NoneLit,
    Name(String),
    List(Vec<Spanned<Expr>>),
    Tuple(Vec<Spanned<Expr>>),
    Dict(Vec<(Spanned<Expr>, Spanned<Expr>)>),
    Unary {
        op: UnaryOp,
        operand: Box<Spanned<Expr>>,
    },
    Binary {
        op: BinOp,
        left: Box<Spanned<Expr>>,
        right: Box<Spanned<Expr>>,
    },
    /// Chained comparison: `a < b <= c` keeps Python's pairwise
    /// evaluation, each operand evaluated once.
    Compare {
        left: Box<Spanned<Expr>>,
        rest: Vec<(CmpOp, Spanned<Expr>)>,
    },
    Call {
        callee: Box<Spanned<Expr>>,
        args: Vec<Spanned<Expr>>,
    },
    Attribute {
        value: Box<Spanned<Expr>>,
        attr: Spanned<String>,
    },
    Index {
        value: Box<Spanned<Expr>>,
        index: Box<Spanned<Expr>>,
    },
    Slice {
        value: Box<Spanned<Expr>>,
        lower: Option<Box<Spanned<Expr>>>,
        upper: Option<Box<Spanned<Expr>>>,
        step: Option<Box<Spanned<Expr>>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Pos,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    NotIn,
    Is,
    IsNot,
}

impl BinOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::FloorDiv => "//",
            BinOp::Mod => "%",
            BinOp::Pow => "**",
            BinOp::And => "and",
            BinOp::Or => "or",
        }
    }
}

impl CmpOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
            CmpOp::In => "in",
            CmpOp::NotIn => "not in",
            CmpOp::Is => "is",
            CmpOp::IsNot => "is not",
        }
    }
}
