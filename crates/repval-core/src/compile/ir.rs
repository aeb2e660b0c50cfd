use repval_primitives::NativeKind;
use std::fmt::{self, Display, Formatter};

///
/// StatePtr
///
/// Named aggregate state pointer an emitted program operates on. Add,
/// result and create programs only touch `Dst`; merge programs read `Src`.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StatePtr {
    Dst,
    Src,
}

impl Display for StatePtr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dst => f.write_str("dst"),
            Self::Src => f.write_str("src"),
        }
    }
}

///
/// Expr
///

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// incoming row value
    Arg(NativeKind),
    /// load the `has` flag
    Flag(StatePtr),
    /// load the stored value
    Load(StatePtr, NativeKind),
    Not(Box<Self>),
    And(Box<Self>, Box<Self>),
    Or(Box<Self>, Box<Self>),
    /// `<`, signed/unsigned/ordered-float by operand type
    Lt(Box<Self>, Box<Self>),
    /// `>`, signed/unsigned/ordered-float by operand type
    Gt(Box<Self>, Box<Self>),
}

impl Expr {
    #[must_use]
    pub const fn get_type(&self) -> NativeKind {
        match self {
            Self::Arg(ty) | Self::Load(_, ty) => *ty,
            Self::Flag(_)
            | Self::Not(_)
            | Self::And(_, _)
            | Self::Or(_, _)
            | Self::Lt(_, _)
            | Self::Gt(_, _) => NativeKind::Bool,
        }
    }

    #[must_use]
    pub fn not(expr: Self) -> Self {
        Self::Not(Box::new(expr))
    }

    #[must_use]
    pub fn and(lhs: Self, rhs: Self) -> Self {
        Self::And(Box::new(lhs), Box::new(rhs))
    }

    #[must_use]
    pub fn or(lhs: Self, rhs: Self) -> Self {
        Self::Or(Box::new(lhs), Box::new(rhs))
    }

    #[must_use]
    pub fn lt(lhs: Self, rhs: Self) -> Self {
        Self::Lt(Box::new(lhs), Box::new(rhs))
    }

    #[must_use]
    pub fn gt(lhs: Self, rhs: Self) -> Self {
        Self::Gt(Box::new(lhs), Box::new(rhs))
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arg(ty) => write!(f, "arg: {ty}"),
            Self::Flag(ptr) => write!(f, "{ptr}.has"),
            Self::Load(ptr, ty) => write!(f, "{ptr}.value: {ty}"),
            Self::Not(expr) => write!(f, "!({expr})"),
            Self::And(lhs, rhs) => write!(f, "({lhs} && {rhs})"),
            Self::Or(lhs, rhs) => write!(f, "({lhs} || {rhs})"),
            Self::Lt(lhs, rhs) => write!(f, "({lhs} < {rhs})"),
            Self::Gt(lhs, rhs) => write!(f, "({lhs} > {rhs})"),
        }
    }
}

///
/// Stmt
///

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    /// if-then-else
    IfElse(Box<Expr>, Vec<Self>, Vec<Self>),
    /// write the `has` flag
    StoreFlag(StatePtr, bool),
    /// write the stored value
    Store(StatePtr, Box<Expr>),
    /// zero the whole state
    ZeroFill(StatePtr),
    /// produce the program result
    Return(Box<Expr>),
}

impl Stmt {
    /// Print the statement with indentation.
    pub fn fmt_ident(&self, ident: usize, f: &mut Formatter<'_>) -> fmt::Result {
        let pad = " ".repeat(ident);
        match self {
            Self::IfElse(cond, then_stmts, else_stmts) => {
                writeln!(f, "{pad}if {cond} {{")?;
                for stmt in then_stmts {
                    stmt.fmt_ident(ident + 4, f)?;
                }
                if !else_stmts.is_empty() {
                    writeln!(f, "{pad}}} else {{")?;
                    for stmt in else_stmts {
                        stmt.fmt_ident(ident + 4, f)?;
                    }
                }
                writeln!(f, "{pad}}}")
            }
            Self::StoreFlag(ptr, value) => writeln!(f, "{pad}{ptr}.has = {value};"),
            Self::Store(ptr, expr) => writeln!(f, "{pad}{ptr}.value = {expr};"),
            Self::ZeroFill(ptr) => writeln!(f, "{pad}zero({ptr});"),
            Self::Return(expr) => writeln!(f, "{pad}return {expr};"),
        }
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.fmt_ident(0, f)
    }
}
