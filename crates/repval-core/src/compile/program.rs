use crate::{
    compile::{
        ir::{Expr, StatePtr, Stmt},
        layout::{NativeScalar, StateLayout},
    },
    error::InternalError,
};
use std::{
    cmp::Ordering,
    fmt::{self, Display, Formatter},
    mem,
};

///
/// StateProgramBuilder
///
/// Code builder emission functions append statements to. Nested blocks are
/// collected with [`StateProgramBuilder::block`].
///

#[derive(Debug)]
pub struct StateProgramBuilder {
    layout: StateLayout,
    stmts: Vec<Stmt>,
}

impl StateProgramBuilder {
    #[must_use]
    pub const fn new(layout: StateLayout) -> Self {
        Self {
            layout,
            stmts: Vec::new(),
        }
    }

    #[must_use]
    pub const fn layout(&self) -> StateLayout {
        self.layout
    }

    pub fn push(&mut self, stmt: Stmt) {
        self.stmts.push(stmt);
    }

    /// Run `emit` against an empty statement list and return what it emitted.
    pub fn block(&mut self, emit: impl FnOnce(&mut Self)) -> Vec<Stmt> {
        let outer = mem::take(&mut self.stmts);
        emit(self);

        mem::replace(&mut self.stmts, outer)
    }

    #[must_use]
    pub fn build(self) -> StateProgram {
        StateProgram {
            layout: self.layout,
            stmts: self.stmts,
        }
    }
}

///
/// ProgramEnv
///
/// Operands of one program run: the mutable destination state image, an
/// optional read-only source image (merge) and an optional row argument (add).
///

#[derive(Debug)]
pub struct ProgramEnv<'s> {
    dst: &'s mut [u8],
    src: Option<&'s [u8]>,
    arg: Option<NativeScalar>,
}

impl<'s> ProgramEnv<'s> {
    #[must_use]
    pub fn new(dst: &'s mut [u8]) -> Self {
        Self {
            dst,
            src: None,
            arg: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, src: &'s [u8]) -> Self {
        self.src = Some(src);
        self
    }

    #[must_use]
    pub fn with_argument(mut self, arg: NativeScalar) -> Self {
        self.arg = Some(arg);
        self
    }

    fn image(&self, ptr: StatePtr) -> Result<&[u8], InternalError> {
        match ptr {
            StatePtr::Dst => Ok(&*self.dst),
            StatePtr::Src => self.src.ok_or_else(|| {
                InternalError::compile_invariant("program reads a source state that was not bound")
            }),
        }
    }

    fn image_mut(&mut self, ptr: StatePtr) -> Result<&mut [u8], InternalError> {
        match ptr {
            StatePtr::Dst => Ok(&mut *self.dst),
            StatePtr::Src => Err(InternalError::compile_invariant(
                "program writes the read-only source state",
            )),
        }
    }
}

///
/// StateProgram
///
/// Emitted statement list plus the state layout it addresses.
///
/// [`StateProgram::run`] is the reference interpreter: it executes the
/// statements over little-endian state images exactly as generated machine
/// code would, which lets the emitted program be checked against the
/// interpreted slot path.
///

#[derive(Clone, Debug, PartialEq)]
pub struct StateProgram {
    layout: StateLayout,
    stmts: Vec<Stmt>,
}

impl StateProgram {
    #[must_use]
    pub const fn layout(&self) -> StateLayout {
        self.layout
    }

    #[must_use]
    pub fn stmts(&self) -> &[Stmt] {
        &self.stmts
    }

    /// Execute the program; returns the value of a `return` statement, if any.
    pub fn run(&self, env: &mut ProgramEnv<'_>) -> Result<Option<NativeScalar>, InternalError> {
        self.exec(&self.stmts, env)
    }

    fn exec(
        &self,
        stmts: &[Stmt],
        env: &mut ProgramEnv<'_>,
    ) -> Result<Option<NativeScalar>, InternalError> {
        for stmt in stmts {
            match stmt {
                Stmt::IfElse(cond, then_stmts, else_stmts) => {
                    let branch = if self.eval(cond, env)?.as_bool()? {
                        then_stmts
                    } else {
                        else_stmts
                    };
                    if let Some(result) = self.exec(branch, env)? {
                        return Ok(Some(result));
                    }
                }
                Stmt::StoreFlag(ptr, has) => {
                    self.layout.store_flag(env.image_mut(*ptr)?, *has)?;
                }
                Stmt::Store(ptr, expr) => {
                    let value = self.eval(expr, env)?;
                    self.layout.store_value(env.image_mut(*ptr)?, value)?;
                }
                Stmt::ZeroFill(ptr) => env.image_mut(*ptr)?.fill(0),
                Stmt::Return(expr) => return self.eval(expr, env).map(Some),
            }
        }

        Ok(None)
    }

    fn eval(&self, expr: &Expr, env: &ProgramEnv<'_>) -> Result<NativeScalar, InternalError> {
        let value = match expr {
            Expr::Arg(ty) => env.arg.ok_or_else(|| {
                InternalError::compile_invariant(format!(
                    "program reads a {ty} argument that was not bound"
                ))
            })?,
            Expr::Flag(ptr) => NativeScalar::Bool(self.layout.load_flag(env.image(*ptr)?)?),
            Expr::Load(ptr, _) => self.layout.load_value(env.image(*ptr)?)?,
            Expr::Not(inner) => NativeScalar::Bool(!self.eval(inner, env)?.as_bool()?),
            Expr::And(lhs, rhs) => NativeScalar::Bool(
                self.eval(lhs, env)?.as_bool()? && self.eval(rhs, env)?.as_bool()?,
            ),
            Expr::Or(lhs, rhs) => NativeScalar::Bool(
                self.eval(lhs, env)?.as_bool()? || self.eval(rhs, env)?.as_bool()?,
            ),
            Expr::Lt(lhs, rhs) => {
                let ord = self.eval(lhs, env)?.native_cmp(self.eval(rhs, env)?)?;
                NativeScalar::Bool(ord == Some(Ordering::Less))
            }
            Expr::Gt(lhs, rhs) => {
                let ord = self.eval(lhs, env)?.native_cmp(self.eval(rhs, env)?)?;
                NativeScalar::Bool(ord == Some(Ordering::Greater))
            }
        };

        Ok(value)
    }
}

impl Display for StateProgram {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for stmt in &self.stmts {
            stmt.fmt_ident(0, f)?;
        }

        Ok(())
    }
}
