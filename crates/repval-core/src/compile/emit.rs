use crate::compile::{
    ir::{Expr, StatePtr, Stmt},
    program::StateProgramBuilder,
};

///
/// ChangeCondition
///
/// Comparison gate of a conditional change; mirrors the slot primitives
/// `change_first_time`, `change_every_time`, `change_if_less` and
/// `change_if_greater`.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChangeCondition {
    FirstTime,
    EveryTime,
    Less,
    Greater,
}

/// Emit an unconditional overwrite of the destination with `value`.
pub fn emit_change(builder: &mut StateProgramBuilder, value: Expr) {
    builder.push(Stmt::StoreFlag(StatePtr::Dst, true));
    builder.push(Stmt::Store(StatePtr::Dst, Box::new(value)));
}

/// Emit an unconditional overwrite of the destination with the source value.
pub fn emit_change_merge(builder: &mut StateProgramBuilder) {
    let ty = builder.layout().native();
    emit_change(builder, Expr::Load(StatePtr::Src, ty));
}

/// Emit a change of the destination with `value`, gated by `condition`.
pub fn emit_change_if(builder: &mut StateProgramBuilder, condition: ChangeCondition, value: Expr) {
    let ty = builder.layout().native();
    let empty = || Expr::not(Expr::Flag(StatePtr::Dst));
    let stored = || Expr::Load(StatePtr::Dst, ty);

    let guard = match condition {
        ChangeCondition::EveryTime => {
            emit_change(builder, value);
            return;
        }
        ChangeCondition::FirstTime => empty(),
        ChangeCondition::Less => Expr::or(empty(), Expr::lt(value.clone(), stored())),
        ChangeCondition::Greater => Expr::or(empty(), Expr::gt(value.clone(), stored())),
    };

    let then_stmts = builder.block(|b| emit_change(b, value));
    builder.push(Stmt::IfElse(Box::new(guard), then_stmts, Vec::new()));
}

/// Emit a merge of the source into the destination, gated by `condition`.
///
/// An empty source never changes the destination.
pub fn emit_change_if_merge(builder: &mut StateProgramBuilder, condition: ChangeCondition) {
    let ty = builder.layout().native();
    let src_has = || Expr::Flag(StatePtr::Src);
    let dst_empty = || Expr::not(Expr::Flag(StatePtr::Dst));
    let src = || Expr::Load(StatePtr::Src, ty);
    let dst = || Expr::Load(StatePtr::Dst, ty);

    let guard = match condition {
        ChangeCondition::FirstTime => Expr::and(dst_empty(), src_has()),
        ChangeCondition::EveryTime => src_has(),
        ChangeCondition::Less => Expr::and(src_has(), Expr::or(dst_empty(), Expr::lt(src(), dst()))),
        ChangeCondition::Greater => {
            Expr::and(src_has(), Expr::or(dst_empty(), Expr::gt(src(), dst())))
        }
    };

    let then_stmts = builder.block(emit_change_merge);
    builder.push(Stmt::IfElse(Box::new(guard), then_stmts, Vec::new()));
}

/// Emit zero-initialisation of the destination state.
pub fn emit_create(builder: &mut StateProgramBuilder) {
    builder.push(Stmt::ZeroFill(StatePtr::Dst));
}

/// Emit a load of the stored value as the program result.
pub fn emit_get_result(builder: &mut StateProgramBuilder) {
    let ty = builder.layout().native();
    builder.push(Stmt::Return(Box::new(Expr::Load(StatePtr::Dst, ty))));
}
