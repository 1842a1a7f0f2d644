//! Predicate expression subsystem
//!
//! The input side of translation: a closed tree of expression nodes that
//! describes a boolean filter over an entity. Trees are built by callers
//! (usually through `Queryable::filter`) and are never mutated afterwards.

mod ast;
mod builder;
mod types;

pub use ast::{
    Binary, BinaryOp, Captured, Constant, Expr, ExprRef, Invocation, Lambda, MemberAccess,
    MemberPath, MethodCall, Parameter, ParameterId, Unary, UnaryOp,
};
pub use builder::IntoExpr;
pub use types::{DeclaringKind, EnumType, ExprType};
