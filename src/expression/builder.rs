//! Constructors for building predicate trees in code

use std::sync::Arc;

use serde_json::Value;

use super::ast::{
    Binary, BinaryOp, Captured, Constant, Expr, ExprRef, Invocation, Lambda, MemberAccess,
    MethodCall, Parameter, Unary, UnaryOp,
};
use super::types::{DeclaringKind, ExprType};

/// Conversion into a shared expression node
pub trait IntoExpr {
    fn into_expr(self) -> ExprRef;
}

impl IntoExpr for Expr {
    fn into_expr(self) -> ExprRef {
        Arc::new(self)
    }
}

impl IntoExpr for ExprRef {
    fn into_expr(self) -> ExprRef {
        self
    }
}

impl IntoExpr for &ExprRef {
    fn into_expr(self) -> ExprRef {
        Arc::clone(self)
    }
}

impl IntoExpr for Lambda {
    fn into_expr(self) -> ExprRef {
        Arc::new(Expr::Lambda(self))
    }
}

impl IntoExpr for Parameter {
    fn into_expr(self) -> ExprRef {
        Arc::new(Expr::Parameter(self))
    }
}

impl IntoExpr for &Parameter {
    fn into_expr(self) -> ExprRef {
        Arc::new(Expr::Parameter(self.clone()))
    }
}

impl From<Lambda> for Expr {
    fn from(lambda: Lambda) -> Self {
        Expr::Lambda(lambda)
    }
}

impl From<Parameter> for Expr {
    fn from(parameter: Parameter) -> Self {
        Expr::Parameter(parameter)
    }
}

impl Lambda {
    pub fn new(parameters: impl IntoIterator<Item = Parameter>, body: impl IntoExpr) -> Self {
        Self {
            parameters: parameters.into_iter().collect(),
            body: body.into_expr(),
        }
    }
}

impl Expr {
    // Literals

    pub fn constant(value: Value, ty: ExprType) -> Self {
        Expr::Constant(Constant { value, ty })
    }

    pub fn int(value: i64) -> Self {
        Self::constant(Value::from(value), ExprType::Int)
    }

    pub fn double(value: f64) -> Self {
        Self::constant(Value::from(value), ExprType::Double)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::constant(Value::String(value.into()), ExprType::String)
    }

    pub fn bool(value: bool) -> Self {
        Self::constant(Value::Bool(value), ExprType::Bool)
    }

    /// The root of a deferred query over `element`
    pub fn query_root(element: impl Into<String>) -> Self {
        Self::constant(Value::Null, ExprType::Queryable(element.into()))
    }

    pub fn array(elements: impl IntoIterator<Item = Expr>) -> Self {
        Expr::ArrayLiteral(elements.into_iter().map(Arc::new).collect())
    }

    /// A closure evaluated at translation time
    pub fn captured(
        name: impl Into<String>,
        ty: ExprType,
        eval: impl Fn() -> Value + Send + Sync + 'static,
    ) -> Self {
        Expr::Captured(Captured::new(name, ty, eval))
    }

    /// A closed-over local variable holding `value`
    pub fn local(name: impl Into<String>, ty: ExprType, value: Value) -> Self {
        Self::captured(name, ty, move || value.clone())
    }

    // Structure

    pub fn member(target: impl IntoExpr, member: impl Into<String>, ty: ExprType) -> Self {
        Expr::MemberAccess(MemberAccess {
            target: target.into_expr(),
            member: member.into(),
            ty,
        })
    }

    pub fn quote(inner: impl IntoExpr) -> Self {
        Expr::Quote(inner.into_expr())
    }

    pub fn invoke(lambda: impl IntoExpr, arguments: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Invocation(Invocation {
            lambda: lambda.into_expr(),
            arguments: arguments.into_iter().map(Arc::new).collect(),
        })
    }

    // Operators

    pub fn binary(op: BinaryOp, left: impl IntoExpr, right: impl IntoExpr) -> Self {
        Expr::Binary(Binary {
            op,
            left: left.into_expr(),
            right: right.into_expr(),
        })
    }

    pub fn eq(left: impl IntoExpr, right: impl IntoExpr) -> Self {
        Self::binary(BinaryOp::Eq, left, right)
    }

    pub fn not_eq(left: impl IntoExpr, right: impl IntoExpr) -> Self {
        Self::binary(BinaryOp::NotEq, left, right)
    }

    pub fn gt(left: impl IntoExpr, right: impl IntoExpr) -> Self {
        Self::binary(BinaryOp::Gt, left, right)
    }

    pub fn gte(left: impl IntoExpr, right: impl IntoExpr) -> Self {
        Self::binary(BinaryOp::Gte, left, right)
    }

    pub fn lt(left: impl IntoExpr, right: impl IntoExpr) -> Self {
        Self::binary(BinaryOp::Lt, left, right)
    }

    pub fn lte(left: impl IntoExpr, right: impl IntoExpr) -> Self {
        Self::binary(BinaryOp::Lte, left, right)
    }

    pub fn and_also(left: impl IntoExpr, right: impl IntoExpr) -> Self {
        Self::binary(BinaryOp::AndAlso, left, right)
    }

    pub fn or_else(left: impl IntoExpr, right: impl IntoExpr) -> Self {
        Self::binary(BinaryOp::OrElse, left, right)
    }

    pub fn not(operand: impl IntoExpr) -> Self {
        Expr::Unary(Unary {
            op: UnaryOp::Not,
            operand: operand.into_expr(),
            ty: ExprType::Bool,
        })
    }

    pub fn convert(operand: impl IntoExpr, ty: ExprType) -> Self {
        Expr::Unary(Unary {
            op: UnaryOp::Convert,
            operand: operand.into_expr(),
            ty,
        })
    }

    pub fn negate(operand: impl IntoExpr) -> Self {
        let operand = operand.into_expr();
        let ty = operand.ty();
        Expr::Unary(Unary {
            op: UnaryOp::Negate,
            operand,
            ty,
        })
    }

    // Method calls

    pub fn call(
        target: Option<ExprRef>,
        method: impl Into<String>,
        declaring: DeclaringKind,
        arguments: impl IntoIterator<Item = ExprRef>,
        ty: ExprType,
    ) -> Self {
        Expr::MethodCall(MethodCall {
            target,
            method: method.into(),
            declaring,
            arguments: arguments.into_iter().collect(),
            ty,
        })
    }

    /// `source.Where(predicate)`
    pub fn where_call(source: impl IntoExpr, predicate: impl IntoExpr) -> Self {
        let source = source.into_expr();
        let ty = source.ty();
        Self::call(
            None,
            "Where",
            DeclaringKind::Queryable,
            [source, Expr::quote(predicate).into_expr()],
            ty,
        )
    }

    /// `field.StartsWith(value)` on a string
    pub fn starts_with(field: impl IntoExpr, value: impl IntoExpr) -> Self {
        Self::call(
            Some(field.into_expr()),
            "StartsWith",
            DeclaringKind::String,
            [value.into_expr()],
            ExprType::Bool,
        )
    }

    /// `field.Contains(value)` on a string
    pub fn string_contains(field: impl IntoExpr, value: impl IntoExpr) -> Self {
        Self::call(
            Some(field.into_expr()),
            "Contains",
            DeclaringKind::String,
            [value.into_expr()],
            ExprType::Bool,
        )
    }

    /// `target.Equals(value)`
    pub fn equals(target: impl IntoExpr, value: impl IntoExpr) -> Self {
        let target = target.into_expr();
        let declaring = match target.ty() {
            ExprType::String => DeclaringKind::String,
            other => DeclaringKind::Other(other.to_string()),
        };
        Self::call(
            Some(target),
            "Equals",
            declaring,
            [value.into_expr()],
            ExprType::Bool,
        )
    }

    /// `Enumerable.Contains(source, item)`
    pub fn enumerable_contains(source: impl IntoExpr, item: impl IntoExpr) -> Self {
        Self::call(
            None,
            "Contains",
            DeclaringKind::Enumerable,
            [source.into_expr(), item.into_expr()],
            ExprType::Bool,
        )
    }

    /// `Enumerable.Any(source, predicate)`
    pub fn any(source: impl IntoExpr, predicate: impl IntoExpr) -> Self {
        Self::enumerable("Any", source, predicate)
    }

    /// `Enumerable.All(source, predicate)`
    pub fn all(source: impl IntoExpr, predicate: impl IntoExpr) -> Self {
        Self::enumerable("All", source, predicate)
    }

    /// `Enumerable.Select(source, projection)`
    pub fn select(source: impl IntoExpr, projection: impl IntoExpr, ty: ExprType) -> Self {
        Self::call(
            None,
            "Select",
            DeclaringKind::Enumerable,
            [source.into_expr(), projection.into_expr()],
            ty,
        )
    }

    /// Any two-argument `Enumerable` operator taking a predicate lambda
    pub fn enumerable(
        method: impl Into<String>,
        source: impl IntoExpr,
        predicate: impl IntoExpr,
    ) -> Self {
        Self::call(
            None,
            method,
            DeclaringKind::Enumerable,
            [source.into_expr(), predicate.into_expr()],
            ExprType::Bool,
        )
    }
}

impl Parameter {
    /// `param.member`
    pub fn member(&self, member: impl Into<String>, ty: ExprType) -> Expr {
        Expr::member(self, member, ty)
    }
}
