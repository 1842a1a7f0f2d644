//! Predicate translator
//!
//! Walks a predicate tree and produces the Query IR. Dispatch is an
//! exhaustive match over node kinds; method calls dispatch on the method
//! name. Every unsupported shape is rejected with a `TranslateError`, no
//! partial query is ever returned.

use serde_json::Value;

use crate::expression::{
    Binary, BinaryOp, Constant, DeclaringKind, Expr, ExprType, Invocation, MethodCall, Unary,
    UnaryOp,
};
use crate::mapper::FieldMapping;
use crate::query::Query;

use super::context::TranslationContext;
use super::errors::{TranslateError, TranslateResult};
use super::quantifier::Quantifier;

/// Translates predicate trees over one entity type.
///
/// Holds no per-call state, so one visitor may translate any number of
/// trees, including concurrently.
pub struct QueryVisitor<'a, M: FieldMapping + ?Sized> {
    pub(super) mapper: &'a M,
    pub(super) entity_type: &'a str,
}

impl<'a, M: FieldMapping + ?Sized> QueryVisitor<'a, M> {
    /// Creates a translator for predicates over `entity_type`
    pub fn new(mapper: &'a M, entity_type: &'a str) -> Self {
        Self {
            mapper,
            entity_type,
        }
    }

    /// Returns the root entity type name
    pub fn entity_type(&self) -> &str {
        self.entity_type
    }

    /// Translates a predicate tree into a query.
    ///
    /// This method is deterministic: same tree + same mapping = same query.
    pub fn translate(&self, expr: &Expr) -> TranslateResult<Query> {
        self.visit(expr, &TranslationContext::new())
    }

    pub(super) fn visit(&self, expr: &Expr, ctx: &TranslationContext) -> TranslateResult<Query> {
        match expr.strip_quotes() {
            Expr::MethodCall(call) => self.visit_method_call(call, ctx),
            Expr::Constant(constant) => visit_constant(constant),
            Expr::Lambda(lambda) => self.visit(&lambda.body, ctx),
            member @ Expr::MemberAccess(_) => self.visit_bool_value(member, ctx),
            Expr::Binary(binary) => self.visit_binary(binary, ctx),
            Expr::Unary(unary) => self.visit_unary(unary, ctx),
            Expr::Invocation(invocation) => self.visit_invocation(invocation, ctx),
            Expr::Parameter(parameter) => Err(TranslateError::MalformedTree(format!(
                "parameter '{}' used as a predicate",
                parameter.name
            ))),
            captured @ Expr::Captured(c) if c.ty.is_bool() => self.visit_bool_value(captured, ctx),
            other @ (Expr::ArrayLiteral(_) | Expr::Captured(_) | Expr::Quote(_)) => Err(
                TranslateError::UnsupportedExpression(other.kind_name().to_string()),
            ),
        }
    }

    // Boolean leaves

    /// A boolean field compares with `true`; a closed boolean is a sentinel
    fn visit_bool_value(&self, expr: &Expr, ctx: &TranslationContext) -> TranslateResult<Query> {
        if !expr.ty().is_bool() {
            return Err(TranslateError::UnsupportedExpression(format!(
                "{} of type {} used as a predicate",
                expr.kind_name(),
                expr.ty()
            )));
        }
        if self.is_field_reference(expr, ctx) {
            return Ok(Query::eq(self.resolve_field(expr, ctx)?, Value::Bool(true)));
        }
        match self.resolve_value(expr, None, ctx)? {
            Value::Bool(true) => Ok(Query::All),
            Value::Bool(false) => Ok(Query::Empty),
            other => Err(TranslateError::MalformedTree(format!(
                "boolean {} evaluated to {}",
                expr.kind_name(),
                other
            ))),
        }
    }

    // Operators

    fn visit_binary(&self, binary: &Binary, ctx: &TranslationContext) -> TranslateResult<Query> {
        match binary.op {
            BinaryOp::AndAlso => Ok(Query::and(
                self.visit(&binary.left, ctx)?,
                self.visit(&binary.right, ctx)?,
            )),
            BinaryOp::OrElse => Ok(Query::or(
                self.visit(&binary.left, ctx)?,
                self.visit(&binary.right, ctx)?,
            )),
            op => self.visit_comparison(op, &binary.left, &binary.right, ctx),
        }
    }

    fn visit_comparison(
        &self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        ctx: &TranslationContext,
    ) -> TranslateResult<Query> {
        // `5 < a.Id` reads as `a.Id > 5`
        if !self.is_field_reference(left, ctx) && self.is_field_reference(right, ctx) {
            return self.visit_comparison(op.mirrored(), right, left, ctx);
        }

        let field = self.resolve_field(left, ctx)?;
        let value = self.resolve_value(right, Some(left), ctx)?;

        match op {
            BinaryOp::Eq => Ok(Query::eq(field, value)),
            BinaryOp::NotEq => Ok(Query::not_eq(field, value)),
            BinaryOp::Gt => Ok(Query::gt(field, value)),
            BinaryOp::Gte => Ok(Query::gte(field, value)),
            BinaryOp::Lt => Ok(Query::lt(field, value)),
            BinaryOp::Lte => Ok(Query::lte(field, value)),
            BinaryOp::AndAlso | BinaryOp::OrElse => Err(TranslateError::MalformedTree(format!(
                "'{}' is not a comparison",
                op.as_str()
            ))),
        }
    }

    fn visit_unary(&self, unary: &Unary, ctx: &TranslationContext) -> TranslateResult<Query> {
        match unary.op {
            UnaryOp::Not => Ok(Query::not(self.visit(&unary.operand, ctx)?)),
            op => Err(TranslateError::UnsupportedExpression(format!(
                "Unary {} used as a predicate",
                op.as_str()
            ))),
        }
    }

    /// An inline lambda invocation translates the lambda body; its
    /// arguments are already captured in the context.
    fn visit_invocation(
        &self,
        invocation: &Invocation,
        ctx: &TranslationContext,
    ) -> TranslateResult<Query> {
        match invocation.lambda.as_lambda() {
            Some(lambda) => self.visit(&lambda.body, ctx),
            None => Err(TranslateError::UnsupportedExpression(format!(
                "Invocation of {}",
                invocation.lambda.kind_name()
            ))),
        }
    }

    // Method calls

    fn visit_method_call(&self, call: &MethodCall, ctx: &TranslationContext) -> TranslateResult<Query> {
        match call.method.as_str() {
            "Where" => {
                let source = argument(call, 0)?;
                let predicate = argument(call, 1)?;
                Ok(Query::and(self.visit(source, ctx)?, self.visit(predicate, ctx)?))
            }
            "StartsWith" => {
                let field = self.resolve_field(receiver(call)?, ctx)?;
                let value = self.resolve_value(argument(call, 0)?, None, ctx)?;
                Ok(Query::starts_with(field, value))
            }
            "Equals" => {
                let target = receiver(call)?;
                let field = self.resolve_field(target, ctx)?;
                let value = self.resolve_value(argument(call, 0)?, Some(target), ctx)?;
                Ok(Query::eq(field, value))
            }
            "Contains" => self.visit_contains(call, ctx),
            "Any" => self.visit_any(call, ctx),
            "All" => self.visit_all(call, ctx),
            _ => self.visit_enumerable(call, ctx),
        }
    }

    fn visit_contains(&self, call: &MethodCall, ctx: &TranslationContext) -> TranslateResult<Query> {
        let (source, item) = match call.declaring {
            // "text".Contains(value)
            DeclaringKind::String => {
                let field = self.resolve_field(receiver(call)?, ctx)?;
                let value = self.resolve_value(argument(call, 0)?, None, ctx)?;
                return Ok(Query::contains(field, value));
            }
            DeclaringKind::Enumerable => (argument(call, 0)?, argument(call, 1)?),
            DeclaringKind::Collection => (receiver(call)?, argument(call, 0)?),
            ref other => {
                return Err(TranslateError::UnsupportedMethod(format!(
                    "{}.Contains",
                    other
                )))
            }
        };

        if self.is_field_reference(source, ctx) {
            // x.Numbers.Contains(value): element equality on an array field
            let field = self.resolve_field(source, ctx)?;
            let value = self.resolve_value(item, None, ctx)?;
            Ok(Query::eq(field, value))
        } else {
            // values.Contains(x.Id): membership
            let values = self.resolve_list(source, ctx)?;
            let field = self.resolve_field(item, ctx)?;
            Ok(Query::in_list(field, values))
        }
    }

    fn visit_any(&self, call: &MethodCall, ctx: &TranslationContext) -> TranslateResult<Query> {
        if call.declaring != DeclaringKind::Enumerable {
            return Err(TranslateError::UnsupportedMethod(format!(
                "{}.Any",
                call.declaring
            )));
        }
        let source = argument(call, 0)?;

        if !self.is_field_reference(source, ctx) {
            return self.visit_enumerable(call, ctx);
        }

        let Some(predicate) = call.arguments.get(1) else {
            return Err(TranslateError::NotSupported(format!(
                "Any() without a predicate over field '{}'",
                self.member_path_of(source, ctx)?
            )));
        };
        let lambda = predicate.as_lambda().ok_or_else(|| {
            TranslateError::MalformedTree(format!(
                "Any predicate must be a lambda, found {}",
                predicate.kind_name()
            ))
        })?;

        // Inner field references resolve beneath the collection field
        let inner = ctx.enter(self.member_path_of(source, ctx)?);
        self.visit(&lambda.body, &inner)
    }

    fn visit_all(&self, call: &MethodCall, ctx: &TranslationContext) -> TranslateResult<Query> {
        if let Some(source) = call.arguments.first() {
            if self.is_field_reference(source, ctx) {
                return Err(TranslateError::NotSupported(format!(
                    "All() over collection field '{}'",
                    self.member_path_of(source, ctx)?
                )));
            }
        }
        self.visit_enumerable(call, ctx)
    }

    /// Generic sequence operator: `list.Any(x => ...)` or `list.All(x => ...)`
    fn visit_enumerable(&self, call: &MethodCall, ctx: &TranslationContext) -> TranslateResult<Query> {
        if call.declaring != DeclaringKind::Enumerable {
            return Err(TranslateError::UnsupportedMethod(format!(
                "{}.{} (only Enumerable methods can be translated)",
                call.declaring, call.method
            )));
        }
        let quantifier = Quantifier::from_method(&call.method)
            .ok_or_else(|| TranslateError::UnsupportedMethod(call.method.clone()))?;

        match call.arguments.as_slice() {
            [source, predicate] => self.expand_quantifier(quantifier, source, predicate, ctx),
            _ => Err(TranslateError::UnsupportedMethod(format!(
                "{} with {} arguments",
                call.method,
                call.arguments.len()
            ))),
        }
    }
}

/// Constants stand for a whole query root or a boolean sentinel
fn visit_constant(constant: &Constant) -> TranslateResult<Query> {
    match (&constant.ty, &constant.value) {
        (ExprType::Queryable(_), _) => Ok(Query::All),
        (ExprType::Bool, Value::Bool(true)) => Ok(Query::All),
        (ExprType::Bool, Value::Bool(false)) => Ok(Query::Empty),
        (ty, value) => Err(TranslateError::UnsupportedExpression(format!(
            "Constant {} of type {} used as a predicate",
            value, ty
        ))),
    }
}

fn receiver(call: &MethodCall) -> TranslateResult<&Expr> {
    call.target.as_deref().ok_or_else(|| {
        TranslateError::MalformedTree(format!("{} requires a receiver", call.method))
    })
}

fn argument(call: &MethodCall, index: usize) -> TranslateResult<&Expr> {
    call.arguments
        .get(index)
        .map(|arg| &**arg)
        .ok_or_else(|| TranslateError::missing_argument(&call.method, index))
}
