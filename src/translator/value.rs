//! Value resolution
//!
//! Evaluates the non-field side of a comparison to a stored literal.

use serde_json::{Number, Value};

use crate::expression::{Expr, ExprType, UnaryOp};
use crate::mapper::FieldMapping;

use super::context::TranslationContext;
use super::errors::{TranslateError, TranslateResult};
use super::visitor::QueryVisitor;

impl<M: FieldMapping + ?Sized> QueryVisitor<'_, M> {
    /// Resolves `expr` to a literal.
    ///
    /// `left` is the field side of the comparison, if any. When it is a cast
    /// over an enum member the literal is serialized through that enum so
    /// enums compare by variant name.
    pub(super) fn resolve_value(
        &self,
        expr: &Expr,
        left: Option<&Expr>,
        ctx: &TranslationContext,
    ) -> TranslateResult<Value> {
        match expr.strip_quotes() {
            Expr::Constant(constant) => Ok(self.convert(&constant.ty, constant.value.clone(), left)),
            Expr::Parameter(parameter) => ctx
                .lookup(parameter.id)
                .cloned()
                .ok_or_else(|| TranslateError::unbound(&parameter.name)),
            Expr::MemberAccess(access) => {
                let target = self.resolve_value(&access.target, None, ctx)?;
                let value = match target {
                    Value::Object(mut document) => {
                        document.remove(&access.member).unwrap_or(Value::Null)
                    }
                    other => {
                        return Err(TranslateError::MalformedTree(format!(
                            "member '{}' read from non-document value {}",
                            access.member, other
                        )))
                    }
                };
                Ok(self.convert(&ExprType::Object, value, left))
            }
            Expr::ArrayLiteral(elements) => elements
                .iter()
                .map(|element| self.resolve_value(element, None, ctx))
                .collect::<TranslateResult<Vec<_>>>()
                .map(Value::Array),
            Expr::Captured(captured) => Ok(self.convert(&captured.ty, captured.evaluate(), left)),
            Expr::Unary(unary) if unary.op == UnaryOp::Convert => {
                self.resolve_value(&unary.operand, left, ctx)
            }
            Expr::Unary(unary) if unary.op == UnaryOp::Negate => {
                negate(self.resolve_value(&unary.operand, None, ctx)?)
            }
            other => Err(TranslateError::UnsupportedExpression(format!(
                "{} cannot be evaluated to a value",
                other.kind_name()
            ))),
        }
    }

    /// Resolves `expr` to a list of literals
    pub(super) fn resolve_list(
        &self,
        expr: &Expr,
        ctx: &TranslationContext,
    ) -> TranslateResult<Vec<Value>> {
        match self.resolve_value(expr, None, ctx)? {
            Value::Array(values) => Ok(values),
            other => Err(TranslateError::MalformedTree(format!(
                "expected a list, {} evaluated to {}",
                expr.kind_name(),
                other
            ))),
        }
    }

    fn convert(&self, ty: &ExprType, value: Value, left: Option<&Expr>) -> Value {
        match left.and_then(Expr::converted_enum) {
            Some(enum_type) => self.mapper.serialize(enum_type, value),
            None => self.mapper.serialize(ty, value),
        }
    }
}

fn negate(value: Value) -> TranslateResult<Value> {
    let negated = match &value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64().and_then(i64::checked_neg) {
                Some(Value::Number(Number::from(i)))
            } else {
                n.as_f64()
                    .and_then(|f| Number::from_f64(-f))
                    .map(Value::Number)
            }
        }
        _ => None,
    };
    negated.ok_or_else(|| {
        TranslateError::UnsupportedExpression(format!("cannot negate {}", value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{EnumType, Parameter};
    use crate::mapper::{BsonMapper, EntityMapping, MemberMapper};
    use serde_json::json;

    fn mapper() -> BsonMapper {
        BsonMapper::new().with_entity(
            EntityMapping::new("Article")
                .member(MemberMapper::id("ArticleNumber", "int"))
                .member(MemberMapper::same_name("Kind", "Kind")),
        )
    }

    #[test]
    fn test_constant_value() {
        let mapper = mapper();
        let visitor = QueryVisitor::new(&mapper, "Article");
        let ctx = TranslationContext::new();
        assert_eq!(visitor.resolve_value(&Expr::int(5), None, &ctx).unwrap(), json!(5));
        assert_eq!(
            visitor.resolve_value(&Expr::string(" x "), None, &ctx).unwrap(),
            json!("x")
        );
    }

    #[test]
    fn test_enum_coercion_through_cast() {
        let mapper = mapper();
        let visitor = QueryVisitor::new(&mapper, "Article");
        let a = Parameter::new("a", ExprType::Entity("Article".into()));
        let kind = ExprType::enumeration(EnumType::new("Kind", [("Food", 0), ("Drink", 1)]));
        let left = Expr::convert(a.member("Kind", kind), ExprType::Int);

        let value = visitor
            .resolve_value(&Expr::int(1), Some(&left), &TranslationContext::new())
            .unwrap();
        assert_eq!(value, json!("Drink"));

        // without the cast the ordinal is kept
        let plain = a.member("ArticleNumber", ExprType::Int);
        let value = visitor
            .resolve_value(&Expr::int(1), Some(&plain), &TranslationContext::new())
            .unwrap();
        assert_eq!(value, json!(1));
    }

    #[test]
    fn test_bound_member_lookup() {
        let mapper = mapper();
        let visitor = QueryVisitor::new(&mapper, "Article");
        let x = Parameter::new("x", ExprType::Entity("Tag".into()));
        let ctx = TranslationContext::new().bind(x.id, json!({"Code": "A"}));

        let code = x.member("Code", ExprType::String);
        assert_eq!(visitor.resolve_value(&code, None, &ctx).unwrap(), json!("A"));

        let missing = x.member("Other", ExprType::String);
        assert_eq!(visitor.resolve_value(&missing, None, &ctx).unwrap(), Value::Null);
    }

    #[test]
    fn test_unbound_parameter_is_malformed() {
        let mapper = mapper();
        let visitor = QueryVisitor::new(&mapper, "Article");
        let x = Parameter::new("x", ExprType::Int);
        let err = visitor
            .resolve_value(&Expr::from(x), None, &TranslationContext::new())
            .unwrap_err();
        assert_eq!(err.code(), "AERO_QUERY_MALFORMED_TREE");
    }

    #[test]
    fn test_array_literal_and_captured() {
        let mapper = mapper();
        let visitor = QueryVisitor::new(&mapper, "Article");
        let ctx = TranslationContext::new();

        let array = Expr::array([Expr::int(1), Expr::int(2)]);
        assert_eq!(visitor.resolve_value(&array, None, &ctx).unwrap(), json!([1, 2]));

        let local = Expr::local("ids", ExprType::collection_of(ExprType::Int), json!([3, 4]));
        assert_eq!(visitor.resolve_list(&local, &ctx).unwrap(), vec![json!(3), json!(4)]);

        let captured_member = Expr::member(
            Expr::local("filter", ExprType::Object, json!({"Min": 10})),
            "Min",
            ExprType::Int,
        );
        assert_eq!(
            visitor.resolve_value(&captured_member, None, &ctx).unwrap(),
            json!(10)
        );
    }

    #[test]
    fn test_negate() {
        let mapper = mapper();
        let visitor = QueryVisitor::new(&mapper, "Article");
        let ctx = TranslationContext::new();
        assert_eq!(
            visitor.resolve_value(&Expr::negate(Expr::int(4)), None, &ctx).unwrap(),
            json!(-4)
        );
        assert_eq!(
            visitor.resolve_value(&Expr::negate(Expr::double(1.5)), None, &ctx).unwrap(),
            json!(-1.5)
        );
        assert!(visitor
            .resolve_value(&Expr::negate(Expr::string("a")), None, &ctx)
            .is_err());
    }

    #[test]
    fn test_list_expected() {
        let mapper = mapper();
        let visitor = QueryVisitor::new(&mapper, "Article");
        let err = visitor
            .resolve_list(&Expr::int(1), &TranslationContext::new())
            .unwrap_err();
        assert!(matches!(err, TranslateError::MalformedTree(_)));
    }

    #[test]
    fn test_comparison_node_is_not_a_value() {
        let mapper = mapper();
        let visitor = QueryVisitor::new(&mapper, "Article");
        let err = visitor
            .resolve_value(&Expr::eq(Expr::int(1), Expr::int(1)), None, &TranslationContext::new())
            .unwrap_err();
        assert!(matches!(err, TranslateError::UnsupportedExpression(_)));
    }
}
