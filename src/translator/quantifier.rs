//! Quantifier expansion over literal lists
//!
//! `list.Any(x => body)` becomes one sub-query per element with `x` bound
//! to that element, reduced with `Or`. `All` reduces with `And`.

use crate::expression::{Expr, ParameterId};
use crate::mapper::FieldMapping;
use crate::query::Query;

use super::context::TranslationContext;
use super::errors::{TranslateError, TranslateResult};
use super::visitor::QueryVisitor;

/// Quantifier over the elements of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    Any,
    All,
}

impl Quantifier {
    /// Maps a sequence operator name to its quantifier
    pub fn from_method(method: &str) -> Option<Self> {
        match method {
            "Any" => Some(Quantifier::Any),
            "All" => Some(Quantifier::All),
            _ => None,
        }
    }

    /// Left-folds per-element queries.
    ///
    /// One element is returned unwrapped. With no elements `Any` matches
    /// nothing and `All` holds vacuously.
    pub fn reduce(self, queries: Vec<Query>) -> Query {
        let mut queries = queries.into_iter();
        let Some(first) = queries.next() else {
            return match self {
                Quantifier::Any => Query::Empty,
                Quantifier::All => Query::All,
            };
        };
        queries.fold(first, |acc, next| match self {
            Quantifier::Any => Query::or(acc, next),
            Quantifier::All => Query::and(acc, next),
        })
    }
}

impl<M: FieldMapping + ?Sized> QueryVisitor<'_, M> {
    /// Expands `source.<quantifier>(predicate)` where `source` is a literal list
    pub(super) fn expand_quantifier(
        &self,
        quantifier: Quantifier,
        source: &Expr,
        predicate: &Expr,
        ctx: &TranslationContext,
    ) -> TranslateResult<Query> {
        let lambda = predicate.as_lambda().ok_or_else(|| {
            TranslateError::MalformedTree(format!(
                "quantifier predicate must be a lambda, found {}",
                predicate.kind_name()
            ))
        })?;
        let parameter: ParameterId = match lambda.parameters.as_slice() {
            [parameter] => parameter.id,
            other => {
                return Err(TranslateError::MalformedTree(format!(
                    "quantifier lambda must take one parameter, found {}",
                    other.len()
                )))
            }
        };

        let values = self.resolve_list(source, ctx)?;
        let queries = values
            .into_iter()
            .map(|value| self.visit(&lambda.body, &ctx.bind(parameter, value)))
            .collect::<TranslateResult<Vec<_>>>()?;

        Ok(quantifier.reduce(queries))
    }
}
