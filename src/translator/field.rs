//! Field path resolution
//!
//! Turns a member chain such as `a.Supplier.Name` into the dotted storage
//! path of the field, walking the entity mapping one segment at a time.

use crate::expression::Expr;
use crate::mapper::{FieldMapping, DB_REF_ID_FIELD, ID_FIELD};

use super::context::TranslationContext;
use super::errors::{TranslateError, TranslateResult};
use super::visitor::QueryVisitor;

impl<M: FieldMapping + ?Sized> QueryVisitor<'_, M> {
    /// True when `expr` names a field of the document being filtered, i.e.
    /// a member chain rooted at a parameter with no active binding.
    pub(super) fn is_field_reference(&self, expr: &Expr, ctx: &TranslationContext) -> bool {
        expr.member_path()
            .map_or(false, |path| !ctx.is_bound(path.root.id))
    }

    /// Dotted member path of a field reference, without the active prefixes
    pub(super) fn member_path_of(
        &self,
        expr: &Expr,
        ctx: &TranslationContext,
    ) -> TranslateResult<String> {
        match expr.member_path() {
            Some(path) if !ctx.is_bound(path.root.id) => Ok(path.dotted()),
            _ => Err(TranslateError::UnsupportedExpression(format!(
                "{} is not a document field",
                expr.kind_name()
            ))),
        }
    }

    /// Resolves a field reference to its storage path
    pub(super) fn resolve_field(
        &self,
        expr: &Expr,
        ctx: &TranslationContext,
    ) -> TranslateResult<String> {
        let property = ctx.prefixed(&self.member_path_of(expr, ctx)?);
        if property.is_empty() {
            return Err(TranslateError::UnsupportedExpression(
                "a bare parameter is not a document field".into(),
            ));
        }
        self.resolve_path(&property)
    }

    /// Walks `first.second.last` through the mappings starting at the root type
    pub(super) fn resolve_path(&self, property: &str) -> TranslateResult<String> {
        let mut type_name: &str = self.entity_type;
        let mut after_db_ref = false;
        let mut fields = Vec::new();

        for part in property.split('.') {
            let member = self
                .mapper
                .get_mapping(type_name)
                .and_then(|mapping| mapping.find(part))
                .ok_or_else(|| TranslateError::PropertyNotMapped(property.to_string()))?;

            // `_id` behind a reference names the referenced document
            if member.field_name == ID_FIELD && after_db_ref {
                fields.push(DB_REF_ID_FIELD);
            } else {
                fields.push(member.field_name.as_str());
            }

            after_db_ref = member.is_db_ref;
            type_name = &member.underlying_type;
        }

        Ok(fields.join("."))
    }
}
