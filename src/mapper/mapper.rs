//! Field mapping lookup and literal serialization

use std::collections::HashMap;

use serde_json::Value;

use crate::expression::ExprType;

use super::config::MapperConfig;
use super::entity::EntityMapping;

/// Structural lookup consumed by the translator (read-only)
pub trait FieldMapping {
    /// Returns the member mappings of a type, `None` for unmapped types
    fn get_mapping(&self, type_name: &str) -> Option<&EntityMapping>;

    /// Converts a host literal of the given static type into a stored value
    fn serialize(&self, ty: &ExprType, value: Value) -> Value;
}

/// Registry of entity mappings
#[derive(Debug, Clone, Default)]
pub struct BsonMapper {
    entities: HashMap<String, EntityMapping>,
    config: MapperConfig,
}

impl BsonMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MapperConfig) -> Self {
        Self {
            entities: HashMap::new(),
            config,
        }
    }

    /// Registers or replaces the mapping of an entity type
    pub fn register(&mut self, mapping: EntityMapping) {
        self.entities.insert(mapping.type_name.clone(), mapping);
    }

    /// Builder form of `register`
    pub fn with_entity(mut self, mapping: EntityMapping) -> Self {
        self.register(mapping);
        self
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Replaces the serialization settings, keeping registered mappings
    pub fn set_config(&mut self, config: MapperConfig) {
        self.config = config;
    }

    fn serialize_string(&self, s: String) -> Value {
        let s = if self.config.trim_whitespace {
            s.trim().to_string()
        } else {
            s
        };
        if self.config.empty_string_to_null && s.is_empty() {
            Value::Null
        } else {
            Value::String(s)
        }
    }

    fn serialize_enum(&self, ty: &ExprType, value: Value) -> Value {
        let Some(enum_type) = ty.as_enum() else {
            return value;
        };
        match value {
            Value::Number(n) if !self.config.enum_as_integer => {
                match n.as_i64().and_then(|ordinal| enum_type.name_of(ordinal)) {
                    Some(name) => Value::String(name.to_string()),
                    None => Value::Number(n),
                }
            }
            Value::String(s) if self.config.enum_as_integer => match enum_type.ordinal_of(&s) {
                Some(ordinal) => Value::from(ordinal),
                None => Value::String(s),
            },
            other => other,
        }
    }
}

impl FieldMapping for BsonMapper {
    fn get_mapping(&self, type_name: &str) -> Option<&EntityMapping> {
        self.entities.get(type_name)
    }

    fn serialize(&self, ty: &ExprType, value: Value) -> Value {
        match ty {
            ExprType::Enum(_) => self.serialize_enum(ty, value),
            _ => match value {
                Value::String(s) => self.serialize_string(s),
                Value::Array(items) => {
                    let element = match ty {
                        ExprType::Collection(inner) => inner.as_ref().clone(),
                        _ => ExprType::Object,
                    };
                    Value::Array(
                        items
                            .into_iter()
                            .map(|item| self.serialize(&element, item))
                            .collect(),
                    )
                }
                other => other,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::EnumType;
    use crate::mapper::MemberMapper;
    use serde_json::json;

    fn kind() -> ExprType {
        ExprType::enumeration(EnumType::new("Kind", [("Food", 0), ("Drink", 1)]))
    }

    #[test]
    fn test_registered_mapping() {
        let mapper = BsonMapper::new().with_entity(
            EntityMapping::new("Article").member(MemberMapper::id("ArticleNumber", "int")),
        );
        assert!(mapper.get_mapping("Article").is_some());
        assert!(mapper.get_mapping("Supplier").is_none());
    }

    #[test]
    fn test_set_config_keeps_mappings() {
        let mut mapper = BsonMapper::new().with_entity(EntityMapping::new("Article"));
        mapper.set_config(MapperConfig::verbatim_strings());

        assert!(mapper.get_mapping("Article").is_some());
        assert_eq!(mapper.serialize(&ExprType::String, json!(" a ")), json!(" a "));
    }

    #[test]
    fn test_string_trim_and_empty_to_null() {
        let mapper = BsonMapper::new();
        assert_eq!(mapper.serialize(&ExprType::String, json!("  Test ")), json!("Test"));
        assert_eq!(mapper.serialize(&ExprType::String, json!("   ")), Value::Null);

        let verbatim = BsonMapper::with_config(MapperConfig::verbatim_strings());
        assert_eq!(verbatim.serialize(&ExprType::String, json!(" a ")), json!(" a "));
        assert_eq!(verbatim.serialize(&ExprType::String, json!("")), json!(""));
    }

    #[test]
    fn test_enum_by_name() {
        let mapper = BsonMapper::new();
        assert_eq!(mapper.serialize(&kind(), json!(1)), json!("Drink"));
        // unknown ordinal stays numeric
        assert_eq!(mapper.serialize(&kind(), json!(9)), json!(9));
    }

    #[test]
    fn test_enum_as_integer() {
        let mapper = BsonMapper::with_config(MapperConfig {
            enum_as_integer: true,
            ..Default::default()
        });
        assert_eq!(mapper.serialize(&kind(), json!(1)), json!(1));
        assert_eq!(mapper.serialize(&kind(), json!("Food")), json!(0));
    }

    #[test]
    fn test_collection_elements() {
        let mapper = BsonMapper::new();
        let ty = ExprType::collection_of(kind());
        assert_eq!(mapper.serialize(&ty, json!([0, 1])), json!(["Food", "Drink"]));
        assert_eq!(
            mapper.serialize(&ExprType::Object, json!([" a", 2])),
            json!(["a", 2])
        );
    }
}
