//! Structural mapping of entity members to stored fields

/// Storage name of the document identifier
pub const ID_FIELD: &str = "_id";

/// Identifier token used inside a cross-document reference
pub const DB_REF_ID_FIELD: &str = "$id";

/// Mapping of one entity member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberMapper {
    /// Member name as written in predicates
    pub member_name: String,
    /// Field name in the stored document
    pub field_name: String,
    /// Member type name; the element type when the member is a collection
    pub underlying_type: String,
    /// Member stores another document's identifier
    pub is_db_ref: bool,
}

impl MemberMapper {
    pub fn new(
        member_name: impl Into<String>,
        field_name: impl Into<String>,
        underlying_type: impl Into<String>,
    ) -> Self {
        Self {
            member_name: member_name.into(),
            field_name: field_name.into(),
            underlying_type: underlying_type.into(),
            is_db_ref: false,
        }
    }

    /// A member stored under its own name
    pub fn same_name(member_name: impl Into<String>, underlying_type: impl Into<String>) -> Self {
        let member_name = member_name.into();
        Self::new(member_name.clone(), member_name, underlying_type)
    }

    /// The identifier member, stored as `_id`
    pub fn id(member_name: impl Into<String>, underlying_type: impl Into<String>) -> Self {
        Self::new(member_name, ID_FIELD, underlying_type)
    }

    /// Marks this member as a cross-document reference
    pub fn db_ref(mut self) -> Self {
        self.is_db_ref = true;
        self
    }
}

/// Ordered member mappings of one entity type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMapping {
    pub type_name: String,
    members: Vec<MemberMapper>,
}

impl EntityMapping {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            members: Vec::new(),
        }
    }

    /// Adds a member mapping
    pub fn member(mut self, member: MemberMapper) -> Self {
        self.members.push(member);
        self
    }

    /// Finds a member by its predicate-side name
    pub fn find(&self, member_name: &str) -> Option<&MemberMapper> {
        self.members.iter().find(|m| m.member_name == member_name)
    }

    pub fn members(&self) -> &[MemberMapper] {
        &self.members
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_mapping_lookup() {
        let mapping = EntityMapping::new("Article")
            .member(MemberMapper::id("ArticleNumber", "int"))
            .member(MemberMapper::new("Supplier", "sup", "Supplier"))
            .member(MemberMapper::new("Owner", "owner", "User").db_ref());

        assert_eq!(mapping.find("ArticleNumber").unwrap().field_name, "_id");
        assert_eq!(mapping.find("Supplier").unwrap().underlying_type, "Supplier");
        assert!(mapping.find("Owner").unwrap().is_db_ref);
        assert!(mapping.find("sup").is_none());
        assert_eq!(mapping.members().len(), 3);
    }

    #[test]
    fn test_same_name() {
        let member = MemberMapper::same_name("Category", "string");
        assert_eq!(member.member_name, member.field_name);
        assert!(!member.is_db_ref);
    }
}
