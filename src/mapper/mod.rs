//! Field mapping subsystem
//!
//! Resolves predicate member names to stored field names and nested types,
//! and serializes host literals into stored values. The translator only
//! sees the `FieldMapping` trait; `BsonMapper` is the in-process registry.

mod config;
mod entity;
mod mapper;

pub use config::MapperConfig;
pub use entity::{EntityMapping, MemberMapper, DB_REF_ID_FIELD, ID_FIELD};
pub use mapper::{BsonMapper, FieldMapping};
