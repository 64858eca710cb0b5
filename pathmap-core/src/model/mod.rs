pub mod ids;
pub mod mapping;
pub mod relation;

pub use ids::{EntityMappingId, EntityRef};
pub use mapping::{
    default_entity_filter, ColumnMapping, CoreMetadataMapping, DataType, EntityMapping,
    EntityRelationConfig, FunctionalMapping, MappingConfig, Script, Statement, Transformer,
    TransformerKind, SET_DST_VALUE,
};
pub use relation::{PathPointer, Relation, RelationColumn, RelationType};
