pub mod config;
pub mod content;
pub mod errors;
pub mod model;
pub mod paths;
pub mod relations;
pub mod services;

pub use config::EngineConfig;
pub use model::{
    DataType, EntityMapping, EntityMappingId, EntityRef, MappingConfig, PathPointer, Relation,
    RelationColumn, RelationType,
};
