pub mod normalizer;

pub use normalizer::{to_backend, to_ui, EntityMappingMetaData, MappingMetaData};
