//! Turns raw sample content into the document tree the engine walks.
//!
//! The engine only sees `serde_json::Value`; every supported data type is
//! adapted into that shape here:
//!
//! - JSON is decoded as is.
//! - CSV becomes an array of records, each an object keyed by column index
//!   (`"0"`, `"1"`, ...) or by header name.
//! - XML becomes nested objects, see [`xml_content`].

mod csv_content;
pub mod xml_content;

use serde_json::Value;
use tracing::debug;

use crate::config::EngineConfig;
use crate::errors::{ContentError, ContentResult};
use crate::model::{DataType, MappingConfig};

pub trait ContentParser {
    fn parse(&self, data_type: DataType, raw: &str) -> ContentResult<Value>;

    /// Parses the sample embedded in a mapping configuration.
    fn parse_sample(&self, config: &MappingConfig) -> ContentResult<Value> {
        self.parse(config.data_type, &config.sample_content)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DefaultContentParser {
    config: EngineConfig,
}

impl DefaultContentParser {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

impl ContentParser for DefaultContentParser {
    fn parse(&self, data_type: DataType, raw: &str) -> ContentResult<Value> {
        debug!("Parsing {} bytes of {} content", raw.len(), data_type.as_str());
        match data_type {
            DataType::Json => Ok(serde_json::from_str(raw)?),
            DataType::Csv => csv_content::parse(
                raw,
                self.config.csv_delimiter,
                self.config.csv_has_headers,
            ),
            DataType::Xml => xml_content::parse(raw),
            DataType::BinaryDoc => Err(ContentError::UnsupportedDataType(
                data_type.as_str().to_string(),
            )),
        }
    }
}
