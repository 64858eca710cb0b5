//! Domain-specific error types for pathmap
//!
//! The resolution engine itself never fails: malformed paths, dangling parent
//! references and failed document searches all degrade to best-effort results.
//! Errors only surface at the edges, when configuration documents are decoded
//! or sample content is parsed.
//!
//! # Error Categories
//!
//! - **MappingError**: mapping configuration decoding, encoding and lookups
//! - **ContentError**: sample content adaptation (JSON, CSV, XML)
//!
//! # Examples
//!
//! ```rust
//! use pathmap::errors::{ContentError, MappingError};
//!
//! let err = MappingError::EntityNotFound("42".to_string());
//! assert!(err.is_client_error());
//!
//! let err = ContentError::UnsupportedDataType("BINARY_DOC".to_string());
//! assert_eq!(err.error_code(), "UNSUPPORTED_DATA_TYPE");
//! ```

pub mod content;
pub mod mapping;

pub use content::ContentError;
pub use mapping::MappingError;

/// Result type alias for mapping configuration operations
pub type MappingResult<T> = Result<T, MappingError>;

/// Result type alias for content adaptation
pub type ContentResult<T> = Result<T, ContentError>;
