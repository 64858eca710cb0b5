//! Sample content adaptation error types

use thiserror::Error;

/// Errors raised while turning raw sample content into a document tree
#[derive(Error, Debug)]
pub enum ContentError {
    /// The data type has no content adapter
    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),

    /// JSON decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV decoding failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// XML decoding failed
    #[error("XML error: {0}")]
    Xml(String),

    /// The content decoded but is structurally unusable
    #[error("Invalid content: {0}")]
    InvalidContent(String),
}

impl ContentError {
    /// Check if this error was caused by the supplied content
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ContentError::UnsupportedDataType(_))
    }

    /// Get error code for reports
    pub fn error_code(&self) -> &'static str {
        match self {
            ContentError::UnsupportedDataType(_) => "UNSUPPORTED_DATA_TYPE",
            ContentError::Json(_) => "JSON_ERROR",
            ContentError::Csv(_) => "CSV_ERROR",
            ContentError::Xml(_) => "XML_ERROR",
            ContentError::InvalidContent(_) => "INVALID_CONTENT",
        }
    }
}

impl From<quick_xml::Error> for ContentError {
    fn from(err: quick_xml::Error) -> Self {
        ContentError::Xml(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_data_type() {
        let err = ContentError::UnsupportedDataType("BINARY_DOC".to_string());
        assert_eq!(err.to_string(), "Unsupported data type: BINARY_DOC");
        assert!(!err.is_client_error());
        assert_eq!(err.error_code(), "UNSUPPORTED_DATA_TYPE");
    }

    #[test]
    fn test_xml_error() {
        let err = ContentError::Xml("unexpected end".to_string());
        assert!(err.is_client_error());
        assert_eq!(err.error_code(), "XML_ERROR");
    }
}
