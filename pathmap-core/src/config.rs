/// Tunables for the resolution engine and the sample content adapters. Defaults
/// suit single sample documents edited interactively.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound of concrete pointers enumerated for one relation during a
    /// polymorphic search. Hitting it counts as a failed search.
    pub max_search_matches: usize,
    /// Field delimiter used when decoding CSV sample content.
    pub csv_delimiter: u8,
    /// Whether the first CSV record is a header row. Records are keyed by
    /// column index otherwise.
    pub csv_has_headers: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_search_matches: 10_000,
            csv_delimiter: b',',
            csv_has_headers: false,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_search_matches: std::env::var("PATHMAP_MAX_SEARCH_MATCHES")
                .ok()
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(defaults.max_search_matches),
            csv_delimiter: std::env::var("PATHMAP_CSV_DELIMITER")
                .ok()
                .and_then(|value| parse_delimiter(&value))
                .unwrap_or(defaults.csv_delimiter),
            csv_has_headers: std::env::var("PATHMAP_CSV_HAS_HEADERS")
                .ok()
                .map(|value| is_truthy(&value))
                .unwrap_or(defaults.csv_has_headers),
        }
    }
}

fn parse_delimiter(value: &str) -> Option<u8> {
    match value {
        "\\t" | "tab" => Some(b'\t'),
        other => {
            let bytes = other.as_bytes();
            (bytes.len() == 1).then(|| bytes[0])
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
