use csv::ReaderBuilder;
use serde_json::{Map, Value};

use crate::errors::ContentResult;

pub(super) fn parse(raw: &str, delimiter: u8, has_headers: bool) -> ContentResult<Value> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(has_headers)
        .flexible(true)
        .from_reader(raw.as_bytes());

    let headers: Vec<String> = if has_headers {
        reader.headers()?.iter().map(|h| h.trim().to_string()).collect()
    } else {
        Vec::new()
    };

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        let fields: Map<String, Value> = record
            .iter()
            .enumerate()
            .map(|(index, field)| {
                let key = headers
                    .get(index)
                    .filter(|name| !name.is_empty())
                    .cloned()
                    .unwrap_or_else(|| index.to_string());
                (key, Value::String(field.to_string()))
            })
            .collect();
        records.push(Value::Object(fields));
    }

    Ok(Value::Array(records))
}
