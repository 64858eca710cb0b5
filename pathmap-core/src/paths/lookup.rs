use serde_json::Value;

use super::notation::to_access_path;

/// Walks `doc` along `segments`: objects by key, arrays by numeric index.
pub fn lookup<'a, S: AsRef<str>>(doc: &'a Value, segments: &[S]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(doc, |current, segment| step(current, segment.as_ref()))
}

/// Lookup by abstract path, wildcards selecting the first element.
pub fn lookup_path<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    lookup(doc, &to_access_path(path))
}

/// CSV samples are a list of records; pointers address fields of the first one.
pub fn lookup_csv_record<'a>(doc: &'a Value, pointer: &str) -> Option<&'a Value> {
    let record = match doc {
        Value::Array(records) => records.first()?,
        other => other,
    };
    lookup_path(record, pointer)
}

pub(crate) fn step<'a>(current: &'a Value, segment: &str) -> Option<&'a Value> {
    match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}
