//! Per-entity memory of resolved `(source, destination) -> pointer` choices.
//!
//! Naive resolution always picks element `0` of every array. Once a concrete
//! element was chosen for a pair (by the polymorphic resolver or restored
//! from persisted metadata) the stored pointer wins over recomputation.

use tracing::debug;

use crate::model::PathPointer;
use crate::paths::notation::first_element_pointer;

/// Pointer for `(src, dst)`, creating the cache entry on first request.
pub fn resolve(cache: &mut Vec<PathPointer>, src: &str, dst: &str) -> String {
    if let Some(entry) = cache.iter_mut().find(|entry| entry.is_for(src, dst)) {
        if entry.json_path.is_empty() {
            entry.json_path = first_element_pointer(src);
        }
        return entry.json_path.clone();
    }

    let entry = PathPointer::new(first_element_pointer(src), src, dst);
    debug!("Caching pointer {} for {} -> {}", entry.json_path, src, dst);
    let pointer = entry.json_path.clone();
    cache.push(entry);
    pointer
}

/// Stored pointer for `(src, dst)` without populating the cache.
pub fn cached<'a>(cache: &'a [PathPointer], src: &str, dst: &str) -> Option<&'a str> {
    cache
        .iter()
        .find(|entry| entry.is_for(src, dst))
        .map(|entry| entry.json_path.as_str())
        .filter(|pointer| !pointer.is_empty())
}
