//! Conversion between abstract entity paths (`root:/orders/*/lines`) and the
//! concrete access paths used to walk a sample document.
//!
//! Conversions never fail. Unexpected input is normalized on a best-effort
//! basis: wildcards become index `0`, empty segments disappear and trailing
//! dots are dropped.

pub const ROOT_PREFIX: &str = "root:/";
pub const WILDCARD: char = '*';
const FIRST_INDEX: &str = "0";

/// Segment list for generic tree lookups.
///
/// `root:///some//path/*/to//transform//` becomes
/// `["some", "path", "0", "to", "transform"]`.
pub fn to_access_path(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    for raw in strip_root(path).split('/') {
        push_segment(&mut segments, raw);
    }
    segments
}

/// Dotted form for expression-style evaluation: `some.path[0].to.transform`.
///
/// Already-normalized expressions are returned unchanged.
pub fn to_access_expr(path: &str) -> String {
    let mut expr = String::new();
    for segment in to_access_path(path) {
        if is_index(&segment) {
            expr.push('[');
            expr.push_str(&segment);
            expr.push(']');
        } else {
            if !expr.is_empty() {
                expr.push('.');
            }
            expr.push_str(&segment);
        }
    }
    expr
}

pub fn strip_root(path: &str) -> &str {
    path.strip_prefix(ROOT_PREFIX).unwrap_or(path)
}

pub fn is_index(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

pub fn count_wildcards(path: &str) -> usize {
    path.chars().filter(|c| *c == WILDCARD).count()
}

/// Substitutes every wildcard with `index`.
pub fn replace_wildcards(path: &str, index: &str) -> String {
    path.replace(WILDCARD, index)
}

/// Naive pointer for a wildcarded path: every `*` picks the first element.
pub fn first_element_pointer(path: &str) -> String {
    replace_wildcards(path, FIRST_INDEX)
}

/// Inverse of wildcard substitution: segments of `pointer` sitting where
/// `pattern` has a bare `*` become `*` again. Pointers whose shape does not
/// follow the pattern generalize to the pattern itself.
pub fn generalize_indices(pointer: &str, pattern: &str) -> String {
    let pointer_segments: Vec<&str> = pointer.split('/').collect();
    let pattern_segments: Vec<&str> = pattern.split('/').collect();
    if pointer_segments.len() != pattern_segments.len() {
        return pattern.to_string();
    }
    pointer_segments
        .iter()
        .zip(&pattern_segments)
        .map(|(concrete, wanted)| {
            if *wanted == "*" {
                WILDCARD.to_string()
            } else {
                concrete.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Fills the wildcards of `pattern` in order with `choices`. Wildcards
/// without a choice select the first element.
pub fn substitute_wildcards<S: AsRef<str>>(pattern: &str, choices: &[S]) -> String {
    let mut choices = choices.iter();
    let mut pointer = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if c == WILDCARD {
            pointer.push_str(choices.next().map(|s| s.as_ref()).unwrap_or(FIRST_INDEX));
        } else {
            pointer.push(c);
        }
    }
    pointer
}

/// Joins an entity root path and a relative path with a single `/`.
pub fn join(base: &str, relative: &str) -> String {
    match (base.is_empty(), relative.is_empty()) {
        (true, _) => relative.to_string(),
        (_, true) => base.to_string(),
        _ => format!("{}/{}", base, relative),
    }
}

fn push_segment(segments: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim_end_matches('.');
    if trimmed.is_empty() {
        return;
    }

    // "items*" and "**" both end in wildcards: each one selects element 0 of
    // its own array level.
    let name = trimmed.trim_end_matches(WILDCARD);
    let trailing = trimmed.len() - name.len();
    if !name.is_empty() {
        segments.push(first_element_pointer(name));
    }
    for _ in 0..trailing {
        segments.push(FIRST_INDEX.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn access_expr_from_abstract_path() {
        assert_eq!(
            to_access_expr("root:/some/path/*/to/transform/"),
            "some.path[0].to.transform"
        );
    }

    #[test]
    fn access_path_collapses_redundant_separators() {
        assert_eq!(
            to_access_path("root:///some//path/*/to//transform//"),
            vec!["some", "path", "0", "to", "transform"]
        );
    }

    #[test]
    fn empty_and_root_paths_are_empty() {
        assert!(to_access_path("").is_empty());
        assert!(to_access_path("root:/").is_empty());
        assert_eq!(to_access_expr("root:/"), "");
    }

    #[test]
    fn consecutive_wildcards_each_select_first_element() {
        assert_eq!(to_access_path("a/*/*/b"), vec!["a", "0", "0", "b"]);
        assert_eq!(to_access_path("a/**"), vec!["a", "0", "0"]);
        assert_eq!(to_access_path("items*"), vec!["items", "0"]);
        assert_eq!(to_access_expr("matrix/**/v"), "matrix[0][0].v");
    }

    #[test]
    fn trailing_dots_are_dropped() {
        assert_eq!(to_access_path("a./b../."), vec!["a", "b"]);
        assert_eq!(to_access_expr("a./b."), "a.b");
    }

    #[test]
    fn leading_index_renders_as_bracket() {
        assert_eq!(to_access_expr("0/name"), "[0].name");
        assert_eq!(to_access_expr("[0].name"), "[0].name");
    }

    #[test]
    fn wildcard_helpers() {
        assert_eq!(count_wildcards("x/*/*/y"), 2);
        assert_eq!(first_element_pointer("a/*/b/*"), "a/0/b/0");
        assert_eq!(generalize_indices("a/3/b/0", "a/*/b/*"), "a/*/b/*");
        assert_eq!(generalize_indices("0/1", "0/*"), "0/*");
        assert_eq!(generalize_indices("a/3", "a/*/b"), "a/*/b");
        assert_eq!(substitute_wildcards("a/*/b/*", &["2", "5"]), "a/2/b/5");
        assert_eq!(substitute_wildcards("a/*/b/*", &["2"]), "a/2/b/0");
    }

    #[test]
    fn join_skips_empty_sides() {
        assert_eq!(join("root:/a", "b"), "root:/a/b");
        assert_eq!(join("", "b"), "b");
        assert_eq!(join("root:/a", ""), "root:/a");
    }

    proptest! {
        #[test]
        fn access_expr_is_idempotent(path in "(root:/)?[ab0-9*./]{0,24}") {
            let once = to_access_expr(&path);
            let twice = to_access_expr(&once);
            prop_assert_eq!(once, twice);
        }
    }
}
