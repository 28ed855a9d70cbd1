//! JSON Pointer implementation (RFC 6901).
//!
//! Used for naming locations inside a description document in diagnostics and
//! for following local `$ref` fragments (`#/components/parameters/Limit`).
//! Segments are `/`-separated, with `~` escaped as `~0` and `/` escaped as `~1`.

use serde_json::Value;

/// Appends a segment to a JSON Pointer path, applying RFC 6901 escaping.
///
/// Escaping rules: `~` -> `~0`, `/` -> `~1`
pub fn push_segment(path: &mut String, segment: &str) {
    path.push('/');
    for c in segment.chars() {
        match c {
            '~' => path.push_str("~0"),
            '/' => path.push_str("~1"),
            other => path.push(other),
        }
    }
}

/// Returns a new JSON Pointer path by appending a segment to the given path.
#[must_use]
pub fn format(path: &str, segment: &str) -> String {
    let mut result: String = path.to_string();
    push_segment(&mut result, segment);
    result
}

/// Reverses [`push_segment`] escaping for a single segment.
fn decode_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// Follows a local reference (`#/a/b`) from `root`.
///
/// Returns `None` for non-local references or when any segment is missing.
/// Array elements are addressed by decimal index.
pub fn resolve<'a>(root: &'a Value, reference: &str) -> Option<&'a Value> {
    let pointer: &str = reference.strip_prefix('#')?;
    if pointer.is_empty() {
        return Some(root);
    }
    let pointer: &str = pointer.strip_prefix('/')?;
    pointer.split('/').try_fold(root, |current, raw| {
        let segment: String = decode_segment(raw);
        match current {
            Value::Object(map) => map.get(&segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    })
}
