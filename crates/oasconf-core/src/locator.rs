//! # Source Locator
//!
//! Maps a JSON-Pointer instance path reported by the validator back into
//! the raw document text: [`locate_line`] finds the 1-based line number of
//! the referenced node, and [`resolve_value`] extracts the value at the
//! path from a structural parse.
//!
//! The line locator is deliberately a heuristic text scan, not a YAML
//! source map. It walks a cursor forward through the lines, one pointer
//! segment at a time, and can mis-locate keys that appear as substrings of
//! unrelated lines in pathological documents. That imprecision is accepted:
//! the line number is a usability aid for the regression report, never a
//! correctness input. Both operations are pure functions so they can be
//! property-tested without network or validator concerns.

use serde_json::Value;
use thiserror::Error;

use crate::yaml;

/// Why a value could not be resolved for an instance path.
///
/// These faults are never fatal to a run; callers record them per-error as
/// `has_instance_value = false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocateError {
    /// The path refers to the document root; the harness declines to show
    /// whole-document values.
    #[error("content too large")]
    ContentTooLarge,

    /// The document text does not parse as YAML/JSON.
    #[error("document does not parse: {0}")]
    InvalidDocument(String),

    /// A member or index access along the path found nothing.
    #[error("no value at path segment '{segment}'")]
    PathNotFound {
        /// The (unescaped) segment that could not be resolved.
        segment: String,
    },
}

/// Unescape one JSON-Pointer segment: `~1` → `/`, then `~0` → `~`.
pub fn unescape_pointer(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// Locate the 1-based line number of `path` within `text`.
///
/// Segments that parse as a non-negative integer are treated as sequence
/// indices once the cursor has moved off the first line: the scan counts
/// same-prefix dash markers forward from the line after the cursor. All
/// other segments scan forward for a `key:` line (the key optionally
/// double-quoted). Out-of-range indices and unmatched keys stop at the last
/// line instead of failing; an empty path yields line 1.
pub fn locate_line(text: &str, path: &str) -> usize {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut cursor = 0usize;
    for raw in path.split('/').skip(1) {
        let segment = unescape_pointer(raw);
        cursor = match segment.parse::<usize>() {
            Ok(index) if cursor > 0 => find_sequence_item(&lines, cursor, &segment, index),
            _ => find_key(&lines, cursor, &segment),
        };
    }
    cursor + 1
}

/// Resolve the value at `path` by structurally parsing `text`.
///
/// The empty path is refused with [`LocateError::ContentTooLarge`] — the
/// root value is the whole document. Otherwise the (unescaped) segments are
/// walked via member and index access over the parsed value.
pub fn resolve_value(text: &str, path: &str) -> Result<Value, LocateError> {
    if path.is_empty() {
        return Err(LocateError::ContentTooLarge);
    }
    let parsed: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|e| LocateError::InvalidDocument(e.to_string()))?;
    let root = yaml::to_json_value(&parsed).map_err(LocateError::InvalidDocument)?;

    let mut current = &root;
    for raw in path.split('/').skip(1) {
        let segment = unescape_pointer(raw);
        let next = match current {
            Value::Object(map) => map.get(&segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        current = next.ok_or(LocateError::PathNotFound { segment })?;
    }
    Ok(current.clone())
}

/// Advance the cursor to the next line matching `^\s*"?<key>"?:`, or to the
/// last line when no line matches.
fn find_key(lines: &[&str], mut cursor: usize, key: &str) -> usize {
    let Some(max) = lines.len().checked_sub(1) else {
        return cursor;
    };
    while cursor < max && !line_matches_key(lines[cursor], key) {
        cursor += 1;
    }
    cursor
}

/// Advance the cursor `index` sequence-item markers forward.
///
/// The marker prefix (indentation plus dash) is taken from the line after
/// the cursor; only lines sharing that exact prefix count as items, so
/// nested sequences at deeper indentation are skipped over. If that line is
/// not a marker the segment was a mapping key after all and the scan falls
/// back to [`find_key`]. The scan clamps at the last line when the text
/// runs out before the index is reached.
fn find_sequence_item(lines: &[&str], cursor: usize, segment: &str, index: usize) -> usize {
    let Some(last) = lines.len().checked_sub(1) else {
        return cursor;
    };
    if cursor + 1 > last {
        return cursor;
    }
    let Some(prefix) = sequence_marker_prefix(lines[cursor + 1]) else {
        return find_key(lines, cursor, segment);
    };

    let mut cursor = cursor;
    let mut remaining = index;
    while remaining > 0 && cursor < last {
        cursor += 1;
        if lines[cursor].starts_with(prefix) {
            remaining -= 1;
        }
    }
    (cursor + 1).min(last)
}

/// The leading-whitespace-plus-dash prefix of a sequence-item line, if any.
fn sequence_marker_prefix(line: &str) -> Option<&str> {
    let indent = line.len() - line.trim_start().len();
    line[indent..].starts_with('-').then(|| &line[..indent + 1])
}

/// Does this line introduce `key`, allowing optional double quotes?
fn line_matches_key(line: &str, key: &str) -> bool {
    let trimmed = line.trim_start();
    let rest = trimmed.strip_prefix('"').unwrap_or(trimmed);
    match rest.strip_prefix(key) {
        Some(tail) => {
            let tail = tail.strip_prefix('"').unwrap_or(tail);
            tail.starts_with(':')
        }
        None => false,
    }
}
