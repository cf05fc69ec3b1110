//! JSON Patch apply logic.
//!
//! Operations run in order against a caller-owned map document and mutate it
//! in place. The first failure stops the batch; operations already applied
//! stay applied.

use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::codec::json::from_json;
use super::equal::json_equal;
use super::resolve::{resolve, Resolution, Resolved, Target};
use super::types::{ApplyOptions, Op, PatchError, Pointer, ValueKind};
use super::utf16::char_to_byte_index;

// ── Helpers ───────────────────────────────────────────────────────────────

/// Resolve a non-root path to the container owning its final segment.
fn member<'a>(
    doc: &'a mut Map<String, Value>,
    path: &Pointer,
    op: &'static str,
) -> Result<Target<'a>, PatchError> {
    match resolve(doc, path)? {
        Resolution::Member(Resolved { target, held_by }) => {
            trace!(%path, container = ?target.container_kind(), ?held_by, "resolved path");
            Ok(target)
        }
        Resolution::Root(_) => Err(PatchError::UnsupportedRootOperation { op }),
    }
}

fn not_a(op: &'static str, path: &Pointer, expected: &'static str, found: &Value) -> PatchError {
    PatchError::TypeMismatch {
        op,
        path: path.to_string(),
        subject: "target".to_string(),
        expected,
        found: ValueKind::of(found),
    }
}

/// The String stored at the target.
fn string_at<'t>(
    target: &'t mut Target<'_>,
    path: &Pointer,
    op: &'static str,
) -> Result<&'t mut String, PatchError> {
    match target.get_mut(path)? {
        Value::String(text) => Ok(text),
        other => Err(not_a(op, path, "string", other)),
    }
}

// ── Individual operation applicators ─────────────────────────────────────

fn apply_root(doc: &mut Map<String, Value>, op: &Op) -> Result<(), PatchError> {
    match op {
        Op::Add { value, .. } | Op::Replace { value, .. } => match value {
            Value::Object(map) => {
                *doc = map.clone();
                Ok(())
            }
            other => Err(PatchError::TypeMismatch {
                op: op.op_name(),
                path: String::new(),
                subject: "value".to_string(),
                expected: "map",
                found: ValueKind::of(other),
            }),
        },
        Op::Remove { .. } => {
            doc.clear();
            Ok(())
        }
        other => Err(PatchError::UnsupportedRootOperation {
            op: other.op_name(),
        }),
    }
}

fn apply_add(doc: &mut Map<String, Value>, path: &Pointer, value: Value) -> Result<(), PatchError> {
    member(doc, path, "add")?.insert(value, path)
}

fn apply_remove(doc: &mut Map<String, Value>, path: &Pointer) -> Result<(), PatchError> {
    member(doc, path, "remove")?.remove(path)?;
    Ok(())
}

fn apply_replace(doc: &mut Map<String, Value>, path: &Pointer, value: Value) -> Result<(), PatchError> {
    member(doc, path, "replace")?.replace(value, path)?;
    Ok(())
}

fn apply_move(doc: &mut Map<String, Value>, path: &Pointer, from: &Pointer) -> Result<(), PatchError> {
    if from.is_prefix_of(path) {
        return Err(PatchError::MovePrefixConflict {
            from: from.to_string(),
            path: path.to_string(),
        });
    }
    let value = member(doc, from, "move")?.remove(from)?;
    // Removal can shift list indices, so the destination is resolved afresh.
    member(doc, path, "move")?.insert(value, path)
}

fn apply_copy(doc: &mut Map<String, Value>, path: &Pointer, from: &Pointer) -> Result<(), PatchError> {
    let value = if from.is_root() {
        Value::Object(doc.clone())
    } else {
        member(doc, from, "copy")?.get(from)?.clone()
    };
    member(doc, path, "copy")?.insert(value, path)
}

fn apply_test(doc: &mut Map<String, Value>, path: &Pointer, expected: &Value) -> Result<(), PatchError> {
    let target = member(doc, path, "test")?;
    if !json_equal(target.get(path)?, expected) {
        return Err(PatchError::TestFailed {
            path: path.to_string(),
        });
    }
    Ok(())
}

fn apply_str_ins(
    doc: &mut Map<String, Value>,
    path: &Pointer,
    pos: i64,
    insert: &str,
    options: &ApplyOptions,
) -> Result<(), PatchError> {
    let mut target = member(doc, path, "str_ins")?;
    let text = string_at(&mut target, path, "str_ins")?;
    let char_len = text.chars().count();

    let at = usize::try_from(pos)
        .ok()
        .map(|units| options.string_index.char_offset(text, units))
        .filter(|at| *at <= char_len)
        .ok_or_else(|| PatchError::InvalidPosition {
            op: "str_ins",
            path: path.to_string(),
            pos,
            len: char_len,
        })?;

    let byte = char_to_byte_index(text, at);
    text.insert_str(byte, insert);
    Ok(())
}

fn apply_str_del(
    doc: &mut Map<String, Value>,
    path: &Pointer,
    pos: i64,
    str_val: Option<&str>,
    len: Option<i64>,
    options: &ApplyOptions,
) -> Result<(), PatchError> {
    // `str` only contributes its codepoint count.
    let hint = match (str_val, len) {
        (Some(deleted), _) => deleted.chars().count() as i64,
        (None, Some(len)) => len,
        (None, None) => {
            return Err(PatchError::MissingField {
                op: "str_del",
                path: path.to_string(),
                field: "str or len",
            })
        }
    };

    let mut target = member(doc, path, "str_del")?;
    let text = string_at(&mut target, path, "str_del")?;
    let str_len = text.chars().count();
    let invalid = || PatchError::InvalidRange {
        path: path.to_string(),
        pos,
        len: hint,
        str_len,
    };

    let (units, count) = match (usize::try_from(pos), usize::try_from(hint)) {
        (Ok(units), Ok(count)) => (units, count),
        _ => return Err(invalid()),
    };
    let start = options.string_index.char_offset(text, units);
    let span = if str_val.is_some() {
        count
    } else {
        options.string_index.char_len(text, units, count)
    };
    let end = start
        .checked_add(span)
        .filter(|end| *end <= str_len)
        .ok_or_else(invalid)?;

    let range = char_to_byte_index(text, start)..char_to_byte_index(text, end);
    text.replace_range(range, "");
    Ok(())
}

fn apply_inc(doc: &mut Map<String, Value>, path: &Pointer, inc: f64) -> Result<(), PatchError> {
    let mut target = member(doc, path, "inc")?;
    let slot = target.get_mut(path)?;
    let current = match &*slot {
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        other => return Err(not_a("inc", path, "number", other)),
    };
    // Counters are integers: the sum is truncated toward zero on every write.
    *slot = Value::from((current + inc) as i64);
    Ok(())
}

// ── Public API ────────────────────────────────────────────────────────────

/// Apply a single operation to `doc`, mutating it in place.
pub fn apply_op(doc: &mut Map<String, Value>, op: &Op, options: &ApplyOptions) -> Result<(), PatchError> {
    if op.path().is_root() {
        return apply_root(doc, op);
    }
    match op {
        Op::Add { path, value } => apply_add(doc, path, value.clone()),
        Op::Remove { path } => apply_remove(doc, path),
        Op::Replace { path, value } => apply_replace(doc, path, value.clone()),
        Op::Move { path, from } => apply_move(doc, path, from),
        Op::Copy { path, from } => apply_copy(doc, path, from),
        Op::Test { path, value } => apply_test(doc, path, value),
        Op::StrIns { path, pos, str_val } => apply_str_ins(doc, path, *pos, str_val, options),
        Op::StrDel {
            path,
            pos,
            str_val,
            len,
        } => apply_str_del(doc, path, *pos, str_val.as_deref(), *len, options),
        Op::Inc { path, inc } => apply_inc(doc, path, *inc),
    }
}

/// Apply decoded operations in order, stopping at the first failure.
pub fn apply_ops(doc: &mut Map<String, Value>, ops: &[Op], options: &ApplyOptions) -> Result<(), PatchError> {
    for (index, op) in ops.iter().enumerate() {
        debug!(index, op = op.op_name(), path = %op.path(), "applying operation");
        apply_op(doc, op, options).inspect_err(|error| {
            debug!(index, op = op.op_name(), %error, "operation failed");
        })?;
    }
    Ok(())
}

/// Apply a batch of operation records with default options.
///
/// # Example
///
/// ```
/// use serde_json::{json, Map, Value};
/// use sync_patch::json_patch::apply_patch;
///
/// let mut doc: Map<String, Value> = serde_json::from_value(json!({"text": "Hello 🌍 world"})).unwrap();
/// apply_patch(&mut doc, &[json!({"op": "str_ins", "path": "/text", "pos": 9, "str": "big "})]).unwrap();
/// assert_eq!(doc["text"], "Hello 🌍 big world");
/// ```
pub fn apply_patch(doc: &mut Map<String, Value>, records: &[Value]) -> Result<(), PatchError> {
    apply_patch_with(doc, records, &ApplyOptions::default())
}

/// Apply a batch of operation records.
///
/// Each record is decoded just before it is applied, so a malformed record
/// only fails once every record before it has taken effect.
pub fn apply_patch_with(
    doc: &mut Map<String, Value>,
    records: &[Value],
    options: &ApplyOptions,
) -> Result<(), PatchError> {
    for (index, record) in records.iter().enumerate() {
        let op = from_json(record).inspect_err(|error| {
            debug!(index, %error, "rejected operation record");
        })?;
        debug!(index, op = op.op_name(), path = %op.path(), "applying operation");
        apply_op(doc, &op, options).inspect_err(|error| {
            debug!(index, op = op.op_name(), %error, "operation failed");
        })?;
    }
    Ok(())
}
