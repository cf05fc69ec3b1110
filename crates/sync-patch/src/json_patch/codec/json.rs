//! JSON codec for patch operations.
//!
//! Decodes a single operation record (a JSON object keyed by `op`, `path`
//! and the kind-specific fields) into an [`Op`].

use serde_json::{Map, Value};

use crate::json_patch::types::{Op, PatchError, Pointer, ValueKind};

const KINDS: [&str; 9] = [
    "add", "remove", "replace", "move", "copy", "test", "str_ins", "str_del", "inc",
];

// ── Field access ──────────────────────────────────────────────────────────

/// Kind-specific field reader for one record.
struct Fields<'a> {
    record: &'a Map<String, Value>,
    op: &'static str,
    path: &'a str,
}

impl<'a> Fields<'a> {
    fn missing(&self, field: &'static str) -> PatchError {
        PatchError::MissingField {
            op: self.op,
            path: self.path.to_string(),
            field,
        }
    }

    fn wrong_type(&self, field: &str, expected: &'static str, found: &Value) -> PatchError {
        PatchError::TypeMismatch {
            op: self.op,
            path: self.path.to_string(),
            subject: format!("{field:?} field"),
            expected,
            found: ValueKind::of(found),
        }
    }

    fn value(&self) -> Result<Value, PatchError> {
        self.record
            .get("value")
            .cloned()
            .ok_or_else(|| self.missing("value"))
    }

    fn pointer(&self, field: &'static str) -> Result<Pointer, PatchError> {
        let raw = self.record.get(field).ok_or_else(|| self.missing(field))?;
        let raw = raw
            .as_str()
            .ok_or_else(|| self.wrong_type(field, "string", raw))?;
        Ok(Pointer::parse(raw)?)
    }

    fn opt_str(&self, field: &'static str) -> Result<Option<String>, PatchError> {
        match self.record.get(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.wrong_type(field, "string", other)),
        }
    }

    fn opt_number(&self, field: &'static str) -> Result<Option<f64>, PatchError> {
        match self.record.get(field) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(other) => Err(self.wrong_type(field, "number", other)),
        }
    }

    /// Integer-valued field; fractional numbers are truncated toward zero.
    fn opt_int(&self, field: &'static str) -> Result<Option<i64>, PatchError> {
        match self.record.get(field) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))),
            Some(other) => Err(self.wrong_type(field, "number", other)),
        }
    }

    fn required<T>(&self, value: Option<T>, field: &'static str) -> Result<T, PatchError> {
        value.ok_or_else(|| self.missing(field))
    }
}

// ── Deserialization ───────────────────────────────────────────────────────

/// Deserialize one operation record into an `Op`.
///
/// Checks run in order: envelope (`op` and `path` present as strings), known
/// kind, pointer syntax, then the kind-specific fields.
pub fn from_json(record: &Value) -> Result<Op, PatchError> {
    let map = record
        .as_object()
        .ok_or_else(|| PatchError::MalformedOperation {
            reason: format!("operation must be a map, got {}", ValueKind::of(record)),
        })?;

    let (kind, raw_path) = match (
        map.get("op").and_then(Value::as_str),
        map.get("path").and_then(Value::as_str),
    ) {
        (Some(kind), Some(path)) => (kind, path),
        _ => {
            return Err(PatchError::MalformedOperation {
                reason: format!(
                    "op missing or not a string, or path missing or not a string: {record}"
                ),
            })
        }
    };

    let op = KINDS
        .iter()
        .copied()
        .find(|k| *k == kind)
        .ok_or_else(|| PatchError::UnknownOperationKind {
            op: kind.to_string(),
            path: raw_path.to_string(),
        })?;

    let path = Pointer::parse(raw_path)?;
    let f = Fields {
        record: map,
        op,
        path: raw_path,
    };

    let decoded = match op {
        "add" => Op::Add {
            value: f.value()?,
            path,
        },
        "remove" => Op::Remove { path },
        "replace" => Op::Replace {
            value: f.value()?,
            path,
        },
        "move" => Op::Move {
            from: f.pointer("from")?,
            path,
        },
        "copy" => Op::Copy {
            from: f.pointer("from")?,
            path,
        },
        "test" => Op::Test {
            value: f.value()?,
            path,
        },
        "str_ins" => Op::StrIns {
            pos: f.required(f.opt_int("pos")?, "pos")?,
            str_val: f.required(f.opt_str("str")?, "str")?,
            path,
        },
        "str_del" => {
            let pos = f.required(f.opt_int("pos")?, "pos")?;
            let str_val = f.opt_str("str")?;
            let len = f.opt_int("len")?;
            if str_val.is_none() && len.is_none() {
                return Err(f.missing("str or len"));
            }
            Op::StrDel {
                path,
                pos,
                str_val,
                len,
            }
        }
        "inc" => Op::Inc {
            inc: f.required(f.opt_number("inc")?, "inc")?,
            path,
        },
        other => {
            return Err(PatchError::UnknownOperationKind {
                op: other.to_string(),
                path: raw_path.to_string(),
            })
        }
    };
    Ok(decoded)
}

/// Deserialize a batch of operation records.
///
/// Stops at the first invalid record.
pub fn from_json_patch(records: &[Value]) -> Result<Vec<Op>, PatchError> {
    records.iter().map(from_json).collect()
}
