//! Core types for the JSON Patch module.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

pub use sync_patch_pointer::{Pointer, PointerError};

// ── Value kinds ───────────────────────────────────────────────────────────

/// Runtime kind of a document value, used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    List,
    Map,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::List,
            Value::Object(_) => ValueKind::Map,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::List => "list",
            ValueKind::Map => "map",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Error ─────────────────────────────────────────────────────────────────

/// Failure of a single operation. Terminates the rest of the batch.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatchError {
    #[error("invalid op format: {reason}")]
    MalformedOperation { reason: String },

    #[error(transparent)]
    InvalidPointer(#[from] PointerError),

    #[error("path segment {segment:?} not found in map for path {path:?}")]
    PathNotFound { path: String, segment: String },

    #[error("index {index} out of bounds for list (len {len}) at segment {segment:?} in path {path:?}")]
    IndexOutOfBounds {
        path: String,
        segment: String,
        index: i64,
        len: usize,
    },

    #[error("path segment {segment:?} is not a valid integer index for list in path {path:?}")]
    InvalidIndex { path: String, segment: String },

    #[error(
        "path {path:?} traverses a non-container (neither map nor list) {}",
        traversal_position(.segment, .kind, .before_final)
    )]
    NonContainerTraversal {
        path: String,
        segment: String,
        kind: ValueKind,
        before_final: bool,
    },

    #[error("{subject} of {op:?} at path {path:?} is not a {expected} (found {found})")]
    TypeMismatch {
        op: &'static str,
        path: String,
        subject: String,
        expected: &'static str,
        found: ValueKind,
    },

    #[error("op {op:?} missing {field:?} field for path {path:?}")]
    MissingField {
        op: &'static str,
        path: String,
        field: &'static str,
    },

    #[error("invalid \"pos\" {pos} for {op:?} (string len {len}) on path {path:?}")]
    InvalidPosition {
        op: &'static str,
        path: String,
        pos: i64,
        len: usize,
    },

    #[error("invalid \"pos\" {pos} or \"len\" {len} for \"str_del\" (string len {str_len}) on path {path:?}")]
    InvalidRange {
        path: String,
        pos: i64,
        len: i64,
        str_len: usize,
    },

    #[error("test operation failed: value at path {path:?} does not match")]
    TestFailed { path: String },

    #[error("op {op:?} on root path \"\" is not supported or not meaningful for a map document")]
    UnsupportedRootOperation { op: &'static str },

    #[error("unhandled op type {op:?} for path {path:?}")]
    UnknownOperationKind { op: String, path: String },

    #[error("from path {from:?} is a proper prefix of path {path:?}")]
    MovePrefixConflict { from: String, path: String },
}

fn traversal_position(segment: &str, kind: &ValueKind, before_final: &bool) -> String {
    if *before_final {
        format!("before final segment; parent is type {kind}")
    } else {
        format!("at segment {segment:?} (value type: {kind})")
    }
}

// ── Op enum ───────────────────────────────────────────────────────────────

/// A decoded patch operation.
///
/// String positions and lengths are kept exactly as the producer sent them;
/// they are translated to codepoints when applied (see [`StringIndex`]).
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Add {
        path: Pointer,
        value: Value,
    },
    Remove {
        path: Pointer,
    },
    Replace {
        path: Pointer,
        value: Value,
    },
    Move {
        path: Pointer,
        from: Pointer,
    },
    Copy {
        path: Pointer,
        from: Pointer,
    },
    Test {
        path: Pointer,
        value: Value,
    },
    StrIns {
        path: Pointer,
        pos: i64,
        str_val: String,
    },
    /// `str_val` only supplies a length (its codepoint count); its content is
    /// never compared with the text being deleted.
    StrDel {
        path: Pointer,
        pos: i64,
        str_val: Option<String>,
        len: Option<i64>,
    },
    Inc {
        path: Pointer,
        inc: f64,
    },
}

impl Op {
    /// Returns the operation name used on the wire.
    pub fn op_name(&self) -> &'static str {
        match self {
            Op::Add { .. } => "add",
            Op::Remove { .. } => "remove",
            Op::Replace { .. } => "replace",
            Op::Move { .. } => "move",
            Op::Copy { .. } => "copy",
            Op::Test { .. } => "test",
            Op::StrIns { .. } => "str_ins",
            Op::StrDel { .. } => "str_del",
            Op::Inc { .. } => "inc",
        }
    }

    /// Returns the target path of the operation.
    pub fn path(&self) -> &Pointer {
        match self {
            Op::Add { path, .. } => path,
            Op::Remove { path } => path,
            Op::Replace { path, .. } => path,
            Op::Move { path, .. } => path,
            Op::Copy { path, .. } => path,
            Op::Test { path, .. } => path,
            Op::StrIns { path, .. } => path,
            Op::StrDel { path, .. } => path,
            Op::Inc { path, .. } => path,
        }
    }
}

// ── Options ───────────────────────────────────────────────────────────────

/// Unit in which `str_ins` / `str_del` positions and lengths are expressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StringIndex {
    /// UTF-16 code units, as produced by JavaScript clients.
    #[default]
    Utf16,
    /// Unicode scalar values; used verbatim.
    Codepoint,
}

/// Options for [`apply_patch_with`](super::apply::apply_patch_with).
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    pub string_index: StringIndex,
}
