//! JSON Patch (RFC 6902 plus string and counter extensions) applied to a
//! mutable map document.
//!
//! # Operations
//!
//! Standard RFC 6902 operations:
//! `add`, `remove`, `replace`, `copy`, `move`, `test`.
//!
//! Extensions:
//! `str_ins`, `str_del` (positions in UTF-16 code units by default) and
//! `inc` (integer counters).

pub mod types;
pub mod apply;
pub mod codec;
pub mod equal;
pub mod resolve;
pub mod utf16;

pub use types::{ApplyOptions, Op, PatchError, Pointer, PointerError, StringIndex, ValueKind};
pub use apply::{apply_op, apply_ops, apply_patch, apply_patch_with};
pub use codec::json::{from_json, from_json_patch};
pub use equal::json_equal;
pub use resolve::{resolve, Resolution, Resolved, Target};
pub use utf16::{utf16_len_to_char_len, utf16_offset_to_char_index};
