//! sync-patch — applies JSON Patch operation batches from a sync protocol to
//! an in-memory map document.
//!
//! Path decoding lives in the `sync-patch-pointer` crate.

pub mod json_patch;
