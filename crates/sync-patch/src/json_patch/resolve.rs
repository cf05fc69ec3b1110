//! Path resolution over heterogeneous containers.
//!
//! [`resolve`] walks a document along a [`Pointer`] and hands back an
//! exclusive borrow of the container that owns the final segment. Lists and
//! maps are uniquely owned by the slot that holds them, so edits made through
//! the returned [`Target`] land directly in the tree and are never detached
//! copies; the borrow also ends with the operation, so nothing from one
//! operation can be held into the next.

use std::mem;

use serde_json::{Map, Value};

use super::types::{PatchError, Pointer, ValueKind};

// ── Resolution types ──────────────────────────────────────────────────────

/// Final segment of a path whose parent is a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListIndex {
    /// An integer token, range-checked by the operation.
    At(i64),
    /// The `-` token: one past the last element.
    Append,
}

/// The container that owns the final segment, and that segment.
#[derive(Debug)]
pub enum Target<'a> {
    Field {
        map: &'a mut Map<String, Value>,
        key: String,
    },
    Element {
        list: &'a mut Vec<Value>,
        index: ListIndex,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Map,
    List,
}

/// One step from a container to its child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Key(String),
    Index(usize),
}

/// How the grandparent holds the target's parent container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub container: ContainerKind,
    pub step: Step,
}

#[derive(Debug)]
pub struct Resolved<'a> {
    pub target: Target<'a>,
    /// `None` when the parent is the document root.
    pub held_by: Option<Link>,
}

#[derive(Debug)]
pub enum Resolution<'a> {
    /// The empty path: the document itself, with no final key.
    Root(&'a mut Map<String, Value>),
    Member(Resolved<'a>),
}

enum Cursor<'a> {
    Map(&'a mut Map<String, Value>),
    List(&'a mut Vec<Value>),
}

// ── Walk ──────────────────────────────────────────────────────────────────

fn parse_index(segment: &str, path: &Pointer) -> Result<i64, PatchError> {
    segment.parse().map_err(|_| PatchError::InvalidIndex {
        path: path.to_string(),
        segment: segment.to_string(),
    })
}

/// Resolve `path` against `doc`.
///
/// Intermediate segments must exist. The final segment is only checked for
/// shape (a list parent needs an integer or `-`); existence and bounds are up
/// to the operation, since `add` and `replace` accept different ranges.
pub fn resolve<'a>(
    doc: &'a mut Map<String, Value>,
    path: &Pointer,
) -> Result<Resolution<'a>, PatchError> {
    let Some((last, init)) = path.tokens().split_last() else {
        return Ok(Resolution::Root(doc));
    };

    let mut current = Cursor::Map(doc);
    let mut held_by = None;

    for (i, segment) in init.iter().enumerate() {
        let (child, link) = match current {
            Cursor::Map(map) => {
                let child = map
                    .get_mut(segment)
                    .ok_or_else(|| PatchError::PathNotFound {
                        path: path.to_string(),
                        segment: segment.clone(),
                    })?;
                (child, Link {
                    container: ContainerKind::Map,
                    step: Step::Key(segment.clone()),
                })
            }
            Cursor::List(list) => {
                let index = parse_index(segment, path)?;
                let len = list.len();
                let idx = usize::try_from(index)
                    .ok()
                    .filter(|idx| *idx < len)
                    .ok_or_else(|| PatchError::IndexOutOfBounds {
                        path: path.to_string(),
                        segment: segment.clone(),
                        index,
                        len,
                    })?;
                (&mut list[idx], Link {
                    container: ContainerKind::List,
                    step: Step::Index(idx),
                })
            }
        };

        current = match child {
            Value::Object(map) => Cursor::Map(map),
            Value::Array(list) => Cursor::List(list),
            other => {
                return Err(PatchError::NonContainerTraversal {
                    path: path.to_string(),
                    segment: path.tokens()[i + 1].clone(),
                    kind: ValueKind::of(other),
                    before_final: i + 1 == init.len(),
                })
            }
        };
        held_by = Some(link);
    }

    let target = match current {
        Cursor::Map(map) => Target::Field {
            map,
            key: last.clone(),
        },
        Cursor::List(list) => {
            let index = if last == "-" {
                ListIndex::Append
            } else {
                ListIndex::At(parse_index(last, path)?)
            };
            Target::Element { list, index }
        }
    };

    Ok(Resolution::Member(Resolved { target, held_by }))
}

// ── Target access ─────────────────────────────────────────────────────────

fn last_segment(path: &Pointer) -> String {
    path.last().unwrap_or_default().to_string()
}

/// Position of `index` in a list of `len` elements, within `[0, len)`, or
/// `[0, len]` when `inclusive`.
fn checked_index(
    index: ListIndex,
    len: usize,
    inclusive: bool,
    path: &Pointer,
) -> Result<usize, PatchError> {
    let raw = match index {
        ListIndex::At(i) => i,
        ListIndex::Append => len as i64,
    };
    let limit = if inclusive { len + 1 } else { len };
    usize::try_from(raw)
        .ok()
        .filter(|idx| *idx < limit)
        .ok_or_else(|| PatchError::IndexOutOfBounds {
            path: path.to_string(),
            segment: last_segment(path),
            index: raw,
            len,
        })
}

impl<'a> Target<'a> {
    pub fn container_kind(&self) -> ContainerKind {
        match self {
            Target::Field { .. } => ContainerKind::Map,
            Target::Element { .. } => ContainerKind::List,
        }
    }

    /// The existing value at the target.
    pub fn get(&self, path: &Pointer) -> Result<&Value, PatchError> {
        match self {
            Target::Field { map, key } => map.get(key).ok_or_else(|| PatchError::PathNotFound {
                path: path.to_string(),
                segment: key.clone(),
            }),
            Target::Element { list, index } => {
                let idx = checked_index(*index, list.len(), false, path)?;
                Ok(&list[idx])
            }
        }
    }

    /// The existing value at the target, mutably.
    pub fn get_mut(&mut self, path: &Pointer) -> Result<&mut Value, PatchError> {
        match self {
            Target::Field { map, key } => match map.get_mut(key.as_str()) {
                Some(value) => Ok(value),
                None => Err(PatchError::PathNotFound {
                    path: path.to_string(),
                    segment: key.clone(),
                }),
            },
            Target::Element { list, index } => {
                let idx = checked_index(*index, list.len(), false, path)?;
                Ok(&mut list[idx])
            }
        }
    }

    /// `add` semantics: set a map key unconditionally, or insert into a list
    /// at `[0, len]`, shifting later elements up.
    pub fn insert(self, value: Value, path: &Pointer) -> Result<(), PatchError> {
        match self {
            Target::Field { map, key } => {
                map.insert(key, value);
            }
            Target::Element { list, index } => {
                let idx = checked_index(index, list.len(), true, path)?;
                list.insert(idx, value);
            }
        }
        Ok(())
    }

    /// Remove the existing value, shifting later list elements down.
    pub fn remove(self, path: &Pointer) -> Result<Value, PatchError> {
        match self {
            Target::Field { map, key } => map.shift_remove(&key).ok_or_else(|| PatchError::PathNotFound {
                path: path.to_string(),
                segment: key,
            }),
            Target::Element { list, index } => {
                let idx = checked_index(index, list.len(), false, path)?;
                Ok(list.remove(idx))
            }
        }
    }

    /// Overwrite an existing value, returning the old one.
    pub fn replace(mut self, value: Value, path: &Pointer) -> Result<Value, PatchError> {
        let slot = self.get_mut(path)?;
        Ok(mem::replace(slot, value))
    }
}
