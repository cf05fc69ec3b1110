//! JSON Pointer (RFC 6901) codec.
//!
//! Decodes the pointer strings carried by patch operations into path tokens,
//! rejecting malformed `~` escapes instead of passing them through.
//!
//! # Example
//!
//! ```
//! use sync_patch_pointer::{format_pointer, Pointer};
//!
//! let pointer = Pointer::parse("/config/Feature~0Flag").unwrap();
//! assert_eq!(pointer.tokens(), ["config", "Feature~Flag"]);
//! assert_eq!(format_pointer(pointer.tokens()), "/config/Feature~0Flag");
//!
//! assert!(Pointer::parse("/foo/~2bar").is_err());
//! ```

use thiserror::Error;

pub mod types;
pub use types::Pointer;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PointerError {
    #[error("invalid JSON pointer escape in segment {segment:?} of pointer {pointer:?}")]
    InvalidEscape { segment: String, pointer: String },
}

/// Unescapes a JSON Pointer path component.
///
/// `~1` becomes `/` and `~0` becomes `~`. Any other character after `~`, or a
/// `~` at the end of the component, is an error.
///
/// # Example
///
/// ```
/// use sync_patch_pointer::unescape_component;
///
/// assert_eq!(unescape_component("a~0b").unwrap(), "a~b");
/// assert_eq!(unescape_component("c~1d").unwrap(), "c/d");
/// assert_eq!(unescape_component("~01").unwrap(), "~1");
/// assert!(unescape_component("tail~").is_err());
/// ```
pub fn unescape_component(component: &str) -> Result<String, PointerError> {
    if !component.contains('~') {
        return Ok(component.to_string());
    }
    let mut out = String::with_capacity(component.len());
    let mut chars = component.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            _ => {
                return Err(PointerError::InvalidEscape {
                    segment: component.to_string(),
                    pointer: component.to_string(),
                })
            }
        }
    }
    Ok(out)
}

/// Escapes a JSON Pointer path component.
///
/// # Example
///
/// ```
/// use sync_patch_pointer::escape_component;
///
/// assert_eq!(escape_component("a~b"), "a~0b");
/// assert_eq!(escape_component("c/d"), "c~1d");
/// ```
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    // `~` first, otherwise the `~` produced for `/` would be escaped again
    component.replace('~', "~0").replace('/', "~1")
}

/// Splits a pointer string into unescaped tokens.
///
/// The empty string is the root and yields no tokens. A leading `/` is
/// optional.
pub fn parse_pointer(pointer: &str) -> Result<Vec<String>, PointerError> {
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    let body = pointer.strip_prefix('/').unwrap_or(pointer);
    body.split('/')
        .map(|segment| {
            unescape_component(segment).map_err(|_| PointerError::InvalidEscape {
                segment: segment.to_string(),
                pointer: pointer.to_string(),
            })
        })
        .collect()
}

/// Formats tokens into a pointer string. No tokens gives the root `""`.
pub fn format_pointer<S: AsRef<str>>(tokens: &[S]) -> String {
    let mut out = String::new();
    for token in tokens {
        out.push('/');
        out.push_str(&escape_component(token.as_ref()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_component() {
        assert_eq!(unescape_component("foo").unwrap(), "foo");
        assert_eq!(unescape_component("a~0b~1c").unwrap(), "a~b/c");
        assert_eq!(unescape_component("~0~0").unwrap(), "~~");
        assert_eq!(unescape_component("~1~1").unwrap(), "//");
        // decoded left to right, so `~01` is `~` followed by `1`
        assert_eq!(unescape_component("~01").unwrap(), "~1");
    }

    #[test]
    fn test_unescape_component_rejects_bad_escapes() {
        for bad in ["~", "a~", "~2", "x~ay", "~~0"] {
            assert!(unescape_component(bad).is_err(), "{bad:?} should fail");
        }
    }

    #[test]
    fn test_escape_component() {
        assert_eq!(escape_component("foo"), "foo");
        assert_eq!(escape_component("a~b/c"), "a~0b~1c");
        assert_eq!(escape_component("~1"), "~01");
    }

    #[test]
    fn test_parse_pointer() {
        assert_eq!(parse_pointer("").unwrap(), Vec::<String>::new());
        assert_eq!(parse_pointer("/").unwrap(), vec![""]);
        assert_eq!(parse_pointer("/foo/bar").unwrap(), vec!["foo", "bar"]);
        assert_eq!(parse_pointer("/foo///").unwrap(), vec!["foo", "", "", ""]);
        assert_eq!(parse_pointer("foo/bar").unwrap(), vec!["foo", "bar"]);
        assert_eq!(
            parse_pointer("/viewStates/Initial Load ~1 No Track Selected").unwrap(),
            vec!["viewStates", "Initial Load / No Track Selected"]
        );
    }

    #[test]
    fn test_parse_pointer_error_names_segment_and_pointer() {
        let err = parse_pointer("/foo/~2bar").unwrap_err();
        assert_eq!(
            err,
            PointerError::InvalidEscape {
                segment: "~2bar".to_string(),
                pointer: "/foo/~2bar".to_string(),
            }
        );
        assert!(err.to_string().contains("invalid JSON pointer"));
    }

    #[test]
    fn test_format_pointer() {
        assert_eq!(format_pointer::<&str>(&[]), "");
        assert_eq!(format_pointer(&[""]), "/");
        assert_eq!(format_pointer(&["a~b", "c/d"]), "/a~0b/c~1d");
    }
}
