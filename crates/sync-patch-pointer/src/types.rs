//! Decoded pointer type.

use std::fmt;
use std::str::FromStr;

use crate::{format_pointer, parse_pointer, PointerError};

/// A decoded JSON Pointer.
///
/// Keeps the pointer text exactly as received (for error reporting) next to
/// its unescaped tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Pointer {
    raw: String,
    tokens: Vec<String>,
}

impl Pointer {
    /// The root pointer `""`.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parses and unescapes a pointer string.
    ///
    /// # Example
    ///
    /// ```
    /// use sync_patch_pointer::Pointer;
    ///
    /// let p = Pointer::parse("/arr/-").unwrap();
    /// assert_eq!(p.tokens(), ["arr", "-"]);
    /// assert_eq!(p.as_str(), "/arr/-");
    /// assert!(Pointer::parse("").unwrap().is_root());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, PointerError> {
        Ok(Self {
            raw: raw.to_string(),
            tokens: parse_pointer(raw)?,
        })
    }

    /// Builds a pointer from already-decoded tokens.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        Self {
            raw: format_pointer(&tokens),
            tokens,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The last token, or `None` for the root.
    pub fn last(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }

    /// Returns `true` if `other` is this pointer or lies underneath it.
    ///
    /// Compared token by token, which matches comparing `self + "/"` as a
    /// string prefix of `other + "/"` on canonical pointers: `/a` is a prefix
    /// of `/a` and `/a/b` but not of `/ab`. The root is a prefix of everything.
    ///
    /// # Example
    ///
    /// ```
    /// use sync_patch_pointer::Pointer;
    ///
    /// let a = Pointer::parse("/a").unwrap();
    /// assert!(a.is_prefix_of(&Pointer::parse("/a/b").unwrap()));
    /// assert!(!a.is_prefix_of(&Pointer::parse("/ab").unwrap()));
    /// ```
    pub fn is_prefix_of(&self, other: &Pointer) -> bool {
        other.tokens.starts_with(&self.tokens)
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Pointer {
    type Err = PointerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Pointer {
        Pointer::parse(s).unwrap()
    }

    #[test]
    fn keeps_raw_text() {
        let pointer = p("/config/Feature~0Flag");
        assert_eq!(pointer.to_string(), "/config/Feature~0Flag");
        assert_eq!(pointer.last(), Some("Feature~Flag"));
    }

    #[test]
    fn from_tokens_escapes() {
        let pointer = Pointer::from_tokens(["a/b", "c~d"]);
        assert_eq!(pointer.as_str(), "/a~1b/c~0d");
        assert_eq!(pointer, p("/a~1b/c~0d"));
    }

    #[test]
    fn root_has_no_tokens() {
        assert!(Pointer::root().is_root());
        assert_eq!(Pointer::root().last(), None);
        assert!(!p("/").is_root());
    }

    #[test]
    fn prefix_relation() {
        assert!(p("/a").is_prefix_of(&p("/a")));
        assert!(p("/a").is_prefix_of(&p("/a/b/c")));
        assert!(!p("/a/b").is_prefix_of(&p("/a")));
        assert!(!p("/a").is_prefix_of(&p("/ab")));
        assert!(Pointer::root().is_prefix_of(&p("/x")));
        assert!(!p("/x").is_prefix_of(&Pointer::root()));
    }

    #[test]
    fn from_str_parses() {
        let pointer: Pointer = "/list/0".parse().unwrap();
        assert_eq!(pointer.tokens(), ["list", "0"]);
        assert!("/bad~".parse::<Pointer>().is_err());
    }
}
