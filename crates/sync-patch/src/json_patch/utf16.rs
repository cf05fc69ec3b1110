//! UTF-16 to codepoint index translation.
//!
//! Patch producers running on JavaScript index strings in UTF-16 code units,
//! while `str` is indexed here by `char` (Unicode scalar value). Every string
//! position and length goes through this module before touching the text.

use super::types::StringIndex;

/// Converts a UTF-16 code-unit offset into a `char` index.
///
/// Walks the text accumulating UTF-16 widths and stops before the first
/// `char` that would carry the total past `offset`, so an offset pointing into
/// the middle of a surrogate pair lands before that `char`. Units past the end
/// of the text are carried over one-for-one, which keeps an out-of-range
/// offset out of range.
///
/// # Example
///
/// ```
/// use sync_patch::json_patch::utf16::utf16_offset_to_char_index;
///
/// // "🌍" is two UTF-16 units but one char
/// assert_eq!(utf16_offset_to_char_index("Hello 🌍 world", 9), 8);
/// assert_eq!(utf16_offset_to_char_index("abc", 5), 5);
/// ```
pub fn utf16_offset_to_char_index(text: &str, offset: usize) -> usize {
    let mut units = 0usize;
    let mut chars = 0usize;
    for c in text.chars() {
        let width = c.len_utf16();
        if units + width > offset {
            return chars;
        }
        units += width;
        chars += 1;
    }
    chars + (offset - units)
}

/// Converts a UTF-16 length starting at UTF-16 offset `start` into a `char`
/// count.
pub fn utf16_len_to_char_len(text: &str, start: usize, len: usize) -> usize {
    let end = utf16_offset_to_char_index(text, start.saturating_add(len));
    end - utf16_offset_to_char_index(text, start)
}

/// Byte offset of the `char` at `char_index`, or the text length past the end.
pub(crate) fn char_to_byte_index(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

impl StringIndex {
    /// Translates a producer offset into a `char` index.
    pub fn char_offset(self, text: &str, offset: usize) -> usize {
        match self {
            StringIndex::Utf16 => utf16_offset_to_char_index(text, offset),
            StringIndex::Codepoint => offset,
        }
    }

    /// Translates a producer length anchored at producer offset `start` into
    /// a `char` count.
    pub fn char_len(self, text: &str, start: usize, len: usize) -> usize {
        match self {
            StringIndex::Utf16 => utf16_len_to_char_len(text, start, len),
            StringIndex::Codepoint => len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_offsets_are_identity() {
        for i in 0..=5 {
            assert_eq!(utf16_offset_to_char_index("hello", i), i);
        }
    }

    #[test]
    fn surrogate_pairs_take_two_units() {
        let text = "Hello 🌍 world";
        assert_eq!(utf16_offset_to_char_index(text, 6), 6);
        // inside the pair: stays before the emoji
        assert_eq!(utf16_offset_to_char_index(text, 7), 6);
        assert_eq!(utf16_offset_to_char_index(text, 8), 7);
        assert_eq!(utf16_offset_to_char_index(text, 9), 8);
        assert_eq!(utf16_offset_to_char_index(text, 15), 14);
    }

    #[test]
    fn offsets_past_the_end_carry_over() {
        assert_eq!(utf16_offset_to_char_index("abc", 3), 3);
        assert_eq!(utf16_offset_to_char_index("abc", 5), 5);
        assert_eq!(utf16_offset_to_char_index("🌍", 4), 3);
        assert_eq!(utf16_offset_to_char_index("", 2), 2);
    }

    #[test]
    fn lengths() {
        assert_eq!(utf16_len_to_char_len("hello", 0, 0), 0);
        assert_eq!(utf16_len_to_char_len("a🌍b", 1, 2), 1);
        assert_eq!(utf16_len_to_char_len("a🌍b", 0, 4), 3);
        assert_eq!(utf16_len_to_char_len("abc", 5, 1), 1);
    }

    #[test]
    fn bmp_non_ascii_is_one_unit() {
        // 'é' and '中' are single UTF-16 units
        assert_eq!(utf16_offset_to_char_index("é中x", 2), 2);
    }

    #[test]
    fn byte_index() {
        assert_eq!(char_to_byte_index("a🌍b", 0), 0);
        assert_eq!(char_to_byte_index("a🌍b", 1), 1);
        assert_eq!(char_to_byte_index("a🌍b", 2), 5);
        assert_eq!(char_to_byte_index("a🌍b", 3), 6);
        assert_eq!(char_to_byte_index("a🌍b", 9), 6);
    }

    #[test]
    fn codepoint_mode_is_verbatim() {
        assert_eq!(StringIndex::Codepoint.char_offset("🌍🌍", 1), 1);
        assert_eq!(StringIndex::Codepoint.char_len("🌍🌍", 0, 2), 2);
        assert_eq!(StringIndex::Utf16.char_offset("🌍🌍", 2), 1);
        assert_eq!(StringIndex::Utf16.char_len("🌍🌍", 0, 4), 2);
    }
}
