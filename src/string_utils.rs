//! UTF-8 offset utilities
//!
//! The editor widget addresses text by character index while Rust slices
//! strings by byte index. Characters like `ø`, `中`, `🎉` are multi-byte in
//! UTF-8, so the two disagree as soon as a document leaves ASCII. These
//! helpers convert between the two without ever slicing mid-character.

// ─────────────────────────────────────────────────────────────────────────────
// Character Boundary Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the largest index `<= index` on a UTF-8 character boundary.
///
/// Indices past the end clamp to `s.len()`.
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Returns the byte index just past the character starting at `index`.
///
/// Returns `None` at (or past) the end of the string.
#[inline]
pub fn next_char_boundary(s: &str, index: usize) -> Option<usize> {
    s.get(index..)?
        .chars()
        .next()
        .map(|c| index + c.len_utf8())
}

// ─────────────────────────────────────────────────────────────────────────────
// Offset Conversion
// ─────────────────────────────────────────────────────────────────────────────

/// Convert a character index to a byte index.
///
/// Character indices past the end clamp to `s.len()`.
pub fn char_to_byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(byte, _)| byte)
        .unwrap_or(s.len())
}

/// Convert a byte index to a character index.
///
/// Byte indices inside a multi-byte character count that character as
/// already passed only once its first byte is reached.
pub fn byte_to_char_index(s: &str, byte_index: usize) -> usize {
    let end = floor_char_boundary(s, byte_index);
    s[..end].chars().count()
}

/// Incremental byte-to-char converter for ascending byte offsets.
///
/// Converting every match offset with [`byte_to_char_index`] would rescan the
/// document from the start for each match; this walks it once.
pub struct CharOffsetCursor<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CharOffsetCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            byte: 0,
            chars: 0,
        }
    }

    /// Advance to `byte_index` and return its character index.
    ///
    /// Offsets must be non-decreasing; an earlier offset restarts the scan.
    pub fn char_index(&mut self, byte_index: usize) -> usize {
        let target = floor_char_boundary(self.text, byte_index);
        if target < self.byte {
            self.byte = 0;
            self.chars = 0;
        }
        self.chars += self.text[self.byte..target].chars().count();
        self.byte = target;
        self.chars
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_char_boundary() {
        let s = "Hei på deg"; // 'å' is 2 bytes at 5..7
        assert_eq!(floor_char_boundary(s, 5), 5);
        assert_eq!(floor_char_boundary(s, 6), 5);
        assert_eq!(floor_char_boundary(s, 100), s.len());
    }

    #[test]
    fn test_next_char_boundary() {
        let s = "a🎉b";
        assert_eq!(next_char_boundary(s, 0), Some(1));
        assert_eq!(next_char_boundary(s, 1), Some(5));
        assert_eq!(next_char_boundary(s, 6), None);
        assert_eq!(next_char_boundary(s, 2), None);
    }

    #[test]
    fn test_char_byte_roundtrip_ascii() {
        let s = "hello";
        assert_eq!(char_to_byte_index(s, 3), 3);
        assert_eq!(byte_to_char_index(s, 3), 3);
    }

    #[test]
    fn test_char_to_byte_multibyte() {
        let s = "中文abc";
        assert_eq!(char_to_byte_index(s, 0), 0);
        assert_eq!(char_to_byte_index(s, 1), 3);
        assert_eq!(char_to_byte_index(s, 2), 6);
        assert_eq!(char_to_byte_index(s, 99), s.len());
        assert_eq!(byte_to_char_index(s, 6), 2);
        assert_eq!(byte_to_char_index(s, 4), 1);
    }

    #[test]
    fn test_cursor_matches_direct_conversion() {
        let s = "ø 🎉 x 中 y";
        let mut cursor = CharOffsetCursor::new(s);
        for byte in [0, 2, 3, 7, 8, 9, 13, s.len()] {
            assert_eq!(cursor.char_index(byte), byte_to_char_index(s, byte));
        }
        // Going backwards restarts instead of underflowing
        assert_eq!(cursor.char_index(2), 1);
    }
}
