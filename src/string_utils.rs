//! UTF-16 Offset Utilities
//!
//! Hosts hand us selection offsets counted the way a browser textarea counts
//! them: in UTF-16 code units. Rust strings are UTF-8, so every offset has to
//! be translated to a byte index before slicing, and results translated back.
//!
//! # Problem
//! Characters like `ø` or `中` are one UTF-16 unit but several UTF-8 bytes.
//! Characters outside the BMP like `🎉` are two UTF-16 units (a surrogate
//! pair) and four UTF-8 bytes. A host offset can even point *between* the two
//! halves of a surrogate pair.
//!
//! # Solution
//! Use `utf16_to_byte_floor()` / `utf16_to_byte_ceil()` to map host offsets to
//! byte indices that sit on character boundaries, and `byte_to_utf16_index()`
//! to map back.
//!
//! # Example
//! ```ignore
//! use crate::string_utils::{utf16_len, utf16_to_byte_floor};
//!
//! let text = "Hi🎉!";
//! assert_eq!(utf16_len(text), 5);
//! assert_eq!(utf16_to_byte_floor(text, 3), 2); // inside 🎉, floors to its start
//! ```

// ─────────────────────────────────────────────────────────────────────────────
// Character Boundary Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the largest index that is less than or equal to `index`
/// and is on a UTF-8 character boundary.
///
/// If `index` is greater than the string length, returns the string length.
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    if index == 0 {
        return 0;
    }

    let bytes = s.as_bytes();
    let mut i = index;
    while i > 0 && !is_utf8_char_start(bytes[i]) {
        i -= 1;
    }
    i
}

/// Returns the smallest index that is greater than or equal to `index`
/// and is on a UTF-8 character boundary.
///
/// If `index` is greater than or equal to the string length, returns the string length.
#[inline]
pub fn ceil_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    if index == 0 {
        return 0;
    }

    let bytes = s.as_bytes();
    let mut i = index;
    while i < bytes.len() && !is_utf8_char_start(bytes[i]) {
        i += 1;
    }
    i
}

/// A byte is a char start if it's NOT a continuation byte (10xxxxxx).
#[inline]
fn is_utf8_char_start(byte: u8) -> bool {
    (byte & 0b11000000) != 0b10000000
}

// ─────────────────────────────────────────────────────────────────────────────
// UTF-16 Offset Conversion
// ─────────────────────────────────────────────────────────────────────────────

/// Length of a string in UTF-16 code units.
#[inline]
pub fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// Convert a UTF-16 offset to a byte index, rounding down.
///
/// An offset inside a surrogate pair maps to the start of that character.
/// Offsets past the end map to `s.len()`.
pub fn utf16_to_byte_floor(s: &str, index: usize) -> usize {
    let mut units = 0;
    for (byte, ch) in s.char_indices() {
        let next = units + ch.len_utf16();
        if next > index {
            return byte;
        }
        units = next;
    }
    s.len()
}

/// Convert a UTF-16 offset to a byte index, rounding up.
///
/// An offset inside a surrogate pair maps to the end of that character.
/// Offsets past the end map to `s.len()`.
pub fn utf16_to_byte_ceil(s: &str, index: usize) -> usize {
    let mut units = 0;
    for (byte, ch) in s.char_indices() {
        if units >= index {
            return byte;
        }
        units += ch.len_utf16();
    }
    s.len()
}

/// Convert a byte index to a UTF-16 offset.
///
/// A byte index in the middle of a character counts up to (but not
/// including) that character.
pub fn byte_to_utf16_index(s: &str, byte_index: usize) -> usize {
    let byte_index = floor_char_boundary(s, byte_index);
    utf16_len(&s[..byte_index])
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
