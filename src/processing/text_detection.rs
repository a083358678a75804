// src/processing/text_detection.rs

use crate::constants::BINARY_SNIFF_WINDOW;
use content_inspector::ContentType;

/// Checks whether the head of a byte buffer looks like text.
///
/// Only the first [`BINARY_SNIFF_WINDOW`] bytes are inspected. A null byte in
/// that window marks the buffer as binary, as do UTF-16/UTF-32 byte-order marks
/// (their lossy UTF-8 rendering would be garbage).
///
/// # Examples
/// ```
/// use sential::processing::is_likely_text;
///
/// assert!(is_likely_text(b"# Title\n\nSome prose."));
/// assert!(!is_likely_text(b"PK\x03\x04\0\0zipped"));
///
/// // Bytes past the window are not inspected.
/// let mut late_null = vec![b'a'; 2048];
/// late_null[1500] = 0;
/// assert!(is_likely_text(&late_null));
/// ```
pub fn is_likely_text(buffer: &[u8]) -> bool {
    let head = &buffer[..buffer.len().min(BINARY_SNIFF_WINDOW)];
    matches!(
        content_inspector::inspect(head),
        ContentType::UTF_8 | ContentType::UTF_8_BOM
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_utf8_text() {
        assert!(is_likely_text(b"This is plain UTF-8 text."));
    }

    #[test]
    fn test_detect_utf8_bom_text() {
        assert!(is_likely_text(&[0xEF, 0xBB, 0xBF, b'h', b'i']));
    }

    #[test]
    fn test_detect_null_byte() {
        assert!(!is_likely_text(b"Binary data with a \0 null byte."));
    }

    #[test]
    fn test_detect_png_header() {
        assert!(!is_likely_text(&[
            0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00
        ]));
    }

    #[test]
    fn test_empty_buffer_is_text() {
        assert!(is_likely_text(b""));
    }

    #[test]
    fn test_null_inside_window_is_binary() {
        let mut buffer = vec![b'x'; 4096];
        buffer[BINARY_SNIFF_WINDOW - 1] = 0;
        assert!(!is_likely_text(&buffer));
    }
}
