//! Sliding-window text chunking
//!
//! Splits extracted page text into fixed-size overlapping segments for the
//! ingestion sink. The window is deterministic: segment i starts at
//! `i * (size - overlap)` and runs for `size` characters; the final segment
//! may be shorter. Windowing is over characters, never bytes, so multi-byte
//! text is never split mid-character.

/// Splits text into overlapping chunks
///
/// Requires `overlap < size` and `size > 0`; configurations are validated
/// at run start, so this function treats the invariant as given.
///
/// # Arguments
///
/// * `text` - The text to split
/// * `size` - Chunk size in characters
/// * `overlap` - Number of characters each chunk shares with its predecessor
///
/// # Returns
///
/// The ordered chunk sequence; empty input yields no chunks.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Vec<String> {
    debug_assert!(size > 0 && overlap < size);

    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let step = size - overlap;
    let mut chunks = Vec::new();
    let mut start = 0;

    loop {
        let end = usize::min(start + size, chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }

    chunks
}
