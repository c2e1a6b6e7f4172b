//! Text chunking with configurable size and overlap.

/// One window of a source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkWindow {
    /// Ordinal among kept windows of the document
    pub position: u32,
    /// Char offset where the window starts
    pub start: usize,
    /// Char offset one past the window's last char
    pub end: usize,
    /// Trimmed window text
    pub text: String,
}

/// Chunk text into overlapping windows.
///
/// Sizes are counted in chars, so a window never splits a code point. The next window
/// starts `overlap` chars before the end of the previous one; when the overlap is not
/// smaller than the window the step is clamped to one char. Windows that trim to
/// nothing are dropped and do not count toward `max_chunks`.
pub fn chunk_text(
    text: &str,
    chunk_size: usize,
    overlap: usize,
    max_chunks: usize,
) -> Vec<ChunkWindow> {
    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();
    let mut chunks = Vec::new();

    if total == 0 || chunk_size == 0 || max_chunks == 0 {
        return chunks;
    }

    let step = chunk_size.saturating_sub(overlap).max(1);
    let mut start = 0;

    loop {
        let end = (start + chunk_size).min(total);
        let window: String = chars[start..end].iter().collect();
        let trimmed = window.trim();

        if !trimmed.is_empty() {
            if chunks.len() == max_chunks {
                tracing::warn!(
                    "Chunk cap of {} reached at char {}, discarding the remaining {} chars",
                    max_chunks,
                    start,
                    total - start
                );
                break;
            }
            chunks.push(ChunkWindow {
                position: chunks.len() as u32,
                start,
                end,
                text: trimmed.to_string(),
            });
        }

        if end >= total {
            break;
        }
        start += step;
    }

    tracing::debug!(
        "Chunked text into {} chunks (size: {}, overlap: {})",
        chunks.len(),
        chunk_size,
        overlap
    );

    chunks
}
