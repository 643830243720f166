//! Fixed-size overlapping text chunking
//!
//! Splits formatted transcript text into windows suitable for embedding and
//! indexing. Boundaries are a pure function of `(text, chunk_size, overlap)`,
//! measured in characters so multi-byte text never splits mid-codepoint.

pub const DEFAULT_CHUNK_SIZE: usize = 2500;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// One chunk of transcript text, positioned within the full sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    pub index: usize,
    pub total: usize,
}

impl Chunk {
    /// Stable storage identifier for this chunk of the given meeting.
    pub fn record_id(&self, meeting_id: &str) -> String {
        format!("meeting_{}#chunk_{}", meeting_id, self.index)
    }
}

/// Split `text` into overlapping windows of at most `chunk_size` characters.
///
/// Windows that are whitespace-only after trimming are skipped; kept windows
/// are returned verbatim. An `overlap >= chunk_size` is clamped to a quarter
/// of the chunk size so the window always advances.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    if text.is_empty() || chunk_size == 0 {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= chunk_size {
        return vec![text.to_string()];
    }

    let overlap = if overlap >= chunk_size {
        chunk_size / 4
    } else {
        overlap
    };
    let step = chunk_size - overlap;

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        let window: String = chars[start..end].iter().collect();
        if !window.trim().is_empty() {
            chunks.push(window);
        }
        start += step;
    }
    chunks
}

/// Chunk `text` and wrap each window with its index and the total count.
pub fn chunks(text: &str, chunk_size: usize, overlap: usize) -> Vec<Chunk> {
    let windows = chunk_text(text, chunk_size, overlap);
    let total = windows.len();
    windows
        .into_iter()
        .enumerate()
        .map(|(index, text)| Chunk { text, index, total })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_yields_no_chunks() {
        assert!(chunk_text("", DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP).is_empty());
    }

    #[test]
    fn test_short_text_is_a_single_chunk() {
        let text = "short transcript";
        let out = chunk_text(text, DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP);
        assert_eq!(out, vec![text.to_string()]);
    }

    #[test]
    fn test_default_sizes_split_3000_chars_into_two_chunks() {
        let text: String = ('a'..='z').cycle().take(3000).collect();
        let out = chunk_text(&text, 2500, 200);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].chars().count(), 2500);
        let expected_second: String = text.chars().skip(2300).collect();
        assert_eq!(out[1], expected_second);
    }

    #[test]
    fn test_overlap_clamped_when_too_large() {
        let text: String = ('a'..='z').cycle().take(40).collect();
        // overlap 20 >= chunk_size 10, clamps to 2, so step is 8
        let out = chunk_text(&text, 10, 20);
        assert_eq!(out.len(), 5);
        assert_eq!(out[0], text.chars().take(10).collect::<String>());
        assert_eq!(
            out[1],
            text.chars().skip(8).take(10).collect::<String>()
        );
    }

    #[test]
    fn test_whitespace_only_windows_are_skipped() {
        let text = "hello     world";
        let out = chunk_text(text, 5, 0);
        assert_eq!(out, vec!["hello".to_string(), "world".to_string()]);
    }

    #[test]
    fn test_chunking_is_deterministic() {
        let text: String = "speaker one said things ".repeat(300);
        let first = chunk_text(&text, 2500, 200);
        let second = chunk_text(&text, 2500, 200);
        assert_eq!(first, second);
    }

    #[test]
    fn test_overlap_reconstructs_original_text() {
        let text: String = ('a'..='z').cycle().take(1000).collect();
        let size = 300;
        let overlap = 50;
        let out = chunk_text(&text, size, overlap);

        let mut rebuilt: String = out[0].clone();
        for chunk in &out[1..] {
            rebuilt.extend(chunk.chars().skip(overlap));
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_multibyte_text_splits_on_char_boundaries() {
        let text: String = "héllo wörld ".repeat(50);
        let out = chunk_text(&text, 100, 10);
        assert!(!out.is_empty());
        for chunk in &out {
            assert!(chunk.chars().count() <= 100);
        }
    }

    #[test]
    fn test_chunks_carry_index_and_total() {
        let text: String = ('a'..='z').cycle().take(3000).collect();
        let out = chunks(&text, 2500, 200);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].index, 0);
        assert_eq!(out[1].index, 1);
        assert!(out.iter().all(|c| c.total == 2));
        assert_eq!(out[0].record_id("42"), "meeting_42#chunk_0");
        assert_eq!(out[1].record_id("42"), "meeting_42#chunk_1");
    }
}
