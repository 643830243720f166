//! Transcript text cleanup and formatting
//!
//! Merges consecutive messages from the same speaker to reduce redundancy,
//! and renders the line-per-speaker text that chunking and indexing consume.

use crate::domain::models::{Sentence, Transcript};

/// Merge consecutive sentences spoken by the same speaker into one.
///
/// Blank sentences are dropped; merged text is joined with single spaces. The
/// first sentence of each run keeps its speaker and timing fields.
pub fn merge_consecutive_sentences(sentences: &[Sentence]) -> Vec<Sentence> {
    let mut cleaned: Vec<Sentence> = Vec::new();

    for sentence in sentences {
        let text = sentence.spoken_text().trim();
        if text.is_empty() {
            continue;
        }

        let same_speaker = cleaned
            .last()
            .map(|prev| prev.speaker_id == sentence.speaker_id)
            .unwrap_or(false);

        if same_speaker {
            // Guarded by the check above
            if let Some(current) = cleaned.last_mut() {
                current.text.push(' ');
                current.text.push_str(text);
                current.end_time = sentence.end_time.or(current.end_time);
            }
        } else {
            let mut merged = sentence.clone();
            merged.text = text.to_string();
            merged.raw_text = None;
            cleaned.push(merged);
        }
    }

    log::debug!(
        "Merged {} sentences into {} cleaned sentences",
        sentences.len(),
        cleaned.len()
    );
    cleaned
}

/// Format a transcript as one `Speaker: text` line per sentence.
///
/// With `clean` set, consecutive same-speaker sentences are merged first.
/// Returns an empty string when the transcript carries no spoken content.
pub fn format_transcript_text(transcript: &Transcript, clean: bool) -> String {
    let owned;
    let sentences: &[Sentence] = if clean {
        owned = merge_consecutive_sentences(&transcript.sentences);
        &owned
    } else {
        &transcript.sentences
    };

    let mut lines: Vec<String> = Vec::with_capacity(sentences.len());
    for sentence in sentences {
        let text = sentence.spoken_text().trim();
        if text.is_empty() {
            continue;
        }
        let speaker = sentence.speaker_name.as_deref().unwrap_or("Unknown Speaker");
        lines.push(format!("{}: {}", speaker, text));
    }

    if lines.is_empty() {
        log::warn!("No transcript content found for transcript {}", transcript.id);
        return String::new();
    }
    lines.join("\n")
}
