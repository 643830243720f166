//! Last-resort title-prefix bucketing
//!
//! Deterministic, oracle-free grouping for meetings nothing else could
//! attribute. Any titled, non-internal meeting lands in a bucket named by the
//! text before the first colon of its title.

use crate::pipeline::signals::SignalExtractor;

/// Bucket key for one title, or `None` when the meeting must stay unassigned.
///
/// Empty titles, "untitled" placeholders and titles mentioning an internal
/// keyword are never bucketed.
pub fn bucket_key(title: &str, extractor: &SignalExtractor) -> Option<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() || trimmed.to_lowercase().starts_with("untitled") {
        return None;
    }
    if extractor.contains_internal_keyword(trimmed) {
        return None;
    }

    let key = match trimmed.split_once(':') {
        Some((before, _)) => before,
        None => trimmed,
    };
    let key = key.trim();
    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;

    fn extractor() -> SignalExtractor {
        let config = PipelineConfig {
            internal_keywords: vec!["fruitbowl".to_string(), "fbd".to_string()],
            ..PipelineConfig::default()
        };
        SignalExtractor::new(&config)
    }

    #[test]
    fn test_title_prefix_becomes_bucket() {
        assert_eq!(
            bucket_key("Croffle Guys: sprint recap", &extractor()),
            Some("Croffle Guys".to_string())
        );
        assert_eq!(
            bucket_key("Quarterly planning", &extractor()),
            Some("Quarterly planning".to_string())
        );
    }

    #[test]
    fn test_untitled_and_empty_are_never_bucketed() {
        assert_eq!(bucket_key("", &extractor()), None);
        assert_eq!(bucket_key("   ", &extractor()), None);
        assert_eq!(bucket_key("Untitled Meeting", &extractor()), None);
        assert_eq!(bucket_key("untitled", &extractor()), None);
    }

    #[test]
    fn test_internal_titles_are_never_bucketed() {
        assert_eq!(bucket_key("Fruitbowl standup", &extractor()), None);
        assert_eq!(bucket_key("FBD retro: week 12", &extractor()), None);
    }

    #[test]
    fn test_colon_only_title_yields_nothing() {
        assert_eq!(bucket_key(": notes", &extractor()), None);
    }
}
