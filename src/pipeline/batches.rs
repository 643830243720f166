//! Domain-centric batch building
//!
//! Groups transcripts by shared external domain. Each batch is keyed by its
//! seed domain and carries every transcript referencing that domain, so a
//! transcript with N external domains is judged N times and reconciled later
//! by the tie-break resolver.

use std::collections::BTreeMap;

use crate::domain::models::Transcript;
use crate::pipeline::signals::{email_domain, SignalExtractor};
use crate::ports::oracle::{DomainBatchRequest, MeetingContext};

/// Group transcripts into seed-domain batches.
///
/// Transcripts without any external domain appear in no batch; they are
/// picked up later by the title fallback.
pub fn build_domain_batches<'a>(
    transcripts: &'a [Transcript],
    extractor: &SignalExtractor,
) -> BTreeMap<String, Vec<&'a Transcript>> {
    let mut batches: BTreeMap<String, Vec<&'a Transcript>> = BTreeMap::new();
    for transcript in transcripts {
        for domain in extractor.external_domains(transcript) {
            batches.entry(domain).or_default().push(transcript);
        }
    }
    log::debug!(
        "Built {} domain batches from {} transcripts",
        batches.len(),
        transcripts.len()
    );
    batches
}

/// Turn every batch into a self-contained oracle request, ordered by seed domain
pub fn batch_requests(
    batches: &BTreeMap<String, Vec<&Transcript>>,
    extractor: &SignalExtractor,
) -> Vec<DomainBatchRequest> {
    let mut internal_domains: Vec<String> =
        extractor.internal_domains().iter().cloned().collect();
    internal_domains.sort();
    let internal_keywords = extractor.internal_keywords().to_vec();

    batches
        .iter()
        .map(|(seed_domain, transcripts)| DomainBatchRequest {
            seed_domain: seed_domain.clone(),
            meetings: transcripts
                .iter()
                .map(|transcript| meeting_context(transcript, extractor))
                .collect(),
            internal_domains: internal_domains.clone(),
            internal_keywords: internal_keywords.clone(),
        })
        .collect()
}

/// Build the per-meeting context the oracle judges a batch entry by
pub fn meeting_context(transcript: &Transcript, extractor: &SignalExtractor) -> MeetingContext {
    let externals = extractor.external_domains(transcript);

    let mut participant_count_by_domain: BTreeMap<String, usize> = BTreeMap::new();
    for participant in &transcript.participants {
        if let Some(domain) = email_domain(participant) {
            if externals.contains(&domain) {
                *participant_count_by_domain.entry(domain).or_insert(0) += 1;
            }
        }
    }

    MeetingContext {
        meeting_id: transcript.id.clone(),
        title: transcript.display_title().to_string(),
        title_brand: extractor
            .title_brand(transcript.title_str())
            .unwrap_or_default(),
        external_domains: externals.into_iter().collect(),
        participant_count_by_domain,
        organizer_domain: transcript
            .organizer_email
            .as_deref()
            .and_then(email_domain)
            .unwrap_or_default(),
        host_domain: transcript
            .host_email
            .as_deref()
            .and_then(email_domain)
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;

    fn extractor() -> SignalExtractor {
        let config = PipelineConfig {
            internal_domains: ["fruitbowldigital.com".to_string()].into_iter().collect(),
            internal_keywords: vec!["fbd".to_string()],
            ..PipelineConfig::default()
        };
        SignalExtractor::new(&config)
    }

    fn transcript(id: &str, title: &str, participants: &[&str]) -> Transcript {
        Transcript {
            id: id.to_string(),
            title: Some(title.to_string()),
            date: None,
            participants: participants.iter().map(|p| p.to_string()).collect(),
            attendees: Vec::new(),
            organizer_email: None,
            host_email: None,
            sentences: Vec::new(),
        }
    }

    #[test]
    fn test_every_domain_gets_a_batch() {
        let transcripts = vec![
            transcript("m1", "Alpha sync", &["a@alpha.io", "x@fruitbowldigital.com"]),
            transcript("m2", "Beta review", &["b@beta.io"]),
            transcript("m3", "Joint session", &["a@alpha.io", "b@beta.io"]),
        ];
        let batches = build_domain_batches(&transcripts, &extractor());

        assert_eq!(batches.len(), 2);
        let alpha: Vec<&str> = batches["alpha.io"].iter().map(|t| t.id.as_str()).collect();
        let beta: Vec<&str> = batches["beta.io"].iter().map(|t| t.id.as_str()).collect();
        assert_eq!(alpha, vec!["m1", "m3"]);
        assert_eq!(beta, vec!["m2", "m3"]);
    }

    #[test]
    fn test_domainless_transcripts_skip_batching() {
        let transcripts = vec![transcript("m1", "Internal retro", &["x@fruitbowldigital.com"])];
        assert!(build_domain_batches(&transcripts, &extractor()).is_empty());
    }

    #[test]
    fn test_meeting_context_counts_participants_per_domain() {
        let mut t = transcript(
            "m1",
            "Alpha x FBD",
            &["a@alpha.io", "b@alpha.io", "x@fruitbowldigital.com"],
        );
        t.organizer_email = Some("a@alpha.io".to_string());

        let context = meeting_context(&t, &extractor());
        assert_eq!(context.meeting_id, "m1");
        assert_eq!(context.title, "Alpha x FBD");
        assert_eq!(context.title_brand, "Alpha");
        assert_eq!(context.external_domains, vec!["alpha.io".to_string()]);
        assert_eq!(context.participant_count_by_domain["alpha.io"], 2);
        assert_eq!(context.organizer_domain, "alpha.io");
        assert_eq!(context.host_domain, "");
    }

    #[test]
    fn test_untitled_transcript_uses_placeholder_title() {
        let mut t = transcript("m1", "ignored", &["a@alpha.io"]);
        t.title = None;

        let context = meeting_context(&t, &extractor());
        assert_eq!(context.title, "Untitled");
        assert_eq!(context.title_brand, "");
    }

    #[test]
    fn test_batch_requests_carry_internal_config() {
        let transcripts = vec![transcript("m1", "Alpha sync", &["a@alpha.io"])];
        let ext = extractor();
        let batches = build_domain_batches(&transcripts, &ext);
        let requests = batch_requests(&batches, &ext);

        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].seed_domain, "alpha.io");
        assert_eq!(requests[0].meetings.len(), 1);
        assert_eq!(
            requests[0].internal_domains,
            vec!["fruitbowldigital.com".to_string()]
        );
        assert_eq!(requests[0].internal_keywords, vec!["fbd".to_string()]);
    }
}
