//! Deterministic tie-breaking across batch results
//!
//! A transcript with N external domains is judged in N batches and can come
//! back with N different candidate assignments. The resolver reconciles them
//! with a pure lexicographic score so the winner never depends on batch
//! completion order.

use std::collections::HashMap;

use crate::domain::models::{domain_label, Transcript};
use crate::pipeline::signals::email_domain;
use crate::ports::oracle::{CandidateAssignment, DomainBatchResponse};

/// Score tuple compared lexicographically, greatest wins:
/// title match, organizer match, recurring-domain flag, then the domain
/// string itself as the final deterministic tie-break.
type Score = (u8, u8, u8, String);

/// Pick at most one winning candidate per meeting.
///
/// Candidates for meeting ids outside `transcripts` are ignored. Responses
/// are folded in seed-domain order, so equal scores keep the candidate from
/// the lexicographically first batch no matter when each batch settled.
pub fn resolve(
    responses: &[DomainBatchResponse],
    transcripts: &[Transcript],
) -> HashMap<String, CandidateAssignment> {
    let meetings: HashMap<&str, &Transcript> =
        transcripts.iter().map(|t| (t.id.as_str(), t)).collect();

    let domain_freq = domain_frequencies(responses);

    let mut ordered: Vec<&DomainBatchResponse> = responses.iter().collect();
    ordered.sort_by(|a, b| a.seed_domain.cmp(&b.seed_domain));

    let mut best: HashMap<String, (Score, CandidateAssignment)> = HashMap::new();
    let mut candidate_counts: HashMap<String, usize> = HashMap::new();

    for response in ordered {
        for assignment in &response.assignments {
            let Some(transcript) = meetings.get(assignment.meeting_id.as_str()) else {
                log::debug!(
                    "Ignoring candidate for unknown meeting {} from batch {}",
                    assignment.meeting_id,
                    response.seed_domain
                );
                continue;
            };
            *candidate_counts
                .entry(assignment.meeting_id.clone())
                .or_insert(0) += 1;

            let score = score_candidate(assignment, transcript, &domain_freq);
            let replace = match best.get(&assignment.meeting_id) {
                Some((current, _)) => score > *current,
                None => true,
            };
            if replace {
                best.insert(assignment.meeting_id.clone(), (score, assignment.clone()));
            }
        }
    }

    for (meeting_id, count) in &candidate_counts {
        if *count > 1 {
            if let Some((_, winner)) = best.get(meeting_id) {
                log::info!(
                    "Meeting {} had {} candidates, resolved to {:?} (conf={:?})",
                    meeting_id,
                    count,
                    winner.client_domain,
                    winner.confidence
                );
            }
        }
    }

    best.into_iter()
        .map(|(meeting_id, (_, assignment))| (meeting_id, assignment))
        .collect()
}

/// How often each domain was proposed anywhere in the run
fn domain_frequencies(responses: &[DomainBatchResponse]) -> HashMap<String, usize> {
    let mut freq: HashMap<String, usize> = HashMap::new();
    for response in responses {
        for assignment in &response.assignments {
            if let Some(domain) = assignment.client_domain.as_deref() {
                if !domain.is_empty() {
                    *freq.entry(domain.to_string()).or_insert(0) += 1;
                }
            }
        }
    }
    freq
}

fn score_candidate(
    candidate: &CandidateAssignment,
    transcript: &Transcript,
    domain_freq: &HashMap<String, usize>,
) -> Score {
    let domain = candidate.client_domain.as_deref().unwrap_or("");
    let title = transcript.title_str().to_lowercase();
    let organizer_domain = transcript
        .organizer_email
        .as_deref()
        .and_then(email_domain)
        .unwrap_or_default();

    let label = domain_label(domain).to_lowercase();
    let title_match = u8::from(!label.is_empty() && title.contains(&label));
    let organizer_match = u8::from(!domain.is_empty() && organizer_domain == domain);
    let frequency_match = u8::from(domain_freq.get(domain).copied().unwrap_or(0) >= 1);

    (title_match, organizer_match, frequency_match, domain.to_string())
}
