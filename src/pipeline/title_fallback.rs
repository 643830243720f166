//! Title-only classification for domainless meetings
//!
//! Meetings with no external domain carry nothing for the batch pipeline to
//! work with, so their titles go to the oracle directly. Generic mode accepts
//! a returned domain unconditionally and a bare brand name only under the
//! `allow_brand_only` policy; targeted mode answers "does this meeting belong
//! to X?" for a single client query. Confidence is logged, never gating.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::domain::models::{
    client_label_from_domain, title_case, AssignmentSource, ClientAssignment, Transcript,
};
use crate::pipeline::signals::{email_domain, SignalExtractor};
use crate::ports::oracle::{ClassificationOracle, TitleBatchRequest, TitleContext};

pub struct TitleFallbackClassifier {
    oracle: Arc<dyn ClassificationOracle>,
    allow_brand_only: bool,
    internal_domains: Vec<String>,
    internal_keywords: Vec<String>,
}

impl TitleFallbackClassifier {
    pub fn new(oracle: Arc<dyn ClassificationOracle>, config: &PipelineConfig) -> Self {
        let mut internal_domains: Vec<String> =
            config.internal_domains.iter().cloned().collect();
        internal_domains.sort();
        Self {
            oracle,
            allow_brand_only: config.allow_brand_only,
            internal_domains,
            internal_keywords: config.internal_keywords.clone(),
        }
    }

    /// Classify domainless meetings generically, one assignment per accepted
    /// meeting.
    ///
    /// A returned domain is always accepted and labeled from its domain; a
    /// bare brand name is accepted only when `allow_brand_only` is set.
    pub async fn classify_generic(
        &self,
        transcripts: &[&Transcript],
        extractor: &SignalExtractor,
        known_domains: &[String],
    ) -> Vec<ClientAssignment> {
        if transcripts.is_empty() {
            return Vec::new();
        }

        let request = self.request(transcripts, extractor, None, known_domains);
        log::info!(
            "Title fallback for {} domainless meetings",
            transcripts.len()
        );

        let answers = match self.oracle.classify_titles(&request).await {
            Ok(response) => by_meeting(response.assignments),
            Err(err) => {
                log::warn!("Title fallback call failed, keeping meetings unassigned: {}", err);
                return Vec::new();
            }
        };

        let mut assignments = Vec::new();
        for transcript in transcripts {
            let Some(answer) = answers.get(transcript.id.as_str()) else {
                continue;
            };
            if let Some(domain) = non_empty(answer.client_domain.as_deref()) {
                let client = client_label_from_domain(domain);
                log::info!(
                    "{} -> {} via title-domain (conf={:?})",
                    transcript.id,
                    client,
                    answer.confidence
                );
                assignments.push(ClientAssignment {
                    meeting_id: transcript.id.clone(),
                    client,
                    source: AssignmentSource::TitleDomain,
                });
            } else if let Some(name) =
                non_empty(answer.client_name.as_deref()).filter(|_| self.allow_brand_only)
            {
                let client = title_case(name);
                log::info!(
                    "{} -> {} via title-brand (accepted; confidence {:?} ignored)",
                    transcript.id,
                    client,
                    answer.confidence
                );
                assignments.push(ClientAssignment {
                    meeting_id: transcript.id.clone(),
                    client,
                    source: AssignmentSource::TitleBrand,
                });
            } else {
                log::info!(
                    "{} has no accepted title mapping (allow_brand_only={}, conf={:?})",
                    transcript.id,
                    self.allow_brand_only,
                    answer.confidence
                );
            }
        }
        assignments
    }

    /// Meeting ids among `transcripts` the oracle confirms as belonging to
    /// `target`.
    ///
    /// An answer counts only when its returned name or domain contains the
    /// target as a case-insensitive substring.
    pub async fn matching_target(
        &self,
        transcripts: &[&Transcript],
        extractor: &SignalExtractor,
        target: &str,
    ) -> Vec<String> {
        if transcripts.is_empty() {
            return Vec::new();
        }

        let request = self.request(transcripts, extractor, Some(target.to_string()), &[]);
        log::info!(
            "Targeted title check for {} domainless meetings (target '{}')",
            transcripts.len(),
            target
        );

        let answers = match self.oracle.classify_titles(&request).await {
            Ok(response) => by_meeting(response.assignments),
            Err(err) => {
                log::warn!("Targeted title call failed, keeping zero matches: {}", err);
                return Vec::new();
            }
        };

        let target_lower = target.to_lowercase();
        let mut matched = Vec::new();
        for transcript in transcripts {
            let Some(answer) = answers.get(transcript.id.as_str()) else {
                continue;
            };
            let name_hit = answer
                .client_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&target_lower));
            let domain_hit = answer
                .client_domain
                .as_deref()
                .is_some_and(|domain| domain.to_lowercase().contains(&target_lower));
            if name_hit || domain_hit {
                log::info!(
                    "{} matched target '{}' (name={:?} domain={:?})",
                    transcript.id,
                    target,
                    answer.client_name,
                    answer.client_domain
                );
                matched.push(transcript.id.clone());
            }
        }
        matched
    }

    fn request(
        &self,
        transcripts: &[&Transcript],
        extractor: &SignalExtractor,
        target_client: Option<String>,
        known_domains: &[String],
    ) -> TitleBatchRequest {
        TitleBatchRequest {
            meetings: transcripts
                .iter()
                .map(|transcript| title_context(transcript, extractor))
                .collect(),
            target_client,
            known_domains: known_domains.to_vec(),
            internal_domains: self.internal_domains.clone(),
            internal_keywords: self.internal_keywords.clone(),
        }
    }
}

fn title_context(transcript: &Transcript, extractor: &SignalExtractor) -> TitleContext {
    TitleContext {
        meeting_id: transcript.id.clone(),
        title: transcript.title_str().to_string(),
        title_brand: extractor
            .title_brand(transcript.title_str())
            .unwrap_or_default(),
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

fn by_meeting(
    assignments: Vec<crate::ports::oracle::TitleAssignment>,
) -> HashMap<String, crate::ports::oracle::TitleAssignment> {
    assignments
        .into_iter()
        .map(|assignment| (assignment.meeting_id.clone(), assignment))
        .collect()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
