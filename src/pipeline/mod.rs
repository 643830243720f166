/// Attribution pipeline - stages and orchestration
///
/// Control flow: signal extraction feeds domain batches, batches fan out to
/// the oracle under a concurrency cap, the resolver reconciles candidates
/// deterministically, the title fallback handles domainless meetings, and the
/// ambiguous bucketer sweeps up whatever remains. Chunking runs independently
/// per transcript once attribution is settled.
pub mod batches;
pub mod bucketer;
pub mod chunker;
pub mod resolver;
pub mod scheduler;
pub mod signals;
pub mod title_fallback;

pub use chunker::{chunk_text, chunks, Chunk, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
pub use scheduler::BatchScheduler;
pub use signals::{MeetingSignals, SignalExtractor};
pub use title_fallback::TitleFallbackClassifier;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::domain::models::{
    client_label_from_domain, AssignmentSource, ClientAssignment, Transcript,
};
use crate::domain::text::format_transcript_text;
use crate::error::{PipelineError, Result};
use crate::pipeline::signals::email_domain;
use crate::ports::oracle::ClassificationOracle;

/// The full client-attribution pipeline over one set of transcripts.
///
/// Construction validates the configuration; a bad configuration is the only
/// hard error this type surfaces. Everything that goes wrong per batch or per
/// meeting during a run is logged and degrades to "unassigned".
pub struct AttributionPipeline {
    config: PipelineConfig,
    signals: SignalExtractor,
    scheduler: BatchScheduler,
    fallback: TitleFallbackClassifier,
}

impl std::fmt::Debug for AttributionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributionPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AttributionPipeline {
    pub fn new(config: PipelineConfig, oracle: Arc<dyn ClassificationOracle>) -> Result<Self> {
        config.validate()?;
        let signals = SignalExtractor::new(&config);
        let scheduler = BatchScheduler::new(Arc::clone(&oracle), config.max_concurrency);
        let fallback = TitleFallbackClassifier::new(oracle, &config);
        Ok(Self {
            config,
            signals,
            scheduler,
            fallback,
        })
    }

    /// Attribute every transcript to at most one client.
    ///
    /// Stages run in order: domain batches through the oracle, deterministic
    /// tie-breaking, title fallback for domainless meetings, then the
    /// optional ambiguous bucket. A transcript assigned by one stage is
    /// invisible to the stages after it.
    pub async fn assign_clients(&self, transcripts: &[Transcript]) -> Vec<ClientAssignment> {
        if transcripts.is_empty() {
            return Vec::new();
        }
        log::info!("Assigning clients for {} transcripts", transcripts.len());

        let domain_batches = batches::build_domain_batches(transcripts, &self.signals);
        let known_domains: Vec<String> = domain_batches.keys().cloned().collect();
        let requests = batches::batch_requests(&domain_batches, &self.signals);
        let responses = self.scheduler.run(requests).await;
        let resolved = resolver::resolve(&responses, transcripts);

        let mut assignments: Vec<ClientAssignment> = Vec::new();
        for transcript in transcripts {
            let Some(candidate) = resolved.get(&transcript.id) else {
                continue;
            };
            let Some(domain) = candidate
                .client_domain
                .as_deref()
                .filter(|domain| !domain.is_empty())
            else {
                log::warn!(
                    "No client for {} title='{}'",
                    transcript.id,
                    transcript.display_title()
                );
                continue;
            };
            let client = client_label_from_domain(domain);
            log::info!(
                "{} -> {} via domain (conf={:?})",
                transcript.id,
                client,
                candidate.confidence
            );
            assignments.push(ClientAssignment {
                meeting_id: transcript.id.clone(),
                client,
                source: AssignmentSource::Domain,
            });
        }

        let assigned: HashSet<String> =
            assignments.iter().map(|a| a.meeting_id.clone()).collect();
        let domainless: Vec<&Transcript> = transcripts
            .iter()
            .filter(|t| !assigned.contains(&t.id))
            .filter(|t| self.signals.external_domains(t).is_empty())
            .collect();
        let title_assignments = self
            .fallback
            .classify_generic(&domainless, &self.signals, &known_domains)
            .await;
        assignments.extend(title_assignments);

        if self.config.include_ambiguous_bucket {
            let assigned: HashSet<String> =
                assignments.iter().map(|a| a.meeting_id.clone()).collect();
            for transcript in transcripts {
                if assigned.contains(&transcript.id) {
                    continue;
                }
                let Some(bucket) = bucketer::bucket_key(transcript.title_str(), &self.signals)
                else {
                    continue;
                };
                log::info!("{} -> {} (title bucket)", transcript.id, bucket);
                assignments.push(ClientAssignment {
                    meeting_id: transcript.id.clone(),
                    client: bucket,
                    source: AssignmentSource::AmbiguousBucket,
                });
            }
        }

        log::info!(
            "Assigned {} of {} transcripts",
            assignments.len(),
            transcripts.len()
        );
        assignments
    }

    /// Group transcripts by resolved client label.
    ///
    /// Unassigned transcripts appear in no group.
    pub async fn group_by_client(
        &self,
        transcripts: &[Transcript],
    ) -> HashMap<String, Vec<Transcript>> {
        let assignments = self.assign_clients(transcripts).await;
        let by_id: HashMap<&str, &Transcript> =
            transcripts.iter().map(|t| (t.id.as_str(), t)).collect();

        let mut groups: HashMap<String, Vec<Transcript>> = HashMap::new();
        for assignment in &assignments {
            if let Some(transcript) = by_id.get(assignment.meeting_id.as_str()) {
                groups
                    .entry(assignment.client.clone())
                    .or_default()
                    .push((*transcript).clone());
            }
        }

        log::info!(
            "Grouped {} transcripts into {} unique clients",
            transcripts.len(),
            groups.len()
        );
        for (client, list) in &groups {
            log::info!("  - {}: {} meeting(s)", client, list.len());
        }
        groups
    }

    /// Keep only transcripts matching one client query.
    ///
    /// Step 1 is a direct search over titles and domains; step 2, when
    /// `use_oracle` is set, asks the oracle about domainless meetings the
    /// direct search missed. No bucketing applies here, this path is a
    /// stricter filter than [`assign_clients`](Self::assign_clients).
    pub async fn filter_for_client(
        &self,
        transcripts: &[Transcript],
        client_query: &str,
        use_oracle: bool,
    ) -> Result<Vec<Transcript>> {
        let query = client_query.trim();
        if query.is_empty() {
            return Err(PipelineError::InvalidInput(
                "client query is empty".to_string(),
            ));
        }
        if transcripts.is_empty() {
            return Ok(Vec::new());
        }
        let query_lower = query.to_lowercase();

        let mut kept: Vec<Transcript> = Vec::new();
        let mut kept_ids: HashSet<String> = HashSet::new();
        for transcript in transcripts {
            if let Some(reason) = self.direct_match(transcript, &query_lower) {
                log::info!("{} matched '{}' via {}", transcript.id, query, reason);
                kept_ids.insert(transcript.id.clone());
                kept.push(transcript.clone());
            }
        }
        log::info!(
            "Direct search for '{}' matched {} of {} transcripts",
            query,
            kept.len(),
            transcripts.len()
        );

        if use_oracle {
            let remaining: Vec<&Transcript> = transcripts
                .iter()
                .filter(|t| !kept_ids.contains(&t.id))
                .filter(|t| self.signals.external_domains(t).is_empty())
                .collect();
            if !remaining.is_empty() {
                let matched: HashSet<String> = self
                    .fallback
                    .matching_target(&remaining, &self.signals, query)
                    .await
                    .into_iter()
                    .collect();
                for transcript in remaining {
                    if matched.contains(&transcript.id) {
                        kept.push(transcript.clone());
                    }
                }
            }
        }

        log::info!("Total matches for '{}': {}", query, kept.len());
        Ok(kept)
    }

    /// Chunk one transcript's cleaned text for storage and indexing
    pub fn chunk_for_indexing(&self, transcript: &Transcript) -> Vec<Chunk> {
        let text = format_transcript_text(transcript, true);
        chunker::chunks(&text, self.config.chunk_size, self.config.chunk_overlap)
    }

    fn direct_match(&self, transcript: &Transcript, query: &str) -> Option<&'static str> {
        if transcript.title_str().to_lowercase().contains(query) {
            return Some("title");
        }
        for domain in self.signals.external_domains(transcript) {
            if domain.contains(query) || query.contains(&domain) {
                return Some("external domain");
            }
        }
        if let Some(domain) = transcript.organizer_email.as_deref().and_then(email_domain) {
            if domain.contains(query) || query.contains(&domain) {
                return Some("organizer domain");
            }
        }
        if let Some(domain) = transcript.host_email.as_deref().and_then(email_domain) {
            if domain.contains(query) || query.contains(&domain) {
                return Some("host domain");
            }
        }
        None
    }
}
