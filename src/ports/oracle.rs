/// Classification oracle port trait
///
/// Defines the contract for the external judgment service that answers
/// "which client owns this meeting". Implementations: Groq, etc.
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-meeting context sent with a domain-batch request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingContext {
    pub meeting_id: String,

    pub title: String,

    /// Brand extracted from the title, empty when none was found
    #[serde(default)]
    pub title_brand: String,

    /// External domains on this meeting, sorted
    #[serde(default)]
    pub external_domains: Vec<String>,

    /// Participant count per external domain
    #[serde(default)]
    pub participant_count_by_domain: BTreeMap<String, usize>,

    #[serde(default)]
    pub organizer_domain: String,

    #[serde(default)]
    pub host_domain: String,
}

/// One seed-domain batch to classify
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainBatchRequest {
    /// The shared external domain that grouped these meetings
    pub seed_domain: String,

    pub meetings: Vec<MeetingContext>,

    /// Domains the oracle must never pick as a client, sorted
    #[serde(default)]
    pub internal_domains: Vec<String>,

    /// Keywords marking the internal team in titles
    #[serde(default)]
    pub internal_keywords: Vec<String>,
}

/// Candidate assignment for one meeting, as judged within one batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateAssignment {
    pub meeting_id: String,

    /// The proposed client domain, `None` when the batch was ambiguous
    #[serde(default)]
    pub client_domain: Option<String>,

    /// Advisory only, logged but never used for acceptance
    #[serde(default)]
    pub confidence: Option<f32>,

    #[serde(default)]
    pub reasoning: String,
}

/// All candidate assignments produced for one seed-domain batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainBatchResponse {
    pub seed_domain: String,

    #[serde(default)]
    pub assignments: Vec<CandidateAssignment>,

    #[serde(default)]
    pub batch_reasoning: Option<String>,
}

impl DomainBatchResponse {
    /// A response carrying no candidates, used when a batch call fails
    pub fn empty(seed_domain: impl Into<String>) -> Self {
        Self {
            seed_domain: seed_domain.into(),
            assignments: Vec::new(),
            batch_reasoning: None,
        }
    }
}

/// Per-meeting context sent with a title-only request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleContext {
    pub meeting_id: String,

    pub title: String,

    #[serde(default)]
    pub title_brand: String,

    #[serde(default)]
    pub organizer_domain: String,

    #[serde(default)]
    pub host_domain: String,
}

/// A title-only classification request for domainless meetings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleBatchRequest {
    pub meetings: Vec<TitleContext>,

    /// When set, narrows the question to "does this meeting belong to X?"
    #[serde(default)]
    pub target_client: Option<String>,

    /// Domains already seen in this run, context only
    #[serde(default)]
    pub known_domains: Vec<String>,

    #[serde(default)]
    pub internal_domains: Vec<String>,

    #[serde(default)]
    pub internal_keywords: Vec<String>,
}

/// Title-based assignment for one domainless meeting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleAssignment {
    pub meeting_id: String,

    /// Known domain, when the title maps to one confidently
    #[serde(default)]
    pub client_domain: Option<String>,

    /// Brand name, when no domain is available
    #[serde(default)]
    pub client_name: Option<String>,

    /// Advisory only, logged but never used for acceptance
    #[serde(default)]
    pub confidence: Option<f32>,

    #[serde(default)]
    pub reasoning: String,
}

/// All title-based assignments for one request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleBatchResponse {
    #[serde(default)]
    pub assignments: Vec<TitleAssignment>,
}

/// Port trait for classification oracles
///
/// Calls are self-contained: the oracle holds no state across requests, and
/// a failed call only costs that request's assignments.
#[async_trait]
pub trait ClassificationOracle: Send + Sync {
    /// Judge the client for every meeting in one seed-domain batch
    async fn classify_domain_batch(
        &self,
        request: &DomainBatchRequest,
    ) -> Result<DomainBatchResponse>;

    /// Judge clients for domainless meetings from their titles alone
    async fn classify_titles(&self, request: &TitleBatchRequest) -> Result<TitleBatchResponse>;

    /// Get the provider name
    fn provider_name(&self) -> &str;

    /// Check if the service is configured (has API key)
    fn is_configured(&self) -> bool;
}
