/// Domain models for the attribution pipeline
///
/// These models represent core business entities and are transport-agnostic.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One spoken sentence from a meeting transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sentence {
    #[serde(default)]
    pub speaker_id: Option<String>,

    #[serde(default)]
    pub speaker_name: Option<String>,

    #[serde(default)]
    pub text: String,

    /// Unprocessed text from the transcript source, used when `text` is empty
    #[serde(default)]
    pub raw_text: Option<String>,

    /// Seconds into the meeting
    #[serde(default)]
    pub start_time: Option<f64>,

    #[serde(default)]
    pub end_time: Option<f64>,
}

impl Sentence {
    /// The spoken text, falling back to the raw text when `text` is empty
    pub fn spoken_text(&self) -> &str {
        if !self.text.is_empty() {
            &self.text
        } else {
            self.raw_text.as_deref().unwrap_or("")
        }
    }
}

/// A named meeting attendee as reported by the transcript source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendee {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,
}

/// One meeting record from the transcript source
///
/// Immutable input to the pipeline; owned by the caller. Participant emails
/// may appear in both `participants` and `attendees`, so consumers take the
/// union.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub id: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub date: Option<DateTime<Utc>>,

    /// Participant email addresses
    #[serde(default)]
    pub participants: Vec<String>,

    /// Attendee records, which may duplicate entries in `participants`
    #[serde(default)]
    pub attendees: Vec<Attendee>,

    #[serde(default)]
    pub organizer_email: Option<String>,

    #[serde(default)]
    pub host_email: Option<String>,

    #[serde(default)]
    pub sentences: Vec<Sentence>,
}

impl Transcript {
    /// The title, or an empty string when the source provided none
    pub fn title_str(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// The title with the source's "Untitled" placeholder for missing values
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }
}

/// How a client assignment was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentSource {
    /// Won the deterministic tie-break over domain-batch candidates
    Domain,
    /// Title-only oracle pass returned a domain
    TitleDomain,
    /// Title-only oracle pass returned a brand name
    TitleBrand,
    /// Literal title-prefix bucket
    AmbiguousBucket,
}

impl std::fmt::Display for AssignmentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentSource::Domain => write!(f, "domain"),
            AssignmentSource::TitleDomain => write!(f, "title-domain"),
            AssignmentSource::TitleBrand => write!(f, "title-brand"),
            AssignmentSource::AmbiguousBucket => write!(f, "ambiguous-bucket"),
        }
    }
}

/// Final client attribution for one meeting
///
/// The pipeline produces at most one of these per transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientAssignment {
    pub meeting_id: String,

    /// Resolved client label (domain-derived, brand name, or bucket key)
    pub client: String,

    pub source: AssignmentSource,
}

/// The label part of a domain: everything before the first dot
pub fn domain_label(domain: &str) -> &str {
    match domain.find('.') {
        Some(index) => &domain[..index],
        None => domain,
    }
}

/// Client label for a domain, e.g. "everme.ai" becomes "Everme"
pub fn client_label_from_domain(domain: &str) -> String {
    title_case(domain_label(domain))
}

/// Title-case a label: the first letter of each alphabetic run uppercased,
/// the rest lowered ("croffle guys" -> "Croffle Guys", "king-street" ->
/// "King-Street")
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_alphabetic = false;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if prev_alphabetic {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alphabetic = true;
        } else {
            out.push(ch);
            prev_alphabetic = false;
        }
    }
    out
}
