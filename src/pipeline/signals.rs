//! Client signal extraction
//!
//! Derives the two raw signals attribution works from: the set of external
//! email domains on a meeting, and a brand name pulled out of the title.
//! Extraction never fails; absent signal is an empty set or `None`.

use std::collections::{BTreeSet, HashSet};

use crate::config::PipelineConfig;
use crate::domain::models::Transcript;

/// Public email providers that never identify a client
pub const PUBLIC_PROVIDERS: [&str; 11] = [
    "gmail.com",
    "outlook.com",
    "yahoo.com",
    "hotmail.com",
    "icloud.com",
    "aol.com",
    "protonmail.com",
    "mail.com",
    "live.com",
    "msn.com",
    "ymail.com",
];

/// Separators scanned in order when splitting a two-sided title
/// (e.g. "Acme x FBD Sync")
pub const TITLE_SEPARATORS: [&str; 6] = [" x ", " X ", " <> ", " | ", " \u{2013} ", " - "];

/// Raw attribution signals for one transcript
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetingSignals {
    /// Normalized lowercase external domains, deterministically ordered
    pub external_domains: BTreeSet<String>,

    /// Brand name extracted from the title, if any
    pub title_brand: Option<String>,
}

/// Extracts external domains and title brands from transcripts.
///
/// Holds the internal-organization configuration so callers only pass the
/// transcript under inspection.
#[derive(Debug, Clone)]
pub struct SignalExtractor {
    internal_domains: HashSet<String>,
    internal_emails: HashSet<String>,
    internal_keywords: Vec<String>,
}

impl SignalExtractor {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            internal_domains: config
                .internal_domains
                .iter()
                .map(|d| d.trim().to_lowercase())
                .collect(),
            internal_emails: config
                .internal_emails
                .iter()
                .map(|e| e.trim().to_lowercase())
                .collect(),
            internal_keywords: config
                .internal_keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Extract both signals for one transcript
    pub fn extract(&self, transcript: &Transcript) -> MeetingSignals {
        MeetingSignals {
            external_domains: self.external_domains(transcript),
            title_brand: self.title_brand(transcript.title_str()),
        }
    }

    /// Collect the external (non-internal, non-public-provider) email domains
    /// referenced by a transcript's participants, attendees, organizer and
    /// host.
    ///
    /// A domain is dropped entirely when any email aliasing it is listed as an
    /// internal address, so a team member on a client-looking domain does not
    /// turn that domain into a client signal.
    pub fn external_domains(&self, transcript: &Transcript) -> BTreeSet<String> {
        let emails = collect_emails(transcript);

        let mut domains = BTreeSet::new();
        for email in &emails {
            if let Some(domain) = email_domain(email) {
                if !self.internal_domains.contains(&domain) && !is_public_provider(&domain) {
                    domains.insert(domain);
                }
            }
        }

        for email in &emails {
            if self.internal_emails.contains(email.as_str()) {
                if let Some(domain) = email_domain(email) {
                    domains.remove(&domain);
                }
            }
        }

        domains
    }

    /// Pull a brand name out of a meeting title.
    ///
    /// Two-sided titles split on the first matching separator keep the side
    /// without an internal keyword; one-sided titles keep the text before the
    /// first colon. Empty and "untitled" titles carry no brand.
    pub fn title_brand(&self, title: &str) -> Option<String> {
        let trimmed = title.trim();
        if trimmed.is_empty() || trimmed.to_lowercase().starts_with("untitled") {
            return None;
        }

        for separator in TITLE_SEPARATORS {
            if let Some((left, right)) = trimmed.split_once(separator) {
                let side = if self.contains_internal_keyword(left) {
                    right
                } else {
                    left
                };
                return clean_brand(side);
            }
        }
        clean_brand(trimmed)
    }

    /// True when any configured internal keyword appears in `text`
    pub fn contains_internal_keyword(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.internal_keywords
            .iter()
            .any(|keyword| lowered.contains(keyword))
    }

    pub fn internal_domains(&self) -> &HashSet<String> {
        &self.internal_domains
    }

    pub fn internal_keywords(&self) -> &[String] {
        &self.internal_keywords
    }
}

/// The normalized domain of an email address, or `None` without an `@`
pub fn email_domain(email: &str) -> Option<String> {
    let mut parts = email.split('@');
    parts.next()?;
    let domain = parts.next()?.trim().to_lowercase();
    if domain.is_empty() {
        None
    } else {
        Some(domain)
    }
}

fn is_public_provider(domain: &str) -> bool {
    PUBLIC_PROVIDERS.iter().any(|provider| *provider == domain)
}

/// Strip everything from the first colon onward and trim what remains
fn clean_brand(side: &str) -> Option<String> {
    let brand = match side.split_once(':') {
        Some((before, _)) => before,
        None => side,
    };
    let brand = brand.trim();
    if brand.is_empty() {
        None
    } else {
        Some(brand.to_string())
    }
}

/// All unique email addresses on a transcript, lowercased and trimmed
fn collect_emails(transcript: &Transcript) -> BTreeSet<String> {
    let mut emails = BTreeSet::new();
    {
        let mut push = |value: &str| {
            let email = value.trim().to_lowercase();
            if email.contains('@') {
                emails.insert(email);
            }
        };

        for participant in &transcript.participants {
            push(participant);
        }
        for attendee in &transcript.attendees {
            if let Some(email) = &attendee.email {
                push(email);
            }
        }
        if let Some(email) = &transcript.organizer_email {
            push(email);
        }
        if let Some(email) = &transcript.host_email {
            push(email);
        }
    }
    emails
}
