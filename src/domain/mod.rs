/// Domain layer - core business models
///
/// These models are platform-agnostic and represent core business entities.
pub mod models;
pub mod text;

pub use models::{
    client_label_from_domain, domain_label, AssignmentSource, Attendee, ClientAssignment,
    Sentence, Transcript,
};
pub use text::{format_transcript_text, merge_consecutive_sentences};
