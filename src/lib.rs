//! Client attribution and segmentation for meeting transcripts.
//!
//! Feed the pipeline a set of transcripts and it attributes each one to at
//! most one client: external-domain batches judged by a classification
//! oracle, a deterministic tie-break across batches, a title-only fallback
//! for domainless meetings, and an optional literal-title bucket for whatever
//! remains. A character-window chunker prepares transcript text for
//! embedding and indexing.
//!
//! The oracle is a port. [`adapters::oracle::GroqOracle`] is the bundled
//! implementation; tests script their own.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod pipeline;
pub mod ports;

pub use config::PipelineConfig;
pub use domain::models::{
    AssignmentSource, Attendee, ClientAssignment, Sentence, Transcript,
};
pub use error::{PipelineError, Result};
pub use pipeline::{AttributionPipeline, Chunk};
pub use ports::oracle::ClassificationOracle;
