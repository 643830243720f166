/// Port trait definitions (interfaces)
///
/// These traits define the contracts for adapters to implement.
/// Following the ports-and-adapters (hexagonal) architecture pattern.
pub mod oracle;

#[cfg(test)]
pub mod mocks;

pub use oracle::{
    CandidateAssignment, ClassificationOracle, DomainBatchRequest, DomainBatchResponse,
    MeetingContext, TitleAssignment, TitleBatchRequest, TitleBatchResponse, TitleContext,
};
