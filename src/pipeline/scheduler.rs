//! Concurrent dispatch of domain batches
//!
//! Fans batch requests out to the oracle under a concurrency cap and gathers
//! every result before returning. Tie-breaking depends on seeing the complete
//! result set, so the scheduler never surfaces partial results.

use std::sync::Arc;

use futures_util::stream::{self, StreamExt};

use crate::ports::oracle::{ClassificationOracle, DomainBatchRequest, DomainBatchResponse};

pub struct BatchScheduler {
    oracle: Arc<dyn ClassificationOracle>,
    max_concurrency: usize,
}

impl BatchScheduler {
    pub fn new(oracle: Arc<dyn ClassificationOracle>, max_concurrency: usize) -> Self {
        Self {
            oracle,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Dispatch every request with at most `max_concurrency` in flight.
    ///
    /// A failed call degrades to an empty response for its seed domain. It is
    /// logged, never retried, and never aborts sibling batches.
    pub async fn run(&self, requests: Vec<DomainBatchRequest>) -> Vec<DomainBatchResponse> {
        if requests.is_empty() {
            return Vec::new();
        }

        log::info!(
            "Dispatching {} domain batches (max {} concurrent) to {}",
            requests.len(),
            self.max_concurrency,
            self.oracle.provider_name()
        );

        let responses: Vec<DomainBatchResponse> =
            stream::iter(requests.into_iter().map(|request| {
                let oracle = Arc::clone(&self.oracle);
                async move {
                    let seed_domain = request.seed_domain.clone();
                    match oracle.classify_domain_batch(&request).await {
                        Ok(response) => {
                            log::debug!(
                                "Batch {} returned {} assignments",
                                seed_domain,
                                response.assignments.len()
                            );
                            response
                        }
                        Err(err) => {
                            log::warn!(
                                "Batch {} failed, keeping zero candidates: {}",
                                seed_domain,
                                err
                            );
                            DomainBatchResponse::empty(seed_domain)
                        }
                    }
                }
            }))
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;

        log::info!("All {} domain batches settled", responses.len());
        responses
    }
}
