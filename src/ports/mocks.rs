//! Mock implementations for testing

use crate::error::{PipelineError, Result};
use crate::ports::oracle::{
    ClassificationOracle, DomainBatchRequest, DomainBatchResponse, TitleAssignment,
    TitleBatchRequest, TitleBatchResponse,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted oracle for testing
///
/// Returns canned responses keyed by seed domain (batches) and meeting id
/// (titles), can fail on demand, and records every call so tests can assert
/// on fan-out and the concurrency cap.
#[derive(Clone, Default)]
pub struct ScriptedOracle {
    batch_responses: Arc<Mutex<HashMap<String, DomainBatchResponse>>>,
    title_responses: Arc<Mutex<HashMap<String, TitleAssignment>>>,
    failing_seeds: Arc<Mutex<HashSet<String>>>,
    fail_titles: Arc<AtomicBool>,
    delay: Arc<Mutex<Option<Duration>>>,
    batch_calls: Arc<Mutex<Vec<String>>>,
    title_requests: Arc<Mutex<Vec<TitleBatchRequest>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canned response for one seed-domain batch
    pub fn stub_batch(&self, response: DomainBatchResponse) {
        self.batch_responses
            .lock()
            .unwrap()
            .insert(response.seed_domain.clone(), response);
    }

    /// Canned title assignment, returned whenever its meeting id is asked about
    pub fn stub_title(&self, assignment: TitleAssignment) {
        self.title_responses
            .lock()
            .unwrap()
            .insert(assignment.meeting_id.clone(), assignment);
    }

    /// Make every batch call for this seed domain fail
    pub fn fail_seed(&self, seed_domain: &str) {
        self.failing_seeds
            .lock()
            .unwrap()
            .insert(seed_domain.to_string());
    }

    /// Make every title call fail
    pub fn fail_titles(&self) {
        self.fail_titles.store(true, Ordering::SeqCst);
    }

    /// Hold every batch call open for `delay` before answering
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Seed domains in the order batch calls arrived
    pub fn batch_calls(&self) -> Vec<String> {
        self.batch_calls.lock().unwrap().clone()
    }

    /// Every title request received
    pub fn title_requests(&self) -> Vec<TitleBatchRequest> {
        self.title_requests.lock().unwrap().clone()
    }

    /// Highest number of batch calls observed in flight at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClassificationOracle for ScriptedOracle {
    async fn classify_domain_batch(
        &self,
        request: &DomainBatchRequest,
    ) -> Result<DomainBatchResponse> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        self.batch_calls
            .lock()
            .unwrap()
            .push(request.seed_domain.clone());

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self
            .failing_seeds
            .lock()
            .unwrap()
            .contains(&request.seed_domain)
        {
            return Err(PipelineError::Oracle(format!(
                "scripted failure for {}",
                request.seed_domain
            )));
        }

        let stubbed = self
            .batch_responses
            .lock()
            .unwrap()
            .get(&request.seed_domain)
            .cloned();
        Ok(stubbed.unwrap_or_else(|| DomainBatchResponse::empty(&request.seed_domain)))
    }

    async fn classify_titles(&self, request: &TitleBatchRequest) -> Result<TitleBatchResponse> {
        self.title_requests.lock().unwrap().push(request.clone());

        if self.fail_titles.load(Ordering::SeqCst) {
            return Err(PipelineError::Oracle("scripted title failure".to_string()));
        }

        let responses = self.title_responses.lock().unwrap();
        let assignments = request
            .meetings
            .iter()
            .filter_map(|meeting| responses.get(&meeting.meeting_id).cloned())
            .collect();
        Ok(TitleBatchResponse { assignments })
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn is_configured(&self) -> bool {
        true
    }
}
