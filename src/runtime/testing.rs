//! Mock implementations for testing
//!
//! These mocks enable integration testing without real I/O.

use super::traits::*;
use crate::gateway::{DataUri, RemovalError, StoreDetails, StoreError};
use crate::llm::{GenerateRequest, GenerateResponse, GenerativeService, LlmError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

// ============================================================================
// Mock Generative Service
// ============================================================================

/// Mock generative service that returns queued responses
pub struct MockGenerativeService {
    responses: Mutex<VecDeque<Result<GenerateResponse, LlmError>>>,
    model_id: String,
    /// Record of all requests made
    requests: Mutex<Vec<GenerateRequest>>,
}

impl MockGenerativeService {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            model_id: model_id.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response
    pub fn queue_response(&self, response: GenerateResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    /// Queue an error response
    pub fn queue_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeService for MockGenerativeService {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock response queued")))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// ============================================================================
// Mock Image Gateway
// ============================================================================

/// Image gateway that answers from a queue and counts calls
pub struct MockImageGateway {
    results: Mutex<VecDeque<Result<DataUri, RemovalError>>>,
    calls: AtomicUsize,
}

impl MockImageGateway {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn queue_result(&self, result: Result<DataUri, RemovalError>) {
        self.results.lock().unwrap().push_back(result);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next(&self) -> Result<DataUri, RemovalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock result queued").into()))
    }
}

#[async_trait]
impl ImageGateway for MockImageGateway {
    async fn remove_background(
        &self,
        _image_base64: &str,
        _mime_type: &str,
    ) -> Result<DataUri, RemovalError> {
        self.next()
    }
}

/// Image gateway with configurable delay (for in-flight testing)
pub struct DelayedImageGateway {
    inner: MockImageGateway,
    delay: Duration,
    /// Notified when a call starts (for test synchronization)
    pub request_started: Arc<Notify>,
}

impl DelayedImageGateway {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MockImageGateway::new(),
            delay,
            request_started: Arc::new(Notify::new()),
        }
    }

    pub fn queue_result(&self, result: Result<DataUri, RemovalError>) {
        self.inner.queue_result(result);
    }

    pub fn call_count(&self) -> usize {
        self.inner.call_count()
    }
}

#[async_trait]
impl ImageGateway for DelayedImageGateway {
    async fn remove_background(
        &self,
        _image_base64: &str,
        _mime_type: &str,
    ) -> Result<DataUri, RemovalError> {
        // Stores a permit, so a waiter arriving late still wakes
        self.request_started.notify_one();
        tokio::time::sleep(self.delay).await;
        self.inner.next()
    }
}

// ============================================================================
// Mock Store Gateway
// ============================================================================

/// Store gateway that answers from a queue and counts calls
pub struct MockStoreGateway {
    results: Mutex<VecDeque<Result<StoreDetails, StoreError>>>,
    calls: AtomicUsize,
}

impl MockStoreGateway {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn queue_result(&self, result: Result<StoreDetails, StoreError>) {
        self.results.lock().unwrap().push_back(result);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoreGateway for MockStoreGateway {
    async fn fetch_store_data(&self) -> Result<StoreDetails, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(StoreError::EmptyStructuredOutput))
    }
}
