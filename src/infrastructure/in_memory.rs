use crate::domain::payment_request::{PaymentRequest, RequestId};
use crate::domain::ports::PaymentRequestStore;
use crate::error::{Result, SplitPayError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for payment requests.
///
/// Uses `Arc<RwLock<HashMap<RequestId, PaymentRequest>>>` so clones share
/// the same data. `replace` compares and writes under a single write guard.
#[derive(Default, Clone)]
pub struct InMemoryPaymentRequestStore {
    requests: Arc<RwLock<HashMap<RequestId, PaymentRequest>>>,
}

impl InMemoryPaymentRequestStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentRequestStore for InMemoryPaymentRequestStore {
    async fn insert(&self, request: PaymentRequest) -> Result<()> {
        let mut requests = self.requests.write().await;
        if requests.contains_key(&request.id()) {
            return Err(SplitPayError::InternalError(
                format!("Payment request {} already exists", request.id()).into(),
            ));
        }
        requests.insert(request.id(), request.with_version(0));
        Ok(())
    }

    async fn get(&self, id: RequestId) -> Result<Option<PaymentRequest>> {
        let requests = self.requests.read().await;
        Ok(requests.get(&id).cloned())
    }

    async fn replace(
        &self,
        request: PaymentRequest,
        expected_version: u64,
    ) -> Result<PaymentRequest> {
        let mut requests = self.requests.write().await;
        let current = requests
            .get(&request.id())
            .ok_or(SplitPayError::RequestNotFound(request.id()))?;

        if current.version() != expected_version {
            return Err(SplitPayError::ConcurrencyConflict {
                request: request.id(),
                expected: expected_version,
                found: current.version(),
            });
        }

        let stored = request.with_version(expected_version + 1);
        requests.insert(stored.id(), stored.clone());
        Ok(stored)
    }

    async fn all_requests(&self) -> Result<Vec<PaymentRequest>> {
        let requests = self.requests.read().await;
        Ok(requests.values().cloned().collect())
    }
}
