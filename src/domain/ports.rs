use super::events::DomainEvent;
use super::payment_request::{PaymentRequest, RequestId, UserRef};
use crate::error::Result;
use async_trait::async_trait;

/// Persistence for payment request aggregates.
///
/// `replace` is the only way to change a stored request and must be an
/// atomic compare-and-swap on the version.
#[async_trait]
pub trait PaymentRequestStore: Send + Sync {
    /// Stores a brand new request at version 0.
    async fn insert(&self, request: PaymentRequest) -> Result<()>;

    async fn get(&self, id: RequestId) -> Result<Option<PaymentRequest>>;

    /// Writes `request` if the stored copy is still at `expected_version`,
    /// returning what was stored (with the version bumped).
    ///
    /// Fails with `ConcurrencyConflict` if someone else wrote first.
    async fn replace(
        &self,
        request: PaymentRequest,
        expected_version: u64,
    ) -> Result<PaymentRequest>;

    async fn all_requests(&self) -> Result<Vec<PaymentRequest>>;

    /// Requests `user` created or participates in.
    async fn requests_involving(&self, user: &UserRef) -> Result<Vec<PaymentRequest>> {
        let mut requests = self.all_requests().await?;
        requests.retain(|r| r.involves(user));
        Ok(requests)
    }
}

pub type PaymentRequestStoreBox = Box<dyn PaymentRequestStore>;

/// Receives domain events as transitions are committed.
///
/// Called synchronously; delivery and fan-out belong to the implementation.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: DomainEvent);
}

pub type EventPublisherBox = Box<dyn EventPublisher>;
