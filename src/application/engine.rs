use crate::application::intake::RequestDraft;
use crate::config::EngineConfig;
use crate::domain::events::DomainEvent;
use crate::domain::payment_request::{
    NewPaymentRequest, ParticipantId, PaymentRequest, RequestId, UserRef,
};
use crate::domain::ports::{EventPublisherBox, PaymentRequestStoreBox};
use crate::domain::summary::{self, CreatorSummary, ParticipantSummary, RequestFilter, RequestPage};
use crate::error::{Result, SplitPayError};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// The main entry point for working with payment requests.
///
/// `PaymentRequestEngine` owns the store and the event publisher. Every
/// transition reads the current stored request, applies the domain
/// transition, and writes back with a version check. A lost race is retried
/// from a fresh read; every other failure leaves the store untouched. Events
/// are published only after the write succeeds.
pub struct PaymentRequestEngine {
    store: PaymentRequestStoreBox,
    events: EventPublisherBox,
    config: EngineConfig,
}

impl PaymentRequestEngine {
    /// Creates a new `PaymentRequestEngine` instance.
    ///
    /// # Arguments
    ///
    /// * `store` - Where payment requests are persisted.
    /// * `events` - Receives domain events for committed transitions.
    /// * `config` - Split step and conflict retry budget.
    pub fn new(
        store: PaymentRequestStoreBox,
        events: EventPublisherBox,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            events,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validates and stores a new request in `draft`.
    pub async fn create(&self, new: NewPaymentRequest) -> Result<PaymentRequest> {
        let (request, event) = PaymentRequest::create(new, Utc::now())?;
        self.store.insert(request.clone()).await?;
        info!(
            request_id = %request.id(),
            total = request.total_amount().value(),
            participants = request.participants().len(),
            "Created payment request"
        );
        self.events.publish(event);
        Ok(request)
    }

    /// Resolves a draft as entered (phones, shares) and creates it.
    pub async fn create_from_draft(&self, draft: RequestDraft) -> Result<PaymentRequest> {
        let new = draft.resolve(self.config.round_to)?;
        self.create(new).await
    }

    pub async fn send(&self, id: RequestId) -> Result<PaymentRequest> {
        self.transition(id, "send", |request, now| {
            request.send(now).map(|event| vec![event])
        })
        .await
    }

    pub async fn mark_participant_paid(
        &self,
        id: RequestId,
        participant_id: ParticipantId,
        external_transaction_ref: Option<String>,
    ) -> Result<PaymentRequest> {
        self.transition(id, "mark_participant_paid", |request, now| {
            request.mark_participant_paid(participant_id, external_transaction_ref.clone(), now)
        })
        .await
    }

    pub async fn cancel(&self, id: RequestId) -> Result<PaymentRequest> {
        self.transition(id, "cancel", |request, now| {
            request.cancel(now).map(|event| vec![event])
        })
        .await
    }

    /// Replaces participant shares while the request is still a draft.
    pub async fn reallocate(&self, id: RequestId, amounts: Vec<u64>) -> Result<PaymentRequest> {
        self.transition(id, "reallocate", |request, _| {
            request.reallocate(&amounts).map(|()| Vec::new())
        })
        .await
    }

    pub async fn get(&self, id: RequestId) -> Result<PaymentRequest> {
        self.store
            .get(id)
            .await?
            .ok_or(SplitPayError::RequestNotFound(id))
    }

    /// Requests `user` created or participates in, filtered and paginated.
    pub async fn list_requests(&self, user: &UserRef, filter: &RequestFilter) -> Result<RequestPage> {
        let requests = self.store.requests_involving(user).await?;
        Ok(summary::paginate(requests, filter))
    }

    pub async fn creator_summary(&self, user: &UserRef) -> Result<CreatorSummary> {
        let requests = self.store.requests_involving(user).await?;
        Ok(CreatorSummary::for_creator(user, &requests))
    }

    pub async fn participant_summary(&self, user: &UserRef) -> Result<ParticipantSummary> {
        let requests = self.store.requests_involving(user).await?;
        Ok(ParticipantSummary::for_participant(user, &requests))
    }

    /// Consumes the engine and returns every stored request, oldest first.
    pub async fn into_results(self) -> Result<Vec<PaymentRequest>> {
        let mut requests = self.store.all_requests().await?;
        requests.sort_by_key(|r| (r.created_at(), r.id()));
        Ok(requests)
    }

    async fn transition<F>(
        &self,
        id: RequestId,
        operation: &'static str,
        apply: F,
    ) -> Result<PaymentRequest>
    where
        F: Fn(&mut PaymentRequest, DateTime<Utc>) -> Result<Vec<DomainEvent>> + Send + Sync,
    {
        let mut attempt = 0;
        loop {
            let mut request = self.get(id).await?;
            let expected_version = request.version();
            let events = apply(&mut request, Utc::now())?;

            match self.store.replace(request, expected_version).await {
                Ok(stored) => {
                    info!(
                        request_id = %id,
                        operation,
                        status = %stored.status(),
                        version = stored.version(),
                        "Applied transition"
                    );
                    for event in events {
                        self.events.publish(event);
                    }
                    return Ok(stored);
                }
                Err(e) if e.is_retryable() && attempt < self.config.max_conflict_retries => {
                    attempt += 1;
                    debug!(request_id = %id, operation, attempt, "Retrying after conflict: {}", e);
                }
                Err(e) => {
                    if e.is_retryable() {
                        warn!(request_id = %id, operation, attempt, "Giving up after conflicts");
                    }
                    return Err(e);
                }
            }
        }
    }
}
