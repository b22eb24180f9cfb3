use super::amount::Amount;
use super::events::DomainEvent;
use super::phone::PhoneNumber;
use crate::error::{Result, SplitPayError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const MAX_TITLE_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 1000;

macro_rules! uuid_id {
    ($name:ident, $what:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = SplitPayError;

            fn from_str(s: &str) -> Result<Self> {
                Uuid::parse_str(s.trim()).map(Self).map_err(|e| {
                    SplitPayError::ValidationError(format!("Invalid {} '{}': {}", $what, s, e))
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

uuid_id!(RequestId, "payment request id");
uuid_id!(ParticipantId, "participant id");

/// Opaque reference to an identity owned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRef(String);

impl UserRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserRef {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for UserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Draft,
    Sent,
    Completed,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = SplitPayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "sent" => Ok(Self::Sent),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(SplitPayError::ValidationError(format!(
                "Unknown request status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantStatus {
    Pending,
    Paid,
    Cancelled,
}

impl ParticipantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for one participant of a new payment request.
///
/// `name` and `phone` are a snapshot of the contact at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewParticipant {
    pub user_ref: UserRef,
    pub name: String,
    pub phone: PhoneNumber,
    pub amount: u64,
}

/// Input for [`PaymentRequest::create`].
///
/// Amounts are already resolved by the caller, either explicitly or through
/// the split allocator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPaymentRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub total_amount: u64,
    pub created_by: UserRef,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub participants: Vec<NewParticipant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    id: ParticipantId,
    user_ref: UserRef,
    name: String,
    phone: PhoneNumber,
    amount: Amount,
    status: ParticipantStatus,
    paid_at: Option<DateTime<Utc>>,
    external_transaction_ref: Option<String>,
}

impl Participant {
    pub fn id(&self) -> ParticipantId {
        self.id
    }

    pub fn user_ref(&self) -> &UserRef {
        &self.user_ref
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn status(&self) -> ParticipantStatus {
        self.status
    }

    pub fn paid_at(&self) -> Option<DateTime<Utc>> {
        self.paid_at
    }

    pub fn external_transaction_ref(&self) -> Option<&str> {
        self.external_transaction_ref.as_deref()
    }

    pub fn is_paid(&self) -> bool {
        self.status == ParticipantStatus::Paid
    }
}

/// A request for money from a fixed set of participants.
///
/// The aggregate enforces its own invariants: at least one participant,
/// every share at least 1, shares summing to `total_amount`, and status
/// `completed` exactly when every participant has paid. Transitions are
/// computed in full before anything is mutated, so a failed call leaves
/// the request untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    id: RequestId,
    title: String,
    description: Option<String>,
    total_amount: Amount,
    created_by: UserRef,
    participants: Vec<Participant>,
    status: RequestStatus,
    due_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    sent_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    cancelled_at: Option<DateTime<Utc>>,
    /// Optimistic concurrency token, owned by the store.
    version: u64,
}

impl PaymentRequest {
    /// Validates the input and builds a request in `draft`.
    pub fn create(new: NewPaymentRequest, now: DateTime<Utc>) -> Result<(Self, DomainEvent)> {
        let title = new.title.trim().to_string();
        if title.is_empty() {
            return Err(SplitPayError::validation("Payment title is required"));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(SplitPayError::ValidationError(format!(
                "Title cannot exceed {MAX_TITLE_LEN} characters"
            )));
        }

        let description = new
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        if description
            .as_ref()
            .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LEN)
        {
            return Err(SplitPayError::ValidationError(format!(
                "Description cannot exceed {MAX_DESCRIPTION_LEN} characters"
            )));
        }

        let total_amount = Amount::new(new.total_amount)
            .map_err(|_| SplitPayError::validation("Total amount must be greater than 0"))?;

        if new.participants.is_empty() {
            return Err(SplitPayError::validation(
                "At least one participant is required",
            ));
        }

        let mut seen = HashSet::new();
        let mut participants = Vec::with_capacity(new.participants.len());
        for (index, p) in new.participants.into_iter().enumerate() {
            let name = p.name.trim().to_string();
            if name.is_empty() {
                return Err(SplitPayError::ValidationError(format!(
                    "Participant #{index} name is required"
                )));
            }
            if !seen.insert(p.user_ref.clone()) {
                return Err(SplitPayError::ValidationError(format!(
                    "Participant {} is listed more than once",
                    p.user_ref
                )));
            }
            let amount = Amount::new(p.amount).map_err(|_| {
                SplitPayError::ValidationError(format!(
                    "Participant {} amount must be greater than 0",
                    p.user_ref
                ))
            })?;

            participants.push(Participant {
                id: ParticipantId::new(),
                user_ref: p.user_ref,
                name,
                phone: p.phone,
                amount,
                status: ParticipantStatus::Pending,
                paid_at: None,
                external_transaction_ref: None,
            });
        }

        let shares: Vec<Amount> = participants.iter().map(|p| p.amount).collect();
        ensure_sum(&shares, total_amount)?;

        let request = Self {
            id: RequestId::new(),
            title,
            description,
            total_amount,
            created_by: new.created_by,
            participants,
            status: RequestStatus::Draft,
            due_date: new.due_date,
            created_at: now,
            sent_at: None,
            completed_at: None,
            cancelled_at: None,
            version: 0,
        };
        let event = DomainEvent::RequestCreated {
            request_id: request.id,
            amount: request.total_amount.value(),
        };
        Ok((request, event))
    }

    /// `draft -> sent`. Not idempotent: a second send is rejected.
    pub fn send(&mut self, now: DateTime<Utc>) -> Result<DomainEvent> {
        if self.status != RequestStatus::Draft {
            return Err(self.invalid_state("send"));
        }
        self.status = RequestStatus::Sent;
        self.sent_at = Some(now);
        Ok(DomainEvent::RequestSent {
            request_id: self.id,
            amount: self.total_amount.value(),
        })
    }

    /// Marks one participant `paid`, completing the request once nobody is
    /// left unpaid.
    ///
    /// Returns the `participant_paid` event, followed by `request_completed`
    /// when this payment settles the request.
    pub fn mark_participant_paid(
        &mut self,
        participant_id: ParticipantId,
        external_transaction_ref: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Vec<DomainEvent>> {
        let index = self
            .participants
            .iter()
            .position(|p| p.id == participant_id)
            .ok_or(SplitPayError::ParticipantNotFound {
                request: self.id,
                participant: participant_id,
            })?;

        if self.status != RequestStatus::Sent {
            return Err(self.invalid_state("mark a participant paid"));
        }

        let participant = &mut self.participants[index];
        if participant.status != ParticipantStatus::Pending {
            return Err(SplitPayError::InvalidState {
                entity: format!("participant {}", participant.id),
                actual: participant.status.to_string(),
                operation: "mark paid",
            });
        }

        participant.status = ParticipantStatus::Paid;
        participant.paid_at = Some(now);
        if let Some(reference) = external_transaction_ref
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
        {
            participant.external_transaction_ref = Some(reference);
        }

        let mut events = vec![DomainEvent::ParticipantPaid {
            request_id: self.id,
            participant_id,
            amount: participant.amount.value(),
            external_transaction_ref: participant.external_transaction_ref.clone(),
        }];

        if self.participants.iter().all(Participant::is_paid) {
            self.status = RequestStatus::Completed;
            self.completed_at = Some(now);
            events.push(DomainEvent::RequestCompleted {
                request_id: self.id,
                amount: self.total_amount.value(),
            });
        }

        Ok(events)
    }

    /// `draft | sent -> cancelled`. Pending participants are cancelled with
    /// the request; paid ones stay paid.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<DomainEvent> {
        if self.status.is_terminal() {
            return Err(self.invalid_state("cancel"));
        }
        self.status = RequestStatus::Cancelled;
        self.cancelled_at = Some(now);
        for participant in &mut self.participants {
            if participant.status == ParticipantStatus::Pending {
                participant.status = ParticipantStatus::Cancelled;
            }
        }
        Ok(DomainEvent::RequestCancelled {
            request_id: self.id,
            amount: self.total_amount.value(),
        })
    }

    /// Replaces every participant's share, in participant order.
    ///
    /// Only allowed in `draft`; the total itself never changes.
    pub fn reallocate(&mut self, amounts: &[u64]) -> Result<()> {
        if self.status != RequestStatus::Draft {
            return Err(self.invalid_state("change participant amounts"));
        }
        if amounts.len() != self.participants.len() {
            return Err(SplitPayError::ValidationError(format!(
                "Expected {} amounts, got {}",
                self.participants.len(),
                amounts.len()
            )));
        }

        let shares = amounts
            .iter()
            .map(|&a| Amount::new(a))
            .collect::<Result<Vec<_>>>()?;
        ensure_sum(&shares, self.total_amount)?;

        for (participant, share) in self.participants.iter_mut().zip(shares) {
            participant.amount = share;
        }
        Ok(())
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn total_amount(&self) -> Amount {
        self.total_amount
    }

    pub fn created_by(&self) -> &UserRef {
        &self.created_by
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        self.sent_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn cancelled_at(&self) -> Option<DateTime<Utc>> {
        self.cancelled_at
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns the request carrying `version`. Reserved for store adapters.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn participant_for(&self, user: &UserRef) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.user_ref == user)
    }

    /// True if `user` created the request or owes a share of it.
    pub fn involves(&self, user: &UserRef) -> bool {
        &self.created_by == user || self.participant_for(user).is_some()
    }

    pub fn total_paid(&self) -> u64 {
        self.participants
            .iter()
            .filter(|p| p.is_paid())
            .map(|p| p.amount.value())
            .sum()
    }

    pub fn outstanding(&self) -> u64 {
        self.total_amount.value() - self.total_paid()
    }

    pub fn paid_count(&self) -> usize {
        self.participants.iter().filter(|p| p.is_paid()).count()
    }

    /// Share of participants that have paid, in whole percent, rounded half up.
    pub fn completion_percentage(&self) -> u8 {
        let n = self.participants.len();
        if n == 0 {
            return 0;
        }
        ((self.paid_count() * 200 + n) / (2 * n)) as u8
    }

    fn invalid_state(&self, operation: &'static str) -> SplitPayError {
        SplitPayError::InvalidState {
            entity: format!("payment request {}", self.id),
            actual: self.status.to_string(),
            operation,
        }
    }
}

fn ensure_sum(shares: &[Amount], total: Amount) -> Result<()> {
    let sum = shares
        .iter()
        .try_fold(0u64, |acc, a| acc.checked_add(a.value()))
        .ok_or_else(|| SplitPayError::validation("Participant amounts overflow"))?;
    if sum != total.value() {
        return Err(SplitPayError::ValidationError(format!(
            "Participant amounts sum to {sum}, expected total {total}"
        )));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Duration;

    pub(crate) fn participant(user: &str, phone: &str, amount: u64) -> NewParticipant {
        NewParticipant {
            user_ref: UserRef::new(user),
            name: user.to_uppercase(),
            phone: PhoneNumber::parse(phone).unwrap(),
            amount,
        }
    }

    pub(crate) fn new_request(total: u64, amounts: &[u64]) -> NewPaymentRequest {
        NewPaymentRequest {
            title: "Dinner".to_string(),
            description: Some("Friday night".to_string()),
            total_amount: total,
            created_by: UserRef::new("admin"),
            due_date: None,
            participants: amounts
                .iter()
                .enumerate()
                .map(|(i, &a)| participant(&format!("user-{i}"), &format!("09{i:08}"), a))
                .collect(),
        }
    }

    fn sent_request(amounts: &[u64]) -> PaymentRequest {
        let total = amounts.iter().sum();
        let (mut request, _) = PaymentRequest::create(new_request(total, amounts), Utc::now()).unwrap();
        request.send(Utc::now()).unwrap();
        request
    }

    #[test]
    fn test_create_starts_in_draft() {
        let now = Utc::now();
        let (request, event) = PaymentRequest::create(new_request(1000, &[500, 500]), now).unwrap();

        assert_eq!(request.status(), RequestStatus::Draft);
        assert_eq!(request.created_at(), now);
        assert_eq!(request.sent_at(), None);
        assert_eq!(request.version(), 0);
        assert!(
            request
                .participants()
                .iter()
                .all(|p| p.status() == ParticipantStatus::Pending)
        );
        assert_eq!(
            event,
            DomainEvent::RequestCreated {
                request_id: request.id(),
                amount: 1000
            }
        );
    }

    #[test]
    fn test_create_rejects_sum_mismatch() {
        let result = PaymentRequest::create(new_request(1000, &[450, 450]), Utc::now());
        assert!(matches!(result, Err(SplitPayError::ValidationError(_))));
    }

    #[test]
    fn test_create_rejects_bad_input() {
        let cases = [
            new_request(0, &[]),
            new_request(1000, &[]),
            new_request(1000, &[1000, 0]),
            NewPaymentRequest {
                title: "   ".to_string(),
                ..new_request(1000, &[1000])
            },
            NewPaymentRequest {
                title: "x".repeat(201),
                ..new_request(1000, &[1000])
            },
            NewPaymentRequest {
                description: Some("d".repeat(1001)),
                ..new_request(1000, &[1000])
            },
        ];
        for new in cases {
            assert!(matches!(
                PaymentRequest::create(new, Utc::now()),
                Err(SplitPayError::ValidationError(_))
            ));
        }
    }

    #[test]
    fn test_create_rejects_duplicate_participant() {
        let mut new = new_request(1000, &[500, 500]);
        new.participants[1].user_ref = new.participants[0].user_ref.clone();
        assert!(matches!(
            PaymentRequest::create(new, Utc::now()),
            Err(SplitPayError::ValidationError(_))
        ));
    }

    #[test]
    fn test_create_trims_text() {
        let new = NewPaymentRequest {
            title: "  Rent  ".to_string(),
            description: Some("   ".to_string()),
            ..new_request(1000, &[1000])
        };
        let (request, _) = PaymentRequest::create(new, Utc::now()).unwrap();
        assert_eq!(request.title(), "Rent");
        assert_eq!(request.description(), None);
    }

    #[test]
    fn test_send_twice_rejected() {
        let (mut request, _) = PaymentRequest::create(new_request(1000, &[1000]), Utc::now()).unwrap();
        let first = Utc::now();
        request.send(first).unwrap();

        let result = request.send(first + Duration::seconds(5));
        assert!(matches!(result, Err(SplitPayError::InvalidState { .. })));
        assert_eq!(request.sent_at(), Some(first));
        assert_eq!(request.status(), RequestStatus::Sent);
    }

    #[test]
    fn test_lifecycle_happy_path() {
        let mut request = sent_request(&[500, 500]);
        let a = request.participants()[0].id();
        let b = request.participants()[1].id();

        let events = request
            .mark_participant_paid(a, Some("MOMO-1".to_string()), Utc::now())
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(request.status(), RequestStatus::Sent);
        assert_eq!(request.participant(a).unwrap().status(), ParticipantStatus::Paid);
        assert_eq!(request.participant(b).unwrap().status(), ParticipantStatus::Pending);
        assert_eq!(
            request.participant(a).unwrap().external_transaction_ref(),
            Some("MOMO-1")
        );
        assert_eq!(request.total_paid(), 500);
        assert_eq!(request.outstanding(), 500);
        assert_eq!(request.completion_percentage(), 50);

        let done = Utc::now();
        let events = request.mark_participant_paid(b, None, done).unwrap();
        assert_eq!(request.status(), RequestStatus::Completed);
        assert_eq!(request.completed_at(), Some(done));
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], DomainEvent::RequestCompleted { amount: 1000, .. }));
        assert_eq!(request.completion_percentage(), 100);
    }

    #[test]
    fn test_paying_twice_rejected() {
        let mut request = sent_request(&[300, 700]);
        let a = request.participants()[0].id();
        request.mark_participant_paid(a, None, Utc::now()).unwrap();
        let before = request.clone();

        let result = request.mark_participant_paid(a, None, Utc::now());
        assert!(matches!(result, Err(SplitPayError::InvalidState { .. })));
        assert_eq!(request, before);
    }

    #[test]
    fn test_pay_requires_sent() {
        let (mut draft, _) = PaymentRequest::create(new_request(1000, &[1000]), Utc::now()).unwrap();
        let id = draft.participants()[0].id();
        assert!(matches!(
            draft.mark_participant_paid(id, None, Utc::now()),
            Err(SplitPayError::InvalidState { .. })
        ));

        let mut completed = sent_request(&[1000]);
        let id = completed.participants()[0].id();
        completed.mark_participant_paid(id, None, Utc::now()).unwrap();
        assert!(matches!(
            completed.mark_participant_paid(id, None, Utc::now()),
            Err(SplitPayError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_pay_unknown_participant() {
        let mut request = sent_request(&[1000]);
        assert!(matches!(
            request.mark_participant_paid(ParticipantId::new(), None, Utc::now()),
            Err(SplitPayError::ParticipantNotFound { .. })
        ));
    }

    #[test]
    fn test_completion_is_order_independent() {
        let amounts = [100, 200, 300];
        let mut forward = sent_request(&amounts);
        let mut shuffled = forward.clone();
        let ids: Vec<_> = forward.participants().iter().map(|p| p.id()).collect();
        let now = Utc::now();

        for id in [ids[0], ids[1], ids[2]] {
            forward.mark_participant_paid(id, None, now).unwrap();
        }
        for id in [ids[2], ids[0], ids[1]] {
            shuffled.mark_participant_paid(id, None, now).unwrap();
        }

        assert_eq!(forward.status(), RequestStatus::Completed);
        assert_eq!(forward, shuffled);
    }

    #[test]
    fn test_cancel_from_sent() {
        let mut request = sent_request(&[400, 600]);
        let a = request.participants()[0].id();
        request.mark_participant_paid(a, None, Utc::now()).unwrap();

        let event = request.cancel(Utc::now()).unwrap();
        assert!(matches!(event, DomainEvent::RequestCancelled { .. }));
        assert_eq!(request.status(), RequestStatus::Cancelled);
        assert!(request.cancelled_at().is_some());
        assert_eq!(request.participants()[0].status(), ParticipantStatus::Paid);
        assert_eq!(request.participants()[1].status(), ParticipantStatus::Cancelled);

        let b = request.participants()[1].id();
        assert!(matches!(
            request.mark_participant_paid(b, None, Utc::now()),
            Err(SplitPayError::InvalidState { .. })
        ));
        assert!(matches!(
            request.cancel(Utc::now()),
            Err(SplitPayError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_cancel_after_completion_rejected() {
        let mut request = sent_request(&[1000]);
        let id = request.participants()[0].id();
        request.mark_participant_paid(id, None, Utc::now()).unwrap();
        assert!(matches!(
            request.cancel(Utc::now()),
            Err(SplitPayError::InvalidState { .. })
        ));
        assert_eq!(request.status(), RequestStatus::Completed);
    }

    #[test]
    fn test_reallocate_only_in_draft() {
        let (mut request, _) = PaymentRequest::create(new_request(1000, &[500, 500]), Utc::now()).unwrap();

        request.reallocate(&[700, 300]).unwrap();
        assert_eq!(request.participants()[0].amount().value(), 700);

        assert!(matches!(
            request.reallocate(&[700, 400]),
            Err(SplitPayError::ValidationError(_))
        ));
        assert!(matches!(
            request.reallocate(&[1000, 0]),
            Err(SplitPayError::ValidationError(_))
        ));
        assert!(matches!(
            request.reallocate(&[1000]),
            Err(SplitPayError::ValidationError(_))
        ));

        request.send(Utc::now()).unwrap();
        assert!(matches!(
            request.reallocate(&[500, 500]),
            Err(SplitPayError::InvalidState { .. })
        ));
        assert_eq!(request.participants()[0].amount().value(), 700);
    }

    #[test]
    fn test_completion_percentage_rounds_half_up() {
        let mut request = sent_request(&[1, 1, 1]);
        let id = request.participants()[0].id();
        request.mark_participant_paid(id, None, Utc::now()).unwrap();
        assert_eq!(request.completion_percentage(), 33);
        let id = request.participants()[1].id();
        request.mark_participant_paid(id, None, Utc::now()).unwrap();
        assert_eq!(request.completion_percentage(), 67);
    }

    #[test]
    fn test_involves_creator_and_participants() {
        let request = sent_request(&[1000]);
        assert!(request.involves(&UserRef::new("admin")));
        assert!(request.involves(&UserRef::new("user-0")));
        assert!(!request.involves(&UserRef::new("stranger")));
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("Sent".parse::<RequestStatus>().unwrap(), RequestStatus::Sent);
        assert!("archived".parse::<RequestStatus>().is_err());
    }
}
