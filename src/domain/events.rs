use super::payment_request::{ParticipantId, RequestId};
use serde::{Deserialize, Serialize};

/// Raised once per successful transition, after it has been persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    RequestCreated {
        request_id: RequestId,
        amount: u64,
    },
    RequestSent {
        request_id: RequestId,
        amount: u64,
    },
    ParticipantPaid {
        request_id: RequestId,
        participant_id: ParticipantId,
        amount: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        external_transaction_ref: Option<String>,
    },
    RequestCompleted {
        request_id: RequestId,
        amount: u64,
    },
    RequestCancelled {
        request_id: RequestId,
        amount: u64,
    },
}

impl DomainEvent {
    pub fn request_id(&self) -> RequestId {
        match self {
            Self::RequestCreated { request_id, .. }
            | Self::RequestSent { request_id, .. }
            | Self::ParticipantPaid { request_id, .. }
            | Self::RequestCompleted { request_id, .. }
            | Self::RequestCancelled { request_id, .. } => *request_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::RequestCreated { .. } => "request_created",
            Self::RequestSent { .. } => "request_sent",
            Self::ParticipantPaid { .. } => "participant_paid",
            Self::RequestCompleted { .. } => "request_completed",
            Self::RequestCancelled { .. } => "request_cancelled",
        }
    }
}
