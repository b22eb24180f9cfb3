//! Read-only projections over payment requests: filtered listings and
//! per-identity dashboard totals. Nothing here changes state.

use super::payment_request::{ParticipantStatus, PaymentRequest, RequestStatus, UserRef};
use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFilter {
    pub status: Option<RequestStatus>,
    /// Case-insensitive match against title and description.
    pub search: Option<String>,
    /// 1-based page number.
    pub page: usize,
    pub limit: usize,
}

impl Default for RequestFilter {
    fn default() -> Self {
        Self {
            status: None,
            search: None,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl RequestFilter {
    fn matches(&self, request: &PaymentRequest) -> bool {
        if self.status.is_some_and(|s| s != request.status()) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                request.title().to_lowercase().contains(&needle)
                    || request
                        .description()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPage {
    pub requests: Vec<PaymentRequest>,
    pub page: usize,
    pub pages: usize,
    pub total: usize,
}

/// Applies `filter` to `requests`, newest first, and cuts out one page.
pub fn paginate(mut requests: Vec<PaymentRequest>, filter: &RequestFilter) -> RequestPage {
    requests.retain(|r| filter.matches(r));
    requests.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

    let limit = filter.limit.max(1);
    let page = filter.page.max(1);
    let total = requests.len();
    let pages = total.div_ceil(limit);

    let requests = requests
        .into_iter()
        .skip((page - 1).saturating_mul(limit))
        .take(limit)
        .collect();

    RequestPage {
        requests,
        page,
        pages,
        total,
    }
}

/// Totals for the requests an identity created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreatorSummary {
    pub total_requests: usize,
    pub completed_requests: usize,
    /// Requests still in `draft` or `sent`.
    pub open_requests: usize,
    pub total_amount: u64,
    pub completed_amount: u64,
}

impl CreatorSummary {
    pub fn for_creator(creator: &UserRef, requests: &[PaymentRequest]) -> Self {
        requests
            .iter()
            .filter(|r| r.created_by() == creator)
            .fold(Self::default(), |mut acc, r| {
                acc.total_requests += 1;
                acc.total_amount += r.total_amount().value();
                match r.status() {
                    RequestStatus::Completed => {
                        acc.completed_requests += 1;
                        acc.completed_amount += r.total_amount().value();
                    }
                    RequestStatus::Draft | RequestStatus::Sent => acc.open_requests += 1,
                    RequestStatus::Cancelled => {}
                }
                acc
            })
    }
}

/// Totals for the shares an identity owes across requests.
///
/// Cancelled shares are neither owed nor paid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParticipantSummary {
    pub total_owed: u64,
    pub total_paid: u64,
    pub pending_payments: usize,
    pub completed_payments: usize,
}

impl ParticipantSummary {
    pub fn for_participant(user: &UserRef, requests: &[PaymentRequest]) -> Self {
        requests
            .iter()
            .filter_map(|r| r.participant_for(user))
            .fold(Self::default(), |mut acc, p| {
                match p.status() {
                    ParticipantStatus::Paid => {
                        acc.total_paid += p.amount().value();
                        acc.completed_payments += 1;
                    }
                    ParticipantStatus::Pending => {
                        acc.total_owed += p.amount().value();
                        acc.pending_payments += 1;
                    }
                    ParticipantStatus::Cancelled => {}
                }
                acc
            })
    }
}
