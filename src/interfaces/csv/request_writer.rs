use crate::domain::payment_request::PaymentRequest;
use crate::error::Result;
use chrono::SecondsFormat;
use serde::Serialize;
use std::io::Write;

const REQUEST_HEADERS: [&str; 9] = [
    "request",
    "title",
    "status",
    "total",
    "paid",
    "outstanding",
    "participants",
    "paid_participants",
    "completion",
];

const PARTICIPANT_HEADERS: [&str; 8] = [
    "request",
    "user",
    "name",
    "phone",
    "amount",
    "status",
    "paid_at",
    "reference",
];

#[derive(Serialize)]
struct RequestRow<'a> {
    request: String,
    title: &'a str,
    status: &'static str,
    total: u64,
    paid: u64,
    outstanding: u64,
    participants: usize,
    paid_participants: usize,
    completion: u8,
}

#[derive(Serialize)]
struct ParticipantRow<'a> {
    request: String,
    user: &'a str,
    name: &'a str,
    phone: &'a str,
    amount: u64,
    status: &'static str,
    paid_at: Option<String>,
    reference: Option<&'a str>,
}

/// Writes payment requests as CSV, one row per request or per participant.
///
/// The header row is written even when there is nothing to report.
pub struct RequestWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> RequestWriter<W> {
    pub fn new(sink: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(sink);
        Self { writer }
    }

    pub fn write_requests<'a, I>(&mut self, requests: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a PaymentRequest>,
    {
        self.writer.write_record(REQUEST_HEADERS)?;
        for request in requests {
            self.writer.serialize(RequestRow {
                request: request.id().to_string(),
                title: request.title(),
                status: request.status().as_str(),
                total: request.total_amount().value(),
                paid: request.total_paid(),
                outstanding: request.outstanding(),
                participants: request.participants().len(),
                paid_participants: request.paid_count(),
                completion: request.completion_percentage(),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_participants<'a, I>(&mut self, requests: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a PaymentRequest>,
    {
        self.writer.write_record(PARTICIPANT_HEADERS)?;
        for request in requests {
            for p in request.participants() {
                self.writer.serialize(ParticipantRow {
                    request: request.id().to_string(),
                    user: p.user_ref().as_str(),
                    name: p.name(),
                    phone: p.phone().as_str(),
                    amount: p.amount().value(),
                    status: p.status().as_str(),
                    paid_at: p
                        .paid_at()
                        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true)),
                    reference: p.external_transaction_ref(),
                })?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }
}
