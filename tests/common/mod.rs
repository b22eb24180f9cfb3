#![allow(dead_code)]

use splitpay::application::engine::PaymentRequestEngine;
use splitpay::config::EngineConfig;
use splitpay::domain::payment_request::{NewParticipant, NewPaymentRequest, UserRef};
use splitpay::domain::phone::PhoneNumber;
use splitpay::infrastructure::event_bus::EventBus;
use splitpay::infrastructure::in_memory::InMemoryPaymentRequestStore;
use std::io::Write;
use tempfile::NamedTempFile;

/// Writes one command per line to a temporary script file.
pub fn write_script(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file
}

pub fn in_memory_engine() -> (PaymentRequestEngine, EventBus) {
    let bus = EventBus::new();
    let engine = PaymentRequestEngine::new(
        Box::new(InMemoryPaymentRequestStore::new()),
        Box::new(bus.clone()),
        EngineConfig::default(),
    );
    (engine, bus)
}

/// A request created by "admin" with one participant per amount.
pub fn new_request(title: &str, amounts: &[u64]) -> NewPaymentRequest {
    NewPaymentRequest {
        title: title.to_string(),
        description: None,
        total_amount: amounts.iter().sum(),
        created_by: UserRef::new("admin"),
        due_date: None,
        participants: amounts
            .iter()
            .enumerate()
            .map(|(i, &amount)| NewParticipant {
                user_ref: UserRef::new(format!("member-{i}")),
                name: format!("Member {i}"),
                phone: PhoneNumber::parse(&format!("03{i:08}")).unwrap(),
                amount,
            })
            .collect(),
    }
}
