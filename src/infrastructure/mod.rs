//! Adapters for the domain ports: stores and event delivery.

pub mod event_bus;
pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
