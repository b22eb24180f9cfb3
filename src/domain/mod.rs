//! Core model: split allocation and the payment request state machine.
//!
//! Everything in here is synchronous and free of I/O. Storage and event
//! delivery are reached only through the traits in [`ports`].

pub mod amount;
pub mod events;
pub mod payment_request;
pub mod phone;
pub mod ports;
pub mod split;
pub mod summary;
