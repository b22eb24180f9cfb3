//! Application layer orchestrating the payment request lifecycle.
//!
//! [`engine::PaymentRequestEngine`] is the entry point: it loads a request
//! from the store, applies a domain transition, writes it back with an
//! optimistic version check and publishes the resulting events.
//! [`intake`] prepares creation input on the caller's side.

pub mod engine;
pub mod intake;
