//! Outer surface of the command-line driver: script input, report output.

pub mod csv;
pub mod jsonl;
pub mod script;
