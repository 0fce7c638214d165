//! Platform adapters - Gateway implementations

pub mod console;
pub mod discord;
