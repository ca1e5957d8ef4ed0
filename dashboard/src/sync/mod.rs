//! Server state synchronization

pub mod engine;
