//! Recording dashboard library
//!
//! Mirrors the state of a remote recording service: health metrics, the
//! device catalog, active recordings and history, plus the operator commands
//! that drive it.

pub mod app;
pub mod catalog;
pub mod commands;
pub mod errors;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod logs;
pub mod render;
pub mod server;
pub mod settings;
pub mod sync;
pub mod timefmt;
pub mod utils;
pub mod view;
pub mod workers;
