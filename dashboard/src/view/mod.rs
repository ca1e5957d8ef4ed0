//! Presentation adapter

pub mod panel;
