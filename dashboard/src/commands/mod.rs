//! Operator command handling

pub mod dispatcher;
