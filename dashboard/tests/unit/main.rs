//! Integration tests for the recording dashboard

mod test_dispatcher;
mod test_http_client;
mod test_server;
