//! Integration tests for pagebuster
//!
//! These tests use wiremock to serve paginated listings and a remote query
//! endpoint, and exercise the pager and filter engine end-to-end.

mod filter_tests;
mod pager_tests;
