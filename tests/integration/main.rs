//! HTTP integration tests driving the full router over in-memory stores.

mod admin_test;
mod auth_test;
mod helpers;
