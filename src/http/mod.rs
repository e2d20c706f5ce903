//! HTTP layer — client and retry policies.

pub mod client;
pub mod retry;

pub use client::SpeedrushHttp;
pub use retry::{RetryConfig, RetryPolicy};
