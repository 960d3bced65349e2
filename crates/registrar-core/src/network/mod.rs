//! Network utilities for the registry and pipeline REST clients.

mod client;

pub use client::{extract_domain, HttpClient};
