//! HTTP transport shared by the action API client

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
