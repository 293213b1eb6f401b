//! HTTP client adapter
//!
//! The [`HttpClient`] trait is the seam between thunks and the network;
//! [`NetworkHttpClient`] is the reqwest implementation.

pub mod http;

pub use http::{HttpClient, NetworkHttpClient};
