//! Upstream betting API access.
//!
//! A `Transport` performs raw GETs; `ApiClient` fills the URL templates and
//! decodes each endpoint's JSON into typed responses.

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use error::FetchError;
pub use transport::{HttpTransport, RawResponse, Transport};
pub use types::*;
