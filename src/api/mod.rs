//! REST transport: client, response envelope, errors and per-resource services.

mod client;
mod envelope;
mod error;
mod service;

pub use client::ApiClient;
pub use envelope::{Envelope, ListPage};
pub use error::{ApiError, ApiResult, FALLBACK_MESSAGE};
pub use service::{EntityService, RestService};
