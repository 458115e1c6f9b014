//! Client for the Qloo insights endpoint.
//!
//! Failures never reach the caller as errors. An authorization failure (403) on the first
//! request is retried once with a simplified query; every other failure yields an empty
//! result set and a [`culturehub_core::Notice`].

pub mod client;
pub mod transport;

pub use client::{RecommendationClient, RecommendationOutcome};
pub use transport::{HttpReply, QlooTransport, ReqwestTransport, TransportError};
