//! Typed async client for the Cloudenc video encoding API.
//!
//! The crate mirrors the REST surface: [`CloudencClient`] wraps the HTTP
//! transport and authentication, `models` holds the wire types, the endpoint
//! wrappers live in `api`, and [`poll`] provides the wait-until-done helpers
//! that workflows build on.

mod api;
mod client;
pub mod error;
pub mod models;
pub mod poll;

pub use client::{CloudencClient, CloudencClientBuilder, DEFAULT_BASE_URL};
pub use error::{ApiError, QUEUE_LIMIT_EXCEEDED};
