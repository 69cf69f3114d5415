//! Endpoint wrappers grouped by API section. Each call is a thin JSON
//! POST/GET; none of them retry on their own.

mod configurations;
mod encodings;
mod inputs_outputs;
mod manifests;
mod muxings;
