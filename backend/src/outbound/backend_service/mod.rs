//! BaaS outbound adapter.
//!
//! One `reqwest` client implements the identity, admin, and people ports
//! against the hosted auth (`/auth/v1`) and REST (`/rest/v1`) surfaces.

mod client;
mod dto;

pub use client::{BackendHttpClient, BackendHttpIdentity};
