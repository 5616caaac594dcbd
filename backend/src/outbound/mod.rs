//! Outbound adapters implementing domain ports.
//!
//! - **backend_service**: `reqwest` client for the BaaS identity and data
//!   APIs, implementing the identity, admin and people ports.
//! - **messages**: filesystem message catalogue reading one JSON bundle per
//!   locale.
//!
//! Adapters translate between wire formats and domain types. They contain
//! no page logic.

pub mod backend_service;
pub mod messages;
