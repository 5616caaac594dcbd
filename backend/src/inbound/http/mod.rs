//! HTTP inbound adapter: locale-prefixed pages, the locale JSON API, and
//! health probes.

pub mod error;
pub mod health;
pub mod locale;
pub mod messages;
pub mod pages;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod views;

pub use error::ApiResult;
