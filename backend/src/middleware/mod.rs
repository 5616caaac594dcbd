//! Request middleware.
//!
//! Purpose: request lifecycle concerns that run before routing, namely trace
//! correlation and locale resolution.

pub mod locale;
pub mod trace;

pub use locale::LocaleRouting;
pub use trace::Trace;
