//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on domain services and stay testable with fixture ports.

use crate::domain::{LocaleRouter, PageLoader};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Locale resolution and guarding; shared with the routing middleware.
    pub locales: LocaleRouter,
    /// Data loaders for the dashboard pages.
    pub pages: PageLoader,
}

impl HttpState {
    /// Bundle the services.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use dashboard::domain::ports::{
    ///     FixtureAdminQuery, FixtureIdentityService, FixtureMessageCatalogue, FixturePeopleQuery,
    /// };
    /// use dashboard::domain::{LocaleRouter, LocaleSet, PageLoader};
    /// use dashboard::inbound::http::state::HttpState;
    ///
    /// let locales = LocaleSet::parse("en,fr", "en").expect("locales");
    /// let state = HttpState::new(
    ///     LocaleRouter::new(locales, Arc::new(FixtureMessageCatalogue)),
    ///     PageLoader::new(
    ///         Arc::new(FixtureIdentityService),
    ///         Arc::new(FixtureAdminQuery),
    ///         Arc::new(FixturePeopleQuery),
    ///     ),
    /// );
    /// assert_eq!(state.locales.locales().default_locale().as_ref(), "en");
    /// ```
    pub fn new(locales: LocaleRouter, pages: PageLoader) -> Self {
        Self { locales, pages }
    }
}
