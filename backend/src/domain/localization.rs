//! Locale resolution for incoming requests.
//!
//! Two entry points share one [`LocaleRouter`]:
//!
//! - [`LocaleRouter::resolve_request_config`] runs for every localised request
//!   and never rejects it: an unknown segment resolves to the default locale,
//!   so a translated bundle is always available (including for the 404).
//! - [`LocaleRouter::guard`] runs before a page renders and refuses unknown
//!   segments with a not-found error.
//!
//! Bundles come from the [`MessageCatalogue`] port on every call. A bundle
//! that cannot be loaded is a configuration fault and fails the request.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, error};

use crate::domain::ports::MessageCatalogue;
use crate::domain::{Error, Locale, LocaleSet, MessageBundle};

/// Locale and messages resolved for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    locale: Locale,
    messages: Arc<MessageBundle>,
}

impl RequestConfig {
    /// Pair a locale with its bundle.
    pub fn new(locale: Locale, messages: MessageBundle) -> Self {
        Self {
            locale,
            messages: Arc::new(messages),
        }
    }

    /// Locale the bundle belongs to.
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Bundle for [`Self::locale`].
    pub fn messages(&self) -> &MessageBundle {
        &self.messages
    }
}

/// Translation context handed to every view.
///
/// Views call [`LocaleContext::text`] for server-rendered strings and embed
/// [`LocaleContext::messages_json`] so client scripts see the same bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleContext {
    locale: Locale,
    messages: Arc<MessageBundle>,
    available: Vec<Locale>,
}

impl LocaleContext {
    /// Active locale.
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Active bundle.
    pub fn messages(&self) -> &MessageBundle {
        &self.messages
    }

    /// Every configured locale, for the language switcher.
    pub fn available(&self) -> &[Locale] {
        &self.available
    }

    /// Translated text for `key`; the key itself when the bundle lacks it.
    pub fn text<'a>(&'a self, key: &'a str) -> &'a str {
        match self.messages.get(key) {
            Some(text) => text,
            None => {
                debug!(locale = %self.locale, key, "missing translation");
                key
            }
        }
    }

    /// Path under the active locale, e.g. `dashboard/people` -> `/en/dashboard/people`.
    pub fn path(&self, rest: &str) -> String {
        format!("/{}/{}", self.locale, rest.trim_start_matches('/'))
    }

    /// Bundle as JSON that is safe inside an inline `<script>` element.
    ///
    /// # Examples
    /// ```
    /// use dashboard::domain::{Locale, LocaleContext, MessageBundle, RequestConfig};
    ///
    /// let bundle = MessageBundle::from_entries([("x", "</script>")]).unwrap();
    /// let config = RequestConfig::new(Locale::new("en").unwrap(), bundle);
    /// let context = LocaleContext::from_config(&config, Vec::new());
    /// assert!(!context.messages_json().contains("</script>"));
    /// ```
    pub fn messages_json(&self) -> String {
        let raw = serde_json::to_string(self.messages.as_ref()).unwrap_or_else(|err| {
            error!(locale = %self.locale, error = %err, "failed to serialise message bundle");
            "{}".to_owned()
        });
        raw.replace('<', "\\u003c")
            .replace('>', "\\u003e")
            .replace('&', "\\u0026")
    }

    /// Build a context from a resolved request config.
    pub fn from_config(config: &RequestConfig, available: Vec<Locale>) -> Self {
        Self {
            locale: config.locale.clone(),
            messages: Arc::clone(&config.messages),
            available,
        }
    }
}

/// Resolves locales and loads their bundles.
#[derive(Clone)]
pub struct LocaleRouter {
    locales: LocaleSet,
    catalogue: Arc<dyn MessageCatalogue>,
}

impl LocaleRouter {
    /// Create a router over the configured set and a bundle source.
    pub fn new(locales: LocaleSet, catalogue: Arc<dyn MessageCatalogue>) -> Self {
        Self { locales, catalogue }
    }

    /// Configured locales.
    pub fn locales(&self) -> &LocaleSet {
        &self.locales
    }

    /// Resolve `segment` (falling back to the default) and load its bundle.
    ///
    /// # Errors
    /// Returns an internal error when the bundle cannot be loaded.
    pub async fn resolve_request_config(&self, segment: &str) -> Result<RequestConfig, Error> {
        let locale = self.locales.resolve(segment).clone();
        if !locale.matches(segment) {
            debug!(segment, fallback = %locale, "unknown locale segment; using default");
        }
        let messages = self.catalogue.load(&locale).await.map_err(|err| {
            error!(locale = %locale, error = %err, "message bundle unavailable");
            Error::internal(format!("message bundle unavailable for locale {locale}"))
        })?;
        Ok(RequestConfig::new(locale, messages))
    }

    /// Refuse to render for a segment outside the configured set.
    ///
    /// `config` supplies the bundle used for the not-found message; when the
    /// segment is valid it is the bundle for that very locale.
    ///
    /// # Errors
    /// Returns a not-found error for unknown segments.
    pub fn guard(&self, segment: &str, config: &RequestConfig) -> Result<LocaleContext, Error> {
        let Some(locale) = self.locales.find(segment) else {
            let message = config
                .messages()
                .get("errors.locale_not_found")
                .filter(|text| !text.trim().is_empty())
                .unwrap_or("unknown locale");
            return Err(Error::not_found(message).with_details(json!({ "locale": segment })));
        };
        if locale != config.locale() {
            error!(
                segment,
                resolved = %config.locale(),
                "request config does not match the guarded locale"
            );
            return Err(Error::internal("locale resolution mismatch"));
        }
        Ok(LocaleContext::from_config(config, self.locales.iter().cloned().collect()))
    }

    /// Guard `segment` and load its bundle in one step.
    ///
    /// # Errors
    /// Not found for unknown segments; internal when the bundle is missing.
    pub async fn context_for(&self, segment: &str) -> Result<LocaleContext, Error> {
        let config = self.resolve_request_config(segment).await?;
        self.guard(segment, &config)
    }
}
