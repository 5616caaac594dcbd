//! Driven port supplying message bundles per locale.
//!
//! Bundles are loaded on every request; there is no cache. A catalogue that
//! cannot produce a bundle for a configured locale is misconfigured, and
//! callers treat that as fatal for the request.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{Locale, MessageBundle};

use super::define_port_error;

define_port_error! {
    /// Errors raised while loading a bundle.
    pub enum MessageCatalogueError {
        /// No bundle exists for the locale.
        Missing { locale: String } =>
            "no message bundle for locale {locale}",
        /// The bundle exists but could not be read.
        Unreadable { locale: String, message: String } =>
            "message bundle for locale {locale} could not be read: {message}",
        /// The bundle was read but is not a usable message document.
        Malformed { locale: String, message: String } =>
            "message bundle for locale {locale} is malformed: {message}",
    }
}

/// Source of message bundles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageCatalogue: Send + Sync {
    /// Load the bundle for `locale`.
    async fn load(&self, locale: &Locale) -> Result<MessageBundle, MessageCatalogueError>;
}

const EN_BUNDLE: &str = include_str!("../../../messages/en.json");
const FR_BUNDLE: &str = include_str!("../../../messages/fr.json");

/// Catalogue backed by the English and French bundles compiled into the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMessageCatalogue;

#[async_trait]
impl MessageCatalogue for FixtureMessageCatalogue {
    async fn load(&self, locale: &Locale) -> Result<MessageBundle, MessageCatalogueError> {
        let raw = match locale.as_ref() {
            "en" => EN_BUNDLE,
            "fr" => FR_BUNDLE,
            other => return Err(MessageCatalogueError::missing(other)),
        };
        let document: Value = serde_json::from_str(raw)
            .map_err(|err| MessageCatalogueError::malformed(locale.as_ref(), err.to_string()))?;
        MessageBundle::from_json(document)
            .map_err(|err| MessageCatalogueError::malformed(locale.as_ref(), err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("en", "Account")]
    #[case("fr", "Compte")]
    #[tokio::test]
    async fn bundled_locales_load(#[case] code: &str, #[case] nav_account: &str) {
        let locale = Locale::new(code).expect("valid locale");
        let bundle = FixtureMessageCatalogue.load(&locale).await.expect("bundle");
        assert_eq!(bundle.get("nav.account"), Some(nav_account));
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_locale_is_missing() {
        let locale = Locale::new("de").expect("valid locale");
        let err = FixtureMessageCatalogue.load(&locale).await.expect_err("missing");
        assert_eq!(err, MessageCatalogueError::missing("de"));
    }

    #[rstest]
    fn bundles_share_the_same_keys() {
        let keys = |raw: &str| -> Vec<String> {
            let document: Value = serde_json::from_str(raw).expect("valid json");
            let bundle = MessageBundle::from_json(document).expect("valid bundle");
            bundle.keys().map(str::to_owned).collect()
        };
        assert_eq!(keys(EN_BUNDLE), keys(FR_BUNDLE));
    }
}
