//! Locale codes and the configured locale set.
//!
//! A [`Locale`] is a validated BCP 47 language tag held in canonical form
//! (`pt-br` becomes `pt-BR`). The [`LocaleSet`] is the fixed list of locales
//! the dashboard serves plus its default, which must be a member.

use std::fmt;

use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

/// Validation errors returned by [`Locale::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocaleValidationError {
    /// Input was empty or only whitespace.
    #[error("locale code must not be empty")]
    Empty,
    /// Input had leading or trailing whitespace.
    #[error("locale code '{code}' must not be padded")]
    Padded { code: String },
    /// Input is not a well-formed language tag.
    #[error("locale code '{code}' is not a valid language tag")]
    Malformed { code: String },
}

/// Canonical language tag for one locale.
///
/// # Examples
/// ```
/// use dashboard::domain::Locale;
///
/// let locale = Locale::new("pt-br").expect("valid tag");
/// assert_eq!(locale.as_ref(), "pt-BR");
/// assert_eq!(locale.language(), "pt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    /// Validate and canonicalise a locale code.
    pub fn new(code: impl AsRef<str>) -> Result<Self, LocaleValidationError> {
        let code = code.as_ref();
        if code.trim().is_empty() {
            return Err(LocaleValidationError::Empty);
        }
        if code.trim() != code {
            return Err(LocaleValidationError::Padded {
                code: code.to_owned(),
            });
        }
        let parsed: LanguageIdentifier =
            code.parse().map_err(|_| LocaleValidationError::Malformed {
                code: code.to_owned(),
            })?;
        Ok(Self(parsed.to_string()))
    }

    /// Primary language subtag (`en` for `en-GB`).
    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or(self.0.as_str())
    }

    /// Case-insensitive comparison against a raw tag or URL segment.
    pub fn matches(&self, raw: &str) -> bool {
        self.0.eq_ignore_ascii_case(raw.trim())
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Locale> for String {
    fn from(value: Locale) -> Self {
        value.0
    }
}

impl TryFrom<String> for Locale {
    type Error = LocaleValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Errors raised while building a [`LocaleSet`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocaleSetError {
    /// No locales were configured.
    #[error("at least one locale must be configured")]
    Empty,
    /// A configured code failed validation.
    #[error(transparent)]
    Invalid(#[from] LocaleValidationError),
    /// The same locale appeared twice.
    #[error("locale '{locale}' is configured more than once")]
    Duplicate { locale: String },
    /// The default locale is not part of the configured set.
    #[error("default locale '{locale}' is not one of the configured locales")]
    DefaultNotConfigured { locale: String },
}

/// The configured, ordered set of supported locales and its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSet {
    locales: Vec<Locale>,
    default: Locale,
}

impl LocaleSet {
    /// Build a set, validating membership of the default and uniqueness.
    pub fn new(locales: Vec<Locale>, default: Locale) -> Result<Self, LocaleSetError> {
        if locales.is_empty() {
            return Err(LocaleSetError::Empty);
        }
        for (index, locale) in locales.iter().enumerate() {
            if locales.iter().skip(index + 1).any(|other| other == locale) {
                return Err(LocaleSetError::Duplicate {
                    locale: locale.to_string(),
                });
            }
        }
        if !locales.contains(&default) {
            return Err(LocaleSetError::DefaultNotConfigured {
                locale: default.to_string(),
            });
        }
        Ok(Self { locales, default })
    }

    /// Parse a comma-separated list such as `"en, fr, de"`.
    ///
    /// # Examples
    /// ```
    /// use dashboard::domain::LocaleSet;
    ///
    /// let set = LocaleSet::parse("en, fr", "en").expect("valid set");
    /// assert!(set.contains("FR"));
    /// assert_eq!(set.default_locale().as_ref(), "en");
    /// ```
    pub fn parse(list: &str, default: &str) -> Result<Self, LocaleSetError> {
        let locales = list
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(Locale::new)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(locales, Locale::new(default.trim())?)
    }

    /// Locale matching `segment`, if it is configured.
    pub fn find(&self, segment: &str) -> Option<&Locale> {
        self.locales.iter().find(|locale| locale.matches(segment))
    }

    /// Whether `segment` names a configured locale.
    pub fn contains(&self, segment: &str) -> bool {
        self.find(segment).is_some()
    }

    /// The configured default locale.
    pub fn default_locale(&self) -> &Locale {
        &self.default
    }

    /// Configured locale for `segment`, or the default when it is unknown.
    pub fn resolve(&self, segment: &str) -> &Locale {
        self.find(segment).unwrap_or(&self.default)
    }

    /// Iterate over the configured locales in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Locale> {
        self.locales.iter()
    }

    /// Pick the best configured locale for ranked client preferences.
    ///
    /// Preferences are visited in rank order. For each one an exact tag match
    /// wins, then a configured locale sharing its primary language. When no
    /// preference matches, the default is returned.
    pub fn negotiate<'a, I>(&self, preferences: I) -> &Locale
    where
        I: IntoIterator<Item = &'a str>,
    {
        for preference in preferences {
            if let Some(exact) = self.find(preference) {
                return exact;
            }
            let language = preference.split(['-', '_']).next().unwrap_or(preference);
            if let Some(partial) = self
                .locales
                .iter()
                .find(|locale| locale.language().eq_ignore_ascii_case(language))
            {
                return partial;
            }
        }
        &self.default
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for locale validation and negotiation.

    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn locales() -> LocaleSet {
        LocaleSet::parse("en,fr,pt-BR", "en").expect("valid locale set")
    }

    #[rstest]
    #[case("en", "en")]
    #[case("EN-gb", "en-GB")]
    #[case("pt-br", "pt-BR")]
    fn new_canonicalises(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(Locale::new(raw).expect("valid").as_ref(), expected);
    }

    #[rstest]
    #[case("", LocaleValidationError::Empty)]
    #[case(" en", LocaleValidationError::Padded { code: " en".to_owned() })]
    #[case("en--", LocaleValidationError::Malformed { code: "en--".to_owned() })]
    fn new_rejects_invalid_codes(#[case] raw: &str, #[case] expected: LocaleValidationError) {
        assert_eq!(Locale::new(raw).expect_err("invalid"), expected);
    }

    #[rstest]
    fn set_rejects_default_outside_set() {
        let err = LocaleSet::parse("en,fr", "de").expect_err("default must be configured");
        assert!(matches!(err, LocaleSetError::DefaultNotConfigured { .. }));
    }

    #[rstest]
    fn set_rejects_duplicates() {
        let err = LocaleSet::parse("en,fr,EN", "en").expect_err("duplicates must fail");
        assert!(matches!(err, LocaleSetError::Duplicate { .. }));
    }

    #[rstest]
    fn set_rejects_empty_list() {
        assert_eq!(
            LocaleSet::parse(" , ", "en").expect_err("empty list"),
            LocaleSetError::Empty
        );
    }

    #[rstest]
    #[case("fr", "fr")]
    #[case("PT-br", "pt-BR")]
    #[case("de", "en")]
    #[case("dashboard", "en")]
    fn resolve_falls_back_to_default(locales: LocaleSet, #[case] segment: &str, #[case] expected: &str) {
        assert_eq!(locales.resolve(segment).as_ref(), expected);
    }

    #[rstest]
    #[case(&["fr-CA", "en"], "fr")]
    #[case(&["pt-BR"], "pt-BR")]
    #[case(&["pt-PT", "fr"], "pt-BR")]
    #[case(&["de", "it"], "en")]
    #[case(&[], "en")]
    fn negotiate_prefers_ranked_matches(
        locales: LocaleSet,
        #[case] preferences: &[&str],
        #[case] expected: &str,
    ) {
        let chosen = locales.negotiate(preferences.iter().copied());
        assert_eq!(chosen.as_ref(), expected);
    }
}
