//! Message bundles: translated strings for one locale.
//!
//! Bundles are authored as (possibly nested) JSON objects. Nested objects are
//! flattened into dotted keys so views can ask for `account.title` without
//! knowing the file layout.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Errors raised while building a [`MessageBundle`] from JSON.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageBundleError {
    /// The document root was not a JSON object.
    #[error("message bundle root must be a JSON object")]
    NotAnObject,
    /// The document contained no messages.
    #[error("message bundle must contain at least one message")]
    Empty,
    /// A leaf was `null` or an array, which cannot be rendered as text.
    #[error("message '{key}' must be a string, number, or boolean")]
    UnsupportedValue { key: String },
}

/// Flattened key to translated string mapping.
///
/// # Examples
/// ```
/// use dashboard::domain::MessageBundle;
/// use serde_json::json;
///
/// let bundle = MessageBundle::from_json(json!({
///     "account": { "title": "Your account" }
/// }))
/// .expect("valid bundle");
/// assert_eq!(bundle.get("account.title"), Some("Your account"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MessageBundle(BTreeMap<String, String>);

impl MessageBundle {
    /// Build a bundle from a parsed JSON document.
    pub fn from_json(document: Value) -> Result<Self, MessageBundleError> {
        let Value::Object(root) = document else {
            return Err(MessageBundleError::NotAnObject);
        };
        let mut messages = BTreeMap::new();
        flatten_into(&mut messages, None, root)?;
        if messages.is_empty() {
            return Err(MessageBundleError::Empty);
        }
        Ok(Self(messages))
    }

    /// Build a bundle directly from flat entries.
    pub fn from_entries<K, V, I>(entries: I) -> Result<Self, MessageBundleError>
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let messages: BTreeMap<String, String> = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        if messages.is_empty() {
            return Err(MessageBundleError::Empty);
        }
        Ok(Self(messages))
    }

    /// Translated text for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Number of messages in the bundle.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed bundle; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every key, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Messages whose key starts with `prefix.`, with the prefix stripped.
    ///
    /// Keys come back in sorted order.
    pub fn section<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.0.iter().filter_map(move |(key, value)| {
            key.strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('.'))
                .map(|rest| (rest, value.as_str()))
        })
    }
}

fn flatten_into(
    messages: &mut BTreeMap<String, String>,
    prefix: Option<&str>,
    object: serde_json::Map<String, Value>,
) -> Result<(), MessageBundleError> {
    for (segment, value) in object {
        let key = match prefix {
            Some(prefix) => format!("{prefix}.{segment}"),
            None => segment,
        };
        match value {
            Value::Object(nested) => flatten_into(messages, Some(&key), nested)?,
            Value::String(text) => {
                messages.insert(key, text);
            }
            Value::Number(number) => {
                messages.insert(key, number.to_string());
            }
            Value::Bool(flag) => {
                messages.insert(key, flag.to_string());
            }
            Value::Null | Value::Array(_) => {
                return Err(MessageBundleError::UnsupportedValue { key });
            }
        }
    }
    Ok(())
}
