//! People directory records and notifications served by the data API.
//!
//! These records are owned by the backend service. The dashboard passes them
//! to views unchanged; fields it does not know about are kept in
//! [`Person::attributes`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A person in the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Row id.
    pub id: String,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Contact address.
    pub email: Option<String>,
    /// Id of the [`PersonType`], if any.
    pub person_type_id: Option<String>,
    /// Remaining columns, untouched.
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl Person {
    /// Full name from the available parts, falling back to the email or id.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        if !parts.is_empty() {
            return parts.join(" ");
        }
        self.email.clone().unwrap_or_else(|| self.id.clone())
    }
}

/// Category a person belongs to (for example "Customer" or "Supplier").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonType {
    /// Row id.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Notification shown on the admin page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Row id.
    pub id: String,
    /// Short summary.
    pub title: String,
    /// Full text.
    pub body: Option<String>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Whether it has been read; absent means unread.
    #[serde(default)]
    pub read: bool,
}
