//! DTOs for decoding BaaS JSON responses.
//!
//! Rows arrive with snake_case columns; these DTOs decode them and map into
//! domain records in one pass. Identifier columns may be integers or text
//! depending on the table, so they are read as raw JSON and stringified.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{AccessToken, AuthSession, Notification, Person, PersonType, User, UserId};

#[derive(Debug, Serialize)]
pub(super) struct PasswordGrantDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    pub(super) id: String,
    pub(super) email: Option<String>,
    pub(super) created_at: Option<DateTime<Utc>>,
    pub(super) last_sign_in_at: Option<DateTime<Utc>>,
}

impl UserDto {
    pub(super) fn into_domain(self) -> Result<User, String> {
        let id = UserId::new(&self.id).map_err(|err| format!("user {}: {err}", self.id))?;
        Ok(User {
            id,
            email: self.email.filter(|email| !email.trim().is_empty()),
            created_at: self.created_at,
            last_sign_in_at: self.last_sign_in_at,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct UserListDto {
    #[serde(default)]
    pub(super) users: Vec<UserDto>,
}

impl UserListDto {
    pub(super) fn into_domain(self) -> Result<Vec<User>, String> {
        self.users.into_iter().map(UserDto::into_domain).collect()
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct TokenDto {
    pub(super) access_token: String,
    pub(super) refresh_token: Option<String>,
    pub(super) user: Option<UserDto>,
}

impl TokenDto {
    pub(super) fn into_domain(self) -> Result<AuthSession, String> {
        let access_token =
            AccessToken::new(self.access_token).ok_or("token response had a blank access token")?;
        let user = self.user.map(UserDto::into_domain).transpose()?;
        Ok(AuthSession {
            access_token,
            refresh_token: self.refresh_token.and_then(AccessToken::new),
            user,
        })
    }
}

fn id_text(value: &Value) -> Result<String, String> {
    match value {
        Value::String(text) if !text.is_empty() => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(format!("unsupported id value {other}")),
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct NotificationDto {
    pub(super) id: Value,
    pub(super) title: String,
    pub(super) body: Option<String>,
    pub(super) created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(super) read: bool,
}

impl NotificationDto {
    pub(super) fn into_domain(self) -> Result<Notification, String> {
        Ok(Notification {
            id: id_text(&self.id)?,
            title: self.title,
            body: self.body,
            created_at: self.created_at,
            read: self.read,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct PersonDto {
    pub(super) id: Value,
    pub(super) first_name: Option<String>,
    pub(super) last_name: Option<String>,
    pub(super) email: Option<String>,
    pub(super) person_type_id: Option<Value>,
    #[serde(flatten)]
    pub(super) rest: Map<String, Value>,
}

impl PersonDto {
    pub(super) fn into_domain(self) -> Result<Person, String> {
        let person_type_id = match self.person_type_id {
            None | Some(Value::Null) => None,
            Some(value) => Some(id_text(&value)?),
        };
        Ok(Person {
            id: id_text(&self.id)?,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            person_type_id,
            attributes: self.rest,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct PersonTypeDto {
    pub(super) id: Value,
    pub(super) name: String,
}

impl PersonTypeDto {
    pub(super) fn into_domain(self) -> Result<PersonType, String> {
        Ok(PersonType {
            id: id_text(&self.id)?,
            name: self.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn person_keeps_unknown_columns() {
        let dto: PersonDto = serde_json::from_value(json!({
            "id": 7,
            "first_name": "Ada",
            "last_name": null,
            "email": "ada@example.com",
            "person_type_id": 2,
            "city": "London"
        }))
        .expect("decodes");
        let person = dto.into_domain().expect("maps");
        assert_eq!(person.id, "7");
        assert_eq!(person.person_type_id.as_deref(), Some("2"));
        assert_eq!(person.attributes.get("city"), Some(&json!("London")));
        assert!(!person.attributes.contains_key("first_name"));
    }

    #[rstest]
    #[case(json!({"id": true, "title": "x"}))]
    #[case(json!({"id": "", "title": "x"}))]
    fn notification_rejects_unusable_ids(#[case] raw: Value) {
        let dto: NotificationDto = serde_json::from_value(raw).expect("decodes");
        assert!(dto.into_domain().is_err());
    }

    #[rstest]
    fn token_response_maps_tokens_and_user() {
        let dto: TokenDto = serde_json::from_value(json!({
            "access_token": "jwt",
            "refresh_token": "",
            "user": {"id": "3fa85f64-5717-4562-b3fc-2c963f66afa6", "email": "ada@example.com"}
        }))
        .expect("decodes");
        let session = dto.into_domain().expect("maps");
        assert_eq!(session.access_token.expose(), "jwt");
        assert!(session.refresh_token.is_none());
        assert_eq!(
            session.user.and_then(|user| user.email).as_deref(),
            Some("ada@example.com")
        );
    }

    #[rstest]
    fn user_with_bad_id_is_rejected() {
        let dto: UserDto = serde_json::from_value(json!({"id": "nope"})).expect("decodes");
        assert!(dto.into_domain().is_err());
    }
}
