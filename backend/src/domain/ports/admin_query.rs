//! Read-side port behind the admin page: accounts and notifications.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::domain::{Notification, User, UserId};

use super::BackendServiceError;

/// Queries the admin page issues against the backend service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminQuery: Send + Sync {
    /// Every account registered with the identity service.
    async fn list_users(&self) -> Result<Vec<User>, BackendServiceError>;

    /// Notifications, newest first.
    async fn list_notifications(&self) -> Result<Vec<Notification>, BackendServiceError>;
}

/// Deterministic admin data used when no backend URL is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAdminQuery;

#[async_trait]
impl AdminQuery for FixtureAdminQuery {
    async fn list_users(&self) -> Result<Vec<User>, BackendServiceError> {
        [
            ("123e4567-e89b-12d3-a456-426614174000", "ada@example.com"),
            ("3fa85f64-5717-4562-b3fc-2c963f66afa6", "grace@example.com"),
        ]
        .into_iter()
        .map(|(id, email)| {
            let id = UserId::new(id).map_err(|err| {
                BackendServiceError::decode(format!("invalid fixture user id: {err}"))
            })?;
            Ok(User {
                created_at: Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).single(),
                ..User::new(id, Some(email.to_owned()))
            })
        })
        .collect()
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>, BackendServiceError> {
        Ok(vec![
            Notification {
                id: "2".to_owned(),
                title: "Weekly export ready".to_owned(),
                body: Some("The people export finished without errors.".to_owned()),
                created_at: Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).single(),
                read: false,
            },
            Notification {
                id: "1".to_owned(),
                title: "Welcome".to_owned(),
                body: None,
                created_at: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).single(),
                read: true,
            },
        ])
    }
}
