//! Read-side port behind the people page.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::{Person, PersonType};

use super::BackendServiceError;

/// Queries the people page issues against the backend service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PeopleQuery: Send + Sync {
    /// Every person visible to the dashboard.
    async fn list_people(&self) -> Result<Vec<Person>, BackendServiceError>;

    /// Every person category.
    async fn list_person_types(&self) -> Result<Vec<PersonType>, BackendServiceError>;
}

/// Deterministic directory used when no backend URL is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePeopleQuery;

fn fixture_person(id: &str, first: &str, last: &str, type_id: Option<&str>) -> Person {
    let mut attributes = Map::new();
    attributes.insert("city".to_owned(), Value::from("London"));
    Person {
        id: id.to_owned(),
        first_name: Some(first.to_owned()),
        last_name: Some(last.to_owned()),
        email: Some(format!("{}@example.com", first.to_ascii_lowercase())),
        person_type_id: type_id.map(str::to_owned),
        attributes,
    }
}

#[async_trait]
impl PeopleQuery for FixturePeopleQuery {
    async fn list_people(&self) -> Result<Vec<Person>, BackendServiceError> {
        Ok(vec![
            fixture_person("1", "Ada", "Lovelace", Some("customer")),
            fixture_person("2", "Charles", "Babbage", Some("supplier")),
            fixture_person("3", "Mary", "Somerville", None),
        ])
    }

    async fn list_person_types(&self) -> Result<Vec<PersonType>, BackendServiceError> {
        Ok(vec![
            PersonType {
                id: "customer".to_owned(),
                name: "Customer".to_owned(),
            },
            PersonType {
                id: "supplier".to_owned(),
                name: "Supplier".to_owned(),
            },
        ])
    }
}
