//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod admin_query;
mod backend_service_error;
mod identity_service;
mod message_catalogue;
mod people_query;

#[cfg(test)]
pub use admin_query::MockAdminQuery;
pub use admin_query::{AdminQuery, FixtureAdminQuery};
pub use backend_service_error::BackendServiceError;
#[cfg(test)]
pub use identity_service::MockIdentityService;
pub use identity_service::{
    FIXTURE_ACCESS_TOKEN, FIXTURE_EMAIL, FIXTURE_PASSWORD, FixtureIdentityService,
    IdentityService,
};
#[cfg(test)]
pub use message_catalogue::MockMessageCatalogue;
pub use message_catalogue::{FixtureMessageCatalogue, MessageCatalogue, MessageCatalogueError};
#[cfg(test)]
pub use people_query::MockPeopleQuery;
pub use people_query::{FixturePeopleQuery, PeopleQuery};
