//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] covers the JSON surface only: the locale API under `/api/v1`
//! and the health probes. HTML pages are not described here.
//!
//! The generated document is served by Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::messages::{LocalesResponse, MessagesResponse};

/// OpenAPI document for the JSON API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Dashboard API",
        description = "Locale catalogue for client scripts, plus health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::messages::list_locales,
        crate::inbound::http::messages::get_messages,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(Error, ErrorCode, LocalesResponse, MessagesResponse)),
    tags(
        (name = "locales", description = "Configured locales and message bundles"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn schema_named<'a>(
        doc: &'a utoipa::openapi::OpenApi,
        name: &str,
    ) -> &'a RefOr<Schema> {
        let schemas = &doc.components.as_ref().expect("components").schemas;
        schemas
            .iter()
            .find(|(key, _)| key.as_str() == name || key.ends_with(&format!(".{name}")))
            .map(|(_, schema)| schema)
            .unwrap_or_else(|| panic!("schema {name} registered"))
    }

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("Error", "code")]
    #[case("Error", "message")]
    #[case("LocalesResponse", "defaultLocale")]
    #[case("MessagesResponse", "messages")]
    fn schemas_expose_fields(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        assert_object_schema_has_field(schema_named(&doc, schema), field);
    }

    #[rstest]
    #[case("/api/v1/locales")]
    #[case("/api/v1/messages/{locale}")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn paths_are_registered(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }
}
