//! Locale JSON API for client scripts.
//!
//! ```text
//! GET /api/v1/locales
//! GET /api/v1/messages/{locale}
//! ```
//!
//! Pages already embed their bundle; these endpoints serve scripts that
//! switch language without a reload.

use actix_web::{HttpResponse, get, http::header, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::MessageBundle;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Configured locales.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocalesResponse {
    /// Locale used for `/`.
    #[schema(example = "en")]
    pub default_locale: String,
    /// Configured tags in display order.
    #[schema(example = json!(["en", "fr"]))]
    pub locales: Vec<String>,
}

/// One locale's flattened message bundle.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessagesResponse {
    /// Canonical tag of the bundle.
    #[schema(example = "fr")]
    pub locale: String,
    /// Dotted keys to translated strings.
    #[schema(value_type = Object, example = json!({"nav.account": "Compte"}))]
    pub messages: MessageBundle,
}

/// List configured locales and the default.
#[utoipa::path(
    get,
    path = "/api/v1/locales",
    responses((status = 200, description = "Configured locales", body = LocalesResponse)),
    tags = ["locales"],
    operation_id = "listLocales"
)]
#[get("/locales")]
pub async fn list_locales(state: web::Data<HttpState>) -> web::Json<LocalesResponse> {
    let locales = state.locales.locales();
    web::Json(LocalesResponse {
        default_locale: locales.default_locale().to_string(),
        locales: locales.iter().map(ToString::to_string).collect(),
    })
}

/// Fetch the message bundle for a configured locale.
#[utoipa::path(
    get,
    path = "/api/v1/messages/{locale}",
    params(("locale" = String, Path, description = "Configured locale tag", example = "fr")),
    responses(
        (status = 200, description = "Message bundle", body = MessagesResponse),
        (status = 404, description = "Locale not configured", body = crate::domain::Error),
        (status = 500, description = "Bundle could not be loaded", body = crate::domain::Error)
    ),
    tags = ["locales"],
    operation_id = "getMessages"
)]
#[get("/messages/{locale}")]
pub async fn get_messages(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let context = state.locales.context_for(&path).await?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_LANGUAGE, context.locale().to_string()))
        .json(MessagesResponse {
            locale: context.locale().to_string(),
            messages: context.messages().clone(),
        }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::ports::{
        FixtureAdminQuery, FixtureIdentityService, FixtureMessageCatalogue, FixturePeopleQuery,
    };
    use crate::domain::{LocaleRouter, LocaleSet, PageLoader};

    fn state() -> web::Data<HttpState> {
        let locales = LocaleSet::parse("en,fr", "en").expect("locales");
        web::Data::new(HttpState::new(
            LocaleRouter::new(locales, Arc::new(FixtureMessageCatalogue)),
            PageLoader::new(
                Arc::new(FixtureIdentityService),
                Arc::new(FixtureAdminQuery),
                Arc::new(FixturePeopleQuery),
            ),
        ))
    }

    async fn get(uri: &str) -> (StatusCode, Value) {
        let app = actix_test::init_service(
            App::new().app_data(state()).service(
                web::scope("/api/v1")
                    .service(list_locales)
                    .service(get_messages),
            ),
        )
        .await;
        let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;
        let status = res.status();
        (status, actix_test::read_body_json(res).await)
    }

    #[actix_web::test]
    async fn lists_configured_locales() {
        let (status, body) = get("/api/v1/locales").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["defaultLocale"], "en");
        assert_eq!(body["locales"], serde_json::json!(["en", "fr"]));
    }

    #[rstest]
    #[case("fr", "Compte")]
    #[case("EN", "Account")]
    #[actix_web::test]
    async fn serves_flattened_bundle(#[case] locale: &str, #[case] account: &str) {
        let (status, body) = get(&format!("/api/v1/messages/{locale}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["locale"], locale.to_ascii_lowercase());
        assert_eq!(body["messages"]["nav.account"], account);
    }

    #[actix_web::test]
    async fn unknown_locale_is_not_found() {
        let (status, body) = get("/api/v1/messages/de").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");
        assert_eq!(body["details"]["locale"], "de");
    }
}
