//! Page loader behaviour: session redirects, concurrent fan-out, labelling.

use std::time::Duration;

use async_trait::async_trait;
use rstest::{fixture, rstest};
use tokio::sync::Barrier;

use super::*;
use crate::domain::ports::{
    BackendServiceError, FIXTURE_ACCESS_TOKEN, FixtureAdminQuery, FixtureIdentityService,
    FixtureMessageCatalogue, FixturePeopleQuery, MockAdminQuery, MockIdentityService,
    MockPeopleQuery,
};
use crate::domain::{ErrorCode, LocaleRouter, LocaleSet, UserId};

#[fixture]
fn loader() -> PageLoader {
    PageLoader::new(
        Arc::new(FixtureIdentityService),
        Arc::new(FixtureAdminQuery),
        Arc::new(FixturePeopleQuery),
    )
}

fn token(raw: &str) -> AccessToken {
    AccessToken::new(raw).expect("non-blank token")
}

#[rstest]
#[tokio::test]
async fn account_without_session_redirects(loader: PageLoader) {
    let outcome = loader.load_account(None).await.expect("outcome");
    assert_eq!(outcome, AccountPage::RedirectToConnect);
}

#[rstest]
#[tokio::test]
async fn account_with_unknown_token_redirects(loader: PageLoader) {
    let outcome = loader
        .load_account(Some(&token("expired")))
        .await
        .expect("outcome");
    assert_eq!(outcome, AccountPage::RedirectToConnect);
}

#[rstest]
#[tokio::test]
async fn account_with_valid_token_renders_user(loader: PageLoader) {
    let outcome = loader
        .load_account(Some(&token(FIXTURE_ACCESS_TOKEN)))
        .await
        .expect("outcome");
    let AccountPage::Render(user) = outcome else {
        panic!("expected the account to render");
    };
    assert_eq!(user.email.as_deref(), Some("ada@example.com"));
}

#[rstest]
#[tokio::test]
async fn account_propagates_identity_outage() {
    let mut identity = MockIdentityService::new();
    identity
        .expect_get_user()
        .returning(|_| Err(BackendServiceError::transport("connection refused")));
    let loader = PageLoader::new(
        Arc::new(identity),
        Arc::new(FixtureAdminQuery),
        Arc::new(FixturePeopleQuery),
    );

    let err = loader
        .load_account(Some(&token("any")))
        .await
        .expect_err("outage");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

/// Admin double whose two queries only finish once both are in flight.
struct RendezvousAdminQuery {
    barrier: Arc<Barrier>,
}

#[async_trait]
impl AdminQuery for RendezvousAdminQuery {
    async fn list_users(&self) -> Result<Vec<User>, BackendServiceError> {
        self.barrier.wait().await;
        let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        Ok(vec![User::new(id, None)])
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>, BackendServiceError> {
        self.barrier.wait().await;
        Ok(Vec::new())
    }
}

#[rstest]
#[tokio::test]
async fn admin_fetches_run_concurrently() {
    let admin = RendezvousAdminQuery {
        barrier: Arc::new(Barrier::new(2)),
    };
    let loader = PageLoader::new(
        Arc::new(FixtureIdentityService),
        Arc::new(admin),
        Arc::new(FixturePeopleQuery),
    );

    let page = tokio::time::timeout(Duration::from_secs(5), loader.load_admin())
        .await
        .expect("sequential fetches would never meet at the barrier")
        .expect("admin page");
    assert_eq!(page.users.len(), 1);
    assert!(page.notifications.is_empty());
}

#[rstest]
#[tokio::test]
async fn admin_fails_when_either_fetch_fails() {
    let mut admin = MockAdminQuery::new();
    admin.expect_list_users().returning(|| Ok(Vec::new()));
    admin
        .expect_list_notifications()
        .returning(|| Err(BackendServiceError::timeout("10s elapsed")));
    let loader = PageLoader::new(
        Arc::new(FixtureIdentityService),
        Arc::new(admin),
        Arc::new(FixturePeopleQuery),
    );

    let err = loader.load_admin().await.expect_err("failed fetch");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn people_rows_carry_type_names(loader: PageLoader) {
    let page = loader.load_people().await.expect("people page");
    let labels: Vec<_> = page
        .rows
        .iter()
        .map(|row| (row.person.id.as_str(), row.type_name.as_deref()))
        .collect();
    assert_eq!(
        labels,
        vec![("1", Some("Customer")), ("2", Some("Supplier")), ("3", None)]
    );
    assert_eq!(page.person_types.len(), 2);
}

#[rstest]
#[tokio::test]
async fn people_unknown_type_has_no_label() {
    let mut people = MockPeopleQuery::new();
    people.expect_list_people().returning(|| {
        Ok(vec![Person {
            id: "9".to_owned(),
            first_name: Some("Alan".to_owned()),
            last_name: None,
            email: None,
            person_type_id: Some("ghost".to_owned()),
            attributes: serde_json::Map::new(),
        }])
    });
    people.expect_list_person_types().returning(|| Ok(Vec::new()));
    let loader = PageLoader::new(
        Arc::new(FixtureIdentityService),
        Arc::new(FixtureAdminQuery),
        Arc::new(people),
    );

    let page = loader.load_people().await.expect("people page");
    assert_eq!(page.rows.first().and_then(|row| row.type_name.clone()), None);
}

#[rstest]
#[tokio::test]
async fn documentation_sections_follow_bundle(loader: PageLoader) {
    let locales = LocaleSet::parse("en,fr", "en").expect("locales");
    let router = LocaleRouter::new(locales, Arc::new(FixtureMessageCatalogue));
    let context = router.context_for("en").await.expect("context");

    let page = loader.load_documentation(&context);
    let ids: Vec<_> = page.sections.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["01-overview", "02-languages", "03-sign-in"]);
    assert!(page.sections.iter().all(|s| !s.body.is_empty()));
}
