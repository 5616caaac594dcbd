//! Server-rendered HTML views.
//!
//! Each page is an askama template under `templates/` extending `base.html`.
//! View models carry preformatted strings; translation happens in the
//! templates through `t.text(key)` so copy stays in the message bundles.

use askama::Template;
use chrono::{DateTime, Utc};
use tracing::error;

use crate::domain::{
    AdminPage, ConfirmDialog, DialogVariant, DocSection, Error, LocaleContext, Notification,
    PeoplePage, PersonRow, User, ViewMode,
};

/// Pages linked from the navigation bar, as `(path below the locale, label key)`.
const NAV_ITEMS: &[(&str, &str)] = &[
    ("dashboard/account", "nav.account"),
    ("dashboard/admin", "nav.admin"),
    ("dashboard/people", "nav.people"),
    ("dashboard/documentation", "nav.documentation"),
];

/// One navigation entry.
#[derive(Debug, Clone)]
pub struct NavLink {
    /// Locale-prefixed target.
    pub href: String,
    /// Translated label.
    pub label: String,
    /// Whether this is the current page.
    pub active: bool,
}

/// One entry of the language switcher.
#[derive(Debug, Clone)]
pub struct LanguageLink {
    /// Current page under the other locale.
    pub href: String,
    /// Locale tag shown to the user.
    pub code: String,
    /// Whether this is the current locale.
    pub active: bool,
}

/// Page chrome shared by every view.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Value of `<html lang>`.
    pub lang: String,
    /// Translated page title.
    pub title: String,
    /// Top bar links.
    pub nav: Vec<NavLink>,
    /// Language switcher entries.
    pub languages: Vec<LanguageLink>,
    /// `{"locale": ..., "messages": {...}}`, safe inside `<script>`.
    pub context_json: String,
}

impl Layout {
    /// Chrome for the page at `current` (path below the locale prefix).
    pub fn new(context: &LocaleContext, title_key: &str, current: &str) -> Self {
        let nav = NAV_ITEMS
            .iter()
            .map(|(path, key)| NavLink {
                href: context.path(path),
                label: context.text(key).to_owned(),
                active: *path == current,
            })
            .collect();
        let languages = context
            .available()
            .iter()
            .map(|locale| LanguageLink {
                href: format!("/{locale}/{current}"),
                code: locale.to_string(),
                active: locale == context.locale(),
            })
            .collect();
        Self {
            lang: context.locale().to_string(),
            title: context.text(title_key).to_owned(),
            nav,
            languages,
            context_json: format!(
                r#"{{"locale":"{}","messages":{}}}"#,
                context.locale(),
                context.messages_json()
            ),
        }
    }
}

fn format_timestamp(value: Option<&DateTime<Utc>>) -> String {
    value
        .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_default()
}

/// A user as shown on the account and admin pages.
#[derive(Debug, Clone)]
pub struct UserRow {
    /// Account id.
    pub id: String,
    /// Email or id, whichever is available.
    pub label: String,
    /// Empty when unknown.
    pub email: String,
    /// Formatted creation time.
    pub created_at: String,
    /// Formatted last sign-in time.
    pub last_sign_in: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            label: user.label().to_owned(),
            email: user.email.clone().unwrap_or_default(),
            created_at: format_timestamp(user.created_at.as_ref()),
            last_sign_in: format_timestamp(user.last_sign_in_at.as_ref()),
        }
    }
}

/// A notification on the admin page.
#[derive(Debug, Clone)]
pub struct NotificationRow {
    /// Summary line.
    pub title: String,
    /// Full text; empty when absent.
    pub body: String,
    /// Formatted creation time.
    pub created_at: String,
    /// Highlighted when true.
    pub unread: bool,
}

impl From<&Notification> for NotificationRow {
    fn from(notification: &Notification) -> Self {
        Self {
            title: notification.title.clone(),
            body: notification.body.clone().unwrap_or_default(),
            created_at: format_timestamp(notification.created_at.as_ref()),
            unread: !notification.read,
        }
    }
}

/// A person card or row on the people page.
#[derive(Debug, Clone)]
pub struct PersonCard {
    /// Person id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Empty when unknown.
    pub email: String,
    /// Empty when the person has no known type.
    pub type_name: String,
}

impl From<&PersonRow> for PersonCard {
    fn from(row: &PersonRow) -> Self {
        Self {
            id: row.person.id.clone(),
            name: row.person.display_name(),
            email: row.person.email.clone().unwrap_or_default(),
            type_name: row.type_name.clone().unwrap_or_default(),
        }
    }
}

/// Signed-in user's account page.
#[derive(Template)]
#[template(path = "account.html")]
pub struct AccountView {
    /// Translations for the template.
    pub t: LocaleContext,
    /// Shared chrome.
    pub layout: Layout,
    /// The signed-in user.
    pub user: UserRow,
    /// Sign-out confirmation.
    pub dialog: ConfirmDialog,
}

impl AccountView {
    /// Account page with the sign-out confirmation.
    pub fn new(context: LocaleContext, user: &User) -> Self {
        let dialog = ConfirmDialog {
            id: "sign-out-dialog".to_owned(),
            variant: DialogVariant::Warning,
            title: context.text("dialog.sign_out.title").to_owned(),
            body: context.text("dialog.sign_out.body").to_owned(),
            confirm_label: context.text("dialog.sign_out.confirm").to_owned(),
            cancel_label: context.text("dialog.cancel").to_owned(),
            action: context.path("sign-out"),
        };
        Self {
            layout: Layout::new(&context, "account.title", "dashboard/account"),
            user: UserRow::from(user),
            dialog,
            t: context,
        }
    }
}

/// Users and notifications.
#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminView {
    /// Translations for the template.
    pub t: LocaleContext,
    /// Shared chrome.
    pub layout: Layout,
    /// Every account.
    pub users: Vec<UserRow>,
    /// Every notification.
    pub notifications: Vec<NotificationRow>,
}

impl AdminView {
    /// Admin page from loaded data.
    pub fn new(context: LocaleContext, page: &AdminPage) -> Self {
        Self {
            layout: Layout::new(&context, "admin.title", "dashboard/admin"),
            users: page.users.iter().map(UserRow::from).collect(),
            notifications: page.notifications.iter().map(NotificationRow::from).collect(),
            t: context,
        }
    }
}

/// Static documentation page.
#[derive(Template)]
#[template(path = "documentation.html")]
pub struct DocumentationView {
    /// Translations for the template.
    pub t: LocaleContext,
    /// Shared chrome.
    pub layout: Layout,
    /// Translated sections.
    pub sections: Vec<DocSection>,
}

impl DocumentationView {
    /// Documentation page from translated sections.
    pub fn new(context: LocaleContext, sections: Vec<DocSection>) -> Self {
        Self {
            layout: Layout::new(&context, "documentation.title", "dashboard/documentation"),
            sections,
            t: context,
        }
    }
}

/// People directory.
#[derive(Template)]
#[template(path = "people.html")]
pub struct PeopleView {
    /// Translations for the template.
    pub t: LocaleContext,
    /// Shared chrome.
    pub layout: Layout,
    /// `list` or `grid`.
    pub mode: &'static str,
    /// Link switching to the other layout.
    pub toggle_href: String,
    /// Label of that link.
    pub toggle_label: String,
    /// One card per person.
    pub people: Vec<PersonCard>,
}

impl PeopleView {
    /// People page in the resolved layout.
    pub fn new(context: LocaleContext, page: &PeoplePage, mode: ViewMode) -> Self {
        let other = mode.toggled();
        Self {
            layout: Layout::new(&context, "people.title", "dashboard/people"),
            mode: mode.as_str(),
            toggle_href: format!("{}?view={}", context.path("dashboard/people"), other.as_str()),
            toggle_label: context.text(&format!("people.view.{}", other.as_str())).to_owned(),
            people: page.rows.iter().map(PersonCard::from).collect(),
            t: context,
        }
    }
}

/// Sign-in form.
#[derive(Template)]
#[template(path = "connect.html")]
pub struct ConnectView {
    /// Translations for the template.
    pub t: LocaleContext,
    /// Shared chrome.
    pub layout: Layout,
    /// Form action.
    pub action: String,
    /// Email to prefill after a failed attempt.
    pub email: String,
    /// Translated error; empty when there is none.
    pub error: String,
}

impl ConnectView {
    /// Sign-in form, optionally with a translated error.
    pub fn new(context: LocaleContext, email: &str, error_key: Option<&str>) -> Self {
        Self {
            layout: Layout::new(&context, "connect.title", "connect"),
            action: context.path("connect"),
            email: email.to_owned(),
            error: error_key
                .map(|key| context.text(key).to_owned())
                .unwrap_or_default(),
            t: context,
        }
    }
}

/// Render a template, mapping failures to an internal error.
pub fn render<T: Template>(view: &T) -> Result<String, Error> {
    view.render().map_err(|err| {
        error!(error = %err, "template rendering failed");
        Error::internal("failed to render page")
    })
}
