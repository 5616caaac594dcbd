//! Per-page data loading.
//!
//! Each loader fetches what one dashboard page shows and nothing else. There
//! is no caching and no retry; a failing fetch fails the page. Independent
//! fetches run concurrently and are both awaited before the page renders.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::{AdminQuery, IdentityService, PeopleQuery};
use crate::domain::{
    AccessToken, Error, LocaleContext, Notification, Person, PersonType, User,
};

/// Outcome of loading the account page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountPage {
    /// Signed in: render the account view for this user.
    Render(User),
    /// No session or the identity service does not know the token.
    RedirectToConnect,
}

/// Data behind the admin page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminPage {
    /// Accounts in the order the identity service lists them.
    pub users: Vec<User>,
    /// Notifications, newest first as stored.
    pub notifications: Vec<Notification>,
}

/// One row of the people page.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonRow {
    /// The person as read from the directory.
    pub person: Person,
    /// Name of the person's type, when it is known.
    pub type_name: Option<String>,
}

/// Data behind the people page.
#[derive(Debug, Clone, PartialEq)]
pub struct PeoplePage {
    /// One row per person.
    pub rows: Vec<PersonRow>,
    /// All known person types.
    pub person_types: Vec<PersonType>,
}

/// One documentation section, already translated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocSection {
    /// Anchor id, the section's key in the bundle.
    pub id: String,
    /// Heading.
    pub title: String,
    /// Paragraph text.
    pub body: String,
}

/// Data behind the documentation page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentationPage {
    /// Sections in bundle order.
    pub sections: Vec<DocSection>,
}

const DOC_SECTIONS_PREFIX: &str = "documentation.sections";

/// Loads page data through the identity and data ports.
#[derive(Clone)]
pub struct PageLoader {
    identity: Arc<dyn IdentityService>,
    admin: Arc<dyn AdminQuery>,
    people: Arc<dyn PeopleQuery>,
}

impl PageLoader {
    /// Create a loader over the given ports.
    pub fn new(
        identity: Arc<dyn IdentityService>,
        admin: Arc<dyn AdminQuery>,
        people: Arc<dyn PeopleQuery>,
    ) -> Self {
        Self {
            identity,
            admin,
            people,
        }
    }

    /// Identity port, shared with the connect and sign-out handlers.
    pub fn identity(&self) -> &Arc<dyn IdentityService> {
        &self.identity
    }

    /// Check the session token and load the signed-in user.
    ///
    /// # Errors
    /// Propagates identity service failures other than an unknown token.
    pub async fn load_account(&self, token: Option<&AccessToken>) -> Result<AccountPage, Error> {
        let Some(token) = token else {
            debug!("account page requested without a session");
            return Ok(AccountPage::RedirectToConnect);
        };
        match self.identity.get_user(token).await? {
            Some(user) => Ok(AccountPage::Render(user)),
            None => {
                debug!("session token unknown to the identity service");
                Ok(AccountPage::RedirectToConnect)
            }
        }
    }

    /// Fetch users and notifications concurrently.
    ///
    /// # Errors
    /// The first failing fetch fails the page.
    pub async fn load_admin(&self) -> Result<AdminPage, Error> {
        let (users, notifications) =
            tokio::try_join!(self.admin.list_users(), self.admin.list_notifications())?;
        debug!(
            users = users.len(),
            notifications = notifications.len(),
            "admin page loaded"
        );
        Ok(AdminPage {
            users,
            notifications,
        })
    }

    /// Fetch people and person types concurrently and label each person.
    ///
    /// # Errors
    /// The first failing fetch fails the page.
    pub async fn load_people(&self) -> Result<PeoplePage, Error> {
        let (people, person_types) =
            tokio::try_join!(self.people.list_people(), self.people.list_person_types())?;
        let names: HashMap<&str, &str> = person_types
            .iter()
            .map(|kind| (kind.id.as_str(), kind.name.as_str()))
            .collect();
        let rows = people
            .into_iter()
            .map(|person| {
                let type_name = person
                    .person_type_id
                    .as_deref()
                    .and_then(|id| names.get(id))
                    .map(|name| (*name).to_owned());
                PersonRow { person, type_name }
            })
            .collect();
        Ok(PeoplePage { rows, person_types })
    }

    /// Collect documentation sections from the active bundle.
    ///
    /// Sections are `documentation.sections.<id>.title` / `.body` pairs,
    /// ordered by id. A section without a title is skipped.
    pub fn load_documentation(&self, context: &LocaleContext) -> DocumentationPage {
        let mut sections: Vec<DocSection> = Vec::new();
        for (rest, text) in context.messages().section(DOC_SECTIONS_PREFIX) {
            let Some((id, field)) = rest.split_once('.') else {
                continue;
            };
            let index = match sections.iter().position(|section| section.id == id) {
                Some(index) => index,
                None => {
                    sections.push(DocSection {
                        id: id.to_owned(),
                        title: String::new(),
                        body: String::new(),
                    });
                    sections.len() - 1
                }
            };
            if let Some(section) = sections.get_mut(index) {
                match field {
                    "title" => text.clone_into(&mut section.title),
                    "body" => text.clone_into(&mut section.body),
                    _ => {}
                }
            }
        }
        sections.retain(|section| !section.title.is_empty());
        DocumentationPage { sections }
    }
}

#[cfg(test)]
mod tests;
