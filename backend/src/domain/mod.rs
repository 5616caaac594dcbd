//! Domain primitives, services, and ports.
//!
//! Purpose: keep locale resolution and page loading independent of Actix and
//! of the backend service's wire format. Inbound adapters call into this
//! module; outbound adapters implement [`ports`].
//!
//! Public surface:
//! - [`LocaleRouter`] resolves a request's locale and loads its messages.
//! - [`PageLoader`] fetches the data behind each dashboard page.
//! - [`Error`] is the transport-agnostic failure type.

pub mod auth;
pub mod error;
pub mod locale;
pub mod localization;
pub mod messages;
pub mod page_loader;
pub mod people;
pub mod ports;
pub mod presentation;
pub mod trace_id;
pub mod user;

pub use self::auth::{AccessToken, AuthSession, LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::locale::{Locale, LocaleSet, LocaleSetError, LocaleValidationError};
pub use self::localization::{LocaleContext, LocaleRouter, RequestConfig};
pub use self::messages::{MessageBundle, MessageBundleError};
pub use self::page_loader::{
    AccountPage, AdminPage, DocSection, DocumentationPage, PageLoader, PeoplePage, PersonRow,
};
pub use self::people::{Notification, Person, PersonType};
pub use self::presentation::{ClientViewport, ConfirmDialog, DialogVariant, ViewMode};
pub use self::trace_id::TraceId;
pub use self::user::{User, UserId, UserValidationError};
