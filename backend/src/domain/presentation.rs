//! View-state helpers: confirmation dialog variants and list/grid layout.
//!
//! Nothing here is persisted. The values are computed per request and read
//! by the templates.

use serde::{Deserialize, Serialize};

/// Visual intent of a confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogVariant {
    /// Neutral confirmation.
    Informational,
    /// Irreversible action.
    Destructive,
    /// Action with consequences the user should notice.
    Warning,
}

impl DialogVariant {
    /// Icon identifier rendered next to the dialog title.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Informational => "info-circle",
            Self::Destructive => "trash",
            Self::Warning => "alert-triangle",
        }
    }

    /// CSS modifier for the confirm button.
    pub fn confirm_class(self) -> &'static str {
        match self {
            Self::Informational => "button--primary",
            Self::Destructive => "button--danger",
            Self::Warning => "button--warning",
        }
    }

    /// Whether the dialog shows a cancel button next to confirm.
    ///
    /// Informational dialogs only acknowledge.
    pub fn has_cancel(self) -> bool {
        !matches!(self, Self::Informational)
    }

    /// Stable name used for the `data-variant` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Informational => "informational",
            Self::Destructive => "destructive",
            Self::Warning => "warning",
        }
    }
}

/// Confirmation dialog with already translated copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog {
    /// DOM id of the `<dialog>` element.
    pub id: String,
    /// Visual treatment.
    pub variant: DialogVariant,
    /// Heading.
    pub title: String,
    /// Explanation of what confirming does.
    pub body: String,
    /// Confirm button label.
    pub confirm_label: String,
    /// Cancel button label; unused by informational dialogs.
    pub cancel_label: String,
    /// Form action submitted on confirm.
    pub action: String,
}

/// Layout used for collection pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    List,
    Grid,
}

/// Viewports narrower than this (in CSS pixels) default to the grid layout.
pub const NARROW_VIEWPORT_MAX_WIDTH: u32 = 768;

/// What the request tells us about the client's screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientViewport {
    /// `Sec-CH-Viewport-Width` client hint, when sent.
    pub width: Option<u32>,
    /// `Sec-CH-UA-Mobile: ?1`, or a user agent carrying the `Mobi` token.
    pub mobile: bool,
}

impl ClientViewport {
    /// Width hint wins; without it, the mobile signal decides.
    pub fn is_narrow(self) -> bool {
        match self.width {
            Some(width) => width < NARROW_VIEWPORT_MAX_WIDTH,
            None => self.mobile,
        }
    }
}

impl ViewMode {
    /// Parse the `view` query parameter.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "list" => Some(Self::List),
            "grid" => Some(Self::Grid),
            _ => None,
        }
    }

    /// Explicit request first, then grid for narrow viewports, else list.
    ///
    /// # Examples
    /// ```
    /// use dashboard::domain::{ClientViewport, ViewMode};
    ///
    /// let phone = ClientViewport { width: Some(390), mobile: true };
    /// assert_eq!(ViewMode::resolve(None, phone), ViewMode::Grid);
    /// assert_eq!(ViewMode::resolve(Some(ViewMode::List), phone), ViewMode::List);
    /// ```
    pub fn resolve(requested: Option<Self>, viewport: ClientViewport) -> Self {
        match requested {
            Some(mode) => mode,
            None if viewport.is_narrow() => Self::Grid,
            None => Self::List,
        }
    }

    /// Lowercase name used in URLs and CSS classes.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Grid => "grid",
        }
    }

    /// The other mode, for the toggle link.
    pub fn toggled(self) -> Self {
        match self {
            Self::List => Self::Grid,
            Self::Grid => Self::List,
        }
    }
}
