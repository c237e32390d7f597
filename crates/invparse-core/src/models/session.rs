//! Account, session and usage models.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Subscription plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    /// Limited number of invoices per month.
    #[default]
    Free,
    /// Unlimited invoices.
    Pro,
}

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub plan: Plan,
    pub created_at: DateTime<Utc>,
}

/// Authentication state of the application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    /// Nobody is signed in.
    #[default]
    Anonymous,
    /// A user is signed in.
    SignedIn(User),
}

impl Session {
    /// The signed-in user, if any.
    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Anonymous => None,
            Session::SignedIn(user) => Some(user),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, Session::SignedIn(_))
    }
}

/// Display theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Number of invoices parsed in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageLimit {
    /// Month key in `YYYY-MM` form.
    pub month_year: String,
    pub invoices_parsed: u32,
}

impl UsageLimit {
    /// Empty counter for the month containing `date`.
    pub fn for_month(date: NaiveDate) -> Self {
        Self {
            month_year: month_key(date),
            invoices_parsed: 0,
        }
    }
}

/// `YYYY-MM` key of the month containing `date`.
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}
