//! Application state: who is signed in, what they parsed, and how much of
//! their monthly quota is used.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::{Result, SessionError};
use crate::ledger::InvoiceLedger;
use crate::models::config::InvparseConfig;
use crate::models::invoice::InvoiceRecord;
use crate::models::session::{month_key, Plan, Session, Theme, UsageLimit, User};

use super::ingest::{IngestionPort, InvoiceSource};

/// State owned by the host and mutated through its methods.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    config: InvparseConfig,
    session: Session,
    theme: Theme,
    ledger: InvoiceLedger,
    usage: Option<UsageLimit>,
}

impl AppState {
    /// Anonymous state with the dark theme and an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: InvparseConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &InvparseConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn ledger(&self) -> &InvoiceLedger {
        &self.ledger
    }

    /// Usage counter of the current month, if anything was parsed yet.
    pub fn usage(&self) -> Option<&UsageLimit> {
        self.usage.as_ref()
    }

    pub fn sign_in(&mut self, user: User) {
        info!("Session started for {}", user.email);
        self.session = Session::SignedIn(user);
    }

    /// End the session and drop everything it produced.
    pub fn logout(&mut self) {
        if let Some(user) = self.session.user() {
            info!("Session ended for {}", user.email);
        }
        self.session = Session::Anonymous;
        self.ledger = InvoiceLedger::new();
        self.usage = None;
    }

    /// Switch between dark and light theme, returning the new one.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    /// Invoices the signed-in user may still parse in the month of `now`.
    /// `None` means unlimited.
    pub fn remaining_quota(&self, now: DateTime<Utc>) -> Option<u32> {
        let user = self.session.user()?;
        match user.plan {
            Plan::Pro => None,
            Plan::Free => Some(
                self.config
                    .plans
                    .free_monthly_limit
                    .saturating_sub(self.parsed_in_month(&month_key(now.date_naive()))),
            ),
        }
    }

    /// Parse `source` through `port` and append the result to the ledger.
    pub async fn submit<P>(
        &mut self,
        port: &P,
        source: InvoiceSource,
        now: DateTime<Utc>,
    ) -> Result<&InvoiceRecord>
    where
        P: IngestionPort + ?Sized,
    {
        let user = self.session.user().ok_or(SessionError::NotSignedIn)?;
        let month = month_key(now.date_naive());

        if user.plan == Plan::Free {
            let limit = self.config.plans.free_monthly_limit;
            if self.parsed_in_month(&month) >= limit {
                warn!("Monthly limit of {} reached for {}", limit, user.email);
                return Err(SessionError::QuotaExceeded { limit, month }.into());
            }
        }

        let record = port.ingest(source, now).await?;

        match self.usage.as_mut() {
            Some(usage) if usage.month_year == month => usage.invoices_parsed += 1,
            _ => {
                let mut usage = UsageLimit::for_month(now.date_naive());
                usage.invoices_parsed = 1;
                self.usage = Some(usage);
            }
        }

        self.ledger.push(record);
        Ok(&self.ledger.records()[self.ledger.len() - 1])
    }

    fn parsed_in_month(&self, month: &str) -> u32 {
        self.usage
            .as_ref()
            .filter(|u| u.month_year == month)
            .map(|u| u.invoices_parsed)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvparseError;
    use crate::service::auth::{AuthPort, MockAuth};
    use crate::service::ingest::LocalIngestion;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-20T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn source(n: usize) -> InvoiceSource {
        InvoiceSource::Text(format!(
            "From: Vendor {n}\nInvoice #: INV-{n}\nDate: 03/15/2024\nTotal: $10.00"
        ))
    }

    async fn signed_in(plan: Plan) -> AppState {
        let mut user = MockAuth::immediate()
            .login("jane@example.com", "secret")
            .await
            .unwrap();
        user.plan = plan;

        let mut state = AppState::new();
        state.sign_in(user);
        state
    }

    #[test]
    fn test_initial_state() {
        let state = AppState::new();
        assert!(!state.session().is_signed_in());
        assert_eq!(state.theme(), Theme::Dark);
        assert!(state.ledger().is_empty());
        assert!(state.usage().is_none());
    }

    #[test]
    fn test_toggle_theme() {
        let mut state = AppState::new();
        assert_eq!(state.toggle_theme(), Theme::Light);
        assert_eq!(state.toggle_theme(), Theme::Dark);
    }

    #[tokio::test]
    async fn test_submit_requires_sign_in() {
        let mut state = AppState::new();
        let err = state
            .submit(&LocalIngestion::immediate(), source(1), now())
            .await
            .unwrap_err();

        assert!(matches!(err, InvparseError::Session(SessionError::NotSignedIn)));
        assert!(state.ledger().is_empty());
    }

    #[tokio::test]
    async fn test_submit_appends_to_ledger() {
        let mut state = signed_in(Plan::Free).await;
        let port = LocalIngestion::immediate();

        let record = state.submit(&port, source(1), now()).await.unwrap();
        assert_eq!(record.invoice_number, "INV-1");

        state.submit(&port, source(2), now()).await.unwrap();
        assert_eq!(state.ledger().len(), 2);
        assert_eq!(state.usage().unwrap().invoices_parsed, 2);
        assert_eq!(state.usage().unwrap().month_year, "2024-03");
        assert_eq!(state.remaining_quota(now()), Some(8));
    }

    #[tokio::test]
    async fn test_free_plan_quota() {
        let mut state = signed_in(Plan::Free).await;
        let port = LocalIngestion::immediate();

        for n in 0..10 {
            state.submit(&port, source(n), now()).await.unwrap();
        }

        let err = state.submit(&port, source(10), now()).await.unwrap_err();
        assert!(matches!(
            err,
            InvparseError::Session(SessionError::QuotaExceeded { limit: 10, .. })
        ));
        assert_eq!(state.ledger().len(), 10);

        // New month, fresh quota.
        let next_month = DateTime::parse_from_rfc3339("2024-04-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        state.submit(&port, source(11), next_month).await.unwrap();
        assert_eq!(state.usage().unwrap().month_year, "2024-04");
        assert_eq!(state.usage().unwrap().invoices_parsed, 1);
    }

    #[tokio::test]
    async fn test_pro_plan_is_unlimited() {
        let mut state = signed_in(Plan::Pro).await;
        let port = LocalIngestion::immediate();

        for n in 0..12 {
            state.submit(&port, source(n), now()).await.unwrap();
        }
        assert_eq!(state.ledger().len(), 12);
        assert_eq!(state.remaining_quota(now()), None);
    }

    #[tokio::test]
    async fn test_rejected_source_does_not_count() {
        let mut state = signed_in(Plan::Free).await;
        let result = state
            .submit(
                &LocalIngestion::immediate(),
                InvoiceSource::Text(String::new()),
                now(),
            )
            .await;

        assert!(result.is_err());
        assert!(state.usage().is_none());
        assert!(state.ledger().is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let mut state = signed_in(Plan::Free).await;
        state
            .submit(&LocalIngestion::immediate(), source(1), now())
            .await
            .unwrap();

        state.logout();
        assert!(!state.session().is_signed_in());
        assert!(state.ledger().is_empty());
        assert!(state.usage().is_none());
    }
}
