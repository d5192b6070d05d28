//! The application store: session, notifications, theme, and the cached
//! QR-code collection.
//!
//! One `Store` is built per run and handed to whoever needs it; every state
//! change goes through the methods below and completes before the next event
//! is processed. Network work happens outside: the asynchronous operations
//! (`initialize`, `login`) are split into a `begin_*` half that hands out a
//! [`RequestTicket`] and a `finish_*` half that applies the response. A ticket
//! from before the latest login, initialize or logout is stale and its
//! response is dropped.

use crate::api::models::{AuthResponse, QrCode, RestoredSession, TokenPair, User};
use crate::api::ApiError;
use crate::app::clock::Clock;
use crate::app::notifications::{
    NewNotification, Notification, NotificationCenter, NotificationId, NotificationKind,
};
use crate::storage::{KeyValueStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, THEME_KEY};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_THEME: &str = "light";

const LOGIN_FAILED_FALLBACK: &str = "Unable to sign in. Please try again.";
const TOKEN_WRITE_FAILED: &str = "Could not save your credentials on this device.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Uninitialized,
    Loading,
    Authenticated,
    Anonymous,
}

/// Auth epoch captured when an asynchronous request starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

/// Which endpoint produced an [`AuthResponse`]; only changes the wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFlow {
    Login,
    Signup,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Success(User),
    Failure(String),
    /// A newer login, initialize or logout started while this one was in flight.
    Superseded,
}

/// Stored credentials that `initialize` needs validated.
#[derive(Debug, Clone)]
pub struct PendingValidation {
    pub ticket: RequestTicket,
    pub access_token: String,
    pub refresh_token: Option<String>,
}

pub struct Store {
    user: Option<User>,
    loading: bool,
    initialized: bool,
    theme: String,
    notifications: NotificationCenter,
    qr_codes: Vec<QrCode>,
    analytics: Option<serde_json::Value>,
    epoch: u64,
    storage: Box<dyn KeyValueStore>,
}

impl Store {
    pub fn new(storage: Box<dyn KeyValueStore>, clock: Box<dyn Clock>, notification_ttl: Duration) -> Self {
        Self {
            user: None,
            loading: false,
            initialized: false,
            theme: DEFAULT_THEME.to_string(),
            notifications: NotificationCenter::new(clock, notification_ttl),
            qr_codes: Vec::new(),
            analytics: None,
            epoch: 0,
            storage,
        }
    }

    /// Theme used until one is restored from storage or set explicitly.
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    // --- read side ---------------------------------------------------------

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn status(&self) -> SessionStatus {
        if self.loading {
            SessionStatus::Loading
        } else if !self.initialized {
            SessionStatus::Uninitialized
        } else if self.user.is_some() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Anonymous
        }
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn notifications(&self) -> &[Notification] {
        self.notifications.items()
    }

    pub fn newest_notification(&self) -> Option<NotificationId> {
        self.notifications.newest()
    }

    pub fn qr_codes(&self) -> &[QrCode] {
        &self.qr_codes
    }

    pub fn analytics(&self) -> Option<&serde_json::Value> {
        self.analytics.as_ref()
    }

    pub fn access_token(&self) -> Option<String> {
        self.storage.get(ACCESS_TOKEN_KEY)
    }

    pub fn ticket(&self) -> RequestTicket {
        RequestTicket(self.epoch)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.epoch
    }

    fn advance_epoch(&mut self) -> RequestTicket {
        self.epoch += 1;
        RequestTicket(self.epoch)
    }

    // --- session -----------------------------------------------------------

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Startup half of `initialize`: restore the theme and, when a token is
    /// stored, return it for validation. Without a token the session resolves
    /// to anonymous immediately.
    pub fn begin_initialize(&mut self) -> Option<PendingValidation> {
        if self.initialized {
            warn!("initialize called on an already initialized store");
            return None;
        }
        self.loading = true;
        if let Some(theme) = self.storage.get(THEME_KEY) {
            self.theme = theme;
        }
        let ticket = self.advance_epoch();
        match self.storage.get(ACCESS_TOKEN_KEY) {
            Some(access_token) => Some(PendingValidation {
                ticket,
                access_token,
                refresh_token: self.storage.get(REFRESH_TOKEN_KEY),
            }),
            None => {
                self.loading = false;
                self.initialized = true;
                None
            }
        }
    }

    /// Apply the result of validating the stored token. Failures are silent:
    /// the token is discarded and the session stays anonymous.
    pub fn finish_initialize(&mut self, ticket: RequestTicket, result: Result<RestoredSession, ApiError>) {
        if !self.is_current(ticket) {
            debug!("dropping stale session validation");
            return;
        }
        match result {
            Ok(restored) => {
                if let Some(tokens) = restored.tokens {
                    if let Err(e) = self.write_tokens(&tokens) {
                        warn!("failed to store refreshed tokens: {:#}", e);
                        self.discard_tokens();
                        self.loading = false;
                        self.initialized = true;
                        return;
                    }
                }
                info!(user = %restored.user.email, "session restored");
                self.user = Some(restored.user);
            }
            Err(e) => {
                info!("stored session rejected: {}", e);
                self.discard_tokens();
                self.user = None;
            }
        }
        self.loading = false;
        self.initialized = true;
    }

    pub fn begin_login(&mut self) -> RequestTicket {
        self.loading = true;
        self.advance_epoch()
    }

    /// Apply a login (or signup) response. Tokens are written before the user
    /// is set; if that write fails the login is reported as failed.
    pub fn finish_login(
        &mut self,
        ticket: RequestTicket,
        flow: AuthFlow,
        result: Result<AuthResponse, ApiError>,
    ) -> LoginOutcome {
        if !self.is_current(ticket) {
            debug!("dropping stale {:?} response", flow);
            return LoginOutcome::Superseded;
        }
        self.loading = false;
        self.initialized = true;

        let (ok_title, err_title) = match flow {
            AuthFlow::Login => ("Signed in", "Sign-in failed"),
            AuthFlow::Signup => ("Account created", "Sign-up failed"),
        };

        let auth = match result {
            Ok(auth) => auth,
            Err(e) => {
                warn!("{:?} failed: {}", flow, e);
                let message = e.detail().unwrap_or(LOGIN_FAILED_FALLBACK).to_string();
                self.notify(NotificationKind::Error, err_title, Some(message.clone()));
                return LoginOutcome::Failure(message);
            }
        };

        let tokens = TokenPair {
            access_token: auth.access_token,
            refresh_token: auth.refresh_token,
        };
        if let Err(e) = self.write_tokens(&tokens) {
            warn!("failed to store tokens: {:#}", e);
            self.discard_tokens();
            self.notify(NotificationKind::Error, err_title, Some(TOKEN_WRITE_FAILED.to_string()));
            return LoginOutcome::Failure(TOKEN_WRITE_FAILED.to_string());
        }

        info!(user = %auth.user.email, "signed in");
        let welcome = format!("Welcome {}!", auth.user.name);
        self.user = Some(auth.user.clone());
        self.notify(NotificationKind::Success, ok_title, Some(welcome));
        LoginOutcome::Success(auth.user)
    }

    /// Tokens go first; then the in-memory session and caches are reset.
    pub fn logout(&mut self) {
        self.discard_tokens();
        self.advance_epoch();
        self.user = None;
        self.loading = false;
        self.initialized = true;
        self.qr_codes.clear();
        self.analytics = None;
        info!("signed out");
        self.notify(NotificationKind::Info, "Signed out", Some("See you soon!".to_string()));
    }

    fn write_tokens(&mut self, tokens: &TokenPair) -> anyhow::Result<()> {
        self.storage.set(ACCESS_TOKEN_KEY, &tokens.access_token)?;
        self.storage.set(REFRESH_TOKEN_KEY, &tokens.refresh_token)?;
        Ok(())
    }

    fn discard_tokens(&mut self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!("failed to remove {}: {:#}", key, e);
            }
        }
    }

    // --- preferences -------------------------------------------------------

    pub fn set_theme(&mut self, theme: impl Into<String>) {
        let theme = theme.into();
        if let Err(e) = self.storage.set(THEME_KEY, &theme) {
            warn!("failed to persist theme: {:#}", e);
        }
        self.theme = theme;
    }

    // --- notifications -----------------------------------------------------

    pub fn add_notification(&mut self, notification: NewNotification) -> NotificationId {
        self.notifications.push(notification)
    }

    pub fn notify(&mut self, kind: NotificationKind, title: &str, message: Option<String>) -> NotificationId {
        let n = NewNotification::new(kind, title);
        self.add_notification(match message {
            Some(message) => n.with_message(message),
            None => n,
        })
    }

    pub fn remove_notification(&mut self, id: NotificationId) {
        self.notifications.remove(id);
    }

    /// Time left before `id` is expired.
    pub fn notification_remaining(&self, id: NotificationId) -> Option<Duration> {
        self.notifications.remaining(id)
    }

    pub fn clear_notifications(&mut self) {
        self.notifications.clear();
    }

    /// Drop notifications past their deadline. Returns how many were removed.
    pub fn expire_notifications(&mut self) -> usize {
        self.notifications.expire().len()
    }

    // --- QR-code cache -----------------------------------------------------

    pub fn set_qr_codes(&mut self, qr_codes: Vec<QrCode>) {
        self.qr_codes = qr_codes;
    }

    /// Newest first.
    pub fn add_qr_code(&mut self, qr_code: QrCode) {
        self.qr_codes.insert(0, qr_code);
    }

    /// Replace the cached entry with the same id. Unknown ids are ignored.
    pub fn update_qr_code(&mut self, qr_code: QrCode) -> bool {
        match self.qr_codes.iter_mut().find(|qr| qr.id == qr_code.id) {
            Some(existing) => {
                *existing = qr_code;
                true
            }
            None => false,
        }
    }

    pub fn delete_qr_code(&mut self, id: &str) -> bool {
        let before = self.qr_codes.len();
        self.qr_codes.retain(|qr| qr.id != id);
        self.qr_codes.len() != before
    }

    pub fn set_analytics(&mut self, analytics: serde_json::Value) {
        self.analytics = Some(analytics);
    }

    pub fn clear_analytics(&mut self) {
        self.analytics = None;
    }
}
