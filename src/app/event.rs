use crate::api::models::{AuthResponse, LandingPage, QrCode, RestoredSession};
use crate::api::ApiError;
use crate::app::store::{AuthFlow, RequestTicket};
use crossterm::event::Event as CrosstermEvent;

#[derive(Debug)]
pub enum AppEvent {
    /// Terminal input event
    Terminal(CrosstermEvent),

    /// A spawned request finished
    Api(ApiEvent),

    /// Tick for notification expiry and UI refresh
    Tick,
}

/// Completion of an [`Action`](crate::app::action::Action). Every variant
/// echoes the ticket it was dispatched with.
#[derive(Debug)]
pub enum ApiEvent {
    SessionRestored {
        ticket: RequestTicket,
        result: Result<RestoredSession, ApiError>,
    },
    AuthFinished {
        ticket: RequestTicket,
        flow: AuthFlow,
        result: Result<AuthResponse, ApiError>,
    },
    QrCodesLoaded {
        ticket: RequestTicket,
        result: Result<Vec<QrCode>, ApiError>,
    },
    QrCreated {
        ticket: RequestTicket,
        result: Result<QrCode, ApiError>,
    },
    QrUpdated {
        ticket: RequestTicket,
        result: Result<QrCode, ApiError>,
    },
    QrDeleted {
        ticket: RequestTicket,
        id: String,
        result: Result<(), ApiError>,
    },
    /// `qr_id` is `None` for the dashboard snapshot.
    AnalyticsLoaded {
        ticket: RequestTicket,
        qr_id: Option<String>,
        result: Result<serde_json::Value, ApiError>,
    },
    LandingPagesLoaded {
        ticket: RequestTicket,
        result: Result<Vec<LandingPage>, ApiError>,
    },
    LandingPageDeleted {
        ticket: RequestTicket,
        id: String,
        result: Result<(), ApiError>,
    },
}

impl ApiEvent {
    pub fn ticket(&self) -> RequestTicket {
        match self {
            ApiEvent::SessionRestored { ticket, .. }
            | ApiEvent::AuthFinished { ticket, .. }
            | ApiEvent::QrCodesLoaded { ticket, .. }
            | ApiEvent::QrCreated { ticket, .. }
            | ApiEvent::QrUpdated { ticket, .. }
            | ApiEvent::QrDeleted { ticket, .. }
            | ApiEvent::AnalyticsLoaded { ticket, .. }
            | ApiEvent::LandingPagesLoaded { ticket, .. }
            | ApiEvent::LandingPageDeleted { ticket, .. } => *ticket,
        }
    }
}
