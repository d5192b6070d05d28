use crate::api::models::TargetUpdateRequest;
use crate::api::ApiClient;
use crate::app::action::{Action, AuthRequest};
use crate::app::event::{ApiEvent, AppEvent};
use crate::app::store::AuthFlow;
use tokio::sync::mpsc;
use tracing::debug;

/// Runs request [`Action`]s on their own tasks and posts each result back to
/// the event loop as an [`ApiEvent`].
pub struct ApiManager {
    client: ApiClient,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl ApiManager {
    pub fn new(client: ApiClient, event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { client, event_tx }
    }

    /// Spawn the request behind `action`. `Quit` is not a request and is ignored.
    pub fn dispatch(&self, action: Action) {
        if matches!(action, Action::Quit) {
            return;
        }
        let client = self.client.clone();
        let event_tx = self.event_tx.clone();

        tokio::spawn(async move {
            let Some(event) = run(&client, action).await else {
                return;
            };
            if event_tx.send(AppEvent::Api(event)).is_err() {
                debug!("event loop gone, dropping response");
            }
        });
    }
}

async fn run(client: &ApiClient, action: Action) -> Option<ApiEvent> {
    let event = match action {
        Action::ValidateSession {
            ticket,
            access_token,
            refresh_token,
        } => ApiEvent::SessionRestored {
            ticket,
            result: client.restore_session(&access_token, refresh_token.as_deref()).await,
        },
        Action::Authenticate { ticket, request } => match request {
            AuthRequest::Login(credentials) => ApiEvent::AuthFinished {
                ticket,
                flow: AuthFlow::Login,
                result: client.login(&credentials).await,
            },
            AuthRequest::Signup(body) => ApiEvent::AuthFinished {
                ticket,
                flow: AuthFlow::Signup,
                result: client.signup(&body).await,
            },
        },
        Action::FetchQrCodes { ticket, token, filter } => ApiEvent::QrCodesLoaded {
            ticket,
            result: client.list_qr_codes(&token, &filter).await,
        },
        Action::CreateQrCode { ticket, token, request } => ApiEvent::QrCreated {
            ticket,
            result: client.create_qr_code(&token, &request).await,
        },
        Action::UpdateQrCode {
            ticket,
            token,
            id,
            request,
        } => ApiEvent::QrUpdated {
            ticket,
            result: client.update_qr_code(&token, &id, &request).await,
        },
        Action::RetargetQrCode {
            ticket,
            token,
            id,
            target,
        } => ApiEvent::QrUpdated {
            ticket,
            result: client
                .update_qr_target(&token, &id, &TargetUpdateRequest { target })
                .await,
        },
        Action::DeleteQrCode { ticket, token, id } => {
            let result = client.delete_qr_code(&token, &id).await;
            ApiEvent::QrDeleted { ticket, id, result }
        }
        Action::FetchDashboard { ticket, token } => ApiEvent::AnalyticsLoaded {
            ticket,
            qr_id: None,
            result: client.dashboard_analytics(&token).await,
        },
        Action::FetchQrSummary { ticket, token, id } => {
            let result = client.qr_analytics(&token, &id).await;
            ApiEvent::AnalyticsLoaded {
                ticket,
                qr_id: Some(id),
                result,
            }
        }
        Action::FetchLandingPages { ticket, token } => ApiEvent::LandingPagesLoaded {
            ticket,
            result: client.list_landing_pages(&token).await,
        },
        Action::DeleteLandingPage { ticket, token, id } => {
            let result = client.delete_landing_page(&token, &id).await;
            ApiEvent::LandingPageDeleted { ticket, id, result }
        }
        Action::Quit => return None,
    };
    Some(event)
}
