use crate::api::models::{CreateQrRequest, Credentials, QrFilter, SignupRequest, UpdateQrRequest};
use crate::app::store::RequestTicket;

#[derive(Debug, Clone)]
pub enum AuthRequest {
    Login(Credentials),
    Signup(SignupRequest),
}

/// Side effects requested by the handler. `ApiManager` runs each one in a spawned
/// task and reports back with an [`ApiEvent`](crate::app::event::ApiEvent)
/// carrying the same ticket.
#[derive(Debug)]
pub enum Action {
    ValidateSession { ticket: RequestTicket, access_token: String, refresh_token: Option<String> },
    Authenticate { ticket: RequestTicket, request: AuthRequest },
    FetchQrCodes { ticket: RequestTicket, token: String, filter: QrFilter },
    CreateQrCode { ticket: RequestTicket, token: String, request: CreateQrRequest },
    UpdateQrCode { ticket: RequestTicket, token: String, id: String, request: UpdateQrRequest },
    RetargetQrCode { ticket: RequestTicket, token: String, id: String, target: String },
    DeleteQrCode { ticket: RequestTicket, token: String, id: String },
    FetchDashboard { ticket: RequestTicket, token: String },
    FetchQrSummary { ticket: RequestTicket, token: String, id: String },
    FetchLandingPages { ticket: RequestTicket, token: String },
    DeleteLandingPage { ticket: RequestTicket, token: String, id: String },
    Quit,
}
