use crate::api::models::{
    CreateQrRequest, Credentials, QrFormat, QrType, SignupRequest, UpdateQrRequest,
};
use crate::api::ApiError;
use crate::app::action::{Action, AuthRequest};
use crate::app::commands::{self, DismissTarget, ParsedCommand};
use crate::app::event::{ApiEvent, AppEvent};
use crate::app::notifications::NotificationKind;
use crate::app::state::*;
use crate::app::store::{LoginOutcome, RequestTicket};
use crate::app::validation;
use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, info, warn};

pub const THEMES: &[&str] = &["light", "dark"];

pub fn handle_event(state: &mut AppState, event: AppEvent) -> Vec<Action> {
    match event {
        AppEvent::Terminal(cevent) => {
            state.dirty = true;
            handle_terminal(state, cevent)
        }
        AppEvent::Api(api) => {
            state.dirty = true;
            handle_api(state, api)
        }
        AppEvent::Tick => {
            handle_tick(state);
            vec![]
        }
    }
}

/// Restore preferences and, when a token is stored, ask for it to be validated.
pub fn initialize(state: &mut AppState) -> Vec<Action> {
    match state.store.begin_initialize() {
        Some(pending) => vec![Action::ValidateSession {
            ticket: pending.ticket,
            access_token: pending.access_token,
            refresh_token: pending.refresh_token,
        }],
        None => vec![],
    }
}

fn handle_tick(state: &mut AppState) {
    state.tick_count = state.tick_count.wrapping_add(1);
    if state.store.expire_notifications() > 0 {
        state.dirty = true;
    }
    // Spinner
    if state.store.is_loading() && state.tick_count % 4 == 0 {
        state.dirty = true;
    }
    // Countdowns on visible notifications.
    if !state.store.notifications().is_empty() && state.tick_count % 4 == 0 {
        state.dirty = true;
    }
}

// --- API completions -------------------------------------------------------

fn handle_api(state: &mut AppState, event: ApiEvent) -> Vec<Action> {
    let is_auth = matches!(event, ApiEvent::SessionRestored { .. } | ApiEvent::AuthFinished { .. });
    if !is_auth && !state.store.is_current(event.ticket()) {
        debug!("dropping response from a previous session");
        return vec![];
    }

    match event {
        ApiEvent::SessionRestored { ticket, result } => {
            state.store.finish_initialize(ticket, result);
            if state.store.is_current(ticket) && state.store.is_authenticated() {
                fetch_session_data(state)
            } else {
                vec![]
            }
        }
        ApiEvent::AuthFinished { ticket, flow, result } => {
            match state.store.finish_login(ticket, flow, result) {
                LoginOutcome::Success(_) => fetch_session_data(state),
                LoginOutcome::Failure(_) | LoginOutcome::Superseded => vec![],
            }
        }
        ApiEvent::QrCodesLoaded { result, .. } => {
            match result {
                Ok(qr_codes) => {
                    info!(count = qr_codes.len(), "QR codes loaded");
                    state.store.set_qr_codes(qr_codes);
                    state.clamp_selection();
                }
                Err(e) => report_failure(state, "Could not load QR codes", e),
            }
            vec![]
        }
        ApiEvent::QrCreated { result, .. } => {
            match result {
                Ok(qr) => {
                    let name = qr.display_name().to_string();
                    state.store.add_qr_code(qr);
                    state.qr_selected = 0;
                    state
                        .store
                        .notify(NotificationKind::Success, "QR code created", Some(name));
                }
                Err(e) => report_failure(state, "Could not create QR code", e),
            }
            vec![]
        }
        ApiEvent::QrUpdated { result, .. } => {
            match result {
                Ok(qr) => {
                    let name = qr.display_name().to_string();
                    if !state.store.update_qr_code(qr) {
                        debug!("updated QR code is no longer cached");
                    }
                    state
                        .store
                        .notify(NotificationKind::Success, "QR code updated", Some(name));
                }
                Err(e) => report_failure(state, "Could not update QR code", e),
            }
            vec![]
        }
        ApiEvent::QrDeleted { id, result, .. } => {
            match result {
                Ok(()) => {
                    state.store.delete_qr_code(&id);
                    state.clamp_selection();
                    if matches!(state.analytics_scope, Some(AnalyticsScope::QrCode { id: ref shown, .. }) if *shown == id)
                    {
                        state.analytics_scope = None;
                        state.store.clear_analytics();
                    }
                    state.store.notify(NotificationKind::Success, "QR code deleted", None);
                }
                Err(e) => report_failure(state, "Could not delete QR code", e),
            }
            vec![]
        }
        ApiEvent::AnalyticsLoaded { qr_id, result, .. } => {
            let shown = state.analytics_scope.as_ref().map(AnalyticsScope::qr_id);
            if shown != Some(qr_id.as_deref()) {
                debug!(?qr_id, "dropping analytics for a view no longer shown");
                return vec![];
            }
            match result {
                Ok(snapshot) => state.store.set_analytics(snapshot),
                Err(e) => report_failure(state, "Could not load analytics", e),
            }
            vec![]
        }
        ApiEvent::LandingPagesLoaded { result, .. } => {
            match result {
                Ok(pages) => {
                    state.landing_pages = pages;
                    state.clamp_selection();
                }
                Err(e) => report_failure(state, "Could not load landing pages", e),
            }
            vec![]
        }
        ApiEvent::LandingPageDeleted { id, result, .. } => {
            match result {
                Ok(()) => {
                    state.landing_pages.retain(|p| p.id != id);
                    state.clamp_selection();
                    state
                        .store
                        .notify(NotificationKind::Success, "Landing page deleted", None);
                }
                Err(e) => report_failure(state, "Could not delete landing page", e),
            }
            vec![]
        }
    }
}

/// A 401 ends the session; anything else becomes an error notification.
fn report_failure(state: &mut AppState, title: &str, err: ApiError) {
    if err.is_unauthorized() {
        warn!("backend rejected the session: {}", err);
        end_session(state);
        state.store.notify(
            NotificationKind::Error,
            "Session expired",
            Some("Please sign in again.".to_string()),
        );
        return;
    }
    warn!("{}: {}", title, err);
    let message = err.detail().map(str::to_string).unwrap_or_else(|| err.to_string());
    state.store.notify(NotificationKind::Error, title, Some(message));
}

fn end_session(state: &mut AppState) {
    state.store.logout();
    state.reset_session_view();
}

fn fetch_session_data(state: &mut AppState) -> Vec<Action> {
    let Some(token) = state.store.access_token() else {
        return vec![];
    };
    let ticket = state.store.ticket();
    show_analytics(state, AnalyticsScope::Dashboard);
    vec![
        Action::FetchQrCodes {
            ticket,
            token: token.clone(),
            filter: state.filter.clone(),
        },
        Action::FetchDashboard { ticket, token },
    ]
}

/// Ticket and bearer token for a data request, or a hint on the status line.
fn session(state: &mut AppState) -> Option<(RequestTicket, String)> {
    match state.store.access_token() {
        Some(token) if state.store.is_authenticated() => Some((state.store.ticket(), token)),
        _ => {
            state.status_message = Some("Sign in first: /login <email> <password>".to_string());
            None
        }
    }
}

fn selected_qr_id(state: &mut AppState) -> Option<String> {
    let id = state.selected_qr().map(|qr| qr.id.clone());
    if id.is_none() {
        state.status_message = Some("No QR code selected".to_string());
    }
    id
}

fn delete_selected_qr(state: &mut AppState) -> Vec<Action> {
    let Some((ticket, token)) = session(state) else {
        return vec![];
    };
    let Some(id) = selected_qr_id(state) else {
        return vec![];
    };
    vec![Action::DeleteQrCode { ticket, token, id }]
}

fn delete_selected_page(state: &mut AppState) -> Vec<Action> {
    let Some((ticket, token)) = session(state) else {
        return vec![];
    };
    let Some(id) = state.selected_page().map(|p| p.id.clone()) else {
        state.status_message = Some("No landing page selected".to_string());
        return vec![];
    };
    vec![Action::DeleteLandingPage { ticket, token, id }]
}

fn qr_summary(state: &mut AppState) -> Vec<Action> {
    let Some((ticket, token)) = session(state) else {
        return vec![];
    };
    let Some(qr) = state.selected_qr() else {
        state.status_message = Some("No QR code selected".to_string());
        return vec![];
    };
    let id = qr.id.clone();
    let name = qr.display_name().to_string();
    show_analytics(state, AnalyticsScope::QrCode { id: id.clone(), name });
    vec![Action::FetchQrSummary { ticket, token, id }]
}

/// Switch the analytics panel; a snapshot for another view is not kept.
fn show_analytics(state: &mut AppState, scope: AnalyticsScope) {
    let current = state.analytics_scope.as_ref().map(AnalyticsScope::qr_id);
    if current != Some(scope.qr_id()) {
        state.store.clear_analytics();
    }
    state.analytics_scope = Some(scope);
}

// --- terminal input --------------------------------------------------------

fn handle_terminal(state: &mut AppState, event: CEvent) -> Vec<Action> {
    match event {
        CEvent::Key(key) if key.kind == KeyEventKind::Press => handle_key(state, key),
        CEvent::Resize(_, _) => {
            state.dirty = true;
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return vec![Action::Quit];
    }

    if key.code == KeyCode::Esc {
        if state.show_help {
            state.show_help = false;
        } else if let Some(id) = state.store.newest_notification() {
            state.store.remove_notification(id);
        } else {
            state.status_message = None;
        }
        return vec![];
    }

    if key.code == KeyCode::Tab && state.focus != FocusPanel::Input {
        state.cycle_focus();
        return vec![];
    }

    match state.focus {
        FocusPanel::Input => handle_input_key(state, key),
        FocusPanel::QrList => handle_qr_list_key(state, key),
        FocusPanel::Pages => handle_pages_key(state, key),
    }
}

fn handle_input_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    match key.code {
        KeyCode::Enter => {
            let text = state.input.take_text();
            if text.trim().is_empty() {
                return vec![];
            }
            if text.trim_start().starts_with('/') {
                return handle_command(state, &text);
            }
            state.status_message = Some("Commands start with '/'. Type /help for a list.".to_string());
            vec![]
        }
        KeyCode::Backspace => {
            if key.modifiers.contains(KeyModifiers::ALT) {
                state.input.delete_word_back();
            } else {
                state.input.delete_back();
            }
            vec![]
        }
        KeyCode::Delete => {
            state.input.delete_forward();
            vec![]
        }
        KeyCode::Left => {
            state.input.move_left();
            vec![]
        }
        KeyCode::Right => {
            state.input.move_right();
            vec![]
        }
        KeyCode::Home => {
            state.input.move_home();
            vec![]
        }
        KeyCode::End => {
            state.input.move_end();
            vec![]
        }
        KeyCode::Up => {
            state.input.history_up();
            vec![]
        }
        KeyCode::Down => {
            state.input.history_down();
            vec![]
        }
        KeyCode::Tab => {
            if state.input.text.starts_with('/') && !state.input.text.contains(' ') {
                try_command_completion(state);
            } else {
                state.cycle_focus();
            }
            vec![]
        }
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match c {
                    'a' => state.input.move_home(),
                    'e' => state.input.move_end(),
                    'w' => state.input.delete_word_back(),
                    'u' => state.input.clear(),
                    _ => {}
                }
            } else {
                state.input.insert_char(c);
            }
            vec![]
        }
        _ => vec![],
    }
}

fn handle_qr_list_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    match key.code {
        KeyCode::Up => {
            state.select_prev();
            vec![]
        }
        KeyCode::Down => {
            state.select_next();
            vec![]
        }
        KeyCode::Enter => qr_summary(state),
        KeyCode::Delete => delete_selected_qr(state),
        KeyCode::Char(c) => {
            state.focus = FocusPanel::Input;
            state.input.insert_char(c);
            vec![]
        }
        _ => vec![],
    }
}

fn handle_pages_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    match key.code {
        KeyCode::Up => {
            state.select_prev();
            vec![]
        }
        KeyCode::Down => {
            state.select_next();
            vec![]
        }
        KeyCode::Delete => delete_selected_page(state),
        KeyCode::Char(c) => {
            state.focus = FocusPanel::Input;
            state.input.insert_char(c);
            vec![]
        }
        _ => vec![],
    }
}

fn try_command_completion(state: &mut AppState) {
    let partial = state.input.text[1..].to_lowercase();
    if let Some(first) = commands::COMMANDS.iter().find(|c| c.starts_with(partial.as_str())) {
        state.input.set_text(format!("/{} ", first));
    }
}

// --- slash commands --------------------------------------------------------

fn handle_command(state: &mut AppState, text: &str) -> Vec<Action> {
    state.status_message = None;
    state.show_help = false;

    let Some(command) = commands::parse_command(text) else {
        let name = text.split_whitespace().next().unwrap_or(text);
        state.status_message = Some(format!("Unknown command or missing argument: {} (try /help)", name));
        return vec![];
    };

    match command {
        ParsedCommand::Login { email, password } => {
            if let Err(e) = validation::validate_credentials(&email, &password) {
                state.status_message = Some(e.to_string());
                return vec![];
            }
            let ticket = state.store.begin_login();
            vec![Action::Authenticate {
                ticket,
                request: AuthRequest::Login(Credentials { email, password }),
            }]
        }
        ParsedCommand::Signup { email, password, name } => {
            let checked = validation::validate_credentials(&email, &password)
                .and_then(|_| validation::validate_name(&name));
            if let Err(e) = checked {
                state.status_message = Some(e.to_string());
                return vec![];
            }
            let ticket = state.store.begin_login();
            vec![Action::Authenticate {
                ticket,
                request: AuthRequest::Signup(SignupRequest { email, password, name }),
            }]
        }
        ParsedCommand::Logout => {
            if state.store.is_authenticated() || state.store.is_loading() {
                end_session(state);
            } else {
                state.status_message = Some("Not signed in".to_string());
            }
            vec![]
        }
        ParsedCommand::Theme { name } => {
            if THEMES.contains(&name.as_str()) {
                state.status_message = Some(format!("Theme set to {}", name));
                state.store.set_theme(name);
            } else {
                state.status_message = Some(format!(
                    "Unknown theme '{}'. Available: {}",
                    name,
                    THEMES.join(", ")
                ));
            }
            vec![]
        }
        ParsedCommand::Refresh => {
            if session(state).is_none() {
                return vec![];
            }
            fetch_session_data(state)
        }
        ParsedCommand::Filter(filter) => {
            state.filter = filter;
            state.qr_selected = 0;
            let Some((ticket, token)) = session(state) else {
                return vec![];
            };
            vec![Action::FetchQrCodes {
                ticket,
                token,
                filter: state.filter.clone(),
            }]
        }
        ParsedCommand::New { qr_type, payload, name } => {
            if let Err(e) = validation::validate_payload(qr_type, &payload) {
                state.status_message = Some(e.to_string());
                return vec![];
            }
            let Some((ticket, token)) = session(state) else {
                return vec![];
            };
            let (content, target) = match qr_type {
                QrType::Static => (Some(payload), None),
                QrType::Dynamic => (None, Some(payload)),
            };
            vec![Action::CreateQrCode {
                ticket,
                token,
                request: CreateQrRequest {
                    qr_type,
                    content,
                    target,
                    name,
                    folder: state.filter.folder.clone(),
                    formats: vec![QrFormat::Png],
                },
            }]
        }
        ParsedCommand::Rename { name } => update_selected(
            state,
            UpdateQrRequest {
                name: Some(name),
                ..UpdateQrRequest::default()
            },
        ),
        ParsedCommand::Move { folder } => update_selected(
            state,
            UpdateQrRequest {
                folder: Some(folder),
                ..UpdateQrRequest::default()
            },
        ),
        ParsedCommand::Target { url } => {
            let Some((ticket, token)) = session(state) else {
                return vec![];
            };
            let Some(qr) = state.selected_qr() else {
                state.status_message = Some("No QR code selected".to_string());
                return vec![];
            };
            if qr.qr_type != QrType::Dynamic {
                state.status_message = Some("Only dynamic QR codes can change their target".to_string());
                return vec![];
            }
            let id = qr.id.clone();
            if let Err(e) = validation::validate_target(&url) {
                state.status_message = Some(e.to_string());
                return vec![];
            }
            vec![Action::RetargetQrCode {
                ticket,
                token,
                id,
                target: url,
            }]
        }
        ParsedCommand::Delete => delete_selected_qr(state),
        ParsedCommand::Stats => {
            let Some((ticket, token)) = session(state) else {
                return vec![];
            };
            show_analytics(state, AnalyticsScope::Dashboard);
            vec![Action::FetchDashboard { ticket, token }]
        }
        ParsedCommand::StatsQr => qr_summary(state),
        ParsedCommand::Pages => {
            let Some((ticket, token)) = session(state) else {
                return vec![];
            };
            state.focus = FocusPanel::Pages;
            vec![Action::FetchLandingPages { ticket, token }]
        }
        ParsedCommand::PagesDelete => delete_selected_page(state),
        ParsedCommand::Dismiss(target) => {
            match target {
                DismissTarget::Newest => {
                    if let Some(id) = state.store.newest_notification() {
                        state.store.remove_notification(id);
                    }
                }
                DismissTarget::All => state.store.clear_notifications(),
                DismissTarget::Id(id) => state.store.remove_notification(id),
            }
            vec![]
        }
        ParsedCommand::Help => {
            state.show_help = true;
            vec![]
        }
        ParsedCommand::Quit => vec![Action::Quit],
    }
}

fn update_selected(state: &mut AppState, request: UpdateQrRequest) -> Vec<Action> {
    let Some((ticket, token)) = session(state) else {
        return vec![];
    };
    let Some(id) = selected_qr_id(state) else {
        return vec![];
    };
    vec![Action::UpdateQrCode {
        ticket,
        token,
        id,
        request,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{LandingPage, RestoredSession};
    use crate::app::clock::ManualClock;
    use crate::app::store::tests::{demo_auth, demo_user, qr, store_with, SharedStore};
    use crate::app::store::{AuthFlow, SessionStatus};
    use crate::config::AppConfig;
    use crate::storage::{ACCESS_TOKEN_KEY, THEME_KEY};
    use std::time::Duration;

    fn state() -> (AppState, SharedStore, ManualClock) {
        let storage = SharedStore::default();
        let (store, clock) = store_with(storage.clone());
        (AppState::new(AppConfig::default(), store), storage, clock)
    }

    fn key(state: &mut AppState, code: KeyCode) -> Vec<Action> {
        handle_event(
            state,
            AppEvent::Terminal(CEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))),
        )
    }

    fn type_line(state: &mut AppState, line: &str) -> Vec<Action> {
        state.focus = FocusPanel::Input;
        for c in line.chars() {
            key(state, KeyCode::Char(c));
        }
        key(state, KeyCode::Enter)
    }

    fn api(state: &mut AppState, event: ApiEvent) -> Vec<Action> {
        handle_event(state, AppEvent::Api(event))
    }

    /// Sign in as the demo user and return the follow-up actions.
    fn signed_in(state: &mut AppState) -> Vec<Action> {
        let actions = type_line(state, "/login demo@example.com secret123");
        let Some(Action::Authenticate { ticket, .. }) = actions.first() else {
            panic!("expected Authenticate, got {:?}", actions);
        };
        api(
            state,
            ApiEvent::AuthFinished {
                ticket: *ticket,
                flow: AuthFlow::Login,
                result: Ok(demo_auth()),
            },
        )
    }

    fn unauthorized() -> ApiError {
        ApiError::from_status(401, r#"{"detail":"Could not validate credentials"}"#)
    }

    #[test]
    fn test_login_flow_fetches_session_data() {
        let (mut state, storage, _clock) = state();
        let actions = type_line(&mut state, "/login demo@example.com secret123");
        assert_eq!(actions.len(), 1);
        match &actions[0] {
            Action::Authenticate {
                request: AuthRequest::Login(creds),
                ..
            } => {
                assert_eq!(creds.email, "demo@example.com");
                assert_eq!(creds.password, "secret123");
            }
            other => panic!("unexpected action {:?}", other),
        }
        assert_eq!(state.store.status(), SessionStatus::Loading);
        assert!(state.input.history.is_empty());

        let Action::Authenticate { ticket, .. } = &actions[0] else { unreachable!() };
        let follow_up = api(
            &mut state,
            ApiEvent::AuthFinished {
                ticket: *ticket,
                flow: AuthFlow::Login,
                result: Ok(demo_auth()),
            },
        );
        assert!(state.store.is_authenticated());
        assert_eq!(storage.value(ACCESS_TOKEN_KEY).as_deref(), Some("t1"));
        assert_eq!(follow_up.len(), 2);
        assert!(matches!(&follow_up[0], Action::FetchQrCodes { token, .. } if token == "t1"));
        assert!(matches!(&follow_up[1], Action::FetchDashboard { token, .. } if token == "t1"));
        assert_eq!(state.analytics_scope, Some(AnalyticsScope::Dashboard));
    }

    #[test]
    fn test_login_validation_stays_out_of_store() {
        let (mut state, _storage, _clock) = state();
        let actions = type_line(&mut state, "/login not-an-email secret123");
        assert!(actions.is_empty());
        assert_eq!(state.status_message.as_deref(), Some("Please enter a valid email address"));
        assert!(!state.store.is_loading());
        assert!(state.store.notifications().is_empty());

        let actions = type_line(&mut state, "/login demo@example.com short");
        assert!(actions.is_empty());
        assert_eq!(state.status_message.as_deref(), Some("Password must be at least 6 characters"));
    }

    #[test]
    fn test_failed_login_notifies() {
        let (mut state, _storage, _clock) = state();
        let actions = type_line(&mut state, "/login demo@example.com wrongpass");
        let Some(Action::Authenticate { ticket, .. }) = actions.first() else {
            panic!("expected Authenticate");
        };
        let follow_up = api(
            &mut state,
            ApiEvent::AuthFinished {
                ticket: *ticket,
                flow: AuthFlow::Login,
                result: Err(ApiError::from_status(401, r#"{"detail":"Invalid credentials"}"#)),
            },
        );
        assert!(follow_up.is_empty());
        assert!(!state.store.is_authenticated());
        let n = state.store.notifications().last().unwrap();
        assert_eq!(n.kind, NotificationKind::Error);
        assert_eq!(n.message.as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn test_data_commands_require_session() {
        let (mut state, _storage, _clock) = state();
        for line in ["/refresh", "/stats", "/pages", "/delete", "/new static hello"] {
            assert!(type_line(&mut state, line).is_empty(), "{} dispatched", line);
            assert!(state.status_message.as_deref().unwrap().starts_with("Sign in first"));
        }
    }

    #[test]
    fn test_stale_list_after_logout_is_dropped() {
        let (mut state, storage, _clock) = state();
        let actions = signed_in(&mut state);
        let Some(Action::FetchQrCodes { ticket, .. }) = actions.first() else {
            panic!("expected FetchQrCodes");
        };
        let ticket = *ticket;

        type_line(&mut state, "/logout");
        assert_eq!(state.store.status(), SessionStatus::Anonymous);
        assert_eq!(storage.value(ACCESS_TOKEN_KEY), None);

        api(
            &mut state,
            ApiEvent::QrCodesLoaded {
                ticket,
                result: Ok(vec![qr("a")]),
            },
        );
        assert!(state.store.qr_codes().is_empty());
    }

    #[test]
    fn test_unauthorized_data_call_ends_session() {
        let (mut state, storage, _clock) = state();
        signed_in(&mut state);
        state.landing_pages = vec![page("p1")];
        let ticket = state.store.ticket();

        api(
            &mut state,
            ApiEvent::AnalyticsLoaded {
                ticket,
                qr_id: None,
                result: Err(unauthorized()),
            },
        );
        assert!(!state.store.is_authenticated());
        assert_eq!(storage.value(ACCESS_TOKEN_KEY), None);
        assert!(state.landing_pages.is_empty());
        let n = state.store.notifications().last().unwrap();
        assert_eq!(n.kind, NotificationKind::Error);
        assert_eq!(n.title, "Session expired");
    }

    #[test]
    fn test_analytics_for_a_replaced_view_is_dropped() {
        let (mut state, _storage, _clock) = state();
        signed_in(&mut state);
        let ticket = state.store.ticket();
        api(
            &mut state,
            ApiEvent::QrCodesLoaded {
                ticket,
                result: Ok(vec![qr("a"), qr("b")]),
            },
        );

        let actions = type_line(&mut state, "/stats qr");
        assert!(matches!(&actions[..], [Action::FetchQrSummary { id, .. }] if id == "a"));
        let actions = type_line(&mut state, "/stats");
        assert!(matches!(&actions[..], [Action::FetchDashboard { .. }]));

        api(
            &mut state,
            ApiEvent::AnalyticsLoaded {
                ticket,
                qr_id: None,
                result: Ok(serde_json::json!({ "total_qr_codes": 10 })),
            },
        );
        api(
            &mut state,
            ApiEvent::AnalyticsLoaded {
                ticket,
                qr_id: Some("a".into()),
                result: Ok(serde_json::json!({ "qr_id": "a", "total_scans": 1 })),
            },
        );
        assert_eq!(state.analytics_scope, Some(AnalyticsScope::Dashboard));
        let snapshot = state.store.analytics().unwrap();
        assert_eq!(snapshot["total_qr_codes"], 10);

        // Switching views drops the old snapshot until the new one lands.
        type_line(&mut state, "/stats qr");
        assert!(state.store.analytics().is_none());
        api(
            &mut state,
            ApiEvent::AnalyticsLoaded {
                ticket,
                qr_id: Some("a".into()),
                result: Ok(serde_json::json!({ "qr_id": "a", "total_scans": 1 })),
            },
        );
        assert_eq!(state.store.analytics().unwrap()["total_scans"], 1);
    }

    #[test]
    fn test_logout_cancels_pending_login() {
        let (mut state, storage, _clock) = state();
        let actions = type_line(&mut state, "/login demo@example.com secret123");
        let Some(Action::Authenticate { ticket, .. }) = actions.first() else {
            panic!("expected Authenticate");
        };
        let ticket = *ticket;
        assert!(state.store.is_loading());

        type_line(&mut state, "/logout");
        assert!(!state.store.is_loading());
        assert_eq!(state.status_message, None);

        let follow_up = api(
            &mut state,
            ApiEvent::AuthFinished {
                ticket,
                flow: AuthFlow::Login,
                result: Ok(demo_auth()),
            },
        );
        assert!(follow_up.is_empty());
        assert!(!state.store.is_authenticated());
        assert_eq!(storage.value(ACCESS_TOKEN_KEY), None);
    }

    #[test]
    fn test_other_failures_keep_session() {
        let (mut state, _storage, _clock) = state();
        signed_in(&mut state);
        let ticket = state.store.ticket();
        api(
            &mut state,
            ApiEvent::QrCreated {
                ticket,
                result: Err(ApiError::from_status(422, r#"{"detail":[{"msg":"target is required"}]}"#)),
            },
        );
        assert!(state.store.is_authenticated());
        let n = state.store.notifications().last().unwrap();
        assert_eq!(n.title, "Could not create QR code");
        assert_eq!(n.message.as_deref(), Some("target is required"));
    }

    #[test]
    fn test_delete_selected_qr_with_keys() {
        let (mut state, _storage, _clock) = state();
        signed_in(&mut state);
        let ticket = state.store.ticket();
        api(
            &mut state,
            ApiEvent::QrCodesLoaded {
                ticket,
                result: Ok(vec![qr("a"), qr("b"), qr("c")]),
            },
        );

        key(&mut state, KeyCode::Tab);
        assert_eq!(state.focus, FocusPanel::QrList);
        key(&mut state, KeyCode::Down);
        key(&mut state, KeyCode::Down);
        key(&mut state, KeyCode::Down);
        assert_eq!(state.qr_selected, 2);

        let actions = key(&mut state, KeyCode::Delete);
        let Some(Action::DeleteQrCode { id, .. }) = actions.first() else {
            panic!("expected DeleteQrCode, got {:?}", actions);
        };
        assert_eq!(id, "c");

        api(
            &mut state,
            ApiEvent::QrDeleted {
                ticket,
                id: "c".into(),
                result: Ok(()),
            },
        );
        assert_eq!(state.store.qr_codes().len(), 2);
        assert_eq!(state.qr_selected, 1);
    }

    #[test]
    fn test_create_qr_commands() {
        let (mut state, _storage, _clock) = state();
        signed_in(&mut state);

        assert!(type_line(&mut state, "/new dynamic example.com").is_empty());
        assert_eq!(
            state.status_message.as_deref(),
            Some("Dynamic QR codes need an http:// or https:// target URL")
        );

        type_line(&mut state, "/filter folder=Events");
        let actions = type_line(&mut state, "/new dynamic https://example.com Promo");
        let Some(Action::CreateQrCode { request, .. }) = actions.first() else {
            panic!("expected CreateQrCode, got {:?}", actions);
        };
        assert_eq!(request.qr_type, QrType::Dynamic);
        assert_eq!(request.target.as_deref(), Some("https://example.com"));
        assert_eq!(request.content, None);
        assert_eq!(request.name.as_deref(), Some("Promo"));
        assert_eq!(request.folder.as_deref(), Some("Events"));

        let ticket = state.store.ticket();
        state.store.set_qr_codes(vec![qr("old")]);
        api(
            &mut state,
            ApiEvent::QrCreated {
                ticket,
                result: Ok(qr("new")),
            },
        );
        assert_eq!(state.store.qr_codes()[0].id, "new");
        assert_eq!(state.store.notifications().last().unwrap().title, "QR code created");
    }

    #[test]
    fn test_filter_command_refetches() {
        let (mut state, _storage, _clock) = state();
        signed_in(&mut state);
        let actions = type_line(&mut state, "/filter type=dynamic");
        let Some(Action::FetchQrCodes { filter, .. }) = actions.first() else {
            panic!("expected FetchQrCodes");
        };
        assert_eq!(filter.qr_type, Some(QrType::Dynamic));
        assert_eq!(state.filter.qr_type, Some(QrType::Dynamic));
    }

    #[test]
    fn test_target_only_for_dynamic_codes() {
        let (mut state, _storage, _clock) = state();
        signed_in(&mut state);
        let mut dynamic = qr("d");
        dynamic.qr_type = QrType::Dynamic;
        state.store.set_qr_codes(vec![qr("s"), dynamic]);

        assert!(type_line(&mut state, "/target https://example.org").is_empty());
        assert_eq!(
            state.status_message.as_deref(),
            Some("Only dynamic QR codes can change their target")
        );

        state.qr_selected = 1;
        let actions = type_line(&mut state, "/target https://example.org");
        assert!(matches!(
            actions.first(),
            Some(Action::RetargetQrCode { id, target, .. }) if id == "d" && target == "https://example.org"
        ));
    }

    #[test]
    fn test_rename_selected() {
        let (mut state, _storage, _clock) = state();
        signed_in(&mut state);
        state.store.set_qr_codes(vec![qr("a")]);
        let actions = type_line(&mut state, "/rename Menu card");
        let Some(Action::UpdateQrCode { id, request, .. }) = actions.first() else {
            panic!("expected UpdateQrCode");
        };
        assert_eq!(id, "a");
        assert_eq!(request.name.as_deref(), Some("Menu card"));
        assert_eq!(request.folder, None);
    }

    #[test]
    fn test_initialize_restores_session() {
        let (mut state, storage, _clock) = state();
        storage.seed(ACCESS_TOKEN_KEY, "t1");
        storage.seed(THEME_KEY, "dark");

        let actions = initialize(&mut state);
        assert_eq!(state.store.theme(), "dark");
        let Some(Action::ValidateSession { ticket, access_token, .. }) = actions.first() else {
            panic!("expected ValidateSession");
        };
        assert_eq!(access_token, "t1");

        let follow_up = api(
            &mut state,
            ApiEvent::SessionRestored {
                ticket: *ticket,
                result: Ok(RestoredSession {
                    user: demo_user(),
                    tokens: None,
                }),
            },
        );
        assert_eq!(state.store.status(), SessionStatus::Authenticated);
        assert_eq!(follow_up.len(), 2);
    }

    #[test]
    fn test_initialize_without_token_is_quiet() {
        let (mut state, _storage, _clock) = state();
        assert!(initialize(&mut state).is_empty());
        assert_eq!(state.store.status(), SessionStatus::Anonymous);
        assert!(state.store.notifications().is_empty());
    }

    #[test]
    fn test_tick_expires_notifications() {
        let (mut state, _storage, clock) = state();
        state.store.notify(NotificationKind::Info, "hello", None);
        clock.advance(Duration::from_secs(4));
        handle_event(&mut state, AppEvent::Tick);
        assert_eq!(state.store.notifications().len(), 1);
        clock.advance(Duration::from_secs(1));
        handle_event(&mut state, AppEvent::Tick);
        assert!(state.store.notifications().is_empty());
        assert_eq!(state.tick_count, 2);
    }

    #[test]
    fn test_dismissing_notifications() {
        let (mut state, _storage, _clock) = state();
        let first = state.store.notify(NotificationKind::Info, "first", None);
        state.store.notify(NotificationKind::Info, "second", None);

        key(&mut state, KeyCode::Esc);
        assert_eq!(state.store.notifications().len(), 1);
        assert_eq!(state.store.notifications()[0].id, first);

        state.store.notify(NotificationKind::Info, "third", None);
        type_line(&mut state, &format!("/dismiss {}", first));
        assert_eq!(state.store.notifications().len(), 1);
        type_line(&mut state, "/dismiss all");
        assert!(state.store.notifications().is_empty());
    }

    #[test]
    fn test_theme_command() {
        let (mut state, storage, _clock) = state();
        type_line(&mut state, "/theme dark");
        assert_eq!(state.store.theme(), "dark");
        assert_eq!(storage.value(THEME_KEY).as_deref(), Some("dark"));

        type_line(&mut state, "/theme neon");
        assert_eq!(state.store.theme(), "dark");
        assert!(state.status_message.as_deref().unwrap().starts_with("Unknown theme"));
    }

    #[test]
    fn test_landing_pages_flow() {
        let (mut state, _storage, _clock) = state();
        signed_in(&mut state);
        let actions = type_line(&mut state, "/pages");
        assert!(matches!(actions.first(), Some(Action::FetchLandingPages { .. })));
        assert_eq!(state.focus, FocusPanel::Pages);

        let ticket = state.store.ticket();
        api(
            &mut state,
            ApiEvent::LandingPagesLoaded {
                ticket,
                result: Ok(vec![page("p1"), page("p2")]),
            },
        );
        key(&mut state, KeyCode::Down);
        let actions = key(&mut state, KeyCode::Delete);
        assert!(matches!(actions.first(), Some(Action::DeleteLandingPage { id, .. }) if id == "p2"));
        api(
            &mut state,
            ApiEvent::LandingPageDeleted {
                ticket,
                id: "p2".into(),
                result: Ok(()),
            },
        );
        assert_eq!(state.landing_pages.len(), 1);
        assert_eq!(state.page_selected, 0);
    }

    #[test]
    fn test_tab_completion_and_quit() {
        let (mut state, _storage, _clock) = state();
        for c in "/lo".chars() {
            key(&mut state, KeyCode::Char(c));
        }
        key(&mut state, KeyCode::Tab);
        assert_eq!(state.input.text, "/login ");

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let actions = handle_event(&mut state, AppEvent::Terminal(CEvent::Key(ctrl_c)));
        assert!(matches!(actions.as_slice(), [Action::Quit]));
    }

    fn page(id: &str) -> LandingPage {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "slug": format!("slug-{}", id),
            "title": format!("Page {}", id),
        }))
        .unwrap()
    }
}
