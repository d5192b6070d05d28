use crate::app::state::*;
use crate::app::store::SessionStatus;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts: Vec<Span> = Vec::new();

    // Session
    let session = match state.store.status() {
        SessionStatus::Uninitialized => " starting ".to_string(),
        SessionStatus::Loading => {
            let frame_idx = (state.tick_count / 4) as usize % SPINNER.len();
            format!(" {} signing in ", SPINNER[frame_idx])
        }
        SessionStatus::Authenticated => match state.store.user() {
            Some(user) => format!(" {} <{}> ", user.name, user.email),
            None => " signed in ".to_string(),
        },
        SessionStatus::Anonymous => " signed out ".to_string(),
    };
    let session_style = match state.store.status() {
        SessionStatus::Authenticated => Style::default().fg(theme.success).bg(theme.bar_bg),
        SessionStatus::Loading => Style::default().fg(theme.warning).bg(theme.bar_bg),
        _ => Style::default().fg(theme.text_muted).bg(theme.bar_bg),
    };
    parts.push(Span::styled(session, session_style.add_modifier(Modifier::BOLD)));

    // Status text
    parts.push(Span::styled(
        format!("| {} ", state.status_line()),
        theme.status_bar(),
    ));

    let focus_name = match state.focus {
        FocusPanel::Input => "INPUT",
        FocusPanel::QrList => "QR CODES",
        FocusPanel::Pages => "PAGES",
    };
    let right = format!(" {} | [{}] ", state.store.theme(), focus_name);

    // Pad to fill remaining space
    let used: usize = parts.iter().map(|s| s.content.width()).sum();
    let remaining = (area.width as usize).saturating_sub(used + right.width());
    parts.push(Span::styled(" ".repeat(remaining), theme.status_bar()));
    parts.push(Span::styled(right, Style::default().fg(theme.accent).bg(theme.bar_bg)));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
