use crate::app::notifications::{Notification, NotificationKind};
use crate::app::state::*;
use crate::ui::layout::MAX_VISIBLE_NOTIFICATIONS;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use std::time::Duration;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let items = state.store.notifications();
    if items.is_empty() || area.height == 0 {
        return;
    }

    let title = if items.len() > MAX_VISIBLE_NOTIFICATIONS {
        format!(" Notifications ({} more) ", items.len() - MAX_VISIBLE_NOTIFICATIONS)
    } else {
        " Notifications ".to_string()
    };
    let block = Block::default()
        .title(title)
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_type(theme.border_type(false))
        .border_style(theme.border(false))
        .style(theme.panel(false));

    // Newest last, so the most recent is always the bottom line.
    let start = items.len().saturating_sub(MAX_VISIBLE_NOTIFICATIONS);
    let lines: Vec<Line> = items[start..]
        .iter()
        .map(|n| {
            let remaining = state.store.notification_remaining(n.id).unwrap_or_default();
            format_notification(n, remaining, &state.config.ui.timestamp_format, theme)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn format_notification<'a>(
    n: &Notification,
    remaining: Duration,
    timestamp_format: &str,
    theme: &Theme,
) -> Line<'a> {
    let icon = match n.kind {
        NotificationKind::Success => "✔ ",
        NotificationKind::Error => "✘ ",
        NotificationKind::Warning => "! ",
        NotificationKind::Info => "• ",
    };
    let style = theme.kind(n.kind);

    let mut spans = vec![
        Span::styled(format!("[{}] ", n.created_at.format(timestamp_format)), theme.muted()),
        Span::styled(icon, style),
        Span::styled(n.title.clone(), style.add_modifier(Modifier::BOLD)),
    ];
    if let Some(ref message) = n.message {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(message.clone(), Style::default().fg(theme.text)));
    }
    spans.push(Span::styled(
        format!("  #{} {}s", n.id, remaining.as_secs_f32().ceil() as u64),
        theme.muted(),
    ));
    Line::from(spans)
}
