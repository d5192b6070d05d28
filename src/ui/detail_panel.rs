use crate::api::models::QrCode;
use crate::app::state::*;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use serde_json::Value;

const HELP: &[(&str, &str)] = &[
    ("/login <email> <password>", "Sign in"),
    ("/signup <email> <password> <name>", "Create an account"),
    ("/logout", "Sign out"),
    ("/refresh", "Reload QR codes and dashboard"),
    ("/filter [folder=<f>] [type=<t>]", "Filter the list (/filter clear)"),
    ("/new <static|dynamic> <payload> [name]", "Create a QR code"),
    ("/rename <name>", "Rename the selected code"),
    ("/move <folder>", "Move the selected code"),
    ("/target <url>", "Retarget the selected dynamic code"),
    ("/delete", "Delete the selected code"),
    ("/stats [qr]", "Dashboard or selected-code analytics"),
    ("/pages [delete]", "List or delete landing pages"),
    ("/theme <light|dark>", "Switch theme"),
    ("/dismiss [id|all]", "Dismiss notifications"),
    ("/quit", "Exit"),
    ("", ""),
    ("Tab", "Cycle focus"),
    ("Up/Down", "Select / history"),
    ("Enter", "Analytics for the selected code"),
    ("Delete", "Delete the selected item"),
    ("Esc", "Dismiss newest notification"),
    ("Ctrl+C", "Quit"),
];

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let title = if state.show_help { " Help " } else { " Details " };
    let block = Block::default()
        .title(title)
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_type(theme.border_type(false))
        .border_style(theme.border(false))
        .style(theme.panel(false));

    let lines = if state.show_help {
        help_lines(theme)
    } else {
        let mut lines = match state.selected_qr() {
            Some(qr) => qr_lines(qr, theme),
            None => vec![Line::from(Span::styled("Nothing selected", theme.muted()))],
        };
        if let (Some(scope), Some(snapshot)) = (&state.analytics_scope, state.store.analytics()) {
            lines.push(Line::from(""));
            let heading = match scope {
                AnalyticsScope::Dashboard => "Analytics: dashboard".to_string(),
                AnalyticsScope::QrCode { name, .. } => format!("Analytics: {}", name),
            };
            lines.push(Line::from(Span::styled(heading, theme.label())));
            for row in analytics_lines(snapshot) {
                lines.push(Line::from(Span::raw(row)));
            }
        }
        lines
    };

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn field<'a>(label: &str, value: String, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<10}", label), theme.muted()),
        Span::raw(value),
    ])
}

fn qr_lines<'a>(qr: &QrCode, theme: &Theme) -> Vec<Line<'a>> {
    let mut lines = vec![
        Line::from(Span::styled(qr.display_name().to_string(), theme.title())),
        field("Type", qr.qr_type.to_string(), theme),
        field("Code", qr.code.clone(), theme),
    ];
    if let Some(payload) = qr.payload() {
        let label = if qr.target.is_some() { "Target" } else { "Content" };
        lines.push(field(label, payload.to_string(), theme));
    }
    if let Some(ref folder) = qr.folder {
        lines.push(field("Folder", folder.clone(), theme));
    }
    if qr.password_protected {
        lines.push(field("Password", "required".to_string(), theme));
    }
    if let Some(expiry) = qr.expiry_at {
        lines.push(field("Expires", expiry.format("%Y-%m-%d %H:%M UTC").to_string(), theme));
    }
    if let Some(created) = qr.created_at {
        lines.push(field("Created", created.format("%Y-%m-%d %H:%M UTC").to_string(), theme));
    }
    for (format, url) in &qr.download_urls {
        lines.push(field(&format.to_uppercase(), url.clone(), theme));
    }
    lines
}

fn help_lines<'a>(theme: &Theme) -> Vec<Line<'a>> {
    HELP.iter()
        .map(|(usage, what)| {
            Line::from(vec![
                Span::styled(format!("{:<40}", usage), theme.label()),
                Span::raw(*what),
            ])
        })
        .collect()
}

/// Flatten an analytics snapshot into display rows. Scalars print as
/// `key: value`, arrays as their length, nested objects one level deep.
pub fn analytics_lines(snapshot: &Value) -> Vec<String> {
    let Value::Object(map) = snapshot else {
        return vec![scalar(snapshot)];
    };
    let mut rows = Vec::new();
    for (key, value) in map {
        let label = key.replace('_', " ");
        match value {
            Value::Array(items) => rows.push(format!("{}: {} entries", label, items.len())),
            Value::Object(inner) => {
                rows.push(format!("{}:", label));
                for (k, v) in inner {
                    rows.push(format!("  {}: {}", k.replace('_', " "), scalar(v)));
                }
            }
            other => rows.push(format!("{}: {}", label, scalar(other))),
        }
    }
    rows
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => format!("{} entries", items.len()),
        Value::Object(map) => format!("{} fields", map.len()),
        other => other.to_string(),
    }
}
