use crate::api::models::QrType;
use crate::app::state::*;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let focused = state.focus == FocusPanel::QrList;
    let qr_codes = state.store.qr_codes();

    let title = if state.filter.is_empty() {
        format!(" QR Codes ({}) ", qr_codes.len())
    } else {
        format!(" QR Codes ({}) [{}] ", qr_codes.len(), state.filter)
    };

    let block = Block::default()
        .title(title)
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_type(theme.border_type(focused))
        .border_style(theme.border(focused))
        .style(theme.panel(focused));

    if qr_codes.is_empty() {
        let hint = if state.store.is_authenticated() {
            " No QR codes yet. /new static <text> or /new dynamic <url>"
        } else {
            " Sign in to see your QR codes"
        };
        let list = List::new(vec![ListItem::new(Span::styled(hint, theme.muted()))]).block(block);
        frame.render_widget(list, area);
        return;
    }

    let items: Vec<ListItem> = qr_codes
        .iter()
        .map(|qr| {
            let badge = match qr.qr_type {
                QrType::Static => Span::styled(" S ", Style::default().fg(theme.info)),
                QrType::Dynamic => Span::styled(" D ", Style::default().fg(theme.success)),
            };
            let mut spans = vec![badge, Span::raw(qr.display_name().to_string())];
            if let Some(ref folder) = qr.folder {
                spans.push(Span::styled(format!("  {}", folder), theme.muted()));
            }
            if qr.password_protected {
                spans.push(Span::styled(" [locked]", Style::default().fg(theme.warning)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(if focused { theme.selected() } else { theme.label() })
        .highlight_symbol("▸");
    let mut list_state = ListState::default().with_selected(Some(state.qr_selected));
    frame.render_stateful_widget(list, area, &mut list_state);
}
