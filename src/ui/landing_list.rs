use crate::app::state::*;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let focused = state.focus == FocusPanel::Pages;
    let pages = &state.landing_pages;

    let title = if pages.is_empty() {
        " Landing Pages ".to_string()
    } else {
        format!(" Landing Pages ({}) ", pages.len())
    };
    let block = Block::default()
        .title(title)
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_type(theme.border_type(focused))
        .border_style(theme.border(focused))
        .style(theme.panel(focused));

    if pages.is_empty() {
        let list = List::new(vec![ListItem::new(Span::styled(" /pages to load", theme.muted()))])
            .block(block);
        frame.render_widget(list, area);
        return;
    }

    let items: Vec<ListItem> = pages
        .iter()
        .map(|page| {
            let (mark, style) = if page.is_published {
                (" ● ", Style::default().fg(theme.success))
            } else {
                (" ○ ", theme.muted())
            };
            let mut spans = vec![
                Span::styled(mark, style),
                Span::raw(page.title.clone()),
                Span::styled(format!("  /{}", page.slug), theme.muted()),
            ];
            if page.collect_leads {
                spans.push(Span::styled(" [leads]", Style::default().fg(theme.info)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(if focused { theme.selected() } else { theme.label() })
        .highlight_symbol("▸");
    let mut list_state = ListState::default().with_selected(Some(state.page_selected));
    frame.render_stateful_widget(list, area, &mut list_state);
}
