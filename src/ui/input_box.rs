use crate::app::state::*;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::block::Padding;
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthStr;

const PROMPT: &str = "❯ ";

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let focused = state.focus == FocusPanel::Input;

    let title = if state.store.is_authenticated() {
        " Command "
    } else {
        " Command (/login <email> <password>, /help) "
    };
    let block = Block::default()
        .title(title)
        .title_style(if focused { theme.title() } else { theme.muted() })
        .borders(Borders::ALL)
        .border_type(theme.border_type(focused))
        .border_style(theme.border(focused))
        .padding(Padding::horizontal(1))
        .style(theme.panel(focused));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let shown = state.input.display_text();

    if focused {
        let line = Line::from(vec![
            Span::styled(PROMPT, Style::default().fg(theme.accent)),
            Span::raw(shown.as_str()),
        ]);
        frame.render_widget(Paragraph::new(line), inner);

        // Masking keeps byte offsets, so the cursor index is valid in `shown`.
        let before_cursor = shown.get(..state.input.cursor).unwrap_or(shown.as_str());
        let col = (PROMPT.width() + before_cursor.width()) as u16;
        let cursor_x = inner.x.saturating_add(col);
        frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y));
    } else {
        frame.render_widget(Paragraph::new(shown).style(theme.muted()), inner);
    }
}
