use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Notifications shown at once; older ones wait until newer ones go.
pub const MAX_VISIBLE_NOTIFICATIONS: usize = 4;

pub struct AppLayout {
    pub qr_list: Rect,
    pub detail: Rect,
    pub pages: Rect,
    pub notifications: Rect,
    pub input_box: Rect,
    pub status_bar: Rect,
}

pub fn compute_layout(area: Rect, notification_count: usize) -> AppLayout {
    let shown = notification_count.min(MAX_VISIBLE_NOTIFICATIONS) as u16;
    let notification_height = if shown == 0 { 0 } else { shown + 2 };

    // Main vertical split: content | notifications | input | status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),
            Constraint::Length(notification_height),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    let content = main_chunks[0];

    // Horizontal: QR list | gap | detail + pages
    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .spacing(1)
        .constraints([Constraint::Percentage(40), Constraint::Min(30)])
        .split(content);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Percentage(35)])
        .split(h_chunks[1]);

    AppLayout {
        qr_list: h_chunks[0],
        detail: right_chunks[0],
        pages: right_chunks[1],
        notifications: main_chunks[1],
        input_box: main_chunks[2],
        status_bar: main_chunks[3],
    }
}
