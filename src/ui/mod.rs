mod detail_panel;
mod input_box;
mod landing_list;
mod layout;
mod notifications;
mod qr_list;
mod status_bar;
mod theme;

use crate::app::state::AppState;
use ratatui::prelude::*;
use ratatui::widgets::Block;

pub fn render(frame: &mut Frame, state: &AppState) {
    let theme = theme::Theme::from_name(state.store.theme());
    let area = frame.area();
    frame.render_widget(Block::default().style(theme.base()), area);

    let app_layout = layout::compute_layout(area, state.store.notifications().len());

    qr_list::render(frame, app_layout.qr_list, state, &theme);
    detail_panel::render(frame, app_layout.detail, state, &theme);
    landing_list::render(frame, app_layout.pages, state, &theme);
    notifications::render(frame, app_layout.notifications, state, &theme);
    input_box::render(frame, app_layout.input_box, state, &theme);
    status_bar::render(frame, app_layout.status_bar, state, &theme);
}
