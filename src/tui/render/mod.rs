pub mod config_view;
pub mod log_view;
pub mod popups;
pub mod status_row;
pub mod tab_bar;
pub mod timers_view;
pub mod todos_view;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::{App, View};

/// Main render function: dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: tab bar (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // tab bar + separator
            Constraint::Min(1),    // content area
            Constraint::Length(1), // status row
        ])
        .split(area);

    tab_bar::render_tab_bar(frame, app, chunks[0]);

    match app.view {
        View::Todos => todos_view::render_todos_view(frame, app, chunks[1]),
        View::Timers => timers_view::render_timers_view(frame, app, chunks[1]),
        View::Config => config_view::render_config_view(frame, app, chunks[1]),
        View::Log => log_view::render_log_view(frame, app, chunks[1]),
    }

    // Popups, top-most last
    if app.prompt.is_some() {
        popups::render_duration_prompt(frame, app, area);
    }
    if app.menu.is_some() {
        popups::render_timer_menu(frame, app, area);
    }
    if let Some(id) = app.controller.pending_notification() {
        popups::render_expired_popup(frame, app, id, area);
    }

    status_row::render_status_row(frame, app, chunks[2]);
}
