use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;

/// Render the completion log, oldest first, one record per row
pub fn render_log_view(frame: &mut Frame, app: &App, area: Rect) {
    let log = app.controller.log();
    let bg = app.theme.background;
    if log.is_empty() {
        let empty = Paragraph::new(" No timers have expired yet")
            .style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    let height = area.height as usize;
    let max_scroll = log.len().saturating_sub(height);
    let scroll = app.log_scroll.min(max_scroll);

    let lines: Vec<Line> = log
        .records()
        .iter()
        .skip(scroll)
        .take(height)
        .map(|record| {
            Line::from(vec![
                Span::styled(" ", Style::default().bg(bg)),
                Span::styled(
                    record.line(),
                    Style::default()
                        .fg(app.theme.category_color(record.category))
                        .bg(bg),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}
