use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::todos_view::category_hints;
use crate::tui::app::{App, TodoPane, View};

/// Render the status row (bottom of screen): a message if one is set,
/// otherwise key hints for the current view.
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let line = if let Some(msg) = &app.status_message {
        Line::from(Span::styled(
            format!(" {}", msg),
            Style::default().fg(app.theme.highlight).bg(bg),
        ))
    } else if app.edit.is_some() {
        Line::from(Span::styled(
            " Enter save+restart  Tab/Esc save",
            dim,
        ))
    } else {
        match app.view {
            View::Todos if app.todo_pane == TodoPane::Input => {
                Line::from(Span::styled(" Esc done  Ctrl-L load", dim))
            }
            View::Todos => {
                let mut spans = vec![Span::styled(" ", dim)];
                for (hint, color) in category_hints(app) {
                    spans.push(Span::styled(hint, Style::default().fg(color).bg(bg)));
                    spans.push(Span::styled("  ", dim));
                }
                spans.push(Span::styled("i edit  l load", dim));
                Line::from(spans)
            }
            View::Timers => Line::from(Span::styled(
                " Space pause  r restart  d done  x cancel  e label  t time  m menu",
                dim,
            )),
            View::Config => Line::from(Span::styled(
                " +/- adjust  PgUp/PgDn \u{00b1}60  w save",
                dim,
            )),
            View::Log => Line::from(Span::styled(" j/k scroll", dim)),
        }
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
