use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, View};

/// Render the tab bar: one tab per view, with a separator line below
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let sep_cols = render_tabs(frame, app, chunks[0]);
    render_separator(frame, app, chunks[1], &sep_cols);
}

fn tab_title(app: &App, view: View) -> String {
    match view {
        View::Todos => "Todos".to_string(),
        View::Timers => format!("Timers {}", app.controller.len()),
        View::Config => "Config".to_string(),
        View::Log => match app.controller.log().len() {
            0 => "Log".to_string(),
            n => format!("Log {}", n),
        },
    }
}

/// Render tabs and return the column positions of each separator character.
fn render_tabs(frame: &mut Frame, app: &App, area: Rect) -> Vec<usize> {
    let mut spans: Vec<Span> = Vec::new();
    let mut sep_cols: Vec<usize> = Vec::new();
    let sep = Span::styled(
        "\u{2502}",
        Style::default().fg(app.theme.dim).bg(app.theme.background),
    );

    spans.push(Span::styled(" ", Style::default().bg(app.theme.background)));
    for view in View::ALL {
        let style = tab_style(app, app.view == view);
        spans.push(Span::styled(format!(" {} ", tab_title(app, view)), style));
        sep_cols.push(spans.iter().map(|s| s.content.chars().count()).sum());
        spans.push(sep.clone());
    }

    let line = Line::from(spans);
    let tabs = Paragraph::new(line).style(Style::default().bg(app.theme.background));
    frame.render_widget(tabs, area);
    sep_cols
}

/// Separator line with the live/maximum timer count at the right edge
fn render_separator(frame: &mut Frame, app: &App, area: Rect, sep_cols: &[usize]) {
    let width = area.width as usize;
    let bg = app.theme.background;
    let dim = app.theme.dim;

    let max = app.controller.config().timers.max_concurrent;
    let indicator = format!("{}/{} running", app.controller.len(), max);
    let indicator_color = if app.controller.any_blinking() {
        app.theme.highlight
    } else if app.controller.is_full() {
        app.theme.started
    } else {
        dim
    };
    // +2: one space before the indicator, one after
    let indicator_width = indicator.chars().count();
    let separator_end = width.saturating_sub(indicator_width + 2);

    let sep_text: String = (0..separator_end)
        .map(|col| {
            if sep_cols.contains(&col) {
                '\u{2534}'
            } else {
                '\u{2500}'
            }
        })
        .collect();

    let mut spans = vec![Span::styled(sep_text, Style::default().fg(dim).bg(bg))];
    if width > indicator_width + 2 {
        spans.push(Span::styled(" ", Style::default().bg(bg)));
        spans.push(Span::styled(
            indicator,
            Style::default().fg(indicator_color).bg(bg),
        ));
        spans.push(Span::styled(" ", Style::default().bg(bg)));
    }

    let sep_widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(sep_widget, area);
}

/// Style for a tab: highlighted if current, normal otherwise
fn tab_style(app: &App, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(app.theme.background)
    }
}
