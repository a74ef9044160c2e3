use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::{Category, LineMark};
use crate::tui::app::{App, TodoPane};
use crate::util::unicode;

/// Render the Todos tab: the free-text input on top, the loaded list below
pub fn render_todos_view(frame: &mut Frame, app: &App, area: Rect) {
    let input_rows = app.controller.todos.input.lines().count().max(1) as u16 + 1;
    let input_h = input_rows.min(area.height / 3).max(1);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),       // input header
            Constraint::Length(input_h), // input text
            Constraint::Length(1),       // list header
            Constraint::Min(0),          // list
        ])
        .split(area);

    let focused = app.todo_pane == TodoPane::Input;
    render_header(frame, app, chunks[0], "Input", focused);
    render_input(frame, app, chunks[1]);
    render_header(frame, app, chunks[2], "Todos", !focused);
    render_list(frame, app, chunks[3]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect, title: &str, focused: bool) {
    let style = if focused {
        Style::default()
            .fg(app.theme.highlight)
            .bg(app.theme.background)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim).bg(app.theme.background)
    };
    let header = Paragraph::new(Line::from(Span::styled(format!(" {}", title), style)))
        .style(Style::default().bg(app.theme.background));
    frame.render_widget(header, area);
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let input = &app.controller.todos.input;
    let (cursor_row, cursor_col) = input_cursor_pos(input, app.input_cursor);
    let height = area.height as usize;
    let scroll = cursor_row.saturating_sub(height.saturating_sub(1));

    let text_style = Style::default().fg(app.theme.text).bg(app.theme.background);
    let lines: Vec<Line> = input
        .split('\n')
        .skip(scroll)
        .take(height)
        .map(|l| Line::from(Span::styled(format!("   {}", l), text_style)))
        .collect();

    if input.is_empty() && app.todo_pane != TodoPane::Input {
        let hint = Paragraph::new("   (press i and type one todo per line)")
            .style(Style::default().fg(app.theme.dim).bg(app.theme.background));
        frame.render_widget(hint, area);
        return;
    }

    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(app.theme.background)),
        area,
    );

    if app.todo_pane == TodoPane::Input && app.prompt.is_none() {
        let x = area.x + 3 + cursor_col as u16;
        let y = area.y + (cursor_row - scroll) as u16;
        if x < area.right() && y < area.bottom() {
            frame.set_cursor_position(Position::new(x, y));
        }
    }
}

/// Row and display column of a byte offset in multi-line input
fn input_cursor_pos(input: &str, offset: usize) -> (usize, usize) {
    let head = input.get(..offset.min(input.len())).unwrap_or(input);
    let row = head.matches('\n').count();
    let line_start = head.rfind('\n').map_or(0, |i| i + 1);
    (row, unicode::display_width(&head[line_start..]))
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let todos = &app.controller.todos;
    if todos.is_empty() {
        let empty = Paragraph::new(" Nothing loaded (press l to load the input)")
            .style(Style::default().fg(app.theme.dim).bg(app.theme.background));
        frame.render_widget(empty, area);
        return;
    }

    let height = area.height as usize;
    let cursor = app.list_cursor;
    let scroll = cursor.saturating_sub(height.saturating_sub(1));
    let width = area.width as usize;
    let list_focused = app.todo_pane == TodoPane::List;

    let mut lines: Vec<Line> = Vec::new();
    for (i, todo) in todos.lines.iter().enumerate().skip(scroll).take(height) {
        let is_cursor = list_focused && i == cursor;
        let mark_bg = app.theme.mark_color(todo.mark);
        let bg = mark_bg.unwrap_or(if is_cursor {
            app.theme.selection_bg
        } else {
            app.theme.background
        });
        // Marked lines have light backgrounds
        let fg = match todo.mark {
            LineMark::Open => app.theme.text_bright,
            _ => Color::Black,
        };

        let pointer = if is_cursor { "\u{25b8}" } else { " " };
        let mut spans = vec![
            Span::styled(
                pointer,
                Style::default().fg(app.theme.highlight).bg(app.theme.background),
            ),
            Span::styled(format!("{:>2}  ", i + 1), Style::default().fg(app.theme.dim).bg(bg)),
        ];

        let mut title_style = Style::default().fg(fg).bg(bg);
        if is_cursor {
            title_style = title_style.add_modifier(Modifier::BOLD);
        }
        let used = 5;
        let text = unicode::truncate_to_width(&todo.text, width.saturating_sub(used + 1));
        let text_w = unicode::display_width(&text);
        spans.push(Span::styled(text, title_style));
        if mark_bg.is_some() || is_cursor {
            let pad = width.saturating_sub(used + text_w);
            spans.push(Span::styled(" ".repeat(pad), Style::default().bg(bg)));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(app.theme.background)),
        area,
    );
}

/// Hotkey hints for starting timers: `1 red 3:20  2 blue 15:00 ...`
pub fn category_hints(app: &App) -> Vec<(String, Color)> {
    Category::ALL
        .into_iter()
        .map(|c| {
            let secs = app.controller.default_secs(c);
            (
                format!("{} {} {}:{:02}", c.hotkey(), c.name(), secs / 60, secs % 60),
                app.theme.category_color(c),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn list_shows_numbered_lines() {
        let app = app_with_lines(TODOS);
        let out = render_to_string(TERM_W, 10, |frame, area| {
            render_todos_view(frame, &app, area);
        });
        assert!(out.contains(" 1  write report"));
        assert!(out.contains(" 2  review PR"));
        assert!(out.contains(" 3  call dentist"));
        // Cursor on the first line
        assert!(out.contains("\u{25b8} 1  write report"));
    }

    #[test]
    fn done_line_shows_timestamp() {
        let mut app = app_with_lines(TODOS);
        let id = app.controller.create_timer(1, Category::Blue, 60).unwrap();
        app.controller.dispatch(id, crate::engine::TimerEvent::MarkDone);
        let out = render_to_string(TERM_W, 10, |frame, area| {
            render_todos_view(frame, &app, area);
        });
        assert!(out.contains("review PR [2025-01-01 12:00:00]"));
    }

    #[test]
    fn empty_list_hint() {
        let app = app_with_lines("");
        let out = render_to_string(TERM_W, 10, |frame, area| {
            render_todos_view(frame, &app, area);
        });
        assert!(out.contains("Nothing loaded"));
    }

    #[test]
    fn cursor_pos_in_multiline_input() {
        assert_eq!(input_cursor_pos("ab\ncd", 0), (0, 0));
        assert_eq!(input_cursor_pos("ab\ncd", 4), (1, 1));
        assert_eq!(input_cursor_pos("ab\n", 3), (1, 0));
    }

    #[test]
    fn hints_follow_config_defaults() {
        let mut app = app_with_lines(TODOS);
        app.controller.config_mut().set_default_secs(Category::Red, 90);
        let hints = category_hints(&app);
        assert_eq!(hints[0].0, "1 red 1:30");
        assert_eq!(hints[1].0, "2 blue 15:00");
    }
}
