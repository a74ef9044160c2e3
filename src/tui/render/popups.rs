use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::engine::TimerId;
use crate::model::format_hms;
use crate::tui::app::App;
use crate::util::unicode;

/// "How long?" prompt for a new timer
pub fn render_duration_prompt(frame: &mut Frame, app: &App, area: Rect) {
    let Some(prompt) = &app.prompt else {
        return;
    };
    let popup_w: u16 = 44.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(2) as usize;
    let bg = app.theme.background;
    let color = app.theme.category_color(prompt.category);

    let label = app
        .controller
        .todos
        .get(prompt.line)
        .map_or("", |l| l.text.as_str());

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            format!(" How long? ({})", prompt.category),
            Style::default().fg(color).bg(bg).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for s in wrap_text(" ", label, inner_w) {
        lines.push(Line::from(Span::styled(
            s,
            Style::default().fg(app.theme.text).bg(bg),
        )));
    }
    lines.push(Line::from(""));
    let input_row = lines.len() as u16;
    lines.push(Line::from(vec![
        Span::styled(" Seconds: ", Style::default().fg(app.theme.dim).bg(bg)),
        Span::styled(
            prompt.buffer.clone(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Enter start  Esc cancel",
        Style::default().fg(app.theme.dim).bg(bg),
    )));

    let overlay = render_box(frame, app, lines, popup_w, color, area);

    let x = overlay.x + 1 + 10 + unicode::display_width(&prompt.buffer) as u16;
    let y = overlay.y + 1 + input_row;
    if x < overlay.right().saturating_sub(1) && y < overlay.bottom().saturating_sub(1) {
        frame.set_cursor_position(Position::new(x, y));
    }
}

/// Action menu for one timer
pub fn render_timer_menu(frame: &mut Frame, app: &App, area: Rect) {
    let Some(menu) = &app.menu else {
        return;
    };
    let Some(entry) = app.controller.get(menu.timer) else {
        return;
    };
    let bg = app.theme.background;
    let popup_w: u16 = 32.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(2) as usize;

    let mut lines: Vec<Line> = vec![Line::from(Span::styled(
        format!(
            " {}",
            unicode::truncate_to_width(entry.timer.label(), inner_w.saturating_sub(1))
        ),
        Style::default()
            .fg(app.theme.category_color(entry.timer.category()))
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    ))];
    lines.push(Line::from(""));

    for (i, action) in app.menu_actions(menu.timer).into_iter().enumerate() {
        let style = if i == menu.cursor {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text).bg(bg)
        };
        let text = format!(" {:<width$}", action.label(), width = inner_w.saturating_sub(1));
        lines.push(Line::from(Span::styled(text, style)));
    }

    render_box(frame, app, lines, popup_w, app.theme.highlight, area);
}

/// Modal shown once per expiry; timers keep running underneath
pub fn render_expired_popup(frame: &mut Frame, app: &App, id: TimerId, area: Rect) {
    let Some(entry) = app.controller.get(id) else {
        return;
    };
    let bg = app.theme.background;
    let popup_w: u16 = 44.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(2) as usize;
    let color = app.theme.category_color(entry.timer.category());

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            " Timer expired",
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for s in wrap_text(" ", entry.timer.label(), inner_w) {
        lines.push(Line::from(Span::styled(
            s,
            Style::default().fg(app.theme.text_bright).bg(bg),
        )));
    }
    lines.push(Line::from(Span::styled(
        format!(
            " {} after {}",
            entry.timer.category(),
            format_hms(entry.timer.duration())
        ),
        Style::default().fg(color).bg(bg),
    )));
    lines.push(Line::from(""));
    let key = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text = Style::default().fg(app.theme.text).bg(bg);
    lines.push(Line::from(vec![
        Span::styled(" d", key),
        Span::styled(" Done  ", text),
        Span::styled("c", key),
        Span::styled(" Continue  ", text),
        Span::styled("r", key),
        Span::styled(" Restart", text),
    ]));

    render_box(frame, app, lines, popup_w, color, area);
}

/// Clear a centered box sized to `lines` and draw them in a bordered block.
/// Returns the box area.
fn render_box(
    frame: &mut Frame,
    app: &App,
    lines: Vec<Line>,
    width: u16,
    border: ratatui::style::Color,
    area: Rect,
) -> Rect {
    let bg = app.theme.background;
    // Dynamic height from content + 2 for borders
    let height = ((lines.len() as u16) + 2).min(area.height.saturating_sub(2));
    let overlay = centered_rect_fixed(width, height, area);
    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border).bg(bg))
        .style(Style::default().bg(bg));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, overlay);
    overlay
}

/// Word-wrap `text` into lines of at most `max_width` cells.
/// Every line (including the first) is prefixed with `indent`.
fn wrap_text(indent: &str, text: &str, max_width: usize) -> Vec<String> {
    let indent_len = unicode::display_width(indent);
    let mut lines = Vec::new();
    let mut current = indent.to_string();
    let mut current_w = indent_len;

    for word in text.split_whitespace() {
        let word_w = unicode::display_width(word);
        let space = if current_w == indent_len { 0 } else { 1 };
        if current_w + space + word_w > max_width && current_w > indent_len {
            lines.push(current);
            current = indent.to_string();
            current_w = indent_len;
        }
        if current_w > indent_len {
            current.push(' ');
            current_w += 1;
        }
        current.push_str(word);
        current_w += word_w;
    }
    if current_w > indent_len || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use crate::tui::app::{DurationPrompt, TimerMenu};
    use crate::tui::render::test_helpers::*;

    #[test]
    fn wrap_breaks_on_words() {
        assert_eq!(
            wrap_text(" ", "write the quarterly report", 12),
            vec![" write the", " quarterly", " report"]
        );
        assert_eq!(wrap_text(" ", "", 12), vec![" "]);
    }

    #[test]
    fn prompt_shows_line_and_buffer() {
        let mut app = app_with_lines(TODOS);
        app.prompt = Some(DurationPrompt {
            line: 1,
            category: Category::Blue,
            buffer: "900".into(),
        });
        let out = render_app(&mut app);
        assert!(out.contains("How long? (blue)"));
        assert!(out.contains("review PR"));
        assert!(out.contains("Seconds: 900"));
    }

    #[test]
    fn menu_lists_actions() {
        let mut app = app_with_lines(TODOS);
        let id = app.controller.create_timer(0, Category::Red, 60).unwrap();
        app.menu = Some(TimerMenu {
            timer: id,
            cursor: 0,
        });
        let out = render_app(&mut app);
        for label in ["Done", "Cancel", "Pause", "Restart"] {
            assert!(out.contains(label), "missing {label}");
        }
    }

    #[test]
    fn popups_survive_tiny_terminal() {
        let mut app = app_with_lines(TODOS);
        let id = app.controller.create_timer(0, Category::Red, 60).unwrap();
        app.menu = Some(TimerMenu {
            timer: id,
            cursor: 0,
        });
        app.prompt = Some(DurationPrompt {
            line: 0,
            category: Category::Red,
            buffer: "200".into(),
        });
        for w in 1..=4 {
            render_to_string(w, TERM_H, |frame, area| {
                render_timer_menu(frame, &app, area);
                render_duration_prompt(frame, &app, area);
                render_expired_popup(frame, &app, id, area);
            });
        }
    }

    #[test]
    fn expired_popup_names_timer() {
        let (mut app, clock, _) = app_with_clock(TODOS);
        app.controller.create_timer(2, Category::Turquoise, 1).unwrap();
        advance(&mut app, &clock, std::time::Duration::from_secs(2));
        let out = render_app(&mut app);
        assert!(out.contains("Timer expired"));
        assert!(out.contains("call dentist"));
        assert!(out.contains("turquoise after 00:00:01"));
        assert!(out.contains("d Done  c Continue  r Restart"));
    }
}
