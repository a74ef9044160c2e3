use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_segmentation::UnicodeSegmentation;

use crate::engine::{Timer, TimerState};
use crate::model::format_hms;
use crate::tui::app::{App, EditField, InlineEdit};
use crate::util::unicode;

/// Columns left of each bar for the selection pointer
const GUTTER: u16 = 2;

/// Render the Timers tab: one progress bar per live timer, oldest first
pub fn render_timers_view(frame: &mut Frame, app: &App, area: Rect) {
    if app.controller.is_empty() {
        let empty = Paragraph::new(" No timers. Pick a todo line and press 1-4.")
            .style(Style::default().fg(app.theme.dim).bg(app.theme.background));
        frame.render_widget(empty, area);
        return;
    }

    let bar_h = app.controller.config().ui.bar_height.max(1);
    // One blank row between bars
    let slot_h = bar_h.saturating_add(1);
    let visible = (area.height.saturating_add(1) / slot_h).max(1) as usize;
    let scroll = app.timer_cursor.saturating_sub(visible - 1);
    let now = app.controller.now();

    for (slot, (i, entry)) in app
        .controller
        .timers()
        .enumerate()
        .skip(scroll)
        .take(visible)
        .enumerate()
    {
        let y = area.y + slot as u16 * slot_h;
        let h = bar_h.min(area.bottom().saturating_sub(y));
        if h == 0 {
            break;
        }
        let bar_area = Rect::new(
            area.x + GUTTER,
            y,
            area.width.saturating_sub(GUTTER),
            h,
        );
        if i == app.timer_cursor {
            let pointer = Paragraph::new("\u{25b8}")
                .style(Style::default().fg(app.theme.highlight).bg(app.theme.background));
            frame.render_widget(pointer, Rect::new(area.x, y, 1, 1));
        }
        let edit = app.edit.as_ref().filter(|e| e.timer == entry.timer.id());
        let color = if entry.timer.shows_color(now) {
            app.theme.category_color(entry.timer.category())
        } else {
            app.theme.track
        };
        render_bar(frame, app, &entry.timer, color, edit, bar_area);
    }
}

/// Text shown in the bottom-right corner
fn time_text(timer: &Timer) -> String {
    let time = format_hms(timer.remaining());
    match timer.state() {
        TimerState::Paused | TimerState::Idle => format!("{} paused", time),
        _ => time,
    }
}

fn render_bar(
    frame: &mut Frame,
    app: &App,
    timer: &Timer,
    color: Color,
    edit: Option<&InlineEdit>,
    area: Rect,
) {
    let width = area.width as usize;
    let filled = ((timer.fraction() * width as f64) as usize).min(width);
    let boundary = width - filled;

    let label = match edit {
        Some(e) if e.field == EditField::Label => e.buffer.as_str(),
        _ => timer.label(),
    };
    let time = match edit {
        Some(e) if e.field == EditField::Time => format!("[{}] s", e.buffer),
        _ => time_text(timer),
    };
    let time_w = unicode::display_width(&time);

    let last = area.height as usize - 1;
    let mut lines = Vec::with_capacity(area.height as usize);
    for row in 0..area.height as usize {
        let mut cells = vec![" ".to_string(); width];
        if row == 0 {
            let room = if last == 0 {
                width.saturating_sub(time_w + 3)
            } else {
                width.saturating_sub(2)
            };
            put_text(&mut cells, 1, &unicode::truncate_to_width(label, room));
        }
        if row == last {
            put_text(&mut cells, width.saturating_sub(time_w + 1), &time);
        }

        let track_style = Style::default().fg(Color::Black).bg(app.theme.track);
        let fill_style = Style::default().fg(app.theme.text_bright).bg(color);
        let mut spans = vec![
            Span::styled(cells[..boundary].concat(), track_style),
            Span::styled(cells[boundary..].concat(), fill_style),
        ];
        if row == 0 && timer.is_blinking() {
            for s in &mut spans {
                s.style = s.style.add_modifier(Modifier::BOLD);
            }
        }
        lines.push(Line::from(spans));
    }
    frame.render_widget(Paragraph::new(lines), area);

    if let Some(e) = edit {
        let (x, y) = match e.field {
            EditField::Label => (
                area.x + 1 + unicode::cursor_col(&e.buffer, e.cursor) as u16,
                area.y,
            ),
            // "[" precedes the buffer
            EditField::Time => (
                area.x
                    + (width.saturating_sub(time_w + 1) + 1) as u16
                    + unicode::cursor_col(&e.buffer, e.cursor) as u16,
                area.y + last as u16,
            ),
        };
        if x < area.right() {
            frame.set_cursor_position(Position::new(x, y));
        }
    }
}

/// Write `text` into a row of cells starting at `col`. A wide grapheme
/// takes its cell and blanks the ones it covers.
fn put_text(cells: &mut [String], col: usize, text: &str) {
    let mut c = col;
    for g in text.graphemes(true) {
        let gw = unicode::display_width(g).max(1);
        if c + gw > cells.len() {
            break;
        }
        cells[c] = g.to_string();
        for k in 1..gw {
            cells[c + k] = String::new();
        }
        c += gw;
    }
}
