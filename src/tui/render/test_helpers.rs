use std::time::Duration;

use chrono::{Local, TimeZone};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::engine::{Controller, CountingAlarm, ManualClock};
use crate::model::{AppConfig, TodoList};
use crate::tui::app::App;

pub const TERM_W: u16 = 60;
pub const TERM_H: u16 = 20;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An App over loaded todo lines, with a hand-driven clock and a counting alarm.
pub fn app_with_clock(lines: &str) -> (App, ManualClock, CountingAlarm) {
    let clock = ManualClock::new(Local.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap());
    let alarm = CountingAlarm::default();
    let mut todos = TodoList::with_input(lines);
    todos.load();
    let controller = Controller::new(
        AppConfig::default(),
        todos,
        Box::new(clock.clone()),
        Box::new(alarm.clone()),
    );
    (App::new(controller), clock, alarm)
}

pub fn app_with_lines(lines: &str) -> App {
    app_with_clock(lines).0
}

/// Advance the clock in tick-sized steps, running due jobs after each.
pub fn advance(app: &mut App, clock: &ManualClock, total: Duration) {
    let step = Duration::from_millis(100);
    let mut elapsed = Duration::ZERO;
    while elapsed < total {
        clock.advance(step);
        elapsed += step;
        app.controller.run_due();
        app.clamp_cursors();
    }
}

/// Render the whole screen at the default test size.
pub fn render_app(app: &mut App) -> String {
    render_to_string(TERM_W, TERM_H, |frame, _| super::render(frame, app))
}

pub const TODOS: &str = "\
write report
review PR
call dentist
";
