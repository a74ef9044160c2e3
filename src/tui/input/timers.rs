use crossterm::event::{KeyCode, KeyEvent};

use crate::engine::TimerEvent;
use crate::tui::app::{App, EditField};

use super::common::step_cursor;
use super::edit::begin_edit;
use super::popups::open_menu;

pub(super) fn handle_timers(app: &mut App, key: KeyEvent) {
    let len = app.controller.len();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => step_cursor(&mut app.timer_cursor, len, true),
        KeyCode::Char('k') | KeyCode::Up => step_cursor(&mut app.timer_cursor, len, false),
        KeyCode::Char('g') | KeyCode::Home => app.timer_cursor = 0,
        KeyCode::Char('G') | KeyCode::End => app.timer_cursor = len.saturating_sub(1),
        KeyCode::Char(' ') => toggle_selected(app),
        KeyCode::Char('r') => send(app, TimerEvent::Restart),
        KeyCode::Char('d') => send(app, TimerEvent::MarkDone),
        KeyCode::Char('x') => send(app, TimerEvent::Cancel),
        KeyCode::Char('s') => send(app, TimerEvent::Silence),
        KeyCode::Char('e') => begin_edit(app, EditField::Label),
        KeyCode::Char('t') => begin_edit(app, EditField::Time),
        KeyCode::Char('m') | KeyCode::Enter => open_menu(app),
        _ => {}
    }
}

fn send(app: &mut App, event: TimerEvent) {
    if let Some(id) = app.selected_timer() {
        app.controller.dispatch(id, event);
    }
}

/// Space: silence a blinking timer, otherwise pause or continue
fn toggle_selected(app: &mut App) {
    let Some(entry) = app.selected_timer().and_then(|id| app.controller.get(id)) else {
        return;
    };
    let event = if entry.timer.is_blinking() {
        TimerEvent::Silence
    } else if entry.timer.is_running() {
        TimerEvent::Pause
    } else {
        TimerEvent::Start
    };
    send(app, event);
}
