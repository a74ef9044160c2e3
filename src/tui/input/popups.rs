use crossterm::event::{KeyCode, KeyEvent};

use crate::engine::{TimerEvent, TimerId, parse_seconds};
use crate::tui::app::{App, DurationPrompt, TimerMenu};

use super::common::{edit_line, step_cursor};

/// Keys for the expiry popup. Dismiss first: closing the timer also drops
/// its queued notification.
pub(super) fn handle_notification(app: &mut App, id: TimerId, key: KeyEvent) {
    let event = match key.code {
        KeyCode::Char('d') | KeyCode::Char('D') => TimerEvent::MarkDone,
        KeyCode::Char('r') | KeyCode::Char('R') => TimerEvent::Restart,
        KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Enter | KeyCode::Esc => {
            TimerEvent::Silence
        }
        _ => return,
    };
    app.controller.dismiss_notification();
    app.controller.dispatch(id, event);
}

/// Open the "How long?" prompt for the selected todo line
pub(super) fn open_prompt(app: &mut App, category: crate::model::Category) {
    if app.controller.todos.get(app.list_cursor).is_none() {
        return;
    }
    if app.controller.is_full() {
        app.status_message = Some(format!(
            "at most {} timers can run at once",
            app.controller.config().timers.max_concurrent
        ));
        return;
    }
    app.prompt = Some(DurationPrompt {
        line: app.list_cursor,
        category,
        buffer: app.controller.default_secs(category).to_string(),
    });
}

pub(super) fn handle_prompt(app: &mut App, key: KeyEvent) {
    let Some(prompt) = &mut app.prompt else {
        return;
    };
    match key.code {
        KeyCode::Esc => app.prompt = None,
        KeyCode::Enter => {
            let Some(secs) = parse_seconds(&prompt.buffer) else {
                app.status_message = Some("enter a whole number of seconds".into());
                return;
            };
            let (line, category) = (prompt.line, prompt.category);
            app.prompt = None;
            if secs <= 0 {
                return;
            }
            match app.controller.create_timer(line, category, secs) {
                Ok(_) => app.timer_cursor = app.controller.len().saturating_sub(1),
                Err(e) => app.status_message = Some(e.to_string()),
            }
        }
        _ => {
            let mut cursor = prompt.buffer.len();
            edit_line(&mut prompt.buffer, &mut cursor, &key);
        }
    }
}

pub(super) fn open_menu(app: &mut App) {
    if let Some(timer) = app.selected_timer() {
        app.menu = Some(TimerMenu { timer, cursor: 0 });
    }
}

pub(super) fn handle_menu(app: &mut App, key: KeyEvent) {
    let Some(menu) = &app.menu else {
        return;
    };
    let (timer, mut cursor) = (menu.timer, menu.cursor);
    let actions = app.menu_actions(timer);
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.menu = None;
            return;
        }
        KeyCode::Char('j') | KeyCode::Down => step_cursor(&mut cursor, actions.len(), true),
        KeyCode::Char('k') | KeyCode::Up => step_cursor(&mut cursor, actions.len(), false),
        KeyCode::Enter => {
            app.menu = None;
            if let Some(action) = actions.get(cursor) {
                app.controller.dispatch(timer, action.event());
            }
            return;
        }
        _ => return,
    }
    if let Some(menu) = &mut app.menu {
        menu.cursor = cursor;
    }
}
