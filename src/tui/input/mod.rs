mod common;
mod config;
mod edit;
mod popups;
mod timers;
mod todos;

use crossterm::event::{KeyCode, KeyEvent};

use super::app::{App, TodoPane, View};

use common::{is_ctrl, normalize_key, step_cursor};
use config::handle_config;
use edit::handle_edit;
use popups::{handle_menu, handle_notification, handle_prompt};
use timers::handle_timers;
use todos::handle_todos;

/// Handle a key event. Overlays take keys before the current view, the
/// expiry popup before everything else.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    let key = normalize_key(key);
    if is_ctrl(&key, 'c') {
        app.should_quit = true;
        return;
    }
    app.status_message = None;

    if let Some(id) = app.controller.pending_notification() {
        handle_notification(app, id, key);
        return;
    }
    if app.prompt.is_some() {
        handle_prompt(app, key);
        return;
    }
    if app.menu.is_some() {
        handle_menu(app, key);
        return;
    }
    if app.edit.is_some() {
        handle_edit(app, key);
        return;
    }

    let typing = app.view == View::Todos && app.todo_pane == TodoPane::Input;
    match key.code {
        KeyCode::Tab => {
            app.view = app.view.next();
            return;
        }
        KeyCode::BackTab => {
            app.view = app.view.prev();
            return;
        }
        KeyCode::Char('q') if !typing => {
            app.should_quit = true;
            return;
        }
        _ => {}
    }

    match app.view {
        View::Todos => handle_todos(app, key),
        View::Timers => handle_timers(app, key),
        View::Config => handle_config(app, key),
        View::Log => handle_log(app, key),
    }
}

/// Bracketed paste: into the todo input as-is, into an inline edit or the
/// duration prompt as a single line.
pub fn handle_paste(app: &mut App, text: &str) {
    if text.is_empty() || app.controller.pending_notification().is_some() {
        return;
    }
    let flat = || text.replace(['\r', '\n'], " ");
    if let Some(prompt) = &mut app.prompt {
        prompt.buffer.push_str(flat().trim());
    } else if let Some(edit) = &mut app.edit {
        let at = edit.cursor.min(edit.buffer.len());
        let pasted = flat();
        edit.buffer.insert_str(at, &pasted);
        edit.cursor = at + pasted.len();
    } else if app.view == View::Todos && app.todo_pane == TodoPane::Input {
        let input = &mut app.controller.todos.input;
        let at = app.input_cursor.min(input.len());
        let pasted = text.replace("\r\n", "\n");
        input.insert_str(at, &pasted);
        app.input_cursor = at + pasted.len();
    }
}

fn handle_log(app: &mut App, key: KeyEvent) {
    let len = app.controller.log().len();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => step_cursor(&mut app.log_scroll, len, true),
        KeyCode::Char('k') | KeyCode::Up => step_cursor(&mut app.log_scroll, len, false),
        KeyCode::Char('g') | KeyCode::Home => app.log_scroll = 0,
        KeyCode::Char('G') | KeyCode::End => app.log_scroll = len.saturating_sub(1),
        _ => {}
    }
}
