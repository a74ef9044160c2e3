use crossterm::event::{KeyCode, KeyEvent};

use crate::engine::{TimerEvent, parse_seconds};
use crate::tui::app::{App, EditField, InlineEdit};

use super::common::edit_line;

/// Open the inline editor on the selected timer. An editor already open
/// elsewhere is saved first, so only one exists at a time.
pub(super) fn begin_edit(app: &mut App, field: EditField) {
    let Some(id) = app.selected_timer() else {
        return;
    };
    if app.edit.is_some() {
        commit_edit(app, false);
    }
    let Some(entry) = app.controller.get(id) else {
        return;
    };
    let buffer = match field {
        EditField::Label => entry.timer.label().to_string(),
        EditField::Time => entry.timer.remaining().as_secs().to_string(),
    };
    let cursor = buffer.len();
    app.edit = Some(InlineEdit {
        timer: id,
        field,
        buffer,
        cursor,
    });
}

/// Close the editor and apply its buffer. `submit` is Enter: a label edit
/// then restarts the countdown. Non-numeric time input is dropped.
pub(super) fn commit_edit(app: &mut App, submit: bool) {
    let Some(edit) = app.edit.take() else {
        return;
    };
    let event = match edit.field {
        EditField::Label if submit => TimerEvent::EditLabelAndRestart(edit.buffer),
        EditField::Label => TimerEvent::EditLabel(edit.buffer),
        EditField::Time => match parse_seconds(&edit.buffer) {
            Some(secs) => TimerEvent::EditRemaining(secs),
            None => {
                app.status_message = Some(format!("not a number: {}", edit.buffer.trim()));
                return;
            }
        },
    };
    app.controller.dispatch(edit.timer, event);
}

pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => commit_edit(app, true),
        // Leaving the field saves it
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Esc => commit_edit(app, false),
        _ => {
            if let Some(edit) = &mut app.edit {
                edit_line(&mut edit.buffer, &mut edit.cursor, &key);
            }
        }
    }
}
