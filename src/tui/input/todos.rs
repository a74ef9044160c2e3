use crossterm::event::{KeyCode, KeyEvent};

use crate::model::Category;
use crate::tui::app::{App, TodoPane};

use super::common::{edit_line, is_ctrl, step_cursor};
use super::popups::open_prompt;

pub(super) fn handle_todos(app: &mut App, key: KeyEvent) {
    match app.todo_pane {
        TodoPane::Input => handle_input(app, key),
        TodoPane::List => handle_list(app, key),
    }
}

/// Replace the list with the input's lines
pub(super) fn load_list(app: &mut App) {
    app.controller.todos.load();
    app.list_cursor = 0;
    app.todo_pane = TodoPane::List;
    tracing::debug!(lines = app.controller.todos.len(), "todo list loaded");
}

fn handle_input(app: &mut App, key: KeyEvent) {
    if is_ctrl(&key, 'l') {
        load_list(app);
        return;
    }
    let input = &mut app.controller.todos.input;
    match key.code {
        KeyCode::Esc => app.todo_pane = TodoPane::List,
        KeyCode::Enter => {
            let at = app.input_cursor.min(input.len());
            input.insert(at, '\n');
            app.input_cursor = at + 1;
        }
        _ => edit_line(input, &mut app.input_cursor, &key),
    }
}

fn handle_list(app: &mut App, key: KeyEvent) {
    if is_ctrl(&key, 'l') {
        load_list(app);
        return;
    }
    let len = app.controller.todos.len();
    match key.code {
        KeyCode::Char('i') => {
            app.todo_pane = TodoPane::Input;
            app.input_cursor = app.controller.todos.input.len();
        }
        KeyCode::Char('l') => load_list(app),
        KeyCode::Char('j') | KeyCode::Down => step_cursor(&mut app.list_cursor, len, true),
        KeyCode::Char('k') | KeyCode::Up => step_cursor(&mut app.list_cursor, len, false),
        KeyCode::Char('g') | KeyCode::Home => app.list_cursor = 0,
        KeyCode::Char('G') | KeyCode::End => app.list_cursor = len.saturating_sub(1),
        KeyCode::Char(c) => {
            if let Some(category) = Category::from_hotkey(c) {
                open_prompt(app, category);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::tui::render::test_helpers::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_then_loading() {
        let mut app = app_with_lines("");
        handle_todos(&mut app, key(KeyCode::Char('i')));
        for c in "  buy milk ".chars() {
            handle_todos(&mut app, key(KeyCode::Char(c)));
        }
        handle_todos(&mut app, key(KeyCode::Enter));
        handle_todos(&mut app, key(KeyCode::Enter));
        for c in "walk dog".chars() {
            handle_todos(&mut app, key(KeyCode::Char(c)));
        }
        handle_todos(
            &mut app,
            KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL),
        );

        assert_eq!(app.todo_pane, TodoPane::List);
        let texts: Vec<&str> = app
            .controller
            .todos
            .lines
            .iter()
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(texts, vec!["buy milk", "walk dog"]);
    }

    #[test]
    fn hotkey_opens_prompt_for_cursor_line() {
        let mut app = app_with_lines(TODOS);
        handle_todos(&mut app, key(KeyCode::Char('j')));
        handle_todos(&mut app, key(KeyCode::Char('4')));
        let prompt = app.prompt.as_ref().unwrap();
        assert_eq!(prompt.line, 1);
        assert_eq!(prompt.category, Category::Turquoise);
        assert_eq!(prompt.buffer, "300");
    }

    #[test]
    fn hotkey_on_empty_list_does_nothing() {
        let mut app = app_with_lines("");
        handle_todos(&mut app, key(KeyCode::Char('1')));
        assert!(app.prompt.is_none());
    }

    #[test]
    fn reload_resets_cursor() {
        let mut app = app_with_lines(TODOS);
        app.list_cursor = 2;
        app.controller.todos.input = "only one".into();
        handle_todos(&mut app, key(KeyCode::Char('l')));
        assert_eq!(app.list_cursor, 0);
        assert_eq!(app.controller.todos.len(), 1);
    }
}
