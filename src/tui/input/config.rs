use crossterm::event::{KeyCode, KeyEvent};

use crate::io::config_io;
use crate::tui::app::{App, ConfigRow};

use super::common::step_cursor;

pub(super) fn handle_config(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            step_cursor(&mut app.config_cursor, ConfigRow::ALL.len(), true)
        }
        KeyCode::Char('k') | KeyCode::Up => {
            step_cursor(&mut app.config_cursor, ConfigRow::ALL.len(), false)
        }
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right | KeyCode::Char('l') => {
            adjust(app, 1)
        }
        KeyCode::Char('-') | KeyCode::Left | KeyCode::Char('h') => adjust(app, -1),
        KeyCode::PageUp => adjust(app, 60),
        KeyCode::PageDown => adjust(app, -60),
        KeyCode::Char('w') => save(app),
        _ => {}
    }
}

/// Step the selected setting; the config clamps it to its range
fn adjust(app: &mut App, delta: i64) {
    let Some(row) = ConfigRow::ALL.get(app.config_cursor).copied() else {
        return;
    };
    let config = app.controller.config_mut();
    match row {
        ConfigRow::Default(cat) => {
            let current = config.default_secs(cat) as i64;
            config.set_default_secs(cat, (current + delta).max(0) as u64);
        }
        ConfigRow::BarHeight => {
            let current = config.ui.bar_height as i64;
            let next = (current + delta.signum()).clamp(0, u16::MAX as i64);
            config.set_bar_height(next as u16);
        }
    }
}

fn save(app: &mut App) {
    let Some(path) = app.config_path.clone() else {
        app.status_message = Some("no config file to save to".into());
        return;
    };
    config_io::sync_runtime_settings(&mut app.config_doc, app.controller.config());
    match config_io::write_config(&path, &app.config_doc) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "config saved");
            app.status_message = Some(format!("saved {}", path.display()));
        }
        Err(e) => {
            tracing::warn!(error = %e, "config save failed");
            app.status_message = Some(e.to_string());
        }
    }
}
