use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::format_hms;
use crate::tui::app::{App, ConfigRow};

const KEY_COL: usize = 18;

/// Render the Config tab: editable rows first, then read-only settings
pub fn render_config_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let config = app.controller.config();
    let header_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(app.theme.dim).bg(bg);
    let value_style = Style::default().fg(app.theme.text).bg(bg);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(" Defaults", header_style)));

    for (i, row) in ConfigRow::ALL.into_iter().enumerate() {
        let is_cursor = i == app.config_cursor;
        let row_bg = if is_cursor { app.theme.selection_bg } else { bg };
        let (key, value, key_color) = match row {
            ConfigRow::Default(cat) => {
                let secs = config.default_secs(cat);
                (
                    cat.name().to_string(),
                    format!("{:>5} s  ({})", secs, format_hms(Duration::from_secs(secs))),
                    app.theme.category_color(cat),
                )
            }
            ConfigRow::BarHeight => (
                "bar height".to_string(),
                format!("{:>5} rows", config.ui.bar_height),
                app.theme.text,
            ),
        };
        let pointer = if is_cursor { "\u{25b8}" } else { " " };
        let mut spans = vec![
            Span::styled(pointer, Style::default().fg(app.theme.highlight).bg(bg)),
            Span::styled(
                format!("  {:<width$}", key, width = KEY_COL - 2),
                Style::default().fg(key_color).bg(row_bg),
            ),
            Span::styled(value, Style::default().fg(app.theme.text_bright).bg(row_bg)),
        ];
        if is_cursor {
            let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
            let pad = (area.width as usize).saturating_sub(used);
            spans.push(Span::styled(" ".repeat(pad), Style::default().bg(row_bg)));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" Timers", header_style)));
    let info = [
        ("max concurrent", config.timers.max_concurrent.to_string()),
        ("tick", format!("{} ms", config.timers.tick_ms)),
        ("blink", format!("{} ms", config.timers.blink_ms)),
        ("alarm repeat", format!("{} ms", config.timers.alarm_ms)),
        ("bell", config.alarm.bell.to_string()),
        (
            "sound file",
            config
                .alarm
                .sound_file
                .clone()
                .unwrap_or_else(|| "none".to_string()),
        ),
    ];
    for (key, value) in info {
        lines.push(Line::from(vec![
            Span::styled(format!("   {:<width$}", key, width = KEY_COL - 2), key_style),
            Span::styled(value, value_style),
        ]));
    }

    lines.push(Line::from(""));
    let path = app
        .config_path
        .as_ref()
        .map_or_else(|| "(not saved)".to_string(), |p| p.display().to_string());
    lines.push(Line::from(vec![
        Span::styled(format!("   {:<width$}", "file", width = KEY_COL - 2), key_style),
        Span::styled(path, value_style),
    ]));

    let scroll = (lines.len() as u16).saturating_sub(area.height);
    let scroll = scroll.min(app.config_cursor as u16);
    let paragraph = Paragraph::new(lines)
        .style(Style::default().bg(bg))
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}
