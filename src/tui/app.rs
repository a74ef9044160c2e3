use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::engine::{
    Alarm, Controller, SilentAlarm, SoundAlarm, SystemClock, TimerEvent, TimerId,
};
use crate::io::config_io;
use crate::model::{Category, TodoList};

use super::input;
use super::render;
use super::theme::Theme;

/// Longest the loop sleeps when no timer job is pending
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Which tab is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Todos,
    Timers,
    Config,
    Log,
}

impl View {
    pub const ALL: [View; 4] = [View::Todos, View::Timers, View::Config, View::Log];

    pub fn next(self) -> View {
        let i = View::ALL.iter().position(|v| *v == self).unwrap_or(0);
        View::ALL[(i + 1) % View::ALL.len()]
    }

    pub fn prev(self) -> View {
        let i = View::ALL.iter().position(|v| *v == self).unwrap_or(0);
        View::ALL[(i + View::ALL.len() - 1) % View::ALL.len()]
    }
}

/// Focus inside the Todos tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoPane {
    /// Browsing the loaded list
    List,
    /// Typing into the input buffer
    Input,
}

/// "How long?" prompt shown before a timer is created
#[derive(Debug, Clone)]
pub struct DurationPrompt {
    pub line: usize,
    pub category: Category,
    pub buffer: String,
}

/// Right-click style action menu for one timer
#[derive(Debug, Clone)]
pub struct TimerMenu {
    pub timer: TimerId,
    pub cursor: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Done,
    Cancel,
    Pause,
    Continue,
    Restart,
}

impl MenuAction {
    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Done => "Done",
            MenuAction::Cancel => "Cancel",
            MenuAction::Pause => "Pause",
            MenuAction::Continue => "Continue",
            MenuAction::Restart => "Restart",
        }
    }

    pub fn event(self) -> TimerEvent {
        match self {
            MenuAction::Done => TimerEvent::MarkDone,
            MenuAction::Cancel => TimerEvent::Cancel,
            MenuAction::Pause => TimerEvent::Pause,
            MenuAction::Continue => TimerEvent::Start,
            MenuAction::Restart => TimerEvent::Restart,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Label,
    Time,
}

/// The single inline edit control. Only one exists at a time.
#[derive(Debug, Clone)]
pub struct InlineEdit {
    pub timer: TimerId,
    pub field: EditField,
    pub buffer: String,
    /// Byte offset into `buffer`
    pub cursor: usize,
}

/// Editable rows of the Config tab, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigRow {
    Default(Category),
    BarHeight,
}

impl ConfigRow {
    pub const ALL: [ConfigRow; 5] = [
        ConfigRow::Default(Category::Red),
        ConfigRow::Default(Category::Blue),
        ConfigRow::Default(Category::Purple),
        ConfigRow::Default(Category::Turquoise),
        ConfigRow::BarHeight,
    ];
}

/// Main application state
pub struct App {
    pub controller: Controller,
    pub view: View,
    pub theme: Theme,
    pub should_quit: bool,
    pub todo_pane: TodoPane,
    /// Byte offset into the todo input
    pub input_cursor: usize,
    pub list_cursor: usize,
    pub timer_cursor: usize,
    pub config_cursor: usize,
    pub log_scroll: usize,
    pub prompt: Option<DurationPrompt>,
    pub menu: Option<TimerMenu>,
    pub edit: Option<InlineEdit>,
    /// Where `w` in the Config tab saves to
    pub config_path: Option<PathBuf>,
    pub config_doc: toml_edit::DocumentMut,
    pub status_message: Option<String>,
}

impl App {
    pub fn new(controller: Controller) -> Self {
        let theme = Theme::from_config(&controller.config().ui);
        let input_cursor = controller.todos.input.len();
        App {
            controller,
            view: View::Todos,
            theme,
            should_quit: false,
            todo_pane: TodoPane::List,
            input_cursor,
            list_cursor: 0,
            timer_cursor: 0,
            config_cursor: 0,
            log_scroll: 0,
            prompt: None,
            menu: None,
            edit: None,
            config_path: None,
            config_doc: toml_edit::DocumentMut::new(),
            status_message: None,
        }
    }

    /// The timer under the cursor in the Timers tab
    pub fn selected_timer(&self) -> Option<TimerId> {
        self.controller.timer_ids().get(self.timer_cursor).copied()
    }

    /// Keep cursors inside their lists after timers or lines disappear
    pub fn clamp_cursors(&mut self) {
        let timers = self.controller.len();
        self.timer_cursor = self.timer_cursor.min(timers.saturating_sub(1));
        let lines = self.controller.todos.len();
        self.list_cursor = self.list_cursor.min(lines.saturating_sub(1));
        self.input_cursor = self.input_cursor.min(self.controller.todos.input.len());
        if let Some(edit) = &self.edit
            && self.controller.get(edit.timer).is_none()
        {
            self.edit = None;
        }
        if let Some(menu) = &self.menu
            && self.controller.get(menu.timer).is_none()
        {
            self.menu = None;
        }
    }

    /// Menu entries for a timer; the pause entry flips with the running state
    pub fn menu_actions(&self, timer: TimerId) -> Vec<MenuAction> {
        let running = self
            .controller
            .get(timer)
            .is_some_and(|e| e.timer.is_running());
        vec![
            MenuAction::Done,
            MenuAction::Cancel,
            if running {
                MenuAction::Pause
            } else {
                MenuAction::Continue
            },
            MenuAction::Restart,
        ]
    }
}

/// Command line choices for the TUI
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config_path: Option<PathBuf>,
    pub todos_file: Option<PathBuf>,
}

/// Run the TUI application
pub fn run(options: RunOptions) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = match options.config_path {
        Some(p) => p,
        None => config_io::default_config_path()?,
    };
    let (config, doc) = config_io::read_config(&config_path)?;
    tracing::info!(path = %config_path.display(), "config loaded");

    let mut todos = match &options.todos_file {
        Some(path) => TodoList::with_input(std::fs::read_to_string(path)?),
        None => TodoList::default(),
    };
    todos.load();

    let alarm: Box<dyn Alarm> = if config.alarm.bell || config.alarm.sound_file.is_some() {
        Box::new(SoundAlarm::from_config(&config.alarm))
    } else {
        Box::new(SilentAlarm)
    };
    let controller = Controller::new(config, todos, Box::new(SystemClock), alarm);
    let mut app = App::new(controller);
    app.config_path = Some(config_path);
    app.config_doc = doc;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut force_draw = true;
    loop {
        // Blinking bars depend on the wall clock, not on state changes.
        if app.controller.take_redraw() || app.controller.any_blinking() || force_draw {
            terminal.draw(|frame| render::render(frame, app))?;
            force_draw = false;
        }

        let timeout = app
            .controller
            .next_due_in()
            .map_or(IDLE_POLL, |d| d.min(IDLE_POLL));
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                    force_draw = true;
                }
                Event::Paste(text) => {
                    input::handle_paste(app, &text);
                    force_draw = true;
                }
                Event::Resize(..) => force_draw = true,
                _ => {}
            }
        }

        app.controller.run_due();
        app.clamp_cursors();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
