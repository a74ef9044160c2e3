use chrono::{DateTime, Local};

use super::log::TIMESTAMP_FORMAT;

/// Marker for what happened to a todo line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMark {
    Open,
    /// A timer was started for this line
    Started,
    /// A timer for this line was marked done
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoLine {
    pub text: String,
    pub mark: LineMark,
}

/// Free-text todo input plus the loaded list timers are started from
#[derive(Debug, Clone, Default)]
pub struct TodoList {
    /// Raw input as typed (or preloaded from a file)
    pub input: String,
    pub lines: Vec<TodoLine>,
}

impl TodoList {
    pub fn with_input(input: impl Into<String>) -> Self {
        TodoList {
            input: input.into(),
            lines: Vec::new(),
        }
    }

    /// Replace the list with the non-blank lines of the input, trimmed.
    pub fn load(&mut self) {
        self.lines = self
            .input
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| TodoLine {
                text: l.to_string(),
                mark: LineMark::Open,
            })
            .collect();
    }

    pub fn get(&self, index: usize) -> Option<&TodoLine> {
        self.lines.get(index)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn mark_started(&mut self, index: usize) {
        if let Some(line) = self.lines.get_mut(index)
            && line.mark == LineMark::Open
        {
            line.mark = LineMark::Started;
        }
    }

    /// Append ` [timestamp]` to the line and mark it done.
    /// Returns false when the line no longer exists (list was reloaded shorter).
    pub fn annotate_done(&mut self, index: usize, at: DateTime<Local>) -> bool {
        match self.lines.get_mut(index) {
            Some(line) => {
                line.text
                    .push_str(&format!(" [{}]", at.format(TIMESTAMP_FORMAT)));
                line.mark = LineMark::Done;
                true
            }
            None => false,
        }
    }
}
