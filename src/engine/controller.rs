use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::model::{AppConfig, Category, CompletionLog, TodoList};

use super::alarm::Alarm;
use super::clock::Clock;
use super::scheduler::Scheduler;
use super::timer::{Effect, Intervals, Job, Timer, TimerEvent, TimerId};

/// Why a timer was not created. The UI swallows these; they are traced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimerError {
    #[error("limit of {0} concurrent timers reached")]
    LimitReached(usize),
    #[error("duration must be positive, got {0}")]
    InvalidDuration(i64),
    #[error("no todo line at index {0}")]
    NoSuchLine(usize),
}

/// A live timer and the todo line it was started from
#[derive(Debug, Clone)]
pub struct Entry {
    pub timer: Timer,
    pub line: usize,
}

/// Owns the timer registry, the scheduler, the todo list and the log.
/// Everything runs on the UI thread.
pub struct Controller {
    config: AppConfig,
    intervals: Intervals,
    timers: BTreeMap<TimerId, Entry>,
    next_id: u64,
    scheduler: Scheduler<Job>,
    pub todos: TodoList,
    log: CompletionLog,
    /// Expired timers waiting for their popup, oldest first
    notifications: VecDeque<TimerId>,
    clock: Box<dyn Clock>,
    alarm: Box<dyn Alarm>,
    dirty: bool,
}

impl Controller {
    pub fn new(
        config: AppConfig,
        todos: TodoList,
        clock: Box<dyn Clock>,
        alarm: Box<dyn Alarm>,
    ) -> Self {
        let intervals = Intervals::from_config(&config.timers);
        Controller {
            config,
            intervals,
            timers: BTreeMap::new(),
            next_id: 1,
            scheduler: Scheduler::new(),
            todos,
            log: CompletionLog::default(),
            notifications: VecDeque::new(),
            clock,
            alarm,
            dirty: true,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Category defaults and UI settings may change at runtime; timer
    /// intervals and the concurrency bound are fixed at startup.
    pub fn config_mut(&mut self) -> &mut AppConfig {
        self.dirty = true;
        &mut self.config
    }

    pub fn now(&self) -> DateTime<Local> {
        self.clock.now()
    }

    pub fn log(&self) -> &CompletionLog {
        &self.log
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.timers.len() >= self.config.timers.max_concurrent
    }

    /// Live timers in creation order
    pub fn timers(&self) -> impl Iterator<Item = &Entry> {
        self.timers.values()
    }

    pub fn timer_ids(&self) -> Vec<TimerId> {
        self.timers.keys().copied().collect()
    }

    pub fn get(&self, id: TimerId) -> Option<&Entry> {
        self.timers.get(&id)
    }

    /// Duration prefilled in the "how long?" prompt
    pub fn default_secs(&self, category: Category) -> u64 {
        self.config.default_secs(category)
    }

    /// Start a countdown for a todo line.
    pub fn create_timer(
        &mut self,
        line: usize,
        category: Category,
        requested_secs: i64,
    ) -> Result<TimerId, TimerError> {
        let max = self.config.timers.max_concurrent;
        if self.timers.len() >= max {
            tracing::debug!(max, "timer rejected: limit reached");
            return Err(TimerError::LimitReached(max));
        }
        if requested_secs <= 0 {
            tracing::debug!(requested_secs, "timer rejected: bad duration");
            return Err(TimerError::InvalidDuration(requested_secs));
        }
        let label = match self.todos.get(line) {
            Some(l) => l.text.clone(),
            None => {
                tracing::debug!(line, "timer rejected: no such line");
                return Err(TimerError::NoSuchLine(line));
            }
        };

        let id = TimerId(self.next_id);
        self.next_id += 1;
        let timer = Timer::new(
            id,
            label,
            Duration::from_secs(requested_secs as u64),
            category,
            self.intervals,
        );
        tracing::info!(%id, line, %category, secs = requested_secs, "timer created");
        self.timers.insert(id, Entry { timer, line });
        self.todos.mark_started(line);
        self.dispatch(id, TimerEvent::Start);
        Ok(id)
    }

    /// Feed a user action to a timer. Returns false for unknown ids.
    pub fn dispatch(&mut self, id: TimerId, event: TimerEvent) -> bool {
        let now = self.clock.now();
        self.dispatch_at(id, event, now)
    }

    fn dispatch_at(&mut self, id: TimerId, event: TimerEvent, now: DateTime<Local>) -> bool {
        let Some(entry) = self.timers.get_mut(&id) else {
            return false;
        };
        let effects = entry.timer.handle(event, now);
        self.apply(id, effects, now);
        true
    }

    /// Run every scheduler job that is due. Returns how many ran.
    pub fn run_due(&mut self) -> usize {
        let now = self.clock.now();
        let jobs = self.scheduler.pop_due(now);
        let count = jobs.len();
        for job in jobs {
            self.dispatch_at(job.timer, job.event(), now);
        }
        count
    }

    /// How long the event loop may sleep before the next job is due
    pub fn next_due_in(&self) -> Option<Duration> {
        self.scheduler.next_due_in(self.clock.now())
    }

    pub fn pending_jobs(&self) -> usize {
        self.scheduler.len()
    }

    /// Completion callback: the timer reached Done or Cancel.
    pub fn on_timer_complete(&mut self, id: TimerId, done: bool) {
        let Some(entry) = self.timers.remove(&id) else {
            return;
        };
        self.scheduler.cancel_where(|job| job.timer == id);
        self.notifications.retain(|n| *n != id);
        self.dirty = true;
        tracing::info!(%id, done, label = entry.timer.label(), "timer closed");
        if done {
            let now = self.clock.now();
            self.todos.annotate_done(entry.line, now);
        }
    }

    /// Front of the notification queue, skipping timers that are gone or
    /// were restarted since they expired.
    pub fn pending_notification(&mut self) -> Option<TimerId> {
        while let Some(&id) = self.notifications.front() {
            let live = self
                .timers
                .get(&id)
                .is_some_and(|e| e.timer.is_finished());
            if live {
                return Some(id);
            }
            self.notifications.pop_front();
        }
        None
    }

    /// Drop the front notification after the popup was answered
    pub fn dismiss_notification(&mut self) {
        self.notifications.pop_front();
        self.dirty = true;
    }

    /// True once after any change that needs a redraw
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Any timer blinking; the UI redraws every frame while this holds
    pub fn any_blinking(&self) -> bool {
        self.timers.values().any(|e| e.timer.is_blinking())
    }

    fn apply(&mut self, id: TimerId, effects: Vec<Effect>, now: DateTime<Local>) {
        for effect in effects {
            match effect {
                Effect::Redraw => self.dirty = true,
                Effect::Schedule { after, kind, token } => {
                    self.scheduler.schedule(
                        now,
                        after,
                        Job {
                            timer: id,
                            kind,
                            token,
                        },
                    );
                }
                Effect::AppendLog(record) => {
                    tracing::info!(%id, label = %record.label, "timer expired");
                    self.log.append(record);
                }
                Effect::Notify => self.notifications.push_back(id),
                Effect::PlayAlarm => self.alarm.ring(),
                Effect::Closed { done } => self.on_timer_complete(id, done),
            }
        }
    }
}

/// Parse a seconds field from a prompt or inline edit. Non-numeric input
/// gives None and the edit is dropped.
pub fn parse_seconds(input: &str) -> Option<i64> {
    input.trim().parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::alarm::CountingAlarm;
    use crate::engine::clock::ManualClock;
    use crate::engine::timer::TimerState;
    use crate::model::LineMark;
    use chrono::TimeZone;

    fn setup(lines: &str) -> (Controller, ManualClock, CountingAlarm) {
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
        (controller, clock, alarm)
    }

    fn step(c: &mut Controller, clock: &ManualClock, ms: u64, steps: usize) {
        for _ in 0..steps {
            clock.advance(Duration::from_millis(ms));
            c.run_due();
        }
    }

    #[test]
    fn create_starts_timer_and_marks_line() {
        let (mut c, _clock, _) = setup("write report\nreview PR");
        let id = c.create_timer(1, Category::Blue, 60).unwrap();
        let entry = c.get(id).unwrap();
        assert_eq!(entry.line, 1);
        assert_eq!(entry.timer.label(), "review PR");
        assert_eq!(entry.timer.state(), TimerState::Running);
        assert_eq!(c.todos.lines[1].mark, LineMark::Started);
        assert_eq!(c.pending_jobs(), 1);
    }

    #[test]
    fn rejects_eleventh_timer() {
        let (mut c, _clock, _) = setup("task");
        for _ in 0..10 {
            c.create_timer(0, Category::Red, 100).unwrap();
        }
        assert!(c.is_full());
        assert_eq!(
            c.create_timer(0, Category::Red, 100),
            Err(TimerError::LimitReached(10))
        );
        assert_eq!(c.len(), 10);
    }

    #[test]
    fn rejects_non_positive_duration() {
        let (mut c, _clock, _) = setup("task");
        assert_eq!(
            c.create_timer(0, Category::Red, 0),
            Err(TimerError::InvalidDuration(0))
        );
        assert_eq!(
            c.create_timer(0, Category::Red, -3),
            Err(TimerError::InvalidDuration(-3))
        );
        assert!(c.is_empty());
        assert_eq!(c.todos.lines[0].mark, LineMark::Open);
    }

    #[test]
    fn rejects_missing_line() {
        let (mut c, _clock, _) = setup("task");
        assert_eq!(
            c.create_timer(5, Category::Red, 10),
            Err(TimerError::NoSuchLine(5))
        );
    }

    #[test]
    fn same_line_may_have_several_timers() {
        let (mut c, _clock, _) = setup("task");
        let a = c.create_timer(0, Category::Red, 10).unwrap();
        let b = c.create_timer(0, Category::Blue, 20).unwrap();
        assert_ne!(a, b);
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn mark_done_removes_and_annotates_once() {
        let (mut c, _clock, _) = setup("write report");
        let id = c.create_timer(0, Category::Red, 60).unwrap();
        assert!(c.dispatch(id, TimerEvent::MarkDone));
        assert!(c.get(id).is_none());
        assert_eq!(c.todos.lines[0].text, "write report [2025-01-01 12:00:00]");
        assert_eq!(c.todos.lines[0].mark, LineMark::Done);
        assert_eq!(c.pending_jobs(), 0);

        assert!(!c.dispatch(id, TimerEvent::MarkDone));
        assert_eq!(c.todos.lines[0].text.matches('[').count(), 1);
    }

    #[test]
    fn cancel_removes_without_annotation() {
        let (mut c, _clock, _) = setup("write report");
        let id = c.create_timer(0, Category::Red, 60).unwrap();
        c.dispatch(id, TimerEvent::Cancel);
        assert!(c.get(id).is_none());
        assert_eq!(c.todos.lines[0].text, "write report");
        assert_eq!(c.todos.lines[0].mark, LineMark::Started);
    }

    #[test]
    fn expiry_logs_once_notifies_and_rings() {
        let (mut c, clock, alarm) = setup("task");
        let id = c.create_timer(0, Category::Purple, 2).unwrap();
        step(&mut c, &clock, 100, 20);

        let entry = c.get(id).unwrap();
        assert_eq!(entry.timer.state(), TimerState::Expired);
        assert_eq!(c.log().len(), 1);
        assert_eq!(c.pending_notification(), Some(id));
        assert_eq!(alarm.count(), 1);

        // Alarm repeats every second while blinking; the log does not grow.
        step(&mut c, &clock, 100, 30);
        assert_eq!(alarm.count(), 4);
        assert_eq!(c.log().len(), 1);
    }

    #[test]
    fn silence_stops_alarm_and_clears_notification_on_dismiss() {
        let (mut c, clock, alarm) = setup("task");
        let id = c.create_timer(0, Category::Purple, 1).unwrap();
        step(&mut c, &clock, 100, 10);
        assert_eq!(alarm.count(), 1);

        c.dispatch(id, TimerEvent::Silence);
        c.dismiss_notification();
        step(&mut c, &clock, 100, 30);
        assert_eq!(alarm.count(), 1);
        assert_eq!(c.pending_notification(), None);
        assert!(!c.any_blinking());
        assert!(c.get(id).is_some());
    }

    #[test]
    fn restarted_timer_drops_stale_notification() {
        let (mut c, clock, _) = setup("task");
        let id = c.create_timer(0, Category::Red, 1).unwrap();
        step(&mut c, &clock, 100, 10);
        c.dispatch(id, TimerEvent::Restart);
        assert_eq!(c.pending_notification(), None);
    }

    #[test]
    fn changing_default_does_not_touch_running_timer() {
        let (mut c, _clock, _) = setup("task");
        let secs = c.default_secs(Category::Red) as i64;
        let id = c.create_timer(0, Category::Red, secs).unwrap();
        c.config_mut().set_default_secs(Category::Red, 5);
        assert_eq!(c.default_secs(Category::Red), 5);
        assert_eq!(c.get(id).unwrap().timer.duration(), Duration::from_secs(200));
    }

    #[test]
    fn done_after_reload_ignores_missing_line() {
        let (mut c, _clock, _) = setup("a\nb\nc");
        let id = c.create_timer(2, Category::Red, 10).unwrap();
        c.todos.input = "only one".into();
        c.todos.load();
        c.dispatch(id, TimerEvent::MarkDone);
        assert!(c.get(id).is_none());
        assert_eq!(c.todos.lines[0].text, "only one");
    }

    #[test]
    fn take_redraw_resets() {
        let (mut c, _clock, _) = setup("task");
        assert!(c.take_redraw());
        assert!(!c.take_redraw());
        c.create_timer(0, Category::Red, 10).unwrap();
        assert!(c.take_redraw());
    }

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_seconds(" 90 "), Some(90));
        assert_eq!(parse_seconds("-4"), Some(-4));
        assert_eq!(parse_seconds("1m"), None);
        assert_eq!(parse_seconds(""), None);
    }
}
