use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::model::{Category, LogRecord, TimerConfig};

use super::clock;

/// Registry key of a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The three self-rescheduling loops a timer runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopKind {
    /// Countdown redraw while running
    Tick,
    /// Color flip while blinking
    Blink,
    /// Alarm sound while blinking
    Alarm,
}

/// Cancellation handle carried by every scheduled loop iteration. An
/// iteration whose token is no longer the timer's current one is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopToken(u64);

/// A scheduled loop iteration for one timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Job {
    pub timer: TimerId,
    pub kind: LoopKind,
    pub token: LoopToken,
}

impl Job {
    pub fn event(self) -> TimerEvent {
        match self.kind {
            LoopKind::Tick => TimerEvent::Tick(self.token),
            LoopKind::Blink => TimerEvent::Blink(self.token),
            LoopKind::Alarm => TimerEvent::Alarm(self.token),
        }
    }
}

/// Input to the timer state machine: user actions and loop iterations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    Start,
    Pause,
    Restart,
    EditLabel(String),
    /// New remaining time and duration in seconds; negative clamps to 0
    EditRemaining(i64),
    /// Label committed with Enter: also resets and starts the countdown
    EditLabelAndRestart(String),
    /// Stop blinking and ringing but keep the expired timer on screen
    Silence,
    MarkDone,
    Cancel,
    Tick(LoopToken),
    Blink(LoopToken),
    Alarm(LoopToken),
}

/// Output of the timer state machine, applied by the controller
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Redraw,
    Schedule {
        after: Duration,
        kind: LoopKind,
        token: LoopToken,
    },
    AppendLog(LogRecord),
    /// Ask the presentation layer to show the "timer expired" popup
    Notify,
    PlayAlarm,
    /// Terminal transition. Emitted exactly once per timer.
    Closed { done: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Expired,
    Closed,
}

/// Loop periods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intervals {
    pub tick: Duration,
    pub blink: Duration,
    pub alarm: Duration,
}

impl Intervals {
    pub fn from_config(config: &TimerConfig) -> Self {
        Intervals {
            tick: Duration::from_millis(config.tick_ms.max(1)),
            blink: Duration::from_millis(config.blink_ms.max(1)),
            alarm: Duration::from_millis(config.alarm_ms.max(1)),
        }
    }
}

impl Default for Intervals {
    fn default() -> Self {
        Self::from_config(&TimerConfig::default())
    }
}

/// Whether a blinking bar shows its color at `now`. Depends only on the
/// timestamp, so every blinking bar flips in phase.
pub fn blink_on(now: DateTime<Local>, interval: Duration) -> bool {
    let step = (interval.as_millis() as i64).max(1);
    now.timestamp_millis().div_euclid(step) % 2 == 0
}

/// One countdown
#[derive(Debug, Clone)]
pub struct Timer {
    id: TimerId,
    label: String,
    category: Category,
    duration: Duration,
    remaining: Duration,
    running: bool,
    blink: bool,
    finished: bool,
    closed: bool,
    started: bool,
    /// Valid only while running
    end_at: Option<DateTime<Local>>,
    tick_loop: Option<LoopToken>,
    /// Shared by the blink and alarm loops
    blink_loop: Option<LoopToken>,
    last_token: u64,
    intervals: Intervals,
}

impl Timer {
    pub fn new(
        id: TimerId,
        label: impl Into<String>,
        duration: Duration,
        category: Category,
        intervals: Intervals,
    ) -> Self {
        Timer {
            id,
            label: label.into(),
            category,
            duration,
            remaining: duration,
            running: false,
            blink: false,
            finished: false,
            closed: false,
            started: false,
            end_at: None,
            tick_loop: None,
            blink_loop: None,
            last_token: 0,
            intervals,
        }
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Remaining time as of the last tick or edit
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_blinking(&self) -> bool {
        self.blink
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn end_at(&self) -> Option<DateTime<Local>> {
        self.end_at
    }

    pub fn intervals(&self) -> Intervals {
        self.intervals
    }

    pub fn state(&self) -> TimerState {
        if self.closed {
            TimerState::Closed
        } else if self.running {
            TimerState::Running
        } else if self.finished {
            TimerState::Expired
        } else if !self.started {
            TimerState::Idle
        } else {
            TimerState::Paused
        }
    }

    /// Filled part of the bar: `1 - remaining/duration`, 0 for a zero duration
    pub fn fraction(&self) -> f64 {
        if self.duration.is_zero() {
            return 0.0;
        }
        let ratio = self.remaining.as_secs_f64() / self.duration.as_secs_f64();
        (1.0 - ratio).clamp(0.0, 1.0)
    }

    /// False during the "off" half of a blink cycle
    pub fn shows_color(&self, now: DateTime<Local>) -> bool {
        !self.blink || blink_on(now, self.intervals.blink)
    }

    /// Apply one event and return the side effects to perform.
    /// A closed timer ignores everything.
    pub fn handle(&mut self, event: TimerEvent, now: DateTime<Local>) -> Vec<Effect> {
        let mut fx = Vec::new();
        if self.closed {
            return fx;
        }
        match event {
            TimerEvent::Start => self.start(now, &mut fx),
            TimerEvent::Pause => self.pause(now, &mut fx),
            TimerEvent::Restart => {
                self.pause(now, &mut fx);
                self.remaining = self.duration;
                self.start(now, &mut fx);
            }
            TimerEvent::EditLabel(text) => {
                self.label = text;
                fx.push(Effect::Redraw);
            }
            TimerEvent::EditRemaining(secs) => self.edit_remaining(secs, now, &mut fx),
            TimerEvent::EditLabelAndRestart(text) => {
                self.label = text;
                self.remaining = self.duration;
                self.end_at = Some(clock::add(now, self.remaining));
                self.running = true;
                self.started = true;
                self.finished = false;
                self.blink = false;
                self.blink_loop = None;
                // Supersedes any tick loop already in flight.
                self.tick_loop = Some(self.issue());
                self.tick(now, &mut fx);
            }
            TimerEvent::Silence => {
                if self.blink {
                    self.blink = false;
                    self.blink_loop = None;
                    fx.push(Effect::Redraw);
                }
            }
            TimerEvent::MarkDone => self.close(true, &mut fx),
            TimerEvent::Cancel => self.close(false, &mut fx),
            TimerEvent::Tick(token) => {
                if self.running && self.tick_loop == Some(token) {
                    self.tick(now, &mut fx);
                }
            }
            TimerEvent::Blink(token) => {
                if self.blink && self.blink_loop == Some(token) {
                    fx.push(Effect::Redraw);
                    fx.push(self.schedule(LoopKind::Blink, token));
                }
            }
            TimerEvent::Alarm(token) => {
                if self.blink && self.blink_loop == Some(token) {
                    fx.push(Effect::PlayAlarm);
                    fx.push(self.schedule(LoopKind::Alarm, token));
                }
            }
        }
        fx
    }

    fn start(&mut self, now: DateTime<Local>, fx: &mut Vec<Effect>) {
        if self.running {
            return;
        }
        self.running = true;
        self.started = true;
        self.blink = false;
        self.finished = false;
        self.blink_loop = None;
        self.end_at = Some(clock::add(now, self.remaining));
        self.tick_loop = Some(self.issue());
        self.tick(now, fx);
    }

    fn pause(&mut self, now: DateTime<Local>, fx: &mut Vec<Effect>) {
        if self.running
            && let Some(end) = self.end_at
        {
            self.remaining = clock::until(now, end);
        }
        self.running = false;
        self.blink = false;
        self.end_at = None;
        self.tick_loop = None;
        self.blink_loop = None;
        fx.push(Effect::Redraw);
    }

    fn edit_remaining(&mut self, secs: i64, now: DateTime<Local>, fx: &mut Vec<Effect>) {
        let secs = Duration::from_secs(secs.max(0) as u64);
        self.remaining = secs;
        self.duration = secs;
        if self.running {
            self.end_at = Some(clock::add(now, self.remaining));
        }
        fx.push(Effect::Redraw);
    }

    fn tick(&mut self, now: DateTime<Local>, fx: &mut Vec<Effect>) {
        let Some(end) = self.end_at else {
            return;
        };
        self.remaining = clock::until(now, end);
        fx.push(Effect::Redraw);
        if !self.remaining.is_zero() {
            if let Some(token) = self.tick_loop {
                fx.push(self.schedule(LoopKind::Tick, token));
            }
        } else if !self.finished {
            self.expire(now, fx);
        }
    }

    fn expire(&mut self, now: DateTime<Local>, fx: &mut Vec<Effect>) {
        self.finished = true;
        self.blink = true;
        self.running = false;
        self.end_at = None;
        self.tick_loop = None;
        let token = self.issue();
        self.blink_loop = Some(token);

        // First blink and alarm iterations run right away.
        fx.push(self.schedule(LoopKind::Blink, token));
        fx.push(Effect::PlayAlarm);
        fx.push(self.schedule(LoopKind::Alarm, token));
        fx.push(Effect::AppendLog(LogRecord {
            timestamp: now,
            duration: self.duration,
            label: self.label.clone(),
            category: self.category,
        }));
        fx.push(Effect::Notify);
    }

    fn close(&mut self, done: bool, fx: &mut Vec<Effect>) {
        self.closed = true;
        self.running = false;
        self.blink = false;
        self.end_at = None;
        self.tick_loop = None;
        self.blink_loop = None;
        fx.push(Effect::Closed { done });
    }

    fn schedule(&self, kind: LoopKind, token: LoopToken) -> Effect {
        let after = match kind {
            LoopKind::Tick => self.intervals.tick,
            LoopKind::Blink => self.intervals.blink,
            LoopKind::Alarm => self.intervals.alarm,
        };
        Effect::Schedule { after, kind, token }
    }

    fn issue(&mut self) -> LoopToken {
        self.last_token += 1;
        LoopToken(self.last_token)
    }
}
