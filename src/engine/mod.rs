//! Timer lifecycle: clock, alarm, scheduler, the per-timer state machine
//! and the controller that owns the registry.

pub mod alarm;
pub mod clock;
pub mod controller;
pub mod scheduler;
pub mod timer;

pub use alarm::{Alarm, CountingAlarm, SilentAlarm, SoundAlarm};
pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{Controller, Entry, TimerError, parse_seconds};
pub use scheduler::Scheduler;
pub use timer::{Effect, Intervals, Job, LoopKind, LoopToken, Timer, TimerEvent, TimerId, TimerState};
