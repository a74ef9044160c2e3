use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::model::AlarmConfig;

/// Side effect fired on every alarm-loop iteration of an expired timer.
/// Implementations must tolerate failure silently.
pub trait Alarm {
    fn ring(&mut self);
}

/// Terminal bell plus an external sound player
#[derive(Debug, Clone)]
pub struct SoundAlarm {
    bell: bool,
    sound_file: Option<PathBuf>,
}

impl SoundAlarm {
    pub fn from_config(config: &AlarmConfig) -> Self {
        SoundAlarm {
            bell: config.bell,
            sound_file: config.sound_file.as_ref().map(PathBuf::from),
        }
    }
}

impl Alarm for SoundAlarm {
    fn ring(&mut self) {
        if self.bell {
            let mut stdout = io::stdout();
            let _ = stdout.write_all(b"\x07");
            let _ = stdout.flush();
        }
        if let Some(file) = &self.sound_file
            && file.exists()
        {
            let file = file.clone();
            // Detached: the player never touches timer state.
            std::thread::spawn(move || play(&file));
        }
    }
}

/// Players tried in order; the first one that exits successfully wins.
#[cfg(not(windows))]
fn player_commands(file: &Path) -> Vec<Command> {
    ["paplay", "aplay", "afplay"]
        .into_iter()
        .map(|player| {
            let mut cmd = Command::new(player);
            cmd.arg(file);
            cmd
        })
        .collect()
}

/// PowerShell's SoundPlayer on Windows.
#[cfg(windows)]
fn player_commands(file: &Path) -> Vec<Command> {
    let quoted = file.display().to_string().replace('\'', "''");
    let script = format!("(New-Object Media.SoundPlayer '{}').PlaySync()", quoted);
    let mut cmd = Command::new("powershell");
    cmd.args(["-NoProfile", "-NonInteractive", "-Command", script.as_str()]);
    vec![cmd]
}

fn play(file: &Path) {
    for mut cmd in player_commands(file) {
        let player = cmd.get_program().to_string_lossy().into_owned();
        let status = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match status {
            Ok(s) if s.success() => return,
            Ok(s) => tracing::debug!(%player, code = ?s.code(), "alarm player failed"),
            Err(e) => tracing::debug!(%player, error = %e, "alarm player unavailable"),
        }
    }
}

/// Does nothing. Used when sound is disabled entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAlarm;

impl Alarm for SilentAlarm {
    fn ring(&mut self) {}
}

/// Counts rings; shared between clones so tests can observe a boxed alarm.
#[derive(Debug, Clone, Default)]
pub struct CountingAlarm {
    rings: std::rc::Rc<std::cell::Cell<usize>>,
}

impl CountingAlarm {
    pub fn count(&self) -> usize {
        self.rings.get()
    }
}

impl Alarm for CountingAlarm {
    fn ring(&mut self) {
        self.rings.set(self.rings.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counting_alarm_shares_count() {
        let alarm = CountingAlarm::default();
        let mut boxed: Box<dyn Alarm> = Box::new(alarm.clone());
        boxed.ring();
        boxed.ring();
        assert_eq!(alarm.count(), 2);
    }

    #[test]
    fn missing_sound_file_is_ignored() {
        let mut alarm = SoundAlarm {
            bell: false,
            sound_file: Some(PathBuf::from("/definitely/not/here.wav")),
        };
        alarm.ring();
    }

    #[cfg(not(windows))]
    #[test]
    fn players_tried_in_order() {
        let cmds = player_commands(Path::new("alarm.wav"));
        let programs: Vec<String> = cmds
            .iter()
            .map(|c| c.get_program().to_string_lossy().into_owned())
            .collect();
        assert_eq!(programs, vec!["paplay", "aplay", "afplay"]);
        for cmd in &cmds {
            let args: Vec<_> = cmd.get_args().collect();
            assert_eq!(args, vec![std::ffi::OsStr::new("alarm.wav")]);
        }
    }

    #[cfg(windows)]
    #[test]
    fn windows_plays_through_powershell() {
        let cmds = player_commands(Path::new("it's.wav"));
        assert_eq!(cmds.len(), 1);
        assert_eq!(cmds[0].get_program(), "powershell");
        let script = cmds[0].get_args().last().unwrap().to_string_lossy().into_owned();
        assert!(script.contains("Media.SoundPlayer 'it''s.wav'"));
    }

    #[test]
    fn from_config_respects_bell_flag() {
        let config = AlarmConfig {
            bell: false,
            sound_file: None,
        };
        let alarm = SoundAlarm::from_config(&config);
        assert!(!alarm.bell);
        assert!(alarm.sound_file.is_none());
    }
}
