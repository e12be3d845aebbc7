//! Pomodoro timer.
//!
//! The timer is a small state machine driven by the caller's clock: every
//! method that depends on time takes `now: Instant`, and the event loop
//! calls [`PomodoroTimer::tick`] about once a second while it runs.

use std::io::Write;
use std::time::{Duration, Instant};

use notify_rust::Notification;

use crate::config::{NotificationSound, TimerConfig};

/// Completed focus sessions between long breaks.
pub const SESSIONS_BEFORE_LONG_BREAK: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Focus,
    Break,
    LongBreak,
}

impl TimerState {
    pub fn label(&self) -> &'static str {
        match self {
            TimerState::Idle => "IDLE",
            TimerState::Focus => "FOCUS SESSION",
            TimerState::Break => "BREAK TIME",
            TimerState::LongBreak => "LONG BREAK",
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self, TimerState::Break | TimerState::LongBreak)
    }
}

/// What happened when a running session reached zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// A focus session finished; `next` is the break that follows (or
    /// `Idle` when breaks are not started automatically)
    FocusComplete { next: TimerState, long_break_due: bool },
    BreakComplete,
}

/// Durations and behavior taken from `[timer]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSettings {
    pub focus: Duration,
    pub short_break: Duration,
    pub long_break: Duration,
    pub auto_start_break: bool,
}

impl TimerSettings {
    pub fn from_config(config: &TimerConfig) -> Self {
        Self {
            focus: minutes(config.focus_duration),
            short_break: minutes(config.break_duration),
            long_break: minutes(config.long_break_duration),
            auto_start_break: config.auto_start_break,
        }
    }
}

// Non-positive values become one minute.
fn minutes(value: i64) -> Duration {
    Duration::from_secs((value.max(1) as u64).saturating_mul(60))
}

#[derive(Debug, Clone)]
pub struct PomodoroTimer {
    settings: TimerSettings,
    state: TimerState,
    started_at: Option<Instant>,
    duration: Duration,
    completed_focus: u32,
    long_break_pending: bool,
}

impl PomodoroTimer {
    pub fn new(settings: TimerSettings) -> Self {
        Self {
            settings,
            state: TimerState::Idle,
            started_at: None,
            duration: Duration::ZERO,
            completed_focus: 0,
            long_break_pending: false,
        }
    }

    /// Replace durations after a config reload. A running session keeps its length.
    pub fn set_settings(&mut self, settings: TimerSettings) {
        self.settings = settings;
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state != TimerState::Idle
    }

    /// Focus sessions finished since the program started.
    pub fn completed_focus(&self) -> u32 {
        self.completed_focus
    }

    /// Session length of the current state.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn start_focus(&mut self, now: Instant) {
        self.begin(TimerState::Focus, self.settings.focus, now);
    }

    /// Start a short break, or a long one if a long break is due.
    pub fn start_break(&mut self, now: Instant) {
        if self.long_break_pending {
            self.long_break_pending = false;
            self.begin(TimerState::LongBreak, self.settings.long_break, now);
        } else {
            self.begin(TimerState::Break, self.settings.short_break, now);
        }
    }

    pub fn stop(&mut self) {
        self.state = TimerState::Idle;
        self.started_at = None;
        self.duration = Duration::ZERO;
    }

    fn begin(&mut self, state: TimerState, duration: Duration, now: Instant) {
        tracing::debug!(state = state.label(), secs = duration.as_secs(), "Timer started");
        self.state = state;
        self.started_at = Some(now);
        self.duration = duration;
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(start) => now.saturating_duration_since(start).min(self.duration),
            None => Duration::ZERO,
        }
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.duration.saturating_sub(self.elapsed(now))
    }

    /// Elapsed fraction of the current session, 0.0 when idle.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 0.0;
        }
        self.elapsed(now).as_secs_f64() / self.duration.as_secs_f64()
    }

    /// Advance the state machine; returns an event when a session ends.
    pub fn tick(&mut self, now: Instant) -> Option<TimerEvent> {
        if !self.is_running() || !self.remaining(now).is_zero() {
            return None;
        }

        match self.state {
            TimerState::Focus => {
                self.completed_focus += 1;
                let long_break_due = self.completed_focus % SESSIONS_BEFORE_LONG_BREAK == 0;
                self.long_break_pending = long_break_due;
                if self.settings.auto_start_break {
                    self.start_break(now);
                } else {
                    self.stop();
                }
                Some(TimerEvent::FocusComplete {
                    next: self.state,
                    long_break_due,
                })
            }
            _ => {
                self.stop();
                Some(TimerEvent::BreakComplete)
            }
        }
    }
}

/// `MM:SS`; minutes are not wrapped into hours.
pub fn format_mmss(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Desktop notifications for finished sessions.
#[derive(Debug, Clone, Copy)]
pub struct Notifier {
    enabled: bool,
    sound: NotificationSound,
}

impl Notifier {
    pub fn from_config(config: &TimerConfig) -> Self {
        Self {
            enabled: config.notification_enabled,
            sound: config.notification_sound,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Title and body for an event.
    pub fn message(event: TimerEvent) -> (&'static str, &'static str) {
        match event {
            TimerEvent::FocusComplete {
                long_break_due: true,
                ..
            } => ("Long Break Time! 🌴", "Great work! Take a longer break."),
            TimerEvent::FocusComplete { .. } => ("Break Time! ☕", "Focus session complete."),
            TimerEvent::BreakComplete => ("Back to Work! 🎯", "Break is over."),
        }
    }

    pub fn notify(&self, event: TimerEvent) {
        if !self.enabled {
            return;
        }
        let (title, body) = Self::message(event);

        let mut notification = Notification::new();
        notification.summary(title).body(body).appname("devdash");
        if self.sound == NotificationSound::Chime {
            notification.sound_name("complete");
        }
        if let Err(e) = notification.show() {
            tracing::debug!(error = %e, "Desktop notification failed");
        }

        if self.sound == NotificationSound::Bell {
            let mut stdout = std::io::stdout();
            let _ = stdout.write_all(b"\x07");
            let _ = stdout.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(auto_start_break: bool) -> TimerSettings {
        TimerSettings {
            focus: Duration::from_secs(60),
            short_break: Duration::from_secs(10),
            long_break: Duration::from_secs(30),
            auto_start_break,
        }
    }

    #[test]
    fn test_settings_from_config() {
        let config = TimerConfig {
            focus_duration: 50,
            break_duration: 0,
            ..Default::default()
        };
        let settings = TimerSettings::from_config(&config);
        assert_eq!(settings.focus, Duration::from_secs(50 * 60));
        assert_eq!(settings.short_break, Duration::from_secs(60));
        assert_eq!(settings.long_break, Duration::from_secs(15 * 60));
    }

    #[test]
    fn test_huge_durations_saturate() {
        let config = TimerConfig {
            focus_duration: i64::MAX,
            ..Default::default()
        };
        let settings = TimerSettings::from_config(&config);
        assert_eq!(settings.focus, Duration::from_secs(u64::MAX));

        let mut timer = PomodoroTimer::new(settings);
        let now = Instant::now();
        timer.start_focus(now);
        assert_eq!(timer.tick(now + Duration::from_secs(60)), None);
        assert!(timer.progress(now + Duration::from_secs(60)) < 1e-6);
    }

    #[test]
    fn test_idle_timer() {
        let timer = PomodoroTimer::new(settings(false));
        let now = Instant::now();
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.remaining(now), Duration::ZERO);
        assert_eq!(timer.progress(now), 0.0);
    }

    #[test]
    fn test_focus_countdown() {
        let mut timer = PomodoroTimer::new(settings(false));
        let start = Instant::now();
        timer.start_focus(start);
        assert_eq!(timer.state(), TimerState::Focus);

        let later = start + Duration::from_secs(15);
        assert_eq!(timer.remaining(later), Duration::from_secs(45));
        assert!((timer.progress(later) - 0.25).abs() < 1e-9);
        assert_eq!(timer.tick(later), None);
    }

    #[test]
    fn test_focus_complete_goes_idle_without_auto_break() {
        let mut timer = PomodoroTimer::new(settings(false));
        let start = Instant::now();
        timer.start_focus(start);

        let event = timer.tick(start + Duration::from_secs(61));
        assert_eq!(
            event,
            Some(TimerEvent::FocusComplete {
                next: TimerState::Idle,
                long_break_due: false
            })
        );
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.completed_focus(), 1);
    }

    #[test]
    fn test_auto_start_break() {
        let mut timer = PomodoroTimer::new(settings(true));
        let start = Instant::now();
        timer.start_focus(start);
        let end = start + Duration::from_secs(60);
        timer.tick(end);
        assert_eq!(timer.state(), TimerState::Break);
        assert_eq!(timer.remaining(end), Duration::from_secs(10));

        assert_eq!(
            timer.tick(end + Duration::from_secs(10)),
            Some(TimerEvent::BreakComplete)
        );
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[test]
    fn test_every_fourth_focus_earns_long_break() {
        let mut timer = PomodoroTimer::new(settings(true));
        let mut now = Instant::now();
        let mut breaks = Vec::new();
        for _ in 0..4 {
            timer.start_focus(now);
            now += Duration::from_secs(60);
            timer.tick(now);
            breaks.push(timer.state());
            timer.stop();
        }
        assert_eq!(
            breaks,
            vec![
                TimerState::Break,
                TimerState::Break,
                TimerState::Break,
                TimerState::LongBreak
            ]
        );
    }

    #[test]
    fn test_long_break_taken_once() {
        let mut timer = PomodoroTimer::new(settings(false));
        let mut now = Instant::now();
        for _ in 0..4 {
            timer.start_focus(now);
            now += Duration::from_secs(60);
            timer.tick(now);
        }
        timer.start_break(now);
        assert_eq!(timer.state(), TimerState::LongBreak);
        timer.stop();
        timer.start_break(now);
        assert_eq!(timer.state(), TimerState::Break);
    }

    #[test]
    fn test_stop_resets() {
        let mut timer = PomodoroTimer::new(settings(false));
        let now = Instant::now();
        timer.start_break(now);
        assert!(timer.state().is_break());
        timer.stop();
        assert!(!timer.is_running());
        assert_eq!(timer.duration(), Duration::ZERO);
        assert_eq!(timer.tick(now + Duration::from_secs(100)), None);
    }

    #[test]
    fn test_format_mmss() {
        assert_eq!(format_mmss(Duration::from_secs(0)), "00:00");
        assert_eq!(format_mmss(Duration::from_secs(25 * 60)), "25:00");
        assert_eq!(format_mmss(Duration::from_secs(61)), "01:01");
        assert_eq!(format_mmss(Duration::from_secs(240 * 60)), "240:00");
    }

    #[test]
    fn test_notification_messages() {
        let (title, _) = Notifier::message(TimerEvent::FocusComplete {
            next: TimerState::Idle,
            long_break_due: true,
        });
        assert!(title.contains("Long Break"));
        let (title, _) = Notifier::message(TimerEvent::BreakComplete);
        assert!(title.contains("Back to Work"));
    }

    #[test]
    fn test_disabled_notifier_is_noop() {
        let notifier = Notifier::from_config(&TimerConfig::default());
        assert!(!notifier.enabled());
        notifier.notify(TimerEvent::BreakComplete);
    }
}
