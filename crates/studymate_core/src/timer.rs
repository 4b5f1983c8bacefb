use crate::error::AppError;
use crate::notify::{Notice, Notifier};
use crate::ticker::Ticker;
use std::ops::ControlFlow;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimerState {
    /// No duration configured.
    #[default]
    Idle,
    Configured,
    Running,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Completed,
}

/// Single-duration study countdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountdownTimer {
    state: TimerState,
    total: u64,
    remaining: u64,
}

impl CountdownTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining
    }

    pub fn total_secs(&self) -> u64 {
        self.total
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// True once a duration has been configured and until the next reset.
    pub fn is_set(&self) -> bool {
        self.state != TimerState::Idle
    }

    pub fn configure(&mut self, hours: u64, minutes: u64, seconds: u64) -> Result<(), AppError> {
        if !matches!(self.state, TimerState::Idle | TimerState::Configured) {
            return Err(AppError::invalid_input(
                "reset the timer before setting a new duration",
            ));
        }

        let total = hours
            .checked_mul(3600)
            .and_then(|secs| secs.checked_add(minutes.checked_mul(60)?))
            .and_then(|secs| secs.checked_add(seconds))
            .ok_or_else(|| AppError::invalid_input("duration is too long"))?;
        if total == 0 {
            return Err(AppError::invalid_input("duration must be greater than zero"));
        }

        self.total = total;
        self.remaining = total;
        self.state = TimerState::Configured;
        Ok(())
    }

    /// Returns whether the timer is now running.
    pub fn start(&mut self) -> bool {
        if self.state == TimerState::Configured && self.remaining > 0 {
            self.state = TimerState::Running;
        }
        self.is_running()
    }

    pub fn stop(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Configured;
        }
    }

    /// Advances one elapsed second. Reaching zero yields
    /// [`TimerEvent::Completed`] once; later ticks are ignored.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if self.state != TimerState::Running {
            return None;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = TimerState::Completed;
            return Some(TimerEvent::Completed);
        }
        None
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Elapsed fraction in `0.0..=1.0`; zero when nothing is configured.
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.total - self.remaining) as f64 / self.total as f64
    }
}

/// `HH:MM:SS`, hours are not wrapped.
pub fn format_clock(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Parses `25m`, `1h30m`, `90s`, `1h 5s` or `HH:MM:SS` / `MM:SS` into
/// `(hours, minutes, seconds)`. Components are not normalized.
pub fn parse_duration(raw: &str) -> Result<(u64, u64, u64), AppError> {
    let trimmed = raw.trim().to_ascii_lowercase();
    let invalid =
        || AppError::invalid_input(format!("invalid duration '{trimmed}', use 25m, 1h30m, 90s or HH:MM:SS"));

    if trimmed.contains(':') {
        let parts = trimmed
            .split(':')
            .map(|part| part.trim().parse::<u64>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;
        return match parts.as_slice() {
            [hours, minutes, seconds] => Ok((*hours, *minutes, *seconds)),
            [minutes, seconds] => Ok((0, *minutes, *seconds)),
            _ => Err(invalid()),
        };
    }

    let (mut hours, mut minutes, mut seconds) = (0u64, 0u64, 0u64);
    let mut digits = String::new();
    for ch in trimmed.chars() {
        match ch {
            '0'..='9' => digits.push(ch),
            'h' | 'm' | 's' => {
                let value: u64 = digits.parse().map_err(|_| invalid())?;
                digits.clear();
                let slot = match ch {
                    'h' => &mut hours,
                    'm' => &mut minutes,
                    _ => &mut seconds,
                };
                *slot = slot.checked_add(value).ok_or_else(invalid)?;
            }
            ' ' => {}
            _ => return Err(invalid()),
        }
    }
    if !digits.is_empty() {
        // A bare number means minutes.
        let value = digits.parse::<u64>().map_err(|_| invalid())?;
        minutes = minutes.checked_add(value).ok_or_else(invalid)?;
    }

    Ok((hours, minutes, seconds))
}

pub const QUOTES: &[&str] = &[
    "Stay focused and never give up!",
    "Believe in yourself and all that you are.",
    "The harder you work for something, the greater you'll feel when you achieve it.",
    "Success is the sum of small efforts repeated day in and day out.",
    "Don't watch the clock; do what it does. Keep going.",
];

pub fn pick_quote(seed: u64) -> &'static str {
    QUOTES[(seed % QUOTES.len() as u64) as usize]
}

/// Starts `timer` and drives it from a [`Ticker`] until it completes or
/// `on_tick` breaks. Breaking stops the timer with its remaining time kept;
/// the ticker is released on every exit path.
pub fn run_countdown<F>(
    timer: &mut CountdownTimer,
    interval: Duration,
    notifier: &dyn Notifier,
    mut on_tick: F,
) -> Result<TimerState, AppError>
where
    F: FnMut(&CountdownTimer) -> ControlFlow<()>,
{
    if !timer.start() {
        return Err(AppError::invalid_input("timer has no duration to run"));
    }

    let ticker = Ticker::start(interval);
    loop {
        if let Err(err) = ticker.wait() {
            timer.stop();
            return Err(err);
        }

        let event = timer.tick();
        let flow = on_tick(timer);

        if event == Some(TimerEvent::Completed) {
            tracing::info!(total_secs = timer.total_secs(), "study timer finished");
            if let Err(err) = notifier.notify(&Notice::timer_finished()) {
                tracing::warn!(error = %err, "timer notification failed");
            }
            return Ok(timer.state());
        }

        if flow.is_break() {
            timer.stop();
            return Ok(timer.state());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CountdownTimer, QUOTES, TimerEvent, TimerState, format_clock, parse_duration, pick_quote,
        run_countdown,
    };
    use crate::error::AppError;
    use crate::notify::{Notice, Notifier};
    use std::cell::RefCell;
    use std::ops::ControlFlow;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingNotifier {
        notices: RefCell<Vec<Notice>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notice: &Notice) -> Result<(), AppError> {
            self.notices.borrow_mut().push(notice.clone());
            Ok(())
        }
    }

    #[test]
    fn configure_rejects_zero_duration() {
        let mut timer = CountdownTimer::new();
        let err = timer.configure(0, 0, 0).unwrap_err();

        assert_eq!(err.code(), "invalid_input");
        assert_eq!(timer.state(), TimerState::Idle);
        assert!(!timer.is_set());
    }

    #[test]
    fn configure_sums_components() {
        let mut timer = CountdownTimer::new();
        timer.configure(1, 2, 3).unwrap();

        assert_eq!(timer.total_secs(), 3723);
        assert_eq!(timer.remaining_secs(), 3723);
        assert_eq!(timer.state(), TimerState::Configured);
        assert!(timer.is_set());
    }

    #[test]
    fn five_seconds_complete_once() {
        let mut timer = CountdownTimer::new();
        timer.configure(0, 0, 5).unwrap();
        assert!(timer.start());

        let mut completions = 0;
        for _ in 0..5 {
            if timer.tick() == Some(TimerEvent::Completed) {
                completions += 1;
            }
        }
        assert_eq!(timer.remaining_secs(), 0);
        assert_eq!(timer.state(), TimerState::Completed);

        for _ in 0..3 {
            assert_eq!(timer.tick(), None);
        }
        assert_eq!(completions, 1);
        assert_eq!(timer.progress(), 1.0);
    }

    #[test]
    fn start_without_duration_is_noop() {
        let mut timer = CountdownTimer::new();
        assert!(!timer.start());
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.tick(), None);
    }

    #[test]
    fn stop_preserves_remaining_time() {
        let mut timer = CountdownTimer::new();
        timer.configure(0, 1, 0).unwrap();
        timer.start();
        timer.tick();
        timer.tick();
        timer.stop();

        assert_eq!(timer.state(), TimerState::Configured);
        assert_eq!(timer.remaining_secs(), 58);
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.remaining_secs(), 58);

        assert!(timer.start());
        timer.tick();
        assert_eq!(timer.remaining_secs(), 57);
    }

    #[test]
    fn configure_while_running_is_rejected() {
        let mut timer = CountdownTimer::new();
        timer.configure(0, 0, 10).unwrap();
        timer.start();
        assert!(timer.configure(0, 0, 20).is_err());
        assert_eq!(timer.total_secs(), 10);
    }

    #[test]
    fn reset_returns_to_idle_from_any_state() {
        let mut timer = CountdownTimer::new();
        timer.configure(0, 0, 1).unwrap();
        timer.start();
        timer.tick();
        assert_eq!(timer.state(), TimerState::Completed);

        timer.reset();
        assert_eq!(timer, CountdownTimer::new());
        assert_eq!(timer.progress(), 0.0);
        timer.configure(0, 0, 2).unwrap();
        assert_eq!(timer.state(), TimerState::Configured);
    }

    #[test]
    fn progress_tracks_elapsed_fraction() {
        let mut timer = CountdownTimer::new();
        assert_eq!(timer.progress(), 0.0);
        timer.configure(0, 0, 4).unwrap();
        timer.start();
        timer.tick();
        assert_eq!(timer.progress(), 0.25);
    }

    #[test]
    fn format_clock_pads_fields() {
        assert_eq!(format_clock(0), "00:00:00");
        assert_eq!(format_clock(3723), "01:02:03");
        assert_eq!(format_clock(360_000), "100:00:00");
    }

    #[test]
    fn parse_duration_accepts_units_and_clock() {
        assert_eq!(parse_duration("25m").unwrap(), (0, 25, 0));
        assert_eq!(parse_duration("1h30m").unwrap(), (1, 30, 0));
        assert_eq!(parse_duration("90s").unwrap(), (0, 0, 90));
        assert_eq!(parse_duration("1h 5s").unwrap(), (1, 0, 5));
        assert_eq!(parse_duration("15").unwrap(), (0, 15, 0));
        assert_eq!(parse_duration("01:02:03").unwrap(), (1, 2, 3));
        assert_eq!(parse_duration("05:00").unwrap(), (0, 5, 0));
        assert!(parse_duration("h").is_err());
        assert!(parse_duration("1x").is_err());
        assert!(parse_duration("1:2:3:4").is_err());
    }

    #[test]
    fn parse_duration_rejects_overflowing_units() {
        let err = parse_duration("18446744073709551615m 1m").unwrap_err();
        assert_eq!(err.code(), "invalid_input");
        assert!(parse_duration("18446744073709551615h1h").is_err());
        assert!(parse_duration("18446744073709551615m 1").is_err());
        assert_eq!(
            parse_duration("18446744073709551615s").unwrap(),
            (0, 0, u64::MAX)
        );
    }

    #[test]
    fn pick_quote_wraps_seed() {
        assert_eq!(pick_quote(0), QUOTES[0]);
        assert_eq!(pick_quote(QUOTES.len() as u64 + 1), QUOTES[1]);
    }

    #[test]
    fn run_countdown_completes_and_notifies_once() {
        let notifier = RecordingNotifier::default();
        let mut timer = CountdownTimer::new();
        timer.configure(0, 0, 3).unwrap();
        let mut seen = Vec::new();

        let state = run_countdown(&mut timer, Duration::from_millis(1), &notifier, |timer| {
            seen.push(timer.remaining_secs());
            ControlFlow::Continue(())
        })
        .unwrap();

        assert_eq!(state, TimerState::Completed);
        assert_eq!(seen, [2, 1, 0]);
        assert_eq!(notifier.notices.borrow().as_slice(), [Notice::timer_finished()]);
    }

    #[test]
    fn run_countdown_break_stops_and_keeps_remaining() {
        let notifier = RecordingNotifier::default();
        let mut timer = CountdownTimer::new();
        timer.configure(0, 0, 10).unwrap();

        let state = run_countdown(&mut timer, Duration::from_millis(1), &notifier, |_| {
            ControlFlow::Break(())
        })
        .unwrap();

        assert_eq!(state, TimerState::Configured);
        assert_eq!(timer.remaining_secs(), 9);
        assert!(notifier.notices.borrow().is_empty());
    }

    #[test]
    fn run_countdown_requires_configuration() {
        let notifier = RecordingNotifier::default();
        let mut timer = CountdownTimer::new();
        let err = run_countdown(&mut timer, Duration::from_millis(1), &notifier, |_| {
            ControlFlow::Continue(())
        })
        .unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }
}
