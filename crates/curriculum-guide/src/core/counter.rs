//! Credit counter animation
//!
//! A counter counts up from zero to the number originally printed in the
//! element, over a fixed wall-clock duration. The animation is a small state
//! machine advanced by [`CounterAnimation::tick`] with an injected timestamp,
//! so it runs the same under `requestAnimationFrame` and under a test clock.

use std::sync::OnceLock;

use regex::Regex;

/// Matches the first integer in a text, accepting `,` thousands separators.
fn integer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        #[allow(clippy::expect_used)]
        Regex::new(r"\d{1,3}(?:,\d{3})+|\d+").expect("integer pattern is valid")
    })
}

/// Extracts the first integer in `text`
///
/// `"1,234명"` yields `1234`, `"총 192학점"` yields `192`. Text without digits,
/// or with a number too large for `u64`, yields `None`.
#[must_use]
pub fn extract_leading_integer(text: &str) -> Option<u64> {
    let found = integer_pattern().find(text)?;
    let digits: String = found.as_str().chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Formats `value` with `,` between groups of three digits
#[must_use]
pub fn format_grouped(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Lifecycle of a single counter run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterPhase {
    /// Created, no tick delivered yet
    Pending,
    /// At least one tick delivered, progress below 1
    Running,
    /// Progress reached 1; no further ticks are accepted
    Done,
}

/// Output of one animation tick
#[derive(Debug, Clone, PartialEq)]
pub struct CounterFrame {
    /// Clamped progress in `[0, 1]`
    pub progress: f64,
    /// Displayed value
    pub value: u64,
    /// `value` formatted for display
    pub text: String,
    /// Whether this was the final tick
    pub finished: bool,
}

/// Count-up animation from 0 to `target`
#[derive(Debug, Clone, PartialEq)]
pub struct CounterAnimation {
    target: u64,
    duration_ms: f64,
    started_at: Option<f64>,
    phase: CounterPhase,
}

impl CounterAnimation {
    /// Creates an animation; the clock origin is taken from the first tick
    #[must_use]
    pub fn new(target: u64, duration_ms: f64) -> Self {
        Self {
            target,
            duration_ms,
            started_at: None,
            phase: CounterPhase::Pending,
        }
    }

    /// Creates an animation for the first integer in `text`, if any
    #[must_use]
    pub fn from_text(text: &str, duration_ms: f64) -> Option<Self> {
        extract_leading_integer(text).map(|target| Self::new(target, duration_ms))
    }

    /// Final value
    #[must_use]
    pub const fn target(&self) -> u64 {
        self.target
    }

    /// Duration in milliseconds
    #[must_use]
    pub const fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Timestamp of the first tick
    #[must_use]
    pub const fn started_at(&self) -> Option<f64> {
        self.started_at
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> CounterPhase {
        self.phase
    }

    /// Whether the final value has been produced
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.phase == CounterPhase::Done
    }

    /// Progress at `now` without advancing the state
    #[must_use]
    pub fn progress_at(&self, now: f64) -> f64 {
        let Some(start) = self.started_at else {
            return 0.0;
        };
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now - start) / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Advances the animation to `now`
    ///
    /// Returns `None` once the animation is done; the caller should stop
    /// scheduling frames at the first frame with `finished == true`.
    pub fn tick(&mut self, now: f64) -> Option<CounterFrame> {
        if self.is_done() {
            return None;
        }
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
        let progress = self.progress_at(now);
        let value = if progress >= 1.0 {
            self.target
        } else {
            ((progress * self.target as f64).floor() as u64).min(self.target)
        };
        let finished = progress >= 1.0;
        self.phase = if finished {
            CounterPhase::Done
        } else {
            CounterPhase::Running
        };
        Some(CounterFrame {
            progress,
            value,
            text: format_grouped(value),
            finished,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_number() {
        assert_eq!(extract_leading_integer("192"), Some(192));
        assert_eq!(extract_leading_integer("총 174학점"), Some(174));
    }

    #[test]
    fn test_extract_grouped_number() {
        assert_eq!(extract_leading_integer("1,234명"), Some(1234));
        assert_eq!(extract_leading_integer("12,345,678"), Some(12_345_678));
    }

    #[test]
    fn test_extract_takes_first_number() {
        assert_eq!(extract_leading_integer("34 of 51"), Some(34));
    }

    #[test]
    fn test_extract_trailing_comma_not_grouped() {
        assert_eq!(extract_leading_integer("12,34"), Some(12));
    }

    #[test]
    fn test_extract_no_digits() {
        assert_eq!(extract_leading_integer("학점"), None);
        assert_eq!(extract_leading_integer(""), None);
    }

    #[test]
    fn test_extract_overflow_is_none() {
        assert_eq!(extract_leading_integer("99999999999999999999999"), None);
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(0), "0");
        assert_eq!(format_grouped(999), "999");
        assert_eq!(format_grouped(1000), "1,000");
        assert_eq!(format_grouped(1234), "1,234");
        assert_eq!(format_grouped(1_234_567), "1,234,567");
    }

    #[test]
    fn test_first_tick_sets_origin() {
        let mut anim = CounterAnimation::new(100, 1500.0);
        assert_eq!(anim.phase(), CounterPhase::Pending);
        let frame = anim.tick(40.0).unwrap();
        assert_eq!(anim.started_at(), Some(40.0));
        assert_eq!(frame.value, 0);
        assert_eq!(frame.text, "0");
        assert_eq!(anim.phase(), CounterPhase::Running);
    }

    #[test]
    fn test_midpoint_value() {
        let mut anim = CounterAnimation::new(1234, 1500.0);
        anim.tick(0.0);
        let frame = anim.tick(750.0).unwrap();
        assert_eq!(frame.value, 617);
        assert!(!frame.finished);
    }

    #[test]
    fn test_completes_at_duration() {
        let mut anim = CounterAnimation::new(1234, 1500.0);
        anim.tick(0.0);
        let frame = anim.tick(1500.0).unwrap();
        assert!(frame.finished);
        assert_eq!(frame.text, "1,234");
        assert!(anim.is_done());
        assert!(anim.tick(1600.0).is_none());
    }

    #[test]
    fn test_late_tick_clamps() {
        let mut anim = CounterAnimation::new(50, 1500.0);
        anim.tick(0.0);
        let frame = anim.tick(10_000.0).unwrap();
        assert_eq!(frame.progress, 1.0);
        assert_eq!(frame.value, 50);
    }

    #[test]
    fn test_clock_going_backwards_clamps_to_zero() {
        let mut anim = CounterAnimation::new(50, 1500.0);
        anim.tick(100.0);
        let frame = anim.tick(50.0).unwrap();
        assert_eq!(frame.progress, 0.0);
        assert_eq!(frame.value, 0);
    }

    #[test]
    fn test_zero_target_ends_at_zero() {
        let mut anim = CounterAnimation::new(0, 1500.0);
        let first = anim.tick(0.0).unwrap();
        assert_eq!(first.text, "0");
        assert!(!first.finished);
        let last = anim.tick(1500.0).unwrap();
        assert_eq!(last.text, "0");
        assert!(last.finished);
        assert!(anim.tick(1501.0).is_none());
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let mut anim = CounterAnimation::new(7, 0.0);
        let frame = anim.tick(5.0).unwrap();
        assert!(frame.finished);
        assert_eq!(frame.value, 7);
    }

    #[test]
    fn test_from_text() {
        let anim = CounterAnimation::from_text("1,234명", 1500.0).unwrap();
        assert_eq!(anim.target(), 1234);
        assert_eq!(anim.duration_ms(), 1500.0);
        assert!(CounterAnimation::from_text("없음", 1500.0).is_none());
    }

    #[test]
    fn test_progress_before_first_tick() {
        let anim = CounterAnimation::new(10, 100.0);
        assert_eq!(anim.progress_at(1_000.0), 0.0);
    }
}
