//! # Adaptive polling interval.
//!
//! [`AdaptivePollingStrategy`] picks how long to wait before the next status
//! request. Both bounds scale with the job's own estimate of its duration:
//! - `max = expected / 3.5`
//! - `base = expected / 30`
//!
//! Below [`StrategyConfig::transition_progress`] the wait grows as
//! `base × 2^attempt`, capped at `max`. At or above it the wait decays from
//! `max` toward `base` as progress approaches 100%:
//! `base + (max − base) × e^(−2.5 × factor)` with
//! `factor = (progress − transition) / (100 − transition)`.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use statuspoll::AdaptivePollingStrategy;
//!
//! let strategy = AdaptivePollingStrategy::default();
//! let expected = Duration::from_secs(90);
//!
//! // Backoff phase, first attempt: base interval (90s / 30).
//! assert_eq!(strategy.compute_interval(0, 0.0, expected), Duration::from_secs(3));
//!
//! // Backoff phase, attempt 1: doubled.
//! assert_eq!(strategy.compute_interval(1, 10.0, expected), Duration::from_secs(6));
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::status::snapshot::clamp_progress;

pub const DEFAULT_TRANSITION_PROGRESS: f64 = 60.0;

const MAX_INTERVAL_DIVISOR: f64 = 3.5;
const BASE_INTERVAL_DIVISOR: f64 = 30.0;
const DECAY_RATE: f64 = 2.5;

/// Immutable strategy configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Progress percentage at which backoff hands over to decay.
    pub transition_progress: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            transition_progress: DEFAULT_TRANSITION_PROGRESS,
        }
    }
}

/// Which regime governs a given progress value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Backoff,
    Decay,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Backoff => write!(f, "backoff"),
            Phase::Decay => write!(f, "decay"),
        }
    }
}

/// Floor and ceiling for the wait, derived from the expected job duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalBounds {
    pub base: Duration,
    pub max: Duration,
}

/// Backoff-then-decay interval selection. Stateless apart from its config.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AdaptivePollingStrategy {
    config: StrategyConfig,
}

impl AdaptivePollingStrategy {
    /// A transition outside `[0, 100]` is clamped; NaN falls back to the default.
    pub fn new(config: StrategyConfig) -> Self {
        let transition_progress = if config.transition_progress.is_nan() {
            DEFAULT_TRANSITION_PROGRESS
        } else {
            config.transition_progress.clamp(0.0, 100.0)
        };
        Self {
            config: StrategyConfig {
                transition_progress,
            },
        }
    }

    pub fn with_transition(transition_progress: f64) -> Self {
        Self::new(StrategyConfig {
            transition_progress,
        })
    }

    pub fn config(&self) -> StrategyConfig {
        self.config
    }

    pub fn phase(&self, progress: f64) -> Phase {
        if clamp_progress(progress) < self.config.transition_progress {
            Phase::Backoff
        } else {
            Phase::Decay
        }
    }

    pub fn bounds(&self, expected_time: Duration) -> IntervalBounds {
        let (base, max) = bounds_ms(expected_time);
        IntervalBounds {
            base: from_millis_f64(base),
            max: from_millis_f64(max),
        }
    }

    /// Computes the wait before the next poll.
    ///
    /// `attempt` is 0-based. `progress` is clamped to `[0, 100]`, so any input
    /// yields a wait within the bounds for `expected_time`.
    pub fn compute_interval(
        &self,
        attempt: u64,
        progress: f64,
        expected_time: Duration,
    ) -> Duration {
        let progress = clamp_progress(progress);
        let (base, max) = bounds_ms(expected_time);

        let wait = match self.phase(progress) {
            Phase::Backoff => {
                let exp = attempt.min(i32::MAX as u64) as i32;
                let grown = base * 2f64.powi(exp);
                if !grown.is_finite() || grown > max {
                    max
                } else {
                    grown
                }
            }
            Phase::Decay => {
                let factor = self.decay_factor(progress);
                let decayed = base + (max - base) * (-DECAY_RATE * factor).exp();
                decayed.max(base).min(max)
            }
        };

        from_millis_f64(wait)
    }

    // Normalised position inside the decay phase, in [0, 1].
    fn decay_factor(&self, progress: f64) -> f64 {
        let transition = self.config.transition_progress;
        if transition >= 100.0 {
            return 1.0;
        }
        ((progress - transition) / (100.0 - transition)).clamp(0.0, 1.0)
    }
}

fn bounds_ms(expected_time: Duration) -> (f64, f64) {
    let expected = expected_time.as_secs_f64() * 1000.0;
    (
        expected / BASE_INTERVAL_DIVISOR,
        expected / MAX_INTERVAL_DIVISOR,
    )
}

fn from_millis_f64(ms: f64) -> Duration {
    if !ms.is_finite() || ms <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPECTED: Duration = Duration::from_secs(90);

    fn ms(d: Duration) -> f64 {
        d.as_secs_f64() * 1000.0
    }

    #[test]
    fn default_transition_is_sixty() {
        let strategy = AdaptivePollingStrategy::default();
        assert_eq!(strategy.config().transition_progress, 60.0);
        assert_eq!(strategy.phase(59.9), Phase::Backoff);
        assert_eq!(strategy.phase(60.0), Phase::Decay);
    }

    #[test]
    fn bounds_scale_with_expected_time() {
        let strategy = AdaptivePollingStrategy::default();
        let bounds = strategy.bounds(EXPECTED);
        assert_eq!(bounds.base, Duration::from_secs(3));
        assert!((ms(bounds.max) - 25_714.2857).abs() < 0.01);
    }

    #[test]
    fn first_attempt_uses_base_interval() {
        let strategy = AdaptivePollingStrategy::default();
        assert_eq!(
            strategy.compute_interval(0, 0.0, EXPECTED),
            Duration::from_secs(3)
        );
    }

    #[test]
    fn backoff_doubles_until_capped() {
        let strategy = AdaptivePollingStrategy::default();
        assert_eq!(strategy.compute_interval(1, 0.0, EXPECTED), Duration::from_secs(6));
        assert_eq!(strategy.compute_interval(2, 0.0, EXPECTED), Duration::from_secs(12));
        assert_eq!(strategy.compute_interval(3, 0.0, EXPECTED), Duration::from_secs(24));

        let cap = strategy.bounds(EXPECTED).max;
        assert_eq!(strategy.compute_interval(4, 0.0, EXPECTED), cap);
        assert_eq!(strategy.compute_interval(u64::MAX, 0.0, EXPECTED), cap);
    }

    #[test]
    fn backoff_is_monotonic_and_bounded() {
        let strategy = AdaptivePollingStrategy::default();
        for expected_secs in [0u64, 1, 60, 90, 3600] {
            let expected = Duration::from_secs(expected_secs);
            let cap = strategy.bounds(expected).max;
            for progress in [0.0, 25.0, 59.0] {
                let mut previous = Duration::ZERO;
                for attempt in 0..64 {
                    let wait = strategy.compute_interval(attempt, progress, expected);
                    assert!(wait >= previous, "attempt {attempt}: {wait:?} < {previous:?}");
                    assert!(wait <= cap, "attempt {attempt}: {wait:?} > {cap:?}");
                    previous = wait;
                }
            }
        }
    }

    #[test]
    fn decay_at_eighty_percent() {
        let strategy = AdaptivePollingStrategy::default();
        let wait = ms(strategy.compute_interval(0, 80.0, EXPECTED));
        // 3000 + (25714.29 - 3000) * e^-1.25
        assert!((9_500.0..=9_515.0).contains(&wait), "got {wait}ms");
    }

    #[test]
    fn decay_is_non_increasing_and_bounded() {
        let strategy = AdaptivePollingStrategy::default();
        let bounds = strategy.bounds(EXPECTED);
        let mut previous = Duration::MAX;
        for step in 0..=400 {
            let progress = 60.0 + step as f64 * 0.1;
            let wait = strategy.compute_interval(7, progress, EXPECTED);
            assert!(wait <= previous, "progress {progress}: {wait:?} > {previous:?}");
            assert!(wait >= bounds.base && wait <= bounds.max);
            previous = wait;
        }
    }

    #[test]
    fn decay_ignores_attempt_count() {
        let strategy = AdaptivePollingStrategy::default();
        assert_eq!(
            strategy.compute_interval(0, 75.0, EXPECTED),
            strategy.compute_interval(30, 75.0, EXPECTED)
        );
    }

    #[test]
    fn full_progress_approaches_base() {
        let strategy = AdaptivePollingStrategy::default();
        let bounds = strategy.bounds(EXPECTED);
        let wait = ms(strategy.compute_interval(3, 100.0, EXPECTED));
        let base = ms(bounds.base);
        let span = ms(bounds.max) - base;
        // e^-2.5 of the span is all that remains above the floor.
        assert!(wait >= base);
        assert!(wait - base <= span * 0.0821 + 1.0, "got {wait}ms");
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let strategy = AdaptivePollingStrategy::with_transition(45.0);
        for (attempt, progress) in [(0, 0.0), (5, 44.9), (2, 45.0), (9, 99.5)] {
            assert_eq!(
                strategy.compute_interval(attempt, progress, EXPECTED),
                strategy.compute_interval(attempt, progress, EXPECTED)
            );
        }
    }

    #[test]
    fn zero_expected_time_is_a_tight_poll() {
        let strategy = AdaptivePollingStrategy::default();
        for (attempt, progress) in [(0, 0.0), (40, 10.0), (3, 60.0), (1, 100.0)] {
            assert_eq!(
                strategy.compute_interval(attempt, progress, Duration::ZERO),
                Duration::ZERO
            );
        }
    }

    #[test]
    fn transition_at_hundred_keeps_backoff_until_done() {
        let strategy = AdaptivePollingStrategy::with_transition(100.0);
        assert_eq!(strategy.phase(99.9), Phase::Backoff);
        assert_eq!(strategy.compute_interval(2, 99.9, EXPECTED), Duration::from_secs(12));
        // At 100% the factor is pinned to 1 rather than dividing by zero.
        let wait = strategy.compute_interval(2, 100.0, EXPECTED);
        assert!(wait >= strategy.bounds(EXPECTED).base);
        assert!(wait < Duration::from_secs(6));
    }

    #[test]
    fn transition_at_zero_decays_from_start() {
        let strategy = AdaptivePollingStrategy::with_transition(0.0);
        assert_eq!(strategy.phase(0.0), Phase::Decay);
        // factor 0: the exponential term is 1, so the wait starts at the ceiling.
        let wait = ms(strategy.compute_interval(0, 0.0, EXPECTED));
        let max = ms(strategy.bounds(EXPECTED).max);
        assert!((wait - max).abs() < 1.0, "got {wait}ms, max {max}ms");
    }

    #[test]
    fn out_of_range_inputs_are_clamped() {
        let strategy = AdaptivePollingStrategy::default();
        assert_eq!(
            strategy.compute_interval(0, -20.0, EXPECTED),
            strategy.compute_interval(0, 0.0, EXPECTED)
        );
        assert_eq!(
            strategy.compute_interval(0, 180.0, EXPECTED),
            strategy.compute_interval(0, 100.0, EXPECTED)
        );
        assert_eq!(
            strategy.compute_interval(0, f64::NAN, EXPECTED),
            strategy.compute_interval(0, 0.0, EXPECTED)
        );
    }

    #[test]
    fn out_of_range_transition_is_clamped() {
        assert_eq!(
            AdaptivePollingStrategy::with_transition(150.0).config().transition_progress,
            100.0
        );
        assert_eq!(
            AdaptivePollingStrategy::with_transition(-5.0).config().transition_progress,
            0.0
        );
        assert_eq!(
            AdaptivePollingStrategy::with_transition(f64::NAN).config().transition_progress,
            DEFAULT_TRANSITION_PROGRESS
        );
    }
}
