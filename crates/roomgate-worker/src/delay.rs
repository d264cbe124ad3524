//! Delay policies for dwell, backoff and start stagger.

use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;

/// Source of the three delays a worker run needs.
pub trait DelayPolicy: Send + Sync + 'static {
    /// How long to hold a granted slot.
    fn dwell(&self) -> Duration;

    /// How long to wait after a failed entry attempt.
    fn backoff(&self) -> Duration;

    /// Gap between starting two consecutive workers.
    fn stagger(&self) -> Duration;
}

/// Uniformly random delays, in seconds.
#[derive(Debug, Clone)]
pub struct RandomDelays {
    /// Dwell range. Default 2–5 s.
    pub dwell: RangeInclusive<f64>,
    /// Backoff range. Default 1–3 s.
    pub backoff: RangeInclusive<f64>,
    /// Stagger range. Default 0.1–0.5 s.
    pub stagger: RangeInclusive<f64>,
}

impl Default for RandomDelays {
    fn default() -> Self {
        Self {
            dwell: 2.0..=5.0,
            backoff: 1.0..=3.0,
            stagger: 0.1..=0.5,
        }
    }
}

/// Draws from `range`. Negative draws clamp to zero.
fn sample(range: &RangeInclusive<f64>) -> Duration {
    let secs = if range.start() >= range.end() {
        *range.start()
    } else {
        rand::rng().random_range(range.clone())
    };
    Duration::from_secs_f64(secs.max(0.0))
}

impl DelayPolicy for RandomDelays {
    fn dwell(&self) -> Duration {
        sample(&self.dwell)
    }

    fn backoff(&self) -> Duration {
        sample(&self.backoff)
    }

    fn stagger(&self) -> Duration {
        sample(&self.stagger)
    }
}

/// Constant delays, for tests and deterministic runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedDelays {
    /// Dwell.
    pub dwell: Duration,
    /// Backoff.
    pub backoff: Duration,
    /// Stagger.
    pub stagger: Duration,
}

impl FixedDelays {
    /// All three delays zero.
    pub fn zero() -> Self {
        Self::default()
    }
}

impl DelayPolicy for FixedDelays {
    fn dwell(&self) -> Duration {
        self.dwell
    }

    fn backoff(&self) -> Duration {
        self.backoff
    }

    fn stagger(&self) -> Duration {
        self.stagger
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_delays_stay_in_range() {
        let delays = RandomDelays::default();
        for _ in 0..200 {
            let d = delays.dwell().as_secs_f64();
            assert!((2.0..=5.0).contains(&d), "dwell {d}");
            let b = delays.backoff().as_secs_f64();
            assert!((1.0..=3.0).contains(&b), "backoff {b}");
            let s = delays.stagger().as_secs_f64();
            assert!((0.1..=0.5).contains(&s), "stagger {s}");
        }
    }

    #[test]
    fn test_degenerate_range_returns_start() {
        let delays = RandomDelays {
            dwell: 1.5..=1.5,
            ..RandomDelays::default()
        };
        assert_eq!(delays.dwell(), Duration::from_millis(1500));
    }

    #[test]
    fn test_negative_range_clamps_to_zero() {
        let delays = RandomDelays {
            dwell: -1.0..=1.0,
            backoff: -3.0..=-1.0,
            stagger: -0.5..=-0.5,
        };
        for _ in 0..200 {
            assert!(delays.dwell() <= Duration::from_secs(1));
            assert_eq!(delays.backoff(), Duration::ZERO);
            assert_eq!(delays.stagger(), Duration::ZERO);
        }
    }

    #[test]
    fn test_fixed_delays() {
        let delays = FixedDelays {
            dwell: Duration::from_secs(1),
            ..FixedDelays::zero()
        };
        assert_eq!(delays.dwell(), Duration::from_secs(1));
        assert_eq!(delays.backoff(), Duration::ZERO);
        assert_eq!(delays.stagger(), Duration::ZERO);
    }
}
