//! Presentation delays between sequence phases

use rand::Rng;
use std::time::Duration;

/// Largest accepted slow-down factor
pub const MAX_SCALE: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub think_min: Duration,
    pub think_max: Duration,
    pub respond: Duration,
    pub cooldown: Duration,
    pub analyze: Duration,
    pub plan_review: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            think_min: Duration::from_millis(1500),
            think_max: Duration::from_millis(2500),
            respond: Duration::from_millis(1200),
            cooldown: Duration::from_millis(800),
            analyze: Duration::from_millis(1000),
            plan_review: Duration::from_millis(1500),
        }
    }
}

impl Pacing {
    /// No delays at all
    pub fn instant() -> Self {
        Self {
            think_min: Duration::ZERO,
            think_max: Duration::ZERO,
            respond: Duration::ZERO,
            cooldown: Duration::ZERO,
            analyze: Duration::ZERO,
            plan_review: Duration::ZERO,
        }
    }

    /// Scale every delay, e.g. `0.5` for a faster demo.
    /// The factor is clamped to `0.0..=MAX_SCALE`; NaN means no delay.
    pub fn scaled(self, factor: f64) -> Self {
        let factor = if factor.is_nan() {
            0.0
        } else {
            factor.clamp(0.0, MAX_SCALE)
        };
        Self {
            think_min: self.think_min.mul_f64(factor),
            think_max: self.think_max.mul_f64(factor),
            respond: self.respond.mul_f64(factor),
            cooldown: self.cooldown.mul_f64(factor),
            analyze: self.analyze.mul_f64(factor),
            plan_review: self.plan_review.mul_f64(factor),
        }
    }

    pub fn think(&self) -> Duration {
        if self.think_max <= self.think_min {
            return self.think_min;
        }
        let ms = rand::thread_rng()
            .gen_range(self.think_min.as_millis() as u64..=self.think_max.as_millis() as u64);
        Duration::from_millis(ms)
    }
}

pub(crate) async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
