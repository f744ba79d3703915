//! Opacity fade animation

use std::time::{Duration, Instant};

use crate::overlay::FADING_DURATION;

/// Timed opacity interpolation between two values.
///
/// Replaces the toolkit-style property animation object: the widget owns at
/// most one of these and polls it each frame. Starting a new fade simply
/// replaces (drops) the previous one.
#[derive(Debug, Clone, Copy)]
pub struct FadeAnimation {
    started_at: Instant,
    duration: Duration,
    from: f32,
    to: f32,
}

impl FadeAnimation {
    pub fn new(now: Instant, from: f32, to: f32) -> Self {
        Self {
            started_at: now,
            duration: FADING_DURATION,
            from,
            to,
        }
    }

    /// Current interpolated value and whether the fade has completed.
    ///
    /// Linear over the fixed duration; at or past the end this returns
    /// exactly `to`.
    pub fn tick(&self, now: Instant) -> (f32, bool) {
        let elapsed = now.saturating_duration_since(self.started_at).as_secs_f32();
        let t = (elapsed / self.duration.as_secs_f32()).clamp(0.0, 1.0);
        (self.from + (self.to - self.from) * t, t >= 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_from_value() {
        let t0 = Instant::now();
        let fade = FadeAnimation::new(t0, 0.0, 1.0);
        let (value, complete) = fade.tick(t0);
        assert_eq!(value, 0.0);
        assert!(!complete);
    }

    #[test]
    fn test_midpoint_is_linear() {
        let t0 = Instant::now();
        let fade = FadeAnimation::new(t0, 0.0, 1.0);
        let (value, complete) = fade.tick(t0 + FADING_DURATION / 2);
        assert!((value - 0.5).abs() < 1e-6);
        assert!(!complete);
    }

    #[test]
    fn test_completes_exactly_at_target() {
        let t0 = Instant::now();
        let fade = FadeAnimation::new(t0, 0.25, 1.0);
        let (value, complete) = fade.tick(t0 + FADING_DURATION);
        assert_eq!(value, 1.0);
        assert!(complete);
    }

    #[test]
    fn test_clamps_past_end() {
        let t0 = Instant::now();
        let fade = FadeAnimation::new(t0, 0.8, 0.0);
        let (value, complete) = fade.tick(t0 + FADING_DURATION * 3);
        assert_eq!(value, 0.0);
        assert!(complete);
    }

    #[test]
    fn test_downward_fade_starts_from_current() {
        let t0 = Instant::now();
        let fade = FadeAnimation::new(t0, 0.8, 0.0);
        let (value, _) = fade.tick(t0 + FADING_DURATION / 2);
        assert!((value - 0.4).abs() < 1e-6);
    }
}
