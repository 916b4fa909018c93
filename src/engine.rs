use std::time::{Duration, Instant};

use tracing::warn;

/// Drives the displayed value toward the most recent target.
///
/// Three states: idle (current == target), animating (current != target with
/// animation on), immediate (animation off; every update snaps). All mutation
/// happens through [`Animator::set_target`] and [`Animator::tick`], from the
/// event-loop thread.
#[derive(Debug)]
pub(crate) struct Animator {
    min: f64,
    max: f64,
    animate: bool,
    duration: Duration,
    current: f64,
    target: f64,
    anim_from: f64,
    anim_start: Option<Instant>,
    displayed: f64,
}

impl Animator {
    pub(crate) fn new(min: f64, max: f64, animate: bool, duration: Duration) -> Self {
        Self {
            min,
            max,
            animate,
            duration,
            current: min,
            target: min,
            anim_from: min,
            anim_start: None,
            displayed: min,
        }
    }

    /// Set a new target value, clamped to the configured range. Out-of-range
    /// input is defined behavior: it clamps with a warning, never an error.
    pub(crate) fn set_target(&mut self, value: f64) {
        if !value.is_finite() {
            warn!(value, "ignoring non-finite update value");
            return;
        }
        let clamped = value.clamp(self.min, self.max);
        if clamped != value {
            warn!(
                value,
                clamped,
                min = self.min,
                max = self.max,
                "update value outside range, clamping"
            );
        }
        if self.animate {
            // Restart the interpolation clock from wherever we are now; the
            // first tick after this latches the new start time.
            self.anim_from = self.current;
            self.anim_start = None;
            self.target = clamped;
        } else {
            self.current = clamped;
            self.target = clamped;
            self.displayed = clamped;
        }
    }

    pub(crate) fn is_animating(&self) -> bool {
        self.animate && self.current != self.target
    }

    /// Advance the animation. Returns the value to render this frame, floored
    /// for display, or `None` once converged (no render needed).
    pub(crate) fn tick(&mut self, now: Instant) -> Option<f64> {
        if self.current == self.target {
            return None;
        }
        let start = *self.anim_start.get_or_insert(now);
        let elapsed = now.saturating_duration_since(start);
        let frac = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        let raw = self.anim_from + (self.target - self.anim_from) * frac;
        self.current = if self.target >= self.anim_from {
            raw.min(self.target)
        } else {
            raw.max(self.target)
        };
        self.displayed = self.current.floor();
        Some(self.displayed)
    }

    /// Last rendered value; used to repaint without advancing (e.g. resize).
    pub(crate) fn displayed(&self) -> f64 {
        self.displayed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animator(animate: bool) -> Animator {
        Animator::new(0.0, 100.0, animate, Duration::from_millis(1000))
    }

    #[test]
    fn update_clamps_above_max() {
        let mut anim = animator(false);
        anim.set_target(150.0);
        assert_eq!(anim.displayed(), 100.0);
    }

    #[test]
    fn update_clamps_below_min() {
        let mut anim = animator(false);
        anim.set_target(-20.0);
        assert_eq!(anim.displayed(), 0.0);
    }

    #[test]
    fn non_finite_update_is_ignored() {
        let mut anim = animator(false);
        anim.set_target(42.0);
        anim.set_target(f64::NAN);
        assert_eq!(anim.displayed(), 42.0);
        anim.set_target(f64::INFINITY);
        assert_eq!(anim.displayed(), 42.0);
    }

    #[test]
    fn immediate_mode_snaps_without_interpolation() {
        let mut anim = animator(false);
        anim.set_target(75.0);
        assert_eq!(anim.displayed(), 75.0);
        assert!(!anim.is_animating());
        assert_eq!(anim.tick(Instant::now()), None);
    }

    #[test]
    fn repeated_update_is_idempotent() {
        let mut anim = animator(false);
        anim.set_target(42.0);
        anim.set_target(42.0);
        assert_eq!(anim.displayed(), 42.0);

        let mut anim = animator(true);
        anim.set_target(42.0);
        let t0 = Instant::now();
        anim.tick(t0);
        anim.tick(t0 + Duration::from_millis(1000));
        assert!(!anim.is_animating());
        anim.set_target(42.0);
        assert!(!anim.is_animating());
        assert_eq!(anim.displayed(), 42.0);
    }

    #[test]
    fn animation_is_linear_in_elapsed_time() {
        let mut anim = animator(true);
        anim.set_target(100.0);
        let t0 = Instant::now();
        assert_eq!(anim.tick(t0), Some(0.0));
        assert_eq!(anim.tick(t0 + Duration::from_millis(500)), Some(50.0));
        assert_eq!(anim.tick(t0 + Duration::from_millis(1000)), Some(100.0));
        assert!(!anim.is_animating());
        assert_eq!(anim.tick(t0 + Duration::from_millis(1100)), None);
    }

    #[test]
    fn animation_converges_monotonically_without_overshoot() {
        let mut anim = animator(true);
        anim.set_target(80.0);
        let t0 = Instant::now();
        let mut last = f64::MIN;
        for ms in (0..=1500u64).step_by(100) {
            if let Some(v) = anim.tick(t0 + Duration::from_millis(ms)) {
                assert!(v >= last, "value moved backwards: {last} -> {v}");
                assert!(v <= 80.0, "overshot target: {v}");
                last = v;
            }
        }
        assert_eq!(anim.displayed(), 80.0);
        assert!(!anim.is_animating());
    }

    #[test]
    fn decreasing_animation_floors_and_converges() {
        let mut anim = animator(true);
        anim.set_target(100.0);
        let t0 = Instant::now();
        anim.tick(t0);
        anim.tick(t0 + Duration::from_millis(1000));
        assert_eq!(anim.displayed(), 100.0);

        anim.set_target(25.0);
        let t1 = t0 + Duration::from_millis(2000);
        assert_eq!(anim.tick(t1), Some(100.0));
        assert_eq!(anim.tick(t1 + Duration::from_millis(500)), Some(62.0));
        assert_eq!(anim.tick(t1 + Duration::from_millis(1000)), Some(25.0));
        assert!(!anim.is_animating());
    }

    #[test]
    fn retarget_restarts_the_clock_from_current_value() {
        let mut anim = animator(true);
        anim.set_target(100.0);
        let t0 = Instant::now();
        anim.tick(t0);
        anim.tick(t0 + Duration::from_millis(500));
        assert_eq!(anim.displayed(), 50.0);

        anim.set_target(0.0);
        let t1 = t0 + Duration::from_millis(600);
        assert_eq!(anim.tick(t1), Some(50.0));
        assert_eq!(anim.tick(t1 + Duration::from_millis(500)), Some(25.0));
        assert_eq!(anim.tick(t1 + Duration::from_millis(1000)), Some(0.0));
    }

    #[test]
    fn fractional_target_terminates() {
        let mut anim = animator(true);
        anim.set_target(75.5);
        let t0 = Instant::now();
        anim.tick(t0);
        assert_eq!(anim.tick(t0 + Duration::from_millis(1000)), Some(75.0));
        assert!(!anim.is_animating());
        assert_eq!(anim.tick(t0 + Duration::from_millis(1100)), None);
    }
}
