// Math utilities and helper functions

/// Linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Frame-rate independent blend factor for exponential smoothing.
///
/// `rate` is in 1/s; the result is capped at 1 so a long frame lands exactly
/// on the target instead of overshooting it.
pub fn smoothing_factor(dt: f32, rate: f32) -> f32 {
    (dt * rate).min(1.0)
}

/// Move `current` toward `target` by an exponential smoothing step
pub fn damp(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    lerp(current, target, smoothing_factor(dt, rate))
}

/// Move `current` toward `target` by at most `max_delta`
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if current < target {
        (current + max_delta).min(target)
    } else {
        (current - max_delta).max(target)
    }
}

/// Check if two f32 values are approximately equal
#[allow(dead_code)]
pub fn approx_equal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
    }

    #[test]
    fn test_smoothing_factor_caps_at_one() {
        assert_eq!(smoothing_factor(0.5, 8.0), 1.0);
        assert!(approx_equal(smoothing_factor(1.0 / 60.0, 6.0), 0.1, 1e-6));
        assert_eq!(smoothing_factor(0.0, 8.0), 0.0);
    }

    #[test]
    fn test_damp_never_overshoots() {
        let mut value = 0.0;
        for _ in 0..200 {
            let next = damp(value, 1.0, 8.0, 1.0 / 60.0);
            assert!(next >= value);
            assert!(next <= 1.0);
            value = next;
        }
        assert!(approx_equal(value, 1.0, 1e-4));

        // A huge dt snaps onto the target
        assert_eq!(damp(0.25, -1.0, 8.0, 10.0), -1.0);
    }

    #[test]
    fn test_move_towards() {
        assert_eq!(move_towards(0.0, 1.0, 0.25), 0.25);
        assert_eq!(move_towards(0.9, 1.0, 0.25), 1.0);
        assert_eq!(move_towards(1.0, 0.0, 0.25), 0.75);
        assert_eq!(move_towards(0.1, 0.0, 0.25), 0.0);
    }

    #[test]
    fn test_approx_equal() {
        assert!(approx_equal(1.0, 1.00001, 0.0001));
        assert!(!approx_equal(1.0, 1.1, 0.01));
    }
}
