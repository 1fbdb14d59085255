//! Scalar and angle helpers shared by the tail and the visuals.

use std::f32::consts::{PI, TAU};
use std::time::Duration;

use glam::Vec2;

#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Wraps an angle into `[-PI, PI)`.
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Angle of the ray from `from` to `to`, in radians.
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Moves `current` toward `target` by at most `step` radians along the shorter arc,
/// snapping once within a single step.
pub fn rotate_toward(current: f32, target: f32, step: f32) -> f32 {
    if current == target {
        return current;
    }
    let delta = (target - current).abs();
    if delta <= step || delta >= TAU - step {
        return target;
    }
    let mut target = target;
    if delta > PI {
        if target < current {
            target += TAU;
        } else {
            target -= TAU;
        }
    }
    if target > current {
        current + step
    } else {
        current - step
    }
}

/// Rescales a per-frame smoothing factor tuned at `reference_hz` to an arbitrary `dt`.
/// Without a reference rate the factor is applied once per tick unchanged.
pub fn frame_alpha(alpha: f32, dt: Duration, reference_hz: Option<f32>) -> f32 {
    match reference_hz {
        None => alpha,
        Some(hz) => {
            let frames = dt.as_secs_f32() * hz;
            1.0 - (1.0 - alpha).powf(frames)
        }
    }
}

/// Same as [`frame_alpha`] for linear quantities such as an angular step.
pub fn frame_step(step: f32, dt: Duration, reference_hz: Option<f32>) -> f32 {
    match reference_hz {
        None => step,
        Some(hz) => step * dt.as_secs_f32() * hz,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_angle_stays_in_half_open_range() {
        for raw in [-10.0_f32, -PI, 0.0, PI, 3.5, 10.0] {
            let w = wrap_angle(raw);
            assert!((-PI..PI).contains(&w), "{raw} wrapped to {w}");
        }
        assert!((wrap_angle(TAU + 0.25) - 0.25).abs() < 1e-5);
    }

    #[test]
    fn rotate_toward_takes_the_short_way_across_pi() {
        // 3.0 -> -3.0 is 0.28 rad through +PI, not 6.0 rad the long way.
        let next = rotate_toward(3.0, -3.0, 0.1);
        assert!((next - 3.1).abs() < 1e-5);
        assert!((rotate_toward(-3.0, 3.0, 0.1) + 3.1).abs() < 1e-5);
    }

    #[test]
    fn rotate_toward_snaps_within_one_step() {
        assert_eq!(rotate_toward(0.0, 0.05, 0.1), 0.05);
        assert_eq!(rotate_toward(1.0, 1.0, 0.1), 1.0);
        assert!((rotate_toward(0.0, 1.0, 0.1) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn frame_alpha_matches_reference_rate() {
        let dt = Duration::from_secs_f64(1.0 / 60.0);
        assert!((frame_alpha(0.1, dt, Some(60.0)) - 0.1).abs() < 1e-4);
        // Two reference frames in one tick compound the factor.
        let double = frame_alpha(0.1, dt * 2, Some(60.0));
        assert!((double - 0.19).abs() < 1e-4);
        assert_eq!(frame_alpha(0.1, Duration::from_secs(3), None), 0.1);
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 4.0, 1.0), 4.0);
        assert_eq!(lerp(1.0, -1.0, 0.5), 0.0);
    }
}
