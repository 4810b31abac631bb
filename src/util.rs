//! Small angle and interpolation helpers shared by the gravity, steering, and
//! landing code.

/// Inverse linear interpolation of `value` between `a` and `b`, clamped to
/// `[0, 1]`. Works with `a > b` (decreasing ranges). Returns 0 for a
/// degenerate range (`a == b`).
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if (b - a).abs() <= f32::EPSILON {
        return 0.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

/// Shortest signed angular difference `to - from` in degrees, wrapped to
/// `(-180, 180]`.
pub fn delta_angle_deg(from: f32, to: f32) -> f32 {
    let mut delta = (to - from).rem_euclid(360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

/// Lerp `from` toward `to` by factor `t`, taking the shortest angular path.
/// Angles in degrees.
pub fn lerp_angle_deg(from: f32, to: f32, t: f32) -> f32 {
    from + delta_angle_deg(from, to) * t
}

/// Normalize an angle in degrees to `[0, 360)`.
pub fn normalize_deg(angle: f32) -> f32 {
    angle.rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_lerp_clamps_and_handles_decreasing_range() {
        assert_eq!(inverse_lerp(0.0, 10.0, 5.0), 0.5);
        assert_eq!(inverse_lerp(0.0, 10.0, -5.0), 0.0);
        assert_eq!(inverse_lerp(0.0, 10.0, 15.0), 1.0);
        // Decreasing range, as used by the lunar radius gradient (18 → 10).
        assert_eq!(inverse_lerp(18.0, 10.0, 18.0), 0.0);
        assert_eq!(inverse_lerp(18.0, 10.0, 10.0), 1.0);
        assert!((inverse_lerp(18.0, 10.0, 14.0) - 0.5).abs() < 1e-6);
        // Degenerate range must not divide by zero.
        assert_eq!(inverse_lerp(3.0, 3.0, 3.0), 0.0);
    }

    #[test]
    fn delta_angle_takes_shortest_path() {
        assert_eq!(delta_angle_deg(0.0, 90.0), 90.0);
        assert_eq!(delta_angle_deg(350.0, 10.0), 20.0);
        assert_eq!(delta_angle_deg(10.0, 350.0), -20.0);
        assert_eq!(delta_angle_deg(0.0, 180.0), 180.0);
    }

    #[test]
    fn lerp_angle_crosses_the_wrap_point() {
        let mid = lerp_angle_deg(350.0, 10.0, 0.5);
        assert!((normalize_deg(mid) - 0.0).abs() < 1e-4);
    }

    #[test]
    fn normalize_wraps_negative_angles() {
        assert_eq!(normalize_deg(-90.0), 270.0);
        assert_eq!(normalize_deg(720.0), 0.0);
    }
}
