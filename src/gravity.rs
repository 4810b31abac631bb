//! Blended gravity field: planetary base gravity, radial lunar gravity, and
//! an altitude zero-g band, combined into a single smoothed ambient vector.
//!
//! The emitted vector is written to `RapierConfiguration.gravity` once per
//! fixed tick; every simulated body feels the same field, sampled at the
//! craft's position.
//!
//! Blend policy: the lunar blend multiplicatively suppresses the zero-g blend
//! (`zero_t *= 1 - moon_t`). Inside the lunar sphere of influence the craft
//! is never weightless, no matter its altitude.

use crate::config::TuningConfig;
use crate::constants::GRAVITY_EPSILON_SQ;
use crate::craft::state::{Craft, HeadingControl};
use crate::util::inverse_lerp;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

// ── Resources ──────────────────────────────────────────────────────────────────

/// The ambient gravity state for the running level.
///
/// `current` is the exponentially-smoothed emitted vector; `moon_blend` and
/// `zero_blend` are the raw blend factors for this tick (after the lunar
/// suppression of the zero-g factor), exposed for space tuning and the HUD.
#[derive(Resource, Debug, Clone, Copy)]
pub struct GravityField {
    pub current: Vec2,
    pub moon_blend: f32,
    pub zero_blend: f32,
}

impl Default for GravityField {
    fn default() -> Self {
        Self {
            current: Vec2::new(
                crate::constants::BASE_GRAVITY_X,
                crate::constants::BASE_GRAVITY_Y,
            ),
            moon_blend: 0.0,
            zero_blend: 0.0,
        }
    }
}

impl GravityField {
    /// Unit vector pointing along the current down direction, or world down
    /// when the field is degenerate.
    pub fn down(&self) -> Vec2 {
        if self.current.length_squared() >= GRAVITY_EPSILON_SQ {
            self.current.normalize()
        } else {
            -Vec2::Y
        }
    }
}

/// Fixed world position of the moon centre for the running level.
#[derive(Resource, Debug, Clone, Copy)]
pub struct MoonAnchor(pub Vec2);

impl Default for MoonAnchor {
    fn default() -> Self {
        Self(Vec2::new(
            crate::constants::MOON_CENTER_X,
            crate::constants::MOON_CENTER_Y,
        ))
    }
}

// ── Field math ─────────────────────────────────────────────────────────────────

/// Lunar blend factor: 0 at/beyond `enter_radius`, 1 at/within `full_radius`.
pub fn moon_blend(pos: Vec2, moon_center: Vec2, enter_radius: f32, full_radius: f32) -> f32 {
    inverse_lerp(enter_radius, full_radius, pos.distance(moon_center))
}

/// Zero-g blend factor: 0 at/below `start_y`, 1 at/above `full_y`.
pub fn zero_g_blend(y: f32, start_y: f32, full_y: f32) -> f32 {
    inverse_lerp(start_y, full_y, y)
}

/// Compute the unsmoothed target field at `pos`.
///
/// Returns `(target, moon_t, zero_t)` where `zero_t` has already been
/// suppressed by the lunar blend.
pub fn target_gravity(pos: Vec2, moon_center: Vec2, config: &TuningConfig) -> (Vec2, f32, f32) {
    let moon_t = moon_blend(
        pos,
        moon_center,
        config.moon_enter_radius,
        config.moon_full_radius,
    );
    let mut zero_t = zero_g_blend(pos.y, config.zero_g_start_y, config.zero_g_full_y);
    zero_t *= 1.0 - moon_t;

    let base = Vec2::new(config.base_gravity_x, config.base_gravity_y).lerp(Vec2::ZERO, zero_t);

    let lunar = if moon_t > 0.0 {
        let offset = moon_center - pos;
        if offset.length_squared() >= GRAVITY_EPSILON_SQ {
            offset.normalize() * (config.moon_gravity_strength * moon_t)
        } else {
            // Craft exactly at the moon centre: radial direction is undefined.
            Vec2::ZERO
        }
    } else {
        Vec2::ZERO
    };

    (base + lunar, moon_t, zero_t)
}

/// First-order exponential smoothing of `current` toward `target`.
pub fn smooth_toward(current: Vec2, target: Vec2, rate: f32, dt: f32) -> Vec2 {
    let k = 1.0 - (-rate * dt).exp();
    current + (target - current) * k
}

/// Rotation-assist turn rate in degrees per second.
///
/// Zero unless the lunar field is felt and the emitted gravity is
/// non-negligible; zero inside the angular dead zone; otherwise the signed
/// error between `craft_up` and the anti-gravity direction, scaled by the
/// assist gain and the lunar blend, clamped to the maximum rate.
pub fn assist_rate(craft_up: Vec2, gravity: Vec2, moon_t: f32, config: &TuningConfig) -> f32 {
    if moon_t <= 0.0 || gravity.length_squared() < GRAVITY_EPSILON_SQ {
        return 0.0;
    }
    if craft_up.length_squared() < GRAVITY_EPSILON_SQ {
        return 0.0;
    }

    let desired_up = -gravity.normalize();
    let error_deg = craft_up
        .perp_dot(desired_up)
        .atan2(craft_up.dot(desired_up))
        .to_degrees();

    if error_deg.abs() < config.assist_dead_zone_deg {
        return 0.0;
    }

    (error_deg * config.rotation_assist * moon_t)
        .clamp(-config.max_assist_rate_deg, config.max_assist_rate_deg)
}

// ── Systems ────────────────────────────────────────────────────────────────────

/// Fixed-tick field update: blend, smooth, publish to Rapier, and feed the
/// rotation assist into the heading integrator.
pub fn gravity_field_system(
    time: Res<Time>,
    config: Res<TuningConfig>,
    moon: Res<MoonAnchor>,
    mut field: ResMut<GravityField>,
    mut rapier_config: Query<&mut RapierConfiguration>,
    mut q_craft: Query<(&Transform, &mut HeadingControl), With<Craft>>,
) {
    let Ok((transform, mut heading)) = q_craft.single_mut() else {
        return;
    };
    let dt = time.delta_secs();
    let pos = transform.translation.truncate();

    let (target, moon_t, zero_t) = target_gravity(pos, moon.0, &config);
    field.current = smooth_toward(field.current, target, config.gravity_smooth, dt);
    field.moon_blend = moon_t;
    field.zero_blend = zero_t;

    // Shared ambient gravity: single writer (here), read by the physics
    // integrator and every body this tick.
    for mut rapier in rapier_config.iter_mut() {
        rapier.gravity = field.current;
    }

    let craft_up = (transform.rotation * Vec3::Y).truncate();
    let rate = assist_rate(craft_up, field.current, moon_t, &config);
    heading.target += rate * dt;
}
