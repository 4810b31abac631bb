//! Centralised physics and gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::TuningConfig`] mirrors every constant and can override any
//! of them from `assets/tuning.toml` at startup without recompiling.

// ── Base Gravity ──────────────────────────────────────────────────────────────

/// Horizontal component of the planetary base gravity (world units / s²).
pub const BASE_GRAVITY_X: f32 = 0.0;

/// Vertical component of the planetary base gravity (world units / s²).
///
/// Always points down; the zero-g altitude band fades this toward zero, the
/// lunar field adds a radial term on top.
pub const BASE_GRAVITY_Y: f32 = -9.81;

// ── Lunar Gravity Gradient ────────────────────────────────────────────────────

/// Distance from the moon centre at which lunar gravity begins (blend = 0).
///
/// Must be strictly greater than [`MOON_FULL_RADIUS`]; the blend factor rises
/// linearly between the two radii.
pub const MOON_ENTER_RADIUS: f32 = 18.0;

/// Distance from the moon centre at which lunar gravity is at full strength
/// (blend = 1).
pub const MOON_FULL_RADIUS: f32 = 10.0;

/// Magnitude of full lunar gravity, applied radially toward the moon centre.
pub const MOON_GRAVITY_STRENGTH: f32 = 9.0;

/// Moon centre position in world space.
///
/// High enough that the lunar field overlaps the zero-g altitude band — the
/// interesting regime where both blends are simultaneously active.
pub const MOON_CENTER_X: f32 = 12.0;
pub const MOON_CENTER_Y: f32 = 52.0;

/// Physical radius of the moon surface collider.
pub const MOON_SURFACE_RADIUS: f32 = 4.0;

// ── Altitude Zero-G Gradient ──────────────────────────────────────────────────

/// World Y at which base gravity starts fading (zero-g blend = 0).
pub const ZERO_G_START_Y: f32 = 40.0;

/// World Y at which base gravity is fully cancelled (zero-g blend = 1).
pub const ZERO_G_FULL_Y: f32 = 60.0;

// ── Gravity Smoothing ─────────────────────────────────────────────────────────

/// Exponential-decay rate for the emitted gravity vector (per second).
///
/// Higher values track the target field faster; lower values soften the force
/// transition when the craft crosses a blend boundary. At 6.0 the field closes
/// ~95% of the gap to the target within half a second.
pub const GRAVITY_SMOOTH: f32 = 6.0;

// ── Rotation Assist ───────────────────────────────────────────────────────────

/// Gain applied to the angular error between craft-up and gravity-up when the
/// lunar field is active. 0 disables the assist entirely.
pub const ROTATION_ASSIST: f32 = 0.25;

/// Maximum assist turn rate in degrees per second, applied to the heading
/// target. Keeps the assist gentle even at large angular errors.
pub const MAX_ASSIST_RATE_DEG: f32 = 4.0;

/// Angular errors below this many degrees produce no assist, preventing
/// oscillation around the upright orientation.
pub const ASSIST_DEAD_ZONE_DEG: f32 = 1.5;

/// Gravity magnitudes below this squared threshold are treated as zero
/// everywhere direction must be derived from the field.
pub const GRAVITY_EPSILON_SQ: f32 = 1e-4;

// ── Craft Movement ────────────────────────────────────────────────────────────

/// Continuous thrust force along the craft's local up axis.
///
/// Deliberately a touch below base gravity × craft mass: the craft cannot
/// hover at sea level, which makes fuel management matter.
pub const THRUST_FORCE: f32 = 9.5;

/// Full-deflection turn rate of the heading target (degrees / s).
pub const ROTATION_SPEED: f32 = 180.0;

/// Per-tick angular lerp factor pulling the actual heading toward the heading
/// target. Smaller = laggier, heavier-feeling rotation.
pub const ROTATION_SMOOTH: f32 = 0.12;

/// Maximum fall speed magnitude along the current down direction.
///
/// Clamped every tick regardless of thrust or gravity magnitude, so runaway
/// fall speed is unreachable.
pub const MAX_FALL_SPEED: f32 = 6.0;

/// Craft rigid-body mass. Pinned explicitly so the force constants above have
/// a fixed meaning independent of collider geometry.
pub const CRAFT_MASS: f32 = 1.0;

// ── Analog Steering ───────────────────────────────────────────────────────────

/// Local-x band around the craft centreline that produces no steering,
/// preventing jitter when the player only wants thrust.
pub const STEERING_DEADZONE: f32 = 0.15;

/// Lateral offset (local units) past the dead zone at which steering reaches
/// full intensity.
pub const STEERING_RANGE: f32 = 2.0;

/// Upper bound on steering intensity (1 = 100%).
pub const MAX_STEER: f32 = 1.0;

/// Exponential response rate of the smoothed steering value (per second).
/// Higher = more direct, lower = smoother.
pub const STEER_RESPONSE: f32 = 8.0;

// ── Space Tuning ──────────────────────────────────────────────────────────────

/// Rotation-speed multiplier reached at full zero-g blend. Control gets
/// snappier in space where the rotation assist no longer helps.
pub const SPACE_ROTATION_FACTOR: f32 = 2.0;

/// Rotation-smoothing multiplier reached at full zero-g blend.
pub const SPACE_SMOOTH_FACTOR: f32 = 2.0;

/// Thrust multiplier reached at full zero-g blend. Less gravity to fight
/// means less force is needed for the same authority.
pub const SPACE_THRUST_FACTOR: f32 = 0.7;

// ── Fuel ──────────────────────────────────────────────────────────────────────

/// Fallback fuel capacity when no distance-based value has been computed.
pub const FUEL_MAX: f32 = 3.5;

/// Fuel consumed per second of active thrust.
pub const FUEL_BURN_PER_SEC: f32 = 1.0;

/// Fuel granted per world unit of spawn-to-pad distance.
pub const FUEL_PER_UNIT: f32 = 0.25;

/// Fractional fuel buffer added on top of the distance-based amount.
/// Shrinks with level so later levels leave less margin for error.
pub const FUEL_BUFFER_PERCENT: f32 = 0.4;

/// Seconds the tank must stay continuously empty before the out-of-fuel
/// failure fires. Any refuel resets the timer completely.
pub const FUEL_EMPTY_DELAY: f32 = 5.0;

// ── Landing Rules ─────────────────────────────────────────────────────────────

/// Maximum total impact speed for a safe landing.
pub const SAFE_SPEED: f32 = 2.0;

/// Maximum angular error (degrees from upright) for a safe pad landing.
pub const SAFE_ANGLE_DEG: f32 = 10.0;

/// Maximum impact-velocity component along the down direction for a safe pad
/// landing.
pub const SAFE_VERTICAL_SPEED: f32 = 1.5;

// ── Dead Zone ─────────────────────────────────────────────────────────────────

/// Seconds of continuous dead-zone occupancy before the craft is destroyed.
/// Leaving the zone for any reason resets the countdown to this full value.
pub const DEAD_ZONE_EXPLODE_DELAY: f32 = 5.0;

// ── Scoring ───────────────────────────────────────────────────────────────────

/// Flat points for any successful landing.
pub const BASE_LANDING_SCORE: u32 = 100;

/// Maximum time bonus; decays by [`TIME_BONUS_LOSS_PER_SECOND`].
pub const TIME_BONUS_MAX: u32 = 40;

/// Time bonus lost per second of flight.
pub const TIME_BONUS_LOSS_PER_SECOND: f32 = 2.0;

/// Flat bonus for landing on the moon (replaces angle + centre scores).
pub const MOON_LANDING_BONUS: u32 = 250;

/// Weight of the impact-speed sub-score. Always awarded, any surface.
pub const SPEED_WEIGHT: u32 = 150;

/// Weight of the touchdown-angle sub-score (pad/landscape only).
pub const ANGLE_WEIGHT: u32 = 120;

/// Weight of the pad-centre accuracy sub-score (pad/landscape only).
pub const CENTER_WEIGHT: u32 = 160;

/// Weight of the remaining-fuel sub-score.
pub const FUEL_WEIGHT: u32 = 80;

/// Global multiplier applied to every sub-score before rounding.
pub const SCORE_MULTIPLIER: f32 = 1.0;

/// Centre accuracy (percent) at or above which a landing counts as perfect.
pub const PERFECT_CENTER_PCT: u32 = 90;

// ── Impact Feedback ───────────────────────────────────────────────────────────

/// Impact speed mapped to feedback intensity 0.
pub const IMPACT_FEEDBACK_MIN_SPEED: f32 = 1.5;

/// Impact speed mapped to feedback intensity 1.
pub const IMPACT_FEEDBACK_MAX_SPEED: f32 = 10.0;

// ── Spawn Placement (relative to the landing pad) ─────────────────────────────

/// Maximum horizontal spawn offset from the pad at level 1. Grows with level.
pub const MAX_DISTANCE_X_TO_PAD: f32 = 6.0;

/// Minimum vertical spawn offset above the pad at level 1.
pub const MIN_DISTANCE_Y_TO_PAD: f32 = 6.0;

/// Maximum vertical spawn offset above the pad at level 1.
pub const MAX_DISTANCE_Y_TO_PAD: f32 = 12.0;

/// Hard lower bound on the spawn world Y.
pub const MIN_WORLD_Y: f32 = -2.0;

// ── Terrain ───────────────────────────────────────────────────────────────────

/// Half extent of the generated landscape in X.
pub const LANDSCAPE_HALF_WIDTH: f32 = 60.0;

/// Number of ridge vertices across the landscape.
pub const LANDSCAPE_SEGMENTS: usize = 48;

/// Base elevation of the landscape ridge.
pub const LANDSCAPE_BASE_Y: f32 = -6.0;

/// Maximum random elevation step between adjacent ridge vertices.
pub const LANDSCAPE_ROUGHNESS: f32 = 1.6;

/// Half width of the landing pad collider.
pub const PAD_HALF_WIDTH: f32 = 2.0;

/// Half height of the landing pad collider.
pub const PAD_HALF_HEIGHT: f32 = 0.25;

/// Width of the dead-zone sensor bands flanking the playfield.
pub const DEAD_ZONE_BAND_WIDTH: f32 = 20.0;

// ── Camera / HUD ──────────────────────────────────────────────────────────────

/// Exponential follow rate of the camera toward the craft (per second).
pub const CAMERA_FOLLOW_RATE: f32 = 4.0;

/// Orthographic viewport height in world units.
pub const CAMERA_VIEW_HEIGHT: f32 = 40.0;

/// Font size of the telemetry readout.
pub const HUD_FONT_SIZE: f32 = 16.0;
