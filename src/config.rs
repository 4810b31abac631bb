//! Runtime tuning configuration loaded from `assets/tuning.toml`.
//!
//! [`TuningConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`]. At startup, [`load_tuning_config`] reads
//! `assets/tuning.toml` and overwrites the defaults with any values present in
//! the file. Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the constants you care about.
//!
//! ## Usage in systems
//!
//! Add `config: Res<TuningConfig>` to any system parameter list and read
//! values with `config.thrust_force`, `config.safe_speed`, etc.

use crate::constants::*;
use crate::error;
use bevy::prelude::*;
use serde::Deserialize;

/// Runtime-tunable physics and gameplay configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`. Override any subset by setting the value in
/// `assets/tuning.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    // ── Gravity Field ─────────────────────────────────────────────────────────
    pub base_gravity_x: f32,
    pub base_gravity_y: f32,
    pub moon_enter_radius: f32,
    pub moon_full_radius: f32,
    pub moon_gravity_strength: f32,
    pub moon_center_x: f32,
    pub moon_center_y: f32,
    pub moon_surface_radius: f32,
    pub zero_g_start_y: f32,
    pub zero_g_full_y: f32,
    pub gravity_smooth: f32,

    // ── Rotation Assist ───────────────────────────────────────────────────────
    pub rotation_assist: f32,
    pub max_assist_rate_deg: f32,
    pub assist_dead_zone_deg: f32,

    // ── Craft Movement ────────────────────────────────────────────────────────
    pub thrust_force: f32,
    pub rotation_speed: f32,
    pub rotation_smooth: f32,
    pub max_fall_speed: f32,
    pub craft_mass: f32,

    // ── Analog Steering ───────────────────────────────────────────────────────
    pub steering_deadzone: f32,
    pub steering_range: f32,
    pub max_steer: f32,
    pub steer_response: f32,

    // ── Space Tuning ──────────────────────────────────────────────────────────
    pub space_rotation_factor: f32,
    pub space_smooth_factor: f32,
    pub space_thrust_factor: f32,

    // ── Fuel ──────────────────────────────────────────────────────────────────
    pub fuel_max: f32,
    pub fuel_burn_per_sec: f32,
    pub fuel_per_unit: f32,
    pub fuel_buffer_percent: f32,
    pub fuel_empty_delay: f32,

    // ── Landing Rules ─────────────────────────────────────────────────────────
    pub safe_speed: f32,
    pub safe_angle_deg: f32,
    pub safe_vertical_speed: f32,

    // ── Dead Zone ─────────────────────────────────────────────────────────────
    pub dead_zone_explode_delay: f32,

    // ── Scoring ───────────────────────────────────────────────────────────────
    pub base_landing_score: u32,
    pub time_bonus_max: u32,
    pub time_bonus_loss_per_second: f32,
    pub moon_landing_bonus: u32,
    pub speed_weight: u32,
    pub angle_weight: u32,
    pub center_weight: u32,
    pub fuel_weight: u32,
    pub score_multiplier: f32,

    // ── Spawn Placement ───────────────────────────────────────────────────────
    pub max_distance_x_to_pad: f32,
    pub min_distance_y_to_pad: f32,
    pub max_distance_y_to_pad: f32,
    pub min_world_y: f32,

    // ── Terrain ───────────────────────────────────────────────────────────────
    pub landscape_half_width: f32,
    pub landscape_base_y: f32,
    pub landscape_roughness: f32,
    pub pad_half_width: f32,
    pub pad_half_height: f32,
    pub dead_zone_band_width: f32,

    // ── Camera / HUD ──────────────────────────────────────────────────────────
    pub camera_follow_rate: f32,
    pub camera_view_height: f32,
    pub hud_font_size: f32,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            // Gravity Field
            base_gravity_x: BASE_GRAVITY_X,
            base_gravity_y: BASE_GRAVITY_Y,
            moon_enter_radius: MOON_ENTER_RADIUS,
            moon_full_radius: MOON_FULL_RADIUS,
            moon_gravity_strength: MOON_GRAVITY_STRENGTH,
            moon_center_x: MOON_CENTER_X,
            moon_center_y: MOON_CENTER_Y,
            moon_surface_radius: MOON_SURFACE_RADIUS,
            zero_g_start_y: ZERO_G_START_Y,
            zero_g_full_y: ZERO_G_FULL_Y,
            gravity_smooth: GRAVITY_SMOOTH,
            // Rotation Assist
            rotation_assist: ROTATION_ASSIST,
            max_assist_rate_deg: MAX_ASSIST_RATE_DEG,
            assist_dead_zone_deg: ASSIST_DEAD_ZONE_DEG,
            // Craft Movement
            thrust_force: THRUST_FORCE,
            rotation_speed: ROTATION_SPEED,
            rotation_smooth: ROTATION_SMOOTH,
            max_fall_speed: MAX_FALL_SPEED,
            craft_mass: CRAFT_MASS,
            // Analog Steering
            steering_deadzone: STEERING_DEADZONE,
            steering_range: STEERING_RANGE,
            max_steer: MAX_STEER,
            steer_response: STEER_RESPONSE,
            // Space Tuning
            space_rotation_factor: SPACE_ROTATION_FACTOR,
            space_smooth_factor: SPACE_SMOOTH_FACTOR,
            space_thrust_factor: SPACE_THRUST_FACTOR,
            // Fuel
            fuel_max: FUEL_MAX,
            fuel_burn_per_sec: FUEL_BURN_PER_SEC,
            fuel_per_unit: FUEL_PER_UNIT,
            fuel_buffer_percent: FUEL_BUFFER_PERCENT,
            fuel_empty_delay: FUEL_EMPTY_DELAY,
            // Landing Rules
            safe_speed: SAFE_SPEED,
            safe_angle_deg: SAFE_ANGLE_DEG,
            safe_vertical_speed: SAFE_VERTICAL_SPEED,
            // Dead Zone
            dead_zone_explode_delay: DEAD_ZONE_EXPLODE_DELAY,
            // Scoring
            base_landing_score: BASE_LANDING_SCORE,
            time_bonus_max: TIME_BONUS_MAX,
            time_bonus_loss_per_second: TIME_BONUS_LOSS_PER_SECOND,
            moon_landing_bonus: MOON_LANDING_BONUS,
            speed_weight: SPEED_WEIGHT,
            angle_weight: ANGLE_WEIGHT,
            center_weight: CENTER_WEIGHT,
            fuel_weight: FUEL_WEIGHT,
            score_multiplier: SCORE_MULTIPLIER,
            // Spawn Placement
            max_distance_x_to_pad: MAX_DISTANCE_X_TO_PAD,
            min_distance_y_to_pad: MIN_DISTANCE_Y_TO_PAD,
            max_distance_y_to_pad: MAX_DISTANCE_Y_TO_PAD,
            min_world_y: MIN_WORLD_Y,
            // Terrain
            landscape_half_width: LANDSCAPE_HALF_WIDTH,
            landscape_base_y: LANDSCAPE_BASE_Y,
            landscape_roughness: LANDSCAPE_ROUGHNESS,
            pad_half_width: PAD_HALF_WIDTH,
            pad_half_height: PAD_HALF_HEIGHT,
            dead_zone_band_width: DEAD_ZONE_BAND_WIDTH,
            // Camera / HUD
            camera_follow_rate: CAMERA_FOLLOW_RATE,
            camera_view_height: CAMERA_VIEW_HEIGHT,
            hud_font_size: HUD_FONT_SIZE,
        }
    }
}

/// Startup system: attempt to load `assets/tuning.toml` and overwrite the
/// `TuningConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults. TOML parse errors are logged
/// but do not abort the simulation. A missing file is silently ignored
/// (defaults are already in place from `insert_resource`).
pub fn load_tuning_config(mut config: ResMut<TuningConfig>) {
    let path = "assets/tuning.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<TuningConfig>(&contents) {
            Ok(loaded) => {
                *config = loaded;
                info!("loaded tuning config from {path}");
            }
            Err(e) => {
                warn!("failed to parse {path}: {e}; using defaults");
            }
        },
        Err(_) => {
            info!("no {path} found; using compiled defaults");
        }
    }
}

/// Startup system: sanity-check the loaded tuning values.
///
/// Runs after [`load_tuning_config`]. Violations are logged as warnings; the
/// simulation still starts so a bad override file never bricks the game.
pub fn validate_tuning_config(config: Res<TuningConfig>) {
    let checks = [
        error::validate_moon_radii(config.moon_enter_radius, config.moon_full_radius),
        error::validate_zero_g_band(config.zero_g_start_y, config.zero_g_full_y),
        error::validate_landing_rules(
            config.safe_speed,
            config.safe_angle_deg,
            config.safe_vertical_speed,
        ),
        error::validate_gravity_smooth(config.gravity_smooth),
    ];
    for check in checks {
        if let Err(err) = check {
            warn!("tuning config: {err}");
        }
    }
}
