//! Analog craft control: pointer sampling, steering, thrust, fuel burn, and
//! the terminal fall-speed clamp.
//!
//! ## Pipeline (runs in order every fixed tick)
//!
//! 1. [`space_tuning_system`] — recomputes effective control response from the
//!    immutable spawn baseline and the current zero-g blend.
//! 2. [`craft_actuator_system`] — converts the pointer sample into a smoothed
//!    steering intensity, integrates the heading target, applies thrust and
//!    burns fuel.
//! 3. [`heading_smooth_system`] — chases the heading target with an angular
//!    lerp and writes the craft rotation.
//! 4. [`fall_speed_clamp_system`] — clamps the velocity component along the
//!    current down direction.
//!
//! [`pointer_input_system`] runs on the presentation loop and only writes the
//! [`ControlInput`] resource, keeping the fixed-step pipeline agnostic to the
//! input device (mouse, touch, or synthetic in tests).

use super::state::{
    BaseTuning, ControlInput, Craft, Controls, FlightState, Fuel, HeadingControl, SpaceTuning,
    ThrustActive,
};
use crate::config::TuningConfig;
use crate::events::ThrustAudio;
use crate::gravity::GravityField;
use crate::util::{lerp_angle_deg, normalize_deg};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_rapier2d::prelude::*;

// ── Pure steering math ─────────────────────────────────────────────────────────

/// Map a craft-local lateral offset to a signed steering intensity in
/// `[-max_steer, max_steer]`.
///
/// Offsets inside the dead zone produce 0; beyond it, intensity rises
/// linearly over the steering range.
pub fn steering_intensity(local_x: f32, config: &TuningConfig) -> f32 {
    let abs = local_x.abs();
    if abs <= config.steering_deadzone {
        return 0.0;
    }
    let past = abs - config.steering_deadzone;
    let intensity = (past / config.steering_range.max(1e-4)).clamp(0.0, 1.0);
    intensity.min(config.max_steer) * local_x.signum()
}

/// Exponential per-tick smoothing of the steering value (response-rate based,
/// so the feel is framerate-independent).
pub fn smooth_steer(previous: f32, target: f32, response: f32, dt: f32) -> f32 {
    let k = 1.0 - (-response * dt).exp();
    previous + (target - previous) * k
}

// ── Presentation-loop input provider ───────────────────────────────────────────

/// Sample the pointer (mouse button or first touch) into [`ControlInput`].
///
/// Runs per frame; the fixed-step actuator consumes whatever the latest
/// sample is. No pointer or no camera leaves the input inactive.
pub fn pointer_input_system(
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    mut input: ResMut<ControlInput>,
) {
    input.active = false;

    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };

    let screen_pos = if buttons.pressed(MouseButton::Left) {
        windows.single().ok().and_then(|w| w.cursor_position())
    } else {
        touches.iter().next().map(|t| t.position())
    };
    let Some(screen_pos) = screen_pos else {
        return;
    };

    let Ok(world_point) = camera.viewport_to_world_2d(camera_transform, screen_pos) else {
        return;
    };

    input.active = true;
    input.world_point = world_point;
}

// ── Fixed-step systems ─────────────────────────────────────────────────────────

/// Recompute the effective control response from the spawn baseline.
///
/// `effective = base × (1 + (factor − 1) × zero_blend)` — rotation speed and
/// smoothing tighten in zero-g, thrust softens. Always derived from the
/// baseline, so repeated application never compounds.
pub fn space_tuning_system(
    field: Res<GravityField>,
    config: Res<TuningConfig>,
    mut q_craft: Query<(&BaseTuning, &mut SpaceTuning), With<Craft>>,
) {
    let Ok((base, mut tuning)) = q_craft.single_mut() else {
        return;
    };
    let t = field.zero_blend;
    tuning.rotation_speed = base.rotation_speed * (1.0 + (config.space_rotation_factor - 1.0) * t);
    tuning.rotation_smooth = base.rotation_smooth * (1.0 + (config.space_smooth_factor - 1.0) * t);
    tuning.thrust_force = base.thrust_force * (1.0 + (config.space_thrust_factor - 1.0) * t);
}

/// The actuator: steering, thrust, and fuel burn for one fixed tick.
///
/// Thrust requires an active pointer, enabled controls, the `Flying` state,
/// and fuel in the tank — all four, every tick. The external force is cleared
/// here unconditionally, so a terminal state never leaves a stale thrust
/// force behind.
pub fn craft_actuator_system(
    time: Res<Time>,
    input: Res<ControlInput>,
    config: Res<TuningConfig>,
    mut thrust_active: ResMut<ThrustActive>,
    mut audio: MessageWriter<ThrustAudio>,
    mut q_craft: Query<
        (
            &Transform,
            &FlightState,
            &Controls,
            &SpaceTuning,
            &mut HeadingControl,
            &mut Fuel,
            &mut ExternalForce,
        ),
        With<Craft>,
    >,
) {
    let Ok((transform, state, controls, tuning, mut heading, mut fuel, mut force)) =
        q_craft.single_mut()
    else {
        return;
    };
    let dt = time.delta_secs();

    force.force = Vec2::ZERO;
    force.torque = 0.0;

    let thrusting =
        *state == FlightState::Flying && controls.enabled && input.active && !fuel.is_empty();

    if thrust_active.0 != thrusting {
        thrust_active.0 = thrusting;
        audio.write(ThrustAudio { active: thrusting });
    }

    if !thrusting {
        // Let the steering value decay to neutral so releasing the pointer
        // doesn't leave a stale turn command behind.
        heading.steer = smooth_steer(heading.steer, 0.0, config.steer_response, dt);
        return;
    }

    // Pointer target into the craft's local frame (rotates with the craft);
    // only the lateral offset steers.
    let local = transform
        .compute_affine()
        .inverse()
        .transform_point3(input.world_point.extend(0.0));

    let intensity = steering_intensity(local.x, &config);
    heading.steer = smooth_steer(heading.steer, intensity, config.steer_response, dt);

    // Positive steer (pointer right of the craft) turns clockwise.
    heading.target += -heading.steer * tuning.rotation_speed * dt;

    let up = (transform.rotation * Vec3::Y).truncate();
    force.force += up * tuning.thrust_force;
    fuel.burn(config.fuel_burn_per_sec * dt);
}

/// Chase the heading target with a per-tick angular lerp and write the craft
/// rotation. Only active while flying; terminal states freeze orientation.
pub fn heading_smooth_system(
    mut q_craft: Query<
        (&FlightState, &SpaceTuning, &mut HeadingControl, &mut Transform),
        With<Craft>,
    >,
) {
    let Ok((state, tuning, mut heading, mut transform)) = q_craft.single_mut() else {
        return;
    };
    if *state != FlightState::Flying {
        return;
    }

    let smoothed = lerp_angle_deg(
        heading.current,
        heading.target,
        tuning.rotation_smooth.clamp(0.0, 1.0),
    );
    heading.current = normalize_deg(smoothed);
    transform.rotation = Quat::from_rotation_z(heading.current.to_radians());
}

/// Clamp the velocity component along the current down direction to the
/// configured terminal fall speed.
///
/// Runs independently of thrust and gravity application, so runaway fall
/// speed is unreachable regardless of the field magnitude.
pub fn fall_speed_clamp_system(
    field: Res<GravityField>,
    config: Res<TuningConfig>,
    mut q_craft: Query<(&FlightState, &mut Velocity), With<Craft>>,
) {
    let Ok((state, mut velocity)) = q_craft.single_mut() else {
        return;
    };
    if state.is_terminal() {
        return;
    }

    let down = field.down();
    let falling = velocity.linvel.dot(down);
    if falling > config.max_fall_speed {
        velocity.linvel -= down * (falling - config.max_fall_speed);
    }
}

// ── Unit tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::THRUST_FORCE;
    use std::time::Duration;

    // ── helpers ───────────────────────────────────────────────────────────────

    /// Build a minimal Bevy `App` with just the resources the actuator needs,
    /// without Rapier stepping or rendering. Time is inserted pre-advanced so
    /// `delta_secs()` is a deterministic 1/60 s.
    fn build_test_app() -> App {
        let mut app = App::new();
        let mut time: Time = Time::default();
        time.advance_by(Duration::from_micros(16_667));
        app.insert_resource(time);
        app.insert_resource(TuningConfig::default());
        app.insert_resource(GravityField::default());
        app.insert_resource(ControlInput::default());
        app.insert_resource(ThrustActive::default());
        app.add_message::<ThrustAudio>();
        app.add_systems(Update, craft_actuator_system);
        app
    }

    fn spawn_test_craft(app: &mut App, state: FlightState, fuel: f32) -> Entity {
        app.world_mut()
            .spawn((
                Craft,
                state,
                Controls { enabled: true },
                Transform::from_rotation(Quat::IDENTITY), // facing +Y
                Fuel {
                    current: fuel,
                    capacity: crate::constants::FUEL_MAX,
                },
                HeadingControl::default(),
                SpaceTuning {
                    rotation_speed: crate::constants::ROTATION_SPEED,
                    rotation_smooth: crate::constants::ROTATION_SMOOTH,
                    thrust_force: THRUST_FORCE,
                },
                ExternalForce::default(),
            ))
            .id()
    }

    fn set_input(app: &mut App, active: bool, world_point: Vec2) {
        app.insert_resource(ControlInput {
            active,
            world_point,
        });
    }

    fn craft_force(app: &mut App, entity: Entity) -> Vec2 {
        app.world().get::<ExternalForce>(entity).unwrap().force
    }

    // ── steering_intensity ────────────────────────────────────────────────────

    #[test]
    fn steering_dead_zone_produces_no_response() {
        let config = TuningConfig::default();
        assert_eq!(steering_intensity(0.0, &config), 0.0);
        assert_eq!(steering_intensity(0.1, &config), 0.0);
        assert_eq!(steering_intensity(-0.1, &config), 0.0);
    }

    #[test]
    fn steering_scales_past_dead_zone_and_saturates() {
        let config = TuningConfig::default();
        let quarter = steering_intensity(0.15 + 0.5, &config);
        assert!((quarter - 0.25).abs() < 1e-4, "got {quarter}");
        assert_eq!(steering_intensity(0.15 + 2.0, &config), 1.0);
        assert_eq!(steering_intensity(10.0, &config), 1.0);
        assert_eq!(steering_intensity(-10.0, &config), -1.0);
    }

    #[test]
    fn steer_smoothing_is_first_order() {
        let next = smooth_steer(0.0, 1.0, 8.0, 1.0 / 60.0);
        assert!(next > 0.0 && next < 1.0, "got {next}");
        // Larger dt moves further toward the target.
        let further = smooth_steer(0.0, 1.0, 8.0, 1.0 / 30.0);
        assert!(further > next);
    }

    // ── craft_actuator_system ─────────────────────────────────────────────────

    #[test]
    fn thrust_applies_force_along_local_up_and_burns_fuel() {
        let mut app = build_test_app();
        let craft = spawn_test_craft(&mut app, FlightState::Flying, 2.0);
        set_input(&mut app, true, Vec2::new(0.0, 10.0));

        app.update();

        let force = craft_force(&mut app, craft);
        assert!(
            (force - Vec2::new(0.0, THRUST_FORCE)).length() < 1e-4,
            "expected thrust along +Y, got {force:?}"
        );
        let fuel = app.world().get::<Fuel>(craft).unwrap();
        assert!(fuel.current < 2.0, "fuel must burn while thrusting");
    }

    #[test]
    fn empty_tank_means_no_force_and_no_burn() {
        let mut app = build_test_app();
        let craft = spawn_test_craft(&mut app, FlightState::Flying, 0.0);
        set_input(&mut app, true, Vec2::new(0.0, 10.0));

        app.update();

        assert_eq!(craft_force(&mut app, craft), Vec2::ZERO);
        let fuel = app.world().get::<Fuel>(craft).unwrap();
        assert_eq!(fuel.current, 0.0);
    }

    #[test]
    fn non_flying_state_suppresses_thrust() {
        let mut app = build_test_app();
        let craft = spawn_test_craft(&mut app, FlightState::LandedPad, 2.0);
        set_input(&mut app, true, Vec2::new(0.0, 10.0));

        app.update();

        assert_eq!(craft_force(&mut app, craft), Vec2::ZERO);
        let fuel = app.world().get::<Fuel>(craft).unwrap();
        assert_eq!(fuel.current, 2.0, "no burn while landed");
    }

    #[test]
    fn inactive_pointer_decays_steer_and_applies_no_force() {
        let mut app = build_test_app();
        let craft = spawn_test_craft(&mut app, FlightState::Flying, 2.0);
        app.world_mut().get_mut::<HeadingControl>(craft).unwrap().steer = 1.0;
        set_input(&mut app, false, Vec2::ZERO);

        app.update();

        assert_eq!(craft_force(&mut app, craft), Vec2::ZERO);
        let heading = app.world().get::<HeadingControl>(craft).unwrap();
        assert!(
            heading.steer < 1.0,
            "steer must decay toward neutral, got {}",
            heading.steer
        );
    }

    #[test]
    fn pointer_right_of_craft_turns_clockwise() {
        let mut app = build_test_app();
        let craft = spawn_test_craft(&mut app, FlightState::Flying, 2.0);
        // Pointer far to the right in world space = positive local x.
        set_input(&mut app, true, Vec2::new(10.0, 0.0));

        for _ in 0..5 {
            app.update();
        }

        let heading = app.world().get::<HeadingControl>(craft).unwrap();
        assert!(heading.steer > 0.0, "steer should be positive");
        assert!(
            heading.target < 0.0,
            "positive steer must command a clockwise (negative) heading, got {}",
            heading.target
        );
    }

    #[test]
    fn pointer_dead_ahead_only_thrusts() {
        let mut app = build_test_app();
        let craft = spawn_test_craft(&mut app, FlightState::Flying, 2.0);
        // Within the lateral dead zone.
        set_input(&mut app, true, Vec2::new(0.05, 8.0));

        for _ in 0..5 {
            app.update();
        }

        let heading = app.world().get::<HeadingControl>(craft).unwrap();
        assert_eq!(heading.target, 0.0, "dead-zone input must not steer");
        assert!(craft_force(&mut app, craft).length() > 0.0);
    }

    #[test]
    fn thrust_state_tracks_pointer_transitions() {
        let mut app = build_test_app();
        spawn_test_craft(&mut app, FlightState::Flying, 2.0);

        set_input(&mut app, true, Vec2::new(0.0, 10.0));
        app.update();
        assert!(app.world().resource::<ThrustActive>().0);

        app.update();
        assert!(app.world().resource::<ThrustActive>().0);

        set_input(&mut app, false, Vec2::ZERO);
        app.update();
        assert!(!app.world().resource::<ThrustActive>().0);
    }

    // ── fall_speed_clamp_system ───────────────────────────────────────────────

    fn build_clamp_app(gravity: Vec2) -> App {
        let mut app = App::new();
        app.insert_resource(TuningConfig::default());
        app.insert_resource(GravityField {
            current: gravity,
            moon_blend: 0.0,
            zero_blend: 0.0,
        });
        app.add_systems(Update, fall_speed_clamp_system);
        app
    }

    #[test]
    fn fall_speed_is_clamped_along_world_down() {
        let mut app = build_clamp_app(Vec2::new(0.0, -9.81));
        let craft = app
            .world_mut()
            .spawn((
                Craft,
                FlightState::Flying,
                Velocity {
                    linvel: Vec2::new(3.0, -50.0),
                    angvel: 0.0,
                },
            ))
            .id();

        app.update();

        let v = app.world().get::<Velocity>(craft).unwrap().linvel;
        assert!(
            (v.y - -crate::constants::MAX_FALL_SPEED).abs() < 1e-4,
            "expected fall speed clamped to -6, got {v:?}"
        );
        assert!((v.x - 3.0).abs() < 1e-4, "lateral speed must be untouched");
    }

    #[test]
    fn fall_speed_is_clamped_along_radial_down() {
        // Gravity pulling along +X (e.g. moon to the right of the craft).
        let mut app = build_clamp_app(Vec2::new(9.0, 0.0));
        let craft = app
            .world_mut()
            .spawn((
                Craft,
                FlightState::Flying,
                Velocity {
                    linvel: Vec2::new(40.0, 1.0),
                    angvel: 0.0,
                },
            ))
            .id();

        app.update();

        let v = app.world().get::<Velocity>(craft).unwrap().linvel;
        assert!(
            (v.x - crate::constants::MAX_FALL_SPEED).abs() < 1e-4,
            "expected radial fall clamped to +6 along +X, got {v:?}"
        );
    }

    #[test]
    fn slow_fall_is_untouched() {
        let mut app = build_clamp_app(Vec2::new(0.0, -9.81));
        let craft = app
            .world_mut()
            .spawn((
                Craft,
                FlightState::Flying,
                Velocity {
                    linvel: Vec2::new(0.0, -1.0),
                    angvel: 0.0,
                },
            ))
            .id();

        app.update();

        let v = app.world().get::<Velocity>(craft).unwrap().linvel;
        assert!((v.y - -1.0).abs() < 1e-6);
    }

    // ── space_tuning_system ───────────────────────────────────────────────────

    #[test]
    fn space_tuning_blends_from_the_immutable_baseline() {
        let mut app = App::new();
        app.insert_resource(TuningConfig::default());
        app.insert_resource(GravityField {
            current: Vec2::ZERO,
            moon_blend: 0.0,
            zero_blend: 1.0,
        });
        app.add_systems(Update, space_tuning_system);
        let craft = app
            .world_mut()
            .spawn((
                Craft,
                BaseTuning {
                    rotation_speed: 180.0,
                    rotation_smooth: 0.12,
                    thrust_force: 9.5,
                },
                SpaceTuning::default(),
            ))
            .id();

        // Run twice: the result must come from the baseline, not compound.
        app.update();
        app.update();

        let tuning = app.world().get::<SpaceTuning>(craft).unwrap();
        assert!((tuning.rotation_speed - 360.0).abs() < 1e-3);
        assert!((tuning.rotation_smooth - 0.24).abs() < 1e-4);
        assert!((tuning.thrust_force - 9.5 * 0.7).abs() < 1e-3);
    }
}
