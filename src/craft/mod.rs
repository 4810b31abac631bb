//! The player craft: components, the tick-rate simulation pipeline and the
//! spawn bundle.

pub mod control;
pub mod flight;
pub mod state;

use crate::config::TuningConfig;
use crate::gravity;
use crate::landing;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use state::*;

pub struct CraftPlugin;

impl Plugin for CraftPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<gravity::GravityField>()
            .init_resource::<gravity::MoonAnchor>()
            .init_resource::<ControlInput>()
            .init_resource::<ThrustActive>()
            .init_resource::<FuelEmptyTimer>()
            .init_resource::<DeadZoneTimer>()
            .init_resource::<EvaState>()
            .init_resource::<RunClock>()
            .init_resource::<CraftTelemetry>()
            .add_systems(
                Update,
                (control::pointer_input_system, flight::eva_toggle_system),
            )
            .add_systems(
                FixedUpdate,
                (
                    gravity::gravity_field_system,
                    control::space_tuning_system,
                    flight::launch_system,
                    flight::moon_liftoff_system,
                    control::craft_actuator_system,
                    control::heading_smooth_system,
                    control::fall_speed_clamp_system,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                (
                    landing::landing_contact_system,
                    flight::moon_separation_system,
                    flight::dead_zone_sensor_system,
                    flight::dead_zone_countdown_system,
                    flight::fuel_empty_watchdog_system,
                    flight::run_clock_system,
                    flight::telemetry_system,
                )
                    .chain()
                    .after(control::fall_speed_clamp_system),
            );
    }
}

/// Spawn the craft at `position` with a full tank of `fuel` units.
///
/// The collider mass is pinned so the thrust and gravity constants keep their
/// tuned meaning regardless of collider shape.
pub fn spawn_craft(
    commands: &mut Commands,
    config: &TuningConfig,
    position: Vec2,
    fuel: f32,
) -> Entity {
    commands
        .spawn((
            Craft,
            // Held fixed pre-launch; launch_system releases the body on the
            // first thrust command.
            FlightState::None,
            Controls { enabled: true },
            Fuel {
                current: fuel,
                capacity: fuel,
            },
            BaseTuning {
                rotation_speed: config.rotation_speed,
                rotation_smooth: config.rotation_smooth,
                thrust_force: config.thrust_force,
            },
            SpaceTuning {
                rotation_speed: config.rotation_speed,
                rotation_smooth: config.rotation_smooth,
                thrust_force: config.thrust_force,
            },
            HeadingControl::default(),
            RigidBody::Fixed,
            Collider::cuboid(0.5, 0.7),
            ColliderMassProperties::Mass(config.craft_mass),
            Velocity::default(),
            ExternalForce::default(),
            ActiveEvents::COLLISION_EVENTS,
            (
                Sprite::from_color(Color::srgb(0.85, 0.85, 0.9), Vec2::new(1.0, 1.4)),
                Transform::from_translation(position.extend(1.0)),
                Visibility::Visible,
            ),
        ))
        .id()
}
