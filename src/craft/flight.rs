//! Flight lifecycle: run clock, fuel-empty watchdog, dead-zone countdown,
//! moon lift-off and the shared crash transition.
//!
//! Everything here runs in `FixedUpdate` after the actuator so timers see the
//! fuel state the player just produced.

use crate::config::TuningConfig;
use crate::craft::state::{
    Controls, ControlInput, Craft, CraftTelemetry, DeadZoneTimer, EvaState, FlightState, Fuel,
    FuelEmptyTimer, RunClock,
};
use crate::events::{DeadZoneWarning, FlightStateChanged};
use crate::landing::SurfaceKind;
use crate::level::DeadZoneRegion;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// Move the craft into a terminal crash state.
///
/// The body is frozen and hidden rather than despawned so the respawn path
/// can reuse the entity, and so late collision events still resolve their
/// entity ids.
pub fn enter_crash_state(
    commands: &mut Commands,
    entity: Entity,
    state: &mut FlightState,
    controls: &mut Controls,
    outcome: FlightState,
    state_changed: &mut MessageWriter<FlightStateChanged>,
) {
    debug_assert!(outcome.is_crash());
    *state = outcome;
    controls.enabled = false;
    commands
        .entity(entity)
        .insert((RigidBody::Fixed, Visibility::Hidden));
    state_changed.write(FlightStateChanged { state: outcome });
    warn!("craft lost: {}", outcome.label());
}

/// Start the run on the first thrust command.
///
/// The craft spawns in `None`, held fixed above the terrain; the first active
/// pointer releases the body and begins the flight.
pub fn launch_system(
    mut commands: Commands,
    input: Res<ControlInput>,
    mut crafts: Query<(Entity, &mut FlightState), With<Craft>>,
    mut state_changed: MessageWriter<FlightStateChanged>,
) {
    if !input.active {
        return;
    }
    let Ok((entity, mut state)) = crafts.single_mut() else {
        return;
    };
    if *state != FlightState::None {
        return;
    }
    *state = FlightState::Flying;
    commands.entity(entity).insert(RigidBody::Dynamic);
    state_changed.write(FlightStateChanged {
        state: FlightState::Flying,
    });
    info!("launch");
}

/// Tick the per-run flight clock while airborne. The clock feeds the landing
/// time bonus, so it stops the instant a terminal state is entered.
pub fn run_clock_system(
    time: Res<Time>,
    mut clock: ResMut<RunClock>,
    crafts: Query<&FlightState, With<Craft>>,
) {
    let Ok(state) = crafts.single() else {
        return;
    };
    if *state == FlightState::Flying {
        clock.elapsed += time.delta_secs();
    }
}

/// Explode the craft after the tank has been continuously empty for the grace
/// period. Any refuel resets the countdown from the top.
pub fn fuel_empty_watchdog_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<TuningConfig>,
    mut timer: ResMut<FuelEmptyTimer>,
    mut crafts: Query<(Entity, &Fuel, &mut FlightState, &mut Controls), With<Craft>>,
    mut state_changed: MessageWriter<FlightStateChanged>,
) {
    let Ok((entity, fuel, mut state, mut controls)) = crafts.single_mut() else {
        return;
    };
    if *state != FlightState::Flying {
        return;
    }
    if !fuel.is_empty() {
        timer.elapsed = 0.0;
        return;
    }
    timer.elapsed += time.delta_secs();
    if timer.elapsed >= config.fuel_empty_delay && !timer.triggered {
        timer.triggered = true;
        enter_crash_state(
            &mut commands,
            entity,
            state.as_mut(),
            controls.as_mut(),
            FlightState::OutOfFuel,
            &mut state_changed,
        );
    }
}

/// Arm or disarm the dead-zone countdown from sensor overlap events.
///
/// Both entering and leaving the band reset the countdown to the full delay.
/// A craft that dips in and out repeatedly therefore never accumulates time
/// across visits.
pub fn dead_zone_sensor_system(
    mut collisions: MessageReader<CollisionEvent>,
    config: Res<TuningConfig>,
    mut timer: ResMut<DeadZoneTimer>,
    zones: Query<(), With<DeadZoneRegion>>,
    crafts: Query<Entity, With<Craft>>,
    mut warnings: MessageWriter<DeadZoneWarning>,
) {
    let Ok(craft) = crafts.single() else {
        return;
    };
    for event in collisions.read() {
        let (e1, e2, entered) = match event {
            CollisionEvent::Started(a, b, _) => (*a, *b, true),
            CollisionEvent::Stopped(a, b, _) => (*a, *b, false),
        };
        let other = if e1 == craft {
            e2
        } else if e2 == craft {
            e1
        } else {
            continue;
        };
        if !zones.contains(other) {
            continue;
        }
        timer.armed = entered;
        timer.remaining = config.dead_zone_explode_delay;
        warnings.write(DeadZoneWarning { active: entered });
        if entered {
            warn!("entered dead zone, {}s to exit", config.dead_zone_explode_delay);
        } else {
            info!("left dead zone");
        }
    }
}

/// Count down while inside a dead zone and destroy the craft at zero.
pub fn dead_zone_countdown_system(
    mut commands: Commands,
    time: Res<Time>,
    mut timer: ResMut<DeadZoneTimer>,
    mut crafts: Query<(Entity, &mut FlightState, &mut Controls), With<Craft>>,
    mut state_changed: MessageWriter<FlightStateChanged>,
    mut warnings: MessageWriter<DeadZoneWarning>,
) {
    if !timer.armed {
        return;
    }
    let Ok((entity, mut state, mut controls)) = crafts.single_mut() else {
        return;
    };
    if *state != FlightState::Flying {
        return;
    }
    timer.remaining -= time.delta_secs();
    if timer.remaining <= 0.0 {
        timer.armed = false;
        warnings.write(DeadZoneWarning { active: false });
        enter_crash_state(
            &mut commands,
            entity,
            state.as_mut(),
            controls.as_mut(),
            FlightState::DeadZone,
            &mut state_changed,
        );
    }
}

/// Return to `Flying` when the craft physically separates from the moon
/// surface.
///
/// This is the authoritative lift-off transition: anything that breaks the
/// contact (thrust, a bounce, the moon's own pull letting go) resumes the
/// flight, so a craft drifting away can never stay `LandedMoon` in mid-air
/// with the landing classifier disarmed. Blocked while the astronaut is
/// outside.
pub fn moon_separation_system(
    mut collisions: MessageReader<CollisionEvent>,
    eva: Res<EvaState>,
    surfaces: Query<&SurfaceKind>,
    mut crafts: Query<(Entity, &mut FlightState), With<Craft>>,
    mut state_changed: MessageWriter<FlightStateChanged>,
) {
    let Ok((craft, mut state)) = crafts.single_mut() else {
        return;
    };
    for event in collisions.read() {
        let CollisionEvent::Stopped(e1, e2, _) = event else {
            continue;
        };
        if *state != FlightState::LandedMoon || eva.parked {
            continue;
        }
        let other = if *e1 == craft {
            *e2
        } else if *e2 == craft {
            *e1
        } else {
            continue;
        };
        if !matches!(surfaces.get(other), Ok(SurfaceKind::Moon)) {
            continue;
        }
        *state = FlightState::Flying;
        state_changed.write(FlightStateChanged {
            state: FlightState::Flying,
        });
        info!("separated from the moon surface");
    }
}

/// Return to `Flying` when the player thrusts off the moon surface.
///
/// Responsiveness path on top of [`moon_separation_system`]: the state flips
/// the same tick the command arrives instead of waiting for Rapier to report
/// the broken contact. Blocked while the astronaut is outside; recall them
/// first.
pub fn moon_liftoff_system(
    input: Res<ControlInput>,
    eva: Res<EvaState>,
    mut crafts: Query<(&mut FlightState, &Controls), With<Craft>>,
    mut state_changed: MessageWriter<FlightStateChanged>,
) {
    if !input.active || eva.parked {
        return;
    }
    let Ok((mut state, controls)) = crafts.single_mut() else {
        return;
    };
    if *state != FlightState::LandedMoon || !controls.enabled {
        return;
    }
    *state = FlightState::Flying;
    state_changed.write(FlightStateChanged {
        state: FlightState::Flying,
    });
    info!("lift-off from the moon");
}

/// Toggle the astronaut in and out of the craft while parked on the moon.
pub fn eva_toggle_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut eva: ResMut<EvaState>,
    crafts: Query<&FlightState, With<Craft>>,
) {
    if !keyboard.just_pressed(KeyCode::KeyE) {
        return;
    }
    let Ok(state) = crafts.single() else {
        return;
    };
    if *state != FlightState::LandedMoon {
        return;
    }
    eva.parked = !eva.parked;
    info!(
        "astronaut {}",
        if eva.parked { "on EVA" } else { "back aboard" }
    );
}

/// Mirror flight telemetry into a plain resource for the HUD.
pub fn telemetry_system(
    config: Res<TuningConfig>,
    mut telemetry: ResMut<CraftTelemetry>,
    crafts: Query<(&Transform, &Velocity, &Fuel), With<Craft>>,
) {
    let Ok((transform, velocity, fuel)) = crafts.single() else {
        return;
    };
    telemetry.speed = velocity.linvel.length();
    telemetry.altitude = transform.translation.y - config.landscape_base_y;
    telemetry.fuel_pct = fuel.pct();
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_rapier2d::rapier::geometry::CollisionEventFlags;
    use std::time::Duration;

    const DT: f32 = 1.0 / 60.0;

    fn build_test_app() -> App {
        let mut app = App::new();
        let mut time: Time = Time::default();
        time.advance_by(Duration::from_micros(16_667));
        app.insert_resource(time);
        app.insert_resource(TuningConfig::default());
        app.insert_resource(ControlInput::default());
        app.insert_resource(EvaState::default());
        app.insert_resource(RunClock::default());
        app.insert_resource(FuelEmptyTimer::default());
        app.insert_resource(DeadZoneTimer::default());
        app.add_message::<FlightStateChanged>();
        app.add_message::<DeadZoneWarning>();
        app.add_message::<CollisionEvent>();
        app
    }

    fn spawn_craft(app: &mut App, state: FlightState, fuel: f32) -> Entity {
        app.world_mut()
            .spawn((
                Craft,
                state,
                Controls { enabled: true },
                Fuel {
                    current: fuel,
                    capacity: crate::constants::FUEL_MAX,
                },
            ))
            .id()
    }

    fn flight_state(app: &App, entity: Entity) -> FlightState {
        *app.world().get::<FlightState>(entity).unwrap()
    }

    #[test]
    fn run_clock_only_ticks_while_flying() {
        let mut app = build_test_app();
        app.add_systems(Update, run_clock_system);
        let craft = spawn_craft(&mut app, FlightState::Flying, 1.0);

        app.update();
        app.update();
        let airborne = app.world().resource::<RunClock>().elapsed;
        assert!((airborne - 2.0 * DT).abs() < 1e-4);

        *app.world_mut().get_mut::<FlightState>(craft).unwrap() = FlightState::LandedPad;
        app.update();
        assert_eq!(app.world().resource::<RunClock>().elapsed, airborne);
    }

    #[test]
    fn fuel_watchdog_requires_a_continuously_empty_tank() {
        let mut app = build_test_app();
        app.add_systems(Update, fuel_empty_watchdog_system);
        let craft = spawn_craft(&mut app, FlightState::Flying, 0.0);

        for _ in 0..10 {
            app.update();
        }
        let partway = app.world().resource::<FuelEmptyTimer>().elapsed;
        assert!(partway > 0.0);

        // A refuel mid-countdown resets the timer from the top.
        app.world_mut().get_mut::<Fuel>(craft).unwrap().current = 0.5;
        app.update();
        assert_eq!(app.world().resource::<FuelEmptyTimer>().elapsed, 0.0);
        assert_eq!(flight_state(&app, craft), FlightState::Flying);
    }

    #[test]
    fn fuel_watchdog_destroys_the_craft_after_the_grace_period() {
        let mut app = build_test_app();
        app.add_systems(Update, fuel_empty_watchdog_system);
        let craft = spawn_craft(&mut app, FlightState::Flying, 0.0);

        let steps = (crate::constants::FUEL_EMPTY_DELAY / DT).ceil() as usize + 2;
        for _ in 0..steps {
            app.update();
        }
        assert_eq!(flight_state(&app, craft), FlightState::OutOfFuel);
        assert!(app.world().resource::<FuelEmptyTimer>().triggered);
        assert!(!app.world().get::<Controls>(craft).unwrap().enabled);
    }

    #[test]
    fn dead_zone_exit_resets_the_full_countdown() {
        let mut app = build_test_app();
        app.add_systems(Update, (dead_zone_sensor_system, dead_zone_countdown_system).chain());
        let craft = spawn_craft(&mut app, FlightState::Flying, 1.0);
        let zone = app.world_mut().spawn(DeadZoneRegion).id();

        app.world_mut().write_message(CollisionEvent::Started(
            craft,
            zone,
            CollisionEventFlags::SENSOR,
        ));
        for _ in 0..20 {
            app.update();
        }
        let timer = app.world().resource::<DeadZoneTimer>();
        assert!(timer.armed);
        assert!(timer.remaining < crate::constants::DEAD_ZONE_EXPLODE_DELAY);

        app.world_mut().write_message(CollisionEvent::Stopped(
            craft,
            zone,
            CollisionEventFlags::SENSOR,
        ));
        app.update();
        let timer = app.world().resource::<DeadZoneTimer>();
        assert!(!timer.armed);
        assert_eq!(timer.remaining, crate::constants::DEAD_ZONE_EXPLODE_DELAY);
        assert_eq!(flight_state(&app, craft), FlightState::Flying);
    }

    #[test]
    fn lingering_in_the_dead_zone_destroys_the_craft() {
        let mut app = build_test_app();
        app.add_systems(Update, (dead_zone_sensor_system, dead_zone_countdown_system).chain());
        let craft = spawn_craft(&mut app, FlightState::Flying, 1.0);
        let zone = app.world_mut().spawn(DeadZoneRegion).id();

        app.world_mut().write_message(CollisionEvent::Started(
            craft,
            zone,
            CollisionEventFlags::SENSOR,
        ));
        let steps = (crate::constants::DEAD_ZONE_EXPLODE_DELAY / DT).ceil() as usize + 2;
        for _ in 0..steps {
            app.update();
        }
        assert_eq!(flight_state(&app, craft), FlightState::DeadZone);
        assert!(!app.world().resource::<DeadZoneTimer>().armed);
    }

    #[test]
    fn first_thrust_command_launches_the_craft() {
        let mut app = build_test_app();
        app.add_systems(Update, launch_system);
        let craft = spawn_craft(&mut app, FlightState::None, 1.0);
        app.world_mut()
            .entity_mut(craft)
            .insert(RigidBody::Fixed);

        // Held on the rail until the first command.
        app.update();
        assert_eq!(flight_state(&app, craft), FlightState::None);
        assert_eq!(
            *app.world().get::<RigidBody>(craft).unwrap(),
            RigidBody::Fixed
        );

        app.insert_resource(ControlInput {
            active: true,
            world_point: Vec2::ZERO,
        });
        app.update();
        assert_eq!(flight_state(&app, craft), FlightState::Flying);
        assert_eq!(
            *app.world().get::<RigidBody>(craft).unwrap(),
            RigidBody::Dynamic
        );
    }

    #[test]
    fn losing_moon_contact_returns_to_flying_without_input() {
        let mut app = build_test_app();
        app.add_systems(Update, moon_separation_system);
        let craft = spawn_craft(&mut app, FlightState::LandedMoon, 1.0);
        let moon = app.world_mut().spawn(SurfaceKind::Moon).id();

        // No pointer at all: a bounce or the field letting go still resumes
        // the flight, so the landing classifier re-arms for later contacts.
        app.world_mut().write_message(CollisionEvent::Stopped(
            craft,
            moon,
            CollisionEventFlags::empty(),
        ));
        app.update();
        assert_eq!(flight_state(&app, craft), FlightState::Flying);
    }

    #[test]
    fn separation_is_blocked_while_the_astronaut_is_outside() {
        let mut app = build_test_app();
        app.add_systems(Update, moon_separation_system);
        let craft = spawn_craft(&mut app, FlightState::LandedMoon, 1.0);
        let moon = app.world_mut().spawn(SurfaceKind::Moon).id();
        app.insert_resource(EvaState {
            parked: true,
            scored: true,
        });

        app.world_mut().write_message(CollisionEvent::Stopped(
            craft,
            moon,
            CollisionEventFlags::empty(),
        ));
        app.update();
        assert_eq!(flight_state(&app, craft), FlightState::LandedMoon);
    }

    #[test]
    fn non_moon_contact_loss_does_not_lift_off() {
        let mut app = build_test_app();
        app.add_systems(Update, moon_separation_system);
        let craft = spawn_craft(&mut app, FlightState::LandedMoon, 1.0);
        let rocks = app.world_mut().spawn(SurfaceKind::Landscape).id();

        app.world_mut().write_message(CollisionEvent::Stopped(
            craft,
            rocks,
            CollisionEventFlags::empty(),
        ));
        app.update();
        assert_eq!(flight_state(&app, craft), FlightState::LandedMoon);
    }

    #[test]
    fn thrust_input_lifts_off_from_the_moon() {
        let mut app = build_test_app();
        app.add_systems(Update, moon_liftoff_system);
        let craft = spawn_craft(&mut app, FlightState::LandedMoon, 1.0);

        // No input: stays parked.
        app.update();
        assert_eq!(flight_state(&app, craft), FlightState::LandedMoon);

        app.insert_resource(ControlInput {
            active: true,
            world_point: Vec2::ZERO,
        });
        app.update();
        assert_eq!(flight_state(&app, craft), FlightState::Flying);
    }

    #[test]
    fn liftoff_is_blocked_while_the_astronaut_is_outside() {
        let mut app = build_test_app();
        app.add_systems(Update, moon_liftoff_system);
        let craft = spawn_craft(&mut app, FlightState::LandedMoon, 1.0);
        app.insert_resource(EvaState {
            parked: true,
            scored: true,
        });
        app.insert_resource(ControlInput {
            active: true,
            world_point: Vec2::ZERO,
        });

        app.update();
        assert_eq!(flight_state(&app, craft), FlightState::LandedMoon);
    }

    #[test]
    fn crash_states_are_terminal_and_liftoff_ignores_them() {
        let mut app = build_test_app();
        app.add_systems(Update, moon_liftoff_system);
        let craft = spawn_craft(&mut app, FlightState::CrashedMoon, 1.0);
        app.insert_resource(ControlInput {
            active: true,
            world_point: Vec2::ZERO,
        });

        app.update();
        assert_eq!(flight_state(&app, craft), FlightState::CrashedMoon);
        assert!(FlightState::CrashedMoon.is_terminal());
        assert!(!FlightState::LandedMoon.is_terminal());
    }
}
