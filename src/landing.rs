//! Surface contact classification.
//!
//! When the craft touches a tagged surface while flying, the contact is
//! classified against the per-surface safety thresholds and the craft moves to
//! a touchdown or crash state. The classification itself is a pure function so
//! the threshold logic is testable without a physics world.

use crate::config::TuningConfig;
use crate::constants::{GRAVITY_EPSILON_SQ, IMPACT_FEEDBACK_MAX_SPEED, IMPACT_FEEDBACK_MIN_SPEED,
    PERFECT_CENTER_PCT};
use crate::craft::flight::enter_crash_state;
use crate::craft::state::{Controls, Craft, EvaState, FlightState, Fuel, HeadingControl, RunClock};
use crate::events::{FlightStateChanged, ImpactFeedback, PerfectLanding};
use crate::gravity::GravityField;
use crate::level::{DeadZoneRegion, PadGeometry};
use crate::save::SaveData;
use crate::scoring::{score, ScoreBoard, ScoreInputs};
use crate::util::{delta_angle_deg, inverse_lerp};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use bevy_rapier2d::rapier::geometry::CollisionEventFlags;

/// What kind of terrain a collider represents. Untagged colliders count as
/// raw landscape.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Pad,
    Moon,
    Landscape,
}

/// Result of classifying one surface contact.
#[derive(Debug, Clone, Copy)]
pub struct LandingOutcome {
    pub surface: Option<SurfaceKind>,
    pub impact_speed: f32,
    pub angle_error: f32,
    pub vertical_speed: f32,
    pub ok_speed: bool,
    pub ok_angle: bool,
    pub ok_vertical: bool,
    pub state: FlightState,
}

/// Classify a surface contact.
///
/// Pad touchdowns need the impact speed, upright angle and vertical speed all
/// within threshold. Moon touchdowns only gate on impact speed, with the angle
/// measured against the local radial up rather than world up. Landscape (or
/// untagged) contact is always a crash.
pub fn classify(
    surface: Option<SurfaceKind>,
    rel_vel: Vec2,
    heading_deg: f32,
    gravity: Vec2,
    config: &TuningConfig,
) -> LandingOutcome {
    let down = if gravity.length_squared() >= GRAVITY_EPSILON_SQ {
        gravity.normalize()
    } else {
        -Vec2::Y
    };

    let impact_speed = rel_vel.length();
    let vertical_speed = rel_vel.dot(down).abs();

    // On the moon, upright means opposing the local pull. Everywhere else it
    // is world up, even when the field is mid-blend.
    let angle_error = match surface {
        Some(SurfaceKind::Moon) if gravity.length_squared() >= GRAVITY_EPSILON_SQ => {
            let up = -down;
            let desired = up.y.atan2(up.x).to_degrees() - 90.0;
            delta_angle_deg(desired, heading_deg).abs()
        }
        _ => delta_angle_deg(0.0, heading_deg).abs(),
    };

    let ok_speed = impact_speed <= config.safe_speed;
    let ok_angle = angle_error <= config.safe_angle_deg;
    let ok_vertical = vertical_speed <= config.safe_vertical_speed;

    let state = match surface {
        Some(SurfaceKind::Pad) if ok_speed && ok_angle && ok_vertical => FlightState::LandedPad,
        Some(SurfaceKind::Pad) => FlightState::CrashedPad,
        Some(SurfaceKind::Moon) if ok_speed => FlightState::LandedMoon,
        Some(SurfaceKind::Moon) => FlightState::CrashedMoon,
        Some(SurfaceKind::Landscape) | None => FlightState::CrashedLandscape,
    };

    LandingOutcome {
        surface,
        impact_speed,
        angle_error,
        vertical_speed,
        ok_speed,
        ok_angle,
        ok_vertical,
        state,
    }
}

/// Camera-shake intensity for an impact, in `[0, 1]`.
pub fn impact_intensity(impact_speed: f32) -> f32 {
    inverse_lerp(IMPACT_FEEDBACK_MIN_SPEED, IMPACT_FEEDBACK_MAX_SPEED, impact_speed)
}

/// Classify craft contacts and transition out of `Flying`.
///
/// Contacts arriving while the craft is not flying are ignored, which covers
/// both duplicate contact pairs on touchdown and scraping while parked on the
/// moon. Dead-zone sensors never reach this system (sensor contacts carry the
/// sensor flag).
#[allow(clippy::too_many_arguments)]
pub fn landing_contact_system(
    mut commands: Commands,
    mut collisions: MessageReader<CollisionEvent>,
    config: Res<TuningConfig>,
    field: Res<GravityField>,
    pad: Res<PadGeometry>,
    clock: Res<RunClock>,
    mut eva: ResMut<EvaState>,
    mut board: ResMut<ScoreBoard>,
    mut save: ResMut<SaveData>,
    surfaces: Query<&SurfaceKind>,
    zones: Query<(), With<DeadZoneRegion>>,
    mut crafts: Query<
        (
            Entity,
            &Transform,
            &Velocity,
            &HeadingControl,
            &Fuel,
            &mut FlightState,
            &mut Controls,
        ),
        With<Craft>,
    >,
    mut state_changed: MessageWriter<FlightStateChanged>,
    mut impacts: MessageWriter<ImpactFeedback>,
    mut perfect: MessageWriter<PerfectLanding>,
) {
    let Ok((entity, transform, velocity, heading, fuel, mut state, mut controls)) =
        crafts.single_mut()
    else {
        return;
    };

    for event in collisions.read() {
        let CollisionEvent::Started(e1, e2, flags) = event else {
            continue;
        };
        if flags.contains(CollisionEventFlags::SENSOR) {
            continue;
        }
        if *state != FlightState::Flying {
            continue;
        }
        let other = if *e1 == entity {
            *e2
        } else if *e2 == entity {
            *e1
        } else {
            continue;
        };
        if zones.contains(other) {
            continue;
        }

        let surface = surfaces.get(other).ok().copied();
        // Terrain colliders are static, so the craft velocity is already the
        // contact-relative velocity.
        let outcome = classify(
            surface,
            velocity.linvel,
            heading.current,
            field.current,
            &config,
        );
        info!(
            "contact: {:?} speed {:.2} angle {:.1} vertical {:.2} -> {}",
            surface,
            outcome.impact_speed,
            outcome.angle_error,
            outcome.vertical_speed,
            outcome.state.label()
        );

        match outcome.state {
            FlightState::LandedPad => {
                *state = FlightState::LandedPad;
                controls.enabled = false;
                settle_score(
                    &outcome,
                    false,
                    transform.translation.x,
                    fuel,
                    &clock,
                    &pad,
                    &config,
                    &mut board,
                    &mut save,
                    &mut perfect,
                );
                state_changed.write(FlightStateChanged {
                    state: FlightState::LandedPad,
                });
            }
            FlightState::LandedMoon => {
                // Quasi-terminal: controls stay live so a thrust command can
                // lift the craft back off.
                *state = FlightState::LandedMoon;
                // The moon bonus is awarded once per run, even if the craft
                // settles and re-contacts the surface after lift-off.
                if !eva.scored {
                    eva.scored = true;
                    settle_score(
                        &outcome,
                        true,
                        transform.translation.x,
                        fuel,
                        &clock,
                        &pad,
                        &config,
                        &mut board,
                        &mut save,
                        &mut perfect,
                    );
                }
                state_changed.write(FlightStateChanged {
                    state: FlightState::LandedMoon,
                });
            }
            crash => {
                enter_crash_state(
                    &mut commands,
                    entity,
                    state.as_mut(),
                    controls.as_mut(),
                    crash,
                    &mut state_changed,
                );
            }
        }

        impacts.write(ImpactFeedback {
            intensity: impact_intensity(outcome.impact_speed),
        });
    }
}

#[allow(clippy::too_many_arguments)]
fn settle_score(
    outcome: &LandingOutcome,
    landed_moon: bool,
    craft_x: f32,
    fuel: &Fuel,
    clock: &RunClock,
    pad: &PadGeometry,
    config: &TuningConfig,
    board: &mut ScoreBoard,
    save: &mut SaveData,
    perfect: &mut MessageWriter<PerfectLanding>,
) {
    let inputs = ScoreInputs {
        impact_speed: outcome.impact_speed,
        impact_angle: outcome.angle_error,
        center_accuracy: if landed_moon {
            0.0
        } else {
            pad.center_accuracy(craft_x)
        },
        fuel_pct: fuel.pct(),
        elapsed_sec: clock.elapsed,
        landed_moon,
    };
    let breakdown = score(&inputs, config);
    if landed_moon || breakdown.center_pct >= PERFECT_CENTER_PCT {
        perfect.write(PerfectLanding);
    }
    board.commit(breakdown);
    save.best_score = board.best;
    save.collected_score = board.collected;
    info!(
        "landing scored: total {} (base {} time {} fuel {} speed {} angle {} center {} moon {})",
        breakdown.total,
        breakdown.base,
        breakdown.time,
        breakdown.fuel,
        breakdown.speed,
        breakdown.angle,
        breakdown.center,
        breakdown.moon
    );
}
