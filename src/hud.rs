//! On-screen flight HUD: live telemetry, the flight-state banner with the
//! score breakdown, and the dead-zone warning.

use crate::craft::state::{CraftTelemetry, FlightState};
use crate::config::TuningConfig;
use crate::events::{DeadZoneWarning, FlightStateChanged};
use crate::scoring::ScoreBoard;
use bevy::prelude::*;

#[derive(Component)]
pub struct TelemetryText;

#[derive(Component)]
pub struct StateBanner;

#[derive(Component)]
pub struct WarningText;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_hud).add_systems(
            Update,
            (
                telemetry_text_system,
                state_banner_system,
                dead_zone_warning_system,
            ),
        );
    }
}

fn setup_hud(mut commands: Commands, config: Res<TuningConfig>) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            top: Val::Px(10.0),
            ..default()
        },
        TelemetryText,
        Text::new("SPD 0.0 | ALT 0.0 | FUEL 100%"),
        TextFont {
            font_size: config.hud_font_size,
            ..default()
        },
        TextColor(Color::srgb(0.7, 0.9, 1.0)),
    ));

    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            top: Val::Px(16.0 + config.hud_font_size),
            ..default()
        },
        StateBanner,
        Text::new(""),
        TextFont {
            font_size: config.hud_font_size * 1.25,
            ..default()
        },
        TextColor(Color::srgb(0.95, 0.88, 0.45)),
    ));

    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            right: Val::Px(12.0),
            top: Val::Px(10.0),
            ..default()
        },
        WarningText,
        Text::new("DEAD ZONE - TURN BACK"),
        TextFont {
            font_size: config.hud_font_size * 1.25,
            ..default()
        },
        TextColor(Color::srgb(1.0, 0.25, 0.2)),
        Visibility::Hidden,
    ));
}

fn telemetry_text_system(
    telemetry: Res<CraftTelemetry>,
    mut query: Query<&mut Text, With<TelemetryText>>,
) {
    let Ok(mut text) = query.single_mut() else {
        return;
    };
    *text = Text::new(format!(
        "SPD {:.1} | ALT {:.1} | FUEL {:.0}%",
        telemetry.speed,
        telemetry.altitude,
        telemetry.fuel_pct * 100.0
    ));
}

fn state_banner_system(
    mut changes: MessageReader<FlightStateChanged>,
    board: Res<ScoreBoard>,
    mut query: Query<&mut Text, With<StateBanner>>,
) {
    let Ok(mut text) = query.single_mut() else {
        return;
    };
    for change in changes.read() {
        *text = match change.state {
            FlightState::Flying | FlightState::None => Text::new(""),
            FlightState::LandedPad => {
                if let Some(b) = board.last {
                    Text::new(format!(
                        "TOUCHDOWN! {} pts (base {} + time {} + fuel {} + speed {} + angle {} + center {})\nBest {} | Total {} | R: next level",
                        b.total, b.base, b.time, b.fuel, b.speed, b.angle, b.center,
                        board.best, board.collected
                    ))
                } else {
                    Text::new("TOUCHDOWN! R: next level")
                }
            }
            FlightState::LandedMoon => {
                let bonus = board.last.map(|b| b.total).unwrap_or(0);
                Text::new(format!(
                    "MOON LANDING! {bonus} pts. Thrust to lift off, E for EVA"
                ))
            }
            crash => Text::new(format!("{} - R to retry", crash.label().to_uppercase())),
        };
    }
}

fn dead_zone_warning_system(
    mut warnings: MessageReader<DeadZoneWarning>,
    mut query: Query<&mut Visibility, With<WarningText>>,
) {
    let Ok(mut visibility) = query.single_mut() else {
        return;
    };
    for warning in warnings.read() {
        *visibility = if warning.active {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }
}
