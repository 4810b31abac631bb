//! Craft components and simulation resources.
//!
//! All ECS components and Bevy resources that describe the craft live here.
//! Systems that mutate this state are in the sibling modules:
//! - [`super::control`] — analog steering, thrust, fuel burn, fall clamp
//! - [`super::flight`] — discrete flight-state machine, failure timers
//!
//! The **input abstraction** ([`ControlInput`]) keeps the actuator fully
//! testable: tests populate the resource directly and run the fixed-step
//! systems without a pointer device.

use crate::constants::{DEAD_ZONE_EXPLODE_DELAY, FUEL_MAX};
use bevy::prelude::*;

// ── Components ─────────────────────────────────────────────────────────────────

/// Marker component for the craft entity.
#[derive(Component)]
pub struct Craft;

/// Discrete flight state. Attached to the craft entity; every transition goes
/// through [`super::flight`] or the landing classifier.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlightState {
    /// Pre-launch; the craft exists but the run has not started.
    #[default]
    None,
    Flying,
    LandedPad,
    LandedMoon,
    CrashedLandscape,
    CrashedMoon,
    CrashedPad,
    OutOfFuel,
    DeadZone,
}

impl FlightState {
    /// True for every state that ends the run. `LandedMoon` is quasi-terminal:
    /// the craft may lift off again, so it is deliberately not listed here.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::LandedPad
                | Self::CrashedLandscape
                | Self::CrashedMoon
                | Self::CrashedPad
                | Self::OutOfFuel
                | Self::DeadZone
        )
    }

    /// True for the destructive outcomes (the craft wreck is hidden and frozen).
    pub fn is_crash(self) -> bool {
        matches!(
            self,
            Self::CrashedLandscape
                | Self::CrashedMoon
                | Self::CrashedPad
                | Self::OutOfFuel
                | Self::DeadZone
        )
    }

    /// Short display label for the HUD banner.
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Flying => "",
            Self::LandedPad => "TOUCHDOWN",
            Self::LandedMoon => "MOON LANDING",
            Self::CrashedLandscape => "CRASHED",
            Self::CrashedMoon => "CRASHED INTO THE MOON",
            Self::CrashedPad => "CRASHED ON THE PAD",
            Self::OutOfFuel => "OUT OF FUEL",
            Self::DeadZone => "LOST IN THE DEAD ZONE",
        }
    }
}

/// Whether player input currently reaches the actuator. Disabled on every
/// terminal state and before launch.
#[derive(Component, Default)]
pub struct Controls {
    pub enabled: bool,
}

/// Fuel tank. `current` is clamped to `[0, capacity]` by every mutation.
#[derive(Component, Debug, Clone, Copy)]
pub struct Fuel {
    pub current: f32,
    pub capacity: f32,
}

impl Default for Fuel {
    fn default() -> Self {
        Self {
            current: FUEL_MAX,
            capacity: FUEL_MAX,
        }
    }
}

impl Fuel {
    /// Remaining fraction in `[0, 1]`; 0 for a degenerate capacity.
    pub fn pct(&self) -> f32 {
        if self.capacity <= 0.0 {
            0.0
        } else {
            (self.current / self.capacity).clamp(0.0, 1.0)
        }
    }

    /// Burn `amount` fuel, clamped at empty.
    pub fn burn(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }

    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }
}

/// Control-response baseline captured once at spawn and never mutated.
///
/// Space tuning recomputes the effective values each tick as
/// `base × lerp(1, factor, zero_blend)` — always relative to this baseline,
/// never compounding.
#[derive(Component, Debug, Clone, Copy)]
pub struct BaseTuning {
    pub rotation_speed: f32,
    pub rotation_smooth: f32,
    pub thrust_force: f32,
}

/// Effective per-tick control-response values after space tuning.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct SpaceTuning {
    pub rotation_speed: f32,
    pub rotation_smooth: f32,
    pub thrust_force: f32,
}

/// Heading integrator state, all in degrees.
///
/// `target` accumulates steering and rotation-assist input; `current` chases
/// it through a per-tick angular lerp — that lag, not direct angle-setting,
/// is what produces the characteristic heavy rotation feel.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct HeadingControl {
    /// Commanded heading, degrees CCW from world up.
    pub target: f32,
    /// Smoothed actual heading, normalized to `[0, 360)` after each update.
    pub current: f32,
    /// Smoothed steering intensity in `[-1, 1]`.
    pub steer: f32,
}

// ── Resources ──────────────────────────────────────────────────────────────────

/// Pointer sample for the current tick, written by the input provider.
///
/// The core is agnostic to whether the source is mouse, touch, or synthetic;
/// it only sees an on/off flag and a world-space target point.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct ControlInput {
    pub active: bool,
    pub world_point: Vec2,
}

/// Tracks whether the thrust sound is currently on, so [`crate::events::ThrustAudio`]
/// is only emitted on transitions.
#[derive(Resource, Debug, Default)]
pub struct ThrustActive(pub bool);

/// Continuous-empty fuel watchdog.
///
/// `elapsed` accumulates only while the tank stays empty; any refuel resets
/// it to zero. Once `triggered`, the out-of-fuel failure has fired and the
/// watchdog stays quiet until the next reset.
#[derive(Resource, Debug, Default)]
pub struct FuelEmptyTimer {
    pub elapsed: f32,
    pub triggered: bool,
}

/// Dead-zone occupancy countdown.
///
/// Armed while the craft overlaps a dead-zone sensor. Leaving the zone — by
/// player action or otherwise — resets `remaining` to the full delay; there
/// is no partial carry-over across visits.
#[derive(Resource, Debug)]
pub struct DeadZoneTimer {
    pub armed: bool,
    pub remaining: f32,
}

impl Default for DeadZoneTimer {
    fn default() -> Self {
        Self {
            armed: false,
            remaining: DEAD_ZONE_EXPLODE_DELAY,
        }
    }
}

/// Moon-visit bookkeeping owned by the external EVA collaborator.
///
/// `parked` blocks the lift-off transition while the astronaut is outside;
/// `scored` ensures a single moon visit is only scored once even across
/// repeated touch-and-go contacts.
#[derive(Resource, Debug, Default)]
pub struct EvaState {
    pub parked: bool,
    pub scored: bool,
}

/// Elapsed flight time of the current run, for the time bonus.
#[derive(Resource, Debug, Default)]
pub struct RunClock {
    pub elapsed: f32,
}

/// Read-only telemetry snapshot for the UI collaborator.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct CraftTelemetry {
    pub speed: f32,
    pub altitude: f32,
    pub fuel_pct: f32,
}
