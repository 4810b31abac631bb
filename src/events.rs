//! Fire-and-forget notification messages for the excluded collaborators
//! (audio, camera shake, UI).
//!
//! The simulation core writes these and never waits on a consumer; a missing
//! listener is not an error. The platform audio layer attaches at
//! [`audio_bridge_system`], which currently just traces the notifications.

use crate::craft::state::FlightState;
use bevy::prelude::*;

/// Thrust sound on/off. Emitted only on transitions, not every tick.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrustAudio {
    pub active: bool,
}

/// Surface impact, for crash audio and camera shake.
#[derive(Message, Debug, Clone, Copy)]
pub struct ImpactFeedback {
    /// 0 at a gentle touch, 1 at a devastating impact.
    pub intensity: f32,
}

/// Centre accuracy ≥ threshold, or any moon landing.
#[derive(Message, Debug, Clone, Copy)]
pub struct PerfectLanding;

/// The craft's discrete state changed; carries the new state for the UI.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlightStateChanged {
    pub state: FlightState,
}

/// Dead-zone countdown armed or cleared; drives the UI warning banner.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadZoneWarning {
    pub active: bool,
}

pub struct EventsPlugin;

impl Plugin for EventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ThrustAudio>()
            .add_message::<ImpactFeedback>()
            .add_message::<PerfectLanding>()
            .add_message::<FlightStateChanged>()
            .add_message::<DeadZoneWarning>()
            .add_systems(Update, audio_bridge_system);
    }
}

/// Seam for the platform audio layer. Consumes the audio-facing messages so
/// they are drained even with no real mixer attached.
pub fn audio_bridge_system(
    mut thrust: MessageReader<ThrustAudio>,
    mut impacts: MessageReader<ImpactFeedback>,
    mut perfect: MessageReader<PerfectLanding>,
) {
    for msg in thrust.read() {
        debug!("audio: thrust {}", if msg.active { "on" } else { "off" });
    }
    for msg in impacts.read() {
        debug!("audio: impact intensity {:.2}", msg.intensity);
    }
    for _ in perfect.read() {
        debug!("audio: perfect landing chime");
    }
}
