//! Landing score computation and the running score board.
//!
//! Scoring is a pure function of the landing telemetry; the board tracks the
//! per-run result plus the cumulative and best totals, which persist through
//! the save collaborator.

use crate::config::TuningConfig;
use bevy::prelude::*;

/// Flight telemetry for one terminal landing, as consumed by [`score`].
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs {
    /// Contact-relative speed at impact.
    pub impact_speed: f32,
    /// Angular error from upright at impact, degrees.
    pub impact_angle: f32,
    /// Pad-centre accuracy in `[0, 1]`; ignored for moon landings.
    pub center_accuracy: f32,
    /// Remaining fuel fraction in `[0, 1]`.
    pub fuel_pct: f32,
    /// Flight time since launch, seconds.
    pub elapsed_sec: f32,
    /// Moon landings trade the angle and centre scores for a flat bonus.
    pub landed_moon: bool,
}

/// Per-landing score record. Every sub-score is already globally multiplied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub base: u32,
    pub time: u32,
    pub fuel: u32,
    pub speed: u32,
    pub angle: u32,
    pub center: u32,
    pub moon: u32,
    pub total: u32,
    /// Centre accuracy as a rounded percentage, for the perfect-landing check
    /// and the UI.
    pub center_pct: u32,
}

/// Running totals. `collected` and `best` persist across runs via the save
/// collaborator; `last` is the most recent landing only.
#[derive(Resource, Debug, Clone, Default)]
pub struct ScoreBoard {
    pub last: Option<ScoreBreakdown>,
    pub collected: u32,
    pub best: u32,
}

impl ScoreBoard {
    /// Record a landing. The cumulative total only grows for positive scores;
    /// returns `true` when a new best was set.
    pub fn commit(&mut self, breakdown: ScoreBreakdown) -> bool {
        self.last = Some(breakdown);
        if breakdown.total > 0 {
            self.collected += breakdown.total;
        }
        if breakdown.total > self.best {
            self.best = breakdown.total;
            true
        } else {
            false
        }
    }
}

/// Compute the weighted score for one landing.
///
/// The speed sub-score is always awarded, any surface. A moon landing adds
/// the flat moon bonus and forces the angle and centre sub-scores to zero;
/// every other landing does the reverse. Exactly one of the two groups is
/// ever nonzero.
pub fn score(inputs: &ScoreInputs, config: &TuningConfig) -> ScoreBreakdown {
    let boost = |raw: f32| -> u32 { (raw.max(0.0) * config.score_multiplier).round() as u32 };

    let mut breakdown = ScoreBreakdown::default();

    let time_raw = (config.time_bonus_max as f32
        - inputs.elapsed_sec * config.time_bonus_loss_per_second)
        .clamp(0.0, config.time_bonus_max as f32);
    breakdown.time = boost(time_raw);

    breakdown.fuel = boost(inputs.fuel_pct.clamp(0.0, 1.0) * config.fuel_weight as f32);

    breakdown.base = boost(config.base_landing_score as f32);

    let safe_speed = config.safe_speed.max(1e-4);
    let speed_q = ((safe_speed - inputs.impact_speed) / safe_speed).clamp(0.0, 1.0);
    breakdown.speed = boost(speed_q * config.speed_weight as f32);

    if inputs.landed_moon {
        breakdown.moon = boost(config.moon_landing_bonus as f32);
    } else {
        let safe_angle = config.safe_angle_deg.max(1e-4);
        let angle_q = ((safe_angle - inputs.impact_angle) / safe_angle).clamp(0.0, 1.0);
        let center_q = inputs.center_accuracy.clamp(0.0, 1.0);
        breakdown.angle = boost(angle_q * config.angle_weight as f32);
        breakdown.center = boost(center_q * config.center_weight as f32);
        breakdown.center_pct = (center_q * 100.0).round() as u32;
    }

    breakdown.total = breakdown.base
        + breakdown.time
        + breakdown.fuel
        + breakdown.speed
        + breakdown.angle
        + breakdown.center
        + breakdown.moon;
    breakdown
}
