//! Perilune: a 2D lunar-lander flight simulation.
//!
//! A blended gravity field (surface pull, a moon well and a zero-g band),
//! an analog touch-to-steer craft with limited fuel, per-surface landing
//! rules and a weighted score for every touchdown.

pub mod config;
pub mod constants;
pub mod craft;
pub mod error;
pub mod events;
pub mod graphics;
pub mod gravity;
pub mod hud;
pub mod landing;
pub mod level;
pub mod save;
pub mod scoring;
pub mod util;
