//! Camera and line-work rendering.
//!
//! Terrain, the moon outline, the dead-zone fences and the thrust flame are
//! all drawn with gizmos; only the craft and pad carry sprites.

use crate::config::TuningConfig;
use crate::craft::state::{Craft, ThrustActive};
use crate::events::ImpactFeedback;
use crate::gravity::MoonAnchor;
use crate::level::LandscapeShape;
use bevy::prelude::*;

const ASSUMED_WINDOW_HEIGHT: f32 = 720.0;
const SHAKE_MAX_OFFSET: f32 = 0.6;
const SHAKE_DECAY_PER_SEC: f32 = 1.8;

/// Screen-shake intensity, fed by impact feedback and decaying over time.
#[derive(Resource, Debug, Default)]
pub struct CameraShake {
    pub trauma: f32,
}

pub struct GraphicsPlugin;

impl Plugin for GraphicsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraShake>()
            .add_systems(Startup, setup_camera)
            .add_systems(
                Update,
                (
                    camera_follow_system,
                    camera_shake_system,
                    landscape_gizmo_system,
                    thrust_flame_system,
                ),
            );
    }
}

pub fn setup_camera(mut commands: Commands, config: Res<TuningConfig>) {
    commands.spawn((
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scale: config.camera_view_height / ASSUMED_WINDOW_HEIGHT,
            ..OrthographicProjection::default_2d()
        }),
    ));
}

/// Trail the craft with exponential smoothing so touchdown reads steady.
pub fn camera_follow_system(
    time: Res<Time>,
    config: Res<TuningConfig>,
    crafts: Query<&Transform, (With<Craft>, Without<Camera2d>)>,
    mut cameras: Query<&mut Transform, With<Camera2d>>,
) {
    let Ok(target) = crafts.single() else {
        return;
    };
    let Ok(mut camera) = cameras.single_mut() else {
        return;
    };
    let k = 1.0 - (-config.camera_follow_rate * time.delta_secs()).exp();
    let goal = target.translation.truncate();
    let pos = camera.translation.truncate().lerp(goal, k);
    camera.translation.x = pos.x;
    camera.translation.y = pos.y;
}

/// Kick the camera on impact and let the jitter ring down.
pub fn camera_shake_system(
    time: Res<Time>,
    mut impacts: MessageReader<ImpactFeedback>,
    mut shake: ResMut<CameraShake>,
    mut cameras: Query<&mut Transform, With<Camera2d>>,
) {
    for impact in impacts.read() {
        shake.trauma = (shake.trauma + impact.intensity).min(1.0);
    }
    if shake.trauma <= 0.0 {
        return;
    }
    shake.trauma = (shake.trauma - SHAKE_DECAY_PER_SEC * time.delta_secs()).max(0.0);

    let Ok(mut camera) = cameras.single_mut() else {
        return;
    };
    let t = time.elapsed_secs();
    let amplitude = shake.trauma * shake.trauma * SHAKE_MAX_OFFSET;
    camera.translation.x += amplitude * (t * 37.0).sin();
    camera.translation.y += amplitude * (t * 53.0).cos();
}

pub fn landscape_gizmo_system(
    mut gizmos: Gizmos,
    config: Res<TuningConfig>,
    shape: Res<LandscapeShape>,
    moon: Option<Res<MoonAnchor>>,
) {
    for pair in shape.0.windows(2) {
        gizmos.line_2d(pair[0], pair[1], Color::WHITE);
    }

    if let Some(moon) = moon {
        gizmos.circle_2d(moon.0, config.moon_surface_radius, Color::srgb(0.7, 0.7, 0.75));
    }

    for side in [-1.0f32, 1.0] {
        let x = side * config.landscape_half_width;
        gizmos.line_2d(
            Vec2::new(x, config.landscape_base_y - 5.0),
            Vec2::new(x, config.landscape_base_y + 80.0),
            Color::srgb(0.8, 0.2, 0.2),
        );
    }
}

/// Draw the exhaust flame under the craft while thrust is active.
pub fn thrust_flame_system(
    mut gizmos: Gizmos,
    thrust: Res<ThrustActive>,
    crafts: Query<&Transform, With<Craft>>,
) {
    if !thrust.0 {
        return;
    }
    let Ok(transform) = crafts.single() else {
        return;
    };
    let pos = transform.translation.truncate();
    let down = (transform.rotation * Vec3::NEG_Y).truncate();
    let right = (transform.rotation * Vec3::X).truncate();
    let nozzle = pos + down * 0.7;
    let tip = pos + down * 1.5;
    gizmos.line_2d(nozzle - right * 0.25, tip, Color::srgb(1.0, 0.6, 0.1));
    gizmos.line_2d(nozzle + right * 0.25, tip, Color::srgb(1.0, 0.6, 0.1));
}
