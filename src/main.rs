use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier2d::prelude::*;

use perilune::{config, craft, events, graphics, hud, level, save};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Perilune".into(),
                resolution: WindowResolution::new(1100, 720),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        // Insert TuningConfig with compiled defaults; load_tuning_config will
        // overwrite it from assets/tuning.toml (if present) in Startup.
        .insert_resource(config::TuningConfig::default())
        // pixels_per_meter(1.0) keeps world units identical to physics units,
        // so the force and gravity constants apply unscaled.
        .add_plugins(
            RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(1.0).in_fixed_schedule(),
        )
        .add_plugins((
            events::EventsPlugin,
            save::SavePlugin,
            level::LevelPlugin,
            craft::CraftPlugin,
            graphics::GraphicsPlugin,
            hud::HudPlugin,
        ))
        // PreStartup so every Startup system (level build, camera, HUD) sees
        // the final tuning values.
        .add_systems(
            PreStartup,
            (config::load_tuning_config, config::validate_tuning_config).chain(),
        )
        .run();
}
