//! Level generation: ridge terrain, the landing pad, the moon, the lateral
//! dead zones and craft placement.
//!
//! Terrain geometry is generated as pure functions over an injected RNG so the
//! shape logic stays testable; the systems wrap them with `thread_rng`.

use crate::config::TuningConfig;
use crate::craft::{self, state::*};
use crate::events::FlightStateChanged;
use crate::gravity::{GravityField, MoonAnchor};
use crate::landing::SurfaceKind;
use crate::save::SaveData;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use rand::Rng;

/// Current level, 1-based. Each pad landing advances it; terrain gets rougher
/// and the fuel buffer thinner as it climbs.
#[derive(Resource, Debug, Clone, Copy)]
pub struct Level(pub u32);

impl Default for Level {
    fn default() -> Self {
        Level(1)
    }
}

/// Marker for everything rebuilt on respawn.
#[derive(Component)]
pub struct LevelEntity;

/// Marker for the lateral no-fly sensor bands.
#[derive(Component)]
pub struct DeadZoneRegion;

/// Pad placement, used for centre-accuracy scoring and craft placement.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct PadGeometry {
    pub center_x: f32,
    pub surface_y: f32,
    pub half_width: f32,
}

impl PadGeometry {
    /// How close `x` is to the pad centre, `1.0` dead centre down to `0.0` at
    /// the pad edge or beyond.
    pub fn center_accuracy(&self, x: f32) -> f32 {
        if self.half_width <= 0.0 {
            return 0.0;
        }
        (1.0 - (x - self.center_x).abs() / self.half_width).clamp(0.0, 1.0)
    }
}

/// Terrain polyline for the gizmo renderer.
#[derive(Resource, Debug, Clone, Default)]
pub struct LandscapeShape(pub Vec<Vec2>);

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Level>()
            .init_resource::<PadGeometry>()
            .init_resource::<LandscapeShape>()
            .add_systems(Startup, setup_level)
            .add_systems(Update, respawn_on_key_system);
    }
}

/// Generate the ridge profile for one level: a jagged polyline across the
/// world, flattened to the pad surface across the pad span.
pub fn ridge_profile(
    rng: &mut impl Rng,
    config: &TuningConfig,
    level: u32,
    pad_x: f32,
) -> Vec<Vec2> {
    let segments = crate::constants::LANDSCAPE_SEGMENTS;
    let half = config.landscape_half_width;
    let roughness = config.landscape_roughness * (1.0 + 0.25 * (level.saturating_sub(1)) as f32);
    let pad_span = config.pad_half_width + 1.0;

    let mut points = Vec::with_capacity(segments + 1);
    for i in 0..=segments {
        let x = -half + (i as f32 / segments as f32) * (2.0 * half);
        let y = if (x - pad_x).abs() <= pad_span {
            config.landscape_base_y
        } else {
            config.landscape_base_y + rng.gen_range(0.0..=roughness)
        };
        points.push(Vec2::new(x, y.max(config.min_world_y)));
    }
    points
}

/// Starting fuel for a run: proportional to the straight-line distance to the
/// pad, with a safety buffer that thins by 1/30 per level and bottoms out at
/// zero (level 12 with the default 40% buffer).
pub fn start_fuel(spawn: Vec2, pad: Vec2, level: u32, config: &TuningConfig) -> f32 {
    let distance = spawn.distance(pad);
    let buffer = 1.0 + (config.fuel_buffer_percent - level as f32 / 30.0).max(0.0);
    distance * config.fuel_per_unit * buffer
}

/// Pick a spawn point near the pad: laterally within the configured band,
/// vertically between the min and max clearance above the pad surface.
pub fn spawn_position(rng: &mut impl Rng, pad: Vec2, config: &TuningConfig) -> Vec2 {
    let x = pad.x + rng.gen_range(-config.max_distance_x_to_pad..=config.max_distance_x_to_pad);
    let y = pad.y + rng.gen_range(config.min_distance_y_to_pad..=config.max_distance_y_to_pad);
    Vec2::new(x, y.max(config.min_world_y))
}

fn setup_level(mut commands: Commands, config: Res<TuningConfig>, level: Res<Level>) {
    build_level(&mut commands, &config, level.0);
}

/// Spawn terrain, pad, moon and dead zones for `level`, then place the craft.
pub fn build_level(commands: &mut Commands, config: &TuningConfig, level: u32) {
    let mut rng = rand::thread_rng();

    let margin = config.pad_half_width + 8.0;
    let pad_x = rng.gen_range(-(config.landscape_half_width - margin)..=config.landscape_half_width - margin);
    let pad_surface_y = config.landscape_base_y + config.pad_half_height;
    let pad_center = Vec2::new(pad_x, pad_surface_y);

    let profile = ridge_profile(&mut rng, config, level, pad_x);
    commands.insert_resource(LandscapeShape(profile.clone()));
    commands.spawn((
        LevelEntity,
        SurfaceKind::Landscape,
        RigidBody::Fixed,
        Collider::polyline(profile, None),
        Transform::default(),
    ));

    commands.spawn((
        LevelEntity,
        SurfaceKind::Pad,
        RigidBody::Fixed,
        Collider::cuboid(config.pad_half_width, config.pad_half_height),
        Sprite::from_color(
            Color::srgb(0.3, 0.9, 0.5),
            Vec2::new(config.pad_half_width * 2.0, config.pad_half_height * 2.0),
        ),
        Transform::from_xyz(pad_x, config.landscape_base_y, 0.0),
    ));
    commands.insert_resource(PadGeometry {
        center_x: pad_x,
        surface_y: pad_surface_y,
        half_width: config.pad_half_width,
    });

    let moon_center = Vec2::new(config.moon_center_x, config.moon_center_y);
    commands.spawn((
        LevelEntity,
        SurfaceKind::Moon,
        RigidBody::Fixed,
        Collider::ball(config.moon_surface_radius),
        Sprite::from_color(
            Color::srgb(0.7, 0.7, 0.75),
            Vec2::splat(config.moon_surface_radius * 2.0),
        ),
        Transform::from_translation(moon_center.extend(0.0)),
    ));
    commands.insert_resource(MoonAnchor(moon_center));

    // Sensor bands just past both world edges. Tall enough that the craft
    // cannot fly over them.
    for side in [-1.0f32, 1.0] {
        let x = side * (config.landscape_half_width + config.dead_zone_band_width / 2.0);
        commands.spawn((
            LevelEntity,
            DeadZoneRegion,
            Sensor,
            Collider::cuboid(config.dead_zone_band_width / 2.0, 400.0),
            ActiveEvents::COLLISION_EVENTS,
            Transform::from_xyz(x, 0.0, 0.0),
        ));
    }

    let spawn = spawn_position(&mut rng, pad_center, config);
    let fuel = start_fuel(spawn, pad_center, level, config);
    craft::spawn_craft(commands, config, spawn, fuel);
    info!(
        "level {level}: pad at x {pad_x:.1}, spawn {spawn:?}, start fuel {fuel:.2}"
    );
}

/// Tear the run down and rebuild on `R`.
///
/// A pad landing advances to the next level first; any other state replays the
/// current one. All per-run resources reset atomically here so no stale timer
/// or blend survives into the new run.
#[allow(clippy::too_many_arguments)]
pub fn respawn_on_key_system(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    config: Res<TuningConfig>,
    mut level: ResMut<Level>,
    mut save: ResMut<SaveData>,
    mut field: ResMut<GravityField>,
    mut input: ResMut<ControlInput>,
    mut thrust: ResMut<ThrustActive>,
    mut clock: ResMut<RunClock>,
    mut fuel_timer: ResMut<FuelEmptyTimer>,
    mut zone_timer: ResMut<DeadZoneTimer>,
    mut eva: ResMut<EvaState>,
    crafts: Query<(Entity, &FlightState), With<Craft>>,
    doomed: Query<Entity, With<LevelEntity>>,
    mut state_changed: MessageWriter<FlightStateChanged>,
) {
    if !keyboard.just_pressed(KeyCode::KeyR) {
        return;
    }
    let Ok((craft, state)) = crafts.single() else {
        return;
    };

    if *state == FlightState::LandedPad {
        level.0 += 1;
    }
    save.level = level.0;

    commands.entity(craft).despawn();
    for entity in &doomed {
        commands.entity(entity).despawn();
    }

    *field = GravityField::default();
    *input = ControlInput::default();
    *thrust = ThrustActive::default();
    *clock = RunClock::default();
    *fuel_timer = FuelEmptyTimer::default();
    *zone_timer = DeadZoneTimer::default();
    *eva = EvaState::default();

    build_level(&mut commands, &config, level.0);
    // Clears the outcome banner; the fresh craft sits pre-launch.
    state_changed.write(FlightStateChanged {
        state: FlightState::None,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cfg() -> TuningConfig {
        TuningConfig::default()
    }

    #[test]
    fn ridge_is_flat_across_the_pad_span() {
        let config = cfg();
        let mut rng = StdRng::seed_from_u64(7);
        let pad_x = 10.0;
        let profile = ridge_profile(&mut rng, &config, 1, pad_x);
        for point in profile
            .iter()
            .filter(|p| (p.x - pad_x).abs() <= config.pad_half_width)
        {
            assert_eq!(point.y, config.landscape_base_y);
        }
    }

    #[test]
    fn ridge_spans_the_whole_world_and_respects_the_floor() {
        let config = cfg();
        let mut rng = StdRng::seed_from_u64(7);
        let profile = ridge_profile(&mut rng, &config, 3, 0.0);
        assert_eq!(profile.len(), crate::constants::LANDSCAPE_SEGMENTS + 1);
        assert_eq!(profile.first().unwrap().x, -config.landscape_half_width);
        assert_eq!(profile.last().unwrap().x, config.landscape_half_width);
        assert!(profile.iter().all(|p| p.y >= config.min_world_y));
    }

    #[test]
    fn higher_levels_generate_rougher_ridges() {
        let config = cfg();
        let peak = |level: u32| {
            let mut rng = StdRng::seed_from_u64(42);
            ridge_profile(&mut rng, &config, level, 0.0)
                .iter()
                .map(|p| p.y - config.landscape_base_y)
                .fold(0.0f32, f32::max)
        };
        assert!(peak(5) > peak(1));
    }

    #[test]
    fn start_fuel_grows_with_distance_and_shrinks_with_level() {
        let config = cfg();
        let pad = Vec2::ZERO;
        let near = start_fuel(Vec2::new(0.0, 6.0), pad, 1, &config);
        let far = start_fuel(Vec2::new(0.0, 12.0), pad, 1, &config);
        assert!(far > near);

        let veteran = start_fuel(Vec2::new(0.0, 12.0), pad, 4, &config);
        assert!(veteran < far);
        assert!(veteran > 12.0 * config.fuel_per_unit);
    }

    #[test]
    fn fuel_buffer_bottoms_out_at_the_bare_distance_cost() {
        let config = cfg();
        let pad = Vec2::ZERO;
        let spawn = Vec2::new(0.0, 12.0);
        // Default 40% buffer thins by 1/30 per level, hitting zero at 12.
        let floor = start_fuel(spawn, pad, 12, &config);
        assert!((floor - 12.0 * config.fuel_per_unit).abs() < 1e-5);
        assert_eq!(start_fuel(spawn, pad, 30, &config), floor);
    }

    #[test]
    fn spawn_lands_inside_the_configured_band() {
        let config = cfg();
        let pad = Vec2::new(5.0, -5.75);
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..50 {
            let pos = spawn_position(&mut rng, pad, &config);
            assert!((pos.x - pad.x).abs() <= config.max_distance_x_to_pad);
            assert!(pos.y - pad.y >= config.min_distance_y_to_pad - 1e-5);
            assert!(pos.y - pad.y <= config.max_distance_y_to_pad + 1e-5);
        }
    }

    #[test]
    fn center_accuracy_peaks_at_the_centre_and_dies_at_the_edge() {
        let pad = PadGeometry {
            center_x: 10.0,
            surface_y: 0.0,
            half_width: 2.0,
        };
        assert_eq!(pad.center_accuracy(10.0), 1.0);
        assert_eq!(pad.center_accuracy(11.0), 0.5);
        assert_eq!(pad.center_accuracy(12.0), 0.0);
        assert_eq!(pad.center_accuracy(20.0), 0.0);
        assert_eq!(pad.center_accuracy(9.0), 0.5);
    }
}
