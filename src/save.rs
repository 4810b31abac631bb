//! Persistent progress: best score, cumulative score and current level,
//! stored as TOML under `saves/`.

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::level::Level;
use crate::scoring::ScoreBoard;

const SAVE_VERSION: u32 = 1;

/// On-disk progress record. Also lives in the world as a resource so gameplay
/// systems can update it without touching the filesystem; [`autosave_system`]
/// flushes changes to disk.
#[derive(Resource, Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SaveData {
    pub version: u32,
    pub saved_at_unix: u64,
    pub best_score: u32,
    pub collected_score: u32,
    pub level: u32,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            version: SAVE_VERSION,
            saved_at_unix: 0,
            best_score: 0,
            collected_score: 0,
            level: 1,
        }
    }
}

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        let data = match load_progress() {
            Ok(data) => {
                info!(
                    "loaded progress: best {} collected {} level {}",
                    data.best_score, data.collected_score, data.level
                );
                data
            }
            Err(err) => {
                info!("no usable progress file ({err}); starting fresh");
                SaveData::default()
            }
        };
        app.insert_resource(Level(data.level.max(1)))
            .insert_resource(ScoreBoard {
                last: None,
                collected: data.collected_score,
                best: data.best_score,
            })
            .insert_resource(data)
            .add_systems(Update, autosave_system);
    }
}

fn save_dir() -> PathBuf {
    PathBuf::from("saves")
}

fn progress_path() -> PathBuf {
    save_dir().join("progress.toml")
}

pub fn load_progress() -> Result<SaveData, String> {
    let path = progress_path();
    let contents = fs::read_to_string(&path)
        .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
    parse_progress(&contents)
}

fn parse_progress(contents: &str) -> Result<SaveData, String> {
    let data: SaveData =
        toml::from_str(contents).map_err(|err| format!("failed to parse progress TOML: {err}"))?;
    if data.version != SAVE_VERSION {
        return Err(format!(
            "unsupported progress version {} (expected {})",
            data.version, SAVE_VERSION
        ));
    }
    Ok(data)
}

pub fn write_progress(data: &SaveData) -> Result<(), String> {
    fs::create_dir_all(save_dir()).map_err(|err| format!("failed to create save dir: {err}"))?;
    let serialized = toml::to_string_pretty(data)
        .map_err(|err| format!("failed to serialize progress TOML: {err}"))?;
    let path = progress_path();
    fs::write(&path, serialized).map_err(|err| format!("failed to write {}: {err}", path.display()))
}

fn current_unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Flush the progress resource to disk whenever gameplay mutates it.
pub fn autosave_system(mut save: ResMut<SaveData>) {
    if !save.is_changed() || save.is_added() {
        return;
    }
    save.bypass_change_detection().saved_at_unix = current_unix_timestamp();
    if let Err(err) = write_progress(&save) {
        error!("failed to persist progress: {err}");
    }
}
