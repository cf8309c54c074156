//! Level data
//!
//! Levels are RON files embedded at compile time (WASM can't enumerate
//! directories at runtime). Each one carries solid platform rects, exit
//! regions, categorized spawn points, camera bounds, and a background
//! color. Missing spawn categories deserialize to empty lists - a level
//! with no patrolling guys is valid data, not an error.

use serde::Deserialize;

/// An axis-aligned region: `x`/`y` is the center, `w`/`h` the full size.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Spawn coordinates by entity category.
#[derive(Debug, Clone, Deserialize)]
pub struct SpawnPoints {
    pub player: (f32, f32),
    #[serde(default)]
    pub flames: Vec<(f32, f32)>,
    #[serde(default)]
    pub guys: Vec<(f32, f32)>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LevelData {
    /// Background clear color, 0-255 RGB.
    pub background: (u8, u8, u8),
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    /// Level extent for camera clamping, from the origin.
    pub bounds: (f32, f32),
    pub platforms: Vec<Region>,
    #[serde(default)]
    pub exits: Vec<Region>,
    pub spawn: SpawnPoints,
}

fn default_gravity() -> f32 {
    2100.0
}

#[derive(Debug)]
pub enum LevelError {
    /// No level data registered under that scene name.
    Unknown(String),
    /// RON parse failure.
    Parse(String),
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::Unknown(name) => write!(f, "no level data for scene '{}'", name),
            LevelError::Parse(msg) => write!(f, "level parse error: {}", msg),
        }
    }
}

impl std::error::Error for LevelError {}

const LEVEL_1: &str = include_str!("../assets/levels/level-1.ron");
const LEVEL_2: &str = include_str!("../assets/levels/level-2.ron");
const LEVEL_3: &str = include_str!("../assets/levels/level-3.ron");

/// Embedded level source for a gameplay scene name.
fn source_for(scene: &str) -> Option<&'static str> {
    match scene {
        "level-1" => Some(LEVEL_1),
        "level-2" => Some(LEVEL_2),
        "level-3" => Some(LEVEL_3),
        _ => None,
    }
}

/// True if the scene name has level data (i.e. is a gameplay scene).
pub fn is_level_scene(scene: &str) -> bool {
    source_for(scene).is_some()
}

/// Load and parse the level for a gameplay scene.
pub fn load(scene: &str) -> Result<LevelData, LevelError> {
    let source = source_for(scene).ok_or_else(|| LevelError::Unknown(scene.to_string()))?;
    ron::from_str(source).map_err(|e| LevelError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_embedded_levels_parse() {
        for scene in ["level-1", "level-2", "level-3"] {
            let level = load(scene).unwrap_or_else(|e| panic!("{scene}: {e}"));
            assert!(!level.platforms.is_empty(), "{scene} has no geometry");
            assert!(!level.exits.is_empty(), "{scene} has no exit");
            assert!(level.gravity > 0.0);
            assert!(level.bounds.0 > 0.0 && level.bounds.1 > 0.0);
        }
    }

    #[test]
    fn unknown_scene_is_an_error() {
        assert!(matches!(load("end"), Err(LevelError::Unknown(_))));
        assert!(!is_level_scene("start"));
        assert!(is_level_scene("level-2"));
    }

    #[test]
    fn missing_spawn_categories_default_to_empty() {
        let level: LevelData = ron::from_str(
            r#"(
                background: (0, 0, 0),
                bounds: (1000.0, 600.0),
                platforms: [(x: 500.0, y: 500.0, w: 1000.0, h: 40.0)],
                exits: [(x: 950.0, y: 420.0, w: 40.0, h: 120.0)],
                spawn: (player: (100.0, 400.0)),
            )"#,
        )
        .unwrap();
        assert!(level.spawn.flames.is_empty());
        assert!(level.spawn.guys.is_empty());
        assert_eq!(level.gravity, 2100.0, "gravity defaults when omitted");
    }
}
