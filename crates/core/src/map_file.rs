//! Per-level map persistence. One JSON file per level holding a row-major
//! `tiles` array of `{type, traversable}` records; cell coordinates are
//! recomputed from the index on load, never read from the file.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::types::TileKind;
use crate::world::{Tile, World};

/// One persisted cell. `type` is the tile wire code.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
struct CellRecord {
    #[serde(rename = "type")]
    kind: u8,
    traversable: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct MapFile {
    tiles: Vec<CellRecord>,
}

#[derive(Debug)]
pub enum MapLoadError {
    Io(io::Error),
    /// The top-level `tiles` array is absent.
    MissingField,
    /// The file is not the expected JSON shape.
    Malformed { message: String },
    /// The cell count does not match the configured grid.
    CellCount { expected: usize, found: usize },
    /// A cell carries a tile code outside the known range.
    UnknownTileKind { index: usize, code: u8 },
}

impl fmt::Display for MapLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "map I/O error: {e}"),
            Self::MissingField => write!(f, "map file is missing the `tiles` array"),
            Self::Malformed { message } => write!(f, "malformed map file: {message}"),
            Self::CellCount { expected, found } => {
                write!(f, "map has {found} cells, expected {expected}")
            }
            Self::UnknownTileKind { index, code } => {
                write!(f, "unknown tile code {code} at cell {index}")
            }
        }
    }
}

/// Filesystem adapter for per-level map files, keyed by level number.
#[derive(Clone, Debug)]
pub struct MapStore {
    dir: PathBuf,
}

impl MapStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn level_path(&self, level: u32) -> PathBuf {
        self.dir.join(format!("level_{level}.json"))
    }

    pub fn exists(&self, level: u32) -> bool {
        self.level_path(level).is_file()
    }

    /// Serialize `type`/`traversable` row-major. Written atomically so a
    /// crash mid-save never leaves a truncated level file.
    pub fn save(&self, world: &World, level: u32) -> io::Result<()> {
        let records: Vec<CellRecord> = world
            .tiles()
            .iter()
            .map(|tile| CellRecord { kind: tile.kind.code(), traversable: tile.traversable })
            .collect();
        let file = MapFile { tiles: records };
        let json = serde_json::to_string(&file).map_err(io::Error::other)?;

        fs::create_dir_all(&self.dir)?;
        let path = self.level_path(level);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    pub fn load(&self, level: u32, config: &Config) -> Result<World, MapLoadError> {
        load_world(&self.level_path(level), config)
    }
}

/// Load and validate a single map file against the configured grid shape.
pub fn load_world(path: &Path, config: &Config) -> Result<World, MapLoadError> {
    let content = fs::read_to_string(path).map_err(MapLoadError::Io)?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| MapLoadError::Malformed { message: e.to_string() })?;

    let Some(tiles_value) = value.get("tiles") else {
        return Err(MapLoadError::MissingField);
    };
    let records: Vec<CellRecord> = serde_json::from_value(tiles_value.clone())
        .map_err(|e| MapLoadError::Malformed { message: e.to_string() })?;

    let expected = config.num_tiles_x() * config.num_tiles_y();
    if records.len() != expected {
        return Err(MapLoadError::CellCount { expected, found: records.len() });
    }

    let mut tiles = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let Some(kind) = TileKind::from_code(record.kind) else {
            return Err(MapLoadError::UnknownTileKind { index, code: record.kind });
        };
        tiles.push(Tile { kind, traversable: record.traversable });
    }

    Ok(World::from_tiles(config, tiles))
}
