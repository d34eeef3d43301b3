//! The tile grid: a single flat buffer with derived coordinates, procedural
//! generation, and the effective-traversability predicate.

use crate::config::Config;
use crate::rng::GameRng;
use crate::types::{Pos, TileKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    pub kind: TileKind,
    pub traversable: bool,
}

impl Tile {
    pub fn of_kind(kind: TileKind) -> Self {
        Self { kind, traversable: kind.base_traversable() }
    }
}

/// Rectangular tile grid stored row-major. Tile coordinates are derived from
/// the cell index; nothing outside this struct owns grid memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct World {
    width: usize,
    height: usize,
    tile_size: i32,
    tiles: Vec<Tile>,
}

impl World {
    /// Procedural generation: wall border, one door in the center cell, and
    /// water-or-grass interior drawn from one `roll(10)` sample per cell.
    pub fn generate(config: &Config, rng: &mut GameRng) -> Self {
        let width = config.num_tiles_x();
        let height = config.num_tiles_y();
        let mut tiles = Vec::with_capacity(width * height);

        for ty in 0..height {
            for tx in 0..width {
                let kind = if ty == 0 || ty == height - 1 || tx == 0 || tx == width - 1 {
                    TileKind::Wall
                } else if tx == width / 2 && ty == height / 2 {
                    TileKind::Door
                } else if rng.roll(10) < config.water_spawn_chance {
                    TileKind::Water
                } else {
                    TileKind::Grass
                };
                tiles.push(Tile::of_kind(kind));
            }
        }

        Self { width, height, tile_size: config.tile_size, tiles }
    }

    /// Rebuild a grid from persisted cells. The caller guarantees the cell
    /// count matches the configured dimensions.
    pub(crate) fn from_tiles(config: &Config, tiles: Vec<Tile>) -> Self {
        debug_assert_eq!(tiles.len(), config.num_tiles_x() * config.num_tiles_y());
        Self {
            width: config.num_tiles_x(),
            height: config.num_tiles_y(),
            tile_size: config.tile_size,
            tiles,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    pub fn width_px(&self) -> i32 {
        self.width as i32 * self.tile_size
    }

    pub fn height_px(&self) -> i32 {
        self.height as i32 * self.tile_size
    }

    pub fn tile(&self, tx: usize, ty: usize) -> Tile {
        self.tiles[self.index(tx, ty)]
    }

    /// The tile containing a pixel position, if inside the grid.
    pub fn tile_at_px(&self, x: i32, y: i32) -> Option<Tile> {
        self.cell_at_px(x, y).map(|(tx, ty)| self.tile(tx, ty))
    }

    /// Tile coordinates of the cell containing a pixel position.
    pub fn cell_at_px(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        if x < 0 || y < 0 || x >= self.width_px() || y >= self.height_px() {
            return None;
        }
        Some(((x / self.tile_size) as usize, (y / self.tile_size) as usize))
    }

    /// Pixel origin of a cell, recomputed from its coordinates.
    pub fn tile_origin(&self, tx: usize, ty: usize) -> Pos {
        Pos { x: tx as i32 * self.tile_size, y: ty as i32 * self.tile_size }
    }

    /// Replace a cell with a kind at its canonical base traversability.
    pub fn set_tile(&mut self, tx: usize, ty: usize, kind: TileKind) {
        let idx = self.index(tx, ty);
        self.tiles[idx] = Tile::of_kind(kind);
    }

    pub fn is_border(&self, tx: usize, ty: usize) -> bool {
        tx == 0 || ty == 0 || tx == self.width - 1 || ty == self.height - 1
    }

    pub fn has_door(&self) -> bool {
        self.tiles.iter().any(|tile| tile.kind == TileKind::Door)
    }

    /// Single source of truth for movement legality, in pixel space. A door
    /// counts as traversable exactly while the key is held; the stored flag
    /// never mutates for it.
    pub fn is_traversable(&self, x: i32, y: i32, has_key: bool) -> bool {
        match self.tile_at_px(x, y) {
            None => false,
            Some(tile) => tile.traversable || (tile.kind == TileKind::Door && has_key),
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    fn index(&self, tx: usize, ty: usize) -> usize {
        debug_assert!(tx < self.width && ty < self.height);
        ty * self.width + tx
    }
}
