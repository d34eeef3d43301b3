//! Map-editor paint rules. Painting happens on the live grid; persistence is
//! the caller's concern.

use std::fmt;

use crate::types::TileKind;
use crate::world::World;

/// Editing-mode state: the active paint tool and the level whose file the
/// grid was loaded from (and will be saved back to).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditorSession {
    pub tool: TileKind,
    pub level: u32,
}

impl EditorSession {
    pub fn new(level: u32) -> Self {
        Self { tool: TileKind::Grass, level }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaintError {
    OutOfBounds,
    /// The border ring must stay wall; no border cell is repaintable.
    BorderCell,
    /// At most one door per grid, enforced by a full scan at paint time.
    DoorAlreadyPlaced,
}

impl fmt::Display for PaintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds => write!(f, "cursor is outside the grid"),
            Self::BorderCell => write!(f, "border cells cannot be repainted"),
            Self::DoorAlreadyPlaced => write!(f, "the grid already has a door"),
        }
    }
}

/// Paint the cell under a pixel cursor with `kind` at its canonical base
/// traversability.
pub fn paint_tile(world: &mut World, x: i32, y: i32, kind: TileKind) -> Result<(), PaintError> {
    let Some((tx, ty)) = world.cell_at_px(x, y) else {
        return Err(PaintError::OutOfBounds);
    };
    if world.is_border(tx, ty) {
        return Err(PaintError::BorderCell);
    }
    if kind == TileKind::Door && world.has_door() {
        return Err(PaintError::DoorAlreadyPlaced);
    }
    world.set_tile(tx, ty, kind);
    Ok(())
}
