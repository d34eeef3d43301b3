use slotmap::new_key_type;

new_key_type! {
    pub struct MobId;
}

/// A pixel-space position. Entity and cursor positions are tile-aligned
/// multiples of the configured tile size; tile lookups divide by it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TileKind {
    Grass,
    Water,
    Wall,
    Door,
}

impl TileKind {
    /// Wire code used by map files.
    pub fn code(self) -> u8 {
        match self {
            Self::Grass => 0,
            Self::Water => 1,
            Self::Wall => 2,
            Self::Door => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Grass),
            1 => Some(Self::Water),
            2 => Some(Self::Wall),
            3 => Some(Self::Door),
            _ => None,
        }
    }

    /// Base traversability, before the door-key predicate is applied.
    pub fn base_traversable(self) -> bool {
        match self {
            Self::Grass | Self::Water => true,
            Self::Wall | Self::Door => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Single-tile pixel displacement for this direction.
    pub fn delta(self, tile_size: i32) -> (i32, i32) {
        match self {
            Self::Up => (0, -tile_size),
            Self::Down => (0, tile_size),
            Self::Left => (-tile_size, 0),
            Self::Right => (tile_size, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Playing,
    Leveled,
    Editing,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Victory,
    Defeat,
    Abandoned,
}

/// Discrete input reported by the presentation adapter. Key/mouse mapping
/// happens on the adapter side; the core only sees semantic events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Move(Direction),
    Confirm,
    Cancel,
    EnterEditor,
    SelectTool(TileKind),
    SelectLevel(u32),
    PaintAt { x: i32, y: i32 },
}

/// Observable happenings accumulated per frame and drained by the
/// presentation adapter (sound triggers, HUD flashes, diagnostics).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimEvent {
    SoundCue { key: String },
    PlayerDamaged { amount: i32 },
    MobKilled { pos: Pos },
    KeyEarned,
    LeveledUp { level: u32 },
    MapLoadFallback { level: u32 },
    MapSaveFailed { level: u32 },
    GameEnded { outcome: RunOutcome },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_codes_round_trip() {
        for kind in [TileKind::Grass, TileKind::Water, TileKind::Wall, TileKind::Door] {
            assert_eq!(TileKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(TileKind::from_code(4), None);
    }

    #[test]
    fn direction_deltas_move_exactly_one_tile() {
        assert_eq!(Direction::Up.delta(50), (0, -50));
        assert_eq!(Direction::Down.delta(50), (0, 50));
        assert_eq!(Direction::Left.delta(50), (-50, 0));
        assert_eq!(Direction::Right.delta(50), (50, 0));
    }
}
