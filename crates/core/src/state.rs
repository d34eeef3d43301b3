use slotmap::SlotMap;

use crate::config::Config;
use crate::types::{Direction, MobId, Phase, Pos};
use crate::world::World;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Player {
    pub pos: Pos,
    pub health: i32,
    pub air: i32,
    pub has_key: bool,
    pub mobs_killed: u32,
    pub level: u32,
}

impl Player {
    /// A fresh level-1 player with full meters. Position is assigned when a
    /// level starts.
    pub fn new(config: &Config) -> Self {
        Self {
            pos: Pos { x: 0, y: 0 },
            health: config.max_health,
            air: config.max_air,
            has_key: false,
            mobs_killed: config.base_mobs_killed,
            level: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mob {
    pub pos: Pos,
    pub health: i32,
    pub damage: i32,
    pub facing: Direction,
}

/// All simulation state owned by the [`crate::Game`]. Fields are public for
/// read-only rendering access; mutation goes through `Game` methods.
pub struct GameState {
    pub world: World,
    pub mobs: SlotMap<MobId, Mob>,
    pub player: Player,
    pub phase: Phase,
    pub tick_counter: u32,
}

impl GameState {
    pub fn is_mob_at(&self, pos: Pos) -> bool {
        self.mob_at(pos).is_some()
    }

    /// First mob occupying the exact position, in slot order.
    pub fn mob_at(&self, pos: Pos) -> Option<MobId> {
        self.mobs.iter().find(|(_, mob)| mob.pos == pos).map(|(id, _)| id)
    }
}

/// Kills needed before the level key is granted.
pub fn required_kills(level: u32) -> u32 {
    level * 10 / 2
}

#[cfg(test)]
mod tests {
    use crate::rng::GameRng;

    use super::*;

    #[test]
    fn kill_quota_scales_with_level() {
        assert_eq!(required_kills(1), 5);
        assert_eq!(required_kills(2), 10);
        assert_eq!(required_kills(3), 15);
    }

    #[test]
    fn mob_lookup_matches_exact_positions_only() {
        let config = Config::default();
        let mut rng = GameRng::seed_from_u64(5);
        let world = World::generate(&config, &mut rng);

        let mut mobs: SlotMap<MobId, Mob> = SlotMap::with_key();
        let pos = Pos { x: 100, y: 150 };
        mobs.insert(Mob { pos, health: 60, damage: 12, facing: Direction::Up });

        let state = GameState {
            world,
            mobs,
            player: Player::new(&config),
            phase: Phase::NotStarted,
            tick_counter: 0,
        };
        assert!(state.is_mob_at(pos));
        assert!(!state.is_mob_at(Pos { x: 100, y: 100 }));
    }
}
