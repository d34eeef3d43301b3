//! The game loop core: progression state machine, player movement
//! resolution, mob spawning and wandering, and the two cadence gates.

use slotmap::SlotMap;

use crate::config::Config;
use crate::editor::{self, EditorSession};
use crate::map_file::MapStore;
use crate::rng::GameRng;
use crate::state::{GameState, Mob, Player, required_kills};
use crate::types::{InputEvent, Phase, Pos, RunOutcome, SimEvent, TileKind};
use crate::world::World;

pub struct Game {
    seed: u64,
    config: Config,
    rng: GameRng,
    state: GameState,
    map_store: Option<MapStore>,
    editor: EditorSession,
    /// Wall-clock accumulator gating mob movement, in milliseconds.
    move_timer_ms: u64,
    footstep_second_next: bool,
    outcome: Option<RunOutcome>,
    events: Vec<SimEvent>,
}

impl Game {
    pub fn new(config: Config, seed: u64) -> Self {
        let mut rng = GameRng::seed_from_u64(seed);
        let world = World::generate(&config, &mut rng);
        let player = Player::new(&config);
        Self {
            seed,
            rng,
            state: GameState {
                world,
                mobs: SlotMap::with_key(),
                player,
                phase: Phase::NotStarted,
                tick_counter: 0,
            },
            map_store: None,
            editor: EditorSession::new(1),
            move_timer_ms: 0,
            footstep_second_next: false,
            outcome: None,
            events: Vec::new(),
            config,
        }
    }

    /// A game backed by per-level map files. Levels with a stored map load
    /// it; everything else is generated procedurally.
    pub fn with_map_store(config: Config, seed: u64, store: MapStore) -> Self {
        let mut game = Self::new(config, seed);
        game.map_store = Some(store);
        game
    }

    /// Dispatch one discrete input to the current phase's handler. Events
    /// with no meaning in the current phase are ignored.
    pub fn handle_event(&mut self, event: InputEvent) {
        match (self.state.phase, event) {
            (Phase::NotStarted, InputEvent::Confirm) => self.start_run(),
            (Phase::NotStarted, InputEvent::EnterEditor) => self.enter_editor(),
            (Phase::Playing, InputEvent::Move(direction)) => {
                let (dx, dy) = direction.delta(self.config.tile_size);
                self.move_player(dx, dy);
            }
            (Phase::Playing, InputEvent::Cancel) => self.end_run(RunOutcome::Abandoned),
            (Phase::Leveled, InputEvent::Confirm) => {
                if self.state.player.level <= self.config.max_level {
                    self.start_level();
                    self.state.phase = Phase::Playing;
                } else {
                    self.end_run(RunOutcome::Victory);
                }
            }
            (Phase::Leveled, InputEvent::Cancel) => self.end_run(RunOutcome::Abandoned),
            (Phase::Editing, InputEvent::SelectTool(kind)) => self.editor.tool = kind,
            (Phase::Editing, InputEvent::SelectLevel(level)) => {
                self.editor.level = level;
                self.state.world = self.load_or_generate(level);
            }
            (Phase::Editing, InputEvent::PaintAt { x, y }) => {
                // A rejected paint (border, duplicate door, out of bounds)
                // simply does nothing.
                let _ = editor::paint_tile(&mut self.state.world, x, y, self.editor.tool);
            }
            (Phase::Editing, InputEvent::Confirm) => self.finish_editing(true),
            (Phase::Editing, InputEvent::Cancel) => self.finish_editing(false),
            (Phase::GameOver, InputEvent::Confirm) => self.state.phase = Phase::NotStarted,
            _ => {}
        }
    }

    /// Advance one rendered frame: tick-gated spawning, timer-gated mob
    /// movement, then the health-check rule.
    pub fn frame(&mut self, dt_ms: u64) {
        if self.state.phase != Phase::Playing {
            return;
        }

        self.state.tick_counter += 1;
        if self.state.tick_counter >= self.config.tick_speed {
            self.spawn_mobs();
            self.state.tick_counter = 0;
        }

        self.move_timer_ms += dt_ms;
        if self.move_timer_ms >= self.config.mob_move_interval {
            self.move_mobs();
            self.move_timer_ms = 0;
        }

        if self.state.player.health <= 0 {
            self.end_run(RunOutcome::Defeat);
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn outcome(&self) -> Option<RunOutcome> {
        self.outcome
    }

    pub fn editor(&self) -> &EditorSession {
        &self.editor
    }

    /// Take everything that happened since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Canonical fingerprint of the simulation state, for determinism checks.
    pub fn snapshot_hash(&self) -> u64 {
        use std::hash::Hasher;
        use xxhash_rust::xxh3::Xxh3;

        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u32(self.state.tick_counter);
        hasher.write_u8(match self.state.phase {
            Phase::NotStarted => 0,
            Phase::Playing => 1,
            Phase::Leveled => 2,
            Phase::Editing => 3,
            Phase::GameOver => 4,
        });

        let player = &self.state.player;
        hasher.write_i32(player.pos.x);
        hasher.write_i32(player.pos.y);
        hasher.write_i32(player.health);
        hasher.write_i32(player.air);
        hasher.write_u8(u8::from(player.has_key));
        hasher.write_u32(player.mobs_killed);
        hasher.write_u32(player.level);

        hasher.write_usize(self.state.mobs.len());
        for (_, mob) in &self.state.mobs {
            hasher.write_i32(mob.pos.x);
            hasher.write_i32(mob.pos.y);
            hasher.write_i32(mob.health);
            hasher.write_i32(mob.damage);
        }

        for tile in self.state.world.tiles() {
            hasher.write_u8(tile.kind.code());
            hasher.write_u8(u8::from(tile.traversable));
        }

        hasher.finish()
    }

    fn start_run(&mut self) {
        self.state.player = Player::new(&self.config);
        self.start_level();
        self.state.phase = Phase::Playing;
    }

    /// Build the current level: load-or-generate the world, reset both
    /// cadence gates, place the player, and fill the mob population.
    fn start_level(&mut self) {
        let level = self.state.player.level;
        self.state.world = self.load_or_generate(level);
        self.state.mobs.clear();
        self.state.tick_counter = 0;
        self.move_timer_ms = 0;
        self.place_player();
        self.spawn_mobs();
    }

    fn load_or_generate(&mut self, level: u32) -> World {
        if let Some(store) = &self.map_store
            && store.exists(level)
        {
            match store.load(level, &self.config) {
                Ok(world) => return world,
                Err(_) => self.events.push(SimEvent::MapLoadFallback { level }),
            }
        }
        World::generate(&self.config, &mut self.rng)
    }

    /// Random traversable tile, with a deterministic scan once the random
    /// attempts are spent.
    fn place_player(&mut self) {
        let world = &self.state.world;
        let (width, height) = (world.width(), world.height());

        for _ in 0..width * height {
            let tx = self.rng.roll(width as u32) as usize;
            let ty = self.rng.roll(height as u32) as usize;
            let origin = world.tile_origin(tx, ty);
            if world.is_traversable(origin.x, origin.y, false) {
                self.state.player.pos = origin;
                return;
            }
        }
        for ty in 0..height {
            for tx in 0..width {
                let origin = world.tile_origin(tx, ty);
                if world.is_traversable(origin.x, origin.y, false) {
                    self.state.player.pos = origin;
                    return;
                }
            }
        }
    }

    /// Top the population up to the cap: one tile-aligned candidate per empty
    /// slot, skipped if it is blocked, occupied, or under the player.
    fn spawn_mobs(&mut self) {
        let width = self.state.world.width() as u32;
        let height = self.state.world.height() as u32;
        let missing = self.config.max_mobs.saturating_sub(self.state.mobs.len());

        for _ in 0..missing {
            let tx = self.rng.roll(width) as usize;
            let ty = self.rng.roll(height) as usize;
            let pos = self.state.world.tile_origin(tx, ty);

            let legal = self.state.world.is_traversable(pos.x, pos.y, self.state.player.has_key)
                && !self.state.is_mob_at(pos)
                && pos != self.state.player.pos;
            if !legal {
                continue;
            }

            let level = self.state.player.level as i32;
            let mob = Mob {
                pos,
                health: self.rng.roll_range(50, 100),
                damage: self.rng.roll_range(10 * level, 15 * level),
                facing: self.rng.direction(),
            };
            self.state.mobs.insert(mob);
        }
    }

    /// One wander round. Every mob redraws its facing whether or not the
    /// step lands; a mob never ends a round on an illegal tile. A mob that
    /// ends on the player deals its damage and stays alive.
    fn move_mobs(&mut self) {
        let tile_size = self.config.tile_size;
        let GameState { world, mobs, player, .. } = &mut self.state;

        for mob in mobs.values_mut() {
            mob.facing = self.rng.direction();
            let (dx, dy) = mob.facing.delta(tile_size);
            let next = Pos { x: mob.pos.x + dx, y: mob.pos.y + dy };
            if world.is_traversable(next.x, next.y, player.has_key) {
                mob.pos = next;
            }

            if mob.pos == player.pos {
                player.health = (player.health - mob.damage).max(0);
                self.events.push(SimEvent::PlayerDamaged { amount: mob.damage });
            }
        }
    }

    /// Resolve one player step. `dx`/`dy` are pixel displacements of one
    /// tile, exactly one non-zero.
    fn move_player(&mut self, dx: i32, dy: i32) {
        let player = self.state.player;
        let next = Pos { x: player.pos.x + dx, y: player.pos.y + dy };

        // Walls, bounds, and un-keyed doors all reject here; a refused move
        // changes nothing and runs no collision scan.
        if !self.state.world.is_traversable(next.x, next.y, player.has_key) {
            return;
        }
        self.state.player.pos = next;

        let Some(tile) = self.state.world.tile_at_px(next.x, next.y) else {
            return;
        };
        match tile.kind {
            TileKind::Water => self.apply_water_step(),
            TileKind::Grass => self.apply_grass_step(),
            TileKind::Door => {
                // Traversal passed, so the key is held. The population is
                // replaced wholesale on level-up; no collision scan runs.
                self.leveling();
                return;
            }
            TileKind::Wall => {}
        }

        self.resolve_mob_collision(next);
    }

    fn apply_water_step(&mut self) {
        let drowning = self.state.player.air < self.config.drown_threshold;
        if drowning {
            let damage = self.state.player.level as i32 * 2;
            self.state.player.health = (self.state.player.health - damage).max(0);
            self.events.push(SimEvent::PlayerDamaged { amount: damage });
        } else {
            self.state.player.air =
                (self.state.player.air - self.config.air_loss_rate).max(0);
        }
        self.events.push(SimEvent::SoundCue { key: self.config.water_sound.clone() });
    }

    fn apply_grass_step(&mut self) {
        let cue = if self.footstep_second_next {
            self.config.footstep_second.clone()
        } else {
            self.config.footstep_first.clone()
        };
        self.footstep_second_next = !self.footstep_second_next;
        self.events.push(SimEvent::SoundCue { key: cue });

        let player = &mut self.state.player;
        player.air = (player.air + self.config.air_gain_rate).min(self.config.max_air);
        player.health = (player.health + 1).min(self.config.max_health);
    }

    /// First mob on the player's final position: trade damage for a kill,
    /// granting the key exactly at the quota.
    fn resolve_mob_collision(&mut self, pos: Pos) {
        let Some(id) = self.state.mob_at(pos) else {
            return;
        };
        let Some(mob) = self.state.mobs.remove(id) else {
            return;
        };

        let player = &mut self.state.player;
        player.health = (player.health - mob.damage).max(0);
        player.mobs_killed += 1;
        let earned_key = player.mobs_killed == required_kills(player.level);
        if earned_key {
            player.has_key = true;
        }

        self.events.push(SimEvent::PlayerDamaged { amount: mob.damage });
        self.events.push(SimEvent::MobKilled { pos });
        if earned_key {
            self.events.push(SimEvent::KeyEarned);
        }
    }

    /// Passage through the door: next level, consumables reset, key cleared.
    fn leveling(&mut self) {
        let player = &mut self.state.player;
        player.level += 1;
        player.has_key = false;
        player.mobs_killed = self.config.base_mobs_killed;
        player.health = self.config.max_health;
        player.air = self.config.max_air;
        let level = player.level;

        self.state.phase = Phase::Leveled;
        self.events.push(SimEvent::LeveledUp { level });
    }

    fn enter_editor(&mut self) {
        let level = self.state.player.level;
        self.editor = EditorSession::new(level);
        self.state.world = self.load_or_generate(level);
        self.state.phase = Phase::Editing;
    }

    fn finish_editing(&mut self, persist: bool) {
        if persist
            && let Some(store) = &self.map_store
            && store.save(&self.state.world, self.editor.level).is_err()
        {
            self.events.push(SimEvent::MapSaveFailed { level: self.editor.level });
        }
        self.state.phase = Phase::NotStarted;
    }

    fn end_run(&mut self, outcome: RunOutcome) {
        self.outcome = Some(outcome);
        self.state.phase = Phase::GameOver;
        self.events.push(SimEvent::GameEnded { outcome });
    }
}
