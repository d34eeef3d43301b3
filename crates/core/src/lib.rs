pub mod config;
pub mod editor;
pub mod game;
pub mod map_file;
pub mod rng;
pub mod state;
pub mod types;
pub mod world;

pub use config::{Config, ConfigError};
pub use editor::{EditorSession, PaintError, paint_tile};
pub use game::Game;
pub use map_file::{MapLoadError, MapStore, load_world};
pub use rng::GameRng;
pub use state::{GameState, Mob, Player, required_kills};
pub use types::*;
pub use world::{Tile, World};
