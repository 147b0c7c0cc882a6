//! Arena Royale
//!
//! A battle-royale simulator: autonomous fighters steer, collide and trade
//! hits inside a shrinking circular arena until one is left standing or the
//! round hits its time limit.

pub mod cli;
pub mod config;
pub mod game;
pub mod roster;
pub mod runner;
pub mod util;

pub use game::game_loop::{Battle, BattleSnapshot};
pub use game::systems::spawn::SpawnMode;
pub use roster::Roster;
