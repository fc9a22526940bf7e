#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

pub const TIDEWAY_VERSION: &str = env!("CARGO_PKG_VERSION");

// Core modules
pub mod command;
pub mod direction;
pub mod item;
pub mod loader;
pub mod matcher;
pub mod npc;
pub mod repl;
pub mod room;
pub mod style;
pub mod text;
pub mod timecycle;
pub mod view;
pub mod world;
pub mod worlddef;

// Re-exports for convenience
pub use command::{Command, Effect, TurnOutcome};
pub use direction::Direction;
pub use item::Item;
pub use loader::load_game_text;
pub use matcher::Matcher;
pub use npc::Npc;
pub use repl::run_repl;
pub use room::Room;
pub use text::GameText;
pub use timecycle::{TimeCycle, TimeState};
pub use view::View;
pub use world::World;
pub use worlddef::build_world;
