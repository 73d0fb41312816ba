//! Character module - stance, locomotion, zoom, spawning, and death.

mod actions;
mod components;
mod death;
mod input;
mod movement;
mod plugin;
mod spawning;

pub use actions::{ActionKind, CharacterAction};
pub use components::*;
pub use input::{CharacterInputPlugin, ShooterCamera};
pub use plugin::CharacterPlugin;
pub use spawning::{spawn_character, CharacterNetIds, CharacterSpawn, CHARACTER_GROUP, HITBOX_GROUP};
