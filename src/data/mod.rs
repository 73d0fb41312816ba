//! Data module - RON-backed weapon definitions and game settings.

mod error;
mod files;
mod plugin;
mod settings;
mod weapons;

pub use error::DataLoadError;
pub use plugin::DataPlugin;
pub use settings::{debug_override, parse_settings, GameSettings, DEBUG_WEAPONS_ENV};
pub use weapons::{parse_weapon_definition, WeaponDefinition, WeaponRegistry};
