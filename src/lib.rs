//! Coop Shooter - a networked third-person hitscan shooter in Bevy.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, global events, fundamental systems
//! - **Data**: Weapon definitions and settings from RON files
//! - **Net**: Session mode, entity roles, protocol messages
//! - **Combat**: Fire-rate scheduling, spread, hit resolution, damage, shot replication
//! - **Character**: Stance, locomotion, zoom, spawning, death
//! - **World**: Arena, rapier ray-cast backend, effect visuals
//!
//! `CoopGamePlugin` holds the simulation and runs headless, which is how
//! dedicated servers and the integration tests use it. The game binary adds
//! the window-bound plugins on top.

pub mod character;
pub mod combat;
pub mod core;
pub mod data;
pub mod net;
pub mod world;

use bevy::prelude::*;

use net::NetMode;

/// Main game plugin that adds all simulation sub-plugins.
pub struct CoopGamePlugin {
    pub mode: NetMode,
}

impl Default for CoopGamePlugin {
    fn default() -> Self {
        Self {
            mode: NetMode::Standalone,
        }
    }
}

impl Plugin for CoopGamePlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Data files
            .add_plugins(data::DataPlugin)

            // Session and message queues
            .add_plugins(net::NetPlugin { mode: self.mode })

            // Combat systems
            .add_plugins(combat::CombatPlugin)

            // Character systems
            .add_plugins(character::CharacterPlugin);
    }
}
