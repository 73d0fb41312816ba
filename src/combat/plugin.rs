//! Combat plugin - hitscan firing, damage, and shot replication.

use bevy::prelude::*;

use super::replication;
use super::systems;

/// Combat plugin - handles all combat systems.
///
/// Headless: the ray-cast backend and every visual are installed separately,
/// so servers and tests run the same combat code as the game.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Setup combat systems
        systems::setup_combat_systems(app);

        // Setup replication systems
        replication::setup_replication_systems(app);
    }
}
