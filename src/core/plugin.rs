//! Core plugin that sets up game states, events, and fundamental systems.

use bevy::prelude::*;

use super::events::*;
use super::lifespan::expire_lifespans;
use super::states::*;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, InGame)
/// - Global events (PointDamageEvent, DeathEvent, ...)
/// - Timed despawning
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            // Initialize game states
            .init_state::<GameState>()

            // Register global events
            .add_event::<PointDamageEvent>()
            .add_event::<DeathEvent>()

            // Data files are read during Startup, so gameplay can begin right away
            .add_systems(OnEnter(GameState::Loading), transition_to_in_game)

            .add_systems(Update, expire_lifespans);
    }
}

/// Immediately transition from Loading to InGame.
fn transition_to_in_game(mut next_state: ResMut<NextState<GameState>>) {
    info!("Data loaded, entering game");
    next_state.set(GameState::InGame);
}
