//! Game state definitions that control the overall flow of the game.
//!
//! States determine which systems run at any given time. Combat and character
//! systems only run in the InGame state, so a server or client that is still
//! loading its data files never fires a weapon.

use bevy::prelude::*;

/// Main game states - controls overall game flow.
///
/// - Start in `Loading` while data files are read
/// - Move to `InGame` once loading completes
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Initial state - loading data files
    #[default]
    Loading,
    /// Active gameplay
    InGame,
}
