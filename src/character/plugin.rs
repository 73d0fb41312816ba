//! Character plugin - actions, locomotion, zoom, and death.

use bevy::prelude::*;

use super::actions::{handle_character_actions, CharacterAction};
use super::components::*;
use super::death::handle_character_death;
use super::movement::{character_movement, interpolate_zoom_fov, update_moving_stance};
use crate::combat::CombatSet;
use crate::core::GameState;

/// Character plugin - handles everything a character does apart from shooting.
///
/// Input devices are read by `CharacterInputPlugin`, which only the game
/// binary installs; here characters are driven through `CharacterAction`
/// events and their `MoveInput`.
pub struct CharacterPlugin;

impl Plugin for CharacterPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CharacterConfig>()
            .add_event::<CharacterAction>()
            .add_systems(
                Update,
                (handle_character_actions, update_moving_stance)
                    .chain()
                    .in_set(CombatSet::Input),
            )
            .add_systems(
                Update,
                (character_movement, interpolate_zoom_fov)
                    .after(CombatSet::Input)
                    .run_if(in_state(GameState::InGame)),
            )
            .add_systems(Update, handle_character_death.in_set(CombatSet::Feedback));
    }
}
