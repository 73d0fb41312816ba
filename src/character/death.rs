//! Character death - stop, disable, and despawn later.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::*;
use crate::combat::{Dead, FireTimer};
use crate::core::{DeathEvent, Lifespan};
use crate::net::LocallyControlled;

/// Put characters that just died out of play.
///
/// Runs once per character: the body stops and loses collision, control is
/// released, the weapon stops firing, and the corpse despawns after a while.
pub fn handle_character_death(
    mut commands: Commands,
    config: Res<CharacterConfig>,
    mut deaths: EventReader<DeathEvent>,
    mut characters: Query<(&mut Died, &mut MoveInput, &mut Locomotion, &CurrentWeapon), With<Character>>,
    mut weapons: Query<&mut FireTimer>,
) {
    for death in deaths.read() {
        let Ok((mut died, mut input, mut locomotion, weapon)) = characters.get_mut(death.entity) else {
            continue;
        };
        if died.0 {
            continue;
        }
        died.0 = true;

        info!("Character {:?} died", death.entity);

        *input = MoveInput::default();
        *locomotion = Locomotion::default();

        if let Some(weapon) = weapon.0 {
            if let Ok(mut timer) = weapons.get_mut(weapon) {
                timer.stop();
            }
        }

        commands
            .entity(death.entity)
            .insert((Dead, ColliderDisabled, Lifespan::from_seconds(config.corpse_lifespan)))
            .remove::<LocallyControlled>();
    }
}
