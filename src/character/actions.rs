//! Character actions - what a player's input asks the character to do.

use bevy::prelude::*;

use super::components::*;
use crate::combat::{Ammo, FireTimer, Weapon};
use crate::net::{ClientMessage, ClientOutbox, NetId, NetRole};

/// Something a character was asked to do this frame.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterAction {
    pub character: Entity,
    pub action: ActionKind,
}

impl CharacterAction {
    pub fn new(character: Entity, action: ActionKind) -> Self {
        Self { character, action }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    StartFire,
    StopFire,
    BeginZoom,
    EndZoom,
    BeginCrouch,
    EndCrouch,
    BeginSprint,
    EndSprint,
    BeginReload,
    EndReload,
    Jump,
}

/// Apply queued character actions.
///
/// Actions on a character without a weapon, or on a dead character, are
/// skipped without complaint.
pub fn handle_character_actions(
    time: Res<Time>,
    mut actions: EventReader<CharacterAction>,
    mut characters: Query<(
        &CurrentWeapon,
        &Died,
        &mut Stance,
        &mut ZoomState,
        &mut Locomotion,
        &mut Reloading,
    )>,
    mut weapons: Query<(&Weapon, &mut FireTimer, &mut Ammo, &NetRole, Option<&NetId>)>,
    mut outbox: ResMut<ClientOutbox>,
) {
    let now = time.elapsed_secs_f64();

    for event in actions.read() {
        let Ok((current_weapon, died, mut stance, mut zoom, mut locomotion, mut reloading)) =
            characters.get_mut(event.character)
        else {
            continue;
        };
        if died.0 {
            continue;
        }

        match event.action {
            ActionKind::BeginZoom | ActionKind::EndZoom => {
                let zoomed = event.action == ActionKind::BeginZoom;
                zoom.wants_zoom = zoomed;
                stance.aiming = zoomed;
            }
            ActionKind::BeginCrouch => stance.crouched = true,
            ActionKind::EndCrouch => stance.crouched = false,
            ActionKind::BeginSprint => locomotion.sprinting = true,
            ActionKind::EndSprint => locomotion.sprinting = false,
            ActionKind::Jump => locomotion.jump_requested = true,
            ActionKind::EndReload => reloading.0 = false,
            ActionKind::StartFire | ActionKind::StopFire | ActionKind::BeginReload => {
                let Some(weapon_entity) = current_weapon.0 else {
                    continue;
                };
                let Ok((weapon, mut timer, mut ammo, role, net_id)) = weapons.get_mut(weapon_entity)
                else {
                    continue;
                };

                match event.action {
                    ActionKind::StartFire => timer.start(now, weapon.time_between_shots()),
                    ActionKind::StopFire => timer.stop(),
                    _ => {
                        if role.is_authority() {
                            ammo.reload();
                        } else if let Some(net_id) = net_id {
                            outbox.send(ClientMessage::Reload { weapon: *net_id });
                        }
                        reloading.0 = true;
                    }
                }
            }
        }
    }
}
