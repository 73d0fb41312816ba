//! Replication bridge - remote fire requests and cosmetic shot replay.
//!
//! Authority side: fire and reload requests from clients pass through a
//! validator before they touch the weapon, shot records go out to every peer
//! except the weapon's owner, and ammo goes to the owner only.
//!
//! Client side: delivered shot records replay the muzzle, tracer and impact
//! cosmetics. Nothing here casts rays or applies damage.

use bevy::prelude::*;
use thiserror::Error;

use super::components::*;
use super::effects::{FireEffectEvent, ImpactEffectEvent};
use super::hitscan::FireAttempt;
use super::systems::CombatSet;
use crate::character::{AimView, Stance};
use crate::core::DeathEvent;
use crate::net::{
    AimSnapshot, ClientInbox, ClientMessage, ConnectedPeers, NetEntityMap, NetId, NetMode,
    NetOwner, NetRole, PeerId, ServerInbox, ServerMessage, ServerOutbox,
};

/// Why the authority refused a fire request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FireRejection {
    #[error("no weapon with id {0:?}")]
    UnknownWeapon(NetId),

    #[error("peer {peer:?} does not own weapon {weapon:?}")]
    NotOwner { peer: PeerId, weapon: NetId },

    #[error("rejected by validator: {0}")]
    Custom(String),
}

/// What the authority knows about a fire request when validating it.
#[derive(Debug, Clone, Copy)]
pub struct FireRequestContext {
    pub peer: PeerId,
    pub weapon: NetId,
    pub weapon_entity: Entity,
    /// Player controlling the weapon's owner
    pub owner_peer: Option<PeerId>,
    pub ammo: u32,
    pub last_fire_time: Option<f64>,
    pub time_between_shots: f64,
    /// Authority world time when the request is processed
    pub now: f64,
    pub stance: Stance,
    pub aim: AimSnapshot,
}

/// Anti-cheat hook for remote fire requests.
pub trait FireRequestValidator: Send + Sync + 'static {
    fn validate(&self, request: &FireRequestContext) -> Result<(), FireRejection>;
}

/// Accepts every request.
#[derive(Debug, Default)]
pub struct AcceptAllFireRequests;

impl FireRequestValidator for AcceptAllFireRequests {
    fn validate(&self, _request: &FireRequestContext) -> Result<(), FireRejection> {
        Ok(())
    }
}

/// Only the player controlling a weapon may fire it.
#[derive(Debug, Default)]
pub struct RequireOwnership;

impl FireRequestValidator for RequireOwnership {
    fn validate(&self, request: &FireRequestContext) -> Result<(), FireRejection> {
        if request.owner_peer == Some(request.peer) {
            Ok(())
        } else {
            Err(FireRejection::NotOwner {
                peer: request.peer,
                weapon: request.weapon,
            })
        }
    }
}

/// The validator the authority runs on fire requests.
#[derive(Resource)]
pub struct FireValidation(pub Box<dyn FireRequestValidator>);

impl Default for FireValidation {
    fn default() -> Self {
        Self(Box::new(AcceptAllFireRequests))
    }
}

impl FireValidation {
    pub fn new(validator: impl FireRequestValidator) -> Self {
        Self(Box::new(validator))
    }
}

/// Raised on the authority when a fire request is dropped.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct FireRequestRejected {
    pub peer: PeerId,
    pub reason: FireRejection,
}

/// Raised on an observer when a newer shot record arrives.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotRecordReceived {
    pub weapon: Entity,
}

fn is_authority_mode(mode: Res<NetMode>) -> bool {
    mode.is_authority()
}

fn is_client_mode(mode: Res<NetMode>) -> bool {
    !mode.is_authority()
}

/// Configure replication systems.
pub(super) fn setup_replication_systems(app: &mut App) {
    app.init_resource::<FireValidation>()
        .add_event::<FireRequestRejected>()
        .add_event::<ShotRecordReceived>()
        .add_systems(
            Update,
            receive_client_messages
                .in_set(CombatSet::Receive)
                .run_if(is_authority_mode),
        )
        .add_systems(
            Update,
            (receive_server_messages, replay_shot_cosmetics)
                .chain()
                .in_set(CombatSet::Receive)
                .run_if(is_client_mode),
        )
        .add_systems(
            Update,
            (replicate_shot_records, replicate_owner_ammo, replicate_deaths)
                .in_set(CombatSet::Replicate)
                .run_if(is_authority_mode),
        );
}

/// Handle fire and reload requests from clients.
fn receive_client_messages(
    time: Res<Time>,
    mut inbox: ResMut<ServerInbox>,
    map: Res<NetEntityMap>,
    validation: Res<FireValidation>,
    mut weapons: Query<(&Weapon, &WeaponOwner, &mut Ammo, &FireTimer)>,
    mut owners: Query<(&mut Stance, &mut Transform, &mut AimView, Option<&NetOwner>)>,
    mut attempts: EventWriter<FireAttempt>,
    mut rejected: EventWriter<FireRequestRejected>,
) {
    let now = time.elapsed_secs_f64();

    for (peer, message) in inbox.drain() {
        match message {
            ClientMessage::Fire { weapon, stance, aim } => {
                let verdict = map
                    .get(weapon)
                    .and_then(|entity| weapons.get(entity).ok().map(|w| (entity, w)))
                    .ok_or(FireRejection::UnknownWeapon(weapon))
                    .and_then(|(entity, (stats, owner, ammo, timer))| {
                        let owner_peer = owners.get(owner.0).ok().and_then(|o| o.3).map(|o| o.0);
                        let context = FireRequestContext {
                            peer,
                            weapon,
                            weapon_entity: entity,
                            owner_peer,
                            ammo: ammo.current,
                            last_fire_time: timer.last_fire_time,
                            time_between_shots: stats.time_between_shots(),
                            now,
                            stance,
                            aim,
                        };
                        validation.0.validate(&context).map(|()| (entity, owner.0))
                    });

                match verdict {
                    Ok((entity, owner)) => {
                        // The firer's view and stance come with the request
                        if let Ok((mut owner_stance, mut transform, mut view, _)) = owners.get_mut(owner) {
                            *owner_stance = stance;
                            transform.rotation = Quat::from_rotation_y(aim.yaw);
                            view.pitch = aim.pitch;
                        }
                        attempts.send(FireAttempt { weapon: entity });
                    }
                    Err(reason) => {
                        warn!("Dropping fire request from {:?}: {}", peer, reason);
                        rejected.send(FireRequestRejected { peer, reason });
                    }
                }
            }
            ClientMessage::Reload { weapon } => {
                let Some(entity) = map.get(weapon) else {
                    warn!("Reload request from {:?} for unknown weapon {:?}", peer, weapon);
                    continue;
                };
                if let Ok((_, _, mut ammo, _)) = weapons.get_mut(entity) {
                    ammo.reload();
                }
            }
        }
    }
}

/// Push changed shot records to every peer except the weapon's owner.
fn replicate_shot_records(
    peers: Res<ConnectedPeers>,
    shots: Query<(&ReplicatedShot, &NetId, &WeaponOwner, &NetRole), Changed<ReplicatedShot>>,
    owners: Query<&NetOwner>,
    mut outbox: ResMut<ServerOutbox>,
) {
    for (shot, net_id, owner, role) in shots.iter() {
        // Version 0 is the spawn default, not a shot
        if !role.is_authority() || shot.version == 0 {
            continue;
        }

        let owner_peer = owners.get(owner.0).ok().map(|o| o.0);
        for peer in peers.iter() {
            if Some(peer) == owner_peer {
                continue;
            }
            outbox.send(
                peer,
                ServerMessage::ShotRecord {
                    weapon: *net_id,
                    version: shot.version,
                    record: shot.record,
                },
            );
        }
    }
}

/// Keep the owning client's ammo count current.
fn replicate_owner_ammo(
    peers: Res<ConnectedPeers>,
    weapons: Query<(&Ammo, &NetId, &WeaponOwner, &NetRole), Changed<Ammo>>,
    owners: Query<&NetOwner>,
    mut outbox: ResMut<ServerOutbox>,
) {
    for (ammo, net_id, owner, role) in weapons.iter() {
        if !role.is_authority() {
            continue;
        }
        let Ok(owner_peer) = owners.get(owner.0) else {
            continue;
        };
        if peers.iter().any(|peer| peer == owner_peer.0) {
            outbox.send(
                owner_peer.0,
                ServerMessage::AmmoChanged {
                    weapon: *net_id,
                    current: ammo.current,
                },
            );
        }
    }
}

/// Tell every peer about deaths on the authority.
fn replicate_deaths(
    peers: Res<ConnectedPeers>,
    mut deaths: EventReader<DeathEvent>,
    ids: Query<&NetId>,
    mut outbox: ResMut<ServerOutbox>,
) {
    for death in deaths.read() {
        let Ok(net_id) = ids.get(death.entity) else {
            continue;
        };
        for peer in peers.iter() {
            outbox.send(peer, ServerMessage::CharacterDied { character: *net_id });
        }
    }
}

/// Apply replication from the server.
fn receive_server_messages(
    mut inbox: ResMut<ClientInbox>,
    map: Res<NetEntityMap>,
    mut weapons: Query<(&mut ReplicatedShot, &mut Ammo, &NetRole)>,
    mut received: EventWriter<ShotRecordReceived>,
    mut deaths: EventWriter<DeathEvent>,
) {
    for message in inbox.drain() {
        match message {
            ServerMessage::ShotRecord {
                weapon,
                version,
                record,
            } => {
                let Some(entity) = map.get(weapon) else {
                    debug!("Shot record for unknown weapon {:?}", weapon);
                    continue;
                };
                let Ok((mut shot, _, role)) = weapons.get_mut(entity) else {
                    continue;
                };
                // The owner already saw its own shot
                if *role != NetRole::SimulatedProxy {
                    continue;
                }
                if shot.apply_remote(version, record) {
                    received.send(ShotRecordReceived { weapon: entity });
                }
            }
            ServerMessage::AmmoChanged { weapon, current } => {
                let Some(entity) = map.get(weapon) else {
                    continue;
                };
                if let Ok((_, mut ammo, _)) = weapons.get_mut(entity) {
                    ammo.current = current;
                }
            }
            ServerMessage::CharacterDied { character } => {
                let Some(entity) = map.get(character) else {
                    continue;
                };
                deaths.send(DeathEvent {
                    entity,
                    killed_by: None,
                });
            }
        }
    }
}

/// Replay the cosmetics of a replicated shot.
fn replay_shot_cosmetics(
    mut received: EventReader<ShotRecordReceived>,
    shots: Query<&ReplicatedShot>,
    mut fire_effects: EventWriter<FireEffectEvent>,
    mut impact_effects: EventWriter<ImpactEffectEvent>,
) {
    for event in received.read() {
        let Ok(shot) = shots.get(event.weapon) else {
            continue;
        };
        let end_point = shot.record.end_point();

        fire_effects.send(FireEffectEvent {
            weapon: event.weapon,
            trace_end: end_point,
            shake_camera: false,
        });
        impact_effects.send(ImpactEffectEvent {
            weapon: event.weapon,
            surface: shot.record.surface,
            impact_point: end_point,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(peer: u64, owner: Option<u64>) -> FireRequestContext {
        FireRequestContext {
            peer: PeerId(peer),
            weapon: NetId(7),
            weapon_entity: Entity::from_raw(7),
            owner_peer: owner.map(PeerId),
            ammo: 30,
            last_fire_time: None,
            time_between_shots: 0.1,
            now: 1.0,
            stance: Stance::default(),
            aim: AimSnapshot::default(),
        }
    }

    #[test]
    fn default_validation_accepts_everything() {
        let validation = FireValidation::default();
        assert!(validation.0.validate(&context(3, Some(1))).is_ok());
        assert!(validation.0.validate(&context(3, None)).is_ok());
    }

    #[test]
    fn ownership_validator_rejects_other_players() {
        let validator = RequireOwnership;
        assert!(validator.validate(&context(1, Some(1))).is_ok());
        assert_eq!(
            validator.validate(&context(2, Some(1))),
            Err(FireRejection::NotOwner {
                peer: PeerId(2),
                weapon: NetId(7),
            })
        );
    }
}
