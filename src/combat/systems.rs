//! Combat systems - fire-rate scheduling, hit resolution, damage handling.

use std::collections::HashSet;

use bevy::prelude::*;

use super::components::*;
use super::debug::{DebugTraceEvent, WeaponDiagnostics};
use super::effects::*;
use super::hitscan::*;
use super::spread::{random_cone_direction, WeaponRng};
use crate::character::{AimView, Died, Stance};
use crate::core::{
    DeathEvent, GameState, HitDetails, PointDamageEvent,
};
use crate::net::{AimSnapshot, ClientMessage, ClientOutbox, LocallyControlled, NetId, NetOwner, NetRole};

/// System set ordering for combat.
///
/// A fire attempt and everything it causes happens within one pass through
/// these sets, so no two attempts of the same weapon ever interleave.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CombatSet {
    /// Inbound network messages
    Receive,
    /// Local character input and actions
    Input,
    /// Fire-rate timers
    Schedule,
    /// Role check, ammo, spread
    Fire,
    /// Ray-cast backend answers trace requests
    Trace,
    /// Damage, cosmetics, shot record
    Resolve,
    Damage,
    /// Outbound network messages
    Replicate,
    Feedback,
}

/// Configure combat systems.
pub(super) fn setup_combat_systems(app: &mut App) {
    app
        // Resources
        .init_resource::<ScreenShake>()
        .init_resource::<WeaponRng>()
        .init_resource::<WeaponDiagnostics>()

        // Events
        .add_event::<FireAttempt>()
        .add_event::<TraceRequest>()
        .add_event::<TraceResult>()
        .add_event::<FireEffectEvent>()
        .add_event::<ImpactEffectEvent>()
        .add_event::<DebugTraceEvent>()

        // System ordering
        .configure_sets(
            Update,
            (
                CombatSet::Receive,
                CombatSet::Input,
                CombatSet::Schedule,
                CombatSet::Fire,
                CombatSet::Trace,
                CombatSet::Resolve,
                CombatSet::Damage,
                CombatSet::Replicate,
                CombatSet::Feedback,
            )
                .chain()
                .run_if(in_state(GameState::InGame)),
        )

        .add_systems(Update, tick_fire_timers.in_set(CombatSet::Schedule))
        .add_systems(Update, begin_fire_attempts.in_set(CombatSet::Fire))
        .add_systems(Update, resolve_traces.in_set(CombatSet::Resolve))
        .add_systems(Update, apply_point_damage.in_set(CombatSet::Damage))
        .add_systems(Update, trigger_fire_shake.in_set(CombatSet::Feedback));
}

/// Turn elapsed fire intervals into fire attempts.
fn tick_fire_timers(
    time: Res<Time>,
    mut weapons: Query<(Entity, &Weapon, &mut FireTimer)>,
    mut attempts: EventWriter<FireAttempt>,
) {
    let now = time.elapsed_secs_f64();

    for (entity, weapon, mut timer) in weapons.iter_mut() {
        if !timer.is_active() {
            continue;
        }

        let due = timer.take_due(now, weapon.time_between_shots());
        for _ in 0..due {
            attempts.send(FireAttempt { weapon: entity });
        }
    }
}

/// First half of a fire attempt.
///
/// Dead firers are ignored. Proxies forward the attempt to the authority,
/// noting the shot time so a re-press waits out the rate. The authority
/// spends a round, records the shot time, perturbs the aim by the
/// stance spread, and asks the ray-cast backend to trace the shot.
fn begin_fire_attempts(
    time: Res<Time>,
    mut attempts: EventReader<FireAttempt>,
    mut weapons: Query<(&Weapon, &mut Ammo, &mut FireTimer, &WeaponOwner, &NetRole, Option<&NetId>)>,
    owners: Query<(&Transform, &AimView, &Stance, &Died)>,
    mut rng: ResMut<WeaponRng>,
    mut outbox: ResMut<ClientOutbox>,
    mut traces: EventWriter<TraceRequest>,
) {
    let now = time.elapsed_secs_f64();

    for attempt in attempts.read() {
        let Ok((weapon, mut ammo, mut timer, owner, role, net_id)) = weapons.get_mut(attempt.weapon)
        else {
            continue;
        };

        let Ok((transform, aim, stance, died)) = owners.get(owner.0) else {
            debug!("Weapon {:?} has no owner to fire from", attempt.weapon);
            continue;
        };

        if died.0 {
            debug!("Ignoring fire from dead character {:?}", owner.0);
            continue;
        }

        if !role.is_authority() {
            let Some(net_id) = net_id else {
                warn!("Cannot forward fire for unreplicated weapon {:?}", attempt.weapon);
                continue;
            };

            let (yaw, _, _) = transform.rotation.to_euler(EulerRot::YXZ);
            outbox.send(ClientMessage::Fire {
                weapon: *net_id,
                stance: *stance,
                aim: AimSnapshot {
                    yaw,
                    pitch: aim.pitch,
                },
            });
            timer.record_shot(now);
            continue;
        }

        // Empty clip: nothing happens
        if !ammo.consume_round() {
            continue;
        }
        timer.record_shot(now);

        let (eye_location, eye_rotation) = aim.eye_viewpoint(transform);
        let half_angle = weapon.spread.select(stance).to_radians();
        let direction = random_cone_direction(&mut rng.0, eye_rotation * Vec3::NEG_Z, half_angle);

        traces.send(TraceRequest {
            weapon: attempt.weapon,
            firer: owner.0,
            origin: eye_location,
            direction,
            max_distance: MAX_TRACE_DISTANCE,
            ignore: [owner.0, attempt.weapon],
        });
    }
}

/// Second half of a fire attempt, once the trace is answered.
///
/// Applies damage for blocking hits, plays the local cosmetics, and on the
/// authority overwrites the replicated shot record.
fn resolve_traces(
    mut results: EventReader<TraceResult>,
    mut weapons: Query<(&Weapon, &NetRole, &mut ReplicatedShot)>,
    firers: Query<(Option<&NetOwner>, Has<LocallyControlled>)>,
    diagnostics: Res<WeaponDiagnostics>,
    mut damage_events: EventWriter<PointDamageEvent>,
    mut fire_effects: EventWriter<FireEffectEvent>,
    mut impact_effects: EventWriter<ImpactEffectEvent>,
    mut debug_traces: EventWriter<DebugTraceEvent>,
) {
    for result in results.read() {
        let request = &result.request;
        let Ok((weapon, role, mut shot)) = weapons.get_mut(request.weapon) else {
            continue;
        };

        let (instigator, locally_controlled) = firers
            .get(request.firer)
            .map(|(owner, local)| (owner.map(|o| o.0), local))
            .unwrap_or((None, false));

        let outcome = ShotOutcome::from_trace(request, result.hit);

        if let Some(hit) = outcome.hit {
            let amount = weapon.damage_for_surface(hit.surface);
            debug!(
                "{} hit {:?} ({:?}) for {}",
                weapon.name, hit.entity, hit.surface, amount
            );

            damage_events.send(PointDamageEvent {
                target: hit.entity,
                amount,
                direction: request.direction,
                hit: HitDetails {
                    entity: hit.entity,
                    impact_point: hit.point,
                    distance: hit.distance,
                    surface: hit.surface,
                },
                instigator,
                causer: request.firer,
                damage_type: weapon.damage_type,
            });

            impact_effects.send(ImpactEffectEvent {
                weapon: request.weapon,
                surface: hit.surface,
                impact_point: hit.point,
            });
        }

        if diagnostics.draw_traces {
            debug_traces.send(DebugTraceEvent {
                start: request.origin,
                end: request.far_end(),
            });
        }

        fire_effects.send(FireEffectEvent {
            weapon: request.weapon,
            trace_end: outcome.end_point,
            shake_camera: locally_controlled,
        });

        if role.is_authority() {
            shot.publish(outcome.record());
        }
    }
}

/// Walk up the hierarchy from a hit collider to the actor that has health.
fn damage_receiver(
    entity: Entity,
    parents: &Query<&Parent>,
    health_query: &Query<(&mut Health, Option<&Dead>)>,
) -> Option<Entity> {
    let mut current = entity;
    loop {
        if health_query.contains(current) {
            return Some(current);
        }
        current = parents.get(current).ok()?.get();
    }
}

/// Apply point damage to entities.
fn apply_point_damage(
    mut commands: Commands,
    mut damage_events: EventReader<PointDamageEvent>,
    parents: Query<&Parent>,
    mut health_query: Query<(&mut Health, Option<&Dead>)>,
    mut death_events: EventWriter<DeathEvent>,
) {
    // Track entities that died this frame to avoid duplicate death events
    let mut died_this_frame = HashSet::new();

    for event in damage_events.read() {
        let Some(receiver) = damage_receiver(event.target, &parents, &health_query) else {
            continue;
        };

        if died_this_frame.contains(&receiver) {
            continue;
        }

        let Ok((mut health, dead)) = health_query.get_mut(receiver) else {
            continue;
        };

        // Skip if already dead (from previous frames)
        if dead.is_some() {
            continue;
        }

        let dealt = health.take_damage(event.amount);
        debug!("{:?} took {} damage, {} left", receiver, dealt, health.current);

        if health.is_dead() {
            died_this_frame.insert(receiver);
            commands.entity(receiver).insert(Dead);
            death_events.send(DeathEvent {
                entity: receiver,
                killed_by: Some(event.causer),
            });
        }
    }
}
