//! Global events used for cross-system communication.
//!
//! The combat systems send PointDamageEvents, and the health system receives
//! them to apply damage. Death is announced with a DeathEvent so character
//! systems can react without knowing where the damage came from.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::surface::SurfaceKind;
use crate::net::PeerId;

/// Damage type tag carried with every damage application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DamageType {
    #[default]
    Bullet,
    Melee,
    Environmental,
}

/// Details of the blocking hit that produced a point damage event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitDetails {
    /// Entity whose collider was hit (may be a hitbox child of the damaged actor)
    pub entity: Entity,
    /// World-space impact point
    pub impact_point: Vec3,
    /// Distance from the trace origin to the impact point
    pub distance: f32,
    /// Physical surface classification of the hit collider
    pub surface: SurfaceKind,
}

/// Sent when a hitscan shot damages something.
///
/// The damage system resolves `target` to the nearest ancestor with `Health`
/// and applies the amount as-is.
#[derive(Event, Debug, Clone)]
pub struct PointDamageEvent {
    /// Entity that was hit
    pub target: Entity,
    /// Final damage amount (multipliers already applied)
    pub amount: f32,
    /// Direction the shot travelled
    pub direction: Vec3,
    pub hit: HitDetails,
    /// Controlling player of the firer, if any
    pub instigator: Option<PeerId>,
    /// Pawn that fired the shot
    pub causer: Entity,
    pub damage_type: DamageType,
}

/// Sent when an entity dies (health reaches 0).
#[derive(Event, Debug, Clone)]
pub struct DeathEvent {
    /// Entity that died
    pub entity: Entity,
    /// Entity that killed them (if any)
    pub killed_by: Option<Entity>,
}
