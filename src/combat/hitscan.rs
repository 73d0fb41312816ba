//! Hitscan traces - the ray-cast request/response seam.
//!
//! A fire attempt on the authority emits a `TraceRequest`. Whatever backend
//! owns the collision world (rapier in the game, a scripted backend in tests)
//! answers it with a `TraceResult` in the same frame, which the resolution
//! system turns into damage, cosmetics, and the replicated shot record.

use bevy::prelude::*;

use super::components::ShotRecord;
use crate::core::SurfaceKind;

/// Maximum distance a hitscan shot travels.
pub const MAX_TRACE_DISTANCE: f32 = 10_000.0;

/// Sent by the fire-rate scheduler once per due shot.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FireAttempt {
    pub weapon: Entity,
}

/// Request to cast a weapon ray through the world.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct TraceRequest {
    pub weapon: Entity,
    /// Character that fired
    pub firer: Entity,
    pub origin: Vec3,
    /// Normalized, spread already applied
    pub direction: Vec3,
    pub max_distance: f32,
    /// Entities the ray passes through (the firer and its weapon)
    pub ignore: [Entity; 2],
}

impl TraceRequest {
    /// Far end of the ray when nothing blocks it.
    pub fn far_end(&self) -> Vec3 {
        self.origin + self.direction * self.max_distance
    }

    pub fn ignores(&self, entity: Entity) -> bool {
        self.ignore.contains(&entity)
    }
}

/// A blocking hit reported by the ray-cast backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Collider entity that blocked the ray
    pub entity: Entity,
    pub point: Vec3,
    pub distance: f32,
    pub surface: SurfaceKind,
}

/// Backend answer to a `TraceRequest`.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct TraceResult {
    pub request: TraceRequest,
    pub hit: Option<RayHit>,
}

/// Where a shot visually ends and what it struck.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotOutcome {
    pub end_point: Vec3,
    pub surface: SurfaceKind,
    pub hit: Option<RayHit>,
}

impl ShotOutcome {
    pub fn from_trace(request: &TraceRequest, hit: Option<RayHit>) -> Self {
        match hit {
            Some(hit) => Self {
                end_point: hit.point,
                surface: hit.surface,
                hit: Some(hit),
            },
            None => Self {
                end_point: request.far_end(),
                surface: SurfaceKind::Default,
                hit: None,
            },
        }
    }

    pub fn record(&self) -> ShotRecord {
        ShotRecord::new(self.end_point, self.surface)
    }
}
