//! Rapier ray-cast backend for weapon traces.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::character::CHARACTER_GROUP;
use crate::combat::{CombatSet, RayHit, TraceRequest, TraceResult};
use crate::core::{PhysicalSurface, SurfaceKind};

/// Answers weapon traces against the rapier collision world.
pub struct RapierHitScanPlugin;

impl Plugin for RapierHitScanPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, answer_trace_requests.in_set(CombatSet::Trace));
    }
}

/// Trace against everything except movement capsules; hitboxes stand in for
/// characters.
fn weapon_trace_groups() -> CollisionGroups {
    CollisionGroups::new(Group::ALL, Group::ALL.difference(CHARACTER_GROUP))
}

fn answer_trace_requests(
    rapier_context: Query<&RapierContext>,
    mut requests: EventReader<TraceRequest>,
    parents: Query<&Parent>,
    surfaces: Query<&PhysicalSurface>,
    mut results: EventWriter<TraceResult>,
) {
    let Ok(context) = rapier_context.get_single() else {
        // Drain so requests don't pile up before physics exists
        requests.clear();
        return;
    };

    for request in requests.read() {
        // Skip the firer, its weapon, and anything attached to them
        let traceable = |entity: Entity| {
            !request.ignores(entity)
                && !parents
                    .get(entity)
                    .is_ok_and(|parent| request.ignores(parent.get()))
        };
        let filter = QueryFilter::default()
            .groups(weapon_trace_groups())
            .predicate(&traceable);

        let hit = context
            .cast_ray(
                request.origin,
                request.direction,
                request.max_distance,
                true,
                filter,
            )
            .map(|(entity, distance)| RayHit {
                entity,
                point: request.origin + request.direction * distance,
                distance,
                surface: surfaces
                    .get(entity)
                    .map_or(SurfaceKind::Default, |surface| surface.0),
            });

        results.send(TraceResult {
            request: request.clone(),
            hit,
        });
    }
}
