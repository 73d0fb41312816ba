//! Timed despawning.

use bevy::prelude::*;

/// Despawns the entity (and its children) once the timer finishes.
#[derive(Component)]
pub struct Lifespan(pub Timer);

impl Lifespan {
    pub fn from_seconds(seconds: f32) -> Self {
        Self(Timer::from_seconds(seconds, TimerMode::Once))
    }
}

pub fn expire_lifespans(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Lifespan)>,
) {
    for (entity, mut lifespan) in query.iter_mut() {
        if lifespan.0.tick(time.delta()).just_finished() {
            commands.entity(entity).despawn_recursive();
        }
    }
}
