//! Visuals for weapon cosmetics - muzzle flash, tracer, and impacts.

use bevy::prelude::*;

use crate::combat::{CombatSet, FireEffectEvent, ImpactEffect, ImpactEffectEvent, MuzzleOffset};
use crate::core::Lifespan;

const TRACER_SECONDS: f32 = 0.05;
const TRACER_WIDTH: f32 = 0.015;
const FLASH_SECONDS: f32 = 0.05;
const IMPACT_SECONDS: f32 = 0.3;

/// Spawns short-lived meshes and lights for weapon effect events.
pub struct EffectsRenderPlugin;

impl Plugin for EffectsRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_effect_assets).add_systems(
            Update,
            (spawn_fire_effects, spawn_impact_effects).after(CombatSet::Feedback),
        );
    }
}

/// Shared meshes and materials for effects.
#[derive(Resource)]
struct EffectAssets {
    tracer_mesh: Handle<Mesh>,
    tracer_material: Handle<StandardMaterial>,
    impact_mesh: Handle<Mesh>,
    default_impact: Handle<StandardMaterial>,
    flesh_impact: Handle<StandardMaterial>,
}

impl EffectAssets {
    fn impact_material(&self, effect: ImpactEffect) -> Handle<StandardMaterial> {
        match effect {
            ImpactEffect::Default => self.default_impact.clone(),
            ImpactEffect::Flesh => self.flesh_impact.clone(),
        }
    }
}

fn setup_effect_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let emissive = |color: Color, strength: f32| StandardMaterial {
        base_color: color,
        emissive: LinearRgba::from(color) * strength,
        unlit: true,
        ..default()
    };

    commands.insert_resource(EffectAssets {
        // Unit length along -Z, scaled to the shot length
        tracer_mesh: meshes.add(Cuboid::new(TRACER_WIDTH, TRACER_WIDTH, 1.0)),
        tracer_material: materials.add(emissive(Color::srgb(1.0, 0.85, 0.4), 4.0)),
        impact_mesh: meshes.add(Sphere::new(0.06)),
        default_impact: materials.add(emissive(Color::srgb(0.8, 0.75, 0.6), 2.0)),
        flesh_impact: materials.add(emissive(Color::srgb(0.6, 0.02, 0.02), 1.0)),
    });
}

fn spawn_fire_effects(
    mut commands: Commands,
    assets: Option<Res<EffectAssets>>,
    mut fire_effects: EventReader<FireEffectEvent>,
    weapons: Query<(&GlobalTransform, &MuzzleOffset)>,
) {
    let Some(assets) = assets else {
        return;
    };

    for effect in fire_effects.read() {
        let Ok((weapon_transform, muzzle)) = weapons.get(effect.weapon) else {
            continue;
        };
        let muzzle_location = weapon_transform.transform_point(muzzle.0);

        commands.spawn((
            PointLight {
                color: Color::srgb(1.0, 0.8, 0.4),
                intensity: 20_000.0,
                range: 4.0,
                shadows_enabled: false,
                ..default()
            },
            Transform::from_translation(muzzle_location),
            Lifespan::from_seconds(FLASH_SECONDS),
        ));

        let length = muzzle_location.distance(effect.trace_end);
        if length <= f32::EPSILON {
            continue;
        }
        let midpoint = (muzzle_location + effect.trace_end) / 2.0;

        commands.spawn((
            Mesh3d(assets.tracer_mesh.clone()),
            MeshMaterial3d(assets.tracer_material.clone()),
            Transform::from_translation(midpoint)
                .looking_at(effect.trace_end, Vec3::Y)
                .with_scale(Vec3::new(1.0, 1.0, length)),
            Lifespan::from_seconds(TRACER_SECONDS),
        ));
    }
}

fn spawn_impact_effects(
    mut commands: Commands,
    assets: Option<Res<EffectAssets>>,
    mut impact_effects: EventReader<ImpactEffectEvent>,
) {
    let Some(assets) = assets else {
        return;
    };

    for impact in impact_effects.read() {
        let effect = ImpactEffect::for_surface(impact.surface);
        commands.spawn((
            Mesh3d(assets.impact_mesh.clone()),
            MeshMaterial3d(assets.impact_material(effect)),
            Transform::from_translation(impact.impact_point),
            Lifespan::from_seconds(IMPACT_SECONDS),
        ));
    }
}
