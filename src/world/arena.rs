//! Test arena - a floor, some cover, the local player, and target dummies.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::character::{spawn_character, CharacterConfig, CharacterSpawn, ShooterCamera};
use crate::core::GameState;
use crate::data::WeaponRegistry;
use crate::net::{NetMode, PeerId};

const ARENA_HALF_SIZE: f32 = 25.0;

/// Dummy positions and facing.
const DUMMIES: [(Vec3, f32); 3] = [
    (Vec3::new(-4.0, 1.0, -12.0), 0.0),
    (Vec3::new(0.0, 1.0, -16.0), 0.0),
    (Vec3::new(5.0, 1.0, -10.0), 0.5),
];

/// Cover boxes: (center, half extents).
const COVER: [(Vec3, Vec3); 3] = [
    (Vec3::new(-2.0, 0.75, -7.0), Vec3::new(1.0, 0.75, 0.3)),
    (Vec3::new(3.5, 1.5, -14.0), Vec3::new(0.4, 1.5, 2.0)),
    (Vec3::new(0.0, 2.0, -24.0), Vec3::new(ARENA_HALF_SIZE, 2.0, 0.5)),
];

/// Marker for everything the arena spawns.
#[derive(Component)]
pub struct ArenaGeometry;

pub struct ArenaPlugin;

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::InGame), setup_arena)
            .add_systems(OnExit(GameState::InGame), cleanup_arena);
    }
}

fn setup_arena(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mode: Res<NetMode>,
    config: Res<CharacterConfig>,
    weapons: Res<WeaponRegistry>,
) {
    info!("Building arena");

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
    });
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(10.0, 20.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
        ArenaGeometry,
    ));

    // Floor
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(ARENA_HALF_SIZE * 2.0, 0.2, ARENA_HALF_SIZE * 2.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.35, 0.35, 0.38))),
        Transform::from_xyz(0.0, -0.1, 0.0),
        Collider::cuboid(ARENA_HALF_SIZE, 0.1, ARENA_HALF_SIZE),
        ArenaGeometry,
    ));

    let cover_material = materials.add(Color::srgb(0.55, 0.5, 0.45));
    for (center, half) in COVER {
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(half.x * 2.0, half.y * 2.0, half.z * 2.0))),
            MeshMaterial3d(cover_material.clone()),
            Transform::from_translation(center),
            Collider::cuboid(half.x, half.y, half.z),
            ArenaGeometry,
        ));
    }

    let weapon = weapons.starter();
    let body_mesh = meshes.add(Capsule3d::new(0.3, 1.0));
    let player_material = materials.add(Color::srgb(0.2, 0.4, 0.8));
    let dummy_material = materials.add(Color::srgb(0.8, 0.3, 0.2));

    // A dedicated server has nobody sitting at it
    if *mode != NetMode::DedicatedServer {
        let (player, _) = spawn_character(
            &mut commands,
            CharacterSpawn {
                position: Vec3::new(0.0, 1.0, 0.0),
                yaw: 0.0,
                weapon: &weapon,
                config: &config,
                mode: *mode,
                owner: Some(PeerId::HOST),
                locally_controlled: true,
                net_ids: None,
            },
        );
        commands.entity(player).insert((
            Mesh3d(body_mesh.clone()),
            MeshMaterial3d(player_material),
            ArenaGeometry,
        ));
    }

    for (position, yaw) in DUMMIES {
        let (dummy, _) = spawn_character(
            &mut commands,
            CharacterSpawn {
                position,
                yaw,
                weapon: &weapon,
                config: &config,
                mode: *mode,
                owner: None,
                locally_controlled: false,
                net_ids: None,
            },
        );
        commands.entity(dummy).insert((
            Mesh3d(body_mesh.clone()),
            MeshMaterial3d(dummy_material.clone()),
            ArenaGeometry,
        ));
    }

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: config.default_fov.to_radians(),
            ..default()
        }),
        Transform::from_translation(config.camera_offset()),
        ShooterCamera,
        ArenaGeometry,
    ));
}

/// Clean up arena entities when leaving InGame state.
fn cleanup_arena(mut commands: Commands, query: Query<Entity, With<ArenaGeometry>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
