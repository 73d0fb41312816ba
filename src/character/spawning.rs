//! Character spawning - body, hitboxes, and the carried weapon.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::*;
use super::movement::{CAPSULE_HALF_HEIGHT, CAPSULE_RADIUS};
use crate::combat::{FireTimer, Health, MuzzleOffset, ReplicatedShot, WeaponOwner};
use crate::core::{PhysicalSurface, SurfaceKind};
use crate::data::WeaponDefinition;
use crate::net::{LocallyControlled, NetId, NetMode, NetOwner, PeerId};

/// Collision group of the movement capsule. Weapon traces skip it.
pub const CHARACTER_GROUP: Group = Group::GROUP_1;

/// Collision group of the sensor hitboxes weapon traces classify.
pub const HITBOX_GROUP: Group = Group::GROUP_2;

/// Session identifiers for a character and its weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterNetIds {
    pub character: NetId,
    pub weapon: NetId,
}

/// Everything needed to spawn a character.
#[derive(Debug, Clone)]
pub struct CharacterSpawn<'a> {
    pub position: Vec3,
    pub yaw: f32,
    pub weapon: &'a WeaponDefinition,
    pub config: &'a CharacterConfig,
    pub mode: NetMode,
    /// Player controlling the character; none for bots and dummies
    pub owner: Option<PeerId>,
    /// Driven by this process's input
    pub locally_controlled: bool,
    pub net_ids: Option<CharacterNetIds>,
}

/// Body and head hitboxes relative to the character origin.
fn hitboxes() -> [(Collider, Vec3, SurfaceKind); 2] {
    [
        (
            Collider::capsule_y(0.35, 0.3),
            Vec3::new(0.0, -0.1, 0.0),
            SurfaceKind::FleshDefault,
        ),
        (
            Collider::ball(0.18),
            Vec3::new(0.0, 0.6, 0.0),
            SurfaceKind::FleshVulnerable,
        ),
    ]
}

/// Spawn a character with its weapon. Returns (character, weapon).
pub fn spawn_character(commands: &mut Commands, spawn: CharacterSpawn) -> (Entity, Entity) {
    let role = spawn.mode.role_for(spawn.locally_controlled);
    let config = spawn.config;

    let character = commands
        .spawn((
            Character,
            Stance::default(),
            MoveInput::default(),
            Locomotion::default(),
            MovementState::default(),
            ZoomState::new(config.default_fov),
            Reloading::default(),
            AimView::new(config.camera_offset()),
            Died::default(),
            Health::new(config.max_health),
            role,
            Transform::from_translation(spawn.position).with_rotation(Quat::from_rotation_y(spawn.yaw)),
            Visibility::default(),
        ))
        .insert((
            // Rapier physics components
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(CAPSULE_HALF_HEIGHT, CAPSULE_RADIUS),
            CollisionGroups::new(CHARACTER_GROUP, Group::ALL),
            KinematicCharacterController {
                offset: CharacterLength::Absolute(0.01),
                autostep: Some(CharacterAutostep {
                    max_height: CharacterLength::Absolute(0.4),
                    min_width: CharacterLength::Absolute(0.3),
                    include_dynamic_bodies: false,
                }),
                max_slope_climb_angle: 45_f32.to_radians(),
                min_slope_slide_angle: 30_f32.to_radians(),
                snap_to_ground: Some(CharacterLength::Absolute(0.5)),
                filter_flags: QueryFilterFlags::EXCLUDE_SENSORS,
                ..default()
            },
        ))
        .id();

    if let Some(owner) = spawn.owner {
        commands.entity(character).insert(NetOwner(owner));
    }
    if spawn.locally_controlled {
        commands.entity(character).insert(LocallyControlled);
    }

    let weapon = commands
        .spawn((
            spawn.weapon.to_weapon(),
            spawn.weapon.to_ammo(),
            FireTimer::default(),
            WeaponOwner(character),
            ReplicatedShot::default(),
            MuzzleOffset(spawn.weapon.muzzle_offset()),
            role,
            // Held at the right hip
            Transform::from_xyz(0.35, 0.2, -0.3),
            Visibility::default(),
        ))
        .id();

    if let Some(ids) = spawn.net_ids {
        commands.entity(character).insert(ids.character);
        commands.entity(weapon).insert(ids.weapon);
    }

    commands.entity(character).add_child(weapon).with_children(|parent| {
        for (collider, offset, surface) in hitboxes() {
            parent.spawn((
                collider,
                Sensor,
                CollisionGroups::new(HITBOX_GROUP, Group::ALL),
                PhysicalSurface(surface),
                Transform::from_translation(offset),
            ));
        }
    });
    commands.entity(character).insert(CurrentWeapon(Some(weapon)));

    info!(
        "Spawned character {:?} ({:?}) with {}",
        character, role, spawn.weapon.name
    );

    (character, weapon)
}
