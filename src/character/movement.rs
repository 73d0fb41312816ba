//! Character locomotion and camera zoom.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::*;
use crate::core::interp_to;
use crate::net::LocallyControlled;

/// Player capsule is capsule_y(0.5, 0.3), so the bottom is 0.8 units below center.
pub const CAPSULE_HALF_HEIGHT: f32 = 0.5;
pub const CAPSULE_RADIUS: f32 = 0.3;

/// Derive the moving flag from this frame's input.
///
/// Any non-zero input counts, backwards and sideways included. Remote
/// characters get their stance from their fire requests instead.
pub fn update_moving_stance(
    mut characters: Query<(&MoveInput, &Died, &mut Stance), With<LocallyControlled>>,
) {
    for (input, died, mut stance) in characters.iter_mut() {
        let moving = !died.0 && input.magnitude() > 0.0;
        // Avoid change detection churn
        if stance.moving != moving {
            stance.moving = moving;
        }
    }
}

/// Move characters with the kinematic controller.
///
/// Walk, sprint and crouch speeds come from the stance; jumping and gravity
/// are integrated here.
pub fn character_movement(
    time: Res<Time>,
    config: Res<CharacterConfig>,
    rapier_context: Query<&RapierContext>,
    mut characters: Query<(
        Entity,
        &Transform,
        &MoveInput,
        &Stance,
        &Died,
        &mut Locomotion,
        &mut MovementState,
        &mut KinematicCharacterController,
    )>,
) {
    let delta = time.delta_secs();

    for (entity, transform, input, stance, died, mut locomotion, mut movement_state, mut controller) in
        characters.iter_mut()
    {
        if died.0 {
            controller.translation = None;
            continue;
        }

        // Ground check using raycast
        let is_grounded = if let Ok(context) = rapier_context.get_single() {
            let ray_origin = transform.translation - Vec3::Y * (CAPSULE_HALF_HEIGHT + CAPSULE_RADIUS - 0.05);

            context
                .cast_ray(
                    ray_origin,
                    Vec3::NEG_Y,
                    0.15,
                    true,
                    QueryFilter::default().exclude_collider(entity).exclude_sensors(),
                )
                .is_some()
        } else {
            // Fallback: assume grounded if no physics context
            true
        };
        movement_state.is_grounded = is_grounded;

        let jump = std::mem::take(&mut locomotion.jump_requested);
        if is_grounded {
            if movement_state.vertical_velocity < 0.0 {
                movement_state.vertical_velocity = 0.0;
            }
            if jump && !stance.crouched {
                movement_state.vertical_velocity = config.jump_force;
            }
        } else {
            movement_state.vertical_velocity -= config.gravity * delta;
        }

        // Forward is -Z in local space
        let mut direction = Vec3::new(input.right, 0.0, -input.forward);
        if direction.length_squared() > 1.0 {
            direction = direction.normalize();
        }

        let yaw = transform.rotation.to_euler(EulerRot::YXZ).0;
        let movement = Quat::from_rotation_y(yaw) * direction;
        let speed = config.ground_speed(stance, &locomotion);

        let horizontal = movement * speed * delta;
        let vertical = Vec3::Y * movement_state.vertical_velocity * delta;

        controller.translation = Some(horizontal + vertical);
    }
}

/// Ease the field of view toward the zoom target.
pub fn interpolate_zoom_fov(
    time: Res<Time>,
    config: Res<CharacterConfig>,
    mut characters: Query<&mut ZoomState>,
) {
    let delta = time.delta_secs();

    for mut zoom in characters.iter_mut() {
        let target = zoom.target_fov(&config);
        zoom.current_fov = interp_to(zoom.current_fov, target, delta, config.zoom_rate());
    }
}
