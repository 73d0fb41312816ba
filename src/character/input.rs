//! Keyboard and mouse input for the locally controlled character.
//!
//! Needs a window, so only the game binary installs this plugin.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};

use super::actions::{ActionKind, CharacterAction};
use super::components::*;
use crate::combat::{CombatSet, ScreenShake};
use crate::core::GameState;
use crate::net::LocallyControlled;

/// Pitch limit, about 80 degrees.
const MAX_PITCH: f32 = 1.4;

/// Radians per pixel of mouse motion at sensitivity 1.
const MOUSE_SCALE: f32 = 0.002;

/// Marker for the camera following the local character.
#[derive(Component, Default)]
pub struct ShooterCamera;

/// Button bindings: (button, pressed action, released action).
const KEY_BINDINGS: [(KeyCode, ActionKind, Option<ActionKind>); 4] = [
    (KeyCode::ControlLeft, ActionKind::BeginCrouch, Some(ActionKind::EndCrouch)),
    (KeyCode::ShiftLeft, ActionKind::BeginSprint, Some(ActionKind::EndSprint)),
    (KeyCode::KeyR, ActionKind::BeginReload, Some(ActionKind::EndReload)),
    (KeyCode::Space, ActionKind::Jump, None),
];

const MOUSE_BINDINGS: [(MouseButton, ActionKind, ActionKind); 2] = [
    (MouseButton::Left, ActionKind::StartFire, ActionKind::StopFire),
    (MouseButton::Right, ActionKind::BeginZoom, ActionKind::EndZoom),
];

pub struct CharacterInputPlugin;

impl Plugin for CharacterInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::InGame), grab_cursor)
            .add_systems(OnExit(GameState::InGame), release_cursor)
            .add_systems(
                Update,
                (read_action_input, read_move_input, mouse_look)
                    .before(CombatSet::Input)
                    .run_if(in_state(GameState::InGame)),
            )
            .add_systems(
                Update,
                follow_camera
                    .after(CombatSet::Feedback)
                    .run_if(in_state(GameState::InGame)),
            );
    }
}

/// Grab and hide cursor when entering gameplay.
fn grab_cursor(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::Locked;
        window.cursor_options.visible = false;
    }
}

/// Release cursor when leaving gameplay.
fn release_cursor(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::None;
        window.cursor_options.visible = true;
    }
}

/// Turn button presses and releases into character actions.
fn read_action_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    player: Query<Entity, (With<Character>, With<LocallyControlled>)>,
    mut actions: EventWriter<CharacterAction>,
) {
    let Ok(character) = player.get_single() else {
        return;
    };

    for (key, pressed, released) in KEY_BINDINGS {
        if keyboard.just_pressed(key) {
            actions.send(CharacterAction::new(character, pressed));
        }
        if let Some(released) = released.filter(|_| keyboard.just_released(key)) {
            actions.send(CharacterAction::new(character, released));
        }
    }

    for (button, pressed, released) in MOUSE_BINDINGS {
        if mouse.just_pressed(button) {
            actions.send(CharacterAction::new(character, pressed));
        }
        if mouse.just_released(button) {
            actions.send(CharacterAction::new(character, released));
        }
    }
}

/// Read WASD into the character's move axes.
fn read_move_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut player: Query<&mut MoveInput, (With<Character>, With<LocallyControlled>)>,
) {
    let Ok(mut input) = player.get_single_mut() else {
        return;
    };

    let axis = |positive: KeyCode, negative: KeyCode| {
        keyboard.pressed(positive) as i32 as f32 - keyboard.pressed(negative) as i32 as f32
    };

    input.forward = axis(KeyCode::KeyW, KeyCode::KeyS);
    input.right = axis(KeyCode::KeyD, KeyCode::KeyA);
}

/// Handle mouse movement for looking around.
///
/// Rotates the character horizontally (yaw) and the view vertically (pitch).
/// Sensitivity drops while zoomed.
fn mouse_look(
    mut mouse_motion: EventReader<MouseMotion>,
    config: Res<CharacterConfig>,
    mut player: Query<(&mut Transform, &mut AimView, &ZoomState), (With<Character>, With<LocallyControlled>)>,
) {
    // Accumulate mouse movement
    let mut delta = Vec2::ZERO;
    for event in mouse_motion.read() {
        delta += event.delta;
    }

    if delta == Vec2::ZERO {
        return;
    }

    let Ok((mut transform, mut view, zoom)) = player.get_single_mut() else {
        return;
    };

    let targeting = if zoom.wants_zoom {
        config.targeting_sensitivity
    } else {
        1.0
    };
    let y_invert = if config.invert_y { -1.0 } else { 1.0 };

    transform.rotate_y(-delta.x * config.mouse_x_sensitivity * targeting * MOUSE_SCALE);

    view.pitch -= delta.y * config.mouse_y_sensitivity * targeting * MOUSE_SCALE * y_invert;
    view.pitch = view.pitch.clamp(-MAX_PITCH, MAX_PITCH);
}

/// Place the camera at the character's eye with the current field of view,
/// plus any screen shake.
fn follow_camera(
    time: Res<Time>,
    mut screen_shake: ResMut<ScreenShake>,
    player: Query<(&Transform, &AimView, &ZoomState), (With<Character>, With<LocallyControlled>)>,
    mut camera: Query<(&mut Transform, &mut Projection), (With<ShooterCamera>, Without<Character>)>,
) {
    let shake = screen_shake.update(time.delta_secs());

    let Ok((character, view, zoom)) = player.get_single() else {
        return;
    };
    let Ok((mut camera_transform, mut projection)) = camera.get_single_mut() else {
        return;
    };

    let (eye, rotation) = view.eye_viewpoint(character);
    camera_transform.translation = eye;
    camera_transform.rotation =
        Quat::from_rotation_y(shake.x) * rotation * Quat::from_rotation_x(shake.y);

    if let Projection::Perspective(perspective) = projection.as_mut() {
        perspective.fov = zoom.current_fov.to_radians();
    }
}
