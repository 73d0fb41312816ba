//! Character-related components.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Marker component for shooter characters.
#[derive(Component, Debug, Default)]
pub struct Character;

/// Stance flags read by the weapon's spread model.
///
/// Written by the character's input handling, never by the weapon.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stance {
    pub aiming: bool,
    pub crouched: bool,
    pub moving: bool,
}

/// Axis input for the current frame, in the range [-1, 1].
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveInput {
    pub forward: f32,
    pub right: f32,
}

impl MoveInput {
    pub fn magnitude(&self) -> f32 {
        Vec2::new(self.forward, self.right).length()
    }
}

/// Locomotion state not covered by the stance flags.
#[derive(Component, Debug, Default)]
pub struct Locomotion {
    pub sprinting: bool,
    /// Set by the jump action, consumed by the movement system
    pub jump_requested: bool,
}

/// Tracks vertical movement for the kinematic controller.
#[derive(Component)]
pub struct MovementState {
    pub is_grounded: bool,
    pub vertical_velocity: f32,
}

impl Default for MovementState {
    fn default() -> Self {
        Self {
            is_grounded: true,
            vertical_velocity: 0.0,
        }
    }
}

/// Camera zoom state.
#[derive(Component, Debug, Clone, Copy)]
pub struct ZoomState {
    pub wants_zoom: bool,
    /// Field of view in degrees, eased toward the target every frame
    pub current_fov: f32,
}

impl ZoomState {
    pub fn new(default_fov: f32) -> Self {
        Self {
            wants_zoom: false,
            current_fov: default_fov,
        }
    }

    pub fn target_fov(&self, config: &CharacterConfig) -> f32 {
        if self.wants_zoom {
            config.zoomed_fov
        } else {
            config.default_fov
        }
    }
}

/// Presentation-only reload flag; has no effect on firing.
#[derive(Component, Debug, Default)]
pub struct Reloading(pub bool);

/// Where the character looks from and where it looks.
///
/// The eye sits at the third-person camera, so shots originate from what the
/// player sees rather than from the muzzle.
#[derive(Component, Debug, Clone, Copy)]
pub struct AimView {
    /// Camera position relative to the character, before yaw
    pub eye_offset: Vec3,
    /// View pitch in radians
    pub pitch: f32,
}

impl AimView {
    pub fn new(eye_offset: Vec3) -> Self {
        Self {
            eye_offset,
            pitch: 0.0,
        }
    }

    /// Eye location and look rotation for a character at `transform`.
    pub fn eye_viewpoint(&self, transform: &Transform) -> (Vec3, Quat) {
        let location = transform.translation + transform.rotation * self.eye_offset;
        let rotation = transform.rotation * Quat::from_rotation_x(self.pitch);
        (location, rotation)
    }
}

/// The weapon this character carries, if it has been spawned.
#[derive(Component, Debug, Default)]
pub struct CurrentWeapon(pub Option<Entity>);

/// Set once when the character's health reaches zero.
#[derive(Component, Debug, Default)]
pub struct Died(pub bool);

/// Tunables for characters, loaded from settings.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    pub max_health: f32,
    /// Movement speeds in units per second
    pub default_speed: f32,
    pub sprint_speed: f32,
    pub crouched_speed: f32,
    /// Field of view in degrees
    pub default_fov: f32,
    pub zoomed_fov: f32,
    /// Zoom easing rate, clamped to [0.1, 100]
    pub zoom_interp_speed: f32,
    pub mouse_x_sensitivity: f32,
    pub mouse_y_sensitivity: f32,
    /// Sensitivity multiplier applied while zoomed
    pub targeting_sensitivity: f32,
    pub invert_y: bool,
    pub jump_force: f32,
    pub gravity: f32,
    /// Third-person camera offset from the character origin
    pub camera_offset: (f32, f32, f32),
    /// Seconds a dead character remains before despawning
    pub corpse_lifespan: f32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            default_speed: 3.5,
            sprint_speed: 8.5,
            crouched_speed: 2.0,
            default_fov: 90.0,
            zoomed_fov: 40.0,
            zoom_interp_speed: 20.0,
            mouse_x_sensitivity: 1.0,
            mouse_y_sensitivity: 1.0,
            targeting_sensitivity: 0.5,
            invert_y: false,
            jump_force: 6.0,
            gravity: 15.0,
            camera_offset: (0.5, 1.6, 3.0),
            corpse_lifespan: 10.0,
        }
    }
}

impl CharacterConfig {
    pub fn camera_offset(&self) -> Vec3 {
        Vec3::new(self.camera_offset.0, self.camera_offset.1, self.camera_offset.2)
    }

    pub fn zoom_rate(&self) -> f32 {
        self.zoom_interp_speed.clamp(0.1, 100.0)
    }

    /// Ground speed for the current stance.
    pub fn ground_speed(&self, stance: &Stance, locomotion: &Locomotion) -> f32 {
        if stance.crouched {
            self.crouched_speed
        } else if locomotion.sprinting {
            self.sprint_speed
        } else {
            self.default_speed
        }
    }
}
