//! Cosmetic weapon effects.
//!
//! Gameplay systems only announce effects. Spawning visuals is left to the
//! presentation layer, which a dedicated server never installs.

use bevy::prelude::*;

use crate::core::SurfaceKind;

/// Muzzle flash plus a tracer toward `trace_end`.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct FireEffectEvent {
    pub weapon: Entity,
    pub trace_end: Vec3,
    /// Shake the camera; only set when the firer is locally controlled
    pub shake_camera: bool,
}

/// Impact particles at the point a shot ended.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ImpactEffectEvent {
    pub weapon: Entity,
    pub surface: SurfaceKind,
    pub impact_point: Vec3,
}

/// Impact effect variant chosen from the hit surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactEffect {
    Default,
    Flesh,
}

impl ImpactEffect {
    pub fn for_surface(surface: SurfaceKind) -> Self {
        if surface.is_flesh() {
            ImpactEffect::Flesh
        } else {
            ImpactEffect::Default
        }
    }
}

/// Camera shake played on the local player's camera when firing.
const FIRE_SHAKE_INTENSITY: f32 = 0.05;
const FIRE_SHAKE_DURATION: f32 = 0.1;

/// Screen shake effect resource.
#[derive(Resource, Default)]
pub struct ScreenShake {
    pub intensity: f32,
    pub duration: f32,
    pub timer: f32,
}

impl ScreenShake {
    pub fn shake(&mut self, intensity: f32, duration: f32) {
        // Only override if new shake is stronger
        if intensity > self.intensity || self.timer <= 0.0 {
            self.intensity = intensity;
            self.duration = duration;
            self.timer = duration;
        }
    }

    pub fn is_active(&self) -> bool {
        self.timer > 0.0
    }

    /// Advance the shake and return this frame's offset (x = yaw, y = pitch).
    pub fn update(&mut self, delta: f32) -> Vec2 {
        if self.timer <= 0.0 {
            return Vec2::ZERO;
        }

        self.timer -= delta;
        let progress = (self.timer / self.duration).max(0.0);
        let current_intensity = self.intensity * progress;

        // Random offset
        let x = (rand::random::<f32>() - 0.5) * 2.0 * current_intensity;
        let y = (rand::random::<f32>() - 0.5) * 2.0 * current_intensity;

        Vec2::new(x, y)
    }
}

/// Start a camera shake for every locally controlled shot.
pub fn trigger_fire_shake(
    mut fire_effects: EventReader<FireEffectEvent>,
    mut screen_shake: ResMut<ScreenShake>,
) {
    for effect in fire_effects.read() {
        if effect.shake_camera {
            screen_shake.shake(FIRE_SHAKE_INTENSITY, FIRE_SHAKE_DURATION);
        }
    }
}
