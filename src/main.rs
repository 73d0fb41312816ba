//! Coop Shooter - Entry Point
//!
//! Controls:
//! - WASD: Move
//! - Mouse: Look around
//! - Left mouse: Fire
//! - Right mouse: Aim down sights
//! - Left Ctrl: Crouch
//! - Shift: Sprint
//! - Space: Jump
//! - R: Reload
//!
//! Set COOP_DEBUG_WEAPONS=1 to draw weapon traces.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use coop_shooter::character::CharacterInputPlugin;
use coop_shooter::combat::CombatDebugPlugin;
use coop_shooter::world::{ArenaPlugin, EffectsRenderPlugin, RapierHitScanPlugin};
use coop_shooter::CoopGamePlugin;

fn main() {
    App::new()
        // Bevy default plugins
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Coop Shooter".to_string(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))

        // Physics
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())

        // Our game plugin
        .add_plugins(CoopGamePlugin::default())

        // Window, renderer, and physics bound parts
        .add_plugins((
            RapierHitScanPlugin,
            CharacterInputPlugin,
            EffectsRenderPlugin,
            CombatDebugPlugin,
            ArenaPlugin,
        ))

        .run();
}
