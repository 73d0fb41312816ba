//! Data plugin - loads weapon definitions and settings at startup.

use bevy::prelude::*;

use super::settings::load_settings;
use super::weapons::{load_weapon_definitions, WeaponRegistry};

/// Data plugin - reads the RON files under assets/data.
pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WeaponRegistry>()
            .add_systems(Startup, (load_weapon_definitions, load_settings).chain());
    }
}
