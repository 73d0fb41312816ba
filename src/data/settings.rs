//! Game settings loaded from RON.

use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;

use super::error::DataLoadError;
use super::files::{parse_ron, read_ron_file};
use super::weapons::WeaponRegistry;
use crate::character::CharacterConfig;
use crate::combat::WeaponDiagnostics;

const SETTINGS_PATH: &str = "assets/data/settings.ron";

/// Environment variable that turns weapon trace drawing on or off.
pub const DEBUG_WEAPONS_ENV: &str = "COOP_DEBUG_WEAPONS";

fn default_starter_weapon() -> String {
    "assault_rifle".to_string()
}

/// Contents of settings.ron.
#[derive(Deserialize, Clone, Debug)]
pub struct GameSettings {
    /// File name (without extension) of the weapon characters spawn with
    #[serde(default = "default_starter_weapon")]
    pub starter_weapon: String,
    /// Draw weapon traces for debugging
    #[serde(default)]
    pub debug_weapon_traces: bool,
    #[serde(default)]
    pub character: CharacterConfig,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            starter_weapon: default_starter_weapon(),
            debug_weapon_traces: false,
            character: CharacterConfig::default(),
        }
    }
}

/// Parse settings from RON text.
pub fn parse_settings(source: &str, contents: &str) -> Result<GameSettings, DataLoadError> {
    parse_ron(source, contents)
}

/// Apply the debug override from the environment, if it is set to a
/// recognizable value.
pub fn debug_override(value: Option<&str>, configured: bool) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("1" | "true" | "on" | "yes") => true,
        Some("0" | "false" | "off" | "no") => false,
        _ => configured,
    }
}

/// Load settings.ron and install the resources it configures.
pub fn load_settings(mut commands: Commands, mut weapons: ResMut<WeaponRegistry>) {
    let settings = match read_ron_file::<GameSettings>(Path::new(SETTINGS_PATH)) {
        Ok(settings) => {
            info!("Loaded settings from {}", SETTINGS_PATH);
            settings
        }
        Err(DataLoadError::FileNotFound(path)) => {
            warn!("Settings file not found: {}, using defaults", path);
            GameSettings::default()
        }
        Err(e) => {
            error!("Failed to load settings: {}", e);
            GameSettings::default()
        }
    };

    let env_value = std::env::var(DEBUG_WEAPONS_ENV).ok();
    let draw_traces = debug_override(env_value.as_deref(), settings.debug_weapon_traces);
    if draw_traces {
        info!("Weapon trace drawing enabled");
    }

    weapons.starter = settings.starter_weapon;
    commands.insert_resource(settings.character);
    commands.insert_resource(WeaponDiagnostics { draw_traces });
}
