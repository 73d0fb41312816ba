//! Weapon definitions loaded from RON files.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;

use super::error::DataLoadError;
use super::files::{parse_ron, read_ron_file};
use crate::combat::{Ammo, SpreadAngles, Weapon};
use crate::core::DamageType;

const WEAPONS_DIR: &str = "assets/data/weapons";

fn default_headshot_multiplier() -> f32 {
    2.0
}

fn default_clip_size() -> u32 {
    30
}

fn default_max_ammo() -> u32 {
    120
}

fn default_muzzle_offset() -> (f32, f32, f32) {
    (0.0, 0.05, -0.6)
}

/// Weapon definition loaded from a RON file.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct WeaponDefinition {
    pub name: String,
    pub base_damage: f32,
    #[serde(default = "default_headshot_multiplier")]
    pub headshot_multiplier: f32,
    /// Rounds per minute
    pub rate_of_fire: f32,
    #[serde(default)]
    pub spread: SpreadAngles,
    #[serde(default)]
    pub damage_type: DamageType,
    #[serde(default = "default_clip_size")]
    pub clip_size: u32,
    #[serde(default = "default_max_ammo")]
    pub max_ammo: u32,
    /// Rounds in the clip at spawn; a full clip if absent
    #[serde(default)]
    pub starting_ammo: Option<u32>,
    #[serde(default = "default_muzzle_offset")]
    pub muzzle_offset: (f32, f32, f32),
}

impl Default for WeaponDefinition {
    fn default() -> Self {
        let weapon = Weapon::default();
        Self {
            name: weapon.name,
            base_damage: weapon.base_damage,
            headshot_multiplier: weapon.headshot_multiplier,
            rate_of_fire: weapon.rate_of_fire,
            spread: weapon.spread,
            damage_type: weapon.damage_type,
            clip_size: default_clip_size(),
            max_ammo: default_max_ammo(),
            starting_ammo: None,
            muzzle_offset: default_muzzle_offset(),
        }
    }
}

impl WeaponDefinition {
    /// Reject values the fire model cannot work with.
    pub fn validate(&self) -> Result<(), DataLoadError> {
        let invalid = |field, details: String| DataLoadError::InvalidValue {
            name: self.name.clone(),
            field,
            details,
        };

        if !(self.rate_of_fire.is_finite() && self.rate_of_fire > 0.0) {
            return Err(invalid(
                "rate_of_fire",
                format!("must be positive, got {}", self.rate_of_fire),
            ));
        }
        if !(self.base_damage.is_finite() && self.base_damage >= 0.0) {
            return Err(invalid(
                "base_damage",
                format!("must not be negative, got {}", self.base_damage),
            ));
        }
        if !(self.headshot_multiplier.is_finite() && self.headshot_multiplier >= 0.0) {
            return Err(invalid(
                "headshot_multiplier",
                format!("must not be negative, got {}", self.headshot_multiplier),
            ));
        }

        let spread = self.spread;
        for angle in [spread.default, spread.aiming, spread.crouched, spread.moving] {
            if !(0.0..=180.0).contains(&angle) {
                return Err(invalid(
                    "spread",
                    format!("angles must be within [0, 180] degrees, got {}", angle),
                ));
            }
        }

        if self.clip_size == 0 {
            return Err(invalid("clip_size", "must hold at least one round".to_string()));
        }
        if self.max_ammo < self.clip_size {
            return Err(invalid(
                "max_ammo",
                format!("{} is smaller than the clip ({})", self.max_ammo, self.clip_size),
            ));
        }
        if self.starting_ammo.is_some_and(|ammo| ammo > self.clip_size) {
            return Err(invalid(
                "starting_ammo",
                "does not fit in the clip".to_string(),
            ));
        }

        Ok(())
    }

    /// Convert to the Weapon component.
    pub fn to_weapon(&self) -> Weapon {
        Weapon {
            name: self.name.clone(),
            base_damage: self.base_damage,
            headshot_multiplier: self.headshot_multiplier,
            rate_of_fire: self.rate_of_fire,
            spread: self.spread,
            damage_type: self.damage_type,
        }
    }

    /// Convert to the Ammo component.
    pub fn to_ammo(&self) -> Ammo {
        Ammo::new(
            self.starting_ammo.unwrap_or(self.clip_size),
            self.clip_size,
            self.max_ammo,
        )
    }

    pub fn muzzle_offset(&self) -> Vec3 {
        let (x, y, z) = self.muzzle_offset;
        Vec3::new(x, y, z)
    }
}

/// Parse and validate a weapon definition from RON text.
pub fn parse_weapon_definition(source: &str, contents: &str) -> Result<WeaponDefinition, DataLoadError> {
    let definition: WeaponDefinition = parse_ron(source, contents)?;
    definition.validate()?;
    Ok(definition)
}

/// Resource holding all loaded weapon definitions.
#[derive(Resource, Default)]
pub struct WeaponRegistry {
    pub definitions: HashMap<String, WeaponDefinition>,
    /// Weapon every character spawns with
    pub starter: String,
}

impl WeaponRegistry {
    /// Get a weapon definition by file name.
    pub fn get(&self, weapon_type: &str) -> Option<&WeaponDefinition> {
        self.definitions.get(weapon_type)
    }

    /// The starter weapon, or the built-in rifle if it was not loaded.
    pub fn starter(&self) -> WeaponDefinition {
        self.get(&self.starter).cloned().unwrap_or_else(|| {
            warn!("Starter weapon '{}' not loaded, using the default rifle", self.starter);
            WeaponDefinition::default()
        })
    }
}

/// Load all weapon definitions from the assets/data/weapons/ directory.
pub fn load_weapon_definitions(mut registry: ResMut<WeaponRegistry>) {
    let weapons_dir = Path::new(WEAPONS_DIR);

    if !weapons_dir.exists() {
        warn!("Weapon definitions directory not found: {:?}", weapons_dir);
        return;
    }

    let Ok(entries) = fs::read_dir(weapons_dir) else {
        warn!("Failed to read weapon definitions directory");
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();

        if path.extension().is_some_and(|ext| ext == "ron") {
            let weapon_type = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown")
                .to_string();

            let loaded = read_ron_file::<WeaponDefinition>(&path)
                .and_then(|definition| definition.validate().map(|()| definition));

            match loaded {
                Ok(definition) => {
                    info!("Loaded weapon definition: {} ({})", definition.name, weapon_type);
                    registry.definitions.insert(weapon_type, definition);
                }
                Err(e) => {
                    error!("Failed to load weapon definition: {}", e);
                }
            }
        }
    }

    info!("Loaded {} weapon definitions", registry.definitions.len());
}
