//! Physical surface classification of colliders.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Physical material classification returned by weapon traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SurfaceKind {
    /// Unclassified surface, also used when a trace hits nothing
    #[default]
    Default,
    /// Body flesh
    FleshDefault,
    /// Head and other weak spots; receives the headshot multiplier
    FleshVulnerable,
}

impl SurfaceKind {
    pub fn is_flesh(self) -> bool {
        matches!(self, SurfaceKind::FleshDefault | SurfaceKind::FleshVulnerable)
    }
}

/// Attached to colliders that have a physical material.
///
/// Colliders without this component classify as `SurfaceKind::Default`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhysicalSurface(pub SurfaceKind);
