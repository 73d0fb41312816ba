//! Combat module - hitscan weapons, spread, damage, and shot replication.

mod components;
mod debug;
mod effects;
mod hitscan;
mod plugin;
mod replication;
mod spread;
mod systems;

pub use components::*;
pub use debug::{CombatDebugPlugin, DebugTraceEvent, WeaponDiagnostics};
pub use effects::*;
pub use hitscan::*;
pub use plugin::CombatPlugin;
pub use replication::*;
pub use spread::*;
pub use systems::CombatSet;
