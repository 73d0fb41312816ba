//! World module - arena, ray-cast backend, and effect visuals.
//!
//! Everything here needs either rapier or the renderer, so the headless
//! plugins never depend on it.

mod arena;
mod effects;
mod hitscan;

pub use arena::{ArenaGeometry, ArenaPlugin};
pub use effects::EffectsRenderPlugin;
pub use hitscan::RapierHitScanPlugin;
