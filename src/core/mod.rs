//! Core game module - states, events, and fundamental systems.
//!
//! This module provides the foundation that all other game systems build upon.

mod events;
mod lifespan;
mod plugin;
mod states;
mod surface;
mod tween;

pub use events::*;
pub use lifespan::Lifespan;
pub use plugin::CorePlugin;
pub use states::*;
pub use surface::*;
pub use tween::*;
