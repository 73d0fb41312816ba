//! Messages exchanged between clients and the server.
//!
//! Transport is not handled here: an adapter drains the outboxes, delivers
//! the messages reliably and in order, and fills the inboxes on the far side.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::role::NetId;
use crate::character::Stance;
use crate::combat::ShotRecord;

/// Quantization step for replicated positions (one hundredth of a unit).
const POSITION_SCALE: f32 = 100.0;

/// Largest magnitude a quantized component can hold.
const POSITION_LIMIT: i32 = (1 << 30) - 1;

/// A world position rounded to a fixed precision for replication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct QuantizedVec3 {
    x: i32,
    y: i32,
    z: i32,
}

impl QuantizedVec3 {
    pub fn from_vec3(value: Vec3) -> Self {
        Self {
            x: quantize(value.x),
            y: quantize(value.y),
            z: quantize(value.z),
        }
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(
            self.x as f32 / POSITION_SCALE,
            self.y as f32 / POSITION_SCALE,
            self.z as f32 / POSITION_SCALE,
        )
    }
}

fn quantize(component: f32) -> i32 {
    if !component.is_finite() {
        return 0;
    }
    let scaled = (component * POSITION_SCALE).round();
    scaled.clamp(-(POSITION_LIMIT as f32), POSITION_LIMIT as f32) as i32
}

/// The firing player's view at the moment of the request.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AimSnapshot {
    /// Character yaw in radians
    pub yaw: f32,
    /// View pitch in radians
    pub pitch: f32,
}

/// Client → server requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClientMessage {
    /// Run one fire attempt on the authority
    Fire {
        weapon: NetId,
        stance: Stance,
        aim: AimSnapshot,
    },
    /// Refill the weapon's clip on the authority
    Reload { weapon: NetId },
}

/// Server → client replication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ServerMessage {
    /// Latest shot of a weapon, sent to everyone except the weapon's owner
    ShotRecord {
        weapon: NetId,
        version: u32,
        record: ShotRecord,
    },
    /// Ammo count, sent to the weapon's owner only
    AmmoChanged { weapon: NetId, current: u32 },
    /// A character died on the server
    CharacterDied { character: NetId },
}
