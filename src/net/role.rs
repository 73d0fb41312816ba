//! Network roles and identity.
//!
//! Every process runs the same simulation; these types tell the systems which
//! copy of an entity is canonical and who controls it.

use std::collections::HashMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// How this process takes part in the session.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NetMode {
    /// Single player; local is the authority and there are no peers
    #[default]
    Standalone,
    /// Server with a local player
    ListenServer,
    /// Server without a local player
    DedicatedServer,
    /// Remote client of a server
    Client,
}

impl NetMode {
    /// Servers and standalone games own the canonical state.
    pub fn is_authority(self) -> bool {
        !matches!(self, NetMode::Client)
    }

    /// Role given to entities this process spawns or mirrors.
    pub fn role_for(self, locally_controlled: bool) -> NetRole {
        match (self.is_authority(), locally_controlled) {
            (true, _) => NetRole::Authority,
            (false, true) => NetRole::AutonomousProxy,
            (false, false) => NetRole::SimulatedProxy,
        }
    }
}

/// Role of this process for a particular entity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NetRole {
    /// This process owns the canonical state
    #[default]
    Authority,
    /// Remote copy controlled by the local player
    AutonomousProxy,
    /// Remote copy of someone else's entity
    SimulatedProxy,
}

impl NetRole {
    pub fn is_authority(self) -> bool {
        self == NetRole::Authority
    }
}

/// Identifies a connected player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeerId(pub u64);

impl PeerId {
    /// The player sitting at the server (listen server or standalone).
    pub const HOST: PeerId = PeerId(0);
}

/// Session-wide identifier shared by every process's copy of an entity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetId(pub u32);

/// Player that controls this entity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetOwner(pub PeerId);

/// Marker for the entity driven by this process's input.
#[derive(Component, Debug, Default)]
pub struct LocallyControlled;

/// Remote peers that receive replication from this server.
#[derive(Resource, Debug, Default)]
pub struct ConnectedPeers {
    peers: Vec<PeerId>,
}

impl ConnectedPeers {
    pub fn connect(&mut self, peer: PeerId) {
        if !self.peers.contains(&peer) {
            info!("Peer {:?} connected", peer);
            self.peers.push(peer);
        }
    }

    pub fn disconnect(&mut self, peer: PeerId) {
        self.peers.retain(|p| *p != peer);
    }

    pub fn iter(&self) -> impl Iterator<Item = PeerId> + '_ {
        self.peers.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

/// Maps session identifiers to local entities.
#[derive(Resource, Debug, Default)]
pub struct NetEntityMap {
    entities: HashMap<NetId, Entity>,
}

impl NetEntityMap {
    pub fn get(&self, id: NetId) -> Option<Entity> {
        self.entities.get(&id).copied()
    }

    pub fn insert(&mut self, id: NetId, entity: Entity) {
        self.entities.insert(id, entity);
    }

    pub fn remove_entity(&mut self, entity: Entity) {
        self.entities.retain(|_, e| *e != entity);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Keep the entity map in sync with spawned and despawned networked entities.
pub fn register_net_entities(
    mut map: ResMut<NetEntityMap>,
    added: Query<(Entity, &NetId), Added<NetId>>,
    mut removed: RemovedComponents<NetId>,
) {
    for (entity, id) in added.iter() {
        map.insert(*id, entity);
    }
    for entity in removed.read() {
        map.remove_entity(entity);
    }
}
