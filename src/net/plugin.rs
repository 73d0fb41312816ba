//! Net plugin - roles, identity, and message queues.

use bevy::prelude::*;

use super::role::*;
use super::transport::*;

/// Net plugin - installs the session mode and the message queues.
///
/// The queues exist in every mode so systems never have to check whether
/// networking is enabled; in standalone games they simply stay empty.
pub struct NetPlugin {
    pub mode: NetMode,
}

impl Plugin for NetPlugin {
    fn build(&self, app: &mut App) {
        info!("Starting session as {:?}", self.mode);

        app.insert_resource(self.mode)
            .init_resource::<ConnectedPeers>()
            .init_resource::<NetEntityMap>()
            .init_resource::<ClientOutbox>()
            .init_resource::<ServerOutbox>()
            .init_resource::<ClientInbox>()
            .init_resource::<ServerInbox>()
            .add_systems(PreUpdate, register_net_entities);
    }
}
