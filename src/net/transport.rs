//! Message queues at the boundary with the transport layer.
//!
//! Systems push outgoing messages into an outbox during the frame. The
//! transport adapter drains it after the frame and fills the inbox on the far
//! side before that side's next frame.

use bevy::prelude::*;

use super::protocol::{ClientMessage, ServerMessage};
use super::role::PeerId;

/// Requests waiting to go to the server.
#[derive(Resource, Debug, Default)]
pub struct ClientOutbox {
    messages: Vec<ClientMessage>,
}

impl ClientOutbox {
    pub fn send(&mut self, message: ClientMessage) {
        self.messages.push(message);
    }

    pub fn drain(&mut self) -> Vec<ClientMessage> {
        std::mem::take(&mut self.messages)
    }

    pub fn messages(&self) -> &[ClientMessage] {
        &self.messages
    }
}

/// Replication waiting to go to clients.
#[derive(Resource, Debug, Default)]
pub struct ServerOutbox {
    messages: Vec<(PeerId, ServerMessage)>,
}

impl ServerOutbox {
    pub fn send(&mut self, peer: PeerId, message: ServerMessage) {
        self.messages.push((peer, message));
    }

    pub fn drain(&mut self) -> Vec<(PeerId, ServerMessage)> {
        std::mem::take(&mut self.messages)
    }

    pub fn messages(&self) -> &[(PeerId, ServerMessage)] {
        &self.messages
    }
}

/// Requests received from clients, tagged with the sender.
#[derive(Resource, Debug, Default)]
pub struct ServerInbox {
    messages: Vec<(PeerId, ClientMessage)>,
}

impl ServerInbox {
    pub fn push(&mut self, peer: PeerId, message: ClientMessage) {
        self.messages.push((peer, message));
    }

    pub fn drain(&mut self) -> Vec<(PeerId, ClientMessage)> {
        std::mem::take(&mut self.messages)
    }
}

/// Replication received from the server.
#[derive(Resource, Debug, Default)]
pub struct ClientInbox {
    messages: Vec<ServerMessage>,
}

impl ClientInbox {
    pub fn push(&mut self, message: ServerMessage) {
        self.messages.push(message);
    }

    pub fn drain(&mut self) -> Vec<ServerMessage> {
        std::mem::take(&mut self.messages)
    }
}
