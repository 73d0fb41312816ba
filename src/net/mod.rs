//! Net module - roles, identity, protocol messages, and transport queues.

mod plugin;
mod protocol;
mod role;
mod transport;

pub use plugin::NetPlugin;
pub use protocol::*;
pub use role::*;
pub use transport::*;
