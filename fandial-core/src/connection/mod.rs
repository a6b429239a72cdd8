//! Broker connection handling
//!
//! [`ConnectionManager`] owns the session state and gates every transport
//! operation made by the control loop.

mod manager;
mod state;

pub use manager::{ConnectError, ConnectionManager, ConnectionStats, LinkStatus};
pub use state::{ConnectionEvent, ConnectionState};
