//! Setpoint synchronisation between the dial and the broker

mod engine;

pub use engine::{LocalChange, RemoteOutcome, SyncEngine, SyncStats};
