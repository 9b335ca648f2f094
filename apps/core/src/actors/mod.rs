//! Actor layer: a supervisor task reached through a cloneable handle.

pub mod messages;
pub mod supervisor;

pub use supervisor::{SupervisorHandle, SupervisorSettings, MAX_RECONCILE_PASSES};
