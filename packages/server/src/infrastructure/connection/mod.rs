//! Connection tracking and event fan-out.

pub mod broadcast;
pub mod registry;

pub use broadcast::Broadcaster;
pub use registry::{Binding, ConnectionRegistry};
