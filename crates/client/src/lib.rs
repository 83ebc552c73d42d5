pub mod config;
pub mod event_bus;
pub mod intent;
pub mod presentation;
pub mod reconciler;
pub mod tags;
pub mod transport;
pub mod wire;
