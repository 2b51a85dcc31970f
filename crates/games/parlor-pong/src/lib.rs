pub mod config;
pub mod physics;
pub mod state;

pub use config::PongConfig;
pub use physics::{PointScored, advance, restart, serve};
pub use state::PongState;
