pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, EngineConfig, WindowConfig};
pub use error::{EvolveError, Result};
pub use types::{Color, EntityId};
