//! Campus simulation: areas of services and students driven by a line
//! protocol on standard input.

pub mod area;
pub mod config;
pub mod error;
pub mod input;
pub mod interpreter;
pub mod manager;
pub mod model;
pub mod storage;

pub use area::{Area, Bounds, Outing};
pub use config::CampusConfig;
pub use error::{CommandError, ConfigError, SessionError, StorageError};
pub use interpreter::Interpreter;
pub use manager::SystemManager;
pub use storage::{AreaSnapshot, AreaStore};
