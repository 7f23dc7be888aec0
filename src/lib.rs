pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod server;
pub mod storage;
pub mod view;

pub use config::ServerConfig;
pub use error::{Result, TodoManagerError};
pub use server::{create_router, AppState};
pub use storage::TodoStore;
