mod commands;
mod handlers;

pub use commands::{Cli, Commands, ServeArgs};
pub use handlers::handle_serve;
