//! Command handlers for CLI subcommands

mod completions;
mod config;
mod serve;
mod submit;
mod utils;
mod validate;

pub use completions::handle_completions;
pub use config::handle_config;
pub use serve::handle_serve;
pub use submit::handle_submit;
pub use validate::handle_validate;
