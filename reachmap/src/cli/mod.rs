mod cli_args;
mod cli_error;
mod run;
mod tile_range;

pub use cli_args::{App, CliArgs};
pub use cli_error::CliError;
pub use run::run;
pub use tile_range::TileRange;
