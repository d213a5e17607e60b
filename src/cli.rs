use clap::{Parser, Subcommand};

use crate::utils::version;

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
  #[arg(short, long, value_name = "FLOAT", help = "Tick rate, i.e. number of ticks per second", default_value_t = 10.0)]
  pub tick_rate: f64,

  #[arg(short, long, value_name = "FLOAT", help = "Frame rate, i.e. number of frames per second", default_value_t = 30.0)]
  pub frame_rate: f64,

  #[arg(long, value_name = "URL", help = "Base url of the subjects API, overrides the config file")]
  pub base_url: Option<String>,

  #[arg(long, value_name = "TOKEN", env = "DISCIPLINE_MANAGER_TOKEN", hide_env_values = true, help = "Bearer token sent with every request")]
  pub token: Option<String>,

  #[command(subcommand)]
  pub command: Option<Command>,
}

/// Headless operations on the catalog. Without one the interactive form starts.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
  /// Print every discipline
  List,
  /// Create a discipline unless the name already exists
  Add { name: String },
  /// Delete the discipline with this name (case-insensitive)
  Remove { name: String },
  /// Search the teacher's disciplines on the server
  Search { query: String },
}
