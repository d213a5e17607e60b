use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;

use crate::{
  api::{HttpSubjectApi, SubjectApi},
  app::App,
  cli::Cli,
  config::Config,
  utils::{initialize_logging, initialize_panic_handler},
};

pub mod action;
pub mod api;
pub mod app;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod components;
pub mod config;
pub mod error;
pub mod mode;
pub mod tui;
pub mod utils;

async fn tokio_main() -> Result<()> {
  initialize_logging()?;
  initialize_panic_handler()?;

  let args = Cli::parse();
  let config = Config::new()?;

  // Flags and environment win over the config file; a blank token means no credential
  let base_url = args.base_url.clone().unwrap_or_else(|| config.api.base_url.clone());
  let token = args.token.clone().filter(|token| !token.trim().is_empty()).or_else(|| config.token());
  let api: Arc<dyn SubjectApi> = Arc::new(HttpSubjectApi::new(&base_url, token)?);
  tracing::info!("Using subjects API at {}", base_url);

  match args.command {
    Some(command) => commands::run(command, api.as_ref(), &mut std::io::stdout()).await?,
    None => App::new(config, api, args.tick_rate, args.frame_rate).run().await?,
  }

  Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
  if let Err(e) = tokio_main().await {
    eprintln!("{} error: Something went wrong", env!("CARGO_PKG_NAME"));
    Err(e)
  } else {
    Ok(())
  }
}
