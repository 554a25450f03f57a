mod app;
mod commands;
mod config;
mod event;
mod movies;
mod query;
mod quiz;
mod search;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "flicks")]
#[command(about = "A terminal UI for movie discovery")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/flicks/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Base URL of the movie service (overrides config)
  #[arg(short, long)]
  base_url: Option<String>,
}

/// Log to a file; stdout belongs to the terminal UI.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
  let log_dir = dirs::data_local_dir()?.join("flicks");
  std::fs::create_dir_all(&log_dir).ok()?;

  let appender = tracing_appender::rolling::never(log_dir, "flicks.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flicks=info")),
    )
    .with_writer(writer)
    .with_ansi(false)
    .init();

  Some(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let _log_guard = init_logging();

  // Load configuration
  let config = config::Config::load(args.config.as_deref())?;

  // Override the service URL if specified on the command line
  let config = if let Some(base_url) = args.base_url {
    config::Config {
      api: config::ApiConfig {
        base_url,
        ..config.api
      },
      ..config
    }
  } else {
    config
  };

  // Initialize and run the app
  let mut app = app::App::new(config)?;
  app.run().await?;

  Ok(())
}
