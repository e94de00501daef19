//! Minecraft server build catalog
//!
//! Architecture:
//! - SeaORM for the catalog (SQLite), schema in the `migration` crate
//! - Axum for the HTTP API with rate limiting
//! - Plugins for long-running services, restarted when they crash

mod cache;
mod entity;
mod error;
mod model;
mod plugins;
mod prelude;
mod script;
mod state;
mod sv;

use tracing_subscriber::{
  EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::{
  plugins::{App, cron, server},
  prelude::*,
  state::{AppState, Config},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      "catalog=debug,tower_http=debug,sea_orm=warn".into()
    }))
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = Config::from_env()?;
  info!("Starting build catalog v{}", env!("CARGO_PKG_VERSION"));

  let app = Arc::new(AppState::new(config).await?);

  let plugins = App::new().register(server::Plugin).register(cron::CacheGc);
  for name in plugins.plugins() {
    debug!("Registered plugin `{name}`");
  }
  plugins.run(app).await;

  tokio::signal::ctrl_c().await.context("Failed to listen for ctrl-c")?;
  info!("Shutting down");
  Ok(())
}
