use std::env;

use migration::{Migrator, MigratorTrait};
use sea_orm::Database;

use crate::{cache::Cache, prelude::*, sv};

#[derive(Debug, Clone)]
pub struct Config {
  pub database_url: String,
  pub port: u16,
  pub cache_ttl: Duration,
  pub script_cache_ttl: Duration,
  pub icon_url: String,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      database_url: String::from("sqlite:catalog.db?mode=rwc"),
      port: 3000,

      cache_ttl: Duration::from_secs(30 * 60),
      script_cache_ttl: Duration::from_secs(6 * 60 * 60),
      icon_url: String::new(),
    }
  }
}

fn duration(var: &str, default: Duration) -> anyhow::Result<Duration> {
  match env::var(var) {
    Ok(raw) => humantime::parse_duration(&raw)
      .with_context(|| format!("{var} must be a duration like `30m`")),
    Err(_) => Ok(default),
  }
}

impl Config {
  pub fn from_env() -> anyhow::Result<Self> {
    let default = Self::default();

    let port = match env::var("PORT") {
      Ok(port) => port.parse().context("PORT must be a port number")?,
      Err(_) => default.port,
    };

    Ok(Self {
      database_url: env::var("DATABASE_URL").unwrap_or(default.database_url),
      port,
      cache_ttl: duration("CACHE_TTL", default.cache_ttl)?,
      script_cache_ttl: duration("SCRIPT_CACHE_TTL", default.script_cache_ttl)?,
      icon_url: env::var("ICON_URL").unwrap_or(default.icon_url),
    })
  }
}

pub struct Services<'a> {
  pub build: sv::Build<'a>,
  pub version: sv::Version<'a>,
  pub resolve: sv::Resolve<'a>,
  pub stats: sv::Stats<'a>,
}

pub struct AppState {
  pub db: DatabaseConnection,
  pub cache: Cache,
  pub config: Config,
}

impl AppState {
  pub async fn new(config: Config) -> anyhow::Result<Self> {
    info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
      .await
      .context("Failed to connect to database")?;

    info!("Running migrations...");
    Migrator::up(&db, None).await.context("Failed to run migrations")?;

    Ok(Self::with_db(db, config))
  }

  pub fn with_db(db: DatabaseConnection, config: Config) -> Self {
    Self { db, cache: Cache::new(), config }
  }

  pub fn sv(&self) -> Services<'_> {
    Services {
      build: sv::Build::new(&self.db),
      version: sv::Version::new(&self.db),
      resolve: sv::Resolve::new(&self.db),
      stats: sv::Stats::new(&self.db),
    }
  }
}
