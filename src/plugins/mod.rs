pub mod cron;
pub mod server;

use crate::{prelude::*, state::AppState};

#[async_trait]
pub trait Plugin: Send + Sync {
  fn name(&self) -> &'static str {
    std::any::type_name::<Self>()
  }

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()>;
}

const RESTART_DELAY: Duration = Duration::from_secs(5);

pub struct App {
  plugins: Vec<Arc<dyn Plugin>>,
}

impl App {
  pub fn new() -> Self {
    Self { plugins: Vec::new() }
  }

  pub fn plugins(&self) -> impl Iterator<Item = &'static str> + '_ {
    self.plugins.iter().map(|plugin| plugin.name())
  }

  pub fn register<P: Plugin + 'static>(mut self, plugin: P) -> Self {
    self.plugins.push(Arc::new(plugin));
    self
  }

  pub async fn run(self, app: Arc<AppState>) {
    for plugin in self.plugins {
      tokio::spawn(supervise(plugin, app.clone()));
    }
  }
}

/// Runs `plugin` until its task is cancelled, restarting it after
/// `RESTART_DELAY` whenever it returns, fails or panics.
async fn supervise(plugin: Arc<dyn Plugin>, app: Arc<AppState>) {
  let name = plugin.name();
  info!("SYSTEM: Plugin `{name}` initialized");

  loop {
    let task = tokio::spawn({
      let (plugin, app) = (plugin.clone(), app.clone());
      async move { plugin.start(app).await }
    });

    match task.await {
      Ok(Ok(())) => warn!("Plugin `{name}` stopped unexpectedly"),
      Ok(Err(err)) => error!("Plugin `{name}` crashed: {err:#}"),
      Err(err) if err.is_cancelled() => {
        info!("Plugin `{name}` shut down");
        return;
      }
      Err(_) => error!("Plugin `{name}` panicked"),
    }

    time::sleep(RESTART_DELAY).await;
    info!("SYSTEM: Restarting plugin `{name}`...");
  }
}
