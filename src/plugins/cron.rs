use crate::{plugins::Plugin, prelude::*, state::AppState};

/// Evicts expired cache entries.
pub struct CacheGc;

#[async_trait]
impl Plugin for CacheGc {
  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()> {
    let mut interval = time::interval(Duration::from_secs(60));
    loop {
      interval.tick().await;

      let evicted = app.cache.gc();
      if evicted > 0 {
        debug!("Evicted {evicted} cache entries, {} left", app.cache.len());
      }
    }
  }
}
