use anyhow::Context;
use lode_config::LodeConfig;
use lode_store::LodeStore;

/// Loaded configuration plus the local database, shared by command handlers.
pub struct AppContext {
    pub config: LodeConfig,
    pub store: LodeStore,
}

impl AppContext {
    pub async fn init(config: LodeConfig) -> anyhow::Result<Self> {
        let store = LodeStore::open(&config.store)
            .await
            .with_context(|| format!("failed to open store at '{}'", config.store.path))?;
        Ok(Self { config, store })
    }
}
