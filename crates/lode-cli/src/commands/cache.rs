use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CacheCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct PurgeResponse {
    removed: u64,
    all: bool,
}

/// Handle `lode cache`.
pub async fn handle(
    action: &CacheCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CacheCommands::Purge { all } => {
            let cache = ctx.store.result_cache();
            let removed = if *all {
                cache.clear().await?
            } else {
                cache.purge_expired().await?
            };
            tracing::info!(removed, all, "cache purged");
            output(&PurgeResponse { removed, all: *all }, flags.format)
        }
    }
}
