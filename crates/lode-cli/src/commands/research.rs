use std::sync::Arc;

use lode_pipeline::{RequestOptions, ResearchService};
use lode_retrieval::HttpRetriever;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ResearchArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// Handle `lode research`.
pub async fn handle(
    args: &ResearchArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let spec = args.request.to_spec()?;
    let retriever = HttpRetriever::new(ctx.config.require_retrieval()?)?;

    let mut service = ResearchService::new(retriever, &ctx.config)
        .with_audit(Arc::new(ctx.store.audit_log()));
    if ctx.config.cache.enabled {
        service = service.with_cache(Arc::new(ctx.store.result_cache()));
    }

    let progress = Progress::spinner(&format!("Researching {}", spec.summary()), flags);
    let options = RequestOptions {
        use_cache: !args.no_cache,
    };
    match service.handle_with(&spec, options).await {
        Ok(response) => {
            progress.finish_clear();
            for warning in &response.warnings {
                tracing::warn!(%warning, "research completed with warning");
            }
            output(&response, flags.format)
        }
        Err(error) => {
            progress.finish_err("research failed");
            for issue in error.issues() {
                eprintln!("  {issue}");
            }
            Err(error.into())
        }
    }
}
