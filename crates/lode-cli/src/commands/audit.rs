use crate::cli::GlobalFlags;
use crate::cli::root_commands::AuditArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `lode audit`.
pub async fn handle(
    args: &AuditArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let records = ctx.store.audit_log().recent(args.limit).await?;
    output(&records, flags.format)
}
