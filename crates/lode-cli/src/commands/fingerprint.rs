use lode_config::LodeConfig;
use lode_pipeline::request_fingerprint;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RequestArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
struct FingerprintResponse {
    fingerprint: String,
    model: String,
    request: lode_core::RequestSpec,
}

/// Handle `lode fingerprint`. Needs configuration but no store or network.
pub fn handle(
    args: &RequestArgs,
    config: &LodeConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let spec = args.to_spec()?;
    let fingerprint = request_fingerprint(&config.retrieval, &spec);
    output(
        &FingerprintResponse {
            fingerprint: fingerprint.to_string(),
            model: config.retrieval.model.clone(),
            request: spec,
        },
        flags.format,
    )
}
