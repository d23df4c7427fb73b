use clap::{Args, Subcommand};
use lode_core::{ClientInputError, DevelopmentStage, Geography, RequestSpec};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Research one asset and print the merged result.
    Research(ResearchArgs),
    /// Print the cache fingerprint of a request without running it.
    Fingerprint(RequestArgs),
    /// Show recent audit log entries.
    Audit(AuditArgs),
    /// Result cache maintenance.
    Cache {
        #[command(subcommand)]
        action: CacheCommands,
    },
}

/// The fields of one research request.
#[derive(Clone, Debug, Args)]
pub struct RequestArgs {
    /// Therapeutic area, e.g. "Oncology".
    #[arg(long)]
    pub area: String,

    /// Indication within the area.
    #[arg(long)]
    pub indication: String,

    /// Molecular target or asset.
    #[arg(long)]
    pub target: String,

    /// Market geography: global, us, eu, japan, china.
    #[arg(long, default_value = "global")]
    pub geography: String,

    /// Development stage, e.g. "Phase 3", "phase2", "preclinical".
    #[arg(long)]
    pub stage: String,

    /// Request the extended research variant.
    #[arg(long)]
    pub full: bool,
}

impl RequestArgs {
    /// Normalize into a [`RequestSpec`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientInputError`] for an unknown stage or geography, or
    /// an empty text field.
    pub fn to_spec(&self) -> Result<RequestSpec, ClientInputError> {
        let geography: Geography = self.geography.parse()?;
        let stage: DevelopmentStage = self.stage.parse()?;
        RequestSpec::new(
            &self.area,
            &self.indication,
            &self.target,
            geography,
            stage,
            self.full,
        )
    }
}

#[derive(Clone, Debug, Args)]
pub struct ResearchArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Skip the cache lookup. The fresh result is still cached.
    #[arg(long)]
    pub no_cache: bool,
}

#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    /// Max entries to return, newest first.
    #[arg(short, long, default_value_t = 20)]
    pub limit: u32,
}

#[derive(Clone, Debug, Subcommand)]
pub enum CacheCommands {
    /// Delete expired cache entries.
    Purge {
        /// Delete every entry, expired or not.
        #[arg(long)]
        all: bool,
    },
}
