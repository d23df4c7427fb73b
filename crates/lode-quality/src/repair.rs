//! Best-effort repair of deal records and the source map.
//!
//! A small set of deterministic heuristics that fill or normalize the
//! fields named by validation issues. The output is never trusted: callers
//! re-validate repaired facts, and every touched field is reported in
//! [`RepairOutcome::repaired`] so results can label it.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use chrono::NaiveDate;
use lode_core::deal::{DEAL_DATE_FORMAT, is_well_formed_url};
use lode_core::facts::{DealRecord, RawFacts};
use lode_core::{DevelopmentStage, ValidationIssue};
use regex::Regex;

static DEAL_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^deals\[(\d+)\]\.(\w+)$").expect("static pattern"));

static SOURCE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^sources\.([^\[\]]+)\[\d+\]$").expect("static pattern"));

static LOOSE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})(?:[T ].*)?$").expect("static pattern")
});

/// Rationale keywords, checked in order; the first match wins.
static STAGE_KEYWORDS: LazyLock<Vec<(Regex, DevelopmentStage)>> = LazyLock::new(|| {
    [
        (
            r"(?i)\b(approved|marketed|launched|commercial)\b",
            DevelopmentStage::Approved,
        ),
        (
            r"(?i)\b(filed|submitted|nda|bla|maa|under review)\b",
            DevelopmentStage::Filed,
        ),
        (r"(?i)\b(phase\s*(3|iii)|pivotal)\b", DevelopmentStage::Phase3),
        (r"(?i)\bphase\s*(2|ii)\b", DevelopmentStage::Phase2),
        (r"(?i)\bphase\s*(1|i)\b", DevelopmentStage::Phase1),
        (
            r"(?i)\b(pre-?clinical|ind-enabling|discovery)\b",
            DevelopmentStage::Preclinical,
        ),
    ]
    .into_iter()
    .map(|(pattern, stage)| (Regex::new(pattern).expect("static pattern"), stage))
    .collect()
});

/// Facts after repair, with the field paths that were changed.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairOutcome {
    pub facts: RawFacts,
    pub repaired: Vec<String>,
}

impl RepairOutcome {
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.repaired.is_empty()
    }
}

/// Apply the heuristics to every deal field and source-map entry named in
/// `issues`.
///
/// Other issues are ignored. Fields whose heuristic finds nothing to do are
/// left untouched and not reported.
#[must_use]
pub fn repair(mut facts: RawFacts, issues: &[ValidationIssue]) -> RepairOutcome {
    let targets: BTreeSet<(usize, String)> = issues
        .iter()
        .filter(|issue| issue.is_blocking())
        .filter_map(|issue| {
            let caps = DEAL_PATH.captures(&issue.path)?;
            let idx = caps[1].parse::<usize>().ok()?;
            Some((idx, caps[2].to_string()))
        })
        .collect();

    let mut repaired = Vec::new();
    for (idx, field) in targets {
        let Some(deal) = facts.deals.get_mut(idx) else {
            continue;
        };
        let changed = match field.as_str() {
            "stage" => infer_stage(deal),
            "date" => normalize_date(deal),
            "asset_name" => trim_asset_name(deal),
            "sources" => tidy_sources(deal),
            _ => false,
        };
        if changed {
            repaired.push(format!("deals[{idx}].{field}"));
        }
    }

    let source_fields: BTreeSet<String> = issues
        .iter()
        .filter(|issue| issue.is_blocking())
        .filter_map(|issue| Some(SOURCE_PATH.captures(&issue.path)?[1].to_string()))
        .collect();
    for field in source_fields {
        let changed = facts.sources.get_mut(&field).is_some_and(keep_well_formed);
        if changed {
            repaired.push(format!("sources.{field}"));
        }
    }

    if !repaired.is_empty() {
        tracing::info!(fields = ?repaired, "repaired fields");
    }
    RepairOutcome { facts, repaired }
}

/// Stage implied by rationale keywords, if any.
#[must_use]
pub fn stage_from_text(text: &str) -> Option<DevelopmentStage> {
    STAGE_KEYWORDS
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, stage)| *stage)
}

/// Rewrite `YYYY/M/D`, `YYYY.MM.DD` and timestamped forms as `YYYY-MM-DD`.
/// Returns `None` unless the result is a real calendar date.
#[must_use]
pub fn normalize_date_text(raw: &str) -> Option<String> {
    let caps = LOOSE_DATE.captures(raw.trim())?;
    let year = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let day = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day).map(|d| d.format(DEAL_DATE_FORMAT).to_string())
}

fn infer_stage(deal: &mut DealRecord) -> bool {
    if deal
        .stage
        .as_deref()
        .is_some_and(|s| s.parse::<DevelopmentStage>().is_ok())
    {
        return false;
    }
    let Some(stage) = deal.rationale.as_deref().and_then(stage_from_text) else {
        return false;
    };
    deal.stage = Some(stage.label().to_string());
    true
}

fn normalize_date(deal: &mut DealRecord) -> bool {
    let Some(normalized) = deal.date.as_deref().and_then(normalize_date_text) else {
        return false;
    };
    if deal.date.as_deref() == Some(normalized.as_str()) {
        return false;
    }
    deal.date = Some(normalized);
    true
}

fn trim_asset_name(deal: &mut DealRecord) -> bool {
    match deal.asset_name.as_deref() {
        Some(name) if name.trim() != name => {
            deal.asset_name = Some(name.trim().to_string());
            true
        }
        _ => false,
    }
}

fn tidy_sources(deal: &mut DealRecord) -> bool {
    let tidied: Vec<String> = deal
        .sources
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if tidied == deal.sources {
        return false;
    }
    deal.sources = tidied;
    true
}

/// Trim source-map URLs and drop the ones that still are not http(s).
fn keep_well_formed(urls: &mut Vec<String>) -> bool {
    let kept: Vec<String> = urls
        .iter()
        .map(|u| u.trim().to_string())
        .filter(|u| is_well_formed_url(u))
        .collect();
    if kept == *urls {
        return false;
    }
    *urls = kept;
    true
}
