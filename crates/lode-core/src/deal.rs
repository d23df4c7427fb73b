//! Fully-populated deal comparables.
//!
//! A [`Deal`] can only be built from a [`DealRecord`] whose six attributes are
//! all present and well-formed; [`DealRecord::defects`] lists what is missing
//! otherwise. Validated results carry only `Deal`s, never partial records.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::DevelopmentStage;
use crate::facts::DealRecord;
use crate::lenient;

/// Minimum rationale length, in characters.
pub const MIN_RATIONALE_CHARS: usize = 20;

/// Date format accepted for deal announcements.
pub const DEAL_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Deal {
    pub asset_name: String,
    pub stage: DevelopmentStage,
    pub price_usd_m: f64,
    pub date: NaiveDate,
    pub rationale: String,
    pub sources: Vec<String>,
}

/// One missing or malformed attribute of a [`DealRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealDefect {
    pub field: &'static str,
    pub reason: String,
}

impl DealDefect {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Check that a URL is absolute http(s) with a host.
#[must_use]
pub fn is_well_formed_url(raw: &str) -> bool {
    url::Url::parse(raw.trim())
        .is_ok_and(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
}

impl DealRecord {
    /// List every defect in field order: asset name, stage, price, date,
    /// rationale, sources. An empty list means [`Deal::try_from`] succeeds.
    #[must_use]
    pub fn defects(&self) -> Vec<DealDefect> {
        let mut defects = Vec::new();

        match self.asset_name.as_deref().map(str::trim) {
            None | Some("") => defects.push(DealDefect::new("asset_name", "missing asset name")),
            Some(_) => {}
        }

        match self.stage.as_deref() {
            None => defects.push(DealDefect::new("stage", "missing stage")),
            Some(raw) if raw.parse::<DevelopmentStage>().is_err() => defects.push(
                DealDefect::new("stage", format!("'{raw}' is not a recognized development stage")),
            ),
            Some(_) => {}
        }

        match self.price_usd_m.as_deref() {
            None => defects.push(DealDefect::new("price_usd_m", "missing price")),
            Some(raw) => match lenient::parse_number(raw) {
                None => defects.push(DealDefect::new(
                    "price_usd_m",
                    format!("'{raw}' is not a number"),
                )),
                Some(p) if p <= 0.0 => defects.push(DealDefect::new(
                    "price_usd_m",
                    format!("price must be positive, got {p}"),
                )),
                Some(_) => {}
            },
        }

        match self.date.as_deref() {
            None => defects.push(DealDefect::new("date", "missing date")),
            Some(raw) if NaiveDate::parse_from_str(raw.trim(), DEAL_DATE_FORMAT).is_err() => {
                defects.push(DealDefect::new(
                    "date",
                    format!("'{raw}' is not a YYYY-MM-DD calendar date"),
                ));
            }
            Some(_) => {}
        }

        match self.rationale.as_deref().map(str::trim) {
            None | Some("") => defects.push(DealDefect::new("rationale", "missing rationale")),
            Some(r) if r.chars().count() < MIN_RATIONALE_CHARS => defects.push(DealDefect::new(
                "rationale",
                format!("rationale shorter than {MIN_RATIONALE_CHARS} characters"),
            )),
            Some(_) => {}
        }

        if self.sources.is_empty() {
            defects.push(DealDefect::new("sources", "no source URLs"));
        } else if let Some(bad) = self.sources.iter().find(|s| !is_well_formed_url(s)) {
            defects.push(DealDefect::new(
                "sources",
                format!("'{bad}' is not an http(s) URL"),
            ));
        }

        defects
    }
}

impl TryFrom<&DealRecord> for Deal {
    type Error = Vec<DealDefect>;

    fn try_from(record: &DealRecord) -> Result<Self, Self::Error> {
        let defects = record.defects();
        if !defects.is_empty() {
            return Err(defects);
        }

        // `defects()` is empty, so every field below is present and parses.
        let parsed = (|| {
            Some(Self {
                asset_name: record.asset_name.as_deref()?.trim().to_string(),
                stage: record.stage.as_deref()?.parse().ok()?,
                price_usd_m: lenient::parse_number(record.price_usd_m.as_deref()?)?,
                date: NaiveDate::parse_from_str(record.date.as_deref()?.trim(), DEAL_DATE_FORMAT)
                    .ok()?,
                rationale: record.rationale.as_deref()?.trim().to_string(),
                sources: record.sources.iter().map(|s| s.trim().to_string()).collect(),
            })
        })();
        parsed.ok_or_else(|| vec![DealDefect::new("record", "inconsistent deal record")])
    }
}
