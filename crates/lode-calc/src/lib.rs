//! # lode-calc
//!
//! Pure cross-field arithmetic over validated facts.
//!
//! Every function is total over its documented domain and returns
//! [`CalcError`] outside it. No I/O, no retries, no shared state: the same
//! inputs always give bit-identical outputs, so these are safe to call from
//! any number of concurrent requests.

mod error;

pub use error::CalcError;

use lode_core::{DerivedFacts, RawFacts};

fn require_finite(name: &'static str, value: f64) -> Result<f64, CalcError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::invalid(name, format!("{value} is not finite")))
    }
}

/// Compound growth rate `r` solving `peak = current * (1 + r)^years`.
///
/// `peak == current` gives `0`; `peak < current` gives a negative rate,
/// since a declining market is a valid scenario.
///
/// # Errors
///
/// [`CalcError::InvalidArgument`] when `current <= 0`, `peak <= 0`,
/// `years <= 0`, or any input is not finite.
pub fn growth_rate(current: f64, peak: f64, years: f64) -> Result<f64, CalcError> {
    let current = require_finite("current", current)?;
    let peak = require_finite("peak", peak)?;
    let years = require_finite("years", years)?;
    if current <= 0.0 {
        return Err(CalcError::invalid("current", format!("must be > 0, got {current}")));
    }
    if peak <= 0.0 {
        return Err(CalcError::invalid("peak", format!("must be > 0, got {peak}")));
    }
    if years <= 0.0 {
        return Err(CalcError::invalid("years", format!("must be > 0, got {years}")));
    }
    if peak == current {
        return Ok(0.0);
    }
    Ok((peak / current).powf(years.recip()) - 1.0)
}

/// Treated patients at peak: `(peak_revenue / unit_price) * persistence_rate`.
///
/// # Errors
///
/// [`CalcError::InvalidArgument`] when `unit_price <= 0`, the persistence
/// rate is outside `[0, 1]`, or any input is not finite.
pub fn peak_population(
    peak_revenue: f64,
    unit_price: f64,
    persistence_rate: f64,
) -> Result<f64, CalcError> {
    let peak_revenue = require_finite("peak_revenue", peak_revenue)?;
    let unit_price = require_finite("unit_price", unit_price)?;
    let persistence_rate = require_finite("persistence_rate", persistence_rate)?;
    if unit_price <= 0.0 {
        return Err(CalcError::invalid("unit_price", format!("must be > 0, got {unit_price}")));
    }
    if !(0.0..=1.0).contains(&persistence_rate) {
        return Err(CalcError::invalid(
            "persistence_rate",
            format!("must be within [0, 1], got {persistence_rate}"),
        ));
    }
    Ok((peak_revenue / unit_price) * persistence_rate)
}

/// Percentage of the pipeline in the same category:
/// `(same_category_count / total_count) * 100`.
///
/// # Errors
///
/// [`CalcError::InvalidArgument`] when `total_count <= 0`,
/// `same_category_count < 0`, or any input is not finite.
pub fn pipeline_density(same_category_count: f64, total_count: f64) -> Result<f64, CalcError> {
    let same = require_finite("same_category_count", same_category_count)?;
    let total = require_finite("total_count", total_count)?;
    if total <= 0.0 {
        return Err(CalcError::invalid("total_count", format!("must be > 0, got {total}")));
    }
    if same < 0.0 {
        return Err(CalcError::invalid(
            "same_category_count",
            format!("must be >= 0, got {same}"),
        ));
    }
    Ok((same / total) * 100.0)
}

/// Cosine similarity of two equal-length vectors, clamped to `[-1, 1]`.
///
/// Returns exactly `0.0` when either vector has zero magnitude. Cosine
/// similarity is undefined there; zero is the chosen convention.
///
/// # Errors
///
/// [`CalcError::EmptyInput`] when either vector is empty,
/// [`CalcError::LengthMismatch`] when lengths differ, and
/// [`CalcError::InvalidArgument`] when a component is not finite.
pub fn similarity_score(a: &[f64], b: &[f64]) -> Result<f64, CalcError> {
    if a.is_empty() || b.is_empty() {
        return Err(CalcError::EmptyInput);
    }
    if a.len() != b.len() {
        return Err(CalcError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    if a.iter().chain(b).any(|x| !x.is_finite()) {
        return Err(CalcError::invalid("vector", "components must be finite"));
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok((dot / (norm_a * norm_b)).clamp(-1.0, 1.0))
}

fn input(field: &'static str, value: Option<f64>) -> Result<f64, CalcError> {
    value.ok_or(CalcError::MissingInput { field })
}

/// Apply all four calculations to a validated facts payload.
///
/// # Errors
///
/// [`CalcError::MissingInput`] when a field the validator should have
/// required is absent, or any domain error from the individual functions.
/// Either indicates a validator/calculator contract mismatch.
pub fn derive(facts: &RawFacts) -> Result<DerivedFacts, CalcError> {
    let market = &facts.market;
    let competition = &facts.competition;

    let growth_rate = growth_rate(
        input("market.current_revenue_usd_m", market.current_revenue_usd_m)?,
        input("market.peak_revenue_usd_m", market.peak_revenue_usd_m)?,
        input("market.years_to_peak", market.years_to_peak)?,
    )?;
    let peak_population = peak_population(
        input("market.peak_revenue_usd_m", market.peak_revenue_usd_m)? * 1_000_000.0,
        input("market.unit_price_usd", market.unit_price_usd)?,
        input("market.persistence_rate", market.persistence_rate)?,
    )?;
    let pipeline_density = pipeline_density(
        input(
            "competition.same_category_count",
            competition.same_category_count,
        )?,
        input(
            "competition.total_pipeline_count",
            competition.total_pipeline_count,
        )?,
    )?;
    let similarity_score =
        similarity_score(&competition.target_profile, &competition.benchmark_profile)?;

    Ok(DerivedFacts {
        growth_rate,
        peak_population,
        pipeline_density,
        similarity_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn growth_rate_flat_market_is_zero() {
        assert_eq!(growth_rate(1000.0, 1000.0, 5.0).unwrap(), 0.0);
    }

    #[test]
    fn growth_rate_matches_reference_value() {
        let r = growth_rate(830.0, 4500.0, 6.0).unwrap();
        assert!((r - 0.33).abs() <= 0.01, "got {r}");
        let recovered = 830.0 * (1.0 + r).powf(6.0);
        assert!((recovered - 4500.0).abs() < 1e-6);
    }

    #[test]
    fn growth_rate_decline_is_negative_not_error() {
        let r = growth_rate(1000.0, 500.0, 2.0).unwrap();
        assert!(r < 0.0);
    }

    #[rstest]
    #[case(100.0, 200.0, 0.0)]
    #[case(100.0, 0.0, 5.0)]
    #[case(100.0, -1.0, 5.0)]
    #[case(0.0, 200.0, 5.0)]
    #[case(-10.0, 200.0, 5.0)]
    #[case(100.0, 200.0, -3.0)]
    #[case(f64::NAN, 200.0, 5.0)]
    fn growth_rate_rejects_out_of_domain(
        #[case] current: f64,
        #[case] peak: f64,
        #[case] years: f64,
    ) {
        assert!(matches!(
            growth_rate(current, peak, years),
            Err(CalcError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn peak_population_reference_values() {
        assert_eq!(peak_population(1000.0, 50.0, 0.8).unwrap(), 16.0);
        assert_eq!(peak_population(1000.0, 50.0, 0.0).unwrap(), 0.0);
        assert_eq!(peak_population(1000.0, 50.0, 1.0).unwrap(), 20.0);
    }

    #[rstest]
    #[case(1000.0, 50.0, 1.5)]
    #[case(1000.0, 50.0, -0.1)]
    #[case(1000.0, 0.0, 0.5)]
    #[case(1000.0, -5.0, 0.5)]
    fn peak_population_rejects_out_of_domain(
        #[case] revenue: f64,
        #[case] price: f64,
        #[case] persistence: f64,
    ) {
        assert!(matches!(
            peak_population(revenue, price, persistence),
            Err(CalcError::InvalidArgument { .. })
        ));
    }

    #[rstest]
    #[case(25.0, 100.0, 25.0)]
    #[case(0.0, 100.0, 0.0)]
    #[case(3.0, 3.0, 100.0)]
    fn pipeline_density_reference_values(
        #[case] same: f64,
        #[case] total: f64,
        #[case] expected: f64,
    ) {
        assert_eq!(pipeline_density(same, total).unwrap(), expected);
    }

    #[rstest]
    #[case(5.0, 0.0)]
    #[case(5.0, -1.0)]
    #[case(-1.0, 100.0)]
    fn pipeline_density_rejects_out_of_domain(#[case] same: f64, #[case] total: f64) {
        assert!(matches!(
            pipeline_density(same, total),
            Err(CalcError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn similarity_identical_unit_vectors_is_one() {
        assert_eq!(similarity_score(&[1.0, 0.0, 0.0], &[1.0, 0.0, 0.0]).unwrap(), 1.0);
    }

    #[test]
    fn similarity_orthogonal_vectors_is_zero() {
        assert_eq!(similarity_score(&[1.0, 0.0], &[0.0, 1.0]).unwrap(), 0.0);
    }

    #[test]
    fn similarity_zero_vector_is_zero_by_convention() {
        assert_eq!(similarity_score(&[0.0, 0.0], &[3.0, 4.0]).unwrap(), 0.0);
        assert_eq!(similarity_score(&[0.0, 0.0], &[0.0, 0.0]).unwrap(), 0.0);
    }

    #[test]
    fn similarity_is_bounded_for_parallel_vectors() {
        let s = similarity_score(&[0.1, 0.2, 0.3], &[0.2, 0.4, 0.6]).unwrap();
        assert!(s <= 1.0 && (s - 1.0).abs() < 1e-12);
    }

    #[test]
    fn similarity_length_mismatch() {
        assert_eq!(
            similarity_score(&[1.0, 2.0], &[1.0]).unwrap_err(),
            CalcError::LengthMismatch { left: 2, right: 1 }
        );
    }

    #[test]
    fn similarity_empty_inputs() {
        assert_eq!(similarity_score(&[], &[]).unwrap_err(), CalcError::EmptyInput);
        assert_eq!(similarity_score(&[1.0], &[]).unwrap_err(), CalcError::EmptyInput);
    }

    #[test]
    fn functions_are_referentially_transparent() {
        let first = growth_rate(830.0, 4500.0, 6.0).unwrap();
        let second = growth_rate(830.0, 4500.0, 6.0).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn derive_reports_missing_inputs() {
        let facts = RawFacts::default();
        assert_eq!(
            derive(&facts).unwrap_err(),
            CalcError::MissingInput {
                field: "market.current_revenue_usd_m"
            }
        );
    }

    #[test]
    fn derive_combines_all_metrics() {
        let facts: RawFacts = serde_json::from_value(serde_json::json!({
            "market": {
                "current_revenue_usd_m": 830,
                "peak_revenue_usd_m": 4500,
                "years_to_peak": 6,
                "unit_price_usd": 150000,
                "persistence_rate": 0.8
            },
            "competition": {
                "same_category_count": 25,
                "total_pipeline_count": 100,
                "target_profile": [1, 0],
                "benchmark_profile": [1, 0]
            }
        }))
        .unwrap();
        let derived = derive(&facts).unwrap();
        assert_eq!(derived.growth_rate, growth_rate(830.0, 4500.0, 6.0).unwrap());
        assert_eq!(derived.peak_population, 24_000.0);
        assert_eq!(derived.pipeline_density, 25.0);
        assert_eq!(derived.similarity_score, 1.0);
    }
}
