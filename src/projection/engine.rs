//! Lifetime-windowed projection of active annual savings
//!
//! Each record contributes its real annual savings for every year of its
//! equipment lifetime, starting at the deposit year; the engine sums the
//! active flow per year so the series decays as equipment expires instead
//! of growing as a naive cumulative total.

use super::series::{ProjectionPoint, ProjectionSeries, YearTotal};
use crate::record::EnrichedRecord;
use chrono::{Datelike, Local};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;

/// Supported horizon range (years beyond the current calendar year)
pub const MIN_HORIZON_YEARS: u32 = 10;
pub const MAX_HORIZON_YEARS: u32 = 40;
pub const DEFAULT_HORIZON_YEARS: u32 = 20;

/// How many categories are kept before bucketing into "Autres"
pub const DEFAULT_TOP_CATEGORIES: usize = 5;

/// Bucket label for categories outside the top ranking
pub const OTHER_CATEGORY: &str = "Autres";

/// Projection configuration errors
#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("projection horizon {0} is outside the supported range 10-40 years")]
    InvalidHorizon(u32),
}

/// Configuration for a projection run
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Years to project beyond the current calendar year
    pub horizon_years: u32,

    /// Categories kept in the breakdown before the "Autres" bucket.
    /// Bounds the per-year label cardinality at `top_categories + 1`.
    pub top_categories: usize,

    /// Calendar year anchoring the horizon; None means "today"
    pub current_year: Option<i32>,
}

impl ProjectionConfig {
    /// Create a config for a given horizon, validating the supported range
    pub fn new(horizon_years: u32) -> Result<Self, ProjectionError> {
        if !(MIN_HORIZON_YEARS..=MAX_HORIZON_YEARS).contains(&horizon_years) {
            return Err(ProjectionError::InvalidHorizon(horizon_years));
        }
        Ok(Self {
            horizon_years,
            ..Self::default()
        })
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            horizon_years: DEFAULT_HORIZON_YEARS,
            top_categories: DEFAULT_TOP_CATEGORIES,
            current_year: None,
        }
    }
}

/// Projection engine over an enriched table
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    /// Project the active-savings flow year by year.
    ///
    /// Returns an empty series when no record carries a deposit year
    /// (callers skip the projection display in that case).
    pub fn project(&self, records: &[EnrichedRecord]) -> ProjectionSeries {
        let eligible: Vec<&EnrichedRecord> =
            records.iter().filter(|r| r.is_projectable()).collect();
        if eligible.is_empty() {
            return ProjectionSeries::default();
        }

        let start_year = match eligible.iter().filter_map(|r| r.deposit_year).min() {
            Some(year) => year,
            None => return ProjectionSeries::default(),
        };
        let current_year = self
            .config
            .current_year
            .unwrap_or_else(|| Local::now().year());
        let end_year = current_year + self.config.horizon_years as i32;

        // Ranked over the whole table, not just projectable rows: a record
        // without a deposit year still claims its global top slot
        let top = self.top_categories(records);

        let mut series = ProjectionSeries::default();
        for year in start_year..=end_year {
            let mut by_category: BTreeMap<&str, f64> = BTreeMap::new();
            for record in &eligible {
                if record.is_active_in(year) {
                    let category = if top.contains(record.equipment_key.as_str()) {
                        record.equipment_key.as_str()
                    } else {
                        OTHER_CATEGORY
                    };
                    *by_category.entry(category).or_insert(0.0) += record.gwh_real_annual;
                }
            }

            if by_category.is_empty() {
                continue;
            }

            let mut year_total = 0.0;
            for (category, savings_gwh) in by_category {
                year_total += savings_gwh;
                series.points.push(ProjectionPoint {
                    year,
                    category: category.to_string(),
                    savings_gwh,
                });
            }
            series.totals.push(YearTotal {
                year,
                savings_gwh: year_total,
            });
        }

        series
    }

    /// Globally-highest categories by total real annual energy, computed
    /// once over the full enriched table before the year loop. Ties break
    /// alphabetically so the ranking is deterministic.
    fn top_categories<'a>(&self, records: &'a [EnrichedRecord]) -> HashSet<&'a str> {
        let mut totals: HashMap<&str, f64> = HashMap::new();
        for record in records {
            *totals.entry(record.equipment_key.as_str()).or_insert(0.0) +=
                record.gwh_real_annual;
        }

        let mut ranked: Vec<(&str, f64)> = totals.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });

        ranked
            .into_iter()
            .take(self.config.top_categories)
            .map(|(key, _)| key)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::{EnrichConfig, Enricher};
    use crate::hypotheses::Hypotheses;
    use crate::record::RawRecord;
    use approx::assert_relative_eq;

    fn enrich(rows: Vec<RawRecord>) -> Vec<EnrichedRecord> {
        let enricher = Enricher::new(Hypotheses::default_p5(), EnrichConfig::default());
        enricher.enrich(&rows)
    }

    fn raw(total: &str, code: &str, deposit: &str) -> RawRecord {
        RawRecord {
            total: Some(total.to_string()),
            equipment_code: Some(code.to_string()),
            deposit_date: Some(deposit.to_string()),
            ..Default::default()
        }
    }

    fn engine(horizon: u32, current_year: i32) -> ProjectionEngine {
        let mut config = ProjectionConfig::new(horizon).unwrap();
        config.current_year = Some(current_year);
        ProjectionEngine::new(config)
    }

    #[test]
    fn test_lifetime_window_bounds_activity() {
        let mut records = enrich(vec![raw("1000000", "BAR-TH-104", "2020-05-01")]);
        // Pin the lifetime to 5 years for the windowing check
        records[0].lifetime_years = 5;

        let series = engine(20, 2025).project(&records);

        assert!(series.total_for(2019).is_none());
        assert!(series.total_for(2020).is_some());
        assert!(series.total_for(2024).is_some());
        assert!(series.total_for(2025).is_none());
    }

    #[test]
    fn test_empty_series_without_deposit_years() {
        let rows = vec![RawRecord {
            total: Some("100000".to_string()),
            equipment_code: Some("BAR-TH-104".to_string()),
            ..Default::default()
        }];
        let series = engine(20, 2025).project(&enrich(rows));
        assert!(series.is_empty());
        assert!(series.totals.is_empty());
    }

    #[test]
    fn test_category_cardinality_is_bounded() {
        // Seven distinct keys; five survive, the rest fold into Autres
        let codes = [
            "BAR-TH-104",
            "BAR-EN-101",
            "BAR-EQ-115",
            "BAT-TH-116",
            "BAT-EN-101",
            "TRA-SE-101",
            "IND-UT-117",
        ];
        let rows: Vec<RawRecord> = codes
            .iter()
            .enumerate()
            .map(|(i, code)| raw(&format!("{}", (i + 1) * 100000), code, "2022-01-15"))
            .collect();

        let series = engine(20, 2025).project(&enrich(rows));
        let categories = series.categories_for(2022);

        assert!(!categories.is_empty());
        assert!(categories.len() <= DEFAULT_TOP_CATEGORIES + 1);
        assert!(categories.contains(&OTHER_CATEGORY));
    }

    #[test]
    fn test_ranking_covers_records_without_deposit_year() {
        // The dominant BAT-EN record has no deposit year, so it never
        // appears in the series, but it still holds the global top slot
        // and pushes the small BAR-TH key into Autres.
        let rows = vec![
            raw("1000000", "BAR-TH-104", "2020-05-01"),
            RawRecord {
                total: Some("100000000000".to_string()),
                equipment_code: Some("BAT-EN-101".to_string()),
                ..Default::default()
            },
        ];
        let records = enrich(rows);

        let mut config = ProjectionConfig::new(20).unwrap();
        config.current_year = Some(2025);
        config.top_categories = 1;
        let series = ProjectionEngine::new(config).project(&records);

        assert_eq!(series.categories_for(2020), vec![OTHER_CATEGORY]);
    }

    #[test]
    fn test_total_matches_breakdown_sum() {
        let rows = vec![
            raw("500000", "BAR-TH-104", "2021-02-01"),
            raw("300000", "BAT-EN-101", "2021-07-01"),
            raw("200000", "TRA-SE-101", "2021-09-01"),
        ];
        let series = engine(10, 2022).project(&enrich(rows));

        let breakdown_2021: f64 = series
            .points
            .iter()
            .filter(|p| p.year == 2021)
            .map(|p| p.savings_gwh)
            .sum();
        assert_relative_eq!(
            series.total_for(2021).unwrap(),
            breakdown_2021,
            epsilon = 1e-12
        );

        // TRA expires after one year; 2022 must carry less flow than 2021
        let total_2021 = series.total_for(2021).unwrap();
        let total_2022 = series.total_for(2022).unwrap();
        assert!(total_2022 < total_2021);
    }

    #[test]
    fn test_horizon_domain() {
        assert!(ProjectionConfig::new(10).is_ok());
        assert!(ProjectionConfig::new(40).is_ok());
        assert!(ProjectionConfig::new(9).is_err());
        assert!(ProjectionConfig::new(41).is_err());
    }

    #[test]
    fn test_series_extends_to_current_year_plus_horizon() {
        // BAR-EN lives 30 years, so the flow reaches the horizon end
        let rows = vec![raw("1000000", "BAR-EN-101", "2022-01-01")];
        let series = engine(10, 2025).project(&enrich(rows));

        assert_eq!(series.totals.first().unwrap().year, 2022);
        assert_eq!(series.totals.last().unwrap().year, 2035);
    }
}
