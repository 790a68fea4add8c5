//! Report runner: pre-loads hypotheses once, then runs enrichment and
//! projection for varying parameters without rebuilding the tables.
//!
//! Also computes the KPI summary the CLI prints (totals plus the
//! human-readable equivalences backed by the hypothesis constants).

use crate::enrich::{EnrichConfig, Enricher};
use crate::hypotheses::Hypotheses;
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionSeries};
use crate::record::{EnrichedRecord, RawRecord};
use serde::Serialize;
use std::collections::HashSet;

/// Display-only multiplier turning household equivalents into inhabitants
/// for the reference-city line. Not a core metric.
const HOUSEHOLD_POPULATION_MULTIPLIER: f64 = 2.2;

/// Pre-loaded runner for the full enrich-then-project pipeline
///
/// # Example
/// ```ignore
/// let runner = ReportRunner::new();
/// let enriched = runner.enrich(&records, EnrichConfig::new(0.45)?);
/// let series = runner.project(&enriched, ProjectionConfig::new(20)?);
/// ```
#[derive(Debug, Clone)]
pub struct ReportRunner {
    hypotheses: Hypotheses,
}

impl ReportRunner {
    /// Create a runner with the default P5 hypotheses
    pub fn new() -> Self {
        Self {
            hypotheses: Hypotheses::default_p5(),
        }
    }

    /// Create a runner with pre-built hypotheses
    pub fn with_hypotheses(hypotheses: Hypotheses) -> Self {
        Self { hypotheses }
    }

    /// Reference to the hypotheses for inspection or the audit export
    pub fn hypotheses(&self) -> &Hypotheses {
        &self.hypotheses
    }

    /// Enrich a raw table with the given efficiency configuration
    pub fn enrich(&self, records: &[RawRecord], config: EnrichConfig) -> Vec<EnrichedRecord> {
        let enricher = Enricher::new(self.hypotheses.clone(), config);
        enricher.enrich(records)
    }

    /// Project an enriched table over the configured horizon
    pub fn project(&self, enriched: &[EnrichedRecord], config: ProjectionConfig) -> ProjectionSeries {
        ProjectionEngine::new(config).project(enriched)
    }

    /// Run the full pipeline: enrich then project
    pub fn run(
        &self,
        records: &[RawRecord],
        enrich_config: EnrichConfig,
        projection_config: ProjectionConfig,
    ) -> (Vec<EnrichedRecord>, ProjectionSeries) {
        let enriched = self.enrich(records, enrich_config);
        let series = self.project(&enriched, projection_config);
        (enriched, series)
    }

    /// Aggregate the KPI summary over an enriched table
    pub fn summarize(&self, enriched: &[EnrichedRecord]) -> Summary {
        let constants = &self.hypotheses.constants;

        let mut summary = Summary {
            case_count: enriched.len(),
            ..Default::default()
        };
        let mut distinct_codes: HashSet<&str> = HashSet::new();

        for record in enriched {
            summary.total_gwh_cumac += record.gwh_cumac;
            summary.total_gwh_real_annual += record.gwh_real_annual;
            summary.total_co2_tonnes_annual += record.co2_avoided_tonnes_annual;
            summary.total_household_equivalents += record.household_equivalents;
            summary.total_subsidies_eur += record.subsidy_eur;
            summary.total_avoided_cost_eur_annual += record.avoided_cost_eur_annual;
            if let Some(code) = record.equipment_code.as_deref() {
                distinct_codes.insert(code);
            }
        }
        summary.distinct_operations = distinct_codes.len();

        summary.cars_removed_equivalent =
            summary.total_co2_tonnes_annual / constants.co2_tonnes_per_car_year;
        summary.earth_laps_equivalent = summary.total_co2_tonnes_annual * 1000.0
            / (constants.earth_circumference_km * constants.co2_kg_per_car_km);
        summary.trees_equivalent =
            summary.total_co2_tonnes_annual * 1000.0 / constants.co2_kg_per_tree_year;

        let inhabitants = summary.total_household_equivalents * HOUSEHOLD_POPULATION_MULTIPLIER;
        summary.reference_city = self
            .hypotheses
            .reference_cities
            .city_for(inhabitants)
            .to_string();

        summary
    }
}

impl Default for ReportRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregate KPIs over one enriched table
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub case_count: usize,
    pub distinct_operations: usize,
    pub total_gwh_cumac: f64,
    pub total_gwh_real_annual: f64,
    pub total_co2_tonnes_annual: f64,
    pub total_household_equivalents: f64,
    pub total_subsidies_eur: f64,
    pub total_avoided_cost_eur_annual: f64,

    // Display equivalences
    pub cars_removed_equivalent: f64,
    pub earth_laps_equivalent: f64,
    pub trees_equivalent: f64,
    pub reference_city: String,
}
