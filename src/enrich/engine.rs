//! Core enrichment engine: one raw record in, one enriched record out
//!
//! The transform is stateless and row-independent, so the table map runs in
//! parallel. All classification fallbacks are total: no input row can fail
//! enrichment once the table has been read.

use super::fields;
use super::EnrichmentError;
use crate::hypotheses::{EquipmentCode, Hypotheses, DEFAULT_EFFICIENCY_RATE, DEFAULT_KEY};
use crate::record::{BeneficiaryType, EnrichedRecord, RawRecord, Sector, Status};
use chrono::Datelike;
use rayon::prelude::*;

/// Configuration for an enrichment run
#[derive(Debug, Clone, Copy)]
pub struct EnrichConfig {
    /// Real-efficiency rate applied to converted savings, in (0, 1]
    efficiency_rate: f64,
}

impl EnrichConfig {
    /// Create a config, rejecting efficiency rates outside (0, 1]
    pub fn new(efficiency_rate: f64) -> Result<Self, EnrichmentError> {
        if !(efficiency_rate > 0.0 && efficiency_rate <= 1.0) {
            return Err(EnrichmentError::InvalidEfficiencyRate(efficiency_rate));
        }
        Ok(Self { efficiency_rate })
    }

    pub fn efficiency_rate(&self) -> f64 {
        self.efficiency_rate
    }
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            efficiency_rate: DEFAULT_EFFICIENCY_RATE,
        }
    }
}

/// Record enricher holding the immutable hypotheses and the run config
pub struct Enricher {
    hypotheses: Hypotheses,
    config: EnrichConfig,
}

impl Enricher {
    pub fn new(hypotheses: Hypotheses, config: EnrichConfig) -> Self {
        Self { hypotheses, config }
    }

    /// Enrich a whole table. Row count and order are preserved; rows are
    /// independent, so the map runs on the rayon pool.
    pub fn enrich(&self, records: &[RawRecord]) -> Vec<EnrichedRecord> {
        log::debug!(
            "enriching {} records at efficiency rate {}",
            records.len(),
            self.config.efficiency_rate
        );
        records
            .par_iter()
            .map(|record| self.enrich_record(record))
            .collect()
    }

    /// Enrich a single record
    pub fn enrich_record(&self, raw: &RawRecord) -> EnrichedRecord {
        let validation_date = raw.validation_date.as_deref().and_then(fields::parse_date);
        let deposit_date = raw.deposit_date.as_deref().and_then(fields::parse_date);
        let start_date = raw.start_date.as_deref().and_then(fields::parse_date);
        let end_date = raw.end_date.as_deref().and_then(fields::parse_date);
        let invoice_date = raw.invoice_date.as_deref().and_then(fields::parse_date);

        let department = raw.postal_code.as_deref().map(fields::department);
        let period = fields::period(raw.period.as_deref(), raw.deposit_batch.as_deref());
        let mandataire = fields::mandataire(raw.mandataire.as_deref());

        let kwh_cumac = fields::parse_amount(raw.total.as_deref());
        let precarity_kwh_cumac = fields::parse_amount(raw.total_precarity.as_deref());
        let classic_kwh_cumac = fields::parse_amount(raw.total_classic.as_deref());
        let subsidy_eur = fields::parse_amount(raw.subsidy.as_deref());

        let (equipment_code, equipment_key, sector, sub_category) =
            match raw.equipment_code.as_deref() {
                Some(code) => {
                    let parsed = EquipmentCode::parse(code);
                    let sector = Sector::from_prefix(&parsed.prefix);
                    let sub_category = parsed
                        .sub_segment
                        .clone()
                        .unwrap_or_else(|| "N/A".to_string());
                    (
                        Some(code.trim().to_uppercase()),
                        parsed.key,
                        sector,
                        sub_category,
                    )
                }
                None => (
                    None,
                    DEFAULT_KEY.to_string(),
                    Sector::Other,
                    "N/A".to_string(),
                ),
            };

        let conversion_factor = self.hypotheses.equipment.conversion_factor(&equipment_key);
        let lifetime_years = self.hypotheses.equipment.lifetime_years(&equipment_key);

        // Precarity volume dominates the legal-identifier check
        let beneficiary_type = if precarity_kwh_cumac > 0.0 {
            BeneficiaryType::PrecarityHousehold
        } else if raw.legal_id_primary.is_some() || raw.legal_id_secondary.is_some() {
            BeneficiaryType::LegalEntity
        } else {
            BeneficiaryType::StandardHousehold
        };

        let status = if validation_date.is_some() {
            Status::Validated
        } else {
            Status::InProgress
        };
        let deposit_year = deposit_date.map(|d| d.year());

        // Metric chain: cumac → real annual → CO2 / households / avoided cost
        let constants = &self.hypotheses.constants;
        let kwh_real_annual = kwh_cumac * conversion_factor * self.config.efficiency_rate;
        let co2_avoided_tonnes_annual = kwh_real_annual * constants.co2_kg_per_kwh / 1000.0;
        let household_equivalents = kwh_real_annual / constants.household_consumption_kwh_year;
        let avoided_cost_eur_annual = kwh_real_annual * constants.heating_cost_eur_per_kwh;

        EnrichedRecord {
            validation_date,
            deposit_date,
            start_date,
            end_date,
            invoice_date,
            department,
            period,
            mandataire,
            equipment_code,
            equipment_key,
            sector,
            sub_category,
            beneficiary_type,
            status,
            deposit_year,
            conversion_factor,
            lifetime_years,
            kwh_cumac,
            gwh_cumac: kwh_cumac / 1_000_000.0,
            precarity_kwh_cumac,
            classic_kwh_cumac,
            kwh_real_annual,
            gwh_real_annual: kwh_real_annual / 1_000_000.0,
            co2_avoided_tonnes_annual,
            household_equivalents,
            avoided_cost_eur_annual,
            subsidy_eur,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn enricher(rate: f64) -> Enricher {
        Enricher::new(Hypotheses::default_p5(), EnrichConfig::new(rate).unwrap())
    }

    fn bar_th_record() -> RawRecord {
        RawRecord {
            total: Some("100000".to_string()),
            equipment_code: Some("BAR-TH-104".to_string()),
            deposit_date: Some("2022-03-01".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_worked_bar_th_example() {
        let enricher = enricher(0.45);
        let row = enricher.enrich_record(&bar_th_record());

        assert_eq!(row.equipment_key, "BAR-TH");
        assert_eq!(row.lifetime_years, 17);
        assert_eq!(row.deposit_year, Some(2022));
        assert_relative_eq!(row.conversion_factor, 1.0 / 12.16, epsilon = 1e-12);
        assert_relative_eq!(row.kwh_real_annual, 100000.0 * (1.0 / 12.16) * 0.45, epsilon = 1e-9);
        assert_relative_eq!(row.co2_avoided_tonnes_annual, row.kwh_real_annual * 0.057 / 1000.0, epsilon = 1e-12);
        assert_relative_eq!(row.household_equivalents, row.kwh_real_annual / 15312.0, epsilon = 1e-12);
        assert_relative_eq!(row.avoided_cost_eur_annual, row.kwh_real_annual * 0.10, epsilon = 1e-12);
        // ≈ 3700.66 kWh/an per the reference calibration
        assert!((row.kwh_real_annual - 3700.66).abs() < 0.01);
    }

    #[test]
    fn test_missing_equipment_code_falls_back_across_the_board() {
        let enricher = enricher(0.45);
        let raw = RawRecord {
            total: Some("50000".to_string()),
            ..Default::default()
        };
        let row = enricher.enrich_record(&raw);

        assert_eq!(row.equipment_key, "DEFAULT");
        assert_eq!(row.sector, Sector::Other);
        assert_eq!(row.sub_category, "N/A");
        assert_eq!(row.lifetime_years, 10);
        assert_relative_eq!(row.conversion_factor, 1.0 / 8.11, epsilon = 1e-12);
    }

    #[test]
    fn test_beneficiary_precarity_dominates_legal_identifier() {
        let enricher = enricher(0.45);
        let raw = RawRecord {
            total_precarity: Some("1200".to_string()),
            legal_id_primary: Some("552100554".to_string()),
            ..Default::default()
        };
        assert_eq!(
            enricher.enrich_record(&raw).beneficiary_type,
            BeneficiaryType::PrecarityHousehold
        );

        let raw = RawRecord {
            legal_id_secondary: Some("552100554".to_string()),
            ..Default::default()
        };
        assert_eq!(
            enricher.enrich_record(&raw).beneficiary_type,
            BeneficiaryType::LegalEntity
        );

        let raw = RawRecord::default();
        assert_eq!(
            enricher.enrich_record(&raw).beneficiary_type,
            BeneficiaryType::StandardHousehold
        );
    }

    #[test]
    fn test_status_follows_validation_date() {
        let enricher = enricher(0.45);
        let mut raw = bar_th_record();
        assert_eq!(enricher.enrich_record(&raw).status, Status::InProgress);

        raw.validation_date = Some("2022-06-15".to_string());
        assert_eq!(enricher.enrich_record(&raw).status, Status::Validated);

        // Unparsable validation date counts as missing
        raw.validation_date = Some("soon".to_string());
        assert_eq!(enricher.enrich_record(&raw).status, Status::InProgress);
    }

    #[test]
    fn test_department_derivation() {
        let enricher = enricher(0.45);
        let raw = RawRecord {
            postal_code: Some("1234".to_string()),
            ..Default::default()
        };
        assert_eq!(enricher.enrich_record(&raw).department.as_deref(), Some("01"));

        let raw = RawRecord::default();
        assert_eq!(enricher.enrich_record(&raw).department, None);
    }

    #[test]
    fn test_metrics_strictly_increase_with_efficiency_rate() {
        let raw = bar_th_record();
        let low = enricher(0.30).enrich_record(&raw);
        let high = enricher(0.60).enrich_record(&raw);

        assert!(high.kwh_real_annual > low.kwh_real_annual);
        assert!(high.co2_avoided_tonnes_annual > low.co2_avoided_tonnes_annual);
        assert!(high.household_equivalents > low.household_equivalents);
        assert!(high.avoided_cost_eur_annual > low.avoided_cost_eur_annual);
        // Cumac volume is untouched by the rate
        assert_eq!(high.kwh_cumac, low.kwh_cumac);
    }

    #[test]
    fn test_row_preservation_and_determinism() {
        let enricher = enricher(0.45);
        let records: Vec<RawRecord> = (0..50)
            .map(|i| RawRecord {
                total: Some(format!("{}", i * 1000)),
                equipment_code: Some("BAR-EN-101".to_string()),
                deposit_date: Some("2021-01-10".to_string()),
                ..Default::default()
            })
            .collect();

        let first = enricher.enrich(&records);
        let second = enricher.enrich(&records);

        assert_eq!(first.len(), records.len());
        assert_eq!(first, second);
    }

    #[test]
    fn test_efficiency_rate_domain() {
        assert!(EnrichConfig::new(0.45).is_ok());
        assert!(EnrichConfig::new(1.0).is_ok());
        assert!(EnrichConfig::new(0.0).is_err());
        assert!(EnrichConfig::new(1.5).is_err());
        assert!(EnrichConfig::new(-0.1).is_err());
    }

    #[test]
    fn test_malformed_amounts_default_to_zero() {
        let enricher = enricher(0.45);
        let raw = RawRecord {
            total: Some("n/a".to_string()),
            subsidy: Some("???".to_string()),
            equipment_code: Some("BAR-TH-104".to_string()),
            ..Default::default()
        };
        let row = enricher.enrich_record(&raw);
        assert_eq!(row.kwh_cumac, 0.0);
        assert_eq!(row.kwh_real_annual, 0.0);
        assert_eq!(row.subsidy_eur, 0.0);
    }
}
