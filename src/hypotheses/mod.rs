//! Working hypotheses: reference tables and constants behind every metric
//!
//! Loaded once at startup and passed read-only into the enricher and the
//! projection engine. The full set serializes to a JSON document so the
//! report can disclose exactly which assumptions produced its figures.

mod constants;
mod factors;

pub use constants::{ImpactConstants, ReferenceCities, DEFAULT_EFFICIENCY_RATE};
pub use factors::{EquipmentCode, EquipmentTables, DEFAULT_KEY};

use serde::{Deserialize, Serialize};

/// Container for all reference tables and constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hypotheses {
    pub equipment: EquipmentTables,
    pub constants: ImpactConstants,
    pub reference_cities: ReferenceCities,
}

impl Hypotheses {
    /// Hypotheses calibrated for the P5 reporting perimeter (France)
    pub fn default_p5() -> Self {
        Self {
            equipment: EquipmentTables::default_p5(),
            constants: ImpactConstants::default(),
            reference_cities: ReferenceCities::default(),
        }
    }

    /// Full hypothesis set as a pretty-printed JSON document (audit surface)
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for Hypotheses {
    fn default() -> Self {
        Self::default_p5()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_export_contains_tables_and_constants() {
        let hypotheses = Hypotheses::default_p5();
        let json = hypotheses.to_json_pretty().unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["equipment"]["conversion_factors"]["BAR-TH"].is_f64());
        assert_eq!(value["equipment"]["lifetimes_years"]["DEFAULT"], 10);
        assert_eq!(value["constants"]["co2_kg_per_kwh"], 0.057);
        assert_eq!(value["constants"]["household_consumption_kwh_year"], 15312.0);
    }
}
