//! Physical and economic constants for the France perimeter

use serde::{Deserialize, Serialize};

/// Default real-efficiency rate applied to converted savings
pub const DEFAULT_EFFICIENCY_RATE: f64 = 0.45;

/// Scalar constants used by the impact metrics and their display equivalences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactConstants {
    /// CO2 emitted per kWh of energy (kg/kWh)
    pub co2_kg_per_kwh: f64,
    /// Annual CO2 emissions of an average car (tonnes/year)
    pub co2_tonnes_per_car_year: f64,
    /// CO2 emitted per km driven (kg/km)
    pub co2_kg_per_car_km: f64,
    /// CO2 absorbed by one tree per year (kg/year)
    pub co2_kg_per_tree_year: f64,
    /// Electricity cost (€/kWh), kept for reference
    pub electricity_cost_eur_per_kwh: f64,
    /// Heating cost (€/kWh); all avoided costs are valued at this rate
    pub heating_cost_eur_per_kwh: f64,
    /// Average annual consumption of a French household (kWh/year)
    pub household_consumption_kwh_year: f64,
    /// Earth circumference (km), for the "car laps around the Earth" figure
    pub earth_circumference_km: f64,
    /// Discount rate, part of the hypothesis set but unused in core metrics
    pub discount_rate: f64,
}

impl Default for ImpactConstants {
    fn default() -> Self {
        Self {
            co2_kg_per_kwh: 0.057,
            co2_tonnes_per_car_year: 2.8,
            co2_kg_per_car_km: 0.12,
            co2_kg_per_tree_year: 25.0,
            electricity_cost_eur_per_kwh: 0.22,
            heating_cost_eur_per_kwh: 0.10,
            household_consumption_kwh_year: 15312.0,
            earth_circumference_km: 40075.0,
            discount_rate: 0.04,
        }
    }
}

/// Population-threshold to reference-city lookup, used only for the
/// human-readable "equivalent to the city of …" line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceCities {
    /// (population threshold, label), sorted ascending by threshold
    entries: Vec<(u64, String)>,
}

impl Default for ReferenceCities {
    fn default() -> Self {
        let entries = [
            (10_000, "Luxeuil-les-Bains (10k hab)"),
            (25_000, "Saintes (25k hab)"),
            (32_175, "Aix-les-Bains-Rhône (32k hab)"),
            (50_000, "Niort (50k hab)"),
            (100_000, "Nancy (100k hab)"),
            (250_000, "Montpellier (250k hab)"),
            (500_000, "Lyon (500k hab)"),
            (1_000_000, "Marseille (1M hab)"),
            (2_000_000, "Paris (2.2M hab)"),
        ]
        .into_iter()
        .map(|(threshold, label)| (threshold, label.to_string()))
        .collect();
        Self { entries }
    }
}

impl ReferenceCities {
    /// Smallest reference city whose population covers `inhabitants`;
    /// populations beyond the largest threshold fall back to the last entry.
    pub fn city_for(&self, inhabitants: f64) -> &str {
        for (threshold, label) in &self.entries {
            if inhabitants <= *threshold as f64 {
                return label;
            }
        }
        self.entries
            .last()
            .map(|(_, label)| label.as_str())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_city_lookup() {
        let cities = ReferenceCities::default();
        assert_eq!(cities.city_for(8_000.0), "Luxeuil-les-Bains (10k hab)");
        assert_eq!(cities.city_for(10_000.0), "Luxeuil-les-Bains (10k hab)");
        assert_eq!(cities.city_for(60_000.0), "Nancy (100k hab)");
        assert_eq!(cities.city_for(5_000_000.0), "Paris (2.2M hab)");
    }
}
