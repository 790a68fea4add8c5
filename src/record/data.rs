//! Case record structures matching the CEE export format

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One raw row of the uploaded CEE table.
///
/// Every field is optional: the export format varies between emitters, and a
/// missing column simply leaves the field absent for every row. Blank and
/// `nan` cells are treated as absent too (the loader normalizes them).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// `Date Validation`
    pub validation_date: Option<String>,
    /// `Date depot`
    pub deposit_date: Option<String>,
    /// `Date de début`
    pub start_date: Option<String>,
    /// `Date de fin`
    pub end_date: Option<String>,
    /// `Date de la facture`
    pub invoice_date: Option<String>,
    /// `code postal`
    pub postal_code: Option<String>,
    /// `PERIODE`
    pub period: Option<String>,
    /// `Depot` (batch label, e.g. "Depot P5-2023-04")
    pub deposit_batch: Option<String>,
    /// `Mandataire`
    pub mandataire: Option<String>,
    /// `Total` (kWh cumac)
    pub total: Option<String>,
    /// `Total précarité` (kWh cumac attributed to precarity households)
    pub total_precarity: Option<String>,
    /// `Total classique`
    pub total_classic: Option<String>,
    /// `Tableau Recapitulatif champ 23` (subsidy paid, €)
    pub subsidy: Option<String>,
    /// `Code équipement`
    pub equipment_code: Option<String>,
    /// `Tableau Recapitulatif champ 8` (SIREN-type identifier)
    pub legal_id_primary: Option<String>,
    /// `Tableau Recapitulatif champ 9` (SIREN-type identifier)
    pub legal_id_secondary: Option<String>,
}

/// Activity sector derived from the equipment code prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sector {
    /// BAR — residential buildings
    #[serde(rename = "Bât. Résidentiel")]
    Residential,
    /// BAT — tertiary buildings
    #[serde(rename = "Bât. Tertiaire")]
    Tertiary,
    /// TRA
    #[serde(rename = "Transport")]
    Transport,
    /// AGRI
    #[serde(rename = "Agriculture")]
    Agriculture,
    /// IND
    #[serde(rename = "Industrie")]
    Industry,
    /// Any other or missing prefix
    #[serde(rename = "Autre")]
    Other,
}

impl Sector {
    /// Map an uppercased code prefix to its sector
    pub fn from_prefix(prefix: &str) -> Self {
        match prefix {
            "BAR" => Sector::Residential,
            "BAT" => Sector::Tertiary,
            "TRA" => Sector::Transport,
            "AGRI" => Sector::Agriculture,
            "IND" => Sector::Industry,
            _ => Sector::Other,
        }
    }

    /// French display label, as emitted by the report
    pub fn label(&self) -> &'static str {
        match self {
            Sector::Residential => "Bât. Résidentiel",
            Sector::Tertiary => "Bât. Tertiaire",
            Sector::Transport => "Transport",
            Sector::Agriculture => "Agriculture",
            Sector::Industry => "Industrie",
            Sector::Other => "Autre",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Beneficiary classification.
///
/// Priority order: a positive precarity volume wins over the presence of a
/// legal-entity identifier, which wins over the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeneficiaryType {
    /// Energy-precarity household (Total précarité > 0)
    #[serde(rename = "Précarité énergétique")]
    PrecarityHousehold,
    /// Legal entity (a SIREN-type identifier is present)
    #[serde(rename = "Personne Morale")]
    LegalEntity,
    /// Standard household
    #[serde(rename = "Ménage Classique")]
    StandardHousehold,
}

impl BeneficiaryType {
    pub fn label(&self) -> &'static str {
        match self {
            BeneficiaryType::PrecarityHousehold => "Précarité énergétique",
            BeneficiaryType::LegalEntity => "Personne Morale",
            BeneficiaryType::StandardHousehold => "Ménage Classique",
        }
    }
}

impl fmt::Display for BeneficiaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Case status, derived from the validation date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "Validé")]
    Validated,
    #[serde(rename = "En cours")]
    InProgress,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Validated => f.write_str("Validé"),
            Status::InProgress => f.write_str("En cours"),
        }
    }
}

/// One enriched case record: the raw row plus every derived classification
/// and metric column. Field order is the CSV output column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    // Parsed dates
    pub validation_date: Option<NaiveDate>,
    pub deposit_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub invoice_date: Option<NaiveDate>,

    // Classification
    pub department: Option<String>,
    pub period: String,
    pub mandataire: String,
    pub equipment_code: Option<String>,
    pub equipment_key: String,
    pub sector: Sector,
    pub sub_category: String,
    pub beneficiary_type: BeneficiaryType,
    pub status: Status,
    pub deposit_year: Option<i32>,

    // Lookups applied to this record
    pub conversion_factor: f64,
    pub lifetime_years: u32,

    // Volumes
    pub kwh_cumac: f64,
    pub gwh_cumac: f64,
    pub precarity_kwh_cumac: f64,
    pub classic_kwh_cumac: f64,

    // Derived metrics
    pub kwh_real_annual: f64,
    pub gwh_real_annual: f64,
    pub co2_avoided_tonnes_annual: f64,
    pub household_equivalents: f64,
    pub avoided_cost_eur_annual: f64,
    pub subsidy_eur: f64,
}

impl EnrichedRecord {
    /// Whether this record participates in the lifetime-windowed projection
    pub fn is_projectable(&self) -> bool {
        self.deposit_year.is_some()
    }

    /// Active-savings window test: a record deposited in year `y0` with a
    /// lifetime of `n` years is active for `y0, y0+1, …, y0+n-1`.
    pub fn is_active_in(&self, year: i32) -> bool {
        match self.deposit_year {
            Some(y0) => y0 <= year && year < y0 + self.lifetime_years as i32,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sector_from_prefix() {
        assert_eq!(Sector::from_prefix("BAR"), Sector::Residential);
        assert_eq!(Sector::from_prefix("BAT"), Sector::Tertiary);
        assert_eq!(Sector::from_prefix("TRA"), Sector::Transport);
        assert_eq!(Sector::from_prefix("AGRI"), Sector::Agriculture);
        assert_eq!(Sector::from_prefix("IND"), Sector::Industry);
        assert_eq!(Sector::from_prefix("RES"), Sector::Other);
        assert_eq!(Sector::from_prefix(""), Sector::Other);
    }

    #[test]
    fn test_active_window_is_half_open() {
        let mut record = EnrichedRecord {
            validation_date: None,
            deposit_date: None,
            start_date: None,
            end_date: None,
            invoice_date: None,
            department: None,
            period: "P5".to_string(),
            mandataire: "Non renseigné".to_string(),
            equipment_code: None,
            equipment_key: "BAR-TH".to_string(),
            sector: Sector::Residential,
            sub_category: "TH".to_string(),
            beneficiary_type: BeneficiaryType::StandardHousehold,
            status: Status::InProgress,
            deposit_year: Some(2020),
            conversion_factor: 1.0 / 12.16,
            lifetime_years: 5,
            kwh_cumac: 0.0,
            gwh_cumac: 0.0,
            precarity_kwh_cumac: 0.0,
            classic_kwh_cumac: 0.0,
            kwh_real_annual: 0.0,
            gwh_real_annual: 0.0,
            co2_avoided_tonnes_annual: 0.0,
            household_equivalents: 0.0,
            avoided_cost_eur_annual: 0.0,
            subsidy_eur: 0.0,
        };

        assert!(!record.is_active_in(2019));
        assert!(record.is_active_in(2020));
        assert!(record.is_active_in(2024));
        assert!(!record.is_active_in(2025));

        record.deposit_year = None;
        assert!(!record.is_active_in(2020));
        assert!(!record.is_projectable());
    }
}
