//! Load raw case records from a CEE export (CSV)
//!
//! Column recognition is by verbatim French header label. A missing column
//! leaves the corresponding field absent on every row; only a structurally
//! unreadable input is an error (the fatal tier of the pipeline).

use super::RawRecord;
use crate::enrich::EnrichmentError;
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;

/// Recognized column labels, kept verbatim for compatibility with the
/// upstream export format.
mod columns {
    pub const DATE_VALIDATION: &str = "Date Validation";
    pub const DATE_DEPOT: &str = "Date depot";
    pub const DATE_DEBUT: &str = "Date de début";
    pub const DATE_FIN: &str = "Date de fin";
    pub const DATE_FACTURE: &str = "Date de la facture";
    pub const CODE_POSTAL: &str = "code postal";
    pub const PERIODE: &str = "PERIODE";
    pub const DEPOT: &str = "Depot";
    pub const MANDATAIRE: &str = "Mandataire";
    pub const TOTAL: &str = "Total";
    pub const TOTAL_PRECARITE: &str = "Total précarité";
    pub const TOTAL_CLASSIQUE: &str = "Total classique";
    pub const CHAMP_23: &str = "Tableau Recapitulatif champ 23";
    pub const CODE_EQUIPEMENT: &str = "Code équipement";
    pub const CHAMP_8: &str = "Tableau Recapitulatif champ 8";
    pub const CHAMP_9: &str = "Tableau Recapitulatif champ 9";
}

/// Positions of the recognized columns within one export's header row
#[derive(Debug, Default)]
struct ColumnMap {
    validation_date: Option<usize>,
    deposit_date: Option<usize>,
    start_date: Option<usize>,
    end_date: Option<usize>,
    invoice_date: Option<usize>,
    postal_code: Option<usize>,
    period: Option<usize>,
    deposit_batch: Option<usize>,
    mandataire: Option<usize>,
    total: Option<usize>,
    total_precarity: Option<usize>,
    total_classic: Option<usize>,
    subsidy: Option<usize>,
    equipment_code: Option<usize>,
    legal_id_primary: Option<usize>,
    legal_id_secondary: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut map = Self::default();
        for (index, header) in headers.iter().enumerate() {
            match header.trim() {
                columns::DATE_VALIDATION => map.validation_date = Some(index),
                columns::DATE_DEPOT => map.deposit_date = Some(index),
                columns::DATE_DEBUT => map.start_date = Some(index),
                columns::DATE_FIN => map.end_date = Some(index),
                columns::DATE_FACTURE => map.invoice_date = Some(index),
                columns::CODE_POSTAL => map.postal_code = Some(index),
                columns::PERIODE => map.period = Some(index),
                columns::DEPOT => map.deposit_batch = Some(index),
                columns::MANDATAIRE => map.mandataire = Some(index),
                columns::TOTAL => map.total = Some(index),
                columns::TOTAL_PRECARITE => map.total_precarity = Some(index),
                columns::TOTAL_CLASSIQUE => map.total_classic = Some(index),
                columns::CHAMP_23 => map.subsidy = Some(index),
                columns::CODE_EQUIPEMENT => map.equipment_code = Some(index),
                columns::CHAMP_8 => map.legal_id_primary = Some(index),
                columns::CHAMP_9 => map.legal_id_secondary = Some(index),
                _ => {}
            }
        }
        map
    }

    fn to_record(&self, row: &StringRecord) -> RawRecord {
        RawRecord {
            validation_date: cell(row, self.validation_date),
            deposit_date: cell(row, self.deposit_date),
            start_date: cell(row, self.start_date),
            end_date: cell(row, self.end_date),
            invoice_date: cell(row, self.invoice_date),
            postal_code: cell(row, self.postal_code),
            period: cell(row, self.period),
            deposit_batch: cell(row, self.deposit_batch),
            mandataire: cell(row, self.mandataire),
            total: cell(row, self.total),
            total_precarity: cell(row, self.total_precarity),
            total_classic: cell(row, self.total_classic),
            subsidy: cell(row, self.subsidy),
            equipment_code: cell(row, self.equipment_code),
            legal_id_primary: cell(row, self.legal_id_primary),
            legal_id_secondary: cell(row, self.legal_id_secondary),
        }
    }
}

/// One cell as an optional field: blank and `nan` cells are absent
fn cell(row: &StringRecord, index: Option<usize>) -> Option<String> {
    let value = row.get(index?)?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        return None;
    }
    Some(value.to_string())
}

/// Load all case records from a CSV file
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<RawRecord>, EnrichmentError> {
    let file = std::fs::File::open(path)?;
    load_records_from_reader(file)
}

/// Load case records from any reader (e.g., string buffer, upload stream)
pub fn load_records_from_reader<R: Read>(reader: R) -> Result<Vec<RawRecord>, EnrichmentError> {
    // Row length varies between emitters; short rows read as absent cells
    let mut csv_reader = ReaderBuilder::new().flexible(true).from_reader(reader);

    let map = ColumnMap::from_headers(csv_reader.headers()?);
    let mut records = Vec::new();

    for result in csv_reader.records() {
        let row = result?;
        records.push(map.to_record(&row));
    }

    log::debug!("loaded {} raw records", records.len());
    Ok(records)
}
