//! Case record structures and export loading

mod data;
pub mod loader;

pub use data::{BeneficiaryType, EnrichedRecord, RawRecord, Sector, Status};
pub use loader::{load_records, load_records_from_reader};
