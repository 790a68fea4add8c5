//! Record enrichment: raw rows in, classified and metric-bearing rows out

mod engine;
pub(crate) mod fields;

pub use engine::{EnrichConfig, Enricher};
pub use fields::{DEFAULT_PERIOD, MANDATAIRE_NOT_SPECIFIED};

use thiserror::Error;

/// Fatal-tier errors for the enrichment pipeline.
///
/// Per-field anomalies (unparsable dates, non-numeric amounts, unmapped
/// equipment keys) are absorbed as documented defaults and never surface
/// here; only a table that cannot be read at all aborts the pipeline.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    /// The input could not be read as a table at all
    #[error("input table is unreadable: {0}")]
    Unreadable(#[from] csv::Error),

    /// The input file could not be opened
    #[error("cannot open input: {0}")]
    Io(#[from] std::io::Error),

    /// Efficiency rate outside the contract domain (0, 1]
    #[error("efficiency rate {0} is outside (0, 1]")]
    InvalidEfficiencyRate(f64),
}
