//! CEE Impact - record enrichment and savings projection for CEE case exports
//!
//! This library provides:
//! - Best-effort loading of heterogeneous CEE spreadsheet exports
//! - Per-record classification (equipment key, sector, beneficiary, status)
//! - Energy / CO2 / financial impact metrics under an efficiency-rate hypothesis
//! - Lifetime-windowed projection of the future active-savings flow
//! - A JSON-exportable hypothesis set for audit

pub mod enrich;
pub mod hypotheses;
pub mod projection;
pub mod record;
pub mod report;

// Re-export commonly used types
pub use enrich::{EnrichConfig, Enricher, EnrichmentError};
pub use hypotheses::Hypotheses;
pub use projection::{ProjectionConfig, ProjectionEngine, ProjectionSeries};
pub use record::{load_records, load_records_from_reader, EnrichedRecord, RawRecord};
pub use report::{ReportRunner, Summary};
