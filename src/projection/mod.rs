//! Future-savings projection accounting for equipment lifetimes

mod engine;
mod series;

pub use engine::{
    ProjectionConfig, ProjectionEngine, ProjectionError, DEFAULT_HORIZON_YEARS,
    DEFAULT_TOP_CATEGORIES, MAX_HORIZON_YEARS, MIN_HORIZON_YEARS, OTHER_CATEGORY,
};
pub use series::{ProjectionPoint, ProjectionSeries, YearTotal};
