//! Projection output structures

use serde::{Deserialize, Serialize};

/// Savings of one category during one projection year (GWh/year)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub year: i32,
    /// Equipment key, or the "Autres" bucket
    pub category: String,
    pub savings_gwh: f64,
}

/// Category-summed savings for one projection year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearTotal {
    pub year: i32,
    pub savings_gwh: f64,
}

/// Year-indexed series of active annual savings.
///
/// `points` carries the per-category breakdown (one entry per non-empty
/// category per year); `totals` carries the category-summed flow. Both are
/// empty when no record has a deposit year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSeries {
    pub points: Vec<ProjectionPoint>,
    pub totals: Vec<YearTotal>,
}

impl ProjectionSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total savings for a given year, if any record is active then
    pub fn total_for(&self, year: i32) -> Option<f64> {
        self.totals
            .iter()
            .find(|t| t.year == year)
            .map(|t| t.savings_gwh)
    }

    /// Distinct category labels appearing in a given year
    pub fn categories_for(&self, year: i32) -> Vec<&str> {
        self.points
            .iter()
            .filter(|p| p.year == year)
            .map(|p| p.category.as_str())
            .collect()
    }
}
