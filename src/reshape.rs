//! Flattening grouped distances into labeled records.

use error_stack::Report;

use crate::core::{Category, DistanceRecord, GroupedDistances};
use crate::error::{CloudError, Result};

/// One record per distance, walking `categories` in order and each
/// category's values in order.
///
/// Every listed category must be present in `raw`; categories in `raw`
/// that are not listed are ignored.
pub fn reshape(raw: &GroupedDistances, categories: &[Category]) -> Result<Vec<DistanceRecord>> {
    let mut records = Vec::new();
    for category in categories {
        let values = raw
            .get(category.as_str())
            .ok_or_else(|| Report::new(CloudError::MissingCategory(category.clone())))?;
        records.extend(values.iter().map(|&distance| DistanceRecord {
            comparison: category.clone(),
            distance,
        }));
    }
    Ok(records)
}

/// Distances recorded for `category`, in arrival order.
pub fn values_for(records: &[DistanceRecord], category: &Category) -> Vec<f64> {
    records
        .iter()
        .filter(|r| &r.comparison == category)
        .map(|r| r.distance)
        .collect()
}

/// Records grouped by category, groups ordered by first appearance.
pub fn group_by_category(records: &[DistanceRecord]) -> Vec<(Category, Vec<f64>)> {
    let mut groups: Vec<(Category, Vec<f64>)> = Vec::new();
    for r in records {
        match groups.iter_mut().find(|(c, _)| c == &r.comparison) {
            Some((_, values)) => values.push(r.distance),
            None => groups.push((r.comparison.clone(), vec![r.distance])),
        }
    }
    groups
}
