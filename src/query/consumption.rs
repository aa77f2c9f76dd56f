use super::identifiers::IdentifierSet;
use crate::dataset::SecondaryTable;
use serde::Serialize;
use std::collections::BTreeMap;

/// Summed consumption per storage location, largest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LocationUsage {
    entries: Vec<(String, f64)>,
}

impl LocationUsage {
    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn title(&self) -> String {
        format!("Top {} Locations by Usage", self.len())
    }

    pub fn get(&self, location: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| name == location)
            .map(|&(_, qty)| qty)
    }
}

/// Top storage locations by consumption of the given materials.
///
/// Quantities are summed per location and the absolute value of each sum is
/// ranked, so issues and returns offset each other before ranking. Rows
/// without a location are skipped and missing quantities count as zero.
/// Locations with equal totals appear in label order.
///
/// A degraded table or an empty `ids` yields an empty result.
pub fn aggregate_locations(
    table: &SecondaryTable,
    ids: &IdentifierSet,
    limit: usize,
) -> LocationUsage {
    if ids.is_empty() {
        return LocationUsage::default();
    }

    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for record in table.records() {
        let Some(location) = record.storage_location.as_deref() else {
            continue;
        };
        if record.material.is_some_and(|m| ids.contains(m)) {
            *sums.entry(location).or_default() += record.quantity.unwrap_or(0.0);
        }
    }

    let mut entries: Vec<(String, f64)> = sums
        .into_iter()
        .map(|(location, sum)| (location.to_owned(), sum.abs()))
        .collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    entries.truncate(limit);

    tracing::debug!(locations = entries.len(), "Aggregated consumption by location");
    LocationUsage { entries }
}
