//! The per-interaction pipeline.
//!
//! One call to [`DashboardQuery::run`] takes the pasted text through every
//! stage and returns a [`DashboardReport`]:
//!
//! ```text
//! pasted text ─> identifiers ─> filter ─┬─> usage parse ─> top materials
//!                     │                 └─> results table
//!                     └──────────────────> consumption by location
//! ```
//!
//! The loaded [`Datasets`] are only borrowed; everything in the report is
//! built fresh for the call.

use crate::config::Limits;
use crate::dataset::Datasets;
use crate::error::Result;
use serde::Serialize;

pub mod consumption;
pub mod filter;
pub mod identifiers;
pub mod ranking;
pub mod usage;

pub use consumption::{LocationUsage, aggregate_locations};
pub use filter::{FilteredView, filter_inventory};
pub use identifiers::{IdentifierSet, parse_identifiers};
pub use ranking::{RankedMaterial, TopMaterials, rank_top_materials};
pub use usage::{UsageQuantity, parse_usage};

/// State of the top-materials chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum MaterialChart {
    AwaitingInput,
    Ranked(TopMaterials),
}

impl MaterialChart {
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::AwaitingInput => Some("Enter IDs to see material chart."),
            Self::Ranked(_) => None,
        }
    }
}

/// State of the top-locations chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum LocationChart {
    /// No inventory rows are selected yet.
    AwaitingInput,
    /// Consumption data failed to load at startup.
    Unavailable { reason: String },
    /// Consumption data is loaded but has nothing for these materials.
    NoData,
    Ranked(LocationUsage),
}

impl LocationChart {
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::AwaitingInput => Some("Enter IDs to see location chart."),
            Self::Unavailable { .. } => Some("Location chart unavailable: consumption data not loaded."),
            Self::NoData => Some("No location data for entered materials."),
            Self::Ranked(_) => None,
        }
    }
}

/// State of the results table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "rows", rename_all = "snake_case")]
pub enum ResultsTable {
    AwaitingInput,
    NoMatches,
    Rows(usize),
}

impl ResultsTable {
    pub fn placeholder(self) -> Option<&'static str> {
        match self {
            Self::AwaitingInput => Some("No IDs provided yet."),
            Self::NoMatches => Some("No matching materials found."),
            Self::Rows(_) => None,
        }
    }

    pub fn caption(self) -> Option<String> {
        match self {
            Self::Rows(n) => Some(format!("Results for {n} Materials")),
            _ => None,
        }
    }
}

/// Everything one interaction produces.
#[derive(Debug, Clone)]
pub struct DashboardReport {
    pub identifiers: IdentifierSet,
    pub view: FilteredView,
    pub results: ResultsTable,
    pub materials: MaterialChart,
    pub locations: LocationChart,
    /// Load-time warning about the consumption table, if any
    pub consumption_warning: Option<String>,
}

/// Runs queries against a loaded pair of tables.
#[derive(Debug, Clone, Copy)]
pub struct DashboardQuery<'a> {
    datasets: &'a Datasets,
    limits: Limits,
}

impl<'a> DashboardQuery<'a> {
    pub fn new(datasets: &'a Datasets, limits: Limits) -> Self {
        Self { datasets, limits }
    }

    /// Parses `input` and runs the pipeline.
    ///
    /// # Errors
    ///
    /// Returns error if the input has a non-numeric identifier or the
    /// inventory table cannot be filtered.
    pub fn run(&self, input: &str) -> Result<DashboardReport> {
        let ids = parse_identifiers(input).inspect_err(|e| tracing::warn!("Rejected input: {e}"))?;
        self.run_ids(ids)
    }

    /// Runs the pipeline for already parsed identifiers.
    ///
    /// # Errors
    ///
    /// Returns error if the inventory table cannot be filtered.
    pub fn run_ids(&self, ids: IdentifierSet) -> Result<DashboardReport> {
        let view = filter_inventory(self.datasets.inventory(), &ids)?;
        let consumption = self.datasets.consumption();

        let results = if ids.is_empty() {
            ResultsTable::AwaitingInput
        } else if view.is_empty() {
            ResultsTable::NoMatches
        } else {
            ResultsTable::Rows(view.len())
        };

        let (materials, locations) = if view.is_empty() {
            (MaterialChart::AwaitingInput, LocationChart::AwaitingInput)
        } else {
            let top = rank_top_materials(&view, self.limits.top_materials);
            let locations = match consumption.degraded_reason() {
                Some(reason) => LocationChart::Unavailable {
                    reason: reason.to_owned(),
                },
                None => {
                    let usage = aggregate_locations(consumption, &ids, self.limits.top_locations);
                    if usage.is_empty() {
                        LocationChart::NoData
                    } else {
                        LocationChart::Ranked(usage)
                    }
                }
            };
            (MaterialChart::Ranked(top), locations)
        };

        tracing::info!(
            ids = ids.len(),
            matched = view.len(),
            "Dashboard query complete"
        );

        Ok(DashboardReport {
            identifiers: ids,
            view,
            results,
            materials,
            locations,
            consumption_warning: consumption.warning(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::columns;
    use polars::prelude::*;

    fn datasets(with_consumption: bool) -> Result<Datasets> {
        let inventory = df!(
            columns::MATERIAL => &[10.0, 20.0, 30.0],
            columns::FORECASTED_USAGE => &["100 KG", "50 KG", "200 KG"]
        )?;
        let consumption = df!(
            columns::MATERIAL => &[10.0, 10.0, 30.0, 99.0],
            columns::STORAGE_LOCATION => &["A", "A", "B", "C"],
            columns::QUANTITY => &[-5.0, 3.0, 10.0, 1000.0]
        )?;
        Datasets::from_frames(inventory, with_consumption.then_some(&consumption))
    }

    #[test]
    fn test_full_query() -> Result<()> {
        let data = datasets(true)?;
        let report = DashboardQuery::new(&data, Limits::default()).run("10,20,30")?;

        assert_eq!(report.results, ResultsTable::Rows(3));
        assert_eq!(report.results.caption().as_deref(), Some("Results for 3 Materials"));
        let MaterialChart::Ranked(top) = &report.materials else {
            panic!("expected ranked materials, got {:?}", report.materials);
        };
        let order: Vec<f64> = top.entries.iter().map(|e| e.material).collect();
        assert_eq!(order, vec![30.0, 10.0, 20.0]);

        let LocationChart::Ranked(usage) = &report.locations else {
            panic!("expected ranked locations, got {:?}", report.locations);
        };
        assert_eq!(usage.entries(), &[("B".to_owned(), 10.0), ("A".to_owned(), 2.0)]);
        assert!(report.consumption_warning.is_none());
        Ok(())
    }

    #[test]
    fn test_blank_input_awaits() -> Result<()> {
        let data = datasets(true)?;
        let report = DashboardQuery::new(&data, Limits::default()).run("  ")?;
        assert_eq!(report.results, ResultsTable::AwaitingInput);
        assert_eq!(report.materials, MaterialChart::AwaitingInput);
        assert_eq!(report.locations, LocationChart::AwaitingInput);
        assert!(report.view.is_empty());
        Ok(())
    }

    #[test]
    fn test_no_matches_differs_from_no_input() -> Result<()> {
        let data = datasets(true)?;
        let report = DashboardQuery::new(&data, Limits::default()).run("12345")?;
        assert_eq!(report.results, ResultsTable::NoMatches);
        assert_ne!(
            report.results.placeholder(),
            ResultsTable::AwaitingInput.placeholder()
        );
        Ok(())
    }

    #[test]
    fn test_no_consumption_for_materials() -> Result<()> {
        let data = datasets(true)?;
        let report = DashboardQuery::new(&data, Limits::default()).run("20")?;
        assert_eq!(report.locations, LocationChart::NoData);
        Ok(())
    }

    #[test]
    fn test_degraded_consumption() -> Result<()> {
        let data = datasets(false)?;
        let report = DashboardQuery::new(&data, Limits::default()).run("10")?;
        assert!(matches!(report.locations, LocationChart::Unavailable { .. }));
        assert!(report.consumption_warning.is_some());
        assert_ne!(
            report.locations.placeholder(),
            LocationChart::NoData.placeholder()
        );
        Ok(())
    }

    #[test]
    fn test_invalid_input_is_error() -> Result<()> {
        let data = datasets(true)?;
        assert!(DashboardQuery::new(&data, Limits::default()).run("10\nten").is_err());
        Ok(())
    }

    #[test]
    fn test_limits_respected() -> Result<()> {
        let data = datasets(true)?;
        let limits = Limits::new(2, 1)?;
        let report = DashboardQuery::new(&data, limits).run("10,20,30")?;
        let MaterialChart::Ranked(top) = &report.materials else {
            panic!("expected ranked materials");
        };
        assert_eq!(top.count(), 2);
        assert_eq!(top.title(), "Top 2 Materials by Usage");
        let LocationChart::Ranked(usage) = &report.locations else {
            panic!("expected ranked locations");
        };
        assert_eq!(usage.len(), 1);
        assert_eq!(usage.title(), "Top 1 Locations by Usage");
        Ok(())
    }
}
