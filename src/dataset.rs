//! The two source tables and how they are held for the lifetime of a session.
//!
//! [`Datasets::load`] reads both files once. The inventory table is required:
//! any failure is returned to the caller, which ends the session. The
//! consumption table is optional: a failure is logged as a warning and the
//! table is replaced by [`SecondaryTable::Degraded`], which every consumer
//! treats as "no data".

use crate::config::DataSources;
use crate::error::{Result, StocklensError};
use polars::prelude::*;
use std::path::Path;

pub mod loader;
pub mod records;

pub use loader::load_table;
pub use records::ConsumptionRecord;

/// Column names shared by both tables.
pub mod columns {
    pub const MATERIAL: &str = "Material";
    pub const FORECASTED_USAGE: &str = "Forecasted Usage (6 Months)";
    pub const STORAGE_LOCATION: &str = "Storage location";
    pub const QUANTITY: &str = "Qty in unit of entry";
}

const INVENTORY_COLUMNS: [&str; 2] = [columns::MATERIAL, columns::FORECASTED_USAGE];
const CONSUMPTION_COLUMNS: [&str; 3] = [
    columns::MATERIAL,
    columns::STORAGE_LOCATION,
    columns::QUANTITY,
];

/// Consumption data, or the reason it could not be loaded.
#[derive(Debug, Clone)]
pub enum SecondaryTable {
    Loaded(Vec<ConsumptionRecord>),
    Degraded { reason: String },
}

impl SecondaryTable {
    pub fn records(&self) -> &[ConsumptionRecord] {
        match self {
            Self::Loaded(records) => records,
            Self::Degraded { .. } => &[],
        }
    }

    pub fn degraded_reason(&self) -> Option<&str> {
        match self {
            Self::Loaded(_) => None,
            Self::Degraded { reason } => Some(reason),
        }
    }

    /// User-facing notice for a degraded table.
    pub fn warning(&self) -> Option<String> {
        self.degraded_reason()
            .map(|r| format!("Could not load consumption data for location chart: {r}"))
    }
}

/// Read-only tables shared by every query in a session.
#[derive(Debug, Clone)]
pub struct Datasets {
    inventory: DataFrame,
    consumption: SecondaryTable,
}

impl Datasets {
    /// Loads both tables.
    ///
    /// # Errors
    ///
    /// Returns error only for the inventory table. Consumption failures degrade.
    pub fn load(sources: &DataSources) -> Result<Self> {
        let inventory = load_inventory(&sources.inventory, sources.inventory_sheet.as_deref())
            .inspect_err(|e| {
                tracing::error!(
                    path = %sources.inventory.display(),
                    "Error loading inventory file: {e}"
                );
            })?;

        let consumption_sheet = sources.consumption_sheet.as_deref();
        let consumption = match load_consumption(&sources.consumption, consumption_sheet) {
            Ok(records) => {
                tracing::info!(
                    path = %sources.consumption.display(),
                    rows = records.len(),
                    "Loaded consumption data"
                );
                SecondaryTable::Loaded(records)
            }
            Err(e) => {
                tracing::warn!(
                    path = %sources.consumption.display(),
                    "Could not load consumption data for location chart: {e}"
                );
                SecondaryTable::Degraded {
                    reason: e.to_string(),
                }
            }
        };

        Ok(Self {
            inventory,
            consumption,
        })
    }

    /// Builds datasets from frames already in memory.
    ///
    /// A `None` consumption frame, or one lacking a required column, degrades
    /// the same way a failed load does.
    ///
    /// # Errors
    ///
    /// Returns [`StocklensError::MissingColumn`] if the inventory frame lacks a
    /// required column.
    pub fn from_frames(inventory: DataFrame, consumption: Option<&DataFrame>) -> Result<Self> {
        require_columns(&inventory, "inventory", &INVENTORY_COLUMNS)?;
        let consumption = match consumption {
            None => SecondaryTable::Degraded {
                reason: "consumption data not provided".to_owned(),
            },
            Some(df) => match consumption_records(df) {
                Ok(records) => SecondaryTable::Loaded(records),
                Err(e) => SecondaryTable::Degraded {
                    reason: e.to_string(),
                },
            },
        };
        Ok(Self {
            inventory,
            consumption,
        })
    }

    pub fn inventory(&self) -> &DataFrame {
        &self.inventory
    }

    pub fn consumption(&self) -> &SecondaryTable {
        &self.consumption
    }
}

fn load_inventory(path: &Path, sheet: Option<&str>) -> Result<DataFrame> {
    let df = load_table(path, sheet)?;
    require_columns(&df, "inventory", &INVENTORY_COLUMNS)?;
    tracing::info!(path = %path.display(), rows = df.height(), "Loaded inventory data");
    Ok(df)
}

fn load_consumption(path: &Path, sheet: Option<&str>) -> Result<Vec<ConsumptionRecord>> {
    let df = load_table(path, sheet)?;
    consumption_records(&df)
}

fn consumption_records(df: &DataFrame) -> Result<Vec<ConsumptionRecord>> {
    require_columns(df, "consumption", &CONSUMPTION_COLUMNS)?;
    records::extract_consumption(df)
}

fn require_columns(df: &DataFrame, table: &str, required: &[&str]) -> Result<()> {
    for &column in required {
        if df.column(column).is_err() {
            return Err(StocklensError::MissingColumn {
                table: table.to_owned(),
                column: column.to_owned(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn inventory() -> PolarsResult<DataFrame> {
        df!(
            columns::MATERIAL => &[10.0, 20.0],
            columns::FORECASTED_USAGE => &["100 KG", "50 KG"]
        )
    }

    #[test]
    fn test_missing_inventory_column_is_fatal() -> Result<()> {
        let df = df!(columns::MATERIAL => &[1.0])?;
        let err = Datasets::from_frames(df, None).err();
        assert!(
            matches!(
                err,
                Some(StocklensError::MissingColumn { ref column, .. }) if column == columns::FORECASTED_USAGE
            ),
            "{err:?}"
        );
        Ok(())
    }

    #[test]
    fn test_absent_consumption_degrades() -> Result<()> {
        let datasets = Datasets::from_frames(inventory()?, None)?;
        assert!(datasets.consumption().degraded_reason().is_some());
        assert!(datasets.consumption().records().is_empty());
        let warning = datasets.consumption().warning().unwrap_or_default();
        assert!(warning.starts_with("Could not load consumption data"), "{warning}");
        Ok(())
    }

    #[test]
    fn test_consumption_without_location_degrades() -> Result<()> {
        let consumption = df!(
            columns::MATERIAL => &[10.0],
            columns::QUANTITY => &[5.0]
        )?;
        let datasets = Datasets::from_frames(inventory()?, Some(&consumption))?;
        let reason = datasets.consumption().degraded_reason().unwrap_or_default();
        assert!(reason.contains(columns::STORAGE_LOCATION), "{reason}");
        Ok(())
    }

    #[test]
    fn test_missing_consumption_file_degrades() -> Result<()> {
        let temp_dir = tempdir()?;
        let inventory_path = temp_dir.path().join("inventory.csv");
        std::fs::write(
            &inventory_path,
            "Material,Forecasted Usage (6 Months)\n10,100 KG\n",
        )?;

        let sources = DataSources {
            inventory: inventory_path,
            consumption: temp_dir.path().join("does_not_exist.xlsx"),
            inventory_sheet: None,
            consumption_sheet: None,
        };
        let datasets = Datasets::load(&sources)?;
        assert_eq!(datasets.inventory().height(), 1);
        assert!(datasets.consumption().degraded_reason().is_some());
        Ok(())
    }

    #[test]
    fn test_missing_inventory_file_is_error() -> Result<()> {
        let temp_dir = tempdir()?;
        let sources = DataSources {
            inventory: temp_dir.path().join("inventory.csv"),
            consumption: temp_dir.path().join("consumption.csv"),
            inventory_sheet: None,
            consumption_sheet: None,
        };
        assert!(Datasets::load(&sources).is_err());
        Ok(())
    }
}
