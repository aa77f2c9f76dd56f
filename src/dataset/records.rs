use super::columns;
use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// One consumption movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    pub material: Option<f64>,
    pub storage_location: Option<String>,
    pub quantity: Option<f64>,
}

/// Reads the three consumption columns into typed records.
///
/// Materials and quantities are cast to `Float64` and locations to `String`;
/// values that do not survive the cast become `None`.
///
/// # Errors
///
/// Returns error if a column is missing or cannot be cast.
pub fn extract_consumption(df: &DataFrame) -> Result<Vec<ConsumptionRecord>> {
    let materials = float_column(df, columns::MATERIAL)?;
    let quantities = float_column(df, columns::QUANTITY)?;
    let locations = df
        .column(columns::STORAGE_LOCATION)?
        .as_materialized_series()
        .cast(&DataType::String)?;

    let records = materials
        .f64()?
        .into_iter()
        .zip(locations.str()?)
        .zip(quantities.f64()?)
        .map(|((material, location), quantity)| ConsumptionRecord {
            material,
            storage_location: location.map(str::to_owned),
            quantity,
        })
        .collect();
    Ok(records)
}

/// Casts a column to `Float64`, the representation identifiers are compared in.
pub(crate) fn float_column(df: &DataFrame, name: &str) -> Result<Series> {
    Ok(df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_casts_types() -> Result<()> {
        let df = df!(
            columns::MATERIAL => &[1_i64, 2],
            columns::STORAGE_LOCATION => &[Some("A"), None],
            columns::QUANTITY => &[-5_i64, 3]
        )?;
        let records = extract_consumption(&df)?;
        assert_eq!(
            records,
            vec![
                ConsumptionRecord {
                    material: Some(1.0),
                    storage_location: Some("A".to_owned()),
                    quantity: Some(-5.0),
                },
                ConsumptionRecord {
                    material: Some(2.0),
                    storage_location: None,
                    quantity: Some(3.0),
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn test_numeric_locations_become_text() -> Result<()> {
        let df = df!(
            columns::MATERIAL => &[1.0],
            columns::STORAGE_LOCATION => &[1100_i64],
            columns::QUANTITY => &[2.0]
        )?;
        let records = extract_consumption(&df)?;
        assert_eq!(
            records.first().and_then(|r| r.storage_location.as_deref()),
            Some("1100")
        );
        Ok(())
    }
}
