use super::identifiers::IdentifierSet;
use super::usage::{UsageQuantity, parse_usage};
use crate::dataset::columns;
use crate::dataset::records::float_column;
use crate::error::Result;
use polars::prelude::*;

/// Inventory rows selected by one query.
///
/// `materials` and `usage` are aligned with the rows of `frame`. The parsed
/// usage lives beside the frame, so `frame` always holds exactly the source
/// columns.
#[derive(Debug, Clone)]
pub struct FilteredView {
    frame: DataFrame,
    materials: Vec<f64>,
    usage: Vec<UsageQuantity>,
}

impl FilteredView {
    pub fn empty(source: &DataFrame) -> Self {
        Self {
            frame: source.clear(),
            materials: Vec::new(),
            usage: Vec::new(),
        }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn materials(&self) -> &[f64] {
        &self.materials
    }

    pub fn usage(&self) -> &[UsageQuantity] {
        &self.usage
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

/// Keeps the inventory rows whose material is in `ids`, in source order.
///
/// An empty `ids` returns an empty view without touching the table. Null
/// materials never match.
///
/// # Errors
///
/// Returns error if the `Material` column is missing or cannot be cast to a
/// number.
pub fn filter_inventory(inventory: &DataFrame, ids: &IdentifierSet) -> Result<FilteredView> {
    if ids.is_empty() {
        return Ok(FilteredView::empty(inventory));
    }

    let material_series = float_column(inventory, columns::MATERIAL)?;
    let mask: Vec<bool> = material_series
        .f64()?
        .into_iter()
        .map(|m| m.is_some_and(|m| ids.contains(m)))
        .collect();
    let mask = BooleanChunked::from_slice("mask".into(), &mask);

    let frame = inventory.filter(&mask)?;
    let materials: Vec<f64> = float_column(&frame, columns::MATERIAL)?
        .f64()?
        .into_iter()
        .flatten()
        .collect();
    let usage = usage_values(&frame)?;

    tracing::debug!(
        requested = ids.len(),
        matched = frame.height(),
        "Filtered inventory"
    );

    Ok(FilteredView {
        frame,
        materials,
        usage,
    })
}

/// Parses the usage column. A column that is not text has no parseable cells.
fn usage_values(frame: &DataFrame) -> Result<Vec<UsageQuantity>> {
    let column = frame.column(columns::FORECASTED_USAGE)?;
    if column.dtype() != &DataType::String {
        return Ok(vec![UsageQuantity::Unparsed; frame.height()]);
    }
    Ok(column
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(parse_usage)
        .collect())
}
