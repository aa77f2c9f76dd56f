//! Text and JSON rendering of a [`DashboardReport`].
//!
//! These functions only read the report. The egui dashboard shares
//! [`TableData`] for its results table.

use crate::error::Result;
use crate::query::{DashboardReport, FilteredView, LocationChart, MaterialChart};
use polars::prelude::*;
use serde::Serialize;
use std::io::Write;

pub const TITLE: &str = "Inventory Optimization Dashboard";
pub const MATERIAL_AXIS: &str = "Material ID";
pub const USAGE_AXIS: &str = "Forecasted Usage (6 Months)";
pub const LOCATION_AXIS: &str = "Storage Location";
pub const LOCATION_USAGE_AXIS: &str = "Total Usage (Units)";

const BAR_WIDTH: usize = 40;

/// Results table as display strings, source columns only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableData {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    /// # Errors
    ///
    /// Returns error if a column cannot be converted to text.
    pub fn from_view(view: &FilteredView) -> Result<Self> {
        let frame = view.frame();
        let header = frame
            .get_column_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect();

        let mut columns = Vec::with_capacity(frame.width());
        for column in frame.get_columns() {
            columns.push(column_text(column.as_materialized_series())?);
        }

        let rows = (0..frame.height())
            .map(|row| {
                columns
                    .iter()
                    .map(|col| col.get(row).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        Ok(Self { header, rows })
    }
}

fn column_text(series: &Series) -> Result<Vec<String>> {
    let values = if series.dtype().is_float() {
        series
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| v.map(|v| v.to_string()).unwrap_or_default())
            .collect()
    } else {
        series
            .cast(&DataType::String)?
            .str()?
            .into_iter()
            .map(|v| v.unwrap_or_default().to_owned())
            .collect()
    };
    Ok(values)
}

/// Unit label for the material chart's value axis.
pub fn usage_axis_label(unit: &str) -> String {
    format!("{USAGE_AXIS} [{unit}]")
}

/// Writes the report as plain text with `#` bar charts.
///
/// # Errors
///
/// Returns error if writing fails or the table cannot be rendered.
pub fn render_text(report: &DashboardReport, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{TITLE}")?;
    writeln!(out, "{}", "=".repeat(TITLE.len()))?;
    if let Some(warning) = &report.consumption_warning {
        writeln!(out, "Warning: {warning}")?;
    }
    writeln!(out)?;

    match &report.materials {
        MaterialChart::Ranked(top) => {
            writeln!(out, "{}", top.title())?;
            writeln!(out, "{MATERIAL_AXIS} vs {}", usage_axis_label(&top.unit_label))?;
            let bars: Vec<(String, f64)> = top
                .entries
                .iter()
                .map(|e| (e.label(), e.usage.magnitude()))
                .collect();
            write_bars(out, &bars)?;
        }
        other => writeln!(out, "{}", other.placeholder().unwrap_or_default())?,
    }
    writeln!(out)?;

    match &report.locations {
        LocationChart::Ranked(usage) => {
            writeln!(out, "{}", usage.title())?;
            writeln!(out, "{LOCATION_AXIS} vs {LOCATION_USAGE_AXIS}")?;
            write_bars(out, usage.entries())?;
        }
        other => writeln!(out, "{}", other.placeholder().unwrap_or_default())?,
    }
    writeln!(out)?;

    if let Some(caption) = report.results.caption() {
        writeln!(out, "{caption}")?;
        write_table(out, &TableData::from_view(&report.view)?)?;
    } else {
        writeln!(out, "{}", report.results.placeholder().unwrap_or_default())?;
    }
    Ok(())
}

fn write_bars(out: &mut impl Write, bars: &[(String, f64)]) -> Result<()> {
    let label_width = bars.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let max = bars.iter().map(|&(_, v)| v.abs()).fold(0.0_f64, f64::max);
    for (label, value) in bars {
        let filled = if max > 0.0 {
            ((value.abs() / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        writeln!(
            out,
            "  {label:<label_width$} | {:<BAR_WIDTH$} {value}",
            "#".repeat(filled)
        )?;
    }
    Ok(())
}

fn write_table(out: &mut impl Write, table: &TableData) -> Result<()> {
    let mut widths: Vec<usize> = table.header.iter().map(|h| h.chars().count()).collect();
    for row in &table.rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    writeln!(out, "{}", line(&table.header).trim_end())?;
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    writeln!(out, "{}", rule.join("-+-"))?;
    for row in &table.rows {
        writeln!(out, "{}", line(row).trim_end())?;
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    title: &'static str,
    identifiers: &'a [f64],
    results: crate::query::ResultsTable,
    caption: Option<String>,
    table: TableData,
    materials: &'a MaterialChart,
    locations: &'a LocationChart,
    consumption_warning: Option<&'a str>,
    generated_at: chrono::DateTime<chrono::Utc>,
}

/// Serializes the report's pure outputs as pretty JSON.
///
/// # Errors
///
/// Returns error if the table cannot be rendered or serialization fails.
pub fn to_json(report: &DashboardReport) -> Result<String> {
    let json = JsonReport {
        title: TITLE,
        identifiers: report.identifiers.as_slice(),
        results: report.results,
        caption: report.results.caption(),
        table: TableData::from_view(&report.view)?,
        materials: &report.materials,
        locations: &report.locations,
        consumption_warning: report.consumption_warning.as_deref(),
        generated_at: chrono::Utc::now(),
    };
    Ok(serde_json::to_string_pretty(&json)?)
}
