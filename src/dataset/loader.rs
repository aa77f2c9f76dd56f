use crate::error::{Result, ResultExt as _, StocklensError};
use calamine::Reader as _;
use polars::prelude::*;
use std::collections::HashMap;
use std::path::Path;

const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Reads a table from disk, choosing the reader by file extension.
///
/// Workbooks go through calamine and read `sheet` (or the first worksheet);
/// CSV, Parquet and JSON go through polars.
///
/// # Errors
///
/// Returns error if the file is missing, unreadable, or has an unsupported
/// extension.
pub fn load_table(path: &Path, sheet: Option<&str>) -> Result<DataFrame> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    let df = match ext.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .with_has_header(true)
            .finish()
            .and_then(LazyFrame::collect)
            .with_context(|| format!("Failed to read CSV {}", path.display()))?,
        "parquet" => ParquetReader::new(std::fs::File::open(path)?)
            .finish()
            .with_context(|| format!("Failed to read Parquet {}", path.display()))?,
        "json" => JsonReader::new(std::fs::File::open(path)?)
            .finish()
            .with_context(|| format!("Failed to read JSON {}", path.display()))?,
        e if WORKBOOK_EXTENSIONS.contains(&e) => load_workbook(path, sheet)?,
        _ => return Err(StocklensError::UnsupportedFormat(ext)),
    };

    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "Table loaded"
    );
    Ok(df)
}

fn load_workbook(path: &Path, sheet: Option<&str>) -> Result<DataFrame> {
    let mut workbook = calamine::open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook {}", path.display()))?;

    let range = match sheet {
        Some(name) => workbook.worksheet_range(name).ok_or_else(|| {
            StocklensError::Spreadsheet(format!("Sheet '{name}' not found in {}", path.display()))
        })??,
        None => workbook.worksheet_range_at(0).ok_or_else(|| {
            StocklensError::Spreadsheet(format!("No sheets found in {}", path.display()))
        })??,
    };

    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .unwrap_or_default();
    let body: Vec<Vec<Cell>> = rows
        .map(|row| row.iter().map(Cell::from).collect())
        .collect();

    cells_to_dataframe(&header, &body)
}

/// A worksheet value reduced to what the tables need.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl From<&calamine::DataType> for Cell {
    fn from(value: &calamine::DataType) -> Self {
        match value {
            calamine::DataType::Empty => Self::Empty,
            calamine::DataType::Int(i) => Self::Number(*i as f64),
            calamine::DataType::Float(f) => Self::Number(*f),
            calamine::DataType::String(s) => Self::Text(s.clone()),
            other => Self::Text(other.to_string()),
        }
    }
}

/// Builds a frame from a header row and body rows.
///
/// A column whose non-empty cells are all numbers becomes `Float64`; any other
/// column becomes `String`, with numbers written as text. Blank header cells
/// are named `column_<n>` (1-based) and repeated names get a `.<k>` suffix.
/// Rows with no values at all are skipped.
///
/// # Errors
///
/// Returns error if polars rejects the assembled columns.
pub fn cells_to_dataframe(header: &[String], rows: &[Vec<Cell>]) -> Result<DataFrame> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0).max(header.len());
    let rows: Vec<&Vec<Cell>> = rows
        .iter()
        .filter(|row| row.iter().any(|c| *c != Cell::Empty))
        .collect();

    let names = column_names(header, width);
    let mut columns = Vec::with_capacity(width);
    for (idx, name) in names.iter().enumerate() {
        let cells: Vec<&Cell> = rows
            .iter()
            .map(|row| row.get(idx).unwrap_or(&Cell::Empty))
            .collect();

        let numeric = cells
            .iter()
            .all(|c| matches!(c, Cell::Empty | Cell::Number(_)));

        let series = if numeric {
            let values: Vec<Option<f64>> = cells
                .iter()
                .map(|c| match c {
                    Cell::Number(n) => Some(*n),
                    _ => None,
                })
                .collect();
            Series::new(name.as_str().into(), values)
        } else {
            let values: Vec<Option<String>> = cells
                .iter()
                .map(|c| match c {
                    Cell::Empty => None,
                    Cell::Number(n) => Some(n.to_string()),
                    Cell::Text(s) => Some(s.clone()),
                })
                .collect();
            Series::new(name.as_str().into(), values)
        };
        columns.push(Column::from(series));
    }

    Ok(DataFrame::new(columns)?)
}

fn column_names(header: &[String], width: usize) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    (0..width)
        .map(|idx| {
            let base = header
                .get(idx)
                .map(|h| h.trim())
                .filter(|h| !h.is_empty())
                .map_or_else(|| format!("column_{}", idx + 1), str::to_owned);
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{base}.{count}")
            };
            *count += 1;
            name
        })
        .collect()
}
