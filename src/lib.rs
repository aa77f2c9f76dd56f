//! # stocklens - inventory optimization dashboard
//!
//! stocklens answers one question over two spreadsheet snapshots: for the
//! material IDs I paste, what are they forecast to use, and where has their
//! stock been consumed?
//!
//! ## Quick Start
//!
//! ```no_run
//! use stocklens::config::{DataSources, Limits};
//! use stocklens::dataset::Datasets;
//! use stocklens::query::DashboardQuery;
//!
//! # fn example() -> stocklens::error::Result<()> {
//! let sources = DataSources {
//!     inventory: "Material Inventory.xlsx".into(),
//!     consumption: "Consumption Data.xlsx".into(),
//!     inventory_sheet: None,
//!     consumption_sheet: None,
//! };
//! let datasets = Datasets::load(&sources)?;
//!
//! let report = DashboardQuery::new(&datasets, Limits::default()).run("10, 20\n30")?;
//! stocklens::render::render_text(&report, &mut std::io::stdout())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`dataset`]: loading the inventory and consumption tables
//! - [`query`]: identifier parsing, filtering, ranking and aggregation
//! - [`render`]: plain text and JSON output of a report
//! - [`dashboard`]: the egui desktop window
//! - [`config`]: settings file and ranking limits
//! - [`error`]: error types and handling utilities
//! - [`logging`]: console and rolling file logs
//!
//! The tables are loaded once and only ever borrowed afterwards. Every query
//! builds its report from scratch, so the same input always gives the same
//! output.

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod query;
pub mod render;
pub mod theme;
