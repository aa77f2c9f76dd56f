//! Desktop dashboard built on `egui`.
//!
//! One window mirrors the single-page layout: an identifier input box, the
//! top-materials chart and the top-locations chart side by side, with the
//! results table underneath. The query reruns whenever the input text
//! changes; the loaded tables are never modified.

use crate::config::Limits;
use crate::dataset::Datasets;
use crate::query::{DashboardQuery, DashboardReport, LocationChart, MaterialChart};
use crate::render::{TITLE, TableData};
use eframe::egui;
use serde::{Deserialize, Serialize};

mod charts;
mod results_table;

use charts::{render_location_chart, render_material_chart};
use results_table::render_results_table;

const CHART_HEIGHT: f32 = 240.0;

/// What survives a restart.
#[derive(Default, Deserialize, Serialize)]
#[serde(default)]
struct PersistedState {
    input: String,
}

enum QueryOutcome {
    Ready {
        report: Box<DashboardReport>,
        table: TableData,
    },
    Failed(String),
}

pub struct DashboardApp {
    datasets: Datasets,
    limits: Limits,
    input: String,
    last_query: Option<String>,
    outcome: QueryOutcome,
}

impl DashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, datasets: Datasets, limits: Limits) -> Self {
        crate::theme::apply_dashboard_theme(&cc.egui_ctx);
        let persisted: PersistedState = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        Self::with_input(datasets, limits, persisted.input)
    }

    fn with_input(datasets: Datasets, limits: Limits, input: String) -> Self {
        let mut app = Self {
            datasets,
            limits,
            input,
            last_query: None,
            outcome: QueryOutcome::Failed(String::new()),
        };
        app.refresh();
        app
    }

    /// Reruns the query if the input changed since the last run.
    fn refresh(&mut self) {
        if self.last_query.as_deref() == Some(self.input.as_str()) {
            return;
        }
        self.last_query = Some(self.input.clone());

        let query = DashboardQuery::new(&self.datasets, self.limits);
        let outcome = query.run(&self.input).and_then(|report| {
            let table = TableData::from_view(&report.view)?;
            Ok(QueryOutcome::Ready {
                report: Box::new(report),
                table,
            })
        });
        self.outcome = outcome.unwrap_or_else(|e| QueryOutcome::Failed(e.to_string()));
    }

    fn render_input(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Material IDs").strong());
        let response = ui.add(
            egui::TextEdit::multiline(&mut self.input)
                .hint_text("Enter Material ID(s) (comma/newline separated)")
                .desired_width(f32::INFINITY)
                .desired_rows(8),
        );
        if response.changed() {
            self.refresh();
        }
        if let QueryOutcome::Failed(message) = &self.outcome {
            ui.colored_label(ui.visuals().error_fg_color, message);
        }
    }

    fn render_material_panel(&self, ui: &mut egui::Ui) {
        match &self.outcome {
            QueryOutcome::Ready { report, .. } => match &report.materials {
                MaterialChart::Ranked(top) => render_material_chart(ui, top, CHART_HEIGHT),
                other => info(ui, other.placeholder().unwrap_or_default()),
            },
            QueryOutcome::Failed(_) => info(ui, "Fix the material IDs to see material chart."),
        }
    }

    fn render_location_panel(&self, ui: &mut egui::Ui) {
        match &self.outcome {
            QueryOutcome::Ready { report, .. } => match &report.locations {
                LocationChart::Ranked(usage) => render_location_chart(ui, usage, CHART_HEIGHT),
                other => info(ui, other.placeholder().unwrap_or_default()),
            },
            QueryOutcome::Failed(_) => info(ui, "Fix the material IDs to see location chart."),
        }
    }

    fn render_results(&self, ui: &mut egui::Ui) {
        let QueryOutcome::Ready { report, table } = &self.outcome else {
            return;
        };
        match report.results.caption() {
            Some(caption) => {
                ui.label(egui::RichText::new(caption).heading().size(14.0));
                render_results_table(ui, table);
            }
            None => info(ui, report.results.placeholder().unwrap_or_default()),
        }
    }

    /// Load-time notice; independent of the current input.
    fn consumption_warning(&self) -> Option<String> {
        self.datasets.consumption().warning()
    }
}

fn info(ui: &mut egui::Ui, message: &str) {
    crate::theme::card_frame(ui).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(egui::RichText::new(message).weak());
    });
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.refresh();

        egui::TopBottomPanel::top("dashboard_title")
            .frame(crate::theme::top_bar_frame())
            .show(ctx, |ui| {
                ui.heading(TITLE);
                if let Some(warning) = self.consumption_warning() {
                    ui.colored_label(crate::theme::WARNING_COLOR, warning);
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let spacing = ui.spacing().item_spacing.x;
            let unit = ((ui.available_width() - 2.0 * spacing) / 5.0).max(60.0);
            let layout = egui::Layout::top_down(egui::Align::Min);

            ui.horizontal_top(|ui| {
                ui.allocate_ui_with_layout(egui::vec2(unit, CHART_HEIGHT), layout, |ui| {
                    self.render_input(ui);
                });
                ui.allocate_ui_with_layout(egui::vec2(2.0 * unit, CHART_HEIGHT), layout, |ui| {
                    self.render_material_panel(ui);
                });
                ui.allocate_ui_with_layout(egui::vec2(2.0 * unit, CHART_HEIGHT), layout, |ui| {
                    self.render_location_panel(ui);
                });
            });

            ui.add_space(crate::theme::SPACING_SMALL);
            ui.separator();
            self.render_results(ui);
        });
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let state = PersistedState {
            input: self.input.clone(),
        };
        eframe::set_value(storage, eframe::APP_KEY, &state);
    }
}

/// Opens the dashboard window and blocks until it is closed.
///
/// # Errors
///
/// Returns error if the native window cannot be created.
pub fn run(datasets: Datasets, limits: Limits) -> anyhow::Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITLE)
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    tracing::info!("Opening dashboard window");
    eframe::run_native(
        "stocklens",
        native_options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, datasets, limits)))),
    )
    .map_err(|e| anyhow::anyhow!("Dashboard window failed: {e}"))
}
