use crate::render::TableData;
use eframe::egui;
use egui_extras::{Column, TableBuilder};

const ROW_HEIGHT: f32 = 20.0;

pub fn render_results_table(ui: &mut egui::Ui, table: &TableData) {
    egui::ScrollArea::horizontal()
        .id_salt("results_table_scroll")
        .show(ui, |ui| {
            let mut builder = TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .min_scrolled_height(0.0);
            for _ in &table.header {
                builder = builder.column(Column::auto().at_least(80.0).clip(true));
            }

            builder
                .header(24.0, |mut header| {
                    for name in &table.header {
                        header.col(|ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, table.rows.len(), |mut row| {
                        let Some(cells) = table.rows.get(row.index()) else {
                            return;
                        };
                        for cell in cells {
                            row.col(|ui| {
                                ui.label(cell);
                            });
                        }
                    });
                });
        });
}
