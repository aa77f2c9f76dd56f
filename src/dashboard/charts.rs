use crate::query::{LocationUsage, RankedMaterial, TopMaterials};
use crate::render::{LOCATION_AXIS, LOCATION_USAGE_AXIS, MATERIAL_AXIS, usage_axis_label};
use eframe::egui;
use egui_plot::{Bar, BarChart, Plot};

pub fn render_material_chart(ui: &mut egui::Ui, top: &TopMaterials, height: f32) {
    let labels: Vec<String> = top.entries.iter().map(RankedMaterial::label).collect();
    let values: Vec<f64> = top.entries.iter().map(|e| e.usage.magnitude()).collect();

    ui.label(egui::RichText::new(top.title()).strong());
    render_bar_plot(
        ui,
        BarPlot {
            id: "top_materials_plot",
            series: "Forecasted usage",
            x_axis: MATERIAL_AXIS,
            y_axis: usage_axis_label(&top.unit_label),
            color: crate::theme::MATERIAL_BAR_COLOR,
            height,
        },
        labels,
        &values,
    );

    if top.entries.iter().any(|e| !e.usage.is_parsed()) {
        ui.label(
            egui::RichText::new("Some usage values could not be parsed and are shown as 0.")
                .small()
                .color(crate::theme::WARNING_COLOR),
        );
    }
}

pub fn render_location_chart(ui: &mut egui::Ui, usage: &LocationUsage, height: f32) {
    let labels: Vec<String> = usage.entries().iter().map(|(l, _)| l.clone()).collect();
    let values: Vec<f64> = usage.entries().iter().map(|&(_, v)| v).collect();

    ui.label(egui::RichText::new(usage.title()).strong());
    render_bar_plot(
        ui,
        BarPlot {
            id: "top_locations_plot",
            series: "Consumption",
            x_axis: LOCATION_AXIS,
            y_axis: LOCATION_USAGE_AXIS.to_owned(),
            color: crate::theme::LOCATION_BAR_COLOR,
            height,
        },
        labels,
        &values,
    );
}

struct BarPlot {
    id: &'static str,
    series: &'static str,
    x_axis: &'static str,
    y_axis: String,
    color: egui::Color32,
    height: f32,
}

/// Bars sit at x = 0, 1, 2, … and the axis prints the category under each.
fn render_bar_plot(ui: &mut egui::Ui, plot: BarPlot, labels: Vec<String>, values: &[f64]) {
    let bars: Vec<Bar> = labels
        .iter()
        .zip(values)
        .enumerate()
        .map(|(idx, (label, &value))| {
            Bar::new(idx as f64, value)
                .name(label)
                .width(0.6)
                .stroke(egui::Stroke::new(0.5, plot.color))
        })
        .collect();

    let chart = BarChart::new(plot.series, bars)
        .color(plot.color.linear_multiply(0.8))
        .element_formatter(Box::new(|bar, _| format!("{}\n{}", bar.name, bar.value)));

    let count = labels.len();
    Plot::new(plot.id)
        .height(plot.height)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .show_grid([false, true])
        .include_y(0.0)
        .include_x(-0.5)
        .include_x(count as f64 - 0.5)
        .x_axis_label(plot.x_axis)
        .y_axis_label(plot.y_axis)
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
}

fn category_label(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_label_only_on_whole_positions() {
        let labels = vec!["10".to_owned(), "20".to_owned()];
        assert_eq!(category_label(&labels, 0.0), "10");
        assert_eq!(category_label(&labels, 1.0), "20");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 2.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }
}
