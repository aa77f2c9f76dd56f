use eframe::egui;
use egui::{Color32, CornerRadius, Margin, Stroke};

pub const ACCENT_COLOR: Color32 = Color32::from_rgb(47, 111, 211);
pub const MATERIAL_BAR_COLOR: Color32 = Color32::from_rgb(135, 206, 235);
pub const LOCATION_BAR_COLOR: Color32 = Color32::from_rgb(144, 238, 144);
pub const WARNING_COLOR: Color32 = Color32::from_rgb(230, 160, 40);

pub const SPACING_SMALL: f32 = 8.0;
pub const MARGIN_CARD: f32 = 10.0;
pub const PANEL_SIDE: f32 = 16.0;
pub const PANEL_VERTICAL: f32 = 6.0;

pub fn apply_dashboard_theme(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();

    visuals.widgets.active.bg_fill = ACCENT_COLOR;
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);
    visuals.widgets.hovered.corner_radius = CornerRadius::same(6);
    visuals.widgets.inactive.corner_radius = CornerRadius::same(6);
    visuals.selection.bg_fill = ACCENT_COLOR.linear_multiply(0.4);
    visuals.faint_bg_color = Color32::from_rgb(35, 35, 35);

    ctx.set_visuals(visuals);
}

pub fn card_frame(ui: &egui::Ui) -> egui::Frame {
    egui::Frame::new()
        .fill(ui.visuals().faint_bg_color)
        .corner_radius(CornerRadius::same(8))
        .inner_margin(Margin::same(MARGIN_CARD as i8))
        .stroke(Stroke::new(
            1.0,
            ui.visuals().widgets.noninteractive.bg_stroke.color,
        ))
}

pub fn top_bar_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(Color32::from_rgb(30, 30, 30))
        .inner_margin(Margin {
            left: PANEL_SIDE as i8,
            right: PANEL_SIDE as i8,
            top: PANEL_VERTICAL as i8,
            bottom: PANEL_VERTICAL as i8,
        })
}
