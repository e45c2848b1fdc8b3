#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod settings;
mod strip;
mod video;

use app::FilmstripApp;
use eframe::egui;

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 400.0])
            .with_min_inner_size([480.0, 260.0])
            .with_title("Filmstrip"),
        ..Default::default()
    };

    eframe::run_native(
        "Filmstrip",
        options,
        Box::new(|cc| {
            // Configure dark theme
            setup_custom_style(&cc.egui_ctx);

            Ok(Box::new(FilmstripApp::new(cc)))
        }),
    )
}

fn setup_custom_style(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    // Slate blue-gray palette
    let bg_dark = egui::Color32::from_rgb(15, 17, 21);
    let bg_card = egui::Color32::from_rgb(24, 27, 33);
    let border = egui::Color32::from_rgb(45, 50, 60);
    let text = egui::Color32::from_rgb(240, 242, 245);
    let text_muted = egui::Color32::from_rgb(130, 138, 150);
    let accent = egui::Color32::from_rgb(99, 140, 255);

    style.visuals.dark_mode = true;
    style.visuals.panel_fill = bg_dark;
    style.visuals.window_fill = egui::Color32::from_rgb(22, 25, 30);
    style.visuals.extreme_bg_color = bg_dark;
    style.visuals.faint_bg_color = bg_card;

    style.visuals.widgets.noninteractive.bg_fill = bg_card;
    style.visuals.widgets.noninteractive.fg_stroke = egui::Stroke::new(1.0, text);
    style.visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, border);

    style.visuals.widgets.inactive.bg_fill = egui::Color32::from_rgb(35, 40, 50);
    style.visuals.widgets.inactive.fg_stroke = egui::Stroke::new(1.0, text_muted);
    style.visuals.widgets.inactive.bg_stroke = egui::Stroke::new(1.0, border);

    style.visuals.widgets.hovered.bg_fill = egui::Color32::from_rgb(32, 36, 44);
    style.visuals.widgets.hovered.fg_stroke = egui::Stroke::new(1.0, text);
    style.visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, accent);

    style.visuals.widgets.active.bg_fill = egui::Color32::from_rgb(45, 52, 65);
    style.visuals.widgets.active.fg_stroke = egui::Stroke::new(1.0, text);
    style.visuals.widgets.active.bg_stroke = egui::Stroke::new(1.0, accent);

    style.visuals.selection.bg_fill = accent.linear_multiply(0.25);
    style.visuals.selection.stroke = egui::Stroke::new(1.0, accent);

    style.spacing.item_spacing = egui::vec2(8.0, 8.0);
    style.spacing.button_padding = egui::vec2(14.0, 6.0);

    ctx.set_style(style);
}
