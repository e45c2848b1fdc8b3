use eframe::egui;
use std::path::PathBuf;

use crate::settings::AppSettings;
use crate::strip::ThumbnailStrip;
use crate::video::probe_video;

const DEFAULT_STRIP_HEIGHT: f32 = 72.0;
const STRIP_HEIGHT_RANGE: std::ops::RangeInclusive<f32> = 32.0..=200.0;

/// Main application state
pub struct FilmstripApp {
    /// The video currently shown, if any
    video: Option<LoadedVideo>,

    /// The filmstrip widget
    strip: ThumbnailStrip,

    /// Strip height in points; changing it regenerates the thumbnails
    strip_height: f32,

    /// Persistent app settings (recent videos, preferences)
    settings: Option<AppSettings>,

    /// Last open/probe error, shown as a banner
    error: Option<String>,
}

/// The video the strip samples from
#[derive(Debug, Clone)]
struct LoadedVideo {
    path: PathBuf,
    name: String,
    duration: f64,
}

impl FilmstripApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        // Try to load app settings
        let settings = AppSettings::open().ok();

        let strip_height = settings
            .as_ref()
            .and_then(|s| s.strip_height())
            .unwrap_or(DEFAULT_STRIP_HEIGHT)
            .clamp(*STRIP_HEIGHT_RANGE.start(), *STRIP_HEIGHT_RANGE.end());

        Self {
            video: None,
            strip: ThumbnailStrip::new(),
            strip_height,
            settings,
            error: None,
        }
    }

    /// Probe a video and point the strip at it
    fn open_video(&mut self, path: PathBuf) {
        match probe_video(&path) {
            Ok(meta) if meta.duration > 0.0 => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());

                tracing::info!(path = %path.display(), duration = meta.duration, "opened video");

                if let Some(ref settings) = self.settings {
                    let _ = settings.touch_recent(&path, &name, meta.duration);
                }

                self.strip.set_video(path.clone(), meta.duration);
                self.video = Some(LoadedVideo {
                    path,
                    name,
                    duration: meta.duration,
                });
                self.error = None;
            }
            Ok(_) => {
                self.error = Some("Video reports no duration".to_string());
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to probe video");
                self.error = Some(format!("Could not read video: {e}"));
            }
        }
    }

    /// Show a native file dialog and open the picked video
    fn pick_video(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Video", &["mov", "mp4", "m4v", "avi", "mkv", "webm"])
            .pick_file()
        {
            self.open_video(path);
        }
    }
}

impl eframe::App for FilmstripApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Top panel with header
        egui::TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(egui::Color32::from_rgb(20, 22, 26))
                    .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(35, 40, 48))),
            )
            .show(ctx, |ui| {
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Filmstrip").size(16.0).strong());
                    if let Some(video) = &self.video {
                        ui.add_space(8.0);
                        ui.label(
                            egui::RichText::new(&video.name)
                                .color(egui::Color32::from_rgb(130, 138, 150)),
                        );
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Open Video…").clicked() {
                            self.pick_video();
                        }
                    });
                });
                ui.add_space(8.0);
            });

        // Main content
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(error) = &self.error {
                ui.add_space(8.0);
                ui.colored_label(egui::Color32::from_rgb(230, 100, 100), error);
            }

            if self.video.is_some() {
                self.show_strip_view(ui);
            } else {
                self.show_video_picker(ui);
            }
        });
    }
}

impl FilmstripApp {
    fn show_strip_view(&mut self, ui: &mut egui::Ui) {
        let Some(video) = self.video.clone() else {
            return;
        };

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(format_duration(video.duration))
                    .color(egui::Color32::from_rgb(130, 138, 150)),
            );
            if self.strip.is_generating() {
                ui.add_space(8.0);
                ui.spinner();
                ui.label(
                    egui::RichText::new("Generating thumbnails…")
                        .color(egui::Color32::from_rgb(130, 138, 150)),
                );
            }
        });
        ui.add_space(8.0);

        let response = self.strip.show(ui, self.strip_height);
        let rect = response.rect;

        // Overlays paint after the strip, so they sit on top of the tiles.
        if let Some(pointer) = response.hover_pos() {
            let frac = ((pointer.x - rect.min.x) / rect.width()).clamp(0.0, 1.0);
            let time = frac as f64 * video.duration;

            let painter = ui.painter();
            painter.line_segment(
                [
                    egui::pos2(pointer.x, rect.min.y),
                    egui::pos2(pointer.x, rect.max.y),
                ],
                egui::Stroke::new(1.0, egui::Color32::from_rgb(255, 220, 100)),
            );
            painter.text(
                egui::pos2(pointer.x + 6.0, rect.min.y + 4.0),
                egui::Align2::LEFT_TOP,
                format_duration(time),
                egui::FontId::proportional(12.0),
                egui::Color32::WHITE,
            );
        }

        ui.painter().rect_stroke(
            rect,
            4.0,
            egui::Stroke::new(1.0, egui::Color32::from_rgb(45, 50, 60)),
        );

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            ui.label("Strip height");
            let slider = ui.add(
                egui::Slider::new(&mut self.strip_height, STRIP_HEIGHT_RANGE).suffix(" px"),
            );
            if slider.drag_stopped() {
                if let Some(ref settings) = self.settings {
                    let _ = settings.set_strip_height(self.strip_height);
                }
            }
        });
    }

    fn show_video_picker(&mut self, ui: &mut egui::Ui) {
        let mut video_to_open: Option<PathBuf> = None;
        let mut entry_to_remove: Option<i64> = None;
        let mut open_dialog = false;

        ui.vertical_centered(|ui| {
            ui.add_space(40.0);

            ui.label(egui::RichText::new("🎞").size(48.0));

            ui.add_space(16.0);
            ui.label(egui::RichText::new("Filmstrip").size(24.0).strong());
            ui.add_space(6.0);
            ui.label(
                egui::RichText::new("Open a video to preview it as a strip of thumbnails")
                    .color(egui::Color32::from_rgb(130, 138, 150)),
            );

            ui.add_space(24.0);
            if ui.button(egui::RichText::new("Open Video…").size(14.0)).clicked() {
                open_dialog = true;
            }

            // Recent Videos section
            if let Some(ref settings) = self.settings {
                if let Ok(entries) = settings.recent_videos() {
                    if !entries.is_empty() {
                        ui.add_space(28.0);
                        ui.label(
                            egui::RichText::new("Recent Videos")
                                .size(16.0)
                                .color(egui::Color32::from_rgb(130, 138, 150)),
                        );
                        ui.add_space(10.0);

                        for entry in &entries {
                            let (rect, response) = ui.allocate_exact_size(
                                egui::vec2(460.0, 44.0),
                                egui::Sense::click(),
                            );

                            if ui.is_rect_visible(rect) {
                                let painter = ui.painter();

                                let bg_color = if response.hovered() {
                                    egui::Color32::from_rgb(32, 36, 44)
                                } else {
                                    egui::Color32::from_rgb(24, 27, 33)
                                };
                                let border_color = if response.hovered() {
                                    egui::Color32::from_rgb(99, 140, 255)
                                } else {
                                    egui::Color32::from_rgb(45, 50, 60)
                                };

                                painter.rect_filled(rect, 8.0, bg_color);
                                painter.rect_stroke(rect, 8.0, egui::Stroke::new(1.0, border_color));

                                painter.text(
                                    egui::pos2(rect.left() + 12.0, rect.center().y),
                                    egui::Align2::LEFT_CENTER,
                                    &entry.name,
                                    egui::FontId::proportional(13.0),
                                    egui::Color32::from_rgb(240, 242, 245),
                                );
                                painter.text(
                                    egui::pos2(rect.right() - 36.0, rect.center().y),
                                    egui::Align2::RIGHT_CENTER,
                                    format_duration(entry.duration),
                                    egui::FontId::proportional(12.0),
                                    egui::Color32::from_rgb(130, 138, 150),
                                );

                                let remove_rect = egui::Rect::from_center_size(
                                    egui::pos2(rect.right() - 18.0, rect.center().y),
                                    egui::vec2(16.0, 16.0),
                                );
                                painter.text(
                                    remove_rect.center(),
                                    egui::Align2::CENTER_CENTER,
                                    "✕",
                                    egui::FontId::proportional(12.0),
                                    egui::Color32::from_rgb(130, 138, 150),
                                );

                                if response.clicked() {
                                    let on_remove = response
                                        .interact_pointer_pos()
                                        .map(|p| remove_rect.contains(p))
                                        .unwrap_or(false);
                                    if on_remove {
                                        entry_to_remove = Some(entry.id);
                                    } else {
                                        video_to_open = Some(entry.path.clone());
                                    }
                                }
                            }

                            ui.add_space(6.0);
                        }
                    }
                }
            }
        });

        if open_dialog {
            self.pick_video();
        }
        if let Some(path) = video_to_open {
            self.open_video(path);
        }
        if let Some(id) = entry_to_remove {
            if let Some(ref settings) = self.settings {
                let _ = settings.remove_recent(id);
            }
        }
    }
}

/// Format seconds as m:ss, or h:mm:ss past the hour
fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::format_duration;

    #[test]
    fn short_durations_use_minutes_and_seconds() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(9.6), "0:10");
        assert_eq!(format_duration(83.0), "1:23");
    }

    #[test]
    fn long_durations_include_hours() {
        assert_eq!(format_duration(3600.0), "1:00:00");
        assert_eq!(format_duration(3723.0), "1:02:03");
    }

    #[test]
    fn negative_input_clamps_to_zero() {
        assert_eq!(format_duration(-5.0), "0:00");
    }
}
