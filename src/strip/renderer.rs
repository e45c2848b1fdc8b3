// Filmstrip widget - collects generator results and fades tiles into place
use std::path::PathBuf;
use std::time::Instant;

use eframe::egui;

use super::layout::{cover_uv, layout_tiles};
use crate::video::{GeneratorEvent, RgbaFrame, ThumbnailGenerator};

/// Seconds for a freshly installed tile to fade from transparent to opaque.
const FADE_SECONDS: f32 = 0.2;

/// Fill for slots whose frame could not be decoded.
const BLANK_TILE_FILL: egui::Color32 = egui::Color32::from_rgb(24, 27, 33);

/// The video the strip currently samples from.
struct StripSource {
    path: PathBuf,
    duration: f64,
}

/// One laid-out tile. `texture` is None for slots that failed to decode.
struct Tile {
    x: f32,
    width: f32,
    texture: Option<egui::TextureHandle>,
    shown_at: Instant,
}

/// Collector for one in-flight generation round: a slot per requested
/// offset plus a received counter. Results for any other epoch, duplicate
/// deliveries, and out-of-range indexes are ignored.
struct PendingBatch {
    epoch: u64,
    slots: Vec<Option<RgbaFrame>>,
    delivered: Vec<bool>,
    received: usize,
}

impl PendingBatch {
    fn new(epoch: u64, count: usize) -> Self {
        Self {
            epoch,
            slots: (0..count).map(|_| None).collect(),
            delivered: vec![false; count],
            received: 0,
        }
    }

    /// Store one result. Returns whether it was accepted.
    fn accept(&mut self, epoch: u64, index: usize, frame: Option<RgbaFrame>) -> bool {
        if epoch != self.epoch || index >= self.slots.len() || self.delivered[index] {
            return false;
        }

        self.delivered[index] = true;
        self.slots[index] = frame;
        self.received += 1;
        true
    }

    fn is_complete(&self) -> bool {
        self.received == self.slots.len()
    }

    fn into_slots(self) -> Vec<Option<RgbaFrame>> {
        self.slots
    }
}

/// Horizontal strip of thumbnails sampled at evenly spaced offsets of a
/// video. Regenerates itself whenever the source or the strip geometry
/// changes; the previous tiles stay visible until the new batch is complete,
/// then the new tiles replace them wholesale and fade in.
pub struct ThumbnailStrip {
    generator: ThumbnailGenerator,
    source: Option<StripSource>,
    pending: Option<PendingBatch>,
    tiles: Vec<Tile>,
    generated_size: Option<(f32, f32)>,
}

impl ThumbnailStrip {
    pub fn new() -> Self {
        Self {
            generator: ThumbnailGenerator::new(),
            source: None,
            pending: None,
            tiles: Vec::new(),
            generated_size: None,
        }
    }

    /// Point the strip at a new video. Thumbnails regenerate on the next
    /// `show`; anything still in flight for the old video becomes stale.
    pub fn set_video(&mut self, path: PathBuf, duration: f64) {
        self.source = Some(StripSource { path, duration });
        self.generated_size = None;
        self.pending = None;
        self.tiles.clear();
    }

    /// Whether a generation round is still in flight.
    pub fn is_generating(&self) -> bool {
        self.pending.is_some()
    }

    /// Render the strip at the available width. Tiles paint first, so
    /// anything the caller draws after this call overlays them.
    pub fn show(&mut self, ui: &mut egui::Ui, height: f32) -> egui::Response {
        let width = ui.available_width();
        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(width, height), egui::Sense::hover());

        self.request_if_stale(rect);
        self.drain_events(ui.ctx(), rect);
        self.draw_tiles(ui, rect);

        if self.pending.is_some() || self.fading() {
            ui.ctx().request_repaint();
        }

        response
    }

    /// Start a new batch when the source or the strip geometry changed.
    /// Beginning a batch bumps the generator epoch, which cancels whatever
    /// was still pending.
    fn request_if_stale(&mut self, rect: egui::Rect) {
        let Some(source) = &self.source else { return };
        if rect.width() <= 0.0 || rect.height() <= 0.0 || source.duration <= 0.0 {
            return;
        }

        let size = (rect.width(), rect.height());
        if self.generated_size == Some(size) {
            return;
        }

        self.generated_size = Some(size);
        let epoch = self
            .generator
            .begin_batch(&source.path, size, source.duration);
        tracing::debug!(epoch, width = size.0, height = size.1, "requested thumbnail batch");
    }

    fn drain_events(&mut self, ctx: &egui::Context, rect: egui::Rect) {
        while let Some(event) = self.generator.poll() {
            match event {
                GeneratorEvent::BatchStarted { epoch, count } => {
                    // Only the latest batch gets a collector; stale batch
                    // starts (and everything they emit later) are dropped.
                    if epoch == self.generator.current_epoch() {
                        self.pending = Some(PendingBatch::new(epoch, count));
                    }
                }
                GeneratorEvent::Frame { epoch, index, frame } => {
                    let complete = match &mut self.pending {
                        Some(pending) => {
                            pending.accept(epoch, index, frame) && pending.is_complete()
                        }
                        None => false,
                    };

                    if complete {
                        if let Some(batch) = self.pending.take() {
                            self.install_tiles(ctx, rect, batch.into_slots());
                        }
                    }
                }
            }
        }
    }

    /// Replace the previous tiles with a completed batch. Dropping the old
    /// handles frees the previous batch's textures.
    fn install_tiles(&mut self, ctx: &egui::Context, rect: egui::Rect, slots: Vec<Option<RgbaFrame>>) {
        self.tiles.clear();

        let placements = layout_tiles(rect.width(), rect.height(), slots.len());
        let now = Instant::now();

        for (i, (placement, frame)) in placements.into_iter().zip(slots).enumerate() {
            let texture = frame.map(|frame| {
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [frame.width as usize, frame.height as usize],
                    &frame.data,
                );
                ctx.load_texture(format!("strip_tile_{i}"), image, egui::TextureOptions::LINEAR)
            });

            self.tiles.push(Tile {
                x: placement.x,
                width: placement.width,
                texture,
                shown_at: now,
            });
        }

        tracing::debug!(tiles = self.tiles.len(), "installed thumbnail tiles");
    }

    fn draw_tiles(&self, ui: &egui::Ui, rect: egui::Rect) {
        let painter = ui.painter_at(rect);

        for tile in &self.tiles {
            let alpha = (tile.shown_at.elapsed().as_secs_f32() / FADE_SECONDS).clamp(0.0, 1.0);
            let tile_rect = egui::Rect::from_min_size(
                egui::pos2(rect.min.x + tile.x, rect.min.y),
                egui::vec2(tile.width, rect.height()),
            );

            match &tile.texture {
                Some(texture) => {
                    let [w, h] = texture.size();
                    let uv = cover_uv(w as u32, h as u32, tile.width, rect.height());
                    painter.image(
                        texture.id(),
                        tile_rect,
                        uv,
                        egui::Color32::WHITE.gamma_multiply(alpha),
                    );
                }
                None => {
                    painter.rect_filled(tile_rect, 0.0, BLANK_TILE_FILL.gamma_multiply(alpha));
                }
            }
        }
    }

    fn fading(&self) -> bool {
        self.tiles
            .iter()
            .any(|tile| tile.shown_at.elapsed().as_secs_f32() < FADE_SECONDS)
    }
}

impl Default for ThumbnailStrip {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> RgbaFrame {
        RgbaFrame {
            data: vec![0; 4],
            width: 1,
            height: 1,
        }
    }

    #[test]
    fn batch_completes_once_every_slot_reports() {
        let mut batch = PendingBatch::new(1, 3);

        assert!(batch.accept(1, 0, Some(frame())));
        assert!(!batch.is_complete());
        assert!(batch.accept(1, 1, None)); // failed decode still counts
        assert!(batch.accept(1, 2, Some(frame())));
        assert!(batch.is_complete());

        let slots = batch.into_slots();
        assert_eq!(slots.len(), 3);
        assert!(slots[0].is_some());
        assert!(slots[1].is_none());
        assert!(slots[2].is_some());
    }

    #[test]
    fn stale_epoch_results_are_dropped() {
        let mut batch = PendingBatch::new(2, 2);

        // Late callbacks from the superseded batch must not land anywhere.
        assert!(!batch.accept(1, 0, Some(frame())));
        assert!(!batch.is_complete());

        assert!(batch.accept(2, 0, Some(frame())));
        assert!(batch.accept(2, 1, Some(frame())));
        assert!(batch.is_complete());
    }

    #[test]
    fn duplicate_and_out_of_range_deliveries_are_ignored() {
        let mut batch = PendingBatch::new(1, 2);

        assert!(batch.accept(1, 0, Some(frame())));
        assert!(!batch.accept(1, 0, None)); // duplicate keeps the first result
        assert!(!batch.accept(1, 5, Some(frame())));
        assert!(!batch.is_complete());

        let slots = {
            assert!(batch.accept(1, 1, None));
            batch.into_slots()
        };
        assert!(slots[0].is_some());
    }
}
