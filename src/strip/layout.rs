// Strip geometry - tile count, sample timestamps, left-to-right packing
use egui::Rect;

/// A single tile's placement within the strip, relative to the strip origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileRect {
    pub x: f32,
    pub width: f32,
    pub height: f32,
}

/// Number of thumbnails needed to tile a strip of the given size with
/// square-ish tiles: ceil(width / height), minimum 1.
pub fn tile_count(width: f32, height: f32) -> usize {
    if width <= 0.0 || height <= 0.0 {
        return 1;
    }
    ((width / height).ceil() as usize).max(1)
}

/// Evenly spaced sample offsets over [0, duration): t[i] = i * duration / count.
pub fn sample_timestamps(duration: f64, count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| i as f64 * duration / count as f64)
        .collect()
}

/// Pack `count` tiles left to right. Each tile is min(height, remaining width)
/// wide and full height; the cursor advances by the placed width, so the last
/// tile may be narrower than the rest.
pub fn layout_tiles(width: f32, height: f32, count: usize) -> Vec<TileRect> {
    let mut tiles = Vec::with_capacity(count);
    let mut x = 0.0_f32;

    for _ in 0..count {
        let remaining = width - x;
        let tile_width = height.min(remaining);
        if tile_width <= 0.0 {
            break;
        }

        tiles.push(TileRect {
            x,
            width: tile_width,
            height,
        });

        x += tile_width;
        if x >= width {
            break;
        }
    }

    tiles
}

/// UV rect that crops a texture to cover a tile (scale-to-fill, centered).
pub fn cover_uv(tex_width: u32, tex_height: u32, tile_width: f32, tile_height: f32) -> Rect {
    if tex_width == 0 || tex_height == 0 || tile_width <= 0.0 || tile_height <= 0.0 {
        return Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    }

    let tex_aspect = tex_width as f32 / tex_height as f32;
    let tile_aspect = tile_width / tile_height;

    if tex_aspect > tile_aspect {
        // Texture is wider than the tile: crop left and right.
        let visible = tile_aspect / tex_aspect;
        let x0 = (1.0 - visible) / 2.0;
        Rect::from_min_max(egui::pos2(x0, 0.0), egui::pos2(x0 + visible, 1.0))
    } else {
        // Texture is taller than the tile: crop top and bottom.
        let visible = tex_aspect / tile_aspect;
        let y0 = (1.0 - visible) / 2.0;
        Rect::from_min_max(egui::pos2(0.0, y0), egui::pos2(1.0, y0 + visible))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_is_ceil_of_aspect_ratio() {
        assert_eq!(tile_count(300.0, 100.0), 3);
        assert_eq!(tile_count(301.0, 100.0), 4);
        assert_eq!(tile_count(100.0, 100.0), 1);
        assert_eq!(tile_count(250.0, 100.0), 3);
    }

    #[test]
    fn count_is_at_least_one() {
        assert_eq!(tile_count(50.0, 100.0), 1);
        assert_eq!(tile_count(0.0, 100.0), 1);
        assert_eq!(tile_count(100.0, 0.0), 1);
    }

    #[test]
    fn timestamps_are_evenly_spaced() {
        let ts = sample_timestamps(10.0, 3);
        assert_eq!(ts.len(), 3);
        assert_eq!(ts[0], 0.0);
        assert!((ts[1] - 10.0 / 3.0).abs() < 1e-9);
        assert!((ts[2] - 20.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn timestamps_increase_and_stay_below_duration() {
        let duration = 37.5;
        let ts = sample_timestamps(duration, 8);
        for pair in ts.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        for t in &ts {
            assert!(*t >= 0.0 && *t < duration);
        }
    }

    #[test]
    fn square_tiles_fill_an_exact_multiple() {
        let tiles = layout_tiles(300.0, 100.0, 3);
        assert_eq!(tiles.len(), 3);
        assert_eq!(tiles[0], TileRect { x: 0.0, width: 100.0, height: 100.0 });
        assert_eq!(tiles[1], TileRect { x: 100.0, width: 100.0, height: 100.0 });
        assert_eq!(tiles[2], TileRect { x: 200.0, width: 100.0, height: 100.0 });
    }

    #[test]
    fn last_tile_shrinks_to_remaining_width() {
        let tiles = layout_tiles(250.0, 100.0, 3);
        assert_eq!(tiles.len(), 3);
        assert_eq!(tiles[2].x, 200.0);
        assert_eq!(tiles[2].width, 50.0);
    }

    #[test]
    fn packing_stops_at_the_strip_edge() {
        // More tiles requested than fit: the extras are dropped.
        let tiles = layout_tiles(150.0, 100.0, 5);
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[1].width, 50.0);
    }

    #[test]
    fn degenerate_strip_produces_no_tiles() {
        assert!(layout_tiles(0.0, 100.0, 3).is_empty());
        assert!(layout_tiles(100.0, 0.0, 3).is_empty());
    }

    #[test]
    fn wide_texture_is_cropped_horizontally() {
        let uv = cover_uv(300, 100, 100.0, 100.0);
        assert!((uv.min.x - 1.0 / 3.0).abs() < 1e-5);
        assert!((uv.max.x - 2.0 / 3.0).abs() < 1e-5);
        assert_eq!(uv.min.y, 0.0);
        assert_eq!(uv.max.y, 1.0);
    }

    #[test]
    fn tall_texture_is_cropped_vertically() {
        let uv = cover_uv(100, 200, 100.0, 100.0);
        assert_eq!(uv.min.x, 0.0);
        assert_eq!(uv.max.x, 1.0);
        assert!((uv.min.y - 0.25).abs() < 1e-5);
        assert!((uv.max.y - 0.75).abs() < 1e-5);
    }

    #[test]
    fn matching_aspect_uses_full_texture() {
        let uv = cover_uv(160, 160, 80.0, 80.0);
        assert_eq!(uv, Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)));
    }
}
