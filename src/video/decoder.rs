// Frame extraction at exact timestamps using ffmpeg-next
use std::path::Path;

use super::DecodeError;

extern crate ffmpeg_next as ffmpeg;

/// A decoded frame, scaled to the output size and converted to RGBA.
pub struct RgbaFrame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decoder for pulling single frames out of a video at requested offsets.
///
/// Opened once per batch and reused across offsets: each `decode_at` seeks,
/// then decodes forward until the frame at or after the requested offset
/// appears, so the result matches the offset exactly rather than the nearest
/// keyframe.
pub struct FrameDecoder {
    format_ctx: ffmpeg::format::context::Input,
    video_stream_index: usize,
    decoder: ffmpeg::decoder::Video,
    scaler: ffmpeg::software::scaling::Context,
    time_base: f64,
    out_width: u32,
    out_height: u32,
}

impl FrameDecoder {
    /// Open a video file for frame extraction. Output frames are scaled to
    /// fit within `max_size`, preserving aspect ratio.
    pub fn open(path: &Path, max_size: (u32, u32)) -> Result<Self, DecodeError> {
        ffmpeg::init()?;

        let format_ctx = ffmpeg::format::input(path)?;

        let stream = format_ctx
            .streams()
            .best(ffmpeg::media::Type::Video)
            .ok_or_else(|| DecodeError::NoVideoStream(path.to_path_buf()))?;

        let video_stream_index = stream.index();

        let time_base = stream.time_base();
        let time_base = f64::from(time_base.numerator()) / f64::from(time_base.denominator());

        let context_decoder = ffmpeg::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = context_decoder.decoder().video()?;

        let width = decoder.width();
        let height = decoder.height();
        let (out_width, out_height) = fit_within(width, height, max_size.0, max_size.1);

        let scaler = ffmpeg::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg::format::Pixel::RGBA,
            out_width,
            out_height,
            ffmpeg::software::scaling::Flags::BILINEAR,
        )?;

        Ok(Self {
            format_ctx,
            video_stream_index,
            decoder,
            scaler,
            time_base,
            out_width,
            out_height,
        })
    }

    /// Output frame dimensions.
    #[allow(dead_code)]
    pub fn output_size(&self) -> (u32, u32) {
        (self.out_width, self.out_height)
    }

    /// Seek to `timestamp` (seconds) and decode the frame at or after it.
    pub fn decode_at(&mut self, timestamp: f64) -> Result<RgbaFrame, DecodeError> {
        let position = (timestamp * f64::from(ffmpeg::ffi::AV_TIME_BASE)) as i64;

        if self.format_ctx.seek(position, ..position).is_err() {
            // Try seeking backwards from the start if the direct seek fails
            self.format_ctx.seek(0, ..position)?;
        }

        // Flush decoder buffers after seek
        self.decoder.flush();

        let mut decoded_frame = ffmpeg::frame::Video::empty();
        let mut scaled_frame = ffmpeg::frame::Video::empty();

        // Decode forward from the seek point (a keyframe at or before the
        // target) until the requested frame appears.
        for (stream, packet) in self.format_ctx.packets() {
            if stream.index() != self.video_stream_index {
                continue;
            }

            if self.decoder.send_packet(&packet).is_err() {
                continue;
            }

            while self.decoder.receive_frame(&mut decoded_frame).is_ok() {
                let pts = decoded_frame.pts().unwrap_or(0) as f64 * self.time_base;
                if pts + 1e-6 < timestamp {
                    continue;
                }

                self.scaler.run(&decoded_frame, &mut scaled_frame)?;
                return Ok(copy_rgba(&scaled_frame, self.out_width, self.out_height));
            }
        }

        // End of stream: drain frames still buffered in the decoder.
        let _ = self.decoder.send_eof();
        while self.decoder.receive_frame(&mut decoded_frame).is_ok() {
            let pts = decoded_frame.pts().unwrap_or(0) as f64 * self.time_base;
            if pts + 1e-6 < timestamp {
                continue;
            }

            self.scaler.run(&decoded_frame, &mut scaled_frame)?;
            return Ok(copy_rgba(&scaled_frame, self.out_width, self.out_height));
        }

        Err(DecodeError::FrameUnavailable(timestamp))
    }
}

/// Copy a scaled RGBA frame into a tightly packed buffer, accounting for
/// the row stride ffmpeg pads to.
fn copy_rgba(frame: &ffmpeg::frame::Video, width: u32, height: u32) -> RgbaFrame {
    let data = frame.data(0);
    let stride = frame.stride(0);

    let mut rgba_data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height as usize {
        let row_start = y * stride;
        let row_end = row_start + width as usize * 4;
        rgba_data.extend_from_slice(&data[row_start..row_end]);
    }

    RgbaFrame {
        data: rgba_data,
        width,
        height,
    }
}

/// Largest size that fits within the bounds while preserving aspect ratio.
/// Sources already inside the bounds are left at their native size.
fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 || (width <= max_width && height <= max_height) {
        return (width.max(1), height.max(1));
    }

    let ratio = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
    (
        ((width as f64 * ratio) as u32).max(1),
        ((height as f64 * ratio) as u32).max(1),
    )
}

#[cfg(test)]
mod tests {
    use super::fit_within;

    #[test]
    fn large_frames_shrink_to_the_bounds() {
        assert_eq!(fit_within(1920, 1080, 300, 300), (300, 168));
        assert_eq!(fit_within(1080, 1920, 300, 300), (168, 300));
    }

    #[test]
    fn small_frames_keep_their_native_size() {
        assert_eq!(fit_within(160, 90, 300, 300), (160, 90));
    }

    #[test]
    fn degenerate_dimensions_stay_positive() {
        assert_eq!(fit_within(0, 1080, 300, 300), (1, 1080));
        let (w, h) = fit_within(10_000, 1, 300, 300);
        assert!(w >= 1 && h >= 1);
    }
}
