// Video metadata via ffprobe
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};

/// Metadata for a video file
#[derive(Debug, Clone)]
pub struct VideoMetadata {
    pub duration: f64,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Probe a video file with ffprobe
pub fn probe_video(path: &Path) -> Result<VideoMetadata> {
    let output = Command::new("ffprobe")
        .args([
            "-v", "quiet",
            "-print_format", "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .context("failed to run ffprobe")?;

    let json: serde_json::Value = serde_json::from_slice(&output.stdout)
        .context("ffprobe produced invalid JSON")?;

    Ok(parse_metadata(&json))
}

/// Pull duration and video dimensions out of ffprobe's JSON output.
/// Missing fields degrade to zero/None rather than failing the probe.
fn parse_metadata(json: &serde_json::Value) -> VideoMetadata {
    let duration = json["format"]["duration"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    let video_stream = json["streams"]
        .as_array()
        .and_then(|streams| streams.iter().find(|s| s["codec_type"] == "video"));

    let width = video_stream
        .and_then(|s| s["width"].as_u64())
        .map(|w| w as u32);

    let height = video_stream
        .and_then(|s| s["height"].as_u64())
        .map(|h| h as u32);

    VideoMetadata {
        duration,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_duration_and_dimensions() {
        let json: serde_json::Value = serde_json::from_str(
            r#"{
                "format": { "duration": "12.480000" },
                "streams": [
                    { "codec_type": "audio", "sample_rate": "48000" },
                    { "codec_type": "video", "width": 1920, "height": 1080 }
                ]
            }"#,
        )
        .unwrap();

        let meta = parse_metadata(&json);
        assert!((meta.duration - 12.48).abs() < 1e-9);
        assert_eq!(meta.width, Some(1920));
        assert_eq!(meta.height, Some(1080));
    }

    #[test]
    fn missing_duration_degrades_to_zero() {
        let json: serde_json::Value = serde_json::from_str(
            r#"{ "format": {}, "streams": [ { "codec_type": "video", "width": 640, "height": 480 } ] }"#,
        )
        .unwrap();

        let meta = parse_metadata(&json);
        assert_eq!(meta.duration, 0.0);
        assert_eq!(meta.width, Some(640));
    }

    #[test]
    fn audio_only_file_has_no_dimensions() {
        let json: serde_json::Value = serde_json::from_str(
            r#"{ "format": { "duration": "3.0" }, "streams": [ { "codec_type": "audio" } ] }"#,
        )
        .unwrap();

        let meta = parse_metadata(&json);
        assert_eq!(meta.duration, 3.0);
        assert_eq!(meta.width, None);
        assert_eq!(meta.height, None);
    }
}
