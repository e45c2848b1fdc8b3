// Background thumbnail generator - moves frame decoding off the UI thread
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TryRecvError};

use super::decoder::FrameDecoder;
use super::RgbaFrame;
use crate::strip::layout::{sample_timestamps, tile_count};

/// Largest output size for a generated thumbnail, either dimension.
const MAX_THUMBNAIL_SIZE: (u32, u32) = (300, 300);

/// Request sent to the background worker.
enum Request {
    /// Generate one batch of thumbnails for the given view geometry.
    Generate {
        epoch: u64,
        path: PathBuf,
        view_size: (f32, f32),
        duration: f64,
    },
    /// Stop the background thread.
    Stop,
}

/// Event emitted by the worker while a batch runs.
pub enum GeneratorEvent {
    /// Batch setup finished; `count` frame events follow unless the batch
    /// is superseded first.
    BatchStarted { epoch: u64, count: usize },
    /// One decoded slot. `frame` is None when that offset failed to decode.
    Frame {
        epoch: u64,
        index: usize,
        frame: Option<RgbaFrame>,
    },
}

/// Thumbnail generator that never blocks the UI thread.
///
/// Architecture:
/// - UI sends a batch request via channel (non-blocking)
/// - a single worker thread computes the tile count and timestamps, then
///   decodes each offset in order
/// - UI polls for per-slot results via try_recv (non-blocking)
///
/// Batches carry a monotone epoch. Starting a new batch bumps the epoch,
/// which is the whole cancellation story: the worker abandons work for a
/// stale epoch between offsets, and the consumer drops any event whose
/// epoch is no longer current.
pub struct ThumbnailGenerator {
    request_tx: Sender<Request>,
    event_rx: Receiver<GeneratorEvent>,
    epoch: Arc<AtomicU64>,
    worker: Option<JoinHandle<()>>,
}

impl ThumbnailGenerator {
    pub fn new() -> Self {
        let (request_tx, request_rx) = crossbeam_channel::unbounded();
        let (event_tx, event_rx) = crossbeam_channel::unbounded();

        let epoch = Arc::new(AtomicU64::new(0));
        let worker_epoch = Arc::clone(&epoch);
        let worker = thread::spawn(move || {
            worker_main(request_rx, event_tx, worker_epoch);
        });

        Self {
            request_tx,
            event_rx,
            epoch,
            worker: Some(worker),
        }
    }

    /// Start a new batch, invalidating any batch still in flight.
    /// Returns the new batch's epoch.
    pub fn begin_batch(&self, path: &Path, view_size: (f32, f32), duration: f64) -> u64 {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.request_tx.send(Request::Generate {
            epoch,
            path: path.to_path_buf(),
            view_size,
            duration,
        });
        epoch
    }

    /// Epoch of the most recently requested batch.
    pub fn current_epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Poll for the next batch event (non-blocking).
    pub fn poll(&self) -> Option<GeneratorEvent> {
        match self.event_rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

impl Default for ThumbnailGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ThumbnailGenerator {
    fn drop(&mut self) {
        let _ = self.request_tx.send(Request::Stop);

        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

/// Background thread main loop
fn worker_main(
    request_rx: Receiver<Request>,
    event_tx: Sender<GeneratorEvent>,
    epoch: Arc<AtomicU64>,
) {
    loop {
        let request = match request_rx.recv() {
            Ok(req) => req,
            Err(_) => break, // Channel closed
        };

        match request {
            Request::Stop => break,

            Request::Generate {
                epoch: batch,
                path,
                view_size,
                duration,
            } => {
                if batch != epoch.load(Ordering::SeqCst) {
                    continue; // a newer batch already superseded this one
                }

                let count = tile_count(view_size.0, view_size.1);
                let offsets = sample_timestamps(duration, count);

                if event_tx
                    .send(GeneratorEvent::BatchStarted { epoch: batch, count })
                    .is_err()
                {
                    break;
                }

                // One decoder for the whole batch. If the file cannot be
                // opened, every slot reports empty so the batch still
                // completes.
                let mut decoder = match FrameDecoder::open(&path, MAX_THUMBNAIL_SIZE) {
                    Ok(decoder) => Some(decoder),
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "failed to open video for thumbnails"
                        );
                        None
                    }
                };

                for (index, offset) in offsets.into_iter().enumerate() {
                    if batch != epoch.load(Ordering::SeqCst) {
                        break; // superseded mid-batch
                    }

                    let frame = decoder.as_mut().and_then(|d| match d.decode_at(offset) {
                        Ok(frame) => Some(frame),
                        Err(e) => {
                            tracing::debug!(offset, error = %e, "thumbnail decode failed");
                            None
                        }
                    });

                    if event_tx
                        .send(GeneratorEvent::Frame {
                            epoch: batch,
                            index,
                            frame,
                        })
                        .is_err()
                    {
                        return; // Receiver dropped, stop thread
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn next_event(generator: &ThumbnailGenerator) -> GeneratorEvent {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(event) = generator.poll() {
                return event;
            }
            assert!(Instant::now() < deadline, "worker produced no event");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn unreadable_video_still_completes_the_batch() {
        let generator = ThumbnailGenerator::new();
        let epoch = generator.begin_batch(Path::new("/nonexistent/clip.mp4"), (300.0, 100.0), 10.0);

        match next_event(&generator) {
            GeneratorEvent::BatchStarted { epoch: e, count } => {
                assert_eq!(e, epoch);
                assert_eq!(count, 3);
            }
            GeneratorEvent::Frame { .. } => panic!("expected batch start first"),
        }

        for expected in 0..3 {
            match next_event(&generator) {
                GeneratorEvent::Frame { epoch: e, index, frame } => {
                    assert_eq!(e, epoch);
                    assert_eq!(index, expected);
                    assert!(frame.is_none());
                }
                GeneratorEvent::BatchStarted { .. } => panic!("unexpected batch start"),
            }
        }
    }

    #[test]
    fn a_new_batch_bumps_the_epoch() {
        let generator = ThumbnailGenerator::new();
        let first = generator.begin_batch(Path::new("/nonexistent/a.mp4"), (300.0, 100.0), 10.0);
        let second = generator.begin_batch(Path::new("/nonexistent/b.mp4"), (300.0, 100.0), 10.0);

        assert!(second > first);
        assert_eq!(generator.current_epoch(), second);
    }
}
