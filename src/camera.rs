// Webcam capture on its own thread.
// Visual expectation: the stage keeps animating at display rate while the camera
// delivers at its own pace; a slow or stalled camera only freezes the video layer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::Error;
use crate::types::FrameBuffer;

use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

use image::RgbImage;
use tracing::{debug, info, warn};

/// Pause after a failed fetch so a broken device doesn't spin the capture thread.
const RETRY_DELAY: Duration = Duration::from_millis(10);

/// An open nokhwa stream. Lives on the capture thread only.
struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
}

impl CameraCapture {
    /// Open camera `index` near the requested resolution and frame rate.
    fn new(index: u32, width: u32, height: u32, fps: u32) -> Result<Self, Error> {
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            fps,
        );

        // Ask for RGB frames in the format closest to what we asked for.
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        // This fails when there is no device or permission is denied.
        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;

        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // The actual stream might choose a slightly different resolution.
        let actual = cam.resolution();
        info!(
            requested = %format!("{width}x{height}"),
            actual = %format!("{}x{}", actual.width(), actual.height()),
            "camera stream open"
        );

        Ok(Self {
            cam,
            width: actual.width(),
            height: actual.height(),
        })
    }

    /// Grab one frame from the camera and convert it to 0x00RRGGBB pixels.
    /// Blocks until the driver hands over a frame.
    fn next_frame(&mut self) -> Result<FrameBuffer, Error> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        // Decode to an ImageBuffer<Rgb<u8>, Vec<u8>> (handles various raw formats safely).
        let rgb_img = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        Ok(rgb_to_frame(&rgb_img))
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Holds the newest decoded frame until the render loop picks it up.
/// Older frames that were never picked up are simply overwritten.
#[derive(Clone, Default)]
pub struct FrameSlot(Arc<Mutex<Option<FrameBuffer>>>);

impl FrameSlot {
    pub fn publish(&self, frame: FrameBuffer) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(frame);
    }

    /// The newest frame since the last call, or None when nothing new arrived. Never blocks on the camera.
    pub fn take(&self) -> Option<FrameBuffer> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}

/// Background capture: a thread owns the camera and keeps publishing into a `FrameSlot`.
/// Dropping the feed stops the thread.
pub struct CameraFeed {
    slot: FrameSlot,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
    width: u32,
    height: u32,
}

impl CameraFeed {
    /// Open the camera on the capture thread and wait until it reports the stream is up.
    /// Visual: on failure nothing is started and the caller shows the idle screen.
    pub fn start(index: u32, width: u32, height: u32, fps: u32) -> Result<Self, Error> {
        let slot = FrameSlot::default();
        let stop = Arc::new(AtomicBool::new(false));
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(u32, u32), Error>>(1);

        let thread = {
            let slot = slot.clone();
            let stop = Arc::clone(&stop);
            thread::Builder::new()
                .name("camera-capture".into())
                .spawn(move || {
                    // The device handle stays on this thread for its whole life
                    let mut cam = match CameraCapture::new(index, width, height, fps) {
                        Ok(cam) => cam,
                        Err(e) => {
                            let _ = ready_tx.send(Err(e));
                            return;
                        }
                    };
                    let _ = ready_tx.send(Ok(cam.resolution()));

                    while !stop.load(Ordering::Relaxed) {
                        match cam.next_frame() {
                            Ok(frame) => slot.publish(frame),
                            Err(e) => {
                                warn!("{e}; video holds its last frame");
                                thread::sleep(RETRY_DELAY);
                            }
                        }
                    }
                    debug!("capture thread stopped");
                })
                .map_err(|e| Error::CameraInit(format!("Spawn capture thread: {e}")))?
        };

        let ready = ready_rx
            .recv()
            .map_err(|_| Error::CameraInit("capture thread exited before the stream opened".into()))
            .and_then(|r| r);
        match ready {
            Ok((width, height)) => Ok(Self {
                slot,
                stop,
                thread: Some(thread),
                width,
                height,
            }),
            Err(e) => {
                let _ = thread.join();
                Err(e)
            }
        }
    }

    /// Newest frame since the last call, if any.
    pub fn latest(&self) -> Option<FrameBuffer> {
        self.slot.take()
    }

    /// Report the actual resolution the camera is delivering.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Drop for CameraFeed {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        // Returns once the in-flight fetch completes
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Pack an RGB image as 0x00RRGGBB, row by row.
pub fn rgb_to_frame(img: &RgbImage) -> FrameBuffer {
    let (w, h) = img.dimensions();
    let pixels = img
        .pixels()
        .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
        .collect();

    FrameBuffer {
        width: w as usize,
        height: h as usize,
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn rgb_image_packs_row_major() {
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(2, 0, Rgb([0xFF, 0x00, 0x00]));
        img.put_pixel(0, 1, Rgb([0x01, 0x02, 0x03]));

        let fb = rgb_to_frame(&img);
        assert_eq!((fb.width, fb.height), (3, 2));
        assert_eq!(fb.pixels.len(), 6);
        assert_eq!(fb.pixels[2], 0x00_FF_00_00);
        assert_eq!(fb.pixels[3], 0x00_01_02_03);
        assert_eq!(fb.pixels[0], 0);
    }

    #[test]
    fn slot_hands_out_only_the_newest_frame_once() {
        let slot = FrameSlot::default();
        assert_eq!(slot.take(), None);

        slot.publish(FrameBuffer::filled(2, 2, 0x00_00_00_01));
        slot.publish(FrameBuffer::filled(2, 2, 0x00_00_00_02));
        assert_eq!(slot.take(), Some(FrameBuffer::filled(2, 2, 0x00_00_00_02)));

        // Nothing new since: the render loop keeps its previous frame
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn slot_is_shared_with_a_producer_thread() {
        let slot = FrameSlot::default();
        let producer = {
            let slot = slot.clone();
            thread::spawn(move || {
                for i in 0..50u32 {
                    slot.publish(FrameBuffer::filled(4, 3, i));
                }
            })
        };
        producer.join().unwrap();
        assert_eq!(slot.take(), Some(FrameBuffer::filled(4, 3, 49)));
    }
}
