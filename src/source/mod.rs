/// Frame acquisition module
///
/// A frame source is whatever currently supplies raster frames to the scan
/// pipeline: the camera (camera.rs), a video file played back through an
/// ffmpeg pipe (video.rs), or images loaded from disk (folder.rs).
///
/// Sources are exclusively owned by the controller; dropping a source
/// releases the underlying device or child process, so swapping sources can
/// never leak a camera handle.
use crate::error::Error;

pub mod camera;
pub mod folder;
pub mod video;

/// A raster frame: height x width x RGB, owned, replaced wholesale per
/// processing step and never mutated concurrently.
pub type Frame = image::RgbImage;

/// Anything that can produce frames on demand.
pub trait FrameSource {
    /// Pull the next frame.
    ///
    /// Returns `Ok(None)` when the source is exhausted (end of video);
    /// a live camera never returns `None`.
    fn grab(&mut self) -> Result<Option<Frame>, Error>;

    /// Human-readable description for the status line.
    fn describe(&self) -> String;
}
