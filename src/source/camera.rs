use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;

use super::{Frame, FrameSource};
use crate::error::Error;

/// Live camera source backed by nokhwa.
///
/// The stream is opened eagerly so that a failing device surfaces as
/// `Error::SourceUnavailable` at toggle time rather than on the first tick.
/// Dropping the source stops the stream and releases the device.
pub struct CameraSource {
    camera: Camera,
    index: u32,
}

impl CameraSource {
    pub fn open(index: u32) -> Result<Self, Error> {
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);

        let mut camera = Camera::new(CameraIndex::Index(index), requested)
            .map_err(|e| Error::SourceUnavailable(format!("camera {index}: {e}")))?;

        camera
            .open_stream()
            .map_err(|e| Error::SourceUnavailable(format!("camera {index} stream: {e}")))?;

        tracing::info!(index, "camera opened");
        Ok(Self { camera, index })
    }
}

impl FrameSource for CameraSource {
    fn grab(&mut self) -> Result<Option<Frame>, Error> {
        let buffer = self
            .camera
            .frame()
            .map_err(|e| Error::SourceUnavailable(format!("camera read: {e}")))?;

        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::SourceUnavailable(format!("camera frame decode: {e}")))?;

        // Rebuild through the raw buffer so our Frame type stays independent
        // of the image version nokhwa links against.
        let (width, height) = (decoded.width(), decoded.height());
        let frame = Frame::from_raw(width, height, decoded.into_raw()).ok_or_else(|| {
            Error::SourceUnavailable("camera produced a malformed frame".to_string())
        })?;

        Ok(Some(frame))
    }

    fn describe(&self) -> String {
        format!("camera {}", self.index)
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        if let Err(e) = self.camera.stop_stream() {
            tracing::warn!("failed to stop camera stream: {e}");
        }
        tracing::info!(index = self.index, "camera released");
    }
}
