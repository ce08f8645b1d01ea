use crate::error::Error;
use crate::source::Frame;

/// One decoded barcode: its text plus the bounding polygon the decoder
/// located it at. Produced fresh per frame, never persisted across frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    pub polygon: Vec<(i32, i32)>,
}

/// Run the barcode decoder over a frame.
///
/// The frame is reduced to its luma plane and handed to rxing's
/// multi-format, multi-barcode reader. Results come back in the decoder's
/// own order. "Nothing found" is a normal outcome and yields an empty
/// vector; only a genuine decoder failure becomes `Error::Decode`.
pub fn decode_frame(frame: &Frame) -> Result<Vec<Decoded>, Error> {
    let luma = image::imageops::grayscale(frame);
    let (width, height) = luma.dimensions();

    match rxing::helpers::detect_multiple_in_luma(luma.into_raw(), width, height) {
        Ok(results) => Ok(results.iter().map(to_decoded).collect()),
        Err(rxing::Exceptions::NotFoundException(_)) => Ok(Vec::new()),
        Err(e) => Err(Error::Decode(e.to_string())),
    }
}

fn to_decoded(result: &rxing::RXingResult) -> Decoded {
    let polygon = result
        .getRXingResultPoints()
        .iter()
        .map(|p| (p.x.round() as i32, p.y.round() as i32))
        .collect();

    Decoded {
        text: result.getText().to_string(),
        polygon,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_frame_decodes_to_nothing() {
        // Uniform white: no finder patterns, no bars, no results
        let frame = Frame::from_pixel(64, 64, image::Rgb([255, 255, 255]));
        let results = decode_frame(&frame).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_noise_frame_decodes_to_nothing() {
        // Deterministic pseudo-noise; valid symbologies have checksums so
        // this cannot produce a spurious read
        let mut frame = Frame::new(64, 64);
        let mut seed: u32 = 0x1234_5678;
        for pixel in frame.pixels_mut() {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let v = (seed >> 24) as u8;
            *pixel = image::Rgb([v, v, v]);
        }

        let results = decode_frame(&frame).unwrap();
        assert!(results.is_empty());
    }
}
