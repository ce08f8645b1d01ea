/// Barcode scanning module
///
/// The decode algorithm itself is rxing's; this module only adapts frames
/// into the decoder (decoder.rs) and draws the results back onto them
/// (overlay.rs).
pub mod decoder;
pub mod overlay;

pub use decoder::{decode_frame, Decoded};
