use std::io::Cursor;

use crate::foundation::{
    core::FrameRgba,
    error::{SceneforgeError, SceneforgeResult},
};

/// Decode encoded image bytes (any container the `image` crate knows)
/// into a straight RGBA8 raster. Upload interface entry point.
pub fn decode_raster(bytes: &[u8]) -> SceneforgeResult<FrameRgba> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| SceneforgeError::image_load(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    FrameRgba::new(width, height, rgba.into_raw())
}

/// Encode a raster as PNG bytes for the export interface.
pub fn encode_png(frame: &FrameRgba) -> SceneforgeResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
        .ok_or_else(|| SceneforgeError::validation("raster buffer does not match dimensions"))?;
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .map_err(|e| SceneforgeError::validation(format!("png encode: {e}")))?;
    Ok(bytes)
}
