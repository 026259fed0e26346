use crate::foundation::error::{SceneforgeError, SceneforgeResult};

pub use kurbo::{Affine, Point, Vec2};

/// Fixed output frame size used by the sequence compositor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> SceneforgeResult<Self> {
        if width == 0 || height == 0 {
            return Err(SceneforgeError::validation(
                "canvas width/height must be > 0",
            ));
        }
        Ok(Self { width, height })
    }
}

/// Straight (non-premultiplied) RGBA8 raster, row-major, tightly packed.
///
/// The filter pipeline operates on straight channels and leaves alpha
/// untouched in the tonal passes, so there is no premultiply round-trip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRgba {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl FrameRgba {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> SceneforgeResult<Self> {
        let expected = byte_len(width, height)?;
        if width == 0 || height == 0 {
            return Err(SceneforgeError::validation(
                "raster width/height must be > 0",
            ));
        }
        if data.len() != expected {
            return Err(SceneforgeError::validation(format!(
                "raster data length {} does not match {}x{} rgba8",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A raster filled with a single rgba value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> SceneforgeResult<Self> {
        let expected = byte_len(width, height)?;
        let mut data = Vec::with_capacity(expected);
        for _ in 0..expected / 4 {
            data.extend_from_slice(&rgba);
        }
        Self::new(width, height, data)
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        debug_assert!(x < self.width && y < self.height);
        let i = ((y * self.width + x) as usize) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        debug_assert!(x < self.width && y < self.height);
        let i = ((y * self.width + x) as usize) * 4;
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    pub fn row(&self, y: u32) -> &[u8] {
        let stride = (self.width as usize) * 4;
        let start = (y as usize) * stride;
        &self.data[start..start + stride]
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let stride = (self.width as usize) * 4;
        let start = (y as usize) * stride;
        &mut self.data[start..start + stride]
    }
}

/// Checked `width * height * 4`, guarding against overflow on hostile sizes.
pub fn byte_len(width: u32, height: u32) -> SceneforgeResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| SceneforgeError::validation("raster byte size overflow"))
}
