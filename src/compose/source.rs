use std::{thread, time::Duration};

use crate::{
    assets::codec,
    foundation::core::FrameRgba,
    foundation::error::SceneforgeResult,
    scene::model::ImageSource,
};

/// Resolves a scene's source into pixels at that scene's turn.
///
/// This is the compositor's decode suspension point: the call may block
/// until the raster is available. Implementations other than
/// [`DecodeSource`] let hosts plug in their own loading (or tests inject
/// failures).
pub trait FrameSource {
    fn resolve(&mut self, scene: u32, source: &ImageSource) -> SceneforgeResult<FrameRgba>;
}

/// Default source: decoded rasters pass through, encoded bytes are
/// decoded on the spot.
#[derive(Clone, Copy, Debug, Default)]
pub struct DecodeSource;

impl FrameSource for DecodeSource {
    fn resolve(&mut self, _scene: u32, source: &ImageSource) -> SceneforgeResult<FrameRgba> {
        match source {
            ImageSource::Raster(frame) => Ok(frame.clone()),
            ImageSource::Encoded(bytes) => codec::decode_raster(bytes),
        }
    }
}

/// Hook run between consecutive scenes: the artificial pacing
/// suspension point of a sequence run.
pub trait Pacer {
    fn between_scenes(&mut self);
}

/// No pacing; the right choice for tests and batch runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPacing;

impl Pacer for NoPacing {
    fn between_scenes(&mut self) {}
}

/// Sleeps a fixed delay between scenes so interactive progress is
/// observable.
#[derive(Clone, Copy, Debug)]
pub struct SleepPacer {
    pub delay: Duration,
}

impl Pacer for SleepPacer {
    fn between_scenes(&mut self) {
        thread::sleep(self.delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn decode_source_passes_rasters_through() {
        let frame = FrameRgba::filled(2, 2, [1, 2, 3, 4]).unwrap();
        let resolved = DecodeSource
            .resolve(1, &ImageSource::Raster(frame.clone()))
            .unwrap();
        assert_eq!(resolved, frame);
    }

    #[test]
    fn decode_source_rejects_garbage_bytes() {
        let err = DecodeSource
            .resolve(1, &ImageSource::Encoded(Arc::new(vec![0, 1, 2])))
            .unwrap_err();
        assert!(err.to_string().contains("image load error"));
    }
}
