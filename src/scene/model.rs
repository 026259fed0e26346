use std::sync::Arc;

use crate::{
    foundation::core::FrameRgba,
    foundation::error::{SceneforgeError, SceneforgeResult},
};

/// Visual style applied to a produced sequence.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SceneStyle {
    ComicBook,
    #[default]
    Movie,
    Documentary,
    Anime,
    Realistic,
}

/// One produced unit: a voice track, an image sub-pipeline with a filter
/// chain, an effects node, and a terminal scene view.
///
/// `node_ids` are exactly the graph nodes created for this scene; deleting
/// the scene removes all of them (and their edges) from the graph store.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    pub id: u32,
    pub style: SceneStyle,
    pub node_ids: Vec<String>,
}

/// One merge-able field of [`FilterParams`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Brightness,
    Contrast,
    Grayscale,
    Saturation,
    Rotation,
    Blur,
    Scale,
}

/// Per-scene raster filter parameters.
///
/// Percent fields use 100 as identity; `grayscale` is a 0..=100 mix;
/// `rotation` is degrees in [0, 360); `blur` is a pixel radius.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FilterParams {
    pub brightness: f32,
    pub contrast: f32,
    pub grayscale: f32,
    pub saturation: f32,
    pub rotation: f32,
    pub blur: f32,
    pub scale: f32,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            grayscale: 0.0,
            saturation: 100.0,
            rotation: 0.0,
            blur: 0.0,
            scale: 100.0,
        }
    }
}

impl FilterParams {
    pub fn validate(&self) -> SceneforgeResult<()> {
        for (name, v) in [
            ("brightness", self.brightness),
            ("contrast", self.contrast),
            ("saturation", self.saturation),
            ("blur", self.blur),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(SceneforgeError::validation(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        if !self.grayscale.is_finite() || !(0.0..=100.0).contains(&self.grayscale) {
            return Err(SceneforgeError::validation("grayscale must be in 0..=100"));
        }
        if !self.rotation.is_finite() || !(0.0..360.0).contains(&self.rotation) {
            return Err(SceneforgeError::validation("rotation must be in 0..360"));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(SceneforgeError::validation("scale must be finite and > 0"));
        }
        Ok(())
    }

    /// Merge one field, validating the result.
    pub fn set(&mut self, field: FilterField, value: f32) -> SceneforgeResult<()> {
        let mut next = *self;
        match field {
            FilterField::Brightness => next.brightness = value,
            FilterField::Contrast => next.contrast = value,
            FilterField::Grayscale => next.grayscale = value,
            FilterField::Saturation => next.saturation = value,
            FilterField::Rotation => next.rotation = value,
            FilterField::Blur => next.blur = value,
            FilterField::Scale => next.scale = value,
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    /// All parameters at their identity values: the pipeline must return
    /// the input raster byte-for-byte.
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

/// Where a scene's source pixels come from.
///
/// Uploads may hand over an already-decoded raster or encoded bytes that
/// the compositor decodes lazily at that scene's turn.
#[derive(Clone, Debug)]
pub enum ImageSource {
    Raster(FrameRgba),
    Encoded(Arc<Vec<u8>>),
}

/// Upload/generate state for one scene.
///
/// `generated` gates the preview: it flips true only on an explicit
/// generate action and reverts whenever a new source is uploaded, so a
/// filtered preview is never shown without a confirming generate step.
#[derive(Clone, Debug, Default)]
pub struct SceneImageState {
    pub source: Option<ImageSource>,
    pub generated: bool,
}

impl SceneImageState {
    pub fn show_image(&self) -> bool {
        self.source.is_some() && self.generated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_identity() {
        let params = FilterParams::default();
        assert!(params.is_identity());
        params.validate().unwrap();
    }

    #[test]
    fn set_merges_one_field() {
        let mut params = FilterParams::default();
        params.set(FilterField::Brightness, 150.0).unwrap();
        assert_eq!(params.brightness, 150.0);
        assert_eq!(params.contrast, 100.0);
        assert!(!params.is_identity());
    }

    #[test]
    fn set_rejects_out_of_range_values() {
        let mut params = FilterParams::default();
        assert!(params.set(FilterField::Grayscale, 120.0).is_err());
        assert!(params.set(FilterField::Rotation, 360.0).is_err());
        assert!(params.set(FilterField::Scale, 0.0).is_err());
        assert!(params.set(FilterField::Brightness, -1.0).is_err());
        // A failed merge leaves the previous value intact.
        assert_eq!(params, FilterParams::default());
    }

    #[test]
    fn scene_style_serializes_snake_case() {
        let s = serde_json::to_string(&SceneStyle::ComicBook).unwrap();
        assert_eq!(s, "\"comic_book\"");
    }

    #[test]
    fn show_image_requires_source_and_generate() {
        let mut state = SceneImageState::default();
        assert!(!state.show_image());
        state.source = Some(ImageSource::Encoded(Arc::new(vec![1, 2, 3])));
        assert!(!state.show_image());
        state.generated = true;
        assert!(state.show_image());
    }
}
