use serde_json::Value;

use crate::{
    foundation::error::{SceneforgeError, SceneforgeResult},
    graph::model::Node,
};

/// Voice-over track options.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VoiceOverOptions {
    pub voice: String,
    pub style: String,
    pub duration: String,
}

impl Default for VoiceOverOptions {
    fn default() -> Self {
        Self {
            voice: "professional".to_string(),
            style: "narration".to_string(),
            duration: "30s".to_string(),
        }
    }
}

/// Image generation settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageSettingsOptions {
    pub model: String,
    pub resolution: String,
}

impl Default for ImageSettingsOptions {
    fn default() -> Self {
        Self {
            model: "DALL-E 3".to_string(),
            resolution: "1024x1024".to_string(),
        }
    }
}

/// Scene-level effects options.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EffectsOptions {
    pub transition: String,
    pub color_grade: String,
}

impl Default for EffectsOptions {
    fn default() -> Self {
        Self {
            transition: "fade".to_string(),
            color_grade: "none".to_string(),
        }
    }
}

/// Read a typed options struct out of a node's free-form attributes,
/// falling back to defaults for absent fields.
pub fn options_from_node<T>(node: &Node, key: &str) -> SceneforgeResult<T>
where
    T: Default + serde::de::DeserializeOwned,
{
    match node.attr(key) {
        None => Ok(T::default()),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| SceneforgeError::serde(format!("node '{}' {key}: {e}", node.id))),
    }
}

/// Write a typed options struct into a node's attributes.
pub fn options_into_node<T>(node: &mut Node, key: &str, options: &T) -> SceneforgeResult<()>
where
    T: serde::Serialize,
{
    let value: Value = serde_json::to_value(options)
        .map_err(|e| SceneforgeError::serde(format!("node '{}' {key}: {e}", node.id)))?;
    node.attributes.insert(key.to_string(), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{foundation::core::Point, graph::model::NodeKind};

    #[test]
    fn options_roundtrip_through_attributes() {
        let mut node = Node::new("voice-1", NodeKind::VoiceOver, Point::new(0.0, 0.0));
        let opts = VoiceOverOptions {
            voice: "dramatic".to_string(),
            ..VoiceOverOptions::default()
        };
        options_into_node(&mut node, "voiceOver", &opts).unwrap();
        let back: VoiceOverOptions = options_from_node(&node, "voiceOver").unwrap();
        assert_eq!(back, opts);
    }

    #[test]
    fn absent_options_fall_back_to_defaults() {
        let node = Node::new("fx-1", NodeKind::Effects, Point::new(0.0, 0.0));
        let opts: EffectsOptions = options_from_node(&node, "effects").unwrap();
        assert_eq!(opts.transition, "fade");
        let settings: ImageSettingsOptions = options_from_node(&node, "imageSettings").unwrap();
        assert_eq!(settings.resolution, "1024x1024");
    }

    #[test]
    fn malformed_options_surface_a_serde_error() {
        let node = Node::new("voice-1", NodeKind::VoiceOver, Point::new(0.0, 0.0))
            .with_attr("voiceOver", Value::from(42));
        let err = options_from_node::<VoiceOverOptions>(&node, "voiceOver").unwrap_err();
        assert!(matches!(err, SceneforgeError::Serde(_)));
    }
}
