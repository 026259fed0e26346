use serde_json::{Map, Value};

use crate::foundation::core::Point;

/// Node types understood by the canvas collaborator's renderer registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    TextGeneration,
    ImageGeneration,
    VideoGeneration,
    Sequence,
    Conditional,
    Output,
    VoiceOver,
    Effects,
    SceneView,
    Grayscale,
    Brightness,
    Rotation,
    Blur,
    Saturation,
    Resize,
    PromptEnhance,
    ImagePreview,
    Prompt,
    ImageSettings,
}

impl NodeKind {
    /// Default widget label, matching the stock node library.
    pub fn label(self) -> &'static str {
        match self {
            Self::TextGeneration => "Text Generator",
            Self::ImageGeneration => "Image Generator",
            Self::VideoGeneration => "Video Generator",
            Self::Sequence => "Sequence Controller",
            Self::Conditional => "Conditional Logic",
            Self::Output => "Output Node",
            Self::VoiceOver => "Voice Over",
            Self::Effects => "Effects",
            Self::SceneView => "Scene View",
            Self::Grayscale => "Grayscale Filter",
            Self::Brightness => "Brightness / Contrast",
            Self::Rotation => "Rotation",
            Self::Blur => "Blur",
            Self::Saturation => "Saturation",
            Self::Resize => "Resize",
            Self::PromptEnhance => "Prompt Enhance",
            Self::ImagePreview => "Image Preview",
            Self::Prompt => "Image Prompt",
            Self::ImageSettings => "Image Settings",
        }
    }
}

/// A typed unit in the generation graph.
///
/// Free-form widget state lives in `attributes` (label overrides, prompt
/// text, per-node options). Nodes attached to a scene carry a
/// `sceneNumber` attribute referencing the scene registry; they never hold
/// a copy of the registry's filter state.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub position: Point,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind, position: Point) -> Self {
        let mut node = Self {
            id: id.into(),
            kind,
            position,
            attributes: Map::new(),
        };
        node.attributes
            .insert("label".into(), Value::String(kind.label().to_string()));
        node
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn with_scene_number(self, scene: u32) -> Self {
        self.with_attr("sceneNumber", Value::from(scene))
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn label(&self) -> &str {
        self.attr("label")
            .and_then(Value::as_str)
            .unwrap_or_else(|| self.kind.label())
    }

    pub fn scene_number(&self) -> Option<u32> {
        self.attr("sceneNumber")
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
    }
}

/// Visual styling metadata carried on every edge. Opaque to the core; the
/// canvas collaborator interprets it.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    pub kind: String,
    pub animated: bool,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            kind: "smoothstep".to_string(),
            animated: true,
        }
    }
}

/// A directed connection between two node ports.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_port: Option<String>,
    #[serde(default)]
    pub style: EdgeStyle,
}

impl Edge {
    /// Edge with the synthesized id `"e-{source}-{target}"`.
    pub fn between(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("e-{source}-{target}"),
            source,
            target,
            source_port: None,
            target_port: None,
            style: EdgeStyle::default(),
        }
    }

    pub fn from_port(mut self, port: impl Into<String>) -> Self {
        self.source_port = Some(port.into());
        self
    }

    pub fn to_port(mut self, port: impl Into<String>) -> Self {
        self.target_port = Some(port.into());
        self
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_kind_serializes_camel_case() {
        let s = serde_json::to_string(&NodeKind::ImagePreview).unwrap();
        assert_eq!(s, "\"imagePreview\"");
        let s = serde_json::to_string(&NodeKind::SceneView).unwrap();
        assert_eq!(s, "\"sceneView\"");
    }

    #[test]
    fn scene_number_roundtrips_through_attributes() {
        let node =
            Node::new("voice-3", NodeKind::VoiceOver, Point::new(100.0, 150.0))
                .with_scene_number(2);
        assert_eq!(node.scene_number(), Some(2));
        assert_eq!(node.label(), "Voice Over");
    }

    #[test]
    fn edge_between_synthesizes_id() {
        let e = Edge::between("7", "8").to_port("content");
        assert_eq!(e.id, "e-7-8");
        assert!(e.touches("7"));
        assert!(e.touches("8"));
        assert!(!e.touches("9"));
        assert_eq!(e.target_port.as_deref(), Some("content"));
    }
}
