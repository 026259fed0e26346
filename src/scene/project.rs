use crate::{
    graph::model::{Node, NodeKind},
    scene::model::FilterParams,
    scene::registry::SceneRegistry,
};

/// Display state for a preview widget, derived from the registry.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewAttributes {
    pub scene_number: u32,
    pub uploaded: bool,
    pub show_image: bool,
    #[serde(flatten)]
    pub filters: FilterParams,
}

/// Project a preview node's widget attributes from the registry.
///
/// Widgets mirror filter state but never own it; instead of reactive
/// watchers, the orchestrating layer re-invokes this pure function after
/// any registry change. Returns `None` for non-preview nodes and for
/// nodes with no scene reference.
pub fn project_preview(node: &Node, registry: &SceneRegistry) -> Option<PreviewAttributes> {
    if node.kind != NodeKind::ImagePreview {
        return None;
    }
    let scene_number = node.scene_number()?;
    registry.scene(scene_number)?;
    Some(PreviewAttributes {
        scene_number,
        uploaded: registry.source(scene_number).is_some(),
        show_image: registry.show_image(scene_number),
        filters: registry.filter_params(scene_number),
    })
}
