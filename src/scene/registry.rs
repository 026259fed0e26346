use std::collections::BTreeMap;

use crate::{
    foundation::core::Point,
    foundation::error::{SceneforgeError, SceneforgeResult},
    graph::id::IdAllocator,
    graph::model::{Edge, Node, NodeKind},
    graph::store::GraphStore,
    scene::model::{FilterField, FilterParams, ImageSource, Scene, SceneImageState, SceneStyle},
};

/// Vertical offset between stacked scenes on the canvas. Derived from the
/// scene count so scenes never overlap.
const SCENE_ROW_HEIGHT: f64 = 600.0;
const SCENE_BASE_Y: f64 = 150.0;

/// Horizontal spacing along a scene's image pipeline.
const PIPELINE_STEP_X: f64 = 300.0;

/// Groups nodes into scenes and owns all per-scene derived state.
///
/// The registry is the single source of truth for filter parameters and
/// image state; scene nodes reference it by `sceneNumber` and are
/// re-projected from it on demand (see [`crate::scene::project`]).
#[derive(Clone, Debug, Default)]
pub struct SceneRegistry {
    scenes: Vec<Scene>,
    filters: BTreeMap<u32, FilterParams>,
    images: BTreeMap<u32, SceneImageState>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn scene(&self, id: u32) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Create a scene: allocate its fixed node topology in the graph
    /// store, wire the pipeline edges, and register the new scene.
    ///
    /// The scene number is `count + 1` while creation is append-only; after
    /// mid-list deletions the next free number is used instead so a live
    /// scene's number is never reissued.
    #[tracing::instrument(skip(self, store, ids))]
    pub fn create_scene(
        &mut self,
        style: SceneStyle,
        store: &mut GraphStore,
        ids: &mut IdAllocator,
    ) -> SceneforgeResult<&Scene> {
        let scene_number = self
            .scenes
            .iter()
            .map(|s| s.id)
            .max()
            .unwrap_or(0)
            .max(self.scenes.len() as u32)
            + 1;
        let base_y = SCENE_BASE_Y + SCENE_ROW_HEIGHT * self.scenes.len() as f64;

        let voice_id = ids.next_prefixed("voice");
        let prompt_id = ids.next_prefixed("prompt");
        let settings_id = ids.next_prefixed("settings");
        let grayscale_id = ids.next_prefixed("grayscale");
        let brightness_id = ids.next_prefixed("brightness");
        let rotation_id = ids.next_prefixed("rotation");
        let blur_id = ids.next_prefixed("blur");
        let saturation_id = ids.next_prefixed("saturation");
        let resize_id = ids.next_prefixed("resize");
        let preview_id = ids.next_prefixed("preview");
        let effects_id = ids.next_prefixed("effects");
        let scene_view_id = ids.next_prefixed("scene-view");

        // prompt -> settings -> filter chain -> preview runs left to right;
        // voice and effects fan in to the terminal scene view.
        let pipeline: [(&str, NodeKind); 9] = [
            (&prompt_id, NodeKind::Prompt),
            (&settings_id, NodeKind::ImageSettings),
            (&grayscale_id, NodeKind::Grayscale),
            (&brightness_id, NodeKind::Brightness),
            (&rotation_id, NodeKind::Rotation),
            (&blur_id, NodeKind::Blur),
            (&saturation_id, NodeKind::Saturation),
            (&resize_id, NodeKind::Resize),
            (&preview_id, NodeKind::ImagePreview),
        ];

        let mut nodes = Vec::with_capacity(12);
        nodes.push(
            Node::new(voice_id.clone(), NodeKind::VoiceOver, Point::new(100.0, base_y))
                .with_scene_number(scene_number),
        );
        for (i, (id, kind)) in pipeline.iter().enumerate() {
            let x = 100.0 + PIPELINE_STEP_X * i as f64;
            nodes.push(
                Node::new((*id).to_string(), *kind, Point::new(x, base_y + 150.0))
                    .with_scene_number(scene_number),
            );
        }
        nodes.push(
            Node::new(
                effects_id.clone(),
                NodeKind::Effects,
                Point::new(400.0, base_y + 300.0),
            )
            .with_scene_number(scene_number),
        );
        nodes.push(
            Node::new(
                scene_view_id.clone(),
                NodeKind::SceneView,
                Point::new(100.0 + PIPELINE_STEP_X * 9.0, base_y + 150.0),
            )
            .with_scene_number(scene_number)
            .with_attr(
                "label",
                serde_json::Value::String(format!("Scene {scene_number} View")),
            ),
        );
        let node_ids: Vec<String> = nodes.iter().map(|n| n.id.clone()).collect();

        let mut edges = Vec::with_capacity(11);
        for pair in pipeline.windows(2) {
            edges.push(Edge::between(pair[0].0, pair[1].0));
        }
        edges.push(
            Edge::between(preview_id.clone(), scene_view_id.clone())
                .from_port("b")
                .to_port("content"),
        );
        edges.push(Edge::between(voice_id.clone(), scene_view_id.clone()));
        edges.push(Edge::between(effects_id.clone(), scene_view_id.clone()).to_port("effects"));

        store.add_nodes(nodes)?;
        store.add_edges(edges)?;

        let index = self.scenes.len();
        self.scenes.push(Scene {
            id: scene_number,
            style,
            node_ids,
        });
        tracing::debug!(scene = scene_number, "scene created");
        Ok(&self.scenes[index])
    }

    /// Cascade-delete a scene: every owned node leaves the graph store
    /// (taking its edges with it), and all derived state is invalidated.
    /// Absent ids are a no-op.
    pub fn delete_scene(&mut self, id: u32, store: &mut GraphStore) {
        let Some(index) = self.scenes.iter().position(|s| s.id == id) else {
            return;
        };
        let scene = self.scenes.remove(index);
        for node_id in &scene.node_ids {
            store.delete_node(node_id);
        }
        self.filters.remove(&id);
        self.images.remove(&id);
        tracing::debug!(scene = id, "scene deleted");
    }

    /// Current filter parameters for a scene; defaults when never edited.
    pub fn filter_params(&self, scene: u32) -> FilterParams {
        self.filters.get(&scene).copied().unwrap_or_default()
    }

    /// Merge one filter field, materializing defaults for the rest. Pure
    /// state update: recomputing imagery is an explicit, separate step.
    pub fn set_filter(&mut self, scene: u32, field: FilterField, value: f32) -> SceneforgeResult<()> {
        self.require_scene(scene)?;
        let params = self.filters.entry(scene).or_default();
        params.set(field, value)
    }

    /// Attach a source image to a scene. Always clears the generate flag:
    /// new pixels need a fresh confirming generate step.
    pub fn upload_image(&mut self, scene: u32, source: ImageSource) -> SceneforgeResult<()> {
        self.require_scene(scene)?;
        let state = self.images.entry(scene).or_default();
        state.source = Some(source);
        state.generated = false;
        Ok(())
    }

    /// Explicit generate action. A scene without a source stays
    /// ungenerated; the preview gate needs both.
    pub fn mark_generated(&mut self, scene: u32) -> SceneforgeResult<()> {
        self.require_scene(scene)?;
        let state = self.images.entry(scene).or_default();
        state.generated = state.source.is_some();
        Ok(())
    }

    pub fn image_state(&self, scene: u32) -> Option<&SceneImageState> {
        self.images.get(&scene)
    }

    pub fn source(&self, scene: u32) -> Option<&ImageSource> {
        self.images.get(&scene).and_then(|s| s.source.as_ref())
    }

    /// The preview gate: an image is present and generate was confirmed.
    pub fn show_image(&self, scene: u32) -> bool {
        self.images.get(&scene).is_some_and(SceneImageState::show_image)
    }

    /// Scene ids eligible for sequence compositing, in registry order
    /// (which equals scene id order).
    pub fn eligible_scenes(&self) -> Vec<u32> {
        self.scenes
            .iter()
            .map(|s| s.id)
            .filter(|id| self.show_image(*id))
            .collect()
    }

    pub fn clear(&mut self) {
        self.scenes.clear();
        self.filters.clear();
        self.images.clear();
    }

    fn require_scene(&self, scene: u32) -> SceneforgeResult<()> {
        if self.scene(scene).is_none() {
            return Err(SceneforgeError::validation(format!(
                "unknown scene {scene}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::FrameRgba;

    fn workspace() -> (SceneRegistry, GraphStore, IdAllocator) {
        (SceneRegistry::new(), GraphStore::new(), IdAllocator::new())
    }

    fn raster() -> ImageSource {
        ImageSource::Raster(FrameRgba::filled(2, 2, [9, 9, 9, 255]).unwrap())
    }

    #[test]
    fn create_scene_allocates_the_fixed_topology() {
        let (mut reg, mut store, mut ids) = workspace();
        let scene = reg
            .create_scene(SceneStyle::Movie, &mut store, &mut ids)
            .unwrap();
        assert_eq!(scene.id, 1);
        assert_eq!(scene.node_ids.len(), 12);
        assert_eq!(store.nodes().len(), 12);
        assert_eq!(store.edges().len(), 11);
        assert!(store.edges_are_consistent());

        // Every scene node points back at the registry entry.
        for node in store.nodes() {
            assert_eq!(node.scene_number(), Some(1));
        }
        assert!(store.contains_edge("e-prompt-2-settings-3"));
        assert!(store.contains_edge("e-voice-1-scene-view-12"));
    }

    #[test]
    fn scenes_stack_without_overlapping() {
        let (mut reg, mut store, mut ids) = workspace();
        reg.create_scene(SceneStyle::Movie, &mut store, &mut ids)
            .unwrap();
        reg.create_scene(SceneStyle::Anime, &mut store, &mut ids)
            .unwrap();

        let first_voice = store.node("voice-1").unwrap();
        let second_voice = store.node("voice-13").unwrap();
        assert_eq!(first_voice.position.y, 150.0);
        assert_eq!(second_voice.position.y, 750.0);
    }

    #[test]
    fn delete_scene_cascades_nodes_edges_and_state() {
        let (mut reg, mut store, mut ids) = workspace();
        reg.create_scene(SceneStyle::Movie, &mut store, &mut ids)
            .unwrap();
        reg.create_scene(SceneStyle::Movie, &mut store, &mut ids)
            .unwrap();
        reg.set_filter(1, FilterField::Brightness, 150.0).unwrap();
        reg.upload_image(1, raster()).unwrap();
        reg.mark_generated(1).unwrap();

        reg.delete_scene(1, &mut store);

        assert!(reg.scene(1).is_none());
        assert_eq!(store.nodes().len(), 12);
        assert!(store.edges_are_consistent());
        assert_eq!(reg.filter_params(1), FilterParams::default());
        assert!(reg.image_state(1).is_none());
        assert!(!reg.show_image(1));

        // Deleting again is a no-op.
        reg.delete_scene(1, &mut store);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn deleted_scene_numbers_are_not_reissued_to_live_scenes() {
        let (mut reg, mut store, mut ids) = workspace();
        reg.create_scene(SceneStyle::Movie, &mut store, &mut ids)
            .unwrap();
        reg.create_scene(SceneStyle::Movie, &mut store, &mut ids)
            .unwrap();
        reg.delete_scene(1, &mut store);

        let scene = reg
            .create_scene(SceneStyle::Movie, &mut store, &mut ids)
            .unwrap();
        assert_eq!(scene.id, 3);
        assert_eq!(reg.filter_params(3), FilterParams::default());
    }

    #[test]
    fn upload_clears_the_generate_flag() {
        let (mut reg, mut store, mut ids) = workspace();
        reg.create_scene(SceneStyle::Movie, &mut store, &mut ids)
            .unwrap();

        reg.upload_image(1, raster()).unwrap();
        assert!(!reg.show_image(1));
        reg.mark_generated(1).unwrap();
        assert!(reg.show_image(1));

        // A fresh upload demands a fresh generate.
        reg.upload_image(1, raster()).unwrap();
        assert!(!reg.show_image(1));
    }

    #[test]
    fn mark_generated_without_source_stays_ungenerated() {
        let (mut reg, mut store, mut ids) = workspace();
        reg.create_scene(SceneStyle::Movie, &mut store, &mut ids)
            .unwrap();
        reg.mark_generated(1).unwrap();
        assert!(!reg.show_image(1));
    }

    #[test]
    fn eligible_scenes_follow_registry_order() {
        let (mut reg, mut store, mut ids) = workspace();
        for _ in 0..3 {
            reg.create_scene(SceneStyle::Movie, &mut store, &mut ids)
                .unwrap();
        }
        for id in [3, 1] {
            reg.upload_image(id, raster()).unwrap();
            reg.mark_generated(id).unwrap();
        }
        assert_eq!(reg.eligible_scenes(), vec![1, 3]);
    }

    #[test]
    fn set_filter_requires_a_live_scene() {
        let (mut reg, _, _) = workspace();
        assert!(reg.set_filter(1, FilterField::Blur, 2.0).is_err());
    }
}
