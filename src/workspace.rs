use crate::{graph::id::IdAllocator, graph::store::GraphStore, scene::registry::SceneRegistry};

/// Which editing surface the workspace currently presents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    #[default]
    Workflow,
    SceneBuilder,
}

/// Bundles the graph store, scene registry, and id allocator so the
/// lifecycle operations that must touch all three stay atomic.
#[derive(Clone, Debug, Default)]
pub struct Workspace {
    pub graph: GraphStore,
    pub scenes: SceneRegistry,
    pub ids: IdAllocator,
    mode: Mode,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Clear everything: nodes, edges, scenes, derived scene state, and
    /// the id counter. The only operation allowed to reset the allocator.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.scenes.clear();
        self.ids.reset();
    }

    /// Entering the scene builder from the workflow surface starts from a
    /// clean graph; re-entering keeps existing scenes.
    pub fn enter_scene_builder(&mut self) {
        if self.mode == Mode::Workflow {
            self.graph.clear();
            self.ids.reset();
        }
        self.mode = Mode::SceneBuilder;
    }

    /// Leaving the scene builder abandons its scenes entirely.
    pub fn back_to_workflow(&mut self) {
        self.clear();
        self.mode = Mode::Workflow;
    }
}
