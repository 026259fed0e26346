pub type SceneforgeResult<T> = Result<T, SceneforgeError>;

#[derive(thiserror::Error, Debug)]
pub enum SceneforgeError {
    /// A node or edge id is already present in the graph store.
    #[error("duplicate id: {0}")]
    DuplicateId(String),

    /// An edge endpoint references a node that is not in the store.
    #[error("unknown endpoint: {0}")]
    UnknownEndpoint(String),

    /// A splice targeted an edge that no longer exists.
    #[error("unknown edge: {0}")]
    UnknownEdge(String),

    /// A sequence run was requested with zero scenes registered.
    #[error("no scenes to composite")]
    NoScenes,

    /// No scene has both an uploaded image and a completed generate step.
    #[error("no eligible scenes: upload an image and generate at least one scene")]
    NoEligibleScenes,

    /// A scene's source raster failed to load or decode.
    #[error("image load error: {0}")]
    ImageLoad(String),

    /// The host raster surface needed for compositing is missing.
    #[error("canvas unavailable: {0}")]
    CanvasUnavailable(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SceneforgeError {
    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self::DuplicateId(id.into())
    }

    pub fn unknown_endpoint(id: impl Into<String>) -> Self {
        Self::UnknownEndpoint(id.into())
    }

    pub fn unknown_edge(id: impl Into<String>) -> Self {
        Self::UnknownEdge(id.into())
    }

    pub fn image_load(msg: impl Into<String>) -> Self {
        Self::ImageLoad(msg.into())
    }

    pub fn canvas_unavailable(msg: impl Into<String>) -> Self {
        Self::CanvasUnavailable(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Graph-store errors are invariant violations: a correct canvas UI never
    /// produces them, so callers surface them as bugs rather than user input
    /// problems. Compositor errors are the user-facing, re-runnable class.
    pub fn is_graph_invariant(&self) -> bool {
        matches!(
            self,
            Self::DuplicateId(_) | Self::UnknownEndpoint(_) | Self::UnknownEdge(_)
        )
    }
}
