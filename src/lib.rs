//! Sceneforge is the core engine behind a node-based content pipeline
//! editor with a scene-builder mode.
//!
//! The crate owns the two halves that carry real engineering logic; the
//! interactive canvas is an external collaborator that renders snapshots
//! and reports gestures back.
//!
//! # Pipeline overview
//!
//! 1. **Model**: gestures mutate the [`GraphStore`] (via the
//!    [`IdAllocator`]) and the [`SceneRegistry`], which owns all
//!    per-scene filter and image state.
//! 2. **Filter**: `FrameRgba + FilterParams -> FrameRgba`
//!    ([`filter::pipeline::apply`]), a deterministic fixed-order chain of
//!    raster transforms.
//! 3. **Composite**: the [`SequenceCompositor`] drives the filter chain
//!    over every eligible scene, strictly in scene order, stacking the
//!    results into one exportable artifact with fractional progress.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: identical inputs produce byte-identical
//!   rasters; there is no hidden time or randomness in the pipeline.
//! - **Single source of truth**: widget state mirroring the registry is a
//!   pure projection ([`scene::project::project_preview`]), never a copy.
//! - **Sequential compositing**: scene N+1 never starts before scene N is
//!   written, so output layout is independent of load latency.
#![forbid(unsafe_code)]

pub mod assets;
pub mod compose;
pub mod filter;
pub mod foundation;
pub mod generate;
pub mod graph;
pub mod scene;
pub mod workspace;

pub use assets::codec::{decode_raster, encode_png};
pub use compose::sequencer::{
    NoProgress, ProgressSink, RunState, SequenceArtifact, SequenceCompositor,
};
pub use compose::source::{DecodeSource, FrameSource, NoPacing, Pacer, SleepPacer};
pub use filter::pipeline::apply as apply_filters;
pub use foundation::core::{Affine, Canvas, FrameRgba, Point, Vec2};
pub use foundation::error::{SceneforgeError, SceneforgeResult};
pub use generate::{
    GenerationKind, GenerationOutcome, GenerationRequest, GenerationService, MockGenerationService,
};
pub use graph::canvas::{
    EdgeChange, GraphSnapshot, NodeChange, apply_edge_changes, apply_node_changes, on_connect,
};
pub use graph::id::IdAllocator;
pub use graph::model::{Edge, EdgeStyle, Node, NodeKind};
pub use graph::store::{EdgePorts, GraphStore};
pub use scene::model::{
    FilterField, FilterParams, ImageSource, Scene, SceneImageState, SceneStyle,
};
pub use scene::options::{
    EffectsOptions, ImageSettingsOptions, VoiceOverOptions, options_from_node, options_into_node,
};
pub use scene::project::{PreviewAttributes, project_preview};
pub use scene::registry::SceneRegistry;
pub use workspace::{Mode, Workspace};
