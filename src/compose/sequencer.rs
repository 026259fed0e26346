use crate::{
    assets::codec,
    compose::source::{FrameSource, Pacer},
    filter::{geometry, pipeline},
    foundation::core::{Canvas, FrameRgba, byte_len},
    foundation::error::{SceneforgeError, SceneforgeResult},
    scene::registry::SceneRegistry,
};

/// Lifecycle of one sequence run.
#[derive(Clone, Debug, PartialEq)]
pub enum RunState {
    Idle,
    Running { completed: usize, total: usize },
    Completed,
    Failed { reason: String },
}

/// The composited output of a successful run, ready for export.
#[derive(Clone, Debug)]
pub struct SequenceArtifact {
    pub frame: FrameRgba,
    pub scene_count: usize,
}

impl SequenceArtifact {
    pub fn to_png(&self) -> SceneforgeResult<Vec<u8>> {
        codec::encode_png(&self.frame)
    }

    pub fn content_type(&self) -> &'static str {
        "image/png"
    }

    pub fn suggested_filename(&self) -> String {
        format!("sequence-{}scenes.png", self.scene_count)
    }
}

/// Receives fractional progress after each composited scene.
pub trait ProgressSink {
    fn on_progress(&mut self, fraction: f64);
}

/// Discards progress updates.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&mut self, _fraction: f64) {}
}

impl ProgressSink for Vec<f64> {
    fn on_progress(&mut self, fraction: f64) {
        self.push(fraction);
    }
}

/// Drives the filter pipeline over every eligible scene, in scene order,
/// strictly sequentially, stacking the results into one output raster.
///
/// State machine per invocation: `Idle -> Running -> Completed | Failed`.
/// A new run is only accepted from Idle, Completed, or Failed. Progress
/// is monotonically non-decreasing within a run and reaches exactly 1.0
/// only on success. There is no cancellation: a stuck or failed run is
/// recovered by re-invoking.
#[derive(Debug)]
pub struct SequenceCompositor {
    frame: Canvas,
    state: RunState,
    progress: f64,
    artifact: Option<SequenceArtifact>,
}

impl SequenceCompositor {
    pub fn new(frame: Canvas) -> Self {
        Self {
            frame,
            state: RunState::Idle,
            progress: 0.0,
            artifact: None,
        }
    }

    pub fn frame(&self) -> Canvas {
        self.frame
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Last reported progress. Survives a failure (it stays at the last
    /// successful scene) and resets when the next run starts.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// The composited artifact of the most recent successful run.
    pub fn artifact(&self) -> Option<&SequenceArtifact> {
        self.artifact.as_ref()
    }

    #[tracing::instrument(skip_all, fields(w = self.frame.width, h = self.frame.height))]
    pub fn run(
        &mut self,
        registry: &SceneRegistry,
        source: &mut dyn FrameSource,
        sink: &mut dyn ProgressSink,
        pacer: &mut dyn Pacer,
    ) -> SceneforgeResult<&SequenceArtifact> {
        if matches!(self.state, RunState::Running { .. }) {
            return Err(SceneforgeError::validation(
                "a sequence run is already in progress",
            ));
        }
        self.progress = 0.0;
        self.artifact = None;

        match self.run_inner(registry, source, sink, pacer) {
            Ok(artifact) => {
                self.state = RunState::Completed;
                tracing::debug!(scenes = artifact.scene_count, "sequence completed");
                Ok(self.artifact.insert(artifact))
            }
            Err(e) => {
                // The partial output raster is dropped here, never surfaced.
                self.state = RunState::Failed {
                    reason: e.to_string(),
                };
                tracing::warn!(error = %e, "sequence failed");
                Err(e)
            }
        }
    }

    fn run_inner(
        &mut self,
        registry: &SceneRegistry,
        source: &mut dyn FrameSource,
        sink: &mut dyn ProgressSink,
        pacer: &mut dyn Pacer,
    ) -> SceneforgeResult<SequenceArtifact> {
        if registry.is_empty() {
            return Err(SceneforgeError::NoScenes);
        }
        let eligible = registry.eligible_scenes();
        if eligible.is_empty() {
            return Err(SceneforgeError::NoEligibleScenes);
        }
        let total = eligible.len();
        self.state = RunState::Running {
            completed: 0,
            total,
        };

        let out_h = u32::try_from(u64::from(self.frame.height) * total as u64)
            .map_err(|_| SceneforgeError::canvas_unavailable("output raster is too tall"))?;
        byte_len(self.frame.width, out_h)
            .map_err(|_| SceneforgeError::canvas_unavailable("output raster is too large"))?;
        let mut out = FrameRgba::filled(self.frame.width, out_h, [0, 0, 0, 255])?;

        for (i, scene_id) in eligible.iter().copied().enumerate() {
            if i > 0 {
                pacer.between_scenes();
            }
            let image = registry.source(scene_id).ok_or_else(|| {
                SceneforgeError::image_load(format!("scene {scene_id} lost its source image"))
            })?;
            let raster = source.resolve(scene_id, image)?;
            // Filter parameters are read lazily, at this scene's turn: an
            // edit during the run affects scenes not yet composited, never
            // a slot already written.
            let params = registry.filter_params(scene_id);
            let filtered = pipeline::apply(&raster, &params)?;
            blit_into_slot(&mut out, self.frame, i, &filtered)?;

            let completed = i + 1;
            self.state = RunState::Running { completed, total };
            self.progress = completed as f64 / total as f64;
            sink.on_progress(self.progress);
            tracing::debug!(scene = scene_id, progress = self.progress, "scene composited");
        }

        Ok(SequenceArtifact {
            frame: out,
            scene_count: total,
        })
    }
}

/// Letterbox-fit a filtered raster into vertical slot `slot` of the
/// output: scaled to fit the frame preserving aspect, centered, on the
/// slot's background.
fn blit_into_slot(
    dst: &mut FrameRgba,
    frame: Canvas,
    slot: usize,
    src: &FrameRgba,
) -> SceneforgeResult<()> {
    let fit = f64::min(
        f64::from(frame.width) / f64::from(src.width),
        f64::from(frame.height) / f64::from(src.height),
    );
    let tw = ((f64::from(src.width) * fit).round() as u32).clamp(1, frame.width);
    let th = ((f64::from(src.height) * fit).round() as u32).clamp(1, frame.height);
    let scaled = geometry::resize_bilinear(src, tw, th)?;

    let ox = (frame.width - tw) / 2;
    let oy = slot as u32 * frame.height + (frame.height - th) / 2;
    for y in 0..th {
        let row = scaled.row(y);
        let start = (((oy + y) * dst.width + ox) as usize) * 4;
        dst.data[start..start + row.len()].copy_from_slice(row);
    }
    Ok(())
}
