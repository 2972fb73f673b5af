use serde::Serialize;

/// Counters collected while generating offset candidates.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStage {
    /// Orientation-compatible offsets found for each scanned model pose
    /// (intersection strategy only).
    pub candidates_per_model_pose: Vec<usize>,
    /// Running intersection size after each scanned model pose
    /// (intersection strategy only).
    pub surviving_after_model_pose: Vec<usize>,
    /// Model poses whose candidates were computed before the generator
    /// stopped.
    pub model_poses_scanned: usize,
    /// Candidates handed to validation.
    pub candidates: usize,
    /// Stopped early because the running intersection became empty.
    pub early_exit: bool,
}
