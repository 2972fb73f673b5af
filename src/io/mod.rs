//! Pose record IO and JSON file helpers.
//!
//! - `decode_pose_records` / `load_pose_list`: JSON array of `m00..m33`
//!   records into a [`PoseList`]. The array may also be wrapped as
//!   `{"array": [...]}`.
//! - `encode_offset_records` / `save_offsets`: validated offsets back into
//!   the same record schema.
//! - `write_json_file`: pretty-print a serializable value to disk.
use crate::types::{PoseList, RigidTransform, ValidatedOffset, RECORD_LEN};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One 4x4 matrix with named row-major components.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixRecord {
    pub m00: f32,
    pub m01: f32,
    pub m02: f32,
    pub m03: f32,
    pub m10: f32,
    pub m11: f32,
    pub m12: f32,
    pub m13: f32,
    pub m20: f32,
    pub m21: f32,
    pub m22: f32,
    pub m23: f32,
    pub m30: f32,
    pub m31: f32,
    pub m32: f32,
    pub m33: f32,
}

impl MatrixRecord {
    pub fn to_row_major(&self) -> [f32; RECORD_LEN] {
        [
            self.m00, self.m01, self.m02, self.m03, //
            self.m10, self.m11, self.m12, self.m13, //
            self.m20, self.m21, self.m22, self.m23, //
            self.m30, self.m31, self.m32, self.m33,
        ]
    }
}

impl From<&RigidTransform> for MatrixRecord {
    fn from(tf: &RigidTransform) -> Self {
        let [m00, m01, m02, m03, m10, m11, m12, m13, m20, m21, m22, m23, m30, m31, m32, m33] =
            tf.to_row_major();
        Self {
            m00,
            m01,
            m02,
            m03,
            m10,
            m11,
            m12,
            m13,
            m20,
            m21,
            m22,
            m23,
            m30,
            m31,
            m32,
            m33,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordDocument {
    Bare(Vec<MatrixRecord>),
    Wrapped { array: Vec<MatrixRecord> },
}

impl RecordDocument {
    fn into_records(self) -> Vec<MatrixRecord> {
        match self {
            RecordDocument::Bare(records) | RecordDocument::Wrapped { array: records } => records,
        }
    }
}

/// Decode a JSON record document into a pose list, preserving order.
pub fn decode_pose_records(json: &str) -> Result<PoseList, String> {
    let records = serde_json::from_str::<RecordDocument>(json)
        .map_err(|e| format!("Failed to parse pose records: {e}"))?
        .into_records();
    let flat: Vec<f32> = records.iter().flat_map(|r| r.to_row_major()).collect();
    PoseList::from_row_major(&flat).map_err(|e| format!("Malformed pose records: {e}"))
}

/// Validated offsets as records in the input schema.
pub fn encode_offset_records(offsets: &[ValidatedOffset]) -> Vec<MatrixRecord> {
    offsets
        .iter()
        .map(|o| MatrixRecord::from(&o.transform()))
        .collect()
}

/// Read a pose list from a JSON record file.
pub fn load_pose_list(path: &Path) -> Result<PoseList, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read poses {}: {e}", path.display()))?;
    decode_pose_records(&contents).map_err(|e| format!("{}: {e}", path.display()))
}

/// Write offsets as a pretty JSON record array. An empty list writes
/// nothing. Returns whether a file was written.
pub fn save_offsets(path: &Path, offsets: &[ValidatedOffset]) -> Result<bool, String> {
    if offsets.is_empty() {
        info!("No offsets to save, skipping {}", path.display());
        return Ok(false);
    }
    write_json_file(path, &encode_offset_records(offsets))?;
    info!("Saved {} offsets to {}", offsets.len(), path.display());
    Ok(true)
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::StrategyKind;
    use crate::types::Offset;
    use nalgebra::Vector3;

    const TWO_POSES: &str = r#"[
        {"m00":1,"m01":0,"m02":0,"m03":1,"m10":0,"m11":1,"m12":0,"m13":2,
         "m20":0,"m21":0,"m22":1,"m23":3,"m30":0,"m31":0,"m32":0,"m33":1},
        {"m00":1,"m01":0,"m02":0,"m03":0,"m10":0,"m11":1,"m12":0,"m13":0,
         "m20":0,"m21":0,"m22":1,"m23":0,"m30":0,"m31":0,"m32":0,"m33":1}
    ]"#;

    #[test]
    fn decodes_records_in_order_with_translation_in_last_column() {
        let poses = decode_pose_records(TWO_POSES).unwrap();
        assert_eq!(poses.len(), 2);
        assert_eq!(poses.get(0).unwrap().position(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(poses.get(1).unwrap(), &RigidTransform::identity());
    }

    #[test]
    fn accepts_wrapped_array() {
        let wrapped = format!("{{\"array\": {TWO_POSES}}}");
        assert_eq!(decode_pose_records(&wrapped).unwrap().len(), 2);
    }

    #[test]
    fn rejects_missing_components() {
        let err = decode_pose_records(r#"[{"m00": 1.0}]"#).unwrap_err();
        assert!(err.contains("Failed to parse"), "{err}");
    }

    #[test]
    fn empty_offsets_are_not_written() {
        let path = std::env::temp_dir()
            .join("pose_offsets_io_test")
            .join("never_written.json");
        let _ = fs::remove_file(&path);
        assert!(!save_offsets(&path, &[]).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn translation_offsets_encode_as_homogeneous_records() {
        let offset = ValidatedOffset {
            offset: Offset::Translation(Vector3::new(2.0, 2.0, 2.0)),
            strategy: StrategyKind::Intersection,
            anchor_space_index: None,
        };
        let records = encode_offset_records(&[offset]);
        assert_eq!(records.len(), 1);
        let r = records[0];
        assert_eq!((r.m03, r.m13, r.m23, r.m33), (2.0, 2.0, 2.0, 1.0));
        assert_eq!((r.m00, r.m11, r.m22), (1.0, 1.0, 1.0));
    }
}
