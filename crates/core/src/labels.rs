//! Typed ROI label payloads.
//!
//! A labeler's submission for a region is a list of per-ROI verdicts. The
//! payload is validated here, at the storage boundary, so no untyped JSON
//! ever reaches the database.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// A labeler's verdict for a single ROI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoiVerdict {
    /// The ROI is a cell.
    Cell,
    /// The ROI is not a cell (e.g. dendrite, artifact, noise).
    NotCell,
}

/// One per-ROI label decision within a region submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiLabel {
    /// The ROI id within the region's experiment.
    pub roi_id: DbId,
    pub verdict: RoiVerdict,
    /// Optional free-form notes for this ROI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Maximum length of a per-ROI note.
const MAX_NOTE_LEN: usize = 1024;

/// Validate a label submission before it is persisted.
///
/// An empty list is valid (a region may contain no candidate ROIs). Each ROI
/// may appear at most once, and notes are length-capped.
pub fn validate_labels(labels: &[RoiLabel]) -> Result<(), CoreError> {
    let mut seen = std::collections::HashSet::with_capacity(labels.len());
    for label in labels {
        if !seen.insert(label.roi_id) {
            return Err(CoreError::Validation(format!(
                "duplicate label for roi {}",
                label.roi_id
            )));
        }
        if let Some(notes) = &label.notes {
            if notes.len() > MAX_NOTE_LEN {
                return Err(CoreError::Validation(format!(
                    "notes for roi {} exceed {MAX_NOTE_LEN} characters",
                    label.roi_id
                )));
            }
        }
    }
    Ok(())
}
