//! Detector output as seen by the engine, and which landmark to track.

use crate::constants::{LEFT_EYE_OUTER, RIGHT_EYE_OUTER};
use crate::geometry::NormalizedPoint;
use serde::{Deserialize, Serialize};

/// One frame of detector output: zero or more faces, each an ordered list of
/// normalized landmarks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    #[serde(default)]
    pub faces: Vec<Vec<NormalizedPoint>>,
}

impl DetectionResult {
    /// A frame with no faces
    #[must_use]
    pub const fn empty() -> Self {
        Self { faces: Vec::new() }
    }

    #[must_use]
    pub fn single_face(landmarks: Vec<NormalizedPoint>) -> Self {
        Self { faces: vec![landmarks] }
    }

    /// Landmark `index` of the first face, if present with finite coordinates
    #[must_use]
    pub fn landmark(&self, index: usize) -> Option<NormalizedPoint> {
        self.faces
            .first()?
            .get(index)
            .copied()
            .filter(|p| p.is_finite())
    }
}

/// Landmark the marker is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkSelection {
    /// Outer corner of the left eye
    LeftEyeOuter,
    /// Outer corner of the right eye
    #[default]
    RightEyeOuter,
    /// Any face-mesh index
    Index(usize),
}

impl LandmarkSelection {
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::LeftEyeOuter => LEFT_EYE_OUTER,
            Self::RightEyeOuter => RIGHT_EYE_OUTER,
            Self::Index(i) => i,
        }
    }

    /// Parse a CLI name: `left`, `right`, or a numeric index
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "left" | "left_eye_outer" => Some(Self::LeftEyeOuter),
            "right" | "right_eye_outer" => Some(Self::RightEyeOuter),
            other => other.parse().ok().map(Self::Index),
        }
    }
}
