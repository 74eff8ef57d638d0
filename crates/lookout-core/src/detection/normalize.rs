//! Raw detector output → canonical [`DetectionSet`].

use super::class_table::ClassTable;
use super::raw::{ClassRef, RawDetection};
use crate::error::DetectionError;
use crate::types::{Detection, DetectionSet};

/// Counts from one normalization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub kept: usize,
    pub dropped: usize,
}

/// Why a single raw record was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    MissingClass,
    UnknownClass(usize),
    MissingConfidence,
    BadCoordinates,
    Invalid(DetectionError),
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::MissingClass => write!(f, "missing class"),
            Rejection::UnknownClass(index) => write!(f, "class index {index} not in class table"),
            Rejection::MissingConfidence => write!(f, "missing or non-finite confidence"),
            Rejection::BadCoordinates => write!(f, "coordinates are not four numbers"),
            Rejection::Invalid(e) => write!(f, "{e}"),
        }
    }
}

/// Converts detector-native records into [`Detection`]s.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    classes: ClassTable,
}

impl Normalizer {
    pub fn new(classes: ClassTable) -> Self {
        Self { classes }
    }

    pub fn classes(&self) -> &ClassTable {
        &self.classes
    }

    /// Normalize one image's boxes, keeping emission order.
    ///
    /// Malformed records are dropped individually; an empty input gives an
    /// empty set.
    pub fn normalize<R: RawDetection>(&self, raw_boxes: &[R]) -> DetectionSet {
        self.normalize_with_report(raw_boxes).0
    }

    /// Like [`normalize`](Self::normalize), also reporting how many records were dropped.
    pub fn normalize_with_report<R: RawDetection>(
        &self,
        raw_boxes: &[R],
    ) -> (DetectionSet, NormalizeReport) {
        let mut detections = Vec::with_capacity(raw_boxes.len());
        let mut report = NormalizeReport::default();

        for (index, raw) in raw_boxes.iter().enumerate() {
            match self.convert(raw) {
                Ok(detection) => {
                    detections.push(detection);
                    report.kept += 1;
                }
                Err(reason) => {
                    tracing::warn!("Dropping raw detection #{index}: {reason}");
                    report.dropped += 1;
                }
            }
        }

        tracing::debug!(
            kept = report.kept,
            dropped = report.dropped,
            "Normalized detector output"
        );
        (DetectionSet::new(detections), report)
    }

    fn convert<R: RawDetection>(&self, raw: &R) -> Result<Detection, Rejection> {
        let label = match raw.class().ok_or(Rejection::MissingClass)? {
            ClassRef::Index(index) => self
                .classes
                .label(index)
                .ok_or(Rejection::UnknownClass(index))?
                .to_string(),
            ClassRef::Name(name) => name.to_string(),
        };

        let confidence = raw.confidence().ok_or(Rejection::MissingConfidence)?;

        let coords = raw.coords().ok_or(Rejection::BadCoordinates)?;
        let bounding_box: [f64; 4] = coords
            .try_into()
            .map_err(|_| Rejection::BadCoordinates)?;

        Detection::new(label, confidence, bounding_box).map_err(Rejection::Invalid)
    }
}
