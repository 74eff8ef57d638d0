//! Core data types passed between the normalizer, the orchestrator and the providers.

use crate::error::{AnswerFailure, DetectionError, QuestionError};
use serde::{Deserialize, Serialize};

/// One recognized object instance.
///
/// Every constructor, deserialization included, goes through
/// [`Detection::new`]: the label is non-blank, `confidence` is within [0, 1]
/// and the box corners are finite and ordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DetectionRecord")]
pub struct Detection {
    label: String,
    confidence: f64,
    #[serde(rename = "bbox")]
    bounding_box: [f64; 4],
}

/// Unchecked wire shape of a [`Detection`].
#[derive(Deserialize)]
struct DetectionRecord {
    label: String,
    confidence: f64,
    #[serde(rename = "bbox", alias = "bounding_box")]
    bounding_box: [f64; 4],
}

impl TryFrom<DetectionRecord> for Detection {
    type Error = DetectionError;

    fn try_from(record: DetectionRecord) -> Result<Self, Self::Error> {
        Detection::new(record.label, record.confidence, record.bounding_box)
    }
}

impl Detection {
    /// Build a detection, clamping confidence into [0, 1] and ordering the box corners.
    ///
    /// Rejects a blank label, a NaN or infinite confidence, and non-finite coordinates.
    pub fn new(
        label: impl Into<String>,
        confidence: f64,
        bounding_box: [f64; 4],
    ) -> Result<Self, DetectionError> {
        let label: String = label.into();
        let label = label.trim().to_string();
        if label.is_empty() {
            return Err(DetectionError::BlankLabel);
        }
        if !confidence.is_finite() {
            return Err(DetectionError::NonFiniteConfidence);
        }
        if bounding_box.iter().any(|c| !c.is_finite()) {
            return Err(DetectionError::NonFiniteBox);
        }

        let [x1, y1, x2, y2] = bounding_box;
        Ok(Self {
            label,
            confidence: confidence.clamp(0.0, 1.0),
            bounding_box: [x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2)],
        })
    }

    /// Human-readable class name (e.g., "cat")
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Detector confidence in [0.0, 1.0]
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Bounding box as (x1, y1, x2, y2) in image pixel space
    pub fn bounding_box(&self) -> [f64; 4] {
        self.bounding_box
    }
}

/// All detections for one image, in detector emission order.
///
/// An empty set means "nothing detected". Callers that need to express
/// "detection was never run" use `Option<DetectionSet>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectionSet(Vec<Detection>);

impl DetectionSet {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self(detections)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Detection> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Detection] {
        &self.0
    }
}

impl From<Vec<Detection>> for DetectionSet {
    fn from(detections: Vec<Detection>) -> Self {
        Self(detections)
    }
}

impl<'a> IntoIterator for &'a DetectionSet {
    type Item = &'a Detection;
    type IntoIter = std::slice::Iter<'a, Detection>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Non-empty user question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question(String);

impl Question {
    /// Accept any text with at least one non-whitespace character.
    pub fn new(text: impl Into<String>) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::Empty);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of asking a provider a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Success(String),
    Failure(AnswerFailure),
}

impl Answer {
    pub fn success(text: impl Into<String>) -> Self {
        Answer::Success(text.into())
    }

    pub fn failure(&self) -> Option<&AnswerFailure> {
        match self {
            Answer::Success(_) => None,
            Answer::Failure(failure) => Some(failure),
        }
    }

    /// Text to show the user, or the failure that has none.
    ///
    /// Unconfigured providers yield their configuration message and malformed
    /// responses yield the raw payload. Only `Unavailable` stays an error.
    pub fn into_reply(self) -> Result<String, AnswerFailure> {
        match self {
            Answer::Success(text) => Ok(text),
            Answer::Failure(AnswerFailure::Unconfigured { message, .. }) => Ok(message),
            Answer::Failure(AnswerFailure::MalformedResponse { raw, .. }) => Ok(raw),
            Answer::Failure(failure @ AnswerFailure::Unavailable { .. }) => Err(failure),
        }
    }
}
