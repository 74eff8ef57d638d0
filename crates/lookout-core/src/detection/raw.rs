//! Detector-native box records.
//!
//! Detectors disagree on field names and number types. [`RawDetection`] is the
//! narrow view the normalizer needs; each accessor returns `None` when the
//! field is absent or unusable, and the normalizer decides what that costs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

const CLASS_KEYS: [&str; 5] = ["class", "cls", "class_id", "label", "name"];
const CONFIDENCE_KEYS: [&str; 3] = ["confidence", "conf", "score"];
const COORD_KEYS: [&str; 4] = ["bbox", "xyxy", "box", "bounding_box"];

/// How a raw record identifies its class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassRef<'a> {
    /// Index into the detector's class table
    Index(usize),
    /// Class name already resolved by the detector
    Name(&'a str),
}

/// Read access to one detector-native box.
pub trait RawDetection {
    fn class(&self) -> Option<ClassRef<'_>>;

    fn confidence(&self) -> Option<f64>;

    /// Coordinates as emitted. The normalizer checks arity and finiteness.
    fn coords(&self) -> Option<Vec<f64>>;
}

/// Typed box record, shaped like the per-box output of YOLO-family detectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBox {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xyxy: Option<Vec<f32>>,
}

impl RawBox {
    pub fn new(class_id: usize, confidence: f32, xyxy: [f32; 4]) -> Self {
        Self {
            class_id: Some(class_id),
            class_name: None,
            confidence: Some(confidence),
            xyxy: Some(xyxy.to_vec()),
        }
    }
}

impl RawDetection for RawBox {
    fn class(&self) -> Option<ClassRef<'_>> {
        // A detector-supplied name wins over the index.
        match (&self.class_name, self.class_id) {
            (Some(name), _) => Some(ClassRef::Name(name)),
            (None, Some(index)) => Some(ClassRef::Index(index)),
            (None, None) => None,
        }
    }

    fn confidence(&self) -> Option<f64> {
        self.confidence.map(f64::from)
    }

    fn coords(&self) -> Option<Vec<f64>> {
        self.xyxy
            .as_ref()
            .map(|xs| xs.iter().copied().map(f64::from).collect())
    }
}

/// Loosely-shaped JSON records, as posted by clients or written by detector scripts.
impl RawDetection for Value {
    fn class(&self) -> Option<ClassRef<'_>> {
        let value = first_present(self, &CLASS_KEYS)?;
        match (value, as_number(value)) {
            // Numeric strings ("16", "16.0") are indices, same as numbers.
            (_, Some(index)) => class_index(index),
            (Value::String(name), None) => Some(ClassRef::Name(name.as_str())),
            _ => None,
        }
    }

    fn confidence(&self) -> Option<f64> {
        first_present(self, &CONFIDENCE_KEYS).and_then(as_number)
    }

    fn coords(&self) -> Option<Vec<f64>> {
        let mut values = first_present(self, &COORD_KEYS)?.as_array()?;
        // Torch-style `xyxy` tensors arrive as [[x1, y1, x2, y2]].
        if let [Value::Array(inner)] = values.as_slice() {
            values = inner;
        }
        values.iter().map(as_number).collect()
    }
}

fn first_present<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !value.is_null())
}

fn class_index(value: f64) -> Option<ClassRef<'static>> {
    (value >= 0.0 && value.fract() == 0.0).then(|| ClassRef::Index(value as usize))
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
