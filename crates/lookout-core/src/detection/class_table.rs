//! Class index to label lookup.

use serde::{Deserialize, Serialize};

/// The 80 COCO classes, in the index order YOLOv8 checkpoints emit.
pub const COCO_CLASSES: [&str; 80] = [
    "person", "bicycle", "car", "motorcycle", "airplane", "bus", "train", "truck", "boat",
    "traffic light", "fire hydrant", "stop sign", "parking meter", "bench", "bird", "cat", "dog",
    "horse", "sheep", "cow", "elephant", "bear", "zebra", "giraffe", "backpack", "umbrella",
    "handbag", "tie", "suitcase", "frisbee", "skis", "snowboard", "sports ball", "kite",
    "baseball bat", "baseball glove", "skateboard", "surfboard", "tennis racket", "bottle",
    "wine glass", "cup", "fork", "knife", "spoon", "bowl", "banana", "apple", "sandwich", "orange",
    "broccoli", "carrot", "hot dog", "pizza", "donut", "cake", "chair", "couch", "potted plant",
    "bed", "dining table", "toilet", "tv", "laptop", "mouse", "remote", "keyboard", "cell phone",
    "microwave", "oven", "toaster", "sink", "refrigerator", "book", "clock", "vase", "scissors",
    "teddy bear", "hair drier", "toothbrush",
];

/// Ordered class names for a detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassTable(Vec<String>);

impl ClassTable {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn coco() -> Self {
        Self::new(COCO_CLASSES)
    }

    /// Label for a class index, if the index is in range and the name is usable.
    pub fn label(&self, index: usize) -> Option<&str> {
        self.0
            .get(index)
            .map(String::as_str)
            .filter(|name| !name.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ClassTable {
    fn default() -> Self {
        Self::coco()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coco_indices() {
        let table = ClassTable::coco();
        assert_eq!(table.len(), 80);
        assert_eq!(table.label(0), Some("person"));
        assert_eq!(table.label(15), Some("cat"));
        assert_eq!(table.label(16), Some("dog"));
        assert_eq!(table.label(80), None);
    }

    #[test]
    fn test_blank_names_do_not_resolve() {
        let table = ClassTable::new(["widget", " "]);
        assert_eq!(table.label(0), Some("widget"));
        assert_eq!(table.label(1), None);
    }
}
