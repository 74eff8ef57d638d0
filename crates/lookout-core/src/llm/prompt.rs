//! Prompt rendering shared by all providers.
//!
//! Confidences are always printed with two decimals so the same detections
//! always produce the same prompt.

use crate::types::{Detection, DetectionSet, Question};

/// Stated in place of a detections list when the set is empty.
pub const NO_OBJECTS_DETECTED: &str = "No objects were detected in the image.";

/// One `label: confidence` line per detection, for chat-style prompts.
pub fn compact_lines(detections: &DetectionSet) -> String {
    if detections.is_empty() {
        return NO_OBJECTS_DETECTED.to_string();
    }
    detections
        .iter()
        .map(|d| format!("- {}: {:.2}", d.label(), d.confidence()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Single-message prompt for chat completion APIs.
pub fn chat_prompt(detections: &DetectionSet, question: &Question) -> String {
    format!(
        "Detections:\n{}\n\nQuestion: {}\nAnswer concisely.",
        compact_lines(detections),
        question
    )
}

/// Structured prompt for text generation APIs.
pub fn generative_prompt(detections: &DetectionSet, question: &Question) -> String {
    let objects = if detections.is_empty() {
        NO_OBJECTS_DETECTED.to_string()
    } else {
        detections
            .iter()
            .enumerate()
            .map(|(i, d)| format!("{}. {}", i + 1, describe(d)))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "You are answering a question about an image using the output of an object detector.\n\
         Bounding boxes are (x1, y1, x2, y2) in pixels.\n\n\
         Detected objects:\n{objects}\n\n\
         Question: {question}\n\
         Answer in one or two sentences, using only the detected objects above."
    )
}

fn describe(detection: &Detection) -> String {
    let [x1, y1, x2, y2] = detection.bounding_box();
    format!(
        "{} (confidence {:.2}) at ({x1:.0}, {y1:.0}, {x2:.0}, {y2:.0})",
        detection.label(), detection.confidence()
    )
}
