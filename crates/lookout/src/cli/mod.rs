//! Command handlers.

pub mod ask;
pub mod config;
pub mod normalize;
pub mod serve;

use anyhow::Context;
use serde_json::Value;
use std::path::Path;

/// Read raw detector output from a JSON file.
///
/// Accepts either a bare array of box records or an object with a
/// `detections` array (the shape detector scripts usually write).
pub(crate) fn read_raw_detections(path: &Path) -> anyhow::Result<Vec<Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read detections file {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    raw_records(value)
}

fn raw_records(value: Value) -> anyhow::Result<Vec<Value>> {
    match value {
        Value::Array(records) => Ok(records),
        Value::Object(mut map) => match map.remove("detections") {
            Some(Value::Array(records)) => Ok(records),
            _ => anyhow::bail!("Expected a \"detections\" array in the detections file"),
        },
        _ => anyhow::bail!("Expected a JSON array of detections"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_raw_records_accepts_both_shapes() {
        let bare = json!([{"class": "cat"}]);
        assert_eq!(raw_records(bare).unwrap().len(), 1);

        let wrapped = json!({"detections": [{"class": "cat"}, {"class": "dog"}]});
        assert_eq!(raw_records(wrapped).unwrap().len(), 2);
    }

    #[test]
    fn test_raw_records_rejects_other_shapes() {
        assert!(raw_records(json!({"boxes": []})).is_err());
        assert!(raw_records(json!("cat")).is_err());
    }

    #[test]
    fn test_read_raw_detections_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"detections": [{{"class": "cat", "confidence": 0.92, "bbox": [10, 10, 50, 50]}}]}}"#
        )
        .unwrap();
        let records = read_raw_detections(file.path()).unwrap();
        assert_eq!(records[0]["class"], "cat");
    }

    #[test]
    fn test_read_raw_detections_missing_file() {
        let err = read_raw_detections(Path::new("/nonexistent/detections.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read detections file"));
    }
}
