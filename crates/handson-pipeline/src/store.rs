//! JSON activity files: read, validate, write.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use handson_core::{Activity, Error, Result};
use handson_ingest::{require_file, FileType};

/// A JSON object as read from an input list.
pub type Record = Map<String, Value>;

/// Write `value` as pretty-printed UTF-8 JSON.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_string_pretty(value)?;
    std::fs::write(path, body)?;
    debug!("Wrote {}", path.display());
    Ok(())
}

pub fn save_activities(path: &Path, activities: &[Activity]) -> Result<()> {
    write_json(path, activities)
}

/// Load a list of activity records. Scalar pages are read as one-element lists.
pub fn load_activities(path: &Path) -> Result<Vec<Activity>> {
    let body = std::fs::read_to_string(path)?;
    serde_json::from_str(&body)
        .map_err(|e| Error::Schema(format!("{} is not a list of activities: {}", path.display(), e)))
}

/// Load an existing `.json` file that must hold an array of objects.
///
/// `label` names the file in error messages ("Master JSON file").
pub fn load_json_array(path: &Path, label: &str) -> Result<Vec<Record>> {
    require_file(path, FileType::Json, label)?;

    let body = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&body).map_err(|e| {
        Error::Schema(format!(
            "Error loading JSON data from {}: {}",
            path.display(),
            e
        ))
    })?;

    let items = match value {
        Value::Array(items) => items,
        _ => {
            return Err(Error::Schema(format!(
                "Invalid JSON format in {}. Expected a list of activities.",
                path.display()
            )))
        }
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => Ok(map),
            _ => Err(Error::Schema(format!(
                "Invalid JSON structure in {}. Expected list of objects.",
                path.display()
            ))),
        })
        .collect()
}

/// Path of `file_name` in the directory holding `path`.
pub fn sibling_path(path: &Path, file_name: &str) -> Result<PathBuf> {
    let absolute = path.canonicalize()?;
    let dir = absolute
        .parent()
        .ok_or_else(|| Error::Internal(format!("{} has no parent directory", path.display())))?;
    Ok(dir.join(file_name))
}

/// File stem of `path`, or `fallback` when it has none.
pub fn file_stem(path: &Path, fallback: &str) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn activity(name: &str, pages: &[u32]) -> Activity {
        Activity {
            activity: name.into(),
            concept: "Forces".into(),
            materials: vec!["Ball".into(), "Ramp".into()],
            description: "Roll the ball down the ramp".into(),
            page: pages.to_vec(),
        }
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book_activities.json");
        let activities = vec![activity("Activity 1.1", &[2]), activity("Activity 1.2", &[3, 4])];

        save_activities(&path, &activities).unwrap();
        assert_eq!(load_activities(&path).unwrap(), activities);

        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.contains("\n  {\n    \"activity\""));
    }

    #[test]
    fn test_save_keeps_non_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        save_activities(&path, &[activity("Activité 2.1: Mesurer", &[9])]).unwrap();
        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.contains("Activité"));
    }

    #[test]
    fn test_load_json_array_validation() {
        let dir = tempfile::tempdir().unwrap();

        let good = dir.path().join("good.json");
        std::fs::write(&good, json!([{"activity": "A", "page": [1]}]).to_string()).unwrap();
        assert_eq!(load_json_array(&good, "Master JSON file").unwrap().len(), 1);

        let object = dir.path().join("object.json");
        std::fs::write(&object, r#"{"activity": "A"}"#).unwrap();
        assert!(matches!(
            load_json_array(&object, "Master JSON file"),
            Err(Error::Schema(_))
        ));

        let scalars = dir.path().join("scalars.json");
        std::fs::write(&scalars, "[1, 2]").unwrap();
        assert!(matches!(
            load_json_array(&scalars, "Master JSON file"),
            Err(Error::Schema(_))
        ));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "[{").unwrap();
        assert!(matches!(
            load_json_array(&broken, "Master JSON file"),
            Err(Error::Schema(_))
        ));

        assert!(matches!(
            load_json_array(&dir.path().join("missing.json"), "Master JSON file"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_sibling_path() {
        let dir = tempfile::tempdir().unwrap();
        let master = dir.path().join("master.json");
        std::fs::write(&master, "[]").unwrap();
        let out = sibling_path(&master, "matched_activities.json").unwrap();
        assert_eq!(out, dir.path().canonicalize().unwrap().join("matched_activities.json"));
        assert_eq!(file_stem(&master, "activities"), "master");
    }
}
