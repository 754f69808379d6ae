//! Validation for snapshot files supplied from outside the store.
//!
//! Unlike loading from our own store, nothing here is defaulted: a file that
//! lacks any of the four board fields, or carries them with the wrong types,
//! is rejected before the store is touched.

use crate::dates::MAX_YEARS;
use crate::model::Snapshot;
use crate::storage::StorageError;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

const REQUIRED_FIELDS: [&str; 4] = ["holdingArea", "boardCells", "numberOfYears", "visibleYears"];

#[derive(thiserror::Error, Debug)]
pub enum ImportError {
    #[error("reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("import file is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("import file must contain a JSON object")]
    NotAnObject,
    #[error("import file is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("import field `{field}` is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("saving imported board: {0}")]
    Store(#[from] StorageError),
}

pub fn read_import_file(path: &Path) -> Result<Snapshot, ImportError> {
    let data = fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_import(&data)
}

pub fn parse_import(data: &str) -> Result<Snapshot, ImportError> {
    let value: Value = serde_json::from_str(data).map_err(ImportError::Parse)?;
    validate_import(value)
}

pub fn validate_import(value: Value) -> Result<Snapshot, ImportError> {
    let doc = value.as_object().ok_or(ImportError::NotAnObject)?;
    for field in REQUIRED_FIELDS {
        match doc.get(field) {
            None | Some(Value::Null) => return Err(ImportError::MissingField(field)),
            Some(_) => {}
        }
    }
    match doc["numberOfYears"].as_u64() {
        Some(0) => {
            return Err(ImportError::InvalidField {
                field: "numberOfYears",
                reason: "must be at least 1".into(),
            })
        }
        Some(years) if years > u64::from(MAX_YEARS) => {
            return Err(ImportError::InvalidField {
                field: "numberOfYears",
                reason: format!("must be at most {}", MAX_YEARS),
            })
        }
        _ => {}
    }
    check_field::<Vec<crate::model::Cell>>(doc, "holdingArea")?;
    check_field::<Vec<Vec<crate::model::Slot>>>(doc, "boardCells")?;
    check_field::<u32>(doc, "numberOfYears")?;
    check_field::<Vec<u32>>(doc, "visibleYears")?;

    let mut snapshot: Snapshot = serde_json::from_value(value).map_err(ImportError::Parse)?;
    snapshot.last_updated = None;
    Ok(snapshot)
}

fn check_field<T: serde::de::DeserializeOwned>(
    doc: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<(), ImportError> {
    serde_json::from_value::<T>(doc[field].clone())
        .map(|_| ())
        .map_err(|err| ImportError::InvalidField {
            field,
            reason: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "holdingArea": [{ "id": "h1", "content": "Held", "isLocked": false }],
            "boardCells": [[
                { "cell": null, "theaterIndex": 0, "dateIndex": 0 },
                { "cell": { "id": "c1", "content": "Dune", "isLocked": true, "color": "#ff0000" },
                  "theaterIndex": 1, "dateIndex": 0 }
            ]],
            "numberOfYears": 1,
            "visibleYears": [0],
            "lastUpdated": "2025-04-01T12:00:00Z"
        })
    }

    #[test]
    fn accepts_complete_file() {
        let snapshot = validate_import(valid()).unwrap();
        assert_eq!(snapshot.holding_area[0].id, "h1");
        assert_eq!(snapshot.board_cells[0][1].cell.as_ref().unwrap().content, "Dune");
        assert_eq!(snapshot.visible_years, vec![0]);
        assert!(snapshot.last_updated.is_none());
    }

    #[test]
    fn rejects_each_missing_field() {
        for field in REQUIRED_FIELDS {
            let mut value = valid();
            value.as_object_mut().unwrap().remove(field);
            let err = validate_import(value).unwrap_err();
            assert!(
                matches!(err, ImportError::MissingField(f) if f == field),
                "{}: {}",
                field,
                err
            );
        }
    }

    #[test]
    fn rejects_zero_years_and_wrong_types() {
        let mut value = valid();
        value["numberOfYears"] = json!(0);
        assert!(matches!(
            validate_import(value),
            Err(ImportError::InvalidField { field: "numberOfYears", .. })
        ));

        let mut value = valid();
        value["numberOfYears"] = json!(u32::MAX);
        assert!(matches!(
            validate_import(value),
            Err(ImportError::InvalidField { field: "numberOfYears", .. })
        ));

        let mut value = valid();
        value["numberOfYears"] = json!(MAX_YEARS);
        assert!(validate_import(value).is_ok());

        let mut value = valid();
        value["visibleYears"] = json!("all");
        assert!(matches!(
            validate_import(value),
            Err(ImportError::InvalidField { field: "visibleYears", .. })
        ));

        let mut value = valid();
        value["boardCells"][0][1]["cell"]["isLocked"] = json!("yes");
        assert!(matches!(
            validate_import(value),
            Err(ImportError::InvalidField { field: "boardCells", .. })
        ));
    }

    #[test]
    fn rejects_non_json_and_non_objects() {
        assert!(matches!(parse_import("not json"), Err(ImportError::Parse(_))));
        assert!(matches!(parse_import("[1, 2]"), Err(ImportError::NotAnObject)));
    }
}
