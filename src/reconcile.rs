//! Load-time adaptation of persisted snapshots to the live board shape.
//!
//! A stored snapshot may have been written with a different column count or
//! fewer years than the board has now, or may be partially malformed. Each
//! top-level field is read on its own and falls back to its default when it
//! is missing or has the wrong type:
//!
//! | field           | default |
//! |-----------------|---------|
//! | `holdingArea`   | `[]`    |
//! | `boardCells`    | `[]`    |
//! | `numberOfYears` | `1`     |
//! | `visibleYears`  | `[0]`   |
//!
//! Columns past the current width are discarded. Slot positions are restamped
//! here and nowhere else on the load path.

use crate::board::Board;
use crate::dates::{self, MAX_YEARS, WEEKS_PER_YEAR};
use crate::grid::Grid;
use crate::model::{Cell, Slot, Snapshot};
use crate::storage::StorageError;
use log::{error, info, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeSet;

/// Builds a board from whatever a store returned. Never fails: a store error
/// or an unusable document yields an empty one-year board.
pub fn reconcile(loaded: Result<Value, StorageError>, column_labels: &[String]) -> Board {
    match loaded {
        Ok(value) => reconcile_value(&value, column_labels),
        Err(err) => {
            error!("loading board failed, starting from defaults: {}", err);
            Board::new(column_labels.to_vec())
        }
    }
}

pub fn reconcile_value(value: &Value, column_labels: &[String]) -> Board {
    let Some(doc) = value.as_object() else {
        warn!("stored board is not a JSON object, starting from defaults");
        return Board::new(column_labels.to_vec());
    };

    let holding_area = read_holding_area(doc.get("holdingArea"));
    let mut stored_rows = read_rows(doc.get("boardCells"));
    let mut number_of_years: u32 = field_or(doc.get("numberOfYears"), "numberOfYears", || 1);
    if number_of_years == 0 {
        warn!("stored numberOfYears is 0, using 1");
        number_of_years = 1;
    }
    if number_of_years > MAX_YEARS {
        warn!(
            "stored numberOfYears {} exceeds {}, clamping",
            number_of_years, MAX_YEARS
        );
        number_of_years = MAX_YEARS;
    }
    let max_rows = dates::rows_for_years(MAX_YEARS);
    if stored_rows.len() > max_rows {
        warn!(
            "stored board has {} rows, dropping those past {}",
            stored_rows.len(),
            max_rows
        );
        stored_rows.truncate(max_rows);
    }
    let visible_years: BTreeSet<u32> =
        field_or(doc.get("visibleYears"), "visibleYears", || BTreeSet::from([0]));

    let needed_years = stored_rows.len().div_ceil(WEEKS_PER_YEAR) as u32;
    if needed_years > number_of_years {
        info!(
            "stored board has {} rows, raising years from {} to {}",
            stored_rows.len(),
            number_of_years,
            needed_years
        );
        number_of_years = needed_years;
    }

    info!(
        "board loaded: holding={} stored={}x{} years={} visible={:?}",
        holding_area.len(),
        stored_rows.len(),
        stored_rows.first().map(Vec::len).unwrap_or(0),
        number_of_years,
        visible_years
    );

    let board = Board {
        grid: fit_grid(stored_rows, column_labels.len(), number_of_years),
        holding_area,
        column_labels: column_labels.to_vec(),
        number_of_years,
        visible_years,
    };
    let dupes = board.duplicate_ids();
    if !dupes.is_empty() {
        warn!("stored board repeats cell ids: {}", dupes.join(", "));
    }
    board
}

/// Reconciles an already typed snapshot, as produced by import.
pub fn reconcile_snapshot(snapshot: &Snapshot, column_labels: &[String]) -> Board {
    match serde_json::to_value(snapshot) {
        Ok(value) => reconcile_value(&value, column_labels),
        Err(err) => reconcile(Err(err.into()), column_labels),
    }
}

fn fit_grid(stored_rows: Vec<Vec<Slot>>, width: usize, number_of_years: u32) -> Grid {
    let height = dates::rows_for_years(number_of_years);
    let mut grid = Grid::from_rows(stored_rows, width);
    if grid.height() < height {
        grid.append_empty_rows(height - grid.height());
    }
    grid
}

/// Rows keep their order. A slot that is `null` or does not parse becomes an
/// empty slot in the same position.
fn read_rows(value: Option<&Value>) -> Vec<Vec<Slot>> {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return Vec::new();
    };
    let Some(rows) = value.as_array() else {
        warn!("stored boardCells is not an array, using an empty board");
        return Vec::new();
    };
    rows.iter()
        .enumerate()
        .map(|(d, row)| match row.as_array() {
            Some(slots) => slots
                .iter()
                .enumerate()
                .map(|(t, slot)| read_slot(slot, d, t))
                .collect(),
            None => Vec::new(),
        })
        .collect()
}

/// Held cells are read one at a time so a single bad entry only loses itself.
fn read_holding_area(value: Option<&Value>) -> Vec<Cell> {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return Vec::new();
    };
    let Some(entries) = value.as_array() else {
        warn!("stored holdingArea is not an array, using an empty one");
        return Vec::new();
    };
    entries
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| match serde_json::from_value::<Cell>(entry.clone()) {
            Ok(cell) => Some(cell),
            Err(err) => {
                warn!("dropping malformed held cell {}: {}", i, err);
                None
            }
        })
        .collect()
}

fn read_slot(value: &Value, date_index: usize, theater_index: usize) -> Slot {
    let cell = value
        .get("cell")
        .filter(|c| !c.is_null())
        .and_then(|c| match serde_json::from_value::<Cell>(c.clone()) {
            Ok(cell) => Some(cell),
            Err(err) => {
                warn!(
                    "dropping malformed cell at ({}, {}): {}",
                    date_index, theater_index, err
                );
                None
            }
        });
    Slot {
        cell,
        theater_index,
        date_index,
    }
}

fn field_or<T, F>(value: Option<&Value>, name: &str, default: F) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    match value {
        None | Some(Value::Null) => default(),
        Some(v) => serde_json::from_value(v.clone()).unwrap_or_else(|err| {
            warn!("stored {} is malformed ({}), using default", name, err);
            default()
        }),
    }
}
