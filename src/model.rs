use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

pub type CellId = String;

/// Background used for header cells and for cells created by an edit.
pub const DEFAULT_CELL_COLOR: &str = "#ffffff";

const HEADER_ID_PREFIX: &str = "header-";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub id: CellId,
    pub content: String,
    pub is_locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub cell: Option<Cell>,
    pub theater_index: usize,
    pub date_index: usize,
}

/// Full board state as written to and read from a store.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub holding_area: Vec<Cell>,
    pub board_cells: Vec<Vec<Slot>>,
    pub number_of_years: u32,
    pub visible_years: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// A create-or-mutate request against a single slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellPatch {
    Color(String),
    Content {
        content: String,
        font_family: String,
        text_color: String,
    },
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum BoardError {
    #[error("slot ({date_index}, {theater_index}) is outside the board")]
    OutOfBounds {
        date_index: usize,
        theater_index: usize,
    },
    #[error("cell {cell_id} at ({date_index}, {theater_index}) is locked")]
    Locked {
        cell_id: CellId,
        date_index: usize,
        theater_index: usize,
    },
}

impl Cell {
    pub fn new(id: CellId) -> Self {
        Cell {
            id,
            content: String::new(),
            is_locked: false,
            color: None,
            font_family: None,
            text_color: None,
        }
    }

    pub fn header(index: usize, label: impl Into<String>) -> Self {
        Cell {
            id: header_id(index),
            content: label.into(),
            is_locked: true,
            color: Some(DEFAULT_CELL_COLOR.to_string()),
            font_family: None,
            text_color: None,
        }
    }

    pub fn is_header(&self) -> bool {
        self.id.starts_with(HEADER_ID_PREFIX)
    }
}

impl Slot {
    pub fn empty(date_index: usize, theater_index: usize) -> Self {
        Slot {
            cell: None,
            theater_index,
            date_index,
        }
    }
}

impl Snapshot {
    /// The state a store reports when it has nothing usable.
    pub fn empty() -> Self {
        Snapshot {
            holding_area: Vec::new(),
            board_cells: Vec::new(),
            number_of_years: 1,
            visible_years: vec![0],
            last_updated: None,
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        let rows = self.board_cells.len();
        let cols = self.board_cells.first().map(Vec::len).unwrap_or(0);
        (rows, cols)
    }
}

impl CellPatch {
    pub fn apply(&self, cell: &mut Cell) {
        match self {
            CellPatch::Color(color) => cell.color = Some(color.clone()),
            CellPatch::Content {
                content,
                font_family,
                text_color,
            } => {
                cell.content = content.clone();
                cell.font_family = Some(font_family.clone());
                cell.text_color = Some(text_color.clone());
            }
        }
    }

    /// Builds the cell an empty slot receives when this patch lands on it.
    pub fn create(&self) -> Cell {
        let mut cell = Cell::new(generate_id());
        if let CellPatch::Content { .. } = self {
            cell.color = Some(DEFAULT_CELL_COLOR.to_string());
        }
        self.apply(&mut cell);
        cell
    }
}

pub fn header_id(index: usize) -> CellId {
    format!("{}{}", HEADER_ID_PREFIX, index)
}

pub fn generate_id() -> CellId {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect()
}
