//! A board bound to the store it persists to.
//!
//! Each mutating call changes the in-memory board first and then saves the
//! full snapshot. A failed save is logged and returned, but the mutation is
//! kept: the next successful save will carry it.

use crate::board::Board;
use crate::import::{read_import_file, ImportError};
use crate::model::{BoardError, Cell, Snapshot};
use crate::reconcile;
use crate::storage::{SnapshotStore, StorageError};
use log::{debug, error};
use std::path::Path;

pub struct Session<S: SnapshotStore> {
    board: Board,
    store: S,
}

impl<S: SnapshotStore> Session<S> {
    /// Loads whatever the store holds and fits it to `column_labels`.
    pub fn open(store: S, column_labels: &[String]) -> Self {
        let board = reconcile::reconcile(store.load(), column_labels);
        Session { board, store }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_parts(self) -> (Board, S) {
        (self.board, self.store)
    }

    pub fn place_cell(
        &mut self,
        cell_id: &str,
        date_index: usize,
        theater_index: usize,
    ) -> Result<bool, StorageError> {
        self.apply(|board| board.place_cell(cell_id, date_index, theater_index))
    }

    pub fn toggle_lock(
        &mut self,
        date_index: usize,
        theater_index: usize,
    ) -> Result<bool, StorageError> {
        self.apply(|board| board.toggle_lock(date_index, theater_index))
    }

    pub fn edit_entry(
        &self,
        date_index: usize,
        theater_index: usize,
    ) -> Result<Option<&Cell>, BoardError> {
        self.board.edit_entry(date_index, theater_index)
    }

    pub fn set_color(
        &mut self,
        date_index: usize,
        theater_index: usize,
        color: &str,
    ) -> Result<bool, StorageError> {
        self.apply(|board| board.set_color(date_index, theater_index, color))
    }

    pub fn edit_content(
        &mut self,
        date_index: usize,
        theater_index: usize,
        content: &str,
        font_family: &str,
        text_color: &str,
    ) -> Result<bool, StorageError> {
        self.apply(|board| {
            board.edit_content(date_index, theater_index, content, font_family, text_color)
        })
    }

    pub fn rename_columns(&mut self, labels: Vec<String>) -> Result<bool, StorageError> {
        self.apply(|board| board.rename_columns(labels))
    }

    pub fn add_year(&mut self) -> Result<Option<u32>, StorageError> {
        let Some(year) = self.board.add_year() else {
            return Ok(None);
        };
        self.persist()?;
        Ok(Some(year))
    }

    pub fn toggle_year_visibility(&mut self, year_index: u32) -> Result<bool, StorageError> {
        self.apply(|board| board.toggle_year_visibility(year_index))
    }

    /// Rebuilds the board from an already validated snapshot, then replaces
    /// the store with it. The store is only written once the board is built.
    pub fn import(&mut self, snapshot: Snapshot) -> Result<(), StorageError> {
        let board = reconcile::reconcile_snapshot(&snapshot, self.board.column_labels());
        self.store.save(&snapshot)?;
        self.board = board;
        debug!("import replaced board");
        Ok(())
    }

    /// Reads and validates `path`; a rejected file leaves board and store as
    /// they were.
    pub fn import_file(&mut self, path: &Path) -> Result<(), ImportError> {
        let snapshot = read_import_file(path)?;
        self.import(snapshot)?;
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        self.board.snapshot()
    }

    fn apply<F>(&mut self, op: F) -> Result<bool, StorageError>
    where
        F: FnOnce(&mut Board) -> bool,
    {
        if !op(&mut self.board) {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        self.store.save(&self.board.snapshot()).inspect_err(|err| {
            error!("board change kept in memory but not saved: {}", err);
        })
    }
}
