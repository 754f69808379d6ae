//! Board state manager.
//!
//! Every mutation of the grid or the holding area goes through [`Board`], which
//! keeps each cell id in exactly one place: one grid slot or the holding area.
//! Operations addressed at a slot outside the board are refused with a warning
//! and report `false` instead of failing.

use crate::dates::{self, MAX_YEARS, WEEKS_PER_YEAR};
use crate::grid::{Grid, SlotRef};
use crate::model::{header_id, BoardError, Cell, CellPatch, Snapshot};
use chrono::NaiveDate;
use log::{debug, warn};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub(crate) grid: Grid,
    pub(crate) holding_area: Vec<Cell>,
    pub(crate) column_labels: Vec<String>,
    pub(crate) number_of_years: u32,
    pub(crate) visible_years: BTreeSet<u32>,
}

impl Board {
    /// A one-year board with nothing placed.
    pub fn new(column_labels: Vec<String>) -> Self {
        let width = column_labels.len();
        Board {
            grid: Grid::empty(dates::rows_for_years(1), width),
            holding_area: Vec::new(),
            column_labels,
            number_of_years: 1,
            visible_years: BTreeSet::from([0]),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn holding_area(&self) -> &[Cell] {
        &self.holding_area
    }

    pub fn column_labels(&self) -> &[String] {
        &self.column_labels
    }

    pub fn number_of_years(&self) -> u32 {
        self.number_of_years
    }

    pub fn visible_years(&self) -> &BTreeSet<u32> {
        &self.visible_years
    }

    pub fn cell_at(&self, date_index: usize, theater_index: usize) -> Option<&Cell> {
        self.grid.cell(SlotRef::new(date_index, theater_index))
    }

    pub fn is_visible_row(&self, date_index: usize) -> bool {
        self.visible_years.contains(&dates::year_of_row(date_index))
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.grid.height()).filter(move |d| self.is_visible_row(*d))
    }

    pub fn dates(&self, epoch: NaiveDate) -> Vec<NaiveDate> {
        dates::generate_dates(epoch, self.number_of_years)
    }

    /// Moves a cell onto a slot. The holding area is searched before the
    /// grid. Whatever occupied the target goes to the holding area; a locked
    /// target does not block the move.
    pub fn place_cell(
        &mut self,
        cell_id: &str,
        target_date_index: usize,
        target_theater_index: usize,
    ) -> bool {
        let target = SlotRef::new(target_date_index, target_theater_index);
        if !self.guard(target, "place") {
            return false;
        }

        let cell = if let Some(pos) = self.holding_area.iter().position(|c| c.id == cell_id) {
            self.holding_area.remove(pos)
        } else {
            match self.grid.find_cell(cell_id) {
                Some(source) if source == target => return false,
                Some(source) => match self.grid.take(source) {
                    Some(cell) => cell,
                    None => return false,
                },
                None => {
                    debug!("place ignored: cell {} not found", cell_id);
                    return false;
                }
            }
        };

        if let Some(displaced) = self.grid.put(target, cell) {
            debug!(
                "cell {} displaced to holding area from ({}, {})",
                displaced.id, target_date_index, target_theater_index
            );
            self.holding_area.push(displaced);
        }
        debug!(
            "placed cell {} at ({}, {})",
            cell_id, target_date_index, target_theater_index
        );
        true
    }

    pub fn toggle_lock(&mut self, date_index: usize, theater_index: usize) -> bool {
        let at = SlotRef::new(date_index, theater_index);
        if !self.guard(at, "toggle lock") {
            return false;
        }
        match self.grid.slot_mut(at).and_then(|slot| slot.cell.as_mut()) {
            Some(cell) => {
                cell.is_locked = !cell.is_locked;
                debug!("cell {} locked={}", cell.id, cell.is_locked);
                true
            }
            None => false,
        }
    }

    /// Gate for interactive editing: locked cells cannot be opened for edit.
    /// Returns the current occupant, if any, so an editor can prefill.
    pub fn edit_entry(
        &self,
        date_index: usize,
        theater_index: usize,
    ) -> Result<Option<&Cell>, BoardError> {
        let at = SlotRef::new(date_index, theater_index);
        let slot = self.grid.slot(at).ok_or(BoardError::OutOfBounds {
            date_index,
            theater_index,
        })?;
        match &slot.cell {
            Some(cell) if cell.is_locked => Err(BoardError::Locked {
                cell_id: cell.id.clone(),
                date_index,
                theater_index,
            }),
            other => Ok(other.as_ref()),
        }
    }

    pub fn set_color(&mut self, date_index: usize, theater_index: usize, color: &str) -> bool {
        self.upsert_cell(
            SlotRef::new(date_index, theater_index),
            &CellPatch::Color(color.to_string()),
        )
    }

    pub fn edit_content(
        &mut self,
        date_index: usize,
        theater_index: usize,
        content: &str,
        font_family: &str,
        text_color: &str,
    ) -> bool {
        self.upsert_cell(
            SlotRef::new(date_index, theater_index),
            &CellPatch::Content {
                content: content.to_string(),
                font_family: font_family.to_string(),
                text_color: text_color.to_string(),
            },
        )
    }

    /// Applies `patch` to the cell at `at`, creating the cell first when the
    /// slot is empty. An existing cell keeps its id and lock state.
    pub fn upsert_cell(&mut self, at: SlotRef, patch: &CellPatch) -> bool {
        if !self.guard(at, "upsert") {
            return false;
        }
        let Some(slot) = self.grid.slot_mut(at) else {
            return false;
        };
        match slot.cell.as_mut() {
            Some(cell) => patch.apply(cell),
            None => {
                let cell = patch.create();
                debug!(
                    "created cell {} at ({}, {})",
                    cell.id, at.date_index, at.theater_index
                );
                slot.cell = Some(cell);
            }
        }
        true
    }

    /// Replaces the column set. Row 0 becomes locked header cells named by
    /// `labels`; every other row keeps column `i` at column `i`. Cells in
    /// columns past the new width are discarded.
    pub fn rename_columns(&mut self, labels: Vec<String>) -> bool {
        if labels.is_empty() {
            warn!("rename ignored: a board needs at least one column");
            return false;
        }
        let width = labels.len();
        let dropped = self.grid.reshape(width);
        if !dropped.is_empty() {
            debug!("rename dropped {} cells in truncated columns", dropped.len());
        }

        let header_ids: BTreeSet<String> = (0..width).map(header_id).collect();
        let stale: Vec<SlotRef> = self
            .grid
            .iter_cells()
            .filter(|(at, cell)| at.date_index != 0 && header_ids.contains(&cell.id))
            .map(|(at, _)| at)
            .collect();
        for at in stale {
            self.grid.take(at);
        }
        self.holding_area.retain(|c| !header_ids.contains(&c.id));

        if let Some(row) = self.grid.row_mut(0) {
            for (index, (slot, label)) in row.iter_mut().zip(&labels).enumerate() {
                let previous = slot.cell.replace(Cell::header(index, label.clone()));
                if let Some(previous) = previous.filter(|c| !c.is_header()) {
                    debug!("header row displaced cell {}", previous.id);
                    self.holding_area.push(previous);
                }
            }
        }

        self.column_labels = labels;
        true
    }

    /// Adds a year of empty weekly rows at the end and makes it visible.
    /// Returns the new year's index, or `None` once the board spans
    /// `MAX_YEARS`.
    pub fn add_year(&mut self) -> Option<u32> {
        if self.number_of_years >= MAX_YEARS {
            warn!("add year ignored: board already spans {} years", MAX_YEARS);
            return None;
        }
        let new_year = self.number_of_years;
        self.number_of_years += 1;
        self.visible_years.insert(new_year);
        self.grid.append_empty_rows(WEEKS_PER_YEAR);
        debug!("added year {}, board now {} rows", new_year, self.grid.height());
        Some(new_year)
    }

    pub fn toggle_year_visibility(&mut self, year_index: u32) -> bool {
        if year_index >= self.number_of_years {
            warn!(
                "toggle year ignored: year {} not in board of {} years",
                year_index, self.number_of_years
            );
            return false;
        }
        if !self.visible_years.remove(&year_index) {
            self.visible_years.insert(year_index);
        }
        true
    }

    /// Where a cell currently lives.
    pub fn locate(&self, cell_id: &str) -> Option<Location> {
        if self.holding_area.iter().any(|c| c.id == cell_id) {
            return Some(Location::HoldingArea);
        }
        self.grid.find_cell(cell_id).map(Location::Slot)
    }

    /// Ids that appear in more than one place, counting the holding area.
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let ids = self
            .grid
            .iter_cells()
            .map(|(_, cell)| cell.id.as_str())
            .chain(self.holding_area.iter().map(|c| c.id.as_str()));
        for id in ids {
            *counts.entry(id).or_default() += 1;
        }
        let mut dupes: Vec<String> = counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(id, _)| id.to_string())
            .collect();
        dupes.sort();
        dupes
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            holding_area: self.holding_area.clone(),
            board_cells: self.grid.rows().to_vec(),
            number_of_years: self.number_of_years,
            visible_years: self.visible_years.iter().copied().collect(),
            last_updated: None,
        }
    }

    fn guard(&self, at: SlotRef, op: &str) -> bool {
        if self.grid.contains(at) {
            return true;
        }
        warn!(
            "{} ignored: slot ({}, {}) outside {}x{} board",
            op,
            at.date_index,
            at.theater_index,
            self.grid.height(),
            self.grid.width()
        );
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    HoldingArea,
    Slot(SlotRef),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Screen {}", i)).collect()
    }

    fn board_with_held(ids: &[&str]) -> Board {
        let mut board = Board::new(labels(4));
        for id in ids {
            let mut cell = Cell::new(id.to_string());
            cell.content = id.to_uppercase();
            board.holding_area.push(cell);
        }
        board
    }

    #[test]
    fn new_board_is_one_empty_year() {
        let board = Board::new(labels(23));
        assert_eq!(board.grid().height(), 52);
        assert_eq!(board.grid().width(), 23);
        assert_eq!(board.number_of_years(), 1);
        assert_eq!(board.visible_years(), &BTreeSet::from([0]));
        assert_eq!(board.grid().iter_cells().count(), 0);
    }

    #[test]
    fn place_from_holding_area_removes_it_there() {
        let mut board = board_with_held(&["a"]);
        assert!(board.place_cell("a", 3, 1));
        assert!(board.holding_area().is_empty());
        assert_eq!(board.cell_at(3, 1).unwrap().id, "a");
    }

    #[test]
    fn place_onto_occupied_slot_displaces_occupant() {
        let mut board = board_with_held(&["a", "b"]);
        board.place_cell("a", 0, 0);
        board.place_cell("b", 0, 0);
        assert_eq!(board.cell_at(0, 0).unwrap().id, "b");
        assert_eq!(board.locate("a"), Some(Location::HoldingArea));
        assert!(board.duplicate_ids().is_empty());
    }

    #[test]
    fn place_from_grid_vacates_source_slot() {
        let mut board = board_with_held(&["a"]);
        board.place_cell("a", 0, 0);
        assert!(board.place_cell("a", 5, 2));
        assert!(board.cell_at(0, 0).is_none());
        assert_eq!(board.locate("a"), Some(Location::Slot(SlotRef::new(5, 2))));
    }

    #[test]
    fn place_onto_own_slot_changes_nothing() {
        let mut board = board_with_held(&["a"]);
        board.place_cell("a", 1, 1);
        let before = board.clone();
        assert!(!board.place_cell("a", 1, 1));
        assert_eq!(board, before);
    }

    #[test]
    fn place_unknown_or_out_of_bounds_is_noop() {
        let mut board = board_with_held(&["a"]);
        let before = board.clone();
        assert!(!board.place_cell("missing", 0, 0));
        assert!(!board.place_cell("a", 52, 0));
        assert!(!board.place_cell("a", 0, 4));
        assert_eq!(board, before);
    }

    #[test]
    fn holding_area_match_wins_over_grid() {
        let mut board = board_with_held(&["a"]);
        let mut twin = Cell::new("a".into());
        twin.content = "grid copy".into();
        board.grid.put(SlotRef::new(2, 2), twin);
        board.place_cell("a", 0, 0);
        assert_eq!(board.cell_at(0, 0).unwrap().content, "A");
        assert_eq!(board.cell_at(2, 2).unwrap().content, "grid copy");
    }

    #[test]
    fn uniqueness_holds_across_mixed_operations() {
        let mut board = board_with_held(&["a", "b", "c"]);
        board.set_color(4, 0, "#00ff00");
        board.edit_content(4, 1, "Dune", "Arial", "#000000");
        let created = board.cell_at(4, 0).unwrap().id.clone();
        let ops: [(&str, usize, usize); 7] = [
            ("a", 0, 0),
            ("b", 0, 0),
            ("c", 4, 0),
            (created.as_str(), 0, 0),
            ("a", 4, 1),
            ("b", 4, 1),
            ("c", 0, 0),
        ];
        for (id, d, t) in ops {
            board.place_cell(id, d, t);
            assert!(board.duplicate_ids().is_empty(), "duplicate after {}", id);
        }
        let total = board.grid().iter_cells().count() + board.holding_area().len();
        assert_eq!(total, 5);
    }

    #[test]
    fn toggle_lock_flips_and_ignores_empty_slots() {
        let mut board = board_with_held(&["a"]);
        board.place_cell("a", 0, 0);
        assert!(board.toggle_lock(0, 0));
        assert!(board.cell_at(0, 0).unwrap().is_locked);
        assert!(board.toggle_lock(0, 0));
        assert!(!board.cell_at(0, 0).unwrap().is_locked);
        assert!(!board.toggle_lock(1, 1));
        assert!(!board.toggle_lock(99, 0));
    }

    // Editing is refused on a locked cell while placing onto it is not.
    #[test]
    fn lock_blocks_edit_entry_but_not_placement() {
        let mut board = board_with_held(&["a", "b"]);
        board.place_cell("a", 0, 0);
        board.toggle_lock(0, 0);
        assert!(matches!(
            board.edit_entry(0, 0),
            Err(BoardError::Locked { .. })
        ));
        assert!(board.place_cell("b", 0, 0));
        assert_eq!(board.cell_at(0, 0).unwrap().id, "b");
        let held = &board.holding_area()[0];
        assert_eq!(held.id, "a");
        assert!(held.is_locked);
        assert_eq!(board.edit_entry(0, 0).unwrap().unwrap().id, "b");
    }

    #[test]
    fn edit_entry_reports_bounds_and_empty_slots() {
        let board = Board::new(labels(2));
        assert_eq!(board.edit_entry(0, 1), Ok(None));
        assert_eq!(
            board.edit_entry(0, 2),
            Err(BoardError::OutOfBounds {
                date_index: 0,
                theater_index: 2
            })
        );
    }

    #[test]
    fn set_color_creates_then_mutates_in_place() {
        let mut board = Board::new(labels(2));
        assert!(board.set_color(1, 1, "#123456"));
        let created = board.cell_at(1, 1).unwrap().clone();
        assert_eq!(created.content, "");
        assert!(!created.is_locked);
        assert_eq!(created.color.as_deref(), Some("#123456"));

        board.toggle_lock(1, 1);
        assert!(board.set_color(1, 1, "#abcdef"));
        let updated = board.cell_at(1, 1).unwrap();
        assert_eq!(updated.id, created.id);
        assert!(updated.is_locked);
        assert_eq!(updated.color.as_deref(), Some("#abcdef"));
        assert!(!board.set_color(52, 0, "#000000"));
    }

    #[test]
    fn edit_content_keeps_lock_and_identity() {
        let mut board = Board::new(labels(2));
        board.edit_content(0, 0, "Alien", "Georgia", "#111111");
        let id = board.cell_at(0, 0).unwrap().id.clone();
        assert_eq!(board.cell_at(0, 0).unwrap().color.as_deref(), Some("#ffffff"));
        board.toggle_lock(0, 0);
        board.edit_content(0, 0, "Aliens", "Arial", "#222222");
        let cell = board.cell_at(0, 0).unwrap();
        assert_eq!(cell.id, id);
        assert!(cell.is_locked);
        assert_eq!(cell.content, "Aliens");
        assert_eq!(cell.font_family.as_deref(), Some("Arial"));
        assert_eq!(cell.text_color.as_deref(), Some("#222222"));
    }

    #[test]
    fn rename_prunes_truncated_columns() {
        let mut board = Board::new(labels(5));
        for d in 1..4 {
            for t in 0..5 {
                board.edit_content(d, t, &format!("{}-{}", d, t), "Arial", "#000000");
            }
        }
        assert!(board.rename_columns(vec!["A".into(), "B".into()]));
        assert_eq!(board.grid().width(), 2);
        assert_eq!(board.column_labels(), ["A", "B"]);
        assert!(board.grid().rows().iter().all(|r| r.len() == 2));
        assert_eq!(board.cell_at(2, 1).unwrap().content, "2-1");
        assert!(board.holding_area().is_empty());
        let remaining: Vec<_> = board.grid().iter_cells().map(|(_, c)| c.content.clone()).collect();
        assert!(!remaining.iter().any(|c| c.ends_with("-2") || c.ends_with("-4")));
    }

    #[test]
    fn rename_writes_locked_header_row() {
        let mut board = Board::new(labels(3));
        board.edit_content(0, 1, "opening night", "Arial", "#000000");
        board.rename_columns(vec!["Opening".into(), "Polson 1".into(), "Havre 1".into()]);
        for (i, label) in ["Opening", "Polson 1", "Havre 1"].iter().enumerate() {
            let header = board.cell_at(0, i).unwrap();
            assert_eq!(header.id, format!("header-{}", i));
            assert_eq!(&header.content, label);
            assert!(header.is_locked);
            assert_eq!(header.color.as_deref(), Some("#ffffff"));
        }
        assert_eq!(board.holding_area().len(), 1);
        assert_eq!(board.holding_area()[0].content, "opening night");
    }

    #[test]
    fn rename_twice_keeps_header_ids_unique() {
        let mut board = Board::new(labels(3));
        board.rename_columns(labels(3));
        board.place_cell("header-1", 7, 0);
        board.rename_columns(vec!["X".into(), "Y".into(), "Z".into()]);
        assert!(board.duplicate_ids().is_empty());
        assert!(board.cell_at(7, 0).is_none());
        assert_eq!(board.cell_at(0, 1).unwrap().content, "Y");
    }

    #[test]
    fn rename_wider_pads_new_columns() {
        let mut board = Board::new(labels(2));
        board.edit_content(5, 1, "kept", "Arial", "#000000");
        board.rename_columns(labels(4));
        assert_eq!(board.grid().width(), 4);
        assert_eq!(board.cell_at(5, 1).unwrap().content, "kept");
        assert!(board.cell_at(5, 3).is_none());
        let slot = board.grid().slot(SlotRef::new(5, 3)).unwrap();
        assert_eq!((slot.date_index, slot.theater_index), (5, 3));
    }

    #[test]
    fn add_year_appends_empty_rows() {
        let mut board = board_with_held(&["a"]);
        board.place_cell("a", 51, 3);
        let before = board.grid().rows().to_vec();
        assert_eq!(board.add_year(), Some(1));
        assert_eq!(board.grid().height(), 104);
        assert_eq!(&board.grid().rows()[..52], &before[..]);
        assert!(board.grid().rows()[52..]
            .iter()
            .all(|row| row.iter().all(|s| s.cell.is_none())));
        assert_eq!(board.grid().rows()[103][3].date_index, 103);
        assert!(board.visible_years().contains(&1));
        assert_eq!(board.number_of_years(), 2);
    }

    #[test]
    fn add_year_stops_at_year_limit() {
        let mut board = Board::new(labels(1));
        for _ in 1..MAX_YEARS {
            assert!(board.add_year().is_some());
        }
        assert_eq!(board.number_of_years(), MAX_YEARS);
        let full = board.clone();
        assert_eq!(board.add_year(), None);
        assert_eq!(board, full);
    }

    #[test]
    fn rename_to_no_columns_is_refused() {
        let mut board = Board::new(labels(3));
        board.edit_content(4, 2, "kept", "Arial", "#000000");
        let before = board.clone();
        assert!(!board.rename_columns(Vec::new()));
        assert_eq!(board, before);
        assert_eq!(board.cell_at(4, 2).unwrap().content, "kept");
    }

    #[test]
    fn toggle_year_only_touches_visibility() {
        let mut board = Board::new(labels(2));
        board.add_year();
        let grid = board.grid().clone();
        assert!(board.toggle_year_visibility(0));
        assert_eq!(board.visible_years(), &BTreeSet::from([1]));
        assert!(!board.is_visible_row(10));
        assert!(board.is_visible_row(60));
        assert_eq!(board.visible_rows().count(), 52);
        assert!(board.toggle_year_visibility(0));
        assert_eq!(board.visible_years(), &BTreeSet::from([0, 1]));
        assert!(!board.toggle_year_visibility(2));
        assert_eq!(board.grid(), &grid);
    }
}
