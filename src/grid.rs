use crate::model::{Cell, Slot};

/// Rows are dates, columns are theater screens. Every row holds exactly
/// `width` slots and every slot carries its own position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<Slot>>,
    width: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRef {
    pub date_index: usize,
    pub theater_index: usize,
}

impl SlotRef {
    pub fn new(date_index: usize, theater_index: usize) -> Self {
        SlotRef {
            date_index,
            theater_index,
        }
    }
}

impl Grid {
    pub fn empty(height: usize, width: usize) -> Self {
        Grid {
            rows: (0..height).map(|d| empty_row(d, width)).collect(),
            width,
        }
    }

    /// Takes ownership of prepared rows, forcing every row to `width` and
    /// restamping every slot from its position.
    pub fn from_rows(rows: Vec<Vec<Slot>>, width: usize) -> Self {
        let mut grid = Grid { rows, width };
        grid.reshape(width);
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<Slot>] {
        &self.rows
    }

    pub fn contains(&self, at: SlotRef) -> bool {
        at.date_index < self.rows.len() && at.theater_index < self.width
    }

    pub fn slot(&self, at: SlotRef) -> Option<&Slot> {
        self.rows
            .get(at.date_index)
            .and_then(|row| row.get(at.theater_index))
    }

    pub fn slot_mut(&mut self, at: SlotRef) -> Option<&mut Slot> {
        self.rows
            .get_mut(at.date_index)
            .and_then(|row| row.get_mut(at.theater_index))
    }

    pub fn cell(&self, at: SlotRef) -> Option<&Cell> {
        self.slot(at).and_then(|slot| slot.cell.as_ref())
    }

    pub fn find_cell(&self, cell_id: &str) -> Option<SlotRef> {
        self.iter_cells()
            .find(|(_, cell)| cell.id == cell_id)
            .map(|(at, _)| at)
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = (SlotRef, &Cell)> + '_ {
        self.rows.iter().enumerate().flat_map(|(d, row)| {
            row.iter().enumerate().filter_map(move |(t, slot)| {
                slot.cell.as_ref().map(|cell| (SlotRef::new(d, t), cell))
            })
        })
    }

    pub fn take(&mut self, at: SlotRef) -> Option<Cell> {
        self.slot_mut(at).and_then(|slot| slot.cell.take())
    }

    /// Puts `cell` at `at`, returning whatever was there before.
    pub fn put(&mut self, at: SlotRef, cell: Cell) -> Option<Cell> {
        self.slot_mut(at).and_then(|slot| slot.cell.replace(cell))
    }

    pub fn row_mut(&mut self, date_index: usize) -> Option<&mut Vec<Slot>> {
        self.rows.get_mut(date_index)
    }

    pub fn append_empty_rows(&mut self, count: usize) {
        let start = self.rows.len();
        let width = self.width;
        self.rows
            .extend((start..start + count).map(|d| empty_row(d, width)));
    }

    /// Pads or truncates every row to `width`. Cells in dropped columns are
    /// returned so callers can decide what happens to them.
    pub fn reshape(&mut self, width: usize) -> Vec<Cell> {
        let mut dropped = Vec::new();
        for (d, row) in self.rows.iter_mut().enumerate() {
            if row.len() > width {
                dropped.extend(row.drain(width..).filter_map(|slot| slot.cell));
            }
            while row.len() < width {
                row.push(Slot::empty(d, row.len()));
            }
            for (t, slot) in row.iter_mut().enumerate() {
                slot.date_index = d;
                slot.theater_index = t;
            }
        }
        self.width = width;
        dropped
    }

    pub fn into_rows(self) -> Vec<Vec<Slot>> {
        self.rows
    }
}

fn empty_row(date_index: usize, width: usize) -> Vec<Slot> {
    (0..width).map(|t| Slot::empty(date_index, t)).collect()
}
