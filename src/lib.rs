pub mod board;
pub mod config;
pub mod dates;
pub mod grid;
pub mod import;
pub mod logging;
pub mod model;
pub mod reconcile;
pub mod session;
pub mod storage;

pub use board::{Board, Location};
pub use grid::{Grid, SlotRef};
pub use model::{BoardError, Cell, CellPatch, Slot, Snapshot};
pub use session::Session;
pub use storage::{JsonFileStore, MemoryStore, SnapshotStore, StorageError};
