use anyhow::{anyhow, bail, Context, Result};
use log::info;
use skedbord::config::{self, Config};
use skedbord::dates;
use skedbord::storage::{write_snapshot, JsonFileStore};
use skedbord::{Board, Cell, Session};
use std::path::{Path, PathBuf};

/// Resolved locations for one command invocation.
pub struct Workspace {
    pub config: Config,
    pub config_path: PathBuf,
    pub data_path: PathBuf,
}

impl Workspace {
    pub fn resolve(config_arg: Option<PathBuf>, data_arg: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_arg {
            Some(path) => path,
            None => config::default_config_path()?,
        };
        let config = Config::load(&config_path)
            .with_context(|| format!("loading config {:?}", config_path))?;
        let data_path = data_arg
            .or_else(|| config.data_path())
            .ok_or_else(|| anyhow!("no data directory available; pass --data"))?;
        Ok(Workspace {
            config,
            config_path,
            data_path,
        })
    }

    fn open(&self) -> Session<JsonFileStore> {
        Session::open(
            JsonFileStore::new(&self.data_path),
            &self.config.column_labels,
        )
    }
}

pub fn init(ws: &Workspace) -> Result<()> {
    if !ws.config_path.exists() {
        ws.config
            .save(&ws.config_path)
            .with_context(|| format!("writing config {:?}", ws.config_path))?;
        println!("Wrote config to {}", ws.config_path.display());
    }
    if ws.data_path.exists() {
        println!("Board already exists at {}", ws.data_path.display());
        return Ok(());
    }
    let board = Board::new(ws.config.column_labels.clone());
    write_snapshot(&ws.data_path, &board.snapshot())
        .with_context(|| format!("writing board {:?}", ws.data_path))?;
    println!("Initialized board at {}", ws.data_path.display());
    Ok(())
}

pub fn show(ws: &Workspace, all: bool, holding: bool) -> Result<()> {
    let session = ws.open();
    let board = session.board();
    if holding {
        print_holding_area(board);
        return Ok(());
    }
    println!(
        "Board: {} rows x {} columns, years {} (visible: {})",
        board.grid().height(),
        board.grid().width(),
        board.number_of_years(),
        board
            .visible_years()
            .iter()
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    let dates = board.dates(ws.config.epoch);
    for (date_index, row) in board.grid().rows().iter().enumerate() {
        if !all && !board.is_visible_row(date_index) {
            continue;
        }
        if row.iter().all(|slot| slot.cell.is_none()) {
            continue;
        }
        let date = dates
            .get(date_index)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        println!("{:>4}  {}", date_index, date);
        for slot in row {
            if let Some(cell) = &slot.cell {
                let label = board
                    .column_labels()
                    .get(slot.theater_index)
                    .map(String::as_str)
                    .unwrap_or("?");
                print!("      [{:>2}] {}: ", slot.theater_index, label);
                print_cell(cell);
            }
        }
    }
    println!();
    print_holding_area(board);
    Ok(())
}

pub fn dates(ws: &Workspace, years: Option<u32>) -> Result<()> {
    let years = match years {
        Some(0) => bail!("years must be at least 1"),
        Some(n) if n > dates::MAX_YEARS => bail!("years must be at most {}", dates::MAX_YEARS),
        Some(n) => n,
        None => ws.open().board().number_of_years(),
    };
    for (date_index, date) in dates::generate_dates(ws.config.epoch, years)
        .iter()
        .enumerate()
    {
        println!(
            "{:>4}  {}  year {}",
            date_index,
            date.format("%Y-%m-%d"),
            dates::year_of_row(date_index)
        );
    }
    Ok(())
}

pub fn place(ws: &Workspace, cell_id: String, date: usize, theater: usize) -> Result<()> {
    let mut session = ws.open();
    let applied = session
        .place_cell(&cell_id, date, theater)
        .with_context(|| format!("saving after placing {}", cell_id))?;
    if !applied {
        bail!("cell {} could not be placed at ({}, {})", cell_id, date, theater);
    }
    println!("Placed {} at ({}, {})", cell_id, date, theater);
    Ok(())
}

pub fn lock(ws: &Workspace, date: usize, theater: usize) -> Result<()> {
    let mut session = ws.open();
    let applied = session
        .toggle_lock(date, theater)
        .context("saving lock change")?;
    match session.board().cell_at(date, theater) {
        Some(cell) if applied => {
            let state = if cell.is_locked { "Locked" } else { "Unlocked" };
            println!("{} {} at ({}, {})", state, cell.id, date, theater);
            Ok(())
        }
        _ => bail!("no cell at ({}, {})", date, theater),
    }
}

pub fn color(ws: &Workspace, date: usize, theater: usize, color: String) -> Result<()> {
    let mut session = ws.open();
    if !session
        .set_color(date, theater, &color)
        .context("saving color change")?
    {
        bail!("slot ({}, {}) is outside the board", date, theater);
    }
    println!("Colored ({}, {}) {}", date, theater, color);
    Ok(())
}

pub fn edit(
    ws: &Workspace,
    date: usize,
    theater: usize,
    content: String,
    font: String,
    text_color: String,
) -> Result<()> {
    let mut session = ws.open();
    session.edit_entry(date, theater)?;
    session
        .edit_content(date, theater, &content, &font, &text_color)
        .context("saving edit")?;
    println!("Updated ({}, {})", date, theater);
    Ok(())
}

pub fn rename(ws: &mut Workspace, labels: Vec<String>) -> Result<()> {
    let mut session = ws.open();
    session
        .rename_columns(labels.clone())
        .context("saving renamed columns")?;
    ws.config.column_labels = labels;
    ws.config
        .save(&ws.config_path)
        .with_context(|| format!("writing config {:?}", ws.config_path))?;
    info!("column labels saved to {:?}", ws.config_path);
    println!("Board now has {} columns", ws.config.column_labels.len());
    Ok(())
}

pub fn add_year(ws: &Workspace) -> Result<()> {
    let mut session = ws.open();
    let Some(year) = session.add_year().context("saving new year")? else {
        bail!("board already spans the maximum of {} years", dates::MAX_YEARS);
    };
    println!(
        "Added year {} (board now {} rows)",
        year,
        session.board().grid().height()
    );
    Ok(())
}

pub fn toggle_year(ws: &Workspace, year: u32) -> Result<()> {
    let mut session = ws.open();
    if !session
        .toggle_year_visibility(year)
        .context("saving year visibility")?
    {
        bail!(
            "year {} does not exist (board has {} years)",
            year,
            session.board().number_of_years()
        );
    }
    let state = if session.board().visible_years().contains(&year) {
        "visible"
    } else {
        "hidden"
    };
    println!("Year {} is now {}", year, state);
    Ok(())
}

pub fn import(ws: &Workspace, file: &Path, confirmed: bool) -> Result<()> {
    if !confirmed {
        bail!("importing erases the current board; re-run with --yes to confirm");
    }
    let mut session = ws.open();
    session
        .import_file(file)
        .with_context(|| format!("importing {}", file.display()))?;
    println!(
        "Imported {} into {}",
        file.display(),
        ws.data_path.display()
    );
    Ok(())
}

pub fn export(ws: &Workspace, file: &Path) -> Result<()> {
    let session = ws.open();
    write_snapshot(file, &session.snapshot())
        .with_context(|| format!("exporting to {}", file.display()))?;
    println!("Exported board to {}", file.display());
    Ok(())
}

fn print_holding_area(board: &Board) {
    println!("Holding area ({})", board.holding_area().len());
    if board.holding_area().is_empty() {
        println!("  (empty)");
    }
    for cell in board.holding_area() {
        print!("  ");
        print_cell(cell);
    }
}

fn print_cell(cell: &Cell) {
    let mut line = format!("{} \"{}\"", cell.id, cell.content);
    if cell.is_locked {
        line.push_str(" [locked]");
    }
    if let Some(color) = &cell.color {
        line.push_str(&format!(" bg={}", color));
    }
    if let Some(text_color) = &cell.text_color {
        line.push_str(&format!(" fg={}", text_color));
    }
    println!("{}", line);
}
