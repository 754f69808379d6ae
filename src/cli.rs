use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "skedbord", version, about = "Weekly theater screen scheduling board")]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Board data file (overrides the config)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default config and an empty board
    Init,
    /// Show placed cells for the visible years
    Show {
        /// Include hidden years
        #[arg(long)]
        all: bool,
        /// List the holding area only
        #[arg(long)]
        holding: bool,
    },
    /// Print the Friday for each board row
    Dates {
        /// Number of years to generate (defaults to the board's)
        #[arg(long)]
        years: Option<u32>,
    },
    /// Move a cell onto a slot, sending any occupant to the holding area
    Place {
        /// Id of the cell to move
        cell_id: String,
        /// Row index of the target week
        date: usize,
        /// Column index of the target screen
        theater: usize,
    },
    /// Lock or unlock the cell in a slot
    Lock { date: usize, theater: usize },
    /// Set the background color of a slot, creating a cell if empty
    Color {
        date: usize,
        theater: usize,
        /// Hex color such as #ffcc00
        color: String,
    },
    /// Edit the text of a slot (refused when the cell is locked)
    Edit {
        date: usize,
        theater: usize,
        content: String,
        /// Font family
        #[arg(long, default_value = "Arial, sans-serif")]
        font: String,
        /// Text color
        #[arg(long, default_value = "#000000")]
        text_color: String,
    },
    /// Replace the column labels
    Rename {
        /// New labels, in column order
        #[arg(required = true)]
        labels: Vec<String>,
    },
    /// Append a year of empty weeks
    AddYear,
    /// Show or hide a year
    ToggleYear { year: u32 },
    /// Replace the whole board with a snapshot file
    Import {
        file: PathBuf,
        /// Confirm that existing data will be erased
        #[arg(long)]
        yes: bool,
    },
    /// Write the current board to a snapshot file
    Export { file: PathBuf },
}
