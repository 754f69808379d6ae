mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use commands::Workspace;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let mut ws = Workspace::resolve(args.config, args.data)?;
    skedbord::logging::init(&ws.config.log_level);
    let command = args.command.unwrap_or(cli::Command::Show {
        all: false,
        holding: false,
    });
    match command {
        cli::Command::Init => commands::init(&ws),
        cli::Command::Show { all, holding } => commands::show(&ws, all, holding),
        cli::Command::Dates { years } => commands::dates(&ws, years),
        cli::Command::Place {
            cell_id,
            date,
            theater,
        } => commands::place(&ws, cell_id, date, theater),
        cli::Command::Lock { date, theater } => commands::lock(&ws, date, theater),
        cli::Command::Color {
            date,
            theater,
            color,
        } => commands::color(&ws, date, theater, color),
        cli::Command::Edit {
            date,
            theater,
            content,
            font,
            text_color,
        } => commands::edit(&ws, date, theater, content, font, text_color),
        cli::Command::Rename { labels } => commands::rename(&mut ws, labels),
        cli::Command::AddYear => commands::add_year(&ws),
        cli::Command::ToggleYear { year } => commands::toggle_year(&ws, year),
        cli::Command::Import { file, yes } => commands::import(&ws, &file, yes),
        cli::Command::Export { file } => commands::export(&ws, &file),
    }
}
