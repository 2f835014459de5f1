use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tablegrid::controller::Controller;
use tablegrid::domain::{GridConfig, GridError};
use tablegrid::model::{Model, Status};
use tablegrid::record::RecordStore;
use tablegrid::ui::{MAX_COLUMN_WIDTH, TableUI};

/// Browse a json array of records: search, sort, hide columns and page through them.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Json file holding an array of records
    path: String,

    /// Records per page
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    page_size: Option<u64>,

    /// Quiet period in milliseconds before a search is applied
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Write logs to this file, filtered by RUST_LOG
    #[arg(long)]
    log: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Err(e) => {
            ratatui::restore();
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => {
            ratatui::restore();
            ExitCode::SUCCESS
        }
    }
}

fn expand_path(path: &str) -> Result<PathBuf, GridError> {
    shellexpand::full(path)
        .map(|p| PathBuf::from(p.as_ref()))
        .map_err(|e| GridError::LoadingFailed(e.to_string()))
}

fn init_logging(path: &str) -> Result<(), GridError> {
    let file = File::create(expand_path(path)?)?;
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            fmt::layer()
                .with_writer(Arc::new(file))
                .with_ansi(false),
        )
        .with(ErrorLayer::default())
        .init();
    Ok(())
}

fn run(args: Args) -> Result<(), GridError> {
    if let Some(log) = &args.log {
        init_logging(log)?;
    }

    let mut cfg = GridConfig::default();
    if let Some(page_size) = args.page_size {
        cfg = cfg.page_size(page_size as usize);
    }
    if let Some(ms) = args.debounce_ms {
        cfg = cfg.search_debounce(Duration::from_millis(ms));
    }
    info!("Starting tg with {cfg:?}");

    let path = expand_path(&args.path)?;
    let store = RecordStore::load(&path)?;
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("???")
        .to_string();

    let mut model = Model::init(&cfg, name, store);
    let ui = TableUI::new(MAX_COLUMN_WIDTH);
    let controller = Controller::new(&cfg);

    let mut terminal = ratatui::init();

    while model.status != Status::Quitting {
        // Render the current view
        terminal.draw(|f| ui.draw(&model, f))?;

        // Handle events and map to a Message
        let message = controller.handle_event(&model)?;
        model.update(message, Instant::now());
        model.tick(Instant::now());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_must_be_positive() {
        assert!(Args::try_parse_from(["tg", "data.json", "--page-size", "0"]).is_err());
        assert!(Args::try_parse_from(["tg", "data.json", "--page-size", "-2"]).is_err());
        let args = Args::try_parse_from(["tg", "data.json", "--page-size", "3"]).unwrap();
        assert_eq!(args.page_size, Some(3));
        assert_eq!(Args::try_parse_from(["tg", "data.json"]).unwrap().page_size, None);
    }
}
