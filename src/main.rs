//! Pokedex CLI - interactive browser plus headless `list` / `show`.

mod commands;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use miette::IntoDiagnostic;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use pokedex::config::AppConfig;
use pokedex::core::logging::{self, AppError};
use pokedex::tui::app::AppState;
use pokedex::tui::services::Services;

#[derive(Parser)]
#[command(name = "pokedex")]
#[command(about = "Browse the national Pokédex in the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive browser (default)
    Tui,

    /// Load the catalog and print one filtered page
    List {
        /// Name substring or identifier digits
        #[arg(long)]
        search: Option<String>,

        /// Category tag, e.g. "fire"
        #[arg(long = "type")]
        category: Option<String>,

        /// Generation band 1-8
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=8))]
        generation: Option<u8>,

        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Fetch and print one detail record
    Show {
        /// National identifier
        id: u32,
    },
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            let _log_guard = logging::init_tui();
            let config = load_config(cli.config.as_deref());
            log::info!("Pokedex v{} starting", pokedex::VERSION);
            run_tui(config).await
        }
        Commands::List {
            search,
            category,
            generation,
            page,
        } => {
            let _log_guard = logging::init();
            let config = load_config(cli.config.as_deref());
            let query = commands::ListQuery {
                search,
                category,
                generation,
                page,
            };
            commands::list(&config, &query).await
        }
        Commands::Show { id } => {
            let _log_guard = logging::init();
            let config = load_config(cli.config.as_deref());
            commands::show(&config, id).await
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> AppConfig {
    match path {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
}

async fn run_tui(config: AppConfig) -> miette::Result<()> {
    let tick_rate = Duration::from_millis(config.tui.tick_rate_ms);
    let mouse = config.tui.mouse_enabled;

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let services = Services::init(config, event_tx).map_err(|e| {
        AppError::new(format!("Failed to build the HTTP client: {e}"))
            .with_help("Check the [api] section of the config file")
    })?;
    let mut app = AppState::new(event_rx, services);

    // Setup terminal
    enable_raw_mode().into_diagnostic()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).into_diagnostic()?;
    if mouse {
        execute!(stdout, EnableMouseCapture).into_diagnostic()?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).into_diagnostic()?;

    let result = app.run(&mut terminal, tick_rate).await;

    // Restore terminal
    disable_raw_mode().into_diagnostic()?;
    if mouse {
        execute!(terminal.backend_mut(), DisableMouseCapture).into_diagnostic()?;
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen).into_diagnostic()?;
    terminal.show_cursor().into_diagnostic()?;

    log::info!("Pokedex exiting");
    result.into_diagnostic()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_tui() {
        let cli = Cli::try_parse_from(["pokedex"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_list_flags() {
        let cli = Cli::try_parse_from([
            "pokedex", "list", "--search", "char", "--type", "fire", "--generation", "1",
            "--page", "2", "--config", "/tmp/p.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/p.toml")));
        match cli.command {
            Some(Commands::List {
                search,
                category,
                generation,
                page,
            }) => {
                assert_eq!(search.as_deref(), Some("char"));
                assert_eq!(category.as_deref(), Some("fire"));
                assert_eq!(generation, Some(1));
                assert_eq!(page, 2);
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_generation_out_of_range_rejected() {
        assert!(Cli::try_parse_from(["pokedex", "list", "--generation", "9"]).is_err());
        assert!(Cli::try_parse_from(["pokedex", "list", "--generation", "0"]).is_err());
    }

    #[test]
    fn test_show_requires_id() {
        assert!(Cli::try_parse_from(["pokedex", "show"]).is_err());
        let cli = Cli::try_parse_from(["pokedex", "show", "25"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Show { id: 25 })));
    }
}
