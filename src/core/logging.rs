//! Logging and terminal output.
//!
//! - JSON rolling log files with background gzip of old days (tracing-appender, flate2)
//! - Human-readable stderr output for the headless commands
//! - miette error reporting tuned to the detected terminal
//! - indicatif styles for the catalog download

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use console::style;
use flate2::write::GzEncoder;
use flate2::Compression;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use miette::Diagnostic;
use supports_color::Stream;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::AppConfig;

/// Base name of the rolling log file.
pub const LOG_FILE_NAME: &str = "pokedex.log";

static TERMINAL_CAPS: OnceLock<TerminalCapabilities> = OnceLock::new();

fn get_terminal_caps() -> &'static TerminalCapabilities {
    TERMINAL_CAPS.get_or_init(TerminalCapabilities::detect)
}

// ============================================================================
// Terminal Capability Detection
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorLevel {
    /// 24-bit color; also enables terminal hyperlinks in diagnostics.
    TrueColor,
    Basic,
    NoColor,
}

#[derive(Debug, Clone)]
pub struct TerminalCapabilities {
    pub color_level: ColorLevel,
    pub supports_unicode: bool,
    pub is_interactive: bool,
}

impl TerminalCapabilities {
    pub fn detect() -> Self {
        use is_terminal::IsTerminal;

        let color_level = match supports_color::on(Stream::Stderr) {
            Some(support) if support.has_16m => ColorLevel::TrueColor,
            Some(support) if support.has_basic => ColorLevel::Basic,
            _ => ColorLevel::NoColor,
        };

        let is_interactive = io::stderr().is_terminal();

        let supports_unicode = std::env::var("TERM")
            .map(|t| !t.contains("dumb"))
            .unwrap_or(true)
            && std::env::var("LANG")
                .map(|l| l.contains("UTF-8") || l.contains("utf8"))
                .unwrap_or(true);

        Self {
            color_level,
            supports_unicode,
            is_interactive,
        }
    }

    pub fn should_colorize(&self) -> bool {
        self.is_interactive && self.color_level != ColorLevel::NoColor
    }
}

// ============================================================================
// Logging Initialization
// ============================================================================

fn prepare_log_dir() -> PathBuf {
    let log_dir = AppConfig::log_dir();
    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(&log_dir) {
            eprintln!("Failed to create logs directory: {}", e);
        }
    }
    log_dir
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize logging for the headless commands.
///
/// Sets up a JSON file layer (daily rolling) plus a compact stderr layer,
/// bridges `log` macros into tracing and installs the miette hook.
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init() -> WorkerGuard {
    let log_dir = prepare_log_dir();

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true)
        .with_filter(env_filter());

    // stdout carries command output, so diagnostics go to stderr
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .compact()
        .with_ansi(get_terminal_caps().should_colorize())
        .with_filter(env_filter());

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();

    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to initialize LogTracer: {}", e);
    }

    init_miette();

    let log_dir_clone = log_dir.clone();
    std::thread::spawn(move || {
        compress_old_logs(&log_dir_clone);
    });

    log::debug!(
        "Logging initialized. Writing to: {:?} (daily rolling)",
        log_dir.join(LOG_FILE_NAME)
    );

    guard
}

/// Initialize logging for TUI mode.
///
/// Same as [`init()`] without the stderr layer: ratatui owns the terminal.
pub fn init_tui() -> WorkerGuard {
    let log_dir = prepare_log_dir();

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true)
        .with_filter(env_filter());

    tracing_subscriber::registry().with(file_layer).init();

    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to initialize LogTracer: {}", e);
    }

    init_miette();

    let log_dir_clone = log_dir.clone();
    std::thread::spawn(move || {
        compress_old_logs(&log_dir_clone);
    });

    guard
}

/// Rolled files look like `pokedex.log.YYYY-MM-DD`; today's stays open.
fn should_compress(file_name: &str, today_suffix: &str) -> bool {
    file_name.starts_with(&format!("{LOG_FILE_NAME}."))
        && !file_name.ends_with(today_suffix)
        && !file_name.ends_with(".gz")
}

fn compress_old_logs(log_dir: &Path) {
    let today_suffix = chrono::Local::now().format("%Y-%m-%d").to_string();

    let Ok(entries) = fs::read_dir(log_dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !should_compress(name, &today_suffix) {
            continue;
        }
        match compress_file(&path) {
            Ok(()) => log::info!("Compressed old log: {:?}", path),
            Err(e) => log::warn!("Failed to compress old log {:?}: {}", path, e),
        }
    }
}

fn compress_file(path: &Path) -> io::Result<()> {
    let file = fs::File::open(path)?;
    let mut reader = io::BufReader::new(file);

    let mut gz_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No filename"))?
        .to_os_string();
    gz_name.push(".gz");
    let parent_dir = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No parent directory"))?;
    let gz_path = parent_dir.join(gz_name);

    if gz_path.exists() {
        return Ok(());
    }

    let output = fs::File::create(&gz_path)?;
    let mut encoder = GzEncoder::new(output, Compression::default());
    io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)?;
    Ok(())
}

fn init_miette() {
    let caps = get_terminal_caps();

    miette::set_hook(Box::new(move |_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(caps.color_level == ColorLevel::TrueColor)
                .unicode(caps.supports_unicode)
                .context_lines(3)
                .tab_width(4)
                .break_words(true)
                .color(caps.should_colorize())
                .build(),
        )
    }))
    .ok(); // already set
}

// ============================================================================
// Progress Bars (Indicatif Integration)
// ============================================================================

pub struct ProgressStyles;

impl ProgressStyles {
    /// Percentage bar for the batched catalog download.
    pub fn catalog_bar() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    pub fn spinner() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

/// Bar measured in percent (length 100), hidden when stderr is not a terminal.
pub fn catalog_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(100);
    if !get_terminal_caps().is_interactive {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    pb.set_style(ProgressStyles::catalog_bar());
    pb
}

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if !get_terminal_caps().is_interactive {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    pb.set_style(ProgressStyles::spinner());
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

// ============================================================================
// Diagnostic Error Types (miette integration)
// ============================================================================

/// Fatal error reported by the command-line front end.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code("POKEDEX::ERROR"))]
pub struct AppError {
    message: String,

    #[help]
    help_text: Option<String>,
}

impl AppError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            help_text: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help_text = Some(help.into());
        self
    }
}

/// The catalog index could not be fetched, so there is nothing to browse.
#[derive(Debug, Error, Diagnostic)]
#[error("Catalog index unreachable at {base_url}: {reason}")]
#[diagnostic(
    code("POKEDEX::INDEX_UNREACHABLE"),
    help("Check your network connection or the [api] base_url in the config file")
)]
pub struct IndexUnreachable {
    pub base_url: String,
    pub reason: String,
}

/// No detail record could be fetched for an identifier.
#[derive(Debug, Error, Diagnostic)]
#[error("Entry #{id:03} not found: {reason}")]
#[diagnostic(code("POKEDEX::NOT_FOUND"))]
pub struct EntryNotFound {
    pub id: u32,
    pub reason: String,

    #[help]
    pub hint: Option<String>,
}

impl EntryNotFound {
    pub fn new(id: u32, universe: u32, reason: impl Into<String>) -> Self {
        Self {
            id,
            reason: reason.into(),
            hint: Some(format!("Identifiers run from 1 to {universe}")),
        }
    }
}

// ============================================================================
// Console Output Utilities
// ============================================================================

pub fn print_success(message: &str) {
    let prefix = if get_terminal_caps().supports_unicode { "✓" } else { "[OK]" };
    eprintln!("{} {}", style(prefix).green(), style(message).green());
}

pub fn print_warning(message: &str) {
    let prefix = if get_terminal_caps().supports_unicode { "⚠" } else { "[WARN]" };
    eprintln!("{} {}", style(prefix).yellow(), style(message).yellow().bold());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    use flate2::read::GzDecoder;

    #[test]
    fn test_terminal_caps_detection() {
        let caps = TerminalCapabilities::detect();
        if caps.color_level == ColorLevel::NoColor {
            assert!(!caps.should_colorize());
        }
    }

    #[test]
    fn test_should_compress() {
        assert!(should_compress("pokedex.log.2026-01-02", "2026-01-03"));
        assert!(!should_compress("pokedex.log.2026-01-03", "2026-01-03"));
        assert!(!should_compress("pokedex.log.2026-01-02.gz", "2026-01-03"));
        assert!(!should_compress("other.log.2026-01-02", "2026-01-03"));
    }

    #[test]
    fn test_compress_file_replaces_original() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pokedex.log.2026-01-02");
        fs::File::create(&path)
            .unwrap()
            .write_all(b"{\"level\":\"INFO\"}\n")
            .unwrap();

        compress_file(&path).unwrap();

        assert!(!path.exists());
        let gz = dir.path().join("pokedex.log.2026-01-02.gz");
        let mut decoded = String::new();
        GzDecoder::new(fs::File::open(gz).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "{\"level\":\"INFO\"}\n");
    }

    #[test]
    fn test_compress_old_logs_skips_today() {
        let dir = tempfile::tempdir().unwrap();
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        let current = dir.path().join(format!("pokedex.log.{today}"));
        let old = dir.path().join("pokedex.log.2000-01-01");
        fs::write(&current, "today").unwrap();
        fs::write(&old, "old").unwrap();

        compress_old_logs(dir.path());

        assert!(current.exists());
        assert!(!old.exists());
        assert!(dir.path().join("pokedex.log.2000-01-01.gz").exists());
    }

    #[test]
    fn test_app_error() {
        let err = AppError::new("Failed to build the HTTP client")
            .with_help("Check the [api] section of the config file");

        assert_eq!(err.to_string(), "Failed to build the HTTP client");
        assert_eq!(
            err.help().map(|h| h.to_string()).as_deref(),
            Some("Check the [api] section of the config file")
        );
        assert!(AppError::new("plain").help().is_none());
    }

    #[test]
    fn test_not_found_message() {
        let err = EntryNotFound::new(7, 898, "status 404");
        assert_eq!(err.to_string(), "Entry #007 not found: status 404");
        assert_eq!(err.hint.as_deref(), Some("Identifiers run from 1 to 898"));
    }
}
