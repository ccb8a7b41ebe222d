use crate::core::catalog::EntryDetail;
use crate::core::loader::{LoadProgress, LoadReport};

/// Events flowing through the Elm-architecture event loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
    /// A loader batch finished.
    LoadProgress(LoadProgress),
    /// The loader finished; failed items were already skipped.
    CatalogLoaded(LoadReport),
    /// The index fetch failed. Nothing to browse.
    CatalogFailed(String),
    /// A resolved action to execute.
    Action(Action),
}

/// Result of a detail fetch, tagged with the identifier it was issued for.
#[derive(Debug, Clone)]
pub enum DetailOutcome {
    Loaded { id: u32, detail: Box<EntryDetail> },
    Failed { id: u32, reason: String },
}

impl DetailOutcome {
    pub fn id(&self) -> u32 {
        match self {
            Self::Loaded { id, .. } | Self::Failed { id, .. } => *id,
        }
    }
}

/// High-level actions dispatched by views and global keybindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    OpenDetail(u32),
    BackToCatalog,
    ShowHelp,
    CloseHelp,
    Quit,
}

/// Which screen is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Catalog,
    Detail(u32),
}

impl Route {
    pub fn label(self) -> &'static str {
        match self {
            Route::Catalog => "Catalog",
            Route::Detail(_) => "Detail",
        }
    }
}

/// Notification level for the overlay system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A timed notification shown in the overlay.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub level: NotificationLevel,
    /// Ticks remaining before auto-dismiss.
    pub ttl_ticks: u32,
}
