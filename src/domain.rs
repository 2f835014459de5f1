use std::fmt;
use std::io::Error;
use std::time::Duration;

use derive_setters::Setters;
use ratatui::crossterm::event::KeyEvent;

pub const HELP_TEXT: &str = "\
Navigation
  j / Down        next row
  k / Up          previous row
  h / Left        previous column
  l / Right       next column
  n / PageDown    next page
  p / PageUp      previous page
  g / Home        first page
  G / End         last page

Table
  /               search across visible columns
  s               sort by selected column
  c               show / hide columns
  Enter           show record
  Esc             clear search, close popup
  ?               this help
  q               quit";

#[derive(Debug)]
pub enum GridError {
    IoError(Error),
    JsonError(serde_json::Error),
    InvalidRecord {
        index: usize,
        source: serde_json::Error,
    },
    NotAnArray,
    LoadingFailed(String),
    FileNotFound,
    PermissionDenied,
    UnknownFileType,
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::IoError(e) => write!(f, "io error: {e}"),
            GridError::JsonError(e) => write!(f, "invalid json: {e}"),
            GridError::InvalidRecord { index, source } => {
                write!(f, "record {index} does not fit the record shape: {source}")
            }
            GridError::NotAnArray => write!(f, "dataset must be a json array of records"),
            GridError::LoadingFailed(msg) => write!(f, "loading failed: {msg}"),
            GridError::FileNotFound => write!(f, "file not found"),
            GridError::PermissionDenied => write!(f, "permission denied"),
            GridError::UnknownFileType => write!(f, "unknown file type, expected .json"),
        }
    }
}

impl std::error::Error for GridError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GridError::IoError(e) => Some(e),
            GridError::JsonError(e) => Some(e),
            GridError::InvalidRecord { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<Error> for GridError {
    fn from(err: Error) -> Self {
        GridError::IoError(err)
    }
}

impl From<serde_json::Error> for GridError {
    fn from(err: serde_json::Error) -> Self {
        GridError::JsonError(err)
    }
}

#[derive(Debug, Clone, Setters)]
pub struct GridConfig {
    /// Milliseconds the controller waits for a terminal event per loop iteration.
    pub event_poll_time: u64,
    pub page_size: usize,
    /// Quiet period before a search input is applied.
    pub search_debounce: Duration,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            event_poll_time: 100,
            page_size: crate::pagination::DEFAULT_PAGE_SIZE,
            search_debounce: crate::debounce::DEFAULT_QUIET_PERIOD,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Quit,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    Sort,
    Search,
    Columns,
    ToggleColumn,
    Enter,
    Exit,
    Help,
    RawKey(KeyEvent),
}
