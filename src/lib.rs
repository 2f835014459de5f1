//! Searchable, sortable, paginated view over an in-memory record set.
//!
//! The core lives in [`grid`]: a [`grid::Grid`] owns a [`record::RecordStore`] and a
//! [`column::ColumnRegistry`] and rebuilds its filtered view on every search or column
//! toggle. The remaining modules are the terminal front-end driving it.

pub mod column;
pub mod controller;
pub mod debounce;
pub mod domain;
pub mod filter;
pub mod grid;
pub mod inputter;
pub mod model;
pub mod pagination;
pub mod record;
pub mod sort;
pub mod ui;
