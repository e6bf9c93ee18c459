/// State management module
///
/// This module handles all application state, including:
/// - The page-state array, cursor, and navigation rules (viewer.rs)
/// - Persisted reader settings such as reading direction (settings.rs)

pub mod settings;
pub mod viewer;

pub use settings::{ReadingDirection, Settings};
pub use viewer::{NavAction, ViewerState};
