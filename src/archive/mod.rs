/// Archive access module
///
/// This module handles:
/// - Opening cbz/zip comic archives and listing their entries (reader.rs)
/// - Reading individual entry bytes on demand for the page loader

pub mod reader;

pub use reader::{Archive, ArchiveEntry};
