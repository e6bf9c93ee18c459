use thiserror::Error;

/// Errors that abort an archive load.
///
/// Per-page decode failures are deliberately *not* represented here:
/// they are recorded in the failing page's slot and only shown when the
/// user navigates to that page. Everything in this enum resets the
/// reader back to the "no comic loaded" state.
#[derive(Debug, Clone, Error)]
pub enum ReaderError {
    /// No decoder is available for this container type (e.g. cbr/rar).
    #[error("No decoder available for '{0}' archives. Supported: cbz, zip.")]
    UnsupportedFormat(String),

    /// The selected file is not a valid or readable archive.
    #[error("Error reading comic file: {0}")]
    Open(String),

    /// The archive opened fine but contains no recognized image entries.
    #[error("No valid images found in the archive")]
    NoImages,
}
