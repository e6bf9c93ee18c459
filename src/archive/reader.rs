/// Comic archive reader
///
/// Opens a cbz/zip file, lists its entries once up front, and reads
/// individual entry bytes on demand. All actual zip I/O is CPU/disk-bound,
/// so it runs inside `spawn_blocking`; the archive handle itself is a
/// cheap clone that the concurrent page loads share.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::task;
use zip::ZipArchive;

use crate::error::ReaderError;

/// One named member of an opened archive
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    /// Full path of the entry inside the archive
    pub name: String,
    /// Directories inside the zip are listed too; only files hold pages
    pub is_file: bool,
}

/// Handle to an opened comic archive.
///
/// Cloning is cheap (shared `Arc`). The inner mutex serializes entry
/// reads, so any number of page-load tasks can hold a clone and issue
/// reads concurrently without coordinating.
#[derive(Clone)]
pub struct Archive {
    inner: Arc<Mutex<ZipArchive<File>>>,
    path: PathBuf,
}

/// Container extensions we can actually decode
const SUPPORTED_EXTENSIONS: [&str; 2] = ["cbz", "zip"];

impl Archive {
    /// Open a comic archive and list its entries
    ///
    /// # Arguments
    /// * `path` - Path to the selected archive file
    ///
    /// # Returns
    /// * `Ok((archive, entries))` - Handle for later reads plus the full entry list
    /// * `Err(ReaderError)` - Unsupported container or unreadable archive
    pub async fn open(path: PathBuf) -> Result<(Archive, Vec<ArchiveEntry>), ReaderError> {
        task::spawn_blocking(move || open_blocking(&path))
            .await
            .map_err(|e| ReaderError::Open(format!("Task join error: {}", e)))?
    }

    /// Read the raw bytes of one entry by name
    ///
    /// Errors are returned as plain strings: a failed entry read is a
    /// per-page problem and must not look like a whole-archive failure.
    pub async fn read_entry(&self, name: String) -> Result<Vec<u8>, String> {
        let inner = Arc::clone(&self.inner);

        task::spawn_blocking(move || {
            let mut archive = inner
                .lock()
                .map_err(|_| "Archive handle poisoned".to_string())?;

            let mut entry = archive
                .by_name(&name)
                .map_err(|e| format!("Failed to locate entry '{}': {}", name, e))?;

            let mut bytes = Vec::with_capacity(entry.size() as usize);
            std::io::Read::read_to_end(&mut entry, &mut bytes)
                .map_err(|e| format!("Failed to read entry '{}': {}", name, e))?;

            Ok(bytes)
        })
        .await
        .map_err(|e| format!("Task join error: {}", e))?
    }

    /// Path of the archive file this handle was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Blocking implementation of archive opening
fn open_blocking(path: &Path) -> Result<(Archive, Vec<ArchiveEntry>), ReaderError> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ReaderError::UnsupportedFormat(extension));
    }

    let file = File::open(path)
        .map_err(|e| ReaderError::Open(format!("{}: {}", path.display(), e)))?;

    let mut archive =
        ZipArchive::new(file).map_err(|e| ReaderError::Open(e.to_string()))?;

    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let entry = archive
            .by_index(i)
            .map_err(|e| ReaderError::Open(e.to_string()))?;

        entries.push(ArchiveEntry {
            name: entry.name().to_string(),
            is_file: entry.is_file(),
        });
    }

    println!("📦 Opened archive with {} entries: {}", entries.len(), path.display());

    let archive = Archive {
        inner: Arc::new(Mutex::new(archive)),
        path: path.to_path_buf(),
    };

    Ok((archive, entries))
}

// ZipArchive has no Debug impl, so we provide a readable one by hand
impl std::fmt::Debug for Archive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Archive").field("path", &self.path).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_missing_file() {
        let result = Archive::open(PathBuf::from("/nonexistent/comic.cbz")).await;
        assert!(matches!(result, Err(ReaderError::Open(_))));
    }

    #[tokio::test]
    async fn test_open_unsupported_container() {
        let result = Archive::open(PathBuf::from("/tmp/comic.cbr")).await;
        match result {
            Err(ReaderError::UnsupportedFormat(ext)) => assert_eq!(ext, "cbr"),
            other => panic!("expected UnsupportedFormat, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_open_not_an_archive() {
        // A real file that is definitely not a zip
        let path = std::env::temp_dir().join("not_a_comic.zip");
        std::fs::write(&path, b"plain text, not a zip").unwrap();

        let result = Archive::open(path.clone()).await;
        assert!(matches!(result, Err(ReaderError::Open(_))));

        let _ = std::fs::remove_file(path);
    }
}
