/// Progressive page loading
///
/// Each page gets one async load: read the entry bytes from the archive,
/// decode them on a blocking thread, and hand back an iced image handle
/// ready for display. Loads for all pages run concurrently; results are
/// written into the pre-sized slot array by index, so completion order
/// never affects page order.

use iced::widget::image::Handle;
use tokio::task;

use crate::archive::Archive;
use crate::page::sequence::PageEntry;

/// Lifecycle of one page slot
///
/// A slot settles from `Pending` into `Loaded` or `Error` exactly once
/// and never reverts. Dropping a `Loaded` status releases the decoded
/// image memory behind the handle.
#[derive(Debug, Clone)]
pub enum PageStatus {
    /// Load still in flight
    Pending,
    /// Decoded and ready to display
    Loaded(Handle),
    /// This page failed to decode; the rest of the comic is unaffected
    Error(String),
}

/// One slot of the page-state array, addressed by sequence index
#[derive(Debug, Clone)]
pub struct PageSlot {
    /// Entry name inside the archive (also the display filename)
    pub filename: String,
    /// Page number the sequencer extracted
    pub number: u64,
    pub status: PageStatus,
}

impl PageSlot {
    /// Fresh slot for a sequenced page, load not yet finished
    pub fn pending(entry: &PageEntry) -> Self {
        PageSlot {
            filename: entry.name.clone(),
            number: entry.number,
            status: PageStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, PageStatus::Pending)
    }
}

/// Load and decode one page into a display handle
///
/// # Arguments
/// * `archive` - Shared handle to the opened archive
/// * `entry_name` - Name of the image entry to load
///
/// # Returns
/// * `Ok(handle)` - Display-ready image handle
/// * `Err(String)` - Reason this one page failed; never aborts the batch
pub async fn load_page(archive: Archive, entry_name: String) -> Result<Handle, String> {
    let bytes = archive.read_entry(entry_name.clone()).await?;

    // Decoding is CPU-heavy, keep it off the UI timeline
    task::spawn_blocking(move || decode_page(&entry_name, &bytes))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
}

/// Blocking decode of raw entry bytes into an RGBA image handle
fn decode_page(entry_name: &str, bytes: &[u8]) -> Result<Handle, String> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| format!("Failed to decode '{}': {}", entry_name, e))?;

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(Handle::from_rgba(width, height, rgba.into_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ArchiveEntry;
    use crate::page::sequence;

    #[test]
    fn test_slots_start_pending() {
        let entries = vec![
            ArchiveEntry {
                name: "page1.png".to_string(),
                is_file: true,
            },
            ArchiveEntry {
                name: "page2.png".to_string(),
                is_file: true,
            },
        ];

        let slots: Vec<PageSlot> = sequence::sequence(&entries)
            .iter()
            .map(PageSlot::pending)
            .collect();

        assert_eq!(slots.len(), 2);
        assert!(slots.iter().all(|s| s.is_pending()));
        assert_eq!(slots[0].filename, "page1.png");
        assert_eq!(slots[0].number, 1);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = decode_page("page1.png", b"definitely not an image");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("page1.png"));
    }

    #[test]
    fn test_decode_accepts_real_png() {
        // Smallest meaningful image: encode a 2x2 white PNG in memory
        let mut bytes = Vec::new();
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([255; 4]));
        image::DynamicImage::ImageRgba8(img)
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .unwrap();

        assert!(decode_page("page1.png", &bytes).is_ok());
    }
}
