/// Viewer state: the page array, the cursor, and the rules for moving it
///
/// One `ViewerState` owns everything a loaded comic needs: the pre-sized
/// slot array the progressive loader writes into, the current page index,
/// and a load generation counter that fences off results from archives
/// the user has already abandoned.

use iced::widget::image::Handle;

use crate::page::loader::{PageSlot, PageStatus};
use crate::page::sequence::PageEntry;
use crate::state::settings::ReadingDirection;

/// Physical navigation request (button or arrow key)
///
/// Whether it advances or retreats through the comic depends on the
/// configured reading direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Next,
    Previous,
}

/// State of the currently loaded comic
#[derive(Debug, Default)]
pub struct ViewerState {
    /// One slot per page, fixed length for the lifetime of a load
    pages: Vec<PageSlot>,
    /// Current page index; always < pages.len() when pages exist
    current: usize,
    /// True from archive selection until every slot has settled
    loading: bool,
    /// Bumped on every reset; results tagged with an older value are stale
    generation: u64,
}

impl ViewerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard the previous comic and start a new load generation
    ///
    /// Dropping the old slots releases every decoded image handle before
    /// the next archive pre-allocates its own array.
    pub fn reset(&mut self) -> u64 {
        self.pages.clear();
        self.current = 0;
        self.loading = false;
        self.generation += 1;
        self.generation
    }

    /// Start opening a newly selected archive
    ///
    /// Resets first, then raises the loading flag so the UI reports
    /// "Loading..." while the archive is being opened and sequenced.
    pub fn begin_open(&mut self) -> u64 {
        let generation = self.reset();
        self.loading = true;
        generation
    }

    /// Pre-allocate the slot array for a freshly sequenced archive
    pub fn begin_load(&mut self, entries: &[PageEntry]) {
        self.pages = entries.iter().map(PageSlot::pending).collect();
        self.current = 0;
        self.loading = true;
    }

    /// Record one page-load result
    ///
    /// Ignores results from a previous generation and results for slots
    /// that already settled, so a slot transitions out of Pending at most
    /// once. Returns true when the result was applied.
    pub fn record(
        &mut self,
        generation: u64,
        index: usize,
        result: Result<Handle, String>,
    ) -> bool {
        if generation != self.generation {
            return false;
        }

        let Some(slot) = self.pages.get_mut(index) else {
            return false;
        };
        if !slot.is_pending() {
            return false;
        }

        slot.status = match result {
            Ok(handle) => PageStatus::Loaded(handle),
            Err(reason) => PageStatus::Error(reason),
        };

        if self.is_complete() {
            self.loading = false;
        }

        true
    }

    /// Current load generation, attached to every in-flight task
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True once every slot has left Pending (and pages exist)
    pub fn is_complete(&self) -> bool {
        !self.pages.is_empty() && self.pages.iter().all(|slot| !slot.is_pending())
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_slot(&self) -> Option<&PageSlot> {
        self.pages.get(self.current)
    }

    /// Number of pages that settled as errors
    pub fn failed_count(&self) -> usize {
        self.pages
            .iter()
            .filter(|slot| matches!(slot.status, PageStatus::Error(_)))
            .count()
    }

    /// Percentage of slots that have settled, for the progress bar
    pub fn progress_percent(&self) -> f32 {
        if self.pages.is_empty() {
            return 0.0;
        }

        let settled = self.pages.iter().filter(|slot| !slot.is_pending()).count();
        settled as f32 * 100.0 / self.pages.len() as f32
    }

    /// Move the cursor for a physical next/previous action
    ///
    /// Right-to-left reading inverts which action advances. Clamped at
    /// both ends; out-of-bounds requests are no-ops. Navigation stays
    /// disabled until the first page of a fresh load has settled, after
    /// which partially loaded comics are navigable.
    pub fn advance(&mut self, action: NavAction, direction: ReadingDirection) -> bool {
        if !self.can_advance(action, direction) {
            return false;
        }

        match self.step(action, direction) {
            1 => self.current += 1,
            -1 => self.current -= 1,
            _ => unreachable!(),
        }

        true
    }

    /// Whether a physical action would move the cursor right now
    pub fn can_advance(&self, action: NavAction, direction: ReadingDirection) -> bool {
        if self.pages.is_empty() {
            return false;
        }

        // First page still decoding: the comic is not ready to browse yet
        if self.pages[0].is_pending() {
            return false;
        }

        match self.step(action, direction) {
            1 => self.current + 1 < self.pages.len(),
            -1 => self.current > 0,
            _ => unreachable!(),
        }
    }

    /// Signed cursor delta for a physical action under a reading direction
    fn step(&self, action: NavAction, direction: ReadingDirection) -> i8 {
        match (action, direction) {
            (NavAction::Next, ReadingDirection::LeftToRight) => 1,
            (NavAction::Previous, ReadingDirection::LeftToRight) => -1,
            (NavAction::Next, ReadingDirection::RightToLeft) => -1,
            (NavAction::Previous, ReadingDirection::RightToLeft) => 1,
        }
    }

    /// Human-readable page status line, mirroring the classic reader UI
    pub fn page_info(&self) -> String {
        if !self.pages.is_empty() {
            format!("Page {} of {}", self.current + 1, self.pages.len())
        } else if self.loading {
            "Loading...".to_string()
        } else {
            "No comic loaded".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(count: usize) -> Vec<PageEntry> {
        (1..=count)
            .map(|i| PageEntry {
                name: format!("page{}.png", i),
                number: i as u64,
            })
            .collect()
    }

    fn handle() -> Handle {
        Handle::from_rgba(1, 1, vec![0u8; 4])
    }

    fn loaded_viewer(count: usize) -> ViewerState {
        let mut viewer = ViewerState::new();
        let generation = viewer.reset();
        viewer.begin_load(&entries(count));
        for i in 0..count {
            viewer.record(generation, i, Ok(handle()));
        }
        viewer
    }

    #[test]
    fn test_slots_settle_exactly_once() {
        let mut viewer = ViewerState::new();
        let generation = viewer.reset();
        viewer.begin_load(&entries(3));

        assert!(viewer.record(generation, 1, Ok(handle())));
        // Second write to the same slot must be ignored
        assert!(!viewer.record(generation, 1, Err("late failure".to_string())));

        match &viewer.current_slot().unwrap().status {
            PageStatus::Pending => {}
            other => panic!("slot 0 should still be pending, got {:?}", other),
        }
    }

    #[test]
    fn test_completion_fires_when_all_settle() {
        let mut viewer = ViewerState::new();
        let generation = viewer.reset();
        viewer.begin_load(&entries(2));

        assert!(viewer.is_loading());
        viewer.record(generation, 0, Ok(handle()));
        assert!(!viewer.is_complete());

        // A per-page failure still counts as settled
        viewer.record(generation, 1, Err("corrupt".to_string()));
        assert!(viewer.is_complete());
        assert!(!viewer.is_loading());
        assert_eq!(viewer.progress_percent(), 100.0);
    }

    #[test]
    fn test_stale_generation_is_discarded() {
        let mut viewer = ViewerState::new();
        let old_generation = viewer.reset();
        viewer.begin_load(&entries(3));

        // User selects a new archive while page 3 is still in flight
        let new_generation = viewer.reset();
        viewer.begin_load(&entries(2));

        assert!(!viewer.record(old_generation, 2, Ok(handle())));
        assert_eq!(viewer.page_count(), 2);
        assert!(viewer.pages.iter().all(|slot| slot.is_pending()));

        assert!(viewer.record(new_generation, 0, Ok(handle())));
    }

    #[test]
    fn test_navigation_disabled_until_first_page_settles() {
        let mut viewer = ViewerState::new();
        let generation = viewer.reset();
        viewer.begin_load(&entries(3));

        let ltr = ReadingDirection::LeftToRight;
        assert!(!viewer.advance(NavAction::Next, ltr));

        viewer.record(generation, 0, Ok(handle()));
        assert!(viewer.advance(NavAction::Next, ltr));
        assert_eq!(viewer.current_index(), 1);
    }

    #[test]
    fn test_navigating_onto_pending_slot_is_allowed() {
        let mut viewer = ViewerState::new();
        let generation = viewer.reset();
        viewer.begin_load(&entries(3));
        viewer.record(generation, 0, Ok(handle()));

        // Page 2 is still pending; moving onto it is fine, the view shows
        // a loading indicator for that slot
        assert!(viewer.advance(NavAction::Next, ReadingDirection::LeftToRight));
        assert!(viewer.current_slot().unwrap().is_pending());
    }

    #[test]
    fn test_clamped_at_bounds() {
        let mut viewer = loaded_viewer(2);
        let ltr = ReadingDirection::LeftToRight;

        assert!(!viewer.advance(NavAction::Previous, ltr));
        assert_eq!(viewer.current_index(), 0);

        assert!(viewer.advance(NavAction::Next, ltr));
        assert!(!viewer.advance(NavAction::Next, ltr));
        assert_eq!(viewer.current_index(), 1);
    }

    #[test]
    fn test_right_to_left_inverts_next() {
        // Manga mode: cursor at index 2 of 5, "next" moves back to 1
        let mut viewer = loaded_viewer(5);
        let rtl = ReadingDirection::RightToLeft;

        viewer.current = 2;
        assert!(viewer.advance(NavAction::Next, rtl));
        assert_eq!(viewer.current_index(), 1);

        assert!(viewer.advance(NavAction::Previous, rtl));
        assert_eq!(viewer.current_index(), 2);
    }

    #[test]
    fn test_empty_viewer_navigation_is_noop() {
        let mut viewer = ViewerState::new();
        assert!(!viewer.advance(NavAction::Next, ReadingDirection::LeftToRight));
        assert_eq!(viewer.current_index(), 0);
        assert_eq!(viewer.page_info(), "No comic loaded");
    }

    #[test]
    fn test_reset_clears_pages_and_cursor() {
        let mut viewer = loaded_viewer(4);
        viewer.current = 3;

        viewer.reset();
        assert_eq!(viewer.page_count(), 0);
        assert_eq!(viewer.current_index(), 0);
        assert!(!viewer.is_loading());
    }

    #[test]
    fn test_page_info_strings() {
        let mut viewer = ViewerState::new();
        assert_eq!(viewer.page_info(), "No comic loaded");

        viewer.begin_open();
        assert_eq!(viewer.page_info(), "Loading...");

        viewer.begin_load(&entries(3));
        assert_eq!(viewer.page_info(), "Page 1 of 3");
    }
}
