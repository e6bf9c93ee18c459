use iced::keyboard::{self, key};
use iced::widget::image::Handle;
use iced::widget::{button, column, container, progress_bar, row, text};
use iced::{window, Alignment, Element, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;

// Declare the application modules
mod archive;
mod error;
mod page;
mod state;

use archive::Archive;
use error::ReaderError;
use page::loader::{self, PageStatus};
use page::sequence::{self, PageEntry};
use state::{NavAction, Settings, ViewerState};

/// Main application state
struct ComicReader {
    /// Page slots, cursor, and load bookkeeping for the open comic
    viewer: ViewerState,
    /// Persisted preferences (reading direction)
    settings: Settings,
    /// Handle to the currently opened archive, shared by page loads
    archive: Option<Archive>,
    /// Status message to display to the user
    status: String,
    /// Last open-level error, cleared on the next successful open
    error: Option<String>,
    /// Whether the window is currently fullscreen
    fullscreen: bool,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked the "Open Comic" button
    OpenArchive,
    /// Archive opened and sequenced (or failed); tagged with its load generation
    ArchiveOpened(u64, Result<(Archive, Vec<PageEntry>), ReaderError>),
    /// One page finished loading; tagged with generation and slot index
    PageLoaded(u64, usize, Result<Handle, String>),
    /// Previous/next button or arrow key
    Navigate(NavAction),
    /// Flip between left-to-right and right-to-left reading
    ToggleDirection,
    /// Toggle window fullscreen
    ToggleFullscreen,
}

impl ComicReader {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let settings = Settings::load();
        println!("📖 Comic Reader initialized");

        (
            ComicReader {
                viewer: ViewerState::new(),
                settings,
                archive: None,
                status: String::from("Ready. Open a comic archive to start reading."),
                error: None,
                fullscreen: false,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::OpenArchive => {
                // Show the native file picker dialog
                let file = FileDialog::new()
                    .set_title("Select a Comic Archive")
                    .add_filter("Comic Archives", &["cbz", "zip"])
                    .pick_file();

                if let Some(path) = file {
                    return self.open_archive(path);
                }

                Task::none()
            }
            Message::ArchiveOpened(generation, result) => {
                // A newer selection supersedes this one entirely
                if generation != self.viewer.generation() {
                    return Task::none();
                }

                match result {
                    Ok((archive, pages)) => self.start_page_loads(generation, archive, pages),
                    Err(e) => {
                        eprintln!("⚠️  {}", e);
                        self.viewer.reset();
                        self.archive = None;
                        self.error = Some(e.to_string());
                        self.status =
                            String::from("Ready. Open a comic archive to start reading.");
                        Task::none()
                    }
                }
            }
            Message::PageLoaded(generation, index, result) => {
                if let Err(reason) = &result {
                    eprintln!("⚠️  Page {} failed: {}", index + 1, reason);
                }

                let applied = self.viewer.record(generation, index, result);

                if applied && self.viewer.is_complete() {
                    let failed = self.viewer.failed_count();
                    self.status = if failed == 0 {
                        format!("✅ Loaded {} pages.", self.viewer.page_count())
                    } else {
                        format!(
                            "✅ Loaded {} pages ({} failed to decode).",
                            self.viewer.page_count(),
                            failed
                        )
                    };
                }

                Task::none()
            }
            Message::Navigate(action) => {
                self.viewer.advance(action, self.settings.reading_direction);
                Task::none()
            }
            Message::ToggleDirection => {
                self.settings.reading_direction = self.settings.reading_direction.toggled();
                self.settings.save();
                Task::none()
            }
            Message::ToggleFullscreen => {
                self.fullscreen = !self.fullscreen;
                let mode = if self.fullscreen {
                    window::Mode::Fullscreen
                } else {
                    window::Mode::Windowed
                };

                window::get_latest().and_then(move |id| window::change_mode(id, mode))
            }
        }
    }

    /// Reset the viewer and launch the async open for a selected archive
    ///
    /// Resetting first drops every display handle of the previous comic
    /// and bumps the generation, so results still in flight for the old
    /// archive can never land in the new slot array.
    fn open_archive(&mut self, path: PathBuf) -> Task<Message> {
        self.error = None;
        self.archive = None;
        self.status = format!("Opening {}...", path.display());

        let generation = self.viewer.begin_open();

        Task::perform(open_and_sequence(path), move |result| {
            Message::ArchiveOpened(generation, result)
        })
    }

    /// Pre-allocate the slot array and kick off one load task per page
    fn start_page_loads(
        &mut self,
        generation: u64,
        archive: Archive,
        pages: Vec<PageEntry>,
    ) -> Task<Message> {
        println!("📖 Sequenced {} pages", pages.len());
        self.status = format!("Loading {} pages...", pages.len());
        self.viewer.begin_load(&pages);

        let tasks: Vec<_> = pages
            .into_iter()
            .enumerate()
            .map(|(index, page)| {
                let archive = archive.clone();
                Task::perform(loader::load_page(archive, page.name), move |result| {
                    Message::PageLoaded(generation, index, result)
                })
            })
            .collect();

        self.archive = Some(archive);

        Task::batch(tasks)
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let direction = self.settings.reading_direction;

        let toolbar = row![
            button("Open Comic")
                .on_press(Message::OpenArchive)
                .padding(10),
            button("Previous")
                .on_press_maybe(
                    self.viewer
                        .can_advance(NavAction::Previous, direction)
                        .then_some(Message::Navigate(NavAction::Previous))
                )
                .padding(10),
            button("Next")
                .on_press_maybe(
                    self.viewer
                        .can_advance(NavAction::Next, direction)
                        .then_some(Message::Navigate(NavAction::Next))
                )
                .padding(10),
            button(text(direction.label()))
                .on_press(Message::ToggleDirection)
                .padding(10),
            button("Fullscreen")
                .on_press(Message::ToggleFullscreen)
                .padding(10),
        ]
        .spacing(10);

        let page_view: Element<Message> = match self.viewer.current_slot() {
            Some(slot) => match &slot.status {
                PageStatus::Loaded(handle) => iced::widget::image(handle.clone())
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .into(),
                PageStatus::Pending => text("Loading page...").size(24).into(),
                PageStatus::Error(reason) => {
                    text(format!("⚠️  This page failed to load: {}", reason))
                        .size(18)
                        .into()
                }
            },
            None => match &self.error {
                Some(error) => text(error.clone()).size(18).into(),
                None => text("Select a comic archive to start reading")
                    .size(24)
                    .into(),
            },
        };

        let page_area = container(page_view)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill);

        // "Page X of Y — <archive>: <entry>" once a comic is open
        let page_info = match (self.viewer.current_slot(), &self.archive) {
            (Some(slot), Some(archive)) => format!(
                "{} — {}: {}",
                self.viewer.page_info(),
                archive
                    .path()
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_default(),
                slot.filename
            ),
            (Some(slot), None) => format!("{} — {}", self.viewer.page_info(), slot.filename),
            (None, _) => self.viewer.page_info(),
        };

        let content = column![toolbar, page_area]
            .push_maybe(self.viewer.is_loading().then(|| {
                progress_bar(0.0..=100.0, self.viewer.progress_percent()).height(8)
            }))
            .push(text(page_info).size(16))
            .push(text(&self.status).size(14))
            .spacing(15)
            .padding(20)
            .align_x(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Keyboard navigation: arrows for pages, F for fullscreen
    fn subscription(&self) -> Subscription<Message> {
        keyboard::on_key_press(|key, _modifiers| match key.as_ref() {
            keyboard::Key::Named(key::Named::ArrowRight) => {
                Some(Message::Navigate(NavAction::Next))
            }
            keyboard::Key::Named(key::Named::ArrowLeft) => {
                Some(Message::Navigate(NavAction::Previous))
            }
            keyboard::Key::Character("f") => Some(Message::ToggleFullscreen),
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    iced::application("Comic Reader", ComicReader::update, ComicReader::view)
        .subscription(ComicReader::subscription)
        .theme(ComicReader::theme)
        .centered()
        .run_with(ComicReader::new)
}

/// Open an archive and compute its page sequence
///
/// An archive with no recognized image entries is an error, never an
/// empty comic.
async fn open_and_sequence(path: PathBuf) -> Result<(Archive, Vec<PageEntry>), ReaderError> {
    let (archive, entries) = Archive::open(path).await?;

    let pages = sequence::sequence(&entries);
    if pages.is_empty() {
        return Err(ReaderError::NoImages);
    }

    Ok((archive, pages))
}
