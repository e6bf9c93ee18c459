/// Persisted reader settings
///
/// Stored as JSON in the user's config directory:
/// - Linux: ~/.config/comic-reader/settings.json
/// - macOS: ~/Library/Application Support/comic-reader/settings.json
/// - Windows: %APPDATA%\comic-reader\settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Which physical action moves forward through the comic
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadingDirection {
    /// Western comics: the right/next action advances
    #[default]
    LeftToRight,
    /// Manga: the left/previous action advances
    RightToLeft,
}

impl ReadingDirection {
    pub fn toggled(self) -> Self {
        match self {
            ReadingDirection::LeftToRight => ReadingDirection::RightToLeft,
            ReadingDirection::RightToLeft => ReadingDirection::LeftToRight,
        }
    }

    /// Short label for the toolbar toggle button
    pub fn label(self) -> &'static str {
        match self {
            ReadingDirection::LeftToRight => "Direction: L→R",
            ReadingDirection::RightToLeft => "Direction: R→L",
        }
    }
}

/// All persisted settings
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Settings {
    pub reading_direction: ReadingDirection,
}

impl Settings {
    /// Load settings from disk, falling back to defaults on any failure
    pub fn load() -> Self {
        match fs::read_to_string(Self::settings_path()) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|_| {
                eprintln!("⚠️  Failed to parse settings.json, using defaults");
                Settings::default()
            }),
            Err(_) => Settings::default(),
        }
    }

    /// Save settings to disk; failures are non-fatal
    pub fn save(&self) {
        let path = Self::settings_path();

        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        if let Ok(json) = serde_json::to_string_pretty(self) {
            let _ = fs::write(path, json);
        }
    }

    /// Where the settings file lives
    fn settings_path() -> PathBuf {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        path.push("comic-reader");
        path.push("settings.json");
        path
    }
}
