//! User settings and preferences for Marknote
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence.

use serde::{Deserialize, Serialize};

use crate::find::SearchOptions;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Available color themes for the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

impl Theme {
    /// The theme after this one when toggling from the command palette.
    pub fn next(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::System,
            Theme::System => Theme::Light,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::System => "System",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// View Mode Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Which panes are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Editor and preview side by side
    #[default]
    Split,
    /// Editor only
    Editor,
    /// Preview only
    Preview,
}

impl ViewMode {
    /// Cycle Split → Editor → Preview → Split.
    pub fn cycle(&self) -> Self {
        match self {
            ViewMode::Split => ViewMode::Editor,
            ViewMode::Editor => ViewMode::Preview,
            ViewMode::Preview => ViewMode::Split,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Split => "Split",
            ViewMode::Editor => "Editor",
            ViewMode::Preview => "Preview",
        }
    }

    pub fn shows_editor(&self) -> bool {
        matches!(self, ViewMode::Split | ViewMode::Editor)
    }

    pub fn shows_preview(&self) -> bool {
        matches!(self, ViewMode::Split | ViewMode::Preview)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Size Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Window dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Window width in pixels
    pub width: f32,
    /// Window height in pixels
    pub height: f32,
    /// Whether the window was maximized
    #[serde(default)]
    pub maximized: bool,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            maximized: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences and application settings.
///
/// This struct is serialized to JSON and persisted to the user's config directory.
/// All fields have sensible defaults via the `Default` trait and `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Appearance
    // ─────────────────────────────────────────────────────────────────────────
    /// Color theme (light, dark, or system)
    pub theme: Theme,

    /// Visible panes (split, editor, or preview)
    pub view_mode: ViewMode,

    /// Font size for the editor (in points)
    pub font_size: f32,

    /// Whether to wrap long lines in the editor
    pub word_wrap: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Find / Replace
    // ─────────────────────────────────────────────────────────────────────────
    /// Options the find panel starts with
    pub search_defaults: SearchOptions,

    // ─────────────────────────────────────────────────────────────────────────
    // Command Palette
    // ─────────────────────────────────────────────────────────────────────────
    /// Fuzzy match cutoff: 0.0 accepts only exact matches, 1.0 accepts anything
    pub command_search_threshold: f64,

    /// How many recently executed commands to remember
    pub max_recent_commands: usize,

    // ─────────────────────────────────────────────────────────────────────────
    // Window
    // ─────────────────────────────────────────────────────────────────────────
    /// Window size
    pub window_size: WindowSize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            view_mode: ViewMode::default(),
            font_size: 14.0,
            word_wrap: true,
            search_defaults: SearchOptions::default(),
            command_search_threshold: Self::DEFAULT_COMMAND_SEARCH_THRESHOLD,
            max_recent_commands: Self::DEFAULT_MAX_RECENT_COMMANDS,
            window_size: WindowSize::default(),
        }
    }
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Minimum allowed font size.
    pub const MIN_FONT_SIZE: f32 = 8.0;
    /// Maximum allowed font size.
    pub const MAX_FONT_SIZE: f32 = 72.0;
    /// Minimum window dimension.
    pub const MIN_WINDOW_SIZE: f32 = 200.0;
    /// Maximum window dimension.
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;
    /// Default fuzzy match cutoff for the command palette.
    pub const DEFAULT_COMMAND_SEARCH_THRESHOLD: f64 = 0.4;
    /// Default length of the recent-commands list.
    pub const DEFAULT_MAX_RECENT_COMMANDS: usize = 5;
    /// Upper bound for the recent-commands list.
    pub const MAX_RECENT_COMMANDS: usize = 20;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        self.font_size = self
            .font_size
            .clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE);

        self.window_size.width = self
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.window_size.height = self
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);

        if self.command_search_threshold.is_nan() {
            self.command_search_threshold = Self::DEFAULT_COMMAND_SEARCH_THRESHOLD;
        }
        self.command_search_threshold = self.command_search_threshold.clamp(0.0, 1.0);

        if self.max_recent_commands == 0 {
            self.max_recent_commands = Self::DEFAULT_MAX_RECENT_COMMANDS;
        } else if self.max_recent_commands > Self::MAX_RECENT_COMMANDS {
            self.max_recent_commands = Self::MAX_RECENT_COMMANDS;
        }
    }

    /// Load settings and sanitize them to ensure validity.
    ///
    /// This is a convenience method that deserializes and then sanitizes.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
