//! UI components for Marknote
//!
//! Overlays drawn on top of the editor. Each component keeps its own state
//! and reports user intent back to the app through an output struct.

mod command_palette;
mod find_panel;

pub use command_palette::CommandPalette;
pub use find_panel::FindReplacePanel;
