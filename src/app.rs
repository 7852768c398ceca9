//! Main application module for Marknote
//!
//! This module implements the eframe App trait for the editor window. It
//! owns the document text and wires the editing core (smart paste, find and
//! replace, the command registry) to the egui surfaces that drive it.

use crate::commands::{builtin_commands, CommandAction, CommandRegistry};
use crate::config::{load_config, save_config_silent, Settings, Theme, WindowSize};
use crate::export::{
    copy_html_to_clipboard, export_html_dialog, export_markdown_dialog, read_clipboard_html,
};
use crate::markdown::{apply_format, MarkdownFormat, MarkdownPreview};
use crate::paste::{append_snippet, handle_paste};
use crate::storage::{DocumentStore, FileStore, KeyValueStore, MemoryStore};
use crate::string_utils::{byte_to_char_index, char_to_byte_index};
use crate::ui::{CommandPalette, FindReplacePanel};
use eframe::egui;
use log::{debug, info, warn};

/// How long a status bar message stays visible, in seconds.
const STATUS_DURATION: f64 = 3.0;

/// Id of the main editor widget.
fn editor_id() -> egui::Id {
    egui::Id::new("marknote_editor")
}

/// Open the persistent store, falling back to memory when the config
/// directory is unavailable.
fn open_store() -> Box<dyn KeyValueStore> {
    match FileStore::in_config_dir() {
        Ok(store) => {
            debug!("Using key-value store at {}", store.path().display());
            Box::new(store)
        }
        Err(e) => {
            warn!("Persistent storage unavailable, using memory: {}", e);
            Box::new(MemoryStore::new())
        }
    }
}

/// Keyboard actions deferred until after input has been read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyboardAction {
    SaveDocument,
    OpenFind,
    OpenFindReplace,
    FindNext,
    FindPrev,
    TogglePalette,
    Format(MarkdownFormat),
    CycleViewMode,
}

/// A selection to apply to the editor on the next frame.
#[derive(Debug, Clone, Copy)]
struct PendingSelection {
    /// Character range
    range: (usize, usize),
    /// Move keyboard focus to the editor as well
    focus: bool,
}

/// The main application struct.
pub struct MarknoteApp {
    settings: Settings,
    settings_dirty: bool,
    text: String,
    document_dirty: bool,
    documents: DocumentStore,
    registry: CommandRegistry,
    find_panel: FindReplacePanel,
    palette: CommandPalette,
    preview: MarkdownPreview,
    /// Last known editor selection as a character range
    selection: Option<(usize, usize)>,
    pending_selection: Option<PendingSelection>,
    /// Status bar message and the time it expires
    status: Option<(String, f64)>,
    last_window_size: Option<egui::Vec2>,
}

impl MarknoteApp {
    /// Create a new application instance.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        info!("Initializing Marknote");

        let settings = load_config();

        let documents = DocumentStore::new(open_store());
        let text = documents.load();
        info!("Loaded document ({} bytes)", text.len());

        let registry = CommandRegistry::new(builtin_commands(), open_store())
            .with_threshold(settings.command_search_threshold)
            .with_max_recent(settings.max_recent_commands);

        let find_panel = FindReplacePanel::new(settings.search_defaults);

        let app = Self {
            settings,
            settings_dirty: false,
            text,
            document_dirty: false,
            documents,
            registry,
            find_panel,
            palette: CommandPalette::new(),
            preview: MarkdownPreview::new(),
            selection: None,
            pending_selection: None,
            status: None,
            last_window_size: None,
        };

        let system_dark = cc.integration_info.system_theme == Some(eframe::Theme::Dark);
        app.apply_theme(&cc.egui_ctx, system_dark);
        app
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Theme
    // ─────────────────────────────────────────────────────────────────────────

    fn wants_dark(&self, system_dark: bool) -> bool {
        match self.settings.theme {
            Theme::Light => false,
            Theme::Dark => true,
            Theme::System => system_dark,
        }
    }

    /// Switch egui visuals if they do not match the configured theme.
    fn apply_theme(&self, ctx: &egui::Context, system_dark: bool) {
        let dark = self.wants_dark(system_dark);
        if ctx.style().visuals.dark_mode != dark {
            debug!("Applying {} visuals", if dark { "dark" } else { "light" });
            ctx.set_visuals(if dark {
                egui::Visuals::dark()
            } else {
                egui::Visuals::light()
            });
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Status and persistence
    // ─────────────────────────────────────────────────────────────────────────

    fn show_status(&mut self, ctx: &egui::Context, message: impl Into<String>) {
        let now = ctx.input(|i| i.time);
        self.status = Some((message.into(), now + STATUS_DURATION));
    }

    fn save_document(&mut self) -> bool {
        let saved = self.documents.save(&self.text);
        if saved {
            self.document_dirty = false;
            debug!("Document saved ({} bytes)", self.text.len());
        }
        saved
    }

    fn save_if_dirty(&mut self) {
        if self.document_dirty {
            self.save_document();
        }
        if self.settings_dirty && save_config_silent(&self.settings) {
            self.settings_dirty = false;
        }
    }

    /// Record the window size so the next launch opens at the same size.
    fn track_window_size(&mut self, ctx: &egui::Context) {
        let (size, maximized) = ctx.input(|i| {
            let viewport = i.viewport();
            (
                viewport.inner_rect.map(|r| r.size()),
                viewport.maximized.unwrap_or(false),
            )
        });

        let Some(size) = size else {
            return;
        };
        let changed = self
            .last_window_size
            .map(|s| (s - size).length() > 1.0)
            .unwrap_or(true);
        if !changed && maximized == self.settings.window_size.maximized {
            return;
        }

        self.last_window_size = Some(size);
        let window_size = if maximized {
            WindowSize {
                maximized,
                ..self.settings.window_size
            }
        } else {
            WindowSize {
                width: size.x,
                height: size.y,
                maximized,
            }
        };
        if window_size != self.settings.window_size {
            self.settings.window_size = window_size;
            self.settings_dirty = true;
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Input
    // ─────────────────────────────────────────────────────────────────────────

    /// Route clipboard pastes aimed at the editor through smart paste.
    ///
    /// Paste events are removed before the editor sees them, so the snippet
    /// is appended to the document instead of spliced at the cursor.
    fn intercept_paste(&mut self, ctx: &egui::Context) {
        if !ctx.memory(|m| m.has_focus(editor_id())) {
            return;
        }

        let mut pasted = Vec::new();
        ctx.input_mut(|i| {
            i.events.retain(|event| match event {
                egui::Event::Paste(text) => {
                    pasted.push(text.clone());
                    false
                }
                _ => true,
            })
        });

        for raw in pasted {
            let html = read_clipboard_html();
            let snippet = handle_paste(&raw, html.as_deref());
            if snippet.is_empty() {
                continue;
            }
            self.text = append_snippet(&self.text, &snippet);
            self.document_dirty = true;
            let end = self.text.chars().count();
            self.pending_selection = Some(PendingSelection {
                range: (end, end),
                focus: true,
            });
            debug!("Appended pasted snippet ({} bytes)", snippet.len());
        }
    }

    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        let action = ctx.input(|i| {
            if i.modifiers.ctrl && i.modifiers.shift && i.key_pressed(egui::Key::P) {
                debug!("Keyboard shortcut: Ctrl+Shift+P (Command Palette)");
                return Some(KeyboardAction::TogglePalette);
            }
            if i.modifiers.ctrl && i.key_pressed(egui::Key::K) {
                debug!("Keyboard shortcut: Ctrl+K (Command Palette)");
                return Some(KeyboardAction::TogglePalette);
            }
            if i.modifiers.ctrl && i.key_pressed(egui::Key::S) {
                debug!("Keyboard shortcut: Ctrl+S (Save)");
                return Some(KeyboardAction::SaveDocument);
            }
            if i.modifiers.ctrl && i.key_pressed(egui::Key::F) {
                debug!("Keyboard shortcut: Ctrl+F (Find)");
                return Some(KeyboardAction::OpenFind);
            }
            if i.modifiers.ctrl && i.key_pressed(egui::Key::H) {
                debug!("Keyboard shortcut: Ctrl+H (Find and Replace)");
                return Some(KeyboardAction::OpenFindReplace);
            }
            if i.key_pressed(egui::Key::F3) {
                return Some(if i.modifiers.shift {
                    KeyboardAction::FindPrev
                } else {
                    KeyboardAction::FindNext
                });
            }
            if i.modifiers.ctrl && i.key_pressed(egui::Key::B) {
                return Some(KeyboardAction::Format(MarkdownFormat::Bold));
            }
            if i.modifiers.ctrl && i.key_pressed(egui::Key::I) {
                return Some(KeyboardAction::Format(MarkdownFormat::Italic));
            }
            if i.modifiers.ctrl && i.key_pressed(egui::Key::E) {
                debug!("Keyboard shortcut: Ctrl+E (Cycle View Mode)");
                return Some(KeyboardAction::CycleViewMode);
            }
            None
        });

        if let Some(action) = action {
            self.handle_keyboard_action(ctx, action);
        }
    }

    fn handle_keyboard_action(&mut self, ctx: &egui::Context, action: KeyboardAction) {
        match action {
            KeyboardAction::TogglePalette => self.palette.toggle(),
            KeyboardAction::SaveDocument => self.run_action(ctx, CommandAction::SaveDocument),
            KeyboardAction::OpenFind => self.run_action(ctx, CommandAction::Find),
            KeyboardAction::OpenFindReplace => self.run_action(ctx, CommandAction::FindReplace),
            KeyboardAction::FindNext => {
                if let Some(range) = self.find_panel.find_next(&self.text) {
                    self.reveal(range, false);
                }
            }
            KeyboardAction::FindPrev => {
                if let Some(range) = self.find_panel.find_prev(&self.text) {
                    self.reveal(range, false);
                }
            }
            KeyboardAction::Format(format) => self.run_action(ctx, CommandAction::Format(format)),
            KeyboardAction::CycleViewMode => self.run_action(ctx, CommandAction::CycleViewMode),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Commands
    // ─────────────────────────────────────────────────────────────────────────

    /// Execute a palette command by id and record it as recently used.
    fn execute_command(&mut self, ctx: &egui::Context, id: &str) {
        let Some(action) = self.registry.get(id).map(|command| command.action) else {
            warn!("Unknown command: {}", id);
            return;
        };
        info!("Executing command: {}", id);
        self.registry.add_recent_command(id);
        self.run_action(ctx, action);
    }

    fn run_action(&mut self, ctx: &egui::Context, action: CommandAction) {
        match action {
            CommandAction::Format(format) => self.apply_format(format),
            CommandAction::Find => self.open_find(false),
            CommandAction::FindReplace => self.open_find(true),
            CommandAction::ExportMarkdown => match export_markdown_dialog(&self.text) {
                Ok(Some(path)) => self.show_status(ctx, format!("Exported {}", path.display())),
                Ok(None) => debug!("Markdown export cancelled"),
                Err(e) => {
                    warn!("Markdown export failed: {}", e);
                    self.show_status(ctx, format!("Export failed: {}", e));
                }
            },
            CommandAction::ExportHtml => match export_html_dialog(&self.text) {
                Ok(Some(path)) => self.show_status(ctx, format!("Exported {}", path.display())),
                Ok(None) => debug!("HTML export cancelled"),
                Err(e) => {
                    warn!("HTML export failed: {}", e);
                    self.show_status(ctx, format!("Export failed: {}", e));
                }
            },
            CommandAction::CopyHtml => match copy_html_to_clipboard(&self.text) {
                Ok(()) => self.show_status(ctx, "Copied HTML to clipboard"),
                Err(e) => {
                    warn!("Copy as HTML failed: {}", e);
                    self.show_status(ctx, format!("Copy failed: {}", e));
                }
            },
            CommandAction::ToggleTheme => {
                self.settings.theme = self.settings.theme.next();
                self.settings_dirty = true;
                let label = format!("Theme: {}", self.settings.theme.label());
                self.show_status(ctx, label);
            }
            CommandAction::CycleViewMode => {
                self.settings.view_mode = self.settings.view_mode.cycle();
                self.settings_dirty = true;
                let label = format!("View: {}", self.settings.view_mode.label());
                self.show_status(ctx, label);
            }
            CommandAction::NewDocument => {
                self.text.clear();
                self.selection = None;
                self.document_dirty = true;
                self.reveal((0, 0), true);
            }
            CommandAction::SaveDocument => {
                if self.save_document() {
                    self.show_status(ctx, "Saved");
                } else {
                    self.show_status(ctx, "Save failed");
                }
            }
        }
    }

    /// Apply a Markdown format to the current selection.
    fn apply_format(&mut self, format: MarkdownFormat) {
        let selection = self.selection.map(|(start, end)| {
            (
                char_to_byte_index(&self.text, start),
                char_to_byte_index(&self.text, end),
            )
        });

        let result = apply_format(&self.text, selection, format);
        debug!(
            "Applied {:?} (applied: {}, selection: {:?})",
            format, result.applied, result.selection
        );

        let (start, end) = result.selection;
        let range = (
            byte_to_char_index(&result.text, start),
            byte_to_char_index(&result.text, end),
        );
        self.text = result.text;
        self.document_dirty = true;
        self.reveal(range, true);
    }

    /// Open the find panel at the first match after the editor cursor.
    fn open_find(&mut self, replace_mode: bool) {
        self.find_panel.open(replace_mode);
        let cursor = self.selection.map_or(0, |(start, _)| start);
        if let Some(range) = self.find_panel.seek(&self.text, cursor) {
            self.reveal(range, false);
        }
    }

    fn reveal(&mut self, range: (usize, usize), focus: bool) {
        self.selection = Some(range);
        self.pending_selection = Some(PendingSelection { range, focus });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Panels
    // ─────────────────────────────────────────────────────────────────────────

    fn render_status_bar(&mut self, ctx: &egui::Context) {
        let now = ctx.input(|i| i.time);
        if self.status.as_ref().is_some_and(|(_, expires)| now >= *expires) {
            self.status = None;
        }

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let words = self.text.split_whitespace().count();
                let chars = self.text.chars().count();
                ui.label(format!("{} words, {} characters", words, chars));
                if self.document_dirty {
                    ui.label(egui::RichText::new("●").weak())
                        .on_hover_text("Unsaved changes");
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(self.settings.view_mode.label());
                    if let Some((message, _)) = &self.status {
                        ui.separator();
                        ui.label(message);
                    }
                });
            });
        });

        if self.status.is_some() {
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }
    }

    fn render_editor(&mut self, ui: &mut egui::Ui) {
        let id = editor_id();

        if let Some(pending) = self.pending_selection.take() {
            let (start, end) = pending.range;
            let mut state = egui::TextEdit::load_state(ui.ctx(), id).unwrap_or_default();
            state
                .cursor
                .set_char_range(Some(egui::text::CCursorRange::two(
                    egui::text::CCursor::new(start),
                    egui::text::CCursor::new(end),
                )));
            state.store(ui.ctx(), id);
            if pending.focus {
                ui.ctx().memory_mut(|m| m.request_focus(id));
            }
        }

        let font_id = egui::FontId::monospace(self.settings.font_size);
        let word_wrap = self.settings.word_wrap;
        let mut layouter = |ui: &egui::Ui, text: &str, wrap_width: f32| {
            let job = egui::text::LayoutJob::simple(
                text.to_owned(),
                font_id.clone(),
                ui.visuals().text_color(),
                if word_wrap { wrap_width } else { f32::INFINITY },
            );
            ui.fonts(|f| f.layout_job(job))
        };

        let scroll = if word_wrap {
            egui::ScrollArea::vertical()
        } else {
            egui::ScrollArea::both()
        };

        scroll
            .id_source("editor_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let output = egui::TextEdit::multiline(&mut self.text)
                    .id(id)
                    .frame(false)
                    .hint_text("Start writing Markdown…")
                    .desired_width(f32::INFINITY)
                    .min_size(ui.available_size())
                    .layouter(&mut layouter)
                    .show(ui);

                if output.response.changed() {
                    self.document_dirty = true;
                }
                if let Some(range) = output.cursor_range {
                    let [start, end] = range.sorted_cursors();
                    self.selection = Some((start.ccursor.index, end.ccursor.index));
                }
            });
    }

    fn render_main_panels(&mut self, ctx: &egui::Context) {
        let view_mode = self.settings.view_mode;
        let font_size = self.settings.font_size;

        if view_mode.shows_editor() && view_mode.shows_preview() {
            let half_width = ctx.screen_rect().width() / 2.0;
            egui::SidePanel::right("preview_panel")
                .resizable(true)
                .default_width(half_width)
                .min_width(200.0)
                .show(ctx, |ui| {
                    self.preview.show(ui, &self.text, font_size);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if view_mode.shows_editor() {
                self.render_editor(ui);
            } else {
                self.preview.show(ui, &self.text, font_size);
            }
        });
    }

    fn render_overlays(&mut self, ctx: &egui::Context, is_dark: bool) {
        let find_output = self.find_panel.show(ctx, &self.text, is_dark);
        if let Some(new_text) = find_output.new_text {
            if new_text != self.text {
                self.text = new_text;
                self.document_dirty = true;
            }
        }
        if let Some(range) = find_output.reveal {
            self.reveal(range, false);
        }
        if find_output.closed {
            if let Some(range) = self.selection {
                self.reveal(range, true);
            }
        }

        let palette_output = self.palette.show(ctx, &self.registry, is_dark);
        if let Some(id) = palette_output.executed {
            self.execute_command(ctx, &id);
        }
    }
}

impl eframe::App for MarknoteApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        let system_dark = frame.info().system_theme == Some(eframe::Theme::Dark);
        self.apply_theme(ctx, system_dark);
        let is_dark = ctx.style().visuals.dark_mode;

        self.track_window_size(ctx);
        self.intercept_paste(ctx);
        self.handle_keyboard_shortcuts(ctx);

        self.render_status_bar(ctx);
        self.render_main_panels(ctx);
        self.render_overlays(ctx, is_dark);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        self.save_if_dirty();
    }

    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        debug!("Saving application state");
        self.save_if_dirty();
    }

    fn persist_egui_memory(&self) -> bool {
        true
    }

    fn auto_save_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(30)
    }
}
