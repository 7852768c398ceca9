//! Command palette overlay (Ctrl+Shift+P).
//!
//! With an empty query the palette lists recently executed commands first,
//! then the rest in definition order. Typing switches to ranked fuzzy search.

use eframe::egui::{self, Color32, Key, RichText, Sense};

use crate::commands::{Command, CommandRegistry};

/// Maximum number of rows shown.
const MAX_RESULTS: usize = 12;

/// Output from the command palette.
#[derive(Debug, Default)]
pub struct CommandPaletteOutput {
    /// Id of the command the user picked
    pub executed: Option<String>,
    /// Whether the palette was closed (Escape, pick, or click)
    pub closed: bool,
}

/// Command palette state.
pub struct CommandPalette {
    is_open: bool,
    query: String,
    selected_index: usize,
}

impl Default for CommandPalette {
    fn default() -> Self {
        Self::new()
    }
}

/// One row of the palette.
struct PaletteEntry<'a> {
    command: &'a Command,
    is_recent: bool,
}

impl CommandPalette {
    pub fn new() -> Self {
        Self {
            is_open: false,
            query: String::new(),
            selected_index: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn open(&mut self) {
        self.is_open = true;
        self.query.clear();
        self.selected_index = 0;
    }

    pub fn close(&mut self) {
        self.is_open = false;
        self.query.clear();
        self.selected_index = 0;
    }

    pub fn toggle(&mut self) {
        if self.is_open {
            self.close();
        } else {
            self.open();
        }
    }

    fn entries<'a>(&self, registry: &'a CommandRegistry) -> Vec<PaletteEntry<'a>> {
        if !self.query.trim().is_empty() {
            return registry
                .search(&self.query)
                .into_iter()
                .take(MAX_RESULTS)
                .map(|command| PaletteEntry {
                    command,
                    is_recent: false,
                })
                .collect();
        }

        let recent = registry.recent_command_objects();
        let mut entries: Vec<PaletteEntry<'a>> = recent
            .iter()
            .copied()
            .map(|command| PaletteEntry {
                command,
                is_recent: true,
            })
            .collect();

        for command in registry.commands() {
            if entries.len() >= MAX_RESULTS {
                break;
            }
            if !recent.iter().any(|r| r.id == command.id) {
                entries.push(PaletteEntry {
                    command,
                    is_recent: false,
                });
            }
        }

        entries
    }

    /// Render the palette and return any output.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        registry: &CommandRegistry,
        is_dark: bool,
    ) -> CommandPaletteOutput {
        let mut output = CommandPaletteOutput::default();
        if !self.is_open {
            return output;
        }

        let entries = self.entries(registry);
        if self.selected_index >= entries.len() {
            self.selected_index = 0;
        }

        let (bg_color, border_color, text_color, secondary_color, selected_bg, hover_bg) =
            if is_dark {
                (
                    Color32::from_rgb(35, 35, 40),
                    Color32::from_rgb(80, 80, 90),
                    Color32::from_rgb(220, 220, 220),
                    Color32::from_rgb(140, 140, 150),
                    Color32::from_rgb(55, 65, 85),
                    Color32::from_rgb(45, 50, 60),
                )
            } else {
                (
                    Color32::from_rgb(255, 255, 255),
                    Color32::from_rgb(180, 180, 190),
                    Color32::from_rgb(40, 40, 40),
                    Color32::from_rgb(100, 100, 110),
                    Color32::from_rgb(220, 230, 245),
                    Color32::from_rgb(235, 240, 248),
                )
            };

        ctx.input(|i| {
            if i.key_pressed(Key::Escape) {
                output.closed = true;
            }
            if i.key_pressed(Key::ArrowDown) && !entries.is_empty() {
                self.selected_index = (self.selected_index + 1) % entries.len();
            }
            if i.key_pressed(Key::ArrowUp) && !entries.is_empty() {
                self.selected_index = if self.selected_index == 0 {
                    entries.len() - 1
                } else {
                    self.selected_index - 1
                };
            }
            if i.key_pressed(Key::Enter) {
                if let Some(entry) = entries.get(self.selected_index) {
                    output.executed = Some(entry.command.id.clone());
                    output.closed = true;
                }
            }
        });

        egui::Area::new(egui::Id::new("command_palette_overlay"))
            .anchor(egui::Align2::CENTER_TOP, [0.0, 80.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::none()
                    .fill(bg_color)
                    .stroke(egui::Stroke::new(1.0, border_color))
                    .rounding(8.0)
                    .shadow(egui::epaint::Shadow {
                        offset: [0.0, 4.0].into(),
                        blur: 12.0,
                        spread: 0.0,
                        color: Color32::from_black_alpha(60),
                    })
                    .show(ui, |ui| {
                        ui.set_width(520.0);
                        ui.add_space(8.0);

                        ui.horizontal(|ui| {
                            ui.add_space(12.0);
                            ui.label(RichText::new(">").size(16.0).color(secondary_color));
                            ui.add_space(4.0);

                            let response = ui.add(
                                egui::TextEdit::singleline(&mut self.query)
                                    .hint_text("Type a command...")
                                    .frame(false)
                                    .desired_width(470.0)
                                    .font(egui::TextStyle::Body),
                            );
                            response.request_focus();
                            if response.changed() {
                                self.selected_index = 0;
                            }
                        });

                        ui.add_space(4.0);
                        ui.separator();
                        ui.add_space(4.0);

                        if entries.is_empty() {
                            ui.horizontal(|ui| {
                                ui.add_space(16.0);
                                ui.label(
                                    RichText::new("No matching commands")
                                        .color(secondary_color)
                                        .italics(),
                                );
                            });
                            ui.add_space(8.0);
                        }

                        for (idx, entry) in entries.iter().enumerate() {
                            let is_selected = idx == self.selected_index;
                            let command = entry.command;

                            let response = ui
                                .horizontal(|ui| {
                                    let row = ui.interact(
                                        ui.available_rect_before_wrap(),
                                        ui.id().with(idx),
                                        Sense::click(),
                                    );
                                    let fill = if is_selected {
                                        Some(selected_bg)
                                    } else if row.hovered() {
                                        Some(hover_bg)
                                    } else {
                                        None
                                    };
                                    if let Some(fill) = fill {
                                        ui.painter().rect_filled(
                                            row.rect.expand2(egui::vec2(8.0, 2.0)),
                                            4.0,
                                            fill,
                                        );
                                    }

                                    ui.add_space(16.0);
                                    let icon = command.icon.as_deref().unwrap_or(" ");
                                    ui.add_sized(
                                        [24.0, 18.0],
                                        egui::Label::new(RichText::new(icon).size(13.0)),
                                    );
                                    ui.label(RichText::new(&command.name).color(text_color).strong());

                                    if let Some(category) = &command.category {
                                        ui.label(
                                            RichText::new(category).color(secondary_color).small(),
                                        );
                                    }

                                    ui.with_layout(
                                        egui::Layout::right_to_left(egui::Align::Center),
                                        |ui| {
                                            ui.add_space(16.0);
                                            if let Some(shortcut) = &command.shortcut {
                                                ui.label(
                                                    RichText::new(shortcut)
                                                        .color(secondary_color)
                                                        .small(),
                                                );
                                            }
                                            if entry.is_recent {
                                                ui.label(
                                                    RichText::new("recent")
                                                        .color(secondary_color)
                                                        .small()
                                                        .italics(),
                                                );
                                            }
                                        },
                                    );

                                    row
                                })
                                .inner;

                            let response = match &command.description {
                                Some(description) => response.on_hover_text(description),
                                None => response,
                            };
                            if response.clicked() {
                                output.executed = Some(command.id.clone());
                                output.closed = true;
                            }
                            ui.add_space(2.0);
                        }

                        ui.separator();
                        ui.horizontal(|ui| {
                            ui.add_space(12.0);
                            ui.label(
                                RichText::new("↑↓ Navigate  Enter Run  Esc Close")
                                    .color(secondary_color)
                                    .small(),
                            );
                        });
                        ui.add_space(6.0);
                    });
            });

        if output.closed {
            self.close();
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandAction;
    use crate::storage::MemoryStore;

    fn registry() -> CommandRegistry {
        CommandRegistry::new(
            vec![
                Command::new("find", "Find", CommandAction::Find),
                Command::new("theme", "Toggle Theme", CommandAction::ToggleTheme),
                Command::new("save", "Save Document", CommandAction::SaveDocument),
            ],
            Box::new(MemoryStore::new()),
        )
    }

    #[test]
    fn test_toggle() {
        let mut palette = CommandPalette::new();
        palette.toggle();
        assert!(palette.is_open());
        palette.toggle();
        assert!(!palette.is_open());
    }

    #[test]
    fn test_empty_query_lists_recent_first() {
        let registry = registry();
        registry.add_recent_command("save");

        let palette = CommandPalette::new();
        let entries = palette.entries(&registry);
        let ids: Vec<&str> = entries.iter().map(|e| e.command.id.as_str()).collect();
        assert_eq!(ids, vec!["save", "find", "theme"]);
        assert!(entries[0].is_recent);
        assert!(!entries[1].is_recent);
    }

    #[test]
    fn test_query_uses_search() {
        let registry = registry();
        let mut palette = CommandPalette::new();
        palette.query = "theme".to_string();
        let entries = palette.entries(&registry);
        assert_eq!(entries[0].command.id, "theme");
    }
}
