//! Floating find/replace bar
//!
//! The panel owns the `FindEngine` and the text of its two inputs. It never
//! edits the document itself: replacements come back through
//! `FindReplacePanelOutput::new_text` for the app to apply.

use eframe::egui::{self, Color32, Key, RichText, Ui, Vec2};

use crate::find::{FindEngine, SearchOptions, SearchOptionsUpdate};

/// What the app should do after the panel was drawn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindReplacePanelOutput {
    /// Document text after a replace
    pub new_text: Option<String>,
    /// Character range of the match to select in the editor
    pub reveal: Option<(usize, usize)>,
    /// The panel was closed this frame
    pub closed: bool,
}

/// Find bar with an optional replace row.
pub struct FindReplacePanel {
    engine: FindEngine,
    search_input: String,
    replace_input: String,
    is_open: bool,
    replace_mode: bool,
    focus_search: bool,
}

impl FindReplacePanel {
    pub fn new(options: SearchOptions) -> Self {
        Self {
            engine: FindEngine::with_options(options),
            search_input: String::new(),
            replace_input: String::new(),
            is_open: false,
            replace_mode: false,
            focus_search: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Open the panel, with or without the replace row.
    pub fn open(&mut self, replace_mode: bool) {
        self.is_open = true;
        self.replace_mode = replace_mode;
        self.focus_search = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// Make the first match at or after `cursor` (a character offset) current.
    ///
    /// Wraps to the first match when the cursor is past the last one.
    pub fn seek(&mut self, text: &str, cursor: usize) -> Option<(usize, usize)> {
        let target = self
            .engine
            .matches(text)
            .iter()
            .find(|m| m.start >= cursor)
            .map_or(0, |m| m.index);
        if self.engine.go_to_match(text, target) {
            self.current_range(text)
        } else {
            None
        }
    }

    /// Advance to the next match, returning its character range.
    pub fn find_next(&mut self, text: &str) -> Option<(usize, usize)> {
        self.engine.go_to_next(text)?;
        self.current_range(text)
    }

    /// Step back to the previous match, returning its character range.
    pub fn find_prev(&mut self, text: &str) -> Option<(usize, usize)> {
        self.engine.go_to_prev(text)?;
        self.current_range(text)
    }

    fn current_range(&self, text: &str) -> Option<(usize, usize)> {
        self.engine.current_match(text).map(|m| (m.start, m.end))
    }

    /// "i of n", "No matches", or nothing for an empty query.
    fn match_label(&self, current: Option<usize>, total: usize) -> String {
        if self.engine.query().is_empty() {
            return String::new();
        }
        match current {
            Some(index) => format!("{} of {}", index + 1, total),
            None => "No matches".to_string(),
        }
    }

    /// Draw the panel for the document `text`.
    pub fn show(&mut self, ctx: &egui::Context, text: &str, is_dark: bool) -> FindReplacePanelOutput {
        let mut output = FindReplacePanelOutput::default();
        if !self.is_open {
            return output;
        }

        let colors = PanelColors::new(is_dark);

        // One scan per frame for the label, tooltip and button state
        let matches = self.engine.matches(text);
        let current = self.engine.clamped_index(matches.len());
        let current_text = current.and_then(|i| matches.get(i)).map(|m| m.text.clone());
        let match_label = self.match_label(current, matches.len());
        let has_matches = !matches.is_empty();

        let frame = egui::Frame::none()
            .fill(colors.panel_bg)
            .stroke(egui::Stroke::new(1.0, colors.border))
            .inner_margin(egui::Margin::symmetric(12.0, 8.0))
            .rounding(egui::Rounding::same(6.0))
            .shadow(egui::epaint::Shadow {
                offset: egui::vec2(0.0, 2.0),
                blur: 8.0,
                spread: 0.0,
                color: Color32::from_black_alpha(40),
            });

        egui::Window::new("Find and Replace")
            .id(egui::Id::new("find_replace_panel"))
            .title_bar(false)
            .resizable(false)
            .collapsible(false)
            .anchor(egui::Align2::RIGHT_TOP, [-16.0, 48.0])
            .frame(frame)
            .show(ctx, |ui| {
                ui.set_min_width(420.0);

                let (escape, enter, shift) = ui.input(|i| {
                    (
                        i.key_pressed(Key::Escape),
                        i.key_pressed(Key::Enter),
                        i.modifiers.shift,
                    )
                });
                if escape {
                    output.closed = true;
                }

                let mut search_changed = false;
                let mut go_next = false;
                let mut go_prev = false;

                // Search row
                ui.horizontal(|ui| {
                    let response = ui.add_sized(
                        Vec2::new(260.0, 24.0),
                        egui::TextEdit::singleline(&mut self.search_input)
                            .id(egui::Id::new("find_search_input"))
                            .hint_text("Find")
                            .font(egui::FontId::proportional(13.0)),
                    );
                    if self.focus_search {
                        response.request_focus();
                        self.focus_search = false;
                    }
                    if response.changed() {
                        search_changed = true;
                    }
                    if response.lost_focus() && enter {
                        if shift {
                            go_prev = true;
                        } else {
                            go_next = true;
                        }
                        response.request_focus();
                    }

                    let label = ui.label(
                        RichText::new(match_label)
                            .size(12.0)
                            .color(colors.muted),
                    );
                    if let Some(current_text) = &current_text {
                        label.on_hover_text(format!("Current match: {}", current_text));
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .add(egui::Button::new(RichText::new("×").size(16.0)).frame(false))
                            .on_hover_text("Close (Escape)")
                            .clicked()
                        {
                            output.closed = true;
                        }
                    });
                });

                // Replace row
                let mut replace_one = false;
                let mut replace_all = false;
                if self.replace_mode {
                    ui.add_space(4.0);
                    ui.horizontal(|ui| {
                        ui.add_sized(
                            Vec2::new(260.0, 24.0),
                            egui::TextEdit::singleline(&mut self.replace_input)
                                .hint_text("Replace")
                                .font(egui::FontId::proportional(13.0)),
                        );
                        replace_one = ui
                            .add_enabled(has_matches, egui::Button::new("Replace"))
                            .clicked();
                        replace_all = ui
                            .add_enabled(has_matches, egui::Button::new("All"))
                            .on_hover_text("Replace all matches")
                            .clicked();
                    });
                }

                ui.add_space(6.0);

                // Options and navigation
                let options = self.engine.options();
                let mut update = None;
                ui.horizontal(|ui| {
                    if ui
                        .add(toggle_button("Aa", "Match Case", options.case_sensitive, &colors))
                        .clicked()
                    {
                        update = Some(
                            SearchOptionsUpdate::default().case_sensitive(!options.case_sensitive),
                        );
                    }
                    if ui
                        .add(toggle_button("W", "Whole Word", options.whole_word, &colors))
                        .clicked()
                    {
                        update = Some(SearchOptionsUpdate::default().whole_word(!options.whole_word));
                    }
                    if ui
                        .add(toggle_button(".*", "Use Regex", options.use_regex, &colors))
                        .clicked()
                    {
                        update = Some(SearchOptionsUpdate::default().use_regex(!options.use_regex));
                    }

                    ui.add_space(12.0);

                    if ui
                        .add(egui::Button::new("◀").min_size(Vec2::new(28.0, 24.0)))
                        .on_hover_text("Previous (Shift+Enter)")
                        .clicked()
                    {
                        go_prev = true;
                    }
                    if ui
                        .add(egui::Button::new("▶").min_size(Vec2::new(28.0, 24.0)))
                        .on_hover_text("Next (Enter)")
                        .clicked()
                    {
                        go_next = true;
                    }

                    let mode_label = if self.replace_mode { "Hide Replace" } else { "Replace…" };
                    if ui.small_button(mode_label).clicked() {
                        self.replace_mode = !self.replace_mode;
                    }
                });

                // Apply actions after drawing so the engine is borrowed once
                if search_changed {
                    if self.search_input.is_empty() {
                        self.engine.clear();
                    } else {
                        self.engine.set_query(self.search_input.as_str());
                    }
                    output.reveal = self.current_range(text);
                }
                if let Some(update) = update {
                    self.engine.set_options(update);
                    output.reveal = self.current_range(text);
                }
                if go_next {
                    output.reveal = self.find_next(text);
                }
                if go_prev {
                    output.reveal = self.find_prev(text);
                }
                if replace_one {
                    let new_text = self.engine.replace(text, &self.replace_input);
                    output.reveal = self.current_range(&new_text);
                    output.new_text = Some(new_text);
                } else if replace_all {
                    output.new_text = Some(self.engine.replace_all(text, &self.replace_input));
                }
            });

        if output.closed {
            self.close();
        }

        output
    }
}

struct PanelColors {
    panel_bg: Color32,
    border: Color32,
    muted: Color32,
    accent: Color32,
    is_dark: bool,
}

impl PanelColors {
    fn new(is_dark: bool) -> Self {
        if is_dark {
            Self {
                panel_bg: Color32::from_rgb(45, 45, 45),
                border: Color32::from_rgb(70, 70, 70),
                muted: Color32::from_rgb(140, 140, 140),
                accent: Color32::from_rgb(100, 180, 255),
                is_dark,
            }
        } else {
            Self {
                panel_bg: Color32::from_rgb(250, 250, 250),
                border: Color32::from_rgb(200, 200, 200),
                muted: Color32::from_rgb(120, 120, 120),
                accent: Color32::from_rgb(0, 120, 212),
                is_dark,
            }
        }
    }
}

/// A small on/off button for a search option.
fn toggle_button<'a>(
    label: &'a str,
    tooltip: &'a str,
    active: bool,
    colors: &'a PanelColors,
) -> impl egui::Widget + 'a {
    move |ui: &mut Ui| -> egui::Response {
        let (text_color, bg_color, border_color) = match (active, colors.is_dark) {
            (true, true) => (colors.accent, Color32::from_rgb(50, 70, 90), colors.accent),
            (true, false) => (colors.accent, Color32::from_rgb(220, 235, 250), colors.accent),
            (false, _) => (colors.muted, Color32::TRANSPARENT, colors.border),
        };

        ui.add(
            egui::Button::new(RichText::new(label).size(12.0).color(text_color).strong())
                .fill(bg_color)
                .stroke(egui::Stroke::new(1.0, border_color))
                .min_size(Vec2::new(28.0, 24.0)),
        )
        .on_hover_text(tooltip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_close() {
        let mut panel = FindReplacePanel::new(SearchOptions::default());
        assert!(!panel.is_open());
        panel.open(true);
        assert!(panel.is_open());
        panel.close();
        assert!(!panel.is_open());
    }

    #[test]
    fn test_starts_with_given_options() {
        let options = SearchOptions {
            whole_word: true,
            ..SearchOptions::default()
        };
        let panel = FindReplacePanel::new(options);
        assert!(panel.engine.options().whole_word);
    }

    #[test]
    fn test_match_label() {
        let mut panel = FindReplacePanel::new(SearchOptions::default());
        assert_eq!(panel.match_label(None, 0), "");

        panel.engine.set_query("at");
        assert_eq!(panel.match_label(Some(0), 2), "1 of 2");
        assert_eq!(panel.match_label(None, 0), "No matches");
    }

    #[test]
    fn test_show_without_input_leaves_text_alone() {
        let ctx = egui::Context::default();
        let mut panel = FindReplacePanel::new(SearchOptions::default());
        panel.open(true);
        panel.engine.set_query("at");

        let mut output = FindReplacePanelOutput::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            output = panel.show(ctx, "the cat sat", false);
        });

        assert_eq!(output, FindReplacePanelOutput::default());
        assert!(panel.is_open());
    }

    #[test]
    fn test_navigation_returns_char_ranges() {
        let mut panel = FindReplacePanel::new(SearchOptions::default());
        panel.engine.set_query("at");
        let text = "the cat sat on the mat";

        assert_eq!(panel.find_next(text), Some((9, 11)));
        assert_eq!(panel.find_next(text), Some((20, 22)));
        assert_eq!(panel.find_next(text), Some((5, 7)));
        assert_eq!(panel.find_prev(text), Some((20, 22)));
    }

    #[test]
    fn test_seek_from_cursor() {
        let mut panel = FindReplacePanel::new(SearchOptions::default());
        panel.engine.set_query("at");
        let text = "the cat sat on the mat";

        assert_eq!(panel.seek(text, 6), Some((9, 11)));
        assert_eq!(panel.seek(text, 9), Some((9, 11)));
        assert_eq!(panel.seek(text, 21), Some((5, 7)));
        assert_eq!(panel.seek("nothing", 0), None);
    }
}
