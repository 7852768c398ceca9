//! Command registry and fuzzy command search
//!
//! The registry owns the static command list, the fuzzy scorer, and the
//! recent-commands list. An empty query returns every command in definition
//! order; anything else is ranked by weighted fuzzy relevance.

use log::debug;

use super::fuzzy::FuzzyScorer;
use super::recent::RecentCommands;
use crate::markdown::MarkdownFormat;
use crate::storage::KeyValueStore;

/// Default fuzzy distance cutoff for command search
pub const DEFAULT_SEARCH_THRESHOLD: f64 = 0.4;

// ─────────────────────────────────────────────────────────────────────────────
// Command Action
// ─────────────────────────────────────────────────────────────────────────────

/// What the application does when a command is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    /// Apply a Markdown formatting operation to the editor selection
    Format(MarkdownFormat),
    /// Open the find bar
    Find,
    /// Open the find bar with the replace row
    FindReplace,
    /// Save the document as a `.md` file
    ExportMarkdown,
    /// Save the rendered document as a standalone `.html` file
    ExportHtml,
    /// Copy the rendered document to the clipboard
    CopyHtml,
    /// Switch to the next color theme
    ToggleTheme,
    /// Cycle split / editor / preview
    CycleViewMode,
    /// Clear the document
    NewDocument,
    /// Persist the document now
    SaveDocument,
}

// ─────────────────────────────────────────────────────────────────────────────
// Command
// ─────────────────────────────────────────────────────────────────────────────

/// A palette entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub shortcut: Option<String>,
    pub icon: Option<String>,
    pub category: Option<String>,
    pub action: CommandAction,
}

impl Command {
    pub fn new(id: impl Into<String>, name: impl Into<String>, action: CommandAction) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            shortcut: None,
            icon: None,
            category: None,
            action,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────────────────────────────────────

/// Searchable command list with recency tracking.
pub struct CommandRegistry {
    commands: Vec<Command>,
    scorer: FuzzyScorer,
    recent: RecentCommands,
}

impl CommandRegistry {
    /// Build a registry over `commands`, keeping recency in `store`.
    pub fn new(commands: Vec<Command>, store: Box<dyn KeyValueStore>) -> Self {
        Self {
            commands,
            scorer: FuzzyScorer::new(DEFAULT_SEARCH_THRESHOLD),
            recent: RecentCommands::new(store),
        }
    }

    /// Use a different distance cutoff (0.0 exact only, 1.0 anything).
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.scorer = FuzzyScorer::new(threshold).with_weights(self.scorer.weights());
        self
    }

    /// Keep at most `max` recent commands.
    pub fn with_max_recent(mut self, max: usize) -> Self {
        self.recent = self.recent.with_max(max);
        self
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn get(&self, id: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.id == id)
    }

    /// Commands matching `query`, best first.
    ///
    /// A blank query returns every command in definition order. Equal scores
    /// keep definition order.
    pub fn search(&self, query: &str) -> Vec<&Command> {
        if query.trim().is_empty() {
            return self.commands.iter().collect();
        }

        let weights = self.scorer.weights();
        let mut scored: Vec<(f64, &Command)> = self
            .commands
            .iter()
            .filter_map(|command| {
                let fields = [
                    (Some(command.name.as_str()), weights.name),
                    (command.description.as_deref(), weights.description),
                    (command.category.as_deref(), weights.category),
                ];
                self.scorer
                    .score_fields(query, &fields)
                    .map(|score| (score, command))
            })
            .collect();

        scored.sort_by(|a, b| a.0.total_cmp(&b.0));
        debug!("Command search '{}': {} results", query, scored.len());

        scored.into_iter().map(|(_, command)| command).collect()
    }

    /// Record that the command `id` was executed.
    pub fn add_recent_command(&self, id: &str) {
        self.recent.push(id);
    }

    /// Recently executed commands, most recent first.
    ///
    /// Ids that no longer name a command are skipped.
    pub fn recent_command_objects(&self) -> Vec<&Command> {
        self.recent
            .ids()
            .iter()
            .filter_map(|id| self.get(id))
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::tests::BrokenStore;
    use crate::storage::MemoryStore;

    fn sample_registry() -> CommandRegistry {
        let commands = vec![
            Command::new("bold", "Bold", CommandAction::Format(MarkdownFormat::Bold))
                .description("Make selected text bold")
                .category("Format"),
            Command::new(
                "italic",
                "Italic",
                CommandAction::Format(MarkdownFormat::Italic),
            )
            .description("Make selected text italic")
            .category("Format"),
            Command::new(
                "export-markdown",
                "Export as Markdown",
                CommandAction::ExportMarkdown,
            )
            .description("Save the document as a .md file")
            .category("Export"),
        ];
        CommandRegistry::new(commands, Box::new(MemoryStore::new()))
    }

    fn names<'a>(commands: &[&'a Command]) -> Vec<&'a str> {
        commands.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_query_ranks_bold_first() {
        let registry = sample_registry();
        let results = registry.search("bol");
        assert_eq!(results.first().map(|c| c.id.as_str()), Some("bold"));
    }

    #[test]
    fn test_empty_query_returns_definition_order() {
        let registry = sample_registry();
        assert_eq!(
            names(&registry.search("")),
            vec!["Bold", "Italic", "Export as Markdown"]
        );
        assert_eq!(registry.search("   ").len(), 3);
    }

    #[test]
    fn test_typo_still_finds_command() {
        let registry = sample_registry();
        let results = registry.search("itlaic");
        assert_eq!(results.first().map(|c| c.id.as_str()), Some("italic"));
    }

    #[test]
    fn test_category_match() {
        let registry = sample_registry();
        let results = registry.search("export");
        assert_eq!(results.first().map(|c| c.id.as_str()), Some("export-markdown"));
    }

    #[test]
    fn test_unmatched_query_is_empty() {
        let registry = sample_registry();
        assert!(registry.search("zzzzqqq").is_empty());
    }

    #[test]
    fn test_strict_threshold() {
        let registry = sample_registry().with_threshold(0.0);
        assert!(registry.search("itlaic").is_empty());
        assert_eq!(names(&registry.search("italic")), vec!["Italic"]);
    }

    #[test]
    fn test_recency_dedup() {
        let registry = sample_registry();
        registry.add_recent_command("italic");
        registry.add_recent_command("bold");
        registry.add_recent_command("italic");

        assert_eq!(
            names(&registry.recent_command_objects()),
            vec!["Italic", "Bold"]
        );
    }

    #[test]
    fn test_recency_drops_unknown_ids() {
        let registry = sample_registry();
        registry.add_recent_command("bold");
        registry.add_recent_command("removed-in-last-version");
        assert_eq!(names(&registry.recent_command_objects()), vec!["Bold"]);
    }

    #[test]
    fn test_recency_respects_max() {
        let registry = sample_registry().with_max_recent(2);
        registry.add_recent_command("bold");
        registry.add_recent_command("italic");
        registry.add_recent_command("export-markdown");
        assert_eq!(
            names(&registry.recent_command_objects()),
            vec!["Export as Markdown", "Italic"]
        );
    }

    #[test]
    fn test_broken_store_has_no_recents() {
        let registry = CommandRegistry::new(sample_registry().commands().to_vec(), Box::new(BrokenStore));
        registry.add_recent_command("bold");
        assert!(registry.recent_command_objects().is_empty());
    }

    #[test]
    fn test_get() {
        let registry = sample_registry();
        assert_eq!(registry.get("italic").map(|c| c.name.as_str()), Some("Italic"));
        assert!(registry.get("missing").is_none());
    }
}
