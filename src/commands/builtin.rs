//! The commands shipped with the editor.

use super::registry::{Command, CommandAction};
use crate::markdown::MarkdownFormat;

/// Every built-in command, in palette order.
pub fn builtin_commands() -> Vec<Command> {
    vec![
        // Formatting
        Command::new("format-bold", "Bold", CommandAction::Format(MarkdownFormat::Bold))
            .description("Make the selected text bold")
            .shortcut("Ctrl+B")
            .icon("B")
            .category("Format"),
        Command::new(
            "format-italic",
            "Italic",
            CommandAction::Format(MarkdownFormat::Italic),
        )
        .description("Make the selected text italic")
        .shortcut("Ctrl+I")
        .icon("I")
        .category("Format"),
        Command::new(
            "format-heading-1",
            "Heading 1",
            CommandAction::Format(MarkdownFormat::Heading(1)),
        )
        .description("Turn the current line into a top-level heading")
        .icon("H1")
        .category("Format"),
        Command::new(
            "format-heading-2",
            "Heading 2",
            CommandAction::Format(MarkdownFormat::Heading(2)),
        )
        .description("Turn the current line into a section heading")
        .icon("H2")
        .category("Format"),
        Command::new(
            "format-code-block",
            "Code Block",
            CommandAction::Format(MarkdownFormat::CodeBlock),
        )
        .description("Wrap the selection in a fenced code block")
        .icon("{ }")
        .category("Format"),
        Command::new(
            "format-link",
            "Insert Link",
            CommandAction::Format(MarkdownFormat::Link),
        )
        .description("Turn the selection into a Markdown link")
        .icon("🔗")
        .category("Format"),
        Command::new(
            "format-table",
            "Insert Table",
            CommandAction::Format(MarkdownFormat::Table),
        )
        .description("Insert an empty two-column table")
        .icon("▦")
        .category("Format"),
        // Search
        Command::new("find", "Find", CommandAction::Find)
            .description("Search the document")
            .shortcut("Ctrl+F")
            .icon("🔍")
            .category("Edit"),
        Command::new("find-replace", "Find and Replace", CommandAction::FindReplace)
            .description("Search and replace text in the document")
            .shortcut("Ctrl+H")
            .icon("🔍")
            .category("Edit"),
        // Document
        Command::new("new-document", "New Document", CommandAction::NewDocument)
            .description("Clear the editor and start over")
            .icon("📄")
            .category("File"),
        Command::new("save-document", "Save Document", CommandAction::SaveDocument)
            .description("Store the document now")
            .shortcut("Ctrl+S")
            .icon("💾")
            .category("File"),
        Command::new(
            "export-markdown",
            "Export as Markdown",
            CommandAction::ExportMarkdown,
        )
        .description("Save the document as a .md file")
        .icon("📝")
        .category("Export"),
        Command::new("export-html", "Export as HTML", CommandAction::ExportHtml)
            .description("Save the rendered document as a web page")
            .icon("🌐")
            .category("Export"),
        Command::new("copy-html", "Copy as HTML", CommandAction::CopyHtml)
            .description("Copy the rendered document to the clipboard")
            .icon("📋")
            .category("Export"),
        // View
        Command::new("toggle-theme", "Toggle Theme", CommandAction::ToggleTheme)
            .description("Switch between light, dark, and system colors")
            .icon("🎨")
            .category("View"),
        Command::new("cycle-view-mode", "Cycle View Mode", CommandAction::CycleViewMode)
            .description("Switch between split, editor, and preview")
            .icon("◫")
            .category("View"),
    ]
}
