//! Read-only rendered preview
//!
//! The document is parsed with comrak into a small block model, which is
//! cached until the source changes and drawn with plain egui widgets.

use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena};
use eframe::egui::{self, Color32, FontId, RichText, Ui, Vec2};

use super::comrak_options;

// ─────────────────────────────────────────────────────────────────────────────
// Block Model
// ─────────────────────────────────────────────────────────────────────────────

/// A run of inline text with the styles inherited from its ancestors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Span {
    pub text: String,
    pub strong: bool,
    pub emphasis: bool,
    pub strikethrough: bool,
    pub code: bool,
    pub link: Option<String>,
}

/// Block-level structure of a rendered document.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { level: u8, spans: Vec<Span> },
    Paragraph(Vec<Span>),
    CodeBlock { info: String, literal: String },
    /// `start` is `Some(n)` for ordered lists
    List { start: Option<usize>, items: Vec<Vec<Block>> },
    Quote(Vec<Block>),
    Table { header: Vec<Vec<Span>>, rows: Vec<Vec<Vec<Span>>> },
    Rule,
    Html(String),
}

/// Parse `markdown` into blocks.
pub fn parse_blocks(markdown: &str) -> Vec<Block> {
    let arena = Arena::new();
    let root = parse_document(&arena, markdown, &comrak_options());
    collect_blocks(root)
}

fn collect_blocks<'a>(node: &'a AstNode<'a>) -> Vec<Block> {
    node.children().filter_map(convert_block).collect()
}

fn convert_block<'a>(node: &'a AstNode<'a>) -> Option<Block> {
    let value = node.data.borrow().value.clone();
    let block = match value {
        NodeValue::Heading(heading) => Block::Heading {
            level: heading.level,
            spans: collect_spans(node),
        },
        NodeValue::Paragraph => Block::Paragraph(collect_spans(node)),
        NodeValue::CodeBlock(code) => Block::CodeBlock {
            info: code.info,
            literal: code.literal.trim_end_matches('\n').to_string(),
        },
        NodeValue::List(list) => Block::List {
            start: (list.list_type == ListType::Ordered).then_some(list.start),
            items: node.children().map(collect_blocks).collect(),
        },
        NodeValue::BlockQuote => Block::Quote(collect_blocks(node)),
        NodeValue::Table(_) => {
            let mut header = Vec::new();
            let mut rows = Vec::new();
            for row in node.children() {
                let is_header = matches!(row.data.borrow().value, NodeValue::TableRow(true));
                let cells: Vec<Vec<Span>> = row.children().map(collect_spans).collect();
                if is_header {
                    header = cells;
                } else {
                    rows.push(cells);
                }
            }
            Block::Table { header, rows }
        }
        NodeValue::ThematicBreak => Block::Rule,
        NodeValue::HtmlBlock(html) => Block::Html(html.literal.trim_end().to_string()),
        _ => return None,
    };
    Some(block)
}

fn collect_spans<'a>(node: &'a AstNode<'a>) -> Vec<Span> {
    let mut spans = Vec::new();
    for child in node.children() {
        push_spans(child, &Span::default(), &mut spans);
    }
    spans
}

fn push_spans<'a>(node: &'a AstNode<'a>, style: &Span, out: &mut Vec<Span>) {
    let value = node.data.borrow().value.clone();
    let styled = |text: String| Span {
        text,
        ..style.clone()
    };

    match value {
        NodeValue::Text(text) => out.push(styled(text)),
        NodeValue::Code(code) => out.push(Span {
            code: true,
            ..styled(code.literal)
        }),
        NodeValue::SoftBreak => out.push(styled(" ".to_string())),
        NodeValue::LineBreak => out.push(styled("\n".to_string())),
        NodeValue::HtmlInline(html) => out.push(styled(html)),
        _ => {
            let mut inner = style.clone();
            match value {
                NodeValue::Strong => inner.strong = true,
                NodeValue::Emph => inner.emphasis = true,
                NodeValue::Strikethrough => inner.strikethrough = true,
                NodeValue::Link(link) => inner.link = Some(link.url),
                NodeValue::Image(image) => inner.link = Some(image.url),
                _ => {}
            }
            for child in node.children() {
                push_spans(child, &inner, out);
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Preview Widget
// ─────────────────────────────────────────────────────────────────────────────

/// Rendered preview with a parse cache.
#[derive(Default)]
pub struct MarkdownPreview {
    source: String,
    blocks: Vec<Block>,
}

impl MarkdownPreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks for `markdown`, reparsing only when it changed.
    pub fn blocks(&mut self, markdown: &str) -> &[Block] {
        if self.source != markdown {
            self.source = markdown.to_string();
            self.blocks = parse_blocks(markdown);
        }
        &self.blocks
    }

    pub fn show(&mut self, ui: &mut Ui, markdown: &str, font_size: f32) {
        let colors = PreviewColors::from_visuals(ui.visuals());
        let blocks = self.blocks(markdown);

        egui::ScrollArea::vertical()
            .id_source("markdown_preview")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if blocks.is_empty() {
                    ui.label(
                        RichText::new("Nothing to preview")
                            .italics()
                            .color(colors.muted),
                    );
                }
                for (idx, block) in blocks.iter().enumerate() {
                    ui.push_id(idx, |ui| render_block(ui, block, &colors, font_size, 0));
                }
            });
    }
}

struct PreviewColors {
    text: Color32,
    heading: Color32,
    muted: Color32,
    link: Color32,
    code_bg: Color32,
    rule: Color32,
}

impl PreviewColors {
    fn from_visuals(visuals: &egui::Visuals) -> Self {
        if visuals.dark_mode {
            Self {
                text: Color32::from_rgb(220, 220, 220),
                heading: Color32::from_rgb(240, 240, 240),
                muted: Color32::from_rgb(140, 140, 150),
                link: Color32::from_rgb(100, 160, 255),
                code_bg: Color32::from_rgb(45, 45, 50),
                rule: Color32::from_rgb(70, 70, 80),
            }
        } else {
            Self {
                text: Color32::from_rgb(40, 40, 40),
                heading: Color32::from_rgb(20, 20, 20),
                muted: Color32::from_rgb(100, 100, 110),
                link: Color32::from_rgb(0, 100, 200),
                code_bg: Color32::from_rgb(240, 240, 242),
                rule: Color32::from_rgb(210, 210, 215),
            }
        }
    }
}

fn render_block(ui: &mut Ui, block: &Block, colors: &PreviewColors, font_size: f32, depth: usize) {
    match block {
        Block::Heading { level, spans } => {
            let size = match level {
                1 => font_size * 1.8,
                2 => font_size * 1.5,
                3 => font_size * 1.3,
                4 => font_size * 1.15,
                5 => font_size * 1.05,
                _ => font_size,
            };
            ui.add_space(if *level <= 2 { 8.0 } else { 4.0 });
            ui.horizontal_wrapped(|ui| {
                for span in spans {
                    ui.label(span_text(span, colors, size).strong().color(colors.heading));
                }
            });
            ui.add_space(4.0);
        }
        Block::Paragraph(spans) => {
            render_spans(ui, spans, colors, font_size);
            ui.add_space(6.0);
        }
        Block::CodeBlock { info, literal } => {
            egui::Frame::none()
                .fill(colors.code_bg)
                .inner_margin(8.0)
                .rounding(4.0)
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    if !info.is_empty() {
                        ui.label(RichText::new(info).small().color(colors.muted));
                    }
                    ui.label(
                        RichText::new(literal)
                            .font(FontId::monospace(font_size * 0.9))
                            .color(colors.text),
                    );
                });
            ui.add_space(6.0);
        }
        Block::List { start, items } => {
            for (i, item) in items.iter().enumerate() {
                let marker = match start {
                    Some(n) => format!("{}.", n + i),
                    None => "•".to_string(),
                };
                ui.horizontal(|ui| {
                    ui.add_space(8.0 + depth as f32 * 16.0);
                    ui.label(RichText::new(marker).size(font_size).color(colors.muted));
                    ui.vertical(|ui| {
                        for (j, child) in item.iter().enumerate() {
                            ui.push_id(j, |ui| {
                                render_block(ui, child, colors, font_size, depth + 1)
                            });
                        }
                    });
                });
            }
            ui.add_space(4.0);
        }
        Block::Quote(children) => {
            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(
                    Vec2::new(4.0, font_size * 1.5 * children.len().max(1) as f32),
                    egui::Sense::hover(),
                );
                ui.painter().rect_filled(rect, 0.0, colors.rule);
                ui.add_space(8.0);
                ui.vertical(|ui| {
                    for (j, child) in children.iter().enumerate() {
                        ui.push_id(j, |ui| render_block(ui, child, colors, font_size, depth));
                    }
                });
            });
            ui.add_space(6.0);
        }
        Block::Table { header, rows } => {
            egui::Grid::new(ui.id().with("table"))
                .striped(true)
                .spacing([16.0, 4.0])
                .show(ui, |ui| {
                    for cell in header {
                        ui.horizontal_wrapped(|ui| {
                            for span in cell {
                                ui.label(span_text(span, colors, font_size).strong());
                            }
                        });
                    }
                    ui.end_row();
                    for row in rows {
                        for cell in row {
                            render_spans(ui, cell, colors, font_size);
                        }
                        ui.end_row();
                    }
                });
            ui.add_space(6.0);
        }
        Block::Rule => {
            ui.add_space(4.0);
            let (rect, _) = ui.allocate_exact_size(
                Vec2::new(ui.available_width(), 1.0),
                egui::Sense::hover(),
            );
            ui.painter().rect_filled(rect, 0.0, colors.rule);
            ui.add_space(4.0);
        }
        Block::Html(html) => {
            ui.label(
                RichText::new(html)
                    .font(FontId::monospace(font_size * 0.9))
                    .color(colors.muted),
            );
        }
    }
}

fn render_spans(ui: &mut Ui, spans: &[Span], colors: &PreviewColors, font_size: f32) {
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        for span in spans {
            if span.text == "\n" {
                ui.end_row();
                continue;
            }
            match &span.link {
                Some(url) => {
                    ui.hyperlink_to(span_text(span, colors, font_size).color(colors.link), url);
                }
                None => {
                    ui.label(span_text(span, colors, font_size));
                }
            }
        }
    });
}

fn span_text(span: &Span, colors: &PreviewColors, font_size: f32) -> RichText {
    let mut text = RichText::new(&span.text).color(colors.text);
    text = if span.code {
        text.font(FontId::monospace(font_size * 0.9))
            .background_color(colors.code_bg)
    } else {
        text.size(font_size)
    };
    if span.strong {
        text = text.strong();
    }
    if span.emphasis {
        text = text.italics();
    }
    if span.strikethrough {
        text = text.strikethrough();
    }
    text
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(spans: &[Span]) -> String {
        spans.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_heading_and_paragraph() {
        let blocks = parse_blocks("# Title\n\nSome *nice* **bold** text");
        assert_eq!(blocks.len(), 2);

        match &blocks[0] {
            Block::Heading { level, spans } => {
                assert_eq!(*level, 1);
                assert_eq!(plain(spans), "Title");
            }
            other => panic!("Expected heading, got {:?}", other),
        }

        match &blocks[1] {
            Block::Paragraph(spans) => {
                assert_eq!(plain(spans), "Some nice bold text");
                assert!(spans.iter().any(|s| s.text == "nice" && s.emphasis));
                assert!(spans.iter().any(|s| s.text == "bold" && s.strong));
            }
            other => panic!("Expected paragraph, got {:?}", other),
        }
    }

    #[test]
    fn test_code_block() {
        let blocks = parse_blocks("```rust\nfn main() {}\n```");
        assert_eq!(
            blocks,
            vec![Block::CodeBlock {
                info: "rust".to_string(),
                literal: "fn main() {}".to_string(),
            }]
        );
    }

    #[test]
    fn test_ordered_and_bullet_lists() {
        let blocks = parse_blocks("3. a\n4. b\n\n- x\n");
        match &blocks[0] {
            Block::List { start, items } => {
                assert_eq!(*start, Some(3));
                assert_eq!(items.len(), 2);
            }
            other => panic!("Expected list, got {:?}", other),
        }
        match &blocks[1] {
            Block::List { start, items } => {
                assert_eq!(*start, None);
                assert_eq!(items.len(), 1);
            }
            other => panic!("Expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_table() {
        let blocks = parse_blocks("| a | b |\n| --- | --- |\n| 1 | 2 |\n| 3 | 4 |");
        match &blocks[0] {
            Block::Table { header, rows } => {
                assert_eq!(header.len(), 2);
                assert_eq!(plain(&header[0]), "a");
                assert_eq!(rows.len(), 2);
                assert_eq!(plain(&rows[1][1]), "4");
            }
            other => panic!("Expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_link_and_inline_code() {
        let blocks = parse_blocks("See [docs](https://example.com) and `code`");
        let Block::Paragraph(spans) = &blocks[0] else {
            panic!("Expected paragraph");
        };
        assert!(spans
            .iter()
            .any(|s| s.text == "docs" && s.link.as_deref() == Some("https://example.com")));
        assert!(spans.iter().any(|s| s.text == "code" && s.code));
    }

    #[test]
    fn test_quote_and_rule() {
        let blocks = parse_blocks("> quoted\n\n---\n");
        assert!(matches!(&blocks[0], Block::Quote(inner) if inner.len() == 1));
        assert_eq!(blocks[1], Block::Rule);
    }

    #[test]
    fn test_preview_cache_reparses_on_change() {
        let mut preview = MarkdownPreview::new();
        assert_eq!(preview.blocks("# A").len(), 1);
        assert_eq!(preview.blocks("# A\n\nB").len(), 2);
        assert!(preview.blocks("").is_empty());
    }
}
