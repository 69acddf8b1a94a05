//! Rendering the document tree.
//!
//! ## Learning: Exhaustive Rendering
//!
//! Node kinds and marks are enums, so turning the tree into widgets is a
//! `match` with an arm per kind. Adding a kind to the document model makes
//! this file fail to compile until the new kind has a look, which is the
//! point. Unknown kinds loaded from disk arrive as `Other(..)` and get a
//! plain rendering.

use std::ops::Range;

use iced::widget::text::Span;
use iced::widget::{self, column, container, mouse_area, rich_text, row, scrollable, span, text};
use iced::{Background, Border, ContentFit, Element, Font, Length, Padding, font};

use inkpad_doc::{Block, BlockKind, Image, Mark, Marks, Node, Text};

use crate::app::{App, Message};
use crate::theme::Theme;

/// What to draw on top of a leaf block's text.
#[derive(Debug, Default)]
pub struct LeafOverlay<'a> {
    /// Caret offset, if the focus is in this block
    pub caret: Option<usize>,
    /// Selected character range within this block
    pub selected: Option<Range<usize>>,
    /// Shown when the whole document is empty
    pub placeholder: Option<&'a str>,
}

/// Text runs of a leaf block, including those inside inlines.
fn runs(nodes: &[Node]) -> Vec<&Text> {
    let mut out = Vec::new();
    for node in nodes {
        match node {
            Node::Text(text) => out.push(text),
            Node::Inline(inline) => out.extend(runs(&inline.nodes)),
            Node::Block(_) | Node::Image(_) => {}
        }
    }
    out
}

fn styled<Link>(theme: &Theme, content: String, marks: &Marks, heading: bool, selected: bool) -> Span<'static, Link, Font> {
    let mut font = Font::DEFAULT;
    let mut color = theme.page.text;
    if heading {
        font.weight = font::Weight::Bold;
        color = theme.content.heading;
    }
    let mut underline = false;
    let mut background = None;

    for mark in marks {
        match mark {
            Mark::Bold => font.weight = font::Weight::Bold,
            Mark::Italic => font.style = font::Style::Italic,
            Mark::Underlined => underline = true,
            Mark::Code => {
                font.family = font::Family::Monospace;
                color = theme.content.code_text;
                background = Some(theme.content.code_background);
            }
            Mark::Other(_) => {}
        }
    }
    if selected {
        background = Some(theme.page.selection);
    }

    let mut piece = span(content)
        .font(font)
        .color(color.to_iced())
        .underline(underline);
    if let Some(background) = background {
        piece = piece.background(background.to_iced());
    }
    piece
}

/// Builds the spans for a leaf block: one per stretch of text with the same
/// marks and selection state, plus the caret.
pub fn leaf_spans<Link>(
    theme: &Theme,
    nodes: &[Node],
    heading: bool,
    overlay: &LeafOverlay<'_>,
) -> Vec<Span<'static, Link, Font>> {
    let caret = || span("|").color(theme.page.caret.to_iced());
    let is_selected = |offset: usize| {
        overlay
            .selected
            .as_ref()
            .is_some_and(|range| range.contains(&offset))
    };

    let mut spans = Vec::new();
    let mut offset = 0;
    for run in runs(nodes) {
        let mut piece = String::new();
        let mut piece_selected = false;
        for ch in run.text.chars() {
            let selected = is_selected(offset);
            let at_caret = overlay.caret == Some(offset);
            if !piece.is_empty() && (at_caret || selected != piece_selected) {
                let content = std::mem::take(&mut piece);
                spans.push(styled(theme, content, &run.marks, heading, piece_selected));
            }
            if at_caret {
                spans.push(caret());
            }
            piece_selected = selected;
            piece.push(ch);
            offset += 1;
        }
        if !piece.is_empty() {
            spans.push(styled(theme, piece, &run.marks, heading, piece_selected));
        }
    }

    if overlay.caret == Some(offset) {
        spans.push(caret());
    }
    if offset == 0 {
        match overlay.placeholder {
            Some(placeholder) => {
                spans.push(span(placeholder.to_string()).color(theme.page.placeholder.to_iced()))
            }
            // Keeps an empty block one line tall
            None => spans.push(span(" ")),
        }
    }
    spans
}

impl App {
    pub fn view_document(&self) -> Element<'_, Message> {
        let mut ordinal = 0;
        let blocks: Vec<Element<'_, Message>> = self
            .session
            .value()
            .document()
            .nodes
            .iter()
            .map(|node| self.view_node(node, &mut ordinal))
            .collect();

        let page = column(blocks)
            .spacing(self.style.block_spacing)
            .max_width(760.0);

        let background = self.theme.page.background.to_iced();
        container(
            scrollable(
                container(page)
                    .padding(self.style.page_padding)
                    .center_x(Length::Fill),
            )
            .height(Length::Fill),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .style(move |_| container::Style {
            background: Some(Background::Color(background)),
            ..Default::default()
        })
        .into()
    }

    /// Renders a node. `ordinal` counts the leaf blocks seen so far.
    fn view_node(&self, node: &Node, ordinal: &mut usize) -> Element<'_, Message> {
        match node {
            Node::Image(image) => {
                let current = *ordinal;
                *ordinal += 1;
                self.leaf_area(current, self.view_image(image, current))
            }
            Node::Block(block) if block.has_block_children() => self.view_container(block, ordinal),
            Node::Block(block) => {
                let current = *ordinal;
                *ordinal += 1;
                self.leaf_area(current, self.view_leaf(block, current))
            }
            // Normalization wraps stray inline content, so this is transient
            Node::Inline(_) | Node::Text(_) => text(node.plain_text())
                .size(self.theme.font.size)
                .color(self.theme.page.text.to_iced())
                .into(),
        }
    }

    fn view_container(&self, block: &Block, ordinal: &mut usize) -> Element<'_, Message> {
        let children: Vec<Element<'_, Message>> = block
            .nodes
            .iter()
            .filter(|child| child.is_block_like())
            .map(|child| self.view_node(child, ordinal))
            .collect();

        match &block.kind {
            BlockKind::BulletedList => self.view_list(children, |_| "\u{2022}".to_string()),
            BlockKind::NumberedList => self.view_list(children, |index| format!("{}.", index + 1)),
            BlockKind::BlockQuote => self.view_quote(column(children).spacing(self.style.block_spacing).into()),
            BlockKind::Paragraph
            | BlockKind::HeadingOne
            | BlockKind::HeadingTwo
            | BlockKind::ListItem
            | BlockKind::Other(_) => column(children).spacing(self.style.block_spacing).into(),
        }
    }

    fn view_leaf(&self, block: &Block, ordinal: usize) -> Element<'_, Message> {
        let heading = match &block.kind {
            BlockKind::HeadingOne => Some(1),
            BlockKind::HeadingTwo => Some(2),
            _ => None,
        };

        let spans = leaf_spans(
            &self.theme,
            &block.nodes,
            heading.is_some(),
            &self.overlay_for(ordinal),
        );
        let body: Element<'_, Message> = rich_text(spans)
            .size(self.theme.font.size_for(heading))
            .line_height(self.theme.font.line_height)
            .width(Length::Fill)
            .into();

        match &block.kind {
            BlockKind::BlockQuote => self.view_quote(body),
            BlockKind::Paragraph
            | BlockKind::HeadingOne
            | BlockKind::HeadingTwo
            | BlockKind::ListItem
            | BlockKind::NumberedList
            | BlockKind::BulletedList
            | BlockKind::Other(_) => body,
        }
    }

    fn view_image(&self, image: &Image, ordinal: usize) -> Element<'_, Message> {
        let focused = self.session.value().selection().focus.block == ordinal;

        let content: Element<'_, Message> = match self.images.get(&image.src) {
            Some(handle) => widget::image(handle.clone())
                .content_fit(ContentFit::ScaleDown)
                .into(),
            None => {
                let label = if image.src.starts_with("data:") {
                    "[unreadable image]".to_string()
                } else {
                    format!("[image] {}", image.src)
                };
                text(label)
                    .size(self.theme.font.size)
                    .color(self.theme.page.placeholder.to_iced())
                    .into()
            }
        };

        let border_color = if focused {
            self.theme.page.caret.to_iced()
        } else {
            self.theme.content.image_border.to_iced()
        };
        container(content)
            .max_height(self.style.image_max_height)
            .padding(4)
            .style(move |_| container::Style {
                border: Border {
                    color: border_color,
                    width: if focused { 2.0 } else { 1.0 },
                    radius: 4.0.into(),
                },
                ..Default::default()
            })
            .into()
    }

    fn view_list<'a>(
        &'a self,
        items: Vec<Element<'a, Message>>,
        marker: impl Fn(usize) -> String,
    ) -> Element<'a, Message> {
        let marker_color = self.theme.content.list_marker.to_iced();
        let rows = items.into_iter().enumerate().map(|(index, item)| {
            let entry: Element<'a, Message> = row![
                text(marker(index))
                    .size(self.theme.font.size)
                    .color(marker_color)
                    .width(Length::Fixed(self.style.list_indent)),
                item,
            ]
            .into();
            entry
        });
        column(rows).spacing(self.style.block_spacing / 2.0).into()
    }

    fn view_quote<'a>(&'a self, content: Element<'a, Message>) -> Element<'a, Message> {
        let bar = self.theme.content.quote_bar.to_iced();
        let bar_width = self.style.quote_bar_width;
        container(content)
            .padding(Padding {
                left: self.style.quote_indent,
                ..Padding::from(4)
            })
            .width(Length::Fill)
            .style(move |_| container::Style {
                background: Some(Background::Color(bar.scale_alpha(0.25))),
                border: Border {
                    color: bar,
                    width: bar_width,
                    radius: 2.0.into(),
                },
                ..Default::default()
            })
            .into()
    }

    /// Wraps a leaf block so it can be clicked and used as a drop target.
    fn leaf_area<'a>(&'a self, ordinal: usize, content: Element<'a, Message>) -> Element<'a, Message> {
        let background = (self.hovered_block == Some(ordinal))
            .then(|| Background::Color(self.theme.page.hovered_block.to_iced()));

        mouse_area(
            container(content)
                .width(Length::Fill)
                .padding(Padding::from([2, 4]))
                .style(move |_| container::Style {
                    background,
                    border: Border {
                        radius: 4.0.into(),
                        ..Default::default()
                    },
                    ..Default::default()
                }),
        )
        .on_press(Message::BlockClicked(ordinal))
        .on_enter(Message::BlockHovered(ordinal))
        .on_exit(Message::BlockExited(ordinal))
        .into()
    }

    fn overlay_for(&self, ordinal: usize) -> LeafOverlay<'_> {
        let value = self.session.value();
        let selection = value.selection();
        let (start, end) = (selection.start(), selection.end());

        let selected = if selection.is_collapsed() || ordinal < start.block || ordinal > end.block {
            None
        } else {
            let from = if ordinal == start.block { start.offset } else { 0 };
            let to = if ordinal == end.block { end.offset } else { usize::MAX };
            Some(from..to)
        };

        let empty = value.leaf_block_count() == 1 && value.document().plain_text().is_empty();
        LeafOverlay {
            caret: (selection.focus.block == ordinal).then_some(selection.focus.offset),
            selected,
            placeholder: (empty && ordinal == 0).then_some(self.placeholder.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(spans: &[Span<'static, (), Font>]) -> Vec<String> {
        spans.iter().map(|span| span.text.to_string()).collect()
    }

    fn block() -> Vec<Node> {
        vec![
            Node::Text(Text::new("plain ")),
            Node::Text(Text::with_marks("bold", [Mark::Bold])),
        ]
    }

    #[test]
    fn test_runs_keep_their_marks() {
        let theme = Theme::dark();
        let spans = leaf_spans(&theme, &block(), false, &LeafOverlay::default());
        assert_eq!(texts(&spans), vec!["plain ", "bold"]);
        assert_eq!(spans[1].font.map(|font| font.weight), Some(font::Weight::Bold));
        assert_eq!(spans[0].font.map(|font| font.weight), Some(font::Weight::Normal));
    }

    #[test]
    fn test_marks_map_to_styles() {
        let theme = Theme::dark();
        let nodes = vec![
            Node::Text(Text::with_marks("u", [Mark::Underlined])),
            Node::Text(Text::with_marks("c", [Mark::Code])),
            Node::Text(Text::with_marks("i", [Mark::Italic])),
            Node::Text(Text::with_marks("x", [Mark::Other("strike".to_string())])),
        ];
        let spans: Vec<Span<'static, (), Font>> = leaf_spans(&theme, &nodes, false, &LeafOverlay::default());
        assert!(spans[0].underline);
        assert_eq!(spans[1].font.map(|font| font.family), Some(font::Family::Monospace));
        assert_eq!(spans[2].font.map(|font| font.style), Some(font::Style::Italic));
        assert_eq!(spans[3].font, Some(Font::DEFAULT));
        assert!(!spans[3].underline);
    }

    #[test]
    fn test_caret_and_selection_split_runs() {
        let theme = Theme::dark();
        let overlay = LeafOverlay {
            caret: Some(8),
            selected: Some(2..8),
            placeholder: None,
        };
        let spans = leaf_spans(&theme, &block(), false, &overlay);
        assert_eq!(texts(&spans), vec!["pl", "ain ", "bo", "|", "ld"]);
    }

    #[test]
    fn test_caret_at_end() {
        let theme = Theme::dark();
        let overlay = LeafOverlay {
            caret: Some(10),
            ..Default::default()
        };
        let spans = leaf_spans(&theme, &block(), false, &overlay);
        assert_eq!(texts(&spans).last().map(String::as_str), Some("|"));
    }

    #[test]
    fn test_empty_block_shows_placeholder() {
        let theme = Theme::dark();
        let nodes = vec![Node::Text(Text::new(""))];
        let overlay = LeafOverlay {
            caret: Some(0),
            selected: None,
            placeholder: Some("Enter some rich text..."),
        };
        let spans = leaf_spans(&theme, &nodes, false, &overlay);
        assert_eq!(texts(&spans), vec!["|", "Enter some rich text..."]);

        let spans = leaf_spans(&theme, &nodes, false, &LeafOverlay::default());
        assert_eq!(texts(&spans), vec![" "]);
    }
}
