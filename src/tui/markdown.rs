// Markdown rendering for chat message bodies
//
// Two stages: pulldown-cmark events are folded into a flat list of styled
// segments, then the segments are laid out into width-wrapped ratatui lines.
// The explicit segment list keeps wrapping under our control so the panel's
// line count is accurate for scrolling.
//
// Supports headings, bold/italic/strikethrough, inline code, fenced and
// indented code blocks, lists, blockquotes, and rules. Links render as
// their text; tables and raw HTML are out of scope for chat bodies.

use crate::theme::Theme;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

/// A segment of parsed markdown with semantic meaning
#[derive(Debug, Clone, PartialEq)]
pub enum StyledSegment {
    /// Regular text
    Text(String),
    /// Inline code: `like this`
    InlineCode(String),
    /// Bold text
    Bold(String),
    /// Italic text
    Italic(String),
    /// Strikethrough text
    Strikethrough(String),
    /// Fenced or indented code block
    CodeBlock { code: String },
    /// Heading with level
    Heading { level: u8, text: String },
    /// Start of a list item (bullet or number)
    ListItemStart { number: Option<u64>, depth: usize },
    /// End of a list item
    ListItemEnd,
    /// Start of blockquote
    BlockQuoteStart,
    /// End of blockquote
    BlockQuoteEnd,
    /// Horizontal rule
    Rule,
    /// Soft break (single newline in source)
    SoftBreak,
    /// Hard break (explicit line break)
    HardBreak,
    /// End of paragraph (adds blank line for spacing)
    ParagraphEnd,
}

/// Parse markdown into styled segments
pub fn parse_markdown(markdown: &str) -> Vec<StyledSegment> {
    let mut segments = Vec::new();

    let mut in_code_block = false;
    let mut code = String::new();
    let mut in_heading: Option<u8> = None;
    let mut heading = String::new();

    // Inline emphasis state
    let mut in_bold = false;
    let mut in_italic = false;
    let mut in_strikethrough = false;

    // List tracking: stack of next ordered numbers (None for bullets)
    let mut list_stack: Vec<Option<u64>> = Vec::new();

    let options = Options::ENABLE_STRIKETHROUGH;

    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                in_heading = Some(match level {
                    HeadingLevel::H1 => 1,
                    HeadingLevel::H2 => 2,
                    HeadingLevel::H3 => 3,
                    HeadingLevel::H4 => 4,
                    HeadingLevel::H5 => 5,
                    HeadingLevel::H6 => 6,
                });
                heading.clear();
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(level) = in_heading.take() {
                    segments.push(StyledSegment::Heading {
                        level,
                        text: std::mem::take(&mut heading),
                    });
                }
            }

            Event::Start(Tag::CodeBlock(_)) => {
                in_code_block = true;
                code.clear();
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                segments.push(StyledSegment::CodeBlock {
                    code: std::mem::take(&mut code),
                });
            }

            Event::Start(Tag::List(first_number)) => list_stack.push(first_number),
            Event::End(TagEnd::List(_)) => {
                list_stack.pop();
                if list_stack.is_empty() {
                    segments.push(StyledSegment::ParagraphEnd);
                }
            }
            Event::Start(Tag::Item) => {
                let depth = list_stack.len().saturating_sub(1);
                let number = list_stack.last().copied().flatten();
                if let Some(Some(counter)) = list_stack.last_mut() {
                    *counter += 1;
                }
                segments.push(StyledSegment::ListItemStart { number, depth });
            }
            Event::End(TagEnd::Item) => segments.push(StyledSegment::ListItemEnd),

            Event::Start(Tag::Strong) => in_bold = true,
            Event::End(TagEnd::Strong) => in_bold = false,
            Event::Start(Tag::Emphasis) => in_italic = true,
            Event::End(TagEnd::Emphasis) => in_italic = false,
            Event::Start(Tag::Strikethrough) => in_strikethrough = true,
            Event::End(TagEnd::Strikethrough) => in_strikethrough = false,

            Event::Start(Tag::BlockQuote) => segments.push(StyledSegment::BlockQuoteStart),
            Event::End(TagEnd::BlockQuote) => segments.push(StyledSegment::BlockQuoteEnd),
            Event::Rule => segments.push(StyledSegment::Rule),

            Event::Code(text) => {
                if in_heading.is_some() {
                    heading.push_str(&text);
                } else {
                    segments.push(StyledSegment::InlineCode(text.to_string()));
                }
            }
            Event::Text(text) if in_code_block => code.push_str(&text),
            Event::Text(text) if in_heading.is_some() => heading.push_str(&text),
            Event::Text(text) if in_bold => segments.push(StyledSegment::Bold(text.to_string())),
            Event::Text(text) if in_italic => {
                segments.push(StyledSegment::Italic(text.to_string()))
            }
            Event::Text(text) if in_strikethrough => {
                segments.push(StyledSegment::Strikethrough(text.to_string()))
            }
            Event::Text(text) => segments.push(StyledSegment::Text(text.to_string())),

            Event::SoftBreak => segments.push(StyledSegment::SoftBreak),
            Event::HardBreak => segments.push(StyledSegment::HardBreak),
            Event::End(TagEnd::Paragraph) => segments.push(StyledSegment::ParagraphEnd),

            _ => {}
        }
    }

    // Trim a trailing paragraph gap so entries don't end on a blank line
    while matches!(segments.last(), Some(StyledSegment::ParagraphEnd)) {
        segments.pop();
    }
    segments
}

/// Accumulates styled words into width-wrapped lines
struct LineBuilder {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    used: usize,
    width: usize,
    prefix: String,
    prefix_style: Style,
}

impl LineBuilder {
    fn new(width: usize) -> Self {
        Self {
            lines: Vec::new(),
            current: Vec::new(),
            used: 0,
            width: width.max(8),
            prefix: String::new(),
            prefix_style: Style::default(),
        }
    }

    /// Prefix prepended to every new line (blockquote bar, list indent)
    fn set_prefix(&mut self, prefix: &str, style: Style) {
        self.prefix = prefix.to_string();
        self.prefix_style = style;
    }

    fn start_line(&mut self) {
        if !self.prefix.is_empty() {
            self.current
                .push(Span::styled(self.prefix.clone(), self.prefix_style));
            self.used = self.prefix.width();
        }
    }

    fn flush(&mut self) {
        let spans = std::mem::take(&mut self.current);
        self.lines.push(Line::from(spans));
        self.used = 0;
    }

    fn blank_line(&mut self) {
        if !self.current.is_empty() {
            self.flush();
        }
        self.lines.push(Line::from(""));
    }

    /// Append text, wrapping on word boundaries
    fn push_text(&mut self, text: &str, style: Style) {
        for word in text.split_inclusive(' ') {
            let word_width = word.width();
            if self.current.is_empty() {
                self.start_line();
            }
            if self.used + word_width > self.width && self.used > self.prefix.width() {
                self.flush();
                self.start_line();
            }
            self.current.push(Span::styled(word.to_string(), style));
            self.used += word_width;
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        if !self.current.is_empty() {
            self.flush();
        }
        self.lines
    }
}

/// Render markdown to width-wrapped styled lines
pub fn render_markdown(markdown: &str, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let segments = parse_markdown(markdown);
    let mut builder = LineBuilder::new(width);

    let body = Style::default().fg(theme.foreground);
    let quote_style = Style::default().fg(theme.quote);
    let mut quote_depth = 0usize;

    for segment in segments {
        match segment {
            StyledSegment::Text(text) => builder.push_text(&text, body),
            StyledSegment::Bold(text) => {
                builder.push_text(&text, body.add_modifier(Modifier::BOLD))
            }
            StyledSegment::Italic(text) => {
                builder.push_text(&text, body.add_modifier(Modifier::ITALIC))
            }
            StyledSegment::Strikethrough(text) => {
                builder.push_text(&text, body.add_modifier(Modifier::CROSSED_OUT))
            }
            StyledSegment::InlineCode(text) => {
                builder.push_text(&text, Style::default().fg(theme.code_inline))
            }
            StyledSegment::Heading { level, text } => {
                if !builder.current.is_empty() {
                    builder.flush();
                }
                let marker = "#".repeat(level as usize);
                builder.push_text(
                    &format!("{marker} {text}"),
                    Style::default()
                        .fg(theme.heading)
                        .add_modifier(Modifier::BOLD),
                );
                builder.flush();
            }
            StyledSegment::CodeBlock { code } => {
                if !builder.current.is_empty() {
                    builder.flush();
                }
                let style = Style::default().fg(theme.code_block);
                for line in code.lines() {
                    builder.current.push(Span::styled("  ", style));
                    builder.current.push(Span::styled(line.to_string(), style));
                    builder.flush();
                }
                builder.lines.push(Line::from(""));
            }
            StyledSegment::ListItemStart { number, depth } => {
                if !builder.current.is_empty() {
                    builder.flush();
                }
                let indent = "  ".repeat(depth);
                let marker = match number {
                    Some(n) => format!("{indent}{n}. "),
                    None => format!("{indent}• "),
                };
                builder.push_text(&marker, Style::default().fg(theme.highlight));
            }
            StyledSegment::ListItemEnd => {
                if !builder.current.is_empty() {
                    builder.flush();
                }
            }
            StyledSegment::BlockQuoteStart => {
                quote_depth += 1;
                builder.set_prefix(&"│ ".repeat(quote_depth), quote_style);
            }
            StyledSegment::BlockQuoteEnd => {
                quote_depth = quote_depth.saturating_sub(1);
                if quote_depth == 0 {
                    builder.set_prefix("", Style::default());
                } else {
                    builder.set_prefix(&"│ ".repeat(quote_depth), quote_style);
                }
            }
            StyledSegment::Rule => {
                if !builder.current.is_empty() {
                    builder.flush();
                }
                builder.lines.push(Line::from(Span::styled(
                    "─".repeat(builder.width.min(32)),
                    Style::default().fg(theme.border),
                )));
            }
            StyledSegment::SoftBreak => builder.push_text(" ", body),
            StyledSegment::HardBreak => builder.flush(),
            StyledSegment::ParagraphEnd => builder.blank_line(),
        }
    }

    builder.finish()
}
