//! Markdown serialization (AST → Markdown)
//!
//! Walks the generic markdown AST and emits a Markdown string. All formatting choices (list
//! markers, emphasis characters, thematic break style) live in [`SerializeOptions`].
//!
//! Text is escaped only where a character would otherwise be read as markup: always for the
//! inline delimiters, and at the start of a line for block markers (`#`, `>`, list markers,
//! setext underlines).

use crate::ast::{self, Node};
use serde::{Deserialize, Serialize};

/// List item indentation style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListItemIndent {
    /// Marker + 1 space (default).
    #[default]
    One,
    /// Round up to 4 columns.
    Tab,
    /// One for tight lists, tab for spread.
    Mixed,
}

/// Serializer configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SerializeOptions {
    pub bullet: char,
    pub bullet_ordered: char,
    pub emphasis: char,
    pub strong: char,
    pub fence: char,
    pub rule: char,
    pub rule_repetition: u8,
    pub rule_spaces: bool,
    pub list_item_indent: ListItemIndent,
    pub increment_list_marker: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            bullet: '*',
            bullet_ordered: '.',
            emphasis: '*',
            strong: '*',
            fence: '`',
            rule: '*',
            rule_repetition: 3,
            rule_spaces: false,
            list_item_indent: ListItemIndent::One,
            increment_list_marker: true,
        }
    }
}

/// Serialize an AST to a Markdown string.
///
/// Non-empty output always ends with a single newline.
pub fn serialize_to_markdown(node: &Node, options: &SerializeOptions) -> String {
    let mut writer = Writer::new(options);
    let mut output = writer.block(node, false);

    if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }
    output
}

struct Writer<'a> {
    options: &'a SerializeOptions,
    /// Whether the next text starts a line, where block markers need escaping.
    at_break: bool,
}

impl<'a> Writer<'a> {
    fn new(options: &'a SerializeOptions) -> Self {
        Writer {
            options,
            at_break: false,
        }
    }

    /// Render a flow node. `alternate` switches list markers so that two adjacent lists do not
    /// read as one.
    fn block(&mut self, node: &Node, alternate: bool) -> String {
        match node {
            Node::Root(root) => self.blocks(&root.children, "\n\n"),
            Node::Paragraph(paragraph) => self.paragraph(&paragraph.children),
            Node::Heading(heading) => self.heading(heading),
            Node::Blockquote(quote) => {
                let inner = self.blocks(&quote.children, "\n\n");
                prefix_lines(&inner, "> ", ">")
            }
            Node::List(list) => self.list(list, alternate),
            Node::ListItem(item) => {
                let marker = self.options.bullet.to_string();
                self.list_item(item, &marker, false)
            }
            Node::Code(code) => self.code(code),
            Node::ThematicBreak => self.thematic_break(),
            Node::Html(html) => html.value.clone(),
            _ => self.paragraph(std::slice::from_ref(node)),
        }
    }

    /// Render sibling flow nodes, skipping the ones that render to nothing.
    fn blocks(&mut self, children: &[Node], separator: &str) -> String {
        let mut parts = Vec::new();
        let mut previous_list: Option<(bool, bool)> = None;

        for child in children {
            let alternate = match (child, previous_list) {
                (Node::List(list), Some((ordered, alternated))) if list.ordered == ordered => {
                    !alternated
                }
                _ => false,
            };
            previous_list = match child {
                Node::List(list) => Some((list.ordered, alternate)),
                _ => None,
            };

            let rendered = self.block(child, alternate);
            if !rendered.is_empty() {
                parts.push(rendered);
            }
        }
        parts.join(separator)
    }

    /// Phrasing runs become lines; a flow node found among them is rendered as its own block.
    fn paragraph(&mut self, children: &[Node]) -> String {
        let mut parts = Vec::new();
        let mut run: Vec<&Node> = Vec::new();

        for child in children {
            if is_phrasing(child) {
                run.push(child);
                continue;
            }
            if !run.is_empty() {
                parts.push(self.phrasing_run(&run));
                run.clear();
            }
            parts.push(self.block(child, false));
        }
        if !run.is_empty() {
            parts.push(self.phrasing_run(&run));
        }

        parts.retain(|part| !part.is_empty());
        parts.join("\n")
    }

    fn phrasing_run(&mut self, nodes: &[&Node]) -> String {
        self.at_break = true;
        self.phrasing(nodes.iter().copied())
    }

    /// Render sibling phrasing nodes.
    ///
    /// A word character that touches an emphasis or strong delimiter from the outside is
    /// written as a character reference, so the delimiter run is only left-flanking (opener)
    /// or only right-flanking (closer) and cannot pair with a neighbour.
    fn phrasing<'n>(&mut self, nodes: impl IntoIterator<Item = &'n Node>) -> String {
        let mut out = String::new();
        let mut previous: Option<&Node> = None;

        for node in nodes {
            let mut piece = self.inline(node, out.chars().last());
            if piece.is_empty() {
                continue;
            }
            match (previous, node) {
                (Some(Node::Text(_)), next) if is_attention(next) => {
                    encode_last_word_char(&mut out)
                }
                (Some(prev), Node::Text(_)) if is_attention(prev) => {
                    piece = encode_first_word_char(&piece)
                }
                _ => {}
            }
            push_inline(&mut out, &piece);
            previous = Some(node);
        }
        out
    }

    /// `before` is the last character already written at this level.
    fn inline(&mut self, node: &Node, before: Option<char>) -> String {
        match node {
            Node::Text(text) => {
                let escaped = escape_text(&text.value, self.at_break);
                if !text.value.is_empty() {
                    self.at_break = text.value.ends_with('\n');
                }
                escaped
            }
            Node::Emphasis(emphasis) => {
                let marker = attention_marker(self.options.emphasis, before).to_string();
                self.attention(&marker, &emphasis.children)
            }
            Node::Strong(strong) => {
                let marker = attention_marker(self.options.strong, before)
                    .to_string()
                    .repeat(2);
                self.attention(&marker, &strong.children)
            }
            Node::InlineMarkup(markup) => {
                let open = format!("<{}>", markup.name);
                let close = format!("</{}>", markup.name);
                self.wrapped(&open, &markup.children, &close)
            }
            Node::InlineCode(code) => {
                self.at_break = false;
                inline_code(&code.value)
            }
            Node::Link(link) => {
                self.at_break = false;
                let text = self.phrasing(&link.children);
                self.at_break = false;
                format!("[{text}]({})", resource(&link.url, link.title.as_deref()))
            }
            Node::Image(image) => {
                self.at_break = false;
                format!(
                    "![{}]({})",
                    escape_text(&image.alt, false),
                    resource(&image.url, image.title.as_deref())
                )
            }
            Node::Html(html) => {
                self.at_break = false;
                html.value.clone()
            }
            other => self.block(other, false),
        }
    }

    /// Emphasis or strong. Whitespace just inside the delimiters is encoded, since a delimiter
    /// run next to whitespace on that side can neither open nor close.
    fn attention(&mut self, marker: &str, children: &[Node]) -> String {
        self.at_break = false;
        let inner = encode_edge_whitespace(&self.phrasing(children));
        self.at_break = false;
        format!("{marker}{inner}{marker}")
    }

    fn wrapped(&mut self, open: &str, children: &[Node], close: &str) -> String {
        self.at_break = false;
        let inner = self.phrasing(children);
        self.at_break = false;
        format!("{open}{inner}{close}")
    }

    fn heading(&mut self, heading: &ast::Heading) -> String {
        let depth = heading.depth.clamp(1, 6) as usize;
        let marker = "#".repeat(depth);

        self.at_break = false;
        let content = self.phrasing(&heading.children).replace('\n', " ");
        let content = escape_closing_sequence(content.trim());
        if content.is_empty() {
            marker
        } else {
            format!("{marker} {content}")
        }
    }

    fn list(&mut self, list: &ast::List, alternate: bool) -> String {
        let mut items = Vec::new();
        let start = list.start.unwrap_or(1);

        for (index, child) in list.children.iter().enumerate() {
            let marker = if list.ordered {
                let number = if self.options.increment_list_marker {
                    start.saturating_add(index as u32)
                } else {
                    start
                };
                let delimiter = if alternate {
                    alternate_ordered(self.options.bullet_ordered)
                } else {
                    self.options.bullet_ordered
                };
                format!("{number}{delimiter}")
            } else if alternate {
                alternate_bullet(self.options.bullet).to_string()
            } else {
                self.options.bullet.to_string()
            };

            let rendered = match child {
                Node::ListItem(item) => self.list_item(item, &marker, list.spread),
                other => {
                    let item = ast::ListItem {
                        spread: false,
                        children: vec![other.clone()],
                    };
                    self.list_item(&item, &marker, list.spread)
                }
            };
            items.push(rendered);
        }

        let separator = if list.spread { "\n\n" } else { "\n" };
        items.join(separator)
    }

    fn list_item(&mut self, item: &ast::ListItem, marker: &str, spread: bool) -> String {
        let width = match self.options.list_item_indent {
            ListItemIndent::One => marker.len() + 1,
            ListItemIndent::Tab => (marker.len() + 1).div_ceil(4) * 4,
            ListItemIndent::Mixed if spread => (marker.len() + 1).div_ceil(4) * 4,
            ListItemIndent::Mixed => marker.len() + 1,
        };

        let separator = if item.spread { "\n\n" } else { "\n" };
        let content = self.blocks(&item.children, separator);
        if content.is_empty() {
            return marker.to_string();
        }

        let indent = " ".repeat(width);
        let mut out = String::new();
        for (index, line) in content.split('\n').enumerate() {
            if index == 0 {
                out.push_str(marker);
                out.push_str(&" ".repeat(width - marker.len()));
                out.push_str(line);
            } else {
                out.push('\n');
                if !line.is_empty() {
                    out.push_str(&indent);
                    out.push_str(line);
                }
            }
        }
        out
    }

    fn code(&mut self, code: &ast::Code) -> String {
        let fence_char = self.options.fence;
        let longest = longest_run(&code.value, fence_char);
        let fence = fence_char.to_string().repeat(longest.max(2) + 1);

        let mut info = code.lang.clone().unwrap_or_default();
        if let Some(meta) = &code.meta {
            if !info.is_empty() {
                info.push(' ');
                info.push_str(meta);
            }
        }

        if code.value.is_empty() {
            format!("{fence}{info}\n{fence}")
        } else {
            format!("{fence}{info}\n{}\n{fence}", code.value)
        }
    }

    fn thematic_break(&self) -> String {
        let rule = self.options.rule.to_string();
        let separator = if self.options.rule_spaces { " " } else { "" };
        vec![rule; usize::from(self.options.rule_repetition.max(3))].join(separator)
    }
}

fn is_phrasing(node: &Node) -> bool {
    matches!(
        node,
        Node::Text(_)
            | Node::Emphasis(_)
            | Node::Strong(_)
            | Node::InlineMarkup(_)
            | Node::InlineCode(_)
            | Node::Link(_)
            | Node::Image(_)
            | Node::Html(_)
    )
}

fn is_attention(node: &Node) -> bool {
    matches!(node, Node::Emphasis(_) | Node::Strong(_))
}

/// The configured marker, or the other one when the preceding output already ends with it.
/// Two delimiter runs of the same character written back to back would fuse into one run.
fn attention_marker(preferred: char, before: Option<char>) -> char {
    if before != Some(preferred) {
        preferred
    } else if preferred == '*' {
        '_'
    } else {
        '*'
    }
}

/// Neither whitespace nor ASCII punctuation. A delimiter run with such a character on both
/// sides is both left- and right-flanking.
fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !c.is_ascii_punctuation()
}

fn char_reference(c: char) -> String {
    format!("&#x{:X};", u32::from(c))
}

fn encode_last_word_char(out: &mut String) {
    if let Some(last) = out.chars().last().filter(|c| is_word_char(*c)) {
        out.pop();
        out.push_str(&char_reference(last));
    }
}

fn encode_first_word_char(piece: &str) -> String {
    let mut chars = piece.chars();
    match chars.next() {
        Some(first) if is_word_char(first) => char_reference(first) + chars.as_str(),
        _ => piece.to_string(),
    }
}

fn encode_edge_whitespace(inner: &str) -> String {
    let mut chars = inner.chars();
    let (Some(first), last) = (chars.next(), chars.next_back()) else {
        return inner.to_string();
    };
    let middle = chars.as_str();
    let encode = |c: char| {
        if c.is_whitespace() {
            char_reference(c)
        } else {
            c.to_string()
        }
    };
    match last {
        Some(last) => format!("{}{middle}{}", encode(first), encode(last)),
        None => encode(first),
    }
}

/// Append `piece`, escaping a trailing `!` that would turn a following `[` into an image.
fn push_inline(out: &mut String, piece: &str) {
    if piece.starts_with('[') && out.ends_with('!') && !out.ends_with("\\!") {
        out.pop();
        out.push_str("\\!");
    }
    out.push_str(piece);
}

fn prefix_lines(content: &str, prefix: &str, empty_prefix: &str) -> String {
    if content.is_empty() {
        return empty_prefix.to_string();
    }
    content
        .split('\n')
        .map(|line| {
            if line.is_empty() {
                empty_prefix.to_string()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn alternate_bullet(bullet: char) -> char {
    if bullet == '*' {
        '-'
    } else {
        '*'
    }
}

fn alternate_ordered(delimiter: char) -> char {
    if delimiter == '.' {
        ')'
    } else {
        '.'
    }
}

fn longest_run(value: &str, needle: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in value.chars() {
        if c == needle {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

fn inline_code(value: &str) -> String {
    let fence = "`".repeat(longest_run(value, '`') + 1);
    let needs_padding = value.starts_with('`')
        || value.ends_with('`')
        || (value.starts_with(' ') && value.ends_with(' ') && !value.trim().is_empty());
    if needs_padding {
        format!("{fence} {value} {fence}")
    } else {
        format!("{fence}{value}{fence}")
    }
}

/// `url "title"`, with the destination in angle brackets when it would not parse bare.
fn resource(url: &str, title: Option<&str>) -> String {
    let bare = !url.is_empty()
        && !url.chars().any(|c| c.is_whitespace() || c.is_control() || c == '<')
        && balanced_parens(url);
    let mut out = if bare {
        url.to_string()
    } else {
        format!("<{}>", url.replace('<', "\\<").replace('>', "\\>"))
    };
    if let Some(title) = title {
        out.push_str(" \"");
        out.push_str(&title.replace('\\', "\\\\").replace('"', "\\\""));
        out.push('"');
    }
    out
}

fn balanced_parens(url: &str) -> bool {
    let mut depth = 0i32;
    for c in url.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// Escape a trailing `#` run so it is not read as an ATX closing sequence.
fn escape_closing_sequence(content: &str) -> String {
    let trimmed = content.trim_end_matches('#');
    if trimmed.len() == content.len() || !(trimmed.is_empty() || trimmed.ends_with(' ')) {
        return content.to_string();
    }
    format!("{trimmed}\\{}", &content[trimmed.len()..])
}

/// Escape markdown-active characters in a text value.
///
/// `at_break` says whether the value starts at the beginning of a line. Lines after a newline
/// inside the value always do.
fn escape_text(value: &str, at_break: bool) -> String {
    let mut out = String::with_capacity(value.len());
    for (index, line) in value.split('\n').enumerate() {
        if index > 0 {
            out.push('\n');
        }
        escape_line(line, at_break || index > 0, &mut out);
    }
    out
}

fn escape_line(line: &str, line_start: bool, out: &mut String) {
    let chars: Vec<char> = line.chars().collect();
    let block_marker = if line_start {
        block_marker_position(&chars)
    } else {
        None
    };

    for (i, &c) in chars.iter().enumerate() {
        let next = chars.get(i + 1).copied();
        let prev = i.checked_sub(1).map(|p| chars[p]);

        let escape = Some(i) == block_marker
            || match c {
                '\\' | '*' | '`' | '[' | ']' => true,
                '_' => !(is_word(prev) && is_word(next)),
                '<' => next.is_some_and(|n| n.is_ascii_alphabetic() || matches!(n, '/' | '!' | '?')),
                '&' => next.is_some_and(|n| n.is_ascii_alphanumeric() || n == '#'),
                '!' => next == Some('['),
                _ => false,
            };

        if escape {
            out.push('\\');
        }
        out.push(c);
    }
}

fn is_word(c: Option<char>) -> bool {
    c.is_some_and(char::is_alphanumeric)
}

/// Position of the character that would make this line start a block construct.
fn block_marker_position(chars: &[char]) -> Option<usize> {
    let spaced = |i: usize| chars.get(i).map_or(true, |c| *c == ' ' || *c == '\t');
    let first = *chars.first()?;

    match first {
        '#' => {
            let hashes = chars.iter().take_while(|c| **c == '#').count();
            (hashes <= 6 && spaced(hashes)).then_some(0)
        }
        '>' => Some(0),
        '-' | '+' if spaced(1) => Some(0),
        '-' | '=' if chars.iter().all(|c| *c == first || *c == ' ') => Some(0),
        '0'..='9' => {
            let digits = chars.iter().take_while(|c| c.is_ascii_digit()).count();
            let delimiter = chars.get(digits).copied();
            (digits <= 9 && matches!(delimiter, Some('.') | Some(')')) && spaced(digits + 1))
                .then_some(digits)
        }
        _ => None,
    }
}
