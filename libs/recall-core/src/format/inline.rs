//! Inline formatter: lightly marked text to presentation markup.
//!
//! Passes run in a fixed order, each seeing only what earlier passes left
//! behind:
//!
//! 1. images (remote ones resolved into the media store)
//! 2. inline code, then link targets
//! 3. tildes (strikethrough, everything else becomes `&#126;`)
//! 4. highlighting cues (`Correct Option:` lines and friends)
//! 5. fenced blocks, rendered by [`render_code_block`]
//! 6. headings, lists and paragraphs
//! 7. emphasis
//! 8. links
//!
//! Finished markup from passes 1, 2 and 5 is parked in a [`Stash`] behind an
//! inert token and only substituted after pass 8, so code, image and link
//! URLs and highlighted fences are immune to every later pass. Link text is
//! left in place and still gets tildes and emphasis.

use super::code::render_code_block;
use crate::error::Result;
use crate::image::ResolveImage;
use crate::shield::{self, ShieldedText};
use html_escape::{encode_double_quoted_attribute, encode_text};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const STASH_OPEN: char = '\u{E002}';
const STASH_CLOSE: char = '\u{E003}';

/// Longest single-tilde strikethrough, in characters.
const MAX_SINGLE_TILDE_SPAN: usize = 40;

static IMAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"!\[([^\]\n]*)\]\(\s*([^)\s]+)(?:\s+"[^"\n]*")?\s*\)"#).expect("image regex")
});
static DOUBLE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"``(.+?)``").expect("code regex"));
static SINGLE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`\n]+)`").expect("code regex"));
static LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]\n]+)\]\(\s*([^)\s]+)\s*\)").expect("link regex"));
static PARKED_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new("\\[([^\\]\n]+)\\]\\((\u{E002}\\d+\u{E003})\\)").expect("link regex")
});
static STASH_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new("\u{E002}(\\d+)\u{E003}").expect("stash regex"));
static ORDERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s+(.*)$").expect("list regex"));

/// Lines starting with these are colored. Earlier entries win.
const CUES: &[(&str, &str)] = &[
    ("Selected Option:", "blue"),
    ("Correct Option:", "green"),
    ("Incorrect Option:", "red"),
];

/// Format one fragment, resolving remote images through `images`.
pub fn format_fragment(fragment: &str, images: &mut dyn ResolveImage) -> Result<String> {
    Formatter::new(images).format(fragment)
}

#[derive(Debug)]
struct Parked {
    html: String,
    /// Source text, for markup that must read literally inside a code span.
    source: Option<String>,
    is_block: bool,
}

/// Finished markup kept out of reach of later passes.
#[derive(Debug, Default)]
struct Stash {
    items: Vec<Parked>,
}

impl Stash {
    fn inline(&mut self, html: String) -> String {
        self.push(Parked {
            html,
            source: None,
            is_block: false,
        })
    }

    fn image(&mut self, html: String, source: &str) -> String {
        self.push(Parked {
            html,
            source: Some(source.to_string()),
            is_block: false,
        })
    }

    fn block(&mut self, html: String) -> String {
        self.push(Parked {
            html,
            source: None,
            is_block: true,
        })
    }

    fn push(&mut self, item: Parked) -> String {
        let token = format!("{STASH_OPEN}{}{STASH_CLOSE}", self.items.len());
        self.items.push(item);
        token
    }

    fn get(&self, caps: &Captures) -> Option<&Parked> {
        caps[1].parse::<usize>().ok().and_then(|idx| self.items.get(idx))
    }

    /// Put back the source text of anything parked with one.
    fn restore_sources(&self, text: &str) -> String {
        STASH_TOKEN
            .replace_all(text, |caps: &Captures| {
                self.get(caps)
                    .and_then(|item| item.source.clone())
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    /// Whether `line` is nothing but a block-level token.
    fn is_block_line(&self, line: &str) -> bool {
        STASH_TOKEN
            .captures(line)
            .filter(|caps| caps[0].len() == line.len())
            .and_then(|caps| self.get(&caps))
            .is_some_and(|item| item.is_block)
    }

    /// Substitute every token, including tokens inside parked markup. A
    /// token only ever refers to an earlier item, so this terminates.
    fn expand(&self, text: &str) -> String {
        STASH_TOKEN
            .replace_all(text, |caps: &Captures| match self.get(caps) {
                Some(item) if item.html.contains(STASH_OPEN) => self.expand(&item.html),
                Some(item) => item.html.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

/// Runs the inline passes over one fragment.
pub struct Formatter<'r> {
    images: &'r mut dyn ResolveImage,
    stash: Stash,
}

impl<'r> Formatter<'r> {
    pub fn new(images: &'r mut dyn ResolveImage) -> Self {
        Self {
            images,
            stash: Stash::default(),
        }
    }

    pub fn format(mut self, fragment: &str) -> Result<String> {
        let shielded = shield::shield(fragment)?;

        let text = self.resolve_images(shielded.text());
        let text = self.inline_code(&text);
        let text = self.link_targets(&text);
        let text = tildes(&text);
        let text = highlight_cues(&text);
        let text = self.fences(&text, &shielded);
        let text = blocks(&text, &self.stash);
        let text = emphasis(&text);
        let text = links(&text);

        Ok(self.stash.expand(&text))
    }

    fn resolve_images(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for caps in IMAGE.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            let src = self.images.resolve(&caps[2]);
            let html = format!(
                "<img src=\"{}\" alt=\"{}\">",
                encode_double_quoted_attribute(&src),
                encode_double_quoted_attribute(&caps[1]),
            );
            out.push_str(&text[last..whole.start()]);
            out.push_str(&self.stash.image(html, whole.as_str()));
            last = whole.end();
        }
        out.push_str(&text[last..]);
        out
    }

    fn inline_code(&mut self, text: &str) -> String {
        let stash = &mut self.stash;
        let text = DOUBLE_CODE.replace_all(text, |caps: &Captures| {
            let content = stash.restore_sources(&caps[1]);
            stash.inline(code_span(&content))
        });
        SINGLE_CODE
            .replace_all(&text, |caps: &Captures| {
                let content = stash.restore_sources(&caps[1]);
                stash.inline(code_span(&content))
            })
            .into_owned()
    }

    /// Park each link's encoded href, leaving `[text](token)` for [`links`].
    fn link_targets(&mut self, text: &str) -> String {
        let stash = &mut self.stash;
        LINK.replace_all(text, |caps: &Captures| {
            let href = stash.inline(encode_double_quoted_attribute(&caps[2]).into_owned());
            format!("[{}]({href})", &caps[1])
        })
        .into_owned()
    }

    fn fences(&mut self, text: &str, shielded: &ShieldedText) -> String {
        shielded.blocks().iter().fold(text.to_string(), |acc, block| {
            let html = render_code_block(&block.language, &block.code);
            let token = self.stash.block(html);
            acc.replace(&block.token, &token)
        })
    }
}

fn code_span(content: &str) -> String {
    // One space of padding on both sides lets a span hold a backtick.
    let content = match content.strip_prefix(' ').and_then(|c| c.strip_suffix(' ')) {
        Some(inner) if !inner.trim().is_empty() => inner,
        _ => content,
    };
    format!("<code class=\"recall-inline-code\">{}</code>", encode_text(content))
}

/// Strikethrough for `~~x~~` and short `~x~`; every other tilde becomes an
/// entity so nothing later can pair it up.
fn tildes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '~' {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        if chars.get(i + 1) == Some(&'~') {
            if let Some(close) = double_tilde_close(&chars, i) {
                let inner: String = chars[i + 2..close].iter().collect();
                out.push_str("<del>");
                out.push_str(&tildes(&inner));
                out.push_str("</del>");
                i = close + 2;
                continue;
            }
        } else if let Some(close) = single_tilde_close(&chars, i) {
            out.push_str("<del>");
            out.extend(&chars[i + 1..close]);
            out.push_str("</del>");
            i = close + 1;
            continue;
        }

        out.push_str("&#126;");
        i += 1;
    }
    out
}

fn double_tilde_close(chars: &[char], open: usize) -> Option<usize> {
    let mut j = open + 2;
    while j + 1 < chars.len() {
        match chars[j] {
            '\n' => return None,
            '~' if chars[j + 1] == '~' => {
                let inner = &chars[open + 2..j];
                return inner.iter().any(|c| !c.is_whitespace()).then_some(j);
            }
            _ => j += 1,
        }
    }
    None
}

fn single_tilde_close(chars: &[char], open: usize) -> Option<usize> {
    let prev = open.checked_sub(1).map(|p| chars[p]);
    if prev.is_some_and(|c| c.is_alphanumeric() || matches!(c, '(' | '=' | ':' | '~')) {
        return None;
    }
    let first = *chars.get(open + 1)?;
    if first.is_whitespace() || first == '/' {
        return None;
    }

    let limit = (open + 1 + MAX_SINGLE_TILDE_SPAN).min(chars.len() - 1);
    for j in open + 1..=limit {
        match chars[j] {
            '\n' => return None,
            '~' if j > open + 1 => {
                let sound = !chars[j - 1].is_whitespace() && chars.get(j + 1) != Some(&'~');
                return sound.then_some(j);
            }
            _ => {}
        }
    }
    None
}

fn highlight_cues(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            let starts_with_cue = CUES.iter().any(|(cue, _)| line.starts_with(cue));
            if !starts_with_cue {
                return line.to_string();
            }
            let color = CUES
                .iter()
                .find(|(cue, _)| line.contains(cue))
                .map_or("inherit", |(_, color)| color);
            format!("<span style=\"color: {color};\">{}</span>", line.trim_end())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullet,
    Numbered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            Self::Bullet => "ul",
            Self::Numbered => "ol",
        }
    }
}

#[derive(Default)]
struct BlockWriter {
    out: Vec<String>,
    paragraph: Vec<String>,
    list: Option<(ListKind, Vec<String>)>,
}

impl BlockWriter {
    fn flush_paragraph(&mut self) {
        if !self.paragraph.is_empty() {
            self.out.push(format!("<p>{}</p>", self.paragraph.join("<br>")));
            self.paragraph.clear();
        }
    }

    fn flush_list(&mut self) {
        if let Some((kind, items)) = self.list.take() {
            let items: String = items.iter().map(|i| format!("<li>{i}</li>")).collect();
            self.out.push(format!("<{tag}>{items}</{tag}>", tag = kind.tag()));
        }
    }

    fn flush(&mut self) {
        self.flush_paragraph();
        self.flush_list();
    }

    fn item(&mut self, kind: ListKind, content: &str) {
        self.flush_paragraph();
        match &mut self.list {
            Some((current, items)) if *current == kind => items.push(content.to_string()),
            _ => {
                self.flush_list();
                self.list = Some((kind, vec![content.to_string()]));
            }
        }
    }

    fn block(&mut self, token: &str) {
        // A fence straight after a list item belongs to that item.
        if self.paragraph.is_empty() {
            if let Some((_, items)) = &mut self.list {
                if let Some(last) = items.last_mut() {
                    last.push_str(token);
                    return;
                }
            }
        }
        self.flush();
        self.out.push(token.to_string());
    }

    fn heading(&mut self, level: usize, content: &str) {
        self.flush();
        self.out.push(format!("<h{level}>{content}</h{level}>"));
    }
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let rest = &line[level..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((level, rest.trim()))
}

fn list_item(line: &str) -> Option<(ListKind, &str)> {
    if let Some(rest) = line.strip_prefix("* ") {
        return Some((ListKind::Bullet, rest.trim()));
    }
    ORDERED_ITEM
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| (ListKind::Numbered, m.as_str().trim()))
}

fn blocks(text: &str, stash: &Stash) -> String {
    let mut writer = BlockWriter::default();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            writer.flush();
        } else if stash.is_block_line(trimmed) {
            writer.block(trimmed);
        } else if let Some((level, content)) = heading(trimmed) {
            writer.heading(level, content);
        } else if let Some((kind, content)) = list_item(trimmed) {
            writer.item(kind, content);
        } else {
            writer.flush_list();
            writer.paragraph.push(line.trim_end().to_string());
        }
    }

    writer.flush();
    writer.out.join("\n")
}

fn emphasis(text: &str) -> String {
    let text = delimited(text, "**", "strong");
    let text = delimited(&text, "__", "strong");
    let text = delimited(&text, "*", "em");
    delimited(&text, "_", "em")
}

/// Wrap `delim`-delimited spans in `tag`.
///
/// A delimiter run must be exactly `delim` long, may not open before
/// whitespace or close after it, and never spans a line. Underscores must
/// also sit at word boundaries so `snake_case_names` are left alone.
fn delimited(text: &str, delim: &str, tag: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let marker = delim.chars().next().unwrap_or('*');
    let len = delim.chars().count();

    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        match span_close(&chars, i, marker, len) {
            Some(close) => {
                out.push_str(&format!("<{tag}>"));
                out.extend(&chars[i + len..close]);
                out.push_str(&format!("</{tag}>"));
                i = close + len;
            }
            None => {
                out.push(chars[i]);
                i += 1;
            }
        }
    }
    out
}

fn is_run(chars: &[char], at: usize, marker: char, len: usize) -> bool {
    at + len <= chars.len()
        && chars[at..at + len].iter().all(|&c| c == marker)
        && (at == 0 || chars[at - 1] != marker)
        && chars.get(at + len) != Some(&marker)
}

fn span_close(chars: &[char], open: usize, marker: char, len: usize) -> Option<usize> {
    if !is_run(chars, open, marker, len) {
        return None;
    }
    if chars.get(open + len).map_or(true, |c| c.is_whitespace()) {
        return None;
    }
    let word_bound = marker == '_';
    if word_bound && open > 0 && chars[open - 1].is_alphanumeric() {
        return None;
    }

    let mut j = open + len + 1;
    while j + len <= chars.len() {
        if chars[j] == '\n' {
            return None;
        }
        if is_run(chars, j, marker, len) && !chars[j - 1].is_whitespace() {
            let glued = chars.get(j + len).is_some_and(|c| c.is_alphanumeric());
            if !(word_bound && glued) {
                return Some(j);
            }
        }
        j += 1;
    }
    None
}

fn links(text: &str) -> String {
    PARKED_LINK
        .replace_all(text, |caps: &Captures| {
            format!("<a href=\"{}\">{}</a>", &caps[2], &caps[1])
        })
        .into_owned()
}
