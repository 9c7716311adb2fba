//! Lexical shield for fenced code blocks.
//!
//! Before any structural or inline parsing, every fenced block is swapped for
//! an opaque placeholder token so that headers, separators, asterisks or
//! tildes inside code can never be mistaken for document syntax. The shield
//! records each block in insertion order and can put them all back.
//!
//! Tokens look like `\u{E000}fence3\u{E001}`: the private-use delimiters are
//! inert under both the section grammar and the inline grammar, and the
//! closing delimiter keeps `fence1` from being a prefix of `fence10`.

use crate::error::{ParseError, Result};

const TOKEN_OPEN: char = '\u{E000}';
const TOKEN_CLOSE: char = '\u{E001}';
const FENCE: &str = "```";

/// A fenced block removed from the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock {
    /// Placeholder standing in for the block.
    pub token: String,
    /// Info string after the opening fence, trimmed (may be empty).
    pub language: String,
    /// Body between the fences, without the final newline.
    pub code: String,
    /// The exact original text, opening and closing fence lines included.
    pub raw: String,
    /// 1-based line of the opening fence in the original text.
    pub line: usize,
    /// 1-based line of the placeholder in the shielded text.
    shielded_line: usize,
}

impl FencedBlock {
    /// Extra lines the block occupied beyond the placeholder's single line.
    fn hidden_lines(&self) -> usize {
        self.raw.matches('\n').count()
    }
}

/// Text with fenced blocks replaced by placeholder tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShieldedText {
    text: String,
    blocks: Vec<FencedBlock>,
}

impl ShieldedText {
    /// The shielded text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Recorded blocks in the order they appeared.
    pub fn blocks(&self) -> &[FencedBlock] {
        &self.blocks
    }

    /// Look up a block by its placeholder token.
    pub fn block(&self, token: &str) -> Option<&FencedBlock> {
        self.blocks.iter().find(|b| b.token == token)
    }

    /// The block whose placeholder makes up the whole of `line`, if any.
    pub fn block_on_line(&self, line: &str) -> Option<&FencedBlock> {
        self.block(line.trim())
    }

    /// Put every recorded block back into `fragment`.
    pub fn restore(&self, fragment: &str) -> String {
        if !fragment.contains(TOKEN_OPEN) {
            return fragment.to_string();
        }
        self.blocks.iter().fold(fragment.to_string(), |acc, block| {
            acc.replace(&block.token, &block.raw)
        })
    }

    /// Map a 1-based line of the shielded text back to the original input.
    pub fn original_line(&self, shielded_line: usize) -> usize {
        let hidden: usize = self
            .blocks
            .iter()
            .take_while(|b| b.shielded_line < shielded_line)
            .map(FencedBlock::hidden_lines)
            .sum();
        shielded_line + hidden
    }
}

/// Whether `s` contains a shield placeholder.
pub fn contains_token(s: &str) -> bool {
    s.contains(TOKEN_OPEN)
}

fn token_for(index: usize) -> String {
    format!("{TOKEN_OPEN}fence{index}{TOKEN_CLOSE}")
}

fn is_opening_fence(line: &str) -> bool {
    line.trim_start().starts_with(FENCE)
}

fn is_closing_fence(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= FENCE.len() && trimmed.chars().all(|c| c == '`')
}

fn strip_newline(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(line)
}

struct OpenFence {
    start: usize,
    line: usize,
    language: String,
    body_start: usize,
}

/// Replace every fenced block in `input` with a placeholder.
pub fn shield(input: &str) -> Result<ShieldedText> {
    let mut text = String::with_capacity(input.len());
    let mut blocks = Vec::new();
    let mut open: Option<OpenFence> = None;
    let mut copied_to = 0;
    let mut offset = 0;
    let mut hidden = 0;

    for (idx, line) in input.split_inclusive('\n').enumerate() {
        let line_num = idx + 1;
        let content = strip_newline(line);

        match open.take() {
            None if is_opening_fence(content) => {
                let info = content.trim_start()[FENCE.len()..].trim();
                open = Some(OpenFence {
                    start: offset,
                    line: line_num,
                    language: info.to_string(),
                    body_start: offset + line.len(),
                });
            }
            None => {}
            Some(fence) if is_closing_fence(content) => {
                let end = offset + content.len();
                let code = strip_newline(&input[fence.body_start..offset]);
                let block = FencedBlock {
                    token: token_for(blocks.len()),
                    language: fence.language,
                    code: code.to_string(),
                    raw: input[fence.start..end].to_string(),
                    line: fence.line,
                    shielded_line: fence.line - hidden,
                };

                text.push_str(&input[copied_to..fence.start]);
                text.push_str(&block.token);
                copied_to = end;
                hidden += block.hidden_lines();
                blocks.push(block);
            }
            Some(fence) => open = Some(fence),
        }

        offset += line.len();
    }

    if let Some(fence) = open {
        return Err(ParseError::UnclosedFence { line: fence.line });
    }

    text.push_str(&input[copied_to..]);
    Ok(ShieldedText { text, blocks })
}
