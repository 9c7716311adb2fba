//! Code-fence rendering.
//!
//! Fenced blocks become a `<pre>` whose body is already fully escaped, so
//! nothing downstream can reinterpret it. Block comments (and `//` comments
//! in JavaScript) are wrapped in a comment-token span and every `/`, `*`,
//! `<`, `>` and `&` inside them is written as an entity: a second escaping
//! pass or a stray emphasis matcher can then never see a `*/` or a `*`.

use html_escape::encode_double_quoted_attribute;

/// Languages whose `/* ... */` comments are recognised.
const BLOCK_COMMENT_LANGUAGES: &[&str] = &["css", "html", "javascript", "js"];
/// Languages whose `// ...` comments are recognised.
const LINE_COMMENT_LANGUAGES: &[&str] = &["javascript", "js"];

const COMMENT_OPEN: &str = "<span class=\"token comment\">";
const COMMENT_CLOSE: &str = "</span>";

/// Render a fenced block to highlighted markup.
pub fn render_code_block(language: &str, code: &str) -> String {
    let language = language.trim().to_lowercase();
    let mut body = CodeWriter::default();
    body.write_code(&language, code);

    if language.is_empty() {
        format!("<pre class=\"recall-code\"><code>{}</code></pre>", body.out)
    } else {
        let lang = encode_double_quoted_attribute(&language);
        format!(
            "<pre class=\"recall-code\" data-language=\"{lang}\"><code class=\"language-{lang}\">{}</code></pre>",
            body.out
        )
    }
}

#[derive(Default)]
struct CodeWriter {
    out: String,
    /// Only whitespace has been written since the last newline.
    indenting: bool,
}

impl CodeWriter {
    fn write_code(&mut self, language: &str, code: &str) {
        let block_comments = BLOCK_COMMENT_LANGUAGES.contains(&language);
        let line_comments = LINE_COMMENT_LANGUAGES.contains(&language);
        self.indenting = true;

        let mut rest = code;
        while let Some(c) = rest.chars().next() {
            let len = if block_comments && rest.starts_with("/*") {
                let end = rest[2..].find("*/").map_or(rest.len(), |idx| idx + 4);
                self.write_comment(&rest[..end]);
                end
            } else if line_comments && rest.starts_with("//") {
                let end = rest.find('\n').unwrap_or(rest.len());
                self.write_comment(&rest[..end]);
                end
            } else if line_comments && matches!(c, '"' | '\'' | '`') {
                let end = string_literal_end(rest, c);
                self.write_plain(&rest[..end]);
                end
            } else {
                self.write_plain_char(c);
                c.len_utf8()
            };
            rest = &rest[len..];
        }
    }

    fn write_plain(&mut self, text: &str) {
        text.chars().for_each(|c| self.write_plain_char(c));
    }

    fn write_plain_char(&mut self, c: char) {
        match c {
            '<' => self.push_text("&lt;"),
            '>' => self.push_text("&gt;"),
            '&' => self.push_text("&amp;"),
            _ => self.write_layout_or(c, |w, c| w.push_char(c)),
        }
    }

    fn write_comment(&mut self, comment: &str) {
        self.out.push_str(COMMENT_OPEN);
        for c in comment.chars() {
            match c {
                '/' => self.push_text("&#47;"),
                '*' => self.push_text("&#42;"),
                '<' => self.push_text("&lt;"),
                '>' => self.push_text("&gt;"),
                '&' => self.push_text("&amp;"),
                _ => self.write_layout_or(c, |w, c| w.push_char(c)),
            }
        }
        self.out.push_str(COMMENT_CLOSE);
    }

    /// Newlines and leading indentation get explicit markup; anything else
    /// is handed to `other`.
    fn write_layout_or(&mut self, c: char, other: impl FnOnce(&mut Self, char)) {
        match c {
            '\n' => {
                self.out.push_str("<br>");
                self.indenting = true;
            }
            '\r' => {}
            ' ' if self.indenting => self.out.push_str("&nbsp;"),
            '\t' if self.indenting => self.out.push_str("&nbsp;&nbsp;&nbsp;&nbsp;"),
            _ => other(self, c),
        }
    }

    fn push_text(&mut self, s: &str) {
        self.out.push_str(s);
        self.indenting = false;
    }

    fn push_char(&mut self, c: char) {
        self.out.push(c);
        self.indenting = false;
    }
}

/// Byte length of the string literal opening `rest` with `quote`.
///
/// Plain quotes end at the line; template literals may span lines. An
/// unterminated literal runs to wherever it stopped.
fn string_literal_end(rest: &str, quote: char) -> usize {
    let mut escaped = false;
    for (idx, c) in rest.char_indices().skip(1) {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return idx + c.len_utf8();
        } else if c == '\n' && quote != '`' {
            return idx;
        }
    }
    rest.len()
}
