//! Section parser for recall question documents.
//!
//! # Format
//! ```markdown
//! #### Question
//! Which keyword declares an immutable binding?
//!
//! ---
//! #### Correct Option
//! `let`
//! ##### Explanation
//! Bindings are immutable unless marked `mut`.
//!
//! ---
//! #### Incorrect Option
//! `var`
//! ##### Explanation
//! Rust has no `var` keyword.
//! ```
//!
//! The parser walks the shielded text line by line, so any header inside a
//! fenced block is invisible to it. Fragments are restored (fences put back)
//! before they are returned; previews resolve straight to their code.

use crate::error::{ParseError, Result};
use crate::shield::{self, ShieldedText};
use crate::types::{AnswerOption, Document, Polarity, Preview};

const QUESTION_HEADER: &str = "#### Question";
const EXPLANATION_HEADER: &str = "##### Explanation";
const PREVIEW_HEADER: &str = "#### Preview";

/// Parse raw input into a question document.
pub fn parse(content: &str) -> Result<Document> {
    let shielded = shield::shield(content)?;
    parse_shielded(&shielded)
}

/// Parse text that has already been through the shield.
pub fn parse_shielded(shielded: &ShieldedText) -> Result<Document> {
    let lines: Vec<Line<'_>> = shielded
        .text()
        .lines()
        .enumerate()
        .map(|(idx, text)| Line {
            number: shielded.original_line(idx + 1),
            kind: LineType::parse(text),
            text,
        })
        .collect();

    let parser = Parser {
        shielded,
        lines: &lines,
    };
    parser.document()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineType {
    Question,
    Option(Polarity),
    Explanation,
    Preview,
    Separator,
    Text,
}

impl LineType {
    fn parse(line: &str) -> Self {
        let trimmed = line.trim();

        if trimmed == "---" || trimmed == "___" {
            Self::Separator
        } else if is_header(trimmed, QUESTION_HEADER) {
            Self::Question
        } else if is_header(trimmed, Polarity::Correct.header()) {
            Self::Option(Polarity::Correct)
        } else if is_header(trimmed, Polarity::Incorrect.header()) {
            Self::Option(Polarity::Incorrect)
        } else if is_header(trimmed, EXPLANATION_HEADER) {
            // "##### Explanation (correct)" is accepted as a bare header.
            Self::Explanation
        } else if is_header(trimmed, PREVIEW_HEADER) {
            Self::Preview
        } else {
            Self::Text
        }
    }
}

/// `line` is `header`, optionally followed by whitespace and trailing words.
fn is_header(line: &str, header: &str) -> bool {
    line.strip_prefix(header)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    number: usize,
    kind: LineType,
    text: &'a str,
}

struct Parser<'s> {
    shielded: &'s ShieldedText,
    lines: &'s [Line<'s>],
}

impl<'s> Parser<'s> {
    fn document(&self) -> Result<Document> {
        let start = self
            .lines
            .iter()
            .position(|l| l.kind == LineType::Question)
            .ok_or(ParseError::MissingQuestion)?;
        let header = self.lines[start];

        // The question runs to the first separator. An option header also
        // ends it, so a forgotten `---` does not swallow the first option.
        let end = self.lines[start + 1..]
            .iter()
            .position(|l| matches!(l.kind, LineType::Separator | LineType::Option(_)))
            .map_or(self.lines.len(), |offset| start + 1 + offset);

        let (body, question_preview) = self.split_preview(&self.lines[start + 1..end])?;
        let question = self.fragment(&body);
        if question.is_empty() {
            return Err(ParseError::EmptyQuestion {
                line: header.number,
            });
        }

        let mut correct = Vec::new();
        let mut incorrect = Vec::new();
        for block in self.lines[end..].split(|l| l.kind == LineType::Separator) {
            match self.option(block)? {
                Some((Polarity::Correct, option)) => correct.push(option),
                Some((Polarity::Incorrect, option)) => incorrect.push(option),
                None => {}
            }
        }

        if correct.is_empty() && incorrect.is_empty() {
            return Err(ParseError::NoOptions);
        }

        Ok(Document {
            question,
            question_preview,
            correct,
            incorrect,
        })
    }

    /// Parse one separator-delimited block; blocks without an option header
    /// are skipped.
    fn option(&self, block: &[Line<'s>]) -> Result<Option<(Polarity, AnswerOption)>> {
        let mut headers = block.iter().enumerate().filter_map(|(idx, l)| match l.kind {
            LineType::Option(polarity) => Some((idx, polarity, l.number)),
            _ => None,
        });

        let Some((header_idx, polarity, line)) = headers.next() else {
            return Ok(None);
        };
        if let Some((_, other, other_line)) = headers.next() {
            return Err(if other == polarity {
                ParseError::DuplicateOptionHeader {
                    polarity,
                    line: other_line,
                }
            } else {
                ParseError::ConflictingPolarity { line: other_line }
            });
        }

        let rest = &block[header_idx + 1..];
        let explanation_idx = rest
            .iter()
            .position(|l| l.kind == LineType::Explanation)
            .ok_or(ParseError::MissingExplanation { polarity, line })?;

        let text = self.fragment(&rest[..explanation_idx]);
        if text.is_empty() {
            return Err(ParseError::MissingOptionText { polarity, line });
        }

        let (explanation_lines, preview) = self.split_preview(&rest[explanation_idx + 1..])?;
        let explanation = self.fragment(&explanation_lines);
        if explanation.is_empty() {
            return Err(ParseError::MissingExplanation { polarity, line });
        }

        let option = AnswerOption {
            text,
            explanation,
            preview,
            line_number: line,
        };
        Ok(Some((polarity, option)))
    }

    /// Remove the first `#### Preview` subsection from `lines`.
    ///
    /// The header must be followed on the very next line by a fence.
    fn split_preview(&self, lines: &[Line<'s>]) -> Result<(Vec<Line<'s>>, Option<Preview>)> {
        let Some(idx) = lines.iter().position(|l| l.kind == LineType::Preview) else {
            return Ok((lines.to_vec(), None));
        };

        let header = lines[idx];
        let block = lines
            .get(idx + 1)
            .and_then(|l| self.shielded.block_on_line(l.text))
            .ok_or(ParseError::MissingPreviewCode {
                line: header.number,
            })?;

        let preview = Preview::new(&block.language, block.code.clone());
        let remaining = lines[..idx]
            .iter()
            .chain(&lines[idx + 2..])
            .copied()
            .collect();
        Ok((remaining, Some(preview)))
    }

    /// Join lines into a trimmed fragment with fences restored.
    fn fragment(&self, lines: &[Line<'s>]) -> String {
        let joined = lines.iter().map(|l| l.text).collect::<Vec<_>>().join("\n");
        self.shielded.restore(&joined).trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const MINIMAL: &str = "#### Question\nQ?\n\n---\n#### Correct Option\nA\n##### Explanation\nok\n\n---\n#### Incorrect Option\nB\n##### Explanation\nno\n";

    #[test]
    fn parse_minimal_document() {
        let doc = parse(MINIMAL).unwrap();
        assert_eq!(doc.question, "Q?");
        assert_eq!(doc.correct.len(), 1);
        assert_eq!(doc.incorrect.len(), 1);
        assert_eq!(doc.correct[0].text, "A");
        assert_eq!(doc.correct[0].explanation, "ok");
        assert_eq!(doc.incorrect[0].text, "B");
        assert_eq!(doc.incorrect[0].explanation, "no");
        assert_eq!(doc.incorrect[0].line_number, 11);
    }

    #[test]
    fn options_keep_input_order() {
        let input = "#### Question\nQ\n---\n#### Incorrect Option\ni1\n##### Explanation\ne\n---\n#### Correct Option\nc1\n##### Explanation\ne\n---\n#### Incorrect Option\ni2\n##### Explanation\ne\n---\n#### Correct Option\nc2\n##### Explanation\ne";
        let doc = parse(input).unwrap();
        let correct: Vec<_> = doc.correct.iter().map(|o| o.text.as_str()).collect();
        let incorrect: Vec<_> = doc.incorrect.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(correct, ["c1", "c2"]);
        assert_eq!(incorrect, ["i1", "i2"]);
    }

    #[test]
    fn underscore_separator_is_accepted() {
        let input = "#### Question\nQ\n___\n#### Correct Option\nA\n##### Explanation\nok";
        let doc = parse(input).unwrap();
        assert_eq!(doc.correct.len(), 1);
    }

    #[test]
    fn explanation_header_tolerates_trailing_words() {
        let input = "#### Question\nQ\n---\n#### Correct Option\nA\n##### Explanation (correct)\nbecause";
        let doc = parse(input).unwrap();
        assert_eq!(doc.correct[0].explanation, "because");
    }

    #[test]
    fn question_preview_is_extracted() {
        let input = "#### Question\nWhat does this render?\n#### Preview\n```HTML\n<b class=\"x\">hi</b>\n```\n---\n#### Correct Option\nBold text\n##### Explanation\n`b` is bold";
        let doc = parse(input).unwrap();
        assert_eq!(doc.question, "What does this render?");
        let preview = doc.question_preview.unwrap();
        assert_eq!(preview.language, "html");
        assert_eq!(preview.code, "<b class=\"x\">hi</b>");
        assert!(preview.renderable);
    }

    #[test]
    fn option_preview_is_extracted() {
        let input = "#### Question\nQ\n---\n#### Correct Option\nA\n##### Explanation\nsee below\n#### Preview\n```css\n.a { color: red; }\n```";
        let doc = parse(input).unwrap();
        let option = &doc.correct[0];
        assert_eq!(option.explanation, "see below");
        assert_eq!(option.preview.as_ref().unwrap().code, ".a { color: red; }");
    }

    #[test]
    fn headers_inside_fences_are_ignored() {
        let input = "#### Question\nLook:\n```\n---\n#### Correct Option\n```\n---\n#### Incorrect Option\nB\n##### Explanation\nno";
        let doc = parse(input).unwrap();
        assert!(doc.correct.is_empty());
        assert_eq!(doc.incorrect.len(), 1);
        assert_eq!(doc.question, "Look:\n```\n---\n#### Correct Option\n```");
    }

    #[test]
    fn fences_in_option_text_are_restored() {
        let input = "#### Question\nQ\n---\n#### Correct Option\nUse:\n```js\nlet a = 1;\n```\n##### Explanation\nok";
        let doc = parse(input).unwrap();
        assert_eq!(doc.correct[0].text, "Use:\n```js\nlet a = 1;\n```");
    }

    #[test]
    fn blocks_without_option_header_are_skipped() {
        let input = "#### Question\nQ\n---\nstray notes\n---\n#### Correct Option\nA\n##### Explanation\nok";
        let doc = parse(input).unwrap();
        assert_eq!(doc.option_count(), 1);
    }

    #[test]
    fn missing_separator_before_option_is_tolerated() {
        let input = "#### Question\nQ\n#### Correct Option\nA\n##### Explanation\nok";
        let doc = parse(input).unwrap();
        assert_eq!(doc.question, "Q");
        assert_eq!(doc.correct.len(), 1);
    }

    #[test]
    fn reject_missing_question() {
        let result = parse("#### Correct Option\nA\n##### Explanation\nok");
        assert_eq!(result, Err(ParseError::MissingQuestion));
    }

    #[test]
    fn reject_empty_question() {
        let result = parse("#### Question\n\n---\n#### Correct Option\nA\n##### Explanation\nok");
        assert_eq!(result, Err(ParseError::EmptyQuestion { line: 1 }));
    }

    #[test]
    fn reject_no_options() {
        let result = parse("#### Question\nQ\n---\nnothing here");
        assert_eq!(result, Err(ParseError::NoOptions));
    }

    #[test]
    fn reject_conflicting_polarity() {
        let input = "#### Question\nQ\n---\n#### Correct Option\nA\n#### Incorrect Option\n##### Explanation\nok";
        assert_eq!(parse(input), Err(ParseError::ConflictingPolarity { line: 6 }));
    }

    #[test]
    fn reject_duplicate_option_header() {
        let input = "#### Question\nQ\n---\n#### Correct Option\nA\n##### Explanation\nok\n#### Correct Option\nB\n##### Explanation\nok";
        assert_eq!(
            parse(input),
            Err(ParseError::DuplicateOptionHeader {
                polarity: Polarity::Correct,
                line: 8
            })
        );
    }

    #[test]
    fn reject_missing_explanation() {
        let input = "#### Question\nQ\n---\n#### Incorrect Option\nB";
        assert_eq!(
            parse(input),
            Err(ParseError::MissingExplanation {
                polarity: Polarity::Incorrect,
                line: 4
            })
        );
    }

    #[test]
    fn reject_empty_explanation() {
        let input = "#### Question\nQ\n---\n#### Correct Option\nA\n##### Explanation\n   \n";
        assert!(matches!(
            parse(input),
            Err(ParseError::MissingExplanation { .. })
        ));
    }

    #[test]
    fn reject_missing_option_text() {
        let input = "#### Question\nQ\n---\n#### Correct Option\n\n##### Explanation\nok";
        assert_eq!(
            parse(input),
            Err(ParseError::MissingOptionText {
                polarity: Polarity::Correct,
                line: 4
            })
        );
    }

    #[test]
    fn reject_preview_without_adjacent_fence() {
        let input = "#### Question\nQ\n#### Preview\n\n```html\n<p></p>\n```\n---\n#### Correct Option\nA\n##### Explanation\nok";
        assert_eq!(parse(input), Err(ParseError::MissingPreviewCode { line: 3 }));
    }

    #[test]
    fn error_lines_account_for_fences() {
        let input = "#### Question\n```\n1\n2\n3\n```\n---\n#### Correct Option\n\n##### Explanation\nok";
        assert_eq!(
            parse(input),
            Err(ParseError::MissingOptionText {
                polarity: Polarity::Correct,
                line: 8
            })
        );
    }

    #[test]
    fn reject_unclosed_fence() {
        let input = "#### Question\n```js\nlet a;\n---\n#### Correct Option\nA\n##### Explanation\nok";
        assert_eq!(parse(input), Err(ParseError::UnclosedFence { line: 2 }));
    }

    fn fence_line() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("---".to_string()),
            Just("___".to_string()),
            Just("#### Correct Option".to_string()),
            Just("#### Incorrect Option".to_string()),
            Just("##### Explanation".to_string()),
            Just("#### Preview".to_string()),
            "[a-z*_~ <>&/]{0,16}",
        ]
    }

    proptest! {
        #[test]
        fn fence_contents_reach_preview_verbatim(
            lang in prop::sample::select(vec!["", "html", "css", "js", "rust"]),
            body in prop::collection::vec(fence_line(), 0..8),
        ) {
            let code = body.join("\n");
            let input = format!(
                "#### Question\nQ\n---\n#### Correct Option\nA\n##### Explanation\nok\n#### Preview\n```{lang}\n{code}\n```\n"
            );
            let doc = parse(&input).unwrap();
            prop_assert_eq!(doc.option_count(), 1);
            let preview = doc.correct[0].preview.as_ref().unwrap();
            prop_assert_eq!(&preview.code, &code);
        }
    }
}
