//! Population of note fields from a parsed document.

use crate::error::Result;
use crate::format::{format_fragment, render_preview};
use crate::image::ResolveImage;
use crate::notetype::Shape;
use crate::types::{AnswerOption, Document, Polarity, Preview};
use std::collections::BTreeMap;

/// Field name to stored HTML.
pub type FieldMap = BTreeMap<String, String>;

/// Format every fragment of `doc` into the fields of its shape.
///
/// Previews are appended below the fragment they belong to: the question
/// preview to `Question`, an option preview to that option's explanation.
pub fn build_fields(doc: &Document, images: &mut dyn ResolveImage) -> Result<FieldMap> {
    let shape = Shape::of(doc);
    let mut fields = FieldMap::new();

    let question = with_preview(
        format_fragment(&doc.question, images)?,
        doc.question_preview.as_ref(),
    );
    fields.insert(shape.question_field().to_string(), question);

    let options = doc
        .options(Polarity::Correct)
        .iter()
        .chain(doc.options(Polarity::Incorrect));
    for (slot, option) in shape.slots().into_iter().zip(options) {
        let (text, explanation) = format_option(option, images)?;
        fields.insert(slot.option_field, text);
        fields.insert(slot.explanation_field, explanation);
    }

    tracing::debug!(%shape, fields = fields.len(), "populated fields");
    Ok(fields)
}

fn format_option(option: &AnswerOption, images: &mut dyn ResolveImage) -> Result<(String, String)> {
    let text = format_fragment(&option.text, images)?;
    let explanation = with_preview(
        format_fragment(&option.explanation, images)?,
        option.preview.as_ref(),
    );
    Ok((text, explanation))
}

fn with_preview(mut html: String, preview: Option<&Preview>) -> String {
    if let Some(preview) = preview {
        if !html.is_empty() {
            html.push('\n');
        }
        html.push_str(&render_preview(preview));
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::KeepRemote;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    const TWO_BY_ONE: &str = "\
#### Question
Pick the borrow rules.
---
#### Correct Option
One mutable reference.
##### Explanation
Exclusive access.
---
#### Correct Option
Many shared references.
##### Explanation
Aliasing without mutation.
---
#### Incorrect Option
Both at once.
##### Explanation
That would be a data race.
";

    #[test]
    fn fills_every_field_of_the_shape() {
        let doc = parse(TWO_BY_ONE).unwrap();
        let fields = build_fields(&doc, &mut KeepRemote).unwrap();
        let names: Vec<_> = fields.keys().cloned().collect();
        let mut expected = Shape::new(2, 1).field_names();
        expected.sort();
        assert_eq!(names, expected);
    }

    #[test]
    fn options_keep_input_order() {
        let doc = parse(TWO_BY_ONE).unwrap();
        let fields = build_fields(&doc, &mut KeepRemote).unwrap();
        assert_eq!(fields["CorrectOption1"], "<p>One mutable reference.</p>");
        assert_eq!(fields["CorrectOption2"], "<p>Many shared references.</p>");
        assert_eq!(fields["IncorrectExplanation1"], "<p>That would be a data race.</p>");
    }

    #[test]
    fn question_preview_is_appended_to_question() {
        let input = "\
#### Question
What does this render?
#### Preview
```html
<b>hi</b>
```
---
#### Correct Option
Bold text.
##### Explanation
The b element.
---
#### Incorrect Option
Nothing.
##### Explanation
It renders.
";
        let doc = parse(input).unwrap();
        let fields = build_fields(&doc, &mut KeepRemote).unwrap();
        let question = &fields["Question"];
        assert!(question.starts_with("<p>What does this render?</p>\n<div class=\"recall-preview\">"));
        assert!(question.contains("<iframe"));
    }

    #[test]
    fn option_preview_is_appended_to_explanation() {
        let input = "\
#### Question
Q?
---
#### Correct Option
A
##### Explanation
See below.
#### Preview
```css
p { color: red; }
```
---
#### Incorrect Option
B
##### Explanation
no
";
        let doc = parse(input).unwrap();
        let fields = build_fields(&doc, &mut KeepRemote).unwrap();
        assert_eq!(fields["CorrectOption"], "<p>A</p>");
        assert!(fields["CorrectExplanation"].contains("recall-preview"));
        assert!(!fields["IncorrectExplanation1"].contains("recall-preview"));
    }
}
