//! Question documents shared by the integration tests.

/// One correct and one incorrect option.
pub const MINIMAL: &str = "\
#### Question
Q?
---
#### Correct Option
A
##### Explanation
ok
---
#### Incorrect Option
B
##### Explanation
no
";

/// Build a document with `correct` correct and `incorrect` incorrect
/// options, interleaved so that input order differs from field order.
pub fn shaped(correct: usize, incorrect: usize) -> String {
    let mut doc = String::from("#### Question\nWhich apply?\n");
    let (mut c, mut i) = (0, 0);
    while c < correct || i < incorrect {
        if i < incorrect && (c >= correct || i < c) {
            i += 1;
            doc.push_str(&format!(
                "---\n#### Incorrect Option\nwrong {i}\n##### Explanation\nwhy wrong {i}\n"
            ));
        } else {
            c += 1;
            doc.push_str(&format!(
                "---\n#### Correct Option\nright {c}\n##### Explanation\nwhy right {c}\n"
            ));
        }
    }
    doc
}

/// A css fence with a block comment inside an option explanation.
pub const CSS_COMMENT: &str = "\
#### Question
How wide is the paragraph?
---
#### Correct Option
Half the viewport.
##### Explanation
```css
.p { width: 50%; /* 50 % of the viewport */ }
```
---
#### Incorrect Option
The full width.
##### Explanation
The rule sets it explicitly.
";

/// An inline code span holding a lone backtick.
pub const BACKTICK: &str = "\
#### Question
What delimits template literals?
---
#### Correct Option
Backticks.
##### Explanation
They allow interpolation.
---
#### Incorrect Option
Backticks (`` ` ``) delimit template literals.
##### Explanation
This option is worded as a trap.
";

/// An html preview on the question.
pub const HTML_PREVIEW: &str = "\
#### Question
What does this show?
#### Preview
```html
<p class=\"greeting\">Hello</p>
```
---
#### Correct Option
A greeting.
##### Explanation
A paragraph with text.
---
#### Incorrect Option
Nothing.
##### Explanation
The paragraph has content.
";

/// A remote image that cannot be fetched.
pub const UNREACHABLE_IMAGE: &str = "\
#### Question
What is shown? ![x](https://invalid.invalid/i.jpg)
---
#### Correct Option
A picture.
##### Explanation
It is an image.
---
#### Incorrect Option
Text.
##### Explanation
It is not text.
";

/// A remote image served by the fake fetcher.
pub const IMAGE_URL: &str = "https://example.com/img/diagram.png";

pub fn with_image() -> String {
    MINIMAL.replace("Q?", &format!("Q? ![diagram]({IMAGE_URL})"))
}
