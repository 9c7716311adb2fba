//! Preview containers: highlighted code beside a live rendering.

use super::code::render_code_block;
use crate::types::Preview;
use html_escape::encode_double_quoted_attribute;

/// Render a preview as a two-part container.
///
/// Renderable languages get an iframe whose `srcdoc` carries the document;
/// anything else only shows the code half.
pub fn render_preview(preview: &Preview) -> String {
    let code = render_code_block(&preview.language, &preview.code);
    let mut html = String::from("<div class=\"recall-preview\">");
    html.push_str("<div class=\"recall-preview-code\">");
    html.push_str(&code);
    html.push_str("</div>");

    if let Some(document) = srcdoc(preview) {
        html.push_str("<div class=\"recall-preview-render\">");
        html.push_str("<iframe class=\"recall-preview-frame\" sandbox=\"allow-scripts\" srcdoc=\"");
        html.push_str(&encode_double_quoted_attribute(&document));
        html.push_str("\"></iframe></div>");
    }

    html.push_str("</div>");
    html
}

/// The standalone document a renderable preview is shown as.
fn srcdoc(preview: &Preview) -> Option<String> {
    if !preview.renderable {
        return None;
    }
    let document = match preview.language.as_str() {
        "css" => format!(
            "<!DOCTYPE html><html><head><style>{}</style></head><body></body></html>",
            preview.code
        ),
        "javascript" | "js" => format!(
            "<!DOCTYPE html><html><head></head><body><script>{}</script></body></html>",
            preview.code
        ),
        _ => preview.code.clone(),
    };
    Some(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn srcdoc_attr(html: &str) -> String {
        let start = html.find("srcdoc=\"").unwrap() + "srcdoc=\"".len();
        let end = start + html[start..].find('"').unwrap();
        html[start..end].to_string()
    }

    #[test]
    fn html_preview_has_code_and_frame() {
        let preview = Preview::new("html", "<p class=\"note\">Hi</p>");
        let html = render_preview(&preview);
        assert!(html.starts_with("<div class=\"recall-preview\">"));
        assert!(html.contains("<div class=\"recall-preview-code\"><pre class=\"recall-code\""));
        assert!(html.contains("<iframe"));

        let attr = srcdoc_attr(&html);
        assert!(attr.contains("&quot;note&quot;"));
        assert_eq!(
            html_escape::decode_html_entities(&attr),
            "<p class=\"note\">Hi</p>"
        );
    }

    #[test]
    fn css_preview_is_wrapped_in_style() {
        let html = render_preview(&Preview::new("css", "p { color: red; }"));
        let doc = html_escape::decode_html_entities(&srcdoc_attr(&html)).into_owned();
        assert!(doc.contains("<style>p { color: red; }</style>"));
    }

    #[test]
    fn js_preview_is_wrapped_in_script() {
        let html = render_preview(&Preview::new("js", "document.body.textContent = \"x\";"));
        let doc = html_escape::decode_html_entities(&srcdoc_attr(&html)).into_owned();
        assert!(doc.contains("<script>document.body.textContent = \"x\";</script>"));
    }

    #[test]
    fn non_renderable_preview_has_no_frame() {
        let html = render_preview(&Preview::new("rust", "fn main() {}"));
        assert!(!html.contains("<iframe"));
        assert!(html.contains("fn main() {}"));
    }
}
