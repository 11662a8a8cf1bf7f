//! HTML string helpers

/// Escape text for use in HTML element content or quoted attribute values
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `<a href="...">label</a>` with both parts escaped
pub fn link(href: &str, label: &str, class: Option<&str>) -> String {
    match class {
        Some(class) => format!(
            "<a class=\"{}\" href=\"{}\">{}</a>",
            escape_html(class),
            escape_html(href),
            escape_html(label)
        ),
        None => format!("<a href=\"{}\">{}</a>", escape_html(href), escape_html(label)),
    }
}

/// Render items as a `<ul>` of already-rendered HTML fragments
pub fn list(items: &[String], class: &str) -> String {
    let mut out = format!("<ul class=\"{}\">", escape_html(class));
    for item in items {
        out.push_str("<li>");
        out.push_str(item);
        out.push_str("</li>");
    }
    out.push_str("</ul>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
        assert_eq!(escape_html("Euler's"), "Euler&#39;s");
    }

    #[test]
    fn test_link_escapes_label() {
        assert_eq!(
            link("x.html", "<b>", Some("reference")),
            "<a class=\"reference\" href=\"x.html\">&lt;b&gt;</a>"
        );
    }

    #[test]
    fn test_list() {
        let html = list(&["a".to_string(), "<i>b</i>".to_string()], "applications-list");
        assert_eq!(html, "<ul class=\"applications-list\"><li>a</li><li><i>b</i></li></ul>");
    }
}
