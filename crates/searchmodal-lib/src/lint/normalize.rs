//! Inter-tag whitespace removal for HTML fragments.

/// Elements whose content is copied through untouched.
const RAW_TEXT_ELEMENTS: [&str; 4] = ["pre", "textarea", "script", "style"];

/// Drop whitespace-only runs between tags and at either end of `html`.
///
/// Text that contains anything besides ASCII whitespace is kept byte for
/// byte, as are tag bodies (attribute values included) and the content of
/// raw-text elements.
pub fn normalize_whitespace(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut pos = 0;

    while pos < html.len() {
        let Some(start) = find_tag_start(html, pos) else {
            push_text(&mut out, &html[pos..]);
            break;
        };

        push_text(&mut out, &html[pos..start]);
        let end = tag_end(html, start);
        let tag = &html[start..end];
        out.push_str(tag);
        pos = end;

        if let Some(name) = raw_text_element(tag) {
            let close = find_closing_tag(html, pos, name);
            out.push_str(&html[pos..close]);
            pos = close;
        }
    }

    out
}

fn push_text(out: &mut String, text: &str) {
    if !text.chars().all(|c| c.is_ascii_whitespace()) {
        out.push_str(text);
    }
}

/// Index of the next `<` that opens a tag, comment or declaration.
fn find_tag_start(html: &str, from: usize) -> Option<usize> {
    let bytes = html.as_bytes();
    html[from..]
        .match_indices('<')
        .map(|(i, _)| from + i)
        .find(|&i| {
            bytes
                .get(i + 1)
                .is_some_and(|&b| b.is_ascii_alphabetic() || matches!(b, b'/' | b'!' | b'?'))
        })
}

/// Index one past the `>` closing the tag at `start`. Quoted attribute
/// values may contain `>`; a quote opens a value only right after `=`.
fn tag_end(html: &str, start: usize) -> usize {
    if html[start..].starts_with("<!--") {
        return html[start + 4..]
            .find("-->")
            .map(|i| start + 4 + i + 3)
            .unwrap_or(html.len());
    }

    let mut quote: Option<u8> = None;
    let mut prev = b'<';
    for (i, &b) in html.as_bytes().iter().enumerate().skip(start + 1) {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') if prev == b'=' => quote = Some(b),
            (None, b'>') => return i + 1,
            (None, _) => {}
        }
        if !b.is_ascii_whitespace() {
            prev = b;
        }
    }
    html.len()
}

fn raw_text_element(tag: &str) -> Option<&'static str> {
    if tag.ends_with("/>") {
        return None;
    }
    let name: String = tag[1..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    RAW_TEXT_ELEMENTS.iter().copied().find(|&raw| raw == name)
}

fn find_closing_tag(html: &str, from: usize, name: &str) -> usize {
    // ASCII lowercasing keeps byte offsets intact.
    let haystack = html[from..].to_ascii_lowercase();
    haystack
        .find(&format!("</{name}"))
        .map(|i| from + i)
        .unwrap_or(html.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_inter_tag_whitespace() {
        let html = "\n<ul>\n  <li>One</li>\n  <li>Two</li>\n</ul>\n";
        assert_eq!(normalize_whitespace(html), "<ul><li>One</li><li>Two</li></ul>");
    }

    #[test]
    fn test_keeps_text_node_whitespace() {
        let html = "<p>Hello   world </p>\n<p> again</p>";
        assert_eq!(normalize_whitespace(html), "<p>Hello   world </p><p> again</p>");
    }

    #[test]
    fn test_keeps_raw_text_content() {
        let html = "<div>\n<PRE>\n  a\n   </PRE>\n<textarea>  </textarea>\n</div>";
        assert_eq!(
            normalize_whitespace(html),
            "<div><PRE>\n  a\n   </PRE><textarea>  </textarea></div>"
        );
    }

    #[test]
    fn test_script_with_markup_inside() {
        let html = "<script>\n if (a < b) { x = '<p> </p>'; }\n</script>\n<p>x</p>";
        assert_eq!(
            normalize_whitespace(html),
            "<script>\n if (a < b) { x = '<p> </p>'; }\n</script><p>x</p>"
        );
    }

    #[test]
    fn test_keeps_attribute_whitespace() {
        let html = "<img alt=\"a  >  b\">  <br>";
        assert_eq!(normalize_whitespace(html), "<img alt=\"a  >  b\"><br>");
    }

    #[test]
    fn test_apostrophe_in_unquoted_value() {
        let html = "<p title=don't>x</p>\n  <p>y</p>";
        assert_eq!(normalize_whitespace(html), "<p title=don't>x</p><p>y</p>");
        assert_eq!(
            normalize_whitespace("<a title = 'a > b' >x</a>\n<b>y</b>"),
            "<a title = 'a > b' >x</a><b>y</b>"
        );
    }

    #[test]
    fn test_bare_angle_bracket_is_text() {
        assert_eq!(normalize_whitespace("<p>1 < 2</p>"), "<p>1 < 2</p>");
    }

    #[test]
    fn test_comments() {
        let html = "<!-- a > b -->\n<p>x</p>";
        assert_eq!(normalize_whitespace(html), "<!-- a > b --><p>x</p>");
    }

    #[test]
    fn test_non_breaking_space_is_content() {
        let html = "<td>\u{a0}</td>";
        assert_eq!(normalize_whitespace(html), html);
    }

    #[test]
    fn test_whitespace_only_and_empty() {
        assert_eq!(normalize_whitespace("  \n\t "), "");
        assert_eq!(normalize_whitespace(""), "");
    }

    #[test]
    fn test_idempotent() {
        let html = "<nav>\n <a href=\"/\"> Home </a>\n <pre> x </pre>\n</nav>";
        let once = normalize_whitespace(html);
        assert_eq!(normalize_whitespace(&once), once);
    }

    #[test]
    fn test_unterminated_tag() {
        assert_eq!(normalize_whitespace("<p>x</p>  <div class=\"a"), "<p>x</p><div class=\"a");
    }
}
