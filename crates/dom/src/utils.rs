//! Utility functions for DOM processing

/// Cap text length to keep log output readable
pub fn cap_text_length(text: &str, max_len: usize) -> String {
    if text.len() <= max_len {
        return text.to_string();
    }
    let mut end = max_len;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

/// `backgroundColor` -> `background-color`, `dataId2` -> `data-id2`
///
/// A hyphen goes in front of every upper-case letter that follows a
/// lower-case letter or a digit, then everything is lower-cased.
pub fn camel_to_kebab(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut prev: Option<char> = None;
    for ch in input.chars() {
        if ch.is_ascii_uppercase()
            && prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit())
        {
            out.push('-');
        }
        out.push(ch.to_ascii_lowercase());
        prev = Some(ch);
    }
    out
}

/// Escape character data for HTML text content
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape an attribute value (double-quoted)
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_text_length() {
        assert_eq!(cap_text_length("hello", 10), "hello");
        assert_eq!(cap_text_length("hello world", 5), "hello...");
        assert_eq!(cap_text_length("héllo", 2), "h...");
    }

    #[test]
    fn test_camel_to_kebab() {
        assert_eq!(camel_to_kebab("backgroundColor"), "background-color");
        assert_eq!(camel_to_kebab("dataUserId"), "data-user-id");
        assert_eq!(camel_to_kebab("aria2Label"), "aria2-label");
        assert_eq!(camel_to_kebab("already-kebab"), "already-kebab");
        assert_eq!(camel_to_kebab("ID"), "id");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape_text("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_attr("say \"hi\""), "say &quot;hi&quot;");
    }
}
