//! Locate the JSON object inside a model completion.
//!
//! Models wrap their answer in prose or code fences often enough that the
//! raw completion cannot be parsed directly. The scanner below finds the
//! first balanced `{ ... }` span, tracking string literals so braces inside
//! strings do not count.

/// Return the first balanced JSON object in `text`, if any.
///
/// When an opening brace never closes, scanning resumes at the next `{`.
pub fn first_json_object(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut start = 0;

    while let Some(offset) = text[start..].find('{') {
        let open = start + offset;
        if let Some(close) = matching_brace(bytes, open) {
            return Some(&text[open..=close]);
        }
        start = open + 1;
    }
    None
}

/// Index of the brace closing the one at `open`.
fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_object() {
        assert_eq!(first_json_object(r#"{"a":1}"#), Some(r#"{"a":1}"#));
    }

    #[test]
    fn object_inside_prose_and_fences() {
        let text =
            "Here you go:\n```json\n{\"score\": 80, \"nested\": {\"x\": [1, 2]}}\n```\nEnjoy!";
        assert_eq!(
            first_json_object(text),
            Some("{\"score\": 80, \"nested\": {\"x\": [1, 2]}}")
        );
    }

    #[test]
    fn braces_inside_strings_are_ignored() {
        let text = r#"{"tip": "use {curly} braces \"}\" freely", "n": 1} trailing"#;
        assert_eq!(
            first_json_object(text),
            Some(r#"{"tip": "use {curly} braces \"}\" freely", "n": 1}"#)
        );
    }

    #[test]
    fn first_of_several_objects() {
        let text = r#"{"first": true} and {"second": true}"#;
        assert_eq!(first_json_object(text), Some(r#"{"first": true}"#));
    }

    #[test]
    fn unbalanced_prefix_is_skipped() {
        let text = r#"Use { for sets. {"ok": 1}"#;
        // The stray brace swallows the rest, so scanning resumes after it.
        assert_eq!(first_json_object(text), Some(r#"{"ok": 1}"#));
    }

    #[test]
    fn no_object() {
        assert_eq!(first_json_object("Sorry, I can't help with that."), None);
        assert_eq!(first_json_object("{ never closed"), None);
        assert_eq!(first_json_object(""), None);
    }

    #[test]
    fn multibyte_text_around_object() {
        let text = "Voilà, {\"name\": \"crème brûlée\"} ✓";
        assert_eq!(first_json_object(text), Some("{\"name\": \"crème brûlée\"}"));
    }
}
