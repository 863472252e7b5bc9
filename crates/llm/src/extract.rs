//! JSON extraction from LLM output
//!
//! Models wrap structured output in prose or code fences more often than
//! not. Extraction order: fenced ```json block, then the first balanced
//! top-level object, then the whole string.

use serde_json::Value;

/// Pull the first JSON object out of free-form model output.
pub fn extract_json(text: &str) -> Option<Value> {
    if let Some(block) = fenced_block(text) {
        if let Ok(value) = serde_json::from_str(block.trim()) {
            return Some(value);
        }
    }

    if let Some(candidate) = first_balanced_object(text) {
        if let Ok(value) = serde_json::from_str(candidate) {
            return Some(value);
        }
    }

    serde_json::from_str(text.trim()).ok()
}

/// Contents of the first ```json (or bare ```) fence, if any.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_fence = &text[start + 3..];
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let end = body.find("```")?;
    Some(&body[..end])
}

/// First substring from `{` to its matching `}`, brace-counting while
/// skipping string literals and escapes.
fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match b {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
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
    fn test_fenced_block() {
        let text = "Sure, here you go:\n```json\n{\"a\": 1}\n```\nanything else?";
        let value = extract_json(text).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_bare_fence() {
        let text = "```\n{\"b\": true}\n```";
        assert_eq!(extract_json(text).unwrap()["b"], true);
    }

    #[test]
    fn test_embedded_object() {
        let text = "The answer is {\"name\": \"vox\", \"nested\": {\"x\": 2}} as requested.";
        let value = extract_json(text).unwrap();
        assert_eq!(value["nested"]["x"], 2);
    }

    #[test]
    fn test_braces_inside_strings_do_not_confuse() {
        let text = "prefix {\"s\": \"has } brace\", \"n\": 3} suffix";
        let value = extract_json(text).unwrap();
        assert_eq!(value["n"], 3);
    }

    #[test]
    fn test_whole_string() {
        assert_eq!(extract_json("  {\"k\": \"v\"}  ").unwrap()["k"], "v");
    }

    #[test]
    fn test_no_json() {
        assert!(extract_json("just prose, no structure").is_none());
        assert!(extract_json("unbalanced { here").is_none());
    }
}
