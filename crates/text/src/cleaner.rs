//! Character stripping and whitespace collapsing

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use vox_core::{Error, Result};

// Emoji and pictograph ranges, including variation selectors and regional
// indicators (flag pairs).
static EMOJI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        "[",
        "\u{1F300}-\u{1F5FF}",
        "\u{1F600}-\u{1F64F}",
        "\u{1F680}-\u{1F6FF}",
        "\u{1F900}-\u{1F9FF}",
        "\u{1FA70}-\u{1FAFF}",
        "\u{2600}-\u{26FF}",
        "\u{2700}-\u{27BF}",
        "\u{FE00}-\u{FE0F}",
        "\u{1F1E6}-\u{1F1FF}",
        "\u{200D}",
        "]+",
    ))
    .expect("emoji pattern is valid")
});

// C0/C1 controls except \t \n \r, plus DEL.
static CONTROL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new("[\u{0000}-\u{0008}\u{000B}\u{000C}\u{000E}-\u{001F}\u{007F}-\u{009F}]+")
        .expect("control pattern is valid")
});

// Mathematical Operators block, known to break the TTS text frontend.
static MATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("[\u{2200}-\u{22FF}]+").expect("math pattern is valid"));

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Before/after statistics for one cleaning pass
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CleanStats {
    /// Grapheme count before cleaning
    pub graphemes_before: usize,
    /// Grapheme count after cleaning
    pub graphemes_after: usize,
    /// Size reduction as a percentage of the input
    pub reduction_pct: f32,
    pub found_emoji: bool,
    pub found_control: bool,
    pub found_math_operators: bool,
    pub collapsed_whitespace: bool,
}

/// A cleaned string plus what was done to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanedText {
    pub text: String,
    pub stats: CleanStats,
}

/// Clean a string. Total: never fails, for any input.
pub fn clean(text: &str) -> CleanedText {
    let graphemes_before = text.graphemes(true).count();

    let found_emoji = EMOJI_RE.is_match(text);
    let found_control = CONTROL_RE.is_match(text);
    let found_math = MATH_RE.is_match(text);

    let mut out = text.to_string();
    if found_emoji {
        out = EMOJI_RE.replace_all(&out, " ").into_owned();
    }
    if found_control {
        out = CONTROL_RE.replace_all(&out, " ").into_owned();
    }
    if found_math {
        out = MATH_RE.replace_all(&out, " ").into_owned();
    }

    let collapsed = WHITESPACE_RE.replace_all(&out, " ");
    let final_text = collapsed.trim().to_string();
    let collapsed_whitespace = final_text != text;

    let graphemes_after = final_text.graphemes(true).count();
    // Stripping a joiner can split a cluster, so "after" may exceed
    // "before"; report that as zero reduction.
    let reduction_pct = if graphemes_before == 0 {
        0.0
    } else {
        100.0 * graphemes_before.saturating_sub(graphemes_after) as f32
            / graphemes_before as f32
    };

    CleanedText {
        text: final_text,
        stats: CleanStats {
            graphemes_before,
            graphemes_after,
            reduction_pct,
            found_emoji,
            found_control,
            found_math_operators: found_math,
            collapsed_whitespace,
        },
    }
}

/// Clean raw bytes. Malformed UTF-8 is lossy-decoded (replacement chars
/// are then treated as ordinary text), so this never fails either.
pub fn clean_bytes(bytes: &[u8]) -> CleanedText {
    let text = String::from_utf8_lossy(bytes);
    clean(&text)
}

/// True when cleaning would not modify the string at all. Lets callers
/// skip the allocation for already-safe text.
pub fn is_text_safe(text: &str) -> bool {
    if EMOJI_RE.is_match(text) || CONTROL_RE.is_match(text) || MATH_RE.is_match(text) {
        return false;
    }
    // Whitespace must already be in collapsed, trimmed form.
    let collapsed = WHITESPACE_RE.replace_all(text, " ");
    collapsed.trim() == text
}

/// Clean a batch. Unlike the single-item entry points this is strict about
/// encoding: the whole batch fails on the first item that is not valid
/// UTF-8, naming its index. No partial output.
pub fn clean_batch<T: AsRef<[u8]>>(items: &[T]) -> Result<Vec<CleanedText>> {
    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let text = std::str::from_utf8(item.as_ref()).map_err(|e| {
            Error::Validation(format!("item {index}: invalid UTF-8: {e}"))
        })?;
        out.push(clean(text));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_emoji() {
        let cleaned = clean("hello 😀🚀 world");
        assert_eq!(cleaned.text, "hello world");
        assert!(cleaned.stats.found_emoji);
        assert!(!cleaned.stats.found_control);
    }

    #[test]
    fn test_strips_control_chars() {
        let cleaned = clean("a\u{0000}b\u{001B}c");
        assert_eq!(cleaned.text, "a b c");
        assert!(cleaned.stats.found_control);
    }

    #[test]
    fn test_strips_math_operators() {
        let cleaned = clean("for all \u{2200}x \u{2208} S");
        assert_eq!(cleaned.text, "for all x S");
        assert!(cleaned.stats.found_math_operators);
    }

    #[test]
    fn test_collapses_whitespace() {
        let cleaned = clean("  a \t b\n\n c  ");
        assert_eq!(cleaned.text, "a b c");
        assert!(cleaned.stats.collapsed_whitespace);
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "hello 😀 world",
            "  spaced \t out  ",
            "\u{2200}x\u{0007}",
            "plain",
            "",
            "🇮🇳 flags too",
        ];
        for input in inputs {
            let once = clean(input);
            let twice = clean(&once.text);
            assert_eq!(once.text, twice.text, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_clean_after_clean_reports_safe() {
        let once = clean("mixed 😀 \u{2203} input\u{0001}");
        assert!(is_text_safe(&once.text));
    }

    #[test]
    fn test_never_fails_on_malformed_utf8() {
        // Overlong encoding and a stray continuation byte.
        let bad: &[u8] = &[0x68, 0x69, 0xC0, 0xAF, 0x80, 0x21];
        let cleaned = clean_bytes(bad);
        assert!(!cleaned.text.is_empty());
    }

    #[test]
    fn test_batch_fails_fast_naming_index() {
        let items: Vec<Vec<u8>> = vec![
            b"fine".to_vec(),
            vec![0xFF, 0xFE],
            b"also fine".to_vec(),
        ];
        let err = clean_batch(&items).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("item 1"));
    }

    #[test]
    fn test_batch_all_valid() {
        let items = vec!["a 😀".to_string(), "b".to_string()];
        let out = clean_batch(&items).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].text, "a");
    }

    #[test]
    fn test_reduction_stats() {
        let cleaned = clean("ab 😀😀");
        assert!(cleaned.stats.reduction_pct > 0.0);
        assert_eq!(clean("").stats.reduction_pct, 0.0);
    }

    #[test]
    fn test_is_text_safe_fast_path() {
        assert!(is_text_safe("plain text"));
        assert!(!is_text_safe("has 😀"));
        assert!(!is_text_safe("double  space"));
        assert!(!is_text_safe(" leading"));
    }
}
