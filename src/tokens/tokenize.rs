// Tokenizer: raw OCR output -> normalized word tokens.
//
// OCR engines return Markdown with stray HTML tags and image links mixed in.
// Both are swapped for a single space before we look for words, so
// "foo<br>bar" still yields two tokens and image alt text never counts.

use std::sync::LazyLock;

use regex::Regex;

/// Simple open, close, or self-closing tags: `<b>`, `</td>`, `<br/>`.
const RE_TAG: &str = r"</?[A-Za-z_]+\s*/?>";

/// Markdown images on a single line: `![alt](url)`.
const RE_MD_IMAGE: &str = r"!\[.*?\]\(.*?\)";

/// Markup that is stripped before tokenizing and left untouched when
/// highlighting.
pub(crate) static RE_MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("{RE_TAG}|{RE_MD_IMAGE}")).unwrap());

/// A maximal run of Unicode word characters.
pub(crate) static RE_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

/// Convert text into lowercase word tokens, ignoring markup.
///
/// Tokens made entirely of underscores are dropped: they come from Markdown
/// emphasis and form-field placeholders (`_____`), not from document content.
pub fn tokenize(text: &str) -> Vec<String> {
    let stripped = RE_MARKUP.replace_all(text, " ");
    RE_WORD
        .find_iter(&stripped)
        .map(|m| m.as_str())
        .filter(|word| !is_placeholder(word))
        .map(|word| word.to_lowercase())
        .collect()
}

/// Join tokens back into plain text, one space between each.
///
/// For already-normalized input, `tokenize(&tokens_to_text(&t)) == t`.
pub fn tokens_to_text(tokens: &[String]) -> String {
    tokens.join(" ")
}

/// True for words like `_` or `____`.
pub(crate) fn is_placeholder(word: &str) -> bool {
    word.chars().all(|c| c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_splits_on_punctuation() {
        assert_eq!(
            tokenize("Hello, World! It's 2024."),
            vec!["hello", "world", "it", "s", "2024"]
        );
    }

    #[test]
    fn test_strips_tags_without_fusing_words() {
        assert_eq!(tokenize("foo<br>bar</td>baz<br/>qux"), vec!["foo", "bar", "baz", "qux"]);
    }

    #[test]
    fn test_strips_markdown_images() {
        assert_eq!(
            tokenize("before![Company logo](https://example.com/logo.png)after"),
            vec!["before", "after"]
        );
    }

    #[test]
    fn test_drops_underscore_only_tokens() {
        assert_eq!(tokenize("Name: ________ Date: __"), vec!["name", "date"]);
    }

    #[test]
    fn test_keeps_underscores_inside_words() {
        assert_eq!(tokenize("snake_case _lead"), vec!["snake_case", "_lead"]);
    }

    #[test]
    fn test_accented_latin_letters_are_word_characters() {
        assert_eq!(tokenize("Café Ñandú über"), vec!["café", "ñandú", "über"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  \n<p></p>  ").is_empty());
    }

    #[test]
    fn test_does_not_strip_non_tag_angle_brackets() {
        // "<" followed by a digit is a comparison, not a tag
        assert_eq!(tokenize("a <5 b"), vec!["a", "5", "b"]);
    }
}
