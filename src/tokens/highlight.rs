// Inline highlighting of a TokenDiff over the candidate's raw text.
//
// The candidate text is scanned once. Every whole word whose lowercase form is
// in `changed` or `added` becomes a marked segment; everything else, including
// tags and Markdown images, is copied through verbatim. A single pass means the
// `<span class="...">` wrappers we emit are never themselves searched, so a
// token like "span" or "added" cannot corrupt them.

use super::diff::TokenDiff;
use super::tokenize::{RE_MARKUP, RE_WORD};

/// How a highlighted word differs from the base document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    /// The word is in both documents, with a different count.
    Changed,
    /// The word does not appear in the base document at all.
    Added,
}

impl Mark {
    /// CSS class used for the wrapping `<span>`.
    pub fn class(&self) -> &'static str {
        match self {
            Mark::Changed => "changed",
            Mark::Added => "added",
        }
    }
}

/// A slice of the candidate text, either untouched or marked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Marked(Mark, &'a str),
}

impl TokenDiff {
    /// Which mark, if any, applies to a raw word from the candidate text.
    pub fn mark_for(&self, word: &str) -> Option<Mark> {
        let token = word.to_lowercase();
        if self.changed.contains(&token) {
            Some(Mark::Changed)
        } else if self.added.contains(&token) {
            Some(Mark::Added)
        } else {
            None
        }
    }

    /// Split `text` into plain and marked segments. Concatenating the segment
    /// texts gives back `text` exactly.
    pub fn segments<'a>(&self, text: &'a str) -> Vec<Segment<'a>> {
        let mut segments = Vec::new();
        let mut cursor = 0;

        let mut mark_words = |start: usize, end: usize, segments: &mut Vec<Segment<'a>>| {
            for word in RE_WORD.find_iter(&text[start..end]) {
                let Some(mark) = self.mark_for(word.as_str()) else {
                    continue;
                };
                let (word_start, word_end) = (start + word.start(), start + word.end());
                if word_start > cursor {
                    segments.push(Segment::Plain(&text[cursor..word_start]));
                }
                segments.push(Segment::Marked(mark, &text[word_start..word_end]));
                cursor = word_end;
            }
        };

        // Only look for words between markup spans.
        let mut region_start = 0;
        for markup in RE_MARKUP.find_iter(text) {
            mark_words(region_start, markup.start(), &mut segments);
            region_start = markup.end();
        }
        mark_words(region_start, text.len(), &mut segments);

        if cursor < text.len() {
            segments.push(Segment::Plain(&text[cursor..]));
        }
        segments
    }

    /// Highlight how `markdown` differs from the base document.
    ///
    /// Returns Markdown with `<span class="changed">` and `<span class="added">`
    /// wrappers. Removed tokens do not exist in the candidate; read them from
    /// `self.removed`.
    pub fn highlight_markdown(&self, markdown: &str) -> String {
        let mut out = String::with_capacity(markdown.len());
        for segment in self.segments(markdown) {
            match segment {
                Segment::Plain(text) => out.push_str(text),
                Segment::Marked(mark, word) => {
                    out.push_str(&format!(r#"<span class="{}">{}</span>"#, mark.class(), word));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn diff(changed: &[&str], added: &[&str], removed: &[&str]) -> TokenDiff {
        let set = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>();
        TokenDiff {
            removed: set(removed),
            changed: set(changed),
            added: set(added),
        }
    }

    #[test]
    fn test_wraps_changed_and_added() {
        let d = diff(&["total"], &["tax"], &[]);
        assert_eq!(
            d.highlight_markdown("Total: 5 tax"),
            r#"<span class="changed">Total</span>: 5 <span class="added">tax</span>"#
        );
    }

    #[test]
    fn test_whole_words_only() {
        let d = diff(&[], &["cat"], &[]);
        assert_eq!(
            d.highlight_markdown("category cat concat"),
            r#"category <span class="added">cat</span> concat"#
        );
    }

    #[test]
    fn test_removed_tokens_are_not_inserted() {
        let d = diff(&[], &[], &["missing"]);
        assert_eq!(d.highlight_markdown("nothing here"), "nothing here");
    }

    #[test]
    fn test_marker_words_do_not_corrupt_markup() {
        let d = diff(&["span"], &["class", "added"], &[]);
        assert_eq!(
            d.highlight_markdown("span class"),
            r#"<span class="changed">span</span> <span class="added">class</span>"#
        );
    }

    #[test]
    fn test_source_markup_is_preserved() {
        let d = diff(&[], &["b", "logo", "td"], &[]);
        let text = "<td><b>x</b></td> ![logo](logo.png) td";
        assert_eq!(
            d.highlight_markdown(text),
            r#"<td><b>x</b></td> ![logo](logo.png) <span class="added">td</span>"#
        );
    }

    #[test]
    fn test_segments_reassemble_to_input() {
        let d = diff(&["a"], &["c"], &[]);
        let text = "A b c <br> ![c](c) a!";
        let rebuilt: String = d
            .segments(text)
            .iter()
            .map(|s| match s {
                Segment::Plain(t) | Segment::Marked(_, t) => *t,
            })
            .collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_case_insensitive_match_keeps_original_case() {
        let d = diff(&["café"], &[], &[]);
        assert_eq!(
            d.highlight_markdown("CAFÉ"),
            r#"<span class="changed">CAFÉ</span>"#
        );
    }
}
