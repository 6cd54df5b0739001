// Documents as OCR engines return them: an ordered list of pages, some of
// which may be missing because the engine failed on them.
//
// A missing page is its own variant rather than an empty string. An empty
// page means "OCR ran and found no text"; a missing page means "OCR never
// produced anything for this page".

use serde::{Deserialize, Serialize};

/// Heading written in place of a page the OCR engine could not process.
pub const MISSING_PAGE_MARKER: &str = "## (MISSING PAGE)";

/// Placeholder some OCR tools embed in their combined text for failed pages.
pub const COULD_NOT_OCR_PAGE: &str = "**COULD_NOT_OCR_PAGE**";

/// Separator between pages in combined OCR text and in rendered Markdown.
const PAGE_SEPARATOR: &str = "\n\n";

/// One page of OCR output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Page {
    Text(String),
    Missing,
}

impl From<Option<String>> for Page {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(text) => Page::Text(text),
            None => Page::Missing,
        }
    }
}

impl From<Page> for Option<String> {
    fn from(page: Page) -> Self {
        match page {
            Page::Text(text) => Some(text),
            Page::Missing => None,
        }
    }
}

impl Page {
    pub fn text(&self) -> Option<&str> {
        match self {
            Page::Text(text) => Some(text),
            Page::Missing => None,
        }
    }
}

/// An ordered sequence of pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Document {
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    /// A single-page document.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            pages: vec![Page::Text(text.into())],
        }
    }

    /// Split the combined text an OCR tool writes when it only reports one
    /// string: pages joined with a blank line, failed pages replaced by
    /// `**COULD_NOT_OCR_PAGE**`. Each placeholder becomes `Page::Missing`;
    /// the text between placeholders stays as it was written.
    pub fn from_combined_text(text: &str) -> Self {
        let parts: Vec<&str> = text.split(COULD_NOT_OCR_PAGE).collect();
        if parts.len() == 1 {
            return Self::from_text(text);
        }

        let last = parts.len() - 1;
        let mut pages = Vec::new();
        for (i, part) in parts.into_iter().enumerate() {
            let mut part = part;
            if i > 0 {
                pages.push(Page::Missing);
                part = part.strip_prefix(PAGE_SEPARATOR).unwrap_or(part);
            }
            if i < last {
                part = part.strip_suffix(PAGE_SEPARATOR).unwrap_or(part);
            }
            if !part.is_empty() {
                pages.push(Page::Text(part.to_string()));
            }
        }
        Self { pages }
    }

    pub fn missing_page_count(&self) -> usize {
        self.pages.iter().filter(|p| **p == Page::Missing).count()
    }

    /// Text of all present pages, one newline between each. Missing pages are
    /// skipped entirely; this is what gets tokenized.
    pub fn present_text(&self) -> String {
        let present: Vec<&str> = self.pages.iter().filter_map(Page::text).collect();
        present.join("\n")
    }

    /// Render as Markdown: pages separated by a blank line, missing pages
    /// replaced with a visible heading.
    pub fn to_markdown(&self) -> String {
        let rendered: Vec<&str> = self
            .pages
            .iter()
            .map(|p| p.text().unwrap_or(MISSING_PAGE_MARKER))
            .collect();
        rendered.join(PAGE_SEPARATOR)
    }
}
