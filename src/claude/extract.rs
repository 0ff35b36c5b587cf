use once_cell::sync::Lazy;
use regex::Regex;

// Fenced code blocks with an optional "bibtex" tag, matched case-insensitively
// across lines.
static BIBTEX_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)```(?:bibtex)?\s*\n(.*?)\n```").expect("Invalid BibTeX block regex pattern")
});

/// Outcome of scanning an assistant response for BibTeX entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    /// Candidate entries, in order of appearance in the response.
    pub entries: Vec<String>,
    /// True when no usable fenced block was found; callers should keep the
    /// raw response instead.
    pub fell_back: bool,
}

impl ParsedResponse {
    /// The string stored on a vibe: blank-line-joined entries, or the raw
    /// response verbatim when extraction came up empty.
    pub fn combined(&self, raw: &str) -> String {
        if self.fell_back {
            raw.to_string()
        } else {
            self.entries.join("\n\n")
        }
    }
}

/// Extract BibTeX entries from fenced code blocks in an assistant response.
///
/// Best effort: any trimmed, non-empty block containing an `@` passes. No
/// BibTeX syntax validation is performed.
pub fn extract_bibtex_entries(response: &str) -> Vec<String> {
    BIBTEX_BLOCK_REGEX
        .captures_iter(response)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|block| !block.is_empty() && block.contains('@'))
        .collect()
}

/// Run extraction and record whether the caller must fall back to the raw
/// response.
pub fn parse_response(response: &str) -> ParsedResponse {
    let entries = extract_bibtex_entries(response);
    let fell_back = entries.is_empty();
    ParsedResponse { entries, fell_back }
}
