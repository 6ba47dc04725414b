//! Plain-text listing format used for copy-to-clipboard
//!
//! ```text
//! TITLE: <title>
//! PRICE: <suggested price>
//!
//! FEATURES:
//! • <bullet>
//!
//! DESCRIPTION:
//! <description>
//!
//! KEYWORDS:
//! <keyword>, <keyword>
//! ```
//!
//! Parsing gives back the same listing as long as title, price and bullets
//! are single-line, keywords contain no comma, and fields carry no
//! leading or trailing whitespace.

use crate::gateway::Listing;
use thiserror::Error;

const BULLET: &str = "• ";
const FEATURES_MARKER: &str = "\n\nFEATURES:";
const DESCRIPTION_MARKER: &str = "\n\nDESCRIPTION:";
const KEYWORDS_MARKER: &str = "\n\nKEYWORDS:";

/// Errors while parsing clipboard text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardParseError {
    /// A required header line or section marker is absent
    #[error("Missing section: {0}")]
    MissingSection(&'static str),
}

/// Render a listing as clipboard text
pub fn to_clipboard_text(listing: &Listing) -> String {
    let features = listing
        .bullets
        .iter()
        .map(|b| format!("{}{}", BULLET, b))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "TITLE: {}\nPRICE: {}\n\nFEATURES:\n{}\n\nDESCRIPTION:\n{}\n\nKEYWORDS:\n{}",
        listing.title,
        listing.suggested_price,
        features,
        listing.description,
        listing.keywords.join(", ")
    )
    .trim()
    .to_string()
}

/// Parse clipboard text back into a listing
pub fn parse_clipboard_text(text: &str) -> Result<Listing, ClipboardParseError> {
    let text = text.trim();

    let features_at = text
        .find(FEATURES_MARKER)
        .ok_or(ClipboardParseError::MissingSection("FEATURES"))?;
    let features_end = features_at + FEATURES_MARKER.len();
    let description_at = text[features_end..]
        .find(DESCRIPTION_MARKER)
        .map(|i| i + features_end)
        .ok_or(ClipboardParseError::MissingSection("DESCRIPTION"))?;
    let description_end = description_at + DESCRIPTION_MARKER.len();
    // Keywords are single-line, so the last marker is the real one even if
    // the description happens to contain the same text.
    let keywords_at = text[description_end..]
        .rfind(KEYWORDS_MARKER)
        .map(|i| i + description_end)
        .ok_or(ClipboardParseError::MissingSection("KEYWORDS"))?;

    let mut header = text[..features_at].lines();
    let title = header
        .next()
        .and_then(|l| l.strip_prefix("TITLE:"))
        .ok_or(ClipboardParseError::MissingSection("TITLE"))?;
    let price = header
        .next()
        .and_then(|l| l.strip_prefix("PRICE:"))
        .ok_or(ClipboardParseError::MissingSection("PRICE"))?;

    let bullets = text[features_end..description_at]
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(|l| l.strip_prefix(BULLET.trim_end()).unwrap_or(l).trim().to_string())
        .collect();

    let description = text[description_end..keywords_at].trim().to_string();

    let keywords = text[keywords_at + KEYWORDS_MARKER.len()..]
        .split(',')
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();

    Ok(Listing {
        title: title.trim().to_string(),
        bullets,
        description,
        keywords,
        suggested_price: price.trim().to_string(),
    })
}
