//! Bluesky rich-text facet detection.
//!
//! Facets annotate byte ranges of the UTF-8 post text. Only hashtags and
//! links are detected; mentions would need a handle-to-DID lookup.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://[^\s]+").expect("link pattern is valid")
});

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(#[\p{L}_][\p{L}\p{N}_]*)").expect("tag pattern is valid")
});

const LINK_TRAILING: &[char] = &['.', ',', ';', ':', '!', '?', ')', '"', '\''];

/// Byte range of a facet within the post text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetIndex {
    /// Inclusive start byte.
    pub byte_start: usize,
    /// Exclusive end byte.
    pub byte_end: usize,
}

/// What a facet annotates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum FacetFeature {
    /// Hyperlink.
    #[serde(rename = "app.bsky.richtext.facet#link")]
    Link {
        /// Target URI.
        uri: String,
    },
    /// Hashtag, without the leading `#`.
    #[serde(rename = "app.bsky.richtext.facet#tag")]
    Tag {
        /// Tag text.
        tag: String,
    },
}

/// One annotated range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    /// Annotated byte range.
    pub index: FacetIndex,
    /// Annotations applied to the range.
    pub features: Vec<FacetFeature>,
}

/// Detect link and hashtag facets, ordered by position.
///
/// # Examples
///
/// ```
/// use quotebot_social::{FacetFeature, detect_facets};
///
/// let facets = detect_facets("Giddy up #kramer");
/// assert_eq!(facets.len(), 1);
/// assert_eq!(facets[0].index.byte_start, 9);
/// assert_eq!(facets[0].features[0], FacetFeature::Tag { tag: "kramer".to_string() });
/// ```
pub fn detect_facets(text: &str) -> Vec<Facet> {
    let mut facets = Vec::new();

    for m in LINK_RE.find_iter(text) {
        let uri = m.as_str().trim_end_matches(LINK_TRAILING);
        facets.push(Facet {
            index: FacetIndex {
                byte_start: m.start(),
                byte_end: m.start() + uri.len(),
            },
            features: vec![FacetFeature::Link {
                uri: uri.to_string(),
            }],
        });
    }

    for caps in TAG_RE.captures_iter(text) {
        let Some(m) = caps.get(1) else { continue };
        facets.push(Facet {
            index: FacetIndex {
                byte_start: m.start(),
                byte_end: m.end(),
            },
            features: vec![FacetFeature::Tag {
                tag: m.as_str()[1..].to_string(),
            }],
        });
    }

    facets.sort_by_key(|f| f.index.byte_start);
    facets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_trailing_punctuation_excluded() {
        let text = "See https://example.com/a.";
        let facets = detect_facets(text);
        assert_eq!(facets.len(), 1);
        let idx = facets[0].index;
        assert_eq!(&text[idx.byte_start..idx.byte_end], "https://example.com/a");
    }

    #[test]
    fn test_tag_offsets_are_bytes() {
        let text = "Café… #oatmilk";
        let facets = detect_facets(text);
        assert_eq!(facets.len(), 1);
        let idx = facets[0].index;
        assert_eq!(&text[idx.byte_start..idx.byte_end], "#oatmilk");
    }

    #[test]
    fn test_mid_word_hash_is_not_a_tag() {
        assert!(detect_facets("issue#42 and C#").is_empty());
    }

    #[test]
    fn test_plain_text_has_no_facets() {
        assert!(detect_facets("I sold my neighbor an NFT of his own front door.").is_empty());
    }

    #[test]
    fn test_facets_serialize_with_type_tag() {
        let json = serde_json::to_value(detect_facets("#a https://x.io")).unwrap();
        assert_eq!(json[0]["features"][0]["$type"], "app.bsky.richtext.facet#tag");
        assert_eq!(json[0]["index"]["byteStart"], 0);
        assert_eq!(json[1]["features"][0]["$type"], "app.bsky.richtext.facet#link");
        assert_eq!(json[1]["features"][0]["uri"], "https://x.io");
    }
}
